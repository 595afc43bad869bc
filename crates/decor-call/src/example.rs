//! Rewriting `/path/to/<name>` placeholders to real example files.

use std::io;
use std::path::PathBuf;

use serde_json::Value;
use tracing::debug;

use crate::options::Kwargs;

pub const EXAMPLE_PREFIX: &str = "/path/to/";

/// Replace a placeholder path under `key` with whatever `resolver` finds.
///
/// Returns whether the value changed. Values that are not strings, lack the
/// prefix, or fail to resolve are left as they are.
pub fn map_example_filename<F>(kwargs: &mut Kwargs, key: &str, mut resolver: F) -> bool
where
    F: FnMut(&str) -> io::Result<PathBuf>,
{
    let Some(Value::String(value)) = kwargs.get_mut(key) else {
        return false;
    };
    let Some(name) = value.strip_prefix(EXAMPLE_PREFIX) else {
        return false;
    };
    match resolver(name) {
        Ok(path) => {
            *value = path.to_string_lossy().into_owned();
            true
        }
        Err(e) => {
            debug!(key, name, error = %e, "example file not resolved");
            false
        }
    }
}

/// Resolver that returns the first `dir/name` that exists.
pub fn search_dirs(dirs: Vec<PathBuf>) -> impl Fn(&str) -> io::Result<PathBuf> {
    move |name: &str| {
        dirs.iter()
            .map(|dir| dir.join(name))
            .find(|path| path.is_file())
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, format!("example file '{name}' not found"))
            })
    }
}

/// Wrap `f` so the argument under `key` is mapped before every call.
pub fn with_example_filename<R, F, P>(
    key: &str,
    mut resolver: P,
    mut f: F,
) -> impl FnMut(Kwargs) -> R + use<R, F, P>
where
    F: FnMut(Kwargs) -> R,
    P: FnMut(&str) -> io::Result<PathBuf>,
{
    let key = key.to_owned();
    move |mut kwargs| {
        map_example_filename(&mut kwargs, &key, &mut resolver);
        f(kwargs)
    }
}
