use tracing::warn;

use crate::error::RemapError;
use crate::options::Kwargs;
use crate::remap::{RenameTable, remap};

/// Wrap `f` so every call logs a deprecation warning first.
///
/// Without a `message` the notice reads `Call to deprecated function {name}.`
pub fn deprecated<A, R, F>(
    name: &str,
    message: Option<&str>,
    mut f: F,
) -> impl FnMut(A) -> R + use<A, R, F>
where
    F: FnMut(A) -> R,
{
    let notice = match message {
        Some(message) => message.to_owned(),
        None => format!("Call to deprecated function {name}."),
    };
    move |args| {
        warn!(target: "decor::deprecation", "{notice}");
        f(args)
    }
}

/// Wrap `f` so deprecated keywords are renamed or dropped before it runs.
///
/// One warning is logged per changed keyword. A conflict returns the error
/// without calling `f`.
pub fn deprecated_keywords<R, F>(
    name: &str,
    table: RenameTable,
    mut f: F,
) -> impl FnMut(Kwargs) -> Result<R, RemapError> + use<R, F>
where
    F: FnMut(Kwargs) -> R,
{
    let name = name.to_owned();
    move |kwargs| {
        let (kwargs, actions) = remap(&kwargs, &table)?;
        for action in &actions {
            warn!(target: "decor::deprecation", "{}", action.message(&name));
        }
        Ok(f(kwargs))
    }
}
