//! Transparent decompression in front of a file reader.
//!
//! [`run`] inspects the input, and when it is an archive or a compressed
//! stream, replays every member through the reader via a temp file, folding
//! the results with [`Combine`]. Anything that is not, or cannot be read as,
//! a container goes to the reader unchanged.

use std::path::{Path, PathBuf};

use decor_archive::{Payload, classify_and_extract_with};
use tracing::debug;

use crate::combine::{Combine, try_combine_all};
use crate::error::{DispatchError, Result};
use crate::options::{DispatchOptions, Kwargs};
use crate::temp::TempPayload;

/// First argument of a dispatched call.
#[derive(Debug, PartialEq, Eq)]
pub enum Source<H> {
    Path(PathBuf),
    /// Already-open input; never sniffed.
    Handle(H),
}

impl<H> Source<H> {
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Path(p) => Some(p),
            Self::Handle(_) => None,
        }
    }
}

impl<H> From<PathBuf> for Source<H> {
    fn from(path: PathBuf) -> Self { Self::Path(path) }
}

impl<H> From<&Path> for Source<H> {
    fn from(path: &Path) -> Self { Self::Path(path.to_path_buf()) }
}

impl<H> From<&str> for Source<H> {
    fn from(path: &str) -> Self { Self::Path(PathBuf::from(path)) }
}

/// Call `reader` on `source`, unpacking archives and compressed streams first.
///
/// With several payloads the reader runs once per payload, in extraction
/// order, and the results are combined left to right. Each temp file is gone
/// before the next payload is staged and before any error is returned.
pub fn run<H, A, T, E, F>(
    source: Source<H>,
    args: &A,
    options: &DispatchOptions,
    mut reader: F,
) -> Result<T, E>
where
    A: ?Sized,
    T: Combine,
    F: FnMut(Source<H>, &A) -> std::result::Result<T, E>,
{
    let path = match source {
        Source::Path(path) if options.check_compression => path,
        other => {
            debug!("sniffing bypassed");
            return reader(other, args).map_err(DispatchError::Reader);
        }
    };

    let sniffed = classify_and_extract_with(&path, &options.sniff).map_err(|e| match e {
        decor_archive::Error::NotFound { path } => DispatchError::NotFound { path },
        source => DispatchError::Sniff {
            path: path.clone(),
            source,
        },
    })?;

    let kind = sniffed.kind;
    let payloads = sniffed.into_payloads().unwrap_or_default();
    debug!(path = %path.display(), %kind, payloads = payloads.len(), "dispatching");

    let results = payloads
        .into_iter()
        .map(|payload| read_payload(payload, args, options, &mut reader));
    match try_combine_all(results)? {
        Some(aggregate) => Ok(aggregate),
        None => reader(Source::Path(path), args).map_err(DispatchError::Reader),
    }
}

fn read_payload<H, A, T, E, F>(
    payload: Payload,
    args: &A,
    options: &DispatchOptions,
    reader: &mut F,
) -> Result<T, E>
where
    A: ?Sized,
    F: FnMut(Source<H>, &A) -> std::result::Result<T, E>,
{
    let staged = TempPayload::stage(&payload, options).map_err(|source| DispatchError::Temp {
        member: payload.name.clone(),
        source,
    })?;
    drop(payload);

    let result = reader(Source::Path(staged.path().to_path_buf()), args);
    staged.release();
    result.map_err(DispatchError::Reader)
}

/// Wrap `reader` so every call goes through [`run`].
pub fn uncompress<H, A, T, E, F>(
    options: DispatchOptions,
    mut reader: F,
) -> impl FnMut(Source<H>, &A) -> Result<T, E>
where
    A: ?Sized,
    T: Combine,
    F: FnMut(Source<H>, &A) -> std::result::Result<T, E>,
{
    move |source: Source<H>, args: &A| run(source, args, &options, &mut reader)
}

/// Like [`uncompress`], but each call may carry `check_compression` in its
/// keyword arguments. The flag is removed before the reader sees them.
pub fn uncompress_kwargs<H, T, E, F>(
    options: DispatchOptions,
    mut reader: F,
) -> impl FnMut(Source<H>, Kwargs) -> Result<T, E>
where
    T: Combine,
    F: FnMut(Source<H>, &Kwargs) -> std::result::Result<T, E>,
{
    move |source: Source<H>, mut kwargs: Kwargs| {
        let call_options = options.clone().with_kwargs(&mut kwargs)?;
        run(source, &kwargs, &call_options, &mut reader)
    }
}
