use std::fs::File;
use std::io::{self, Read, Seek};
use std::path::Path;

use tracing::{debug, trace};

use crate::entry::{Payload, SniffOutcome, Sniffed};
use crate::error::{Error, Result};
use crate::format::{self, ArchiveKind};
use crate::options::SniffOptions;

mod stream;
mod tar;
mod zip;

pub use self::tar::{TarArchive, TarSource};
pub use self::zip::ZipSource;

const MAGIC_LEN: u64 = 8;

/// A container that yields its member payloads one at a time.
///
/// Empty members and non-file members are skipped by the implementation, so
/// every yielded payload is non-empty.
pub trait PayloadSource {
    fn next_payload(&mut self) -> Option<Result<Payload>>;

    fn kind(&self) -> ArchiveKind;
}

/// Drain `source` into an outcome. The first error discards everything read.
pub fn collect_payloads<S: PayloadSource>(mut source: S) -> Result<SniffOutcome> {
    let mut payloads = Vec::new();
    while let Some(payload) = source.next_payload() {
        let payload = payload?;
        trace!(kind = %source.kind(), member = %payload.name, size = payload.size(), "payload");
        payloads.push(payload);
    }
    Ok(SniffOutcome::from_payloads(payloads))
}

/// Classify `path` and pull its payloads into memory with default options.
pub fn classify_and_extract(path: impl AsRef<Path>) -> Result<Sniffed> {
    classify_and_extract_with(path, &SniffOptions::default())
}

/// Classify `path` and pull its payloads into memory.
///
/// Only a missing or unreadable input is an error. An input that looks like
/// an archive but cannot be unpacked yields [`SniffOutcome::NoPayloads`] so
/// the caller can fall back to reading it raw.
pub fn classify_and_extract_with(path: impl AsRef<Path>, options: &SniffOptions) -> Result<Sniffed> {
    let path = path.as_ref();
    let mut file = open_input(path)?;
    let magic = read_magic(&mut file)?;

    let tar_codec = format::probe_tar(&magic, &mut file);
    file.rewind()?;
    if let Some(codec) = tar_codec {
        let kind = ArchiveKind::Tar(codec);
        let outcome = TarArchive::new(file, codec).and_then(|mut archive| {
            let entries = archive.entries()?;
            collect_payloads(entries)
        });
        return Ok(settle(path, kind, outcome));
    }

    let zipped = zip::is_zip(&mut file, &magic)?;
    file.rewind()?;
    if zipped {
        let outcome = ZipSource::new(file, options).and_then(|source| match source {
            Some(source) => collect_payloads(source),
            None => Ok(SniffOutcome::OptOut),
        });
        return Ok(settle(path, ArchiveKind::Zip, outcome));
    }

    let name = path.to_string_lossy();
    for (suffix, kind) in [(".gz", ArchiveKind::Gzip), (".bz2", ArchiveKind::Bzip2)] {
        if name.ends_with(suffix) {
            let member = member_name(path, suffix);
            let outcome = stream::decompress(file, kind, member);
            return Ok(settle(path, kind, outcome));
        }
    }

    debug!(path = %path.display(), "not an archive");
    Ok(Sniffed::plain())
}

fn open_input(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::NotFound {
            path: path.to_path_buf(),
        },
        _ => Error::Io(e),
    })
}

fn read_magic(file: &mut File) -> Result<Vec<u8>> {
    let mut magic = Vec::with_capacity(MAGIC_LEN as usize);
    file.by_ref().take(MAGIC_LEN).read_to_end(&mut magic)?;
    file.rewind()?;
    Ok(magic)
}

fn member_name(path: &Path, suffix: &str) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match file_name.strip_suffix(suffix) {
        Some(stem) => stem.to_owned(),
        None => file_name,
    }
}

/// Turn an extraction failure into `NoPayloads`, logging what was swallowed.
fn settle(path: &Path, kind: ArchiveKind, outcome: Result<SniffOutcome>) -> Sniffed {
    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(e) => {
            debug!(path = %path.display(), %kind, error = %e, "unreadable archive, using raw input");
            SniffOutcome::NoPayloads
        }
    };
    debug!(
        path = %path.display(),
        %kind,
        payloads = outcome.payload_count(),
        opt_out = matches!(outcome, SniffOutcome::OptOut),
        "sniffed input"
    );
    Sniffed { kind, outcome }
}
