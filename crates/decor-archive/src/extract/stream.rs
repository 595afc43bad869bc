use std::io::Read;

use crate::entry::{Payload, SniffOutcome};
use crate::error::{Error, Result};
use crate::format::ArchiveKind;

/// Decompress a whole single-stream container into at most one payload.
pub(crate) fn decompress<R: Read>(reader: R, kind: ArchiveKind, name: String) -> Result<SniffOutcome> {
    let mut data = Vec::new();
    let read = match kind {
        ArchiveKind::Gzip => flate2::read::MultiGzDecoder::new(reader).read_to_end(&mut data),
        ArchiveKind::Bzip2 => bzip2::read::MultiBzDecoder::new(reader).read_to_end(&mut data),
        _ => return Err(Error::UnsupportedFormat),
    };
    read.map_err(|e| Error::corrupted(kind, e))?;
    Ok(SniffOutcome::from_payloads(Payload::new(name, data).into_iter().collect()))
}
