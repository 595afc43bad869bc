use std::io::{self, Read, Seek, SeekFrom};

use tracing::trace;

use crate::entry::Payload;
use crate::error::{Error, Result};
use crate::extract::PayloadSource;
use crate::format::ArchiveKind;
use crate::options::SniffOptions;

const LOCAL_HEADER: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];
const END_OF_CENTRAL_DIR: [u8; 4] = [0x50, 0x4B, 0x05, 0x06];
/// End record (22 bytes) plus the longest possible comment.
const TAIL_WINDOW: u64 = 22 + u16::MAX as u64;

/// Content check for a zip container.
///
/// Accepts a leading local-file or end-of-directory signature, or an end
/// record anywhere in the trailing window, so self-extracting or prefixed
/// containers still qualify. The reader is left where it was found.
pub(crate) fn is_zip<R: Read + Seek>(reader: &mut R, magic: &[u8]) -> io::Result<bool> {
    if magic.starts_with(&LOCAL_HEADER) || magic.starts_with(&END_OF_CENTRAL_DIR) {
        return Ok(true);
    }

    let pos = reader.stream_position()?;
    let found = scan_tail(reader);
    reader.seek(SeekFrom::Start(pos))?;
    found
}

fn scan_tail<R: Read + Seek>(reader: &mut R) -> io::Result<bool> {
    let len = reader.seek(SeekFrom::End(0))?;
    if len < 22 {
        return Ok(false);
    }
    let start = len.saturating_sub(TAIL_WINDOW);
    reader.seek(SeekFrom::Start(start))?;
    let mut tail = Vec::with_capacity((len - start) as usize);
    reader.read_to_end(&mut tail)?;
    Ok(tail.windows(END_OF_CENTRAL_DIR.len()).any(|w| w == END_OF_CENTRAL_DIR))
}

pub struct ZipSource<R: Read + Seek> {
    archive: ::zip::ZipArchive<R>,
    index:   usize,
}

impl<R: Read + Seek> ZipSource<R> {
    /// Open the container; `None` when its comment carries the opt-out marker.
    pub fn new(reader: R, options: &SniffOptions) -> Result<Option<Self>> {
        let archive = ::zip::ZipArchive::new(reader)?;
        if options.is_opted_out(archive.comment()) {
            trace!("zip comment carries opt-out marker");
            return Ok(None);
        }
        Ok(Some(Self { archive, index: 0 }))
    }

    pub fn len(&self) -> usize { self.archive.len() }

    pub fn is_empty(&self) -> bool { self.archive.len() == 0 }
}

impl<R: Read + Seek> PayloadSource for ZipSource<R> {
    fn next_payload(&mut self) -> Option<Result<Payload>> {
        while self.index < self.archive.len() {
            let mut file = match self.archive.by_index(self.index) {
                Ok(f) => f,
                Err(e) => return Some(Err(e.into())),
            };
            self.index += 1;

            let name = file.name().to_owned();
            let mut data = Vec::new();
            if let Err(e) = file.read_to_end(&mut data) {
                return Some(Err(Error::corrupted(ArchiveKind::Zip, e)));
            }

            match Payload::new(name, data) {
                Some(payload) => return Some(Ok(payload)),
                None => trace!(index = self.index - 1, "skipping empty member"),
            }
        }
        None
    }

    fn kind(&self) -> ArchiveKind { ArchiveKind::Zip }
}
