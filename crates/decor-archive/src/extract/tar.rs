use std::io::Read;

use ::tar::EntryType;
use tracing::trace;

use crate::entry::Payload;
use crate::error::{Error, Result};
use crate::extract::PayloadSource;
use crate::format::{ArchiveKind, Decoder, TarCompress};

/// Owns the decoded tar stream; payloads are borrowed out through [`TarSource`].
pub struct TarArchive<R: Read> {
    archive: ::tar::Archive<Decoder<R>>,
    codec:   TarCompress,
}

impl<R: Read> TarArchive<R> {
    pub fn new(reader: R, codec: TarCompress) -> Result<Self> {
        let reader = codec.decoder(reader)?;
        Ok(Self {
            archive: ::tar::Archive::new(reader),
            codec,
        })
    }

    pub fn entries(&mut self) -> Result<TarSource<'_, R>> {
        let kind = ArchiveKind::Tar(self.codec);
        let entries = self
            .archive
            .entries()
            .map_err(|e| Error::corrupted(kind, e))?;
        Ok(TarSource { entries, kind })
    }
}

pub struct TarSource<'a, R: 'a + Read> {
    entries: ::tar::Entries<'a, Decoder<R>>,
    kind:    ArchiveKind,
}

fn is_regular(entry_type: EntryType) -> bool {
    matches!(
        entry_type,
        EntryType::Regular | EntryType::Continuous | EntryType::GNUSparse
    )
}

impl<'a, R: Read + 'a> PayloadSource for TarSource<'a, R> {
    fn next_payload(&mut self) -> Option<Result<Payload>> {
        loop {
            let mut entry = match self.entries.next()? {
                Ok(e) => e,
                Err(e) => return Some(Err(Error::corrupted(self.kind, e))),
            };

            let name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
            let entry_type = entry.header().entry_type();
            if !is_regular(entry_type) {
                trace!(member = %name, ?entry_type, "skipping non-file member");
                continue;
            }

            let mut data = Vec::new();
            if let Err(e) = entry.read_to_end(&mut data) {
                return Some(Err(Error::corrupted(self.kind, e)));
            }

            match Payload::new(name, data) {
                Some(payload) => return Some(Ok(payload)),
                None => trace!("skipping empty member"),
            }
        }
    }

    fn kind(&self) -> ArchiveKind { self.kind }
}
