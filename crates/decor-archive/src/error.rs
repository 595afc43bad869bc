use std::io;
use std::path::PathBuf;

use crate::format::ArchiveKind;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("file not found '{}'", path.display())]
    NotFound { path: PathBuf },

    #[error("unsupported archive format")]
    UnsupportedFormat,

    #[error("{kind} archive is corrupted: {source}")]
    Corrupted {
        kind:   ArchiveKind,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn corrupted(kind: ArchiveKind, source: impl Into<io::Error>) -> Self {
        Self::Corrupted {
            kind,
            source: source.into(),
        }
    }

    pub fn is_not_found(&self) -> bool { matches!(self, Self::NotFound { .. }) }
}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Self { Self::corrupted(ArchiveKind::Zip, e) }
}

pub type Result<T> = std::result::Result<T, Error>;
