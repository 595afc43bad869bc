use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DispatchError<E> {
    #[error("file not found '{}'", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to sniff '{}': {source}", path.display())]
    Sniff {
        path:   PathBuf,
        #[source]
        source: decor_archive::Error,
    },

    #[error("failed to stage payload '{member}': {source}")]
    Temp {
        member: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    InvalidOption(#[from] OptionError),

    #[error(transparent)]
    Reader(E),
}

impl<E> DispatchError<E> {
    /// The reader's own error, if that is what failed.
    pub fn into_reader(self) -> Option<E> {
        match self {
            Self::Reader(e) => Some(e),
            _ => None,
        }
    }

    pub fn reader(&self) -> Option<&E> {
        match self {
            Self::Reader(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid option '{key}': expected {expected}")]
pub struct OptionError {
    pub key:      String,
    pub expected: &'static str,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RemapError {
    #[error(
        "conflicting deprecated keywords ({}) - please use new '{new_key}' keyword instead",
        .old_keys.join(", ")
    )]
    Conflict {
        old_keys: Vec<String>,
        new_key:  String,
    },
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GuardError {
    #[error(
        "trace with masked values found; this is not supported for this operation, \
         split the data into unmasked segments first"
    )]
    Masked,
}

pub type Result<T, E> = std::result::Result<T, DispatchError<E>>;
