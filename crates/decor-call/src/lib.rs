//! Wrappers that sit in front of another call.
//!
//! The main one is [`run`]/[`uncompress`]: a file reader wrapped this way
//! accepts tar, zip, gzip and bzip2 inputs transparently, reading every
//! member through a temp file and merging the results. The rest handle
//! deprecated functions and keywords, masked or empty data, network
//! timeouts in tests, and example-file placeholders.

mod combine;
mod deprecate;
mod dispatch;
mod error;
mod example;
mod guard;
mod options;
mod remap;
mod temp;

pub use combine::{Combine, try_combine_all};
pub use deprecate::{deprecated, deprecated_keywords};
pub use dispatch::{Source, run, uncompress, uncompress_kwargs};
pub use error::{DispatchError, GuardError, OptionError, RemapError, Result};
pub use example::{EXAMPLE_PREFIX, map_example_filename, search_dirs, with_example_filename};
pub use guard::{HasData, MaskedData, NetworkOutcome, raise_if_masked, skip_if_no_data, skip_on_network_error};
pub use options::{CHECK_COMPRESSION, DispatchOptions, Kwargs};
pub use remap::{ActionKind, RemapAction, RenameTable, remap};
pub use temp::TempPayload;

pub use decor_archive::{ArchiveKind, SniffOptions};
