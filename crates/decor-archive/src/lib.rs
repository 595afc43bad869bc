//! Container sniffing and in-memory payload extraction.
//!
//! Given a path, decides whether it is a tar-family archive, a zip archive, a
//! gzip stream, a bzip2 stream, or none of these, and pulls every non-empty
//! member into memory as a [`Payload`]. Inputs that look like archives but
//! fail to unpack are reported as [`SniffOutcome::NoPayloads`], never as an
//! error, so callers can hand the original file to a reader unchanged.
//!
//! # Architecture
//!
//! - `format.rs` - Kind tags, tar codecs and header probing
//! - `extract/` - Per-format payload sources
//! - `entry.rs` - Payload and outcome types
//! - `options.rs` - Sniffing options (zip opt-out marker)

pub use entry::{Payload, SniffOutcome, Sniffed};
pub use error::{Error, Result};
pub use extract::{classify_and_extract, classify_and_extract_with, collect_payloads, PayloadSource};
pub use format::{ArchiveKind, TarCompress};
pub use options::{SniffOptions, DEFAULT_OPT_OUT_MARKER};

pub mod entry;
pub mod extract;
pub mod format;
pub mod options;
mod error;
