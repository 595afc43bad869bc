use std::path::PathBuf;

use decor_archive::SniffOptions;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::OptionError;

/// Ordered keyword arguments passed alongside a wrapped call.
pub type Kwargs = serde_json::Map<String, Value>;

/// Keyword that turns container sniffing off for a single call.
pub const CHECK_COMPRESSION: &str = "check_compression";

const DEFAULT_TEMP_PREFIX: &str = "decor-";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchOptions {
    pub check_compression: bool,
    pub temp_prefix:       String,
    pub temp_dir:          Option<PathBuf>,
    pub sniff:             SniffOptions,
}

impl Default for DispatchOptions {
    fn default() -> Self { Self::new() }
}

impl DispatchOptions {
    pub fn new() -> Self {
        Self {
            check_compression: true,
            temp_prefix:       DEFAULT_TEMP_PREFIX.to_owned(),
            temp_dir:          None,
            sniff:             SniffOptions::default(),
        }
    }

    pub fn check_compression(mut self, check: bool) -> Self {
        self.check_compression = check;
        self
    }

    pub fn temp_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.temp_prefix = prefix.into();
        self
    }

    pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    pub fn sniff(mut self, sniff: SniffOptions) -> Self {
        self.sniff = sniff;
        self
    }

    /// Take `check_compression` out of `kwargs`, leaving the rest for the reader.
    ///
    /// An absent key keeps the current setting.
    pub fn with_kwargs(mut self, kwargs: &mut Kwargs) -> Result<Self, OptionError> {
        if let Some(value) = kwargs.shift_remove(CHECK_COMPRESSION) {
            self.check_compression = value.as_bool().ok_or_else(|| OptionError {
                key:      CHECK_COMPRESSION.to_owned(),
                expected: "a boolean",
            })?;
        }
        Ok(self)
    }

    pub fn from_kwargs(kwargs: &mut Kwargs) -> Result<Self, OptionError> {
        Self::new().with_kwargs(kwargs)
    }
}
