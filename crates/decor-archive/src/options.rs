use serde::{Deserialize, Serialize};

/// Comment token that keeps a zip container from being unpacked.
pub const DEFAULT_OPT_OUT_MARKER: &str = "decor_no_uncompress";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SniffOptions {
    pub opt_out_marker: String,
}

impl Default for SniffOptions {
    fn default() -> Self {
        Self {
            opt_out_marker: DEFAULT_OPT_OUT_MARKER.to_owned(),
        }
    }
}

impl SniffOptions {
    pub fn new() -> Self { Self::default() }

    pub fn opt_out_marker(mut self, marker: impl Into<String>) -> Self {
        self.opt_out_marker = marker.into();
        self
    }

    /// True when `comment` carries the opt-out marker.
    ///
    /// An empty marker never matches.
    pub fn is_opted_out(&self, comment: &[u8]) -> bool {
        let marker = self.opt_out_marker.as_bytes();
        !marker.is_empty() && comment.windows(marker.len()).any(|w| w == marker)
    }
}
