use std::io::{self, Write};
use std::path::Path;

use decor_archive::Payload;
use tempfile::TempPath;
use tracing::{trace, warn};

use crate::options::DispatchOptions;

/// One payload written to a uniquely named temp file.
///
/// The file lives until [`TempPayload::release`] or drop, whichever comes
/// first, so an unwinding reader still cleans up.
pub struct TempPayload {
    path:   TempPath,
    member: String,
}

impl TempPayload {
    pub fn stage(payload: &Payload, options: &DispatchOptions) -> io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(&options.temp_prefix);
        let mut file = match &options.temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        file.write_all(payload.as_bytes())?;
        file.flush()?;

        let path = file.into_temp_path();
        trace!(member = %payload.name, path = %path.display(), size = payload.size(), "staged payload");
        Ok(Self {
            path,
            member: payload.name.clone(),
        })
    }

    pub fn path(&self) -> &Path { &self.path }

    pub fn member(&self) -> &str { &self.member }

    /// Delete the file now. A failed delete is logged, not returned.
    pub fn release(self) {
        let shown = self.path.display().to_string();
        if let Err(e) = self.path.close() {
            warn!(member = %self.member, path = %shown, error = %e, "failed to remove staged payload");
        }
    }
}
