//! Staging of uploaded resume bytes on disk
//!
//! An upload lives in a named temporary file for the duration of one
//! matching request. The file is removed when the [`StagedUpload`] is
//! dropped, whether extraction succeeded or failed.

use crate::error::Result;
use crate::input::file_detector::DocumentFormat;
use crate::input::manager::extract_text;
use log::debug;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

pub struct StagedUpload {
    file: NamedTempFile,
    format: DocumentFormat,
}

impl StagedUpload {
    /// Write `bytes` into `upload_dir` under a unique name ending in the format's extension
    pub fn stage(upload_dir: &Path, bytes: &[u8], format: DocumentFormat) -> Result<Self> {
        std::fs::create_dir_all(upload_dir)?;

        let mut file = tempfile::Builder::new()
            .prefix("resume-")
            .suffix(&format!(".{}", format.extension()))
            .tempfile_in(upload_dir)?;
        file.write_all(bytes)?;
        file.flush()?;

        debug!("Staged {} byte upload at {}", bytes.len(), file.path().display());
        Ok(Self { file, format })
    }

    /// Stage a file whose declared name decides the format
    pub fn stage_named(upload_dir: &Path, file_name: &str, bytes: &[u8]) -> Result<Self> {
        let format = DocumentFormat::from_path(Path::new(file_name))?;
        Self::stage(upload_dir, bytes, format)
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    pub fn extract_text(&self) -> Result<String> {
        extract_text(self.path(), self.format)
    }
}
