//! Input manager routing resumes and job descriptions to the right reader

use crate::error::{MatcherError, Result};
use crate::input::file_detector::DocumentFormat;
use crate::input::text_extractor::{markdown_to_text, DocxExtractor, PdfExtractor, TextExtractor};
use log::{debug, info};
use std::path::Path;

/// Extract plain text from a resume document of the declared format
pub fn extract_text(path: &Path, format: DocumentFormat) -> Result<String> {
    let text = match format {
        DocumentFormat::Pdf => {
            info!("Extracting text from PDF: {}", path.display());
            PdfExtractor.extract(path)?
        }
        DocumentFormat::Docx => {
            info!("Extracting text from DOCX: {}", path.display());
            DocxExtractor.extract(path)?
        }
    };
    debug!("Extracted {} characters from {}", text.len(), path.display());
    Ok(text)
}

pub struct InputManager;

impl InputManager {
    pub fn new() -> Self {
        Self
    }

    /// Detect the format from the extension, then extract.
    ///
    /// Unsupported extensions fail before the file is opened.
    pub fn extract_resume(&self, path: &Path) -> Result<String> {
        let format = DocumentFormat::from_path(path)?;
        extract_text(path, format)
    }

    /// Read a job description from a `.txt` or `.md` file
    pub fn read_job_description(&self, path: &Path) -> Result<String> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        if !matches!(ext.as_str(), "txt" | "md" | "markdown") {
            return Err(MatcherError::UnsupportedFormat(format!(
                "Job description must be .txt or .md: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        if ext == "txt" {
            info!("Reading plain text job description: {}", path.display());
            Ok(content)
        } else {
            info!("Processing markdown job description: {}", path.display());
            Ok(markdown_to_text(&content))
        }
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_unsupported_resume_rejected_before_read() {
        let manager = InputManager::new();
        let result = manager.extract_resume(Path::new("/nonexistent/resume.txt"));
        assert!(matches!(result, Err(MatcherError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_resume_is_io_error() {
        let manager = InputManager::new();
        let result = manager.extract_resume(Path::new("/nonexistent/resume.pdf"));
        assert!(matches!(result, Err(MatcherError::Io(_))));
    }

    #[test]
    fn test_read_markdown_job_description() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("job.md");
        std::fs::write(&path, "## Backend Engineer\n\n* Rust\n* PostgreSQL\n").unwrap();

        let text = InputManager::new().read_job_description(&path).unwrap();
        assert_eq!(text, "Backend Engineer\nRust\nPostgreSQL");
    }

    #[test]
    fn test_read_job_description_rejects_pdf() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("job.pdf");
        std::fs::write(&path, b"%PDF").unwrap();

        let result = InputManager::new().read_job_description(&path);
        assert!(matches!(result, Err(MatcherError::UnsupportedFormat(_))));
    }
}
