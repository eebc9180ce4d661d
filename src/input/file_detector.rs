//! Document format detection

use crate::error::{MatcherError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            other => Err(MatcherError::UnsupportedFormat(format!(
                "'.{}' (expected .pdf or .docx)",
                other
            ))),
        }
    }

    /// Detect the format from a path's extension without touching the file
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|ext| ext.to_str()).ok_or_else(|| {
            MatcherError::UnsupportedFormat(format!("File has no extension: {}", path.display()))
        })?;
        Self::from_extension(ext)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_supported_formats() {
        assert_eq!(DocumentFormat::from_extension("pdf").unwrap(), DocumentFormat::Pdf);
        assert_eq!(DocumentFormat::from_extension("DOCX").unwrap(), DocumentFormat::Docx);
        assert_eq!(DocumentFormat::from_extension(".Pdf").unwrap(), DocumentFormat::Pdf);
    }

    #[test]
    fn test_rejects_other_extensions() {
        for ext in ["txt", "doc", "md", ""] {
            assert!(matches!(
                DocumentFormat::from_extension(ext),
                Err(MatcherError::UnsupportedFormat(_))
            ));
        }
    }

    #[test]
    fn test_path_without_extension() {
        let result = DocumentFormat::from_path(Path::new("uploads/resume"));
        assert!(matches!(result, Err(MatcherError::UnsupportedFormat(_))));
    }
}
