//! Input processing module
//! Handles format detection, text extraction, and upload staging

pub mod file_detector;
pub mod text_extractor;
pub mod manager;
pub mod upload;

pub use file_detector::DocumentFormat;
pub use manager::{extract_text, InputManager};
pub use text_extractor::RawDocument;
pub use upload::StagedUpload;
