//! Report rendering

pub mod formatter;

pub use formatter::{report_path, save_report_to_file, suggest_filename, ReportGenerator};
