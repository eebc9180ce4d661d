//! Resume matcher library
//!
//! Scores a resume against a job description and lists the job keywords the
//! resume is missing, grouped into technical skills, soft skills, tools and
//! everything else.

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod processing;
pub mod output;

pub use config::Config;
pub use error::{MatcherError, Result};
pub use input::{extract_text, DocumentFormat};
pub use processing::{MatchReport, MatchingEngine};
