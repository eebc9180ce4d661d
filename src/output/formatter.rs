//! Console, JSON and Markdown renderings of a match report

use crate::config::OutputFormat;
use crate::error::Result;
use crate::processing::analyzer::MatchReport;
use colored::{Color, Colorize};
use std::path::{Path, PathBuf};

pub trait OutputFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String>;
}

pub struct ConsoleFormatter {
    use_colors: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Picks the formatter for a requested output format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

/// (heading, entries) for each suggestion list, in display order
fn suggestion_sections(report: &MatchReport) -> [(&'static str, &[String]); 4] {
    let s = &report.suggestions;
    [
        ("Technical Skills", s.technical_skills.as_slice()),
        ("Soft Skills", s.soft_skills.as_slice()),
        ("Tools", s.tools.as_slice()),
        ("Other Keywords", s.other_keywords.as_slice()),
    ]
}

fn score_label(score: f32) -> &'static str {
    match score.round() as u32 {
        90..=100 => "EXCELLENT",
        80..=89 => "VERY GOOD",
        70..=79 => "GOOD",
        60..=69 => "FAIR",
        50..=59 => "BELOW AVG",
        _ => "POOR",
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str) -> String {
        if self.use_colors {
            format!("\n{} {}\n", "▓".color(Color::Green).bold(), title.color(Color::Green).bold())
        } else {
            format!("\n{} {}\n", "▓", title)
        }
    }

    fn format_score_badge(&self, score: f32) -> String {
        let label = score_label(score);
        let color = match label {
            "EXCELLENT" | "VERY GOOD" => Color::Green,
            "GOOD" | "FAIR" => Color::Yellow,
            _ => Color::Red,
        };

        if self.use_colors {
            format!("[{}]", label.color(color).bold())
        } else {
            format!("[{}]", label)
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("RESUME MATCH"));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms | Model: {}\n",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.processing_time_ms,
            report.embedding_model
        ));

        output.push_str(&self.format_header("Score"));
        output.push_str(&format!(
            "Match Score: {:.1}% {}\n",
            report.score,
            self.format_score_badge(report.score)
        ));
        output.push_str(&format!(
            "  Semantic similarity: {:.1}%\n",
            report.breakdown.semantic_score * 100.0
        ));
        output.push_str(&format!(
            "  Keyword overlap: {:.1}%\n",
            report.breakdown.keyword_overlap * 100.0
        ));
        output.push_str(&format!(
            "  Keywords: {} in job description, {} in resume, {} shared\n",
            report.job_keyword_count,
            report.resume_keyword_count,
            report.matched_keywords.len()
        ));

        output.push_str(&self.format_header("Missing Keywords"));
        if report.suggestions.is_empty() {
            output.push_str(&self.colorize("Nothing missing.\n", Color::Green));
        }
        for (title, entries) in suggestion_sections(report) {
            if entries.is_empty() {
                continue;
            }
            output.push_str(&format!("{} ({}):\n", self.colorize(title, Color::Cyan), entries.len()));
            for entry in entries {
                output.push_str(&format!("  • {}\n", entry));
            }
        }

        Ok(output)
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String> {
        let mut output = String::new();

        output.push_str("# Resume Match Report\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms | **Model:** `{}`\n\n",
                report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.processing_time_ms,
                report.embedding_model
            ));
        }

        output.push_str(&format!(
            "**Match Score:** {:.1}% ({})\n\n",
            report.score,
            score_label(report.score)
        ));

        output.push_str("| Component | Value |\n");
        output.push_str("|-----------|-------|\n");
        output.push_str(&format!(
            "| Semantic similarity | {:.1}% |\n",
            report.breakdown.semantic_score * 100.0
        ));
        output.push_str(&format!(
            "| Keyword overlap | {:.1}% |\n",
            report.breakdown.keyword_overlap * 100.0
        ));
        output.push_str(&format!("| Job keywords | {} |\n", report.job_keyword_count));
        output.push_str(&format!("| Resume keywords | {} |\n\n", report.resume_keyword_count));

        output.push_str("## Missing Keywords\n\n");
        for (title, entries) in suggestion_sections(report) {
            output.push_str(&format!("### {}\n\n", title));
            if entries.is_empty() {
                output.push_str("_None_\n\n");
                continue;
            }
            for entry in entries {
                output.push_str(&format!("- {}\n", entry));
            }
            output.push('\n');
        }

        Ok(output)
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, true, true)
    }

    pub fn with_options(use_colors: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(&self, report: &MatchReport, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
    };
    format!("{}_match{}.{}", base_name, timestamp_suffix, extension)
}

/// Where `--save` writes: a directory target gets a timestamped file named after the resume
pub fn report_path(target: &Path, format: OutputFormat, resume: &Path) -> PathBuf {
    if target.is_dir() {
        target.join(suggest_filename(format, &resume.to_string_lossy(), true))
    } else {
        target.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::categorizer::SuggestionReport;
    use crate::processing::scorer::ScoreBreakdown;
    use tempfile::TempDir;

    fn sample_report() -> MatchReport {
        MatchReport {
            score: 72.5,
            breakdown: ScoreBreakdown {
                semantic_score: 0.7,
                keyword_overlap: 0.47,
                raw_score: 72.5,
                final_score: 72.5,
            },
            suggestions: SuggestionReport {
                technical_skills: vec!["kubernetes".to_string()],
                soft_skills: vec!["communication".to_string()],
                tools: vec![],
                other_keywords: vec!["fintech".to_string()],
            },
            matched_keywords: vec!["python".to_string()],
            job_keyword_count: 4,
            resume_keyword_count: 3,
            embedding_model: "hashing".to_string(),
            processing_time_ms: 12,
            generated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_console_without_colors() {
        let output = ConsoleFormatter::new(false).format_report(&sample_report()).unwrap();

        assert!(output.contains("Match Score: 72.5% [GOOD]"));
        assert!(output.contains("Soft Skills (1):"));
        assert!(output.contains("  • communication"));
        assert!(!output.contains("Tools ("));
    }

    #[test]
    fn test_json_uses_suggestion_field_names() {
        let output = JsonFormatter::new(false).format_report(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        let suggestions = &value["suggestions"];
        assert_eq!(suggestions["technical_skills"][0], "kubernetes");
        assert_eq!(suggestions["soft_skills"][0], "communication");
        assert!(suggestions["tools"].as_array().unwrap().is_empty());
        assert_eq!(suggestions["other_keywords"][0], "fintech");
    }

    #[test]
    fn test_markdown_lists_every_category() {
        let output = MarkdownFormatter::new(false).format_report(&sample_report()).unwrap();

        assert!(output.starts_with("# Resume Match Report"));
        assert!(output.contains("### Tools\n\n_None_"));
        assert!(output.contains("- fintech"));
        assert!(!output.contains("**Generated:**"));
    }

    #[test]
    fn test_suggest_filename() {
        assert_eq!(suggest_filename(OutputFormat::Json, "cv/jane.pdf", false), "jane_match.json");
        assert_eq!(suggest_filename(OutputFormat::Markdown, "jane.docx", false), "jane_match.md");
    }

    #[test]
    fn test_report_path_in_directory() {
        let dir = TempDir::new().unwrap();

        let path = report_path(dir.path(), OutputFormat::Json, Path::new("cv/jane.pdf"));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert_eq!(path.parent().unwrap(), dir.path());
        assert!(name.starts_with("jane_match_"));
        assert!(name.ends_with(".json"));

        let file = dir.path().join("report.md");
        assert_eq!(report_path(&file, OutputFormat::Markdown, Path::new("jane.pdf")), file);
    }

    #[test]
    fn test_save_report_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reports").join("out.md");

        save_report_to_file("# report", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# report");
    }
}
