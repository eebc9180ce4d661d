//! Text extraction from resume documents

use crate::error::{MatcherError, Result};
use crate::input::file_detector::DocumentFormat;
use pulldown_cmark::{Event, Parser, Tag};
use quick_xml::events::Event as XmlEvent;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use std::path::Path;

pub trait TextExtractor {
    fn extract_bytes(&self, bytes: &[u8]) -> Result<String>;

    fn extract(&self, path: &Path) -> Result<String> {
        let bytes = std::fs::read(path)?;
        self.extract_bytes(&bytes).map_err(|e| match e {
            MatcherError::ExtractionFailure(msg) => {
                MatcherError::ExtractionFailure(format!("'{}': {}", path.display(), msg))
            }
            other => other,
        })
    }
}

/// Binary document content plus its declared format
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub bytes: Vec<u8>,
    pub format: DocumentFormat,
}

impl RawDocument {
    pub fn new(bytes: Vec<u8>, format: DocumentFormat) -> Self {
        Self { bytes, format }
    }

    pub fn extract_text(&self) -> Result<String> {
        match self.format {
            DocumentFormat::Pdf => PdfExtractor.extract_bytes(&self.bytes),
            DocumentFormat::Docx => DocxExtractor.extract_bytes(&self.bytes),
        }
    }
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    /// Text layer of every page, in page order
    fn extract_bytes(&self, bytes: &[u8]) -> Result<String> {
        pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| MatcherError::ExtractionFailure(format!("Failed to extract text from PDF: {}", e)))
    }
}

pub struct DocxExtractor;

impl DocxExtractor {
    const DOCUMENT_PART: &'static str = "word/document.xml";

    fn read_document_part(bytes: &[u8]) -> Result<String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| MatcherError::ExtractionFailure(format!("Not a DOCX container: {}", e)))?;

        let mut part = archive.by_name(Self::DOCUMENT_PART).map_err(|e| {
            MatcherError::ExtractionFailure(format!("Missing {}: {}", Self::DOCUMENT_PART, e))
        })?;

        let mut xml = String::new();
        part.read_to_string(&mut xml)
            .map_err(|e| MatcherError::ExtractionFailure(format!("Unreadable {}: {}", Self::DOCUMENT_PART, e)))?;
        Ok(xml)
    }

    fn at_body_level(open: &[Vec<u8>]) -> bool {
        open.last().map(Vec::as_slice) == Some(b"body".as_slice())
    }

    /// Texts of the paragraphs directly under `w:body`, in document order.
    ///
    /// Table cells are not body paragraphs. Text boxes and `mc:Fallback`
    /// copies are skipped so a paragraph holding a drawing stays whole.
    fn paragraphs(xml: &str) -> Result<Vec<String>> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(false);

        let mut paragraphs = Vec::new();
        let mut current = String::new();
        let mut open: Vec<Vec<u8>> = Vec::new();
        let mut paragraph_depth: Option<usize> = None;
        let mut skip_depth: Option<usize> = None;
        let mut in_text = false;

        loop {
            let event = reader.read_event().map_err(|e| {
                MatcherError::ExtractionFailure(format!(
                    "Malformed document XML at byte {}: {}",
                    reader.buffer_position(),
                    e
                ))
            })?;
            let collecting = paragraph_depth.is_some() && skip_depth.is_none();

            match event {
                XmlEvent::Start(e) => {
                    let name = e.local_name().as_ref().to_vec();
                    match name.as_slice() {
                        b"p" if Self::at_body_level(&open) => paragraph_depth = Some(open.len()),
                        b"txbxContent" | b"Fallback" if skip_depth.is_none() => {
                            skip_depth = Some(open.len())
                        }
                        b"t" => in_text = true,
                        _ => {}
                    }
                    open.push(name);
                }
                XmlEvent::End(e) => {
                    open.pop();
                    let depth = open.len();
                    match e.local_name().as_ref() {
                        b"t" => in_text = false,
                        b"p" if paragraph_depth == Some(depth) => {
                            paragraphs.push(std::mem::take(&mut current));
                            paragraph_depth = None;
                        }
                        _ => {}
                    }
                    if skip_depth == Some(depth) {
                        skip_depth = None;
                    }
                }
                XmlEvent::Empty(e) => match e.local_name().as_ref() {
                    b"p" if Self::at_body_level(&open) => paragraphs.push(String::new()),
                    b"tab" if collecting => current.push('\t'),
                    b"br" | b"cr" if collecting => current.push('\n'),
                    _ => {}
                },
                XmlEvent::Text(t) if in_text && collecting => {
                    let text = t
                        .unescape()
                        .map_err(|e| MatcherError::ExtractionFailure(format!("Bad text run: {}", e)))?;
                    current.push_str(&text);
                }
                XmlEvent::Eof => break,
                _ => {}
            }
        }

        Ok(paragraphs)
    }
}

impl TextExtractor for DocxExtractor {
    fn extract_bytes(&self, bytes: &[u8]) -> Result<String> {
        let xml = Self::read_document_part(bytes)?;
        Ok(Self::paragraphs(&xml)?.join("\n"))
    }
}

/// Strip Markdown markup from a job description, one block per line
pub fn markdown_to_text(markdown: &str) -> String {
    let mut text = String::new();

    for event in Parser::new(markdown) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak => text.push('\n'),
            Event::End(Tag::Paragraph | Tag::Heading(..) | Tag::Item | Tag::CodeBlock(_)) => {
                text.push('\n')
            }
            _ => {}
        }
    }

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>
    <w:p><w:r><w:t xml:space="preserve">Python </w:t></w:r><w:r><w:t>&amp; Rust</w:t></w:r></w:p>
    <w:p/>
    <w:p><w:r><w:t>Skills</w:t><w:tab/><w:t>SQL</w:t><w:br/><w:t>Docker</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    #[test]
    fn test_docx_paragraphs_in_order() {
        let paragraphs = DocxExtractor::paragraphs(BODY).unwrap();
        assert_eq!(
            paragraphs,
            vec!["Jane Doe", "Python & Rust", "", "Skills\tSQL\nDocker"]
        );
    }

    #[test]
    fn test_docx_skips_text_boxes_and_tables() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006" xmlns:wps="http://schemas.microsoft.com/office/word/2010/wordprocessingShape">
  <w:body>
    <w:p>
      <w:r><w:t xml:space="preserve">Before </w:t></w:r>
      <w:r>
        <mc:AlternateContent>
          <mc:Choice Requires="wps"><w:drawing><wps:txbx><w:txbxContent><w:p><w:r><w:t>Kubernetes</w:t></w:r></w:p></w:txbxContent></wps:txbx></w:drawing></mc:Choice>
          <mc:Fallback><w:pict><w:textbox><w:txbxContent><w:p><w:r><w:t>Kubernetes</w:t></w:r></w:p></w:txbxContent></w:textbox></w:pict></mc:Fallback>
        </mc:AlternateContent>
      </w:r>
      <w:r><w:t>after</w:t></w:r>
    </w:p>
    <w:tbl><w:tr><w:tc><w:p><w:r><w:t>Cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
  </w:body>
</w:document>"#;

        assert_eq!(DocxExtractor::paragraphs(xml).unwrap(), vec!["Before after"]);
    }

    #[test]
    fn test_docx_rejects_non_zip() {
        let result = DocxExtractor.extract_bytes(b"definitely not a zip archive");
        assert!(matches!(result, Err(MatcherError::ExtractionFailure(_))));
    }

    #[test]
    fn test_pdf_rejects_garbage() {
        let result = PdfExtractor.extract_bytes(b"not a pdf document");
        assert!(matches!(result, Err(MatcherError::ExtractionFailure(_))));
    }

    #[test]
    fn test_markdown_to_text() {
        let md = "# Senior Engineer\n\n**Must have** Python, `SQL` and:\n\n- Docker\n- Kubernetes\n";
        let text = markdown_to_text(md);

        assert!(text.starts_with("Senior Engineer\n"));
        assert!(text.contains("Must have Python, SQL and:"));
        assert!(text.contains("Docker\nKubernetes"));
        assert!(!text.contains("**"));
        assert!(!text.contains('#'));
    }
}
