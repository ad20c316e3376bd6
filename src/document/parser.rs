use anyhow::{anyhow, Context, Result};
use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use encoding_rs::UTF_8;
use lopdf::Document as PdfDocument;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub content: String,
    pub metadata: ParsedMetadata,
}

#[derive(Debug, Clone)]
pub struct ParsedMetadata {
    pub file_type: String,
    pub pages: Option<usize>,
    pub char_count: usize,
}

pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["pdf", "docx", "txt"];

pub struct DocumentParser;

impl DocumentParser {
    /// Parse an uploaded file by extension. Only PDF, DOCX and plain text
    /// are accepted; anything else is an ingestion failure.
    pub fn parse(filename: &str, data: &[u8]) -> Result<ParsedDocument> {
        let extension = std::path::Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| anyhow!("No file extension on '{}'", filename))?
            .to_lowercase();

        debug!("Parsing file: {} (type: {})", filename, extension);

        let (content, metadata) = match extension.as_str() {
            "pdf" => Self::parse_pdf(data)?,
            "docx" => Self::parse_docx(data)?,
            "txt" => Self::parse_text(data)?,
            other => {
                return Err(anyhow!(
                    "Unsupported file type '{}', supported: {:?}",
                    other,
                    SUPPORTED_EXTENSIONS
                ))
            }
        };

        debug!("Parsed {} characters from {}", content.len(), filename);

        Ok(ParsedDocument { content, metadata })
    }

    fn parse_pdf(data: &[u8]) -> Result<(String, ParsedMetadata)> {
        let doc = PdfDocument::load_mem(data).context("Failed to load PDF")?;
        let pages = doc.get_pages();
        let page_count = pages.len();

        let mut content = String::new();
        for (page_num, _) in pages.iter() {
            match doc.extract_text(&[*page_num]) {
                Ok(text) => {
                    if !text.trim().is_empty() {
                        content.push_str(&format!("\n--- Page {} ---\n", page_num));
                        content.push_str(&text);
                        content.push('\n');
                    }
                }
                Err(e) => {
                    warn!("Failed to extract text from page {}: {}", page_num, e);
                }
            }
        }

        let metadata = ParsedMetadata {
            file_type: "application/pdf".to_string(),
            pages: Some(page_count),
            char_count: content.len(),
        };

        Ok((content.trim().to_string(), metadata))
    }

    fn parse_docx(data: &[u8]) -> Result<(String, ParsedMetadata)> {
        let docx = docx_rs::read_docx(data).context("Failed to load DOCX")?;

        let mut content = String::new();
        for child in &docx.document.children {
            if let DocumentChild::Paragraph(paragraph) = child {
                let mut line = String::new();
                for pc in &paragraph.children {
                    if let ParagraphChild::Run(run) = pc {
                        for rc in &run.children {
                            if let RunChild::Text(text) = rc {
                                line.push_str(&text.text);
                            }
                        }
                    }
                }
                if !line.trim().is_empty() {
                    content.push_str(line.trim());
                    content.push('\n');
                }
            }
        }

        let metadata = ParsedMetadata {
            file_type:
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
                    .to_string(),
            pages: None,
            char_count: content.len(),
        };

        Ok((content.trim().to_string(), metadata))
    }

    fn parse_text(data: &[u8]) -> Result<(String, ParsedMetadata)> {
        // UTF-8 fast path, lossy decode for anything else
        let content = match std::str::from_utf8(data) {
            Ok(text) => text.to_string(),
            Err(_) => {
                let (decoded, _, _) = UTF_8.decode(data);
                decoded.into_owned()
            }
        };

        let metadata = ParsedMetadata {
            file_type: "text/plain".to_string(),
            pages: None,
            char_count: content.len(),
        };

        Ok((content.trim().to_string(), metadata))
    }
}
