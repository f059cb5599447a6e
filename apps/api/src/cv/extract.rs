//! Text extraction from an uploaded CV, chosen by file extension.
//!
//! Extraction never fails the upload. Every extractor error, panic or
//! timeout becomes `Extraction::Failed` with the reason attached, and the
//! pipeline carries on with no text.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

/// Upper bound on waiting for an extractor. The blocking thread is not
/// cancelled when this fires; it runs to completion in the background.
const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Word,
    PlainText,
}

impl FileKind {
    /// `.pdf` → Pdf, `.docx`/`.doc` → Word, anything else → PlainText.
    /// The extension is compared case-insensitively.
    pub fn from_filename(filename: &str) -> Self {
        match extension(filename).as_deref() {
            Some("pdf") => FileKind::Pdf,
            Some("docx") | Some("doc") => FileKind::Word,
            _ => FileKind::PlainText,
        }
    }
}

/// MIME type the original file is stored under.
pub fn content_type_for(filename: &str) -> &'static str {
    match extension(filename).as_deref() {
        Some("pdf") => "application/pdf",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("doc") => "application/msword",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

fn extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Outcome of text extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Extracted(String),
    Failed { reason: String },
}

impl Extraction {
    /// The extracted text, or `""` when extraction failed.
    pub fn text(&self) -> &str {
        match self {
            Extraction::Extracted(text) => text,
            Extraction::Failed { .. } => "",
        }
    }
}

#[derive(Debug, Error)]
enum ExtractError {
    #[error("failed to read spooled file: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("Word extraction failed: {0}")]
    Word(String),
}

/// Extracts text from the spooled upload at `path` on the blocking pool.
#[tracing::instrument(skip(path))]
pub async fn extract_text(path: PathBuf, kind: FileKind) -> Extraction {
    let task = tokio::task::spawn_blocking(move || extract_blocking(&path, kind));

    let extraction = match tokio::time::timeout(EXTRACTION_TIMEOUT, task).await {
        Ok(Ok(Ok(text))) => Extraction::Extracted(text),
        Ok(Ok(Err(e))) => Extraction::Failed {
            reason: e.to_string(),
        },
        // pdf-extract panics on some malformed documents
        Ok(Err(join_error)) => Extraction::Failed {
            reason: format!("extractor aborted: {join_error}"),
        },
        Err(_) => Extraction::Failed {
            reason: "extraction timed out".to_string(),
        },
    };

    match &extraction {
        Extraction::Extracted(text) => {
            tracing::info!(characters = text.chars().count(), "CV text extracted")
        }
        Extraction::Failed { reason } => {
            tracing::warn!(%reason, "CV text extraction failed, continuing with no text")
        }
    }

    extraction
}

fn extract_blocking(path: &Path, kind: FileKind) -> Result<String, ExtractError> {
    match kind {
        FileKind::Pdf => pdf_extract::extract_text(path).map_err(|e| ExtractError::Pdf(e.to_string())),
        FileKind::Word => {
            let data = std::fs::read(path)?;
            extract_docx(&data)
        }
        FileKind::PlainText => {
            let data = std::fs::read(path)?;
            Ok(decode_discarding_invalid(&data))
        }
    }
}

/// Paragraph text from a DOCX body, one line per paragraph.
/// Legacy binary `.doc` files are rejected by the reader.
fn extract_docx(data: &[u8]) -> Result<String, ExtractError> {
    use docx_rs::{DocumentChild, ParagraphChild, RunChild};

    let docx = docx_rs::read_docx(data).map_err(|e| ExtractError::Word(e.to_string()))?;

    let mut text = String::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            for paragraph_child in &paragraph.children {
                if let ParagraphChild::Run(run) = paragraph_child {
                    for run_child in &run.children {
                        if let RunChild::Text(t) = run_child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            text.push('\n');
        }
    }
    Ok(text)
}

/// UTF-8 decode that drops undecodable byte sequences instead of
/// substituting replacement characters.
fn decode_discarding_invalid(mut bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    loop {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                out.push_str(valid);
                return out;
            }
            Err(e) => {
                let (valid, rest) = bytes.split_at(e.valid_up_to());
                out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                let skip = e.error_len().unwrap_or(rest.len());
                bytes = &rest[skip..];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn spool(data: &[u8], suffix: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(data).unwrap();
        file.flush().unwrap();
        file
    }

    fn docx_bytes(lines: &[&str]) -> Vec<u8> {
        use docx_rs::{Docx, Paragraph, Run};

        let mut docx = Docx::new();
        for line in lines {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*line)));
        }
        let mut cursor = Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).unwrap();
        cursor.into_inner()
    }

    #[test]
    fn test_file_kind_from_extension() {
        assert_eq!(FileKind::from_filename("cv.pdf"), FileKind::Pdf);
        assert_eq!(FileKind::from_filename("CV.PDF"), FileKind::Pdf);
        assert_eq!(FileKind::from_filename("resume.docx"), FileKind::Word);
        assert_eq!(FileKind::from_filename("resume.Doc"), FileKind::Word);
        assert_eq!(FileKind::from_filename("notes.txt"), FileKind::PlainText);
        assert_eq!(FileKind::from_filename("README"), FileKind::PlainText);
        assert_eq!(FileKind::from_filename("archive.pdf.zip"), FileKind::PlainText);
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("a.PDF"), "application/pdf");
        assert_eq!(content_type_for("a.doc"), "application/msword");
        assert_eq!(content_type_for("a.txt"), "text/plain");
        assert_eq!(content_type_for("a"), "application/octet-stream");
    }

    #[test]
    fn test_decode_drops_invalid_sequences() {
        let bytes = b"Py\xffthon \xc3\xa9t\xe2\x82 Docker\xc3";
        assert_eq!(decode_discarding_invalid(bytes), "Python ét Docker");
    }

    #[test]
    fn test_decode_passes_valid_utf8_through() {
        assert_eq!(decode_discarding_invalid("Zürich, C++".as_bytes()), "Zürich, C++");
    }

    #[test]
    fn test_extraction_text_is_empty_on_failure() {
        let failed = Extraction::Failed {
            reason: "boom".to_string(),
        };
        assert_eq!(failed.text(), "");
        assert_eq!(Extraction::Extracted("sql".to_string()).text(), "sql");
    }

    #[tokio::test]
    async fn test_plain_text_extraction() {
        let file = spool(b"Flask and \xfeReact", ".txt");
        let extraction = extract_text(file.path().to_path_buf(), FileKind::PlainText).await;
        assert_eq!(extraction, Extraction::Extracted("Flask and React".to_string()));
    }

    #[tokio::test]
    async fn test_docx_extraction_reads_paragraphs() {
        let file = spool(&docx_bytes(&["Kubernetes and Docker", "Python"]), ".docx");
        let extraction = extract_text(file.path().to_path_buf(), FileKind::Word).await;
        let text = extraction.text();
        assert!(text.contains("Kubernetes and Docker"), "got {text:?}");
        assert!(text.contains("Python"), "got {text:?}");
    }

    #[tokio::test]
    async fn test_corrupt_pdf_degrades_to_failed() {
        let file = spool(b"%PDF-1.4 definitely not a pdf body", ".pdf");
        let extraction = extract_text(file.path().to_path_buf(), FileKind::Pdf).await;
        assert!(matches!(extraction, Extraction::Failed { .. }));
        assert_eq!(extraction.text(), "");
    }

    #[tokio::test]
    async fn test_legacy_doc_degrades_to_failed() {
        let file = spool(b"\xd0\xcf\x11\xe0\xa1\xb1\x1a\xe1 binary word", ".doc");
        let extraction = extract_text(file.path().to_path_buf(), FileKind::Word).await;
        match extraction {
            Extraction::Failed { reason } => assert!(reason.contains("Word")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_file_degrades_to_failed() {
        let path = std::env::temp_dir().join(format!("missing-{}.txt", uuid::Uuid::new_v4()));
        let extraction = extract_text(path, FileKind::PlainText).await;
        assert!(matches!(extraction, Extraction::Failed { .. }));
    }
}
