use std::path::{Path, PathBuf};

use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to extract text from PDF: {0}")]
    Pdf(String),
}

/// Where a CV comes from.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    PdfPath(PathBuf),
    PdfBytes(Bytes),
    Text(String),
}

impl DocumentSource {
    /// Interprets a CLI argument: an existing `*.pdf` file is read as a PDF,
    /// anything else is taken as literal CV text.
    pub fn from_arg(input: &str) -> Self {
        let path = Path::new(input);
        if path.is_file() && has_pdf_extension(path) {
            DocumentSource::PdfPath(path.to_path_buf())
        } else {
            DocumentSource::Text(input.to_string())
        }
    }

    pub fn describe(&self) -> String {
        match self {
            DocumentSource::PdfPath(p) => format!("PDF file {}", p.display()),
            DocumentSource::PdfBytes(b) => format!("uploaded PDF ({} bytes)", b.len()),
            DocumentSource::Text(t) => format!("raw text ({} chars)", t.chars().count()),
        }
    }

    /// Returns the raw, un-normalized text of the document.
    pub fn extract_text(&self) -> Result<String, ExtractError> {
        match self {
            DocumentSource::Text(text) => Ok(text.clone()),
            DocumentSource::PdfPath(path) => {
                info!("Extracting text from PDF: {}", path.display());
                let bytes = std::fs::read(path).map_err(|source| ExtractError::Io {
                    path: path.clone(),
                    source,
                })?;
                extract_pdf_text(&bytes)
            }
            DocumentSource::PdfBytes(bytes) => extract_pdf_text(bytes),
        }
    }
}

fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Thin wrapper over `pdf-extract`; pages come back newline-separated.
fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let text =
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))?;
    debug!("pdf-extract returned {} chars", text.len());
    Ok(text)
}
