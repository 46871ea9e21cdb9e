use std::path::{Path, PathBuf};
use thiserror::Error;

use extrato_core::ExtractedStatement;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Text extraction failed for {file}: {reason}")]
    Extraction { file: String, reason: String },
}

/// File name used as the statement id.
pub fn file_id(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Abstraction over whatever turns a statement file into plain text.
pub trait StatementSource {
    fn extract_text(&self, path: &Path) -> Result<String, SourceError>;

    fn load(&self, path: &Path) -> Result<ExtractedStatement, SourceError> {
        let text = self.extract_text(path)?;
        Ok(ExtractedStatement::from_text(file_id(path), &text))
    }
}

// ── Plain text (already extracted) ────────────────────────────────────────────

/// Reads statement text that was extracted ahead of time. Invalid UTF-8 is
/// replaced rather than rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFileSource;

impl StatementSource for TextFileSource {
    fn extract_text(&self, path: &Path) -> Result<String, SourceError> {
        let bytes = std::fs::read(path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

// ── PDF (optional, gated behind `pdf` feature) ────────────────────────────────

#[cfg(feature = "pdf")]
pub mod pdf_backend {
    use super::{file_id, SourceError, StatementSource};
    use std::path::Path;

    #[derive(Debug, Clone, Copy, Default)]
    pub struct PdfTextSource;

    impl StatementSource for PdfTextSource {
        fn extract_text(&self, path: &Path) -> Result<String, SourceError> {
            pdf_extract::extract_text(path).map_err(|e| SourceError::Extraction {
                file: file_id(path),
                reason: e.to_string(),
            })
        }
    }
}

#[cfg(feature = "pdf")]
pub use pdf_backend::PdfTextSource;

// ── Directory loading ─────────────────────────────────────────────────────────

/// Files in `dir` with the given extension (case-insensitive), sorted by name.
pub fn list_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, SourceError> {
    let wanted = extension.trim_start_matches('.').to_lowercase();
    let mut files = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.to_lowercase() == wanted);
        if path.is_file() && matches {
            files.push(path);
        }
    }

    files.sort();
    tracing::info!(dir = %dir.display(), count = files.len(), "Statement files found");
    Ok(files)
}

/// Loads every matching file in `dir`. A file that cannot be read becomes a
/// failed statement record; only an unreadable directory is an error.
pub fn load_directory(
    dir: &Path,
    source: &dyn StatementSource,
    extension: &str,
) -> Result<Vec<ExtractedStatement>, SourceError> {
    let files = list_files(dir, extension)?;
    let mut docs = Vec::with_capacity(files.len());

    for path in &files {
        match source.load(path) {
            Ok(doc) => docs.push(doc),
            Err(e) => {
                tracing::warn!(
                    file = %path.display(),
                    error = %e,
                    "Failed to extract statement text"
                );
                docs.push(ExtractedStatement::failed(file_id(path), e.to_string()));
            }
        }
    }

    let loaded = docs.iter().filter(|d| d.is_success()).count();
    tracing::info!(loaded, total = docs.len(), "Statements loaded");
    Ok(docs)
}
