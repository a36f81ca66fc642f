//! Format-specific extraction of raw document units.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::IngestError;
use crate::models::{PAGE_KEY, ROW_KEY, RawDocument, TOTAL_PAGES_KEY};
use crate::utils::file_extension;

/// Supported source formats. Adding a format means adding a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    /// `.txt`: the whole file as one UTF-8 unit
    Text,
    /// `.pdf`: one unit per page
    Pdf,
    /// `.csv`: one unit per data row
    Csv,
}

impl DocumentFormat {
    pub const ALL: [DocumentFormat; 3] =
        [DocumentFormat::Text, DocumentFormat::Pdf, DocumentFormat::Csv];

    /// Map an extension, with or without the leading dot, to a format.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.trim_start_matches('.').to_lowercase().as_str() {
            "txt" => Some(DocumentFormat::Text),
            "pdf" => Some(DocumentFormat::Pdf),
            "csv" => Some(DocumentFormat::Csv),
            _ => None,
        }
    }

    /// Resolve the format of `path` from its suffix.
    pub fn detect(path: &Path) -> Result<Self, IngestError> {
        let extension = file_extension(path);
        Self::from_extension(&extension).ok_or(IngestError::UnsupportedFormat {
            extension: if extension.is_empty() {
                extension
            } else {
                format!(".{}", extension)
            },
        })
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Text => "txt",
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Csv => "csv",
        }
    }

    /// Extract raw units from `path`. Every unit's metadata carries `source`.
    pub fn load(&self, path: &Path) -> Result<Vec<RawDocument>, IngestError> {
        if fs::metadata(path)?.len() == 0 {
            return Err(IngestError::decode(path, "file is empty"));
        }

        match self {
            DocumentFormat::Text => load_text(path),
            DocumentFormat::Pdf => load_pdf(path),
            DocumentFormat::Csv => load_csv(path),
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, ".{}", self.extension())
    }
}

fn source_of(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

fn load_text(path: &Path) -> Result<Vec<RawDocument>, IngestError> {
    info!("Loading text document from: {}", path.display());

    let bytes = fs::read(path)?;
    let text = String::from_utf8(bytes).map_err(|e| IngestError::decode(path, e))?;

    info!("Loaded 1 document from text file: {}", path.display());
    Ok(vec![RawDocument::new(text, source_of(path))])
}

fn load_pdf(path: &Path) -> Result<Vec<RawDocument>, IngestError> {
    info!("Loading PDF document from: {}", path.display());

    let document = lopdf::Document::load(path).map_err(|e| IngestError::decode(path, e))?;
    if document.trailer.get(b"Encrypt").is_ok() {
        return Err(IngestError::decode(path, "PDF is encrypted"));
    }

    let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
    let units = page_units(path, &page_numbers, |page| document.extract_text(&[page]))?;

    info!("Loaded {} pages from PDF: {}", units.len(), path.display());
    Ok(units)
}

/// One unit per page. A page whose text cannot be extracted becomes an empty
/// unit so page numbering stays intact; the document fails only when no page
/// yields text.
fn page_units<E, F>(
    path: &Path,
    page_numbers: &[u32],
    extract: F,
) -> Result<Vec<RawDocument>, IngestError>
where
    E: std::fmt::Display,
    F: Fn(u32) -> Result<String, E>,
{
    let total_pages = page_numbers.len();
    let source = source_of(path);

    let mut units = Vec::with_capacity(total_pages);
    let mut last_error = None;
    let mut failed = 0usize;
    for (index, &page_number) in page_numbers.iter().enumerate() {
        let text = match extract(page_number) {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    "Skipping text of page {} in {}: {}",
                    page_number,
                    path.display(),
                    e
                );
                failed += 1;
                last_error = Some(format!("page {}: {}", page_number, e));
                String::new()
            }
        };

        units.push(
            RawDocument::new(text, source.clone())
                .with_metadata(PAGE_KEY, index)
                .with_metadata(TOTAL_PAGES_KEY, total_pages),
        );
    }

    if total_pages > 0 && failed == total_pages {
        let reason = last_error.unwrap_or_else(|| "no extractable pages".to_string());
        return Err(IngestError::decode(path, reason));
    }

    Ok(units)
}

fn load_csv(path: &Path) -> Result<Vec<RawDocument>, IngestError> {
    info!("Loading CSV document from: {}", path.display());

    let mut reader = csv::ReaderBuilder::new()
        .from_path(path)
        .map_err(|e| IngestError::decode(path, e))?;
    let headers = reader
        .headers()
        .map_err(|e| IngestError::decode(path, e))?
        .clone();
    let source = source_of(path);

    let mut units = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| IngestError::decode(path, e))?;
        let text = headers
            .iter()
            .zip(record.iter())
            .map(|(key, value)| format!("{}: {}", key.trim(), value.trim()))
            .collect::<Vec<_>>()
            .join("\n");

        units.push(RawDocument::new(text, source.clone()).with_metadata(ROW_KEY, row));
    }

    info!("Loaded {} documents from CSV file: {}", units.len(), path.display());
    Ok(units)
}
