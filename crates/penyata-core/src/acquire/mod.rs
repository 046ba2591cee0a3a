//! Text acquisition from source documents.

mod pdftotext;
mod scraper;

pub use pdftotext::PdftotextAcquirer;
pub use scraper::StreamScraper;

use std::fmt;
use std::path::Path;

use tracing::warn;

use crate::error::AcquireError;
use crate::models::config::AcquireConfig;

/// Result type for acquisition operations.
pub type Result<T> = std::result::Result<T, AcquireError>;

/// Format of a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Xlsx,
    Xls,
}

impl DocumentFormat {
    /// Determine the format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "xlsx" => Some(Self::Xlsx),
            "xls" => Some(Self::Xls),
            _ => None,
        }
    }

    /// Determine the format from a file path.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pdf => "pdf",
            Self::Xlsx => "xlsx",
            Self::Xls => "xls",
        };
        write!(f, "{}", name)
    }
}

/// Trait for text acquisition strategies.
pub trait TextAcquirer {
    /// Acquire plain text from the document at `path`.
    fn acquire(&self, path: &Path) -> Result<String>;
}

/// Acquire text from a document using the strategy for its format.
///
/// PDF documents are converted with the external tool first; when the
/// tool fails, times out, or produces nothing, the raw stream scraper
/// runs instead. Spreadsheet formats have no acquisition strategy and
/// always report an error, so a caller can tell an unsupported
/// document apart from an empty one.
pub fn acquire_text(path: &Path, format: DocumentFormat, config: &AcquireConfig) -> Result<String> {
    match format {
        DocumentFormat::Pdf => match PdftotextAcquirer::new(config).acquire(path) {
            Ok(text) => Ok(text),
            Err(err) => {
                warn!("pdftotext failed ({}), falling back to stream scraper", err);
                StreamScraper::new().acquire(path)
            }
        },
        DocumentFormat::Xlsx | DocumentFormat::Xls => {
            Err(AcquireError::UnsupportedFormat(format.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DocumentFormat::from_extension("pdf"), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_extension(".PDF"), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_extension("Xlsx"), Some(DocumentFormat::Xlsx));
        assert_eq!(DocumentFormat::from_extension("xls"), Some(DocumentFormat::Xls));
        assert_eq!(DocumentFormat::from_extension("docx"), None);
        assert_eq!(DocumentFormat::from_extension(""), None);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("reports/julai.pdf")),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(DocumentFormat::from_path(Path::new("penyata")), None);
    }

    #[test]
    fn test_spreadsheets_have_no_strategy() {
        let config = AcquireConfig::default();

        let err = acquire_text(Path::new("penyata.xlsx"), DocumentFormat::Xlsx, &config)
            .unwrap_err();
        assert!(matches!(err, AcquireError::UnsupportedFormat(ref f) if f == "xlsx"));

        let err = acquire_text(Path::new("penyata.xls"), DocumentFormat::Xls, &config)
            .unwrap_err();
        assert!(matches!(err, AcquireError::UnsupportedFormat(ref f) if f == "xls"));
    }
}
