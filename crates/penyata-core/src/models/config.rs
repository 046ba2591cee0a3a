//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the penyata pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PenyataConfig {
    /// Text acquisition configuration.
    pub acquire: AcquireConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,
}

impl Default for PenyataConfig {
    fn default() -> Self {
        Self {
            acquire: AcquireConfig::default(),
            extraction: ExtractionConfig::default(),
        }
    }
}

/// Text acquisition configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquireConfig {
    /// Path to a pdftotext-compatible utility.
    pub pdftotext_path: PathBuf,

    /// Preserve the physical page layout in the converted text.
    pub layout: bool,

    /// Maximum seconds to wait for the utility before killing it.
    pub timeout_secs: u64,

    /// Minimum characters of trimmed utility output to accept before
    /// falling back to the stream scraper.
    pub min_text_length: usize,
}

impl Default for AcquireConfig {
    fn default() -> Self {
        Self {
            pdftotext_path: PathBuf::from("pdftotext"),
            layout: true,
            timeout_secs: 10,
            min_text_length: 1,
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Branch name used in generated statement titles.
    pub branch_name: String,

    /// Minimum confidence to accept an extracted total.
    pub min_field_confidence: f32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            branch_name: "Cawangan".to_string(),
            min_field_confidence: 0.5,
        }
    }
}

impl PenyataConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
