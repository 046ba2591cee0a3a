//! End-to-end extraction pipeline.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::acquire::{acquire_text, DocumentFormat};
use crate::error::Result;
use crate::models::config::PenyataConfig;
use crate::statement::{ExtractionResult, RuleStatementParser, StatementParser};

/// End-to-end pipeline from a source document to a finance record.
pub struct StatementPipeline {
    config: PenyataConfig,
    parser: RuleStatementParser,
}

impl StatementPipeline {
    /// Create a pipeline with default configuration.
    pub fn new() -> Self {
        Self::with_config(PenyataConfig::default())
    }

    /// Create a pipeline with the given configuration.
    pub fn with_config(config: PenyataConfig) -> Self {
        let parser = RuleStatementParser::new()
            .with_branch_name(config.extraction.branch_name.clone())
            .with_min_confidence(config.extraction.min_field_confidence);

        Self { config, parser }
    }

    /// Extract a finance record from a document on disk.
    pub fn extract_path(
        &self,
        path: &Path,
        format: DocumentFormat,
        month: u32,
        year: i32,
    ) -> Result<ExtractionResult> {
        info!("Extracting {} record from {}", format, path.display());

        let text = acquire_text(path, format, &self.config.acquire)?;
        debug!("Acquired {} characters of text", text.len());

        Ok(self.parser.parse(&text, month, year))
    }

    /// Extract a finance record from in-memory document bytes.
    ///
    /// The bytes are staged in a temporary file that is removed when
    /// this call returns, on success and failure alike.
    pub fn extract_bytes(
        &self,
        data: &[u8],
        format: DocumentFormat,
        month: u32,
        year: i32,
    ) -> Result<ExtractionResult> {
        let mut temp = NamedTempFile::new()?;
        temp.write_all(data)?;
        temp.flush()?;

        self.extract_path(temp.path(), format, month, year)
    }

    /// Parse statement text that has already been acquired.
    pub fn parse_text(&self, text: &str, month: u32, year: i32) -> ExtractionResult {
        self.parser.parse(text, month, year)
    }
}

impl Default for StatementPipeline {
    fn default() -> Self {
        Self::new()
    }
}
