//! Core library for branch finance statement extraction.
//!
//! This crate provides:
//! - Text acquisition from statement documents (pdftotext with a raw
//!   stream-scraping fallback)
//! - Rule-based field extraction for Malay-language statements
//!   (section totals, balances, dated line items)
//! - Finance record models with the legacy JSON field names

pub mod acquire;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod statement;

pub use acquire::{acquire_text, DocumentFormat, PdftotextAcquirer, StreamScraper, TextAcquirer};
pub use error::{AcquireError, PenyataError, Result};
pub use models::config::PenyataConfig;
pub use models::record::{FinanceRecord, FinancialSummary, LineItem, RecordDetails};
pub use pipeline::StatementPipeline;
pub use statement::{ExtractionResult, RuleStatementParser, StatementParser};
