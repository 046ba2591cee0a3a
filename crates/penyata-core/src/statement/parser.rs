//! Rule-based statement parser.

use std::time::Instant;

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::models::record::*;

use super::rules::{
    items::extract_line_items, months::month_name, totals::extract_totals, ExtractionMatch,
};

/// Result of statement extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted finance record.
    pub record: FinanceRecord,
    /// Raw statement text the record was extracted from.
    pub raw_text: String,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for statement parsing.
///
/// Parsing never fails: text with no recognizable fields yields a
/// zeroed record plus warnings describing what was missing.
pub trait StatementParser {
    /// Parse a finance record from statement text.
    fn parse(&self, text: &str, month: u32, year: i32) -> ExtractionResult;
}

/// Rule-based statement parser.
pub struct RuleStatementParser {
    /// Branch name used in the record title.
    branch_name: String,
    /// Minimum confidence for accepting fields.
    min_confidence: f32,
}

impl RuleStatementParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self {
            branch_name: "Cawangan".to_string(),
            min_confidence: 0.5,
        }
    }

    /// Set the branch name used in record titles.
    pub fn with_branch_name(mut self, name: impl Into<String>) -> Self {
        self.branch_name = name.into();
        self
    }

    /// Set minimum confidence threshold.
    pub fn with_min_confidence(mut self, confidence: f32) -> Self {
        self.min_confidence = confidence;
        self
    }

    fn build_title(&self, month: u32, year: i32) -> String {
        format!(
            "Penyata Kewangan {} {} {}",
            self.branch_name,
            month_name(month),
            year
        )
    }

    fn accept(
        &self,
        m: Option<ExtractionMatch<Decimal>>,
        field: &str,
        warnings: &mut Vec<String>,
    ) -> Option<Decimal> {
        match m {
            Some(m) if m.confidence >= self.min_confidence => Some(m.value),
            Some(m) => {
                warnings.push(format!(
                    "Discarded low-confidence {} match ({:.2})",
                    field, m.confidence
                ));
                None
            }
            None => None,
        }
    }
}

impl Default for RuleStatementParser {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementParser for RuleStatementParser {
    fn parse(&self, text: &str, month: u32, year: i32) -> ExtractionResult {
        let start = Instant::now();
        let mut warnings = Vec::new();

        info!("Parsing statement from {} characters of text", text.len());

        let totals = extract_totals(text);

        let income_total = match self.accept(totals.income, "income total", &mut warnings) {
            Some(value) => value,
            None => {
                warnings.push("Could not extract income total".to_string());
                Decimal::ZERO
            }
        };

        let expense_total = match self.accept(totals.expense, "expense total", &mut warnings) {
            Some(value) => value,
            None => {
                warnings.push("Could not extract expense total".to_string());
                Decimal::ZERO
            }
        };

        // A statement without a printed closing balance still gets one,
        // derived from the totals already extracted.
        let closing_balance = match self.accept(totals.closing, "closing balance", &mut warnings) {
            Some(value) => value,
            None => {
                warnings.push(
                    "Closing balance not found, computed from income and expense totals"
                        .to_string(),
                );
                income_total - expense_total
            }
        };

        // Secondary balances default to zero without a warning; many
        // statements simply do not print them.
        let cash_on_hand = self
            .accept(totals.cash_on_hand, "cash on hand", &mut warnings)
            .unwrap_or(Decimal::ZERO);
        let bank_balance = self
            .accept(totals.bank_balance, "bank balance", &mut warnings)
            .unwrap_or(Decimal::ZERO);

        let (income_items, expense_items) = extract_line_items(text);

        for item in income_items.iter().chain(expense_items.iter()) {
            if item.parsed_date().is_none() {
                warnings.push(format!(
                    "Line item date '{}' is not a valid calendar date",
                    item.date
                ));
            }
        }

        let record = FinanceRecord {
            title: self.build_title(month, year),
            month,
            year,
            income_total,
            expense_total,
            closing_balance,
            details: RecordDetails {
                income_items,
                expense_items,
                summary: FinancialSummary {
                    income_total,
                    expense_total,
                    cash_on_hand,
                    bank_balance,
                    closing_balance,
                },
            },
        };

        warnings.extend(record.validate());

        debug!(
            "Extracted record '{}' with {} warnings",
            record.title,
            warnings.len()
        );

        ExtractionResult {
            record,
            raw_text: text.to_string(),
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    const FULL_STATEMENT: &str = "PARTI CONTOH MALAYSIA\n\
        CAWANGAN SERI MELATI\n\
        WANG MASUK\n\
        01.07.2025 Baki bulan lepas 1,335.00\n\
        05.07.2025 Sumbangan ahli 1,000.00\n\
        JUMLAH KESELURUHAN 2,335.00\n\
        WANG KELUAR\n\
        03.07.2025 Sewa dewan 200.00\n\
        JUMLAH KESELURUHAN 200.00\n\
        WANG TUNAI DI TANGAN 135.00\n\
        WANG DI DALAM BANK 2,000.00\n\
        BAKI AKHIR 2,135.00";

    #[test]
    fn test_empty_text_yields_zeroed_record() {
        let parser = RuleStatementParser::new();
        let result = parser.parse("", 7, 2025);

        assert_eq!(result.record.income_total, Decimal::ZERO);
        assert_eq!(result.record.expense_total, Decimal::ZERO);
        assert_eq!(result.record.closing_balance, Decimal::ZERO);
        assert!(result.record.details.income_items.is_empty());
        assert!(result.record.details.expense_items.is_empty());
        assert_eq!(result.record.title, "Penyata Kewangan Cawangan Julai 2025");
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("income total")));
        assert_eq!(result.raw_text, "");
    }

    #[test]
    fn test_full_statement() {
        let parser = RuleStatementParser::new().with_branch_name("Cawangan Seri Melati");
        let result = parser.parse(FULL_STATEMENT, 7, 2025);
        let record = &result.record;

        assert_eq!(record.title, "Penyata Kewangan Cawangan Seri Melati Julai 2025");
        assert_eq!(record.income_total, dec("2335.00"));
        assert_eq!(record.expense_total, dec("200.00"));
        assert_eq!(record.closing_balance, dec("2135.00"));

        let summary = &record.details.summary;
        assert_eq!(summary.cash_on_hand, dec("135.00"));
        assert_eq!(summary.bank_balance, dec("2000.00"));
        assert_eq!(summary.income_total, record.income_total);
        assert_eq!(summary.closing_balance, record.closing_balance);

        let income = &record.details.income_items;
        assert_eq!(income.len(), 2);
        assert_eq!(income[0].date, "01.07.2025");
        assert_eq!(income[0].description, "Baki bulan lepas");
        assert_eq!(income[0].amount, dec("1335.00"));
        assert_eq!(income[1].description, "Sumbangan ahli");

        let expense = &record.details.expense_items;
        assert_eq!(expense.len(), 1);
        assert_eq!(expense[0].description, "Sewa dewan");

        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    }

    #[test]
    fn test_labeled_income_total_is_exact() {
        let parser = RuleStatementParser::new();
        let text = "WANG MASUK\nderma 2,335.00\nJUMLAH KESELURUHAN 2,335.00";

        let result = parser.parse(text, 7, 2025);
        assert_eq!(result.record.income_total, dec("2335.00"));
        assert_eq!(result.record.income_total.to_string(), "2335.00");
    }

    #[test]
    fn test_closing_computed_from_totals() {
        let parser = RuleStatementParser::new();
        let text = "WANG MASUK\nJUMLAH KESELURUHAN 500.00\n\
                    WANG KELUAR\nJUMLAH KESELURUHAN 200.00";

        let result = parser.parse(text, 7, 2025);
        assert_eq!(result.record.closing_balance, dec("300.00"));
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("Closing balance not found")));
    }

    #[test]
    fn test_printed_closing_balance_wins() {
        let parser = RuleStatementParser::new();
        let text = "WANG MASUK\nJUMLAH KESELURUHAN 500.00\n\
                    WANG KELUAR\nJUMLAH KESELURUHAN 200.00\n\
                    BAKI AKHIR 350.00";

        let result = parser.parse(text, 7, 2025);
        assert_eq!(result.record.closing_balance, dec("350.00"));
    }

    #[test]
    fn test_reruns_are_identical() {
        let parser = RuleStatementParser::new();

        let first = parser.parse(FULL_STATEMENT, 7, 2025);
        let second = parser.parse(FULL_STATEMENT, 7, 2025);

        assert_eq!(
            serde_json::to_string(&first.record).unwrap(),
            serde_json::to_string(&second.record).unwrap()
        );
    }

    #[test]
    fn test_unknown_month_gets_placeholder() {
        let parser = RuleStatementParser::new();
        let result = parser.parse("", 13, 2025);

        assert_eq!(result.record.title, "Penyata Kewangan Cawangan - 2025");
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("Month 13 is out of range")));
    }

    #[test]
    fn test_low_confidence_match_discarded() {
        let parser = RuleStatementParser::new().with_min_confidence(0.9);
        // No grand total keyword, so only the loose fallback can fire.
        let text = "WANG MASUK\nSumbangan 150.00";

        let result = parser.parse(text, 7, 2025);
        assert_eq!(result.record.income_total, Decimal::ZERO);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("low-confidence income total")));
    }

    #[test]
    fn test_loose_fallback_accepted_at_default_threshold() {
        let parser = RuleStatementParser::new();
        let text = "WANG MASUK\nSumbangan 150.00";

        let result = parser.parse(text, 7, 2025);
        assert_eq!(result.record.income_total, dec("150.00"));
    }

    #[test]
    fn test_invalid_item_date_is_flagged() {
        let parser = RuleStatementParser::new();
        let text = "WANG MASUK\n31.02.2025 Derma 100.00\nJUMLAH KESELURUHAN 100.00";

        let result = parser.parse(text, 2, 2025);
        assert_eq!(result.record.details.income_items.len(), 1);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("31.02.2025")));
    }
}
