//! Line item extraction for statement sections.

use crate::models::record::LineItem;

use super::amounts::parse_amount;
use super::patterns::{EXPENSE_SECTION, INCOME_SECTION, LINE_ITEM};
use super::FieldExtractor;

/// Extractor for dated line items (date, description, amount).
pub struct LineItemExtractor;

impl LineItemExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LineItemExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for LineItemExtractor {
    type Output = LineItem;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    /// Items are returned in the order they appear in the text.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        LINE_ITEM
            .captures_iter(text)
            .filter_map(|caps| {
                let amount = parse_amount(&caps[3])?;
                Some(LineItem {
                    date: caps[1].to_string(),
                    description: caps[2].trim().to_string(),
                    amount,
                })
            })
            .collect()
    }
}

/// Extract the income and expense line items from statement text.
///
/// Each list is scanned only within its own section sub-text, so an
/// income entry can never leak into the expense list or vice versa.
pub fn extract_line_items(text: &str) -> (Vec<LineItem>, Vec<LineItem>) {
    let extractor = LineItemExtractor::new();

    let income = section_body(&INCOME_SECTION, text)
        .map(|body| extractor.extract_all(body))
        .unwrap_or_default();
    let expense = section_body(&EXPENSE_SECTION, text)
        .map(|body| extractor.extract_all(body))
        .unwrap_or_default();

    (income, expense)
}

fn section_body<'a>(pattern: &regex::Regex, text: &'a str) -> Option<&'a str> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_extract_items_in_order() {
        let extractor = LineItemExtractor::new();
        let text = "01.07.2025 Baki bulan lepas 1,335.00\n05.07.2025 Sumbangan ahli 1,000.00";

        let items = extractor.extract_all(text);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].date, "01.07.2025");
        assert_eq!(items[0].description, "Baki bulan lepas");
        assert_eq!(items[0].amount, dec("1335.00"));
        assert_eq!(items[1].date, "05.07.2025");
        assert_eq!(items[1].description, "Sumbangan ahli");
        assert_eq!(items[1].amount, dec("1000.00"));
    }

    #[test]
    fn test_description_is_trimmed() {
        let extractor = LineItemExtractor::new();

        let items = extractor.extract_all("03.07.2025   Sewa dewan   200.00");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].description, "Sewa dewan");
    }

    #[test]
    fn test_undated_lines_are_skipped() {
        let extractor = LineItemExtractor::new();
        let text = "Sumbangan am 500.00\n05.07.2025 Derma 100.00";

        let items = extractor.extract_all(text);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].description, "Derma");
    }

    #[test]
    fn test_no_items_in_empty_text() {
        let extractor = LineItemExtractor::new();
        assert!(extractor.extract_all("").is_empty());
    }

    #[test]
    fn test_items_split_by_section() {
        let text = "WANG MASUK\n\
                    01.07.2025 Baki bulan lepas 1,335.00\n\
                    05.07.2025 Sumbangan ahli 1,000.00\n\
                    JUMLAH KESELURUHAN 2,335.00\n\
                    WANG KELUAR\n\
                    03.07.2025 Sewa dewan 200.00\n\
                    JUMLAH KESELURUHAN 200.00";

        let (income, expense) = extract_line_items(text);
        assert_eq!(income.len(), 2);
        assert_eq!(income[0].description, "Baki bulan lepas");
        assert_eq!(income[1].description, "Sumbangan ahli");
        assert_eq!(expense.len(), 1);
        assert_eq!(expense[0].description, "Sewa dewan");
        assert_eq!(expense[0].amount, dec("200.00"));
    }

    #[test]
    fn test_section_without_total_keyword_runs_to_next_anchor() {
        let text = "WANG MASUK\n\
                    02.07.2025 Kutipan derma 300.00\n\
                    WANG KELUAR\n\
                    04.07.2025 Alat tulis 45.00";

        let (income, expense) = extract_line_items(text);
        assert_eq!(income.len(), 1);
        assert_eq!(income[0].description, "Kutipan derma");
        assert_eq!(expense.len(), 1);
        assert_eq!(expense[0].description, "Alat tulis");
    }

    #[test]
    fn test_missing_sections_yield_empty_lists() {
        let (income, expense) = extract_line_items("Laporan aktiviti bulanan");
        assert!(income.is_empty());
        assert!(expense.is_empty());
    }
}
