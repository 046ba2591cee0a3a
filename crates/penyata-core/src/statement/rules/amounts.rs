//! Amount parsing and extraction for statement text.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{AMOUNT_EXACT, AMOUNT_PATTERN};
use super::{ExtractionMatch, FieldExtractor};

/// Amount field extractor.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for caps in AMOUNT_PATTERN.captures_iter(text) {
            if let Some(amount) = parse_amount(&caps[1]) {
                let token = caps.get(1).unwrap();
                results.push(
                    ExtractionMatch::new(amount, 0.8, token.as_str())
                        .with_position(token.start(), token.end()),
                );
            }
        }

        results
    }
}

/// Parse a statement-formatted amount (e.g., "2,335.00").
///
/// The token must use comma thousand grouping and exactly two decimal
/// places; anything else is rejected.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let trimmed = s.trim();
    if !AMOUNT_EXACT.is_match(trimmed) {
        return None;
    }
    Decimal::from_str(&trimmed.replace(',', "")).ok()
}

/// Format an amount in statement style (2,335.00).
pub fn format_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount);
    let (int_part, dec_part) = match s.split_once('.') {
        Some(parts) => parts,
        None => return s,
    };

    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let chars: Vec<char> = digits.chars().collect();
    let mut formatted = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(*c);
    }

    format!("{}{}.{}", sign, formatted, dec_part)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(
            parse_amount("2,335.00"),
            Some(Decimal::from_str("2335.00").unwrap())
        );
        assert_eq!(
            parse_amount("150.00"),
            Some(Decimal::from_str("150.00").unwrap())
        );
        assert_eq!(
            parse_amount("1,000,000.99"),
            Some(Decimal::from_str("1000000.99").unwrap())
        );
        assert_eq!(
            parse_amount(" 12.50 "),
            Some(Decimal::from_str("12.50").unwrap())
        );
    }

    #[test]
    fn test_parse_amount_rejects_malformed() {
        assert_eq!(parse_amount("2,33.00"), None);
        assert_eq!(parse_amount("2335.5"), None);
        assert_eq!(parse_amount("1234.00"), None);
        assert_eq!(parse_amount("12,34"), None);
        assert_eq!(parse_amount("banana"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn test_parse_amount_preserves_scale() {
        let amount = parse_amount("2,335.00").unwrap();
        assert_eq!(amount.to_string(), "2335.00");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(
            format_amount(Decimal::from_str("2335.00").unwrap()),
            "2,335.00"
        );
        assert_eq!(
            format_amount(Decimal::from_str("12345678.90").unwrap()),
            "12,345,678.90"
        );
        assert_eq!(format_amount(Decimal::from_str("0").unwrap()), "0.00");
        assert_eq!(
            format_amount(Decimal::from_str("-1500.5").unwrap()),
            "-1,500.50"
        );
    }

    #[test]
    fn test_extract_all_amounts() {
        let extractor = AmountExtractor::new();
        let text = "Yuran: 100.00, Jumlah: 1,234.56";

        let results = extractor.extract_all(text);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].value, Decimal::from_str("100.00").unwrap());
        assert_eq!(results[1].value, Decimal::from_str("1234.56").unwrap());
    }

    #[test]
    fn test_extract_skips_mid_number_starts() {
        let extractor = AmountExtractor::new();

        // A four-digit run without grouping is not statement format and
        // must not yield a partial match from its tail.
        let results = extractor.extract_all("ref 1234.00 then 2,000.00");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].value, Decimal::from_str("2000.00").unwrap());
    }
}
