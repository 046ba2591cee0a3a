//! Section total extraction for statement text.
//!
//! Income and expense totals are first looked up next to their grand
//! total label. When the label is absent the first amount after the
//! section anchor is taken instead, at reduced confidence, so a
//! statement with an unusual layout still yields a figure rather than
//! a zero.

use rust_decimal::Decimal;

use super::amounts::{parse_amount, AmountExtractor};
use super::patterns::{
    BANK_BALANCE, CASH_ON_HAND, CLOSING_BALANCE, EXPENSE_ANCHOR, EXPENSE_TOTAL, INCOME_ANCHOR,
    INCOME_TOTAL,
};
use super::{ExtractionMatch, FieldExtractor};

/// Totals pulled from a single statement.
///
/// Every field is optional; absence means the text carried no usable
/// figure, not that the figure was zero.
#[derive(Debug, Clone)]
pub struct StatementTotals {
    pub income: Option<ExtractionMatch<Decimal>>,
    pub expense: Option<ExtractionMatch<Decimal>>,
    pub closing: Option<ExtractionMatch<Decimal>>,
    pub cash_on_hand: Option<ExtractionMatch<Decimal>>,
    pub bank_balance: Option<ExtractionMatch<Decimal>>,
}

/// Extract all statement totals from text.
pub fn extract_totals(text: &str) -> StatementTotals {
    StatementTotals {
        income: labeled_amount(text, &INCOME_TOTAL, 0.95)
            .or_else(|| anchored_amount(text, &INCOME_ANCHOR, 0.7)),
        expense: labeled_amount(text, &EXPENSE_TOTAL, 0.95)
            .or_else(|| anchored_amount(text, &EXPENSE_ANCHOR, 0.7)),
        closing: labeled_amount(text, &CLOSING_BALANCE, 0.9),
        cash_on_hand: labeled_amount(text, &CASH_ON_HAND, 0.9),
        bank_balance: labeled_amount(text, &BANK_BALANCE, 0.9),
    }
}

fn labeled_amount(
    text: &str,
    pattern: &regex::Regex,
    confidence: f32,
) -> Option<ExtractionMatch<Decimal>> {
    let caps = pattern.captures(text)?;
    let token = caps.get(1)?;
    let amount = parse_amount(token.as_str())?;

    Some(
        ExtractionMatch::new(amount, confidence, token.as_str())
            .with_position(token.start(), token.end()),
    )
}

/// First amount anywhere after a bare section anchor, at the caller's
/// confidence. Positions are reported relative to the full text.
fn anchored_amount(
    text: &str,
    anchor: &regex::Regex,
    confidence: f32,
) -> Option<ExtractionMatch<Decimal>> {
    let anchor_match = anchor.find(text)?;
    let found = AmountExtractor::new().extract(&text[anchor_match.end()..])?;

    let position = found
        .position
        .map(|(start, end)| (anchor_match.end() + start, anchor_match.end() + end));

    Some(ExtractionMatch {
        confidence,
        position,
        ..found
    })
}
