//! Common regex patterns for statement field extraction.
//!
//! Statements are Malay-language monthly branch reports converted to
//! flat text, so every keyworded pattern is case-insensitive and
//! dot-all: converted text breaks lines unpredictably and a section
//! heading can sit several lines above its amount.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Statement amounts (format: 2,335.00). The leading guard keeps a
    // scan from starting in the middle of a longer digit run.
    pub static ref AMOUNT_PATTERN: Regex = Regex::new(
        r"(?:^|[^\d.,])(\d{1,3}(?:,\d{3})*\.\d{2})\b"
    ).unwrap();

    // Exact-match variant for parsing an isolated token.
    pub static ref AMOUNT_EXACT: Regex = Regex::new(
        r"^\d{1,3}(?:,\d{3})*\.\d{2}$"
    ).unwrap();

    // Labeled totals: section anchor, then the grand-total keyword,
    // then the first amount after it.
    pub static ref INCOME_TOTAL: Regex = Regex::new(
        r"(?is)WANG\s+MASUK.*?JUMLAH\s+KESELURUHAN.*?[^\d.,](\d{1,3}(?:,\d{3})*\.\d{2})\b"
    ).unwrap();

    pub static ref EXPENSE_TOTAL: Regex = Regex::new(
        r"(?is)WANG\s+KELUAR.*?JUMLAH\s+KESELURUHAN.*?[^\d.,](\d{1,3}(?:,\d{3})*\.\d{2})\b"
    ).unwrap();

    // Bare section anchors. When the grand-total keyword is missing,
    // the first amount after the anchor is taken instead.
    pub static ref INCOME_ANCHOR: Regex = Regex::new(r"(?i)WANG\s+MASUK").unwrap();

    pub static ref EXPENSE_ANCHOR: Regex = Regex::new(r"(?i)WANG\s+KELUAR").unwrap();

    // Balance anchors.
    pub static ref CLOSING_BALANCE: Regex = Regex::new(
        r"(?is)BAKI\s+AKHIR.*?[^\d.,](\d{1,3}(?:,\d{3})*\.\d{2})\b"
    ).unwrap();

    pub static ref CASH_ON_HAND: Regex = Regex::new(
        r"(?is)WANG\s+TUNAI\s+DI\s+TANGAN.*?[^\d.,](\d{1,3}(?:,\d{3})*\.\d{2})\b"
    ).unwrap();

    pub static ref BANK_BALANCE: Regex = Regex::new(
        r"(?is)(?:WANG\s+DI\s+(?:DALAM\s+)?BANK|BAKI\s+BANK).*?[^\d.,](\d{1,3}(?:,\d{3})*\.\d{2})\b"
    ).unwrap();

    // Section sub-texts for line item scanning: from the section
    // anchor to the grand-total keyword, the next section anchor, or
    // the end of text.
    pub static ref INCOME_SECTION: Regex = Regex::new(
        r"(?is)WANG\s+MASUK(.*?)(?:JUMLAH\s+KESELURUHAN|WANG\s+KELUAR|\z)"
    ).unwrap();

    pub static ref EXPENSE_SECTION: Regex = Regex::new(
        r"(?is)WANG\s+KELUAR(.*?)(?:JUMLAH\s+KESELURUHAN|BAKI\s+AKHIR|\z)"
    ).unwrap();

    // One line item: printed date, digit-free description, amount.
    pub static ref LINE_ITEM: Regex = Regex::new(
        r"(\d{2}\.\d{2}\.\d{4})\s+([^\d]+?)\s+(\d{1,3}(?:,\d{3})*\.\d{2})\b"
    ).unwrap();
}
