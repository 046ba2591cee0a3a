//! Malay month names used in statement titles.

/// Month names as printed on branch statements (January first).
pub const MONTH_NAMES: [&str; 12] = [
    "Januari",
    "Februari",
    "Mac",
    "April",
    "Mei",
    "Jun",
    "Julai",
    "Ogos",
    "September",
    "Oktober",
    "November",
    "Disember",
];

/// Placeholder used in titles when the month is out of range.
pub const UNKNOWN_MONTH: &str = "-";

/// Map a month number (1-12) to its printed name.
pub fn month_name(month: u32) -> &'static str {
    match month {
        1..=12 => MONTH_NAMES[(month - 1) as usize],
        _ => UNKNOWN_MONTH,
    }
}

/// Map a printed month name back to its number (1-12).
pub fn month_number(name: &str) -> Option<u32> {
    let lowered = name.trim().to_lowercase();
    MONTH_NAMES
        .iter()
        .position(|m| m.to_lowercase() == lowered)
        .map(|i| (i + 1) as u32)
}
