//! Display helpers for money, calendar and eras.

use crate::types::Era;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Compact money string: `$1.2M`, `$45.0K`, `$800`. Negative amounts get a
/// leading `-`.
pub fn format_money(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();

    if abs >= 1_000_000 {
        format!("{}${:.1}M", sign, abs as f64 / 1_000_000.0)
    } else if abs >= 1_000 {
        format!("{}${:.1}K", sign, abs as f64 / 1_000.0)
    } else {
        format!("{}${}", sign, abs)
    }
}

/// Full month name for a zero-based month index. Wraps past December.
pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES[month as usize % 12]
}

pub fn era_label(era: Era) -> String {
    era.to_string()
}

/// "March 1874" style date.
pub fn format_date(month: u32, year: i32) -> String {
    format!("{} {}", month_name(month), year)
}
