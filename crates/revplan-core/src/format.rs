//! Amount formatting and parsing for the entry forms and dashboard labels.
//!
//! Grouping follows the id-ID locale: `.` as thousands separator, no
//! fractional digits.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::types::Money;

const BILLION: Decimal = dec!(1000000000);
const MILLION: Decimal = dec!(1000000);

/// Group digits in threes with `.`: `1234567` → `"1.234.567"`.
pub fn group_thousands(value: Money) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

/// Input-box rendering of an amount. Zero renders as an empty box.
pub fn format_thousands(value: Money) -> String {
    if value == 0 {
        String::new()
    } else {
        group_thousands(value)
    }
}

/// Read back what [`format_thousands`] (or a user) typed.
///
/// Separators `.` and `,` are dropped, then the leading integer is read.
/// Anything without one is 0.
pub fn parse_formatted(raw: &str) -> Money {
    let cleaned: String = raw.trim().chars().filter(|c| *c != '.' && *c != ',').collect();
    let (negative, rest) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.strip_prefix('+').unwrap_or(&cleaned)),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    let value: Money = digits.parse().unwrap_or(0);
    if negative {
        -value
    } else {
        value
    }
}

/// `"Rp 1.234.567"`
pub fn format_currency(value: Money) -> String {
    format!("Rp {}", group_thousands(value))
}

/// Chart/stat-card label with one decimal on billions.
pub fn format_compact(value: Money) -> String {
    format_compact_with(value, 1)
}

/// `IDR 1.5Bn`, `IDR 250Mn` or `IDR 12.500`, with `bn_decimals` on billions.
pub fn format_compact_with(value: Money, bn_decimals: u32) -> String {
    let v = Decimal::from(value);
    if v >= BILLION {
        let bn = (v / BILLION)
            .round_dp_with_strategy(bn_decimals, RoundingStrategy::MidpointAwayFromZero);
        format!("IDR {:.*}Bn", bn_decimals as usize, bn)
    } else if v >= MILLION {
        let mn = (v / MILLION).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        format!("IDR {mn}Mn")
    } else {
        format!("IDR {}", group_thousands(value))
    }
}
