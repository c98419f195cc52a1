use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::RevPlanError;

/// Monetary amounts in the smallest currency unit (IDR has no sub-units).
pub type Money = i64;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// A calendar month in `YYYY-MM` form, as entered in the close-month pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Build from a year and a 1-based month. Returns `None` for months outside 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| YearMonth { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// 1-based month, as written in `YYYY-MM`.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// 0-based month index (January = 0).
    pub fn month_index(&self) -> usize {
        (self.month - 1) as usize
    }

    pub fn first_day(&self) -> NaiveDate {
        // month is validated on construction
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }
}

impl From<NaiveDate> for YearMonth {
    fn from(date: NaiveDate) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = RevPlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RevPlanError::InvalidYearMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        YearMonth::new(year, month).ok_or_else(invalid)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Lenient 0-based month index of a raw `YYYY-MM` form value.
///
/// Reads the leading digits after the first `-`, so `"2026-03"` and
/// `"2026-3"` both give `Some(2)`. Anything without a month component in
/// 1..=12 gives `None`; callers treat that as "no contribution".
pub fn month_index_of(raw: &str) -> Option<usize> {
    let component = raw.split('-').nth(1)?.trim_start();
    let digits: String = component
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    let month: usize = digits.parse().ok()?;
    if (1..=12).contains(&month) {
        Some(month - 1)
    } else {
        None
    }
}

/// Sum of amounts, clamped at the `i64` bounds instead of overflowing.
pub fn sum_money(amounts: impl IntoIterator<Item = Money>) -> Money {
    amounts.into_iter().fold(0, Money::saturating_add)
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "integer_minor_units".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_month_parse_and_display() {
        let ym: YearMonth = "2026-03".parse().unwrap();
        assert_eq!(ym.year(), 2026);
        assert_eq!(ym.month(), 3);
        assert_eq!(ym.month_index(), 2);
        assert_eq!(ym.to_string(), "2026-03");
    }

    #[test]
    fn test_year_month_rejects_bad_month() {
        assert!("2026-13".parse::<YearMonth>().is_err());
        assert!("2026-00".parse::<YearMonth>().is_err());
        assert!("March".parse::<YearMonth>().is_err());
        assert!("".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_year_month_serde_as_string() {
        let ym = YearMonth::new(2027, 11).unwrap();
        let json = serde_json::to_string(&ym).unwrap();
        assert_eq!(json, "\"2027-11\"");
        let back: YearMonth = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ym);
    }

    #[test]
    fn test_month_index_of_lenient() {
        assert_eq!(month_index_of("2026-01"), Some(0));
        assert_eq!(month_index_of("2026-12"), Some(11));
        assert_eq!(month_index_of("2026-7"), Some(6));
        assert_eq!(month_index_of("2026-13"), None);
        assert_eq!(month_index_of("2026-00"), None);
        assert_eq!(month_index_of("2026"), None);
        assert_eq!(month_index_of(""), None);
        assert_eq!(month_index_of("2026-xx"), None);
    }

    #[test]
    fn test_sum_money_saturates() {
        assert_eq!(sum_money([1, 2, 3]), 6);
        assert_eq!(sum_money([Money::MAX, 1]), Money::MAX);
        assert_eq!(sum_money([Money::MIN, -1]), Money::MIN);
        assert_eq!(sum_money(Vec::<Money>::new()), 0);
    }

    #[test]
    fn test_from_naive_date() {
        let d = NaiveDate::from_ymd_opt(2026, 8, 17).unwrap();
        let ym = YearMonth::from(d);
        assert_eq!(ym.to_string(), "2026-08");
        assert_eq!(ym.first_day(), NaiveDate::from_ymd_opt(2026, 8, 1).unwrap());
    }
}
