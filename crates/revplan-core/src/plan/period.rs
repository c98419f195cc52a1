use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::RevPlanError;
use crate::plan::grid::GRID_SLOTS;

/// Period used when the form value is missing, zero, negative or unparseable.
pub const DEFAULT_PERIOD_MONTHS: u32 = 12;

/// Form value of the one-time-only sentinel.
pub const ONE_TIME_LABEL: &str = "OTC";

/// Choices offered by the contract-period picker.
pub const STANDARD_PERIODS: [&str; 9] =
    ["3", "6", "9", "12", "24", "36", "48", "60", ONE_TIME_LABEL];

/// Contract duration: a month count, or the one-time-only sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractPeriod {
    Months(u32),
    OneTime,
}

impl Default for ContractPeriod {
    fn default() -> Self {
        ContractPeriod::Months(DEFAULT_PERIOD_MONTHS)
    }
}

impl ContractPeriod {
    /// Interpret a raw form value without failing.
    ///
    /// `"OTC"` is the sentinel, positive integers are taken as-is and
    /// everything else falls back to 12 months.
    pub fn from_form(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case(ONE_TIME_LABEL) {
            return ContractPeriod::OneTime;
        }
        match raw.parse::<i64>() {
            Ok(n) => Self::from_months(n),
            Err(_) => Self::default(),
        }
    }

    /// Month count with the non-positive fallback applied.
    pub fn from_months(n: i64) -> Self {
        match u32::try_from(n) {
            Ok(m) if m > 0 => ContractPeriod::Months(m),
            _ => Self::default(),
        }
    }

    pub fn is_one_time(&self) -> bool {
        matches!(self, ContractPeriod::OneTime)
    }

    /// Months the contract runs for; the sentinel counts as a single month.
    pub fn effective_months(&self) -> u32 {
        match self {
            ContractPeriod::OneTime => 1,
            ContractPeriod::Months(m) => *m,
        }
    }

    /// Effective months clamped to the 60-month plan horizon.
    pub fn capped_months(&self) -> usize {
        (self.effective_months() as usize).min(GRID_SLOTS)
    }
}

impl fmt::Display for ContractPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractPeriod::OneTime => f.write_str(ONE_TIME_LABEL),
            ContractPeriod::Months(m) => write!(f, "{m}"),
        }
    }
}

/// Strict parse, used on command-line input.
impl FromStr for ContractPeriod {
    type Err = RevPlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case(ONE_TIME_LABEL) {
            return Ok(ContractPeriod::OneTime);
        }
        match trimmed.parse::<u32>() {
            Ok(m) if (1..=GRID_SLOTS as u32).contains(&m) => Ok(ContractPeriod::Months(m)),
            _ => Err(RevPlanError::InvalidPeriod(s.to_string())),
        }
    }
}

impl Serialize for ContractPeriod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPeriod {
    Number(i64),
    Text(String),
}

/// Accepts `"12"`, `12` or `"OTC"`; anything else degrades to the default.
impl<'de> Deserialize<'de> for ContractPeriod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawPeriod::deserialize(deserializer)? {
            RawPeriod::Number(n) => ContractPeriod::from_months(n),
            RawPeriod::Text(s) => ContractPeriod::from_form(&s),
        })
    }
}

/// Optional form value. Missing, `null` or blank means the picker was never set.
pub fn deserialize_optional<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<ContractPeriod>, D::Error> {
    Ok(match Option::<RawPeriod>::deserialize(deserializer)? {
        None => None,
        Some(RawPeriod::Text(s)) if s.trim().is_empty() => None,
        Some(RawPeriod::Text(s)) => Some(ContractPeriod::from_form(&s)),
        Some(RawPeriod::Number(n)) => Some(ContractPeriod::from_months(n)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_form_values() {
        assert_eq!(ContractPeriod::from_form("12"), ContractPeriod::Months(12));
        assert_eq!(ContractPeriod::from_form(" 36 "), ContractPeriod::Months(36));
        assert_eq!(ContractPeriod::from_form("OTC"), ContractPeriod::OneTime);
        assert_eq!(ContractPeriod::from_form("otc"), ContractPeriod::OneTime);
        assert_eq!(ContractPeriod::from_form(""), ContractPeriod::Months(12));
        assert_eq!(ContractPeriod::from_form("0"), ContractPeriod::Months(12));
        assert_eq!(ContractPeriod::from_form("-6"), ContractPeriod::Months(12));
        assert_eq!(ContractPeriod::from_form("abc"), ContractPeriod::Months(12));
    }

    #[test]
    fn test_effective_and_capped_months() {
        assert_eq!(ContractPeriod::OneTime.effective_months(), 1);
        assert_eq!(ContractPeriod::Months(24).effective_months(), 24);
        assert_eq!(ContractPeriod::Months(72).capped_months(), 60);
        assert_eq!(ContractPeriod::Months(9).capped_months(), 9);
    }

    #[test]
    fn test_strict_parse() {
        assert_eq!("60".parse::<ContractPeriod>().unwrap(), ContractPeriod::Months(60));
        assert_eq!("OTC".parse::<ContractPeriod>().unwrap(), ContractPeriod::OneTime);
        assert!("61".parse::<ContractPeriod>().is_err());
        assert!("0".parse::<ContractPeriod>().is_err());
        assert!("twelve".parse::<ContractPeriod>().is_err());
    }

    #[test]
    fn test_standard_periods_parse() {
        for p in STANDARD_PERIODS {
            assert!(p.parse::<ContractPeriod>().is_ok(), "{p} should parse");
        }
    }

    #[test]
    fn test_serde_accepts_string_or_number() {
        let a: ContractPeriod = serde_json::from_str("\"24\"").unwrap();
        let b: ContractPeriod = serde_json::from_str("24").unwrap();
        let c: ContractPeriod = serde_json::from_str("\"OTC\"").unwrap();
        let d: ContractPeriod = serde_json::from_str("\"\"").unwrap();
        assert_eq!(a, ContractPeriod::Months(24));
        assert_eq!(b, ContractPeriod::Months(24));
        assert_eq!(c, ContractPeriod::OneTime);
        assert_eq!(d, ContractPeriod::Months(12));
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"OTC\"");
        assert_eq!(serde_json::to_string(&a).unwrap(), "\"24\"");
    }

    #[derive(Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "deserialize_optional")]
        period: Option<ContractPeriod>,
    }

    #[test]
    fn test_optional_period_blank_is_unset() {
        let parse = |json: &str| serde_json::from_str::<Form>(json).unwrap().period;
        assert_eq!(parse("{}"), None);
        assert_eq!(parse(r#"{"period": null}"#), None);
        assert_eq!(parse(r#"{"period": ""}"#), None);
        assert_eq!(parse(r#"{"period": "  "}"#), None);
        assert_eq!(parse(r#"{"period": "24"}"#), Some(ContractPeriod::Months(24)));
        assert_eq!(parse(r#"{"period": 0}"#), Some(ContractPeriod::Months(12)));
        assert_eq!(parse(r#"{"period": "OTC"}"#), Some(ContractPeriod::OneTime));
    }
}
