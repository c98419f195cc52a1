pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("JSON serialization error: {}", e),
        },
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Keys holding a ratio that reads better as a percentage.
pub(crate) fn is_ratio_key(key: &str) -> bool {
    key == "share" || key == "target_achievement"
}

/// Scalar cell text; ratios rendered as `12.5%`.
pub(crate) fn cell(key: &str, value: &Value) -> String {
    if is_ratio_key(key) {
        let parsed = match value {
            Value::String(s) => s.parse::<rust_decimal::Decimal>().ok(),
            Value::Number(n) => n.to_string().parse::<rust_decimal::Decimal>().ok(),
            _ => None,
        };
        if let Some(ratio) = parsed {
            return format!("{:.1}%", ratio * rust_decimal::Decimal::ONE_HUNDRED);
        }
    }
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
