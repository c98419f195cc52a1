use serde_json::Value;

use super::cell;

/// Result fields worth printing alone, most specific first.
const PRIORITY_KEYS: [&str; 8] = [
    "contract_value",
    "amount",
    "fy",
    "stats",
    "total_pipeline",
    "matched",
    "target_achievement",
    "total",
];

/// Print just the headline value of the result.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(found) = headline(result) {
        println!("{}", found);
        return;
    }
    println!("{}", cell("", result));
}

fn headline(value: &Value) -> Option<String> {
    let map = value.as_object()?;
    for key in PRIORITY_KEYS {
        match map.get(key) {
            Some(Value::Object(_)) => {
                if let Some(inner) = map.get(key).and_then(headline) {
                    return Some(inner);
                }
            }
            Some(v) if !v.is_null() => return Some(cell(key, v)),
            _ => {}
        }
    }
    map.iter()
        .find(|(_, v)| !v.is_object() && !v.is_array())
        .map(|(k, v)| format!("{}: {}", k, cell(k, v)))
}
