use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::cell;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Print the envelope's result as tables: scalars first, then one table per
/// list of records, then warnings and methodology.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(result) => print_result(result, map),
            None => print_object(map),
        },
        Value::Array(arr) => print_records(arr),
        _ => println!("{}", value),
    }
}

fn print_result(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res) => print_object(res),
        other => println!("{}", other),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut nested: Vec<(&String, &Value)> = Vec::new();
    let mut scalars = 0;
    for (key, val) in map {
        match val {
            Value::Array(_) | Value::Object(_) => nested.push((key, val)),
            _ => {
                builder.push_record([key.clone(), cell(key, val)]);
                scalars += 1;
            }
        }
    }
    if scalars > 0 {
        println!("{}", Table::from(builder));
    }

    for (key, val) in nested {
        println!("\n{}:", key);
        match val {
            Value::Array(arr) if key == "grid" => print_grid(arr),
            Value::Array(arr) => print_records(arr),
            Value::Object(inner) => print_object(inner),
            _ => {}
        }
    }
}

/// 60 monthly slots as five year rows.
fn print_grid(slots: &[Value]) {
    let mut builder = Builder::default();
    let mut header = vec!["Year".to_string()];
    header.extend(MONTHS.iter().map(|m| m.to_string()));
    builder.push_record(header);
    for (year, row) in slots.chunks(MONTHS.len()).enumerate() {
        let mut record = vec![format!("Y{}", year + 1)];
        record.extend(row.iter().map(|v| cell("", v)));
        builder.push_record(record);
    }
    println!("{}", Table::from(builder));
}

fn print_records(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(headers.clone());
        for map in arr.iter().filter_map(Value::as_object) {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(|v| cell(h, v)).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
        println!("{}", Table::from(builder));
    } else {
        let values: Vec<String> = arr.iter().map(|v| cell("", v)).collect();
        println!("{}", values.join(", "));
    }
}
