use serde_json::{Map, Value};
use std::io;

use super::cell;

type StdoutWriter<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write the result as CSV: a `field,value` block for scalars, then one
/// headed block per list of records. The plan grid becomes `field,value`
/// rows named `jan`..`dec_y5`.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) => write_object(&mut wtr, map),
        Value::Array(arr) => write_records(&mut wtr, arr),
        other => {
            let _ = wtr.write_record([cell("", other)]);
        }
    }

    let _ = wtr.flush();
}

fn write_object(wtr: &mut StdoutWriter<'_>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        match val {
            Value::Array(slots) if key == "grid" => {
                for (slot, v) in slots.iter().enumerate() {
                    let _ = wtr.write_record([slot_field(slot), cell("", v)]);
                }
            }
            Value::Array(_) | Value::Object(_) => {}
            _ => {
                let _ = wtr.write_record([key.clone(), cell(key, val)]);
            }
        }
    }

    for (key, val) in map {
        match val {
            Value::Array(arr)
                if key != "grid" && !arr.is_empty() && arr.iter().all(Value::is_object) =>
            {
                write_records(wtr, arr);
            }
            Value::Object(inner) => {
                for (k, v) in inner.iter().filter(|(_, v)| !v.is_object() && !v.is_array()) {
                    let _ = wtr.write_record([format!("{key}.{k}"), cell(k, v)]);
                }
            }
            _ => {}
        }
    }
}

fn slot_field(slot: usize) -> String {
    const KEYS: [&str; 12] = [
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ];
    match slot / KEYS.len() {
        0 => KEYS[slot].to_string(),
        y => format!("{}_y{}", KEYS[slot % KEYS.len()], y + 1),
    }
}

fn write_records(wtr: &mut StdoutWriter<'_>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([cell("", item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    let _ = wtr.write_record(&headers);
    for map in arr.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| map.get(*h).map(|v| cell(h, v)).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&row);
    }
}
