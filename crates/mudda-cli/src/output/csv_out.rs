use serde_json::{Map, Value};
use std::io::{self, Write};

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let written = match value {
        Value::Object(map) if map.contains_key("pages") => write_report_csv(&mut wtr, map),
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => write_fields_csv(&mut wtr, result),
            Some(Value::Array(rows)) => write_array_csv(&mut wtr, rows),
            _ => write_fields_csv(&mut wtr, map),
        },
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        _ => wtr.write_record([format_csv_value(value)]),
    };

    if let Err(e) = written.and_then(|_| wtr.flush().map_err(csv::Error::from)) {
        eprintln!("CSV output error: {}", e);
    }
}

/// Two-column CSV: field, value
fn write_fields_csv<W: Write>(wtr: &mut csv::Writer<W>, map: &Map<String, Value>) -> csv::Result<()> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in map {
        wtr.write_record([key.clone(), format_csv_value(val)])?;
    }
    Ok(())
}

/// Text runs of a report layout, one per line.
fn write_report_csv<W: Write>(wtr: &mut csv::Writer<W>, document: &Map<String, Value>) -> csv::Result<()> {
    wtr.write_record(["page", "x", "y", "font", "size", "text"])?;
    let pages = document.get("pages").and_then(Value::as_array);
    for page in pages.into_iter().flatten() {
        let number = page.get("number").map(format_csv_value).unwrap_or_default();
        let elements = page.get("elements").and_then(Value::as_array);
        for element in elements.into_iter().flatten() {
            if element.get("kind").and_then(Value::as_str) != Some("text") {
                continue;
            }
            let field = |name: &str| element.get(name).map(format_csv_value).unwrap_or_default();
            wtr.write_record([
                number.clone(),
                field("x"),
                field("y"),
                field("font"),
                field("size"),
                field("text"),
            ])?;
        }
    }
    Ok(())
}

fn write_array_csv<W: Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) -> csv::Result<()> {
    // Headers come from the first row
    match arr.first() {
        None => Ok(()),
        Some(Value::Object(first)) => {
            let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
            wtr.write_record(&headers)?;
            for map in arr.iter().filter_map(Value::as_object) {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                wtr.write_record(&row)?;
            }
            Ok(())
        }
        Some(_) => {
            for item in arr {
                wtr.write_record([format_csv_value(item)])?;
            }
            Ok(())
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
