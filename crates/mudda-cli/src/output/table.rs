use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

/// Envelope keys shown after the table rather than in it.
const FOOTER_KEYS: [&str; 4] = ["methodology", "assumptions", "warnings", "metadata"];

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) if map.contains_key("pages") => print_report_table(map),
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => print_result_table(result, map),
            Some(Value::Array(rows)) => print_array_table(rows),
            _ => println!("{}", field_table(map.iter())),
        },
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Map<String, Value>, envelope: &Map<String, Value>) {
    println!("{}", field_table(result.iter()));

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

    let extra: Vec<_> = envelope
        .iter()
        .filter(|(k, _)| k.as_str() != "result" && !FOOTER_KEYS.contains(&k.as_str()))
        .collect();
    if !extra.is_empty() {
        println!("\n{}", field_table(extra.into_iter()));
    }
}

/// One row per text run: page, position and the text drawn there.
fn print_report_table(document: &Map<String, Value>) {
    if let Some(Value::String(title)) = document.get("title") {
        println!("{}", title);
    }

    let mut builder = Builder::default();
    builder.push_record(["Page", "X", "Y", "Font", "Text"]);
    let pages = document.get("pages").and_then(Value::as_array);
    for page in pages.into_iter().flatten() {
        let number = page.get("number").map(format_value).unwrap_or_default();
        let elements = page.get("elements").and_then(Value::as_array);
        for element in elements.into_iter().flatten() {
            if element.get("kind").and_then(Value::as_str) != Some("text") {
                continue;
            }
            builder.push_record([
                number.clone(),
                element.get("x").map(format_value).unwrap_or_default(),
                element.get("y").map(format_value).unwrap_or_default(),
                element.get("font").map(format_value).unwrap_or_default(),
                element.get("text").map(format_value).unwrap_or_default(),
            ]);
        }
    }
    println!("{}", Table::from(builder));
}

fn field_table<'a>(fields: impl Iterator<Item = (&'a String, &'a Value)>) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in fields {
        builder.push_record([key.clone(), format_value(val)]);
    }
    Table::from(builder)
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    // Headers come from the first row; case and bank rows are uniform
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for map in arr.iter().filter_map(Value::as_object) {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
