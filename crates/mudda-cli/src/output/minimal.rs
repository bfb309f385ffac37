use serde_json::Value;

/// Fields worth printing alone, most important first.
const PRIORITY_KEYS: [&str; 6] = [
    "payable_amount",
    "converted",
    "total_days",
    "written_to",
    "deleted",
    "file_name",
];

/// Print just the key answer value from the output.
///
/// Heuristic: look for well-known result fields in order of priority,
/// then fall back to the first field in the result object.
pub fn print_minimal(value: &Value) {
    for line in minimal_lines(value) {
        println!("{}", line);
    }
}

fn minimal_lines(value: &Value) -> Vec<String> {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result_obj {
        Value::Object(map) => {
            if let Some(val) = PRIORITY_KEYS
                .iter()
                .filter_map(|key| map.get(*key))
                .find(|val| !val.is_null())
            {
                return vec![format_minimal(val)];
            }
            map.iter()
                .next()
                .map(|(key, val)| vec![format!("{}: {}", key, format_minimal(val))])
                .unwrap_or_default()
        }
        // One line per listed case or bank
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.get("case_number")
                    .or_else(|| item.get("name"))
                    .map(format_minimal)
                    .unwrap_or_else(|| format_minimal(item))
            })
            .collect(),
        other => vec![format_minimal(other)],
    }
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
