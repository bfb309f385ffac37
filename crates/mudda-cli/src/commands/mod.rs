pub mod bank;
pub mod calculate;
pub mod case;
pub mod date;
pub mod digits;
pub mod report;

use mudda_core::numerals::to_local_digits;
use mudda_core::store::JsonFileStore;
use serde_json::Value;

use crate::settings::AppConfig;

pub(crate) fn open_store(config: &AppConfig) -> JsonFileStore {
    JsonFileStore::new(&config.store.path)
}

/// Rewrite every string and number under `result` (or the whole value when
/// there is no envelope) with Devanagari digits.
pub(crate) fn localize(value: &mut Value) {
    match value {
        Value::Object(map) if map.contains_key("result") => {
            if let Some(result) = map.get_mut("result") {
                localize_all(result);
            }
        }
        other => localize_all(other),
    }
}

fn localize_all(value: &mut Value) {
    match value {
        Value::String(s) => *s = to_local_digits(s),
        Value::Number(n) => {
            let local = to_local_digits(&n.to_string());
            *value = Value::String(local);
        }
        Value::Array(items) => items.iter_mut().for_each(localize_all),
        Value::Object(map) => map.values_mut().for_each(localize_all),
        Value::Bool(_) | Value::Null => {}
    }
}
