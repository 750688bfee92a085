// Shared helpers for the command family conformance tests

#![allow(dead_code)]

use serde_json::Value;

pub fn fixture(name: &str) -> String {
    let path = format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("reading {path}: {e}"))
}

pub fn fixture_value(name: &str) -> Value {
    serde_json::from_str(&fixture(name)).unwrap()
}

/// Insert `key: value` into every object of the document, at every depth.
pub fn insert_everywhere(doc: &mut Value, key: &str, value: &Value) {
    match doc {
        Value::Object(map) => {
            for child in map.values_mut() {
                insert_everywhere(child, key, value);
            }
            map.insert(key.to_string(), value.clone());
        }
        Value::Array(items) => {
            for item in items {
                insert_everywhere(item, key, value);
            }
        }
        _ => {}
    }
}

/// The `body` object of a payload
pub fn body_mut(doc: &mut Value) -> &mut Value {
    &mut doc["ins_api"]["outputs"]["output"]["body"]
}
