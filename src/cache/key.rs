//! Cache Key Module
//!
//! Derives request fingerprints from a resource identifier and its parameters.

use serde_json::{Map, Value};

// == Generate Key ==
/// Builds a deterministic cache key for `resource` with optional `params`.
///
/// Parameters are serialized as compact JSON with object keys sorted at every
/// depth, so two mappings holding the same pairs in a different order produce
/// the same key. Absent and empty parameter sets both yield the resource alone.
///
/// `%` and `?` inside the resource are percent-escaped, so the first `?` in a
/// key always separates the resource from its parameters and no resource can
/// spell out another request's parameter section.
///
/// ```
/// use request_cache::cache::generate_key;
/// use serde_json::json;
///
/// let a = json!({"page": 2, "sort": "name"});
/// let b = json!({"sort": "name", "page": 2});
/// assert_eq!(
///     generate_key("/users", a.as_object()),
///     generate_key("/users", b.as_object()),
/// );
/// ```
pub fn generate_key(resource: &str, params: Option<&Map<String, Value>>) -> String {
    let mut key = String::with_capacity(resource.len() + 32);
    write_resource(&mut key, resource);
    if let Some(params) = params.filter(|p| !p.is_empty()) {
        key.push('?');
        write_object(&mut key, params);
    }
    key
}

/// Same as [`generate_key`], taking parameters as `(name, value)` pairs.
pub fn generate_key_from_pairs<I, K, V>(resource: &str, pairs: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    let params: Map<String, Value> = pairs
        .into_iter()
        .map(|(name, value)| (name.into(), value.into()))
        .collect();
    generate_key(resource, Some(&params))
}

// == Canonical Serialization ==
fn write_resource(out: &mut String, resource: &str) {
    for c in resource.chars() {
        match c {
            '%' => out.push_str("%25"),
            '?' => out.push_str("%3F"),
            c => out.push(c),
        }
    }
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Object(map) => write_object(out, map),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn write_object(out: &mut String, map: &Map<String, Value>) {
    let mut fields: Vec<(&String, &Value)> = map.iter().collect();
    fields.sort_unstable_by(|a, b| a.0.cmp(b.0));

    out.push('{');
    for (i, (name, value)) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        // Display on a string Value yields the JSON-escaped, quoted form.
        out.push_str(&Value::String(name.clone()).to_string());
        out.push(':');
        write_value(out, value);
    }
    out.push('}');
}
