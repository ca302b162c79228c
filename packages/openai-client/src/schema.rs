//! Strict JSON schemas for OpenAI structured outputs.
//!
//! Schemas are derived from Rust types with `schemars`, then rewritten into the
//! subset the API accepts in strict mode:
//!
//! 1. every object schema carries `additionalProperties: false`
//! 2. every property is listed in `required` (nullable ones included)
//! 3. `$ref`s are inlined and `definitions` / `$schema` are dropped
//! 4. single-entry `allOf` wrappers (schemars adds them around annotated
//!    refs) are folded into their parent
//! 5. keywords the API rejects (`default`, numeric `format`s) are removed
//!
//! ```rust,ignore
//! #[derive(Deserialize, JsonSchema)]
//! struct Answer {
//!     title: String,
//!     tags: Vec<String>,
//! }
//!
//! let schema = Answer::strict_schema();
//! ```

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Keywords that hold a single subschema.
const SUBSCHEMA_KEYWORDS: &[&str] = &["items", "additionalItems", "not"];

/// Keywords that hold an array of subschemas.
const SUBSCHEMA_LIST_KEYWORDS: &[&str] = &["anyOf", "oneOf", "allOf"];

/// Numeric formats emitted by schemars that strict mode does not know.
const NUMERIC_FORMATS: &[&str] = &[
    "int8", "int16", "int32", "int64", "uint", "uint8", "uint16", "uint32", "uint64", "float",
    "double",
];

/// Types usable as OpenAI structured output.
///
/// Implemented for every `JsonSchema + DeserializeOwned` type.
pub trait StructuredOutput: JsonSchema + DeserializeOwned {
    /// Strict-mode schema for this type.
    fn strict_schema() -> Value {
        let root = schema_for!(Self);
        let mut value = serde_json::to_value(root).unwrap_or_default();

        let definitions = match &mut value {
            Value::Object(map) => {
                map.remove("$schema");
                map.remove("definitions")
            }
            _ => None,
        };

        if let Some(Value::Object(definitions)) = definitions {
            inline_refs(&mut value, &definitions);
        }
        make_strict(&mut value);

        value
    }

    /// Name of the schema, as reported by `schemars`.
    fn schema_name() -> String {
        <Self as JsonSchema>::schema_name()
    }
}

impl<T: JsonSchema + DeserializeOwned> StructuredOutput for T {}

/// Replace every `{"$ref": "#/definitions/X"}` with a copy of `X`.
fn inline_refs(value: &mut Value, definitions: &Map<String, Value>) {
    match value {
        Value::Object(map) => {
            let target = map
                .get("$ref")
                .and_then(Value::as_str)
                .and_then(|r| r.strip_prefix("#/definitions/"))
                .and_then(|name| definitions.get(name))
                .cloned();

            if let Some(mut inlined) = target {
                inline_refs(&mut inlined, definitions);
                *value = inlined;
                return;
            }

            for child in map.values_mut() {
                inline_refs(child, definitions);
            }
        }
        Value::Array(items) => {
            for item in items {
                inline_refs(item, definitions);
            }
        }
        _ => {}
    }
}

/// Rewrite one schema node (and its subschemas) into strict form.
fn make_strict(schema: &mut Value) {
    let Value::Object(node) = schema else {
        return;
    };

    fold_single_all_of(node);
    node.remove("default");
    if node
        .get("format")
        .and_then(Value::as_str)
        .is_some_and(|f| NUMERIC_FORMATS.contains(&f))
    {
        node.remove("format");
    }

    if is_object_type(node) {
        node.insert("additionalProperties".to_string(), Value::Bool(false));

        let names: Vec<Value> = match node.get("properties") {
            Some(Value::Object(props)) => props.keys().cloned().map(Value::String).collect(),
            _ => Vec::new(),
        };
        node.insert("required".to_string(), Value::Array(names));

        // Property maps hold schemas keyed by field name, not keywords.
        if let Some(Value::Object(props)) = node.get_mut("properties") {
            for prop in props.values_mut() {
                make_strict(prop);
            }
        }
    }

    for keyword in SUBSCHEMA_KEYWORDS {
        if let Some(sub) = node.get_mut(*keyword) {
            make_strict(sub);
        }
    }

    for keyword in SUBSCHEMA_LIST_KEYWORDS {
        if let Some(Value::Array(subs)) = node.get_mut(*keyword) {
            for sub in subs {
                make_strict(sub);
            }
        }
    }
}

/// `{"allOf": [X], "description": d}` becomes `X` with `description: d`.
fn fold_single_all_of(node: &mut Map<String, Value>) {
    let single = matches!(node.get("allOf"), Some(Value::Array(subs)) if subs.len() == 1);
    if !single {
        return;
    }

    if let Some(Value::Array(mut subs)) = node.remove("allOf") {
        if let Some(Value::Object(inner)) = subs.pop() {
            for (key, value) in inner {
                node.entry(key).or_insert(value);
            }
        }
    }
}

fn is_object_type(node: &Map<String, Value>) -> bool {
    match node.get("type") {
        Some(Value::String(t)) => t == "object",
        Some(Value::Array(types)) => types.iter().any(|t| t == "object"),
        _ => node.contains_key("properties"),
    }
}
