//! Output formatting

use serde_json::{json, Map, Value as Json};
use vela_sdk::abi::Value;

/// Output builder for formatted CLI output
pub struct Output {
    json_mode: bool,
    fields: Map<String, Json>,
    message: Option<String>,
}

impl Output {
    /// Create a new output builder
    pub fn new(json_mode: bool) -> Self {
        Self {
            json_mode,
            fields: Map::new(),
            message: None,
        }
    }

    /// Add a string field to the output
    pub fn field(mut self, key: &str, value: &str) -> Self {
        self.fields.insert(key.to_string(), Json::String(value.to_string()));
        self
    }

    /// Add a u64 field to the output
    pub fn field_u64(mut self, key: &str, value: u64) -> Self {
        self.fields.insert(key.to_string(), Json::Number(value.into()));
        self
    }

    /// Add a bool field to the output
    pub fn field_bool(mut self, key: &str, value: bool) -> Self {
        self.fields.insert(key.to_string(), Json::Bool(value));
        self
    }

    /// Add a JSON value field to the output
    pub fn field_value(mut self, key: &str, value: Json) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    /// Set the human-readable message
    pub fn message(mut self, msg: &str) -> Self {
        self.message = Some(msg.to_string());
        self
    }

    /// Print the output
    pub fn print(self) {
        if self.json_mode {
            let json = Json::Object(self.fields);
            println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
        } else if let Some(msg) = self.message {
            println!("{}", msg);
        }
    }
}

/// JSON rendering of a decoded value.
///
/// Numerics become decimal strings, bytes lowercase hex, addresses bech32.
pub fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Numeric { value, .. } => Json::String(value.to_string()),
        Value::Boolean(b) => Json::Bool(*b),
        Value::Address(address) => Json::String(address.to_bech32()),
        Value::Bytes(bytes) => Json::String(hex::encode(bytes)),
        Value::List { items, .. } | Value::Array { items, .. } | Value::Variadic { items, .. } => {
            Json::Array(items.iter().map(value_to_json).collect())
        }
        Value::Tuple(members) | Value::Multi(members) => {
            Json::Array(members.iter().map(value_to_json).collect())
        }
        Value::Struct { fields, .. } => Json::Object(
            fields
                .iter()
                .map(|f| (f.name.clone(), value_to_json(&f.value)))
                .collect(),
        ),
        Value::Enum {
            variant, fields, ..
        } => {
            if fields.is_empty() {
                Json::String(variant.clone())
            } else {
                json!({
                    "variant": variant,
                    "fields": fields.iter().map(value_to_json).collect::<Vec<_>>(),
                })
            }
        }
        Value::Option { value, .. } | Value::Optional { value, .. } => match value {
            Some(inner) => value_to_json(inner),
            None => Json::Null,
        },
    }
}
