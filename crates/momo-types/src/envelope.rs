//! Response envelope: `{ "data": ... }` on success, `{ "error": { code, message } }` on failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of an `error` envelope. Both fields are optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A decoded response body, discriminated by which envelope key it carries.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// `{ "data": value }`; holds the unwrapped value.
    Data(Value),
    /// `{ "error": {...} }` with a non-null `error`.
    Error(ErrorBody),
    /// Anything without an envelope (bare objects, arrays, scalars).
    Bare(Value),
}

impl Envelope {
    /// Classify a parsed JSON body. `error` wins over `data` when both are present.
    pub fn classify(value: Value) -> Self {
        match value {
            Value::Object(mut map) => {
                match map.get("error") {
                    Some(Value::Null) | None => {}
                    Some(err) => {
                        let body = match err {
                            Value::Object(_) => {
                                serde_json::from_value(err.clone()).unwrap_or_default()
                            }
                            _ => ErrorBody::default(),
                        };
                        return Envelope::Error(body);
                    }
                }
                match map.remove("data") {
                    Some(data) => Envelope::Data(data),
                    None => Envelope::Bare(Value::Object(map)),
                }
            }
            other => Envelope::Bare(other),
        }
    }

    /// Parse raw bytes; `None` when the body is not JSON.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        serde_json::from_slice::<Value>(bytes).ok().map(Self::classify)
    }
}
