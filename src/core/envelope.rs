//! Wire envelope - transport-agnostic call request and response shapes
//!
//! A request names a tool, carries an untyped argument mapping and an opaque
//! correlation id supplied by the transport. A response echoes the id and
//! carries either a result payload or an error message, never both. Both
//! fields are always present on the wire (`null` when unused) so clients can
//! branch on `ok` alone.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One tool invocation as received from a transport.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallRequest {
    /// Registered tool name.
    pub tool: String,
    /// Untyped argument mapping; the handler applies the codec.
    #[serde(default)]
    pub arguments: Map<String, Value>,
    /// Opaque correlation token, echoed back on the response.
    #[serde(default)]
    pub id: Value,
}

impl CallRequest {
    pub fn new(tool: impl Into<String>, arguments: Map<String, Value>, id: Value) -> Self {
        Self {
            tool: tool.into(),
            arguments,
            id,
        }
    }
}

/// The uniform result of one invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallResponse {
    pub id: Value,
    pub ok: bool,
    pub result: Option<Value>,
    pub error: Option<String>,
}

impl CallResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            id,
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, error: impl Into<String>) -> Self {
        Self {
            id,
            ok: false,
            result: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_defaults_arguments_and_id() {
        let req: CallRequest = serde_json::from_str(r#"{"tool":"mouse_get_position"}"#)
            .expect("minimal request parses");
        assert_eq!(req.tool, "mouse_get_position");
        assert!(req.arguments.is_empty());
        assert_eq!(req.id, Value::Null);
    }

    #[test]
    fn response_round_trips_nested_payloads() {
        let payload = json!({
            "windows": [
                {"pid": 4312, "geometry": {"x": 10, "y": -5, "width": 800, "height": 600}},
                {"pid": 99, "geometry": {"x": 0, "y": 0, "width": 1920, "height": 1080}}
            ],
            "count": 2,
            "large": 9_007_199_254_740_993_i64
        });
        let original = CallResponse::success(json!("req-42"), payload);

        let wire = serde_json::to_string(&original).expect("encode");
        let decoded: CallResponse = serde_json::from_str(&wire).expect("decode");

        assert_eq!(decoded, original);
    }

    #[test]
    fn failure_carries_message_and_null_result() {
        let resp = CallResponse::failure(json!(7), "unknown tool: does_not_exist");
        let wire = serde_json::to_value(&resp).expect("encode");
        assert_eq!(wire["ok"], json!(false));
        assert_eq!(wire["result"], Value::Null);
        assert_eq!(wire["error"], json!("unknown tool: does_not_exist"));
        assert_eq!(wire["id"], json!(7));
    }

    #[test]
    fn success_serializes_null_error() {
        let resp = CallResponse::success(Value::Null, json!({"x": 1}));
        let wire = serde_json::to_value(&resp).expect("encode");
        assert_eq!(wire["ok"], json!(true));
        assert_eq!(wire["error"], Value::Null);
    }
}
