//! Wire protocol for the generation service.
//!
//! The client sends exactly one `request` frame; the server answers with any
//! number of `progress` frames and at most one `result` frame before closing.

use serde::{Deserialize, Serialize};
use storyloom_core::StoryRequest;

/// The single outbound frame.
#[derive(Debug, Serialize)]
pub(crate) struct RequestEnvelope<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub parameters: &'a StoryRequest,
}

impl<'a> RequestEnvelope<'a> {
    pub fn new(parameters: &'a StoryRequest) -> Self {
        Self {
            kind: "request",
            parameters,
        }
    }
}

/// Inbound frames.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub(crate) enum ServerMessage {
    Progress {
        #[serde(default)]
        message: Option<String>,
    },
    Result {
        data: ResultData,
    },
    #[serde(other)]
    Unknown,
}

/// The `data` field of a result frame, shaped like a serialized `Result`.
#[derive(Debug, Deserialize)]
pub(crate) struct ResultData {
    #[serde(rename = "Ok")]
    pub ok: Option<OkPayload>,
    #[serde(rename = "Err")]
    pub err: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OkPayload {
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_envelope_shape() {
        let request = StoryRequest {
            prompt: "p".into(),
            system_prompt: "s".into(),
            model: "m".into(),
            search: true,
        };
        let json = serde_json::to_value(RequestEnvelope::new(&request)).unwrap();
        assert_eq!(json["type"], "request");
        assert_eq!(json["parameters"]["prompt"], "p");
        assert_eq!(json["parameters"]["search"], true);
    }

    #[test]
    fn test_parse_ok_result() {
        let msg: ServerMessage = serde_json::from_str(
            r#"{"type":"result","data":{"Ok":{"content":"a story"}}}"#,
        )
        .unwrap();
        match msg {
            ServerMessage::Result { data } => {
                assert_eq!(data.ok.unwrap().content, "a story");
                assert!(data.err.is_none());
            }
            other => panic!("unexpected frame: {:?}", other),
        }
    }

    #[test]
    fn test_parse_err_result() {
        let msg: ServerMessage = serde_json::from_str(
            r#"{"type":"result","data":{"Err":{"kind":"overloaded"}}}"#,
        )
        .unwrap();
        match msg {
            ServerMessage::Result { data } => {
                assert!(data.ok.is_none());
                assert!(data.err.is_some());
            }
            other => panic!("unexpected frame: {:?}", other),
        }
    }

    #[test]
    fn test_parse_progress_and_unknown() {
        let progress: ServerMessage =
            serde_json::from_str(r#"{"type":"progress","message":"thinking"}"#).unwrap();
        assert!(matches!(progress, ServerMessage::Progress { .. }));

        let unknown: ServerMessage =
            serde_json::from_str(r#"{"type":"heartbeat"}"#).unwrap();
        assert!(matches!(unknown, ServerMessage::Unknown));
    }
}
