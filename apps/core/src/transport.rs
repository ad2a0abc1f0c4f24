use serde::{Deserialize, Serialize};

use crate::contract::{CoreEvent, UiRequest};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidJson,
    Encode,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransportMessage {
    Ok { event: CoreEvent },
    Err { error: ErrorResponse },
}

pub fn decode_request(line: &str) -> Result<UiRequest, ErrorResponse> {
    serde_json::from_str::<UiRequest>(line).map_err(|error| ErrorResponse {
        code: ErrorCode::InvalidJson,
        message: error.to_string(),
    })
}

/// One JSON document per line, no trailing newline.
pub fn encode_message(message: &TransportMessage) -> String {
    match serde_json::to_string(message) {
        Ok(encoded) => encoded,
        Err(error) => {
            tracing::error!(%error, "failed to encode transport message");
            format!(
                "{{\"status\":\"err\",\"error\":{{\"code\":\"encode\",\"message\":{}}}}}",
                serde_json::Value::String(error.to_string())
            )
        }
    }
}

pub fn encode_event(event: CoreEvent) -> String {
    encode_message(&TransportMessage::Ok { event })
}

pub fn encode_error(error: ErrorResponse) -> String {
    encode_message(&TransportMessage::Err { error })
}

#[cfg(test)]
mod tests {
    use super::{decode_request, encode_error, encode_event, ErrorCode, TransportMessage};
    use crate::contract::{CoreEvent, KeyRequest, ShellCommand, UiKey, UiRequest};

    #[test]
    fn decodes_tagged_key_request() {
        let request =
            decode_request(r#"{"kind":"key","payload":{"key":"arrow_down"}}"#).unwrap();
        assert_eq!(
            request,
            UiRequest::Key(KeyRequest {
                key: UiKey::ArrowDown
            })
        );
    }

    #[test]
    fn decodes_unit_quit_request() {
        assert_eq!(decode_request(r#"{"kind":"quit"}"#).unwrap(), UiRequest::Quit);
    }

    #[test]
    fn garbage_is_an_invalid_json_error() {
        let error = decode_request("{not-json").unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidJson);

        let encoded = encode_error(error);
        let parsed: TransportMessage = serde_json::from_str(&encoded).unwrap();
        assert!(matches!(parsed, TransportMessage::Err { .. }));
    }

    #[test]
    fn shell_events_are_status_tagged() {
        let encoded = encode_event(CoreEvent::Shell(ShellCommand::FocusInput {
            select_all: true,
        }));
        assert!(encoded.contains("\"status\":\"ok\""));
        assert!(encoded.contains("\"command\":\"focus_input\""));
        assert!(!encoded.contains('\n'));
    }
}
