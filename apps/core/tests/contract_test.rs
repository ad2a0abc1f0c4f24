use serde_json::{json, Value};

use docseek_core::contract::{
    CoreEvent, LauncherView, PreviewPane, ResultRow, ShellCommand, SummonRequest, UiRequest,
};
use docseek_core::transport::{decode_request, encode_event, ErrorCode};

#[test]
fn every_request_kind_decodes() {
    let lines = [
        r#"{"kind":"query_edited","payload":{"text":"invoice"}}"#,
        r#"{"kind":"key","payload":{"key":"escape"}}"#,
        r#"{"kind":"row_clicked","payload":{"index":3}}"#,
        r#"{"kind":"summon","payload":{"has_focus":true}}"#,
        r#"{"kind":"quit"}"#,
    ];
    for line in lines {
        assert!(decode_request(line).is_ok(), "{line}");
    }
}

#[test]
fn summon_focus_flag_defaults_to_false() {
    let request = decode_request(r#"{"kind":"summon","payload":{}}"#).unwrap();
    assert_eq!(
        request,
        UiRequest::Summon(SummonRequest { has_focus: false })
    );
}

#[test]
fn unknown_key_is_rejected_not_ignored() {
    let error = decode_request(r#"{"kind":"key","payload":{"key":"page_down"}}"#).unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidJson);
}

#[test]
fn view_event_wire_shape() {
    let view = LauncherView {
        query: "inv".to_string(),
        rows: vec![ResultRow {
            id: "1".to_string(),
            name: "invoice.pdf".to_string(),
            path: "/d/invoice.pdf".to_string(),
            snippet_html: None,
            selected: true,
        }],
        focused_index: 0,
        preview: PreviewPane::Embed {
            mime_type: "application/pdf".to_string(),
            uri: "file:///d/invoice.pdf".to_string(),
        },
        loading: false,
        search_failed: false,
        visible: true,
    };

    let encoded: Value = serde_json::from_str(&encode_event(CoreEvent::View(view))).unwrap();
    assert_eq!(encoded["status"], "ok");
    assert_eq!(encoded["event"]["kind"], "view");
    let payload = &encoded["event"]["payload"];
    assert_eq!(payload["focused_index"], 0);
    assert_eq!(payload["preview"]["kind"], "embed");
    assert!(payload["rows"][0].get("snippet_html").is_none());
}

#[test]
fn shell_command_wire_shape() {
    let encoded: Value = serde_json::from_str(&encode_event(CoreEvent::Shell(
        ShellCommand::FocusInput { select_all: true },
    )))
    .unwrap();
    assert_eq!(
        encoded["event"],
        json!({ "kind": "shell", "payload": { "command": "focus_input", "select_all": true } })
    );
}
