use serde::{Deserialize, Serialize};

use crate::navigation::NavKey;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UiKey {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Enter,
    Escape,
}

impl UiKey {
    pub fn as_nav_key(self) -> Option<NavKey> {
        match self {
            Self::ArrowUp => Some(NavKey::ArrowUp),
            Self::ArrowDown => Some(NavKey::ArrowDown),
            Self::ArrowLeft => Some(NavKey::ArrowLeft),
            Self::ArrowRight => Some(NavKey::ArrowRight),
            Self::Enter => Some(NavKey::Enter),
            Self::Escape => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryEditedRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeyRequest {
    pub key: UiKey,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RowClickedRequest {
    pub index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummonRequest {
    #[serde(default)]
    pub has_focus: bool,
}

/// Input coming from the host window glue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum UiRequest {
    QueryEdited(QueryEditedRequest),
    Key(KeyRequest),
    RowClicked(RowClickedRequest),
    Summon(SummonRequest),
    Quit,
}

/// Imperative instructions for the host window glue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ShellCommand {
    ShowAndFocus,
    Hide,
    FocusInput { select_all: bool },
    ReleaseInputFocus,
    RegisterHotkey { hotkey: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResultRow {
    pub id: String,
    pub name: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet_html: Option<String>,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PreviewPane {
    Hidden,
    Loading,
    Embed { mime_type: String, uri: String },
    Text { html: String },
    Unsupported { message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LauncherView {
    pub query: String,
    pub rows: Vec<ResultRow>,
    pub focused_index: i64,
    pub preview: PreviewPane,
    pub loading: bool,
    pub search_failed: bool,
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum CoreEvent {
    View(LauncherView),
    Shell(ShellCommand),
}
