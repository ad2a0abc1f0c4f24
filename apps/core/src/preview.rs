use std::sync::Arc;

use mime_guess::Mime;

use crate::model::SearchResult;
use crate::search_gateway::SearchGateway;

pub const UNSUPPORTED_MESSAGE: &str = "preview not supported for this file";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load content";

const UNKNOWN_BINARY: &str = "application/octet-stream";
const PLACEHOLDER_TYPES: [&str; 2] = ["*/*", UNKNOWN_BINARY];

/// Formats the host can show by pointing a viewer at the file itself.
pub const EMBEDDABLE_TYPES: [&str; 6] = [
    "application/pdf",
    "image/png",
    "image/jpeg",
    "image/gif",
    "image/webp",
    "image/svg+xml",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewResolution {
    Embed { mime_type: String, uri: String },
    Text { html: String },
    Unsupported { reason: String },
}

impl PreviewResolution {
    pub fn unsupported(reason: &str) -> Self {
        Self::Unsupported {
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewState {
    Loading,
    Ready(PreviewResolution),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewPlan {
    Ready(PreviewResolution),
    FetchText { id: String },
}

pub struct PreviewResolver {
    gateway: Arc<SearchGateway>,
}

impl PreviewResolver {
    pub fn new(gateway: Arc<SearchGateway>) -> Self {
        Self { gateway }
    }

    pub async fn resolve(&self, result: &SearchResult) -> PreviewResolution {
        match plan(result) {
            PreviewPlan::Ready(resolution) => resolution,
            PreviewPlan::FetchText { id } => self.fetch_text(&id).await,
        }
    }

    pub async fn fetch_text(&self, id: &str) -> PreviewResolution {
        match self.gateway.fetch_content(id).await {
            Ok(content) => PreviewResolution::Text {
                html: ammonia::clean(&content),
            },
            Err(error) => {
                tracing::warn!(kind = "content_fetch_failed", id, %error, "preview fetch failed");
                PreviewResolution::unsupported(LOAD_FAILED_MESSAGE)
            }
        }
    }
}

/// Decides how a result is previewed without touching the network; only the
/// text strategy needs a follow-up fetch.
pub fn plan(result: &SearchResult) -> PreviewPlan {
    let Some(mime) = effective_mime_type(result.fields.content_type.as_deref(), result.path())
    else {
        return PreviewPlan::Ready(PreviewResolution::unsupported(UNSUPPORTED_MESSAGE));
    };

    let essence = mime.essence_str();
    if essence == UNKNOWN_BINARY {
        return PreviewPlan::Ready(PreviewResolution::unsupported(UNSUPPORTED_MESSAGE));
    }

    if EMBEDDABLE_TYPES.contains(&essence) {
        return PreviewPlan::Ready(PreviewResolution::Embed {
            mime_type: essence.to_string(),
            uri: format!("file://{}", result.path()),
        });
    }

    PreviewPlan::FetchText {
        id: result.id.clone(),
    }
}

/// A declared type wins when it parses and is not a placeholder; otherwise
/// the type is guessed from the path's extension.
pub fn effective_mime_type(declared: Option<&str>, path: &str) -> Option<Mime> {
    let declared = declared
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| value.parse::<Mime>().ok())
        .filter(|mime| !PLACEHOLDER_TYPES.contains(&mime.essence_str()));

    declared.or_else(|| mime_guess::from_path(path).first())
}
