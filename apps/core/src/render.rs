use std::collections::HashSet;
use std::sync::LazyLock;

use ammonia::Builder;

use crate::contract::{PreviewPane, ResultRow};
use crate::model::SearchResult;
use crate::preview::{PreviewResolution, PreviewState};

static HIGHLIGHT_SANITIZER: LazyLock<Builder<'static>> = LazyLock::new(|| {
    let mut builder = Builder::empty();
    builder.tags(["em"].into_iter().collect::<HashSet<&'static str>>());
    builder.clean_content_tags(["script", "style"].into_iter().collect::<HashSet<_>>());
    builder
});

pub fn render_row(result: &SearchResult, selected: bool) -> ResultRow {
    ResultRow {
        id: result.id.clone(),
        name: result.name().to_string(),
        path: result.path().to_string(),
        snippet_html: result.first_content_snippet().and_then(sanitize_highlight),
        selected,
    }
}

/// Keeps only `<em>` emphasis. Escaped angle brackets left behind by
/// stripping are dropped so no markup debris shows up as text.
pub fn sanitize_highlight(html: &str) -> Option<String> {
    let cleaned = HIGHLIGHT_SANITIZER.clean(html).to_string();
    let cleaned = cleaned.replace("&lt;", "").replace("&gt;", "");
    if cleaned.trim().is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

pub fn render_preview(visible: bool, state: Option<&PreviewState>) -> PreviewPane {
    if !visible {
        return PreviewPane::Hidden;
    }

    match state {
        None => PreviewPane::Hidden,
        Some(PreviewState::Loading) => PreviewPane::Loading,
        Some(PreviewState::Ready(resolution)) => match resolution {
            PreviewResolution::Embed { mime_type, uri } => PreviewPane::Embed {
                mime_type: mime_type.clone(),
                uri: uri.clone(),
            },
            PreviewResolution::Text { html } => PreviewPane::Text { html: html.clone() },
            PreviewResolution::Unsupported { reason } => PreviewPane::Unsupported {
                message: reason.clone(),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{render_preview, render_row, sanitize_highlight};
    use crate::contract::PreviewPane;
    use crate::model::{Highlight, SearchResult};
    use crate::preview::{PreviewResolution, PreviewState};

    #[test]
    fn script_is_dropped_and_emphasis_kept() {
        let cleaned = sanitize_highlight("<script>x</script><em>match</em>").unwrap();
        assert_eq!(cleaned, "<em>match</em>");
    }

    #[test]
    fn other_tags_and_stray_brackets_are_stripped() {
        let cleaned =
            sanitize_highlight("<b>bold</b> a < b <em class=\"x\">hit</em> > <img src=x onerror=alert(1)>")
                .unwrap();
        assert!(cleaned.starts_with("bold a"));
        assert!(cleaned.contains("<em>hit</em>"));
        assert!(!cleaned.contains("<b>"));
        assert!(!cleaned.contains("&lt;"));
        assert!(!cleaned.contains("&gt;"));
        assert!(!cleaned.contains("onerror"));
    }

    #[test]
    fn markup_only_snippet_renders_nothing() {
        assert_eq!(sanitize_highlight("<script>alert(1)</script>"), None);
    }

    #[test]
    fn row_shows_name_and_first_snippet() {
        let mut result = SearchResult::new("1", "invoice.pdf", "/docs/invoice.pdf");
        result.highlight = Some(Highlight {
            content: vec!["<em>invoice</em> total".into(), "second".into()],
        });

        let row = render_row(&result, true);
        assert_eq!(row.name, "invoice.pdf");
        assert_eq!(row.snippet_html.as_deref(), Some("<em>invoice</em> total"));
        assert!(row.selected);

        let bare = render_row(&SearchResult::new("2", "a.txt", "/a.txt"), false);
        assert_eq!(bare.snippet_html, None);
    }

    #[test]
    fn preview_pane_covers_every_resolution() {
        assert_eq!(render_preview(false, Some(&PreviewState::Loading)), PreviewPane::Hidden);
        assert_eq!(render_preview(true, None), PreviewPane::Hidden);
        assert_eq!(render_preview(true, Some(&PreviewState::Loading)), PreviewPane::Loading);

        let text = PreviewState::Ready(PreviewResolution::Text { html: "<p>x</p>".into() });
        assert_eq!(
            render_preview(true, Some(&text)),
            PreviewPane::Text { html: "<p>x</p>".into() }
        );

        let unsupported = PreviewState::Ready(PreviewResolution::unsupported("nope"));
        assert_eq!(
            render_preview(true, Some(&unsupported)),
            PreviewPane::Unsupported { message: "nope".into() }
        );
    }
}
