use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultFields {
    pub name: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub score: f64,
    pub fields: ResultFields,
    /// Engine-rendered snippets keyed by field, in engine order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<Highlight>,
    /// Nested metadata matches, kept as the backend sent them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_hits: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    #[serde(default)]
    pub content: Vec<String>,
}

impl SearchResult {
    pub fn new(id: &str, name: &str, path: &str) -> Self {
        Self {
            id: id.to_string(),
            score: 0.0,
            fields: ResultFields {
                name: name.to_string(),
                path: path.to_string(),
                created_at: None,
                updated_at: None,
                content_type: None,
            },
            highlight: None,
            inner_hits: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.fields.name
    }

    pub fn path(&self) -> &str {
        &self.fields.path
    }

    pub fn first_content_snippet(&self) -> Option<&str> {
        self.highlight
            .as_ref()
            .and_then(|highlight| highlight.content.first())
            .map(String::as_str)
            .filter(|snippet| !snippet.trim().is_empty())
    }
}

/// Engine-ordered results of one search. Replaced wholesale, never patched.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    results: Arc<[SearchResult]>,
}

impl ResultSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Option<&SearchResult> {
        self.results.get(index)
    }

    pub fn same_set(&self, other: &ResultSet) -> bool {
        Arc::ptr_eq(&self.results, &other.results)
    }
}

impl From<Vec<SearchResult>> for ResultSet {
    fn from(value: Vec<SearchResult>) -> Self {
        Self {
            results: value.into(),
        }
    }
}

impl Deref for ResultSet {
    type Target = [SearchResult];

    fn deref(&self) -> &Self::Target {
        &self.results
    }
}

#[cfg(test)]
mod tests {
    use super::{Highlight, ResultSet, SearchResult};

    #[test]
    fn blank_snippet_is_not_a_snippet() {
        let mut result = SearchResult::new("a", "a.txt", "/tmp/a.txt");
        result.highlight = Some(Highlight {
            content: vec!["   ".to_string()],
        });
        assert_eq!(result.first_content_snippet(), None);

        result.highlight = Some(Highlight {
            content: vec!["<em>hit</em>".to_string(), "second".to_string()],
        });
        assert_eq!(result.first_content_snippet(), Some("<em>hit</em>"));
    }

    #[test]
    fn result_set_keeps_engine_order() {
        let set = ResultSet::from(vec![
            SearchResult::new("b", "b.txt", "/b.txt"),
            SearchResult::new("a", "a.txt", "/a.txt"),
        ]);
        assert_eq!(set.len(), 2);
        assert_eq!(set[0].id, "b");
        assert_eq!(set[1].id, "a");
        assert!(set.same_set(&set.clone()));
        assert!(!set.same_set(&ResultSet::from(vec![])));
    }
}
