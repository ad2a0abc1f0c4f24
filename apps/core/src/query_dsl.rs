use serde_json::{json, Value};

pub const NAME_FIELDS: [&str; 4] = ["name", "name._2gram", "name._3gram", "name.text"];
pub const CONTENT_FIELD: &str = "content";
// `content_type` is not requested; it only shows up from backends that
// project it on their own.
pub const PROJECTED_FIELDS: [&str; 4] = ["name", "path", "created_at", "updated_at"];
pub const METADATA_PATH: &str = "metadata";
pub const METADATA_FIELDS: [&str; 2] = ["metadata.key", "metadata.val_str"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    pub size: usize,
    pub metadata_match: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            size: 20,
            metadata_match: true,
        }
    }
}

/// Typeahead on the name variants, full text on content, and optionally the
/// nested metadata key/value pairs. Any clause may produce a hit.
pub fn build_search_body(query: &str, options: QueryOptions) -> Value {
    let mut should = vec![
        json!({
            "multi_match": {
                "query": query,
                "type": "bool_prefix",
                "fields": NAME_FIELDS,
            }
        }),
        json!({
            "match": {
                "content": query,
            }
        }),
    ];

    if options.metadata_match {
        should.push(json!({
            "nested": {
                "path": METADATA_PATH,
                "query": {
                    "multi_match": {
                        "query": query,
                        "fields": METADATA_FIELDS,
                    }
                },
                "inner_hits": {},
                "ignore_unmapped": true,
            }
        }));
    }

    json!({
        "query": {
            "bool": {
                "should": should,
            }
        },
        "highlight": {
            "fields": {
                "content": {},
            }
        },
        "_source": false,
        "fields": PROJECTED_FIELDS,
        "size": options.size,
    })
}
