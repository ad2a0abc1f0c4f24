use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::backend::{BackendError, SearchBackend};
use crate::model::{Highlight, ResultFields, ResultSet, SearchResult};
use crate::query_dsl::{build_search_body, QueryOptions, CONTENT_FIELD};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("unexpected response shape: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub results: ResultSet,
    pub failed: bool,
}

impl SearchOutcome {
    fn failed() -> Self {
        Self {
            results: ResultSet::empty(),
            failed: true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawResponse {
    hits: RawHits,
}

#[derive(Debug, Deserialize)]
struct RawHits {
    #[serde(default)]
    hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "_id", alias = "id")]
    id: String,
    #[serde(rename = "_score", alias = "score", default)]
    score: Option<f64>,
    #[serde(default)]
    fields: BTreeMap<String, Value>,
    #[serde(default)]
    highlight: Option<Highlight>,
    #[serde(default)]
    inner_hits: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    #[serde(default)]
    content: Option<Value>,
}

pub struct SearchGateway {
    backend: Arc<dyn SearchBackend>,
    options: QueryOptions,
}

impl SearchGateway {
    pub fn new(backend: Arc<dyn SearchBackend>, options: QueryOptions) -> Self {
        Self { backend, options }
    }

    /// Never fails: backend trouble is logged and reported through
    /// `SearchOutcome::failed` with an empty result set.
    pub async fn search(&self, query: &str) -> SearchOutcome {
        if query.is_empty() {
            return SearchOutcome::default();
        }

        match self.try_search(query).await {
            Ok(results) => {
                tracing::debug!(query, hits = results.len(), "search completed");
                SearchOutcome {
                    results,
                    failed: false,
                }
            }
            Err(GatewayError::Backend(error)) => {
                tracing::warn!(kind = "backend_unavailable", query, %error, "search failed");
                SearchOutcome::failed()
            }
            Err(error) => {
                tracing::error!(kind = "malformed_response", query, %error, "search failed");
                SearchOutcome::failed()
            }
        }
    }

    pub async fn try_search(&self, query: &str) -> Result<ResultSet, GatewayError> {
        let body = build_search_body(query, self.options);
        let raw = self.backend.search(&body).await?;
        normalize_response(raw)
    }

    /// Targeted read of the stored full text for one document.
    pub async fn fetch_content(&self, id: &str) -> Result<String, GatewayError> {
        let raw = self.backend.fetch_source(id, &[CONTENT_FIELD]).await?;
        let source: RawSource =
            serde_json::from_value(raw).map_err(|error| GatewayError::Decode(error.to_string()))?;

        match source.content {
            None | Some(Value::Null) => Ok(String::new()),
            Some(Value::String(content)) => Ok(content),
            Some(other) => Err(GatewayError::Malformed(format!(
                "document {id}: content is {}, expected string",
                json_kind(&other)
            ))),
        }
    }
}

pub fn normalize_response(raw: Value) -> Result<ResultSet, GatewayError> {
    let response: RawResponse =
        serde_json::from_value(raw).map_err(|error| GatewayError::Decode(error.to_string()))?;

    let results = response
        .hits
        .hits
        .into_iter()
        .map(normalize_hit)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ResultSet::from(results))
}

fn normalize_hit(hit: RawHit) -> Result<SearchResult, GatewayError> {
    let mut fields = unwrap_fields(&hit.id, hit.fields)?;

    let name = take_required_string(&hit.id, &mut fields, "name")?;
    let path = take_required_string(&hit.id, &mut fields, "path")?;
    let created_at = take_optional_scalar(&hit.id, &mut fields, "created_at")?;
    let updated_at = take_optional_scalar(&hit.id, &mut fields, "updated_at")?;
    let content_type = take_optional_scalar(&hit.id, &mut fields, "content_type")?;

    Ok(SearchResult {
        id: hit.id,
        score: hit.score.unwrap_or(0.0),
        fields: ResultFields {
            name,
            path,
            created_at,
            updated_at,
            content_type,
        },
        highlight: hit.highlight,
        inner_hits: hit.inner_hits,
    })
}

/// The backend wraps every projected value in a one-element array. Anything
/// else means our assumption about the response no longer holds.
pub fn unwrap_fields(
    id: &str,
    fields: BTreeMap<String, Value>,
) -> Result<BTreeMap<String, Value>, GatewayError> {
    fields
        .into_iter()
        .map(|(field, value)| match value {
            Value::Array(mut values) if values.len() == 1 => Ok((field, values.remove(0))),
            Value::Array(values) => Err(GatewayError::Malformed(format!(
                "hit {id}: field '{field}' has {} values, expected exactly 1",
                values.len()
            ))),
            other => Err(GatewayError::Malformed(format!(
                "hit {id}: field '{field}' is {}, expected a single-element array",
                json_kind(&other)
            ))),
        })
        .collect()
}

fn take_required_string(
    id: &str,
    fields: &mut BTreeMap<String, Value>,
    field: &str,
) -> Result<String, GatewayError> {
    match fields.remove(field) {
        Some(Value::String(value)) => Ok(value),
        Some(other) => Err(GatewayError::Malformed(format!(
            "hit {id}: field '{field}' is {}, expected string",
            json_kind(&other)
        ))),
        None => Err(GatewayError::Malformed(format!(
            "hit {id}: required field '{field}' is missing"
        ))),
    }
}

fn take_optional_scalar(
    id: &str,
    fields: &mut BTreeMap<String, Value>,
    field: &str,
) -> Result<Option<String>, GatewayError> {
    match fields.remove(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value)),
        Some(Value::Number(value)) => Ok(Some(value.to_string())),
        Some(other) => Err(GatewayError::Malformed(format!(
            "hit {id}: field '{field}' is {}, expected string or number",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
