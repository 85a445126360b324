//! Elasticsearch response parsing.

use log::warn;
use serde_json::Value;

use crate::document::Attributes;
use crate::error::{Result, SearchlightError};
use crate::result::SearchResult;

/// Decoded `_search` response.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SearchResponse {
    pub(crate) hits: Vec<SearchResult>,
    pub(crate) total_hits: u64,
    pub(crate) max_score: f32,
    /// Elapsed time in seconds.
    pub(crate) took: f64,
}

impl SearchResponse {
    pub(crate) fn parse(body: &Value) -> Result<Self> {
        let hits = body
            .get("hits")
            .ok_or_else(|| SearchlightError::backend("search response has no 'hits' section"))?;

        // `hits.total` is a number before 7.0 and `{"value": n}` after.
        let total_hits = match hits.get("total") {
            Some(Value::Number(total)) => total.as_u64(),
            Some(Value::Object(total)) => total.get("value").and_then(Value::as_u64),
            None | Some(Value::Null) => Some(0),
            Some(_) => None,
        }
        .ok_or_else(|| SearchlightError::backend("malformed 'hits.total' in search response"))?;

        let max_score = hits
            .get("max_score")
            .and_then(Value::as_f64)
            .unwrap_or(0.0) as f32;
        let took = body.get("took").and_then(Value::as_f64).unwrap_or(0.0) / 1000.0;

        let entries = match hits.get("hits") {
            Some(Value::Array(entries)) => entries.as_slice(),
            None => &[],
            Some(_) => {
                return Err(SearchlightError::backend(
                    "'hits.hits' in search response is not an array",
                ));
            }
        };

        let mut decorated = Vec::with_capacity(entries.len());
        for entry in entries {
            let source: Attributes = match entry.get("_source") {
                Some(Value::Object(source)) => source.clone(),
                _ => {
                    warn!("elastic driver: skipping hit without '_source': {entry}");
                    continue;
                }
            };
            let id = match entry.get("_id") {
                Some(Value::String(id)) => id.clone(),
                Some(Value::Number(id)) => id.to_string(),
                _ => String::new(),
            };
            let category = entry
                .get("_type")
                .or_else(|| entry.get("_index"))
                .and_then(Value::as_str)
                .unwrap_or_default();
            let score = entry.get("_score").and_then(Value::as_f64).unwrap_or(0.0) as f32;
            decorated.push(SearchResult::from_hit(id, category, score, source));
        }

        Ok(SearchResponse {
            hits: decorated,
            total_hits,
            max_score,
            took,
        })
    }
}

/// First item error of a `_bulk` response, if any.
pub(crate) fn bulk_error(body: &Value) -> Option<String> {
    if !body.get("errors").and_then(Value::as_bool).unwrap_or(false) {
        return None;
    }
    let items = body.get("items").and_then(Value::as_array)?;
    let failed = items.iter().find_map(|item| {
        let action = item.as_object()?.values().next()?;
        let error = action.get("error")?;
        let id = action.get("_id").and_then(Value::as_str).unwrap_or("?");
        let reason = error
            .get("reason")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        Some(format!("document '{id}': {reason}"))
    });
    Some(failed.unwrap_or_else(|| "bulk request reported errors".to_string()))
}

/// Whether a delete response reports a missing document.
pub(crate) fn is_not_found(body: &Value) -> bool {
    body.get("result").and_then(Value::as_str) == Some("not_found")
        || body.get("found").and_then(Value::as_bool) == Some(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_search_response() {
        let body = json!({
            "took": 12,
            "hits": {
                "total": {"value": 2, "relation": "eq"},
                "max_score": 1.5,
                "hits": [
                    {"_id": "1", "_type": "books", "_score": 1.5, "_source": {"a": {"b": 1}}},
                    {"_id": "2", "_index": "default", "_score": null, "_source": {"a": 2}}
                ]
            }
        });
        let response = SearchResponse::parse(&body).unwrap();
        assert_eq!(response.total_hits, 2);
        assert_eq!(response.max_score, 1.5);
        assert!((response.took - 0.012).abs() < 1e-9);
        assert_eq!(response.hits.len(), 2);
        assert_eq!(response.hits[0].category(), Some("books"));
        assert_eq!(response.hits[0].get("a").get("b").as_integer(), Some(1));
        assert_eq!(response.hits[1].category(), Some("default"));
        assert_eq!(response.hits[1].score(), Some(0.0));
    }

    #[test]
    fn test_legacy_total_and_missing_source() {
        let body = json!({
            "hits": {"total": 5, "max_score": null, "hits": [{"_id": "1"}]}
        });
        let response = SearchResponse::parse(&body).unwrap();
        assert_eq!(response.total_hits, 5);
        assert_eq!(response.max_score, 0.0);
        assert!(response.hits.is_empty());
    }

    #[test]
    fn test_malformed_response() {
        assert!(SearchResponse::parse(&json!({"took": 1})).is_err());
        assert!(SearchResponse::parse(&json!({"hits": {"total": "many"}})).is_err());
    }

    #[test]
    fn test_bulk_error() {
        assert_eq!(bulk_error(&json!({"errors": false, "items": []})), None);
        let body = json!({
            "errors": true,
            "items": [
                {"index": {"_id": "1", "status": 201}},
                {"index": {
                    "_id": "2",
                    "status": 400,
                    "error": {"reason": "mapper_parsing_exception"}
                }}
            ]
        });
        assert_eq!(
            bulk_error(&body),
            Some("document '2': mapper_parsing_exception".to_string())
        );
    }

    #[test]
    fn test_not_found_detection() {
        assert!(is_not_found(&json!({"result": "not_found"})));
        assert!(is_not_found(&json!({"found": false})));
        assert!(!is_not_found(&json!({"result": "deleted"})));
    }
}
