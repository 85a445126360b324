//! Query construction.
//!
//! A [`QueryBuilder`] accumulates [`QueryClause`]s, each wrapping one
//! [`QueryKind`] and an [`Occur`] role. Drivers flatten the clauses into a
//! [`SearchRequest`] and translate it for their backend.

pub mod builder;
pub mod clause;
pub mod common;
pub mod factory;
pub mod fuzzy;
pub mod kind;
pub mod match_query;
pub mod query_string;
pub mod range;
pub mod regexp;
pub mod request;
pub mod term;
pub mod wildcard;

use serde_json::{Map, Value};

pub use self::builder::QueryBuilder;
pub use self::clause::{Occur, QueryClause};
pub use self::common::{CommonOptions, CommonTermsQuery};
pub use self::factory::{Customizer, QueryFactory, StandardQueryFactory};
pub use self::fuzzy::{Fuzziness, FuzzyOptions, FuzzyQuery};
pub use self::kind::{MatchAllQuery, QueryKind};
pub use self::match_query::{
    MatchOptions, MatchQuery, MatchType, MultiMatchOptions, MultiMatchQuery, MultiMatchType,
    Operator,
};
pub use self::query_string::{QueryStringQuery, QueryStringTerm};
pub use self::range::{Bound, Bounds, RangeOptions, RangeQuery};
pub use self::regexp::RegexpQuery;
pub use self::request::SearchRequest;
pub use self::term::{PrefixQuery, TermQuery, TermsQuery};
pub use self::wildcard::{WildcardOptions, WildcardQuery};

/// Turn a single value or a list into a list; `null` becomes empty.
pub(crate) fn normalize_values(value: Value) -> Vec<Value> {
    match value {
        Value::Array(values) => values,
        Value::Null => Vec::new(),
        value => vec![value],
    }
}

/// Textual form of a scalar value.
pub(crate) fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// `{key: value}`.
pub(crate) fn keyed(key: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_values() {
        assert_eq!(normalize_values(json!("a")), vec![json!("a")]);
        assert_eq!(normalize_values(json!([1, 2])), vec![json!(1), json!(2)]);
        assert!(normalize_values(Value::Null).is_empty());
    }

    #[test]
    fn test_value_to_text() {
        assert_eq!(value_to_text(&json!(3)), Some("3".to_string()));
        assert_eq!(value_to_text(&json!(true)), Some("true".to_string()));
        assert_eq!(value_to_text(&json!({"a": 1})), None);
    }
}
