//! Per-kind query construction shared by the builder and the drivers.
//!
//! [`QueryFactory`] provides one method per query kind with the documented
//! defaults. Every [`Driver`](crate::driver::Driver) is a `QueryFactory`,
//! and a [`QueryBuilder`](crate::query::QueryBuilder) obtained from a
//! driver builds its queries through that driver, so a backend can adjust
//! the records it will later translate.

use serde_json::Value;

use crate::error::Result;
use crate::query::common::{CommonOptions, CommonTermsQuery};
use crate::query::fuzzy::{Fuzziness, FuzzyOptions, FuzzyQuery};
use crate::query::kind::MatchAllQuery;
use crate::query::match_query::{
    MatchOptions, MatchQuery, MultiMatchOptions, MultiMatchQuery, MultiMatchType,
};
use crate::query::query_string::QueryStringQuery;
use crate::query::range::{Bounds, RangeOptions, RangeQuery};
use crate::query::regexp::RegexpQuery;
use crate::query::term::{PrefixQuery, TermQuery, TermsQuery};
use crate::query::wildcard::{WildcardOptions, WildcardQuery};

/// Optional post-construction hook, called with the freshly built query.
pub type Customizer<'a, Q> = Option<&'a dyn Fn(&mut Q)>;

fn customized<Q>(mut query: Q, customize: Customizer<'_, Q>) -> Q {
    if let Some(customize) = customize {
        customize(&mut query);
    }
    query
}

/// Factory for every supported query kind.
///
/// All methods have default implementations applying the standard
/// defaults; implementors override only what their backend needs.
pub trait QueryFactory: Send + Sync {
    /// Match query; fuzziness is `AUTO` when `options.fuzzy` is set.
    fn match_query(
        &self,
        field: &str,
        values: Vec<Value>,
        options: MatchOptions,
        customize: Customizer<'_, MatchQuery>,
    ) -> MatchQuery {
        let mut query = MatchQuery::new(field, values).with_match_type(options.match_type);
        if options.fuzzy {
            query = query.with_fuzziness(Fuzziness::Auto);
        }
        customized(query, customize)
    }

    /// Multi-match query.
    ///
    /// The tie breaker is only kept for `best_fields` and the operator only
    /// for `cross_fields`; other types ignore them.
    fn multi_match(
        &self,
        fields: Vec<String>,
        value: &str,
        options: MultiMatchOptions,
        customize: Customizer<'_, MultiMatchQuery>,
    ) -> MultiMatchQuery {
        let mut query = MultiMatchQuery::new(fields, value).with_match_type(options.match_type);
        if options.fuzzy {
            query = query.with_fuzziness(Fuzziness::Auto);
        }
        query = match options.match_type {
            MultiMatchType::BestFields => query.with_tie_breaker(options.tie_breaker),
            MultiMatchType::CrossFields => query.with_operator(options.operator),
            _ => query,
        };
        customized(query, customize)
    }

    /// Fuzzy query with all three tuning parameters set.
    fn fuzzy(
        &self,
        field: &str,
        value: &str,
        options: FuzzyOptions,
        customize: Customizer<'_, FuzzyQuery>,
    ) -> FuzzyQuery {
        customized(FuzzyQuery::with_options(field, value, options), customize)
    }

    /// Common-terms query.
    fn common(
        &self,
        field: &str,
        value: &str,
        options: CommonOptions,
        customize: Customizer<'_, CommonTermsQuery>,
    ) -> CommonTermsQuery {
        customized(
            CommonTermsQuery::with_options(field, value, options),
            customize,
        )
    }

    /// Match-all query.
    fn match_all(&self, customize: Customizer<'_, MatchAllQuery>) -> MatchAllQuery {
        customized(MatchAllQuery, customize)
    }

    /// Range query; fails with `InvalidRange` when no bound is given.
    fn range(
        &self,
        field: &str,
        bounds: Bounds,
        options: RangeOptions,
        customize: Customizer<'_, RangeQuery>,
    ) -> Result<RangeQuery> {
        let mut query = RangeQuery::new(field, bounds)?;
        if let Some(time_zone) = options.time_zone {
            query = query.with_time_zone(time_zone);
        }
        if let Some(format) = options.format {
            query = query.with_format(format);
        }
        Ok(customized(query, customize))
    }

    /// Prefix query.
    fn prefix(
        &self,
        field: &str,
        prefixes: Vec<String>,
        customize: Customizer<'_, PrefixQuery>,
    ) -> PrefixQuery {
        customized(PrefixQuery::new(field, prefixes), customize)
    }

    /// Regexp query; fails when the pattern does not compile.
    fn regexp(
        &self,
        field: &str,
        pattern: &str,
        customize: Customizer<'_, RegexpQuery>,
    ) -> Result<RegexpQuery> {
        Ok(customized(RegexpQuery::new(field, pattern)?, customize))
    }

    /// Term query.
    fn term(&self, field: &str, value: Value, customize: Customizer<'_, TermQuery>) -> TermQuery {
        customized(TermQuery::new(field, value), customize)
    }

    /// Terms query.
    fn terms(
        &self,
        field: &str,
        values: Vec<Value>,
        customize: Customizer<'_, TermsQuery>,
    ) -> TermsQuery {
        customized(TermsQuery::new(field, values), customize)
    }

    /// Wildcard query.
    fn wildcard(
        &self,
        field: &str,
        pattern: &str,
        options: WildcardOptions,
        customize: Customizer<'_, WildcardQuery>,
    ) -> Result<WildcardQuery> {
        let query = WildcardQuery::new(field, pattern)?.with_boost(options.boost);
        Ok(customized(query, customize))
    }

    /// Query-string query.
    fn query_string(
        &self,
        query: &str,
        customize: Customizer<'_, QueryStringQuery>,
    ) -> QueryStringQuery {
        customized(QueryStringQuery::new(query), customize)
    }
}

/// Factory using only the default implementations.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardQueryFactory;

impl QueryFactory for StandardQueryFactory {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::match_query::Operator;
    use serde_json::json;

    #[test]
    fn test_match_query_fuzzy_flag() {
        let factory = StandardQueryFactory;
        let query = factory.match_query(
            "name",
            vec![json!("test")],
            MatchOptions {
                fuzzy: true,
                ..Default::default()
            },
            None,
        );
        assert_eq!(query.fuzziness(), Some(Fuzziness::Auto));
    }

    #[test]
    fn test_multi_match_ignores_unused_parameters() {
        let factory = StandardQueryFactory;
        let options = MultiMatchOptions {
            tie_breaker: 0.3,
            operator: Operator::Or,
            ..Default::default()
        };

        let phrase = factory.multi_match(vec!["a".into()], "x", options, None);
        assert_eq!(phrase.tie_breaker(), None);
        assert_eq!(phrase.operator(), None);

        let best = factory.multi_match(
            vec!["a".into()],
            "x",
            MultiMatchOptions {
                match_type: MultiMatchType::BestFields,
                ..options
            },
            None,
        );
        assert_eq!(best.tie_breaker(), Some(0.3));
        assert_eq!(best.operator(), None);

        let cross = factory.multi_match(
            vec!["a".into()],
            "x",
            MultiMatchOptions {
                match_type: MultiMatchType::CrossFields,
                ..options
            },
            None,
        );
        assert_eq!(cross.tie_breaker(), None);
        assert_eq!(cross.operator(), Some(Operator::Or));
    }

    #[test]
    fn test_customizer_runs_on_built_query() {
        let factory = StandardQueryFactory;
        let customize = |query: &mut FuzzyQuery| {
            *query = query.clone().prefix_length(2);
        };
        let query = factory.fuzzy("name", "jonh", FuzzyOptions::default(), Some(&customize));
        assert_eq!(query.get_prefix_length(), 2);
        assert_eq!(query.get_max_expansions(), 50);
    }

    #[test]
    fn test_range_options_applied() {
        let factory = StandardQueryFactory;
        let query = factory
            .range(
                "published",
                Bounds::new().gte("2020-01-01"),
                RangeOptions {
                    time_zone: Some("+01:00".into()),
                    format: Some("%Y-%m-%d".into()),
                },
                None,
            )
            .unwrap();
        assert_eq!(query.time_zone(), Some("+01:00"));
        assert_eq!(query.format(), Some("%Y-%m-%d"));
    }
}
