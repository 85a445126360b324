//! Query evaluation against stored documents.
//!
//! Queries are first prepared against the searched document set (analysis,
//! term statistics, fuzzy expansions, common-term partitioning) and then
//! scored document by document. A prepared query returns `None` for a
//! document it does not match.

use std::cmp::Ordering;

use ahash::{AHashMap, AHashSet};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use serde_json::Value;

use crate::analysis::{Analyzer, Token};
use crate::document::Attributes;
use crate::error::{Result, SearchlightError};
use crate::query::{
    Bound, CommonTermsQuery, Fuzziness, FuzzyQuery, MatchQuery, MatchType, MultiMatchQuery,
    MultiMatchType, Occur, Operator, PrefixQuery, QueryKind, QueryStringQuery, RangeQuery,
    RegexpQuery, TermQuery, TermsQuery, WildcardQuery, value_to_text,
};
use crate::util::edit_distance_within;

/// Document frequencies of one field over the searched documents.
#[derive(Debug, Default)]
struct FieldStats {
    texts: AHashMap<String, usize>,
    stems: AHashMap<String, usize>,
}

/// Scalar leaf values found at `path`.
///
/// A key containing dots is looked up verbatim first; otherwise the path is
/// walked segment by segment, flattening arrays on the way.
pub(crate) fn field_values<'d>(attributes: &'d Attributes, path: &str) -> Vec<&'d Value> {
    let mut leaves = Vec::new();
    if let Some(value) = attributes.get(path) {
        collect_leaves(value, &mut leaves);
        return leaves;
    }

    let mut current: Vec<&Value> = Vec::new();
    let mut segments = path.split('.');
    match segments.next().and_then(|first| attributes.get(first)) {
        Some(value) => current.push(value),
        None => return leaves,
    }

    for segment in segments {
        let mut next = Vec::new();
        for value in current {
            descend(value, segment, &mut next);
        }
        if next.is_empty() {
            return leaves;
        }
        current = next;
    }

    for value in current {
        collect_leaves(value, &mut leaves);
    }
    leaves
}

fn descend<'d>(value: &'d Value, segment: &str, out: &mut Vec<&'d Value>) {
    match value {
        Value::Object(map) => {
            if let Some(child) = map.get(segment) {
                out.push(child);
            }
        }
        Value::Array(items) => {
            for item in items {
                descend(item, segment, out);
            }
        }
        _ => {}
    }
}

fn collect_leaves<'d>(value: &'d Value, out: &mut Vec<&'d Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_leaves(item, out);
            }
        }
        Value::Object(map) => {
            for child in map.values() {
                collect_leaves(child, out);
            }
        }
        Value::Null => {}
        scalar => out.push(scalar),
    }
}

/// Every scalar leaf of a document, for field-less query strings.
fn all_values(attributes: &Attributes) -> Vec<&Value> {
    let mut leaves = Vec::new();
    for value in attributes.values() {
        collect_leaves(value, &mut leaves);
    }
    leaves
}

fn idf(doc_freq: usize, total_docs: usize) -> f32 {
    let n = total_docs as f32;
    let df = doc_freq as f32;
    (1.0 + (n - df + 0.5) / (df + 0.5)).ln().max(0.1)
}

/// Shared evaluation context for one search.
pub(crate) struct Evaluator<'a> {
    analyzer: &'a Analyzer,
    stats: AHashMap<String, FieldStats>,
    total_docs: usize,
}

impl<'a> Evaluator<'a> {
    /// Gather term statistics for every field the queries reference.
    pub(crate) fn new(
        analyzer: &'a Analyzer,
        queries: &[&QueryKind],
        documents: &[&Attributes],
    ) -> Self {
        let mut fields: AHashSet<String> = AHashSet::new();
        for query in queries {
            referenced_fields(query, &mut fields);
        }

        let mut stats: AHashMap<String, FieldStats> = AHashMap::new();
        for field in fields {
            let mut field_stats = FieldStats::default();
            for attributes in documents {
                let mut texts = AHashSet::new();
                let mut stems = AHashSet::new();
                for value in field_values(attributes, &field) {
                    if let Some(text) = value_to_text(value) {
                        for token in analyzer.analyze(&text) {
                            texts.insert(token.text);
                            stems.insert(token.stem);
                        }
                    }
                }
                for text in texts {
                    *field_stats.texts.entry(text).or_insert(0) += 1;
                }
                for stem in stems {
                    *field_stats.stems.entry(stem).or_insert(0) += 1;
                }
            }
            stats.insert(field, field_stats);
        }

        Evaluator {
            analyzer,
            stats,
            total_docs: documents.len(),
        }
    }

    fn stem_idf(&self, field: &str, stem: &str) -> f32 {
        let doc_freq = self
            .stats
            .get(field)
            .and_then(|stats| stats.stems.get(stem))
            .copied()
            .unwrap_or(0);
        idf(doc_freq, self.total_docs)
    }

    fn text_idf(&self, field: &str, text: &str) -> f32 {
        let doc_freq = self
            .stats
            .get(field)
            .and_then(|stats| stats.texts.get(text))
            .copied()
            .unwrap_or(0);
        idf(doc_freq, self.total_docs)
    }

    /// Prepare a query for scoring.
    pub(crate) fn prepare<'q>(&self, query: &'q QueryKind) -> Result<Prepared<'q>> {
        Ok(match query {
            QueryKind::MatchAll(_) => Prepared::All,
            QueryKind::Match(query) => self.prepare_match(query),
            QueryKind::MultiMatch(query) => Prepared::MultiMatch {
                query,
                tokens: self.analyzer.analyze(query.query()),
            },
            QueryKind::Fuzzy(query) => self.prepare_fuzzy(query),
            QueryKind::Common(query) => self.prepare_common(query),
            QueryKind::Range(query) => Prepared::Range(PreparedRange::new(query)?),
            QueryKind::Prefix(query) => Prepared::Prefix(query),
            QueryKind::Regexp(query) => Prepared::Regexp(query),
            QueryKind::Term(query) => Prepared::Term(query),
            QueryKind::Terms(query) => Prepared::Terms(query),
            QueryKind::Wildcard(query) => Prepared::Wildcard(query),
            QueryKind::QueryString(query) => self.prepare_query_string(query),
        })
    }

    fn prepare_match<'q>(&self, query: &'q MatchQuery) -> Prepared<'q> {
        let phrases = query
            .values()
            .iter()
            .filter_map(value_to_text)
            .map(|text| self.analyzer.analyze(&text))
            .filter(|tokens| !tokens.is_empty())
            .collect();
        Prepared::Match {
            field: query.field(),
            phrases,
            prefix: query.match_type() == MatchType::PhrasePrefix,
            fuzziness: query.fuzziness(),
        }
    }

    fn prepare_fuzzy<'q>(&self, query: &'q FuzzyQuery) -> Prepared<'q> {
        let value = query.value().to_lowercase();
        let max_edits = query.get_fuzziness().max_edits(value.chars().count());
        let prefix: String = value
            .chars()
            .take(query.get_prefix_length() as usize)
            .collect();

        let mut candidates: Vec<(usize, usize, &str)> = Vec::new();
        if let Some(stats) = self.stats.get(query.field()) {
            for (term, doc_freq) in &stats.texts {
                if !term.starts_with(&prefix) {
                    continue;
                }
                if let Some(distance) = edit_distance_within(&value, term, max_edits) {
                    candidates.push((distance, *doc_freq, term.as_str()));
                }
            }
        }
        candidates.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)).then(a.2.cmp(b.2)));
        candidates.truncate(query.get_max_expansions());

        let length = value.chars().count().max(1) as f32;
        let expansions = candidates
            .into_iter()
            .map(|(distance, doc_freq, term)| {
                let similarity = 1.0 - distance as f32 / (length + 1.0);
                (term.to_string(), similarity * idf(doc_freq, self.total_docs))
            })
            .collect();

        Prepared::Fuzzy {
            field: query.field(),
            expansions,
        }
    }

    fn prepare_common<'q>(&self, query: &'q CommonTermsQuery) -> Prepared<'q> {
        let cutoff = query.get_cutoff_frequency();
        let total = self.total_docs.max(1) as f64;
        let mut low = Vec::new();
        let mut high = Vec::new();

        let mut seen = AHashSet::new();
        for token in self.analyzer.analyze(query.query()) {
            if !seen.insert(token.stem.clone()) {
                continue;
            }
            let doc_freq = self
                .stats
                .get(query.field())
                .and_then(|stats| stats.stems.get(&token.stem))
                .copied()
                .unwrap_or(0) as f64;
            // A cutoff of 1 or more is an absolute document count.
            let frequent = if cutoff >= 1.0 {
                doc_freq > cutoff
            } else {
                doc_freq / total > cutoff
            };
            if frequent {
                high.push(token.stem);
            } else {
                low.push(token.stem);
            }
        }

        Prepared::Common {
            field: query.field(),
            low,
            high,
            minimum: query.get_minimum_should_match(),
        }
    }

    fn prepare_query_string<'q>(&self, query: &'q QueryStringQuery) -> Prepared<'q> {
        let terms = query
            .parse()
            .into_iter()
            .map(|term| PreparedTerm {
                match_all: term.text.trim() == "*",
                tokens: self.analyzer.analyze(&term.text),
                field: term.field,
                occur: term.occur,
            })
            .collect();
        Prepared::QueryString(terms)
    }

    /// Score one document; `None` when it does not match.
    pub(crate) fn score(&self, prepared: &Prepared<'_>, attributes: &Attributes) -> Option<f32> {
        match prepared {
            Prepared::All => Some(1.0),
            Prepared::Match {
                field,
                phrases,
                prefix,
                fuzziness,
            } => phrases
                .iter()
                .filter_map(|phrase| {
                    self.phrase_score(field, attributes, phrase, *prefix, *fuzziness)
                })
                .reduce(f32::max),
            Prepared::MultiMatch { query, tokens } => {
                self.multi_match_score(query, tokens, attributes)
            }
            Prepared::Fuzzy { field, expansions } => {
                let mut score: Option<f32> = None;
                for token in self.field_tokens(field, attributes) {
                    if let Some(weight) = expansions.get(&token.text) {
                        score = Some(score.map_or(*weight, |best| best.max(*weight)));
                    }
                }
                score
            }
            Prepared::Common {
                field,
                low,
                high,
                minimum,
            } => self.common_score(field, low, high, *minimum, attributes),
            Prepared::Range(range) => field_values(attributes, range.field)
                .into_iter()
                .any(|value| range.contains(value))
                .then_some(1.0),
            Prepared::Prefix(query) => self.prefix_score(query, attributes),
            Prepared::Regexp(query) => self
                .pattern_matches(query.field(), attributes, |text| query.matches(text))
                .then_some(1.0),
            Prepared::Wildcard(query) => self
                .pattern_matches(query.field(), attributes, |text| query.matches(text))
                .then_some(query.boost()),
            Prepared::Term(query) => self.term_score(query.field(), query.value(), attributes),
            Prepared::Terms(query) => query
                .values()
                .iter()
                .filter_map(|value| self.term_score(query.field(), value, attributes))
                .reduce(f32::max),
            Prepared::QueryString(terms) => self.query_string_score(terms, attributes),
        }
    }

    fn field_tokens(&self, field: &str, attributes: &Attributes) -> Vec<Token> {
        field_values(attributes, field)
            .into_iter()
            .filter_map(value_to_text)
            .flat_map(|text| self.analyzer.analyze(&text))
            .collect()
    }

    /// Phrase match of `phrase` within any single value of `field`.
    fn phrase_score(
        &self,
        field: &str,
        attributes: &Attributes,
        phrase: &[Token],
        prefix: bool,
        fuzziness: Option<Fuzziness>,
    ) -> Option<f32> {
        field_values(attributes, field)
            .into_iter()
            .filter_map(value_to_text)
            .filter_map(|text| {
                let tokens = self.analyzer.analyze(&text);
                phrase_match(&tokens, phrase, prefix, fuzziness)
            })
            .map(|closeness| {
                let weight: f32 = phrase
                    .iter()
                    .map(|token| self.stem_idf(field, &token.stem))
                    .sum();
                weight * closeness
            })
            .reduce(f32::max)
    }

    /// Score of each query token found in `field`, by token.
    fn term_scores(
        &self,
        field: &str,
        attributes: &Attributes,
        tokens: &[Token],
        fuzziness: Option<Fuzziness>,
    ) -> Vec<Option<f32>> {
        let field_tokens = self.field_tokens(field, attributes);
        tokens
            .iter()
            .map(|query_token| {
                field_tokens
                    .iter()
                    .filter_map(|token| token_closeness(token, query_token, false, fuzziness))
                    .reduce(f32::max)
                    .map(|closeness| closeness * self.stem_idf(field, &query_token.stem))
            })
            .collect()
    }

    fn multi_match_score(
        &self,
        query: &MultiMatchQuery,
        tokens: &[Token],
        attributes: &Attributes,
    ) -> Option<f32> {
        if tokens.is_empty() {
            return None;
        }
        let fuzziness = query.fuzziness();

        match query.match_type() {
            MultiMatchType::Phrase | MultiMatchType::PhrasePrefix => {
                let prefix = query.match_type() == MultiMatchType::PhrasePrefix;
                query
                    .fields()
                    .iter()
                    .filter_map(|field| {
                        self.phrase_score(field, attributes, tokens, prefix, fuzziness)
                    })
                    .reduce(f32::max)
            }
            MultiMatchType::BestFields | MultiMatchType::MostFields => {
                let field_scores: Vec<f32> = query
                    .fields()
                    .iter()
                    .filter_map(|field| {
                        self.term_scores(field, attributes, tokens, fuzziness)
                            .into_iter()
                            .flatten()
                            .reduce(|a, b| a + b)
                    })
                    .collect();
                let best = field_scores.iter().copied().reduce(f32::max)?;
                let sum: f32 = field_scores.iter().sum();
                if query.match_type() == MultiMatchType::MostFields {
                    Some(sum)
                } else {
                    Some(best + query.tie_breaker().unwrap_or(0.0) * (sum - best))
                }
            }
            MultiMatchType::CrossFields => {
                let mut per_token: Vec<Option<f32>> = vec![None; tokens.len()];
                for field in query.fields() {
                    let scores = self.term_scores(field, attributes, tokens, fuzziness);
                    for (slot, score) in per_token.iter_mut().zip(scores) {
                        if let Some(score) = score {
                            *slot = Some(slot.map_or(score, |best| best.max(score)));
                        }
                    }
                }
                let matched: Vec<f32> = per_token.iter().flatten().copied().collect();
                let required = match query.operator().unwrap_or_default() {
                    Operator::And => tokens.len(),
                    Operator::Or => 1,
                };
                (matched.len() >= required).then(|| matched.iter().sum())
            }
        }
    }

    fn common_score(
        &self,
        field: &str,
        low: &[String],
        high: &[String],
        minimum: Option<usize>,
        attributes: &Attributes,
    ) -> Option<f32> {
        if low.is_empty() && high.is_empty() {
            return None;
        }
        let present: AHashSet<String> = self
            .field_tokens(field, attributes)
            .into_iter()
            .map(|token| token.stem)
            .collect();

        let low_hits: Vec<&String> = low.iter().filter(|stem| present.contains(*stem)).collect();
        let high_hits: Vec<&String> = high.iter().filter(|stem| present.contains(*stem)).collect();

        let matched = if low.is_empty() {
            // Only frequent terms: all of them are required.
            high_hits.len() == high.len()
        } else {
            low_hits.len() >= minimum.unwrap_or(1).clamp(1, low.len())
        };
        if !matched {
            return None;
        }

        Some(
            low_hits
                .iter()
                .chain(high_hits.iter())
                .map(|stem| self.stem_idf(field, stem))
                .sum(),
        )
    }

    fn prefix_score(&self, query: &PrefixQuery, attributes: &Attributes) -> Option<f32> {
        let raw: Vec<String> = field_values(attributes, query.field())
            .into_iter()
            .filter_map(value_to_text)
            .collect();
        let tokens = self.field_tokens(query.field(), attributes);

        query
            .prefixes()
            .iter()
            .any(|prefix| {
                raw.iter().any(|text| text.starts_with(prefix.as_str()))
                    || tokens.iter().any(|token| token.text.starts_with(prefix.as_str()))
            })
            .then_some(1.0)
    }

    /// Whether the raw value or any token of `field` satisfies `matches`.
    fn pattern_matches<F>(&self, field: &str, attributes: &Attributes, matches: F) -> bool
    where
        F: Fn(&str) -> bool,
    {
        field_values(attributes, field)
            .into_iter()
            .filter_map(value_to_text)
            .any(|text| {
                matches(&text)
                    || self
                        .analyzer
                        .analyze(&text)
                        .iter()
                        .any(|token| matches(&token.text))
            })
    }

    /// Exact value equality, or equality with one token of the value.
    fn term_score(&self, field: &str, expected: &Value, attributes: &Attributes) -> Option<f32> {
        let expected_text = value_to_text(expected)?;
        field_values(attributes, field)
            .into_iter()
            .any(|value| {
                value == expected
                    || value_to_text(value).is_some_and(|text| {
                        text == expected_text
                            || self
                                .analyzer
                                .analyze(&text)
                                .iter()
                                .any(|token| token.text == expected_text)
                    })
            })
            .then(|| self.text_idf(field, &expected_text.to_lowercase()))
    }

    fn query_string_score(&self, terms: &[PreparedTerm], attributes: &Attributes) -> Option<f32> {
        let mut score = 0.0;
        let mut has_must = false;
        let mut should_total = 0usize;
        let mut should_matched = 0usize;

        for term in terms {
            let term_score = self.query_string_term_score(term, attributes);
            match term.occur {
                Occur::MustNot => {
                    if term_score.is_some() {
                        return None;
                    }
                }
                Occur::Must => {
                    has_must = true;
                    score += term_score?;
                }
                Occur::Should => {
                    should_total += 1;
                    if let Some(term_score) = term_score {
                        should_matched += 1;
                        score += term_score;
                    }
                }
            }
        }

        if !has_must && should_total > 0 && should_matched == 0 {
            return None;
        }
        if !has_must && should_total == 0 {
            // Only prohibited terms.
            return Some(1.0);
        }
        Some(score)
    }

    fn query_string_term_score(&self, term: &PreparedTerm, attributes: &Attributes) -> Option<f32> {
        if term.match_all {
            return Some(1.0);
        }
        if term.tokens.is_empty() {
            return None;
        }

        match &term.field {
            Some(field) => self.phrase_score(field, attributes, &term.tokens, false, None),
            None => all_values(attributes)
                .into_iter()
                .filter_map(value_to_text)
                .filter_map(|text| {
                    let tokens = self.analyzer.analyze(&text);
                    phrase_match(&tokens, &term.tokens, false, None)
                })
                .reduce(f32::max)
                .map(|closeness| closeness * term.tokens.len() as f32),
        }
    }
}

/// A query ready to be scored.
pub(crate) enum Prepared<'q> {
    All,
    Match {
        field: &'q str,
        phrases: Vec<Vec<Token>>,
        prefix: bool,
        fuzziness: Option<Fuzziness>,
    },
    MultiMatch {
        query: &'q MultiMatchQuery,
        tokens: Vec<Token>,
    },
    Fuzzy {
        field: &'q str,
        expansions: AHashMap<String, f32>,
    },
    Common {
        field: &'q str,
        low: Vec<String>,
        high: Vec<String>,
        minimum: Option<usize>,
    },
    Range(PreparedRange<'q>),
    Prefix(&'q PrefixQuery),
    Regexp(&'q RegexpQuery),
    Term(&'q TermQuery),
    Terms(&'q TermsQuery),
    Wildcard(&'q WildcardQuery),
    QueryString(Vec<PreparedTerm>),
}

pub(crate) struct PreparedTerm {
    field: Option<String>,
    tokens: Vec<Token>,
    occur: Occur,
    match_all: bool,
}

/// Closeness of a document token to a query token, in `(0, 1]`.
fn token_closeness(
    token: &Token,
    query: &Token,
    prefix: bool,
    fuzziness: Option<Fuzziness>,
) -> Option<f32> {
    if token.stem == query.stem || token.text == query.text {
        return Some(1.0);
    }
    if prefix && (token.text.starts_with(&query.text) || token.stem.starts_with(&query.stem)) {
        return Some(1.0);
    }
    let fuzziness = fuzziness?;
    let max_edits = fuzziness.max_edits(query.stem.chars().count());
    if max_edits == 0 {
        return None;
    }
    edit_distance_within(&token.stem, &query.stem, max_edits)
        .map(|distance| 1.0 - distance as f32 / (max_edits as f32 + 1.0))
}

/// Best closeness of `phrase` appearing as consecutive tokens in `tokens`.
///
/// With `prefix`, the last phrase token only needs to prefix a token.
fn phrase_match(
    tokens: &[Token],
    phrase: &[Token],
    prefix: bool,
    fuzziness: Option<Fuzziness>,
) -> Option<f32> {
    if phrase.is_empty() || tokens.len() < phrase.len() {
        return None;
    }
    let last = phrase.len() - 1;

    tokens
        .windows(phrase.len())
        .filter_map(|window| {
            window
                .iter()
                .zip(phrase)
                .enumerate()
                .map(|(i, (token, query))| {
                    token_closeness(token, query, prefix && i == last, fuzziness)
                })
                .try_fold(0.0f32, |total, closeness| closeness.map(|c| total + c))
                .map(|total| total / phrase.len() as f32)
        })
        .reduce(f32::max)
}

/// How range bounds and document values are compared.
#[derive(Debug, Clone, PartialEq)]
enum RangeValue {
    Number(f64),
    Date(DateTime<FixedOffset>),
    Text(String),
}

impl PartialOrd for RangeValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (RangeValue::Number(a), RangeValue::Number(b)) => a.partial_cmp(b),
            (RangeValue::Date(a), RangeValue::Date(b)) => a.partial_cmp(b),
            (RangeValue::Text(a), RangeValue::Text(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RangeMode {
    Number,
    Date,
    Text,
}

pub(crate) struct PreparedRange<'q> {
    field: &'q str,
    mode: RangeMode,
    lower: Bound<RangeValue>,
    upper: Bound<RangeValue>,
    format: Option<String>,
    offset: FixedOffset,
}

impl<'q> PreparedRange<'q> {
    fn new(query: &'q RangeQuery) -> Result<Self> {
        let offset = match query.time_zone() {
            Some(zone) => parse_time_zone(zone).ok_or_else(|| {
                SearchlightError::query(format!(
                    "invalid time zone '{zone}' in range on '{}'",
                    query.field()
                ))
            })?,
            None => utc_offset(),
        };
        let format = query.format().map(java_to_strftime);

        let bounds = query.bounds();
        let sample = bounds
            .lower()
            .value()
            .or_else(|| bounds.upper().value())
            .ok_or_else(|| {
                SearchlightError::invalid_range(format!("no bounds for '{}'", query.field()))
            })?;

        let mode = match sample {
            Value::Number(_) => RangeMode::Number,
            Value::String(text)
                if parse_date(text, format.as_deref(), offset).is_some() =>
            {
                RangeMode::Date
            }
            _ => RangeMode::Text,
        };

        let convert = |bound: &Bound<Value>| -> Result<Bound<RangeValue>> {
            let to_value = |value: &Value| {
                to_range_value(value, mode, format.as_deref(), offset).ok_or_else(|| {
                    SearchlightError::query(format!(
                        "range bound {value} on '{}' is not comparable",
                        query.field()
                    ))
                })
            };
            Ok(match bound {
                Bound::Included(value) => Bound::Included(to_value(value)?),
                Bound::Excluded(value) => Bound::Excluded(to_value(value)?),
                Bound::Unbounded => Bound::Unbounded,
            })
        };

        let lower = convert(bounds.lower())?;
        let upper = convert(bounds.upper())?;

        Ok(PreparedRange {
            field: query.field(),
            mode,
            lower,
            upper,
            format,
            offset,
        })
    }

    fn contains(&self, value: &Value) -> bool {
        let Some(candidate) = to_range_value(value, self.mode, self.format.as_deref(), self.offset)
        else {
            return false;
        };
        self.lower
            .accepts_lower(|bound| candidate.partial_cmp(bound))
            && self
                .upper
                .accepts_upper(|bound| candidate.partial_cmp(bound))
    }
}

fn utc_offset() -> FixedOffset {
    Utc.fix()
}

fn to_range_value(
    value: &Value,
    mode: RangeMode,
    format: Option<&str>,
    offset: FixedOffset,
) -> Option<RangeValue> {
    match mode {
        RangeMode::Number => match value {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        }
        .map(RangeValue::Number),
        RangeMode::Date => match value {
            Value::String(text) => parse_date(text, format, offset),
            Value::Number(number) => number
                .as_i64()
                .and_then(DateTime::from_timestamp_millis)
                .map(|date| date.fixed_offset()),
            _ => None,
        }
        .map(RangeValue::Date),
        RangeMode::Text => value_to_text(value).map(RangeValue::Text),
    }
}

/// Parse `+01:00`, `-0500`, `Z` or `UTC`.
fn parse_time_zone(zone: &str) -> Option<FixedOffset> {
    let zone = zone.trim();
    if zone.eq_ignore_ascii_case("utc") || zone == "Z" {
        return Some(utc_offset());
    }
    let (sign, rest) = match zone.as_bytes().first()? {
        b'+' => (1, &zone[1..]),
        b'-' => (-1, &zone[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Translate a `yyyy-MM-dd`-style date format; strftime formats pass through.
fn java_to_strftime(format: &str) -> String {
    if format.contains('%') {
        return format.to_string();
    }
    [
        ("yyyy", "%Y"),
        ("MM", "%m"),
        ("dd", "%d"),
        ("HH", "%H"),
        ("mm", "%M"),
        ("ss", "%S"),
    ]
    .iter()
    .fold(format.to_string(), |acc, (java, strftime)| acc.replace(java, strftime))
}

fn parse_date(
    text: &str,
    format: Option<&str>,
    offset: FixedOffset,
) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();
    if text == "now" {
        return Some(Utc::now().fixed_offset());
    }

    let localize = |naive: NaiveDateTime| offset.from_local_datetime(&naive).single();

    if let Some(format) = format {
        if let Ok(date) = DateTime::parse_from_str(text, format) {
            return Some(date);
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return localize(naive);
        }
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return localize(date.and_hms_opt(0, 0, 0)?);
        }
        return None;
    }

    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date);
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return localize(naive);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .and_then(localize)
}

/// Fields whose term statistics a query needs.
fn referenced_fields(query: &QueryKind, fields: &mut AHashSet<String>) {
    match query {
        QueryKind::Match(query) => {
            fields.insert(query.field().to_string());
        }
        QueryKind::MultiMatch(query) => {
            fields.extend(query.fields().iter().cloned());
        }
        QueryKind::Fuzzy(query) => {
            fields.insert(query.field().to_string());
        }
        QueryKind::Common(query) => {
            fields.insert(query.field().to_string());
        }
        QueryKind::Term(query) => {
            fields.insert(query.field().to_string());
        }
        QueryKind::Terms(query) => {
            fields.insert(query.field().to_string());
        }
        QueryKind::QueryString(query) => {
            fields.extend(query.parse().into_iter().filter_map(|term| term.field));
        }
        QueryKind::MatchAll(_)
        | QueryKind::Range(_)
        | QueryKind::Prefix(_)
        | QueryKind::Regexp(_)
        | QueryKind::Wildcard(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::attributes;
    use crate::query::{Bounds, CommonOptions, FuzzyOptions, MatchOptions, QueryBuilder};
    use serde_json::json;

    fn evaluate(query: &QueryKind, documents: &[Attributes]) -> Vec<Option<f32>> {
        let analyzer = Analyzer::standard();
        let refs: Vec<&Attributes> = documents.iter().collect();
        let evaluator = Evaluator::new(&analyzer, &[query], &refs);
        let prepared = evaluator.prepare(query).unwrap();
        documents
            .iter()
            .map(|doc| evaluator.score(&prepared, doc))
            .collect()
    }

    fn first_query(builder: &QueryBuilder<'_>) -> QueryKind {
        builder.clauses()[0].query().clone()
    }

    #[test]
    fn test_field_values_nested_paths() {
        let doc = attributes(json!({
            "author": {"name": "Ann", "tags": ["a", "b"]},
            "items": [{"sku": 1}, {"sku": 2}],
            "dotted.key": "verbatim"
        }));
        assert_eq!(field_values(&doc, "author.name"), vec![&json!("Ann")]);
        assert_eq!(field_values(&doc, "author.tags").len(), 2);
        assert_eq!(field_values(&doc, "items.sku"), vec![&json!(1), &json!(2)]);
        assert_eq!(field_values(&doc, "dotted.key"), vec![&json!("verbatim")]);
        assert!(field_values(&doc, "author.missing").is_empty());
    }

    #[test]
    fn test_match_with_stemming_and_fuzziness() {
        let docs = vec![
            attributes(json!({"name": "Testing"})),
            attributes(json!({"name": "Toast"})),
        ];

        let mut builder = QueryBuilder::standard();
        builder.match_query("name", "Test", MatchOptions { fuzzy: true, ..Default::default() });
        let scores = evaluate(&first_query(&builder), &docs);
        assert!(scores[0].is_some());
        assert!(scores[1].is_none());
    }

    #[test]
    fn test_match_phrase_prefix() {
        let docs = vec![
            attributes(json!({"title": "The quick brown fox"})),
            attributes(json!({"title": "quick red fox"})),
        ];

        let mut builder = QueryBuilder::standard();
        builder.match_query(
            "title",
            "quick bro",
            MatchOptions {
                match_type: MatchType::PhrasePrefix,
                ..Default::default()
            },
        );
        let scores = evaluate(&first_query(&builder), &docs);
        assert!(scores[0].is_some());
        assert!(scores[1].is_none());
    }

    #[test]
    fn test_fuzzy_expansion_limit() {
        let docs = vec![
            attributes(json!({"word": "cart"})),
            attributes(json!({"word": "card"})),
            attributes(json!({"word": "dog"})),
        ];

        let mut builder = QueryBuilder::standard();
        builder.fuzzy("word", "cars", FuzzyOptions::default());
        let scores = evaluate(&first_query(&builder), &docs);
        assert!(scores[0].is_some());
        assert!(scores[1].is_some());
        assert!(scores[2].is_none());

        let mut builder = QueryBuilder::standard();
        builder.fuzzy(
            "word",
            "cars",
            FuzzyOptions {
                max_expansions: 1,
                ..Default::default()
            },
        );
        let matched = evaluate(&first_query(&builder), &docs)
            .iter()
            .filter(|score| score.is_some())
            .count();
        assert_eq!(matched, 1);
    }

    #[test]
    fn test_common_terms_require_a_rare_term() {
        let docs = vec![
            attributes(json!({"body": "the quick fox"})),
            attributes(json!({"body": "the lazy dog"})),
            attributes(json!({"body": "the end"})),
        ];

        let mut builder = QueryBuilder::standard();
        builder.common(
            "body",
            "the fox",
            CommonOptions {
                cutoff_frequency: 0.5,
                ..Default::default()
            },
        );
        let scores = evaluate(&first_query(&builder), &docs);
        assert!(scores[0].is_some());
        assert!(scores[1].is_none());
        assert!(scores[2].is_none());
    }

    #[test]
    fn test_numeric_and_date_ranges() {
        let docs = vec![
            attributes(json!({"age": 30, "born": "1990-05-01"})),
            attributes(json!({"age": "45", "born": "2001-01-01T10:00:00Z"})),
        ];

        let mut builder = QueryBuilder::standard();
        builder.range("age", Bounds::new().gte(18).lt(40), Default::default()).unwrap();
        assert_eq!(evaluate(&first_query(&builder), &docs), vec![Some(1.0), None]);

        let mut builder = QueryBuilder::standard();
        builder.range("born", Bounds::new().gt("2000-01-01"), Default::default()).unwrap();
        assert_eq!(evaluate(&first_query(&builder), &docs), vec![None, Some(1.0)]);
    }

    #[test]
    fn test_time_zone_parsing() {
        assert_eq!(parse_time_zone("+01:00"), FixedOffset::east_opt(3600));
        assert_eq!(parse_time_zone("-0530"), FixedOffset::east_opt(-(5 * 3600 + 30 * 60)));
        assert_eq!(parse_time_zone("UTC"), Some(utc_offset()));
        assert_eq!(parse_time_zone("Europe/Paris"), None);
    }

    #[test]
    fn test_java_format_translation() {
        assert_eq!(java_to_strftime("yyyy-MM-dd"), "%Y-%m-%d");
        assert_eq!(java_to_strftime("%d/%m/%Y"), "%d/%m/%Y");
    }

    #[test]
    fn test_term_matches_raw_value_or_token() {
        let docs = vec![
            attributes(json!({"status": "Published", "count": 3})),
            attributes(json!({"status": "draft", "count": 4})),
        ];

        let mut builder = QueryBuilder::standard();
        builder.term("status", "published");
        assert!(evaluate(&first_query(&builder), &docs)[0].is_some());

        let mut builder = QueryBuilder::standard();
        builder.term("count", 4);
        let scores = evaluate(&first_query(&builder), &docs);
        assert!(scores[0].is_none());
        assert!(scores[1].is_some());
    }

    #[test]
    fn test_query_string_roles() {
        let docs = vec![
            attributes(json!({"title": "rust async io", "tag": "draft"})),
            attributes(json!({"title": "rust sync io", "tag": "final"})),
        ];

        let mut builder = QueryBuilder::standard();
        builder.query_string("+rust -tag:draft");
        let scores = evaluate(&first_query(&builder), &docs);
        assert!(scores[0].is_none());
        assert!(scores[1].is_some());

        let mut builder = QueryBuilder::standard();
        builder.query_string("\"async io\"");
        let scores = evaluate(&first_query(&builder), &docs);
        assert!(scores[0].is_some());
        assert!(scores[1].is_none());
    }
}
