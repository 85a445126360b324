use std::sync::Arc;

use parking_lot::Mutex;
use searchlight::prelude::*;
use serde_json::{Value, json};

fn catalog() -> Result<MemoryDriver> {
    let driver = MemoryDriver::new();
    driver.add(
        "products",
        &DocumentId::from(1),
        attributes(json!({"name": "Testing", "category": "book", "price": 12})),
    )?;
    driver.add(
        "products",
        &DocumentId::from(2),
        attributes(json!({"name": "Testing", "category": "movie", "price": 30})),
    )?;
    driver.add(
        "products",
        &DocumentId::from(3),
        attributes(json!({"name": "Gardening", "category": "book", "price": 45})),
    )?;
    Ok(driver)
}

#[test]
fn test_add_then_match_all() -> Result<()> {
    let driver = MemoryDriver::new();
    driver.add("c", &DocumentId::from(1), attributes(json!({"a": 1, "b": "x"})))?;

    let mut builder = driver.query_builder();
    builder.match_all();
    let results = driver.get(&["c"], builder.clauses())?;

    assert_eq!(results.total_hits(), 1, "Should find exactly one document");
    assert_eq!(results[0].get("a").as_integer(), Some(1));
    assert_eq!(results[0].get("b").as_text(), Some("x"));
    assert_eq!(results[0].id(), Some("1"));

    Ok(())
}

#[test]
fn test_adding_same_id_twice_keeps_one_document() -> Result<()> {
    let driver = MemoryDriver::new();
    driver.add("c", &DocumentId::from(1), attributes(json!({"a": 1})))?;
    driver.add("c", &DocumentId::from(1), attributes(json!({"a": 2})))?;

    let results = driver.get(&["c"], &[])?;
    assert_eq!(results.len(), 1);
    assert_eq!(results.total_hits(), 1);
    assert_eq!(results[0].get("a").as_integer(), Some(2), "Later write wins");

    Ok(())
}

#[test]
fn test_delete_removes_document() -> Result<()> {
    let driver = MemoryDriver::new();
    driver.add("c", &DocumentId::from(1), attributes(json!({"a": 1})))?;
    driver.delete("c", &DocumentId::from(1))?;

    assert!(driver.get(&["c"], &[])?.is_empty());

    let err = driver.delete("c", &DocumentId::from(1)).unwrap_err();
    assert!(err.is_not_found(), "Deleting a missing document should fail: {err}");

    Ok(())
}

#[test]
fn test_text_and_integer_ids_address_same_document() -> Result<()> {
    let driver = MemoryDriver::new();
    driver.add("c", &DocumentId::from(7), attributes(json!({"a": 1})))?;
    driver.delete("c", &DocumentId::from("7"))?;
    assert_eq!(driver.document_count("c"), 0);

    Ok(())
}

#[test]
fn test_nested_attributes_are_addressable() -> Result<()> {
    let driver = MemoryDriver::new();
    driver.add(
        "c",
        &DocumentId::from(1),
        attributes(json!({"b": {"c": 2}, "tags": ["x", {"d": true}]})),
    )?;

    let results = driver.get(&[], &[])?;
    let hit = &results[0];
    assert_eq!(hit.get("b").get("c").as_integer(), Some(2));
    assert!(hit.get("b").get("missing").is_null());
    assert!(hit.get("missing").get("c").is_null());

    let tags = hit.get("tags").as_list().unwrap();
    assert_eq!(tags[0].as_text(), Some("x"));
    assert_eq!(tags[1].get("d").as_boolean(), Some(true));

    Ok(())
}

#[test]
fn test_paginate_first_page() -> Result<()> {
    let driver = catalog()?;

    let page = driver.paginate(&["products"], &[], 1, 2, None)?;
    assert_eq!(page.len(), 2);
    assert_eq!(page.total(), 3);
    assert_eq!(page.per_page(), 2);
    assert_eq!(page.last_page(), 2);
    assert!(page.has_more_pages());
    assert_eq!(page.ids(), vec!["1".to_string(), "2".to_string()]);

    Ok(())
}

#[test]
fn test_paginate_second_page_and_explicit_offset() -> Result<()> {
    let driver = catalog()?;

    let page = driver.paginate(&["products"], &[], 2, 2, None)?;
    assert_eq!(page.ids(), vec!["3".to_string()]);
    assert!(!page.has_more_pages());

    let shifted = driver.paginate(&["products"], &[], 1, 2, Some(1))?;
    assert_eq!(shifted.ids(), vec!["2".to_string(), "3".to_string()]);
    assert_eq!(shifted.total(), 3);

    Ok(())
}

#[test]
fn test_must_filters_and_should_ranks() -> Result<()> {
    let driver = MemoryDriver::new();
    driver.add(
        "products",
        &DocumentId::from(1),
        attributes(json!({"name": "Testing", "category": "movie"})),
    )?;
    driver.add(
        "products",
        &DocumentId::from(2),
        attributes(json!({"name": "Testing", "category": "book"})),
    )?;
    driver.add(
        "products",
        &DocumentId::from(3),
        attributes(json!({"name": "Cooking", "category": "book"})),
    )?;

    let mut builder = driver.query_builder();
    builder
        .match_query("name", "Test", MatchOptions { fuzzy: true, ..Default::default() })
        .must();
    builder.match_query("category", "book", MatchOptions::default());

    let results = driver.get(&["products"], builder.clauses())?;
    assert_eq!(results.ids(), vec!["2".to_string(), "1".to_string()]);
    assert!(results[0].score() > results[1].score(), "SHOULD match ranks first");
    assert_eq!(results.max_score(), results[0].score());

    Ok(())
}

#[test]
fn test_should_only_requires_one_match() -> Result<()> {
    let driver = catalog()?;

    let mut builder = driver.query_builder();
    builder.term("category", "movie");
    builder.term("name", "gardening");

    let mut ids = driver.get(&[], builder.clauses())?.ids();
    ids.sort();
    assert_eq!(ids, vec!["2".to_string(), "3".to_string()]);

    Ok(())
}

#[test]
fn test_must_not_excludes() -> Result<()> {
    let driver = catalog()?;

    let mut builder = driver.query_builder();
    builder.match_all().must();
    builder.term("category", "book").must_not();

    let results = driver.get(&["products"], builder.clauses())?;
    assert_eq!(results.ids(), vec!["2".to_string()]);

    Ok(())
}

#[test]
fn test_numeric_range() -> Result<()> {
    let driver = catalog()?;

    let mut builder = driver.query_builder();
    builder
        .range("price", Bounds::new().gte(12).lt(45), RangeOptions::default())?
        .must();

    let results = driver.get(&["products"], builder.clauses())?;
    assert_eq!(results.ids(), vec!["1".to_string(), "2".to_string()]);

    Ok(())
}

#[test]
fn test_empty_range_is_rejected() {
    let driver = MemoryDriver::new();
    let mut builder = driver.query_builder();

    let err = builder
        .range("price", Bounds::new(), RangeOptions::default())
        .unwrap_err();
    assert!(matches!(err, SearchlightError::InvalidRange(_)));
    assert!(builder.is_empty(), "A rejected range must not be appended");
}

#[test]
fn test_prefix_and_wildcard() -> Result<()> {
    let driver = catalog()?;

    let mut builder = driver.query_builder();
    builder.prefix("name", "Gard").must();
    assert_eq!(driver.get(&[], builder.clauses())?.ids(), vec!["3".to_string()]);

    let mut builder = driver.query_builder();
    builder
        .wildcard("category", "mo?ie", WildcardOptions::default())?
        .must();
    assert_eq!(driver.get(&[], builder.clauses())?.ids(), vec!["2".to_string()]);

    Ok(())
}

#[test]
fn test_terms_matches_any_value() -> Result<()> {
    let driver = catalog()?;

    let mut builder = driver.query_builder();
    builder.terms("price", json!([30, 45])).must();

    let results = driver.get(&[], builder.clauses())?;
    assert_eq!(results.ids(), vec!["2".to_string(), "3".to_string()]);

    Ok(())
}

#[test]
fn test_query_string_required_and_prohibited() -> Result<()> {
    let driver = catalog()?;

    let mut builder = driver.query_builder();
    builder.query_string("+category:book -name:gardening").must();

    let results = driver.get(&[], builder.clauses())?;
    assert_eq!(results.ids(), vec!["1".to_string()]);

    Ok(())
}

#[test]
fn test_batch_add_is_searchable_after_the_batch() -> Result<()> {
    let driver = MemoryDriver::new();
    let mut batch = DocumentBatch::new();
    batch.insert(DocumentId::from(1), attributes(json!({"a": 1})));
    batch.insert(DocumentId::from("two"), attributes(json!({"a": 2})));

    driver.add_multiple("c", batch)?;
    assert_eq!(driver.pending_count(), 0);
    assert_eq!(driver.document_count("c"), 2);

    Ok(())
}

#[test]
fn test_writes_chain() -> Result<()> {
    let driver = MemoryDriver::new();
    driver
        .add("c", &DocumentId::from(1), attributes(json!({"a": 1})))?
        .add("c", &DocumentId::from(2), attributes(json!({"a": 2})))?
        .delete("c", &DocumentId::from(1))?;

    assert_eq!(driver.get(&[], &[])?.ids(), vec!["2".to_string()]);

    Ok(())
}

#[test]
fn test_null_driver_accepts_everything_and_finds_nothing() -> Result<()> {
    let driver = NullDriver::new();
    driver.add("c", &DocumentId::from(1), attributes(json!({"a": 1})))?;
    driver.delete("c", &DocumentId::from(1))?;

    let mut builder = driver.query_builder();
    builder.match_all().must();

    let results = driver.get(&["c"], builder.clauses())?;
    assert!(results.is_empty());
    assert_eq!(results.total_hits(), 0);

    let page = driver.paginate(&["c"], builder.clauses(), 0, 0, None)?;
    assert!(page.is_empty());
    assert_eq!(page.page(), 1);
    assert_eq!(page.per_page(), 1);

    Ok(())
}

/// Client answering every search with no hits and keeping the request bodies.
#[derive(Debug, Default)]
struct CapturingClient {
    bodies: Mutex<Vec<Value>>,
}

impl SearchClient for CapturingClient {
    fn search(&self, _index: &str, _types: &[&str], body: &Value) -> Result<Value> {
        self.bodies.lock().push(body.clone());
        Ok(json!({"took": 0, "hits": {"total": {"value": 0}, "max_score": null, "hits": []}}))
    }

    fn index(&self, _index: &str, _doc_type: &str, _id: &str, _body: &Value) -> Result<Value> {
        Ok(json!({"result": "created"}))
    }

    fn bulk(&self, _operations: &[Value]) -> Result<Value> {
        Ok(json!({"errors": false, "items": []}))
    }

    fn delete(&self, _index: &str, _doc_type: &str, _id: &str) -> Result<Value> {
        Ok(json!({"result": "deleted"}))
    }

    fn refresh(&self, _index: &str) -> Result<()> {
        Ok(())
    }
}

#[test]
fn test_match_values_are_separate_phrases_on_every_driver() -> Result<()> {
    let memory = MemoryDriver::new();
    memory.add("books", &DocumentId::from(1), attributes(json!({"title": "book about rust"})))?;
    memory.add("books", &DocumentId::from(2), attributes(json!({"title": "iron nails"})))?;

    let mut builder = memory.query_builder();
    builder
        .match_query("title", json!(["rust", "book"]), MatchOptions::default())
        .must();
    let clauses = builder.into_clauses();

    let results = memory.get(&["books"], &clauses)?;
    assert_eq!(results.ids(), vec!["1".to_string()]);

    let client = Arc::new(CapturingClient::default());
    let elastic = ElasticDriver::new(client.clone(), "main");
    elastic.get(&["books"], &clauses)?;

    let body = &client.bodies.lock()[0];
    assert_eq!(
        body["query"]["bool"]["must"][0],
        json!({"bool": {
            "should": [
                {"match_phrase": {"title": {"query": "rust"}}},
                {"match_phrase": {"title": {"query": "book"}}}
            ],
            "minimum_should_match": 1
        }}),
        "Each value should be sent as its own phrase"
    );

    Ok(())
}
