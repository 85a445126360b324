//! Command implementations for the Searchlight CLI.

use std::fs;
use std::path::Path;

use log::{info, warn};
use serde_json::Value;

use crate::analysis::Analyzer;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::{DriverConfig, SearchConfig};
use crate::document::{Attributes, DocumentBatch, DocumentId};
use crate::driver::{Driver, MemoryDriver};
use crate::error::{Result, SearchlightError};
use crate::result::QueryStatistics;

/// Execute a CLI command.
pub fn execute_command(args: SearchlightArgs) -> Result<()> {
    match &args.command {
        Command::Search(search_args) => search_documents(search_args, &args),
        Command::ValidateConfig(validate_args) => validate_config(validate_args, &args),
    }
}

/// Load documents into an in-memory driver and search them.
fn search_documents(args: &SearchArgs, cli_args: &SearchlightArgs) -> Result<()> {
    let documents = load_documents(&args.document_file)?;
    let loaded = documents.len();
    info!(
        "loaded {loaded} documents from {}",
        args.document_file.display()
    );

    let analyzer = if args.no_stemming {
        Analyzer::exact()
    } else {
        Analyzer::standard()
    };
    let driver = MemoryDriver::with_analyzer(analyzer);
    driver.add_multiple(&args.category, to_batch(documents, args.id_field.as_deref())?)?;

    let mut builder = driver.query_builder();
    match args.query.as_deref().map(str::trim) {
        Some(query) if !query.is_empty() => {
            builder.query_string(query);
        }
        _ => {
            builder.match_all();
        }
    }

    let page = driver.paginate(
        &[args.category.as_str()],
        builder.clauses(),
        args.page,
        args.per_page,
        None,
    )?;

    let output = SearchOutput {
        query: args.query.clone(),
        documents_loaded: loaded,
        page: page.page(),
        per_page: page.per_page(),
        last_page: page.last_page(),
        total_hits: page.total_hits(),
        max_score: page.max_score(),
        duration_ms: page.total_time() * 1000.0,
        hits: page
            .iter()
            .map(|hit| HitOutput {
                id: hit.id().map(str::to_string),
                category: hit.category().map(str::to_string),
                score: hit.score().unwrap_or(0.0),
                source: hit.to_json(),
            })
            .collect(),
    };

    output_result("Search completed", &output, cli_args)
}

/// Load and report a driver configuration.
fn validate_config(args: &ValidateConfigArgs, cli_args: &SearchlightArgs) -> Result<()> {
    let config = SearchConfig::from_file(&args.config_file)?;

    let drivers = config
        .drivers
        .iter()
        .map(|(name, driver)| DriverReport {
            name: name.clone(),
            kind: driver.kind().to_string(),
            detail: match driver {
                DriverConfig::Elastic(elastic) => {
                    Some(format!("{} index '{}'", elastic.base_url(), elastic.index))
                }
                DriverConfig::Memory(memory) => Some(format!("stemming: {}", memory.stemming)),
                DriverConfig::Null => None,
            },
        })
        .collect();

    output_result(
        "Configuration is valid",
        &ConfigReport {
            path: args.config_file.display().to_string(),
            default_driver: config.default_driver.clone(),
            drivers,
        },
        cli_args,
    )
}

/// Read documents from a JSON array file or a JSONL file.
///
/// Invalid JSONL lines and non-object entries are skipped with a warning.
pub fn load_documents(path: &Path) -> Result<Vec<Attributes>> {
    let content = fs::read_to_string(path)?;
    let trimmed = content.trim_start();

    let values: Vec<Value> = if trimmed.starts_with('[') {
        serde_json::from_str(trimmed)?
    } else {
        let mut values = Vec::new();
        for (line_num, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Value>(line) {
                Ok(value) => values.push(value),
                Err(e) => warn!("skipping line {}: {e}", line_num + 1),
            }
        }
        values
    };

    Ok(values
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| match value {
            Value::Object(map) => Some(map),
            other => {
                warn!("skipping entry {}: not an object ({other})", i + 1);
                None
            }
        })
        .collect())
}

/// Key documents by `id_field`, or by their 1-based position.
fn to_batch(documents: Vec<Attributes>, id_field: Option<&str>) -> Result<DocumentBatch> {
    let mut batch = DocumentBatch::new();
    for (i, attributes) in documents.into_iter().enumerate() {
        let id = match id_field {
            Some(field) => {
                let value = attributes.get(field);
                if let Some(id) = value.and_then(Value::as_i64) {
                    DocumentId::Integer(id)
                } else if let Some(id) = value.and_then(Value::as_str) {
                    DocumentId::from(id)
                } else {
                    return Err(SearchlightError::invalid_argument(format!(
                        "document {} has no usable '{field}' id",
                        i + 1
                    )));
                }
            }
            None => DocumentId::Integer(i as i64 + 1),
        };
        batch.insert(id, attributes);
    }
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_json_array() {
        let file = temp_file(r#"[{"title": "a"}, {"title": "b"}, 3]"#);
        let documents = load_documents(file.path()).unwrap();
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[1]["title"], "b");
    }

    #[test]
    fn test_load_jsonl_skips_bad_lines() {
        let file = temp_file("{\"title\": \"a\"}\n\nnot json\n{\"title\": \"b\"}\n");
        let documents = load_documents(file.path()).unwrap();
        assert_eq!(documents.len(), 2);
    }

    #[test]
    fn test_to_batch_ids() {
        let file = temp_file(r#"[{"sku": "x-1"}, {"sku": 7}]"#);
        let documents = load_documents(file.path()).unwrap();

        let batch = to_batch(documents.clone(), Some("sku")).unwrap();
        assert!(batch.contains_key(&DocumentId::from("x-1")));
        assert!(batch.contains_key(&DocumentId::from(7)));

        let batch = to_batch(documents.clone(), None).unwrap();
        assert!(batch.contains_key(&DocumentId::from(2)));

        assert!(to_batch(documents, Some("missing")).is_err());
    }
}
