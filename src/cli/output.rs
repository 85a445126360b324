//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cli::args::{OutputFormat, SearchlightArgs};
use crate::error::Result;

/// One hit of a search.
#[derive(Debug, Serialize, Deserialize)]
pub struct HitOutput {
    pub id: Option<String>,
    pub category: Option<String>,
    pub score: f32,
    pub source: Value,
}

/// Result structure for search operations.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchOutput {
    pub query: Option<String>,
    pub documents_loaded: usize,
    pub page: usize,
    pub per_page: usize,
    pub last_page: usize,
    pub total_hits: u64,
    pub max_score: f32,
    pub duration_ms: f64,
    pub hits: Vec<HitOutput>,
}

/// One configured driver.
#[derive(Debug, Serialize, Deserialize)]
pub struct DriverReport {
    pub name: String,
    pub kind: String,
    pub detail: Option<String>,
}

/// Result structure for configuration validation.
#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigReport {
    pub path: String,
    pub default_driver: Option<String>,
    pub drivers: Vec<DriverReport>,
}

/// Human-readable rendering of a command result.
pub trait HumanOutput {
    /// Print the result to stdout.
    fn print_human(&self);
}

impl HumanOutput for SearchOutput {
    fn print_human(&self) {
        println!("Search Results:");
        println!("═══════════════");

        for (i, hit) in self.hits.iter().enumerate() {
            println!();
            println!(
                "Result {}: {} (Score: {:.3})",
                (self.page - 1) * self.per_page + i + 1,
                hit.id.as_deref().unwrap_or("-"),
                hit.score
            );
            println!("─────────────");

            if let Some(fields) = hit.source.as_object() {
                for (field_name, field_value) in fields {
                    println!("{field_name}: {}", format_value(field_value));
                }
            }
        }

        println!();
        println!("Total hits: {}", self.total_hits);
        println!("Page {} of {}", self.page, self.last_page);
        println!("Search time: {:.3}ms", self.duration_ms);
    }
}

impl HumanOutput for ConfigReport {
    fn print_human(&self) {
        println!("Configuration: {}", self.path);
        println!(
            "Default driver: {}",
            self.default_driver.as_deref().unwrap_or("(not set)")
        );
        println!();
        println!("Drivers:");
        println!("────────");
        for driver in &self.drivers {
            match &driver.detail {
                Some(detail) => println!("  {} ({}): {detail}", driver.name, driver.kind),
                None => println!("  {} ({})", driver.name, driver.kind),
            }
        }
    }
}

/// Output a result in the specified format.
pub fn output_result<T>(message: &str, result: &T, args: &SearchlightArgs) -> Result<()>
where
    T: Serialize + HumanOutput,
{
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 1 {
                println!("{message}");
                println!();
            }
            result.print_human();
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &SearchlightArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Format a JSON value for display.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(items) => items
            .iter()
            .map(format_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&json!("hello")), "hello");
        assert_eq!(format_value(&json!(42)), "42");
        assert_eq!(format_value(&json!(true)), "true");
        assert_eq!(format_value(&json!(null)), "null");
        assert_eq!(format_value(&json!(["a", 1])), "a, 1");
        assert_eq!(format_value(&json!({"k": 1})), r#"{"k":1}"#);
    }

    #[test]
    fn test_search_output_serialization() {
        let output = SearchOutput {
            query: Some("rust".to_string()),
            documents_loaded: 3,
            page: 1,
            per_page: 10,
            last_page: 1,
            total_hits: 1,
            max_score: 1.0,
            duration_ms: 0.5,
            hits: vec![HitOutput {
                id: Some("1".to_string()),
                category: Some("documents".to_string()),
                score: 1.0,
                source: json!({"title": "Rust"}),
            }],
        };
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["hits"][0]["source"]["title"], "Rust");
        assert_eq!(value["total_hits"], 1);
    }
}
