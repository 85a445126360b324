//! Document identity and attribute types.
//!
//! Every indexed document is addressed by a category name plus a
//! [`DocumentId`], and carries an [`Attributes`] mapping extracted by the
//! model layer.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Attribute mapping of a single document, as handed over by the model layer.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// Batch input for multi-document indexing: identifier to attributes.
pub type DocumentBatch = BTreeMap<DocumentId, Attributes>;

/// Caller-supplied document identifier.
///
/// Backends address documents by the string form of the identifier, so
/// `DocumentId::Integer(7)` and `DocumentId::Text("7")` refer to the same
/// document.
///
/// # Examples
///
/// ```
/// use searchlight::document::DocumentId;
///
/// let id = DocumentId::from(42);
/// assert_eq!(id.to_string(), "42");
///
/// let id = DocumentId::from("isbn-0451");
/// assert_eq!(id.as_key(), "isbn-0451");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentId {
    /// Integer identifier (typical database primary key).
    Integer(i64),
    /// Text identifier.
    Text(String),
}

impl DocumentId {
    /// The backend key for this identifier.
    pub fn as_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentId::Integer(id) => write!(f, "{id}"),
            DocumentId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for DocumentId {
    fn from(id: i64) -> Self {
        DocumentId::Integer(id)
    }
}

impl From<i32> for DocumentId {
    fn from(id: i32) -> Self {
        DocumentId::Integer(i64::from(id))
    }
}

impl From<u32> for DocumentId {
    fn from(id: u32) -> Self {
        DocumentId::Integer(i64::from(id))
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        DocumentId::Text(id.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        DocumentId::Text(id)
    }
}

/// Build an [`Attributes`] mapping from a JSON object literal.
///
/// Non-object values produce an empty mapping.
pub fn attributes(value: serde_json::Value) -> Attributes {
    match value {
        serde_json::Value::Object(map) => map,
        _ => Attributes::new(),
    }
}
