/// Collection paths, documents and snapshot ordering
///
/// Documents are schemaless JSON field maps. The backing store is the
/// single writer of identifiers and creation timestamps; clients only
/// ever hand over field maps.
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

/// Slash-joined path addressing a collection or sub-collection
/// (`posts`, `posts/{id}/comments`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath(String);

impl CollectionPath {
    /// Top-level collection
    pub fn root(name: &str) -> Self {
        Self(name.to_string())
    }

    /// Sub-collection under one document of this collection
    pub fn subcollection(&self, doc_id: Uuid, name: &str) -> Self {
        Self(format!("{}/{}/{}", self.0, doc_id, name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored record: store-assigned id and server timestamp plus the
/// caller-supplied fields
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub fields: Map<String, Value>,
}

impl Document {
    /// String field accessor; absent or non-string fields read as empty
    /// rather than failing
    pub fn str_field(&self, name: &str) -> String {
        self.fields
            .get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }
}

/// Complete ordered materialization of a collection at one
/// server-observed point in time
pub type Snapshot = Vec<Document>;

/// Sort direction for subscription ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Ordering requested when opening a subscription
#[derive(Debug, Clone)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

impl OrderBy {
    /// Order by the server-assigned creation timestamp, the only order
    /// key the backends serve
    pub fn created_at(direction: Direction) -> Self {
        Self {
            field: "created_at".to_string(),
            direction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subcollection_path_joins_segments() {
        let post_id = Uuid::new_v4();
        let path = CollectionPath::root("posts").subcollection(post_id, "comments");
        assert_eq!(path.as_str(), format!("posts/{}/comments", post_id));
    }

    #[test]
    fn missing_fields_read_as_empty() {
        let doc = Document {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            fields: Map::new(),
        };
        assert_eq!(doc.str_field("username"), "");
    }

    #[test]
    fn non_string_fields_read_as_empty() {
        let mut fields = Map::new();
        fields.insert("text".to_string(), serde_json::json!(42));
        let doc = Document {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            fields,
        };
        assert_eq!(doc.str_field("text"), "");
    }
}
