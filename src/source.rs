use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Document id as exported: Mongo extended JSON `{"$oid": ".."}` or a plain string.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum DocumentId {
    ObjectId {
        #[serde(rename = "$oid")]
        oid: String,
    },
    Plain(String),
}

impl DocumentId {
    pub fn as_str(&self) -> &str {
        match self {
            DocumentId::ObjectId { oid } => oid,
            DocumentId::Plain(s) => s,
        }
    }

    /// Creation time embedded in the first four bytes of an ObjectId.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let hex = self.as_str();
        if hex.len() != 24 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let secs = u32::from_str_radix(&hex[..8], 16).ok()?;
        DateTime::from_timestamp(i64::from(secs), 0)
    }
}

/// One article document as stored in the `notes` collection.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    #[serde(rename = "Topic", alias = "topic")]
    pub topic: Option<String>,
    /// String, printed list string, or array of lines.
    #[serde(rename = "Notes")]
    pub notes: Option<Value>,
    #[serde(rename = "notes")]
    pub notes_plain: Option<String>,
    #[serde(rename = "Subject")]
    pub subject: Option<String>,
    #[serde(rename = "subject")]
    pub subject_lower: Option<String>,
}

impl RawRecord {
    /// First non-empty of `Subject` and `subject`.
    pub fn subject(&self) -> Option<&str> {
        [&self.subject, &self.subject_lower]
            .into_iter()
            .filter_map(|s| s.as_deref())
            .find(|s| !s.is_empty())
    }
}

/// Read a JSON array export of the collection.
pub fn load_documents(path: &Path) -> Result<Vec<Value>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading notes export {}", path.display()))?;
    let docs: Vec<Value> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON array of documents", path.display()))?;
    debug!(count = docs.len(), path = %path.display(), "loaded documents");
    Ok(docs)
}

/// Documents that fit the record shape; the rest are logged and skipped.
pub fn parse_records(docs: &[Value]) -> Vec<RawRecord> {
    docs.iter()
        .enumerate()
        .filter_map(|(i, doc)| match RawRecord::deserialize(doc) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(index = i, error = %e, "skipping unreadable document");
                None
            }
        })
        .collect()
}

/// Distinct non-empty `Subject` values, then distinct `subject` values.
pub fn raw_subjects(docs: &[Value]) -> Vec<&str> {
    let mut out = Vec::new();
    for field in ["Subject", "subject"] {
        let mut seen = HashSet::new();
        for value in docs.iter().filter_map(|d| d.get(field)?.as_str()) {
            if !value.is_empty() && seen.insert(value) {
                out.push(value);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_id_timestamp() {
        let id = DocumentId::ObjectId {
            oid: "65a1b2c3d4e5f6a7b8c9d0e1".into(),
        };
        let ts = id.created_at().unwrap();
        assert_eq!(ts.timestamp(), 0x65a1b2c3);
        assert_eq!(ts.format("%Y-%m-%d").to_string(), "2024-01-12");
    }

    #[test]
    fn plain_id_without_timestamp() {
        assert!(DocumentId::Plain("article-7".into()).created_at().is_none());
        assert!(DocumentId::Plain("zz".repeat(12)).created_at().is_none());
    }

    #[test]
    fn record_shapes() {
        let doc = json!({
            "_id": {"$oid": "65a1b2c3d4e5f6a7b8c9d0e1"},
            "Topic": "# Hello",
            "Notes": ["a", "b"],
            "subject": "networking"
        });
        let record = RawRecord::deserialize(&doc).unwrap();
        assert_eq!(record.id.as_str(), "65a1b2c3d4e5f6a7b8c9d0e1");
        assert_eq!(record.topic.as_deref(), Some("# Hello"));
        assert_eq!(record.subject(), Some("networking"));

        let plain = RawRecord::deserialize(&json!({"_id": "x1"})).unwrap();
        assert_eq!(plain.id, DocumentId::Plain("x1".into()));
        assert!(plain.notes.is_none());
        assert_eq!(plain.subject(), None);

        let lower = RawRecord::deserialize(&json!({"_id": "x2", "topic": "# Hello"})).unwrap();
        assert_eq!(lower.topic.as_deref(), Some("# Hello"));
    }

    #[test]
    fn upper_subject_wins_unless_empty() {
        let both = RawRecord::deserialize(&json!({"_id": "a", "Subject": "A", "subject": "b"})).unwrap();
        assert_eq!(both.subject(), Some("A"));
        let empty = RawRecord::deserialize(&json!({"_id": "a", "Subject": "", "subject": "b"})).unwrap();
        assert_eq!(empty.subject(), Some("b"));
    }

    #[test]
    fn bad_documents_skipped() {
        let docs = vec![
            json!({"_id": "ok"}),
            json!({"Topic": "no id"}),
            json!({"_id": "bad", "Subject": 42}),
            json!("not an object"),
        ];
        let records = parse_records(&docs);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id.as_str(), "ok");
    }

    #[test]
    fn subjects_by_field_then_first_seen() {
        let docs = vec![
            json!({"_id": "1", "Subject": "ML"}),
            json!({"_id": "2", "subject": "Cloud"}),
            json!({"_id": "3", "Subject": "ML"}),
            json!({"_id": "4", "Subject": ""}),
            json!({"_id": "5", "Subject": "Nets", "subject": "ML"}),
        ];
        assert_eq!(raw_subjects(&docs), vec!["ML", "Nets", "Cloud", "ML"]);
    }
}
