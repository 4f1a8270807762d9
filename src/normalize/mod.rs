pub mod cleaner;
pub mod read_time;
pub mod subjects;
pub mod tokenizer;

use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::source::RawRecord;
use subjects::SubjectTable;

const UNKNOWN_DATE: &str = "1970-01-01";

/// Article as served to the frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRecord {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub category: String,
    pub date: String,
    pub read_time: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Error)]
pub enum NotesError {
    #[error("notes entry {index} is {kind}, expected text")]
    NonTextEntry { index: usize, kind: &'static str },
}

/// Four-stage pipeline: notes → content → excerpt/category/read time.
pub fn normalize_record(record: &RawRecord, subjects: &SubjectTable) -> DisplayRecord {
    let content = notes_content(record);
    let category = subjects.canonicalize(record.subject());
    let date = match record.id.created_at() {
        Some(ts) => ts.format("%Y-%m-%d").to_string(),
        None => {
            warn!(id = record.id.as_str(), "id carries no timestamp, using epoch date");
            UNKNOWN_DATE.to_string()
        }
    };

    DisplayRecord {
        id: record.id.as_str().to_string(),
        title: cleaner::clean_title(record.topic.as_deref()),
        excerpt: cleaner::excerpt(&content),
        read_time: read_time::read_time(&content),
        tags: vec![category.clone()],
        category,
        date,
        content,
    }
}

/// Normalize a batch in parallel, newest first.
pub fn normalize_all(records: &[RawRecord], subjects: &SubjectTable) -> Vec<DisplayRecord> {
    let mut keyed: Vec<_> = records
        .par_iter()
        .map(|r| {
            let key = (r.id.created_at(), r.id.as_str().to_ascii_lowercase());
            (key, normalize_record(r, subjects))
        })
        .collect();
    // Timestamp first, then hex; ids without a timestamp go last.
    keyed.sort_by(|(a, _), (b, _)| b.cmp(a));
    keyed.into_iter().map(|(_, d)| d).collect()
}

/// Text content of a record's notes, falling back to the raw value when the
/// notes cannot be shaped into lines.
pub fn notes_content(record: &RawRecord) -> String {
    match record.notes.as_ref().filter(|v| !is_falsy(v)) {
        Some(notes) => shape_notes(notes).unwrap_or_else(|e| {
            warn!(id = record.id.as_str(), error = %e, "malformed notes, using raw value");
            raw_text(notes)
        }),
        None => record.notes_plain.clone().unwrap_or_default(),
    }
}

fn shape_notes(notes: &Value) -> Result<String, NotesError> {
    match notes {
        Value::String(s) => Ok(tokenizer::tokenize(s)),
        Value::Array(items) => {
            let mut lines = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                match item {
                    Value::String(s) if !s.trim().is_empty() => lines.push(s.as_str()),
                    Value::String(_) => {}
                    v if is_falsy(v) => {}
                    other => {
                        return Err(NotesError::NonTextEntry {
                            index,
                            kind: kind_of(other),
                        })
                    }
                }
            }
            Ok(lines.join("\n"))
        }
        _ => Ok(String::new()),
    }
}

/// `null`, `false`, zero and `""` count as no value.
fn is_falsy(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Bool(b) => !*b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn raw_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Array(items) => items.iter().map(raw_text).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
