// src/store/mod.rs
// =============================================================================
// This module owns the link records and the interface to wherever they live.
//
// The dashboard keeps its bookmarks in a flat JSON array (public/links.json).
// The checker only ever touches one field of each record: `status`.
// Everything else is carried through untouched, in the order the dashboard
// wrote it, so a run that changes nothing writes back the same bytes.
//
// Submodules:
// - json: the file-backed store (read whole array / replace whole array)
//
// Rust concepts:
// - Traits: LinkStore describes "something that can load and save links"
// - #[serde(try_from)]: validate while deserializing
// - thiserror: derive Display/Error for our error enum
// =============================================================================

mod json;

pub use json::JsonFileStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::path::PathBuf;

const STATUS_KEY: &str = "status";

/// Liveness status stored on each record.
///
/// Only two values are ever written. Anything else found in the file
/// (missing, null, a typo) reads as `Active` until the record is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    #[default]
    Active,
    Broken,
}

impl LinkStatus {
    pub fn is_broken(self) -> bool {
        matches!(self, LinkStatus::Broken)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LinkStatus::Active => "active",
            LinkStatus::Broken => "broken",
        }
    }

    // Only the exact string "broken" counts
    fn from_value(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("broken") => LinkStatus::Broken,
            _ => LinkStatus::Active,
        }
    }
}

/// One bookmark as stored by the dashboard.
///
/// The record keeps the dashboard's JSON object as-is (key order included)
/// and reads `id`, `title`, `url` and `status` out of it on demand.
/// Deserializing checks that `id` exists and that `title` and `url` are strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct LinkRecord {
    fields: Map<String, Value>,
}

impl TryFrom<Map<String, Value>> for LinkRecord {
    type Error = String;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        if !fields.contains_key("id") {
            return Err("missing field `id`".to_string());
        }
        for key in ["title", "url"] {
            match fields.get(key) {
                Some(Value::String(_)) => {}
                Some(_) => return Err(format!("field `{}` must be a string", key)),
                None => return Err(format!("missing field `{}`", key)),
            }
        }
        Ok(Self { fields })
    }
}

impl Serialize for LinkRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

impl LinkRecord {
    /// Stable identifier. The dashboard uses numbers, but any JSON value is kept as-is.
    pub fn id(&self) -> &Value {
        self.fields.get("id").unwrap_or(&Value::Null)
    }

    pub fn title(&self) -> &str {
        self.str_field("title")
    }

    /// Not validated on load: a bad URL just makes the record unreachable.
    pub fn url(&self) -> &str {
        self.str_field("url")
    }

    pub fn status(&self) -> LinkStatus {
        LinkStatus::from_value(self.fields.get(STATUS_KEY))
    }

    /// Writes `status`. An existing key keeps its position; a new one goes last.
    pub fn set_status(&mut self, status: LinkStatus) {
        self.fields
            .insert(STATUS_KEY.to_string(), Value::String(status.as_str().to_string()));
    }

    /// Rewrites a present-but-unrecognised status as "active".
    ///
    /// A missing status is left missing: it already reads as active and the
    /// dashboard treats it the same way.
    pub fn normalize_status(&mut self) {
        let canonical = matches!(
            self.fields.get(STATUS_KEY).and_then(Value::as_str),
            Some("active") | Some("broken")
        );
        if self.fields.contains_key(STATUS_KEY) && !canonical {
            self.set_status(self.status());
        }
    }

    fn str_field(&self, key: &str) -> &str {
        self.fields.get(key).and_then(Value::as_str).unwrap_or("")
    }
}

/// Errors raised while reading or writing the link list.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access {}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{} is not a valid link list", path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to serialize link list")]
    Serialize(#[from] serde_json::Error),
}

/// Where the link list lives.
///
/// `save` replaces the whole list; it is never a merge. Implementations must
/// make the replacement all-or-nothing from the caller's point of view.
#[async_trait]
pub trait LinkStore: Send + Sync {
    async fn load(&self) -> Result<Vec<LinkRecord>, StoreError>;

    async fn save(&self, records: &[LinkRecord]) -> Result<(), StoreError>;
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why not a struct with id/title/url fields?
//    - serde would write those fields first, then everything else
//    - The dashboard's file would get its keys shuffled on every run
//    - Keeping the original map and reading from it avoids that
//
// 2. What does #[serde(try_from = "...")] do?
//    - serde first deserializes the other type (here a JSON object)
//    - Then calls TryFrom to build our type, turning Err into a serde error
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> LinkRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_accessors() {
        let record = parse(json!({
            "id": "abc",
            "title": "Docs",
            "url": "https://docs.example",
            "status": "broken"
        }));
        assert_eq!(record.id(), &json!("abc"));
        assert_eq!(record.title(), "Docs");
        assert_eq!(record.url(), "https://docs.example");
        assert!(record.status().is_broken());
    }

    #[test]
    fn test_status_defaults_to_active() {
        let record = parse(json!({"id": 1, "title": "Docs", "url": "https://docs.example"}));
        assert_eq!(record.status(), LinkStatus::Active);
    }

    #[test]
    fn test_foreign_status_reads_as_active() {
        for raw in [json!(null), json!("unknown"), json!("BROKEN"), json!(3)] {
            let record = parse(json!({
                "id": 1,
                "title": "Docs",
                "url": "https://docs.example",
                "status": raw
            }));
            assert_eq!(record.status(), LinkStatus::Active, "input {:?}", raw);
        }
    }

    #[test]
    fn test_key_order_survives_round_trip() {
        let text = r#"{"title":"Wiki","isFavorite":true,"id":42,"status":"active","url":"https://wiki.example","tags":["docs"]}"#;
        let record: LinkRecord = serde_json::from_str(text).unwrap();
        assert_eq!(serde_json::to_string(&record).unwrap(), text);
    }

    #[test]
    fn test_set_status_keeps_key_position() {
        let mut record: LinkRecord = serde_json::from_str(
            r#"{"status":"active","id":1,"title":"A","url":"https://a.example"}"#,
        )
        .unwrap();
        record.set_status(LinkStatus::Broken);
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"status":"broken","id":1,"title":"A","url":"https://a.example"}"#
        );
    }

    #[test]
    fn test_set_status_appends_when_missing() {
        let mut record: LinkRecord =
            serde_json::from_str(r#"{"id":1,"title":"A","url":"https://a.example"}"#).unwrap();
        record.set_status(LinkStatus::Broken);
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"id":1,"title":"A","url":"https://a.example","status":"broken"}"#
        );
    }

    #[test]
    fn test_normalize_status() {
        let mut foreign = parse(json!({"id": 1, "title": "A", "url": "u", "status": "pending"}));
        foreign.normalize_status();
        assert_eq!(serde_json::to_value(&foreign).unwrap()["status"], json!("active"));

        let mut missing = parse(json!({"id": 1, "title": "A", "url": "u"}));
        missing.normalize_status();
        assert!(serde_json::to_value(&missing).unwrap().get("status").is_none());

        let mut broken = parse(json!({"id": 1, "title": "A", "url": "u", "status": "broken"}));
        broken.normalize_status();
        assert_eq!(broken.status(), LinkStatus::Broken);
    }

    #[test]
    fn test_missing_or_mistyped_fields_are_rejected() {
        let bad = [
            json!({"title": "No id", "url": "https://x.example"}),
            json!({"id": 1, "url": "https://x.example"}),
            json!({"id": 1, "title": "No url"}),
            json!({"id": 1, "title": 5, "url": "https://x.example"}),
            json!({"id": 1, "title": "T", "url": null}),
        ];
        for value in bad {
            let result: Result<LinkRecord, _> = serde_json::from_value(value.clone());
            assert!(result.is_err(), "{} should be rejected", value);
        }
    }
}
