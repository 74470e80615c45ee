use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::id::ObjectId;

/// The metadata document of a real object, stored as `<id>.json`.
///
/// Keys are camelCase on disk. `appList`, `windowConfig` and any key not
/// modelled here are carried through load/save/duplicate untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub name: String,

    /// Number of live virtual objects pointing at this object.
    #[serde(default)]
    pub ref_count: u64,

    /// Absent in older metadata files; recomputed from the record files on load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_count: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessed_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_list: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_config: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Metadata {
    /// Metadata for a brand-new object: one reference, all timestamps `now`.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            name: name.into(),
            ref_count: 1,
            record_count: None,
            created_at: Some(now),
            updated_at: Some(now),
            accessed_at: Some(now),
            app_list: None,
            window_config: None,
            extra: Map::new(),
        }
    }

    /// Set created/updated/accessed to the same instant.
    pub fn stamp_all(&mut self, now: DateTime<Utc>) {
        self.created_at = Some(now);
        self.updated_at = Some(now);
        self.accessed_at = Some(now);
    }

    pub fn touch_updated(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}
