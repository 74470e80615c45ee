use serde::{Deserialize, Serialize};

use crate::id::ObjectId;
use crate::metadata::Metadata;

/// One content slot of a real object, persisted as `<id>_<n>.<ext>`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Text payload; may embed virtual-object reference tags.
    pub content: String,
    /// Byte-exact form of the record file as last read or written.
    pub raw: Vec<u8>,
    /// File names of raster side files attached to this record, in order.
    #[serde(default)]
    pub images: Vec<String>,
}

impl Record {
    /// Build a record from text; `raw` mirrors the UTF-8 bytes.
    pub fn from_text(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            raw: content.as_bytes().to_vec(),
            content,
            images: Vec::new(),
        }
    }

    /// Build a record from the bytes of a record file.
    ///
    /// Invalid UTF-8 is replaced in `content`; `raw` keeps the exact bytes.
    pub fn from_bytes(raw: Vec<u8>) -> Self {
        Self {
            content: String::from_utf8_lossy(&raw).into_owned(),
            raw,
            images: Vec::new(),
        }
    }

    /// Replace the text payload, keeping `raw` in step.
    pub fn set_content(&mut self, content: String) {
        self.raw = content.as_bytes().to_vec();
        self.content = content;
    }

    /// The bytes to persist for this record.
    ///
    /// `raw` while it still decodes to `content`, so undecodable bytes
    /// survive a load/save cycle. Once `content` has been edited directly,
    /// its UTF-8 encoding.
    pub fn bytes(&self) -> &[u8] {
        if String::from_utf8_lossy(&self.raw) == self.content {
            &self.raw
        } else {
            self.content.as_bytes()
        }
    }
}

/// A persisted content unit: metadata plus contiguous records `0..n`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RealObject {
    pub id: ObjectId,
    pub metadata: Metadata,
    pub records: Vec<Record>,
}

impl RealObject {
    pub fn new(id: ObjectId, metadata: Metadata, records: Vec<Record>) -> Self {
        Self {
            id,
            metadata,
            records,
        }
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn ref_count(&self) -> u64 {
        self.metadata.ref_count
    }

    /// Force the metadata's `id` and `recordCount` to match this object.
    pub fn sync_metadata(&mut self) {
        self.metadata.id = Some(self.id.clone());
        self.metadata.record_count = Some(self.records.len());
    }
}
