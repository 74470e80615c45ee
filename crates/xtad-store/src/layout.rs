//! File naming for objects inside the store directory.
//!
//! ```text
//! <base>/
//! ├── <id>.json               # metadata
//! ├── <id>_<n>.xtad           # record n, contiguous from 0
//! ├── <id>.ico                # optional icon
//! └── <id>_<record>_<n>.png   # optional raster assets of a record
//! ```

use std::path::{Path, PathBuf};

use xtad_types::ObjectId;

pub const METADATA_EXT: &str = "json";
pub const DEFAULT_RECORD_EXT: &str = "xtad";
pub const DEFAULT_ICON_EXT: &str = "ico";
pub const DEFAULT_IMAGE_EXT: &str = "png";

/// Maps object identifiers to their backing file paths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreLayout {
    base_dir: PathBuf,
    record_ext: String,
    icon_ext: String,
    image_ext: String,
}

impl StoreLayout {
    /// Layout rooted at `base_dir` with the default extensions.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            record_ext: DEFAULT_RECORD_EXT.into(),
            icon_ext: DEFAULT_ICON_EXT.into(),
            image_ext: DEFAULT_IMAGE_EXT.into(),
        }
    }

    pub fn with_extensions(
        mut self,
        record_ext: impl Into<String>,
        icon_ext: impl Into<String>,
        image_ext: impl Into<String>,
    ) -> Self {
        self.record_ext = record_ext.into();
        self.icon_ext = icon_ext.into();
        self.image_ext = image_ext.into();
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn record_ext(&self) -> &str {
        &self.record_ext
    }

    pub fn metadata_path(&self, id: &ObjectId) -> PathBuf {
        self.base_dir.join(format!("{id}.{METADATA_EXT}"))
    }

    pub fn record_path(&self, id: &ObjectId, index: usize) -> PathBuf {
        let name = format!("{id}_{index}.{}", self.record_ext);
        self.base_dir.join(name)
    }

    pub fn icon_path(&self, id: &ObjectId) -> PathBuf {
        self.base_dir.join(format!("{id}.{}", self.icon_ext))
    }

    pub fn image_file_name(&self, id: &ObjectId, record: usize, index: usize) -> String {
        format!("{id}_{record}_{index}.{}", self.image_ext)
    }

    pub fn image_path(&self, id: &ObjectId, record: usize, index: usize) -> PathBuf {
        self.base_dir.join(self.image_file_name(id, record, index))
    }

    /// Recover the object id from a metadata file name (`<id>.json`).
    pub fn parse_metadata_name(&self, file_name: &str) -> Option<ObjectId> {
        let stem = file_name.strip_suffix(&format!(".{METADATA_EXT}"))?;
        ObjectId::parse(stem).ok()
    }

    /// Recover `(record, index)` from an image file name belonging to `id`.
    pub fn parse_image_name(&self, id: &ObjectId, file_name: &str) -> Option<(usize, usize)> {
        let rest = file_name.strip_prefix(id.as_str())?.strip_prefix('_')?;
        let rest = rest.strip_suffix(&format!(".{}", self.image_ext))?;
        let (record, index) = rest.split_once('_')?;
        Some((record.parse().ok()?, index.parse().ok()?))
    }
}
