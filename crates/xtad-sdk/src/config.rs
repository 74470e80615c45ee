use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use xtad_copy::DEFAULT_COPY_SUFFIX;
use xtad_refs::RemapMode;
use xtad_store::layout::{DEFAULT_ICON_EXT, DEFAULT_IMAGE_EXT, DEFAULT_RECORD_EXT};
use xtad_store::StoreLayout;

use crate::error::{SdkError, SdkResult};

/// Settings for opening an [`XtadStore`](crate::XtadStore).
///
/// Every field has a default, so a TOML file only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub base_dir: PathBuf,
    pub record_ext: String,
    pub icon_ext: String,
    pub image_ext: String,
    /// Appended to the name of a top-level deep copy.
    pub copy_suffix: String,
    pub remap: RemapMode,
    /// Hold a per-id mutex around refcount read-modify-write.
    pub serialize_updates: bool,
    /// Create `base_dir` on open instead of failing when it is missing.
    pub create_dir: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            record_ext: DEFAULT_RECORD_EXT.into(),
            icon_ext: DEFAULT_ICON_EXT.into(),
            image_ext: DEFAULT_IMAGE_EXT.into(),
            copy_suffix: DEFAULT_COPY_SUFFIX.into(),
            remap: RemapMode::Global,
            serialize_updates: false,
            create_dir: true,
        }
    }
}

impl StoreConfig {
    pub fn from_toml_str(s: &str) -> SdkResult<Self> {
        toml::from_str(s).map_err(|e| SdkError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> SdkResult<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| SdkError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn layout(&self) -> StoreLayout {
        let layout = StoreLayout::new(self.base_dir.clone());
        layout.with_extensions(&self.record_ext, &self.icon_ext, &self.image_ext)
    }
}
