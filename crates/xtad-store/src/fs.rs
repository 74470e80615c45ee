use std::fs;
use std::io;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info, warn};
use walkdir::WalkDir;
use xtad_types::{Metadata, ObjectId, RealObject, Record};

use crate::error::{StoreError, StoreResult};
use crate::layout::StoreLayout;
use crate::traits::{MetadataEntry, ObjectStore};

/// Directory-backed object store.
///
/// Every object is a loose set of files in one flat directory; see
/// [`StoreLayout`] for the naming scheme.
#[derive(Clone, Debug)]
pub struct FsObjectStore {
    layout: StoreLayout,
}

impl FsObjectStore {
    /// Open a store over `layout`, creating the base directory if needed.
    pub fn open(layout: StoreLayout) -> StoreResult<Self> {
        fs::create_dir_all(layout.base_dir())?;
        Ok(Self { layout })
    }

    /// Wrap an existing directory without touching the filesystem.
    pub fn new(layout: StoreLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    fn read_metadata(&self, id: &ObjectId) -> StoreResult<Metadata> {
        let path = self.layout.metadata_path(id);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.clone()))
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_slice(&bytes).map_err(|e| StoreError::InvalidState {
            path,
            reason: e.to_string(),
        })
    }

    fn write_metadata(&self, id: &ObjectId, metadata: &Metadata) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(metadata)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        fs::write(self.layout.metadata_path(id), bytes)?;
        Ok(())
    }

    /// Count record files `0, 1, 2, …` up to the first missing one.
    fn count_records(&self, id: &ObjectId) -> StoreResult<usize> {
        let mut count = 0;
        while Self::is_file(&self.layout.record_path(id, count))? {
            count += 1;
        }
        Ok(count)
    }

    /// Image file names of one record, from index 0 up to the first gap.
    fn record_images(&self, id: &ObjectId, record: usize) -> StoreResult<Vec<String>> {
        let mut names = Vec::new();
        loop {
            let name = self.layout.image_file_name(id, record, names.len());
            if !Self::is_file(&self.layout.base_dir().join(&name))? {
                return Ok(names);
            }
            names.push(name);
        }
    }

    /// Every image side file of `id`, gaps included, as
    /// `(record, index, file name)`, sorted. Scans the whole directory.
    fn all_image_files(&self, id: &ObjectId) -> StoreResult<Vec<(usize, usize, String)>> {
        let mut images = Vec::new();
        for entry in WalkDir::new(self.layout.base_dir())
            .min_depth(1)
            .max_depth(1)
        {
            let entry = entry.map_err(|e| StoreError::Io(e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if let Some((record, index)) = self.layout.parse_image_name(id, name) {
                images.push((record, index, name.to_string()));
            }
        }
        images.sort();
        Ok(images)
    }

    /// `false` when nothing exists at `path` or it is not a regular file.
    fn is_file(path: &Path) -> StoreResult<bool> {
        match fs::metadata(path) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn remove_if_present(path: &Path) -> StoreResult<bool> {
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

impl ObjectStore for FsObjectStore {
    fn load(&self, id: &ObjectId) -> StoreResult<RealObject> {
        let metadata = self.read_metadata(id)?;
        let count = match metadata.record_count {
            Some(count) => count,
            None => {
                let count = self.count_records(id)?;
                info!(%id, count, "recordCount missing; recomputed from record files");
                count
            }
        };

        let mut records = Vec::with_capacity(count);
        for index in 0..count {
            let raw = match fs::read(self.layout.record_path(id, index)) {
                Ok(raw) => raw,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    return Err(StoreError::RecordNotFound {
                        id: id.clone(),
                        index,
                    })
                }
                Err(e) => return Err(e.into()),
            };
            records.push(Record::from_bytes(raw));
        }

        for (index, record) in records.iter_mut().enumerate() {
            record.images = self.record_images(id, index)?;
        }

        let mut object = RealObject::new(id.clone(), metadata, records);
        object.sync_metadata();
        debug!(%id, records = object.record_count(), "loaded object");
        Ok(object)
    }

    fn save(&self, id: &ObjectId, object: &RealObject) -> StoreResult<()> {
        let mut metadata = object.metadata.clone();
        metadata.id = Some(id.clone());
        metadata.record_count = Some(object.records.len());
        self.write_metadata(id, &metadata)?;

        for (index, record) in object.records.iter().enumerate() {
            fs::write(self.layout.record_path(id, index), record.bytes())?;
        }
        debug!(%id, records = object.records.len(), "saved object");
        Ok(())
    }

    fn physical_delete(&self, id: &ObjectId) -> StoreResult<()> {
        if !Self::remove_if_present(&self.layout.metadata_path(id))? {
            return Err(StoreError::NotFound(id.clone()));
        }

        let mut records = 0;
        while Self::remove_if_present(&self.layout.record_path(id, records))? {
            records += 1;
        }

        let icon = Self::remove_if_present(&self.layout.icon_path(id))?;

        let mut images = 0;
        for (_, _, name) in self.all_image_files(id)? {
            if Self::remove_if_present(&self.layout.base_dir().join(name))? {
                images += 1;
            }
        }

        info!(%id, records, icon, images, "physically deleted object");
        Ok(())
    }

    fn list_all_metadata(&self) -> StoreResult<Vec<MetadataEntry>> {
        let mut entries = Vec::new();
        for entry in WalkDir::new(self.layout.base_dir())
            .min_depth(1)
            .max_depth(1)
        {
            let entry = entry.map_err(|e| StoreError::Io(e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if !name.ends_with(".json") {
                continue;
            }
            let Some(id) = self.layout.parse_metadata_name(name) else {
                warn!(file = name, "skipping metadata file with unusable id");
                continue;
            };

            let bytes = fs::read(entry.path())?;
            let value: Value = match serde_json::from_slice(&bytes) {
                Ok(value) => value,
                Err(e) => {
                    warn!(file = name, error = %e, "skipping unparseable metadata file");
                    continue;
                }
            };
            if value.get("name").is_none() {
                debug!(file = name, "skipping json file without a name field");
                continue;
            }
            match serde_json::from_value::<Metadata>(value) {
                Ok(metadata) => entries.push(MetadataEntry { id, metadata }),
                Err(e) => {
                    warn!(file = name, error = %e, "skipping malformed metadata file");
                }
            }
        }
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(entries)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.layout.metadata_path(id).try_exists()?)
    }

    fn copy_icon(&self, from: &ObjectId, to: &ObjectId) -> StoreResult<bool> {
        let source = self.layout.icon_path(from);
        if !source.is_file() {
            return Ok(false);
        }
        fs::copy(&source, self.layout.icon_path(to))?;
        Ok(true)
    }

    fn copy_images(&self, from: &ObjectId, to: &ObjectId) -> StoreResult<usize> {
        let mut copied = 0;
        for record in 0..self.count_records(from)? {
            let images = self.record_images(from, record)?;
            for (index, name) in images.iter().enumerate() {
                let target = self.layout.image_path(to, record, index);
                match fs::copy(self.layout.base_dir().join(name), &target) {
                    Ok(_) => copied += 1,
                    Err(e) => {
                        let dest = target.display();
                        warn!(file = %name, %dest, error = %e, "failed to copy image");
                    }
                }
            }
        }
        Ok(copied)
    }

    fn load_metadata(&self, id: &ObjectId) -> StoreResult<Metadata> {
        self.read_metadata(id)
    }

    fn save_metadata(&self, id: &ObjectId, metadata: &Metadata) -> StoreResult<()> {
        let mut metadata = metadata.clone();
        metadata.id = Some(id.clone());
        self.write_metadata(id, &metadata)
    }
}
