use std::fs;
use std::path::{Path, PathBuf};

use foundation::pin::PinId;

use crate::{AppConfig, CatalogError, PinRecord, PinStore, StoreDocument};

/// All pins and the config in one JSON document on disk.
///
/// The document is loaded on open and rewritten after every mutation.
/// A missing file is an empty store.
#[derive(Debug)]
pub struct JsonFilePinStore {
    path: PathBuf,
    doc: StoreDocument,
}

impl JsonFilePinStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let path = path.into();
        let doc = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => StoreDocument::default(),
            Ok(raw) => serde_json::from_str::<StoreDocument>(&raw)
                .map_err(|e| CatalogError::Corrupt(format!("{}: {e}", path.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoreDocument::default(),
            Err(e) => return Err(CatalogError::Io(format!("{}: {e}", path.display()))),
        };
        Ok(Self { path, doc })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `doc` and adopts it only once it is on disk, so a failed write
    /// leaves the store as it was.
    fn commit(&mut self, doc: StoreDocument) -> Result<(), CatalogError> {
        self.persist(&doc)?;
        self.doc = doc;
        Ok(())
    }

    fn persist(&self, doc: &StoreDocument) -> Result<(), CatalogError> {
        let raw = serde_json::to_string_pretty(doc)
            .map_err(|e| CatalogError::Io(e.to_string()))?;
        // Write beside the target then rename so a crash never leaves half a document.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw).map_err(|e| CatalogError::Io(format!("{}: {e}", tmp.display())))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| CatalogError::Io(format!("{}: {e}", self.path.display())))
    }
}

impl PinStore for JsonFilePinStore {
    fn list(&self) -> Result<Vec<PinRecord>, CatalogError> {
        Ok(self.doc.pins.values().cloned().collect())
    }

    fn get(&self, id: &PinId) -> Result<Option<PinRecord>, CatalogError> {
        Ok(self.doc.pins.get(id).cloned())
    }

    fn upsert(&mut self, record: PinRecord) -> Result<(), CatalogError> {
        let mut doc = self.doc.clone();
        doc.pins.insert(record.id.clone(), record);
        self.commit(doc)
    }

    fn delete(&mut self, id: &PinId) -> Result<bool, CatalogError> {
        if !self.doc.pins.contains_key(id) {
            return Ok(false);
        }
        let mut doc = self.doc.clone();
        doc.pins.remove(id);
        self.commit(doc)?;
        Ok(true)
    }

    fn config(&self) -> Result<AppConfig, CatalogError> {
        Ok(self.doc.config.clone().unwrap_or_default())
    }

    fn save_config(&mut self, config: AppConfig) -> Result<(), CatalogError> {
        let mut doc = self.doc.clone();
        doc.config = Some(config);
        self.commit(doc)
    }
}
