use std::collections::BTreeMap;

use foundation::pin::{Pin, PinCategory, PinId, PinOwner};
use serde::{Deserialize, Serialize};

mod file_store;
mod snapshot;

pub use file_store::JsonFilePinStore;
pub use snapshot::{ImportReport, Snapshot, export_snapshot, import_snapshot, parse_import};

/// A persisted pin with everything the form and sidebar show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinRecord {
    pub id: PinId,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub category: PinCategory,
    pub owner: PinOwner,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_image: Option<String>,
}

impl PinRecord {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        lat: f64,
        lng: f64,
        category: PinCategory,
        owner: PinOwner,
    ) -> Self {
        Self {
            id: PinId::new(id),
            name: name.into(),
            lat,
            lng,
            category,
            owner,
            date: None,
            description: String::new(),
            images: Vec::new(),
            banner_image: None,
        }
    }

    /// The fields the map engine renders.
    pub fn pin(&self) -> Pin {
        Pin {
            id: self.id.clone(),
            lon: self.lng,
            lat: self.lat,
            category: self.category,
            owner: self.owner,
        }
    }
}

/// Display names and page titles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub user1_name: String,
    pub user2_name: String,
    pub site_title: String,
    pub site_subtitle: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user1_name: "User 1".to_string(),
            user2_name: "User 2".to_string(),
            site_title: "Our Global Love Story".to_string(),
            site_subtitle: "To the one I want to see the whole world with.".to_string(),
        }
    }
}

impl AppConfig {
    /// Name shown for pins of `owner`.
    pub fn owner_name(&self, owner: PinOwner) -> &str {
        match owner {
            PinOwner::User1 => &self.user1_name,
            PinOwner::User2 => &self.user2_name,
            PinOwner::Shared => "Shared",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    NotFound(String),
    Corrupt(String),
    Io(String),
    InvalidImport(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::NotFound(id) => write!(f, "pin not found: {id}"),
            CatalogError::Corrupt(msg) => write!(f, "pin storage corrupt: {msg}"),
            CatalogError::Io(msg) => write!(f, "pin storage error: {msg}"),
            CatalogError::InvalidImport(msg) => write!(f, "invalid import: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}

pub trait PinStore {
    fn list(&self) -> Result<Vec<PinRecord>, CatalogError>;
    fn get(&self, id: &PinId) -> Result<Option<PinRecord>, CatalogError>;
    fn upsert(&mut self, record: PinRecord) -> Result<(), CatalogError>;
    fn delete(&mut self, id: &PinId) -> Result<bool, CatalogError>;
    /// Stored config, or the defaults if none was ever saved.
    fn config(&self) -> Result<AppConfig, CatalogError>;
    fn save_config(&mut self, config: AppConfig) -> Result<(), CatalogError>;

    /// Engine view of every stored pin, in store order.
    fn pins(&self) -> Result<Vec<Pin>, CatalogError> {
        Ok(self.list()?.iter().map(PinRecord::pin).collect())
    }

    fn require(&self, id: &PinId) -> Result<PinRecord, CatalogError> {
        self.get(id)?
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }
}

/// Store contents keyed by id; also the on-disk document of [`JsonFilePinStore`].
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct StoreDocument {
    #[serde(default)]
    pub pins: BTreeMap<PinId, PinRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<AppConfig>,
}

#[derive(Debug, Default)]
pub struct InMemoryPinStore {
    doc: StoreDocument,
}

impl InMemoryPinStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PinStore for InMemoryPinStore {
    fn list(&self) -> Result<Vec<PinRecord>, CatalogError> {
        Ok(self.doc.pins.values().cloned().collect())
    }

    fn get(&self, id: &PinId) -> Result<Option<PinRecord>, CatalogError> {
        Ok(self.doc.pins.get(id).cloned())
    }

    fn upsert(&mut self, record: PinRecord) -> Result<(), CatalogError> {
        self.doc.pins.insert(record.id.clone(), record);
        Ok(())
    }

    fn delete(&mut self, id: &PinId) -> Result<bool, CatalogError> {
        Ok(self.doc.pins.remove(id).is_some())
    }

    fn config(&self) -> Result<AppConfig, CatalogError> {
        Ok(self.doc.config.clone().unwrap_or_default())
    }

    fn save_config(&mut self, config: AppConfig) -> Result<(), CatalogError> {
        self.doc.config = Some(config);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(id: &str) -> PinRecord {
        PinRecord::new(id, "Kyoto", 35.0, 135.7, PinCategory::Memory, PinOwner::User1)
    }

    #[test]
    fn record_uses_camel_case_wire_names() {
        let mut r = record("k");
        r.banner_image = Some("data:image/png;base64,AA".into());
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "k",
                "name": "Kyoto",
                "lat": 35.0,
                "lng": 135.7,
                "category": "MEMORY",
                "owner": "USER1",
                "description": "",
                "images": [],
                "bannerImage": "data:image/png;base64,AA",
            })
        );
    }

    #[test]
    fn pin_maps_lng_to_lon() {
        let pin = record("k").pin();
        assert_eq!(pin.id, PinId::new("k"));
        assert_eq!(pin.lon, 135.7);
        assert_eq!(pin.lat, 35.0);
    }

    #[test]
    fn config_defaults_until_saved() {
        let mut store = InMemoryPinStore::new();
        assert_eq!(store.config().unwrap(), AppConfig::default());
        let custom = AppConfig {
            user1_name: "Ana".into(),
            ..AppConfig::default()
        };
        store.save_config(custom.clone()).unwrap();
        assert_eq!(store.config().unwrap(), custom);
        assert_eq!(custom.owner_name(PinOwner::User1), "Ana");
        assert_eq!(custom.owner_name(PinOwner::User2), "User 2");
    }

    #[test]
    fn in_memory_store_upserts_by_id() {
        let mut store = InMemoryPinStore::new();
        store.upsert(record("b")).unwrap();
        store.upsert(record("a")).unwrap();
        let mut renamed = record("b");
        renamed.name = "Osaka".into();
        store.upsert(renamed).unwrap();

        let names: Vec<(String, String)> = store
            .list()
            .unwrap()
            .into_iter()
            .map(|r| (r.id.to_string(), r.name))
            .collect();
        assert_eq!(
            names,
            vec![
                ("a".to_string(), "Kyoto".to_string()),
                ("b".to_string(), "Osaka".to_string())
            ]
        );

        assert!(store.delete(&PinId::new("a")).unwrap());
        assert!(!store.delete(&PinId::new("a")).unwrap());
        assert_eq!(
            store.require(&PinId::new("a")),
            Err(CatalogError::NotFound("a".into()))
        );
        assert_eq!(store.pins().unwrap().len(), 1);
    }
}
