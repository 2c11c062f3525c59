use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{AppConfig, CatalogError, PinRecord, PinStore};

/// Export payload: every pin plus the current config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub pins: Vec<PinRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<AppConfig>,
}

impl Snapshot {
    pub fn to_json_pretty(&self) -> Result<String, CatalogError> {
        serde_json::to_string_pretty(self).map_err(|e| CatalogError::Io(e.to_string()))
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub pins: usize,
    pub migrated_images: usize,
    pub config_saved: bool,
}

pub fn export_snapshot(store: &dyn PinStore) -> Result<Snapshot, CatalogError> {
    Ok(Snapshot {
        pins: store.list()?,
        config: Some(store.config()?),
    })
}

/// Parses an export document, or a bare array of pins from older versions.
///
/// Returns the snapshot and how many records had a single legacy
/// `imageBase64` field folded into `images`.
pub fn parse_import(raw: &str) -> Result<(Snapshot, usize), CatalogError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| CatalogError::InvalidImport(e.to_string()))?;
    let (pins, config) = match value {
        Value::Array(items) => (items, None),
        Value::Object(mut obj) => {
            let pins = match obj.remove("pins") {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(items)) => items,
                Some(_) => {
                    return Err(CatalogError::InvalidImport(
                        "\"pins\" must be an array".to_string(),
                    ));
                }
            };
            let config = match obj.remove("config") {
                None | Some(Value::Null) => None,
                Some(v) => Some(
                    serde_json::from_value::<AppConfig>(v)
                        .map_err(|e| CatalogError::InvalidImport(format!("config: {e}")))?,
                ),
            };
            (pins, config)
        }
        _ => {
            return Err(CatalogError::InvalidImport(
                "expected an object or an array of pins".to_string(),
            ));
        }
    };

    let mut migrated = 0;
    let mut records = Vec::with_capacity(pins.len());
    for (index, mut pin) in pins.into_iter().enumerate() {
        if migrate_legacy_image(&mut pin) {
            migrated += 1;
        }
        let record = serde_json::from_value::<PinRecord>(pin)
            .map_err(|e| CatalogError::InvalidImport(format!("pin {index}: {e}")))?;
        records.push(record);
    }
    Ok((Snapshot { pins: records, config }, migrated))
}

fn migrate_legacy_image(pin: &mut Value) -> bool {
    let Value::Object(obj) = pin else {
        return false;
    };
    let has_images = matches!(obj.get("images"), Some(v) if !v.is_null());
    let legacy = obj.remove("imageBase64");
    if has_images {
        return false;
    }
    let images = match legacy {
        Some(Value::String(s)) if !s.is_empty() => vec![Value::String(s)],
        _ => Vec::new(),
    };
    let migrated = !images.is_empty();
    obj.insert("images".to_string(), Value::Array(images));
    migrated
}

/// Upserts every imported pin; the config is written only if the document had one.
pub fn import_snapshot(store: &mut dyn PinStore, raw: &str) -> Result<ImportReport, CatalogError> {
    let (snapshot, migrated_images) = parse_import(raw)?;
    let pins = snapshot.pins.len();
    for record in snapshot.pins {
        store.upsert(record)?;
    }
    let config_saved = match snapshot.config {
        Some(config) => {
            store.save_config(config)?;
            true
        }
        None => false,
    };
    Ok(ImportReport {
        pins,
        migrated_images,
        config_saved,
    })
}
