use serde::{Deserialize, Serialize};

use crate::math::GeoPoint;

/// Stable pin identity. Scene elements are keyed by this, never by list position.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinId(pub String);

impl PinId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PinId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PinCategory {
    Memory,
    Dream,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PinOwner {
    User1,
    User2,
    Shared,
}

/// The slice of a pin record the map engine needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub id: PinId,
    pub lon: f64,
    pub lat: f64,
    pub category: PinCategory,
    pub owner: PinOwner,
}

impl Pin {
    pub fn new(
        id: impl Into<String>,
        lon: f64,
        lat: f64,
        category: PinCategory,
        owner: PinOwner,
    ) -> Self {
        Self {
            id: PinId::new(id),
            lon,
            lat,
            category,
            owner,
        }
    }

    pub fn geo(&self) -> GeoPoint {
        GeoPoint::new(self.lon, self.lat)
    }
}
