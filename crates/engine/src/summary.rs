use layers::Layer;
use serde::Serialize;
use viewport::Transform;

use crate::engine::MapEngine;

/// One marker as currently laid out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerSummary {
    pub id: String,
    pub color: String,
    /// Marker element attribute, e.g. `translate(400, 300) scale(1)`.
    pub transform: String,
    /// Position on screen after the viewport transform.
    pub screen_x: f64,
    pub screen_y: f64,
}

/// Serializable snapshot of the rendered scene.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneSummary {
    pub width: f64,
    pub height: f64,
    pub viewport: Transform,
    pub zoom_group_transform: String,
    pub land_paths: usize,
    /// Marker groups attached under the pins layer.
    pub marker_groups: usize,
    pub markers: Vec<MarkerSummary>,
    pub elements: usize,
}

impl SceneSummary {
    pub fn capture(engine: &MapEngine) -> Self {
        let world = engine.world();
        let viewport = engine.transform();
        let (width, height) = engine
            .projection()
            .map(|p| (p.width(), p.height()))
            .unwrap_or((0.0, 0.0));

        let mut markers = Vec::new();
        for pin in engine.pin_snapshot() {
            let Some(el) = engine.marker_for(&pin.id) else {
                continue;
            };
            if markers.iter().any(|m: &MarkerSummary| m.id == pin.id.as_str()) {
                continue;
            }
            let Some(t) = world.transform(el) else {
                continue;
            };
            let color = world
                .children(el)
                .first()
                .and_then(|glyph| world.drawable(*glyph))
                .and_then(|d| d.style.fill)
                .map(|c| c.to_string())
                .unwrap_or_default();
            let screen = viewport.apply(t.translate);
            markers.push(MarkerSummary {
                id: pin.id.to_string(),
                color,
                transform: t.to_string(),
                screen_x: screen.x,
                screen_y: screen.y,
            });
        }

        Self {
            width,
            height,
            viewport,
            zoom_group_transform: world
                .transform(engine.zoom_group())
                .map(|t| t.to_string())
                .unwrap_or_default(),
            land_paths: engine.land().paths().len(),
            marker_groups: world.children(engine.pins().element()).len(),
            markers,
            elements: world.len(),
        }
    }
}
