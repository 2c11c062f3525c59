use std::collections::{BTreeMap, BTreeSet};

use foundation::math::{Projection, Vec2};
use foundation::pin::{Pin, PinId};
use runtime::metrics::{Metrics, names};
use scene::components::{Drawable2D, Shape2D, Transform2D};
use scene::{ElementId, ElementRole, World};

use crate::layer::{Layer, LayerId, PINS_LAYER_ID};
use crate::symbology::{
    MARKER_EYE_RADIUS, MARKER_HIT_RADIUS, marker_eye_style, marker_glyph_style, marker_hit_style,
    marker_scale, pin_color,
};
use scene::components::drawable2d::PIN_GLYPH_HEAD_CENTER;

#[derive(Debug, Clone)]
struct Marker {
    element: ElementId,
    glyph: ElementId,
    pin: Pin,
    /// Projected position in drawing space.
    anchor: Vec2,
}

/// Outcome of one pin-list reconciliation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PinDiff {
    pub created: usize,
    pub updated: usize,
    pub removed: usize,
    /// Pins in the list that could not be projected (their marker, if any, was removed).
    pub dropped: usize,
}

impl PinDiff {
    pub fn total_changes(&self) -> usize {
        self.created + self.updated + self.removed + self.dropped
    }
}

/// Marker layer keyed by pin id.
#[derive(Debug)]
pub struct PinLayer {
    element: ElementId,
    markers: BTreeMap<PinId, Marker>,
    by_element: BTreeMap<ElementId, PinId>,
    hovered: Option<ElementId>,
}

impl PinLayer {
    pub fn new(world: &mut World, parent: ElementId) -> Self {
        Self {
            element: world.spawn(parent, ElementRole::PinsLayer),
            markers: BTreeMap::new(),
            by_element: BTreeMap::new(),
            hovered: None,
        }
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn marker(&self, id: &PinId) -> Option<ElementId> {
        self.markers.get(id).map(|m| m.element)
    }

    pub fn anchor(&self, id: &PinId) -> Option<Vec2> {
        self.markers.get(id).map(|m| m.anchor)
    }

    /// The pin drawn by a marker group element.
    pub fn pin_for(&self, marker: ElementId) -> Option<&Pin> {
        let id = self.by_element.get(&marker)?;
        self.markers.get(id).map(|m| &m.pin)
    }

    pub fn hovered(&self) -> Option<ElementId> {
        self.hovered
    }

    /// Reconciles markers with `pins`.
    ///
    /// New ids get a marker, ids no longer listed lose theirs, surviving ids
    /// are updated in place so their element ids and hover state persist.
    /// Only the first occurrence of a duplicated id is drawn.
    pub fn sync(
        &mut self,
        world: &mut World,
        pins: &[Pin],
        projection: &Projection,
        k: f64,
        exponent: f64,
        metrics: &mut Metrics,
    ) -> PinDiff {
        let factor = marker_scale(k, exponent);
        let mut diff = PinDiff::default();
        let mut seen: BTreeSet<&PinId> = BTreeSet::new();

        for pin in pins {
            if !seen.insert(&pin.id) {
                continue;
            }
            let Some(anchor) = projection.forward(pin.geo()) else {
                if self.markers.contains_key(&pin.id) {
                    self.remove_marker(world, &pin.id);
                }
                diff.dropped += 1;
                continue;
            };
            if let Some(marker) = self.markers.get_mut(&pin.id) {
                marker.anchor = anchor;
                if marker.pin.category != pin.category || marker.pin.owner != pin.owner {
                    if let Some(glyph) = world.drawable_mut(marker.glyph) {
                        glyph.style = marker_glyph_style(pin_color(pin.category, pin.owner));
                    }
                }
                marker.pin = pin.clone();
                world.set_transform(marker.element, Transform2D::new(anchor, factor));
                diff.updated += 1;
            } else {
                let marker = self.create_marker(world, pin, anchor, factor);
                self.by_element.insert(marker.element, pin.id.clone());
                self.markers.insert(pin.id.clone(), marker);
                diff.created += 1;
            }
        }

        let stale: Vec<PinId> = self
            .markers
            .keys()
            .filter(|id| !seen.contains(id))
            .cloned()
            .collect();
        for id in &stale {
            self.remove_marker(world, id);
            diff.removed += 1;
        }

        metrics.inc_counter(names::MARKERS_CREATED, diff.created as u64);
        metrics.inc_counter(names::MARKERS_UPDATED, diff.updated as u64);
        metrics.inc_counter(names::MARKERS_REMOVED, diff.removed as u64);
        metrics.inc_counter(names::MARKERS_DROPPED, diff.dropped as u64);
        metrics.set_gauge(names::MARKERS_LIVE, self.markers.len() as i64);
        metrics.record_histogram(names::DIFF_SIZE, diff.total_changes() as i64);
        diff
    }

    /// Sets every marker's counter-scale for zoom `k`. Creates and removes nothing.
    pub fn rescale(&self, world: &mut World, k: f64, exponent: f64) {
        let factor = marker_scale(k, exponent);
        for marker in self.markers.values() {
            world.set_transform(marker.element, Transform2D::new(marker.anchor, factor));
        }
    }

    /// Marks `target` (a marker group) as hovered; anything else clears hover.
    pub fn set_hover(&mut self, world: &mut World, target: Option<ElementId>) {
        let target = target.filter(|id| self.by_element.contains_key(id));
        if target == self.hovered {
            return;
        }
        if let Some(prev) = self.hovered.take() {
            world.set_hovered(prev, false);
        }
        if let Some(next) = target {
            world.set_hovered(next, true);
        }
        self.hovered = target;
    }

    fn create_marker(
        &self,
        world: &mut World,
        pin: &Pin,
        anchor: Vec2,
        factor: f64,
    ) -> Marker {
        let element = world.spawn(self.element, ElementRole::Marker);
        world.set_transform(element, Transform2D::new(anchor, factor));

        let glyph = world.spawn(element, ElementRole::MarkerGlyph);
        world.set_drawable(
            glyph,
            Drawable2D::new(
                Shape2D::PinGlyph,
                marker_glyph_style(pin_color(pin.category, pin.owner)),
            ),
        );
        let eye = world.spawn(element, ElementRole::MarkerEye);
        world.set_drawable(
            eye,
            Drawable2D::new(
                Shape2D::Circle {
                    center: PIN_GLYPH_HEAD_CENTER,
                    radius: MARKER_EYE_RADIUS,
                },
                marker_eye_style(),
            ),
        );
        let hit = world.spawn(element, ElementRole::MarkerHitArea);
        world.set_drawable(
            hit,
            Drawable2D::new(
                Shape2D::Circle {
                    center: Vec2::ZERO,
                    radius: MARKER_HIT_RADIUS,
                },
                marker_hit_style(),
            ),
        );
        Marker {
            element,
            glyph,
            pin: pin.clone(),
            anchor,
        }
    }

    fn remove_marker(&mut self, world: &mut World, id: &PinId) {
        if let Some(marker) = self.markers.remove(id) {
            self.by_element.remove(&marker.element);
            if self.hovered == Some(marker.element) {
                self.hovered = None;
            }
            world.despawn(marker.element);
        }
    }
}

impl Layer for PinLayer {
    fn id(&self) -> LayerId {
        PINS_LAYER_ID
    }

    fn element(&self) -> ElementId {
        self.element
    }
}
