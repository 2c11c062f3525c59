use foundation::math::ScreenPoint;
use foundation::time::Time;
use scene::picking::pick;
use scene::{ElementId, ElementRole, World};
use viewport::{PointerId, WheelMode};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

/// Host pointer event in container pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerEvent {
    pub pointer_id: PointerId,
    pub phase: PointerPhase,
    pub x: f64,
    pub y: f64,
    pub time: Time,
}

impl PointerEvent {
    pub fn new(pointer_id: PointerId, phase: PointerPhase, x: f64, y: f64, time: Time) -> Self {
        Self {
            pointer_id,
            phase,
            x,
            y,
            time,
        }
    }

    pub fn point(&self) -> ScreenPoint {
        ScreenPoint::new(self.x, self.y)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WheelEvent {
    pub x: f64,
    pub y: f64,
    pub delta_y: f64,
    pub mode: WheelMode,
    pub ctrl: bool,
    pub time: Time,
}

/// What lies under a screen point.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HitTarget {
    /// A marker group (any part of its subtree was hit).
    Marker(ElementId),
    Land(ElementId),
    Background,
}

/// Classifies the topmost element under `point` (screen pixels).
pub fn classify(world: &World, point: ScreenPoint) -> HitTarget {
    let Some(hit) = pick(world, point) else {
        return HitTarget::Background;
    };
    if let Some(marker) = world.closest(hit, ElementRole::Marker) {
        return HitTarget::Marker(marker);
    }
    if let Some(path) = world.closest(hit, ElementRole::LandPath) {
        return HitTarget::Land(path);
    }
    HitTarget::Background
}
