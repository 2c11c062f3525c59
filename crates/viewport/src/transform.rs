use foundation::math::{ScreenPoint, Vec2};
use serde::{Deserialize, Serialize};

/// Viewport pan/zoom: `screen = drawing * scale + translate`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
    };

    pub fn new(translate_x: f64, translate_y: f64, scale: f64) -> Self {
        Self {
            translate_x,
            translate_y,
            scale,
        }
    }

    pub fn translate(&self) -> Vec2 {
        Vec2::new(self.translate_x, self.translate_y)
    }

    /// Drawing space to screen space.
    pub fn apply(&self, p: ScreenPoint) -> ScreenPoint {
        Vec2::new(
            p.x * self.scale + self.translate_x,
            p.y * self.scale + self.translate_y,
        )
    }

    /// Screen space to drawing space.
    pub fn invert(&self, p: ScreenPoint) -> ScreenPoint {
        Vec2::new(
            (p.x - self.translate_x) / self.scale,
            (p.y - self.translate_y) / self.scale,
        )
    }

    /// Transform with scale `k` that keeps the drawing point `local` under screen point `screen`.
    pub fn anchored(k: f64, screen: ScreenPoint, local: ScreenPoint) -> Self {
        Self::new(screen.x - local.x * k, screen.y - local.y * k, k)
    }

    /// Rescales to `k` keeping the drawing point under `anchor` fixed on screen.
    pub fn scaled_at(&self, k: f64, anchor: ScreenPoint) -> Self {
        Self::anchored(k, anchor, self.invert(anchor))
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.translate_x + dx, self.translate_y + dy, self.scale)
    }

    /// Clamps scale into `[min, max]`, keeping `anchor` fixed if it changes.
    pub fn clamp_scale(&self, min: f64, max: f64, anchor: ScreenPoint) -> Self {
        let k = self.scale.clamp(min, max);
        if k == self.scale {
            *self
        } else {
            self.scaled_at(k, anchor)
        }
    }

    pub fn is_finite(&self) -> bool {
        self.translate_x.is_finite() && self.translate_y.is_finite() && self.scale.is_finite()
    }
}

impl std::fmt::Display for Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "translate({},{}) scale({})",
            self.translate_x, self.translate_y, self.scale
        )
    }
}
