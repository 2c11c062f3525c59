use foundation::math::Vec2;

/// Element transform attribute: `translate(x, y) scale(k)`.
///
/// Maps local coordinates into the parent's space as `p * scale + translate`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform2D {
    pub translate: Vec2,
    pub scale: f64,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform2D {
    pub fn identity() -> Self {
        Self {
            translate: Vec2::ZERO,
            scale: 1.0,
        }
    }

    pub fn new(translate: Vec2, scale: f64) -> Self {
        Self { translate, scale }
    }

    pub fn apply(&self, p: Vec2) -> Vec2 {
        p.scale(self.scale) + self.translate
    }

    /// `None` for a degenerate (zero or non-finite) scale.
    pub fn invert(&self, p: Vec2) -> Option<Vec2> {
        if self.scale == 0.0 || !self.scale.is_finite() {
            return None;
        }
        let d = p - self.translate;
        Some(Vec2::new(d.x / self.scale, d.y / self.scale))
    }

    /// `self` applied after `child`: the transform of a child in this element's parent space.
    pub fn then(&self, child: &Transform2D) -> Transform2D {
        Transform2D {
            translate: self.apply(child.translate),
            scale: self.scale * child.scale,
        }
    }
}

impl std::fmt::Display for Transform2D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "translate({}, {}) scale({})",
            self.translate.x, self.translate.y, self.scale
        )
    }
}
