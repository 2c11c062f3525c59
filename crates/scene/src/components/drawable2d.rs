use foundation::bounds::Aabb2;
use foundation::math::Vec2;

use crate::components::Style;

/// Pin glyph outline (teardrop with its tip at the origin, head centred at `(0, -9)`).
pub const PIN_GLYPH_PATH: &str = "M0 0 C-3 -3 -6 -6 -6 -9 A 6 6 0 1 1 6 -9 C 6 -6 3 -3 0 0 Z";
pub const PIN_GLYPH_HEAD_CENTER: Vec2 = Vec2 { x: 0.0, y: -9.0 };
pub const PIN_GLYPH_HEAD_RADIUS: f64 = 6.0;

/// Filled polygon set: projected rings plus their fill triangulation.
#[derive(Debug, Clone, PartialEq)]
pub struct PathGeometry {
    pub rings: Vec<Vec<Vec2>>,
    pub triangles: Vec<[Vec2; 3]>,
    pub bounds: Aabb2,
}

impl PathGeometry {
    pub fn new(rings: Vec<Vec<Vec2>>, triangles: Vec<[Vec2; 3]>) -> Self {
        let bounds = Aabb2::from_points(rings.iter().flatten());
        Self {
            rings,
            triangles,
            bounds,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn contains(&self, p: Vec2) -> bool {
        if !self.bounds.contains(p) {
            return false;
        }
        self.triangles.iter().any(|t| triangle_contains(t, p))
    }

    /// SVG path data (`M x y L ... Z` per ring).
    pub fn to_svg_d(&self) -> String {
        let mut d = String::new();
        for ring in &self.rings {
            for (i, p) in ring.iter().enumerate() {
                let cmd = if i == 0 { 'M' } else { 'L' };
                if !d.is_empty() {
                    d.push(' ');
                }
                d.push_str(&format!("{cmd}{:.2},{:.2}", p.x, p.y));
            }
            if !ring.is_empty() {
                d.push_str(" Z");
            }
        }
        d
    }
}

fn triangle_contains(t: &[Vec2; 3], p: Vec2) -> bool {
    let cross = |a: Vec2, b: Vec2, c: Vec2| (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
    let d1 = cross(t[0], t[1], p);
    let d2 = cross(t[1], t[2], p);
    let d3 = cross(t[2], t[0], p);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape2D {
    Path(PathGeometry),
    Circle { center: Vec2, radius: f64 },
    PinGlyph,
}

impl Shape2D {
    /// Hit test in the element's local coordinates.
    pub fn contains(&self, p: Vec2) -> bool {
        match self {
            Shape2D::Path(path) => path.contains(p),
            Shape2D::Circle { center, radius } => p.distance(*center) <= *radius,
            Shape2D::PinGlyph => {
                if p.distance(PIN_GLYPH_HEAD_CENTER) <= PIN_GLYPH_HEAD_RADIUS {
                    return true;
                }
                // Tapered body between the head and the tip.
                p.y <= 0.0 && p.y >= PIN_GLYPH_HEAD_CENTER.y && p.x.abs() <= -p.y * 2.0 / 3.0
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Drawable2D {
    pub shape: Shape2D,
    pub style: Style,
}

impl Drawable2D {
    pub fn new(shape: Shape2D, style: Style) -> Self {
        Self { shape, style }
    }

    /// Unpainted drawables never receive hits.
    pub fn hit(&self, p: Vec2) -> bool {
        self.style.fill.is_some() && self.shape.contains(p)
    }
}
