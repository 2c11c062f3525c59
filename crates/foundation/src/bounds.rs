use crate::math::Vec2;

/// Axis-aligned bounding box in screen space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Aabb2 {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Aabb2 { min, max }
    }

    pub fn empty() -> Self {
        Aabb2 {
            min: [f64::INFINITY; 2],
            max: [f64::NEG_INFINITY; 2],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min[0] > self.max[0] || self.min[1] > self.max[1]
    }

    pub fn extend(&mut self, p: Vec2) {
        self.min[0] = self.min[0].min(p.x);
        self.min[1] = self.min[1].min(p.y);
        self.max[0] = self.max[0].max(p.x);
        self.max[1] = self.max[1].max(p.y);
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec2>) -> Self {
        let mut b = Self::empty();
        for p in points {
            b.extend(*p);
        }
        b
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min[0] && p.x <= self.max[0] && p.y >= self.min[1] && p.y <= self.max[1]
    }
}

#[cfg(test)]
mod tests {
    use super::Aabb2;
    use crate::math::Vec2;

    #[test]
    fn grows_to_cover_points() {
        let pts = [Vec2::new(1.0, 5.0), Vec2::new(-2.0, 3.0)];
        let b = Aabb2::from_points(pts.iter());
        assert_eq!(b, Aabb2::new([-2.0, 3.0], [1.0, 5.0]));
        assert!(b.contains(Vec2::new(0.0, 4.0)));
        assert!(!b.contains(Vec2::new(2.0, 4.0)));
    }

    #[test]
    fn empty_contains_nothing() {
        let b = Aabb2::empty();
        assert!(b.is_empty());
        assert!(!b.contains(Vec2::new(0.0, 0.0)));
    }
}
