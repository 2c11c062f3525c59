use std::sync::Arc;

use earcutr::earcut;
use formats::world_geometry::{LandFeature, WorldGeometry};
use foundation::math::{Projection, Vec2};
use scene::components::{Drawable2D, PathGeometry, Shape2D};
use scene::{ElementId, ElementRole, World};

use crate::layer::{LAND_LAYER_ID, Layer, LayerId};
use crate::symbology::land_style;

/// Country paths, built once from the world geometry and re-laid out on resize.
#[derive(Debug)]
pub struct LandLayer {
    element: ElementId,
    geometry: Option<Arc<WorldGeometry>>,
    /// One path element per feature, in feature order.
    paths: Vec<ElementId>,
    hovered: Option<ElementId>,
}

impl LandLayer {
    /// Creates the empty layer group under `parent`.
    pub fn new(world: &mut World, parent: ElementId) -> Self {
        Self {
            element: world.spawn(parent, ElementRole::LandLayer),
            geometry: None,
            paths: Vec::new(),
            hovered: None,
        }
    }

    pub fn has_geometry(&self) -> bool {
        self.geometry.is_some()
    }

    pub fn paths(&self) -> &[ElementId] {
        &self.paths
    }

    pub fn hovered(&self) -> Option<ElementId> {
        self.hovered
    }

    pub fn is_land_path(&self, id: ElementId) -> bool {
        self.paths.contains(&id)
    }

    /// Builds one path per feature. Ignored if geometry was already set.
    pub fn set_geometry(
        &mut self,
        world: &mut World,
        geometry: Arc<WorldGeometry>,
        projection: &Projection,
    ) -> bool {
        if self.geometry.is_some() {
            return false;
        }
        for feature in &geometry.features {
            let id = world.spawn(self.element, ElementRole::LandPath);
            world.set_drawable(
                id,
                Drawable2D::new(
                    Shape2D::Path(project_feature(feature, projection)),
                    land_style(false),
                ),
            );
            self.paths.push(id);
        }
        self.geometry = Some(geometry);
        true
    }

    /// Re-projects every path for a new container size. Hover state is kept.
    pub fn relayout(&mut self, world: &mut World, projection: &Projection) {
        let Some(geometry) = &self.geometry else {
            return;
        };
        for (feature, id) in geometry.features.iter().zip(&self.paths) {
            if let Some(drawable) = world.drawable_mut(*id) {
                drawable.shape = Shape2D::Path(project_feature(feature, projection));
            }
        }
    }

    /// Moves the hover highlight. `None` or a non-land id clears it.
    pub fn set_hover(&mut self, world: &mut World, target: Option<ElementId>) {
        let target = target.filter(|id| self.is_land_path(*id));
        if target == self.hovered {
            return;
        }
        if let Some(prev) = self.hovered.take() {
            apply_hover(world, prev, false);
        }
        if let Some(next) = target {
            apply_hover(world, next, true);
        }
        self.hovered = target;
    }
}

impl Layer for LandLayer {
    fn id(&self) -> LayerId {
        LAND_LAYER_ID
    }

    fn element(&self) -> ElementId {
        self.element
    }
}

fn apply_hover(world: &mut World, id: ElementId, hovered: bool) {
    world.set_hovered(id, hovered);
    if let Some(drawable) = world.drawable_mut(id) {
        drawable.style = land_style(hovered);
    }
}

/// Projects a feature's rings and triangulates the fill.
pub fn project_feature(feature: &LandFeature, projection: &Projection) -> PathGeometry {
    let mut all_rings = Vec::new();
    let mut triangles = Vec::new();
    for polygon in &feature.polygons {
        let mut coords: Vec<f64> = Vec::new();
        let mut vertices: Vec<Vec2> = Vec::new();
        let mut hole_indices: Vec<usize> = Vec::new();

        for (ring_i, ring) in polygon.iter().enumerate() {
            let mut pts: Vec<Vec2> = ring
                .iter()
                .filter_map(|g| projection.forward(*g))
                .collect();
            drop_closing_duplicate(&mut pts);
            if pts.len() < 3 {
                if ring_i == 0 {
                    break;
                }
                continue;
            }
            if ring_i > 0 {
                hole_indices.push(vertices.len());
            }
            for p in &pts {
                coords.push(p.x);
                coords.push(p.y);
            }
            vertices.extend_from_slice(&pts);
            all_rings.push(pts);
        }

        if vertices.len() < 3 {
            continue;
        }
        let indices = match earcut(&coords, &hole_indices, 2) {
            Ok(ix) => ix,
            Err(_) => continue,
        };
        for tri in indices.chunks_exact(3) {
            if let (Some(a), Some(b), Some(c)) =
                (vertices.get(tri[0]), vertices.get(tri[1]), vertices.get(tri[2]))
            {
                triangles.push([*a, *b, *c]);
            }
        }
    }
    PathGeometry::new(all_rings, triangles)
}

fn drop_closing_duplicate(points: &mut Vec<Vec2>) {
    if points.len() >= 2
        && let (Some(first), Some(last)) = (points.first(), points.last())
        && (first.x - last.x).abs() < 1e-9
        && (first.y - last.y).abs() < 1e-9
    {
        points.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbology::{LAND_FILL, LAND_FILL_HOVER};
    use foundation::math::GeoPoint;

    fn square(lon: f64, lat: f64, size: f64) -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(lon, lat),
            GeoPoint::new(lon + size, lat),
            GeoPoint::new(lon + size, lat + size),
            GeoPoint::new(lon, lat + size),
            GeoPoint::new(lon, lat),
        ]
    }

    fn sample_world() -> Arc<WorldGeometry> {
        Arc::new(WorldGeometry {
            features: vec![
                LandFeature {
                    id: Some("A".into()),
                    name: None,
                    polygons: vec![vec![square(-10.0, -10.0, 20.0), square(-2.0, -2.0, 4.0)]],
                },
                LandFeature {
                    id: Some("B".into()),
                    name: None,
                    polygons: vec![vec![square(40.0, 10.0, 10.0)], vec![square(60.0, 10.0, 5.0)]],
                },
            ],
            skipped: 0,
        })
    }

    fn fill_of(world: &World, id: ElementId) -> Option<scene::components::Color> {
        world.drawable(id).and_then(|d| d.style.fill)
    }

    #[test]
    fn builds_one_path_per_feature_with_holes() {
        let mut world = World::new();
        let root = world.root();
        let mut land = LandLayer::new(&mut world, root);
        let proj = Projection::fit(800.0, 600.0);
        assert!(land.set_geometry(&mut world, sample_world(), &proj));
        assert_eq!(land.paths().len(), 2);
        assert!(!land.set_geometry(&mut world, sample_world(), &proj));
        assert_eq!(land.paths().len(), 2);

        let Some(Drawable2D {
            shape: Shape2D::Path(path),
            ..
        }) = world.drawable(land.paths()[0])
        else {
            panic!("expected a path");
        };
        assert_eq!(path.rings.len(), 2);
        let inside = proj.forward(GeoPoint::new(-6.0, 0.0)).unwrap();
        let in_hole = proj.forward(GeoPoint::new(0.0, 0.0)).unwrap();
        assert!(path.contains(inside));
        assert!(!path.contains(in_hole));
    }

    #[test]
    fn relayout_follows_projection() {
        let mut world = World::new();
        let root = world.root();
        let mut land = LandLayer::new(&mut world, root);
        land.set_geometry(&mut world, sample_world(), &Projection::fit(800.0, 600.0));
        let id = land.paths()[1];
        let before = match &world.drawable(id).unwrap().shape {
            Shape2D::Path(p) => p.bounds,
            _ => unreachable!(),
        };
        land.relayout(&mut world, &Projection::fit(1600.0, 1200.0));
        let after = match &world.drawable(id).unwrap().shape {
            Shape2D::Path(p) => p.bounds,
            _ => unreachable!(),
        };
        assert!(after.max[0] - after.min[0] > 1.9 * (before.max[0] - before.min[0]));
    }

    #[test]
    fn hover_swaps_fill() {
        let mut world = World::new();
        let root = world.root();
        let mut land = LandLayer::new(&mut world, root);
        land.set_geometry(&mut world, sample_world(), &Projection::fit(800.0, 600.0));
        let (a, b) = (land.paths()[0], land.paths()[1]);

        land.set_hover(&mut world, Some(a));
        assert_eq!(fill_of(&world, a), Some(LAND_FILL_HOVER));
        land.set_hover(&mut world, Some(b));
        assert_eq!(fill_of(&world, a), Some(LAND_FILL));
        assert_eq!(fill_of(&world, b), Some(LAND_FILL_HOVER));
        land.set_hover(&mut world, Some(land.element()));
        assert_eq!(land.hovered(), None);
        assert_eq!(fill_of(&world, b), Some(LAND_FILL));
    }
}
