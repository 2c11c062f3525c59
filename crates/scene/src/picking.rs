use foundation::math::Vec2;

use crate::World;
use crate::components::Transform2D;
use crate::entity::ElementId;

/// Topmost element under a point, in root (screen) space.
///
/// Elements are tested in reverse paint order: later siblings before earlier
/// ones, children before their parent. Only elements with a painted drawable
/// receive hits; the test runs in each element's local coordinates.
pub fn pick(world: &World, point: Vec2) -> Option<ElementId> {
    pick_in(world, world.root(), Transform2D::identity(), point)
}

/// Like [`pick`], restricted to the subtree under `scope`.
pub fn pick_within(world: &World, scope: ElementId, point: Vec2) -> Option<ElementId> {
    let parent = match world.parent(scope) {
        Some(p) => world.world_transform(p)?,
        None => Transform2D::identity(),
    };
    pick_in(world, scope, parent, point)
}

fn pick_in(world: &World, id: ElementId, parent: Transform2D, point: Vec2) -> Option<ElementId> {
    let element = world.get(id)?;
    let xf = parent.then(&element.transform);
    for child in element.children.iter().rev() {
        if let Some(hit) = pick_in(world, *child, xf, point) {
            return Some(hit);
        }
    }
    let drawable = element.drawable.as_ref()?;
    let local = xf.invert(point)?;
    drawable.hit(local).then_some(id)
}

#[cfg(test)]
mod tests {
    use super::{pick, pick_within};
    use crate::components::{Color, Drawable2D, Shape2D, Style, Transform2D};
    use crate::world::{ElementRole, World};
    use foundation::math::Vec2;

    fn disc(world: &mut World, parent: crate::ElementId, at: Vec2, r: f64) -> crate::ElementId {
        let id = world.spawn(parent, ElementRole::MarkerHitArea);
        world.set_transform(id, Transform2D::new(at, 1.0));
        world.set_drawable(
            id,
            Drawable2D::new(
                Shape2D::Circle {
                    center: Vec2::ZERO,
                    radius: r,
                },
                Style::filled(Color::TRANSPARENT),
            ),
        );
        id
    }

    #[test]
    fn later_siblings_win() {
        let mut world = World::new();
        let root = world.root();
        let a = disc(&mut world, root, Vec2::new(0.0, 0.0), 10.0);
        let b = disc(&mut world, root, Vec2::new(5.0, 0.0), 10.0);
        assert_eq!(pick(&world, Vec2::new(2.0, 0.0)), Some(b));
        assert_eq!(pick(&world, Vec2::new(-8.0, 0.0)), Some(a));
        assert_eq!(pick(&world, Vec2::new(50.0, 0.0)), None);
    }

    #[test]
    fn hit_test_respects_ancestor_scale() {
        let mut world = World::new();
        let group = world.spawn(world.root(), ElementRole::ZoomGroup);
        world.set_transform(group, Transform2D::new(Vec2::new(100.0, 0.0), 4.0));
        let marker = world.spawn(group, ElementRole::Marker);
        world.set_transform(marker, Transform2D::new(Vec2::new(10.0, 10.0), 0.25));
        let hit = disc(&mut world, marker, Vec2::ZERO, 15.0);

        // Marker origin lands at (140, 40); radius 15 * 0.25 * 4 = 15 screen px.
        assert_eq!(pick(&world, Vec2::new(154.0, 40.0)), Some(hit));
        assert_eq!(pick(&world, Vec2::new(156.0, 40.0)), None);
        assert_eq!(world.closest(hit, ElementRole::Marker), Some(marker));
        assert_eq!(pick_within(&world, marker, Vec2::new(140.0, 40.0)), Some(hit));
    }
}
