use foundation::arena::Arena;

use crate::components::{Drawable2D, Transform2D};
use crate::entity::ElementId;

/// What an element is for. Layers use this to classify hits.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ElementRole {
    Root,
    ZoomGroup,
    LandLayer,
    PinsLayer,
    LandPath,
    Marker,
    MarkerGlyph,
    MarkerEye,
    MarkerHitArea,
}

#[derive(Debug, Clone)]
pub struct Element {
    pub role: ElementRole,
    pub parent: Option<ElementId>,
    /// Paint order: later children are painted over earlier ones.
    pub children: Vec<ElementId>,
    pub transform: Transform2D,
    pub drawable: Option<Drawable2D>,
    pub hovered: bool,
}

impl Element {
    fn new(role: ElementRole, parent: Option<ElementId>) -> Self {
        Self {
            role,
            parent,
            children: Vec::new(),
            transform: Transform2D::identity(),
            drawable: None,
            hovered: false,
        }
    }
}

/// Retained element tree.
#[derive(Debug)]
pub struct World {
    elements: Arena<Element>,
    root: ElementId,
    spawned: u64,
    despawned: u64,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        let mut elements = Arena::new();
        let root = ElementId(elements.alloc(Element::new(ElementRole::Root, None)));
        Self {
            elements,
            root,
            spawned: 0,
            despawned: 0,
        }
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Total elements created since construction, root excluded.
    pub fn spawned_total(&self) -> u64 {
        self.spawned
    }

    pub fn despawned_total(&self) -> u64 {
        self.despawned
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains(id.0)
    }

    /// Appends a new last child of `parent`. If `parent` no longer exists the
    /// element is created detached and is never painted or picked.
    pub fn spawn(&mut self, parent: ElementId, role: ElementRole) -> ElementId {
        let attached = self.contains(parent).then_some(parent);
        let id = ElementId(self.elements.alloc(Element::new(role, attached)));
        if let Some(p) = attached.and_then(|p| self.elements.get_mut(p.0)) {
            p.children.push(id);
        }
        self.spawned += 1;
        id
    }

    /// Removes `id` and its whole subtree. Returns the number of elements removed.
    pub fn despawn(&mut self, id: ElementId) -> usize {
        if id == self.root || !self.contains(id) {
            return 0;
        }
        let parent = self.parent(id);
        if let Some(parent) = parent
            && let Some(p) = self.elements.get_mut(parent.0)
        {
            p.children.retain(|c| *c != id);
        }
        let mut removed = 0;
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(element) = self.elements.remove(next.0) {
                stack.extend(element.children);
                removed += 1;
            }
        }
        self.despawned += removed as u64;
        removed
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id.0)
    }

    pub fn role(&self, id: ElementId) -> Option<ElementRole> {
        self.get(id).map(|e| e.role)
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.get(id).and_then(|e| e.parent)
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.get(id).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    pub fn set_transform(&mut self, id: ElementId, transform: Transform2D) -> bool {
        match self.get_mut(id) {
            Some(e) => {
                e.transform = transform;
                true
            }
            None => false,
        }
    }

    pub fn transform(&self, id: ElementId) -> Option<Transform2D> {
        self.get(id).map(|e| e.transform)
    }

    pub fn set_drawable(&mut self, id: ElementId, drawable: Drawable2D) -> bool {
        match self.get_mut(id) {
            Some(e) => {
                e.drawable = Some(drawable);
                true
            }
            None => false,
        }
    }

    pub fn drawable(&self, id: ElementId) -> Option<&Drawable2D> {
        self.get(id).and_then(|e| e.drawable.as_ref())
    }

    pub fn drawable_mut(&mut self, id: ElementId) -> Option<&mut Drawable2D> {
        self.get_mut(id).and_then(|e| e.drawable.as_mut())
    }

    pub fn set_hovered(&mut self, id: ElementId, hovered: bool) -> bool {
        match self.get_mut(id) {
            Some(e) => {
                e.hovered = hovered;
                true
            }
            None => false,
        }
    }

    pub fn is_hovered(&self, id: ElementId) -> bool {
        self.get(id).is_some_and(|e| e.hovered)
    }

    /// Composed transform from `id`'s local space to root space.
    pub fn world_transform(&self, id: ElementId) -> Option<Transform2D> {
        let mut chain = Vec::new();
        let mut cur = Some(id);
        while let Some(c) = cur {
            let e = self.get(c)?;
            chain.push(e.transform);
            cur = e.parent;
        }
        Some(
            chain
                .iter()
                .rev()
                .fold(Transform2D::identity(), |acc, t| acc.then(t)),
        )
    }

    /// Nearest ancestor-or-self with the given role.
    pub fn closest(&self, id: ElementId, role: ElementRole) -> Option<ElementId> {
        let mut cur = Some(id);
        while let Some(c) = cur {
            let e = self.get(c)?;
            if e.role == role {
                return Some(c);
            }
            cur = e.parent;
        }
        None
    }

    /// Elements in paint order (depth-first, parents before children).
    pub fn paint_order(&self) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    pub fn count_role(&self, role: ElementRole) -> usize {
        self.elements.iter().filter(|(_, e)| e.role == role).count()
    }
}
