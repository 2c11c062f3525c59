use scene::ElementId;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LayerId(pub u64);

pub const LAND_LAYER_ID: LayerId = LayerId(1);
pub const PINS_LAYER_ID: LayerId = LayerId(2);

pub trait Layer {
    fn id(&self) -> LayerId;

    /// Group element that holds this layer's content.
    fn element(&self) -> ElementId;
}
