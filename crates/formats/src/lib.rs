pub mod world_geometry;

pub use world_geometry::*;
