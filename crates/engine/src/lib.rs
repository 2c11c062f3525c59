//! Interactive world map: pin markers over a projected basemap with
//! persistent pan/zoom, hit testing and focus animation.

pub mod config;
pub mod engine;
pub mod input;
pub mod resize;
pub mod summary;

pub use config::*;
pub use engine::*;
pub use input::*;
pub use resize::*;
pub use summary::*;

pub use viewport::{GestureState, Transform, WheelMode};
