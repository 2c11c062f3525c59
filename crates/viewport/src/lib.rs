//! Pan/zoom state for the map: the viewport transform, the gesture state
//! machine that mutates it, and the smooth-zoom animation used by focus.

pub mod config;
pub mod controller;
pub mod interpolate;
pub mod transform;

pub use config::*;
pub use controller::*;
pub use interpolate::*;
pub use transform::*;
