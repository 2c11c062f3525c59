pub mod event_bus;
pub mod frame;
pub mod metrics;
pub mod tween;

pub use event_bus::*;
pub use frame::*;
pub use metrics::*;
pub use tween::*;
