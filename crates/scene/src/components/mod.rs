pub mod drawable2d;
pub mod style;
pub mod transform;

pub use drawable2d::*;
pub use style::*;
pub use transform::*;
