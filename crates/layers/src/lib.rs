pub mod land;
pub mod layer;
pub mod pins;
pub mod symbology;

pub use land::*;
pub use layer::*;
pub use pins::*;
