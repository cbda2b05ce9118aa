pub mod form;
pub mod predict;
pub mod system;

pub use form::*;
pub use predict::*;
pub use system::*;
