pub mod features;
pub mod labels;
pub mod variant;

pub use features::*;
pub use labels::*;
pub use variant::*;
