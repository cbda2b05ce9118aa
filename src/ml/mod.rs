//! Model artifacts and the Model Loader.
//!
//! Artifacts are plain JSON so they can be produced by any training
//! toolchain and loaded without native dependencies.

pub mod dense;
pub mod forest;
pub mod loader;
pub mod model;

pub use dense::{Activation, DenseLayer, DenseNetwork, OutputHead};
pub use forest::{DecisionForest, DecisionTree, ForestTask, TreeNode};
pub use loader::{resolve_model_path, try_load, ModelHandle};
pub use model::{Model, ModelArtifact};

#[cfg(test)]
pub use model::MockModel;
