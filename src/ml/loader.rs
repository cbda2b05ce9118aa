//! Model Loader: turns the configured artifact into the process-wide handle.
//!
//! Loading happens once before serving starts. A failure is logged and
//! leaves the handle absent for the whole process lifetime; there is no
//! reload.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

use super::model::{Model, ModelArtifact};
use crate::domain::Variant;
use crate::error::{GateError, Result};

/// Shared, read-only reference to the loaded model, or nothing.
#[derive(Clone, Default)]
pub struct ModelHandle {
    model: Option<Arc<dyn Model>>,
}

impl ModelHandle {
    pub fn new(model: Arc<dyn Model>) -> Self {
        Self { model: Some(model) }
    }

    pub fn absent() -> Self {
        Self { model: None }
    }

    /// Load the artifact at `path` for `variant`. Never fails: errors are
    /// logged and produce an absent handle.
    pub fn load(path: &Path, variant: Variant) -> Self {
        match try_load(path, variant) {
            Ok(model) => {
                info!(
                    path = %path.display(),
                    kind = model.kind(),
                    input_dim = model.input_dim(),
                    %variant,
                    "Model loaded"
                );
                Self::new(model)
            }
            Err(e) => {
                error!(path = %path.display(), %variant, error = %e, "Failed to load model");
                Self::absent()
            }
        }
    }

    pub fn get(&self) -> Option<&Arc<dyn Model>> {
        self.model.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.model {
            Some(m) => f
                .debug_struct("ModelHandle")
                .field("kind", &m.kind())
                .field("input_dim", &m.input_dim())
                .finish(),
            None => f.write_str("ModelHandle(absent)"),
        }
    }
}

/// Read, validate and arity-check an artifact.
pub fn try_load(path: &Path, variant: Variant) -> Result<Arc<dyn Model>> {
    let model = ModelArtifact::from_file(path)?.into_model();
    if model.input_dim() != variant.arity() {
        return Err(GateError::Validation(format!(
            "model expects {} features but the {} variant supplies {}",
            model.input_dim(),
            variant,
            variant.arity()
        )));
    }
    Ok(model)
}

/// Resolve a configured model path.
///
/// Relative paths are looked up next to the running executable first, then
/// against the working directory. When neither exists the working-directory
/// path is returned so the load failure names it.
pub fn resolve_model_path(path: &Path) -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    resolve_from(path, exe_dir.as_deref())
}

fn resolve_from(path: &Path, exe_dir: Option<&Path>) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    if let Some(candidate) = exe_dir.map(|dir| dir.join(path)) {
        if candidate.is_file() {
            return candidate;
        }
    }
    path.to_path_buf()
}
