//! Registry and model file resolution.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use thermal_grid::{ModelDescriptor, ModelRegistry};
use tracing::debug;

/// Directory searched for model files named in the registry.
pub const MODEL_DIR_ENV: &str = "CTM_MODEL_DIR";

/// Load the registry from `path`, or the built-in one.
pub fn load_registry(path: Option<&Path>) -> Result<ModelRegistry> {
    match path {
        Some(path) => ModelRegistry::load(path)
            .with_context(|| format!("Failed to load model registry {}", path.display())),
        None => ModelRegistry::builtin().context("Built-in model registry is invalid"),
    }
}

/// Pick the file to read for a model.
///
/// An explicit path always wins. Otherwise the descriptor's `file` is used
/// as given when it exists, then looked up under `model_dir`.
pub fn resolve_model_path(
    descriptor: &ModelDescriptor,
    explicit: Option<&Path>,
    model_dir: Option<&Path>,
) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    let Some(file) = descriptor.file.as_deref() else {
        bail!(
            "Model {} has no default file; pass --model-path",
            descriptor.name
        );
    };

    if file.exists() || file.is_absolute() {
        return Ok(file.to_path_buf());
    }

    match model_dir {
        Some(dir) => {
            let candidate = dir.join(file);
            debug!(path = %candidate.display(), "Resolved model file from model directory");
            Ok(candidate)
        }
        None => Ok(file.to_path_buf()),
    }
}

/// [`MODEL_DIR_ENV`], if set.
pub fn model_dir_from_env() -> Option<PathBuf> {
    env::var_os(MODEL_DIR_ENV).map(PathBuf::from)
}
