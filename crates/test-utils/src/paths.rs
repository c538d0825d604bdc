//! Path utilities for locating test data files.

use std::path::PathBuf;

/// Returns the workspace root directory.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// Returns `crates/{crate_name}/testdata/`.
pub fn crate_testdata_dir(crate_name: &str) -> PathBuf {
    workspace_root()
        .join("crates")
        .join(crate_name)
        .join("testdata")
}

/// Returns the shipped model registry, `config/models.yaml`.
pub fn registry_path() -> PathBuf {
    workspace_root().join("config").join("models.yaml")
}

/// Searches for a test file in multiple locations.
///
/// Checked in order:
/// 1. `TEST_DATA_DIR` (if set)
/// 2. `CTM_MODEL_DIR` (if set)
/// 3. `testdata/` at the workspace root
/// 4. `crates/netcdf-parser/testdata/`
pub fn find_test_file(name: &str) -> Option<PathBuf> {
    let mut candidates = Vec::new();

    for var in ["TEST_DATA_DIR", "CTM_MODEL_DIR"] {
        if let Ok(dir) = std::env::var(var) {
            candidates.push(PathBuf::from(dir).join(name));
        }
    }

    let root = workspace_root();
    candidates.push(root.join("testdata").join(name));
    candidates.push(crate_testdata_dir("netcdf-parser").join(name));

    candidates.into_iter().find(|p| p.exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_root_has_manifest() {
        assert!(workspace_root().join("Cargo.toml").exists());
    }

    #[test]
    fn test_missing_file() {
        assert!(find_test_file("definitely_not_a_model_42.nc").is_none());
    }
}
