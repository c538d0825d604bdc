//! Model registry.
//!
//! Describes the native layout of every supported model file so the
//! normalizer can map it onto the canonical schema without model-specific
//! code. The registry is loaded from YAML; the built-in one is the
//! workspace's `config/models.yaml`.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use ctm_common::{Coordinate, CtmError, CtmResult, RawGrid};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::grid::CanonicalGrid;
use crate::normalize::normalize;

/// Registry compiled into the binary.
const BUILTIN_REGISTRY: &str = include_str!("../../../config/models.yaml");

/// Linear unit conversion `value * scale + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitTransform {
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default)]
    pub offset: f64,
}

fn default_scale() -> f64 {
    1.0
}

impl Default for UnitTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl UnitTransform {
    pub const IDENTITY: UnitTransform = UnitTransform {
        scale: 1.0,
        offset: 0.0,
    };

    /// Kilometres to metres.
    pub const KM_TO_M: UnitTransform = UnitTransform {
        scale: 1000.0,
        offset: 0.0,
    };

    /// Kelvin to degrees Celsius.
    pub const KELVIN_TO_CELSIUS: UnitTransform = UnitTransform {
        scale: 1.0,
        offset: -273.15,
    };

    #[inline]
    pub fn apply(&self, value: f64) -> f64 {
        value * self.scale + self.offset
    }

    pub fn is_identity(&self) -> bool {
        self.scale == 1.0 && self.offset == 0.0
    }
}

/// Native dimension names of a model file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeDimensions {
    pub longitude: String,
    pub latitude: String,
    pub depth: String,
}

impl Default for NativeDimensions {
    fn default() -> Self {
        Self {
            longitude: "longitude".to_string(),
            latitude: "latitude".to_string(),
            depth: "depth".to_string(),
        }
    }
}

impl NativeDimensions {
    /// Native name of a canonical coordinate.
    pub fn name(&self, coordinate: Coordinate) -> &str {
        match coordinate {
            Coordinate::Longitude => &self.longitude,
            Coordinate::Latitude => &self.latitude,
            Coordinate::Depth => &self.depth,
        }
    }
}

fn default_temperature_variable() -> String {
    "temperature".to_string()
}

/// Static description of one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Model name, e.g. `Lee_2025`
    pub name: String,
    /// Short tag written to output headers, e.g. `lee25`
    pub abbreviation: String,
    #[serde(default)]
    pub description: String,
    /// Default file name or path of the model
    #[serde(default)]
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub dimensions: NativeDimensions,
    /// Native temperature variable
    #[serde(default = "default_temperature_variable")]
    pub temperature: String,
    /// Native depth unit to metres
    #[serde(default)]
    pub depth_transform: UnitTransform,
    /// Native temperature unit to °C
    #[serde(default)]
    pub temperature_transform: UnitTransform,
    /// Add a depth = 0 layer by linear extrapolation when the model starts below the surface
    #[serde(default)]
    pub extrapolate_to_surface: bool,
}

impl ModelDescriptor {
    /// Descriptor with default native names and no unit conversion.
    pub fn new(name: impl Into<String>, abbreviation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            abbreviation: abbreviation.into(),
            description: String::new(),
            file: None,
            dimensions: NativeDimensions::default(),
            temperature: default_temperature_variable(),
            depth_transform: UnitTransform::IDENTITY,
            temperature_transform: UnitTransform::IDENTITY,
            extrapolate_to_surface: false,
        }
    }

    /// Every native variable the normalizer reads: three coordinates and temperature.
    pub fn native_variables(&self) -> [&str; 4] {
        [
            self.dimensions.longitude.as_str(),
            self.dimensions.latitude.as_str(),
            self.dimensions.depth.as_str(),
            self.temperature.as_str(),
        ]
    }

    fn validate(&self) -> CtmResult<()> {
        if self.name.trim().is_empty() {
            return Err(CtmError::Config("model with empty name".to_string()));
        }
        let names: HashSet<&str> = Coordinate::ALL
            .iter()
            .map(|c| self.dimensions.name(*c))
            .collect();
        if names.len() != 3 || names.contains("") {
            return Err(CtmError::Config(format!(
                "model {}: dimension names must be distinct and non-empty",
                self.name
            )));
        }
        for (what, t) in [
            ("depth_transform", &self.depth_transform),
            ("temperature_transform", &self.temperature_transform),
        ] {
            if !t.scale.is_finite() || t.scale == 0.0 || !t.offset.is_finite() {
                return Err(CtmError::Config(format!(
                    "model {}: {} must have a finite non-zero scale and a finite offset",
                    self.name, what
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    models: Vec<ModelDescriptor>,
}

/// Registry of model descriptors, in file order.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: Vec<ModelDescriptor>,
}

impl ModelRegistry {
    /// Registry from a list of descriptors.
    pub fn new(models: Vec<ModelDescriptor>) -> CtmResult<Self> {
        let mut seen = HashSet::new();
        for model in &models {
            model.validate()?;
            if !seen.insert(model.name.as_str()) {
                return Err(CtmError::Config(format!("duplicate model {}", model.name)));
            }
        }
        Ok(Self { models })
    }

    /// The registry shipped with the workspace.
    pub fn builtin() -> CtmResult<Self> {
        Self::from_yaml(BUILTIN_REGISTRY)
    }

    /// Parse a registry from YAML text.
    pub fn from_yaml(text: &str) -> CtmResult<Self> {
        let file: RegistryFile = serde_yaml::from_str(text)
            .map_err(|e| CtmError::Config(format!("invalid model registry: {}", e)))?;
        let registry = Self::new(file.models)?;
        debug!(
            count = registry.len(),
            models = ?registry.names().collect::<Vec<_>>(),
            "Loaded model registry"
        );
        Ok(registry)
    }

    /// Load a registry from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> CtmResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            CtmError::Config(format!("failed to read registry {}: {}", path.display(), e))
        })?;
        let registry = Self::from_yaml(&contents)?;
        info!(path = %path.display(), count = registry.len(), "Loaded model registry file");
        Ok(registry)
    }

    /// Look up a model by exact name.
    pub fn get(&self, name: &str) -> CtmResult<&ModelDescriptor> {
        self.models
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| CtmError::UnknownModel(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.iter().map(|m| m.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelDescriptor> {
        self.models.iter()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Normalize a raw grid with the named model's descriptor.
    pub fn normalize(&self, name: &str, raw: &RawGrid) -> CtmResult<CanonicalGrid> {
        normalize(self.get(name)?, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry() {
        let registry = ModelRegistry::builtin().unwrap();
        let names: Vec<_> = registry.names().collect();
        assert_eq!(
            names,
            vec!["Lee_2025", "Lee_2026", "Shinevar_2018", "Shinevar_2024", "Boyd_2019", "Suietal_2025"]
        );

        let lee = registry.get("Lee_2025").unwrap();
        assert_eq!(lee.abbreviation, "lee25");
        assert_eq!(lee.temperature, "temperature_diffused");
        assert_eq!(lee.depth_transform, UnitTransform::KM_TO_M);
        assert!(!lee.extrapolate_to_surface);

        let shinevar = registry.get("Shinevar_2018").unwrap();
        assert_eq!(shinevar.abbreviation, "shinevar18");
        assert_eq!(shinevar.temperature, "temperature");
        assert!(shinevar.depth_transform.is_identity());
    }

    #[test]
    fn test_unknown_model() {
        let registry = ModelRegistry::builtin().unwrap();
        let err = registry.get("Lee_2099").unwrap_err();
        assert!(matches!(err, CtmError::UnknownModel(ref name) if name == "Lee_2099"));
    }

    #[test]
    fn test_defaults_from_yaml() {
        let registry = ModelRegistry::from_yaml("models:\n  - name: Test\n    abbreviation: t\n").unwrap();
        let model = registry.get("Test").unwrap();
        assert_eq!(model.dimensions, NativeDimensions::default());
        assert_eq!(model.temperature, "temperature");
        assert!(model.temperature_transform.is_identity());
        assert!(model.file.is_none());
    }

    #[test]
    fn test_duplicate_models_rejected() {
        let yaml = "models:\n  - name: A\n    abbreviation: a\n  - name: A\n    abbreviation: b\n";
        assert!(matches!(ModelRegistry::from_yaml(yaml), Err(CtmError::Config(_))));
    }

    #[test]
    fn test_zero_scale_rejected() {
        let yaml = "models:\n  - name: A\n    abbreviation: a\n    depth_transform:\n      scale: 0\n";
        assert!(matches!(ModelRegistry::from_yaml(yaml), Err(CtmError::Config(_))));
    }

    #[test]
    fn test_shared_dimension_names_rejected() {
        let mut model = ModelDescriptor::new("A", "a");
        model.dimensions.depth = "latitude".to_string();
        assert!(ModelRegistry::new(vec![model]).is_err());
    }

    #[test]
    fn test_load_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "models:\n  - name: Local\n    abbreviation: loc\n    file: /data/local.nc").unwrap();
        let registry = ModelRegistry::load(file.path()).unwrap();
        assert_eq!(registry.get("Local").unwrap().file, Some(PathBuf::from("/data/local.nc")));

        let missing = ModelRegistry::load("/nonexistent/models.yaml");
        assert!(matches!(missing, Err(CtmError::Config(_))));
    }

    #[test]
    fn test_unit_transform() {
        assert_eq!(UnitTransform::KM_TO_M.apply(2.5), 2500.0);
        assert!((UnitTransform::KELVIN_TO_CELSIUS.apply(300.0) - 26.85).abs() < 1e-9);
    }
}
