//! Scene options with TOML preset support.
//!
//! Every family's construction-time parameters live here: counts, shapes,
//! scatter radius, damping, strategy, separation, palette and idle motion.
//! Options are set at construction only; changing them means rebuilding
//! the scene. All structs use `#[serde(default)]` so partial TOML files work.

mod family;

use std::path::Path;

pub use family::{
    AttributeOptions, FamilyOptions, PaletteEntry, SeparationOptions,
    ShapeOptions, StrategyOptions,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::MorphError;

/// Top-level options container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct Options {
    /// Seed for the scene's random source; `None` draws from the thread RNG.
    pub seed: Option<u64>,
    /// Families, built and advanced in this order.
    pub families: Vec<FamilyOptions>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            seed: None,
            families: family::tree_families(),
        }
    }
}

impl Options {
    /// Generate JSON Schema describing the options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::OptionsParse`] if the TOML is malformed.
    pub fn from_toml_str(content: &str) -> Result<Self, MorphError> {
        toml::from_str(content)
            .map_err(|e| MorphError::OptionsParse(e.to_string()))
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::Io`] if the file cannot be read and
    /// [`MorphError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, MorphError> {
        let content = std::fs::read_to_string(path)?;
        let options = Self::from_toml_str(&content)?;
        log::info!(
            "Loaded scene preset '{}' ({} families)",
            path.display(),
            options.families.len()
        );
        Ok(options)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::Io`] if the file or its parent directory cannot be
    /// written.
    pub fn save(&self, path: &Path) -> Result<(), MorphError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MorphError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        log::info!("Saved scene preset '{}'", path.display());
        Ok(())
    }

    /// Options for a single family.
    #[must_use]
    pub fn family(&self, name: &str) -> Option<&FamilyOptions> {
        self.families.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::TargetState;
    use crate::sampling::ShapeVolumeSpec;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed = Options::from_toml_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn default_scene_is_a_tree() {
        let opts = Options::default();
        let names: Vec<&str> =
            opts.families.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["foliage", "ornaments", "garland", "gifts"]);
        assert!(opts.family("gifts").unwrap().separation.is_some());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
seed = 7

[[families]]
name = "snow"
count = 12
damping = 0.3
initial_state = "assembled"

[families.shape]
kind = "volume"
height = 4.0
bias_exponent = 2.0

[families.strategy]
kind = "weighted_lag"
base_rate = 3.0
offset = 0.25
easing = "linear"
"#;
        let opts = Options::from_toml_str(toml_str).unwrap();
        assert_eq!(opts.seed, Some(7));
        assert_eq!(opts.families.len(), 1);
        let snow = &opts.families[0];
        assert_eq!(snow.count, 12);
        assert_eq!(snow.initial_state, TargetState::Assembled);
        assert_eq!(snow.scatter_radius, 18.0);
        let ShapeOptions::Volume(spec) = &snow.shape else {
            panic!("expected volume shape");
        };
        assert_eq!(spec.height, 4.0);
        assert_eq!(spec.base_radius, ShapeVolumeSpec::default().base_radius);
        assert!(matches!(
            snow.strategy,
            StrategyOptions::WeightedLag { base_rate, .. } if base_rate == 3.0
        ));
    }

    #[test]
    fn malformed_toml_is_an_options_error() {
        let err = Options::from_toml_str("families = 3").unwrap_err();
        assert!(matches!(err, MorphError::OptionsParse(_)));
    }

    #[test]
    fn save_and_load_preset() {
        let dir = std::env::temp_dir()
            .join(format!("morphe-options-{}", std::process::id()));
        let path = dir.join("tree.toml");
        let opts = Options {
            seed: Some(11),
            ..Options::default()
        };
        opts.save(&path).unwrap();
        let loaded = Options::load(&path).unwrap();
        assert_eq!(opts, loaded);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();
        assert!(props.contains_key("seed"));
        assert!(props.contains_key("families"));
    }
}
