// In: src/config.rs

//! The single source of truth for all starflow workflow configuration.
//!
//! This module defines the unified `StarflowConfig` struct, which is created
//! once per run (from defaults, the parameter store, and the dialog) and then
//! passed read-only through the orchestrator. Dialog edits produce a new
//! value; nothing mutates a config mid-run.

use serde::{Deserialize, Serialize};

use crate::error::StarflowError;
use crate::store::ParameterStore;

//==================================================================================
// I. Persistence Keys & Field Metadata
//==================================================================================

pub mod keys {
    //! Names under which fields are persisted in the parameter store.
    pub const SHARPEN_STARS: &str = "sharpenStars";
    pub const SHARPEN_NONSTELLAR: &str = "sharpenNonstellar";
    pub const ADJUST_HALOS: &str = "adjustHalos";
    pub const OVERLAP: &str = "overlap";
    pub const CORRECT: &str = "correct";
    pub const GENERATE_STAR_MASK: &str = "generateStarMask";
    pub const TARGET_BUFFER_REF: &str = "targetBufferRef";
}

/// Declared editing metadata for one numeric config field. The dialog binds
/// each field to a slider/spinbox using these bounds and precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericFieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub precision: u32,
}

pub const SHARPEN_STARS_FIELD: NumericFieldSpec = NumericFieldSpec {
    key: keys::SHARPEN_STARS,
    label: "Sharpen stars:",
    min: 0.0,
    max: 0.7,
    precision: 2,
};

pub const SHARPEN_NONSTELLAR_FIELD: NumericFieldSpec = NumericFieldSpec {
    key: keys::SHARPEN_NONSTELLAR,
    label: "Sharpen nonstellar:",
    min: 0.0,
    max: 1.0,
    precision: 2,
};

pub const ADJUST_HALOS_FIELD: NumericFieldSpec = NumericFieldSpec {
    key: keys::ADJUST_HALOS,
    label: "Adjust halos:",
    min: -0.5,
    max: 0.5,
    precision: 2,
};

/// All numeric fields, in dialog presentation order.
pub const NUMERIC_FIELDS: [NumericFieldSpec; 3] = [
    SHARPEN_STARS_FIELD,
    SHARPEN_NONSTELLAR_FIELD,
    ADJUST_HALOS_FIELD,
];

//==================================================================================
// II. Overlap
//==================================================================================

/// Tiling overlap mode for the star-separation transform.
///
/// The transform accepts exactly two overlap fractions, so the closed set is
/// modeled as an enum rather than a free real.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Overlap {
    /// 0.2 tile overlap.
    Standard,
    /// **Default:** 0.5 tile overlap. Slower, but suppresses tile seams.
    #[default]
    Large,
}

impl Overlap {
    pub fn fraction(self) -> f64 {
        match self {
            Overlap::Standard => 0.2,
            Overlap::Large => 0.5,
        }
    }

    /// Map a persisted real back to a mode. Tolerates floating-point noise;
    /// anything that is not recognizably 0.2 or 0.5 yields `None`.
    pub fn from_fraction(value: f64) -> Option<Self> {
        const EPS: f64 = 1e-6;
        if (value - 0.2).abs() < EPS {
            Some(Overlap::Standard)
        } else if (value - 0.5).abs() < EPS {
            Some(Overlap::Large)
        } else {
            None
        }
    }
}

//==================================================================================
// III. The Unified StarflowConfig
//==================================================================================

/// The validated parameter set for one workflow run.
///
/// Created with defaults, optionally overwritten from a [`ParameterStore`],
/// optionally edited by the dialog, and immutable once the run starts.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct StarflowConfig {
    /// Stellar sharpening strength, in [0.0, 0.7].
    #[serde(default = "default_sharpen_stars")]
    pub sharpen_stars: f64,

    /// Nonstellar sharpening strength, in [0.0, 1.0].
    /// Zero disables the final sharpening stage entirely.
    #[serde(default = "default_sharpen_nonstellar")]
    pub sharpen_nonstellar: f64,

    /// Halo correction bias, in [-0.5, 0.5].
    #[serde(default)]
    pub adjust_halos: f64,

    /// Tiling overlap mode for star separation.
    #[serde(default)]
    pub overlap: Overlap,

    /// Enables the initial correction-only sharpening stage.
    #[serde(default = "default_true")]
    pub correct: bool,

    /// Enables the star-mask generation branch.
    #[serde(default = "default_true")]
    pub generate_star_mask: bool,

    /// Opaque reference to the target image buffer. `None` means no buffer
    /// is selected; the run refuses to start until one resolves.
    #[serde(default)]
    pub target_buffer: Option<String>,
}

impl Default for StarflowConfig {
    fn default() -> Self {
        Self {
            sharpen_stars: default_sharpen_stars(),
            sharpen_nonstellar: default_sharpen_nonstellar(),
            adjust_halos: 0.0,
            overlap: Overlap::default(),
            correct: true,
            generate_star_mask: true,
            target_buffer: None,
        }
    }
}

impl StarflowConfig {
    /// Check every numeric field against its declared range.
    pub fn validate(&self) -> Result<(), StarflowError> {
        check_range(SHARPEN_STARS_FIELD, self.sharpen_stars)?;
        check_range(SHARPEN_NONSTELLAR_FIELD, self.sharpen_nonstellar)?;
        check_range(ADJUST_HALOS_FIELD, self.adjust_halos)?;
        Ok(())
    }

    /// Build a config from defaults, overwritten by whatever the store holds.
    ///
    /// A missing key leaves the default untouched. A stored overlap value
    /// that is neither 0.2 nor 0.5 is ignored with a warning rather than
    /// failing the load.
    pub fn load_from(store: &dyn ParameterStore) -> Self {
        let mut config = Self::default();

        if let Some(v) = store.load_real(keys::SHARPEN_STARS) {
            config.sharpen_stars = v;
        }
        if let Some(v) = store.load_real(keys::SHARPEN_NONSTELLAR) {
            config.sharpen_nonstellar = v;
        }
        if let Some(v) = store.load_real(keys::ADJUST_HALOS) {
            config.adjust_halos = v;
        }
        if let Some(v) = store.load_real(keys::OVERLAP) {
            match Overlap::from_fraction(v) {
                Some(overlap) => config.overlap = overlap,
                None => log::warn!(
                    "ignoring persisted overlap {}: not a supported overlap fraction",
                    v
                ),
            }
        }
        if let Some(v) = store.load_bool(keys::CORRECT) {
            config.correct = v;
        }
        if let Some(v) = store.load_bool(keys::GENERATE_STAR_MASK) {
            config.generate_star_mask = v;
        }
        if let Some(v) = store.load_string(keys::TARGET_BUFFER_REF) {
            config.target_buffer = Some(v);
        }

        config
    }

    /// Persist every field under its documented key.
    pub fn save_to(&self, store: &mut dyn ParameterStore) {
        store.save_real(keys::SHARPEN_STARS, self.sharpen_stars);
        store.save_real(keys::SHARPEN_NONSTELLAR, self.sharpen_nonstellar);
        store.save_real(keys::ADJUST_HALOS, self.adjust_halos);
        store.save_real(keys::OVERLAP, self.overlap.fraction());
        store.save_bool(keys::CORRECT, self.correct);
        store.save_bool(keys::GENERATE_STAR_MASK, self.generate_star_mask);
        if let Some(reference) = &self.target_buffer {
            store.save_string(keys::TARGET_BUFFER_REF, reference);
        }
    }
}

fn check_range(field: NumericFieldSpec, value: f64) -> Result<(), StarflowError> {
    if value < field.min || value > field.max || value.is_nan() {
        return Err(StarflowError::InvalidParameter {
            field: field.key,
            value,
            min: field.min,
            max: field.max,
        });
    }
    Ok(())
}

fn default_sharpen_stars() -> f64 {
    0.65
}

fn default_sharpen_nonstellar() -> f64 {
    0.5
}

/// Helper for `serde` to default a boolean field to true.
fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn defaults_match_documented_values() {
        let config = StarflowConfig::default();
        assert_eq!(config.sharpen_stars, 0.65);
        assert_eq!(config.sharpen_nonstellar, 0.5);
        assert_eq!(config.adjust_halos, 0.0);
        assert_eq!(config.overlap, Overlap::Large);
        assert!(config.correct);
        assert!(config.generate_star_mask);
        assert_eq!(config.target_buffer, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_fields() {
        let mut config = StarflowConfig::default();
        config.sharpen_stars = 0.71;
        assert!(matches!(
            config.validate(),
            Err(StarflowError::InvalidParameter {
                field: keys::SHARPEN_STARS,
                ..
            })
        ));

        let mut config = StarflowConfig::default();
        config.adjust_halos = -0.6;
        assert!(config.validate().is_err());

        let mut config = StarflowConfig::default();
        config.sharpen_nonstellar = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn save_load_roundtrip_preserves_every_field() {
        let config = StarflowConfig {
            sharpen_stars: 0.3,
            sharpen_nonstellar: 0.0,
            adjust_halos: -0.25,
            overlap: Overlap::Standard,
            correct: false,
            generate_star_mask: true,
            target_buffer: Some("NGC7000_crop".into()),
        };

        let mut store = MemoryStore::new();
        config.save_to(&mut store);
        let loaded = StarflowConfig::load_from(&store);

        assert_eq!(loaded, config);
    }

    #[test]
    fn absent_keys_leave_defaults_untouched() {
        let store = MemoryStore::new();
        let loaded = StarflowConfig::load_from(&store);
        assert_eq!(loaded, StarflowConfig::default());
    }

    #[test]
    fn unrecognized_overlap_falls_back_to_default() {
        let mut store = MemoryStore::new();
        store.save_real(keys::OVERLAP, 0.37);
        let loaded = StarflowConfig::load_from(&store);
        assert_eq!(loaded.overlap, Overlap::default());
    }

    #[test]
    fn overlap_fraction_mapping_is_exact() {
        assert_eq!(Overlap::from_fraction(0.2), Some(Overlap::Standard));
        assert_eq!(Overlap::from_fraction(0.5), Some(Overlap::Large));
        assert_eq!(Overlap::from_fraction(0.5000000001), Some(Overlap::Large));
        assert_eq!(Overlap::from_fraction(0.35), None);
    }
}
