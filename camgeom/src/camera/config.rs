#[cfg(feature = "serde")]
use crate::error::ConfigError;

/// Acceptance threshold for every recomposition check.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Camera decomposition configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct DecompositionConfig {
    /// Largest element-wise absolute residual accepted when recomposing.
    pub tolerance: f64,
    /// Keep only the axis-aligned scale of the orthographic point warp,
    /// dropping any shear it carries.
    pub limit_h_diagonal: bool,
}

impl Default for DecompositionConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            limit_h_diagonal: true,
        }
    }
}

#[cfg(feature = "serde")]
impl DecompositionConfig {
    /// Parse a TOML config; missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: DecompositionConfig =
            toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        if !(config.tolerance.is_finite() && config.tolerance > 0.0) {
            return Err(ConfigError::InvalidTolerance(config.tolerance));
        }
        Ok(config)
    }
}
