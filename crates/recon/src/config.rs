use serde::Deserialize;

use crate::error::ReconError;

pub const DEFAULT_PRIMARY_PREFIX: &str = "Enrollment";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Per-run settings, usually read from `compare.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompareConfig {
    /// File-name prefix identifying the primary export.
    #[serde(default = "default_primary_prefix")]
    pub primary_prefix: String,
    /// Run the type-directed validation pass before matching.
    #[serde(default)]
    pub validate: bool,
    /// Same pass as `validate`; either flag turns it on.
    #[serde(default)]
    pub normalize: bool,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_primary_prefix() -> String {
    DEFAULT_PRIMARY_PREFIX.to_string()
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            primary_prefix: default_primary_prefix(),
            validate: false,
            normalize: false,
            output: OutputConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Where to write the JSON report.
    #[serde(default)]
    pub json: Option<String>,
}

// ---------------------------------------------------------------------------
// Engine options
// ---------------------------------------------------------------------------

/// The subset of the config the engine itself looks at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompareOptions {
    pub validate: bool,
    pub normalize: bool,
}

impl CompareOptions {
    pub fn runs_validation(&self) -> bool {
        self.validate || self.normalize
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl CompareConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: CompareConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.primary_prefix.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "primary_prefix must not be empty".into(),
            ));
        }
        if let Some(path) = &self.output.json {
            if path.trim().is_empty() {
                return Err(ReconError::ConfigValidation(
                    "output.json must not be empty when set".into(),
                ));
            }
        }
        Ok(())
    }

    pub fn options(&self) -> CompareOptions {
        CompareOptions {
            validate: self.validate,
            normalize: self.normalize,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
