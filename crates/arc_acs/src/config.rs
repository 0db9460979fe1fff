//! # ACS Configuration
//!
//! Init-time knobs, loaded once at startup from TOML:
//!
//! ```toml
//! max_components = 64
//! sparse_reserve = 4096
//! dense_reserve = 1024
//! ```
//!
//! Build-time knobs are cargo features instead: `pack` selects the packed
//! dense layout and `runtime-checks` verifies sparse/dense links on removal.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::acs::MAX_COMPONENTS;
use crate::error::{AcsError, AcsResult};

/// Configuration for a `ComponentProvider` / `ActorManager`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AcsConfig {
    /// Number of component type slots (at most [`MAX_COMPONENTS`]).
    pub max_components: usize,
    /// Sparse slots reserved per component array.
    pub sparse_reserve: usize,
    /// Dense elements reserved per component array.
    pub dense_reserve: usize,
}

impl Default for AcsConfig {
    fn default() -> Self {
        Self {
            max_components: MAX_COMPONENTS,
            sparse_reserve: 0,
            dense_reserve: 0,
        }
    }
}

impl AcsConfig {
    /// Returns a copy with a different slot count.
    #[must_use]
    pub const fn with_max_components(mut self, max_components: usize) -> Self {
        self.max_components = max_components;
        self
    }

    /// Returns a copy with different per-array reservations.
    #[must_use]
    pub const fn with_reserve(mut self, sparse: usize, dense: usize) -> Self {
        self.sparse_reserve = sparse;
        self.dense_reserve = dense;
        self
    }

    /// Checks that every value is in range.
    ///
    /// # Errors
    ///
    /// Returns [`AcsError::InvalidConfig`] if `max_components` is zero or
    /// above [`MAX_COMPONENTS`], or if `dense_reserve` exceeds
    /// `sparse_reserve` while the latter is non-zero.
    pub fn validate(&self) -> AcsResult<()> {
        if self.max_components == 0 || self.max_components > MAX_COMPONENTS {
            return Err(AcsError::InvalidConfig(format!(
                "max_components must be in 1..={MAX_COMPONENTS}, got {}",
                self.max_components
            )));
        }
        if self.sparse_reserve != 0 && self.dense_reserve > self.sparse_reserve {
            return Err(AcsError::InvalidConfig(format!(
                "dense_reserve ({}) cannot exceed sparse_reserve ({})",
                self.dense_reserve, self.sparse_reserve
            )));
        }
        Ok(())
    }

    /// Parses and validates a configuration from TOML text.
    ///
    /// Missing keys fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`AcsError::ConfigParse`] for malformed TOML or unknown keys,
    /// and [`AcsError::InvalidConfig`] for out-of-range values.
    pub fn from_toml_str(text: &str) -> AcsResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| AcsError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`AcsError::ConfigRead`] if the file cannot be read, otherwise
    /// the errors of [`AcsConfig::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> AcsResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| AcsError::ConfigRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Serializes the configuration back to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`AcsError::ConfigParse`] if serialization fails.
    pub fn to_toml_string(&self) -> AcsResult<String> {
        toml::to_string(self).map_err(|e| AcsError::ConfigParse(e.to_string()))
    }
}
