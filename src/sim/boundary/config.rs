use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// What to do when all three interaction probabilities vanish at the
/// current frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DegeneratePolicy {
    /// Kill the track as if it had been absorbed.
    Absorb,
    /// Treat the interaction as a specular reflection.
    Specular,
    /// Treat the interaction as a diffuse reflection.
    Diffuse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryConfig {
    // Surface walk
    /// Distance stepped along the surface per walk iteration (m).
    pub walk_step: f64,
    /// Maximum number of walk iterations before giving up.
    pub max_walk_attempts: usize,
    /// A return distance larger than `edge_threshold * walk_step` means an
    /// edge was crossed.
    pub edge_threshold: f64,
    /// Offset used to probe the adjoining face when crossing an edge (m).
    pub edge_offset: f64,

    // Diffuse reflection
    /// Maximum number of Lambertian samples per diffuse reflection.
    pub max_diffuse_tries: usize,
    /// If `true`, running out of diffuse samples is a reflection failure.
    /// If `false`, the last (unvalidated) sample is used and a warning is logged.
    pub strict_diffuse: bool,

    // Interaction selection
    pub degenerate_policy: DegeneratePolicy,

    // Track limits
    /// Kill tracks that already reflected this many times. `None` disables the limit.
    pub max_reflections: Option<u32>,
}

impl BoundaryConfig {
    pub fn new() -> Self {
        Self {
            walk_step: 1e-6,
            max_walk_attempts: 1000,
            edge_threshold: 10.0,
            edge_offset: 1e-3,
            max_diffuse_tries: 1000,
            strict_diffuse: true,
            degenerate_policy: DegeneratePolicy::Absorb,
            max_reflections: None,
        }
    }

    /// Checks that all numeric settings are usable.
    pub fn validate(&self) -> Result<()> {
        if !self.walk_step.is_finite() || self.walk_step <= 0.0 {
            return Err(anyhow!("walk_step must be finite and > 0, got {}", self.walk_step));
        }
        if !self.edge_threshold.is_finite() || self.edge_threshold <= 1.0 {
            return Err(anyhow!(
                "edge_threshold must be finite and > 1, got {}",
                self.edge_threshold
            ));
        }
        if !self.edge_offset.is_finite() || self.edge_offset <= 0.0 {
            return Err(anyhow!("edge_offset must be finite and > 0, got {}", self.edge_offset));
        }
        if self.max_walk_attempts == 0 {
            return Err(anyhow!("max_walk_attempts must be > 0"));
        }
        if self.max_diffuse_tries == 0 {
            return Err(anyhow!("max_diffuse_tries must be > 0"));
        }
        Ok(())
    }

    /// Parses and validates a JSON configuration. Missing keys take default values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("Invalid boundary configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&text)
    }
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self::new()
    }
}
