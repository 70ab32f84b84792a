use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

/// Empirical probability fit: a polynomial in frequency (Hz), zero above `cutoff`.
///
/// `coefficients[i]` multiplies `f^i`. An empty polynomial evaluates to 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityFn {
    pub coefficients: Vec<f64>,
    /// `None` means the fit applies at every frequency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cutoff: Option<f64>,
}

impl ProbabilityFn {
    /// Polynomial fit that vanishes at and above `cutoff` (Hz).
    pub fn new(coefficients: Vec<f64>, cutoff: f64) -> Self {
        Self {
            coefficients,
            cutoff: Some(cutoff),
        }
    }

    /// Polynomial fit without a cutoff.
    pub fn polynomial(coefficients: Vec<f64>) -> Self {
        Self {
            coefficients,
            cutoff: None,
        }
    }

    /// Frequency-independent probability.
    pub fn constant(p: f64) -> Self {
        Self::polynomial(vec![p])
    }

    pub fn zero() -> Self {
        Self::polynomial(Vec::new())
    }

    /// Evaluates the fit at `freq`. Negative or non-finite values are clamped to 0.
    pub fn eval(&self, freq: f64) -> f64 {
        if self.cutoff.is_some_and(|cutoff| freq >= cutoff) {
            return 0.0;
        }
        // Horner's scheme
        let p = self
            .coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * freq + c);
        if p.is_finite() { p.max(0.0) } else { 0.0 }
    }
}

/// Phonon properties of one boundary surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceProperty {
    pub name: String,
    /// Probability that a phonon reaching the surface is absorbed [0, 1].
    pub absorption_prob: f64,
    /// Probability that a non-absorbed phonon is reflected rather than transmitted [0, 1].
    pub reflection_prob: f64,
    /// Absorption requires |k . n| above this value (1/m).
    pub min_k: f64,
    pub specular: ProbabilityFn,
    pub diffuse: ProbabilityFn,
    pub anharmonic: ProbabilityFn,
}

impl SurfaceProperty {
    pub fn new(
        name: &str,
        absorption_prob: f64,
        reflection_prob: f64,
        min_k: f64,
        specular: ProbabilityFn,
        diffuse: ProbabilityFn,
        anharmonic: ProbabilityFn,
    ) -> Self {
        Self {
            name: name.to_string(),
            absorption_prob,
            reflection_prob,
            min_k,
            specular,
            diffuse,
            anharmonic,
        }
    }

    /// Fully reflecting, non-absorbing surface with constant branch probabilities.
    pub fn reflecting(name: &str, specular: f64, diffuse: f64, anharmonic: f64) -> Self {
        Self::new(
            name,
            0.0,
            1.0,
            0.0,
            ProbabilityFn::constant(specular),
            ProbabilityFn::constant(diffuse),
            ProbabilityFn::constant(anharmonic),
        )
    }

    pub fn specular_prob(&self, freq: f64) -> f64 {
        self.specular.eval(freq)
    }

    pub fn diffuse_prob(&self, freq: f64) -> f64 {
        self.diffuse.eval(freq)
    }

    pub fn anharmonic_prob(&self, freq: f64) -> f64 {
        self.anharmonic.eval(freq)
    }

    pub fn validate(&self) -> Result<()> {
        for (what, p) in [
            ("absorption_prob", self.absorption_prob),
            ("reflection_prob", self.reflection_prob),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(anyhow!("{}: {what} must be in [0, 1], got {p}", self.name));
            }
        }
        if !self.min_k.is_finite() || self.min_k < 0.0 {
            return Err(anyhow!("{}: min_k must be finite and >= 0, got {}", self.name, self.min_k));
        }
        for (what, f) in [
            ("specular", &self.specular),
            ("diffuse", &self.diffuse),
            ("anharmonic", &self.anharmonic),
        ] {
            if f.coefficients.iter().any(|c| !c.is_finite()) {
                return Err(anyhow!("{}: {what} coefficients must be finite", self.name));
            }
            if let Some(cutoff) = f.cutoff {
                if !cutoff.is_finite() || cutoff <= 0.0 {
                    return Err(anyhow!("{}: {what} cutoff must be finite and > 0, got {cutoff}", self.name));
                }
            }
        }
        Ok(())
    }
}
