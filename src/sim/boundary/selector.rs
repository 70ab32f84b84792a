use rand::Rng;

use crate::sim::boundary::surface::SurfaceProperty;

/// Reflection branch drawn for a phonon at a boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    Decay,
    Specular,
    Diffuse,
}

/// Normalized branch probabilities at one frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionProbabilities {
    pub decay: f64,
    pub specular: f64,
    pub diffuse: f64,
}

/// Result of drawing an interaction branch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection {
    Selected(Interaction),
    /// All probabilities were zero; the caller applies its degenerate policy.
    Degenerate,
}

impl InteractionProbabilities {
    /// Evaluates the surface fits at `freq` and normalizes them to sum to 1.
    ///
    /// The fits are empirical and not normalized by construction. Returns
    /// `None` when the sum is zero (or not finite), so no NaN is produced.
    pub fn at_frequency(surface: &SurfaceProperty, freq: f64) -> Option<Self> {
        let decay = surface.anharmonic_prob(freq);
        let specular = surface.specular_prob(freq);
        let diffuse = surface.diffuse_prob(freq);

        let norm = decay + specular + diffuse;
        if !norm.is_finite() || norm <= 0.0 {
            return None;
        }
        Some(Self {
            decay: decay / norm,
            specular: specular / norm,
            diffuse: diffuse / norm,
        })
    }

    /// Picks a branch for the uniform draw `u` in [0, 1), comparing
    /// cumulatively in the order decay, specular, diffuse.
    pub fn pick(&self, u: f64) -> Interaction {
        if u < self.decay {
            Interaction::Decay
        } else if u < self.decay + self.specular {
            Interaction::Specular
        } else {
            Interaction::Diffuse
        }
    }
}

/// Draws the reflection branch for a phonon of frequency `freq`.
pub fn select_interaction<R: Rng + ?Sized>(
    surface: &SurfaceProperty,
    freq: f64,
    rng: &mut R,
) -> Selection {
    let Some(probs) = InteractionProbabilities::at_frequency(surface, freq) else {
        return Selection::Degenerate;
    };
    let u: f64 = rng.r#gen();
    log::trace!(
        "Interaction draw {u:.4} vs decay {:.4}, specular {:.4}, diffuse {:.4}",
        probs.decay,
        probs.specular,
        probs.diffuse
    );
    Selection::Selected(probs.pick(u))
}
