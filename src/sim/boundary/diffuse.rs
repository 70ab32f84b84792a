use rand::Rng;

use crate::Vector;
use crate::lattice::{GroupVelocityMap, PhononMode};
use crate::sim::boundary::config::BoundaryConfig;
use crate::sim::boundary::failure::ReflectionFailure;
use crate::sim::boundary::reflection::{ReflectionKind, lambertian_sample};

/// Result of the Lambertian rejection loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LambertianResult {
    /// Group velocity of `direction` points into the solid.
    Accepted { direction: Vector, tries: usize },
    /// No sample passed; `direction` is the last one drawn.
    Exhausted { direction: Vector, tries: usize },
}

/// Draws cosine-weighted directions about the inward normal until one has an
/// inward group velocity for `mode`, or `max_tries` samples were drawn.
pub fn sample_inward_lambertian<R: Rng + ?Sized>(
    lattice: &dyn GroupVelocityMap,
    mode: PhononMode,
    normal: &Vector,
    max_tries: usize,
    rng: &mut R,
) -> LambertianResult {
    let mut direction = lambertian_sample(normal, rng);
    let mut tries = 1;
    while !lattice.velocity_is_inward(mode, &direction, normal) {
        if tries >= max_tries {
            return LambertianResult::Exhausted { direction, tries };
        }
        direction = lambertian_sample(normal, rng);
        tries += 1;
    }
    LambertianResult::Accepted { direction, tries }
}

/// Outgoing direction of a diffuse reflection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffuseReflection {
    /// Unit wavevector direction.
    pub direction: Vector,
    pub tries: usize,
    /// `false` if the sample budget ran out and the direction was never
    /// confirmed to carry energy inward.
    pub validated: bool,
}

/// Diffuse (Lambertian) reflection about `normal`.
///
/// On exhaustion the outcome depends on `config.strict_diffuse`.
pub fn reflect_diffuse<R: Rng + ?Sized>(
    lattice: &dyn GroupVelocityMap,
    config: &BoundaryConfig,
    mode: PhononMode,
    normal: &Vector,
    rng: &mut R,
) -> Result<DiffuseReflection, ReflectionFailure> {
    match sample_inward_lambertian(lattice, mode, normal, config.max_diffuse_tries, rng) {
        LambertianResult::Accepted { direction, tries } => Ok(DiffuseReflection {
            direction,
            tries,
            validated: true,
        }),
        LambertianResult::Exhausted { tries, .. } if config.strict_diffuse => {
            Err(ReflectionFailure::DiffuseExhausted {
                kind: ReflectionKind::Diffuse,
                mode,
                tries,
            })
        }
        LambertianResult::Exhausted { direction, tries } => {
            log::warn!(
                "Diffuse reflection (mode {mode}) found no inward group velocity in {tries} samples, using last sample {direction:.4}"
            );
            Ok(DiffuseReflection {
                direction,
                tries,
                validated: false,
            })
        }
    }
}
