//! Phonon interactions at the boundary of a crystal volume.
//!
//! A boundary hit is resolved in a fixed order: absorption, the reflection
//! limit, transmission, and finally one of three reflection branches
//! (anharmonic decay, specular, or diffuse). Every reflected state is checked
//! once more so that energy flows back into the solid.

pub mod absorption;
pub mod config;
pub mod decay;
pub mod diffuse;
pub mod edge;
pub mod failure;
pub mod reflection;
pub mod selector;
pub mod specular;
pub mod surface;
pub mod walker;

pub use config::{BoundaryConfig, DegeneratePolicy};
pub use decay::AnharmonicDecay;
pub use failure::ReflectionFailure;
pub use reflection::ReflectionKind;
pub use surface::{ProbabilityFn, SurfaceProperty};

use rand::Rng;

use crate::geom::frame::Frame;
use crate::geom::solid::{Inside, Solid};
use crate::lattice::{GroupVelocityMap, PhononMode};
use crate::sim::track::Wavepacket;
use crate::{Point, Vector};

use absorption::{absorb_track, reflected_by_coefficient};
use decay::assign_decay_directions;
use diffuse::reflect_diffuse;
use selector::{Interaction, Selection, select_interaction};
use specular::reflect_specular;

/// Read-only collaborators of one boundary interaction.
///
/// Shared between threads; nothing in here is mutated while tracks are processed.
#[derive(Clone, Copy)]
pub struct BoundaryContext<'a> {
    pub lattice: &'a dyn GroupVelocityMap,
    pub solid: &'a dyn Solid,
    /// Placement of `solid` in the global frame.
    pub frame: &'a Frame,
    pub surface: &'a SurfaceProperty,
    pub config: &'a BoundaryConfig,
    pub decay: Option<&'a dyn AnharmonicDecay>,
}

impl<'a> BoundaryContext<'a> {
    pub fn new(
        lattice: &'a dyn GroupVelocityMap,
        solid: &'a dyn Solid,
        frame: &'a Frame,
        surface: &'a SurfaceProperty,
        config: &'a BoundaryConfig,
    ) -> Self {
        Self {
            lattice,
            solid,
            frame,
            surface,
            config,
            decay: None,
        }
    }

    pub fn with_decay(mut self, decay: &'a dyn AnharmonicDecay) -> Self {
        self.decay = Some(decay);
        self
    }
}

/// Outgoing state of a reflected track (global frame).
#[derive(Debug, Clone, PartialEq)]
pub struct Reflection {
    pub kind: ReflectionKind,
    /// New wavevector; keeps the magnitude of the incoming one.
    pub wave_vector: Vector,
    pub momentum_direction: Vector,
    pub position: Point,
    /// Surface walk iterations spent (specular only).
    pub walk_attempts: usize,
    /// `false` only for a lenient diffuse reflection that ran out of samples.
    pub validated: bool,
}

/// Result of a track reaching the boundary.
#[derive(Debug, Clone)]
pub enum BoundaryOutcome {
    Reflected(Reflection),
    Absorbed,
    /// The track leaves the volume unchanged.
    Transmitted,
    /// The track is replaced by two secondaries.
    Decayed([Wavepacket; 2]),
    Failed(ReflectionFailure),
}

/// Surface point and outward normal where a track meets the boundary (global frame).
#[derive(Debug, Clone, Copy)]
pub struct SurfaceHit {
    pub position: Point,
    pub normal: Vector,
}

/// Resolves boundary hits for one surface of one solid.
pub struct BoundaryProcess<'a> {
    ctx: BoundaryContext<'a>,
}

impl<'a> BoundaryProcess<'a> {
    pub fn new(ctx: BoundaryContext<'a>) -> Self {
        Self { ctx }
    }

    /// Moves `position` onto the surface along the local normal.
    ///
    /// Points already within the surface tolerance are kept. A point outside
    /// that cannot be projected back is kept as well.
    pub fn snap_to_surface(&self, position: &Point) -> SurfaceHit {
        let solid = self.ctx.solid;
        let frame = self.ctx.frame;
        let local = frame.to_local_position(position);
        let normal = solid.surface_normal(&local);

        let snapped = match solid.inside(&local) {
            Inside::Surface => local,
            Inside::Inside => local + normal * solid.distance_to_out(&local, &normal),
            Inside::Outside => {
                let d = solid.distance_to_in(&local, &(-normal));
                if d.is_finite() { local - normal * d } else { local }
            }
        };
        if snapped != local {
            log::debug!(
                "Moved boundary point {local:.9} onto the surface at {snapped:.9} (local frame)"
            );
        }

        SurfaceHit {
            position: frame.to_global_position(&snapped),
            normal: frame.to_global_direction(&solid.surface_normal(&snapped)),
        }
    }

    /// Resolves a track arriving at the boundary.
    pub fn apply<R: Rng>(&self, track: &Wavepacket, rng: &mut R) -> BoundaryOutcome {
        let outcome = self.resolve(track, rng);
        if let BoundaryOutcome::Failed(e) = &outcome {
            log::warn!("{e}, track killed");
        }
        outcome
    }

    fn resolve<R: Rng>(&self, track: &Wavepacket, rng: &mut R) -> BoundaryOutcome {
        let ctx = &self.ctx;
        let hit = self.snap_to_surface(&track.position);

        if absorb_track(&track.wave_vector, &hit.normal, ctx.surface, rng) {
            log::debug!("Track absorbed at {:.6} on {}", hit.position, ctx.surface.name);
            return BoundaryOutcome::Absorbed;
        }

        if let Some(limit) = ctx.config.max_reflections {
            if track.reflections >= limit {
                return BoundaryOutcome::Failed(ReflectionFailure::MaxReflections { limit });
            }
        }

        if !reflected_by_coefficient(ctx.surface, rng) {
            log::debug!("Track transmitted at {:.6}", hit.position);
            return BoundaryOutcome::Transmitted;
        }

        let freq = track.frequency();
        let interaction = match select_interaction(ctx.surface, freq, rng) {
            Selection::Selected(interaction) => interaction,
            Selection::Degenerate => match ctx.config.degenerate_policy {
                DegeneratePolicy::Absorb => {
                    log::debug!(
                        "All interaction probabilities vanish at {freq:.4e} Hz on {}, absorbing",
                        ctx.surface.name
                    );
                    return BoundaryOutcome::Absorbed;
                }
                DegeneratePolicy::Specular => Interaction::Specular,
                DegeneratePolicy::Diffuse => Interaction::Diffuse,
            },
        };
        log::debug!(
            "Boundary interaction {interaction:?} for mode {} at {freq:.4e} Hz",
            track.mode
        );

        match interaction {
            Interaction::Decay => self.decay(track, &hit, rng),
            Interaction::Specular => self.specular(track, &hit),
            Interaction::Diffuse => self.diffuse(track, &hit, rng),
        }
    }

    fn decay<R: Rng>(&self, track: &Wavepacket, hit: &SurfaceHit, rng: &mut R) -> BoundaryOutcome {
        let ctx = &self.ctx;
        let Some(model) = ctx.decay else {
            return BoundaryOutcome::Failed(ReflectionFailure::DecayFailed(
                "no anharmonic decay model configured".to_string(),
            ));
        };

        let secondaries = match model.decay(track, &mut *rng) {
            Ok(secondaries) => secondaries,
            Err(e) => return BoundaryOutcome::Failed(ReflectionFailure::DecayFailed(format!("{e:#}"))),
        };

        match assign_decay_directions(
            secondaries,
            ctx.lattice,
            ctx.config,
            &hit.normal,
            &hit.position,
            rng,
        ) {
            Ok(products) => BoundaryOutcome::Decayed(products),
            Err(e) => BoundaryOutcome::Failed(e),
        }
    }

    fn specular(&self, track: &Wavepacket, hit: &SurfaceHit) -> BoundaryOutcome {
        let mirrored = match reflect_specular(&self.ctx, &track.wave_vector, &hit.normal, track.mode, &hit.position) {
            Ok(mirrored) => mirrored,
            Err(e) => return BoundaryOutcome::Failed(e),
        };
        let reflection = self.reflection(
            ReflectionKind::Specular,
            track,
            &mirrored.wave_vector,
            mirrored.position,
            mirrored.walk_attempts,
            true,
        );
        self.verify_inward(reflection, track.mode, &mirrored.exit_normal)
    }

    fn diffuse<R: Rng>(&self, track: &Wavepacket, hit: &SurfaceHit, rng: &mut R) -> BoundaryOutcome {
        let ctx = &self.ctx;
        let diffuse = match reflect_diffuse(ctx.lattice, ctx.config, track.mode, &hit.normal, rng) {
            Ok(diffuse) => diffuse,
            Err(e) => return BoundaryOutcome::Failed(e),
        };
        let reflection = self.reflection(
            ReflectionKind::Diffuse,
            track,
            &diffuse.direction,
            hit.position,
            0,
            diffuse.validated,
        );
        if !diffuse.validated {
            // Already reported by the diffuse reflector
            return BoundaryOutcome::Reflected(reflection);
        }
        self.verify_inward(reflection, track.mode, &hit.normal)
    }

    /// Builds the outgoing state from a unit direction, keeping the incoming |k|.
    fn reflection(
        &self,
        kind: ReflectionKind,
        track: &Wavepacket,
        direction: &Vector,
        position: Point,
        walk_attempts: usize,
        validated: bool,
    ) -> Reflection {
        let wave_vector = direction.with_length(track.wave_vector.length());
        Reflection {
            kind,
            wave_vector,
            momentum_direction: self.ctx.lattice.group_velocity_dir(track.mode, &wave_vector),
            position,
            walk_attempts,
            validated,
        }
    }

    fn verify_inward(&self, reflection: Reflection, mode: PhononMode, normal: &Vector) -> BoundaryOutcome {
        if self.ctx.lattice.velocity_is_inward(mode, &reflection.wave_vector, normal) {
            BoundaryOutcome::Reflected(reflection)
        } else {
            BoundaryOutcome::Failed(ReflectionFailure::NotInward {
                kind: reflection.kind,
                mode,
            })
        }
    }
}
