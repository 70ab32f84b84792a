//! Surface-wave correction for specular reflections.
//!
//! In an anisotropic crystal the group velocity is not parallel to the
//! wavevector, so a mirror-reflected wavevector may still carry energy out
//! of the solid. Such a state cannot enter the bulk at the reflection point.
//! It is treated as a surface excitation that runs along the boundary: the
//! perpendicular part of the wavevector is held fixed while the tangential
//! part is parallel-transported across the curving surface, until the group
//! velocity turns inward or the attempt budget runs out.
//!
//! The walk runs in the solid's local frame; inwardness is always tested in
//! the global frame where the lattice is defined.

use anyhow::{Result, anyhow};

use crate::geom::frame::Frame;
use crate::geom::rotation::{rotate_vector_around, signed_angle_about};
use crate::geom::solid::Solid;
use crate::lattice::{GroupVelocityMap, PhononMode};
use crate::sim::boundary::config::BoundaryConfig;
use crate::sim::boundary::edge::cross_edge;
use crate::{Point, Vector};

/// Transient state of one surface walk (local frame).
#[derive(Debug, Clone)]
pub struct WalkState {
    pub position: Point,
    pub normal: Vector,
    /// Signed perpendicular wavevector component (negative: into the solid).
    pub k_perp: f64,
    /// Tangential wavevector component.
    pub k_tan: Vector,
    /// Axis of the last parallel-transport rotation.
    pub axis: Vector,
    pub wave_vector: Vector,
    pub attempts: usize,
}

/// What a single walk iteration did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkStep {
    /// Stepped along the face and projected back onto it.
    Stepped,
    /// Crossed an edge onto an adjoining face.
    CrossedEdge,
}

/// How a surface walk ended.
#[derive(Debug, Clone, PartialEq)]
pub enum WalkResult {
    /// Group velocity is inward; values are in the global frame.
    Converged {
        wave_vector: Vector,
        position: Point,
        normal: Vector,
        attempts: usize,
    },
    /// No inward state within the attempt budget.
    BudgetExhausted { attempts: usize },
    /// The walk could not continue (no tangential component, no adjoining face).
    Aborted { attempts: usize, reason: String },
}

impl WalkState {
    /// Splits the unit wavevector `k` into its perpendicular and tangential parts at `position`.
    pub fn new(k: Vector, normal: Vector, position: Point) -> Self {
        let k_perp = k.dot(&normal);
        let k_tan = k - normal * k_perp;
        let axis = (normal * k_perp)
            .cross(&k_tan)
            .normalize()
            .unwrap_or(Vector::zero());
        Self {
            position,
            normal,
            k_perp,
            k_tan,
            axis,
            wave_vector: k,
            attempts: 0,
        }
    }

    /// Moves the excitation one step along the surface.
    pub fn advance(&mut self, solid: &dyn Solid, config: &BoundaryConfig) -> Result<WalkStep> {
        let tan_dir = self
            .k_tan
            .normalize()
            .map_err(|_| anyhow!("wavevector has no tangential component to walk along"))?;

        let old_normal = self.normal;
        let stepped = self.position + tan_dir * config.walk_step;
        let on_edge = solid.on_edge(&stepped);
        let new_normal = solid.surface_normal(&stepped);
        let surf_adjust = solid.distance_to_in(&stepped, &(-new_normal));

        if on_edge || !surf_adjust.is_finite() || surf_adjust > config.edge_threshold * config.walk_step {
            // Landing on the edge itself: the averaged normal belongs to no face,
            // so probe from the face being left
            let face_normal = if on_edge { old_normal } else { new_normal };
            let crossing = cross_edge(
                solid,
                &stepped,
                &face_normal,
                &tan_dir,
                &self.wave_vector,
                config.edge_offset,
            )?;
            // The faces are not coplanar: start a fresh decomposition on the new face
            *self = Self {
                attempts: self.attempts,
                ..Self::new(crossing.wave_vector, crossing.face_normal, crossing.position)
            };
            return Ok(WalkStep::CrossedEdge);
        }

        self.position = stepped - new_normal * surf_adjust;

        // Parallel transport of the tangential component from the old to the new normal
        self.axis = (old_normal * self.k_perp)
            .cross(&self.k_tan)
            .normalize()
            .unwrap_or(Vector::zero());
        let phi = signed_angle_about(&old_normal, &new_normal, &self.axis);
        self.k_tan = rotate_vector_around(&self.k_tan, &self.axis, phi)?;
        self.normal = new_normal;
        self.wave_vector = self.normal * self.k_perp + self.k_tan;

        Ok(WalkStep::Stepped)
    }
}

/// Walks a surface excitation until its group velocity points into the solid.
pub struct SurfaceWalker<'a> {
    pub solid: &'a dyn Solid,
    pub frame: &'a Frame,
    pub lattice: &'a dyn GroupVelocityMap,
    pub config: &'a BoundaryConfig,
}

impl<'a> SurfaceWalker<'a> {
    pub fn new(
        solid: &'a dyn Solid,
        frame: &'a Frame,
        lattice: &'a dyn GroupVelocityMap,
        config: &'a BoundaryConfig,
    ) -> Self {
        Self {
            solid,
            frame,
            lattice,
            config,
        }
    }

    fn is_inward(&self, mode: PhononMode, state: &WalkState) -> bool {
        self.lattice.velocity_is_inward(
            mode,
            &self.frame.to_global_direction(&state.wave_vector),
            &self.frame.to_global_direction(&state.normal),
        )
    }

    /// Runs the walk for the mirror-reflected unit wavevector `reflected`.
    ///
    /// `reflected`, `normal`, and `surface_point` are in the global frame.
    pub fn walk(
        &self,
        reflected: &Vector,
        normal: &Vector,
        mode: PhononMode,
        surface_point: &Point,
    ) -> WalkResult {
        let mut state = WalkState::new(
            self.frame.to_local_direction(reflected),
            self.frame.to_local_direction(normal),
            self.frame.to_local_position(surface_point),
        );

        loop {
            if self.is_inward(mode, &state) {
                let wave_vector = self
                    .frame
                    .to_global_direction(&state.wave_vector)
                    .normalize()
                    .unwrap_or(*reflected);
                let position = self.frame.to_global_position(&state.position);
                log::debug!(
                    "Surface walk converged after {} attempts: k {wave_vector:.4}, from {surface_point:.6} to {position:.6}",
                    state.attempts
                );
                return WalkResult::Converged {
                    wave_vector,
                    position,
                    normal: self.frame.to_global_direction(&state.normal),
                    attempts: state.attempts,
                };
            }

            if state.attempts >= self.config.max_walk_attempts {
                log::debug!("Surface walk failed after {} attempts", state.attempts);
                return WalkResult::BudgetExhausted {
                    attempts: state.attempts,
                };
            }

            state.attempts += 1;
            match state.advance(self.solid, self.config) {
                Ok(step) => log::trace!(
                    "Walk attempt {} ({step:?}): pos {:.6}, normal {:.4}, k_perp {:.4}, k_tan {:.4}, mode {mode}",
                    state.attempts,
                    state.position,
                    state.normal,
                    state.k_perp,
                    state.k_tan
                ),
                Err(e) => {
                    return WalkResult::Aborted {
                        attempts: state.attempts,
                        reason: format!("{e:#}"),
                    };
                }
            }
        }
    }
}
