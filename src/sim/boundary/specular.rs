use crate::lattice::PhononMode;
use crate::sim::boundary::BoundaryContext;
use crate::sim::boundary::failure::ReflectionFailure;
use crate::sim::boundary::reflection::{ReflectionKind, mirror};
use crate::sim::boundary::walker::{SurfaceWalker, WalkResult};
use crate::{Point, Vector};

/// Outgoing state of a specular reflection (global frame).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpecularReflection {
    /// Unit wavevector.
    pub wave_vector: Vector,
    /// Where the track leaves the surface; differs from the hit point after a walk.
    pub position: Point,
    /// Outward normal at `position`.
    pub exit_normal: Vector,
    pub walk_attempts: usize,
}

/// Mirror reflection of `k` at `surface_point`, corrected by a surface walk
/// when the mirrored state would still carry energy out of the solid.
pub fn reflect_specular(
    ctx: &BoundaryContext,
    k: &Vector,
    normal: &Vector,
    mode: PhononMode,
    surface_point: &Point,
) -> Result<SpecularReflection, ReflectionFailure> {
    let reflected = mirror(k, normal).map_err(|e| ReflectionFailure::WalkAborted {
        kind: ReflectionKind::Specular,
        mode,
        attempts: 0,
        reason: format!("{e:#}"),
    })?;

    if ctx.lattice.velocity_is_inward(mode, &reflected, normal) {
        return Ok(SpecularReflection {
            wave_vector: reflected,
            position: *surface_point,
            exit_normal: *normal,
            walk_attempts: 0,
        });
    }

    let walker = SurfaceWalker::new(ctx.solid, ctx.frame, ctx.lattice, ctx.config);
    match walker.walk(&reflected, normal, mode, surface_point) {
        WalkResult::Converged {
            wave_vector,
            position,
            normal,
            attempts,
        } => Ok(SpecularReflection {
            wave_vector,
            position,
            exit_normal: normal,
            walk_attempts: attempts,
        }),
        WalkResult::BudgetExhausted { attempts } => Err(ReflectionFailure::WalkExhausted {
            kind: ReflectionKind::Specular,
            mode,
            attempts,
        }),
        WalkResult::Aborted { attempts, reason } => Err(ReflectionFailure::WalkAborted {
            kind: ReflectionKind::Specular,
            mode,
            attempts,
            reason,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::frame::Frame;
    use crate::geom::solid::{Cuboid, Sphere};
    use crate::lattice::{GroupVelocityMap, IsotropicLattice, LinearAnisotropicLattice};
    use crate::sim::boundary::config::BoundaryConfig;
    use crate::sim::boundary::surface::SurfaceProperty;

    #[test]
    fn test_isotropic_specular_is_plain_mirror() {
        let solid = Cuboid::new(2., 2., 2.).unwrap();
        let frame = Frame::identity();
        let surface = SurfaceProperty::reflecting("mirror", 1., 0., 0.);
        let config = BoundaryConfig::new();
        let ctx = BoundaryContext::new(&IsotropicLattice, &solid, &frame, &surface, &config);

        let k = Vector::new(3.0e9, 0., 4.0e9);
        let normal = Vector::new(0., 0., 1.);
        let r = reflect_specular(&ctx, &k, &normal, PhononMode::Longitudinal, &Point::new(0., 0., 1.))
            .unwrap();
        assert!(r.wave_vector.is_within(&Vector::new(0.6, 0., -0.8), 1e-12));
        assert_eq!(r.walk_attempts, 0);
        assert_eq!(r.exit_normal, normal);
        assert!(r.position.is_close(&Point::new(0., 0., 1.)));
    }

    #[test]
    fn test_specular_walks_on_curved_surface() {
        let solid = Sphere::new(1.).unwrap();
        let frame = Frame::identity();
        let lattice = LinearAnisotropicLattice::xz_tilt(0.5).unwrap();
        let surface = SurfaceProperty::reflecting("mirror", 1., 0., 0.);
        let mut config = BoundaryConfig::new();
        config.walk_step = 0.01;
        let ctx = BoundaryContext::new(&lattice, &solid, &frame, &surface, &config);

        // Incoming k whose mirror image is (0.9, 0, -0.3)
        let k = Vector::new(0.9, 0., 0.3);
        let normal = Vector::new(0., 0., 1.);
        let r = reflect_specular(&ctx, &k, &normal, PhononMode::Longitudinal, &Point::new(0., 0., 1.))
            .unwrap();
        assert!(r.walk_attempts > 0);
        assert!((r.wave_vector.length() - 1.0).abs() < 1e-12);
        assert!(lattice.velocity_is_inward(PhononMode::Longitudinal, &r.wave_vector, &r.exit_normal));
    }

    #[test]
    fn test_specular_reports_exhausted_walk() {
        let solid = Cuboid::new(1000., 1000., 1.).unwrap();
        let frame = Frame::identity();
        let lattice = LinearAnisotropicLattice::xz_tilt(0.5).unwrap();
        let surface = SurfaceProperty::reflecting("mirror", 1., 0., 0.);
        let mut config = BoundaryConfig::new();
        config.walk_step = 0.01;
        config.max_walk_attempts = 20;
        let ctx = BoundaryContext::new(&lattice, &solid, &frame, &surface, &config);

        let r = reflect_specular(
            &ctx,
            &Vector::new(0.9, 0., 0.3),
            &Vector::new(0., 0., 1.),
            PhononMode::TransverseSlow,
            &Point::new(0., 0., 0.5),
        );
        assert_eq!(
            r,
            Err(ReflectionFailure::WalkExhausted {
                kind: ReflectionKind::Specular,
                mode: PhononMode::TransverseSlow,
                attempts: 20,
            })
        );
    }
}
