use rand::Rng;

use crate::Vector;
use crate::sim::boundary::surface::SurfaceProperty;

/// Generic coefficient test: absorbed with probability `absorption_prob`.
pub fn absorbed_by_coefficient<R: Rng + ?Sized>(surface: &SurfaceProperty, rng: &mut R) -> bool {
    let u: f64 = rng.r#gen();
    u < surface.absorption_prob
}

/// Generic coefficient test: reflected (rather than transmitted) with probability `reflection_prob`.
pub fn reflected_by_coefficient<R: Rng + ?Sized>(surface: &SurfaceProperty, rng: &mut R) -> bool {
    let u: f64 = rng.r#gen();
    u < surface.reflection_prob
}

/// Wavevector component along the normal is large enough to be absorbed.
///
/// The absolute value is used: the phonon may hit the surface from either
/// side of the normal's orientation.
pub fn normal_component_exceeds(k: &Vector, normal: &Vector, min_k: f64) -> bool {
    k.dot(normal).abs() > min_k
}

/// Decides whether a phonon with wavevector `k` is absorbed at a surface with outward `normal`.
pub fn absorb_track<R: Rng + ?Sized>(
    k: &Vector,
    normal: &Vector,
    surface: &SurfaceProperty,
    rng: &mut R,
) -> bool {
    let absorbed =
        absorbed_by_coefficient(surface, rng) && normal_component_exceeds(k, normal, surface.min_k);
    log::trace!(
        "Absorption test: |k_perp| {:.4e} vs min_k {:.4e} -> {absorbed}",
        k.dot(normal).abs(),
        surface.min_k
    );
    absorbed
}
