//! Boundary solids queried by the surface walk.
//!
//! All queries take points and directions in the solid's local frame.

pub mod cuboid;
pub mod sphere;

pub use cuboid::Cuboid;
pub use sphere::Sphere;

use crate::{Point, Vector};

/// Thickness of the shell around the surface that counts as "on the surface".
pub const SURFACE_TOLERANCE: f64 = 1e-9;

/// Classification of a point against a solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inside {
    Inside,
    Surface,
    Outside,
}

/// Geometric queries a boundary must answer.
///
/// Implementations are immutable and shared read-only between threads.
pub trait Solid: Send + Sync {
    /// Classifies `p` as inside, outside, or on the surface (within `SURFACE_TOLERANCE`).
    fn inside(&self, p: &Point) -> Inside;

    /// Outward unit normal of the surface nearest to `p`.
    ///
    /// On an edge or corner shared by several faces the normalized sum of the
    /// face normals is returned. That direction belongs to no face, so surface
    /// walks check `on_edge` first and cross onto the adjoining face instead.
    fn surface_normal(&self, p: &Point) -> Vector;

    /// True if `p` lies on an edge or corner where several faces meet.
    ///
    /// Smooth solids have no edges.
    fn on_edge(&self, _p: &Point) -> bool {
        false
    }

    /// Distance from `p` along `dir` to the surface.
    ///
    /// Returns 0 for points inside or on the surface and `f64::INFINITY`
    /// when the ray misses the solid.
    fn distance_to_in(&self, p: &Point, dir: &Vector) -> f64;

    /// Distance from `p` along `dir` to where the ray leaves the solid.
    ///
    /// Returns 0 for points outside or on the surface.
    fn distance_to_out(&self, p: &Point, dir: &Vector) -> f64;
}
