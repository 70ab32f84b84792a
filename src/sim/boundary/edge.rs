//! Crossing from one face of a solid onto an adjoining one.
//!
//! When the surface walk steps past the border of the current face, the
//! point just stepped to no longer projects back onto that face. The edge
//! is then located by probing from slightly below the face, and the
//! wavevector is mirrored against the normal of the face on the other side.

use anyhow::{Result, anyhow};

use crate::geom::solid::Solid;
use crate::sim::boundary::reflection::mirror;
use crate::{Point, Vector};

/// Result of crossing an edge.
#[derive(Debug, Clone, Copy)]
pub struct EdgeCrossing {
    /// Point on the edge (local frame).
    pub position: Point,
    /// Outward normal of the adjoining face (local frame).
    pub face_normal: Vector,
    /// Wavevector mirrored against `face_normal` (unit, local frame).
    pub wave_vector: Vector,
}

/// Locates the edge crossed when stepping along `tan_dir` to `stepped`.
///
/// Moves `offset` below the surface along `-normal`, walks back along
/// `-tan_dir` until the solid is reached, then moves `offset` back out.
pub fn edge_position(
    solid: &dyn Solid,
    stepped: &Point,
    normal: &Vector,
    tan_dir: &Vector,
    offset: f64,
) -> Result<Point> {
    let probe = *stepped - *normal * offset;
    let back = solid.distance_to_in(&probe, &(-*tan_dir));
    if !back.is_finite() {
        return Err(anyhow!("no adjoining face found behind {stepped:.6}"));
    }
    Ok(probe - *tan_dir * back + *normal * offset)
}

/// Outward normal of the face adjoining `edge`, seen from the face with `normal`.
pub fn adjoining_normal(solid: &dyn Solid, edge: &Point, normal: &Vector, offset: f64) -> Vector {
    solid.surface_normal(&(*edge - *normal * offset))
}

/// Full edge crossing: position on the edge, new face normal, and mirrored wavevector.
pub fn cross_edge(
    solid: &dyn Solid,
    stepped: &Point,
    normal: &Vector,
    tan_dir: &Vector,
    wave_vector: &Vector,
    offset: f64,
) -> Result<EdgeCrossing> {
    let position = edge_position(solid, stepped, normal, tan_dir, offset)?;
    let face_normal = adjoining_normal(solid, &position, normal, offset);
    let wave_vector = mirror(wave_vector, &face_normal)?;
    Ok(EdgeCrossing {
        position,
        face_normal,
        wave_vector,
    })
}
