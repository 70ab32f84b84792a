//! Rigid transform between a solid's local frame and the global frame.
//!
//! Solids answer geometric queries in their own local coordinates, while
//! wavevectors, normals, and the group-velocity oracle live in the global
//! frame. `Frame` converts points and directions in both directions.

use anyhow::Result;
use ndarray as nd;

use crate::geom::rotation::{apply_matrix, rotation_matrix};
use crate::{Point, Vector};

#[derive(Debug, Clone)]
pub struct Frame {
    /// Local-to-global rotation.
    rotation: nd::Array2<f64>,
    /// Position of the local origin in global coordinates.
    translation: Vector,
}

impl Frame {
    /// Local frame coincides with the global frame.
    pub fn identity() -> Self {
        Self {
            rotation: nd::Array::eye(3),
            translation: Vector::zero(),
        }
    }

    /// Local frame rotated by `phi` around the unit `axis`, with its origin at `origin`.
    pub fn new(axis: &Vector, phi: f64, origin: Point) -> Result<Self> {
        Ok(Self {
            rotation: rotation_matrix(axis, phi)?,
            translation: origin.to_vector(),
        })
    }

    /// Local frame translated (not rotated) to `origin`.
    pub fn translated(origin: Point) -> Self {
        Self {
            rotation: nd::Array::eye(3),
            translation: origin.to_vector(),
        }
    }

    pub fn to_global_direction(&self, v: &Vector) -> Vector {
        apply_matrix(&self.rotation.view(), v)
    }

    pub fn to_local_direction(&self, v: &Vector) -> Vector {
        apply_matrix(&self.rotation.t(), v)
    }

    pub fn to_global_position(&self, p: &Point) -> Point {
        Point::origin() + self.to_global_direction(&p.to_vector()) + self.translation
    }

    pub fn to_local_position(&self, p: &Point) -> Point {
        Point::origin() + self.to_local_direction(&(p.to_vector() - self.translation))
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::identity()
    }
}
