//! Polarization modes and the wavevector → group-velocity mapping.
//!
//! The mapping itself belongs to the crystal lattice model. Boundary code
//! only asks which way energy flows for a given wavevector, so the lattice
//! is expressed as the `GroupVelocityMap` trait.

use anyhow::{Result, anyhow};
use ndarray as nd;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Vector;
use crate::geom::rotation::apply_matrix;

/// Number of acoustic phonon branches.
pub const NUM_MODES: usize = 3;

/// Acoustic phonon polarization branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhononMode {
    Longitudinal,
    TransverseSlow,
    TransverseFast,
}

impl PhononMode {
    pub const ALL: [PhononMode; NUM_MODES] = [
        PhononMode::Longitudinal,
        PhononMode::TransverseSlow,
        PhononMode::TransverseFast,
    ];

    pub fn index(self) -> usize {
        match self {
            PhononMode::Longitudinal => 0,
            PhononMode::TransverseSlow => 1,
            PhononMode::TransverseFast => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PhononMode::Longitudinal => "L",
            PhononMode::TransverseSlow => "ST",
            PhononMode::TransverseFast => "FT",
        }
    }
}

impl fmt::Display for PhononMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Maps a wavevector to the direction of energy transport.
pub trait GroupVelocityMap: Send + Sync {
    /// Unit group-velocity direction for `k` in the given mode (global frame).
    fn group_velocity_dir(&self, mode: PhononMode, k: &Vector) -> Vector;

    /// True if the group velocity points into the solid, i.e. against the outward normal.
    fn velocity_is_inward(&self, mode: PhononMode, k: &Vector, normal: &Vector) -> bool {
        self.group_velocity_dir(mode, k).dot(normal) < 0.0
    }
}

/// Group velocity parallel to the wavevector in every mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsotropicLattice;

impl GroupVelocityMap for IsotropicLattice {
    fn group_velocity_dir(&self, _mode: PhononMode, k: &Vector) -> Vector {
        k.normalize().unwrap_or(Vector::zero())
    }
}

/// Group velocity given by a per-mode linear map: `v = normalize(M k)`.
///
/// Off-diagonal terms tilt the energy flow away from the wavevector, which
/// is the minimal ingredient needed to produce surface-wave states.
#[derive(Debug, Clone)]
pub struct LinearAnisotropicLattice {
    maps: [nd::Array2<f64>; NUM_MODES],
}

impl LinearAnisotropicLattice {
    /// Uses the same 3x3 row-major matrix for all modes.
    pub fn uniform(matrix: [[f64; 3]; 3]) -> Result<Self> {
        Self::per_mode([matrix; NUM_MODES])
    }

    /// One 3x3 row-major matrix per mode, indexed by `PhononMode::index()`.
    ///
    /// Each matrix must be symmetric positive definite so that `v · k > 0`.
    pub fn per_mode(matrices: [[[f64; 3]; 3]; NUM_MODES]) -> Result<Self> {
        let mut maps: [nd::Array2<f64>; NUM_MODES] = Default::default();
        for (i, m) in matrices.iter().enumerate() {
            let arr = nd::arr2(m);
            if !is_symmetric_positive_definite(&arr) {
                return Err(anyhow!(
                    "Group velocity map for mode {} must be symmetric positive definite",
                    PhononMode::ALL[i]
                ));
            }
            maps[i] = arr;
        }
        Ok(Self { maps })
    }

    /// Identity map plus a symmetric coupling `tilt` between the x and z axes.
    pub fn xz_tilt(tilt: f64) -> Result<Self> {
        Self::uniform([[1., 0., tilt], [0., 1., 0.], [tilt, 0., 1.]])
    }
}

impl GroupVelocityMap for LinearAnisotropicLattice {
    fn group_velocity_dir(&self, mode: PhononMode, k: &Vector) -> Vector {
        apply_matrix(&self.maps[mode.index()].view(), k)
            .normalize()
            .unwrap_or(Vector::zero())
    }
}

/// Sylvester's criterion on a 3x3 matrix.
fn is_symmetric_positive_definite(m: &nd::Array2<f64>) -> bool {
    for i in 0..3 {
        for j in 0..3 {
            if (m[[i, j]] - m[[j, i]]).abs() > 1e-12 {
                return false;
            }
        }
    }
    let d1 = m[[0, 0]];
    let d2 = m[[0, 0]] * m[[1, 1]] - m[[0, 1]] * m[[1, 0]];
    let d3 = m[[0, 0]] * (m[[1, 1]] * m[[2, 2]] - m[[1, 2]] * m[[2, 1]])
        - m[[0, 1]] * (m[[1, 0]] * m[[2, 2]] - m[[1, 2]] * m[[2, 0]])
        + m[[0, 2]] * (m[[1, 0]] * m[[2, 1]] - m[[1, 1]] * m[[2, 0]]);
    d1 > 0. && d2 > 0. && d3 > 0.
}
