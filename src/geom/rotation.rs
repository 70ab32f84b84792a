use crate::Vector;
use crate::geom::IsClose;
use anyhow::{Result, anyhow};
use ndarray as nd;

/// Calculate rotation matrix for a unit vector `u` and angle `phi`.
///
/// A rotation in 3D can be described with an axis and angle around that axis.
/// The axis is described with a unit vector `u` `(ux**2 + uy**2 + uz**2 == 1)`
/// and the angle `phi` (in radians, right-hand rule).
///
/// Rodrigues' formula is used because it is numerically more stable
/// than the explicit trigonometric form:
/// https://en.wikipedia.org/wiki/Rodrigues%27_rotation_formula
pub fn rotation_matrix(u: &Vector, phi: f64) -> Result<nd::Array2<f64>> {
    if !u.length().is_close(1.) {
        return Err(anyhow!("rotation_matrix() requires u to be a unit vector, got {u}"));
    }

    let w: nd::Array2<f64> = nd::arr2(&[[0., -u.dz, u.dy], [u.dz, 0., -u.dx], [-u.dy, u.dx, 0.]]);

    Ok(nd::Array::eye(3) + phi.sin() * &w + (2. * (phi / 2.).sin().powi(2)) * w.dot(&w))
}

/// Multiplies a 3x3 matrix with a column vector.
pub fn apply_matrix(rot: &nd::ArrayView2<f64>, v: &Vector) -> Vector {
    let col = nd::arr1(&[v.dx, v.dy, v.dz]);
    let out = rot.dot(&col);
    Vector::new(out[0], out[1], out[2])
}

/// Rotate vector `v` around the unit vector `u` by the angle `phi` (radians).
///
/// A zero axis or a zero angle returns `v` unchanged.
pub fn rotate_vector_around(v: &Vector, u: &Vector, phi: f64) -> Result<Vector> {
    if u.length().is_close(0.) || phi.abs().is_close(0.) {
        // No need to rotate
        return Ok(*v);
    }
    let rot = rotation_matrix(u, phi)?;

    Ok(apply_matrix(&rot.view(), v))
}

/// Signed angle (radians) that rotates `from` onto `to` about `axis`.
///
/// Both vectors are projected onto the plane perpendicular to `axis` first,
/// so the result is the azimuthal angle of `to` relative to `from`.
/// Returns 0 if either projection vanishes.
pub fn signed_angle_about(from: &Vector, to: &Vector, axis: &Vector) -> f64 {
    let Ok(axis) = axis.normalize() else {
        return 0.;
    };
    let from_p = from.reject(&axis);
    let to_p = to.reject(&axis);
    if from_p.length().is_close(0.) || to_p.length().is_close(0.) {
        return 0.;
    }
    let sin = axis.dot(&from_p.cross(&to_p));
    let cos = from_p.dot(&to_p);
    sin.atan2(cos)
}
