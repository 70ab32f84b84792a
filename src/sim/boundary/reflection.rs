use std::fmt;

use anyhow::Result;
use rand::Rng;

use crate::Vector;

/// Kind of reflection applied at a boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflectionKind {
    Specular,
    Diffuse,
}

impl fmt::Display for ReflectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReflectionKind::Specular => f.write_str("specular"),
            ReflectionKind::Diffuse => f.write_str("diffuse"),
        }
    }
}

/// Law of reflection: reverses the component of `k` along `normal`.
///
/// Returns a unit vector. Fails only for a zero or non-finite `k`.
pub fn mirror(k: &Vector, normal: &Vector) -> Result<Vector> {
    let k = k.normalize()?;
    let k_perp = k.dot(normal);
    (k - *normal * (2.0 * k_perp)).normalize()
}

/// Lambertian sample in the hemisphere opposite to the outward `normal`.
///
/// Malley's method: sample uniformly on a disk, then project onto the
/// hemisphere. This produces a cosine-weighted distribution (pdf = cos(theta) / pi)
/// about the inward normal.
pub fn lambertian_sample<R: Rng + ?Sized>(normal: &Vector, rng: &mut R) -> Vector {
    let n = -*normal;

    // Build orthonormal basis (tangent, bitangent) around the inward normal.
    let tangent = n.orthogonal().unwrap_or(Vector::new(1.0, 0.0, 0.0));
    let bitangent = n.cross(&tangent);

    let u1: f64 = rng.r#gen();
    let u2: f64 = rng.r#gen();
    let r = u1.sqrt();
    let phi = 2.0 * std::f64::consts::PI * u2;
    let x = r * phi.cos();
    let y = r * phi.sin();
    let z = (1.0 - u1).sqrt(); // = sqrt(1 - r^2)

    // Transform from local to world coordinates.
    tangent * x + bitangent * y + n * z
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_specular_reflection() {
        // Phonon going straight up into a horizontal surface (normal pointing up)
        let incident = Vector::new(0.0, 0.0, 1.0);
        let normal = Vector::new(0.0, 0.0, 1.0);
        let reflected = mirror(&incident, &normal).unwrap();
        assert!(reflected.is_within(&Vector::new(0.0, 0.0, -1.0), 1e-12));
    }

    #[test]
    fn test_specular_45_degrees() {
        let incident = Vector::new(1.0, 0.0, 1.0);
        let normal = Vector::new(0.0, 0.0, 1.0);
        let reflected = mirror(&incident, &normal).unwrap();
        let expected = Vector::new(1.0, 0.0, -1.0).normalize().unwrap();
        assert!(reflected.is_within(&expected, 1e-12));
    }

    #[test]
    fn test_mirror_returns_unit_vector() {
        let normal = Vector::new(0.0, 0.6, 0.8);
        for k in [
            Vector::new(3.0e9, -1.0e9, 2.0e9),
            Vector::new(1e-3, 2e-3, 5e-4),
            Vector::new(0.0, 0.0, 7.0),
        ] {
            let r = mirror(&k, &normal).unwrap();
            assert!((r.length() - 1.0).abs() < 1e-12);
        }
        assert!(mirror(&Vector::zero(), &normal).is_err());
    }

    #[test]
    fn test_lambertian_in_inward_hemisphere() {
        let mut rng = StdRng::seed_from_u64(0);
        let normal = Vector::new(0.0, 0.0, 1.0);
        for _ in 0..100 {
            let v = lambertian_sample(&normal, &mut rng);
            assert!(v.dot(&normal) < 0.0, "Lambertian sample must point into the solid");
            assert!((v.length() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_lambertian_cosine_weighted_distribution() {
        // mean(cos(theta)) should be 2/3 for cosine-weighted hemisphere sampling.
        let mut rng = StdRng::seed_from_u64(1);
        let normal = Vector::new(1.0, 0.0, 0.0);
        let n = 10000;
        let mut cos_sum = 0.0;
        for _ in 0..n {
            let v = lambertian_sample(&normal, &mut rng);
            cos_sum += -v.dot(&normal);
        }
        let mean_cos = cos_sum / n as f64;
        assert!(
            (mean_cos - 2.0 / 3.0).abs() < 0.05,
            "Mean cos(theta) should be ~0.667 for cosine-weighted sampling, got {mean_cos}"
        );
    }
}
