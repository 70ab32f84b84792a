use crate::Point;
use crate::geom::EPS;
use anyhow::{Result, anyhow};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
}

impl Vector {
    pub fn new(dx: f64, dy: f64, dz: f64) -> Self {
        Self { dx, dy, dz }
    }

    pub fn zero() -> Self {
        Self::new(0., 0., 0.)
    }

    pub fn from_points(beg: Point, end: Point) -> Self {
        Self {
            dx: end.x - beg.x,
            dy: end.y - beg.y,
            dz: end.z - beg.z,
        }
    }

    /// Cross product between 2 vectors.
    pub fn cross(&self, other: &Self) -> Self {
        Self {
            dx: self.dy * other.dz - self.dz * other.dy,
            dy: self.dz * other.dx - self.dx * other.dz,
            dz: self.dx * other.dy - self.dy * other.dx,
        }
    }

    /// Dot product between 2 vectors.
    pub fn dot(&self, other: &Self) -> f64 {
        self.dx * other.dx + self.dy * other.dy + self.dz * other.dz
    }

    /// Returns the length of the vector.
    pub fn length(&self) -> f64 {
        (self.dx.powi(2) + self.dy.powi(2) + self.dz.powi(2)).sqrt()
    }

    pub fn is_close(&self, other: &Self) -> bool {
        (self.dx - other.dx).abs() < EPS
            && (self.dy - other.dy).abs() < EPS
            && (self.dz - other.dz).abs() < EPS
    }

    /// Like `is_close()` but with a caller-chosen tolerance.
    pub fn is_within(&self, other: &Self, tol: f64) -> bool {
        (self.dx - other.dx).abs() <= tol
            && (self.dy - other.dy).abs() <= tol
            && (self.dz - other.dz).abs() <= tol
    }

    pub fn is_finite(&self) -> bool {
        self.dx.is_finite() && self.dy.is_finite() && self.dz.is_finite()
    }

    /// Normalizes the vector (divides by its length) and returns a copy.
    pub fn normalize(&self) -> Result<Self> {
        let len = self.length();
        if len < EPS || !len.is_finite() {
            Err(anyhow!("Cannot normalize vector with length {len}"))
        } else {
            Ok(Self {
                dx: self.dx / len,
                dy: self.dy / len,
                dz: self.dz / len,
            })
        }
    }

    /// Returns a copy scaled to length `mag`. Zero vectors stay zero.
    pub fn with_length(&self, mag: f64) -> Self {
        match self.normalize() {
            Ok(unit) => unit * mag,
            Err(_) => Self::zero(),
        }
    }

    /// Component of `self` perpendicular to the unit vector `n`.
    pub fn reject(&self, n: &Self) -> Self {
        *self - *n * self.dot(n)
    }

    /// Some unit vector perpendicular to `self`.
    pub fn orthogonal(&self) -> Result<Self> {
        let arbitrary = if self.dx.abs() < 0.9 * self.length() {
            Vector::new(1.0, 0.0, 0.0)
        } else {
            Vector::new(0.0, 1.0, 0.0)
        };
        self.cross(&arbitrary).normalize()
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prec = f.precision().unwrap_or(2); // Default 2 decimals
        write!(
            f,
            "Vector({:.prec$}, {:.prec$}, {:.prec$})",
            self.dx,
            self.dy,
            self.dz,
            prec = prec
        )
    }
}

// Implement +
impl Add for Vector {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            dx: self.dx + other.dx,
            dy: self.dy + other.dy,
            dz: self.dz + other.dz,
        }
    }
}

// Implement -
impl Sub for Vector {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            dx: self.dx - other.dx,
            dy: self.dy - other.dy,
            dz: self.dz - other.dz,
        }
    }
}

impl Neg for Vector {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            dx: -self.dx,
            dy: -self.dy,
            dz: -self.dz,
        }
    }
}

// Implement *
impl Mul<f64> for Vector {
    type Output = Self;
    fn mul(self, other: f64) -> Self {
        Self {
            dx: self.dx * other,
            dy: self.dy * other,
            dz: self.dz * other,
        }
    }
}

impl Mul<Vector> for f64 {
    type Output = Vector;
    fn mul(self, other: Vector) -> Vector {
        other * self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let p0 = Point::new(1., 1., 1.);
        let p1 = Point::new(0., 0., 0.);
        let va = Vector::from_points(p0, p1);
        let vb = Vector::from_points(p1, p0);
        assert_eq!(va, vb * -1.);
        assert_eq!(va, -vb);
    }

    #[test]
    fn test_cross() {
        let vx = Vector::new(1., 0., 0.);
        let vy = Vector::new(0., 1., 0.);
        let v_cross = vx.cross(&vy);
        assert_eq!(v_cross, Vector::new(0., 0., 1.));
        let len = v_cross.length();
        assert_eq!(len, 1.);
    }

    #[test]
    fn test_normalize() {
        // Non-zero-length vector
        let v = Vector::new(9., 0., 0.);
        let vnorm = v.normalize();
        assert!(vnorm.is_ok());
        assert_eq!(vnorm.unwrap(), Vector::new(1., 0., 0.));
        // Zero-length vector
        let v = Vector::new(0., 0., 0.);
        assert!(v.normalize().is_err());
        // Non-finite vector
        let v = Vector::new(f64::NAN, 0., 0.);
        assert!(v.normalize().is_err());
    }

    #[test]
    fn test_reject_removes_normal_component() {
        let v = Vector::new(1., 2., 3.);
        let n = Vector::new(0., 0., 1.);
        let t = v.reject(&n);
        assert!(t.is_close(&Vector::new(1., 2., 0.)));
        assert!(t.dot(&n).abs() < 1e-12);
    }

    #[test]
    fn test_orthogonal() {
        for v in [
            Vector::new(1., 0., 0.),
            Vector::new(0., 0., 1.),
            Vector::new(0.3, -0.4, 0.8),
        ] {
            let o = v.orthogonal().unwrap();
            assert!(o.dot(&v).abs() < 1e-12);
            assert!((o.length() - 1.).abs() < 1e-12);
        }
    }

    #[test]
    fn test_with_length() {
        let v = Vector::new(3., 4., 0.).with_length(10.);
        assert!(v.is_close(&Vector::new(6., 8., 0.)));
        assert_eq!(Vector::zero().with_length(2.), Vector::zero());
    }
}
