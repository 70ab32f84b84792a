use anyhow::{Result, anyhow};

use super::{Inside, SURFACE_TOLERANCE, Solid};
use crate::{Point, Vector};

/// Full sphere centered at the local origin.
#[derive(Debug, Clone)]
pub struct Sphere {
    radius: f64,
}

impl Sphere {
    pub fn new(radius: f64) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(anyhow!("Sphere radius must be finite and > 0, got {radius}"));
        }
        Ok(Self { radius })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Solid for Sphere {
    fn inside(&self, p: &Point) -> Inside {
        let dist = p.to_vector().length() - self.radius;
        if dist > SURFACE_TOLERANCE / 2. {
            Inside::Outside
        } else if dist > -SURFACE_TOLERANCE / 2. {
            Inside::Surface
        } else {
            Inside::Inside
        }
    }

    fn surface_normal(&self, p: &Point) -> Vector {
        p.to_vector()
            .normalize()
            .unwrap_or(Vector::new(0., 0., 1.))
    }

    fn distance_to_in(&self, p: &Point, dir: &Vector) -> f64 {
        if self.inside(p) != Inside::Outside {
            return 0.;
        }
        let Ok(d) = dir.normalize() else {
            return f64::INFINITY;
        };
        let o = p.to_vector();
        let b = o.dot(&d);
        let c = o.dot(&o) - self.radius * self.radius;
        let disc = b * b - c;
        if disc < 0. {
            return f64::INFINITY;
        }
        let t = -b - disc.sqrt();
        if t < 0. { f64::INFINITY } else { t }
    }

    fn distance_to_out(&self, p: &Point, dir: &Vector) -> f64 {
        if self.inside(p) != Inside::Inside {
            return 0.;
        }
        let Ok(d) = dir.normalize() else {
            return 0.;
        };
        let o = p.to_vector();
        let b = o.dot(&d);
        let c = o.dot(&o) - self.radius * self.radius;
        // c < 0 inside, so the discriminant is positive
        (-b + (b * b - c).sqrt()).max(0.)
    }
}
