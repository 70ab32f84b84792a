use anyhow::{Result, anyhow};

use super::{Inside, SURFACE_TOLERANCE, Solid};
use crate::{Point, Vector};

/// Axis-aligned box centered at the local origin.
///
/// Faces meet at sharp edges, which makes it the reference case for
/// edge crossings during the surface walk.
#[derive(Debug, Clone)]
pub struct Cuboid {
    /// Half-lengths along X, Y, Z.
    half: [f64; 3],
}

impl Cuboid {
    /// Creates a box with full edge lengths `x`, `y`, `z`.
    pub fn new(x: f64, y: f64, z: f64) -> Result<Self> {
        for (name, len) in [("x", x), ("y", y), ("z", z)] {
            if !len.is_finite() || len <= 0.0 {
                return Err(anyhow!("Cuboid dimension {name} must be finite and > 0, got {len}"));
            }
        }
        Ok(Self {
            half: [x / 2., y / 2., z / 2.],
        })
    }

    /// Signed distance along each axis from the nearest face plane
    /// (positive outside the slab).
    fn axis_excess(&self, p: &Point) -> [f64; 3] {
        let c = [p.x, p.y, p.z];
        [
            c[0].abs() - self.half[0],
            c[1].abs() - self.half[1],
            c[2].abs() - self.half[2],
        ]
    }
}

fn axis_unit(axis: usize, sign: f64) -> Vector {
    let s = if sign < 0.0 { -1.0 } else { 1.0 };
    match axis {
        0 => Vector::new(s, 0., 0.),
        1 => Vector::new(0., s, 0.),
        _ => Vector::new(0., 0., s),
    }
}

impl Solid for Cuboid {
    fn inside(&self, p: &Point) -> Inside {
        let dist = self
            .axis_excess(p)
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max);
        if dist > SURFACE_TOLERANCE / 2. {
            Inside::Outside
        } else if dist > -SURFACE_TOLERANCE / 2. {
            Inside::Surface
        } else {
            Inside::Inside
        }
    }

    fn surface_normal(&self, p: &Point) -> Vector {
        let c = [p.x, p.y, p.z];
        let excess = self.axis_excess(p);

        // Faces whose plane contains p (within tolerance), regardless of the other axes
        let mut sum = Vector::zero();
        let mut count = 0;
        for axis in 0..3 {
            if excess[axis].abs() <= SURFACE_TOLERANCE / 2. {
                sum = sum + axis_unit(axis, c[axis]);
                count += 1;
            }
        }
        if count > 0 {
            return sum.normalize().unwrap_or(axis_unit(2, 1.));
        }

        // Off the surface: the face with the largest excess is the closest one
        let mut best = 0;
        for axis in 1..3 {
            if excess[axis] > excess[best] {
                best = axis;
            }
        }
        axis_unit(best, c[best])
    }

    fn on_edge(&self, p: &Point) -> bool {
        self.axis_excess(p)
            .iter()
            .filter(|e| e.abs() <= SURFACE_TOLERANCE / 2.)
            .count()
            > 1
    }

    fn distance_to_in(&self, p: &Point, dir: &Vector) -> f64 {
        if self.inside(p) != Inside::Outside {
            return 0.;
        }
        match self.slab_range(p, dir) {
            Some((t_min, t_max)) if t_max >= t_min && t_max >= 0. => t_min.max(0.),
            _ => f64::INFINITY,
        }
    }

    fn distance_to_out(&self, p: &Point, dir: &Vector) -> f64 {
        if self.inside(p) != Inside::Inside {
            return 0.;
        }
        match self.slab_range(p, dir) {
            Some((_, t_max)) => t_max.max(0.),
            None => 0.,
        }
    }
}

impl Cuboid {
    /// Ray parameter interval `(t_min, t_max)` inside all three slabs.
    ///
    /// `None` if the ray runs parallel to a slab it is not inside of.
    fn slab_range(&self, p: &Point, dir: &Vector) -> Option<(f64, f64)> {
        let d = dir.normalize().ok()?;
        let origin = [p.x, p.y, p.z];
        let step = [d.dx, d.dy, d.dz];

        let mut t_min = f64::NEG_INFINITY;
        let mut t_max = f64::INFINITY;
        for axis in 0..3 {
            let h = self.half[axis];
            if step[axis].abs() < 1e-15 {
                if origin[axis].abs() > h + SURFACE_TOLERANCE / 2. {
                    return None;
                }
                continue;
            }
            let t1 = (-h - origin[axis]) / step[axis];
            let t2 = (h - origin[axis]) / step[axis];
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));
        }
        Some((t_min, t_max))
    }
}
