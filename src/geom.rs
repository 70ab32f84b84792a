pub mod frame;
pub mod point;
pub mod rotation;
pub mod solid;
pub mod vector;

/// Geometric precision
const EPS: f64 = 1e-13;

/// Approximate equality for scalar quantities.
pub trait IsClose {
    fn is_close(&self, other: f64) -> bool;
}

impl IsClose for f64 {
    fn is_close(&self, other: f64) -> bool {
        (self - other).abs() < 1e-10
    }
}
