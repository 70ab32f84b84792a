pub mod geom;
pub mod lattice;
pub mod sim;

// Prelude
pub use geom::frame::Frame;
pub use geom::point::Point;
pub use geom::solid::{Cuboid, Solid, Sphere};
pub use geom::vector::Vector;
pub use lattice::{GroupVelocityMap, IsotropicLattice, LinearAnisotropicLattice, PhononMode};
pub use sim::boundary::{
    AnharmonicDecay, BoundaryConfig, BoundaryContext, BoundaryOutcome, BoundaryProcess, SurfaceProperty,
};
pub use sim::track::Wavepacket;
