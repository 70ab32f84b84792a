use anyhow::Result;
use rand::{Rng, RngCore};

use crate::lattice::GroupVelocityMap;
use crate::sim::boundary::config::BoundaryConfig;
use crate::sim::boundary::diffuse::reflect_diffuse;
use crate::sim::boundary::failure::ReflectionFailure;
use crate::sim::track::Wavepacket;
use crate::{Point, Vector};

/// Anharmonic downconversion of a phonon into two lower-energy phonons.
///
/// Implementations choose the secondary modes, energies, and wavevector
/// magnitudes. Directions are reassigned by the boundary afterwards.
pub trait AnharmonicDecay: Send + Sync {
    fn decay(&self, parent: &Wavepacket, rng: &mut dyn RngCore) -> Result<[Wavepacket; 2]>;
}

/// Gives each decay product a diffuse exit direction at the boundary.
///
/// Inwardness is tested with each secondary's own mode. Wavevector magnitudes
/// are kept; momentum directions follow the new wavevectors.
pub fn assign_decay_directions<R: Rng + ?Sized>(
    secondaries: [Wavepacket; 2],
    lattice: &dyn GroupVelocityMap,
    config: &BoundaryConfig,
    normal: &Vector,
    surface_point: &Point,
    rng: &mut R,
) -> Result<[Wavepacket; 2], ReflectionFailure> {
    let [mut first, mut second] = secondaries;
    for packet in [&mut first, &mut second] {
        let diffuse = reflect_diffuse(lattice, config, packet.mode, normal, rng)?;
        packet.wave_vector = diffuse.direction.with_length(packet.wave_vector.length());
        packet.momentum_direction = lattice.group_velocity_dir(packet.mode, &packet.wave_vector);
        packet.position = *surface_point;
    }
    Ok([first, second])
}
