use crate::lattice::{GroupVelocityMap, PhononMode};
use crate::sim::boundary::BoundaryOutcome;
use crate::{Point, Vector};

/// Planck constant in eV*s.
pub const PLANCK_EV_S: f64 = 4.135_667_696e-15;

/// State of a single phonon wavepacket as seen by boundary processes.
#[derive(Debug, Clone)]
pub struct Wavepacket {
    /// Wavevector in the global frame (1/m).
    pub wave_vector: Vector,
    pub mode: PhononMode,
    /// Global position.
    pub position: Point,
    /// Unit direction of energy transport (group velocity).
    pub momentum_direction: Vector,
    /// Kinetic energy in eV.
    pub energy: f64,
    /// Number of boundary reflections so far.
    pub reflections: u32,
}

/// Whether a track keeps propagating after a boundary interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackStatus {
    Alive,
    Killed,
}

impl Wavepacket {
    /// Creates a wavepacket with its momentum direction derived from the lattice.
    pub fn new(
        wave_vector: Vector,
        mode: PhononMode,
        position: Point,
        energy: f64,
        lattice: &dyn GroupVelocityMap,
    ) -> Self {
        Self {
            wave_vector,
            mode,
            position,
            momentum_direction: lattice.group_velocity_dir(mode, &wave_vector),
            energy,
            reflections: 0,
        }
    }

    /// Phonon frequency from E = h f.
    pub fn frequency(&self) -> f64 {
        self.energy / PLANCK_EV_S
    }

    /// Writes a boundary outcome into the track.
    ///
    /// Secondaries of a decay are not stored here; the caller takes them
    /// from the outcome and starts new tracks.
    pub fn apply(&mut self, outcome: &BoundaryOutcome) -> TrackStatus {
        match outcome {
            BoundaryOutcome::Reflected(r) => {
                self.wave_vector = r.wave_vector;
                self.momentum_direction = r.momentum_direction;
                self.position = r.position;
                self.reflections += 1;
                TrackStatus::Alive
            }
            BoundaryOutcome::Transmitted => TrackStatus::Alive,
            BoundaryOutcome::Absorbed
            | BoundaryOutcome::Decayed(_)
            | BoundaryOutcome::Failed(_) => {
                self.energy = 0.0;
                TrackStatus::Killed
            }
        }
    }
}
