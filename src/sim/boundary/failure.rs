use thiserror::Error;

use crate::lattice::PhononMode;
use crate::sim::boundary::ReflectionKind;

/// Why a boundary interaction could not produce a physical outgoing state.
///
/// Every variant ends the track.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReflectionFailure {
    #[error("phonon {kind} reflection failed: surface walk exhausted after {attempts} attempts (mode {mode})")]
    WalkExhausted {
        kind: ReflectionKind,
        mode: PhononMode,
        attempts: usize,
    },

    #[error("phonon {kind} reflection failed: surface walk aborted after {attempts} attempts, {reason} (mode {mode})")]
    WalkAborted {
        kind: ReflectionKind,
        mode: PhononMode,
        attempts: usize,
        reason: String,
    },

    #[error("phonon {kind} reflection failed: no inward direction in {tries} diffuse samples (mode {mode})")]
    DiffuseExhausted {
        kind: ReflectionKind,
        mode: PhononMode,
        tries: usize,
    },

    #[error("phonon {kind} reflection failed: group velocity not inward (mode {mode})")]
    NotInward { kind: ReflectionKind, mode: PhononMode },

    #[error("maximum number of reflections ({limit}) reached")]
    MaxReflections { limit: u32 },

    #[error("anharmonic decay at boundary failed: {0}")]
    DecayFailed(String),
}

impl ReflectionFailure {
    /// Reflection type involved, if the failure came from a reflection attempt.
    pub fn kind(&self) -> Option<ReflectionKind> {
        match self {
            Self::WalkExhausted { kind, .. }
            | Self::WalkAborted { kind, .. }
            | Self::DiffuseExhausted { kind, .. }
            | Self::NotInward { kind, .. } => Some(*kind),
            Self::MaxReflections { .. } | Self::DecayFailed(_) => None,
        }
    }
}
