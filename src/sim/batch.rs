use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;

use crate::sim::boundary::{BoundaryOutcome, BoundaryProcess, ReflectionKind};
use crate::sim::track::{TrackStatus, Wavepacket};

/// Counts of boundary outcomes in a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub specular: usize,
    pub diffuse: usize,
    pub absorbed: usize,
    pub transmitted: usize,
    pub decayed: usize,
    pub failed: usize,
    /// Lenient diffuse reflections that were never confirmed inward.
    pub unvalidated: usize,
    /// Total surface walk iterations over all specular reflections.
    pub walk_attempts: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.specular + self.diffuse + self.absorbed + self.transmitted + self.decayed + self.failed
    }

    fn record(&mut self, outcome: &BoundaryOutcome) {
        match outcome {
            BoundaryOutcome::Reflected(r) => {
                match r.kind {
                    ReflectionKind::Specular => self.specular += 1,
                    ReflectionKind::Diffuse => self.diffuse += 1,
                }
                if !r.validated {
                    self.unvalidated += 1;
                }
                self.walk_attempts += r.walk_attempts;
            }
            BoundaryOutcome::Absorbed => self.absorbed += 1,
            BoundaryOutcome::Transmitted => self.transmitted += 1,
            BoundaryOutcome::Decayed(_) => self.decayed += 1,
            BoundaryOutcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Result of one batch of boundary hits.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub summary: BatchSummary,
    /// Status of each input track, in input order.
    pub status: Vec<TrackStatus>,
    /// Decay products, in input order of their parents.
    pub secondaries: Vec<Wavepacket>,
}

/// Resolves a boundary hit for every track in parallel and updates the tracks in place.
///
/// Track `i` draws from its own generator seeded with `seed + i`, so the
/// result does not depend on how rayon schedules the work.
pub fn process_hits(process: &BoundaryProcess, tracks: &mut [Wavepacket], seed: u64) -> BatchReport {
    let outcomes: Vec<(TrackStatus, BoundaryOutcome)> = tracks
        .par_iter_mut()
        .enumerate()
        .map(|(i, track)| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
            let outcome = process.apply(track, &mut rng);
            (track.apply(&outcome), outcome)
        })
        .collect();

    let mut report = BatchReport {
        status: Vec::with_capacity(outcomes.len()),
        ..Default::default()
    };
    for (status, outcome) in outcomes {
        report.summary.record(&outcome);
        report.status.push(status);
        if let BoundaryOutcome::Decayed(products) = outcome {
            report.secondaries.extend(products);
        }
    }

    log::debug!("Boundary batch of {} tracks: {:?}", tracks.len(), report.summary);
    report
}
