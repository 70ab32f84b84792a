use anyhow::Result;
use phonon_boundary::sim::boundary::{
    DegeneratePolicy, ProbabilityFn, Reflection, ReflectionFailure, ReflectionKind,
};
use phonon_boundary::sim::track::TrackStatus;
use phonon_boundary::{
    AnharmonicDecay, BoundaryConfig, BoundaryContext, BoundaryOutcome, BoundaryProcess, Cuboid,
    Frame, GroupVelocityMap, IsotropicLattice, LinearAnisotropicLattice, PhononMode, Point,
    SurfaceProperty, Vector, Wavepacket,
};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// 1 meV phonon hitting the top face of a 2 m cube.
fn top_face_track(k: Vector, lattice: &dyn GroupVelocityMap) -> Wavepacket {
    Wavepacket::new(k, PhononMode::Longitudinal, Point::new(0.3, -0.2, 1.0), 1.0e-3, lattice)
}

fn expect_reflection(outcome: &BoundaryOutcome) -> &Reflection {
    match outcome {
        BoundaryOutcome::Reflected(r) => r,
        other => panic!("expected a reflection, got {other:?}"),
    }
}

#[test]
fn test_flat_specular_only_boundary() {
    let cube = Cuboid::new(2., 2., 2.).unwrap();
    let frame = Frame::identity();
    let surface = SurfaceProperty::reflecting("polished", 1., 0., 0.);
    let config = BoundaryConfig::new();
    let process = BoundaryProcess::new(BoundaryContext::new(&IsotropicLattice, &cube, &frame, &surface, &config));
    let mut rng = StdRng::seed_from_u64(1);

    let mut track = top_face_track(Vector::new(1.0e9, 0., 1.0e9), &IsotropicLattice);
    let outcome = process.apply(&track, &mut rng);
    let r = expect_reflection(&outcome);
    assert_eq!(r.kind, ReflectionKind::Specular);
    assert_eq!(r.walk_attempts, 0);
    assert!(r.wave_vector.is_within(&Vector::new(1.0e9, 0., -1.0e9), 1e-3));

    assert_eq!(track.apply(&outcome), TrackStatus::Alive);
    assert_eq!(track.reflections, 1);
    assert!(track.momentum_direction.dz < 0.);
}

#[test]
fn test_vanishing_probabilities_follow_policy() {
    let cube = Cuboid::new(2., 2., 2.).unwrap();
    let frame = Frame::identity();
    // All fits cut off below the 242 GHz of a 1 meV phonon
    let cut = ProbabilityFn::new(vec![1.0], 1.0e11);
    let surface = SurfaceProperty::new("cut", 0., 1., 0., cut.clone(), cut.clone(), cut);
    let track = top_face_track(Vector::new(0., 1.0e9, 1.0e9), &IsotropicLattice);

    let config = BoundaryConfig::new();
    let process = BoundaryProcess::new(BoundaryContext::new(&IsotropicLattice, &cube, &frame, &surface, &config));
    let mut rng = StdRng::seed_from_u64(2);
    for _ in 0..20 {
        assert!(matches!(process.apply(&track, &mut rng), BoundaryOutcome::Absorbed));
    }

    let mut config = BoundaryConfig::new();
    config.degenerate_policy = DegeneratePolicy::Specular;
    let process = BoundaryProcess::new(BoundaryContext::new(&IsotropicLattice, &cube, &frame, &surface, &config));
    let outcome = process.apply(&track, &mut rng);
    assert_eq!(expect_reflection(&outcome).kind, ReflectionKind::Specular);
}

#[test]
fn test_transmission_leaves_track_unchanged() {
    let cube = Cuboid::new(2., 2., 2.).unwrap();
    let frame = Frame::identity();
    let mut surface = SurfaceProperty::reflecting("window", 1., 0., 0.);
    surface.reflection_prob = 0.0;
    let config = BoundaryConfig::new();
    let process = BoundaryProcess::new(BoundaryContext::new(&IsotropicLattice, &cube, &frame, &surface, &config));
    let mut rng = StdRng::seed_from_u64(3);

    let mut track = top_face_track(Vector::new(0., 0., 1.0e9), &IsotropicLattice);
    let before = track.clone();
    let outcome = process.apply(&track, &mut rng);
    assert!(matches!(outcome, BoundaryOutcome::Transmitted));
    assert_eq!(track.apply(&outcome), TrackStatus::Alive);
    assert_eq!(track.wave_vector, before.wave_vector);
    assert_eq!(track.reflections, 0);
}

#[test]
fn test_absorption_needs_normal_wavevector_above_threshold() {
    let cube = Cuboid::new(2., 2., 2.).unwrap();
    let frame = Frame::identity();
    let config = BoundaryConfig::new();
    let mut rng = StdRng::seed_from_u64(4);
    let track = top_face_track(Vector::new(0., 0., 1.0e9), &IsotropicLattice);

    let mut sensor = SurfaceProperty::reflecting("sensor", 1., 0., 0.);
    sensor.absorption_prob = 1.0;
    sensor.min_k = 1.0e8;
    let process = BoundaryProcess::new(BoundaryContext::new(&IsotropicLattice, &cube, &frame, &sensor, &config));
    assert!(matches!(process.apply(&track, &mut rng), BoundaryOutcome::Absorbed));

    // Same sensor, but the normal component is too small
    sensor.min_k = 2.0e9;
    let process = BoundaryProcess::new(BoundaryContext::new(&IsotropicLattice, &cube, &frame, &sensor, &config));
    assert!(matches!(process.apply(&track, &mut rng), BoundaryOutcome::Reflected(_)));
}

#[test]
fn test_max_reflections_kills_track() {
    let cube = Cuboid::new(2., 2., 2.).unwrap();
    let frame = Frame::identity();
    let surface = SurfaceProperty::reflecting("polished", 1., 0., 0.);
    let mut config = BoundaryConfig::new();
    config.max_reflections = Some(2);
    let process = BoundaryProcess::new(BoundaryContext::new(&IsotropicLattice, &cube, &frame, &surface, &config));
    let mut rng = StdRng::seed_from_u64(5);

    let mut track = top_face_track(Vector::new(0., 0., 1.0e9), &IsotropicLattice);
    for _ in 0..2 {
        // Point the track back at the face after each bounce
        track.wave_vector = Vector::new(0., 0., 1.0e9);
        let outcome = process.apply(&track, &mut rng);
        assert_eq!(track.apply(&outcome), TrackStatus::Alive);
    }
    assert_eq!(track.reflections, 2);

    let outcome = process.apply(&track, &mut rng);
    match &outcome {
        BoundaryOutcome::Failed(e) => assert_eq!(*e, ReflectionFailure::MaxReflections { limit: 2 }),
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(track.apply(&outcome), TrackStatus::Killed);
    assert_eq!(track.energy, 0.0);
}

/// Splits a phonon into two transverse phonons of half the energy.
struct TransverseSplit;

impl AnharmonicDecay for TransverseSplit {
    fn decay(&self, parent: &Wavepacket, _rng: &mut dyn RngCore) -> Result<[Wavepacket; 2]> {
        let mut slow = parent.clone();
        slow.mode = PhononMode::TransverseSlow;
        slow.energy = parent.energy / 2.;
        slow.wave_vector = parent.wave_vector * 0.6;
        let mut fast = slow.clone();
        fast.mode = PhononMode::TransverseFast;
        fast.wave_vector = parent.wave_vector * 0.4;
        Ok([slow, fast])
    }
}

#[test]
fn test_decay_replaces_track_with_inward_secondaries() {
    let cube = Cuboid::new(2., 2., 2.).unwrap();
    let frame = Frame::identity();
    let lattice = LinearAnisotropicLattice::per_mode([
        [[1., 0., 0.], [0., 1., 0.], [0., 0., 1.]],
        [[1., 0., 0.5], [0., 1., 0.], [0.5, 0., 1.]],
        [[1., 0., 0.], [0., 1., 0.5], [0., 0.5, 1.]],
    ])
    .unwrap();
    let surface = SurfaceProperty::reflecting("rough", 0., 0., 1.);
    let config = BoundaryConfig::new();
    let ctx = BoundaryContext::new(&lattice, &cube, &frame, &surface, &config).with_decay(&TransverseSplit);
    let process = BoundaryProcess::new(ctx);
    let mut rng = StdRng::seed_from_u64(6);

    let normal = Vector::new(0., 0., 1.);
    for _ in 0..50 {
        let mut track = top_face_track(Vector::new(0.5e9, 0., 1.0e9), &lattice);
        let outcome = process.apply(&track, &mut rng);
        let BoundaryOutcome::Decayed(products) = &outcome else {
            panic!("expected decay, got {outcome:?}");
        };
        for p in products {
            assert!(lattice.velocity_is_inward(p.mode, &p.wave_vector, &normal));
            assert!((p.energy - 0.5e-3).abs() < 1e-15);
        }
        assert!((products[0].wave_vector.length() - 0.6 * track.wave_vector.length()).abs() < 1.0);
        assert_eq!(track.apply(&outcome), TrackStatus::Killed);
    }
}

#[test]
fn test_anisotropic_specular_crosses_cuboid_edge() {
    let cube = Cuboid::new(0.2, 0.2, 0.2).unwrap();
    let frame = Frame::identity();
    let lattice = LinearAnisotropicLattice::xz_tilt(0.5).unwrap();
    let surface = SurfaceProperty::reflecting("polished", 1., 0., 0.);
    let config = BoundaryConfig::from_json(r#"{ "walk_step": 0.01, "edge_offset": 0.05 }"#).unwrap();
    let process = BoundaryProcess::new(BoundaryContext::new(&lattice, &cube, &frame, &surface, &config));
    let mut rng = StdRng::seed_from_u64(7);

    let k = Vector::new(0.9e9, 0., 0.3e9);
    let track = Wavepacket::new(k, PhononMode::Longitudinal, Point::new(0.005, 0., 0.1), 1.0e-3, &lattice);
    let outcome = process.apply(&track, &mut rng);
    let r = expect_reflection(&outcome);
    assert_eq!(r.kind, ReflectionKind::Specular);
    assert_eq!(r.walk_attempts, 10);
    assert!(r.position.is_within(&Point::new(0.1, 0., 0.1), 1e-9));
    assert!((r.wave_vector.length() - k.length()).abs() < 1e-3);
    // Energy now flows into the solid through the side face
    assert!(r.momentum_direction.dx < 0.);
}
