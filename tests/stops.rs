use dive_sim::{
    gradient::GfBlending,
    profile::ProfilePoint,
    simulate::{simulate, SimulationInput, TimelineSample},
    stops::{ascent_start, build_stops, build_stops_with, total_stop_time, Stop},
    zh16c::ModelConfig,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn sample(time: f32, depth: f32, ceiling: f32) -> TimelineSample {
    TimelineSample {
        time,
        depth,
        tissues: [0.74; 16],
        ceiling,
        saturation: 0.0,
        gradient_factor: 1.0,
        controlling: None,
    }
}

fn square_input() -> SimulationInput {
    SimulationInput {
        points: vec![
            ProfilePoint::new(0.0, 30.0),
            ProfilePoint::new(0.5, 30.0),
            ProfilePoint::new(0.5025, 0.0),
            ProfilePoint::new(1.0, 0.0),
        ],
        total_minutes: 40.0,
        step_seconds: 60.0,
        gf_low: 0.3,
        gf_high: 0.85,
        blending: GfBlending::AmbientPressure,
    }
}

fn assert_well_formed(stops: &[Stop]) {
    for stop in stops {
        assert!(stop.depth > 0);
        assert_eq!(stop.depth % 3, 0);
        assert!(stop.duration > 0.0);
        assert!(stop.end_time > stop.start_time);
    }
    for pair in stops.windows(2) {
        assert!(pair[0].depth >= pair[1].depth, "stop went deeper: {:?}", stops);
        assert!(pair[0].end_time <= pair[1].start_time);
    }
}

#[test]
fn test_too_few_samples() {
    assert!(build_stops(&[]).is_empty());
    assert!(build_stops(&[sample(0.0, 30.0, 9.0)]).is_empty());
}

#[test]
fn test_flat_profile_has_no_stops() {
    let mut input = square_input();
    input.points = Vec::new();
    let timeline = simulate(&input, &ModelConfig::default());
    assert!(build_stops(&timeline.samples).is_empty());
}

#[test]
fn test_square_profile_schedule() {
    let timeline = simulate(&square_input(), &ModelConfig::default());
    let stops = build_stops(&timeline.samples);

    assert!(!stops.is_empty());
    assert_well_formed(&stops);
    assert_eq!(stops[0].start_time, 21.0);
    assert_eq!(stops.last().map(|stop| stop.end_time), Some(40.0));
}

#[test]
fn test_ascent_start_skips_descent_and_bottom() {
    let samples = [
        sample(0.0, 0.0, 0.0),
        sample(1.0, 15.0, 0.0),
        sample(2.0, 30.0, 0.0),
        sample(3.0, 29.97, 0.0),
        sample(4.0, 30.0, 0.0),
        sample(5.0, 20.0, 4.0),
        sample(6.0, 0.0, 2.0),
    ];
    assert_eq!(ascent_start(&samples), Some(5));
}

#[test]
fn test_dive_ending_on_the_bottom_has_no_ascent() {
    let samples = [
        sample(0.0, 0.0, 0.0),
        sample(1.0, 30.0, 0.0),
        sample(2.0, 30.0, 6.0),
        sample(3.0, 29.95, 9.0),
        sample(4.0, 30.0, 12.0),
    ];
    assert_eq!(ascent_start(&samples), None);
    assert!(build_stops(&samples).is_empty());
}

#[test]
fn test_descent_ceilings_are_ignored() {
    let samples = [
        sample(0.0, 10.0, 12.0),
        sample(1.0, 30.0, 12.0),
        sample(2.0, 20.0, 5.0),
        sample(3.0, 10.0, 5.0),
        sample(4.0, 0.0, 0.0),
    ];
    let stops = build_stops(&samples);
    assert_eq!(stops, vec![Stop { depth: 6, start_time: 2.0, end_time: 4.0, duration: 2.0 }]);
}

#[test]
fn test_equal_depth_slices_merge() {
    let samples = [
        sample(0.0, 30.0, 0.0),
        sample(1.0, 12.0, 8.0),
        sample(2.0, 9.0, 7.5),
        sample(3.0, 9.0, 5.0),
        sample(4.0, 6.0, 2.0),
        sample(5.0, 3.0, 1.0),
        sample(6.0, 0.0, 0.0),
    ];
    let stops = build_stops(&samples);
    assert_eq!(
        stops,
        vec![
            Stop { depth: 9, start_time: 1.0, end_time: 3.0, duration: 2.0 },
            Stop { depth: 6, start_time: 3.0, end_time: 4.0, duration: 1.0 },
            Stop { depth: 3, start_time: 4.0, end_time: 6.0, duration: 2.0 },
        ]
    );
    assert_eq!(total_stop_time(&stops), 5.0);
}

#[test]
fn test_deeper_slice_after_shallower_stop_is_dropped() {
    let samples = [
        sample(0.0, 30.0, 0.0),
        sample(1.0, 10.0, 5.0),
        sample(2.0, 6.0, 2.0),
        sample(3.0, 6.0, 8.0),
        sample(4.0, 3.0, 2.5),
        sample(5.0, 0.0, 0.0),
    ];
    let stops = build_stops(&samples);
    assert_eq!(
        stops,
        vec![
            Stop { depth: 6, start_time: 1.0, end_time: 2.0, duration: 1.0 },
            Stop { depth: 3, start_time: 2.0, end_time: 5.0, duration: 2.0 },
        ]
    );
    assert_well_formed(&stops);
}

#[test]
fn test_non_positive_slices_are_skipped() {
    let samples = [
        sample(0.0, 30.0, 0.0),
        sample(1.0, 10.0, 5.0),
        sample(1.0, 9.0, 5.0),
        sample(2.0, 0.0, 0.0),
    ];
    let stops = build_stops(&samples);
    assert_eq!(stops, vec![Stop { depth: 6, start_time: 1.0, end_time: 2.0, duration: 1.0 }]);
}

#[test]
fn test_custom_policies() {
    fn from_start(_: &[TimelineSample]) -> Option<usize> {
        Some(0)
    }
    fn every_meter(ceiling: f32) -> Option<u32> {
        (ceiling > 0.0).then(|| ceiling.ceil() as u32)
    }
    let samples = [
        sample(0.0, 10.0, 4.2),
        sample(1.0, 30.0, 4.2),
        sample(2.0, 20.0, 1.5),
        sample(3.0, 0.0, 0.0),
    ];
    let stops = build_stops_with(&samples, from_start, every_meter);
    assert_eq!(
        stops,
        vec![
            Stop { depth: 5, start_time: 0.0, end_time: 2.0, duration: 2.0 },
            Stop { depth: 2, start_time: 2.0, end_time: 3.0, duration: 1.0 },
        ]
    );
}

#[test]
fn test_random_profiles_give_monotonic_schedules() {
    let mut rng = StdRng::seed_from_u64(1987);
    let config = ModelConfig::default();
    for _ in 0..40 {
        let count = rng.random_range(1..12);
        let points = (0..count)
            .map(|_| ProfilePoint::new(rng.random_range(0.0..=1.0), rng.random_range(0.0..60.0)))
            .collect();
        let input = SimulationInput {
            points,
            total_minutes: rng.random_range(5.0..=180.0),
            step_seconds: rng.random_range(5.0..=120.0),
            gf_low: rng.random_range(0.0..=1.0),
            gf_high: rng.random_range(0.0..=1.0),
            blending: GfBlending::AmbientPressure,
        };
        let timeline = simulate(&input, &config);
        assert!(timeline.samples.iter().all(|sample| sample.ceiling >= 0.0));
        assert_well_formed(&build_stops(&timeline.samples));
    }
}
