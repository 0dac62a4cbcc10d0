use dive_sim::profile::{depth_at, last_submerged_fraction, max_depth, normalize, ProfilePoint};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn p(time_fraction: f32, depth: f32) -> ProfilePoint {
    ProfilePoint::new(time_fraction, depth)
}

fn random_points(rng: &mut StdRng) -> Vec<ProfilePoint> {
    let count = rng.random_range(0..60);
    (0..count)
        .map(|_| p(rng.random_range(0.0..=1.0), rng.random_range(0.0..60.0)))
        .collect()
}

#[test]
fn test_empty_input_is_flat_surface() {
    assert_eq!(normalize(Vec::<ProfilePoint>::new()), vec![p(0.0, 0.0), p(1.0, 0.0)]);
    assert_eq!(normalize([None::<ProfilePoint>, None]), vec![p(0.0, 0.0), p(1.0, 0.0)]);
}

#[test]
fn test_sorts_and_closes_boundaries() {
    let profile = normalize([p(0.6, 12.0), p(0.2, 20.0), p(0.4, 25.0)]);
    assert_eq!(profile, vec![p(0.0, 20.0), p(0.2, 20.0), p(0.4, 25.0), p(0.6, 12.0), p(1.0, 12.0)]);
}

#[test]
fn test_single_point_spans_dive() {
    let profile = normalize([p(0.5, 18.0)]);
    assert_eq!(profile, vec![p(0.0, 18.0), p(0.5, 18.0), p(1.0, 18.0)]);
}

#[test]
fn test_sparse_entries_are_skipped() {
    let sparse = vec![Some(p(0.0, 0.0)), None, None, Some(p(0.5, 10.0)), None, Some(p(1.0, 0.0))];
    assert_eq!(normalize(sparse), vec![p(0.0, 0.0), p(0.5, 10.0), p(1.0, 0.0)]);
}

#[test]
fn test_jitter_last_write_wins() {
    let profile = normalize([p(0.0, 0.0), p(0.5, 10.0), p(0.501, 11.0), p(0.5015, 12.0), p(1.0, 0.0)]);
    assert_eq!(profile, vec![p(0.0, 0.0), p(0.5, 12.0), p(1.0, 0.0)]);
}

#[test]
fn test_non_finite_points_are_dropped() {
    let profile = normalize([p(f32::NAN, 10.0), p(0.5, f32::INFINITY), p(0.5, 9.0)]);
    assert_eq!(profile, vec![p(0.0, 9.0), p(0.5, 9.0), p(1.0, 9.0)]);
}

#[test]
fn test_boundary_points_inside_window_are_snapped() {
    let profile = normalize([p(0.001, 5.0), p(0.5, 10.0), p(0.999, 3.0)]);
    assert_eq!(profile, vec![p(0.0, 5.0), p(0.5, 10.0), p(1.0, 3.0)]);
}

#[test]
fn test_normalize_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..500 {
        let points = random_points(&mut rng);
        let once = normalize(points.iter().copied());
        let twice = normalize(once.iter().copied());
        assert_eq!(once, twice, "input: {:?}", points);
    }
}

#[test]
fn test_normalized_profile_invariants() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..500 {
        let profile = normalize(random_points(&mut rng));
        assert!(profile.len() >= 2);
        assert_eq!(profile.first().map(|point| point.time_fraction), Some(0.0));
        assert_eq!(profile.last().map(|point| point.time_fraction), Some(1.0));
        for pair in profile.windows(2) {
            assert!(pair[1].time_fraction - pair[0].time_fraction > 0.002);
        }
    }
}

#[test]
fn test_depth_at_interpolates() {
    let profile = normalize([p(0.0, 0.0), p(0.25, 30.0), p(0.75, 30.0), p(1.0, 0.0)]);
    assert_eq!(depth_at(0.0, 40.0, &profile), 0.0);
    assert!((depth_at(5.0, 40.0, &profile) - 15.0).abs() < 1e-4);
    assert_eq!(depth_at(20.0, 40.0, &profile), 30.0);
    assert!((depth_at(35.0, 40.0, &profile) - 15.0).abs() < 1e-4);
    assert_eq!(depth_at(40.0, 40.0, &profile), 0.0);
}

#[test]
fn test_depth_at_clamps_time() {
    let profile = normalize([p(0.0, 10.0), p(1.0, 20.0)]);
    assert_eq!(depth_at(-5.0, 40.0, &profile), 10.0);
    assert_eq!(depth_at(100.0, 40.0, &profile), 20.0);
}

#[test]
fn test_depth_at_zero_total_treated_as_one() {
    let profile = normalize([p(0.0, 0.0), p(1.0, 10.0)]);
    assert!((depth_at(0.5, 0.0, &profile) - 5.0).abs() < 1e-5);
    assert!(depth_at(0.5, 0.0, &profile).is_finite());
}

#[test]
fn test_depth_at_is_pure() {
    let profile = normalize([p(0.1, 8.0), p(0.6, 22.0)]);
    let first: Vec<f32> = (0..=40).map(|minute| depth_at(minute as f32, 40.0, &profile)).collect();
    let second: Vec<f32> = (0..=40).map(|minute| depth_at(minute as f32, 40.0, &profile)).collect();
    assert_eq!(first, second);
    assert_eq!(profile, normalize([p(0.1, 8.0), p(0.6, 22.0)]));
}

#[test]
fn test_profile_extents() {
    let profile = normalize([p(0.0, 0.0), p(0.3, 27.0), p(0.6, 0.05), p(1.0, 0.0)]);
    assert_eq!(max_depth(&profile), 27.0);
    assert_eq!(last_submerged_fraction(&profile, 0.1), Some(0.3));
    assert_eq!(last_submerged_fraction(&normalize(Vec::<ProfilePoint>::new()), 0.1), None);
}
