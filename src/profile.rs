use alloc::vec;
use alloc::vec::Vec;
use defmt::Format;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Points closer than this (in time fraction) collapse into one sample.
pub const DEDUP_WINDOW: f32 = 0.002;
/// Anything shallower is treated as being at the surface.
pub const SURFACE_DEPTH: f32 = 0.1; // m

/// A profile sample on the unit time axis.
#[derive(Debug, Format, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProfilePoint {
    pub time_fraction: f32, // 0 <= x <= 1
    pub depth: f32,         // m
}

impl ProfilePoint {
    pub const fn new(time_fraction: f32, depth: f32) -> Self {
        ProfilePoint { time_fraction, depth }
    }

    fn is_usable(&self) -> bool {
        self.time_fraction.is_finite() && self.depth.is_finite()
    }
}

/// Turn a sparse, unordered set of drawn points into a sorted piecewise
/// linear profile spanning [0, 1].
///
/// Accepts either plain points or `Option`s so a sparse buffer can be passed
/// straight in. Absent or non-finite entries are dropped. Within the dedup
/// window the later point wins. The result always starts at fraction 0 and
/// ends at fraction 1; an empty input yields a flat surface profile.
pub fn normalize<I, P>(points: I) -> Vec<ProfilePoint>
where
    I: IntoIterator<Item = P>,
    P: Into<Option<ProfilePoint>>,
{
    let mut sorted: Vec<ProfilePoint> = points
        .into_iter()
        .filter_map(Into::<Option<ProfilePoint>>::into)
        .filter(ProfilePoint::is_usable)
        .collect();
    if sorted.is_empty() {
        return vec![ProfilePoint::new(0.0, 0.0), ProfilePoint::new(1.0, 0.0)];
    }
    sorted.sort_by(|a, b| a.time_fraction.total_cmp(&b.time_fraction));

    let mut deduped: Vec<ProfilePoint> = Vec::with_capacity(sorted.len() + 2);
    for point in sorted {
        match deduped.last_mut() {
            Some(last) if point.time_fraction - last.time_fraction <= DEDUP_WINDOW => {
                last.depth = point.depth;
            }
            _ => deduped.push(point),
        }
    }

    // A boundary point that already sits inside the dedup window is snapped
    // instead of cloned, otherwise a second pass would merge the pair.
    let first = deduped[0];
    if first.time_fraction > DEDUP_WINDOW {
        deduped.insert(0, ProfilePoint::new(0.0, first.depth));
    } else if first.time_fraction > 0.0 {
        deduped[0].time_fraction = 0.0;
    }

    let last_index = deduped.len() - 1;
    let last = deduped[last_index];
    if 1.0 - last.time_fraction > DEDUP_WINDOW {
        deduped.push(ProfilePoint::new(1.0, last.depth));
    } else if last.time_fraction < 1.0 {
        deduped[last_index].time_fraction = 1.0;
    }

    deduped
}

/// Depth at `minutes` into a dive lasting `total_minutes`, linearly
/// interpolated over a normalized profile.
pub fn depth_at(minutes: f32, total_minutes: f32, profile: &[ProfilePoint]) -> f32 {
    let total = if total_minutes > 0.0 { total_minutes } else { 1.0 };
    let t = (minutes / total).clamp(0.0, 1.0);

    for pair in profile.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t >= a.time_fraction && t <= b.time_fraction {
            let span = b.time_fraction - a.time_fraction;
            let span = if span > 0.0 { span } else { 1.0 };
            let mix = (t - a.time_fraction) / span;
            return a.depth + (b.depth - a.depth) * mix;
        }
    }

    profile.last().map_or(0.0, |point| point.depth)
}

pub fn max_depth(profile: &[ProfilePoint]) -> f32 {
    profile.iter().fold(0.0, |max, point| f32::max(max, point.depth))
}

/// Time fraction of the last point deeper than `threshold`, if any.
pub fn last_submerged_fraction(profile: &[ProfilePoint], threshold: f32) -> Option<f32> {
    profile
        .iter()
        .rev()
        .find(|point| point.depth > threshold)
        .map(|point| point.time_fraction)
}

#[test]
fn test_normalize_empty_profile_is_flat() {
    let flat = normalize(Vec::<ProfilePoint>::new());
    assert_eq!(flat, vec![ProfilePoint::new(0.0, 0.0), ProfilePoint::new(1.0, 0.0)]);
}

#[test]
fn test_depth_at_midpoint() {
    let profile = normalize([ProfilePoint::new(0.0, 0.0), ProfilePoint::new(1.0, 20.0)]);
    assert_eq!(depth_at(5.0, 10.0, &profile), 10.0);
    assert_eq!(depth_at(50.0, 10.0, &profile), 20.0);
}
