use alloc::vec::Vec;
use defmt::Format;
use libm::{ceilf, roundf};

use crate::profile::{ProfilePoint, SURFACE_DEPTH};
use crate::{MAX_TOTAL_MINUTES, MIN_STEP_SECONDS};

/// Hand drawn profile held on the simulation step grid.
///
/// Index `i` holds the point at time fraction `i / steps`, or nothing if the
/// user never drew there. `active_points` is what the normalizer consumes.
#[derive(Debug, Format, Clone, PartialEq)]
pub struct ProfileSketch {
    points: Vec<Option<ProfilePoint>>,
    last_point: Option<ProfilePoint>,
    total_minutes: f32,
    step_seconds: f32,
}

impl ProfileSketch {
    /// A flat surface profile.
    pub fn new(total_minutes: f32, step_seconds: f32) -> Self {
        let mut sketch = ProfileSketch {
            points: Vec::new(),
            last_point: None,
            total_minutes,
            step_seconds: f32::max(MIN_STEP_SECONDS, step_seconds),
        };
        sketch.set_flat();
        sketch
    }

    pub fn total_minutes(&self) -> f32 {
        self.total_minutes
    }

    /// Grid size, bounded by the longest accepted dive.
    pub fn step_count(&self) -> usize {
        let minutes = f32::min(self.total_minutes, MAX_TOTAL_MINUTES);
        let steps = ceilf(minutes * 60.0 / self.step_seconds);
        if steps >= 1.0 { steps as usize } else { 1 }
    }

    /// Snap a point onto the grid. Returns its index and the snapped point.
    pub fn quantize(&self, point: ProfilePoint) -> (usize, ProfilePoint) {
        let steps = self.step_count();
        let index = roundf(point.time_fraction * steps as f32).clamp(0.0, steps as f32) as usize;
        (index, ProfilePoint::new(index as f32 / steps as f32, point.depth))
    }

    pub fn points(&self) -> &[Option<ProfilePoint>] {
        &self.points
    }

    pub fn active_points(&self) -> Vec<ProfilePoint> {
        self.points.iter().flatten().copied().collect()
    }

    pub fn set_flat(&mut self) {
        let steps = self.step_count();
        self.points = (0..=steps)
            .map(|i| Some(ProfilePoint::new(i as f32 / steps as f32, 0.0)))
            .collect();
        self.last_point = None;
    }

    pub fn clear(&mut self) {
        self.set_flat();
    }

    pub fn add_point(&mut self, point: ProfilePoint) {
        let (index, snapped) = self.quantize(point);
        if self.points.len() <= index {
            self.points.resize(index + 1, None);
        }
        self.points[index] = Some(snapped);
        self.last_point = Some(snapped);
    }

    /// Continue the current stroke to `point`, filling every grid slot in
    /// between by linear interpolation. Starts a new stroke if none is open.
    pub fn stroke_to(&mut self, point: ProfilePoint) {
        let Some(from) = self.last_point else {
            self.add_point(point);
            return;
        };
        let (from_index, from) = self.quantize(from);
        let (to_index, to) = self.quantize(point);
        let start = from_index.min(to_index);
        let end = from_index.max(to_index);
        let span = usize::max(1, end - start) as f32;
        let steps = self.step_count() as f32;
        if self.points.len() <= end {
            self.points.resize(end + 1, None);
        }
        // interpolate from the lower index, as the stroke may run backwards in time
        let (start_depth, end_depth) = if from_index <= to_index {
            (from.depth, to.depth)
        } else {
            (to.depth, from.depth)
        };
        for index in start..=end {
            let mix = (index - start) as f32 / span;
            let depth = start_depth + (end_depth - start_depth) * mix;
            self.points[index] = Some(ProfilePoint::new(index as f32 / steps, depth));
        }
        self.last_point = Some(to);
    }

    pub fn end_stroke(&mut self) {
        self.last_point = None;
    }

    /// Drawn point closest to `time_fraction`, searching outward from its grid
    /// slot and preferring the earlier side on ties.
    pub fn nearest_point(&self, time_fraction: f32) -> Option<(usize, ProfilePoint)> {
        let (index, _) = self.quantize(ProfilePoint::new(time_fraction, 0.0));
        if let Some(Some(point)) = self.points.get(index) {
            return Some((index, *point));
        }
        for offset in 1..self.points.len() {
            if let Some(left) = index.checked_sub(offset) {
                if let Some(Some(point)) = self.points.get(left) {
                    return Some((left, *point));
                }
            }
            let right = index + offset;
            if let Some(Some(point)) = self.points.get(right) {
                return Some((right, *point));
            }
        }
        None
    }

    /// Change the dive length, keeping every drawn point at its absolute time.
    ///
    /// Points beyond the new end are dropped. Lengthening a profile that ended
    /// at the surface keeps the diver at the surface for the added time.
    pub fn retime(&mut self, total_minutes: f32) {
        let old_total = self.total_minutes;
        let timed: Vec<(f32, f32)> = self
            .active_points()
            .iter()
            .map(|point| (point.time_fraction * old_total, point.depth))
            .collect();

        self.total_minutes = total_minutes;
        self.points = Vec::new();
        self.last_point = None;
        if timed.is_empty() {
            self.set_flat();
            return;
        }

        for &(time, depth) in timed.iter() {
            if time > total_minutes {
                continue;
            }
            let time_fraction = if total_minutes > 0.0 { time / total_minutes } else { 0.0 };
            self.add_point(ProfilePoint::new(time_fraction, depth));
        }
        if total_minutes > old_total {
            let ended_at_surface = timed
                .last()
                .is_none_or(|&(_, depth)| depth <= SURFACE_DEPTH);
            if ended_at_surface {
                self.add_point(ProfilePoint::new(1.0, 0.0));
            }
        }
        if self.active_points().is_empty() {
            self.set_flat();
        }
        self.last_point = None;
    }
}

#[test]
fn test_flat_sketch_covers_grid() {
    let sketch = ProfileSketch::new(40.0, 60.0);
    assert_eq!(sketch.step_count(), 40);
    assert_eq!(sketch.points().len(), 41);
    assert!(sketch.active_points().iter().all(|point| point.depth == 0.0));
    assert_eq!(sketch.points()[0].map(|point| point.time_fraction), Some(0.0));
    assert_eq!(sketch.points()[40].map(|point| point.time_fraction), Some(1.0));
}
