use alloc::vec::Vec;
use defmt::Format;
use libm::fabsf;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ceiling::stop_depth;
use crate::simulate::TimelineSample;

/// How close to the deepest sample counts as "on the bottom".
pub const BOTTOM_TOLERANCE: f32 = 0.05; // m
/// Rise above the deepest point that marks the start of the ascent.
pub const ASCENT_MARGIN: f32 = 0.1; // m

#[derive(Debug, Format, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Stop {
    pub depth: u32,       // m, multiple of 3
    pub start_time: f32,  // min
    pub end_time: f32,    // min
    pub duration: f32,    // min
}

/// Index of the first sample of the ascent: the first sample shallower than
/// the deepest point after the diver first reached it.
pub fn ascent_start(samples: &[TimelineSample]) -> Option<usize> {
    let max_depth = samples.iter().fold(0.0, |max, sample| f32::max(max, sample.depth));
    let threshold = f32::max(ASCENT_MARGIN, max_depth - ASCENT_MARGIN);
    let bottom = samples
        .iter()
        .position(|sample| fabsf(sample.depth - max_depth) <= BOTTOM_TOLERANCE)?;
    samples[bottom..]
        .iter()
        .position(|sample| sample.depth < threshold)
        .map(|offset| bottom + offset)
}

/// Derive decompression stops from the ascent part of a timeline, using the
/// default phase detection and 3 m round-up policy.
pub fn build_stops(samples: &[TimelineSample]) -> Vec<Stop> {
    build_stops_with(samples, ascent_start, stop_depth)
}

/// Like [`build_stops`] with the ascent detection and stop rounding supplied
/// by the caller.
///
/// Each pair of consecutive samples is a slice whose stop depth comes from the
/// earlier sample's ceiling. A slice deeper than the last recorded stop is
/// dropped: once a shallower stop is scheduled the diver never goes back down.
pub fn build_stops_with(
    samples: &[TimelineSample],
    ascent_start: fn(&[TimelineSample]) -> Option<usize>,
    stop_depth: fn(f32) -> Option<u32>,
) -> Vec<Stop> {
    let mut stops: Vec<Stop> = Vec::new();
    if samples.len() < 2 {
        return stops;
    }
    let Some(start) = ascent_start(samples) else {
        return stops;
    };

    for pair in samples[start..].windows(2) {
        let (sample, next) = (&pair[0], &pair[1]);
        let duration = next.time - sample.time;
        let Some(depth) = stop_depth(sample.ceiling) else {
            continue;
        };
        if !(duration > 0.0) {
            continue;
        }

        match stops.last_mut() {
            Some(last) if depth > last.depth => {
                defmt::trace!("stops: dropping {}m slice at {} min below {}m stop", depth, sample.time, last.depth);
            }
            Some(last) if depth == last.depth => {
                last.end_time = next.time;
                last.duration += duration;
            }
            _ => {
                defmt::trace!("stops: {}m from {} min", depth, sample.time);
                stops.push(Stop {
                    depth,
                    start_time: sample.time,
                    end_time: next.time,
                    duration,
                });
            }
        }
    }

    stops
}

pub fn total_stop_time(stops: &[Stop]) -> f32 {
    stops.iter().map(|stop| stop.duration).sum()
}
