#[cfg(feature = "serde")]
use alloc::string::String;
use alloc::vec::Vec;
use defmt::Format;
use libm::{ceilf, roundf};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ceiling::{ceiling_meters, CLEAR_CEILING};
use crate::gradient::{ordered, GfBlending, GfContext};
use crate::profile::{depth_at, last_submerged_fraction, max_depth, normalize, ProfilePoint, SURFACE_DEPTH};
use crate::tissue::TissueModel;
use crate::zh16c::{ModelConfig, COMPARTMENT_COUNT};
use crate::{ambient_pressure, inspired_n2, MIN_STEP_SECONDS, SURFACE_PRESSURE};

#[derive(Debug, Format, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulationInput {
    pub points: Vec<ProfilePoint>,
    pub total_minutes: f32, // > 0
    pub step_seconds: f32,  // floored at 5 s
    pub gf_low: f32,        // 0 <= x <= 1
    pub gf_high: f32,       // 0 <= x <= 1
    #[cfg_attr(feature = "serde", serde(default))]
    pub blending: GfBlending,
}

impl SimulationInput {
    pub fn step_minutes(&self) -> f32 {
        f32::max(MIN_STEP_SECONDS, self.step_seconds) / 60.0
    }
}

/// State of the dive at one simulation step.
#[derive(Debug, Format, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimelineSample {
    pub time: f32,  // min
    pub depth: f32, // m
    pub tissues: [f32; COMPARTMENT_COUNT], // bar, N2 per compartment
    pub ceiling: f32, // m
    /// Highest tissue load scaled between the surface and deepest-point
    /// inspired pressures. Display only.
    pub saturation: f32,
    pub gradient_factor: f32,
    pub controlling: Option<usize>,
}

impl TimelineSample {
    /// Each compartment's load relative to what is currently inspired.
    pub fn tissue_saturation(&self, config: &ModelConfig) -> [f32; COMPARTMENT_COUNT] {
        let inspired = f32::max(inspired_n2(config, ambient_pressure(self.depth)), 0.0001);
        self.tissues.map(|pressure| pressure / inspired)
    }

    pub fn in_deco(&self) -> bool {
        self.ceiling > CLEAR_CEILING
    }
}

#[derive(Debug, Format, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Timeline {
    pub samples: Vec<TimelineSample>,
    pub step_minutes: f32,
    pub total_minutes: f32,
}

impl Timeline {
    /// Sample nearest to `minutes`, clamped to the end of the dive.
    pub fn sample_at(&self, minutes: f32) -> Option<&TimelineSample> {
        let last = self.samples.len().checked_sub(1)?;
        let index = roundf(f32::max(0.0, minutes) / self.step_minutes) as usize;
        self.samples.get(index.min(last))
    }

    pub fn deepest_ceiling(&self) -> f32 {
        self.samples.iter().fold(0.0, |max, sample| f32::max(max, sample.ceiling))
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Step both tissue models across the profile and record one sample per step.
///
/// The live model follows the whole profile and feeds the reported tissue
/// loads. The ceiling model stops loading once the diver has left the last
/// submerged point, so the obligation computed for the ascent is the one
/// accumulated during the working phase.
pub fn simulate(input: &SimulationInput, config: &ModelConfig) -> Timeline {
    let profile = normalize(input.points.iter().copied());
    let total_minutes = input.total_minutes;
    let step_minutes = input.step_minutes();
    let steps = ceilf(total_minutes / step_minutes) as usize;
    let (gf_low, gf_high) = ordered(input.gf_low, input.gf_high);

    let mut live_model = TissueModel::new(*config);
    let mut ceiling_model = TissueModel::new(*config);

    let last_submerged_time = last_submerged_fraction(&profile, SURFACE_DEPTH)
        .map_or(0.0, |fraction| fraction * total_minutes);
    let max_ambient = ambient_pressure(max_depth(&profile));
    let surface_inspired = inspired_n2(config, SURFACE_PRESSURE);
    let saturation_range = inspired_n2(config, max_ambient) - surface_inspired;

    defmt::debug!(
        "simulate: {} steps of {} min, gf {}/{}",
        steps,
        step_minutes,
        gf_low,
        gf_high
    );

    let mut samples = Vec::with_capacity(steps + 1);
    for i in 0..=steps {
        let time = i as f32 * step_minutes;
        let depth = depth_at(time, total_minutes, &profile);
        let ambient = live_model.update_segment(depth, step_minutes);
        if time <= last_submerged_time + step_minutes / 2.0 {
            ceiling_model.update_segment(depth, step_minutes);
        }

        let context = GfContext {
            ambient,
            max_ambient,
            time,
            total_minutes,
        };
        let gradient_factor = input.blending.gradient_factor(gf_low, gf_high, &context);
        let ceiling = ceiling_model.ceiling(gradient_factor);

        let tissues = live_model.tissues();
        let highest = tissues.iter().fold(0.0, |max, &pressure| f32::max(max, pressure));
        let saturation = if saturation_range > 0.0 {
            ((highest - surface_inspired) / saturation_range).clamp(0.0, 1.0)
        } else {
            0.0
        };

        samples.push(TimelineSample {
            time,
            depth,
            tissues,
            ceiling: ceiling_meters(ceiling.ambient),
            saturation,
            gradient_factor,
            controlling: ceiling.controlling,
        });
    }

    defmt::debug!("simulate: {} samples", samples.len());

    Timeline {
        samples,
        step_minutes,
        total_minutes,
    }
}
