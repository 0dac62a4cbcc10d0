#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use defmt::Format;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod ceiling;
pub mod gradient;
pub mod m_value;
pub mod profile;
pub mod simulate;
pub mod sketch;
pub mod stops;
pub mod tissue;
pub mod zh16c;

use crate::profile::ProfilePoint;
use crate::simulate::{simulate, SimulationInput, Timeline};
use crate::stops::{build_stops, Stop};
use crate::zh16c::ModelConfig;

pub const FN2: f32 = 0.79;
pub const WATER_VAPOR_PRESSURE: f32 = 0.0627; // bar, 47 mmHg
pub const SURFACE_PRESSURE: f32 = 1.0; // bar
pub const METERS_PER_BAR: f32 = 10.0;

pub const MIN_TOTAL_MINUTES: f32 = 5.0;
pub const MAX_TOTAL_MINUTES: f32 = 180.0;
pub const MIN_MAX_DEPTH: f32 = 6.0;
pub const MAX_MAX_DEPTH: f32 = 60.0;
pub const MIN_STEP_SECONDS: f32 = 5.0;

pub fn ambient_pressure(depth_meters: f32) -> f32 {
    SURFACE_PRESSURE + depth_meters / METERS_PER_BAR
}

pub fn depth_from_ambient(ambient: f32) -> f32 {
    (ambient - SURFACE_PRESSURE) * METERS_PER_BAR
}

/// Nitrogen partial pressure available for exchange in the alveoli at the given
/// ambient pressure.
pub fn inspired_n2(config: &ModelConfig, ambient_pressure: f32) -> f32 {
    f32::max(0.0, (ambient_pressure - config.water_vapor_pressure) * config.n2_fraction)
}

#[derive(Debug, Format, Clone, Copy, PartialEq)]
pub enum ConfigField {
    TotalMinutes,
    MaxDepth,
    StepSeconds,
    GradientFactors,
}

#[derive(Debug, Format, Clone, Copy, PartialEq)]
pub enum ConfigReason {
    NotFinite,
    OutOfRange,
    GfOrder, // GF low above GF high
}

#[derive(Debug, Format, Clone, Copy, PartialEq)]
pub struct ConfigError {
    pub field: ConfigField,
    pub reason: ConfigReason,
}

impl ConfigError {
    pub fn new(field: ConfigField, reason: ConfigReason) -> Self {
        Self { field, reason }
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let reason = match self.reason {
            ConfigReason::NotFinite => "is not a finite number",
            ConfigReason::OutOfRange => "is out of range",
            ConfigReason::GfOrder => "has GF low above GF high",
        };
        write!(f, "{:?} {}", self.field, reason)
    }
}

/// User facing planner settings, as entered: gradient factors in percent.
#[derive(Debug, Format, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DiveParameters {
    pub total_minutes: f32,
    pub max_depth: f32,     // m, drawing surface scale
    pub step_seconds: f32,  // s
    pub gf_low: f32,        // 0 <= x <= 100
    pub gf_high: f32,       // 0 <= x <= 100
}

impl DiveParameters {
    pub fn new(gf_low: f32, gf_high: f32) -> Self {
        DiveParameters {
            gf_low,
            gf_high,
            ..Default::default()
        }
    }

    /// Clamp every field into its accepted range, falling back to the default
    /// for values that are not usable at all.
    pub fn sanitize(self) -> Self {
        let defaults = Self::default();
        let total_minutes =
            or_default(self.total_minutes, defaults.total_minutes).clamp(MIN_TOTAL_MINUTES, MAX_TOTAL_MINUTES);
        let max_depth = or_default(self.max_depth, defaults.max_depth).clamp(MIN_MAX_DEPTH, MAX_MAX_DEPTH);
        let step_seconds = if self.step_seconds.is_finite() {
            f32::max(MIN_STEP_SECONDS, self.step_seconds)
        } else {
            defaults.step_seconds
        };
        let gf_low = if self.gf_low.is_finite() { self.gf_low.clamp(0.0, 100.0) } else { defaults.gf_low };
        let gf_high = if self.gf_high.is_finite() { self.gf_high.clamp(0.0, 100.0) } else { defaults.gf_high };

        DiveParameters {
            total_minutes,
            max_depth,
            step_seconds,
            gf_low: f32::min(gf_low, gf_high),
            gf_high: f32::max(gf_low, gf_high),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range(self.total_minutes, MIN_TOTAL_MINUTES, MAX_TOTAL_MINUTES, ConfigField::TotalMinutes)?;
        check_range(self.max_depth, MIN_MAX_DEPTH, MAX_MAX_DEPTH, ConfigField::MaxDepth)?;
        check_range(self.step_seconds, MIN_STEP_SECONDS, f32::MAX, ConfigField::StepSeconds)?;
        check_range(self.gf_low, 0.0, 100.0, ConfigField::GradientFactors)?;
        check_range(self.gf_high, 0.0, 100.0, ConfigField::GradientFactors)?;
        if self.gf_low > self.gf_high {
            return Err(ConfigError::new(ConfigField::GradientFactors, ConfigReason::GfOrder));
        }
        Ok(())
    }

    pub fn simulation_input(&self, points: Vec<ProfilePoint>) -> SimulationInput {
        SimulationInput {
            points,
            total_minutes: self.total_minutes,
            step_seconds: self.step_seconds,
            gf_low: self.gf_low / 100.0,
            gf_high: self.gf_high / 100.0,
            blending: Default::default(),
        }
    }
}

impl Default for DiveParameters {
    fn default() -> Self {
        DiveParameters {
            total_minutes: 40.0,
            max_depth: 30.0,
            step_seconds: 60.0,
            gf_low: 30.0,
            gf_high: 85.0,
        }
    }
}

// Empty (zero) or non-numeric entries fall back; anything else is clamped.
fn or_default(value: f32, default: f32) -> f32 {
    if value.is_finite() && value != 0.0 { value } else { default }
}

fn check_range(value: f32, min: f32, max: f32, field: ConfigField) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::new(field, ConfigReason::NotFinite));
    }
    if value < min || value > max {
        return Err(ConfigError::new(field, ConfigReason::OutOfRange));
    }
    Ok(())
}

/// Everything the rendering layer needs after a profile or settings change.
#[derive(Debug, Format, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DivePlan {
    pub timeline: Timeline,
    pub stops: Vec<Stop>,
}

/// Recompute the whole plan from scratch. Settings are sanitized first so any
/// user input yields a well formed plan.
pub fn plan_dive(parameters: &DiveParameters, points: Vec<ProfilePoint>, config: &ModelConfig) -> DivePlan {
    let parameters = parameters.sanitize();
    let timeline = simulate(&parameters.simulation_input(points), config);
    let stops = build_stops(&timeline.samples);
    defmt::debug!("plan: {} samples, {} stops", timeline.samples.len(), stops.len());
    DivePlan { timeline, stops }
}

#[test]
fn test_inspired_n2_at_surface() {
    let config = ModelConfig::default();
    let inspired = inspired_n2(&config, 1.0);
    assert!(libm::fabsf(inspired - 0.740_467) < 1e-5);
    assert_eq!(inspired_n2(&config, 0.0), 0.0);
}

#[test]
fn test_sanitize_swaps_inverted_gradient_factors() {
    let params = DiveParameters::new(90.0, 40.0).sanitize();
    assert_eq!(params.gf_low, 40.0);
    assert_eq!(params.gf_high, 90.0);
    assert!(params.validate().is_ok());
}
