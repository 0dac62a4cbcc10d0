use defmt::Format;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const COMPARTMENT_COUNT: usize = 16;

/// One Bühlmann tissue compartment for nitrogen.
#[derive(Debug, Format, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Compartment {
    pub half_time: f32, // minutes
    pub a: f32,         // bar
    pub b: f32,         // dimensionless
}

impl Compartment {
    pub const fn new(half_time: f32, a: f32, b: f32) -> Self {
        Compartment { half_time, a, b }
    }

    /// Exponential rate constant k = ln(2) / half-time, per minute.
    pub fn rate(&self) -> f32 {
        core::f32::consts::LN_2 / self.half_time
    }
}

pub type CompartmentTable = [Compartment; COMPARTMENT_COUNT];

// ZH-L16C nitrogen coefficients, compartment 1a (4 min) variant.
pub const ZHL16C: CompartmentTable = [
    Compartment::new(4.0, 1.2599, 0.5050),
    Compartment::new(8.0, 1.0000, 0.6514),
    Compartment::new(12.5, 0.8618, 0.7222),
    Compartment::new(18.5, 0.7562, 0.7825),
    Compartment::new(27.0, 0.6200, 0.8126),
    Compartment::new(38.3, 0.5043, 0.8434),
    Compartment::new(54.3, 0.4410, 0.8693),
    Compartment::new(77.0, 0.4000, 0.8910),
    Compartment::new(109.0, 0.3750, 0.9092),
    Compartment::new(146.0, 0.3500, 0.9222),
    Compartment::new(187.0, 0.3295, 0.9319),
    Compartment::new(239.0, 0.3065, 0.9403),
    Compartment::new(305.0, 0.2835, 0.9477),
    Compartment::new(390.0, 0.2610, 0.9544),
    Compartment::new(498.0, 0.2480, 0.9602),
    Compartment::new(635.0, 0.2327, 0.9653),
];

// ZH-L16A coefficients. Less conservative in the middle compartments.
pub const ZHL16A: CompartmentTable = [
    Compartment::new(4.0, 1.2599, 0.5050),
    Compartment::new(8.0, 1.0000, 0.6514),
    Compartment::new(12.5, 0.8618, 0.7222),
    Compartment::new(18.5, 0.7562, 0.7825),
    Compartment::new(27.0, 0.6667, 0.8125),
    Compartment::new(38.3, 0.5933, 0.8434),
    Compartment::new(54.3, 0.5282, 0.8693),
    Compartment::new(77.0, 0.4701, 0.8910),
    Compartment::new(109.0, 0.4187, 0.9092),
    Compartment::new(146.0, 0.3798, 0.9222),
    Compartment::new(187.0, 0.3497, 0.9319),
    Compartment::new(239.0, 0.3223, 0.9403),
    Compartment::new(305.0, 0.2971, 0.9477),
    Compartment::new(390.0, 0.2737, 0.9544),
    Compartment::new(498.0, 0.2523, 0.9602),
    Compartment::new(635.0, 0.2327, 0.9653),
];

/// Immutable model configuration: compartment coefficients plus the breathing
/// gas and alveolar constants. Passed by value into every model instance.
#[derive(Debug, Format, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModelConfig {
    pub compartments: CompartmentTable,
    pub n2_fraction: f32,
    pub water_vapor_pressure: f32, // bar, alveolar at 37 deg C
}

impl ModelConfig {
    pub const fn air() -> Self {
        ModelConfig {
            compartments: ZHL16C,
            n2_fraction: crate::FN2,
            water_vapor_pressure: crate::WATER_VAPOR_PRESSURE,
        }
    }

    pub const fn with_compartments(mut self, compartments: CompartmentTable) -> Self {
        self.compartments = compartments;
        self
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::air()
    }
}

#[test]
fn test_half_times_ascending() {
    for table in [ZHL16C, ZHL16A] {
        for pair in table.windows(2) {
            assert!(pair[0].half_time < pair[1].half_time);
        }
        for compartment in table.iter() {
            assert!(compartment.a > 0.0);
            assert!(compartment.b > 0.0 && compartment.b < 1.0);
        }
    }
}
