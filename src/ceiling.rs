use defmt::Format;
use libm::ceilf;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::m_value::allowed_ambient;
use crate::tissue::Tissue;
use crate::zh16c::{ModelConfig, COMPARTMENT_COUNT};
use crate::{depth_from_ambient, SURFACE_PRESSURE};

/// Stops are only taken on this grid.
pub const STOP_INCREMENT: f32 = 3.0; // m
/// Ceilings at or above this depth need no stop.
pub const CLEAR_CEILING: f32 = 0.1; // m

#[derive(Debug, Format, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ceiling {
    pub ambient: f32, // bar, >= SURFACE_PRESSURE
    /// Compartment that sets the ceiling. `None` when no compartment is above
    /// the surface floor.
    pub controlling: Option<usize>,
}

impl Ceiling {
    pub fn meters(&self) -> f32 {
        ceiling_meters(self.ambient)
    }
}

pub fn ceiling_meters(ceiling_ambient: f32) -> f32 {
    f32::max(0.0, depth_from_ambient(ceiling_ambient))
}

#[inline(never)]
pub fn max_ceiling(config: &ModelConfig, tissues: &[Tissue; COMPARTMENT_COUNT], gradient_factor: f32) -> Ceiling {
    let mut ceiling = Ceiling {
        ambient: SURFACE_PRESSURE,
        controlling: None,
    };
    for (i, (tissue, compartment)) in tissues.iter().zip(config.compartments.iter()).enumerate() {
        let Some(ambient) = allowed_ambient(compartment, tissue.load_n2, gradient_factor) else {
            continue;
        };
        if ambient > ceiling.ambient {
            ceiling = Ceiling {
                ambient,
                controlling: Some(i),
            };
        }
    }
    ceiling
}

/// Round a ceiling up to the next stop on the 3 m grid.
pub fn stop_depth(ceiling_meters: f32) -> Option<u32> {
    if !(ceiling_meters > CLEAR_CEILING) {
        return None;
    }
    Some((ceilf(ceiling_meters / STOP_INCREMENT) * STOP_INCREMENT) as u32)
}

#[test]
pub fn rounding_test() {
    assert_eq!(stop_depth(14.2412), Some(15));
    assert_eq!(stop_depth(11.12), Some(12));
    assert_eq!(stop_depth(12.0), Some(12));
    assert_eq!(stop_depth(0.1), None);
    assert_eq!(stop_depth(0.11), Some(3));
}
