use defmt::Format;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the gradient factor moves from GF low to GF high over the dive.
#[derive(Debug, Format, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GfBlending {
    /// Keyed on the share of the deepest ambient pressure already recovered:
    /// GF low at the deepest point, GF high at the surface.
    #[default]
    AmbientPressure,
    /// Keyed on elapsed dive time: GF low at the start, GF high at the end.
    ElapsedTime,
}

/// Inputs the blending strategies may key on for one instant.
#[derive(Debug, Format, Clone, Copy, PartialEq)]
pub struct GfContext {
    pub ambient: f32,
    pub max_ambient: f32,
    pub time: f32,
    pub total_minutes: f32,
}

impl GfBlending {
    /// Position between GF low (0) and GF high (1).
    pub fn fraction(&self, context: &GfContext) -> f32 {
        let fraction = match self {
            GfBlending::AmbientPressure => {
                let range = context.max_ambient - crate::SURFACE_PRESSURE;
                if range > 0.0 {
                    (context.max_ambient - context.ambient) / range
                } else {
                    // never left the surface
                    1.0
                }
            }
            GfBlending::ElapsedTime => {
                if context.total_minutes > 0.0 {
                    context.time / context.total_minutes
                } else {
                    1.0
                }
            }
        };
        fraction.clamp(0.0, 1.0)
    }

    pub fn gradient_factor(&self, gf_low: f32, gf_high: f32, context: &GfContext) -> f32 {
        let (low, high) = ordered(gf_low, gf_high);
        low + (high - low) * self.fraction(context)
    }
}

/// `(min, max)` of a GF pair, so entry order never matters.
pub fn ordered(gf_low: f32, gf_high: f32) -> (f32, f32) {
    (f32::min(gf_low, gf_high), f32::max(gf_low, gf_high))
}

#[test]
fn test_ambient_blending_endpoints() {
    let at_depth = GfContext { ambient: 4.0, max_ambient: 4.0, time: 20.0, total_minutes: 40.0 };
    let at_surface = GfContext { ambient: 1.0, ..at_depth };
    let blending = GfBlending::AmbientPressure;
    assert_eq!(blending.gradient_factor(0.3, 0.85, &at_depth), 0.3);
    assert!(libm::fabsf(blending.gradient_factor(0.85, 0.3, &at_surface) - 0.85) < 1e-6);
}
