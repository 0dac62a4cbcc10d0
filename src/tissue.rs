use defmt::Format;
use libm::expf;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ceiling::{max_ceiling, stop_depth, Ceiling};
use crate::zh16c::{Compartment, ModelConfig, COMPARTMENT_COUNT};
use crate::{ambient_pressure, inspired_n2, SURFACE_PRESSURE};

#[derive(Default, Clone, Copy, Debug, Format, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tissue {
    pub load_n2: f32, // bar
}

// Closed form of dP/dt = k * (p_insp - P) over a constant-depth interval:
// P(t) = p_insp + (P0 - p_insp) * e^(-kt), k = ln2 / half-time.
// Uptake and offgassing are the same expression.
pub fn calculate_tissue(
    mut tissue: Tissue,
    compartment: &Compartment,
    inspired: f32,
    minutes: f32,
) -> Tissue {
    let decay = expf(-compartment.rate() * minutes);
    tissue.load_n2 = inspired + (tissue.load_n2 - inspired) * decay;
    tissue
}

/// Sixteen compartment nitrogen model. Starts in equilibrium with air at the
/// surface.
#[derive(Debug, Format, Clone, PartialEq)]
pub struct TissueModel {
    config: ModelConfig,
    tissues: [Tissue; COMPARTMENT_COUNT],
}

impl TissueModel {
    pub fn new(config: ModelConfig) -> Self {
        let surface = Tissue {
            load_n2: inspired_n2(&config, SURFACE_PRESSURE),
        };
        TissueModel {
            config,
            tissues: [surface; COMPARTMENT_COUNT],
        }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Hold `depth_meters` for `minutes`. Returns the ambient pressure used.
    pub fn update_segment(&mut self, depth_meters: f32, minutes: f32) -> f32 {
        let ambient = ambient_pressure(depth_meters);
        let inspired = inspired_n2(&self.config, ambient);
        for (tissue, compartment) in self.tissues.iter_mut().zip(self.config.compartments.iter()) {
            *tissue = calculate_tissue(*tissue, compartment, inspired, minutes);
        }
        ambient
    }

    pub fn tissues(&self) -> [f32; COMPARTMENT_COUNT] {
        self.tissues.map(|tissue| tissue.load_n2)
    }

    pub fn ceiling(&self, gradient_factor: f32) -> Ceiling {
        max_ceiling(&self.config, &self.tissues, gradient_factor)
    }

    /// Ceiling as ambient pressure in bar, never shallower than the surface.
    pub fn ceiling_ambient(&self, gradient_factor: f32) -> f32 {
        self.ceiling(gradient_factor).ambient
    }

    pub fn stop_depth(ceiling_meters: f32) -> Option<u32> {
        stop_depth(ceiling_meters)
    }
}

impl Default for TissueModel {
    fn default() -> Self {
        Self::new(ModelConfig::default())
    }
}

#[test]
fn test_calculate_tissue_one_half_time() {
    let compartment = Compartment::new(4.0, 1.2599, 0.5050);
    let tissue = Tissue { load_n2: 1.0 };
    let result = calculate_tissue(tissue, &compartment, 3.0, 4.0);
    assert!(libm::fabsf(result.load_n2 - 2.0) < 1e-5);
}
