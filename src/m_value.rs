use crate::zh16c::Compartment;

/// Maximum tolerated tissue pressure at `amb_pressure` (Bühlmann M-line,
/// M = a + P_amb / b).
pub fn calculate_m_value(compartment: &Compartment, amb_pressure: f32) -> f32 {
    amb_pressure / compartment.b + compartment.a
}

/// Same line shrunk toward the ambient line by a gradient factor.
pub fn gf_m_value(compartment: &Compartment, amb_pressure: f32, gradient_factor: f32) -> f32 {
    amb_pressure + gradient_factor * (calculate_m_value(compartment, amb_pressure) - amb_pressure)
}

/// Lowest ambient pressure at which `tissue_pressure` stays on or under the
/// GF-scaled M-line. `None` when the slope degenerates.
pub fn allowed_ambient(compartment: &Compartment, tissue_pressure: f32, gradient_factor: f32) -> Option<f32> {
    let denominator = gradient_factor / compartment.b + (1.0 - gradient_factor);
    if denominator <= 0.0 {
        return None;
    }
    Some((tissue_pressure - gradient_factor * compartment.a) / denominator)
}
