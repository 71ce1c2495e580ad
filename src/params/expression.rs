//! Pointer-to-expression mapping.

/// Mapping from the normalized pointer position to pitch bend and volume
#[derive(Debug, Clone)]
pub struct ExpressionMapping {
    /// Exponent scale applied to the vertical shift (octaves per unit shift)
    /// Formula: pitch_factor = 2^(((y - 0.5) * 2) * this_scale)
    /// 0.5 gives ±half an octave at the edges, one octave across the range
    pub bend_octaves_per_shift: f64,

    /// Volume at the left edge (linear gain)
    /// Formula: volume = volume_floor + x * volume_span
    pub volume_floor: f64,

    /// Volume added across the full horizontal range (linear gain)
    pub volume_span: f64,
}

impl Default for ExpressionMapping {
    fn default() -> Self {
        Self {
            bend_octaves_per_shift: 0.5,
            volume_floor: 0.1,
            volume_span: 0.4,
        }
    }
}
