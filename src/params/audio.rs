//! Tone synthesis configuration.

/// Synthesis parameters shared by every note voice
#[derive(Debug, Clone)]
pub struct SynthConfig {
    /// Gain applied to the summed voices before the limiter (linear)
    pub master_gain: f32,

    /// Time for a note to ramp from silence to its peak volume (seconds)
    pub note_attack_s: f32,

    /// Total note length; the voice stops at this time (seconds)
    pub note_duration_s: f32,

    /// Gain the exponential decay reaches at the end of a note (linear, > 0)
    pub decay_floor: f32,

    /// Hard clip applied to every output sample (±ceiling)
    pub limiter_ceiling: f32,

    /// Tone played once after the output stream starts
    pub test_tone: TestTone,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            master_gain: 0.7,
            note_attack_s: 0.05,
            note_duration_s: 1.0,
            decay_floor: 0.001,
            limiter_ceiling: 0.9,
            test_tone: TestTone::default(),
        }
    }
}

impl SynthConfig {
    /// Validate configuration (positive times, attack shorter than the note)
    pub fn validate(&self) -> Result<(), String> {
        if self.note_attack_s <= 0.0 || self.note_duration_s <= 0.0 {
            return Err("Note attack and duration must be > 0".to_string());
        }
        if self.note_attack_s >= self.note_duration_s {
            return Err(format!(
                "Note attack ({}s) must be shorter than the note ({}s)",
                self.note_attack_s, self.note_duration_s
            ));
        }
        if self.decay_floor <= 0.0 {
            return Err("Decay floor must be > 0 for an exponential ramp".to_string());
        }
        if self.limiter_ceiling <= 0.0 {
            return Err("Limiter ceiling must be > 0".to_string());
        }
        Ok(())
    }
}

/// Start-up test tone (pure sine)
#[derive(Debug, Clone)]
pub struct TestTone {
    /// Pitch (Hz)
    pub frequency_hz: f32,

    /// Peak gain reached at the end of the attack (linear)
    pub peak_volume: f32,

    /// Attack time (seconds)
    pub attack_s: f32,

    /// Total length (seconds)
    pub duration_s: f32,
}

impl Default for TestTone {
    fn default() -> Self {
        Self {
            frequency_hz: 440.0,
            peak_volume: 0.3,
            attack_s: 0.1,
            duration_s: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_synth_config_is_valid() {
        assert!(SynthConfig::default().validate().is_ok());
    }

    #[test]
    fn test_attack_longer_than_note_is_rejected() {
        let config = SynthConfig {
            note_attack_s: 2.0,
            ..SynthConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_decay_floor_is_rejected() {
        let config = SynthConfig {
            decay_floor: 0.0,
            ..SynthConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
