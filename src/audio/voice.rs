//! Single oscillator voice with an attack / exponential-decay envelope.

use std::f32::consts::PI;

use crate::notes::Waveform;
use crate::params::{SynthConfig, TestTone};

/// Everything needed to sound one tone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneRequest {
    /// Pitch after pointer bend (Hz)
    pub frequency_hz: f32,

    pub waveform: Waveform,

    /// Gain reached at the end of the attack (linear)
    pub peak_volume: f32,

    /// Linear ramp from silence to the peak (seconds)
    pub attack_s: f32,

    /// Time at which the voice stops (seconds)
    pub duration_s: f32,

    /// Gain the exponential decay reaches at `duration_s` (linear)
    pub decay_floor: f32,
}

impl ToneRequest {
    /// A note tone shaped by the synth config
    pub fn note(frequency_hz: f32, waveform: Waveform, volume: f32, config: &SynthConfig) -> Self {
        Self {
            frequency_hz,
            waveform,
            peak_volume: volume,
            attack_s: config.note_attack_s,
            duration_s: config.note_duration_s,
            decay_floor: config.decay_floor,
        }
    }

    /// The start-up sine tone
    pub fn test_tone(tone: &TestTone, config: &SynthConfig) -> Self {
        Self {
            frequency_hz: tone.frequency_hz,
            waveform: Waveform::Sine,
            peak_volume: tone.peak_volume,
            attack_s: tone.attack_s,
            duration_s: tone.duration_s,
            decay_floor: config.decay_floor,
        }
    }

    /// Envelope gain at `t` seconds after the tone starts
    ///
    /// Linear ramp 0 → peak over the attack, then an exponential ramp
    /// peak → decay_floor ending at the duration, silence afterwards.
    pub fn envelope(&self, t: f32) -> f32 {
        if t < 0.0 || t >= self.duration_s || self.peak_volume <= 0.0 {
            return 0.0;
        }
        if t < self.attack_s {
            return self.peak_volume * t / self.attack_s;
        }

        let decay_len = self.duration_s - self.attack_s;
        let progress = (t - self.attack_s) / decay_len;
        self.peak_volume * (self.decay_floor / self.peak_volume).powf(progress)
    }
}

/// Oscillator output for a phase in [0, 1), range [-1, 1]
pub fn oscillator(waveform: Waveform, phase: f32) -> f32 {
    match waveform {
        Waveform::Sine => (2.0 * PI * phase).sin(),
        // Rising ramp, zero crossing at the start of each cycle
        Waveform::Sawtooth => {
            let shifted = phase + 0.5;
            2.0 * (shifted - shifted.floor()) - 1.0
        }
    }
}

/// A tone being rendered sample by sample
#[derive(Debug, Clone)]
pub struct Voice {
    request: ToneRequest,
    sample_rate: f32,
    phase: f32,
    elapsed_samples: u64,
    total_samples: u64,
}

impl Voice {
    pub fn new(request: ToneRequest, sample_rate: u32) -> Self {
        let total_samples = (request.duration_s.max(0.0) * sample_rate as f32).ceil() as u64;
        Self {
            request,
            sample_rate: sample_rate as f32,
            phase: 0.0,
            elapsed_samples: 0,
            total_samples,
        }
    }

    /// Render the next sample and advance
    pub fn next_sample(&mut self) -> f32 {
        if self.is_finished() {
            return 0.0;
        }

        let t = self.elapsed_samples as f32 / self.sample_rate;
        let sample = oscillator(self.request.waveform, self.phase) * self.request.envelope(t);

        self.phase += self.request.frequency_hz / self.sample_rate;
        self.phase -= self.phase.floor();
        self.elapsed_samples += 1;

        sample
    }

    /// True once the tone has passed its stop time
    pub fn is_finished(&self) -> bool {
        self.elapsed_samples >= self.total_samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(waveform: Waveform) -> ToneRequest {
        ToneRequest::note(440.0, waveform, 0.5, &SynthConfig::default())
    }

    #[test]
    fn test_envelope_shape() {
        let tone = note(Waveform::Sine);

        assert_eq!(tone.envelope(0.0), 0.0);
        assert!((tone.envelope(0.025) - 0.25).abs() < 1e-6);
        assert!((tone.envelope(0.05) - 0.5).abs() < 1e-6);

        // Monotonic decay towards the floor
        assert!(tone.envelope(0.5) < tone.envelope(0.2));
        assert!((tone.envelope(0.999_99) - 0.001).abs() < 1e-4);

        // Silent after the stop time
        assert_eq!(tone.envelope(1.0), 0.0);
        assert_eq!(tone.envelope(3.0), 0.0);
    }

    #[test]
    fn test_test_tone_is_sine() {
        let config = SynthConfig::default();
        let tone = ToneRequest::test_tone(&config.test_tone, &config);
        assert_eq!(tone.waveform, Waveform::Sine);
        assert_eq!(tone.frequency_hz, 440.0);
        assert_eq!(tone.duration_s, 0.5);
    }

    #[test]
    fn test_sine_oscillator() {
        assert!(oscillator(Waveform::Sine, 0.0).abs() < 1e-6);
        assert!((oscillator(Waveform::Sine, 0.25) - 1.0).abs() < 1e-6);
        assert!((oscillator(Waveform::Sine, 0.75) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_sawtooth_oscillator() {
        assert!(oscillator(Waveform::Sawtooth, 0.0).abs() < 1e-6);
        assert!((oscillator(Waveform::Sawtooth, 0.25) - 0.5).abs() < 1e-6);
        // Jumps from +1 down to -1 halfway through the cycle
        assert!(oscillator(Waveform::Sawtooth, 0.499) > 0.99);
        assert!(oscillator(Waveform::Sawtooth, 0.5) < -0.99);
    }

    /// Sum of absolute second differences: large for waveforms with edges
    fn roughness(voice: &mut Voice, frames: usize) -> f32 {
        let samples: Vec<f32> = (0..frames).map(|_| voice.next_sample()).collect();
        samples
            .windows(3)
            .map(|w| (w[2] - 2.0 * w[1] + w[0]).abs())
            .sum()
    }

    #[test]
    fn test_sawtooth_is_richer_than_sine() {
        let sample_rate = 48_000;
        let mut saw = Voice::new(note(Waveform::Sawtooth), sample_rate);
        let mut sine = Voice::new(note(Waveform::Sine), sample_rate);

        let saw_roughness = roughness(&mut saw, 4_800);
        let sine_roughness = roughness(&mut sine, 4_800);
        assert!(
            saw_roughness > 5.0 * sine_roughness,
            "saw {saw_roughness} vs sine {sine_roughness}"
        );
    }

    #[test]
    fn test_voice_stops_after_duration() {
        let sample_rate = 8_000;
        let mut voice = Voice::new(note(Waveform::Sine), sample_rate);

        for _ in 0..sample_rate {
            voice.next_sample();
        }
        assert!(voice.is_finished());
        assert_eq!(voice.next_sample(), 0.0);
    }
}
