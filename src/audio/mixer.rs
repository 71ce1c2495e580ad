//! Voice mixer shared between the session and the audio callback.

use super::voice::{ToneRequest, Voice};
use crate::params::SynthConfig;

/// Sums active voices, applies master gain and a hard limiter
#[derive(Debug)]
pub struct Mixer {
    voices: Vec<Voice>,
    sample_rate: u32,
    master_gain: f32,
    limiter_ceiling: f32,
}

impl Mixer {
    pub fn new(sample_rate: u32, config: &SynthConfig) -> Self {
        Self {
            voices: Vec::new(),
            sample_rate,
            master_gain: config.master_gain,
            limiter_ceiling: config.limiter_ceiling,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Start a new voice
    pub fn trigger(&mut self, request: ToneRequest) {
        self.voices.push(Voice::new(request, self.sample_rate));
    }

    /// Number of voices still sounding
    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    /// Render one mono sample
    pub fn next_sample(&mut self) -> f32 {
        let sum: f32 = self.voices.iter_mut().map(Voice::next_sample).sum();
        self.voices.retain(|voice| !voice.is_finished());

        // Safety limiter: hard clip
        (sum * self.master_gain).clamp(-self.limiter_ceiling, self.limiter_ceiling)
    }

    /// Fill an interleaved buffer, writing the same sample to every channel
    pub fn render(&mut self, data: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        for frame in data.chunks_mut(channels) {
            let sample = self.next_sample();
            frame.fill(sample);
        }
    }
}
