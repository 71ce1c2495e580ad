//! Tone synthesis.
//!
//! Note voices are rendered by a small oscillator mixer and pushed to the
//! default output device through cpal. `ToneSink` is the seam the session
//! plays through, so muted runs and tests never touch a device.

mod mixer;
mod recorder;
mod system;
mod voice;

// Re-export public types
pub use mixer::Mixer;
pub use recorder::WavRecorder;
pub use system::AudioSystem;
pub use voice::{oscillator, ToneRequest, Voice};

use crate::error::AudioError;

/// Something that can sound a tone
pub trait ToneSink {
    /// Start a tone. The tone stops by itself after its duration.
    fn play(&mut self, tone: ToneRequest) -> Result<(), AudioError>;

    /// Number of tones currently sounding
    fn active_voices(&self) -> usize {
        0
    }
}

/// Sink for muted runs: accepts every tone and produces no sound
#[derive(Debug, Default)]
pub struct SilentSink;

impl ToneSink for SilentSink {
    fn play(&mut self, tone: ToneRequest) -> Result<(), AudioError> {
        log::debug!(
            "event=tone_muted waveform={:?} frequency_hz={:.2}",
            tone.waveform,
            tone.frequency_hz
        );
        Ok(())
    }
}
