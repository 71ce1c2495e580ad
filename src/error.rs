//! Error types for the audio output and the host link.

use thiserror::Error;

/// Failures while bringing up or driving the audio output
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("No audio output device found")]
    NoDevice,

    #[error("Failed to get audio config: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),

    #[error("Failed to build audio stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("Failed to start audio stream: {0}")]
    Play(#[from] cpal::PlayStreamError),

    #[error("Unsupported sample format {0:?} (f32 output required)")]
    SampleFormat(cpal::SampleFormat),

    #[error("Recording {path} failed: {source}")]
    Recording {
        path: String,
        #[source]
        source: hound::Error,
    },

    #[error("Invalid synth config: {0}")]
    InvalidConfig(String),

    #[error("Mixer lock poisoned")]
    Poisoned,
}

/// Failures on the socket to the visualization host
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("connect failed: {0}")]
    Connect(#[source] tungstenite::Error),

    #[error("send failed: {0}")]
    Send(#[source] tungstenite::Error),

    #[error("receive failed: {0}")]
    Receive(#[source] tungstenite::Error),
}
