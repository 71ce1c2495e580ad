//! Audio output stream driving the voice mixer.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::path::Path;
use std::sync::{Arc, Mutex};

use super::mixer::Mixer;
use super::recorder::WavRecorder;
use super::voice::ToneRequest;
use super::ToneSink;
use crate::error::AudioError;
use crate::params::SynthConfig;

type SharedRecorder = Arc<Mutex<Option<WavRecorder>>>;

/// WAV capture in progress
struct Recording {
    path: String,
    writer: SharedRecorder,
}

/// Audio system owning the output stream and the shared mixer
pub struct AudioSystem {
    /// Voices shared with the audio callback
    mixer: Arc<Mutex<Mixer>>,

    /// WAV capture of everything the stream plays (optional)
    recording: Option<Recording>,

    /// Audio output stream (kept alive)
    _stream: cpal::Stream,
}

impl AudioSystem {
    /// Open the default output device and start the stream.
    ///
    /// When `record_path` is given, every rendered sample is also written to
    /// a WAV file there.
    pub fn new(config: &SynthConfig, record_path: Option<&Path>) -> Result<Self, AudioError> {
        config.validate().map_err(AudioError::InvalidConfig)?;

        // Setup audio output device
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;
        let supported = device.default_output_config()?;
        if supported.sample_format() != cpal::SampleFormat::F32 {
            return Err(AudioError::SampleFormat(supported.sample_format()));
        }

        let sample_rate = supported.sample_rate().0;
        let channels = supported.channels();

        log::info!(
            "event=audio_device name={} sample_rate_hz={} channels={}",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            sample_rate,
            channels
        );

        let recorder: Option<SharedRecorder> = record_path
            .map(|path| WavRecorder::create(path, sample_rate, channels))
            .transpose()?
            .map(|recorder| Arc::new(Mutex::new(Some(recorder))));

        let mixer = Arc::new(Mutex::new(Mixer::new(sample_rate, config)));
        let mixer_clone = Arc::clone(&mixer);
        let recorder_clone = recorder.clone();
        let recording = record_path.zip(recorder).map(|(path, writer)| Recording {
            path: path.display().to_string(),
            writer,
        });
        let channel_count = channels as usize;

        // Build audio output stream
        let stream = device.build_output_stream(
            &supported.into(),
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                match mixer_clone.lock() {
                    Ok(mut mixer) => mixer.render(data, channel_count),
                    Err(_) => data.fill(0.0),
                }

                // Record to WAV if recording
                if let Some(ref recorder) = recorder_clone {
                    if let Ok(mut guard) = recorder.lock() {
                        if let Some(writer) = guard.as_mut() {
                            let _ = writer.write(data);
                        }
                    }
                }
            },
            |err| log::error!("event=audio_stream_error error={}", err),
            None,
        )?;

        stream.play()?;

        Ok(Self {
            mixer,
            recording,
            _stream: stream,
        })
    }

    /// Stop recording and finalize the WAV file. No-op when not recording.
    pub fn finish_recording(&mut self) -> Result<(), AudioError> {
        let Some(ref recording) = self.recording else {
            return Ok(());
        };
        let taken = recording
            .writer
            .lock()
            .map_err(|_| AudioError::Poisoned)?
            .take();
        if let Some(writer) = taken {
            writer.finalize().map_err(|source| AudioError::Recording {
                path: recording.path.clone(),
                source,
            })?;
            log::info!("event=recording_saved path={}", recording.path);
        }
        Ok(())
    }
}

impl ToneSink for AudioSystem {
    fn play(&mut self, tone: ToneRequest) -> Result<(), AudioError> {
        self.mixer
            .lock()
            .map_err(|_| AudioError::Poisoned)?
            .trigger(tone);
        Ok(())
    }

    fn active_voices(&self) -> usize {
        self.mixer.lock().map(|mixer| mixer.active_voices()).unwrap_or(0)
    }
}
