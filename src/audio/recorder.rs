//! WAV capture of the rendered output.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::error::AudioError;

/// 32-bit float WAV writer for interleaved output samples
pub struct WavRecorder {
    writer: hound::WavWriter<BufWriter<File>>,
}

impl WavRecorder {
    pub fn create(path: &Path, sample_rate: u32, channels: u16) -> Result<Self, AudioError> {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let writer =
            hound::WavWriter::create(path, spec).map_err(|source| AudioError::Recording {
                path: path.display().to_string(),
                source,
            })?;
        Ok(Self { writer })
    }

    /// Append interleaved samples
    pub fn write(&mut self, samples: &[f32]) -> Result<(), hound::Error> {
        for sample in samples {
            self.writer.write_sample(*sample)?;
        }
        Ok(())
    }

    /// Flush and fix up the WAV header
    pub fn finalize(self) -> Result<(), hound::Error> {
        self.writer.finalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_round_trips_through_hound() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("take.wav");

        let mut recorder = WavRecorder::create(&path, 44_100, 2).unwrap();
        recorder.write(&[0.0, 0.0, 0.25, 0.25, -0.5, -0.5]).unwrap();
        recorder.finalize().unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_rate, 44_100);

        let samples: Vec<f32> = reader.samples::<f32>().map(Result::unwrap).collect();
        assert_eq!(samples, vec![0.0, 0.0, 0.25, 0.25, -0.5, -0.5]);
    }

    #[test]
    fn test_unwritable_path_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("take.wav");
        assert!(matches!(
            WavRecorder::create(&path, 44_100, 2),
            Err(AudioError::Recording { .. })
        ));
    }
}
