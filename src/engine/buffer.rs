//! Decoded audio buffers
//!
//! Samples are stored in interleaved format: [L0, R0, L1, R1, ...]
//! This matches common audio file formats and simplifies I/O.

use crate::error::{Error, Result};

/// An immutable decoded audio buffer, shared between a loaded sound and the
/// playback graphs built from it.
#[derive(Clone, Debug)]
pub struct AudioBuffer {
    /// Interleaved sample data
    samples: Vec<f32>,
    /// Number of channels (1 = mono, 2 = stereo, ...)
    num_channels: usize,
    /// Sample rate in Hz
    sample_rate: u32,
}

impl AudioBuffer {
    /// Create a buffer from existing interleaved samples
    pub fn from_interleaved(
        samples: Vec<f32>,
        num_channels: usize,
        sample_rate: u32,
    ) -> Result<Self> {
        if num_channels == 0 || sample_rate == 0 {
            return Err(Error::Decode {
                reason: format!(
                    "invalid buffer shape: {} channels at {} Hz",
                    num_channels, sample_rate
                ),
            });
        }
        if samples.len() % num_channels != 0 {
            return Err(Error::Decode {
                reason: format!(
                    "sample count {} is not divisible by channel count {}",
                    samples.len(),
                    num_channels
                ),
            });
        }
        Ok(Self {
            samples,
            num_channels,
            sample_rate,
        })
    }

    /// Number of channels
    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of frames (samples per channel)
    pub fn num_frames(&self) -> usize {
        self.samples.len() / self.num_channels
    }

    /// Interleaved sample data
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        self.num_frames() as f64 / self.sample_rate as f64
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
