//! Offline reference engine
//!
//! A headless [`AudioEngine`] implementation: decodes WAV bytes via `hound`,
//! keeps a manually advanced context clock, and renders nothing. Applications
//! without a real output device can inspect decoded buffers through it, and
//! tests use it as the injected engine double — node-creation and node-start
//! counters make graph construction observable from the outside.

use std::cell::Cell;
use std::io::Cursor;
use std::rc::Rc;

use hound::{SampleFormat, WavReader};
use log::warn;

use crate::engine::{AudioBuffer, AudioEngine, EngineState, GainNode, SourceNode};
use crate::error::{Error, Result};

#[derive(Debug, Default)]
struct Shared {
    clock: Cell<f64>,
    state: Cell<EngineState>,
    sources_created: Cell<u64>,
    sources_started: Cell<u64>,
}

/// Headless engine with a manually driven clock.
#[derive(Debug, Clone, Default)]
pub struct OfflineEngine {
    shared: Rc<Shared>,
}

impl OfflineEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the context clock by `secs`.
    pub fn advance(&self, secs: f64) {
        let clock = &self.shared.clock;
        clock.set(clock.get() + secs.max(0.0));
    }

    /// Halt the output context; started sources keep their position.
    pub fn suspend(&self) {
        self.shared.state.set(EngineState::Suspended);
    }

    /// Return the output context to the running condition.
    pub fn resume(&self) {
        self.shared.state.set(EngineState::Running);
    }

    /// Total source nodes created since construction.
    pub fn sources_created(&self) -> u64 {
        self.shared.sources_created.get()
    }

    /// Total source nodes started since construction.
    pub fn sources_started(&self) -> u64 {
        self.shared.sources_started.get()
    }
}

impl AudioEngine for OfflineEngine {
    fn decode(&self, bytes: &[u8]) -> Result<AudioBuffer> {
        let reader = WavReader::new(Cursor::new(bytes)).map_err(|e| Error::Decode {
            reason: format!("not a WAV stream: {}", e),
        })?;

        let spec = reader.spec();
        let samples = read_samples_as_f32(reader, spec.bits_per_sample, spec.sample_format)?;
        let buffer =
            AudioBuffer::from_interleaved(samples, spec.channels as usize, spec.sample_rate)?;

        if buffer.is_empty() {
            return Err(Error::Decode {
                reason: "audio contains no samples".to_string(),
            });
        }

        Ok(buffer)
    }

    fn create_source(&self, buffer: Rc<AudioBuffer>) -> Box<dyn SourceNode> {
        let shared = Rc::clone(&self.shared);
        shared.sources_created.set(shared.sources_created.get() + 1);
        Box::new(OfflineSource {
            buffer,
            shared,
            started: false,
            stopped: false,
            connected: true,
        })
    }

    fn create_gain(&self, gain: f32) -> Box<dyn GainNode> {
        Box::new(OfflineGain {
            gain,
            connected: true,
        })
    }

    fn current_time(&self) -> f64 {
        self.shared.clock.get()
    }

    fn state(&self) -> EngineState {
        self.shared.state.get()
    }
}

struct OfflineSource {
    buffer: Rc<AudioBuffer>,
    shared: Rc<Shared>,
    started: bool,
    stopped: bool,
    connected: bool,
}

impl SourceNode for OfflineSource {
    fn start(&mut self, offset: f64) {
        // Restarting a consumed node is undefined by real engines; the
        // offline engine just refuses and says so.
        if self.started || self.stopped || !self.connected {
            warn!("ignoring start({:.3}) on a consumed source node", offset);
            return;
        }
        self.started = true;
        self.shared
            .sources_started
            .set(self.shared.sources_started.get() + 1);
    }

    fn stop(&mut self) {
        self.stopped = true;
    }

    fn disconnect(&mut self) {
        self.connected = false;
    }

    fn buffer(&self) -> &Rc<AudioBuffer> {
        &self.buffer
    }
}

struct OfflineGain {
    gain: f32,
    connected: bool,
}

impl GainNode for OfflineGain {
    fn set_gain(&mut self, value: f32) {
        if !self.connected {
            warn!("ignoring set_gain({}) on a disconnected gain node", value);
            return;
        }
        self.gain = value;
    }

    fn gain(&self) -> f32 {
        self.gain
    }

    fn disconnect(&mut self) {
        self.connected = false;
    }
}

/// Read all samples as f32, normalizing integer formats to [-1.0, 1.0].
fn read_samples_as_f32<R: std::io::Read>(
    mut reader: WavReader<R>,
    bits_per_sample: u16,
    sample_format: SampleFormat,
) -> Result<Vec<f32>> {
    let read_error = |e: hound::Error| Error::Decode {
        reason: format!("failed to read samples: {}", e),
    };

    match sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(read_error),
        SampleFormat::Int => match bits_per_sample {
            8 => reader
                .samples::<i8>()
                .map(|s| s.map(|v| v as f32 / 128.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(read_error),
            16 => reader
                .samples::<i16>()
                .map(|s| s.map(|v| v as f32 / 32768.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(read_error),
            // 24-bit is stored as i32 in hound
            24 => reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / 8388608.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(read_error),
            32 => reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / 2147483648.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(read_error),
            other => Err(Error::Decode {
                reason: format!("unsupported bit depth: {}-bit integer audio", other),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// One second of 440 Hz mono sine, 16-bit 44.1kHz WAV, in memory.
    fn sine_wav_bytes() -> Vec<u8> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for i in 0..44100 {
                let t = i as f64 / 44100.0;
                let sample = (2.0 * std::f64::consts::PI * 440.0 * t).sin();
                writer.write_sample((sample * 30000.0) as i16).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_decode_wav() {
        let engine = OfflineEngine::new();
        let buffer = engine.decode(&sine_wav_bytes()).unwrap();
        assert_eq!(buffer.num_channels(), 1);
        assert_eq!(buffer.sample_rate(), 44100);
        assert_abs_diff_eq!(buffer.duration(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let engine = OfflineEngine::new();
        let err = engine.decode(b"definitely not audio").unwrap_err();
        assert_eq!(err.error_code(), "DECODE_ERROR");
    }

    #[test]
    fn test_clock_and_state() {
        let engine = OfflineEngine::new();
        assert_eq!(engine.state(), EngineState::Running);
        assert_eq!(engine.current_time(), 0.0);

        engine.advance(2.5);
        engine.suspend();
        assert_eq!(engine.state(), EngineState::Suspended);
        assert_abs_diff_eq!(engine.current_time(), 2.5, epsilon = 1e-9);

        engine.resume();
        assert_eq!(engine.state(), EngineState::Running);
    }

    #[test]
    fn test_source_is_single_use() {
        let engine = OfflineEngine::new();
        let buffer = Rc::new(engine.decode(&sine_wav_bytes()).unwrap());

        let mut source = engine.create_source(buffer);
        source.start(0.0);
        source.start(0.0); // consumed; ignored
        assert_eq!(engine.sources_created(), 1);
        assert_eq!(engine.sources_started(), 1);
    }
}
