//! Disposable playback node graph
//!
//! One graph per playback session: a single-use source node feeding a gain
//! node feeding the engine output. Source nodes cannot be restarted, so the
//! sound unit builds a fresh graph before every play and discards the old
//! one.

use std::rc::Rc;

use crate::engine::{AudioBuffer, AudioEngine, GainNode, SourceNode};
use crate::error::{Error, Result};

/// Source node + gain node wired to the engine output.
pub struct SourceGraph {
    source: Box<dyn SourceNode>,
    gain: Box<dyn GainNode>,
    buffer: Rc<AudioBuffer>,
    started: bool,
}

impl SourceGraph {
    /// Build a graph over `buffer` with its gain stage initialized to
    /// `volume`. Wiring (source -> gain -> output) happens in the engine's
    /// node constructors.
    pub fn build(engine: &Rc<dyn AudioEngine>, buffer: Rc<AudioBuffer>, volume: f32) -> Self {
        let source = engine.create_source(Rc::clone(&buffer));
        let gain = engine.create_gain(volume);
        Self {
            source,
            gain,
            buffer,
            started: false,
        }
    }

    /// Start playback at `offset` seconds into the buffer.
    ///
    /// A graph can be started at most once; a second call returns
    /// [`Error::GraphConsumed`] without touching the node.
    pub fn start(&mut self, offset: f64) -> Result<()> {
        if self.started {
            return Err(Error::GraphConsumed);
        }
        self.started = true;
        self.source.start(offset);
        Ok(())
    }

    /// Halt the source node. Idempotent.
    pub fn stop(&mut self) {
        self.source.stop();
    }

    /// Detach both nodes from the engine output.
    pub fn disconnect(&mut self) {
        self.source.disconnect();
        self.gain.disconnect();
    }

    pub fn set_gain(&mut self, value: f32) {
        self.gain.set_gain(value);
    }

    pub fn gain(&self) -> f32 {
        self.gain.gain()
    }

    /// The decoded buffer this graph plays.
    pub fn buffer(&self) -> &Rc<AudioBuffer> {
        &self.buffer
    }

    /// Whether `start` has already been consumed.
    pub fn started(&self) -> bool {
        self.started
    }
}
