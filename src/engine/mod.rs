//! Host audio engine abstraction
//!
//! The engine is an explicitly constructed object injected into each
//! [`crate::sound::Sound`] rather than a process-wide singleton, so tests and
//! applications can run multiple independent instances. It provides three
//! capabilities: decoding raw bytes into buffers, constructing single-use
//! source nodes and gain nodes, and a context clock with a running/suspended
//! state signal.

pub mod buffer;
pub mod graph;
pub mod offline;

use std::fmt;
use std::rc::Rc;

use crate::error::Result;

pub use buffer::AudioBuffer;
pub use graph::SourceGraph;
pub use offline::OfflineEngine;

/// Running/suspended condition of the engine's output context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineState {
    /// The context clock advances and started sources are audible
    #[default]
    Running,
    /// The context is halted; resuming playback is only valid here
    Suspended,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineState::Running => write!(f, "running"),
            EngineState::Suspended => write!(f, "suspended"),
        }
    }
}

/// Host audio engine capability.
///
/// Implementations are single-threaded; shared access goes through
/// `Rc<dyn AudioEngine>` with interior mutability where the engine needs it.
pub trait AudioEngine {
    /// Decode raw bytes into a playable buffer.
    ///
    /// Fails with [`crate::Error::Decode`] when the bytes are not a supported
    /// audio format.
    fn decode(&self, bytes: &[u8]) -> Result<AudioBuffer>;

    /// Create a single-use source node bound to `buffer`, wired to the
    /// engine output. Starting the node twice is undefined; callers guard
    /// through [`SourceGraph`].
    fn create_source(&self, buffer: Rc<AudioBuffer>) -> Box<dyn SourceNode>;

    /// Create a gain node at `gain`, wired between source and output.
    fn create_gain(&self, gain: f32) -> Box<dyn GainNode>;

    /// Context clock in seconds.
    fn current_time(&self) -> f64;

    /// Current running/suspended condition.
    fn state(&self) -> EngineState;
}

/// A single-use playback node bound to one decoded buffer.
pub trait SourceNode {
    /// Begin playback at `offset` seconds into the buffer.
    fn start(&mut self, offset: f64);

    /// Halt playback. Idempotent.
    fn stop(&mut self);

    /// Detach the node from the graph; it produces nothing afterwards.
    fn disconnect(&mut self);

    /// The decoded buffer this node plays.
    fn buffer(&self) -> &Rc<AudioBuffer>;
}

/// A gain stage between a source node and the engine output.
pub trait GainNode {
    fn set_gain(&mut self, value: f32);

    fn gain(&self) -> f32;

    /// Detach the node from the graph.
    fn disconnect(&mut self);
}
