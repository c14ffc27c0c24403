//! Preload and play state enums
//!
//! Closed sum types, exhaustively matched in all transition logic.

use std::fmt;

/// Lifecycle stage of fetching and decoding the configured audio paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreloadState {
    /// No successful load has completed yet, or a load is in flight
    #[default]
    Loading,
    /// All configured paths fetched, decoded, and graph-ready
    Loaded,
    /// A fetch or decode failed; re-invoking `load` retries
    Error,
}

impl fmt::Display for PreloadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreloadState::Loading => write!(f, "loading"),
            PreloadState::Loaded => write!(f, "loaded"),
            PreloadState::Error => write!(f, "error"),
        }
    }
}

/// Lifecycle stage of the transport control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayState {
    /// Unit constructed, nothing started yet
    #[default]
    Created,
    /// A graph was started from offset 0
    Playing,
    /// Playback halted with the elapsed offset recorded
    Paused,
    /// Playback restarted from a recorded offset
    Resumed,
    /// Playback halted; a new play restarts from the beginning
    Stopped,
}

impl PlayState {
    /// States from which `play` may start a new graph.
    pub fn can_start(self) -> bool {
        matches!(
            self,
            PlayState::Created | PlayState::Paused | PlayState::Stopped
        )
    }

    /// States in which a graph is actively producing audio.
    pub fn is_active(self) -> bool {
        matches!(self, PlayState::Playing | PlayState::Resumed)
    }
}

impl fmt::Display for PlayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayState::Created => write!(f, "created"),
            PlayState::Playing => write!(f, "playing"),
            PlayState::Paused => write!(f, "paused"),
            PlayState::Resumed => write!(f, "resumed"),
            PlayState::Stopped => write!(f, "stopped"),
        }
    }
}
