//! Resonance - Sound Playback Manager
//!
//! Resonance loads remote audio assets, decodes them into playable buffers,
//! and exposes play/pause/resume/stop/navigate operations while tracking a
//! playback state machine.
//!
//! # Architecture
//!
//! The load pipeline feeds each stage into the next:
//! - URL resolution ([`path`]) -> network fetch ([`fetch`]) -> decode
//!   ([`engine::AudioEngine`]) -> playback graph ([`engine::SourceGraph`])
//!
//! A [`sound::Sound`] orchestrates the pipeline and drives the transport
//! state machine over the loaded items. The audio engine is an injected
//! trait object, so hosts bring their own output while tests run against the
//! bundled [`engine::OfflineEngine`].

pub mod config;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod path;
pub mod sound;

pub use config::{AudioPaths, SoundConfig};
pub use engine::{AudioBuffer, AudioEngine, EngineState, OfflineEngine, SourceGraph};
pub use error::{Error, Result};
pub use fetch::AssetFetcher;
pub use sound::{LoadedSound, PlayState, PreloadState, Sound, Warning};
