//! Sound unit: load pipeline + transport state machine
//!
//! A [`Sound`] loads a configured set of audio paths (resolve -> fetch ->
//! decode -> graph), tracks preload and play state, and exposes transport
//! controls. All asynchronous work suspends on one logical thread; every
//! mutating operation takes `&mut self`, so no two operations on one unit
//! ever overlap.
//!
//! Invalid transitions never fail: they emit a [`Warning`] into the unit's
//! warning channel (and through `log::warn!`) and leave state unchanged.

pub mod state;

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use futures::future::try_join_all;
use log::{error, info, warn};

use crate::config::SoundConfig;
use crate::engine::{AudioBuffer, AudioEngine, EngineState, SourceGraph};
use crate::error::Result;
use crate::fetch::AssetFetcher;
use crate::path;

pub use state::{PlayState, PreloadState};

/// Default gain for graphs built by `load` and `play`.
pub const DEFAULT_VOLUME: f32 = 1.0;

/// A decoded, ready-to-play asset paired with its source path.
pub struct LoadedSound {
    path: String,
    graph: SourceGraph,
}

impl LoadedSound {
    /// The path this sound was loaded from, as configured.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Display name: final path segment, extension stripped.
    pub fn name(&self) -> &str {
        path::file_name_of(&self.path)
    }

    /// The decoded buffer.
    pub fn buffer(&self) -> &Rc<AudioBuffer> {
        self.graph.buffer()
    }
}

/// Non-fatal diagnostics: an operation was attempted from a state that does
/// not permit it. Drained by the host through [`Sound::take_warnings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Warning {
    /// Transport operation before a successful load
    NotLoaded,
    /// Navigation with an empty loaded list
    NoLoadedSounds,
    /// Transport operation from a play state that does not permit it
    UnexpectedPlayState { op: &'static str, state: PlayState },
    /// Operation needs an active graph and none exists
    NoActiveGraph { op: &'static str },
    /// Resume requires the engine to be suspended
    EngineNotSuspended,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::NotLoaded => {
                write!(f, "no loaded sounds available; use load to load sounds")
            }
            Warning::NoLoadedSounds => write!(f, "no loaded sounds available"),
            Warning::UnexpectedPlayState { op, state } => {
                write!(f, "cannot {} while {}", op, state)
            }
            Warning::NoActiveGraph { op } => {
                write!(f, "no audio source available to {}", op)
            }
            Warning::EngineNotSuspended => {
                write!(f, "cannot resume while the audio engine is not suspended")
            }
        }
    }
}

/// The sound-playback manager.
///
/// Owns its loaded items and at most one active [`SourceGraph`] per playback
/// session; each `play`/`resume` discards the previous graph and builds a
/// fresh one, because source nodes are single-use.
pub struct Sound {
    engine: Rc<dyn AudioEngine>,
    fetcher: AssetFetcher,
    base_url: String,
    search_params: BTreeMap<String, String>,
    audio_paths: Vec<String>,
    play_time: f64,
    current_index: usize,
    loaded: Vec<LoadedSound>,
    preload_state: PreloadState,
    play_state: PlayState,
    active: Option<SourceGraph>,
    warnings: Vec<Warning>,
}

impl Sound {
    /// Construct a unit from its configuration and an injected engine.
    pub fn new(config: SoundConfig, engine: Rc<dyn AudioEngine>) -> Self {
        Self {
            engine,
            fetcher: AssetFetcher::new(),
            base_url: config.base_url,
            search_params: config.search_params,
            audio_paths: config.audio_paths.into_vec(),
            play_time: 0.0,
            current_index: 0,
            loaded: Vec::new(),
            preload_state: PreloadState::Loading,
            play_state: PlayState::Created,
            active: None,
            warnings: Vec::new(),
        }
    }

    // ========================================================================
    // Load pipeline
    // ========================================================================

    /// Load `paths`: resolve each against the base URL and search parameters,
    /// fetch, decode, and build one graph per path, preserving input order.
    ///
    /// All per-path pipelines run concurrently; the first failure fails the
    /// whole invocation (all or nothing). On success the loaded list is
    /// replaced and `preload_state` becomes `Loaded`; on failure the error is
    /// logged, `preload_state` becomes `Error`, and the previous loaded list
    /// is left untouched. Never returns an error; chainable.
    pub async fn load(&mut self, paths: &[String]) -> &mut Self {
        self.preload_state = PreloadState::Loading;

        let result = {
            let this = &*self;
            let jobs = paths.iter().map(|p| this.load_one(p));
            try_join_all(jobs).await
        };

        match result {
            Ok(items) => {
                self.loaded = items;
                self.preload_state = PreloadState::Loaded;
                info!("loaded {} sound(s)", self.loaded.len());
            }
            Err(err) => {
                error!("failed to load audio: {}", err);
                self.preload_state = PreloadState::Error;
            }
        }
        self
    }

    async fn load_one(&self, path: &str) -> Result<LoadedSound> {
        let url = path::resolve(&self.base_url, path, &self.search_params)?;
        let bytes = self.fetcher.fetch(&url).await?;
        let buffer = self.engine.decode(&bytes)?;
        let graph = SourceGraph::build(&self.engine, Rc::new(buffer), DEFAULT_VOLUME);
        Ok(LoadedSound {
            path: path.to_string(),
            graph,
        })
    }

    // ========================================================================
    // Transport
    // ========================================================================

    /// Play the first loaded item at the default volume.
    pub async fn play(&mut self) -> &mut Self {
        self.play_volume(DEFAULT_VOLUME).await
    }

    /// Play the first loaded item at `volume`.
    ///
    /// Loads the configured paths first when nothing is loaded yet; if the
    /// unit still is not `Loaded` afterwards, warns and no-ops. Only
    /// `Created`, `Paused`, and `Stopped` may start a new graph.
    pub async fn play_volume(&mut self, volume: f32) -> &mut Self {
        if self.preload_state != PreloadState::Loaded {
            let paths = self.audio_paths.clone();
            self.load(&paths).await;
        }
        if self.preload_state != PreloadState::Loaded {
            self.warn(Warning::NotLoaded);
            return self;
        }

        match self.play_state {
            PlayState::Created | PlayState::Paused | PlayState::Stopped => {
                if self.loaded.is_empty() {
                    self.warn(Warning::NoLoadedSounds);
                    return self;
                }
                let buffer = Rc::clone(self.loaded[0].buffer());

                if let Some(mut old) = self.active.take() {
                    old.stop();
                    old.disconnect();
                }

                let mut graph = SourceGraph::build(&self.engine, buffer, volume);
                match graph.start(0.0) {
                    Ok(()) => self.play_state = PlayState::Playing,
                    Err(err) => error!("failed to start playback: {}", err),
                }
                self.active = Some(graph);
            }
            state @ (PlayState::Playing | PlayState::Resumed) => {
                self.warn(Warning::UnexpectedPlayState { op: "play", state });
            }
        }
        self
    }

    /// Pause active playback, recording the elapsed offset in `play_time`.
    pub fn pause(&mut self) -> &mut Self {
        if !self.play_state.is_active() {
            let state = self.play_state;
            self.warn(Warning::UnexpectedPlayState { op: "pause", state });
            return self;
        }
        if self.active.is_none() {
            self.warn(Warning::NoActiveGraph { op: "pause" });
            return self;
        }
        if let Some(graph) = self.active.as_mut() {
            graph.stop();
        }
        self.play_time = self.engine.current_time() - self.play_time;
        self.play_state = PlayState::Paused;
        self
    }

    /// Resume paused playback at the recorded `play_time`.
    pub fn resume(&mut self) -> &mut Self {
        let offset = self.play_time;
        self.resume_at(offset)
    }

    /// Resume paused playback at `offset` seconds.
    ///
    /// Only valid from `Paused` with a graph present and the engine in the
    /// suspended condition. The consumed source node cannot restart, so a
    /// fresh graph is built from the active buffer at the previous gain.
    pub fn resume_at(&mut self, offset: f64) -> &mut Self {
        if self.play_state != PlayState::Paused {
            let state = self.play_state;
            self.warn(Warning::UnexpectedPlayState { op: "resume", state });
            return self;
        }
        let Some(mut old) = self.active.take() else {
            self.warn(Warning::NoActiveGraph { op: "resume" });
            return self;
        };
        if self.engine.state() != EngineState::Suspended {
            self.active = Some(old);
            self.warn(Warning::EngineNotSuspended);
            return self;
        }

        let volume = old.gain();
        let buffer = Rc::clone(old.buffer());
        old.disconnect();

        let mut graph = SourceGraph::build(&self.engine, buffer, volume);
        match graph.start(offset) {
            Ok(()) => {
                self.play_state = PlayState::Resumed;
                self.play_time = offset;
            }
            Err(err) => error!("failed to resume playback: {}", err),
        }
        self.active = Some(graph);
        self
    }

    /// Stop active playback. Idempotent: a second call is a silent no-op.
    pub fn stop(&mut self) -> &mut Self {
        if self.play_state.is_active() {
            if let Some(graph) = self.active.as_mut() {
                graph.stop();
                self.play_state = PlayState::Stopped;
            }
        }
        self
    }

    /// Stop if active, disconnect the graph's nodes, and release loaded
    /// resources. Terminal; the unit should not be reused afterwards.
    pub fn dispose(&mut self) {
        if self.play_state.is_active() {
            self.stop();
        }
        if let Some(mut graph) = self.active.take() {
            graph.disconnect();
        }
        self.loaded.clear();
    }

    /// Set gain on the active graph, if one exists.
    pub fn set_volume(&mut self, volume: f32) -> &mut Self {
        if let Some(graph) = self.active.as_mut() {
            graph.set_gain(volume);
        }
        self
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Advance to the next loaded item, wrapping circularly. Stops playback
    /// first when currently `Playing`.
    pub fn next(&mut self) -> Option<&LoadedSound> {
        if self.loaded.is_empty() {
            self.warn(Warning::NoLoadedSounds);
            return None;
        }
        if self.play_state == PlayState::Playing {
            self.stop();
        }
        self.current_index = (self.current_index + 1) % self.loaded.len();
        Some(&self.loaded[self.current_index])
    }

    /// Retreat to the previous loaded item, wrapping circularly. Stops
    /// playback first when currently `Playing`; awaits the stop so engines
    /// with asynchronous teardown can finish before the index moves.
    pub async fn prev(&mut self) -> Option<&LoadedSound> {
        if self.loaded.is_empty() {
            self.warn(Warning::NoLoadedSounds);
            return None;
        }
        if self.play_state == PlayState::Playing {
            self.stop();
        }
        self.current_index = (self.current_index + self.loaded.len() - 1) % self.loaded.len();
        Some(&self.loaded[self.current_index])
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn play_state(&self) -> PlayState {
        self.play_state
    }

    pub fn preload_state(&self) -> PreloadState {
        self.preload_state
    }

    /// Context clock while a graph exists, else 0.
    pub fn current_time(&self) -> f64 {
        if self.active.is_some() {
            self.engine.current_time()
        } else {
            0.0
        }
    }

    /// Duration of the active graph's buffer, else 0.
    pub fn total_duration(&self) -> f64 {
        match &self.active {
            Some(graph) => graph.buffer().duration(),
            None => 0.0,
        }
    }

    /// Position of the navigation cursor in the loaded list.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Recorded elapsed offset in seconds.
    pub fn play_time(&self) -> f64 {
        self.play_time
    }

    /// The loaded items, in input path order.
    pub fn loaded(&self) -> &[LoadedSound] {
        &self.loaded
    }

    /// Lazy, finite iterator over the loaded items; a fresh call restarts
    /// from the beginning.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.loaded.iter(),
        }
    }

    /// Drain accumulated warnings.
    pub fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }

    /// The most recent warning, if any remain undrained.
    pub fn last_warning(&self) -> Option<&Warning> {
        self.warnings.last()
    }

    fn warn(&mut self, warning: Warning) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }
}

/// Iterator over a unit's loaded items.
pub struct Iter<'a> {
    inner: std::slice::Iter<'a, LoadedSound>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a LoadedSound;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a Sound {
    type Item = &'a LoadedSound;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
