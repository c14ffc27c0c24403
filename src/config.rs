//! Construction-time configuration
//!
//! A `SoundConfig` identifies a sound unit: the base URL its paths resolve
//! against, the paths themselves, and any query parameters to append to
//! every resolved URL. JSON-deserializable for host applications that keep
//! their playlists in config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One path or several; accepted wherever a path list is expected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AudioPaths {
    One(String),
    Many(Vec<String>),
}

impl AudioPaths {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            AudioPaths::One(path) => vec![path],
            AudioPaths::Many(paths) => paths,
        }
    }
}

impl From<&str> for AudioPaths {
    fn from(path: &str) -> Self {
        AudioPaths::One(path.to_string())
    }
}

impl From<Vec<String>> for AudioPaths {
    fn from(paths: Vec<String>) -> Self {
        AudioPaths::Many(paths)
    }
}

/// Configuration for a sound unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundConfig {
    /// Absolute base URL the audio paths resolve against
    pub base_url: String,

    /// One or more audio paths, relative to `base_url`
    pub audio_paths: AudioPaths,

    /// Query parameters appended to every resolved URL
    #[serde(default)]
    pub search_params: BTreeMap<String, String>,
}

impl SoundConfig {
    pub fn new(base_url: impl Into<String>, audio_paths: impl Into<AudioPaths>) -> Self {
        Self {
            base_url: base_url.into(),
            audio_paths: audio_paths.into(),
            search_params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.search_params.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_single_path() {
        let config: SoundConfig = serde_json::from_str(
            r#"{ "base_url": "http://localhost/fixtures/", "audio_paths": "a.wav" }"#,
        )
        .unwrap();
        assert_eq!(config.audio_paths.into_vec(), vec!["a.wav"]);
        assert!(config.search_params.is_empty());
    }

    #[test]
    fn test_deserialize_path_list_with_params() {
        let config: SoundConfig = serde_json::from_str(
            r#"{
                "base_url": "http://localhost/fixtures/",
                "audio_paths": ["a.wav", "b.wav"],
                "search_params": { "token": "abc" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.audio_paths.into_vec(), vec!["a.wav", "b.wav"]);
        assert_eq!(config.search_params.get("token").unwrap(), "abc");
    }

    #[test]
    fn test_builder() {
        let config = SoundConfig::new("http://localhost/", "a.wav").with_param("session", "42");
        assert_eq!(config.search_params.get("session").unwrap(), "42");
    }
}
