//! URL resolution for audio assets
//!
//! Builds parameterized absolute URLs from a base URL and a relative path,
//! plus a display-name helper for stripping directories and extensions.

use std::collections::BTreeMap;

use url::Url;

use crate::error::{Error, Result};

/// Resolve `relative` against `base` and append all `params` as query
/// parameters.
///
/// An absolute `relative` (e.g. `https://cdn.example.com/a.wav`) replaces the
/// base entirely, matching standard URL-join semantics. An empty or relative
/// `base` is an error: there is no ambient origin to fall back on.
///
/// # Example
/// ```
/// use std::collections::BTreeMap;
/// use resonance::path::resolve;
///
/// let params = BTreeMap::from([("token".to_string(), "abc".to_string())]);
/// let url = resolve("https://example.com/fixtures/", "a.wav", &params).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/fixtures/a.wav?token=abc");
/// ```
pub fn resolve(base: &str, relative: &str, params: &BTreeMap<String, String>) -> Result<Url> {
    let base_url = Url::parse(base).map_err(|e| Error::InvalidUrl {
        input: base.to_string(),
        source: Some(e),
    })?;

    let mut url = base_url.join(relative).map_err(|e| Error::InvalidUrl {
        input: relative.to_string(),
        source: Some(e),
    })?;

    if !params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in params {
            pairs.append_pair(key, value);
        }
    }

    Ok(url)
}

/// Extract a display name from a path: the final segment with its last
/// extension stripped.
///
/// Empty or blank input is returned unchanged. A name consisting only of an
/// extension (`.env`) strips to the empty string, and only the last extension
/// is removed (`archive.tar.gz` -> `archive.tar`).
pub fn file_name_of(path: &str) -> &str {
    if path.trim().is_empty() {
        return path;
    }

    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rfind('.') {
        Some(dot) => &name[..dot],
        None => name,
    }
}
