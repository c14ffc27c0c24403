//! Load-pipeline integration tests
//!
//! End-to-end: resolve -> fetch (against a local fixture server) -> decode
//! (offline engine) -> graph -> transport. The fixture server is a plain TCP
//! listener on a background thread serving canned HTTP responses, so the
//! status-code handling (200/206/404) is exercised over a real socket.

use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::thread;

use pretty_assertions::assert_eq;

use resonance::{
    AssetFetcher, AudioEngine, OfflineEngine, PlayState, PreloadState, Sound, SoundConfig, Warning,
};

/// Canned HTTP responses served by path, plus a log of request targets.
struct FixtureServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FixtureServer {
    /// Serve `routes` (path -> (status, body)) on an ephemeral port. Unknown
    /// paths get a 404.
    fn start(routes: HashMap<String, (u16, Vec<u8>)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind fixture server");
        let addr = listener.local_addr().expect("local addr");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };

                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => head.extend_from_slice(&buf[..n]),
                    }
                }

                let head = String::from_utf8_lossy(&head);
                let target = head
                    .lines()
                    .next()
                    .and_then(|line| line.split_whitespace().nth(1))
                    .unwrap_or("")
                    .to_string();
                log.lock().unwrap().push(target.clone());

                let path = target.split('?').next().unwrap_or("");
                let (status, body) = routes
                    .get(path)
                    .cloned()
                    .unwrap_or((404, b"not found".to_vec()));
                let reason = match status {
                    200 => "OK",
                    206 => "Partial Content",
                    404 => "Not Found",
                    _ => "Error",
                };

                let mut response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: audio/wav\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    status,
                    reason,
                    body.len()
                )
                .into_bytes();
                response.extend_from_slice(&body);
                let _ = stream.write_all(&response);
            }
        });

        Self { addr, requests }
    }

    fn base_url(&self) -> String {
        format!("http://{}/fixtures/", self.addr)
    }

    fn request_targets(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// A short mono sine tone as an in-memory WAV file.
fn wav_bytes(duration_secs: f64) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 44100,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let frames = (44100.0 * duration_secs) as usize;
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("wav writer");
        for i in 0..frames {
            let t = i as f64 / 44100.0;
            let sample = (2.0 * std::f64::consts::PI * 220.0 * t).sin();
            writer.write_sample((sample * 24000.0) as i16).expect("sample");
        }
        writer.finalize().expect("finalize");
    }
    cursor.into_inner()
}

fn unit_for(server: &FixtureServer, paths: &[&str]) -> (Rc<OfflineEngine>, Sound) {
    let engine = Rc::new(OfflineEngine::new());
    let dyn_engine: Rc<dyn AudioEngine> = engine.clone();
    let config = SoundConfig::new(
        server.base_url(),
        paths.iter().map(|p| p.to_string()).collect::<Vec<String>>(),
    );
    (engine, Sound::new(config, dyn_engine))
}

#[tokio::test]
async fn load_two_paths_preserves_order() {
    let server = FixtureServer::start(HashMap::from([
        ("/fixtures/a.wav".to_string(), (200, wav_bytes(0.5))),
        ("/fixtures/b.wav".to_string(), (200, wav_bytes(1.0))),
    ]));
    let (_, mut sound) = unit_for(&server, &["a.wav", "b.wav"]);

    sound
        .load(&["a.wav".to_string(), "b.wav".to_string()])
        .await;

    assert_eq!(sound.preload_state(), PreloadState::Loaded);
    assert_eq!(sound.loaded().len(), 2);
    let names: Vec<&str> = sound.iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["a", "b"]);

    // every request carried a cache-busting timestamp parameter
    let targets = server.request_targets();
    assert_eq!(targets.len(), 2);
    assert!(targets.iter().all(|t| t.contains("timestamp=")));
}

#[tokio::test]
async fn load_resolves_search_params() {
    let server = FixtureServer::start(HashMap::from([(
        "/fixtures/a.wav".to_string(),
        (200, wav_bytes(0.2)),
    )]));
    let engine: Rc<dyn AudioEngine> = Rc::new(OfflineEngine::new());
    let config = SoundConfig::new(server.base_url(), "a.wav").with_param("token", "abc");
    let mut sound = Sound::new(config, engine);

    sound.load(&["a.wav".to_string()]).await;

    assert_eq!(sound.preload_state(), PreloadState::Loaded);
    assert!(server.request_targets()[0].contains("token=abc"));
}

#[tokio::test]
async fn partial_content_is_success() {
    let server = FixtureServer::start(HashMap::from([(
        "/fixtures/a.wav".to_string(),
        (206, wav_bytes(0.2)),
    )]));
    let (_, mut sound) = unit_for(&server, &["a.wav"]);

    sound.load(&["a.wav".to_string()]).await;
    assert_eq!(sound.preload_state(), PreloadState::Loaded);
}

#[tokio::test]
async fn missing_path_fails_whole_load() {
    let server = FixtureServer::start(HashMap::from([(
        "/fixtures/a.wav".to_string(),
        (200, wav_bytes(0.2)),
    )]));
    let (engine, mut sound) = unit_for(&server, &["a.wav", "missing.wav"]);

    sound
        .load(&["a.wav".to_string(), "missing.wav".to_string()])
        .await;

    assert_eq!(sound.preload_state(), PreloadState::Error);
    assert!(sound.loaded().is_empty());

    // a subsequent play retries the load, observes the error, and warns
    sound.play().await;
    assert_eq!(sound.play_state(), PlayState::Created);
    assert_eq!(sound.last_warning(), Some(&Warning::NotLoaded));
    assert_eq!(engine.sources_started(), 0);
}

#[tokio::test]
async fn undecodable_bytes_fail_load() {
    let server = FixtureServer::start(HashMap::from([(
        "/fixtures/a.wav".to_string(),
        (200, b"these are not audio bytes".to_vec()),
    )]));
    let (_, mut sound) = unit_for(&server, &["a.wav"]);

    sound.load(&["a.wav".to_string()]).await;
    assert_eq!(sound.preload_state(), PreloadState::Error);
}

#[tokio::test]
async fn play_drives_full_pipeline() {
    let server = FixtureServer::start(HashMap::from([(
        "/fixtures/a.wav".to_string(),
        (200, wav_bytes(1.0)),
    )]));
    let (engine, mut sound) = unit_for(&server, &["a.wav"]);

    // play with nothing loaded runs the load itself
    sound.play().await;

    assert_eq!(sound.preload_state(), PreloadState::Loaded);
    assert_eq!(sound.play_state(), PlayState::Playing);
    assert_eq!(engine.sources_started(), 1);
    assert!((sound.total_duration() - 1.0).abs() < 1e-6);

    // restart from stopped builds a graph distinct from the first
    sound.stop();
    sound.play().await;
    assert_eq!(sound.play_state(), PlayState::Playing);
    assert_eq!(engine.sources_started(), 2);
}

#[tokio::test]
async fn fetcher_reports_status() {
    let server = FixtureServer::start(HashMap::new());
    let fetcher = AssetFetcher::new();
    let url = url::Url::parse(&format!("http://{}/fixtures/gone.wav", server.addr)).unwrap();

    let err = fetcher.fetch(&url).await.unwrap_err();
    assert_eq!(err.error_code(), "NETWORK_ERROR");
    match err {
        resonance::Error::Network { status, .. } => assert_eq!(status, Some(404)),
        other => panic!("unexpected error: {:?}", other),
    }
}
