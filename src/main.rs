//! Resonance CLI - Sound Playback Manager
//!
//! Command-line interface for inspecting the Resonance load pipeline: loads
//! audio assets through the offline engine and reports what came back.

use std::rc::Rc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::info;

use resonance::{AudioEngine, OfflineEngine, Sound, SoundConfig};

#[derive(Parser)]
#[command(name = "resonance-cli", version, about = "Sound playback manager")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve, fetch, and decode audio paths against a base URL
    Load {
        /// Absolute base URL the paths resolve against
        #[arg(long)]
        base_url: String,

        /// Query parameters appended to every resolved URL, as key=value
        #[arg(long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,

        /// Audio paths relative to the base URL
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Load the paths described by a JSON SoundConfig file
    LoadConfig {
        /// Path to a JSON file with base_url, audio_paths, search_params
        file: std::path::PathBuf,
    },

    /// Print the display name of an audio path
    FileName { path: String },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    info!("Resonance v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Load {
            base_url,
            params,
            paths,
        } => load(base_url, params, paths).await,
        Commands::LoadConfig { file } => {
            let raw = std::fs::read_to_string(&file)?;
            let config: SoundConfig = serde_json::from_str(&raw)?;
            let paths = config.audio_paths.clone().into_vec();
            run_load(config, &paths).await
        }
        Commands::FileName { path } => {
            println!("{}", resonance::path::file_name_of(&path));
            Ok(())
        }
    }
}

async fn load(base_url: String, params: Vec<String>, paths: Vec<String>) -> Result<()> {
    let mut config = SoundConfig::new(base_url, paths.clone());
    for param in params {
        let Some((key, value)) = param.split_once('=') else {
            bail!("parameter must be key=value, got: {}", param);
        };
        config = config.with_param(key, value);
    }
    run_load(config, &paths).await
}

async fn run_load(config: SoundConfig, paths: &[String]) -> Result<()> {
    let engine: Rc<dyn AudioEngine> = Rc::new(OfflineEngine::new());
    let mut sound = Sound::new(config, engine);
    sound.load(paths).await;

    match sound.preload_state() {
        resonance::PreloadState::Loaded => {
            println!("Loaded {} sound(s):", sound.loaded().len());
            for item in &sound {
                println!(
                    "  {} ({:.2}s, {} ch @ {} Hz)",
                    item.name(),
                    item.buffer().duration(),
                    item.buffer().num_channels(),
                    item.buffer().sample_rate(),
                );
            }
            Ok(())
        }
        state => bail!("load did not complete: state is {}", state),
    }
}
