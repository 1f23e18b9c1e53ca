//! Live voice conversation on desktop audio.
//!
//! Captures the default microphone, streams it to the Gemini Live API, and
//! plays the synthesized replies on the default output device.
//!
//! # Usage
//!
//! ```bash
//! export GOOGLE_API_KEY="your-api-key"
//! cargo run --example converse --features desktop-audio
//! ```

use colloquy_audio::{Conversation, device};
use colloquy_realtime::LiveConfig;
use colloquy_realtime::gemini::GeminiLiveModel;

use std::process::ExitCode;
use tracing::{error, info};

async fn run(api_key: &str) -> Result<(), Box<dyn std::error::Error>> {
    let model = GeminiLiveModel::with_default_model(api_key);
    let (capture, sink, clock) = device::desktop_io()?;

    let config = LiveConfig::default()
        .with_instruction("You are a friendly voice assistant. Keep replies short.")
        .with_voice("Zephyr")
        .with_audio_only();

    let mut conversation = Conversation::new();
    conversation.start(&model, Box::new(capture), sink, clock, config).await?;
    info!("Conversation open — speak into the microphone, Ctrl-C to stop.");

    tokio::select! {
        result = conversation.run() => result?,
        _ = tokio::signal::ctrl_c() => info!("Stopping..."),
    }

    conversation.stop().await;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let api_key = match std::env::var("GOOGLE_API_KEY") {
        Ok(key) => key,
        Err(_) => {
            eprintln!("GOOGLE_API_KEY is not set");
            return ExitCode::FAILURE;
        }
    };

    match run(&api_key).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Conversation failed");
            ExitCode::FAILURE
        }
    }
}
