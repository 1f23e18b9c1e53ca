//! Gemini Live session smoke test.
//!
//! Connects to the Gemini Live API, sends a text prompt, and writes the
//! synthesized audio response (24kHz PCM) to a file.
//!
//! # Usage
//!
//! ```bash
//! export GOOGLE_API_KEY="your-api-key"
//! cargo run --example live_session
//! ```

use colloquy_realtime::gemini::GeminiLiveModel;
use colloquy_realtime::{LiveConfig, LiveModel, ServerEvent};

use std::io::Write;
use std::process::ExitCode;
use tracing::{error, info, warn};

const TEST_PROMPT: &str = "Hello! Please introduce yourself briefly.";
const OUTPUT_FILE: &str = "live_session.pcm";

async fn run_session(api_key: &str) -> Result<(), Box<dyn std::error::Error>> {
    let model = GeminiLiveModel::with_default_model(api_key);
    info!(model_id = model.model_id(), provider = model.provider(), "Model configured");

    let config = LiveConfig::default()
        .with_instruction("You are a friendly assistant. Respond naturally and concisely.")
        .with_audio_only();

    info!("Connecting to Gemini Live API...");
    let session = model.connect(config).await?;
    info!(session_id = session.session_id(), "Connected");

    info!(prompt = TEST_PROMPT, "Sending text prompt...");
    session.send_text(TEST_PROMPT).await?;

    let mut file = std::fs::File::create(OUTPUT_FILE)?;
    let mut audio_chunks_received = 0usize;

    let deadline = tokio::time::Duration::from_secs(30);
    let start = tokio::time::Instant::now();

    loop {
        if start.elapsed() > deadline {
            warn!("Timeout waiting for response");
            break;
        }

        match tokio::time::timeout(tokio::time::Duration::from_secs(5), session.next_event()).await
        {
            Ok(Some(Ok(event))) => match event {
                ServerEvent::SessionReady { .. } => {
                    info!("Session ready");
                }
                ServerEvent::AudioDelta { delta, .. } => {
                    audio_chunks_received += 1;
                    file.write_all(&delta)?;
                    info!(chunk = audio_chunks_received, bytes = delta.len(), "Received audio");
                }
                ServerEvent::TextDelta { delta, .. } => {
                    info!(text = %delta, "Received text delta");
                }
                ServerEvent::Interrupted { .. } => {
                    info!("Playback interrupted by the server");
                }
                ServerEvent::TurnComplete { .. } => {
                    info!("Turn complete");
                    break;
                }
                ServerEvent::GoAway { time_left, .. } => {
                    warn!(?time_left, "Server is about to drop the connection");
                }
                ServerEvent::Error { error, .. } => {
                    error!(error = %error.message, "Server error");
                    break;
                }
                ServerEvent::Unknown => {}
            },
            Ok(Some(Err(e))) => {
                error!(error = %e, "Event error");
                break;
            }
            Ok(None) => {
                info!("Session closed by server");
                break;
            }
            Err(_) => {
                // Timeout on single event, keep waiting
                continue;
            }
        }
    }

    info!(audio_chunks = audio_chunks_received, file = OUTPUT_FILE, "Done");
    session.close().await?;
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

    match run_session(&api_key).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Session failed");
            ExitCode::FAILURE
        }
    }
}
