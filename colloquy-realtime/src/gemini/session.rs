use crate::audio::AudioChunk;
use crate::config::LiveConfig;
use crate::error::{LiveError, Result};
use crate::events::{ErrorInfo, ServerEvent};
use crate::session::LiveSession;
use async_trait::async_trait;
use base64::prelude::*;
use futures::stream::Stream;
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use serde_json::{Value, json};
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use super::GEMINI_LIVE_URL;

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;
type WsSink = futures::stream::SplitSink<WsStream, Message>;
type WsSource = futures::stream::SplitStream<WsStream>;

/// Gemini-specific client message format.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiClientMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    setup: Option<GeminiSetup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    realtime_input: Option<GeminiRealtimeInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    client_content: Option<GeminiClientContent>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiSetup {
    model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Serialize)]
struct GeminiPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRealtimeInput {
    media_chunks: Vec<GeminiMediaChunk>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiMediaChunk {
    mime_type: String,
    data: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiClientContent {
    turns: Vec<GeminiTurn>,
    turn_complete: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiTurn {
    role: String,
    parts: Vec<GeminiPart>,
}

/// Gemini Live session.
///
/// Manages a WebSocket connection to Google's Gemini Live API.
pub struct GeminiLiveSession {
    session_id: String,
    connected: Arc<AtomicBool>,
    sender: Arc<Mutex<WsSink>>,
    receiver: Arc<Mutex<WsSource>>,
}

impl GeminiLiveSession {
    /// Connect to the Gemini Live API and send the setup message.
    ///
    /// The WebSocket handshake is bounded by `config.connect_timeout()`.
    pub async fn connect(api_key: &str, model: &str, config: LiveConfig) -> Result<Self> {
        let connect_timeout = config.connect_timeout();
        let url = format!("{}?key={}", GEMINI_LIVE_URL, api_key);
        let request = url
            .into_client_request()
            .map_err(|e| LiveError::connection(format!("Failed to create client request: {}", e)))?;

        let (stream, _response) = tokio::time::timeout(connect_timeout, connect_async(request))
            .await
            .map_err(|_| {
                LiveError::timeout(format!(
                    "WebSocket handshake did not complete within {:?}",
                    connect_timeout
                ))
            })?
            .map_err(|e| LiveError::connection(format!("WebSocket connect error: {}", e)))?;

        let (sink, source) = stream.split();

        let session = Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            connected: Arc::new(AtomicBool::new(true)),
            sender: Arc::new(Mutex::new(sink)),
            receiver: Arc::new(Mutex::new(source)),
        };

        session.send_setup(model, config).await?;

        Ok(session)
    }

    /// Send initial setup message.
    async fn send_setup(&self, model: &str, config: LiveConfig) -> Result<()> {
        let mut generation_config = json!({
            "responseModalities": config.modalities.unwrap_or_else(|| vec!["AUDIO".to_string()]),
        });

        if let Some(voice) = &config.voice {
            generation_config["speechConfig"] = json!({
                "voiceConfig": {
                    "prebuiltVoiceConfig": {
                        "voiceName": voice
                    }
                }
            });
        }

        if let Some(temp) = config.temperature {
            generation_config["temperature"] = json!(temp);
        }

        let system_instruction = config
            .instruction
            .map(|text| GeminiContent { parts: vec![GeminiPart { text: Some(text) }] });

        let setup = GeminiClientMessage {
            setup: Some(GeminiSetup {
                model: model.to_string(),
                system_instruction,
                generation_config: Some(generation_config),
            }),
            realtime_input: None,
            client_content: None,
        };

        tracing::info!(model_id = %model, "Sending setup message");
        self.send_raw(&setup).await
    }

    /// Send a raw message.
    async fn send_raw<T: Serialize>(&self, value: &T) -> Result<()> {
        if !self.is_connected() {
            return Err(LiveError::NotConnected);
        }

        let msg = serde_json::to_string(value)
            .map_err(|e| LiveError::protocol(format!("JSON serialize error: {}", e)))?;

        let mut sender = self.sender.lock().await;
        sender
            .send(Message::Text(msg))
            .await
            .map_err(|e| LiveError::connection(format!("Send error: {}", e)))?;

        Ok(())
    }

    /// Receive and parse the next message.
    async fn receive_raw(&self) -> Option<Result<ServerEvent>> {
        let mut receiver = self.receiver.lock().await;

        match receiver.next().await {
            Some(Ok(Message::Text(text))) => Some(translate_gemini_event(&text)),
            Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes) {
                Ok(text) => Some(translate_gemini_event(&text)),
                Err(e) => {
                    Some(Err(LiveError::protocol(format!("Invalid UTF-8 in binary message: {}", e))))
                }
            },
            Some(Ok(Message::Close(_))) => {
                self.connected.store(false, Ordering::SeqCst);
                None
            }
            Some(Ok(_)) => Some(Ok(ServerEvent::Unknown)),
            Some(Err(e)) => {
                self.connected.store(false, Ordering::SeqCst);
                Some(Err(LiveError::connection(format!("Receive error: {}", e))))
            }
            None => {
                self.connected.store(false, Ordering::SeqCst);
                None
            }
        }
    }
}

/// Translate Gemini-specific wire messages to unified events.
fn translate_gemini_event(raw: &str) -> Result<ServerEvent> {
    tracing::debug!(%raw, "Translating Gemini event");
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| LiveError::protocol(format!("Parse error: {}", e)))?;

    // Setup acknowledgement: the session is open for audio.
    if value.get("setupComplete").is_some() {
        return Ok(ServerEvent::SessionReady {
            event_id: uuid::Uuid::new_v4().to_string(),
            session: value,
        });
    }

    if let Some(content) = value.get("serverContent") {
        // The user spoke over the model; scheduled playback must be cut.
        if content.get("interrupted").and_then(|i| i.as_bool()).unwrap_or(false) {
            return Ok(ServerEvent::Interrupted { event_id: uuid::Uuid::new_v4().to_string() });
        }

        if content.get("turnComplete").and_then(|t| t.as_bool()).unwrap_or(false) {
            return Ok(ServerEvent::TurnComplete { event_id: uuid::Uuid::new_v4().to_string() });
        }

        if let Some(parts) = content.get("modelTurn").and_then(|t| t.get("parts")) {
            if let Some(parts_arr) = parts.as_array() {
                for part in parts_arr {
                    // Audio output
                    if let Some(inline_data) = part.get("inlineData") {
                        if let Some(data) = inline_data.get("data").and_then(|d| d.as_str()) {
                            let decoded = BASE64_STANDARD.decode(data).map_err(|e| {
                                LiveError::protocol(format!("Invalid audio payload: {}", e))
                            })?;
                            return Ok(ServerEvent::AudioDelta {
                                event_id: uuid::Uuid::new_v4().to_string(),
                                delta: decoded,
                            });
                        }
                    }
                    // Text output
                    if let Some(text) = part.get("text").and_then(|t| t.as_str()) {
                        return Ok(ServerEvent::TextDelta {
                            event_id: uuid::Uuid::new_v4().to_string(),
                            delta: text.to_string(),
                        });
                    }
                }
            }
        }
    }

    // The server will drop the connection soon.
    if let Some(go_away) = value.get("goAway") {
        return Ok(ServerEvent::GoAway {
            event_id: uuid::Uuid::new_v4().to_string(),
            time_left: go_away.get("timeLeft").and_then(|t| t.as_str()).map(String::from),
        });
    }

    if let Some(error) = value.get("error") {
        return Ok(ServerEvent::Error {
            event_id: uuid::Uuid::new_v4().to_string(),
            error: ErrorInfo {
                code: error
                    .get("code")
                    .map(|c| c.as_str().map(String::from).unwrap_or_else(|| c.to_string())),
                message: error
                    .get("message")
                    .and_then(|m| m.as_str())
                    .unwrap_or("unknown server error")
                    .to_string(),
            },
        });
    }

    Ok(ServerEvent::Unknown)
}

#[async_trait]
impl LiveSession for GeminiLiveSession {
    fn session_id(&self) -> &str {
        &self.session_id
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn send_audio(&self, audio: &AudioChunk) -> Result<()> {
        self.send_audio_base64(&audio.to_base64(), &audio.format.mime_type()).await
    }

    async fn send_audio_base64(&self, audio_base64: &str, mime_type: &str) -> Result<()> {
        let msg = GeminiClientMessage {
            setup: None,
            realtime_input: Some(GeminiRealtimeInput {
                media_chunks: vec![GeminiMediaChunk {
                    mime_type: mime_type.to_string(),
                    data: audio_base64.to_string(),
                }],
            }),
            client_content: None,
        };
        self.send_raw(&msg).await
    }

    async fn send_text(&self, text: &str) -> Result<()> {
        let msg = GeminiClientMessage {
            setup: None,
            realtime_input: None,
            client_content: Some(GeminiClientContent {
                turns: vec![GeminiTurn {
                    role: "user".to_string(),
                    parts: vec![GeminiPart { text: Some(text.to_string()) }],
                }],
                turn_complete: true,
            }),
        };
        self.send_raw(&msg).await
    }

    async fn next_event(&self) -> Option<Result<ServerEvent>> {
        self.receive_raw().await
    }

    fn events(&self) -> Pin<Box<dyn Stream<Item = Result<ServerEvent>> + Send + '_>> {
        Box::pin(futures::stream::unfold(self, |session| async move {
            let event = session.receive_raw().await?;
            Some((event, session))
        }))
    }

    async fn close(&self) -> Result<()> {
        // swap makes the second close a no-op rather than a double Close frame
        if !self.connected.swap(false, Ordering::SeqCst) {
            return Ok(());
        }

        let mut sender = self.sender.lock().await;
        if let Err(e) = sender.send(Message::Close(None)).await {
            // The peer may already have dropped the connection; closing is
            // best-effort and must not fail the teardown sequence.
            tracing::warn!(error = %e, "Close frame could not be delivered");
        }

        Ok(())
    }
}

impl std::fmt::Debug for GeminiLiveSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiLiveSession")
            .field("session_id", &self.session_id)
            .field("connected", &self.connected.load(Ordering::SeqCst))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_setup_complete() {
        let event = translate_gemini_event(r#"{"setupComplete": {}}"#).unwrap();
        assert!(matches!(event, ServerEvent::SessionReady { .. }));
    }

    #[test]
    fn test_translate_audio_part() {
        let raw = r#"{
            "serverContent": {
                "modelTurn": {
                    "parts": [
                        { "inlineData": { "mimeType": "audio/pcm;rate=24000", "data": "aGVsbG8=" } }
                    ]
                }
            }
        }"#;
        match translate_gemini_event(raw).unwrap() {
            ServerEvent::AudioDelta { delta, .. } => assert_eq!(delta, b"hello"),
            other => panic!("Expected AudioDelta, got {:?}", other),
        }
    }

    #[test]
    fn test_translate_text_part() {
        let raw = r#"{"serverContent": {"modelTurn": {"parts": [{"text": "hi there"}]}}}"#;
        match translate_gemini_event(raw).unwrap() {
            ServerEvent::TextDelta { delta, .. } => assert_eq!(delta, "hi there"),
            other => panic!("Expected TextDelta, got {:?}", other),
        }
    }

    #[test]
    fn test_translate_interrupted_takes_priority_over_model_turn() {
        let raw = r#"{
            "serverContent": {
                "interrupted": true,
                "modelTurn": { "parts": [{ "text": "stale" }] }
            }
        }"#;
        let event = translate_gemini_event(raw).unwrap();
        assert!(matches!(event, ServerEvent::Interrupted { .. }));
    }

    #[test]
    fn test_translate_turn_complete() {
        let raw = r#"{"serverContent": {"turnComplete": true}}"#;
        let event = translate_gemini_event(raw).unwrap();
        assert!(matches!(event, ServerEvent::TurnComplete { .. }));
    }

    #[test]
    fn test_translate_go_away() {
        let raw = r#"{"goAway": {"timeLeft": "10s"}}"#;
        match translate_gemini_event(raw).unwrap() {
            ServerEvent::GoAway { time_left, .. } => assert_eq!(time_left.as_deref(), Some("10s")),
            other => panic!("Expected GoAway, got {:?}", other),
        }
    }

    #[test]
    fn test_translate_error_frame() {
        let raw = r#"{"error": {"code": 429, "message": "quota exceeded"}}"#;
        match translate_gemini_event(raw).unwrap() {
            ServerEvent::Error { error, .. } => {
                assert_eq!(error.code.as_deref(), Some("429"));
                assert_eq!(error.message, "quota exceeded");
            }
            other => panic!("Expected Error, got {:?}", other),
        }
    }

    #[test]
    fn test_translate_unknown_message() {
        let event = translate_gemini_event(r#"{"usageMetadata": {"totalTokens": 5}}"#).unwrap();
        assert!(matches!(event, ServerEvent::Unknown));
    }

    #[test]
    fn test_translate_invalid_audio_payload_is_protocol_error() {
        let raw = r#"{
            "serverContent": {
                "modelTurn": { "parts": [{ "inlineData": { "mimeType": "audio/pcm", "data": "!!" } }] }
            }
        }"#;
        assert!(matches!(translate_gemini_event(raw), Err(LiveError::MessageError(_))));
    }

    #[test]
    fn test_translate_rejects_invalid_json() {
        assert!(matches!(translate_gemini_event("not json"), Err(LiveError::MessageError(_))));
    }

    #[test]
    fn test_setup_message_shape() {
        let config = LiveConfig::default().with_voice("Zephyr").with_instruction("Be brief.");

        let mut generation_config = json!({
            "responseModalities": config.modalities.clone().unwrap_or_else(|| vec!["AUDIO".to_string()]),
        });
        if let Some(voice) = &config.voice {
            generation_config["speechConfig"] =
                json!({ "voiceConfig": { "prebuiltVoiceConfig": { "voiceName": voice } } });
        }

        let setup = GeminiClientMessage {
            setup: Some(GeminiSetup {
                model: "models/test".to_string(),
                system_instruction: config
                    .instruction
                    .map(|text| GeminiContent { parts: vec![GeminiPart { text: Some(text) }] }),
                generation_config: Some(generation_config),
            }),
            realtime_input: None,
            client_content: None,
        };

        let wire: Value = serde_json::to_value(&setup).unwrap();
        assert_eq!(wire["setup"]["model"], "models/test");
        assert_eq!(wire["setup"]["generationConfig"]["responseModalities"][0], "AUDIO");
        assert_eq!(
            wire["setup"]["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]
                ["voiceName"],
            "Zephyr"
        );
        assert_eq!(wire["setup"]["systemInstruction"]["parts"][0]["text"], "Be brief.");
        // Absent message kinds must not appear on the wire at all.
        assert!(wire.get("realtimeInput").is_none());
    }

    #[test]
    fn test_realtime_input_message_shape() {
        let msg = GeminiClientMessage {
            setup: None,
            realtime_input: Some(GeminiRealtimeInput {
                media_chunks: vec![GeminiMediaChunk {
                    mime_type: "audio/pcm;rate=16000".to_string(),
                    data: "AAAA".to_string(),
                }],
            }),
            client_content: None,
        };

        let wire: Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(wire["realtimeInput"]["mediaChunks"][0]["mimeType"], "audio/pcm;rate=16000");
        assert_eq!(wire["realtimeInput"]["mediaChunks"][0]["data"], "AAAA");
        assert!(wire.get("setup").is_none());
    }
}
