//! Tests for the events module.

use colloquy_realtime::{ErrorInfo, ServerEvent};

#[test]
fn test_audio_delta_serializes_as_base64() {
    let event = ServerEvent::AudioDelta { event_id: "evt_1".to_string(), delta: b"hello".to_vec() };

    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("response.audio.delta"));
    // Audio is base64-encoded on the wire
    assert!(json.contains("aGVsbG8=")); // base64("hello")
}

#[test]
fn test_audio_delta_deserialization() {
    let json = r#"{
        "type": "response.audio.delta",
        "event_id": "evt_123",
        "delta": "aGVsbG8="
    }"#;

    let event: ServerEvent = serde_json::from_str(json).unwrap();
    match event {
        ServerEvent::AudioDelta { event_id, delta } => {
            assert_eq!(event_id, "evt_123");
            assert_eq!(delta, b"hello"); // decoded from base64
        }
        _ => panic!("Expected AudioDelta event"),
    }
}

#[test]
fn test_audio_delta_roundtrip() {
    let original =
        ServerEvent::AudioDelta { event_id: "evt_1".to_string(), delta: vec![0x00, 0x01, 0x02, 0xFF] };

    let json = serde_json::to_string(&original).unwrap();
    let deserialized: ServerEvent = serde_json::from_str(&json).unwrap();

    match deserialized {
        ServerEvent::AudioDelta { delta, .. } => {
            assert_eq!(delta, vec![0x00, 0x01, 0x02, 0xFF]);
        }
        _ => panic!("Expected AudioDelta"),
    }
}

#[test]
fn test_interrupted_deserialization() {
    let json = r#"{
        "type": "response.interrupted",
        "event_id": "evt_9"
    }"#;

    let event: ServerEvent = serde_json::from_str(json).unwrap();
    assert!(matches!(event, ServerEvent::Interrupted { .. }));
}

#[test]
fn test_turn_complete_deserialization() {
    let json = r#"{
        "type": "response.turn_complete",
        "event_id": "evt_10"
    }"#;

    let event: ServerEvent = serde_json::from_str(json).unwrap();
    assert!(matches!(event, ServerEvent::TurnComplete { .. }));
}

#[test]
fn test_session_ready_deserialization() {
    let json = r#"{
        "type": "session.ready",
        "event_id": "evt_001",
        "session": {
            "setupComplete": {}
        }
    }"#;

    let event: ServerEvent = serde_json::from_str(json).unwrap();
    match event {
        ServerEvent::SessionReady { event_id, session } => {
            assert_eq!(event_id, "evt_001");
            assert!(session.get("setupComplete").is_some());
        }
        _ => panic!("Expected SessionReady event"),
    }
}

#[test]
fn test_error_event_deserialization() {
    let json = r#"{
        "type": "error",
        "event_id": "evt_123",
        "error": {
            "code": "rate_limit",
            "message": "Too many requests"
        }
    }"#;

    let event: ServerEvent = serde_json::from_str(json).unwrap();
    match event {
        ServerEvent::Error { error, .. } => {
            assert_eq!(error.code, Some("rate_limit".to_string()));
            assert_eq!(error.message, "Too many requests");
        }
        _ => panic!("Expected Error event"),
    }
}

#[test]
fn test_go_away_without_time_left() {
    let json = r#"{
        "type": "session.go_away",
        "event_id": "evt_5"
    }"#;

    let event: ServerEvent = serde_json::from_str(json).unwrap();
    match event {
        ServerEvent::GoAway { time_left, .. } => assert!(time_left.is_none()),
        _ => panic!("Expected GoAway event"),
    }
}

#[test]
fn test_unknown_event_type() {
    let json = r#"{
        "type": "some.unknown.event",
        "data": "whatever"
    }"#;

    let event: ServerEvent = serde_json::from_str(json).unwrap();
    assert!(matches!(event, ServerEvent::Unknown));
}

#[test]
fn test_error_info_message_constructor() {
    let info = ErrorInfo::message("boom");
    assert!(info.code.is_none());
    assert_eq!(info.message, "boom");
}
