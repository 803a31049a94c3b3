//! Event types flowing into the session controller
//!
//! The recognition boundary emits `RecognitionEvent`s; query workers emit
//! completions. Both are merged into the controller's single input stream
//! as `SessionInput`.

use serde::{Deserialize, Serialize};

/// Events produced by the speech recognition boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecognitionEvent {
    /// The wake word was heard
    WakeDetected,

    /// A full utterance was recognized (already lowercased and trimmed)
    TextRecognized {
        /// The recognized utterance
        text: String,
    },
}

impl std::fmt::Display for RecognitionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecognitionEvent::WakeDetected => write!(f, "WAKE_DETECTED"),
            RecognitionEvent::TextRecognized { text } => {
                write!(f, "TEXT_RECOGNIZED ({text:?})")
            }
        }
    }
}

/// The controller's merged input stream
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "input", rename_all = "snake_case")]
pub enum SessionInput {
    /// An event from the recognition source
    Recognition(RecognitionEvent),

    /// A query worker finished; failures arrive as fallback response text
    QueryCompleted {
        /// The response to speak
        response: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognition_event_serialization() {
        let event = RecognitionEvent::TextRecognized {
            text: "what time is it".into(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("text_recognized"));
        assert!(json.contains("what time is it"));
    }

    #[test]
    fn test_wake_event_deserialization() {
        let json = r#"{"type":"wake_detected"}"#;
        let event: RecognitionEvent = serde_json::from_str(json).unwrap();
        assert!(matches!(event, RecognitionEvent::WakeDetected));
    }

    #[test]
    fn test_query_completion_round_trip() {
        let input = SessionInput::QueryCompleted {
            response: "the sky is blue".into(),
        };
        let json = serde_json::to_string(&input).unwrap();
        let back: SessionInput = serde_json::from_str(&json).unwrap();
        assert!(
            matches!(back, SessionInput::QueryCompleted { response } if response == "the sky is blue")
        );
    }
}
