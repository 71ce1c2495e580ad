//! Wire messages exchanged with the visualization host.
//!
//! Outbound messages are JSON objects tagged by a `type` field and sent as
//! WebSocket text frames:
//! - `connection`: announcement sent right after the socket opens.
//! - `hangeul_input`: one per decomposed syllable, carrying the jamo, the
//!   notes they map to and the pointer position at the time of the keystroke.
//!
//! Inbound frames are never interpreted. They are re-encoded for the debug
//! log when they parse as JSON and logged raw otherwise.

use serde::{Deserialize, Serialize};

use crate::hangeul::DecomposedSyllable;
use crate::notes::{NoteEvent, NoteLetter, PointerPosition, Role};

/// Announcement text carried by the `connection` message
pub const CONNECTION_ANNOUNCEMENT: &str = "Web client connected";

/// Messages sent to the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// Handshake sent when the socket opens.
    Connection { message: String, timestamp: u64 },
    /// A typed syllable and the notes it produced.
    HangeulInput {
        /// Leading + vowel + trailing jamo, concatenated
        #[serde(rename = "char")]
        character: String,
        decomposed: DecomposedPayload,
        notes: Vec<NotePayload>,
        mouse: MousePayload,
        timestamp: u64,
    },
}

impl OutboundMessage {
    pub fn connection(timestamp: u64) -> Self {
        Self::Connection {
            message: CONNECTION_ANNOUNCEMENT.to_string(),
            timestamp,
        }
    }

    pub fn hangeul_input(
        syllable: &DecomposedSyllable,
        notes: &[NoteEvent],
        pointer: PointerPosition,
        timestamp: u64,
    ) -> Self {
        Self::HangeulInput {
            character: syllable.jamo_string(),
            decomposed: DecomposedPayload::from(syllable),
            notes: notes.iter().map(NotePayload::from).collect(),
            mouse: MousePayload {
                x: pointer.x,
                y: pointer.y,
            },
            timestamp,
        }
    }
}

/// Jamo of a syllable; `final` is empty when there is no trailing consonant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecomposedPayload {
    pub consonant: String,
    pub vowel: String,
    #[serde(rename = "final")]
    pub final_consonant: String,
}

impl From<&DecomposedSyllable> for DecomposedPayload {
    fn from(syllable: &DecomposedSyllable) -> Self {
        Self {
            consonant: syllable.leading.to_string(),
            vowel: syllable.vowel.to_string(),
            final_consonant: syllable.trailing.map(String::from).unwrap_or_default(),
        }
    }
}

/// One note as seen by the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NotePayload {
    pub note: NoteLetter,
    pub octave: i32,
    pub frequency: f64,
    #[serde(rename = "type")]
    pub role: Role,
    pub jamo: String,
    pub name: String,
}

impl From<&NoteEvent> for NotePayload {
    fn from(event: &NoteEvent) -> Self {
        Self {
            note: event.note,
            octave: event.octave,
            frequency: event.frequency,
            role: event.role,
            jamo: event.jamo.to_string(),
            name: event.display_name.to_string(),
        }
    }
}

/// Pointer position, both axes normalized to [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MousePayload {
    pub x: f64,
    pub y: f64,
}

/// Render an inbound frame for the debug log.
pub fn describe_inbound(text: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(value) => value.to_string(),
        Err(_) => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hangeul::decompose;
    use crate::notes::note_events;
    use serde_json::json;

    #[test]
    fn test_connection_message_shape() {
        let value = serde_json::to_value(OutboundMessage::connection(1_700_000_000_000)).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "connection",
                "message": "Web client connected",
                "timestamp": 1_700_000_000_000u64
            })
        );
    }

    #[test]
    fn test_hangeul_input_shape() {
        let syllable = decompose('한').unwrap();
        let notes = note_events(&syllable);
        let message =
            OutboundMessage::hangeul_input(&syllable, &notes, PointerPosition::new(0.25, 0.75), 42);

        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "hangeul_input",
                "char": "ㅎㅏㄴ",
                "decomposed": { "consonant": "ㅎ", "vowel": "ㅏ", "final": "ㄴ" },
                "notes": [
                    {
                        "note": "B",
                        "octave": 5,
                        "frequency": 987.76,
                        "type": "consonant",
                        "jamo": "ㅎ",
                        "name": "높은시"
                    },
                    {
                        "note": "C",
                        "octave": 4,
                        "frequency": 261.63,
                        "type": "vowel",
                        "jamo": "ㅏ",
                        "name": "중간도"
                    }
                ],
                "mouse": { "x": 0.25, "y": 0.75 },
                "timestamp": 42
            })
        );
    }

    #[test]
    fn test_empty_final_consonant() {
        let payload = DecomposedPayload::from(&decompose('가').unwrap());
        assert_eq!(payload.final_consonant, "");
    }

    #[test]
    fn test_describe_inbound() {
        assert_eq!(describe_inbound(r#"{ "ack": true }"#), r#"{"ack":true}"#);
        assert_eq!(describe_inbound("plain text"), "plain text");
    }
}
