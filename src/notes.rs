//! Note resolution: jamo → note → frequency, and pointer → expression.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::hangeul::DecomposedSyllable;
use crate::jamo::{consonant_entry, vowel_entry, JamoEntry};
use crate::params::ExpressionMapping;

/// Frequency used for note letters the table does not know (A4)
pub const FALLBACK_FREQUENCY_HZ: f64 = 440.0;

/// Octave the base frequency table is defined at
const BASE_OCTAVE: i32 = 4;

/// Natural note letters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteLetter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl NoteLetter {
    /// Parse a note letter ("C".."B")
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "C" => Some(Self::C),
            "D" => Some(Self::D),
            "E" => Some(Self::E),
            "F" => Some(Self::F),
            "G" => Some(Self::G),
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
            Self::G => "G",
            Self::A => "A",
            Self::B => "B",
        }
    }

    /// Equal-temperament frequency at octave 4 (Hz)
    pub fn base_frequency(self) -> f64 {
        match self {
            Self::C => 261.63,
            Self::D => 293.66,
            Self::E => 329.63,
            Self::F => 349.23,
            Self::G => 392.00,
            Self::A => 440.00,
            Self::B => 493.88,
        }
    }

    /// Frequency of this note at `octave` (Hz)
    pub fn frequency(self, octave: i32) -> f64 {
        self.base_frequency() * 2f64.powi(octave - BASE_OCTAVE)
    }
}

impl fmt::Display for NoteLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Frequency of a note given by its letter. Unknown letters use the A4 base
/// (440 Hz) instead of failing.
pub fn frequency(note: &str, octave: i32) -> f64 {
    let base =
        NoteLetter::from_symbol(note).map_or(FALLBACK_FREQUENCY_HZ, NoteLetter::base_frequency);
    base * 2f64.powi(octave - BASE_OCTAVE)
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Sawtooth,
}

/// Which part of the syllable a note came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Consonant,
    Vowel,
}

impl Role {
    /// Consonants sound harmonically rich, vowels pure
    pub fn waveform(self) -> Waveform {
        match self {
            Self::Consonant => Waveform::Sawtooth,
            Self::Vowel => Waveform::Sine,
        }
    }
}

/// A note derived from one jamo
#[derive(Debug, Clone, PartialEq)]
pub struct NoteEvent {
    pub note: NoteLetter,
    pub octave: i32,
    /// Unbent frequency (Hz)
    pub frequency: f64,
    pub role: Role,
    pub jamo: char,
    pub display_name: &'static str,
}

impl NoteEvent {
    pub fn new(entry: &JamoEntry, role: Role, jamo: char) -> Self {
        Self {
            note: entry.note,
            octave: entry.octave,
            frequency: entry.note.frequency(entry.octave),
            role,
            jamo,
            display_name: entry.display_name,
        }
    }
}

/// Notes for a syllable: the leading consonant's note, then the vowel's.
/// Jamo without a mapping (and the trailing consonant) produce nothing.
pub fn note_events(syllable: &DecomposedSyllable) -> Vec<NoteEvent> {
    let consonant = consonant_entry(syllable.leading)
        .map(|entry| NoteEvent::new(entry, Role::Consonant, syllable.leading));
    let vowel =
        vowel_entry(syllable.vowel).map(|entry| NoteEvent::new(entry, Role::Vowel, syllable.vowel));

    consonant.into_iter().chain(vowel).collect()
}

/// Normalized pointer position, both axes in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl Default for PointerPosition {
    fn default() -> Self {
        Self { x: 0.5, y: 0.5 }
    }
}

impl PointerPosition {
    /// Create a position, clamping both axes into [0, 1]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: clamp_unit(x),
            y: clamp_unit(y),
        }
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.5
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Play-time modifiers derived from the pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Expression {
    /// Vertical shift in [-1, 1]
    pub octave_shift: f64,
    /// Multiplier applied to the note frequency
    pub pitch_factor: f64,
    /// Peak gain of the note (linear)
    pub volume: f64,
}

impl Expression {
    pub fn from_pointer(pointer: PointerPosition, mapping: &ExpressionMapping) -> Self {
        let octave_shift = (pointer.y - 0.5) * 2.0;
        let pitch_factor = 2f64.powf(octave_shift * mapping.bend_octaves_per_shift);
        let volume = mapping.volume_floor + pointer.x * mapping.volume_span;

        Self {
            octave_shift,
            pitch_factor,
            volume,
        }
    }

    /// Frequency actually played for a note (Hz)
    pub fn bend(&self, frequency: f64) -> f64 {
        frequency * self.pitch_factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hangeul::decompose;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_frequency_table() {
        assert_eq!(frequency("A", 4), 440.0);
        assert_eq!(frequency("A", 5), 880.0);
        assert_eq!(frequency("A", 3), 220.0);
        assert_eq!(frequency("C", 4), 261.63);
        assert_eq!(frequency("B", 4), 493.88);
    }

    #[test]
    fn test_note_letter_symbols() {
        for letter in [NoteLetter::C, NoteLetter::E, NoteLetter::B] {
            assert_eq!(NoteLetter::from_symbol(letter.symbol()), Some(letter));
        }
        assert_eq!(format!("{}{}", NoteLetter::G, 5), "G5");
    }

    #[test]
    fn test_unknown_letter_falls_back_to_a4() {
        assert_eq!(frequency("Z", 4), 440.0);
        assert_eq!(frequency("", 4), 440.0);
        assert_eq!(frequency("Z", 5), 880.0);
    }

    #[test]
    fn test_center_pointer_has_no_bend() {
        let expression =
            Expression::from_pointer(PointerPosition::new(0.5, 0.5), &ExpressionMapping::default());
        assert_eq!(expression.octave_shift, 0.0);
        assert_eq!(expression.pitch_factor, 1.0);
        assert!((expression.volume - 0.3).abs() < EPSILON);
    }

    #[test]
    fn test_corner_pointer_bends_half_octave() {
        let expression =
            Expression::from_pointer(PointerPosition::new(1.0, 1.0), &ExpressionMapping::default());
        assert_eq!(expression.octave_shift, 1.0);
        assert!((expression.pitch_factor - 2f64.sqrt()).abs() < EPSILON);
        assert!((expression.volume - 0.5).abs() < EPSILON);
        assert!((expression.bend(440.0) - 440.0 * 2f64.sqrt()).abs() < EPSILON);
    }

    #[test]
    fn test_origin_pointer_is_quiet_and_low() {
        let expression =
            Expression::from_pointer(PointerPosition::new(0.0, 0.0), &ExpressionMapping::default());
        assert!((expression.pitch_factor - 2f64.powf(-0.5)).abs() < EPSILON);
        assert!((expression.volume - 0.1).abs() < EPSILON);
    }

    #[test]
    fn test_pointer_is_clamped() {
        let pointer = PointerPosition::new(-3.0, 7.5);
        assert_eq!(pointer, PointerPosition { x: 0.0, y: 1.0 });
        assert_eq!(PointerPosition::new(f64::NAN, 0.2).x, 0.5);
    }

    #[test]
    fn test_consonant_is_sawtooth_vowel_is_sine() {
        assert_eq!(Role::Consonant.waveform(), Waveform::Sawtooth);
        assert_eq!(Role::Vowel.waveform(), Waveform::Sine);
    }

    #[test]
    fn test_note_events_for_han() {
        let events = note_events(&decompose('한').unwrap());
        assert_eq!(events.len(), 2);

        assert_eq!(events[0].role, Role::Consonant);
        assert_eq!(events[0].jamo, 'ㅎ');
        assert_eq!(events[0].note, NoteLetter::B);
        assert_eq!(events[0].octave, 5);
        assert_eq!(events[0].frequency, 987.76);

        assert_eq!(events[1].role, Role::Vowel);
        assert_eq!(events[1].jamo, 'ㅏ');
        assert_eq!(events[1].display_name, "중간도");
    }

    #[test]
    fn test_unmapped_jamo_produce_no_notes() {
        // 깨 = ㄲ + ㅐ: neither jamo carries a note
        assert!(note_events(&decompose('깨').unwrap()).is_empty());

        // 개 = ㄱ + ㅐ: consonant only
        let events = note_events(&decompose('개').unwrap());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].role, Role::Consonant);
    }
}
