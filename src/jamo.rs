//! Jamo lookup tables.
//!
//! Two kinds of tables live here:
//! - Ordered index tables used by the syllable arithmetic in `hangeul`. Their
//!   order is the Unicode composition order and must not be changed.
//! - The jamo → note mapping. Only the 14 basic consonants and 10 basic
//!   vowels carry a note; double consonants, compound vowels and clusters do
//!   not sound.

use crate::notes::NoteLetter;

/// Number of vowels in the composition order
pub const VOWEL_COUNT: usize = 21;

/// Number of trailing slots (slot 0 is "no trailing consonant")
pub const TRAILING_COUNT: usize = 28;

/// Leading consonants in composition order (19)
pub const LEADING: [char; 19] = [
    'ㄱ', 'ㄲ', 'ㄴ', 'ㄷ', 'ㄸ', 'ㄹ', 'ㅁ', 'ㅂ', 'ㅃ', 'ㅅ', 'ㅆ', 'ㅇ', 'ㅈ', 'ㅉ', 'ㅊ', 'ㅋ', 'ㅌ',
    'ㅍ', 'ㅎ',
];

/// Vowels in composition order (21)
pub const VOWELS: [char; VOWEL_COUNT] = [
    'ㅏ', 'ㅐ', 'ㅑ', 'ㅒ', 'ㅓ', 'ㅔ', 'ㅕ', 'ㅖ', 'ㅗ', 'ㅘ', 'ㅙ', 'ㅚ', 'ㅛ', 'ㅜ', 'ㅝ', 'ㅞ', 'ㅟ',
    'ㅠ', 'ㅡ', 'ㅢ', 'ㅣ',
];

/// Trailing consonants in composition order (28, slot 0 empty)
pub const TRAILING: [Option<char>; TRAILING_COUNT] = [
    None,
    Some('ㄱ'),
    Some('ㄲ'),
    Some('ㄳ'),
    Some('ㄴ'),
    Some('ㄵ'),
    Some('ㄶ'),
    Some('ㄷ'),
    Some('ㄹ'),
    Some('ㄺ'),
    Some('ㄻ'),
    Some('ㄼ'),
    Some('ㄽ'),
    Some('ㄾ'),
    Some('ㄿ'),
    Some('ㅀ'),
    Some('ㅁ'),
    Some('ㅂ'),
    Some('ㅄ'),
    Some('ㅅ'),
    Some('ㅆ'),
    Some('ㅇ'),
    Some('ㅈ'),
    Some('ㅊ'),
    Some('ㅋ'),
    Some('ㅌ'),
    Some('ㅍ'),
    Some('ㅎ'),
];

/// Musical note assigned to a jamo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JamoEntry {
    /// Solfège name shown next to the jamo
    pub display_name: &'static str,
    pub note: NoteLetter,
    pub octave: i32,
}

const fn entry(display_name: &'static str, note: NoteLetter, octave: i32) -> JamoEntry {
    JamoEntry {
        display_name,
        note,
        octave,
    }
}

/// Consonant mapping: ㄱ..ㅅ walk octave 4, ㅇ..ㅎ walk octave 5
static CONSONANT_NOTES: [(char, JamoEntry); 14] = [
    ('ㄱ', entry("도", NoteLetter::C, 4)),
    ('ㄴ', entry("레", NoteLetter::D, 4)),
    ('ㄷ', entry("미", NoteLetter::E, 4)),
    ('ㄹ', entry("파", NoteLetter::F, 4)),
    ('ㅁ', entry("솔", NoteLetter::G, 4)),
    ('ㅂ', entry("라", NoteLetter::A, 4)),
    ('ㅅ', entry("시", NoteLetter::B, 4)),
    ('ㅇ', entry("높은도", NoteLetter::C, 5)),
    ('ㅈ', entry("높은레", NoteLetter::D, 5)),
    ('ㅊ', entry("높은미", NoteLetter::E, 5)),
    ('ㅋ', entry("높은파", NoteLetter::F, 5)),
    ('ㅌ', entry("높은솔", NoteLetter::G, 5)),
    ('ㅍ', entry("높은라", NoteLetter::A, 5)),
    ('ㅎ', entry("높은시", NoteLetter::B, 5)),
];

static VOWEL_NOTES: [(char, JamoEntry); 10] = [
    ('ㅏ', entry("중간도", NoteLetter::C, 4)),
    ('ㅑ', entry("중간레", NoteLetter::D, 4)),
    ('ㅓ', entry("중간미", NoteLetter::E, 4)),
    ('ㅕ', entry("중간파", NoteLetter::F, 4)),
    ('ㅗ', entry("중간솔", NoteLetter::G, 4)),
    ('ㅛ', entry("중간라", NoteLetter::A, 4)),
    ('ㅜ', entry("중간시", NoteLetter::B, 4)),
    ('ㅠ', entry("높은도", NoteLetter::C, 5)),
    ('ㅡ', entry("높은레", NoteLetter::D, 5)),
    ('ㅣ', entry("높은미", NoteLetter::E, 5)),
];

/// Note for a consonant jamo, if it is one of the 14 mapped consonants
pub fn consonant_entry(jamo: char) -> Option<&'static JamoEntry> {
    lookup(&CONSONANT_NOTES, jamo)
}

/// Note for a vowel jamo, if it is one of the 10 mapped vowels
pub fn vowel_entry(jamo: char) -> Option<&'static JamoEntry> {
    lookup(&VOWEL_NOTES, jamo)
}

fn lookup(table: &'static [(char, JamoEntry)], jamo: char) -> Option<&'static JamoEntry> {
    table
        .iter()
        .find(|(symbol, _)| *symbol == jamo)
        .map(|(_, entry)| entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_sizes() {
        assert_eq!(LEADING.len(), 19);
        assert_eq!(VOWELS.len(), 21);
        assert_eq!(TRAILING.len(), 28);
        assert_eq!(TRAILING[0], None);
    }

    #[test]
    fn test_every_mapped_consonant_is_a_leading_consonant() {
        for (symbol, _) in CONSONANT_NOTES.iter() {
            assert!(LEADING.contains(symbol), "{symbol} missing from LEADING");
        }
    }

    #[test]
    fn test_every_mapped_vowel_is_in_vowel_table() {
        for (symbol, _) in VOWEL_NOTES.iter() {
            assert!(VOWELS.contains(symbol), "{symbol} missing from VOWELS");
        }
    }

    #[test]
    fn test_consonant_lookup() {
        let entry = consonant_entry('ㅎ').unwrap();
        assert_eq!(entry.note, NoteLetter::B);
        assert_eq!(entry.octave, 5);
        assert_eq!(entry.display_name, "높은시");

        // Double consonants carry no note
        assert!(consonant_entry('ㄲ').is_none());
    }

    #[test]
    fn test_vowel_lookup() {
        let entry = vowel_entry('ㅏ').unwrap();
        assert_eq!(entry.note, NoteLetter::C);
        assert_eq!(entry.octave, 4);

        // Compound vowels carry no note
        assert!(vowel_entry('ㅐ').is_none());
        assert!(vowel_entry('ㄱ').is_none());
    }
}
