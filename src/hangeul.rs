//! Precomposed Hangeul syllable decomposition.
//!
//! A syllable block in U+AC00..=U+D7A3 encodes its jamo as
//! `leading * 588 + vowel * 28 + trailing`, where 588 = 21 vowels × 28
//! trailing slots. The indices address the ordered tables in `jamo`.

use crate::jamo::{LEADING, TRAILING, TRAILING_COUNT, VOWELS, VOWEL_COUNT};

/// First precomposed syllable (가)
pub const SYLLABLE_FIRST: u32 = 0xAC00;

/// Last precomposed syllable (힣)
pub const SYLLABLE_LAST: u32 = 0xD7A3;

/// Code points spanned by one leading consonant
const LEADING_STRIDE: u32 = (VOWEL_COUNT * TRAILING_COUNT) as u32;

/// Code points spanned by one vowel
const VOWEL_STRIDE: u32 = TRAILING_COUNT as u32;

/// A syllable split into its jamo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecomposedSyllable {
    pub syllable: char,
    pub leading: char,
    pub vowel: char,
    /// `None` when the syllable has no trailing consonant
    pub trailing: Option<char>,
    pub leading_index: usize,
    pub vowel_index: usize,
    pub trailing_index: usize,
}

impl DecomposedSyllable {
    /// Offset of the syllable from U+AC00, rebuilt from the three indices
    pub fn recompose(&self) -> u32 {
        self.leading_index as u32 * LEADING_STRIDE
            + self.vowel_index as u32 * VOWEL_STRIDE
            + self.trailing_index as u32
    }

    /// Jamo spelled out in order (leading, vowel, then trailing if present)
    pub fn jamo_string(&self) -> String {
        let mut out = String::with_capacity(9);
        out.push(self.leading);
        out.push(self.vowel);
        if let Some(trailing) = self.trailing {
            out.push(trailing);
        }
        out
    }
}

/// Whether `ch` is a precomposed Hangeul syllable
pub fn is_syllable(ch: char) -> bool {
    (SYLLABLE_FIRST..=SYLLABLE_LAST).contains(&(ch as u32))
}

/// Split a syllable into leading consonant, vowel and optional trailing
/// consonant. Returns `None` for anything outside the syllable block.
pub fn decompose(ch: char) -> Option<DecomposedSyllable> {
    if !is_syllable(ch) {
        return None;
    }

    let base = ch as u32 - SYLLABLE_FIRST;
    let leading_index = (base / LEADING_STRIDE) as usize;
    let vowel_index = ((base % LEADING_STRIDE) / VOWEL_STRIDE) as usize;
    let trailing_index = (base % VOWEL_STRIDE) as usize;

    Some(DecomposedSyllable {
        syllable: ch,
        leading: LEADING[leading_index],
        vowel: VOWELS[vowel_index],
        trailing: TRAILING[trailing_index],
        leading_index,
        vowel_index,
        trailing_index,
    })
}
