//! Interactive session: one typing surface, one tone sink, one host link.
//!
//! The session owns every piece of mutable state (link, pointer position,
//! debug log) so nothing lives in globals. Front ends feed it input-field
//! text, pointer moves and reconnect requests, and render what it returns.
//!
//! A keystroke is handled start to finish before the call returns:
//! decompose → resolve notes → play → send.

use std::time::Instant;

use crate::audio::{ToneRequest, ToneSink};
use crate::hangeul::{decompose, DecomposedSyllable};
use crate::link::{LinkManager, Transport};
use crate::notes::{note_events, Expression, NoteEvent, PointerPosition};
use crate::observer::{epoch_millis, DebugLog};
use crate::params::{ExpressionMapping, SynthConfig};
use crate::protocol::OutboundMessage;

/// What the front end should show after an input event
#[derive(Debug, Clone, PartialEq)]
pub enum Display {
    Syllable(SyllableView),
    /// Blank the character and note labels
    Cleared,
}

/// A decomposed syllable ready for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct SyllableView {
    pub decomposed: DecomposedSyllable,
    /// `ㄱ (도)` style label, `None` when the consonant has no note
    pub consonant_label: Option<String>,
    pub vowel_label: Option<String>,
    pub notes: Vec<NoteEvent>,
    /// Whether the host received the syllable
    pub sent: bool,
}

pub struct Session<T: Transport, S: ToneSink> {
    link: LinkManager<T>,
    sink: S,
    pointer: PointerPosition,
    synth: SynthConfig,
    expression: ExpressionMapping,
    log: DebugLog,
}

impl<T: Transport, S: ToneSink> Session<T, S> {
    pub fn new(
        link: LinkManager<T>,
        sink: S,
        synth: SynthConfig,
        expression: ExpressionMapping,
        log: DebugLog,
    ) -> Self {
        Self {
            link,
            sink,
            pointer: PointerPosition::default(),
            synth,
            expression,
            log,
        }
    }

    /// Open the host link and play the test tone
    pub fn start(&mut self, now: Instant) {
        self.link.connect(now);
        self.play_test_tone();
        self.log.append("Application started");
    }

    pub fn play_test_tone(&mut self) {
        let tone = ToneRequest::test_tone(&self.synth.test_tone, &self.synth);
        match self.sink.play(tone) {
            Ok(()) => self.log.append("Test tone played"),
            Err(err) => self.log.append(format!("Test tone failed: {err}")),
        }
    }

    /// Handle the input field after a keystroke. Only its last character
    /// counts; anything but a Hangeul syllable clears the display.
    pub fn handle_input(&mut self, field_text: &str) -> Display {
        let Some(decomposed) = field_text.chars().last().and_then(decompose) else {
            return Display::Cleared;
        };

        let notes = note_events(&decomposed);
        self.play_notes(&notes);

        let message =
            OutboundMessage::hangeul_input(&decomposed, &notes, self.pointer, epoch_millis());
        let sent = self.link.send(&message);

        Display::Syllable(SyllableView {
            consonant_label: label(&notes, decomposed.leading),
            vowel_label: label(&notes, decomposed.vowel),
            decomposed,
            notes,
            sent,
        })
    }

    /// Input field emptied by the user
    pub fn clear_input(&mut self) -> Display {
        self.log.append("Input cleared");
        Display::Cleared
    }

    pub fn set_pointer(&mut self, x: f64, y: f64) {
        self.pointer = PointerPosition::new(x, y);
    }

    pub fn pointer(&self) -> PointerPosition {
        self.pointer
    }

    /// Current pitch bend and volume
    pub fn expression(&self) -> Expression {
        Expression::from_pointer(self.pointer, &self.expression)
    }

    pub fn reconnect(&mut self, now: Instant) {
        self.link.reconnect(now);
    }

    /// Drive the link: due retries and inbound frames
    pub fn poll(&mut self, now: Instant) {
        self.link.poll(now);
    }

    pub fn shutdown(&mut self) {
        self.link.shutdown();
    }

    pub fn link(&self) -> &LinkManager<T> {
        &self.link
    }

    /// Tones the sink is still sounding
    pub fn active_voices(&self) -> usize {
        self.sink.active_voices()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn log(&self) -> &DebugLog {
        &self.log
    }

    fn play_notes(&mut self, notes: &[NoteEvent]) {
        let expression = self.expression();
        for note in notes {
            let tone = ToneRequest::note(
                expression.bend(note.frequency) as f32,
                note.role.waveform(),
                expression.volume as f32,
                &self.synth,
            );
            if let Err(err) = self.sink.play(tone) {
                log::warn!("event=note_playback status=error jamo={} error={}", note.jamo, err);
                self.log.append(format!("Note playback failed: {err}"));
            }
        }
    }
}

fn label(notes: &[NoteEvent], jamo: char) -> Option<String> {
    notes
        .iter()
        .find(|note| note.jamo == jamo)
        .map(|note| format!("{} ({})", jamo, note.display_name))
}
