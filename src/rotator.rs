//! Typewriter phrase rotator state machine.
//!
//! Types a phrase one character per tick, holds it, deletes it one character
//! per tick, then moves to the next phrase, forever. The rotator only knows
//! about ticks; [`crate::typewriter::Typewriter`] puts it on a host timer.

use std::time::Duration;

use crate::{
    config::RotatorTimings,
    error::{Error, Result},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Typing,
    PausedAtFull,
    Deleting,
}

#[derive(Clone, Debug)]
struct Phrase {
    text: String,
    chars: usize,
}

#[derive(Clone, Debug)]
pub struct Rotator {
    phrases: Vec<Phrase>,
    index: usize,
    visible: usize,
    mode: Mode,
    // Set when the phrase changed and nothing has been typed yet.
    wrapped: bool,
    timings: RotatorTimings,
}

impl Rotator {
    pub fn new<I, S>(phrases: I, timings: RotatorTimings) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let phrases: Vec<Phrase> = phrases
            .into_iter()
            .map(|text| {
                let text = text.into();
                let chars = text.chars().count();
                Phrase { text, chars }
            })
            .collect();
        if phrases.is_empty() {
            return Err(Error::EmptyPhrases);
        }
        timings.validate()?;

        let mut rotator = Self {
            phrases,
            index: 0,
            visible: 0,
            mode: Mode::Typing,
            wrapped: false,
            timings,
        };
        rotator.reset();
        Ok(rotator)
    }

    /// Back to the first phrase with nothing typed.
    pub fn reset(&mut self) {
        self.enter_phrase(0);
        self.wrapped = false;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn active_index(&self) -> usize {
        self.index
    }

    pub fn visible_chars(&self) -> usize {
        self.visible
    }

    pub fn phrase_count(&self) -> usize {
        self.phrases.len()
    }

    pub fn active_phrase(&self) -> &str {
        &self.phrases[self.index].text
    }

    /// The typed prefix of the active phrase.
    pub fn text(&self) -> &str {
        let text = self.active_phrase();
        match text.char_indices().nth(self.visible) {
            Some((end, _)) => &text[..end],
            None => text,
        }
    }

    /// How long to wait before the next [`tick`](Self::tick).
    pub fn next_delay(&self) -> Duration {
        match self.mode {
            Mode::Typing if self.wrapped => self.timings.wrap_delay,
            Mode::Typing => self.timings.type_delay,
            Mode::PausedAtFull => self.timings.hold_delay,
            Mode::Deleting => self.timings.delete_delay,
        }
    }

    /// Apply one transition and return the delay before the next one.
    pub fn tick(&mut self) -> Duration {
        let len = self.phrases[self.index].chars;
        match self.mode {
            Mode::Typing => {
                self.wrapped = false;
                self.visible = (self.visible + 1).min(len);
                if self.visible == len {
                    self.mode = Mode::PausedAtFull;
                }
            }
            Mode::PausedAtFull => {
                self.mode = Mode::Deleting;
                if self.visible == 0 {
                    self.advance_phrase();
                }
            }
            Mode::Deleting => {
                self.visible = self.visible.saturating_sub(1);
                if self.visible == 0 {
                    self.advance_phrase();
                }
            }
        }
        self.next_delay()
    }

    fn advance_phrase(&mut self) {
        self.enter_phrase((self.index + 1) % self.phrases.len());
        self.wrapped = true;
    }

    fn enter_phrase(&mut self, index: usize) {
        self.index = index;
        self.visible = 0;
        // An empty phrase is already fully typed.
        self.mode = if self.phrases[index].chars == 0 {
            Mode::PausedAtFull
        } else {
            Mode::Typing
        };
    }
}
