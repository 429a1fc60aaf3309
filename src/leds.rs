//! LED feedback
//!
//! Every button LED on the surface is addressed by note number and driven
//! with Note On velocity 127 (lit) or 0 (dark) on channel 0. The mirror
//! tracks what each LED was last told so repeated values of a bound host
//! endpoint produce no traffic.

use crate::layout;
use crate::midi::MidiOut;
use anyhow::Result;
use std::collections::HashMap;

/// Every statically known LED note, in the order `clear_all` addresses them:
/// mixer grid interleaved per strip, master fader trio, transport block.
pub fn all_led_notes() -> Vec<u8> {
    let mut notes = Vec::with_capacity(45);
    for i in 0..layout::NUM_STRIPS {
        notes.push(layout::strip_note(layout::SEL_BASE, i));
        notes.push(layout::strip_note(layout::MUTE_BASE, i));
        notes.push(layout::strip_note(layout::SOLO_BASE, i));
        notes.push(layout::strip_note(layout::REC_BASE, i));
    }
    notes.extend_from_slice(&[layout::MIXER_MODE, layout::AUTO_READ, layout::AUTO_WRITE]);
    notes.extend_from_slice(&[
        layout::PREV_PAGE,
        layout::NEXT_PAGE,
        layout::PREV_BANK,
        layout::NEXT_BANK,
        layout::REWIND,
        layout::FORWARD,
        layout::STOP,
        layout::START,
        layout::RECORD,
        layout::CYCLE,
    ]);
    notes
}

/// Mirrors logical boolean values onto physical LEDs
#[derive(Debug, Default)]
pub struct LedMirror {
    /// Last state emitted per note
    states: HashMap<u8, bool>,
}

impl LedMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mirror a bound value change onto an LED. Emits only on transitions.
    pub fn update(&mut self, note: u8, on: bool, out: &mut dyn MidiOut) -> Result<()> {
        if self.states.get(&note).copied() == Some(on) {
            return Ok(());
        }
        self.force(note, on, out)
    }

    /// Emit the LED state unconditionally and record it
    pub fn force(&mut self, note: u8, on: bool, out: &mut dyn MidiOut) -> Result<()> {
        let velocity = if on { 127 } else { 0 };
        out.send(&[0x90, note, velocity])?;
        self.states.insert(note, on);
        Ok(())
    }

    /// Light exactly one note of a mutually-exclusive group, darken the rest.
    ///
    /// Used for manual subpage feedback where a native toggle binding cannot
    /// represent an N-way choice. The whole pattern is emitted every time.
    pub fn set_exclusive(&mut self, notes: &[u8], active: u8, out: &mut dyn MidiOut) -> Result<()> {
        for &note in notes {
            self.force(note, note == active, out)?;
        }
        Ok(())
    }

    /// Darken every statically known LED, in the documented order.
    ///
    /// Invoked on device activation and on every page activation before any
    /// other rendering.
    pub fn clear_all(&mut self, out: &mut dyn MidiOut) -> Result<()> {
        for note in all_led_notes() {
            self.force(note, false, out)?;
        }
        Ok(())
    }
}
