//! Input dispatch
//!
//! Routes parsed surface MIDI onto the page machine, the jog translator,
//! the Midi page's CC bridge and the binding registry. Note Offs are only
//! meaningful for the fader touch sensors; LED button releases carry no
//! information because the buttons act on press.

use super::{ChannelControl, Surface};
use crate::bindings::ControlRef;
use crate::display::{make_label, set_text_of_column, DisplayType, RenderRequest};
use crate::jog;
use crate::layout;
use crate::midi::{convert, MidiMessage};
use crate::pages::{subpage_for_note, PageId};
use crate::state::{Field, Section, KEY_ACTIVE_SUBPAGE, KEY_DISPLAY_TYPE};
use anyhow::Result;
use tracing::trace;

impl Surface {
    /// Dispatch one parsed message from the surface
    pub fn on_midi(&mut self, message: &MidiMessage) -> Result<()> {
        trace!(%message, "surface input");
        match *message {
            MidiMessage::NoteOn { channel: 0, note, .. } => self.on_button_press(note),
            MidiMessage::NoteOff { channel: 0, note, .. } => self.on_button_release(note),
            MidiMessage::ControlChange { channel: 0, cc, value } => {
                if cc == layout::JOG_CC {
                    self.on_jog(value);
                } else if let Some(strip) = self.strip_where(|s| s.encoder_cc() == cc) {
                    self.on_encoder(strip.index, value);
                }
                Ok(())
            }
            MidiMessage::PitchBend { channel, value } => self.on_fader(channel, value),
            _ => Ok(()),
        }
    }

    fn on_button_press(&mut self, note: u8) -> Result<()> {
        match note {
            layout::PREV_PAGE => self.prev_page(),
            layout::NEXT_PAGE => self.next_page(),
            layout::JOG_PUSH => self.cycle_jog(),
            layout::ZOOM_TOGGLE => self.cycle_zoom(),
            layout::MIXER_MODE => self.toggle_display_mode(),
            _ => {
                if let Some(subpage) = subpage_for_note(self.active_page, note) {
                    return self.activate_subpage(subpage);
                }
                if (layout::ZOOM_VERT_OUT..=layout::ZOOM_HORIZ_IN).contains(&note) {
                    self.trigger_zoom_button(note);
                    return Ok(());
                }
                if let Some(strip) = self.strip_where(|s| s.touch_note() == note) {
                    self.set_endpoint(ControlRef::FaderTouch(strip.index), 1.0);
                } else if note == layout::strip_note(layout::FADER_TOUCH_BASE, layout::NUM_STRIPS) {
                    // Master fader touch sits one slot past the strip grid
                    self.set_endpoint(ControlRef::FaderTouch(layout::NUM_STRIPS), 1.0);
                } else if let Some(strip) = self.strip_where(|s| s.encoder_push_note() == note) {
                    self.toggle_endpoint(ControlRef::EncoderPush(strip.index));
                } else {
                    self.toggle_endpoint(ControlRef::Button(note));
                }
                Ok(())
            }
        }
    }

    fn on_button_release(&mut self, note: u8) -> Result<()> {
        if let Some(strip) = self.strip_where(|s| s.touch_note() == note) {
            self.set_endpoint(ControlRef::FaderTouch(strip.index), 0.0);
        } else if note == layout::strip_note(layout::FADER_TOUCH_BASE, layout::NUM_STRIPS) {
            self.set_endpoint(ControlRef::FaderTouch(layout::NUM_STRIPS), 0.0);
        }
        Ok(())
    }

    fn strip_where(&self, pred: impl Fn(&ChannelControl) -> bool) -> Option<ChannelControl> {
        self.strips.iter().copied().find(pred)
    }

    /// Toggle between the Fader and Pan row pairs. The button LED mirrors
    /// Pan mode; the render call re-sends the rows because the mode is part
    /// of the frame comparison.
    fn toggle_display_mode(&mut self) -> Result<()> {
        let mode = DisplayType::from_state(&self.state.get(KEY_DISPLAY_TYPE)).toggled();
        self.state.set(KEY_DISPLAY_TYPE, mode.as_str());
        self.leds.force(
            layout::MIXER_MODE,
            mode == DisplayType::Pan,
            self.main_out.as_mut(),
        )?;
        self.display
            .render(&self.state, &RenderRequest::unchanged(), self.main_out.as_mut())
    }

    fn on_jog(&mut self, value: u8) {
        let rate = convert::cc_to_rate(value);
        let subpage = self.jog_subpage();
        if let Some((increase, decrease)) = self.bindings.jog_sinks(subpage) {
            jog::drive(rate, increase, decrease);
        }
    }

    fn on_encoder(&mut self, index: u8, value: u8) {
        let delta = convert::relative_signed_bit(value);
        // One detent moves the bound value by a hundredth of its range
        let step = f64::from(delta) * 0.01;
        let subpage = self.state.get(KEY_ACTIVE_SUBPAGE);
        if let Some(endpoint) =
            self.bindings
                .resolve(self.active_page, &subpage, ControlRef::Encoder(index))
        {
            let next = (endpoint.current_value() + step).clamp(0.0, 1.0);
            endpoint.set_value(next);
        }
    }

    fn on_fader(&mut self, channel: u8, value: u16) -> Result<()> {
        if channel < layout::NUM_STRIPS && self.active_page == PageId::Midi {
            return self.on_midi_page_fader(channel, value);
        }
        let norm = f64::from(convert::pb_to_norm(value));
        let control = if channel < layout::NUM_STRIPS {
            ControlRef::Fader(channel)
        } else {
            ControlRef::MasterFader
        };
        self.set_endpoint(control, norm);
        Ok(())
    }

    /// Midi page fader: hold the motor fader in place, emit the assigned CC
    /// on the secondary output, show the 7-bit value on the display.
    fn on_midi_page_fader(&mut self, index: u8, value: u16) -> Result<()> {
        let Some(assignment) = self.cc_table.get(index as usize).cloned() else {
            return Ok(());
        };
        let cc_value = convert::norm_to_cc(convert::pb_to_norm(value));

        let echo = MidiMessage::PitchBend { channel: index, value };
        self.main_out.send(&echo.to_bytes())?;

        let cc = MidiMessage::ControlChange {
            channel: 0,
            cc: assignment.cc,
            value: cc_value,
        };
        self.cc_out.send(&cc.to_bytes())?;

        let scope = self.state.scope();
        let key = scope.key(Section::Fader, Field::Values);
        let line = set_text_of_column(
            &self.state.get(&key),
            index as usize,
            &make_label(&cc_value.to_string(), 6),
        );
        self.state.set(&key, line);
        self.display.render(
            &self.state,
            &RenderRequest::fader_values(&scope),
            self.main_out.as_mut(),
        )
    }

    /// The four zoom-area buttons resolve against the zoom subpage, not the
    /// page's own subpage, so Zoom and Nav can carry different commands.
    fn trigger_zoom_button(&mut self, note: u8) {
        let subpage = self.zoom_subpage();
        if let Some(endpoint) =
            self.bindings
                .resolve(self.active_page, subpage, ControlRef::Button(note))
        {
            endpoint.set_value(1.0);
        }
    }

    fn set_endpoint(&mut self, control: ControlRef, value: f64) {
        let subpage = self.state.get(KEY_ACTIVE_SUBPAGE);
        if let Some(endpoint) = self.bindings.resolve(self.active_page, &subpage, control) {
            endpoint.set_value(value);
        }
    }

    fn toggle_endpoint(&mut self, control: ControlRef) {
        let subpage = self.state.get(KEY_ACTIVE_SUBPAGE);
        if let Some(endpoint) = self.bindings.resolve(self.active_page, &subpage, control) {
            let next = if endpoint.current_value() > 0.0 { 0.0 } else { 1.0 };
            endpoint.set_value(next);
        }
    }
}
