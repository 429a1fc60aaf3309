//! Surface orchestrator
//!
//! Owns everything that belongs to one connected Platform M+: the state
//! store, display synchronizer, LED mirror, binding registry and the two
//! output ports. Input dispatch, page activation and host-event routing are
//! split across the submodules; this module holds the shared struct and
//! device activation.

pub mod host;
pub mod input;
pub mod page;

#[cfg(test)]
mod tests;

use crate::bindings::BindingRegistry;
use crate::config::CcAssignment;
use crate::display::DisplaySync;
use crate::layout;
use crate::leds::LedMirror;
use crate::midi::MidiOut;
use crate::pages::PageId;
use crate::state::DeviceState;
use anyhow::Result;
use tracing::info;

/// One physical channel strip, addressed by its fixed 0-based index.
///
/// The strip persists for the device lifetime; page activation rebinds its
/// endpoints but never replaces the strip itself. Handlers receive the index
/// through this record instead of capturing it.
#[derive(Debug, Clone, Copy)]
pub struct ChannelControl {
    pub index: u8,
}

impl ChannelControl {
    pub fn touch_note(self) -> u8 {
        layout::strip_note(layout::FADER_TOUCH_BASE, self.index)
    }

    pub fn encoder_push_note(self) -> u8 {
        layout::strip_note(layout::ENCODER_PUSH_BASE, self.index)
    }

    pub fn encoder_cc(self) -> u8 {
        layout::strip_note(layout::ENCODER_CC_BASE, self.index)
    }
}

/// One connected control surface
pub struct Surface {
    pub(crate) state: DeviceState,
    pub(crate) display: DisplaySync,
    pub(crate) leds: LedMirror,
    pub(crate) bindings: BindingRegistry,
    pub(crate) strips: [ChannelControl; layout::NUM_STRIPS as usize],
    pub(crate) active_page: PageId,
    /// Index into `pages::JOG_SUBPAGES`
    pub(crate) jog_index: usize,
    /// Index into `pages::ZOOM_SUBPAGES`
    pub(crate) zoom_index: usize,
    /// Midi page fader assignments, one per strip
    pub(crate) cc_table: Vec<CcAssignment>,
    pub(crate) main_out: Box<dyn MidiOut>,
    pub(crate) cc_out: Box<dyn MidiOut>,
}

impl Surface {
    pub fn new(
        main_out: Box<dyn MidiOut>,
        cc_out: Box<dyn MidiOut>,
        cc_table: Vec<CcAssignment>,
    ) -> Self {
        Self {
            state: DeviceState::new(),
            display: DisplaySync::new(),
            leds: LedMirror::new(),
            bindings: BindingRegistry::new(),
            strips: core::array::from_fn(|i| ChannelControl { index: i as u8 }),
            active_page: PageId::Mixer,
            jog_index: 0,
            zoom_index: 0,
            cc_table,
            main_out,
            cc_out,
        }
    }

    /// Device activation: bring up the first page. Page activation itself
    /// darkens every LED before rendering, so a freshly connected surface
    /// starts from a known-dark state.
    pub fn activate(&mut self) -> Result<()> {
        info!("activating surface");
        self.activate_page(PageId::Mixer)
    }

    pub fn active_page(&self) -> PageId {
        self.active_page
    }

    pub fn bindings_mut(&mut self) -> &mut BindingRegistry {
        &mut self.bindings
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> &DeviceState {
        &self.state
    }
}
