//! Page and subpage activation
//!
//! Page switches are destructive on purpose: every LED is darkened, the six
//! scoped display keys are cleared and the display mode falls back to Fader,
//! so a page always comes up in a deterministic state and stale content from
//! the previous scope can never bleed through.

use super::Surface;
use crate::display::{self, make_label, set_text_of_column, DisplayType, RenderRequest};
use crate::pages::{
    led_note_for_subpage, page_def, PageId, JOG_SUBPAGES, ZOOM_SUBPAGES,
};
use crate::state::{
    Field, Section, KEY_ACTIVE_PAGE, KEY_ACTIVE_SUBPAGE, KEY_DISPLAY_TYPE, KEY_INDICATOR1,
    KEY_INDICATOR2,
};
use anyhow::Result;
use tracing::{debug, info};

impl Surface {
    /// Activate a page: darken all LEDs, reset the page's scope, restore the
    /// manual subpage LED pattern if the page has one, then render.
    pub fn activate_page(&mut self, page: PageId) -> Result<()> {
        let def = page_def(page);
        info!(page = page.as_str(), subpage = def.initial_subpage, "activating page");

        self.active_page = page;
        self.state.set(KEY_ACTIVE_PAGE, page.as_str());
        self.state.set(KEY_ACTIVE_SUBPAGE, def.initial_subpage);

        self.leds.clear_all(self.main_out.as_mut())?;
        self.reset_scope();

        // Jog and zoom areas restart on their first subpage
        self.jog_index = 0;
        self.zoom_index = 0;
        self.state
            .set(KEY_INDICATOR1, ZOOM_SUBPAGES[0].1.to_string());
        self.state
            .set(KEY_INDICATOR2, JOG_SUBPAGES[0].1.to_string());

        if let Some(note) = led_note_for_subpage(page, def.initial_subpage) {
            let group: Vec<u8> = def.subpage_leds.iter().map(|&(_, n)| n).collect();
            self.leds
                .set_exclusive(&group, note, self.main_out.as_mut())?;
        }

        if page == PageId::Midi {
            self.seed_midi_page();
        }

        self.render_full()
    }

    pub fn next_page(&mut self) -> Result<()> {
        self.activate_page(self.active_page.next())
    }

    pub fn prev_page(&mut self) -> Result<()> {
        self.activate_page(self.active_page.prev())
    }

    /// Activate a subpage within the current page's manual LED group.
    ///
    /// Clears the scope like a page switch does, so subpage content always
    /// starts empty instead of showing the previous subpage's rows.
    pub fn activate_subpage(&mut self, subpage: &'static str) -> Result<()> {
        let def = page_def(self.active_page);
        debug!(page = self.active_page.as_str(), subpage, "activating subpage");

        self.state.set(KEY_ACTIVE_SUBPAGE, subpage);

        if let Some(note) = led_note_for_subpage(self.active_page, subpage) {
            let group: Vec<u8> = def.subpage_leds.iter().map(|&(_, n)| n).collect();
            self.leds
                .set_exclusive(&group, note, self.main_out.as_mut())?;
        }

        self.reset_scope();
        self.render_full()
    }

    /// Advance the jog area to its next subpage and refresh its indicator
    pub fn cycle_jog(&mut self) -> Result<()> {
        self.jog_index = (self.jog_index + 1) % JOG_SUBPAGES.len();
        let (name, indicator) = JOG_SUBPAGES[self.jog_index];
        debug!(subpage = name, "jog area");
        self.state.set(KEY_INDICATOR2, indicator.to_string());
        self.display
            .render(&self.state, &RenderRequest::unchanged(), self.main_out.as_mut())
    }

    /// Advance the zoom area to its next subpage and refresh its indicator
    pub fn cycle_zoom(&mut self) -> Result<()> {
        self.zoom_index = (self.zoom_index + 1) % ZOOM_SUBPAGES.len();
        let (name, indicator) = ZOOM_SUBPAGES[self.zoom_index];
        debug!(subpage = name, "zoom area");
        self.state.set(KEY_INDICATOR1, indicator.to_string());
        self.display
            .render(&self.state, &RenderRequest::unchanged(), self.main_out.as_mut())
    }

    /// The jog area's active subpage name
    pub(crate) fn jog_subpage(&self) -> &'static str {
        JOG_SUBPAGES[self.jog_index].0
    }

    /// The zoom area's active subpage name
    pub(crate) fn zoom_subpage(&self) -> &'static str {
        ZOOM_SUBPAGES[self.zoom_index].0
    }

    /// Clear the six scoped display keys and fall back to Fader mode
    pub(crate) fn reset_scope(&mut self) {
        let scope = self.state.scope();
        for key in scope.all_keys() {
            self.state.set(&key, "");
        }
        self.state
            .set(KEY_DISPLAY_TYPE, DisplayType::Fader.as_str());
    }

    /// Full render of the active scope using the page's title field
    pub(crate) fn render_full(&mut self) -> Result<()> {
        let def = page_def(self.active_page);
        let scope = self.state.scope();
        let req = RenderRequest::scope(&scope, def.title_field, def.title_field);
        self.display
            .render(&self.state, &req, self.main_out.as_mut())
    }

    /// Pre-populate the Midi page's fader rows: assignment labels up top,
    /// unknown values below (the surface cannot read CC state back).
    fn seed_midi_page(&mut self) {
        let scope = self.state.scope();
        let mut titles = String::new();
        let mut values = String::new();
        for (i, assignment) in self.cc_table.iter().enumerate().take(display::NUM_COLUMNS) {
            titles = set_text_of_column(&titles, i, &make_label(&assignment.title, 6));
            values = set_text_of_column(&values, i, &make_label("?", 6));
        }
        self.state
            .set(&scope.key(Section::Fader, Field::ValueTitles), titles);
        self.state
            .set(&scope.key(Section::Fader, Field::Values), values);
    }
}
