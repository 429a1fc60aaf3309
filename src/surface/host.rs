//! Host feedback routing
//!
//! Title and value callbacks from the host land here and are written into
//! the scoped display keys of whichever scope is active, then rendered. The
//! routing differs per page: pages whose strips carry plugin parameters show
//! parameter names in the value-title row only, while the mixer-style pages
//! show object titles and value titles together.

use super::Surface;
use crate::display::{make_label, set_text_of_column, RenderRequest};
use crate::pages::{page_def, PageId, TitleRouting};
use crate::state::{Field, Section, KEY_SELECTED_TRACK_NAME};
use anyhow::Result;
use tracing::trace;

/// A feedback callback from the host, already resolved to a strip index
#[derive(Debug, Clone)]
pub enum HostEvent {
    /// Fader strip title changed: the bound object and its value title
    FaderTitle {
        index: u8,
        object_title: String,
        value_title: String,
    },
    /// Fader strip display value changed
    FaderValue { index: u8, value: String },
    /// Encoder strip title changed
    EncoderTitle {
        index: u8,
        object_title: String,
        value_title: String,
    },
    /// Encoder strip display value changed
    EncoderValue { index: u8, value: String },
    /// Quick-control slot title changed (SelectedTrack sends area)
    QuickControlTitle { index: u8, value_title: String },
    /// The selected track changed
    SelectedTrackTitle { title: String },
    /// A bound button's process value changed; drives the button LED
    LedValue { note: u8, value: f64 },
}

impl Surface {
    /// Route one host feedback event into state and the display
    pub fn on_host_event(&mut self, event: &HostEvent) -> Result<()> {
        trace!(?event, "host feedback");
        match event {
            HostEvent::FaderTitle {
                index,
                object_title,
                value_title,
            } => self.on_fader_title(*index, object_title, value_title),
            HostEvent::FaderValue { index, value } => self.on_fader_value(*index, value),
            HostEvent::EncoderTitle {
                index,
                object_title,
                value_title,
            } => self.on_encoder_title(*index, object_title, value_title),
            HostEvent::EncoderValue { index, value } => self.on_encoder_value(*index, value),
            HostEvent::QuickControlTitle { index, value_title } => {
                self.on_quick_control_title(*index, value_title)
            }
            HostEvent::SelectedTrackTitle { title } => {
                self.state.set(KEY_SELECTED_TRACK_NAME, title.clone());
                Ok(())
            }
            HostEvent::LedValue { note, value } => {
                self.leds
                    .update(*note, *value > 0.0, self.main_out.as_mut())
            }
        }
    }

    fn on_fader_title(&mut self, index: u8, object_title: &str, value_title: &str) -> Result<()> {
        let def = page_def(self.active_page);
        let scope = self.state.scope();
        match def.title_routing {
            TitleRouting::TitleAndValueTitles => {
                self.write_column(&scope.key(Section::Fader, Field::Title), index, object_title);
                self.write_column(
                    &scope.key(Section::Fader, Field::ValueTitles),
                    index,
                    value_title,
                );
            }
            TitleRouting::ValueTitlesOnly => {
                self.write_column(
                    &scope.key(Section::Fader, Field::ValueTitles),
                    index,
                    value_title,
                );
            }
        }
        self.render_full()
    }

    fn on_fader_value(&mut self, index: u8, value: &str) -> Result<()> {
        let scope = self.state.scope();
        self.write_column(&scope.key(Section::Fader, Field::Values), index, value);
        self.display.render(
            &self.state,
            &RenderRequest::fader_values(&scope),
            self.main_out.as_mut(),
        )
    }

    fn on_encoder_title(&mut self, index: u8, object_title: &str, value_title: &str) -> Result<()> {
        let def = page_def(self.active_page);
        let scope = self.state.scope();

        let label = if self.active_page == PageId::SelectedTrack {
            // Send slot titles arrive as "S1 <name>"; strip the slot prefix.
            // On the quick-control subpages the value title is the real name.
            let stripped: String = if scope.subpage == "SendsQC" {
                object_title.chars().skip(2).collect()
            } else {
                value_title.to_string()
            };
            if stripped.trim().is_empty() {
                "None".to_string()
            } else {
                stripped
            }
        } else {
            value_title.to_string()
        };

        match def.title_routing {
            TitleRouting::TitleAndValueTitles => {
                self.write_column(&scope.key(Section::Pan, Field::Title), index, object_title);
                self.write_column(&scope.key(Section::Pan, Field::ValueTitles), index, &label);
            }
            TitleRouting::ValueTitlesOnly => {
                self.write_column(&scope.key(Section::Pan, Field::ValueTitles), index, &label);
            }
        }
        self.render_full()
    }

    fn on_encoder_value(&mut self, index: u8, value: &str) -> Result<()> {
        let scope = self.state.scope();
        self.write_column(&scope.key(Section::Pan, Field::Values), index, value);
        self.display.render(
            &self.state,
            &RenderRequest::pan_values(&scope),
            self.main_out.as_mut(),
        )
    }

    /// Quick-control titles feed the fader value-title row of the
    /// SelectedTrack sends subpage
    fn on_quick_control_title(&mut self, index: u8, value_title: &str) -> Result<()> {
        let scope = self.state.scope();
        if self.active_page != PageId::SelectedTrack || scope.subpage != "SendsQC" {
            return Ok(());
        }
        let label = if value_title.trim().is_empty() {
            "None"
        } else {
            value_title
        };
        self.write_column(&scope.key(Section::Fader, Field::ValueTitles), index, label);
        self.render_full()
    }

    /// Place a 6-character label in a strip column of a scoped row
    fn write_column(&mut self, key: &str, index: u8, text: &str) {
        let line = set_text_of_column(
            &self.state.get(key),
            index as usize,
            &make_label(text, 6),
        );
        self.state.set(key, line);
    }
}
