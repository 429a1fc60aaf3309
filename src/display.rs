//! Two-line display protocol and synchronizer
//!
//! The Platform M+ display takes Mackie-style SysEx packets: a fixed header,
//! one row-offset byte, 56 payload characters and the EOX terminator. The
//! synchronizer keeps the last frame actually transmitted and only re-sends
//! rows that changed; the two indicator characters are re-sent on every
//! render.

use crate::midi::MidiOut;
use crate::state::{DeviceState, Field, Scope, Section, KEY_DISPLAY_TYPE, KEY_INDICATOR1, KEY_INDICATOR2};
use anyhow::Result;

/// SysEx header shared by row and indicator packets
pub const DISPLAY_HEADER: [u8; 6] = [0xF0, 0x00, 0x00, 0x66, 0x14, 0x12];

/// Characters per display row
pub const ROW_WIDTH: usize = 56;

/// Column grid: 8 columns of 7 characters each
pub const NUM_COLUMNS: usize = 8;
pub const COLUMN_WIDTH: usize = 7;

/// Indicator slot position bytes (physical row 0 / row 1)
const INDICATOR_POS_ROW0: u8 = 55;
const INDICATOR_POS_ROW1: u8 = 111;

/// Build a 64-byte row packet for a physical row (0 or 1).
///
/// The row selector is a single positional byte of value `56 * row`, not 56
/// repeated offset bytes. Text is truncated to 56 characters and right-padded
/// with spaces.
pub fn row_packet(physical_row: u8, text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(ROW_WIDTH + 8);
    out.extend_from_slice(&DISPLAY_HEADER);
    out.push(56 * physical_row);

    let mut len = 0;
    for c in text.chars().take(ROW_WIDTH) {
        out.push((c as u8).min(0x7F));
        len += 1;
    }
    while len < ROW_WIDTH {
        out.push(0x20);
        len += 1;
    }
    out.push(0xF7);
    out
}

/// Build a 9-byte indicator packet for a physical row (0 or 1)
pub fn indicator_packet(physical_row: u8, indicator: char) -> Vec<u8> {
    let mut out = Vec::with_capacity(9);
    out.extend_from_slice(&DISPLAY_HEADER);
    out.push(if physical_row == 0 {
        INDICATOR_POS_ROW0
    } else {
        INDICATOR_POS_ROW1
    });
    out.push((indicator as u8).min(0x7F));
    out.push(0xF7);
    out
}

/// Fixed-width label: truncate or right-pad with spaces
pub fn make_label(text: &str, width: usize) -> String {
    let mut label: String = text.chars().take(width).collect();
    while label.chars().count() < width {
        label.push(' ');
    }
    label
}

/// Place a label at a column position within a 56-character line.
///
/// The line is normalized to 56 characters first, so writing column 7 of a
/// previously empty line works.
pub fn set_text_of_column(line: &str, column: usize, label: &str) -> String {
    let mut chars: Vec<char> = line.chars().take(ROW_WIDTH).collect();
    chars.resize(ROW_WIDTH, ' ');

    let start = column.min(NUM_COLUMNS - 1) * COLUMN_WIDTH;
    for (i, c) in label.chars().take(COLUMN_WIDTH).enumerate() {
        chars[start + i] = c;
    }
    chars.into_iter().collect()
}

/// Normalize a line to exactly 56 characters
pub fn set_text_of_line(line: &str) -> String {
    let mut chars: Vec<char> = line.chars().take(ROW_WIDTH).collect();
    chars.resize(ROW_WIDTH, ' ');
    chars.into_iter().collect()
}

/// Which row pair is live on the physical display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayType {
    #[default]
    Fader,
    Pan,
}

impl DisplayType {
    /// Parse from device state; anything but "Pan" is Fader
    pub fn from_state(value: &str) -> Self {
        if value == "Pan" {
            DisplayType::Pan
        } else {
            DisplayType::Fader
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DisplayType::Fader => "Fader",
            DisplayType::Pan => "Pan",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            DisplayType::Fader => DisplayType::Pan,
            DisplayType::Pan => DisplayType::Fader,
        }
    }
}

/// The frame last transmitted to the device, including the display type it
/// was sent under. Owned by the synchronizer, never read elsewhere.
#[derive(Debug, Default, Clone)]
struct LastSentFrame {
    row1: String,
    row2: String,
    alt_row1: String,
    alt_row2: String,
    display_type: Option<DisplayType>,
}

/// Which state keys feed each logical row on this render.
///
/// `None` re-uses the last-sent value for that row, reproducing the partial
/// update calls of value-change handlers (only the affected row is re-read).
#[derive(Debug, Default, Clone)]
pub struct RenderRequest {
    pub row1: Option<String>,
    pub row2: Option<String>,
    pub alt_row1: Option<String>,
    pub alt_row2: Option<String>,
}

impl RenderRequest {
    /// Indicator-only refresh: every row keeps its last-sent content
    pub fn unchanged() -> Self {
        Self::default()
    }

    /// Full render of a scope: fader rows from `fader_field`+Values, pan rows
    /// from `pan_field`+Values
    pub fn scope(scope: &Scope, fader_field: Field, pan_field: Field) -> Self {
        Self {
            row1: Some(scope.key(Section::Fader, fader_field)),
            row2: Some(scope.key(Section::Fader, Field::Values)),
            alt_row1: Some(scope.key(Section::Pan, pan_field)),
            alt_row2: Some(scope.key(Section::Pan, Field::Values)),
        }
    }

    /// Only the fader Values row is re-read
    pub fn fader_values(scope: &Scope) -> Self {
        Self {
            row2: Some(scope.key(Section::Fader, Field::Values)),
            ..Self::default()
        }
    }

    /// Only the pan Values row is re-read
    pub fn pan_values(scope: &Scope) -> Self {
        Self {
            alt_row2: Some(scope.key(Section::Pan, Field::Values)),
            ..Self::default()
        }
    }
}

/// Diffs display content against the last transmitted frame and emits row
/// packets only on change. One per device.
#[derive(Debug, Default)]
pub struct DisplaySync {
    last: LastSentFrame,
}

impl DisplaySync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the display.
    ///
    /// Resolves the four logical rows, compares them and the display type
    /// against the last-sent frame, and transmits the live row pair on
    /// change (physical row 1 carries the first row of the pair, physical
    /// row 0 the second). The two indicator characters are transmitted
    /// unconditionally.
    pub fn render(
        &mut self,
        state: &DeviceState,
        req: &RenderRequest,
        out: &mut dyn MidiOut,
    ) -> Result<()> {
        let row1 = Self::resolve(state, &req.row1, &self.last.row1);
        let row2 = Self::resolve(state, &req.row2, &self.last.row2);
        let alt_row1 = Self::resolve(state, &req.alt_row1, &self.last.alt_row1);
        let alt_row2 = Self::resolve(state, &req.alt_row2, &self.last.alt_row2);

        let display_type = DisplayType::from_state(&state.get(KEY_DISPLAY_TYPE));

        // A mode switch with identical text still forces a re-send, so the
        // comparison includes the display type itself.
        let changed = row1 != self.last.row1
            || row2 != self.last.row2
            || alt_row1 != self.last.alt_row1
            || alt_row2 != self.last.alt_row2
            || Some(display_type) != self.last.display_type;

        if changed {
            let (first, second) = match display_type {
                DisplayType::Fader => (&row1, &row2),
                DisplayType::Pan => (&alt_row1, &alt_row2),
            };
            out.send(&row_packet(1, first))?;
            out.send(&row_packet(0, second))?;
        }

        // Indicators are not diffed
        let indicator1 = state.get(KEY_INDICATOR1).chars().next().unwrap_or(' ');
        let indicator2 = state.get(KEY_INDICATOR2).chars().next().unwrap_or(' ');
        out.send(&indicator_packet(1, indicator1))?;
        out.send(&indicator_packet(0, indicator2))?;

        self.last = LastSentFrame {
            row1,
            row2,
            alt_row1,
            alt_row2,
            display_type: Some(display_type),
        };
        Ok(())
    }

    fn resolve(state: &DeviceState, key: &Option<String>, last: &str) -> String {
        match key {
            Some(k) => state.get(k),
            None => last.to_string(),
        }
    }
}
