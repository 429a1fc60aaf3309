//! Per-device key/value state
//!
//! Every connected Platform M+ owns one `DeviceState`. Display content,
//! the active page/subpage and the display mode all live here as strings;
//! an absent key reads as the empty string and "clearing" a key means
//! setting it to `""`. There is no expiry - the store lives for the device
//! connection session.

use std::collections::HashMap;

/// Well-known state keys
pub const KEY_ACTIVE_PAGE: &str = "activePage";
pub const KEY_ACTIVE_SUBPAGE: &str = "activeSubPage";
pub const KEY_DISPLAY_TYPE: &str = "displayType";
pub const KEY_INDICATOR1: &str = "indicator1";
pub const KEY_INDICATOR2: &str = "indicator2";
pub const KEY_SELECTED_TRACK_NAME: &str = "selectedTrackName";

/// String key -> string value store, exclusively owned by one device
#[derive(Debug, Default)]
pub struct DeviceState {
    values: HashMap<String, String>,
}

impl DeviceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a key; absent keys read as ""
    pub fn get(&self, key: &str) -> String {
        self.values.get(key).cloned().unwrap_or_default()
    }

    /// Write a key. Storage only - callers trigger any re-render themselves.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// The currently active (page, subpage) scope
    pub fn scope(&self) -> Scope {
        Scope {
            page: self.get(KEY_ACTIVE_PAGE),
            subpage: self.get(KEY_ACTIVE_SUBPAGE),
        }
    }
}

/// Display row section within a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Fader,
    Pan,
}

impl Section {
    fn as_str(self) -> &'static str {
        match self {
            Section::Fader => "Fader",
            Section::Pan => "Pan",
        }
    }
}

/// Display row field within a section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    ValueTitles,
    Values,
}

impl Field {
    fn as_str(self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::ValueTitles => "ValueTitles",
            Field::Values => "Values",
        }
    }
}

/// A (page, subpage) pair namespacing the six scoped display keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub page: String,
    pub subpage: String,
}

impl Scope {
    pub fn new(page: impl Into<String>, subpage: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            subpage: subpage.into(),
        }
    }

    /// Scoped display key. The `"- "` separator (no space before the dash)
    /// is a wire-compatibility quirk; existing key strings use it.
    pub fn key(&self, section: Section, field: Field) -> String {
        format!(
            "{}- {} - {} - {}",
            self.page,
            self.subpage,
            section.as_str(),
            field.as_str()
        )
    }

    /// All six scoped keys, in reset order
    pub fn all_keys(&self) -> [String; 6] {
        [
            self.key(Section::Fader, Field::Title),
            self.key(Section::Fader, Field::ValueTitles),
            self.key(Section::Fader, Field::Values),
            self.key(Section::Pan, Field::Title),
            self.key(Section::Pan, Field::ValueTitles),
            self.key(Section::Pan, Field::Values),
        ]
    }
}
