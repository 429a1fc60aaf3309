//! Page and subpage registry
//!
//! The set of pages is fixed at startup and cycled with the prev/next page
//! buttons. Each page declares its initial subpage name, an optional manual
//! LED table for mutually-exclusive subpage choices, and which state fields
//! feed the display's title rows. Everything here is data; the activation
//! side effects live in the surface.

use crate::state::Field;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Top-level operating modes, in cycle order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageId {
    Mixer,
    SelectedTrack,
    ChannelStrip,
    ControlRoom,
    Midi,
}

impl PageId {
    pub const ALL: [PageId; 5] = [
        PageId::Mixer,
        PageId::SelectedTrack,
        PageId::ChannelStrip,
        PageId::ControlRoom,
        PageId::Midi,
    ];

    /// Name as stored in device state
    pub fn as_str(self) -> &'static str {
        match self {
            PageId::Mixer => "Mixer",
            PageId::SelectedTrack => "SelectedTrack",
            PageId::ChannelStrip => "ChannelStrip",
            PageId::ControlRoom => "ControlRoom",
            PageId::Midi => "Midi",
        }
    }

    pub fn from_state(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.as_str() == name)
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|&p| p == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let i = Self::ALL.iter().position(|&p| p == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Where a fader title change writes, per page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleRouting {
    /// Object title into `Title`, value title into `ValueTitles`
    TitleAndValueTitles,
    /// Value title into `ValueTitles` only
    ValueTitlesOnly,
}

/// Static description of one page
pub struct PageDef {
    pub id: PageId,
    /// Subpage name stored in device state on activation
    pub initial_subpage: &'static str,
    /// Manual LED feedback: (subpage name, note) pairs, or empty when native
    /// toggle bindings suffice
    pub subpage_leds: &'static [(&'static str, u8)],
    pub title_routing: TitleRouting,
    /// Which field feeds the title row of a full-scope render
    pub title_field: Field,
}

static SELECTED_TRACK_LEDS: &[(&str, u8)] = &[
    ("SendsQC", 0),
    ("EQ", 1),
    ("PreFilter", 2),
    ("CueSends", 3),
];

static CHANNEL_STRIP_LEDS: &[(&str, u8)] = &[
    ("Gate", 24),
    ("Compressor", 25),
    ("Tools", 26),
    ("Saturator", 27),
    ("Limiter", 28),
];

/// Process-wide page registry, constructed once at startup
pub static PAGES: Lazy<HashMap<PageId, PageDef>> = Lazy::new(|| {
    let defs = [
        PageDef {
            id: PageId::Mixer,
            initial_subpage: "Default",
            subpage_leds: &[],
            title_routing: TitleRouting::TitleAndValueTitles,
            title_field: Field::Title,
        },
        PageDef {
            id: PageId::SelectedTrack,
            initial_subpage: "SendsQC",
            subpage_leds: SELECTED_TRACK_LEDS,
            title_routing: TitleRouting::ValueTitlesOnly,
            title_field: Field::ValueTitles,
        },
        PageDef {
            id: PageId::ChannelStrip,
            initial_subpage: "Gate",
            subpage_leds: CHANNEL_STRIP_LEDS,
            title_routing: TitleRouting::ValueTitlesOnly,
            title_field: Field::ValueTitles,
        },
        PageDef {
            id: PageId::ControlRoom,
            initial_subpage: "Default",
            subpage_leds: &[],
            title_routing: TitleRouting::TitleAndValueTitles,
            title_field: Field::Title,
        },
        PageDef {
            id: PageId::Midi,
            initial_subpage: "Default",
            subpage_leds: &[],
            title_routing: TitleRouting::TitleAndValueTitles,
            title_field: Field::ValueTitles,
        },
    ];
    defs.into_iter().map(|d| (d.id, d)).collect()
});

/// Look up a page definition
pub fn page_def(id: PageId) -> &'static PageDef {
    // The registry covers every PageId variant by construction
    PAGES.get(&id).expect("page registry is total")
}

/// LED note for a named subpage of a page, if the page drives manual feedback
pub fn led_note_for_subpage(id: PageId, subpage: &str) -> Option<u8> {
    page_def(id)
        .subpage_leds
        .iter()
        .find(|(name, _)| *name == subpage)
        .map(|&(_, note)| note)
}

/// Reverse lookup: the subpage a pressed note selects on this page
pub fn subpage_for_note(id: PageId, note: u8) -> Option<&'static str> {
    page_def(id)
        .subpage_leds
        .iter()
        .find(|&&(_, n)| n == note)
        .map(|&(name, _)| name)
}

/// Jog area subpages, cycled by the jog wheel push. The second element is
/// the indicator character shown in physical row 0's indicator slot.
pub static JOG_SUBPAGES: &[(&str, char)] = &[("Nudge", 'N'), ("Scrub", 'S')];

/// Zoom area subpages, cycled by the zoom on/off chord. The indicator is
/// shown in physical row 1's slot.
pub static ZOOM_SUBPAGES: &[(&str, char)] = &[("Zoom", 'Z'), ("Nav", 'N')];
