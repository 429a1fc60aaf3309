//! Fixed MIDI layout of the Platform M+ surface
//!
//! These note and CC numbers are hardware facts; they must match the device
//! firmware exactly.

/// Number of channel strips
pub const NUM_STRIPS: u8 = 8;

/// Per-strip note bases: the button note is `base + strip index`
pub const REC_BASE: u8 = 0;
pub const SOLO_BASE: u8 = 8;
pub const MUTE_BASE: u8 = 16;
pub const SEL_BASE: u8 = 24;

/// Push of a channel strip encoder
pub const ENCODER_PUSH_BASE: u8 = 32;
/// Fader touch sensors (strips 0-7, master = 104 + 8)
pub const FADER_TOUCH_BASE: u8 = 104;
/// Channel strip rotary encoders, relative signed-bit CC
pub const ENCODER_CC_BASE: u8 = 16;

/// Master strip buttons
pub const MIXER_MODE: u8 = 84;
pub const AUTO_READ: u8 = 74;
pub const AUTO_WRITE: u8 = 75;

/// Transport block
pub const PREV_PAGE: u8 = 48;
pub const NEXT_PAGE: u8 = 49;
pub const PREV_BANK: u8 = 46;
pub const NEXT_BANK: u8 = 47;
pub const REWIND: u8 = 91;
pub const FORWARD: u8 = 92;
pub const STOP: u8 = 93;
pub const START: u8 = 94;
pub const RECORD: u8 = 95;
pub const CYCLE: u8 = 86;

/// Chord of prev-channel + prev-bank
pub const FLIP: u8 = 50;
/// Chord of both zoom buttons, toggles the zoom subpage area
pub const ZOOM_TOGGLE: u8 = 100;
pub const ZOOM_VERT_OUT: u8 = 96;
pub const ZOOM_VERT_IN: u8 = 97;
pub const ZOOM_HORIZ_OUT: u8 = 98;
pub const ZOOM_HORIZ_IN: u8 = 99;
/// Push of the jog wheel, toggles the jog subpage area
pub const JOG_PUSH: u8 = 101;

/// The jog wheel reports a speed-encoded rate on this CC
pub const JOG_CC: u8 = 60;

/// Strip button note for a given base and 0-based strip index
pub fn strip_note(base: u8, index: u8) -> u8 {
    base + index
}
