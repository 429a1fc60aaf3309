//! Gateway library for the Icon Platform M+ control surface.
//!
//! The surface speaks Mackie-style MIDI: faders on pitch bend, encoders on
//! relative CCs, buttons and LEDs on notes, and the two-line display over
//! SysEx. The [`surface::Surface`] orchestrator ties input dispatch, the
//! page machine, display synchronization and LED feedback together.

pub mod bindings;
pub mod config;
pub mod display;
pub mod jog;
pub mod layout;
pub mod leds;
pub mod midi;
pub mod pages;
pub mod ports;
pub mod state;
pub mod surface;

#[cfg(test)]
pub mod testing;
