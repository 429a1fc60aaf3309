//! MIDI wire codec and message types
//!
//! Parses and encodes the messages the Platform M+ actually speaks:
//! Note On/Off (buttons, touch sensors, LEDs), Control Change (encoders,
//! jog), Pitch Bend (faders) and System Exclusive (display rows).

use std::fmt;

/// MIDI message types used by the surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MidiMessage {
    /// Note Off: channel (0-15), note (0-127), velocity (0-127)
    NoteOff { channel: u8, note: u8, velocity: u8 },

    /// Note On: channel (0-15), note (0-127), velocity (0-127)
    NoteOn { channel: u8, note: u8, velocity: u8 },

    /// Control Change: channel (0-15), cc (0-127), value (0-127)
    ControlChange { channel: u8, cc: u8, value: u8 },

    /// Pitch Bend: channel (0-15), value (0-16383, 14-bit)
    PitchBend { channel: u8, value: u16 },

    /// System Exclusive: payload without the framing F0/F7 bytes
    SysEx { data: Vec<u8> },
}

impl MidiMessage {
    /// Parse a MIDI message from raw bytes
    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.is_empty() {
            return None;
        }

        let status = data[0];

        // Running status would need state we don't keep
        if status < 0x80 {
            return None;
        }

        if status < 0xF0 {
            let message_type = status & 0xF0;
            let channel = status & 0x0F;

            match message_type {
                0x80 => {
                    if data.len() < 3 { return None; }
                    Some(MidiMessage::NoteOff {
                        channel,
                        note: data[1] & 0x7F,
                        velocity: data[2] & 0x7F,
                    })
                }
                0x90 => {
                    // Note On with velocity 0 = Note Off
                    if data.len() < 3 { return None; }
                    let note = data[1] & 0x7F;
                    let velocity = data[2] & 0x7F;

                    if velocity == 0 {
                        Some(MidiMessage::NoteOff { channel, note, velocity: 0 })
                    } else {
                        Some(MidiMessage::NoteOn { channel, note, velocity })
                    }
                }
                0xB0 => {
                    if data.len() < 3 { return None; }
                    Some(MidiMessage::ControlChange {
                        channel,
                        cc: data[1] & 0x7F,
                        value: data[2] & 0x7F,
                    })
                }
                0xE0 => {
                    if data.len() < 3 { return None; }
                    let lsb = (data[1] & 0x7F) as u16;
                    let msb = (data[2] & 0x7F) as u16;
                    Some(MidiMessage::PitchBend { channel, value: (msb << 7) | lsb })
                }
                _ => None,
            }
        } else if status == 0xF0 {
            // System Exclusive - find the end (0xF7)
            data.iter()
                .position(|&b| b == 0xF7)
                .map(|end| MidiMessage::SysEx { data: data[1..end].to_vec() })
        } else {
            None
        }
    }

    /// Encode the message to MIDI bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        match *self {
            MidiMessage::NoteOff { channel, note, velocity } => {
                vec![0x80 | (channel & 0x0F), note & 0x7F, velocity & 0x7F]
            }
            MidiMessage::NoteOn { channel, note, velocity } => {
                vec![0x90 | (channel & 0x0F), note & 0x7F, velocity & 0x7F]
            }
            MidiMessage::ControlChange { channel, cc, value } => {
                vec![0xB0 | (channel & 0x0F), cc & 0x7F, value & 0x7F]
            }
            MidiMessage::PitchBend { channel, value } => {
                let lsb = (value & 0x7F) as u8;
                let msb = ((value >> 7) & 0x7F) as u8;
                vec![0xE0 | (channel & 0x0F), lsb, msb]
            }
            MidiMessage::SysEx { ref data } => {
                let mut result = vec![0xF0];
                result.extend_from_slice(data);
                result.push(0xF7);
                result
            }
        }
    }

    /// Get the channel for channel messages (0-15), None for SysEx
    pub fn channel(&self) -> Option<u8> {
        match *self {
            MidiMessage::NoteOff { channel, .. }
            | MidiMessage::NoteOn { channel, .. }
            | MidiMessage::ControlChange { channel, .. }
            | MidiMessage::PitchBend { channel, .. } => Some(channel),
            MidiMessage::SysEx { .. } => None,
        }
    }
}

impl fmt::Display for MidiMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MidiMessage::NoteOff { channel, note, velocity } => {
                write!(f, "NoteOff ch:{} n:{} v:{}", channel + 1, note, velocity)
            }
            MidiMessage::NoteOn { channel, note, velocity } => {
                write!(f, "NoteOn ch:{} n:{} v:{}", channel + 1, note, velocity)
            }
            MidiMessage::ControlChange { channel, cc, value } => {
                write!(f, "CC ch:{} cc:{} v:{}", channel + 1, cc, value)
            }
            MidiMessage::PitchBend { channel, value } => {
                write!(f, "PitchBend ch:{} v:{}", channel + 1, value)
            }
            MidiMessage::SysEx { ref data } => {
                write!(f, "SysEx {} bytes", data.len())
            }
        }
    }
}

/// Outbound MIDI sink
///
/// Production impl wraps a midir output connection; tests record bytes.
/// Transmission is fire-and-forget at the protocol level - an Err here means
/// the port itself failed, not that the device rejected anything.
pub trait MidiOut: Send {
    fn send(&mut self, data: &[u8]) -> anyhow::Result<()>;
}

/// MIDI value conversion utilities
pub mod convert {
    /// Convert 14-bit pitch bend value (0-16383) to normalized 0.0-1.0
    pub fn pb_to_norm(value_14bit: u16) -> f32 {
        value_14bit as f32 / 16383.0
    }

    /// Convert normalized 0.0-1.0 to 14-bit pitch bend value
    pub fn norm_to_pb(norm: f32) -> u16 {
        (norm.clamp(0.0, 1.0) * 16383.0).ceil() as u16
    }

    /// Convert normalized 0.0-1.0 to a 7-bit CC value
    pub fn norm_to_cc(norm: f32) -> u8 {
        (norm.clamp(0.0, 1.0) * 127.0).ceil() as u8
    }

    /// Normalize a 7-bit rate CC value into the jog translator's input domain
    pub fn cc_to_rate(value: u8) -> f32 {
        value as f32 / 127.0
    }

    /// Decode a relative signed-bit encoder value: bit 6 is the direction,
    /// the low 6 bits are the magnitude. Clockwise is positive.
    pub fn relative_signed_bit(value: u8) -> i8 {
        let magnitude = (value & 0x3F) as i8;
        if value & 0x40 != 0 {
            -magnitude
        } else {
            magnitude
        }
    }
}

/// Format MIDI bytes as hex string for debugging
pub fn format_hex(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
