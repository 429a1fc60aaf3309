//! Rate-to-repetition translation for the jog wheel
//!
//! The wheel reports a speed-encoded scalar per physical tick rather than a
//! position: values just above 0 mean a slow clockwise turn, values just
//! above 0.5 a slow counter-clockwise turn, and the distance from the
//! nearest boundary encodes speed. The translator turns one tick into a
//! burst of discrete command pulses, so a slow turn nudges once and a fast
//! turn nudges up to 63 times.

/// A discrete command target: each pulse is one fire-and-forget activation
pub trait CommandSink {
    fn pulse(&mut self);
}

/// Direction of travel decoded from the rate scalar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JogDirection {
    Increase,
    Decrease,
}

/// Decode a rate scalar into a direction and pulse count.
///
/// Returns None for exactly 0.5 (no movement) and for zero-pulse rates.
pub fn pulses_for_rate(v: f32) -> Option<(JogDirection, u32)> {
    let v = v.clamp(0.0, 1.0);
    if v < 0.5 {
        let repeats = (v * 127.0).floor() as u32;
        (repeats > 0).then_some((JogDirection::Increase, repeats))
    } else if v > 0.5 {
        let repeats = ((v - 0.5) * 127.0).floor() as u32;
        (repeats > 0).then_some((JogDirection::Decrease, repeats))
    } else {
        None
    }
}

/// Drive the command sinks for one rotary tick.
///
/// Each repetition is a distinct pulse; there is no batching. The sink sees
/// N activations, not one activation of magnitude N.
pub fn drive<'a>(v: f32, increase: &'a mut dyn CommandSink, decrease: &'a mut dyn CommandSink) {
    if let Some((direction, repeats)) = pulses_for_rate(v) {
        let sink = match direction {
            JogDirection::Increase => increase,
            JogDirection::Decrease => decrease,
        };
        for _ in 0..repeats {
            sink.pulse();
        }
    }
}
