//! Test doubles shared across module tests

use crate::midi::MidiOut;
use anyhow::Result;
use std::sync::{Arc, Mutex};

/// Records every outgoing message for assertion
#[derive(Debug, Default)]
pub struct RecordingOut {
    pub sent: Vec<Vec<u8>>,
}

impl RecordingOut {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MidiOut for RecordingOut {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        self.sent.push(data.to_vec());
        Ok(())
    }
}

/// A recorder whose log outlives the owner, for code that takes the output
/// port by value (the surface owns its ports as boxed trait objects).
#[derive(Debug, Clone, Default)]
pub struct SharedOut {
    sent: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl SharedOut {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.sent.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

impl MidiOut for SharedOut {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        self.sent.lock().unwrap().push(data.to_vec());
        Ok(())
    }
}
