//! Platform M+ MIDI port handling
//!
//! Connects the surface's input/output pair plus the optional secondary
//! output that carries the Midi page's CC stream. Incoming messages are
//! parsed and pushed onto a channel for the dispatch loop.

use anyhow::{Context, Result};
use midir::{MidiInput, MidiInputConnection, MidiOutput, MidiOutputConnection};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::midi::{format_hex, MidiMessage, MidiOut};

#[derive(Debug, Error)]
pub enum PortError {
    #[error("input port '{0}' not found")]
    InputNotFound(String),
    #[error("output port '{0}' not found")]
    OutputNotFound(String),
    #[error("not connected to output port")]
    NotConnected,
}

/// Incoming MIDI event from the surface
#[derive(Debug, Clone)]
pub struct SurfaceEvent {
    pub timestamp: Instant,
    pub message: MidiMessage,
    pub raw_data: Vec<u8>,
}

/// An open output port usable as a `MidiOut` sink
pub struct PortOut {
    conn: Arc<Mutex<MidiOutputConnection>>,
}

impl MidiOut for PortOut {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        conn.send(data).context("sending MIDI data")?;
        debug!("sent: {}", format_hex(data));
        Ok(())
    }
}

/// Output sink for a port that was not found; drops everything
pub struct NullOut;

impl MidiOut for NullOut {
    fn send(&mut self, _data: &[u8]) -> Result<()> {
        Ok(())
    }
}

/// Driver for the physical surface connection
pub struct SurfaceDriver {
    input_conn: Option<MidiInputConnection<()>>,
    output_conn: Option<Arc<Mutex<MidiOutputConnection>>>,
    event_tx: mpsc::Sender<SurfaceEvent>,
    event_rx: Option<mpsc::Receiver<SurfaceEvent>>,
    input_port_name: String,
    output_port_name: String,
    cc_output_port_name: String,
}

impl SurfaceDriver {
    pub fn new(config: &AppConfig) -> Self {
        let (event_tx, event_rx) = mpsc::channel(1000);
        Self {
            input_conn: None,
            output_conn: None,
            event_tx,
            event_rx: Some(event_rx),
            input_port_name: config.midi.input_port.clone(),
            output_port_name: config.midi.output_port.clone(),
            cc_output_port_name: config.midi.cc_output_port.clone(),
        }
    }

    /// List available MIDI input ports
    pub fn list_input_ports() -> Result<Vec<String>> {
        let midi_in = MidiInput::new("mplus-gw-scanner")?;
        Ok(midi_in
            .ports()
            .iter()
            .filter_map(|p| midi_in.port_name(p).ok())
            .collect())
    }

    /// List available MIDI output ports
    pub fn list_output_ports() -> Result<Vec<String>> {
        let midi_out = MidiOutput::new("mplus-gw-scanner")?;
        Ok(midi_out
            .ports()
            .iter()
            .filter_map(|p| midi_out.port_name(p).ok())
            .collect())
    }

    /// Find an input port by case-insensitive substring match
    fn find_input_port(
        midi_in: &MidiInput,
        pattern: &str,
    ) -> Option<(midir::MidiInputPort, String)> {
        for port in midi_in.ports() {
            if let Ok(name) = midi_in.port_name(&port) {
                if name.to_lowercase().contains(&pattern.to_lowercase()) {
                    debug!("found port '{}' matching '{}'", name, pattern);
                    return Some((port, name));
                }
            }
        }
        None
    }

    /// Find an output port by case-insensitive substring match
    fn find_output_port(
        midi_out: &MidiOutput,
        pattern: &str,
    ) -> Option<(midir::MidiOutputPort, String)> {
        for port in midi_out.ports() {
            if let Ok(name) = midi_out.port_name(&port) {
                if name.to_lowercase().contains(&pattern.to_lowercase()) {
                    debug!("found port '{}' matching '{}'", name, pattern);
                    return Some((port, name));
                }
            }
        }
        None
    }

    /// Connect the surface input and output ports
    pub fn connect(&mut self) -> Result<()> {
        info!(
            "connecting surface - input: '{}', output: '{}'",
            self.input_port_name, self.output_port_name
        );

        let midi_in = MidiInput::new("mplus-gw-input").context("creating MIDI input")?;
        let (in_port, port_name) = Self::find_input_port(&midi_in, &self.input_port_name)
            .ok_or_else(|| PortError::InputNotFound(self.input_port_name.clone()))?;
        info!("connecting to input port: {}", port_name);

        let event_tx = self.event_tx.clone();
        let input_conn = midi_in
            .connect(
                &in_port,
                "mplus-gw",
                move |_timestamp, data, _| {
                    if let Some(message) = MidiMessage::parse(data) {
                        let event = SurfaceEvent {
                            timestamp: Instant::now(),
                            message,
                            raw_data: data.to_vec(),
                        };
                        // Never block the MIDI callback thread
                        let _ = event_tx.try_send(event);
                    } else {
                        debug!("unparsed MIDI: {}", format_hex(data));
                    }
                },
                (),
            )
            .map_err(|e| anyhow::anyhow!("connecting to input port: {}", e))?;
        self.input_conn = Some(input_conn);

        let midi_out = MidiOutput::new("mplus-gw-output").context("creating MIDI output")?;
        let (out_port, port_name) = Self::find_output_port(&midi_out, &self.output_port_name)
            .ok_or_else(|| PortError::OutputNotFound(self.output_port_name.clone()))?;
        info!("connecting to output port: {}", port_name);

        let output_conn = midi_out
            .connect(&out_port, "mplus-gw")
            .map_err(|e| anyhow::anyhow!("connecting to output port: {}", e))?;
        self.output_conn = Some(Arc::new(Mutex::new(output_conn)));

        info!("surface connected");
        Ok(())
    }

    /// The surface output as a boxed sink. Call after `connect`.
    pub fn surface_out(&self) -> Result<Box<dyn MidiOut>> {
        let conn = self.output_conn.as_ref().ok_or(PortError::NotConnected)?;
        Ok(Box::new(PortOut { conn: conn.clone() }))
    }

    /// Open the secondary CC output. A missing port is not fatal: the Midi
    /// page still works on the display, the CC stream just goes nowhere.
    pub fn cc_out(&self) -> Box<dyn MidiOut> {
        let midi_out = match MidiOutput::new("mplus-gw-cc") {
            Ok(m) => m,
            Err(e) => {
                warn!("CC output unavailable: {}", e);
                return Box::new(NullOut);
            }
        };
        match Self::find_output_port(&midi_out, &self.cc_output_port_name) {
            Some((port, name)) => match midi_out.connect(&port, "mplus-gw-cc") {
                Ok(conn) => {
                    info!("connected CC output port: {}", name);
                    Box::new(PortOut {
                        conn: Arc::new(Mutex::new(conn)),
                    })
                }
                Err(e) => {
                    warn!("connecting CC output port '{}' failed: {}", name, e);
                    Box::new(NullOut)
                }
            },
            None => {
                warn!(
                    "CC output port '{}' not found, Midi page CC stream disabled",
                    self.cc_output_port_name
                );
                Box::new(NullOut)
            }
        }
    }

    /// Take the event receiver for the dispatch loop to consume
    pub fn take_event_receiver(&mut self) -> Option<mpsc::Receiver<SurfaceEvent>> {
        self.event_rx.take()
    }
}
