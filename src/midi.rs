use midir::{MidiOutput, MidiOutputConnection};

use crate::error::DeviceError;
use crate::note::MidiEvent;

const CLIENT_NAME: &str = "kaoss-pad";

/// Where the controller's MIDI goes.
pub trait MidiSink {
    fn send(&mut self, event: MidiEvent) -> Result<(), DeviceError>;
}

/// An open MIDI output connection. Closed when dropped.
pub struct MidiPort {
    name: String,
    channel: u8,
    connection: MidiOutputConnection,
}

/// Exact match wins, otherwise the first name containing `wanted`
/// (ALSA prefixes port names with the client name and adds ids).
pub fn find_port(names: &[String], wanted: &str) -> Option<usize> {
    names
        .iter()
        .position(|name| name == wanted)
        .or_else(|| names.iter().position(|name| name.contains(wanted)))
}

impl MidiPort {
    /// Connects to an existing output named `port_name`.
    pub fn connect(port_name: &str, channel: u8) -> Result<Self, DeviceError> {
        let midi_out = MidiOutput::new(CLIENT_NAME)?;
        let ports = midi_out.ports();
        if ports.is_empty() {
            return Err(DeviceError::NoOutputs);
        }

        let names: Vec<String> = ports
            .iter()
            .map(|p| midi_out.port_name(p).unwrap_or("<unknown>".to_string()))
            .collect();
        log::info!("Available MIDI output devices:");
        for (i, name) in names.iter().enumerate() {
            log::info!("{i}: {name}");
        }

        let index = find_port(&names, port_name)
            .ok_or_else(|| DeviceError::NotFound(port_name.to_string()))?;
        let chosen = names[index].clone();

        let connection = midi_out
            .connect(&ports[index], "kaoss-pad-out")
            .map_err(|e| DeviceError::Connect {
                name: chosen.clone(),
                reason: e.to_string(),
            })?;
        log::info!("Connected to MIDI output: {chosen}");

        Ok(Self {
            name: chosen,
            channel,
            connection,
        })
    }

    /// Publishes our own output port for synths to connect to.
    #[cfg(unix)]
    pub fn create_virtual(port_name: &str, channel: u8) -> Result<Self, DeviceError> {
        use midir::os::unix::VirtualOutput;

        let midi_out = MidiOutput::new(CLIENT_NAME)?;
        let connection =
            midi_out
                .create_virtual(port_name)
                .map_err(|e| DeviceError::Connect {
                    name: port_name.to_string(),
                    reason: e.to_string(),
                })?;
        log::info!("Created virtual MIDI port '{CLIENT_NAME}:{port_name}'");

        Ok(Self {
            name: port_name.to_string(),
            channel,
            connection,
        })
    }

    #[cfg(not(unix))]
    pub fn create_virtual(port_name: &str, _channel: u8) -> Result<Self, DeviceError> {
        Err(DeviceError::Connect {
            name: port_name.to_string(),
            reason: "virtual ports are not supported on this platform".to_string(),
        })
    }
}

impl MidiSink for MidiPort {
    fn send(&mut self, event: MidiEvent) -> Result<(), DeviceError> {
        self.connection.send(&event.to_bytes(self.channel))?;
        Ok(())
    }
}

impl Drop for MidiPort {
    fn drop(&mut self) {
        // midir closes the connection itself once it is dropped
        log::info!("Closing MIDI output {}", self.name);
    }
}
