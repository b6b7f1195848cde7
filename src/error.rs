use std::path::PathBuf;
use thiserror::Error;

/// Problems with the note list or the settings file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("File {path} not found or unreadable: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid format: token {position} ({token:?}) is not an integer")]
    InvalidNote { position: usize, token: String },

    #[error("Note {note} at position {position} is outside the MIDI range 0-127")]
    NoteOutOfRange { position: usize, note: i64 },

    #[error("Invalid settings in {path}: {source}")]
    Settings {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid MIDI channel {0}. Must be between 0 and 15")]
    InvalidChannel(u8),

    #[error("Invalid {field} {value}. Must be between 0 and 127")]
    InvalidDataByte { field: &'static str, value: u8 },
}

/// Problems acquiring or talking to the MIDI output.
#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("Couldn't create MIDI output: {0}")]
    Init(#[from] midir::InitError),

    #[error("No MIDI output devices found")]
    NoOutputs,

    #[error("{0} not found in available MIDI output devices")]
    NotFound(String),

    #[error("Failed to connect to {name}: {reason}")]
    Connect { name: String, reason: String },

    #[error("Failed to send MIDI: {0}")]
    Send(#[from] midir::SendError),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error("Window error: {0}")]
    Ui(#[from] eframe::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
