use crate::error::ConfigError;
use crate::note::NoteTable;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "KAOSS_PAD_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "kaoss_pad.json";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub notes_file: PathBuf,
    pub port_name: String,
    /// Create our own port under `port_name` instead of looking one up (unix only).
    pub virtual_port: bool,
    pub channel: u8,
    pub velocity: u8,
    pub controller: u8,
    pub cursor_radius: f32,
    pub fullscreen: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notes_file: PathBuf::from("notes.txt"),
            port_name: "loopMIDI Port 1".to_string(),
            virtual_port: false,
            channel: 0,
            velocity: 64,
            controller: 1,
            cursor_radius: 15.0,
            fullscreen: true,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel > 15 {
            return Err(ConfigError::InvalidChannel(self.channel));
        }
        for (field, value) in [("velocity", self.velocity), ("controller", self.controller)] {
            if value > 127 {
                return Err(ConfigError::InvalidDataByte { field, value });
            }
        }
        Ok(())
    }
}

/// `$KAOSS_PAD_CONFIG`, falling back to `kaoss_pad.json` in the working directory.
pub fn settings_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::warn!("{} not found, using default settings", path.display());
            return Ok(Settings::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let settings: Settings =
        serde_json::from_str(&content).map_err(|source| ConfigError::Settings {
            path: path.to_path_buf(),
            source,
        })?;
    settings.validate()?;
    Ok(settings)
}

pub fn load_note_table(path: &Path) -> Result<NoteTable, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    NoteTable::parse(&content)
}
