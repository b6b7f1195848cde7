//! Touchpad style MIDI controller: pointer x picks a note from a fixed
//! scale, pointer y drives a control change.

use std::process::ExitCode;

mod config;
mod controller;
mod error;
mod mapper;
mod midi;
mod note;
mod pad;

use config::{load_note_table, load_settings, settings_path};
use controller::Controller;
use error::Result;
use midi::MidiPort;

fn run() -> Result<()> {
    let path = settings_path();
    let settings = load_settings(&path)?;
    log::info!("Using settings from {}", path.display());

    let notes = load_note_table(&settings.notes_file)?;
    log::info!(
        "Loaded {} notes from {} ({}..={})",
        notes.len(),
        settings.notes_file.display(),
        notes.min(),
        notes.max()
    );

    let port = if settings.virtual_port {
        MidiPort::create_virtual(&settings.port_name, settings.channel)?
    } else {
        MidiPort::connect(&settings.port_name, settings.channel)?
    };

    let controller = Controller::new(notes, port, settings.velocity, settings.controller);
    pad::run(controller, &settings)?;

    log::info!("Pad closed");
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
