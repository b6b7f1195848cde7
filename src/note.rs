use crate::error::ConfigError;

/// The scale the pad plays, left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteTable {
    notes: Vec<u8>,
}

impl NoteTable {
    /// Parses a comma separated list like `"60, 62, 64"`.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut notes = Vec::new();
        for (position, token) in content.split(',').enumerate() {
            let token = token.trim();
            let value: i64 = token.parse().map_err(|_| ConfigError::InvalidNote {
                position,
                token: token.to_string(),
            })?;
            let note = u8::try_from(value)
                .ok()
                .filter(|n| *n <= 127)
                .ok_or(ConfigError::NoteOutOfRange {
                    position,
                    note: value,
                })?;
            notes.push(note);
        }

        // `split` yields at least one token, so an empty file already failed above.
        Ok(Self { notes })
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Panics if `index` is out of range; callers get indices from
    /// `mapper::note_index_from_x`, which never produces one.
    pub fn note_at(&self, index: usize) -> u8 {
        self.notes[index]
    }

    pub fn min(&self) -> u8 {
        self.notes.iter().copied().min().unwrap_or_default()
    }

    pub fn max(&self) -> u8 {
        self.notes.iter().copied().max().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn(u8, u8),        // (midi number, velocity)
    NoteOff(u8, u8),       // (midi number, velocity)
    ControlChange(u8, u8), // (controller number, value)
}

impl MidiEvent {
    /// Raw channel message, `channel` in 0..16.
    pub fn to_bytes(self, channel: u8) -> [u8; 3] {
        let channel = channel & 0x0F;
        match self {
            MidiEvent::NoteOn(note, velocity) => [0x90 | channel, note, velocity],
            MidiEvent::NoteOff(note, velocity) => [0x80 | channel, note, velocity],
            MidiEvent::ControlChange(controller, value) => [0xB0 | channel, controller, value],
        }
    }
}
