//! The pad's note state machine.
//!
//! Idle until the pointer goes down, then exactly one note sounds until it
//! comes back up. Dragging across note columns turns the old note off before
//! the new one starts, and vertical movement drives a single control change.

use crate::error::Result;
use crate::mapper::{color_for_note, control_value_from_y, note_index_from_x, Color};
use crate::midi::MidiSink;
use crate::note::{MidiEvent, NoteTable};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown(f32, f32), // (x, y) in surface pixels
    PointerMove(f32, f32),
    PointerUp,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// What to draw while a note is held.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub x: f32,
    pub y: f32,
    pub color: Color,
}

pub struct Controller<S: MidiSink> {
    notes: NoteTable,
    sink: S,
    velocity: u8,
    controller: u8,
    pressed: bool,
    current_note: Option<u8>,
    current_control: u8,
    position: (f32, f32),
}

impl<S: MidiSink> Controller<S> {
    pub fn new(notes: NoteTable, sink: S, velocity: u8, controller: u8) -> Self {
        Self {
            notes,
            sink,
            velocity,
            controller,
            pressed: false,
            current_note: None,
            current_control: 0,
            position: (0.0, 0.0),
        }
    }

    pub fn handle(&mut self, event: InputEvent, surface: Surface) -> Result<Flow> {
        match event {
            InputEvent::PointerDown(x, y) => {
                if self.pressed {
                    // A second down without an up is just a jump.
                    self.drag_to(x, y, surface)?;
                } else {
                    self.press_at(x, y, surface)?;
                }
            }
            InputEvent::PointerMove(x, y) => {
                if self.pressed {
                    self.drag_to(x, y, surface)?;
                }
            }
            InputEvent::PointerUp => self.release()?,
            InputEvent::Quit => {
                self.release()?;
                return Ok(Flow::Quit);
            }
        }
        Ok(Flow::Continue)
    }

    /// Feeds events one by one until `Quit` or the source runs dry.
    pub fn run<I>(&mut self, events: I, surface: Surface) -> Result<Flow>
    where
        I: IntoIterator<Item = InputEvent>,
    {
        for event in events {
            if self.handle(event, surface)? == Flow::Quit {
                return Ok(Flow::Quit);
            }
        }
        Ok(Flow::Continue)
    }

    fn press_at(&mut self, x: f32, y: f32, surface: Surface) -> Result<()> {
        let note = self.note_at(x, surface);
        let value = control_value_from_y(y, surface.height);

        self.send(MidiEvent::NoteOn(note, self.velocity))?;
        // The note is sounding from here on, even if the control change fails.
        self.pressed = true;
        self.current_note = Some(note);
        self.position = (x, y);

        self.send(MidiEvent::ControlChange(self.controller, value))?;
        self.current_control = value;
        Ok(())
    }

    fn drag_to(&mut self, x: f32, y: f32, surface: Surface) -> Result<()> {
        let note = self.note_at(x, surface);
        let value = control_value_from_y(y, surface.height);
        self.position = (x, y);

        if self.current_note != Some(note) {
            if let Some(old) = self.current_note.take() {
                self.send(MidiEvent::NoteOff(old, self.velocity))?;
            }
            self.send(MidiEvent::NoteOn(note, self.velocity))?;
            self.current_note = Some(note);
        }

        if self.current_control != value {
            self.send(MidiEvent::ControlChange(self.controller, value))?;
            self.current_control = value;
        }
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        self.pressed = false;
        if let Some(note) = self.current_note.take() {
            self.send(MidiEvent::NoteOff(note, self.velocity))?;
        }
        Ok(())
    }

    fn note_at(&self, x: f32, surface: Surface) -> u8 {
        let index = note_index_from_x(x, surface.width, self.notes.len());
        self.notes.note_at(index)
    }

    fn send(&mut self, event: MidiEvent) -> Result<()> {
        match event {
            MidiEvent::NoteOn(note, _) => log::debug!("Sent MIDI Note: {note}"),
            MidiEvent::NoteOff(note, _) => log::debug!("Released MIDI Note: {note}"),
            MidiEvent::ControlChange(_, value) => log::debug!("Sent Control Value: {value}"),
        }
        self.sink.send(event)?;
        Ok(())
    }

    /// Position and color of the sounding note, `None` while idle.
    pub fn cursor(&self) -> Option<Cursor> {
        let note = self.current_note.filter(|_| self.pressed)?;
        let (x, y) = self.position;
        Some(Cursor {
            x,
            y,
            color: color_for_note(note, self.notes.min(), self.notes.max()),
        })
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn current_note(&self) -> Option<u8> {
        self.current_note
    }

    pub fn control_value(&self) -> u8 {
        self.current_control
    }
}
