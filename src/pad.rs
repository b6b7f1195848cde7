use std::sync::mpsc;

use eframe::egui;

use crate::config::Settings;
use crate::controller::{Controller, Flow, InputEvent, Surface};
use crate::error::{Error, Result};
use crate::midi::MidiSink;

const TITLE: &str = "Kaossilator-like Synth";

struct PadApp<S: MidiSink> {
    controller: Controller<S>,
    cursor_radius: f32,
    failures: mpsc::Sender<Error>,
    finished: bool,
}

impl<S: MidiSink> PadApp<S> {
    fn new(controller: Controller<S>, cursor_radius: f32, failures: mpsc::Sender<Error>) -> Self {
        Self {
            controller,
            cursor_radius,
            failures,
            finished: false,
        }
    }

    /// Runs this frame's input through the controller. Returns false once
    /// the pad should close; after that all input is dropped.
    fn process_input(&mut self, events: Vec<InputEvent>, surface: Surface) -> bool {
        if self.finished {
            return false;
        }
        if events.is_empty() {
            return true;
        }

        match self.controller.run(events, surface) {
            Ok(Flow::Continue) => {
                log::trace!(
                    "pressed={} note={:?} control={}",
                    self.controller.is_pressed(),
                    self.controller.current_note(),
                    self.controller.control_value()
                );
                return true;
            }
            Ok(Flow::Quit) => {}
            Err(e) => {
                let _ = self.failures.send(e);
            }
        }
        self.finished = true;
        false
    }

    fn draw(&self, ui: &egui::Ui, origin: egui::Pos2) {
        if let Some(cursor) = self.controller.cursor() {
            let color = egui::Color32::from_rgb(cursor.color.r, cursor.color.g, cursor.color.b);
            ui.painter().circle_filled(
                egui::pos2(origin.x + cursor.x, origin.y + cursor.y),
                self.cursor_radius,
                color,
            );
        }
    }
}

/// Maps egui's raw events into pad coordinates. Only the primary button plays.
pub fn translate(events: &[egui::Event], origin: egui::Pos2) -> Vec<InputEvent> {
    events
        .iter()
        .filter_map(|event| match event {
            egui::Event::PointerButton {
                pos,
                button: egui::PointerButton::Primary,
                pressed: true,
                ..
            } => Some(InputEvent::PointerDown(pos.x - origin.x, pos.y - origin.y)),
            egui::Event::PointerButton {
                button: egui::PointerButton::Primary,
                pressed: false,
                ..
            } => Some(InputEvent::PointerUp),
            egui::Event::PointerMoved(pos) => {
                Some(InputEvent::PointerMove(pos.x - origin.x, pos.y - origin.y))
            }
            egui::Event::Key {
                key: egui::Key::Escape,
                pressed: true,
                ..
            } => Some(InputEvent::Quit),
            _ => None,
        })
        .collect()
}

impl<S: MidiSink> eframe::App for PadApp<S> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                let surface = Surface {
                    width: rect.width(),
                    height: rect.height(),
                };
                let mut events = ui.input(|i| translate(&i.events, rect.min));
                if ui.input(|i| i.viewport().close_requested()) {
                    events.push(InputEvent::Quit);
                }
                if !self.process_input(events, surface) {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
                self.draw(ui, rect.min);
            });
    }
}

/// Opens the pad window and blocks until it is closed. The controller, and
/// with it the MIDI output, is dropped when the window goes away.
pub fn run<S: MidiSink + 'static>(controller: Controller<S>, settings: &Settings) -> Result<()> {
    let (failures, failed) = mpsc::channel();
    let cursor_radius = settings.cursor_radius;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITLE)
            .with_fullscreen(settings.fullscreen),
        ..Default::default()
    };

    eframe::run_native(
        TITLE,
        native_options,
        Box::new(move |_cc| Ok(Box::new(PadApp::new(controller, cursor_radius, failures)))),
    )?;

    match failed.try_recv() {
        Ok(e) => Err(e),
        Err(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeviceError;
    use crate::note::{MidiEvent, NoteTable};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Logs every attempted send; attempts past `fail_from` fail.
    struct FlakyPort {
        attempts: Rc<RefCell<Vec<MidiEvent>>>,
        fail_from: usize,
    }

    impl MidiSink for FlakyPort {
        fn send(&mut self, event: MidiEvent) -> std::result::Result<(), DeviceError> {
            let mut attempts = self.attempts.borrow_mut();
            attempts.push(event);
            if attempts.len() > self.fail_from {
                return Err(DeviceError::Send(midir::SendError::Other("port unplugged")));
            }
            Ok(())
        }
    }

    const SURFACE: Surface = Surface {
        width: 500.0,
        height: 400.0,
    };

    fn flaky_pad(
        fail_from: usize,
    ) -> (PadApp<FlakyPort>, Rc<RefCell<Vec<MidiEvent>>>, mpsc::Receiver<Error>) {
        let attempts = Rc::new(RefCell::new(Vec::new()));
        let port = FlakyPort {
            attempts: attempts.clone(),
            fail_from,
        };
        let notes = NoteTable::parse("60,62,64,65,67").unwrap();
        let (failures, failed) = mpsc::channel();
        let app = PadApp::new(Controller::new(notes, port, 64, 1), 15.0, failures);
        (app, attempts, failed)
    }

    #[test]
    fn send_failure_closes_the_pad_and_reports_back() {
        let (mut app, attempts, failed) = flaky_pad(0);
        let events = vec![
            InputEvent::PointerDown(10.0, 10.0),
            InputEvent::PointerMove(400.0, 10.0),
        ];
        assert!(!app.process_input(events, SURFACE));
        assert!(matches!(
            failed.try_recv(),
            Ok(Error::Device(DeviceError::Send(_)))
        ));
        // Only the failing NoteOn was attempted; the move never reached the port.
        assert_eq!(*attempts.borrow(), vec![MidiEvent::NoteOn(60, 64)]);

        assert!(!app.process_input(vec![InputEvent::PointerDown(300.0, 10.0)], SURFACE));
        assert_eq!(attempts.borrow().len(), 1);
        assert!(failed.try_recv().is_err());
    }

    #[test]
    fn quit_closes_the_pad_without_error() {
        let (mut app, attempts, failed) = flaky_pad(usize::MAX);
        assert!(app.process_input(vec![InputEvent::PointerDown(10.0, 200.0)], SURFACE));
        assert!(app.process_input(Vec::new(), SURFACE));
        assert!(!app.process_input(vec![InputEvent::Quit], SURFACE));
        assert!(failed.try_recv().is_err());
        assert_eq!(
            attempts.borrow().last(),
            Some(&MidiEvent::NoteOff(60, 64))
        );

        assert!(!app.process_input(vec![InputEvent::PointerDown(10.0, 200.0)], SURFACE));
        assert_eq!(attempts.borrow().len(), 3);
    }

    fn button(x: f32, y: f32, button: egui::PointerButton, pressed: bool) -> egui::Event {
        egui::Event::PointerButton {
            pos: egui::pos2(x, y),
            button,
            pressed,
            modifiers: egui::Modifiers::NONE,
        }
    }

    #[test]
    fn pointer_events_are_relative_to_the_pad() {
        let origin = egui::pos2(10.0, 20.0);
        let events = [
            button(110.0, 70.0, egui::PointerButton::Primary, true),
            egui::Event::PointerMoved(egui::pos2(60.0, 20.0)),
            button(60.0, 20.0, egui::PointerButton::Primary, false),
        ];
        assert_eq!(
            translate(&events, origin),
            vec![
                InputEvent::PointerDown(100.0, 50.0),
                InputEvent::PointerMove(50.0, 0.0),
                InputEvent::PointerUp,
            ]
        );
    }

    #[test]
    fn other_buttons_and_keys_are_ignored() {
        let events = [
            button(5.0, 5.0, egui::PointerButton::Secondary, true),
            egui::Event::Key {
                key: egui::Key::A,
                physical_key: None,
                pressed: true,
                repeat: false,
                modifiers: egui::Modifiers::NONE,
            },
        ];
        assert!(translate(&events, egui::Pos2::ZERO).is_empty());
    }

    #[test]
    fn escape_quits() {
        let events = [egui::Event::Key {
            key: egui::Key::Escape,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers: egui::Modifiers::NONE,
        }];
        assert_eq!(translate(&events, egui::Pos2::ZERO), vec![InputEvent::Quit]);
    }
}
