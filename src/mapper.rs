//! Pointer position to MIDI, and note to cursor color.

/// Plain RGB, one byte per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Hue of the lowest note. The highest note sits at hue 0 (red).
pub const LOW_NOTE_HUE: f32 = 0.75;

/// Column of the note under `x`, always inside `0..note_count`.
pub fn note_index_from_x(x: f32, width: f32, note_count: usize) -> usize {
    if width <= 0.0 || note_count == 0 {
        return 0;
    }
    let index = (x / width * note_count as f32).floor();
    if index <= 0.0 {
        0
    } else {
        (index as usize).min(note_count - 1)
    }
}

/// 127 at the top edge, 0 at the bottom.
pub fn control_value_from_y(y: f32, height: f32) -> u8 {
    if height <= 0.0 {
        return 0;
    }
    (127.0 - 127.0 * y / height).round().clamp(0.0, 127.0) as u8
}

pub fn color_for_note(note: u8, min_note: u8, max_note: u8) -> Color {
    let position = if max_note > min_note {
        ((note as f32 - min_note as f32) / (max_note - min_note) as f32).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let hue = LOW_NOTE_HUE * (1.0 - position);
    let (r, g, b) = hsv_to_rgb(hue, 1.0, 1.0);
    Color::new((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
}

/// All inputs and outputs in `0.0..=1.0`.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    if s == 0.0 {
        return (v, v, v);
    }
    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match (sector as i32).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}
