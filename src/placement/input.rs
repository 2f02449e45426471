//! Keyboard and mouse interpretation for placement.

use winit::keyboard::{Key, NamedKey};

/// Pointer travel, in pixels, below which press + release counts as a click
pub const CLICK_TOLERANCE: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementCommand {
    Rotate,
    Delete,
}

impl PlacementCommand {
    /// `R`/`Q` rotate, `Delete`/`Backspace` delete
    pub fn from_key(key: &Key) -> Option<Self> {
        match key {
            Key::Character(text) => match text.as_str() {
                "r" | "R" | "q" | "Q" => Some(Self::Rotate),
                _ => None,
            },
            Key::Named(NamedKey::Delete | NamedKey::Backspace) => Some(Self::Delete),
            _ => None,
        }
    }
}

pub fn is_quit_key(key: &Key) -> bool {
    matches!(key, Key::Named(NamedKey::Escape))
}

/// Separates clicks from orbit drags on the left mouse button
#[derive(Debug, Clone, Default)]
pub struct ClickTracker {
    pressed_at: Option<(f32, f32)>,
}

impl ClickTracker {
    pub fn press(&mut self, position: (f32, f32)) {
        self.pressed_at = Some(position);
    }

    /// True when the button went up within [`CLICK_TOLERANCE`] of where it
    /// went down
    pub fn release(&mut self, position: (f32, f32)) -> bool {
        let Some((x, y)) = self.pressed_at.take() else {
            return false;
        };
        let (dx, dy) = (position.0 - x, position.1 - y);
        (dx * dx + dy * dy).sqrt() <= CLICK_TOLERANCE
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed_at.is_some()
    }
}
