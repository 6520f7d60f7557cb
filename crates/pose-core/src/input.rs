//! Pointer and wheel input as routed through the viewport element

use glam::Vec2;

use crate::constants::{COARSE_SPEED_MULTIPLIER, FINE_SPEED_MULTIPLIER};
use crate::events::{EventHub, Propagation};

/// Pressed-button bit mask, following the browser `buttons` convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerButtons(pub u8);

impl PointerButtons {
    pub const NONE: Self = Self(0);
    pub const PRIMARY: Self = Self(1);
    pub const SECONDARY: Self = Self(2);
    pub const MIDDLE: Self = Self(4);

    pub fn contains(self, other: Self) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    pub fn primary(self) -> bool {
        self.contains(Self::PRIMARY)
    }

    pub fn secondary(self) -> bool {
        self.contains(Self::SECONDARY)
    }

    pub fn middle(self) -> bool {
        self.contains(Self::MIDDLE)
    }
}

impl std::ops::BitOr for PointerButtons {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Keyboard modifiers held during a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
        alt: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        shift: false,
        alt: false,
    };

    pub const SHIFT: Self = Self {
        ctrl: false,
        shift: true,
        alt: false,
    };

    /// Drag speed factor: Ctrl slows down, Shift speeds up. Ctrl wins.
    pub fn speed_multiplier(&self) -> f32 {
        if self.ctrl {
            FINE_SPEED_MULTIPLIER
        } else if self.shift {
            COARSE_SPEED_MULTIPLIER
        } else {
            1.0
        }
    }
}

/// Pointer event phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Up,
    Move,
}

/// A pointer event in element pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    /// Position relative to the element's top-left corner
    pub position: Vec2,
    /// Movement since the previous event (`movementX`, `movementY`)
    pub movement: Vec2,
    pub buttons: PointerButtons,
    pub modifiers: Modifiers,
    /// Index of the viewport under the pointer, filled in by the element
    pub viewport: Option<usize>,
    consumed: bool,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, position: Vec2, buttons: PointerButtons) -> Self {
        Self {
            kind,
            position,
            movement: Vec2::ZERO,
            buttons,
            modifiers: Modifiers::NONE,
            viewport: None,
            consumed: false,
        }
    }

    /// A move event carrying `movement`
    pub fn moved(position: Vec2, movement: Vec2, buttons: PointerButtons) -> Self {
        Self {
            movement,
            ..Self::new(PointerEventKind::Move, position, buttons)
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_viewport(mut self, viewport: usize) -> Self {
        self.viewport = Some(viewport);
        self
    }

    /// Mark the event handled so later handlers don't see it
    pub fn stop_propagation(&mut self) {
        self.consumed = true;
    }

    pub fn is_primary_drag(&self) -> bool {
        self.buttons.primary()
    }
}

impl Propagation for PointerEvent {
    fn is_consumed(&self) -> bool {
        self.consumed
    }
}

/// Wheel event in element pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEvent {
    pub position: Vec2,
    /// Scroll amount, positive away from the user
    pub delta: f32,
    pub modifiers: Modifiers,
    pub viewport: Option<usize>,
}

impl WheelEvent {
    pub fn new(position: Vec2, delta: f32) -> Self {
        Self {
            position,
            delta,
            modifiers: Modifiers::NONE,
            viewport: None,
        }
    }
}

/// System-wide pointer notifications
pub type PointerHub = EventHub<PointerEvent>;
