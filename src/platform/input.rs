//! Keyboard and controller queries
//!
//! [`InputSource`] mirrors what a windowing backend exposes each frame:
//! held keys, key press edges, and per-controller state. [`InputState`] is a
//! plain in-memory implementation for headless runs and tests.

use std::collections::HashSet;

use glam::Vec2;

use crate::consts::MAX_PLAYERS;

/// Keys the game reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Left,
    Right,
    W,
    A,
    D,
    Space,
    /// Restart after game over
    Enter,
    /// Pause toggle
    Escape,
    /// Pause toggle
    P,
    /// Slow motion (held)
    T,
    /// Single step while paused
    O,
    /// Debug draw toggle
    F1,
}

/// Controller buttons the game reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Fire
    A,
    /// Join, or restart after game over
    Start,
    /// Pause toggle
    Back,
}

impl Button {
    fn bit(self) -> u16 {
        match self {
            Button::A => 1 << 0,
            Button::Start => 1 << 1,
            Button::Back => 1 << 2,
        }
    }
}

/// Snapshot of one controller for the current frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControllerState {
    pub connected: bool,
    /// Left analog stick, already dead-zone corrected; length in `[0, 1]`
    pub left_stick: Vec2,
    down: u16,
    just_pressed: u16,
}

impl ControllerState {
    pub fn connected() -> Self {
        Self {
            connected: true,
            ..Self::default()
        }
    }

    pub fn is_button_down(&self, button: Button) -> bool {
        self.down & button.bit() != 0
    }

    pub fn was_button_just_pressed(&self, button: Button) -> bool {
        self.just_pressed & button.bit() != 0
    }

    /// Stick deflection in `[0, 1]`
    pub fn stick_magnitude(&self) -> f32 {
        self.left_stick.length().min(1.0)
    }

    pub fn press(&mut self, button: Button) {
        self.down |= button.bit();
        self.just_pressed |= button.bit();
    }

    pub fn release(&mut self, button: Button) {
        self.down &= !button.bit();
    }

    /// Forget press edges at the end of a frame
    pub fn end_frame(&mut self) {
        self.just_pressed = 0;
    }
}

/// Input service provided by the host
pub trait InputSource {
    fn was_key_just_pressed(&self, key: Key) -> bool;
    fn is_key_down(&self, key: Key) -> bool;
    /// Disconnected controllers report `ControllerState::default()`
    fn controller(&self, index: usize) -> ControllerState;
}

/// In-memory input state
#[derive(Debug, Clone, Default)]
pub struct InputState {
    down: HashSet<Key>,
    just_pressed: HashSet<Key>,
    controllers: [ControllerState; MAX_PLAYERS],
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press_key(&mut self, key: Key) {
        if self.down.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn release_key(&mut self, key: Key) {
        self.down.remove(&key);
    }

    /// Mutable access to a controller slot; out-of-range indices return `None`
    pub fn controller_mut(&mut self, index: usize) -> Option<&mut ControllerState> {
        self.controllers.get_mut(index)
    }

    /// Forget key and button press edges
    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        for controller in &mut self.controllers {
            controller.end_frame();
        }
    }
}

impl InputSource for InputState {
    fn was_key_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    fn is_key_down(&self, key: Key) -> bool {
        self.down.contains(&key)
    }

    fn controller(&self, index: usize) -> ControllerState {
        self.controllers.get(index).copied().unwrap_or_default()
    }
}
