//! Platform abstraction layer
//!
//! The host owns the window and devices; the simulation only sees the
//! narrow query interfaces defined here.

pub mod input;

pub use input::{Button, ControllerState, InputSource, InputState, Key};
