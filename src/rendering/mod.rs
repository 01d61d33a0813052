//! # Rendering Module
//!
//! Immediate-mode rendering of the manor board, HUD, and overlays using
//! macroquad.

pub mod display;
pub mod ui;

pub use display::*;
pub use ui::*;
