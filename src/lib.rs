//! Flip Ninja: a gravity-flipping side-scroller for the terminal.
//!
//! The simulation (`physics`, `obstacles`, `collision`, `game`) is pure and
//! deterministic for a given seed. Everything that touches the outside
//! world lives in `audio`, `scores`, `settings`, `render` and the binary.

pub mod audio;
pub mod background;
pub mod collision;
pub mod config;
pub mod font;
pub mod game;
pub mod input;
pub mod obstacles;
pub mod physics;
pub mod render;
pub mod scores;
pub mod settings;
