//! Companion TUI - Terminal host for the screen companions
//!
//! Runs the pet and its owner inside a full-screen terminal, drawn with
//! half-block pixel art on top of an otherwise empty screen.
//!
//! # Architecture
//!
//! - **Host**: the engine's boundary traits over a character grid
//! - **Compositor**: z-ordered layers for sprites, bubbles and status bar
//! - **Sprite / Bubble**: atlas sampling and bubble text layout
//! - **App**: async event loop (terminal events, frame ticks, playback)
//! - **Headless**: fixed-tick runs that report a JSON snapshot

pub mod app;
pub mod bubble;
pub mod compositor;
pub mod headless;
pub mod host;
pub mod sprite;
pub mod theme;

pub use app::{App, AppOptions};
pub use headless::{run_headless, HeadlessReport};
pub use host::{PlaybackEvent, TerminalHost};
