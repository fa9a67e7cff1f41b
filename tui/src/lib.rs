//! Brief TUI - Terminal surface for Brief
//!
//! Renders a parsed security report with progressive effects: bullet
//! items scramble while hovered, the narrative paragraph decrypts into
//! view, and a field of line glyphs turns toward the mouse.
//!
//! # Architecture
//!
//! - **Cli**: argument parsing, report input, configuration loading
//! - **App**: event loop, layout, and frame timing
//! - **Widgets**: stateless renderers for presenter output
//! - **Theme**: palette and shared styles
//!
//! All parsing and animation state lives in `brief-core`; this crate only
//! feeds it time and input and draws the result.

pub mod app;
pub mod cli;
pub mod theme;
pub mod widgets;

pub use app::{App, AppLayout};
pub use cli::Cli;
