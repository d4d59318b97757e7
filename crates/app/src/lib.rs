//! `stockkeeper-app`
//!
//! The single-screen stock tracker: application state and its reducer, a
//! plain-text renderer, environment configuration and an interactive
//! console shell that plays the role of the screen.

pub mod config;
pub mod shell;
pub mod state;
pub mod view;

pub use config::AppConfig;
pub use shell::{Shell, ShellCommand};
pub use state::{Action, AppState};
pub use view::{TimeDisplay, TimeZoneChoice};
