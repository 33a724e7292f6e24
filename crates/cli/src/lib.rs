//! Terminal front end for playing timed games against the computer.
//!
//! [`session::Session`] hosts a `chess_core::Game` on the tokio runtime;
//! [`input`] turns typed lines into commands and [`render`] turns game
//! state back into text.

pub mod config;
pub mod input;
pub mod render;
pub mod session;

pub use config::{AppConfig, CliArgs, ConfigError};
pub use input::{parse_command, InputError, UserCommand};
pub use session::{Response, Session, SessionError, SessionEvent};
