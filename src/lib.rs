//! Voice-command dictation engine.
//!
//! Takes raw utterances from a speech recognizer and turns them into
//! keyboard output: dictated text is formatted and typed, while segments
//! bracketed by the spoken escape word are parsed and executed as commands
//! (keystrokes, case formatting, find motions, undo). Everything an
//! utterance did is recorded so "scratch that" can take it back.

pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod executor;
pub mod formatter;
pub mod history;
pub mod keyboard;
pub mod multiplier;
pub mod registry;
pub mod signals;
pub mod writer;

pub use error::{Error, Result};
