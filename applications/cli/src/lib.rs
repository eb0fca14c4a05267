//! Podcast Player command-line front end
//!
//! Library half of the `podcast` binary: configuration, rendering and the
//! headless playback driver.

pub mod config;
pub mod error;
pub mod output;
pub mod player;
