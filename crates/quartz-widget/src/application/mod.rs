//! Application layer hosting the widget in a terminal.
//!
//! This module handles command-line parsing, logging setup and the main UI loop.

pub mod cli;
pub mod ui;
