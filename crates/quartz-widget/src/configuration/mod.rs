//! Configuration management for the widget host.
//!
//! Defaults, the TOML config file and command line flags are layered into one
//! registry, from which the controller's settings are built.

mod config;

pub use config::*;
