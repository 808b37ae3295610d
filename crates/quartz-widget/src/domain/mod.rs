//! Core domain logic for the chat widget.
//!
//! The controller and its models are independent of the terminal host, the
//! storage backend and the HTTP client, which are injected.

pub mod models;
pub mod services;
