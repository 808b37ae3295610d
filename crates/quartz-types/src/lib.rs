//! Shared contract between the Quartz chat widget and the chat backend.
//!
//! The backend exposes two JSON endpoints, one to open a session and one to
//! exchange a conversation turn. This crate defines their request and response
//! bodies, the message records the widget persists between restarts, and the
//! typed errors the widget surfaces to the user.
//!
//! ## Example
//!
//! ```rust
//! use quartz_types::{ChatRequest, ExchangeMessage, Role};
//!
//! let request = ChatRequest {
//!     messages: vec![ExchangeMessage::new(Role::User, "Hi")],
//!     session_id: "abc123".to_string(),
//!     agent_name: "Nabeel Ahmad".to_string(),
//! };
//!
//! assert_eq!(request.messages[0].role, Role::User);
//! ```

pub mod error;
pub mod types;

pub use error::*;
pub use types::*;
