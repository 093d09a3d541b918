//! Client Module
//!
//! The public operation surface of the crate: a [`Client`] owns one
//! connection and exposes one typed method per remote command.
//!
//! ## Architecture
//!
//! ```text
//! Caller
//!    │  client.get("name")
//!    ▼
//! ┌─────────────────┐
//! │     Client      │  (this module)
//! │                 │
//! │  - Marshal args │
//! │  - One round    │
//! │    trip         │
//! │  - Map reply to │
//! │    typed result │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   Connection    │  (connection module)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  RESP encoder / │  (protocol module)
//! │  reply parser   │
//! └─────────────────┘
//! ```
//!
//! ## Result conventions
//!
//! - Server error replies: [`Error::Server`] with the message verbatim.
//! - Absence: `None`, `false` or an empty `Vec` - never an error.
//! - Shape mismatches: [`Error::UnexpectedReply`].

pub mod commands;
pub mod info;

// Re-export the public surface
pub use commands::{Client, Error, Result};
pub use info::{KeyType, ServerInfo};
