//! Connection Module
//!
//! Transport layer of the client: one [`Connection`] per server session,
//! owning the TCP stream and the buffer that reassembles reply frames from it.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Client                               │
//! │                     (client module)                         │
//! └──────────────────────┬──────────────────────────────────────┘
//!                        │ round_trip(command)
//!                        ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Connection                             │
//! │                                                             │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐      │
//! │  │ Encode +    │───>│ Read bytes  │───>│ Parse reply │      │
//! │  │ send cmd    │    │ (buffered)  │    │ (retry on   │      │
//! │  └─────────────┘    └─────────────┘    │  partial)   │      │
//! │                                        └─────────────┘      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//!
//! - **One round trip at a time**: exactly one send, then exactly one reply.
//! - **Bounded blocking**: every read and write is capped by the configured
//!   I/O timeout.
//! - **Fail fast**: I/O, timeout and protocol errors invalidate the
//!   connection; only a fresh connect recovers.

pub mod conn;

// Re-export commonly used types
pub use conn::{Connection, ConnectionConfig, ConnectionError};
