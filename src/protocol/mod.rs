//! RESP (Redis Serialization Protocol) Implementation
//!
//! This module implements the client side of the RESP wire protocol: encoding
//! requests and decoding the five reply shapes a server can send back.
//!
//! ## Overview
//!
//! Requests are multi-bulk arrays of length-prefixed bulk strings, so every
//! argument is binary-safe. Replies are tagged frames (`+ - : $ *`) with
//! CRLF-terminated headers; bulk and multi-bulk replies carry an explicit
//! `-1` length to signal absence, which is distinct from emptiness.
//!
//! ## Modules
//!
//! - `types`: the [`Reply`] enum and wire serialization
//! - `parser`: incremental decoder for reply streams
//! - `command`: request builder and encoder
//!
//! ## Example
//!
//! ```
//! use boltlink::protocol::{parse_reply, Command, Reply};
//!
//! // Encoding an outgoing request
//! let request = Command::new("GET").arg("name").encode();
//! assert_eq!(request, b"*2\r\n$3\r\nGET\r\n$4\r\nname\r\n");
//!
//! // Decoding an incoming reply
//! let (reply, consumed) = parse_reply(b"$4\r\nAriz\r\n").unwrap().unwrap();
//! assert_eq!(reply, Reply::bulk("Ariz"));
//! assert_eq!(consumed, 10);
//! ```

pub mod command;
pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use command::Command;
pub use parser::{parse_reply, ParseError, ParseResult, ReplyParser};
pub use types::Reply;
