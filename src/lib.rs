//! # BoltLink - A Binary-Safe Redis Client
//!
//! BoltLink is a client library for Redis-compatible key-value servers.
//! It speaks the RESP wire protocol over a single persistent TCP connection
//! and maps every command to a strongly-typed, binary-safe result.
//!
//! ## Features
//!
//! - **Binary-Safe**: keys and values are raw bytes; embedded CRLF and NUL
//!   round-trip exactly thanks to length-prefixed framing
//! - **Typed Results**: absence (`None`), server errors, and protocol errors
//!   are distinct outcomes, never conflated
//! - **Bounded I/O**: every connect, read, and write is capped by a
//!   configurable timeout; declared reply lengths are validated before any
//!   allocation
//! - **Async**: built on Tokio; one in-flight request per connection
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                             BoltLink                                │
//! │                                                                     │
//! │  ┌─────────────┐     ┌─────────────┐     ┌──────────────────────┐   │
//! │  │   Client    │────>│ Connection  │────>│     TCP stream       │   │
//! │  │  (typed     │     │ (one round  │     │                      │   │
//! │  │   ops)      │<────│  trip at a  │<────│                      │   │
//! │  └─────────────┘     │  time)      │     └──────────────────────┘   │
//! │        │             └──────┬──────┘                                │
//! │        │                    │                                       │
//! │        ▼                    ▼                                       │
//! │  ┌─────────────┐     ┌─────────────┐                                │
//! │  │   Command   │     │    Reply    │                                │
//! │  │   encoder   │     │   parser    │                                │
//! │  └─────────────┘     └─────────────┘                                │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use boltlink::Client;
//!
//! #[tokio::main]
//! async fn main() -> boltlink::client::Result<()> {
//!     let mut client = Client::connect("127.0.0.1:6379").await?;
//!
//!     client.ping().await?;
//!     client.set("name", "Ariz").await?;
//!
//!     match client.get("name").await? {
//!         Some(value) => println!("name = {}", String::from_utf8_lossy(&value)),
//!         None => println!("name is not set"),
//!     }
//!
//!     client.close().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Supported Commands
//!
//! ### Server Commands
//! - `PING`, `AUTH password`, `ECHO message`, `SELECT index`
//! - `INFO`, `LASTSAVE`
//!
//! ### String Commands
//! - `SET key value` / `GET key` / `GETSET key value`
//! - `SETNX key value` / `SETEX key seconds value`
//! - `DEL key` / `EXISTS key` / `TYPE key` / `KEYS pattern`
//! - `MGET key [key ...]`
//! - `INCR key` / `INCRBY key n` / `DECR key` / `DECRBY key n`
//!
//! ### List Commands
//! - `RPUSH` / `LPUSH` / `LPOP` / `RPOP` / `LLEN`
//! - `LRANGE key start stop` / `LREM key count value` / `LSET key index value`
//!
//! ### Set Commands
//! - `SADD` / `SREM` / `SISMEMBER`
//!
//! ### Sorted Set Commands
//! - `ZADD` / `ZREM` / `ZINCRBY` / `ZSCORE` / `ZRANK` / `ZREVRANK`
//!
//! ## Module Overview
//!
//! - [`protocol`]: RESP request encoder and reply parser
//! - [`connection`]: the per-session transport and round-trip discipline
//! - [`client`]: the typed operation facade
//!
//! ## Design Highlights
//!
//! ### Absence is not an error
//!
//! `GET` on a missing key returns `Ok(None)`, and `LRANGE` on a missing list
//! returns an empty `Vec` - both distinct from server error replies, which
//! carry the server's message verbatim in [`client::Error::Server`].
//!
//! ### Failures invalidate, errors don't
//!
//! An I/O error, timeout, or malformed reply leaves the stream position
//! unknowable, so the connection marks itself closed and refuses further use.
//! A well-formed error reply is just an answer; the connection stays open.
//!
//! ### Exclusive ownership
//!
//! Every operation takes `&mut self`: the type system prevents two tasks from
//! interleaving partial reads on one socket, which would corrupt framing.

pub mod client;
pub mod connection;
pub mod protocol;

// Re-export commonly used types for convenience
pub use client::{Client, Error, KeyType, ServerInfo};
pub use connection::{Connection, ConnectionConfig, ConnectionError};
pub use protocol::{Command, ParseError, Reply, ReplyParser};

/// The default port Redis-compatible servers listen on
pub const DEFAULT_PORT: u16 = 6379;

/// The default host to connect to
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Version of BoltLink
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
