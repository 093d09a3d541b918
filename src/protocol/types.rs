//! RESP (Redis Serialization Protocol) Reply Types
//!
//! This module defines the reply shapes a RESP server can send back to a
//! client. Every reply starts with a single type tag byte:
//!
//! - `+` Status (simple string)
//! - `-` Error
//! - `:` Integer
//! - `$` Bulk (length-prefixed binary payload)
//! - `*` Multi-bulk (ordered sequence of replies)
//!
//! Reply headers are ASCII lines terminated with CRLF (`\r\n`); bulk payloads
//! are raw bytes of a declared length, so they may contain any byte value,
//! including embedded CRLF and NUL.
//!
//! ## Absence vs emptiness
//!
//! A bulk length of `-1` (`$-1\r\n`) means "no value" (e.g. GET on a missing
//! key) and a multi-bulk count of `-1` (`*-1\r\n`) means "no such sequence".
//! Both are distinct from the empty bulk `$0\r\n\r\n` and the empty array
//! `*0\r\n`, so [`Reply`] keeps them as `Bulk(None)` / `MultiBulk(None)`
//! rather than collapsing them into a single null value.
//!
//! ## Examples
//!
//! Status: `+OK\r\n`
//! Error: `-ERR unknown command\r\n`
//! Integer: `:1000\r\n`
//! Bulk: `$5\r\nhello\r\n`
//! Nil bulk: `$-1\r\n`
//! Multi-bulk: `*2\r\n$3\r\nfoo\r\n$3\r\nbar\r\n`

use bytes::Bytes;
use std::fmt;

/// The CRLF terminator used in the RESP protocol
pub const CRLF: &[u8] = b"\r\n";

/// RESP reply type tags
pub mod tag {
    pub const STATUS: u8 = b'+';
    pub const ERROR: u8 = b'-';
    pub const INTEGER: u8 = b':';
    pub const BULK: u8 = b'$';
    pub const MULTI_BULK: u8 = b'*';
}

/// One reply received from the server.
///
/// This is a closed set of variants with exhaustive matching at every
/// consumption site; a tag outside the five known ones is a parse error, not
/// a silent fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A one-line, non-binary-safe status string.
    /// Format: `+<text>\r\n`
    Status(String),

    /// A server-reported error. The text is preserved verbatim so callers
    /// always see the server's own message.
    /// Format: `-<message>\r\n`
    Error(String),

    /// A 64-bit signed integer.
    /// Format: `:<integer>\r\n`
    Integer(i64),

    /// A binary-safe payload, or `None` for the nil bulk `$-1\r\n`.
    /// Format: `$<length>\r\n<data>\r\n`
    Bulk(Option<Bytes>),

    /// An ordered sequence of replies, or `None` for the nil multi-bulk
    /// `*-1\r\n`. Elements are full replies; in practice they are bulk or
    /// integer replies, but nesting is not ruled out.
    /// Format: `*<count>\r\n<element1><element2>...`
    MultiBulk(Option<Vec<Reply>>),
}

impl Reply {
    /// Creates a status reply.
    pub fn status(s: impl Into<String>) -> Self {
        Reply::Status(s.into())
    }

    /// Creates an error reply.
    pub fn error(s: impl Into<String>) -> Self {
        Reply::Error(s.into())
    }

    /// Creates an integer reply.
    pub fn integer(n: i64) -> Self {
        Reply::Integer(n)
    }

    /// Creates a bulk reply holding `data`.
    pub fn bulk(data: impl Into<Bytes>) -> Self {
        Reply::Bulk(Some(data.into()))
    }

    /// Creates the nil bulk reply (`$-1\r\n`).
    pub fn nil_bulk() -> Self {
        Reply::Bulk(None)
    }

    /// Creates a multi-bulk reply holding `elements`.
    pub fn multi_bulk(elements: Vec<Reply>) -> Self {
        Reply::MultiBulk(Some(elements))
    }

    /// Creates the nil multi-bulk reply (`*-1\r\n`).
    pub fn nil_multi_bulk() -> Self {
        Reply::MultiBulk(None)
    }

    /// The `+OK\r\n` status the server sends for most write commands.
    pub fn ok() -> Self {
        Reply::Status("OK".to_string())
    }

    /// Returns true if this is any nil reply (`$-1` or `*-1`).
    pub fn is_nil(&self) -> bool {
        matches!(self, Reply::Bulk(None) | Reply::MultiBulk(None))
    }

    /// Returns true if this is an error reply.
    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }

    /// Returns the payload bytes if this is a non-nil bulk reply.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Reply::Bulk(Some(b)) => Some(b),
            _ => None,
        }
    }

    /// Returns the integer value if this is an integer reply.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Reply::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the elements if this is a non-nil multi-bulk reply.
    pub fn as_elements(&self) -> Option<&[Reply]> {
        match self {
            Reply::MultiBulk(Some(elements)) => Some(elements),
            _ => None,
        }
    }

    /// A short name for the variant, used in "unexpected reply" errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Reply::Status(_) => "status",
            Reply::Error(_) => "error",
            Reply::Integer(_) => "integer",
            Reply::Bulk(_) => "bulk",
            Reply::MultiBulk(_) => "multi-bulk",
        }
    }

    /// Serializes the reply to its wire format.
    ///
    /// The client never sends replies; this exists so tests and benchmarks
    /// can script the byte streams a server would produce and check that
    /// decoding followed by re-encoding reproduces identical framing.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.serialize_into(&mut buf);
        buf
    }

    /// Serializes the reply into an existing buffer.
    pub fn serialize_into(&self, buf: &mut Vec<u8>) {
        match self {
            Reply::Status(s) => {
                buf.push(tag::STATUS);
                buf.extend_from_slice(s.as_bytes());
                buf.extend_from_slice(CRLF);
            }
            Reply::Error(s) => {
                buf.push(tag::ERROR);
                buf.extend_from_slice(s.as_bytes());
                buf.extend_from_slice(CRLF);
            }
            Reply::Integer(n) => {
                buf.push(tag::INTEGER);
                buf.extend_from_slice(n.to_string().as_bytes());
                buf.extend_from_slice(CRLF);
            }
            Reply::Bulk(Some(data)) => {
                buf.push(tag::BULK);
                buf.extend_from_slice(data.len().to_string().as_bytes());
                buf.extend_from_slice(CRLF);
                buf.extend_from_slice(data);
                buf.extend_from_slice(CRLF);
            }
            Reply::Bulk(None) => {
                buf.extend_from_slice(b"$-1");
                buf.extend_from_slice(CRLF);
            }
            Reply::MultiBulk(Some(elements)) => {
                buf.push(tag::MULTI_BULK);
                buf.extend_from_slice(elements.len().to_string().as_bytes());
                buf.extend_from_slice(CRLF);
                for element in elements {
                    element.serialize_into(buf);
                }
            }
            Reply::MultiBulk(None) => {
                buf.extend_from_slice(b"*-1");
                buf.extend_from_slice(CRLF);
            }
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Status(s) => write!(f, "{}", s),
            Reply::Error(s) => write!(f, "(error) {}", s),
            Reply::Integer(n) => write!(f, "(integer) {}", n),
            Reply::Bulk(Some(data)) => {
                if let Ok(s) = std::str::from_utf8(data) {
                    write!(f, "\"{}\"", s)
                } else {
                    write!(f, "(binary data, {} bytes)", data.len())
                }
            }
            Reply::Bulk(None) | Reply::MultiBulk(None) => write!(f, "(nil)"),
            Reply::MultiBulk(Some(elements)) => {
                if elements.is_empty() {
                    write!(f, "(empty list)")
                } else {
                    writeln!(f)?;
                    for (i, element) in elements.iter().enumerate() {
                        writeln!(f, "{}) {}", i + 1, element)?;
                    }
                    Ok(())
                }
            }
        }
    }
}
