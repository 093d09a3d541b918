//! Incremental RESP Reply Parser
//!
//! This module decodes the byte stream a server sends into [`Reply`] values.
//! TCP delivers bytes, not frames: a read may hand back half a reply header,
//! or a bulk header followed by only part of its payload. The parser is
//! therefore incremental and returns:
//!
//! - `Ok(Some((reply, consumed)))` - one complete reply, `consumed` bytes used
//! - `Ok(None)` - incomplete frame, read more and try again
//! - `Err(ParseError)` - the stream violates the wire grammar
//!
//! The caller appends incoming data to a buffer, calls [`ReplyParser::parse`],
//! and on success advances the buffer by `consumed` bytes. A parse error means
//! the stream position is no longer trustworthy; the connection owning the
//! buffer must be closed, never reused.
//!
//! ## Hostile input
//!
//! Declared bulk lengths and multi-bulk counts come from the remote side, so
//! each is validated against its own configurable maximum before any
//! allocation.
//! Multi-bulk recursion is capped by [`MAX_NESTING_DEPTH`].

use crate::protocol::types::{tag, Reply, CRLF};
use bytes::Bytes;
use std::num::ParseIntError;
use thiserror::Error;

/// Errors that can occur while decoding a reply stream.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    /// Unknown reply type tag; the stream is desynchronized
    #[error("unknown reply tag: {0:#04x}")]
    UnknownTag(u8),

    /// Invalid integer in an integer reply or a length header
    #[error("invalid integer: {0}")]
    InvalidInteger(String),

    /// Invalid UTF-8 in a status line, error line or length header
    #[error("invalid UTF-8: {0}")]
    InvalidUtf8(String),

    /// Bulk length is negative (but not -1 for nil)
    #[error("invalid bulk length: {0}")]
    InvalidBulkLength(i64),

    /// Multi-bulk count is negative (but not -1 for nil)
    #[error("invalid multi-bulk count: {0}")]
    InvalidMultiBulkCount(i64),

    /// Framing violation (missing CRLF, nesting too deep, etc.)
    #[error("protocol error: {0}")]
    Malformed(String),

    /// A declared length exceeds the configured maximum
    #[error("declared length exceeds max: {size} bytes (max: {max})")]
    LengthExceedsMax { size: usize, max: usize },
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Default maximum size for a single bulk payload (512 MB, same as Redis)
pub const MAX_BULK_SIZE: usize = 512 * 1024 * 1024;

/// Default maximum number of elements in a multi-bulk reply.
///
/// Element count and payload bytes are separate units; tightening the byte
/// limit must not shrink legal array lengths, so each gets its own bound.
pub const MAX_MULTI_BULK_LEN: usize = 1024 * 1024;

/// Maximum multi-bulk nesting depth (prevents stack overflow)
pub const MAX_NESTING_DEPTH: usize = 32;

/// An incremental RESP reply parser.
///
/// # Example
///
/// ```
/// use boltlink::protocol::{Reply, ReplyParser};
///
/// let mut parser = ReplyParser::new();
/// let buffer = b"$5\r\nhello\r\n";
///
/// let (reply, consumed) = parser.parse(buffer).unwrap().unwrap();
/// assert_eq!(reply, Reply::bulk("hello"));
/// assert_eq!(consumed, 11);
/// ```
#[derive(Debug)]
pub struct ReplyParser {
    /// Current nesting depth (for multi-bulk parsing)
    depth: usize,
    /// Largest bulk payload accepted, in bytes
    max_bulk_size: usize,
    /// Largest multi-bulk element count accepted
    max_multi_bulk_len: usize,
}

impl Default for ReplyParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplyParser {
    /// Creates a parser with the default size limits.
    pub fn new() -> Self {
        Self::with_limits(MAX_BULK_SIZE, MAX_MULTI_BULK_LEN)
    }

    /// Creates a parser that rejects bulk payloads larger than `max`.
    /// The element-count limit stays at [`MAX_MULTI_BULK_LEN`].
    pub fn with_max_bulk_size(max: usize) -> Self {
        Self::with_limits(max, MAX_MULTI_BULK_LEN)
    }

    /// Creates a parser with explicit bulk-byte and element-count limits.
    pub fn with_limits(max_bulk_size: usize, max_multi_bulk_len: usize) -> Self {
        Self {
            depth: 0,
            max_bulk_size,
            max_multi_bulk_len,
        }
    }

    /// Attempts to decode one complete reply from the front of `buf`.
    pub fn parse(&mut self, buf: &[u8]) -> ParseResult<Option<(Reply, usize)>> {
        self.depth = 0;
        self.parse_reply(buf)
    }

    fn parse_reply(&mut self, buf: &[u8]) -> ParseResult<Option<(Reply, usize)>> {
        if buf.is_empty() {
            return Ok(None);
        }

        if self.depth > MAX_NESTING_DEPTH {
            return Err(ParseError::Malformed(format!(
                "maximum nesting depth exceeded: {}",
                MAX_NESTING_DEPTH
            )));
        }

        match buf[0] {
            tag::STATUS => self.parse_status(buf),
            tag::ERROR => self.parse_error(buf),
            tag::INTEGER => self.parse_integer(buf),
            tag::BULK => self.parse_bulk(buf),
            tag::MULTI_BULK => self.parse_multi_bulk(buf),
            other => Err(ParseError::UnknownTag(other)),
        }
    }

    /// Parses a status reply: `+<text>\r\n`
    fn parse_status(&mut self, buf: &[u8]) -> ParseResult<Option<(Reply, usize)>> {
        match find_crlf(&buf[1..]) {
            Some(pos) => {
                let text = line_as_str(&buf[1..1 + pos])?;
                // +1 for tag, +2 for CRLF
                let consumed = 1 + pos + 2;
                Ok(Some((Reply::Status(text.to_string()), consumed)))
            }
            None => Ok(None),
        }
    }

    /// Parses an error reply: `-<message>\r\n`
    fn parse_error(&mut self, buf: &[u8]) -> ParseResult<Option<(Reply, usize)>> {
        match find_crlf(&buf[1..]) {
            Some(pos) => {
                let text = line_as_str(&buf[1..1 + pos])?;
                let consumed = 1 + pos + 2;
                Ok(Some((Reply::Error(text.to_string()), consumed)))
            }
            None => Ok(None),
        }
    }

    /// Parses an integer reply: `:<integer>\r\n`
    fn parse_integer(&mut self, buf: &[u8]) -> ParseResult<Option<(Reply, usize)>> {
        match find_crlf(&buf[1..]) {
            Some(pos) => {
                let n = parse_i64(&buf[1..1 + pos])?;
                let consumed = 1 + pos + 2;
                Ok(Some((Reply::Integer(n), consumed)))
            }
            None => Ok(None),
        }
    }

    /// Parses a bulk reply: `$<length>\r\n<data>\r\n` or nil `$-1\r\n`
    fn parse_bulk(&mut self, buf: &[u8]) -> ParseResult<Option<(Reply, usize)>> {
        let header_end = match find_crlf(&buf[1..]) {
            Some(pos) => pos,
            None => return Ok(None),
        };

        let length = parse_i64(&buf[1..1 + header_end])?;

        if length == -1 {
            let consumed = 1 + header_end + 2; // $-1\r\n
            return Ok(Some((Reply::Bulk(None), consumed)));
        }

        if length < 0 {
            return Err(ParseError::InvalidBulkLength(length));
        }

        let length = length as usize;

        // The length is server-controlled; validate before trusting it.
        if length > self.max_bulk_size {
            return Err(ParseError::LengthExceedsMax {
                size: length,
                max: self.max_bulk_size,
            });
        }

        let data_start = 1 + header_end + 2; // tag + length + CRLF
        let total_needed = data_start + length + 2; // payload + trailing CRLF
        if buf.len() < total_needed {
            return Ok(None);
        }

        if &buf[data_start + length..data_start + length + 2] != CRLF {
            return Err(ParseError::Malformed(
                "bulk payload missing trailing CRLF".to_string(),
            ));
        }

        // Raw bytes, no trimming, no encoding assumption.
        let data = Bytes::copy_from_slice(&buf[data_start..data_start + length]);

        Ok(Some((Reply::Bulk(Some(data)), total_needed)))
    }

    /// Parses a multi-bulk reply: `*<count>\r\n<elements...>` or nil `*-1\r\n`
    fn parse_multi_bulk(&mut self, buf: &[u8]) -> ParseResult<Option<(Reply, usize)>> {
        let header_end = match find_crlf(&buf[1..]) {
            Some(pos) => pos,
            None => return Ok(None),
        };

        let count = parse_i64(&buf[1..1 + header_end])?;

        if count == -1 {
            let consumed = 1 + header_end + 2;
            return Ok(Some((Reply::MultiBulk(None), consumed)));
        }

        if count < 0 {
            return Err(ParseError::InvalidMultiBulkCount(count));
        }

        let count = count as usize;

        if count > self.max_multi_bulk_len {
            return Err(ParseError::LengthExceedsMax {
                size: count,
                max: self.max_multi_bulk_len,
            });
        }

        let mut elements = Vec::with_capacity(count.min(1024));
        let mut consumed = 1 + header_end + 2; // *<count>\r\n

        self.depth += 1;

        // Elements are full replies; order is preserved exactly as received.
        for _ in 0..count {
            if consumed >= buf.len() {
                return Ok(None);
            }

            match self.parse_reply(&buf[consumed..])? {
                Some((reply, element_consumed)) => {
                    elements.push(reply);
                    consumed += element_consumed;
                }
                None => return Ok(None),
            }
        }

        self.depth -= 1;

        Ok(Some((Reply::MultiBulk(Some(elements)), consumed)))
    }
}

/// Finds the position of CRLF in the buffer.
///
/// Returns the position of `\r` if followed by `\n`, or None.
#[inline]
fn find_crlf(buf: &[u8]) -> Option<usize> {
    for i in 0..buf.len().saturating_sub(1) {
        if buf[i] == b'\r' && buf[i + 1] == b'\n' {
            return Some(i);
        }
    }
    None
}

fn line_as_str(line: &[u8]) -> ParseResult<&str> {
    std::str::from_utf8(line).map_err(|e| ParseError::InvalidUtf8(e.to_string()))
}

fn parse_i64(line: &[u8]) -> ParseResult<i64> {
    line_as_str(line)?
        .parse()
        .map_err(|e: ParseIntError| ParseError::InvalidInteger(e.to_string()))
}

/// Decodes a single reply from a byte slice.
///
/// Convenience wrapper for tests and one-shot use.
pub fn parse_reply(buf: &[u8]) -> ParseResult<Option<(Reply, usize)>> {
    ReplyParser::new().parse(buf)
}
