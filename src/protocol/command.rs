//! RESP Request Encoder
//!
//! A request is a command name plus an ordered list of arguments, sent as a
//! multi-bulk of bulk strings:
//!
//! ```text
//! *<argc>\r\n$<len>\r\n<arg>\r\n...
//! ```
//!
//! Every argument is length-prefixed, never delimiter-separated, so arguments
//! may contain any byte value - embedded CRLF, NUL, anything - and round-trip
//! through the server exactly. `SET name Ariz` goes out as:
//!
//! ```text
//! *3\r\n$3\r\nSET\r\n$4\r\nname\r\n$4\r\nAriz\r\n
//! ```

use crate::protocol::types::CRLF;
use bytes::Bytes;
use std::fmt;

/// An ephemeral command value: name plus binary-safe arguments.
///
/// Built, encoded and discarded per call.
///
/// # Example
///
/// ```
/// use boltlink::protocol::Command;
///
/// let cmd = Command::new("SET").arg("name").arg("Ariz");
/// assert_eq!(cmd.encode(), b"*3\r\n$3\r\nSET\r\n$4\r\nname\r\n$4\r\nAriz\r\n");
/// ```
#[derive(Debug, Clone)]
pub struct Command {
    name: &'static str,
    args: Vec<Bytes>,
}

impl Command {
    /// Starts a command with the given name.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            args: Vec::new(),
        }
    }

    /// Appends a binary-safe argument.
    pub fn arg(mut self, arg: impl Into<Bytes>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends an integer argument in its decimal text form.
    pub fn arg_int(self, n: i64) -> Self {
        self.arg(n.to_string())
    }

    /// Appends a float argument in its decimal text form.
    pub fn arg_float(self, f: f64) -> Self {
        self.arg(f.to_string())
    }

    /// The command name, for logging.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Encodes the command to its wire format.
    pub fn encode(&self) -> Vec<u8> {
        // Rough preallocation: headers are small next to the payloads.
        let payload: usize = self.args.iter().map(|a| a.len() + 16).sum();
        let mut buf = Vec::with_capacity(self.name.len() + payload + 16);

        write_header(&mut buf, b'*', 1 + self.args.len());
        write_bulk(&mut buf, self.name.as_bytes());
        for arg in &self.args {
            write_bulk(&mut buf, arg);
        }
        buf
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for arg in &self.args {
            match std::str::from_utf8(arg) {
                Ok(s) => write!(f, " {}", s)?,
                Err(_) => write!(f, " (binary, {} bytes)", arg.len())?,
            }
        }
        Ok(())
    }
}

fn write_header(buf: &mut Vec<u8>, tag: u8, n: usize) {
    buf.push(tag);
    buf.extend_from_slice(n.to_string().as_bytes());
    buf.extend_from_slice(CRLF);
}

fn write_bulk(buf: &mut Vec<u8>, data: &[u8]) {
    write_header(buf, b'$', data.len());
    buf.extend_from_slice(data);
    buf.extend_from_slice(CRLF);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_no_args() {
        assert_eq!(Command::new("PING").encode(), b"*1\r\n$4\r\nPING\r\n");
    }

    #[test]
    fn test_encode_get() {
        assert_eq!(
            Command::new("GET").arg("name").encode(),
            b"*2\r\n$3\r\nGET\r\n$4\r\nname\r\n"
        );
    }

    #[test]
    fn test_encode_set() {
        assert_eq!(
            Command::new("SET").arg("name").arg("Ariz").encode(),
            b"*3\r\n$3\r\nSET\r\n$4\r\nname\r\n$4\r\nAriz\r\n"
        );
    }

    #[test]
    fn test_encode_integer_args() {
        assert_eq!(
            Command::new("LRANGE").arg("mylist").arg_int(0).arg_int(-1).encode(),
            b"*4\r\n$6\r\nLRANGE\r\n$6\r\nmylist\r\n$1\r\n0\r\n$2\r\n-1\r\n"
        );
    }

    #[test]
    fn test_encode_float_arg() {
        assert_eq!(
            Command::new("ZINCRBY").arg("zkey").arg_float(3.5).arg("m1").encode(),
            b"*4\r\n$7\r\nZINCRBY\r\n$4\r\nzkey\r\n$3\r\n3.5\r\n$2\r\nm1\r\n"
        );
    }

    #[test]
    fn test_encode_binary_arg() {
        // Embedded CRLF and NUL must be carried by the length prefix,
        // not corrupted by delimiter handling.
        let value = &b"a\r\nb\x00c"[..];
        assert_eq!(
            Command::new("SET").arg("k").arg(value).encode(),
            b"*3\r\n$3\r\nSET\r\n$1\r\nk\r\n$6\r\na\r\nb\x00c\r\n"
        );
    }

    #[test]
    fn test_encode_empty_arg() {
        assert_eq!(
            Command::new("SET").arg("k").arg("").encode(),
            b"*3\r\n$3\r\nSET\r\n$1\r\nk\r\n$0\r\n\r\n"
        );
    }

    #[test]
    fn test_display_redacts_binary() {
        let cmd = Command::new("SET").arg("k").arg(&b"\xFF\xFE"[..]);
        assert_eq!(cmd.to_string(), "SET k (binary, 2 bytes)");
    }
}
