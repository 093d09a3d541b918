//! Client Connection
//!
//! This module owns the TCP stream to one server and the read buffer that
//! reassembles reply frames out of it.
//!
//! ## Round-trip discipline
//!
//! A connection carries at most one in-flight request: [`Connection::round_trip`]
//! writes one encoded command, then reads until exactly one complete reply has
//! been decoded. TCP is a stream protocol, so a single read may return half a
//! reply or a reply plus the start of nothing in particular; incoming bytes
//! accumulate in a `BytesMut` buffer and the parser is retried after each read.
//!
//! ```text
//! round_trip(cmd)
//!        │
//!        ▼
//! ┌─────────────────────────┐
//! │ write + flush command   │
//! └───────────┬─────────────┘
//!             ▼
//! ┌─────────────────────────┐
//! │ try to parse a reply    │◄───────┐
//! └───────────┬─────────────┘        │
//!        complete?                   │
//!        yes │ no                    │
//!            │ └──► read more bytes ─┘
//!            ▼
//!        return Reply
//! ```
//!
//! ## Failure is fatal
//!
//! After an I/O error, a timeout, or a parse error the stream position is
//! indeterminate - a half-read bulk payload cannot be rewound. The connection
//! marks itself unusable and every further call fails with
//! [`ConnectionError::Closed`]. Reconnecting is the caller's policy, not ours.
//! A well-formed error *reply* from the server is not a failure at this layer;
//! it is returned like any other reply.

use crate::protocol::{Command, ParseError, Reply, ReplyParser};
use bytes::BytesMut;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufWriter};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::time::timeout;
use tracing::{debug, trace, warn};

/// Initial read buffer capacity
const INITIAL_BUFFER_SIZE: usize = 4096;

/// Headroom allowed past the reply size limit for frame headers
const HEADER_SLACK: usize = 1024;

/// Tunables for one connection.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Deadline for establishing the TCP connection
    pub connect_timeout: Duration,
    /// Deadline for each read or write during a round trip
    pub io_timeout: Duration,
    /// Largest reply payload accepted before the stream is considered hostile
    pub max_reply_size: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            io_timeout: Duration::from_secs(10),
            max_reply_size: crate::protocol::parser::MAX_BULK_SIZE,
        }
    }
}

/// Errors that can occur on a connection.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// I/O error (network issue); the connection is no longer usable
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Could not establish the connection within the connect timeout
    #[error("connect timed out")]
    ConnectTimeout,

    /// A read or write exceeded the I/O timeout mid-round-trip
    #[error("I/O timed out")]
    Timeout,

    /// The received bytes violate the wire grammar; framing is desynced
    #[error("protocol error: {0}")]
    Parse(#[from] ParseError),

    /// The connection was closed, or invalidated by an earlier failure
    #[error("connection is closed")]
    Closed,

    /// The server closed the stream (EOF), possibly mid-reply
    #[error("server closed the connection")]
    ServerClosed,

    /// The read buffer grew past the configured reply size limit
    #[error("reply exceeds configured size limit")]
    BufferFull,
}

impl ConnectionError {
    /// Server-reply errors never reach this type, so every variant except
    /// `Closed` means the stream state is indeterminate.
    fn invalidates(&self) -> bool {
        !matches!(self, ConnectionError::Closed)
    }
}

/// One client-to-server session.
///
/// Owns the socket and read buffer exclusively; there is no shared parsing
/// state. Concurrency across operations means multiple `Connection` values or
/// external serialization - two tasks interleaving partial reads on one
/// connection would corrupt framing unrecoverably, which is why none of the
/// methods take `&self`.
#[derive(Debug)]
pub struct Connection {
    /// Buffered writer over the TCP stream
    stream: BufWriter<TcpStream>,

    /// Server address (for logging)
    addr: SocketAddr,

    /// Reassembly buffer for incoming reply bytes
    buffer: BytesMut,

    /// Reply parser, configured with the reply size limit
    parser: ReplyParser,

    /// Connection tunables
    config: ConnectionConfig,

    /// False once closed or invalidated
    open: bool,
}

impl Connection {
    /// Establishes a TCP connection to `addr`.
    ///
    /// Fails with [`ConnectionError::ConnectTimeout`] if the connection cannot
    /// be established within the configured deadline, or with
    /// [`ConnectionError::Io`] on refusal.
    pub async fn connect(
        addr: impl ToSocketAddrs,
        config: ConnectionConfig,
    ) -> Result<Self, ConnectionError> {
        let stream = timeout(config.connect_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| ConnectionError::ConnectTimeout)??;

        let addr = stream.peer_addr()?;
        debug!(server = %addr, "Connected");

        Ok(Self {
            stream: BufWriter::new(stream),
            addr,
            buffer: BytesMut::with_capacity(INITIAL_BUFFER_SIZE),
            parser: ReplyParser::with_max_bulk_size(config.max_reply_size),
            config,
            open: true,
        })
    }

    /// Returns true until the connection is closed or invalidated.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// The server address this connection points at.
    pub fn peer_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Executes one request/reply round trip.
    ///
    /// Writes the encoded command, then reads until exactly one complete reply
    /// has been decoded. Any transport- or protocol-level failure invalidates
    /// the connection.
    pub async fn round_trip(&mut self, command: &Command) -> Result<Reply, ConnectionError> {
        if !self.open {
            return Err(ConnectionError::Closed);
        }

        let result = self.round_trip_inner(command).await;

        if let Err(e) = &result {
            if e.invalidates() {
                warn!(server = %self.addr, command = command.name(), error = %e,
                    "Round trip failed, invalidating connection");
                self.open = false;
            }
        }

        result
    }

    async fn round_trip_inner(&mut self, command: &Command) -> Result<Reply, ConnectionError> {
        self.send_command(command).await?;
        let reply = self.read_reply().await?;
        trace!(server = %self.addr, command = command.name(), reply = reply.kind(),
            "Round trip complete");
        Ok(reply)
    }

    /// Writes and flushes one encoded command.
    async fn send_command(&mut self, command: &Command) -> Result<(), ConnectionError> {
        let bytes = command.encode();
        timeout(self.config.io_timeout, async {
            self.stream.write_all(&bytes).await?;
            self.stream.flush().await
        })
        .await
        .map_err(|_| ConnectionError::Timeout)??;

        trace!(server = %self.addr, bytes = bytes.len(), "Sent command");
        Ok(())
    }

    /// Reads until one complete reply has been decoded.
    async fn read_reply(&mut self) -> Result<Reply, ConnectionError> {
        loop {
            if let Some(reply) = self.try_parse_reply()? {
                return Ok(reply);
            }
            self.read_more_data().await?;
        }
    }

    /// Attempts to decode one reply from the front of the buffer.
    fn try_parse_reply(&mut self) -> Result<Option<Reply>, ConnectionError> {
        if self.buffer.is_empty() {
            return Ok(None);
        }

        match self.parser.parse(&self.buffer)? {
            Some((reply, consumed)) => {
                let _ = self.buffer.split_to(consumed);
                trace!(
                    server = %self.addr,
                    consumed = consumed,
                    remaining = self.buffer.len(),
                    "Parsed reply"
                );
                Ok(Some(reply))
            }
            None => {
                trace!(
                    server = %self.addr,
                    buffered = self.buffer.len(),
                    "Incomplete reply, need more data"
                );
                Ok(None)
            }
        }
    }

    /// Reads more bytes from the socket into the buffer.
    async fn read_more_data(&mut self) -> Result<(), ConnectionError> {
        // The parser rejects oversized declared lengths up front; this guard
        // catches a stream that never completes a header line.
        if self.buffer.len() >= self.config.max_reply_size.saturating_add(HEADER_SLACK) {
            return Err(ConnectionError::BufferFull);
        }

        if self.buffer.capacity() - self.buffer.len() < 1024 {
            self.buffer.reserve(4096);
        }

        let n = timeout(
            self.config.io_timeout,
            self.stream.get_mut().read_buf(&mut self.buffer),
        )
        .await
        .map_err(|_| ConnectionError::Timeout)??;

        if n == 0 {
            return Err(ConnectionError::ServerClosed);
        }

        trace!(server = %self.addr, bytes = n, "Read data");
        Ok(())
    }

    /// Closes the connection. Idempotent; shutdown failures are logged, not
    /// surfaced, since the session is over either way.
    pub async fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;

        if let Err(e) = self.stream.shutdown().await {
            debug!(server = %self.addr, error = %e, "Shutdown failed");
        }
        debug!(server = %self.addr, "Connection closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    /// Spawns a one-connection server that answers each incoming command with
    /// the next scripted byte chunk.
    async fn scripted_server(replies: Vec<Vec<u8>>) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 64 * 1024];

            for reply in replies {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    return;
                }
                stream.write_all(&reply).await.unwrap();
                stream.flush().await.unwrap();
            }
        });

        addr
    }

    fn fast_config() -> ConnectionConfig {
        ConnectionConfig {
            connect_timeout: Duration::from_secs(1),
            io_timeout: Duration::from_millis(500),
            max_reply_size: 1024 * 1024,
        }
    }

    #[tokio::test]
    async fn test_round_trip_status() {
        let addr = scripted_server(vec![b"+PONG\r\n".to_vec()]).await;
        let mut conn = Connection::connect(addr, fast_config()).await.unwrap();

        let reply = conn.round_trip(&Command::new("PING")).await.unwrap();
        assert_eq!(reply, Reply::Status("PONG".to_string()));
        assert!(conn.is_open());
    }

    #[tokio::test]
    async fn test_round_trip_reassembles_split_reply() {
        // A 50 KB bulk reply delivered in pieces must come back intact.
        let payload: Vec<u8> = (0..50_000u32).map(|i| (i % 251) as u8).collect();
        let mut frame = format!("${}\r\n", payload.len()).into_bytes();
        frame.extend_from_slice(&payload);
        frame.extend_from_slice(b"\r\n");

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf).await.unwrap();
            for chunk in frame.chunks(1000) {
                stream.write_all(chunk).await.unwrap();
                stream.flush().await.unwrap();
                tokio::task::yield_now().await;
            }
        });

        let mut conn = Connection::connect(addr, fast_config()).await.unwrap();
        let reply = conn.round_trip(&Command::new("GET").arg("big")).await.unwrap();
        assert_eq!(reply.as_bytes().unwrap(), &payload[..]);
    }

    #[tokio::test]
    async fn test_error_reply_does_not_invalidate() {
        let addr = scripted_server(vec![
            b"-ERR wrong type\r\n".to_vec(),
            b"+PONG\r\n".to_vec(),
        ])
        .await;
        let mut conn = Connection::connect(addr, fast_config()).await.unwrap();

        let reply = conn.round_trip(&Command::new("INCR").arg("k")).await.unwrap();
        assert_eq!(reply, Reply::Error("ERR wrong type".to_string()));
        assert!(conn.is_open());

        // The connection is still usable after a server-side error.
        let reply = conn.round_trip(&Command::new("PING")).await.unwrap();
        assert_eq!(reply, Reply::Status("PONG".to_string()));
    }

    #[tokio::test]
    async fn test_parse_error_invalidates_connection() {
        let addr = scripted_server(vec![b"@garbage\r\n".to_vec()]).await;
        let mut conn = Connection::connect(addr, fast_config()).await.unwrap();

        let err = conn.round_trip(&Command::new("PING")).await.unwrap_err();
        assert!(matches!(err, ConnectionError::Parse(_)));
        assert!(!conn.is_open());

        let err = conn.round_trip(&Command::new("PING")).await.unwrap_err();
        assert!(matches!(err, ConnectionError::Closed));
    }

    #[tokio::test]
    async fn test_oversized_declared_length_is_protocol_error() {
        let addr = scripted_server(vec![b"$2097152\r\n".to_vec()]).await;
        let mut config = fast_config();
        config.max_reply_size = 1024 * 1024;
        let mut conn = Connection::connect(addr, config).await.unwrap();

        let err = conn.round_trip(&Command::new("GET").arg("k")).await.unwrap_err();
        assert!(matches!(
            err,
            ConnectionError::Parse(ParseError::LengthExceedsMax { .. })
        ));
        assert!(!conn.is_open());
    }

    #[tokio::test]
    async fn test_read_timeout_invalidates_connection() {
        // Server accepts but never replies.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let mut config = fast_config();
        config.io_timeout = Duration::from_millis(50);
        let mut conn = Connection::connect(addr, config).await.unwrap();

        let err = conn.round_trip(&Command::new("PING")).await.unwrap_err();
        assert!(matches!(err, ConnectionError::Timeout));
        assert!(!conn.is_open());
    }

    #[tokio::test]
    async fn test_eof_mid_reply_is_server_closed() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf).await.unwrap();
            // Half a bulk reply, then hang up.
            stream.write_all(b"$10\r\nhel").await.unwrap();
            stream.flush().await.unwrap();
        });

        let mut conn = Connection::connect(addr, fast_config()).await.unwrap();
        let err = conn.round_trip(&Command::new("GET").arg("k")).await.unwrap_err();
        assert!(matches!(err, ConnectionError::ServerClosed));
        assert!(!conn.is_open());
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let addr = scripted_server(vec![]).await;
        let mut conn = Connection::connect(addr, fast_config()).await.unwrap();

        conn.close().await;
        conn.close().await;
        assert!(!conn.is_open());

        let err = conn.round_trip(&Command::new("PING")).await.unwrap_err();
        assert!(matches!(err, ConnectionError::Closed));
    }

    #[tokio::test]
    async fn test_connect_refused() {
        // Bind then drop to get a port nothing is listening on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = Connection::connect(addr, fast_config()).await.unwrap_err();
        assert!(matches!(err, ConnectionError::Io(_)));
    }
}
