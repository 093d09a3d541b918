//! Client Operations
//!
//! This module implements the public operation surface: one method per remote
//! command. Each method builds the command, runs exactly one round trip on the
//! owned [`Connection`], and maps the received reply shape into the
//! operation's typed result.
//!
//! ## Reply mapping rules
//!
//! - A server `Error` reply is a normal, expected outcome for any operation.
//!   It surfaces as [`Error::Server`] with the server's message verbatim and
//!   does not invalidate the connection.
//! - Absence (nil bulk / nil multi-bulk) is never an error: it maps to
//!   `None`, `false`, or an empty `Vec` depending on the operation.
//! - A structurally wrong reply variant (e.g. a status where an integer was
//!   expected) is [`Error::UnexpectedReply`]: the server is not speaking the
//!   contract of this command.
//!
//! ## Supported Commands
//!
//! ### Server Commands
//! - `PING`, `AUTH`, `ECHO`, `SELECT`, `INFO`, `LASTSAVE`
//!
//! ### String Commands
//! - `SET`, `GET`, `GETSET`, `SETNX`, `SETEX`
//! - `DEL`, `EXISTS`, `TYPE`, `KEYS`, `MGET`
//! - `INCR`, `INCRBY`, `DECR`, `DECRBY`
//!
//! ### List Commands
//! - `RPUSH`, `LPUSH`, `LPOP`, `RPOP`
//! - `LLEN`, `LRANGE`, `LREM`, `LSET`
//!
//! ### Set Commands
//! - `SADD`, `SREM`, `SISMEMBER`
//!
//! ### Sorted Set Commands
//! - `ZADD`, `ZREM`, `ZINCRBY`, `ZSCORE`, `ZRANK`, `ZREVRANK`

use crate::client::info::{KeyType, ServerInfo};
use crate::connection::{Connection, ConnectionConfig, ConnectionError};
use crate::protocol::{Command, Reply};
use bytes::Bytes;
use tokio::net::ToSocketAddrs;
use tracing::debug;

/// Errors returned by client operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport- or protocol-level failure; the connection is gone
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// A well-formed error reply from the server, message preserved verbatim.
    /// The connection remains usable.
    #[error("server error: {0}")]
    Server(String),

    /// The reply variant does not fit the command's contract
    #[error("unexpected {got} reply (expected {expected})")]
    UnexpectedReply {
        expected: &'static str,
        got: &'static str,
    },

    /// The reply had the right shape but an unparseable payload
    /// (e.g. a non-numeric score)
    #[error("invalid value in reply: {0}")]
    InvalidValue(String),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A client session with one Redis-compatible server.
///
/// Owns its [`Connection`] exclusively; operations take `&mut self` so two
/// tasks can never interleave round trips on the same socket. For concurrency,
/// open one client per task or serialize access externally.
///
/// # Example
///
/// ```no_run
/// use boltlink::Client;
///
/// #[tokio::main]
/// async fn main() -> boltlink::client::Result<()> {
///     let mut client = Client::connect("127.0.0.1:6379").await?;
///
///     client.set("name", "Ariz").await?;
///     let value = client.get("name").await?;
///     assert_eq!(value.as_deref(), Some(&b"Ariz"[..]));
///
///     client.close().await;
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Client {
    conn: Connection,
}

impl Client {
    // ========================================================================
    // Connection lifecycle
    // ========================================================================

    /// Connects with default configuration.
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        Self::connect_with(addr, ConnectionConfig::default()).await
    }

    /// Connects with explicit timeouts and size limits.
    pub async fn connect_with(addr: impl ToSocketAddrs, config: ConnectionConfig) -> Result<Self> {
        let conn = Connection::connect(addr, config).await?;
        debug!(server = %conn.peer_addr(), "Client ready");
        Ok(Self { conn })
    }

    /// Returns true until the connection is closed or invalidated.
    pub fn is_open(&self) -> bool {
        self.conn.is_open()
    }

    /// Closes the connection. Idempotent.
    pub async fn close(&mut self) {
        self.conn.close().await;
    }

    // ========================================================================
    // Dispatch helpers
    // ========================================================================

    /// One round trip; error replies become `Error::Server`.
    async fn execute(&mut self, command: Command) -> Result<Reply> {
        match self.conn.round_trip(&command).await? {
            Reply::Error(message) => Err(Error::Server(message)),
            reply => Ok(reply),
        }
    }

    fn unexpected(expected: &'static str, reply: &Reply) -> Error {
        Error::UnexpectedReply {
            expected,
            got: reply.kind(),
        }
    }

    async fn expect_status(&mut self, command: Command) -> Result<String> {
        match self.execute(command).await? {
            Reply::Status(text) => Ok(text),
            reply => Err(Self::unexpected("status", &reply)),
        }
    }

    async fn expect_ok(&mut self, command: Command) -> Result<()> {
        self.expect_status(command).await.map(|_| ())
    }

    async fn expect_integer(&mut self, command: Command) -> Result<i64> {
        match self.execute(command).await? {
            Reply::Integer(n) => Ok(n),
            reply => Err(Self::unexpected("integer", &reply)),
        }
    }

    async fn expect_bulk(&mut self, command: Command) -> Result<Option<Bytes>> {
        match self.execute(command).await? {
            Reply::Bulk(data) => Ok(data),
            reply => Err(Self::unexpected("bulk", &reply)),
        }
    }

    /// Bulk reply whose payload is a decimal float in text form.
    async fn expect_float_bulk(&mut self, command: Command) -> Result<Option<f64>> {
        match self.expect_bulk(command).await? {
            None => Ok(None),
            Some(data) => parse_float(&data).map(Some),
        }
    }

    /// Integer reply, or nil bulk for absence (ZRANK-style contract).
    async fn expect_integer_or_nil(&mut self, command: Command) -> Result<Option<i64>> {
        match self.execute(command).await? {
            Reply::Integer(n) => Ok(Some(n)),
            Reply::Bulk(None) => Ok(None),
            reply => Err(Self::unexpected("integer or nil", &reply)),
        }
    }

    /// Multi-bulk of bulk elements; nil is normalized to an empty sequence.
    async fn expect_bulk_sequence(&mut self, command: Command) -> Result<Vec<Bytes>> {
        let elements = match self.execute(command).await? {
            Reply::MultiBulk(Some(elements)) => elements,
            Reply::MultiBulk(None) => return Ok(Vec::new()),
            reply => return Err(Self::unexpected("multi-bulk", &reply)),
        };

        elements
            .into_iter()
            .map(|element| match element {
                Reply::Bulk(Some(data)) => Ok(data),
                reply => Err(Self::unexpected("bulk element", &reply)),
            })
            .collect()
    }

    // ========================================================================
    // Server Commands
    // ========================================================================

    /// PING - checks the connection; returns the status text (`PONG`).
    pub async fn ping(&mut self) -> Result<String> {
        self.expect_status(Command::new("PING")).await
    }

    /// AUTH password
    pub async fn auth(&mut self, password: impl Into<Bytes>) -> Result<()> {
        self.expect_ok(Command::new("AUTH").arg(password)).await
    }

    /// ECHO message - returns the message unchanged.
    pub async fn echo(&mut self, message: impl Into<Bytes>) -> Result<Bytes> {
        self.expect_bulk(Command::new("ECHO").arg(message))
            .await?
            .ok_or_else(|| Error::InvalidValue("nil reply to ECHO".to_string()))
    }

    /// SELECT index - switches the logical database.
    pub async fn select(&mut self, index: i64) -> Result<()> {
        self.expect_ok(Command::new("SELECT").arg_int(index)).await
    }

    /// LASTSAVE - unix timestamp of the last successful save to disk.
    pub async fn lastsave(&mut self) -> Result<i64> {
        self.expect_integer(Command::new("LASTSAVE")).await
    }

    /// INFO - parsed server introspection fields.
    pub async fn info(&mut self) -> Result<ServerInfo> {
        let data = self
            .expect_bulk(Command::new("INFO"))
            .await?
            .ok_or_else(|| Error::InvalidValue("nil reply to INFO".to_string()))?;

        let text = std::str::from_utf8(&data)
            .map_err(|e| Error::InvalidValue(format!("INFO payload is not UTF-8: {}", e)))?;
        Ok(ServerInfo::parse(text))
    }

    // ========================================================================
    // String Commands
    // ========================================================================

    /// SET key value
    pub async fn set(&mut self, key: impl Into<Bytes>, value: impl Into<Bytes>) -> Result<()> {
        self.expect_ok(Command::new("SET").arg(key).arg(value)).await
    }

    /// GET key - `None` if the key does not exist.
    pub async fn get(&mut self, key: impl Into<Bytes>) -> Result<Option<Bytes>> {
        self.expect_bulk(Command::new("GET").arg(key)).await
    }

    /// GETSET key value - sets the key and returns the previous value.
    ///
    /// `None` means the key had no previous value; the new value is set
    /// either way.
    pub async fn getset(
        &mut self,
        key: impl Into<Bytes>,
        value: impl Into<Bytes>,
    ) -> Result<Option<Bytes>> {
        self.expect_bulk(Command::new("GETSET").arg(key).arg(value))
            .await
    }

    /// SETNX key value - true if the key was set, false if it already existed.
    pub async fn setnx(&mut self, key: impl Into<Bytes>, value: impl Into<Bytes>) -> Result<bool> {
        let n = self
            .expect_integer(Command::new("SETNX").arg(key).arg(value))
            .await?;
        Ok(n == 1)
    }

    /// SETEX key seconds value - sets a key that expires after `ttl_secs`.
    pub async fn setex(
        &mut self,
        key: impl Into<Bytes>,
        value: impl Into<Bytes>,
        ttl_secs: u64,
    ) -> Result<()> {
        self.expect_ok(
            Command::new("SETEX")
                .arg(key)
                .arg_int(ttl_secs as i64)
                .arg(value),
        )
        .await
    }

    /// DEL key - true if the key existed and was deleted.
    pub async fn del(&mut self, key: impl Into<Bytes>) -> Result<bool> {
        let n = self.expect_integer(Command::new("DEL").arg(key)).await?;
        Ok(n > 0)
    }

    /// EXISTS key
    pub async fn exists(&mut self, key: impl Into<Bytes>) -> Result<bool> {
        let n = self.expect_integer(Command::new("EXISTS").arg(key)).await?;
        Ok(n == 1)
    }

    /// TYPE key - [`KeyType::None`] if the key does not exist.
    pub async fn key_type(&mut self, key: impl Into<Bytes>) -> Result<KeyType> {
        let text = self.expect_status(Command::new("TYPE").arg(key)).await?;
        KeyType::from_status(&text)
            .ok_or_else(|| Error::InvalidValue(format!("unknown key type: {}", text)))
    }

    /// KEYS pattern - all key names matching the glob-style pattern.
    ///
    /// No matches yield an empty sequence, not an error.
    pub async fn keys(&mut self, pattern: impl Into<Bytes>) -> Result<Vec<Bytes>> {
        self.expect_bulk_sequence(Command::new("KEYS").arg(pattern))
            .await
    }

    /// MGET key [key ...] - values in the same order as the keys, with `None`
    /// for every key that does not exist.
    pub async fn mget<I, K>(&mut self, keys: I) -> Result<Vec<Option<Bytes>>>
    where
        I: IntoIterator<Item = K>,
        K: Into<Bytes>,
    {
        let mut command = Command::new("MGET");
        for key in keys {
            command = command.arg(key);
        }

        let elements = match self.execute(command).await? {
            Reply::MultiBulk(Some(elements)) => elements,
            Reply::MultiBulk(None) => return Ok(Vec::new()),
            reply => return Err(Self::unexpected("multi-bulk", &reply)),
        };

        elements
            .into_iter()
            .map(|element| match element {
                Reply::Bulk(data) => Ok(data),
                reply => Err(Self::unexpected("bulk element", &reply)),
            })
            .collect()
    }

    /// INCR key - returns the new value.
    ///
    /// A key holding a non-integer value fails with the server's type error,
    /// never a corrupted number.
    pub async fn incr(&mut self, key: impl Into<Bytes>) -> Result<i64> {
        self.expect_integer(Command::new("INCR").arg(key)).await
    }

    /// INCRBY key increment
    pub async fn incr_by(&mut self, key: impl Into<Bytes>, increment: i64) -> Result<i64> {
        self.expect_integer(Command::new("INCRBY").arg(key).arg_int(increment))
            .await
    }

    /// DECR key
    pub async fn decr(&mut self, key: impl Into<Bytes>) -> Result<i64> {
        self.expect_integer(Command::new("DECR").arg(key)).await
    }

    /// DECRBY key decrement
    pub async fn decr_by(&mut self, key: impl Into<Bytes>, decrement: i64) -> Result<i64> {
        self.expect_integer(Command::new("DECRBY").arg(key).arg_int(decrement))
            .await
    }

    // ========================================================================
    // List Commands
    // ========================================================================

    /// RPUSH key value - returns the new list length.
    pub async fn rpush(&mut self, key: impl Into<Bytes>, value: impl Into<Bytes>) -> Result<i64> {
        self.expect_integer(Command::new("RPUSH").arg(key).arg(value))
            .await
    }

    /// LPUSH key value - returns the new list length.
    pub async fn lpush(&mut self, key: impl Into<Bytes>, value: impl Into<Bytes>) -> Result<i64> {
        self.expect_integer(Command::new("LPUSH").arg(key).arg(value))
            .await
    }

    /// LPOP key - `None` if the list is empty or missing.
    pub async fn lpop(&mut self, key: impl Into<Bytes>) -> Result<Option<Bytes>> {
        self.expect_bulk(Command::new("LPOP").arg(key)).await
    }

    /// RPOP key
    pub async fn rpop(&mut self, key: impl Into<Bytes>) -> Result<Option<Bytes>> {
        self.expect_bulk(Command::new("RPOP").arg(key)).await
    }

    /// LLEN key - 0 for a missing key.
    pub async fn llen(&mut self, key: impl Into<Bytes>) -> Result<i64> {
        self.expect_integer(Command::new("LLEN").arg(key)).await
    }

    /// LRANGE key start stop - elements in list order; `stop = -1` means "to
    /// the end". A missing key or empty range yields an empty sequence, not
    /// an error.
    pub async fn lrange(
        &mut self,
        key: impl Into<Bytes>,
        start: i64,
        stop: i64,
    ) -> Result<Vec<Bytes>> {
        self.expect_bulk_sequence(
            Command::new("LRANGE").arg(key).arg_int(start).arg_int(stop),
        )
        .await
    }

    /// LREM key count value - removes up to `count` occurrences of `value`,
    /// returning how many were removed.
    pub async fn lrem(
        &mut self,
        key: impl Into<Bytes>,
        count: i64,
        value: impl Into<Bytes>,
    ) -> Result<i64> {
        self.expect_integer(Command::new("LREM").arg(key).arg_int(count).arg(value))
            .await
    }

    /// LSET key index value - fails with the server's out-of-range error for
    /// a bad index.
    pub async fn lset(
        &mut self,
        key: impl Into<Bytes>,
        index: i64,
        value: impl Into<Bytes>,
    ) -> Result<()> {
        self.expect_ok(Command::new("LSET").arg(key).arg_int(index).arg(value))
            .await
    }

    // ========================================================================
    // Set Commands
    // ========================================================================

    /// SADD key member - true if the member was added (false if it was
    /// already present).
    pub async fn sadd(&mut self, key: impl Into<Bytes>, member: impl Into<Bytes>) -> Result<bool> {
        let n = self
            .expect_integer(Command::new("SADD").arg(key).arg(member))
            .await?;
        Ok(n == 1)
    }

    /// SREM key member - true if the member existed and was removed.
    pub async fn srem(&mut self, key: impl Into<Bytes>, member: impl Into<Bytes>) -> Result<bool> {
        let n = self
            .expect_integer(Command::new("SREM").arg(key).arg(member))
            .await?;
        Ok(n == 1)
    }

    /// SISMEMBER key member - false for a missing key or member.
    pub async fn sismember(
        &mut self,
        key: impl Into<Bytes>,
        member: impl Into<Bytes>,
    ) -> Result<bool> {
        let n = self
            .expect_integer(Command::new("SISMEMBER").arg(key).arg(member))
            .await?;
        Ok(n == 1)
    }

    // ========================================================================
    // Sorted Set Commands
    // ========================================================================

    /// ZADD key score member - true if a new member was added (false if its
    /// score was updated).
    pub async fn zadd(
        &mut self,
        key: impl Into<Bytes>,
        score: f64,
        member: impl Into<Bytes>,
    ) -> Result<bool> {
        let n = self
            .expect_integer(Command::new("ZADD").arg(key).arg_float(score).arg(member))
            .await?;
        Ok(n == 1)
    }

    /// ZREM key member - true if the member existed and was removed.
    pub async fn zrem(&mut self, key: impl Into<Bytes>, member: impl Into<Bytes>) -> Result<bool> {
        let n = self
            .expect_integer(Command::new("ZREM").arg(key).arg(member))
            .await?;
        Ok(n == 1)
    }

    /// ZINCRBY key increment member - returns the member's new score.
    pub async fn zincrby(
        &mut self,
        key: impl Into<Bytes>,
        increment: f64,
        member: impl Into<Bytes>,
    ) -> Result<f64> {
        self.expect_float_bulk(
            Command::new("ZINCRBY").arg(key).arg_float(increment).arg(member),
        )
        .await?
        .ok_or_else(|| Error::InvalidValue("nil reply to ZINCRBY".to_string()))
    }

    /// ZSCORE key member - `None` if the key or the member does not exist.
    pub async fn zscore(
        &mut self,
        key: impl Into<Bytes>,
        member: impl Into<Bytes>,
    ) -> Result<Option<f64>> {
        self.expect_float_bulk(Command::new("ZSCORE").arg(key).arg(member))
            .await
    }

    /// ZRANK key member - ascending-order rank, `None` if the key or member
    /// does not exist.
    pub async fn zrank(
        &mut self,
        key: impl Into<Bytes>,
        member: impl Into<Bytes>,
    ) -> Result<Option<i64>> {
        self.expect_integer_or_nil(Command::new("ZRANK").arg(key).arg(member))
            .await
    }

    /// ZREVRANK key member - descending-order rank.
    pub async fn zrevrank(
        &mut self,
        key: impl Into<Bytes>,
        member: impl Into<Bytes>,
    ) -> Result<Option<i64>> {
        self.expect_integer_or_nil(Command::new("ZREVRANK").arg(key).arg(member))
            .await
    }
}

fn parse_float(data: &[u8]) -> Result<f64> {
    let text = std::str::from_utf8(data)
        .map_err(|e| Error::InvalidValue(format!("score is not UTF-8: {}", e)))?;
    text.parse()
        .map_err(|_| Error::InvalidValue(format!("invalid score: {}", text)))
}
