//! Server Introspection Types
//!
//! Typed views over the text the server reports about itself: the TYPE
//! command's status reply and the INFO command's bulk payload.

use std::collections::HashMap;
use std::fmt;

/// The type a key currently holds, as reported by TYPE.
///
/// `None` means the key does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    None,
    String,
    List,
    Set,
    ZSet,
    Hash,
}

impl KeyType {
    /// Parses the status text of a TYPE reply.
    pub fn from_status(s: &str) -> Option<Self> {
        match s {
            "none" => Some(KeyType::None),
            "string" => Some(KeyType::String),
            "list" => Some(KeyType::List),
            "set" => Some(KeyType::Set),
            "zset" => Some(KeyType::ZSet),
            "hash" => Some(KeyType::Hash),
            _ => None,
        }
    }

    /// The wire name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::None => "none",
            KeyType::String => "string",
            KeyType::List => "list",
            KeyType::Set => "set",
            KeyType::ZSet => "zset",
            KeyType::Hash => "hash",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed INFO output.
///
/// The server reports one `field:value` pair per line; section headers start
/// with `#` and are skipped. Values are kept as text with typed getters on
/// top, since the field set varies between server versions.
///
/// # Example
///
/// ```
/// use boltlink::client::ServerInfo;
///
/// let info = ServerInfo::parse("redis_version:7.2.0\r\nconnected_clients:3\r\n");
/// assert_eq!(info.get("redis_version"), Some("7.2.0"));
/// assert_eq!(info.get_i64("connected_clients"), Some(3));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ServerInfo {
    fields: HashMap<String, String>,
}

impl ServerInfo {
    /// Parses the text of an INFO bulk reply.
    ///
    /// Lines that are empty, start with `#`, or have no `:` are ignored.
    pub fn parse(text: &str) -> Self {
        let mut fields = HashMap::new();

        for line in text.lines() {
            let line = line.trim_end_matches('\r');
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((field, value)) = line.split_once(':') {
                fields.insert(field.to_string(), value.to_string());
            }
        }

        Self { fields }
    }

    /// Raw text value of a field.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Field parsed as a signed integer.
    pub fn get_i64(&self, field: &str) -> Option<i64> {
        self.get(field)?.parse().ok()
    }

    /// Field parsed as a float.
    pub fn get_f64(&self, field: &str) -> Option<f64> {
        self.get(field)?.parse().ok()
    }

    /// Field parsed as a boolean (`0`/`1`, `no`/`yes`).
    pub fn get_bool(&self, field: &str) -> Option<bool> {
        match self.get(field)? {
            "0" | "no" => Some(false),
            "1" | "yes" => Some(true),
            _ => None,
        }
    }

    /// The server's reported version, if present.
    pub fn version(&self) -> Option<&str> {
        self.get("redis_version")
    }

    /// Number of parsed fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if no fields were parsed.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over all `(field, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "# Server\r\n\
        redis_version:7.2.0\r\n\
        uptime_in_seconds:4242\r\n\
        \r\n\
        # Clients\r\n\
        connected_clients:3\r\n\
        used_memory_ratio:0.75\r\n\
        aof_enabled:0\r\n\
        loading:no\r\n";

    #[test]
    fn test_parse_fields() {
        let info = ServerInfo::parse(SAMPLE);
        assert_eq!(info.len(), 6);
        assert_eq!(info.get("redis_version"), Some("7.2.0"));
        assert_eq!(info.version(), Some("7.2.0"));
        assert_eq!(info.get("nonexistent"), None);
    }

    #[test]
    fn test_sections_and_blank_lines_skipped() {
        let info = ServerInfo::parse(SAMPLE);
        assert_eq!(info.get("# Server"), None);
        assert_eq!(info.get(""), None);
    }

    #[test]
    fn test_typed_getters() {
        let info = ServerInfo::parse(SAMPLE);
        assert_eq!(info.get_i64("uptime_in_seconds"), Some(4242));
        assert_eq!(info.get_f64("used_memory_ratio"), Some(0.75));
        assert_eq!(info.get_bool("aof_enabled"), Some(false));
        assert_eq!(info.get_bool("loading"), Some(false));
        assert_eq!(info.get_i64("redis_version"), None);
    }

    #[test]
    fn test_value_containing_colon() {
        let info = ServerInfo::parse("master_host:10.0.0.1:6379\n");
        assert_eq!(info.get("master_host"), Some("10.0.0.1:6379"));
    }

    #[test]
    fn test_empty_input() {
        assert!(ServerInfo::parse("").is_empty());
    }

    #[test]
    fn test_key_type_from_status() {
        assert_eq!(KeyType::from_status("none"), Some(KeyType::None));
        assert_eq!(KeyType::from_status("string"), Some(KeyType::String));
        assert_eq!(KeyType::from_status("list"), Some(KeyType::List));
        assert_eq!(KeyType::from_status("zset"), Some(KeyType::ZSet));
        assert_eq!(KeyType::from_status("bogus"), None);
    }

    #[test]
    fn test_key_type_display() {
        assert_eq!(KeyType::ZSet.to_string(), "zset");
        assert_eq!(KeyType::None.to_string(), "none");
    }
}
