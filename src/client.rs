//! The namespaced key-value client facade

use crate::connection::{Connection, Endpoint};
use crate::error::{Error, Result};
use crate::reply::{Reply, ReplyKind};
#[cfg(unix)]
use std::path::PathBuf;

/// Client for a Redis-compatible key-value store
///
/// Owns exactly one connection and exposes five logical operations
/// over scalar string values and unordered string sets, addressed
/// through an optional namespace prefix. Every operation blocks until
/// the store replies and surfaces failures synchronously; nothing is
/// retried.
///
/// # Example
///
/// ```rust,no_run
/// use rediskv_client::{Client, Result};
///
/// fn main() -> Result<()> {
///     let mut client = Client::connect("127.0.0.1", 6379)?;
///
///     client.set_value("greeting", "hello")?;
///     let value = client.get_value("greeting")?;
///     client.remove_key("greeting")?;
///
///     Ok(())
/// }
/// ```
pub struct Client {
    conn: Connection,
}

impl Client {
    /// Connect to a store over TCP
    pub fn connect<S: Into<String>>(host: S, port: u16) -> Result<Self> {
        Self::open(&Endpoint::tcp(host, port))
    }

    /// Connect to a store over a local Unix domain socket
    #[cfg(unix)]
    pub fn connect_unix<P: Into<PathBuf>>(path: P) -> Result<Self> {
        Self::open(&Endpoint::unix(path))
    }

    /// Connect to an explicit [`Endpoint`]
    pub fn open(endpoint: &Endpoint) -> Result<Self> {
        let conn = Connection::open(endpoint)?;
        Ok(Client { conn })
    }

    /// The endpoint this client is connected to
    pub fn endpoint(&self) -> &Endpoint {
        self.conn.endpoint()
    }

    /// Delete `key` and any value or set stored under it
    pub fn remove_key(&mut self, key: &str) -> Result<()> {
        self.remove_key_in_namespace(key, "")
    }

    /// Delete `key` within namespace `ns`
    pub fn remove_key_in_namespace(&mut self, key: &str, ns: &str) -> Result<()> {
        let key = qualify(key, ns);
        let reply = self.conn.execute("DEL", &[key.as_str()])?;
        check_kind("remove_key", ReplyKind::Integer, reply)?;
        Ok(())
    }

    /// Store `value` as the scalar string under `key`
    ///
    /// Overwrites any previous value. The value never expires; it
    /// lives until [`Client::remove_key`].
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        self.set_value_in_namespace(key, value, "")
    }

    /// Store `value` under `key` within namespace `ns`
    pub fn set_value_in_namespace(&mut self, key: &str, value: &str, ns: &str) -> Result<()> {
        let key = qualify(key, ns);
        let reply = self.conn.execute("SET", &[key.as_str(), value])?;
        check_kind("set_value", ReplyKind::Status, reply)?;
        Ok(())
    }

    /// Fetch the scalar string stored under `key`
    ///
    /// A key that was never set is a miss, not an error: the result is
    /// the empty string.
    pub fn get_value(&mut self, key: &str) -> Result<String> {
        self.get_value_in_namespace(key, "")
    }

    /// Fetch the value of `key` within namespace `ns`
    pub fn get_value_in_namespace(&mut self, key: &str, ns: &str) -> Result<String> {
        let key = qualify(key, ns);
        match self.conn.execute("GET", &[key.as_str()])? {
            Reply::String(value) => Ok(value),
            Reply::Nil => Ok(String::new()),
            Reply::Error(message) => Err(Error::Server { message }),
            other => Err(Error::unexpected_reply(
                "get_value",
                ReplyKind::String,
                other.kind(),
            )),
        }
    }

    /// Add `member` to the unordered set stored under `key`
    ///
    /// Idempotent for membership: adding a member that is already
    /// present leaves the set unchanged.
    pub fn add_member(&mut self, key: &str, member: &str) -> Result<()> {
        self.add_member_in_namespace(key, member, "")
    }

    /// Add `member` to the set under `key` within namespace `ns`
    pub fn add_member_in_namespace(&mut self, key: &str, member: &str, ns: &str) -> Result<()> {
        let key = qualify(key, ns);
        let reply = self.conn.execute("SADD", &[key.as_str(), member])?;
        check_kind("add_member", ReplyKind::Integer, reply)?;
        Ok(())
    }

    /// Enumerate every member of the set stored under `key`
    ///
    /// The returned order carries no meaning; callers must treat the
    /// sequence as a set. A key with no set is a miss and yields an
    /// empty vector.
    pub fn get_members(&mut self, key: &str) -> Result<Vec<String>> {
        self.get_members_in_namespace(key, "")
    }

    /// Enumerate the set under `key` within namespace `ns`
    pub fn get_members_in_namespace(&mut self, key: &str, ns: &str) -> Result<Vec<String>> {
        let key = qualify(key, ns);
        match self.conn.execute("SMEMBERS", &[key.as_str()])? {
            Reply::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Reply::String(member) => Ok(member),
                    other => Err(Error::unexpected_reply(
                        "get_members",
                        ReplyKind::String,
                        other.kind(),
                    )),
                })
                .collect(),
            Reply::Nil => Ok(Vec::new()),
            Reply::Error(message) => Err(Error::Server { message }),
            other => Err(Error::unexpected_reply(
                "get_members",
                ReplyKind::Array,
                other.kind(),
            )),
        }
    }
}

/// Validate a reply's kind for `operation`
///
/// Error replies carry the server's own message; any other kind
/// mismatch names the operation and both kinds.
fn check_kind(operation: &'static str, expected: ReplyKind, reply: Reply) -> Result<Reply> {
    match reply {
        Reply::Error(message) => Err(Error::Server { message }),
        reply if reply.kind() == expected => Ok(reply),
        reply => Err(Error::unexpected_reply(operation, expected, reply.kind())),
    }
}

/// Combine a key with its namespace into the qualified key
///
/// The empty namespace denotes the root key space and leaves the key
/// untouched. No escaping is applied: a literal `:` inside either part
/// is passed through, so `qualify("a:b", "n")` and `qualify("b", "n:a")`
/// produce the same qualified key. This collision is an accepted
/// limitation of the scheme.
fn qualify(key: &str, ns: &str) -> String {
    if ns.is_empty() {
        key.to_string()
    } else {
        format!("{ns}:{key}")
    }
}
