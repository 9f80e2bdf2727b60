//! Namespaced key-value client for Redis-compatible stores
//!
//! This library is a thin, synchronous client facade over a single
//! Redis-compatible server, reached via TCP or a local Unix domain
//! socket. It exposes a small, stable operation set: get/set/delete of
//! scalar string values and add/read of members of an unordered string
//! set, all addressed through an optional namespace prefix that
//! partitions the flat key space into logical buckets (`ns:key`).
//!
//! # Design
//!
//! - **One connection per client.** A [`Client`] exclusively owns its
//!   [`Connection`]; there is no pooling, retrying, or internal
//!   concurrency. Operations take `&mut self` and block until the
//!   store replies.
//! - **Typed replies.** Every exchange decodes into a [`Reply`], a
//!   tagged view over the protocol's reply shapes (status, integer,
//!   bulk string, nil, array, error). Each operation validates the
//!   kind it requires and maps mismatches into [`Error`] values that
//!   name the operation and both kinds.
//! - **Misses are not errors.** Reading a key that was never set
//!   yields the empty string (or an empty vector for sets), never a
//!   failure.
//!
//! Logging goes through the [`log`] facade and is a no-op unless the
//! embedding application installs a logger.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use rediskv_client::{Client, Result};
//!
//! fn main() -> Result<()> {
//!     let mut client = Client::connect("127.0.0.1", 6379)?;
//!
//!     client.set_value_in_namespace("capital", "Paris", "france")?;
//!     let capital = client.get_value_in_namespace("capital", "france")?;
//!
//!     client.add_member("fruit", "apple")?;
//!     client.add_member("fruit", "pear")?;
//!     let fruit = client.get_members("fruit")?;
//!
//!     client.remove_key("fruit")?;
//!     Ok(())
//! }
//! ```

pub mod error;

mod client;
mod connection;
mod reply;

pub use client::Client;
pub use connection::{Connection, Endpoint};
pub use error::{Error, Result};
pub use reply::{Reply, ReplyKind};

/// Port a Redis-compatible store conventionally listens on
pub const DEFAULT_PORT: u16 = 6379;
