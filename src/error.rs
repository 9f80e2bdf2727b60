//! Error types for client operations

use crate::reply::ReplyKind;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error surface of the client
///
/// Every failure is reported synchronously to the caller of the
/// operation that triggered it; nothing is retried or recovered
/// internally.
#[derive(Error, Debug)]
pub enum Error {
    /// The transport could not be established, or dropped mid-exchange
    #[error("Connection error: {message}")]
    Connection { message: String },

    /// Socket-level I/O failures
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// The server sent bytes the reply decoder cannot classify
    #[error("Protocol error: {message}")]
    Protocol { message: String },

    /// The server answered with an error reply
    #[error("Server error: {message}")]
    Server { message: String },

    /// A well-formed reply whose kind does not match what the issuing
    /// operation requires
    #[error("{operation}: expected {expected} reply, got {actual}")]
    UnexpectedReply {
        operation: &'static str,
        expected: ReplyKind,
        actual: ReplyKind,
    },
}

impl Error {
    /// Create a connection error
    pub fn connection<S: Into<String>>(msg: S) -> Self {
        Error::Connection { message: msg.into() }
    }

    /// Create a protocol error
    pub fn protocol<S: Into<String>>(msg: S) -> Self {
        Error::Protocol { message: msg.into() }
    }

    /// Create a server error
    pub fn server<S: Into<String>>(msg: S) -> Self {
        Error::Server { message: msg.into() }
    }

    /// Create a reply-kind mismatch error for `operation`
    pub fn unexpected_reply(
        operation: &'static str,
        expected: ReplyKind,
        actual: ReplyKind,
    ) -> Self {
        Error::UnexpectedReply {
            operation,
            expected,
            actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_names_operation_and_kinds() {
        let err = Error::unexpected_reply("get_value", ReplyKind::String, ReplyKind::Integer);
        let msg = err.to_string();
        assert!(msg.contains("get_value"));
        assert!(msg.contains("string"));
        assert!(msg.contains("integer"));
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe");
        let converted: Error = io.into();
        assert!(matches!(converted, Error::Io { .. }));
    }

    #[test]
    fn display_is_nonempty_for_all_variants() {
        let errors = vec![
            Error::connection("refused"),
            Error::protocol("bad frame"),
            Error::server("WRONGTYPE"),
            Error::unexpected_reply("set_value", ReplyKind::Status, ReplyKind::Nil),
        ];
        for error in errors {
            assert!(!error.to_string().is_empty());
        }
    }
}
