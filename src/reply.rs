//! Decoded server replies
//!
//! A [`Reply`] is the immutable, read-only view over one decoded
//! response from the store. The root reply owns its data; array
//! children are owned by the parent's vector and handed out as
//! `&Reply` borrows, so a child view can never outlive the reply it
//! is part of.

use crate::error::{Error, Result};
use std::fmt;
use std::io::BufRead;

/// One decoded reply from the store
///
/// Ephemeral: produced by a single command exchange and released when
/// it goes out of scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Simple status line, e.g. `OK`
    Status(String),
    /// Signed integer reply
    Integer(i64),
    /// Bulk string payload
    String(String),
    /// The key or value does not exist
    Nil,
    /// Ordered sequence of child replies
    Array(Vec<Reply>),
    /// Error message reported by the server
    Error(String),
}

/// The tag distinguishing the reply shapes the protocol can return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    Status,
    Integer,
    String,
    Nil,
    Array,
    Error,
}

impl fmt::Display for ReplyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReplyKind::Status => "status",
            ReplyKind::Integer => "integer",
            ReplyKind::String => "string",
            ReplyKind::Nil => "nil",
            ReplyKind::Array => "array",
            ReplyKind::Error => "error",
        };
        f.write_str(name)
    }
}

impl Reply {
    /// The kind tag of this reply
    pub fn kind(&self) -> ReplyKind {
        match self {
            Reply::Status(_) => ReplyKind::Status,
            Reply::Integer(_) => ReplyKind::Integer,
            Reply::String(_) => ReplyKind::String,
            Reply::Nil => ReplyKind::Nil,
            Reply::Array(_) => ReplyKind::Array,
            Reply::Error(_) => ReplyKind::Error,
        }
    }

    /// String payload, for status and bulk string replies only
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Reply::Status(s) | Reply::String(s) => Some(s),
            _ => None,
        }
    }

    /// Child replies, for array replies only
    pub fn elements(&self) -> Option<&[Reply]> {
        match self {
            Reply::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Borrowed child reply at `index`, for array replies only
    pub fn get(&self, index: usize) -> Option<&Reply> {
        self.elements().and_then(|items| items.get(index))
    }

    /// Decode exactly one reply from the transport
    ///
    /// A connection that closes before a full reply arrives is reported
    /// as [`Error::Connection`]; bytes that do not form a valid reply
    /// are [`Error::Protocol`].
    pub(crate) fn read<R: BufRead>(reader: &mut R) -> Result<Reply> {
        let line = read_line(reader)?;
        let (marker, rest) = split_marker(&line)?;

        match marker {
            b'+' => Ok(Reply::Status(rest.to_string())),
            b'-' => Ok(Reply::Error(rest.to_string())),
            b':' => {
                let value = rest
                    .parse::<i64>()
                    .map_err(|_| Error::protocol(format!("invalid integer reply: {rest:?}")))?;
                Ok(Reply::Integer(value))
            }
            b'$' => {
                let len = parse_length(rest)?;
                match len {
                    None => Ok(Reply::Nil),
                    Some(len) => {
                        let mut buf = vec![0u8; len + 2];
                        reader.read_exact(&mut buf).map_err(eof_as_connection)?;
                        if &buf[len..] != b"\r\n" {
                            return Err(Error::protocol("bulk string missing CRLF terminator"));
                        }
                        buf.truncate(len);
                        let payload = String::from_utf8(buf)
                            .map_err(|_| Error::protocol("bulk string is not valid UTF-8"))?;
                        Ok(Reply::String(payload))
                    }
                }
            }
            b'*' => {
                let len = parse_length(rest)?;
                match len {
                    None => Ok(Reply::Nil),
                    Some(len) => {
                        let mut items = Vec::with_capacity(len);
                        for _ in 0..len {
                            items.push(Reply::read(reader)?);
                        }
                        Ok(Reply::Array(items))
                    }
                }
            }
            other => Err(Error::protocol(format!(
                "invalid reply type byte `{}`",
                other as char
            ))),
        }
    }
}

/// Read one CRLF-terminated line, without the terminator
fn read_line<R: BufRead>(reader: &mut R) -> Result<String> {
    let mut line = String::new();
    let n = reader.read_line(&mut line)?;
    if n == 0 {
        return Err(Error::connection("server closed the connection"));
    }
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(line)
}

fn split_marker(line: &str) -> Result<(u8, &str)> {
    match line.as_bytes().first() {
        // Slicing past the marker is only safe for a one-byte marker.
        Some(&marker) if marker.is_ascii() => Ok((marker, &line[1..])),
        Some(&marker) => Err(Error::protocol(format!(
            "invalid reply type byte `{marker:#04x}`"
        ))),
        None => Err(Error::protocol("empty reply line")),
    }
}

/// Parse a bulk/array length header; `-1` encodes nil
fn parse_length(rest: &str) -> Result<Option<usize>> {
    let len = rest
        .parse::<i64>()
        .map_err(|_| Error::protocol(format!("invalid length header: {rest:?}")))?;
    match len {
        -1 => Ok(None),
        n if n >= 0 => Ok(Some(n as usize)),
        n => Err(Error::protocol(format!("negative length header: {n}"))),
    }
}

fn eof_as_connection(err: std::io::Error) -> Error {
    if err.kind() == std::io::ErrorKind::UnexpectedEof {
        Error::connection("server closed the connection mid-reply")
    } else {
        Error::Io { source: err }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn decode(bytes: &[u8]) -> Result<Reply> {
        Reply::read(&mut Cursor::new(bytes))
    }

    #[test]
    fn decodes_status() {
        assert_eq!(decode(b"+OK\r\n").unwrap(), Reply::Status("OK".into()));
    }

    #[test]
    fn decodes_error() {
        let reply = decode(b"-ERR unknown command\r\n").unwrap();
        assert_eq!(reply, Reply::Error("ERR unknown command".into()));
        assert_eq!(reply.kind(), ReplyKind::Error);
    }

    #[test]
    fn decodes_integer() {
        assert_eq!(decode(b":42\r\n").unwrap(), Reply::Integer(42));
        assert_eq!(decode(b":-3\r\n").unwrap(), Reply::Integer(-3));
    }

    #[test]
    fn decodes_bulk_string() {
        assert_eq!(decode(b"$5\r\nhello\r\n").unwrap(), Reply::String("hello".into()));
    }

    #[test]
    fn decodes_empty_bulk_string() {
        assert_eq!(decode(b"$0\r\n\r\n").unwrap(), Reply::String(String::new()));
    }

    #[test]
    fn bulk_string_may_contain_spaces_and_colons() {
        let reply = decode(b"$9\r\na b:c d e\r\n").unwrap();
        assert_eq!(reply.as_str(), Some("a b:c d e"));
    }

    #[test]
    fn decodes_nil_bulk_and_nil_array() {
        assert_eq!(decode(b"$-1\r\n").unwrap(), Reply::Nil);
        assert_eq!(decode(b"*-1\r\n").unwrap(), Reply::Nil);
    }

    #[test]
    fn decodes_array_of_strings() {
        let reply = decode(b"*2\r\n$5\r\napple\r\n$4\r\npear\r\n").unwrap();
        assert_eq!(reply.kind(), ReplyKind::Array);
        let items = reply.elements().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_str(), Some("apple"));
        assert_eq!(reply.get(1).unwrap().as_str(), Some("pear"));
        assert!(reply.get(2).is_none());
    }

    #[test]
    fn decodes_nested_array() {
        let reply = decode(b"*2\r\n:1\r\n*1\r\n+OK\r\n").unwrap();
        let items = reply.elements().unwrap();
        assert_eq!(items[0], Reply::Integer(1));
        assert_eq!(items[1].get(0).unwrap().kind(), ReplyKind::Status);
    }

    #[test]
    fn accessors_refuse_wrong_kind() {
        assert_eq!(Reply::Integer(7).as_str(), None);
        assert_eq!(Reply::Status("OK".into()).elements(), None);
        assert!(Reply::Nil.get(0).is_none());
    }

    #[test]
    fn rejects_unknown_marker() {
        assert!(matches!(decode(b"?what\r\n"), Err(Error::Protocol { .. })));
    }

    #[test]
    fn rejects_malformed_integer() {
        assert!(matches!(decode(b":forty\r\n"), Err(Error::Protocol { .. })));
    }

    #[test]
    fn rejects_truncated_bulk() {
        assert!(matches!(
            decode(b"$10\r\nshort\r\n"),
            Err(Error::Connection { .. })
        ));
    }

    #[test]
    fn eof_before_reply_is_connection_error() {
        assert!(matches!(decode(b""), Err(Error::Connection { .. })));
    }

    #[test]
    fn kind_display_names() {
        assert_eq!(ReplyKind::Status.to_string(), "status");
        assert_eq!(ReplyKind::Nil.to_string(), "nil");
        assert_eq!(ReplyKind::Array.to_string(), "array");
    }
}
