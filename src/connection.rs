//! Transport ownership and the command-execution primitive
//!
//! A [`Connection`] owns exactly one live transport session to the
//! store, opened from an [`Endpoint`]. It is not safe for concurrent
//! use without external synchronization; every operation takes
//! `&mut self` and blocks until the server replies or the transport
//! fails.

use crate::error::{Error, Result};
use crate::reply::Reply;
use log::{debug, info};
use std::fmt;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::net::TcpStream;
#[cfg(unix)]
use std::os::unix::net::UnixStream;
#[cfg(unix)]
use std::path::PathBuf;

/// Address of a Redis-compatible store
///
/// The two connection styles the store supports are explicit variants
/// rather than constructor overloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// TCP, by host name or IP and port
    Tcp { host: String, port: u16 },
    /// Local Unix domain socket, by filesystem path
    #[cfg(unix)]
    Unix { path: PathBuf },
}

impl Endpoint {
    /// Endpoint for a TCP connection
    pub fn tcp<S: Into<String>>(host: S, port: u16) -> Self {
        Endpoint::Tcp {
            host: host.into(),
            port,
        }
    }

    /// Endpoint for a Unix domain socket connection
    #[cfg(unix)]
    pub fn unix<P: Into<PathBuf>>(path: P) -> Self {
        Endpoint::Unix { path: path.into() }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Tcp { host, port } => write!(f, "{host}:{port}"),
            #[cfg(unix)]
            Endpoint::Unix { path } => write!(f, "unix:{}", path.display()),
        }
    }
}

/// The underlying socket, one variant per connection style
enum Transport {
    Tcp(TcpStream),
    #[cfg(unix)]
    Unix(UnixStream),
}

impl Transport {
    fn try_clone(&self) -> io::Result<Transport> {
        match self {
            Transport::Tcp(stream) => stream.try_clone().map(Transport::Tcp),
            #[cfg(unix)]
            Transport::Unix(stream) => stream.try_clone().map(Transport::Unix),
        }
    }
}

impl Read for Transport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Transport::Tcp(stream) => stream.read(buf),
            #[cfg(unix)]
            Transport::Unix(stream) => stream.read(buf),
        }
    }
}

impl Write for Transport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Transport::Tcp(stream) => stream.write(buf),
            #[cfg(unix)]
            Transport::Unix(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Transport::Tcp(stream) => stream.flush(),
            #[cfg(unix)]
            Transport::Unix(stream) => stream.flush(),
        }
    }
}

/// One live, exclusively-owned connection to the store
pub struct Connection {
    reader: BufReader<Transport>,
    writer: BufWriter<Transport>,
    endpoint: Endpoint,
}

impl Connection {
    /// Open a transport to `endpoint`
    ///
    /// Fails fast: a connection that cannot be established is reported
    /// here as [`Error::Connection`], never deferred to first use.
    pub fn open(endpoint: &Endpoint) -> Result<Self> {
        info!("connecting to {}", endpoint);

        let transport = match endpoint {
            Endpoint::Tcp { host, port } => TcpStream::connect((host.as_str(), *port))
                .map(Transport::Tcp)
                .map_err(|e| Error::connection(format!("failed to connect to {endpoint}: {e}")))?,
            #[cfg(unix)]
            Endpoint::Unix { path } => UnixStream::connect(path)
                .map(Transport::Unix)
                .map_err(|e| Error::connection(format!("failed to connect to {endpoint}: {e}")))?,
        };

        let reader = BufReader::new(transport.try_clone()?);
        let writer = BufWriter::new(transport);

        info!("connected to {}", endpoint);

        Ok(Connection {
            reader,
            writer,
            endpoint: endpoint.clone(),
        })
    }

    /// The endpoint this connection was opened against
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Send one command and decode its reply
    ///
    /// The command name and its positional arguments go on the wire as
    /// an array of bulk strings, each value embedded verbatim with no
    /// quoting layer, so arguments may contain spaces, colons, or be
    /// empty. Blocks until a full reply arrives or the transport fails.
    pub fn execute(&mut self, command: &str, args: &[&str]) -> Result<Reply> {
        debug!("issuing: {} {}", command, args.join(" "));

        let frame = encode_command(command, args);
        self.writer.write_all(&frame)?;
        self.writer.flush()?;

        let reply = Reply::read(&mut self.reader)?;
        debug!("received {} reply", reply.kind());

        Ok(reply)
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        debug!("closing connection to {}", self.endpoint);
        // Dropping the buffered halves closes the underlying socket.
    }
}

/// Encode a command as an array of bulk strings
fn encode_command(command: &str, args: &[&str]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(32);
    frame.extend_from_slice(format!("*{}\r\n", args.len() + 1).as_bytes());
    push_bulk(&mut frame, command);
    for arg in args {
        push_bulk(&mut frame, arg);
    }
    frame
}

fn push_bulk(frame: &mut Vec<u8>, value: &str) {
    frame.extend_from_slice(format!("${}\r\n", value.len()).as_bytes());
    frame.extend_from_slice(value.as_bytes());
    frame.extend_from_slice(b"\r\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_single_argument_command() {
        let frame = encode_command("GET", &["fruit"]);
        assert_eq!(frame, b"*2\r\n$3\r\nGET\r\n$5\r\nfruit\r\n");
    }

    #[test]
    fn encodes_two_argument_command() {
        let frame = encode_command("SET", &["k", "v"]);
        assert_eq!(frame, b"*3\r\n$3\r\nSET\r\n$1\r\nk\r\n$1\r\nv\r\n");
    }

    #[test]
    fn encodes_empty_and_spaced_values_verbatim() {
        let frame = encode_command("SET", &["k", ""]);
        assert_eq!(frame, b"*3\r\n$3\r\nSET\r\n$1\r\nk\r\n$0\r\n\r\n");

        let frame = encode_command("SET", &["k", "a b"]);
        assert_eq!(frame, b"*3\r\n$3\r\nSET\r\n$1\r\nk\r\n$3\r\na b\r\n");
    }

    #[test]
    fn bulk_lengths_count_bytes_not_chars() {
        let frame = encode_command("SET", &["k", "héllo"]);
        let text = String::from_utf8(frame).unwrap();
        assert!(text.contains("$6\r\nhéllo"));
    }

    #[test]
    fn tcp_endpoint_display() {
        let ep = Endpoint::tcp("127.0.0.1", 6379);
        assert_eq!(ep.to_string(), "127.0.0.1:6379");
    }

    #[cfg(unix)]
    #[test]
    fn unix_endpoint_display() {
        let ep = Endpoint::unix("/var/run/redis.sock");
        assert_eq!(ep.to_string(), "unix:/var/run/redis.sock");
    }

    #[test]
    fn open_fails_fast_on_refused_connection() {
        // Port 1 is privileged and unbound on any sane test host.
        let ep = Endpoint::tcp("127.0.0.1", 1);
        match Connection::open(&ep) {
            Err(Error::Connection { message }) => assert!(message.contains("127.0.0.1:1")),
            Err(other) => panic!("expected connection error, got {other:?}"),
            Ok(_) => panic!("connect unexpectedly succeeded"),
        }
    }
}
