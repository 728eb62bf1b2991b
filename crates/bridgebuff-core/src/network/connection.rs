use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

/// A connected, bidirectional byte stream to a single remote endpoint.
///
/// Reads must honor the timeout set through [`Connection::set_idle_timeout`]
/// by failing with [`io::ErrorKind::WouldBlock`] or [`io::ErrorKind::TimedOut`]
/// once no data arrives within it.
pub trait Connection: Read + Write {
    fn set_idle_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()>;
}

impl Connection for TcpStream {
    fn set_idle_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        self.set_read_timeout(timeout)
    }
}

/// Whether a read error means "nothing arrived within the timeout".
///
/// Unix reports an expired socket timeout as `WouldBlock`, Windows as `TimedOut`.
pub fn is_idle_timeout(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}
