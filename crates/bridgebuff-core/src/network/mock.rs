//! Scripted in-memory peer for testing
//!
//! Provides a configurable mock implementation of the Connection trait that
//! answers each request from a script or a handler instead of a real socket.

use std::collections::VecDeque;
use std::io::{self, ErrorKind, Read, Write};
use std::time::Duration;

use crate::network::Connection;

/// What the mock peer does in response to one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// Send these chunks, one per read, then go quiet
    Chunks(Vec<Vec<u8>>),
    /// Send nothing; every read times out
    Silence,
    /// Close the stream; reads return 0 bytes
    Close,
    /// Fail the first read with this error
    ReadError(ErrorKind),
    /// Fail the write with this error
    WriteError(ErrorKind),
}

impl MockReply {
    /// Well-formed response with a correct `Content-Length`, sent in one chunk.
    pub fn ok(body: &str) -> Self {
        Self::status(200, "OK", body)
    }

    pub fn status(code: u16, reason: &str, body: &str) -> Self {
        Self::Chunks(vec![format_response(code, reason, body.as_bytes(), body.len())])
    }

    /// Well-formed response split into chunks of `chunk_size` bytes.
    pub fn fragmented(body: &str, chunk_size: usize) -> Self {
        let raw = format_response(200, "OK", body.as_bytes(), body.len());
        Self::Chunks(raw.chunks(chunk_size.max(1)).map(<[u8]>::to_vec).collect())
    }

    /// Response whose `Content-Length` promises more bytes than are sent.
    pub fn truncated(body: &str, missing: usize) -> Self {
        Self::Chunks(vec![format_response(
            200,
            "OK",
            body.as_bytes(),
            body.len() + missing,
        )])
    }

    pub fn raw(bytes: &[u8]) -> Self {
        Self::Chunks(vec![bytes.to_vec()])
    }
}

fn format_response(code: u16, reason: &str, body: &[u8], content_length: usize) -> Vec<u8> {
    let mut raw = format!(
        "HTTP/1.1 {} {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\n\r\n",
        code, reason, content_length
    )
    .into_bytes();
    raw.extend_from_slice(body);
    raw
}

type Handler = Box<dyn FnMut(&str) -> MockReply>;

/// Mock connection for testing
///
/// Each `flush` delivers the bytes written since the previous flush as one
/// request. The handler receives the request target (`/path?query`) and
/// decides the reply.
pub struct MockConnection {
    handler: Handler,
    outgoing: Vec<u8>,
    inbox: VecDeque<Vec<u8>>,
    read_error: Option<ErrorKind>,
    closed: bool,
    requests: Vec<String>,
    idle_timeout: Option<Duration>,
}

impl MockConnection {
    /// Answer requests with a handler keyed on the request target
    pub fn with_handler<F>(handler: F) -> Self
    where
        F: FnMut(&str) -> MockReply + 'static,
    {
        Self {
            handler: Box::new(handler),
            outgoing: Vec::new(),
            inbox: VecDeque::new(),
            read_error: None,
            closed: false,
            requests: Vec::new(),
            idle_timeout: None,
        }
    }

    /// Answer requests with the given replies in order, then with silence
    pub fn scripted(replies: Vec<MockReply>) -> Self {
        let mut replies = VecDeque::from(replies);
        Self::with_handler(move |_| replies.pop_front().unwrap_or(MockReply::Silence))
    }

    /// A peer that never answers
    pub fn silent() -> Self {
        Self::with_handler(|_| MockReply::Silence)
    }

    /// Raw text of every request received so far
    pub fn requests(&self) -> &[String] {
        &self.requests
    }

    pub fn request_count(&self) -> usize {
        self.requests.len()
    }

    /// Request targets (`/path?query`) received so far
    pub fn targets(&self) -> Vec<String> {
        self.requests.iter().map(|r| request_target(r)).collect()
    }

    /// Idle timeout most recently set by the transport
    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout
    }

    fn dispatch(&mut self) -> io::Result<()> {
        if self.outgoing.is_empty() {
            return Ok(());
        }
        let request = String::from_utf8_lossy(&std::mem::take(&mut self.outgoing)).into_owned();
        let target = request_target(&request);
        self.requests.push(request);

        self.inbox.clear();
        self.read_error = None;
        self.closed = false;
        match (self.handler)(&target) {
            MockReply::Chunks(chunks) => self.inbox.extend(chunks),
            MockReply::Silence => {}
            MockReply::Close => self.closed = true,
            MockReply::ReadError(kind) => self.read_error = Some(kind),
            MockReply::WriteError(kind) => return Err(kind.into()),
        }
        Ok(())
    }
}

fn request_target(request: &str) -> String {
    request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or_default()
        .to_string()
}

impl Read for MockConnection {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let Some(kind) = self.read_error.take() {
            return Err(kind.into());
        }
        let Some(mut chunk) = self.inbox.pop_front() else {
            if self.closed {
                return Ok(0);
            }
            return Err(ErrorKind::WouldBlock.into());
        };
        if chunk.len() > buf.len() {
            let rest = chunk.split_off(buf.len());
            self.inbox.push_front(rest);
        }
        buf[..chunk.len()].copy_from_slice(&chunk);
        Ok(chunk.len())
    }
}

impl Write for MockConnection {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.outgoing.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.dispatch()
    }
}

impl Connection for MockConnection {
    fn set_idle_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        self.idle_timeout = timeout;
        Ok(())
    }
}
