use std::borrow::Cow;

use memchr::memmem;
use serde::de::DeserializeOwned;

use crate::error::{FramingError, Result};

const HEADER_DELIMITER: &[u8] = b"\r\n\r\n";
const LINE_DELIMITER: &str = "\r\n";
const HEADER_SEPARATOR: &str = ": ";

/// Response headers in arrival order with case-insensitive lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// First value whose name matches `name`, ignoring ASCII case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A response whose body length has been checked against `Content-Length`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    pub status: String,
    pub headers: Headers,
    pub body: Vec<u8>,
}

impl ParsedResponse {
    /// Numeric code from the status line (`HTTP/1.1 200 OK` → 200)
    pub fn status_code(&self) -> Option<u16> {
        self.status.split_whitespace().nth(1)?.parse().ok()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Split a raw response buffer into status line, headers and body.
///
/// The body is the byte slice following the first blank line. When a
/// `Content-Length` header is present its value must equal that slice's
/// length in bytes; otherwise the buffer is rejected so the caller can retry
/// instead of using a truncated or over-read body.
pub fn decode(raw: &[u8]) -> std::result::Result<ParsedResponse, FramingError> {
    let split = memmem::find(raw, HEADER_DELIMITER).ok_or(FramingError::MissingDelimiter)?;
    let head = String::from_utf8_lossy(&raw[..split]);
    let body = &raw[split + HEADER_DELIMITER.len()..];

    let mut lines = head.split(LINE_DELIMITER);
    let status = lines.next().unwrap_or_default().to_string();

    let mut headers = Headers::new();
    for line in lines {
        let (name, value) = line
            .split_once(HEADER_SEPARATOR)
            .ok_or_else(|| FramingError::MalformedHeader(line.to_string()))?;
        headers.insert(name, value);
    }

    if let Some(value) = headers.get("content-length") {
        let expected: usize = value
            .trim()
            .parse()
            .map_err(|_| FramingError::InvalidContentLength(value.to_string()))?;
        if expected != body.len() {
            return Err(FramingError::LengthMismatch {
                expected,
                actual: body.len(),
            });
        }
    }

    Ok(ParsedResponse {
        status,
        headers,
        body: body.to_vec(),
    })
}
