use std::io::ErrorKind;

use tracing::{debug, warn};

use crate::config::TransportConfig;
use crate::config::transport::READ_CHUNK_SIZE;
use crate::error::{Error, Result};
use crate::network::{Connection, ParsedResponse, Request, decode, is_idle_timeout};
use crate::retry::{FixedDelay, RetryStrategy};

/// Serializes request/response exchanges over one connection.
///
/// Exchanges are strictly one at a time: the end of a response is only known
/// once the peer has been quiet for the idle timeout, so interleaving two
/// exchanges would mix their bytes.
///
/// Once an exchange runs out of attempts on an I/O error the connection is
/// considered lost and every later exchange fails with
/// [`Error::ConnectionLost`] without touching it.
pub struct Transport<C: Connection> {
    connection: C,
    config: TransportConfig,
    broken: bool,
}

impl<C: Connection> Transport<C> {
    pub fn new(connection: C, config: TransportConfig) -> Self {
        Self {
            connection,
            config,
            broken: false,
        }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// Whether an earlier exchange lost the connection.
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    /// Send `request` and return its decoded response.
    ///
    /// A timed-out empty read, a framing error or an I/O error each consume
    /// one attempt, after which the identical request is sent again. Once the
    /// budget is spent the last error is returned inside
    /// [`Error::RetriesExhausted`]; if that last error was an I/O error the
    /// transport is marked broken.
    pub fn exchange(&mut self, request: &Request) -> Result<ParsedResponse> {
        if self.broken {
            return Err(Error::ConnectionLost);
        }

        let payload = request.to_bytes();
        let max_attempts = self.config.max_attempts.max(1);
        let strategy = FixedDelay::new(max_attempts, self.config.retry_delay());

        strategy
            .execute(|attempt| {
                let result = self.exchange_once(&payload);
                match &result {
                    Ok(response) => debug!(
                        "{} -> {} ({} bytes, attempt {}/{})",
                        request,
                        response.status,
                        response.body.len(),
                        attempt + 1,
                        max_attempts
                    ),
                    Err(e) => warn!(
                        "{} failed (attempt {}/{}): {}",
                        request,
                        attempt + 1,
                        max_attempts,
                        e
                    ),
                }
                result
            })
            .map_err(|e| {
                if matches!(e, Error::Io(_)) {
                    warn!("Connection lost after {}: {}", request, e);
                    self.broken = true;
                }
                Error::RetriesExhausted {
                    attempts: max_attempts,
                    last_error: Box::new(e),
                }
            })
    }

    fn exchange_once(&mut self, payload: &[u8]) -> Result<ParsedResponse> {
        self.connection.write_all(payload)?;
        self.connection.flush()?;

        let raw = self.read_until_idle()?;
        if raw.is_empty() {
            return Err(Error::EmptyResponse);
        }
        Ok(decode(&raw)?)
    }

    /// Read until the peer is quiet for one idle timeout or closes the stream.
    fn read_until_idle(&mut self) -> Result<Vec<u8>> {
        self.connection
            .set_idle_timeout(Some(self.config.idle_timeout()))?;

        let mut raw = Vec::new();
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        loop {
            match self.connection.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => raw.extend_from_slice(&chunk[..n]),
                Err(e) if is_idle_timeout(&e) => break,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FramingError;
    use crate::network::{MockConnection, MockReply};
    use std::time::Duration;

    fn transport(conn: MockConnection) -> Transport<MockConnection> {
        Transport::new(conn, TransportConfig::default())
    }

    fn request() -> Request {
        Request::get("localhost", "/api/game/1")
    }

    #[test]
    fn test_exchange_success() {
        let mut transport = transport(MockConnection::scripted(vec![MockReply::ok(r#"{"id":1}"#)]));

        let response = transport.exchange(&request()).unwrap();
        assert_eq!(response.status_code(), Some(200));
        assert_eq!(response.body_text(), r#"{"id":1}"#);
        assert_eq!(transport.connection().request_count(), 1);
        assert_eq!(
            transport.connection().idle_timeout(),
            Some(Duration::from_millis(200))
        );
    }

    #[test]
    fn test_exchange_reassembles_fragments() {
        let body = r#"{"ranking":"sunk","limit":50,"start":0,"games":[1,2,3],"prev":null,"next":null}"#;
        let mut transport = transport(MockConnection::scripted(vec![MockReply::fragmented(body, 7)]));

        let response = transport.exchange(&request()).unwrap();
        assert_eq!(response.body, body.as_bytes().to_vec());
        assert_eq!(transport.connection().request_count(), 1);
    }

    #[test]
    fn test_silent_peer_exhausts_exactly_eight_attempts() {
        let mut transport = transport(MockConnection::silent());

        let err = transport.exchange(&request()).unwrap_err();
        match err {
            Error::RetriesExhausted {
                attempts,
                last_error,
            } => {
                assert_eq!(attempts, 8);
                assert!(matches!(*last_error, Error::EmptyResponse));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(transport.connection().request_count(), 8);
    }

    #[test]
    fn test_truncated_response_is_retried_with_same_payload() {
        let mut transport = transport(MockConnection::scripted(vec![
            MockReply::truncated(r#"{"id":1"#, 1),
            MockReply::Silence,
            MockReply::ok(r#"{"id":1}"#),
        ]));

        let response = transport.exchange(&request()).unwrap();
        assert_eq!(response.body_text(), r#"{"id":1}"#);

        let requests = transport.connection().requests();
        assert_eq!(requests.len(), 3);
        assert!(requests.iter().all(|r| r == &requests[0]));
    }

    #[test]
    fn test_io_errors_count_against_budget() {
        let config = TransportConfig {
            max_attempts: 3,
            ..Default::default()
        };
        let conn = MockConnection::scripted(vec![
            MockReply::ReadError(ErrorKind::ConnectionReset),
            MockReply::WriteError(ErrorKind::BrokenPipe),
            MockReply::ReadError(ErrorKind::ConnectionAborted),
        ]);
        let mut transport = Transport::new(conn, config);

        let err = transport.exchange(&request()).unwrap_err();
        match err {
            Error::RetriesExhausted {
                attempts,
                last_error,
            } => {
                assert_eq!(attempts, 3);
                assert!(matches!(*last_error, Error::Io(ref e) if e.kind() == ErrorKind::ConnectionAborted));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(transport.connection().request_count(), 3);
    }

    #[test]
    fn test_framing_error_reported_after_budget() {
        let config = TransportConfig {
            max_attempts: 2,
            ..Default::default()
        };
        let conn = MockConnection::with_handler(|_| MockReply::raw(b"HTTP/1.1 200 OK\r\nbroken"));
        let mut transport = Transport::new(conn, config);

        let err = transport.exchange(&request()).unwrap_err();
        assert!(matches!(
            err,
            Error::RetriesExhausted { last_error, .. }
                if matches!(*last_error, Error::Framing(FramingError::MissingDelimiter))
        ));
    }

    #[test]
    fn test_io_failure_marks_connection_lost() {
        let config = TransportConfig {
            max_attempts: 3,
            ..Default::default()
        };
        let mut replies = vec![MockReply::ReadError(ErrorKind::ConnectionReset)];
        replies.extend(std::iter::repeat_n(MockReply::WriteError(ErrorKind::BrokenPipe), 10));
        let mut transport = Transport::new(MockConnection::scripted(replies), config);

        assert!(matches!(
            transport.exchange(&request()),
            Err(Error::RetriesExhausted { .. })
        ));
        assert!(transport.is_broken());
        assert_eq!(transport.connection().request_count(), 3);

        // Later exchanges fail at once without writing
        for _ in 0..5 {
            assert!(matches!(
                transport.exchange(&request()),
                Err(Error::ConnectionLost)
            ));
        }
        assert_eq!(transport.connection().request_count(), 3);
    }

    #[test]
    fn test_io_error_then_success_keeps_connection() {
        let mut transport = transport(MockConnection::scripted(vec![
            MockReply::ReadError(ErrorKind::ConnectionReset),
            MockReply::ok(r#"{"id":1}"#),
            MockReply::ok(r#"{"id":2}"#),
        ]));

        assert!(transport.exchange(&request()).is_ok());
        assert!(!transport.is_broken());
        assert_eq!(transport.exchange(&request()).unwrap().body_text(), r#"{"id":2}"#);
    }

    #[test]
    fn test_silent_peer_does_not_mark_connection_lost() {
        let config = TransportConfig {
            max_attempts: 2,
            ..Default::default()
        };
        let mut transport = Transport::new(MockConnection::silent(), config);

        assert!(transport.exchange(&request()).is_err());
        assert!(!transport.is_broken());
        assert!(matches!(
            transport.exchange(&request()),
            Err(Error::RetriesExhausted { .. })
        ));
        assert_eq!(transport.connection().request_count(), 4);
    }

    #[test]
    fn test_closed_stream_ends_message() {
        let mut transport = transport(MockConnection::scripted(vec![MockReply::Close]));
        let config_attempts = transport.config().max_attempts;

        assert!(transport.exchange(&request()).is_err());
        assert_eq!(
            transport.connection().request_count(),
            config_attempts as usize
        );
    }
}
