//! Request/response exchange over a raw byte stream.
//!
//! No HTTP library is involved: requests are written as text lines and the
//! end of a response is detected by the peer going quiet for the configured
//! idle timeout. Responses are then split and length-checked by [`decode`].

mod connection;
mod request;
mod response;
mod transport;

// Scripted in-memory peer for testing (always available for unit and integration tests)
#[doc(hidden)]
pub mod mock;

pub use connection::{Connection, is_idle_timeout};
pub use request::Request;
pub use response::{Headers, ParsedResponse, decode};
pub use transport::Transport;

#[doc(hidden)]
pub use mock::{MockConnection, MockReply};
