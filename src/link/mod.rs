//! Link to the visualization host.
//!
//! Split by concern:
//!
//! | Module      | Responsibility                                        |
//! |-------------|-------------------------------------------------------|
//! | `state`     | Pure connection state machine and reconnect backoff   |
//! | `transport` | Connect/send/receive seam and its WebSocket backend   |
//! | `manager`   | Owns the socket, the retry timer and the collaborators |
//!
//! Time is passed in as `Instant` arguments rather than read inside the
//! state machine, so retries can be driven deterministically in tests.

mod manager;
mod state;
mod transport;

pub use manager::{LinkManager, PendingRetry};
pub use state::{CloseOutcome, LinkState, LinkStatus, ReconnectPolicy};
pub use transport::{
    Connection, Incoming, Transport, WsConnection, WsTransport, DEFAULT_CONNECT_TIMEOUT,
};
