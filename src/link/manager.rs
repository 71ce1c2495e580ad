//! Link manager: drives the state machine from socket events and timers.

use std::time::{Duration, Instant};

use serde::Serialize;

use super::state::{CloseOutcome, LinkState, LinkStatus, ReconnectPolicy};
use super::transport::{Connection, Incoming, Transport};
use crate::observer::{epoch_millis, DebugLog, StatusObserver};
use crate::protocol::{describe_inbound, OutboundMessage};

/// Upper bound on inbound frames handled per poll
const MAX_FRAMES_PER_POLL: usize = 64;

/// A scheduled automatic reconnect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRetry {
    pub attempt: u32,
    pub delay: Duration,
    pub due: Instant,
}

/// Owns the connection to the host and its reconnect policy
pub struct LinkManager<T: Transport> {
    transport: T,
    url: String,
    state: LinkState,
    connection: Option<T::Connection>,
    /// At most one retry is pending; scheduling replaces it
    pending: Option<PendingRetry>,
    log: DebugLog,
    status: Box<dyn StatusObserver>,
}

impl<T: Transport> LinkManager<T> {
    /// Create an idle manager. Nothing is opened until `connect`.
    pub fn new(
        transport: T,
        url: impl Into<String>,
        policy: ReconnectPolicy,
        log: DebugLog,
        status: Box<dyn StatusObserver>,
    ) -> Self {
        Self {
            transport,
            url: url.into(),
            state: LinkState::new(policy),
            connection: None,
            pending: None,
            log,
            status,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> LinkStatus {
        self.state.status()
    }

    pub fn attempts(&self) -> u32 {
        self.state.attempts()
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open() && self.connection.is_some()
    }

    pub fn pending_retry(&self) -> Option<PendingRetry> {
        self.pending
    }

    /// Initial connection: reset the counter and connect now
    pub fn connect(&mut self, now: Instant) {
        self.state.on_connect_requested();
        self.open(now);
    }

    /// Manual reconnect: drop whatever is live or pending and start over
    pub fn reconnect(&mut self, now: Instant) {
        self.log.append("Manual reconnect requested");
        if let Some(mut connection) = self.connection.take() {
            connection.close();
        }
        self.state.on_connect_requested();
        self.open(now);
    }

    /// Fire a due retry and drain inbound frames
    pub fn poll(&mut self, now: Instant) {
        if let Some(pending) = self.pending {
            if now >= pending.due {
                self.pending = None;
                self.state.on_retry_due();
                self.log.append(format!(
                    "Reconnect attempt {}/{} starting",
                    pending.attempt,
                    self.state.policy().max_attempts
                ));
                self.open(now);
            }
        }

        for _ in 0..MAX_FRAMES_PER_POLL {
            let Some(connection) = self.connection.as_mut() else {
                return;
            };
            match connection.poll_incoming() {
                Ok(None) => return,
                Ok(Some(Incoming::Text(text))) => {
                    self.log
                        .append(format!("Received from host: {}", describe_inbound(&text)));
                }
                Ok(Some(Incoming::Closed)) => {
                    self.handle_close(now);
                    return;
                }
                Err(err) => {
                    self.handle_error(&err.to_string());
                    self.handle_close(now);
                    return;
                }
            }
        }
    }

    /// Serialize and transmit `payload`. Returns false without transmitting
    /// unless the link is open.
    pub fn send<P: Serialize>(&mut self, payload: &P) -> bool {
        let connection = match self.connection.as_mut() {
            Some(connection) if self.state.is_open() => connection,
            _ => {
                self.log.append("Not connected - send failed");
                return false;
            }
        };

        let json = match serde_json::to_string(payload) {
            Ok(json) => json,
            Err(err) => {
                self.log.append(format!("Send failed: {err}"));
                return false;
            }
        };

        match connection.send_text(&json) {
            Ok(()) => {
                self.log.append(format!("Sent to host: {json}"));
                true
            }
            Err(err) => {
                log::warn!("event=link_send status=error error={}", err);
                self.log.append(format!("Send failed: {err}"));
                false
            }
        }
    }

    /// Close the socket for good; no retry is scheduled
    pub fn shutdown(&mut self) {
        self.pending = None;
        if let Some(mut connection) = self.connection.take() {
            connection.close();
            self.log.append("Connection closed");
        }
        self.state.on_shutdown();
    }

    fn open(&mut self, now: Instant) {
        // A new attempt supersedes any pending retry
        self.pending = None;

        log::debug!(
            "event=link_connect url={} attempt={}",
            self.url,
            self.state.attempts()
        );
        match self.transport.connect(&self.url) {
            Ok(connection) => {
                self.connection = Some(connection);
                self.handle_open();
            }
            Err(err) => {
                log::warn!("event=link_connect status=error error={}", err);
                self.handle_error(&err.to_string());
                self.handle_close(now);
            }
        }
    }

    fn handle_open(&mut self) {
        self.state.on_open();
        self.status.connection_changed(true, "Host connected");
        self.log.append("Connected to host");

        let announcement = OutboundMessage::connection(epoch_millis());
        self.send(&announcement);
    }

    fn handle_error(&mut self, detail: &str) {
        self.state.on_error();
        self.status.connection_changed(false, "Socket error");
        self.log.append(format!("Socket error: {detail}"));
    }

    fn handle_close(&mut self, now: Instant) {
        if let Some(mut connection) = self.connection.take() {
            connection.close();
        }
        self.status.connection_changed(false, "Host disconnected");
        self.log.append("Host disconnected");

        match self.state.on_close() {
            CloseOutcome::Retry { attempt, delay } => {
                self.log.append(format!(
                    "Reconnect attempt {attempt}/{} in {}ms",
                    self.state.policy().max_attempts,
                    delay.as_millis()
                ));
                self.pending = Some(PendingRetry {
                    attempt,
                    delay,
                    due: now + delay,
                });
            }
            CloseOutcome::Exhausted => {
                self.log.append("Maximum reconnect attempts exceeded");
                self.status
                    .connection_changed(false, "Reconnect failed - manual reconnect required");
            }
        }
    }
}
