//! Socket seam and its WebSocket implementation.
//!
//! `connect` runs on the event thread, so every blocking step is bounded by
//! the transport's timeout: the TCP connect, then the HTTP upgrade with read
//! and write timeouts on the stream. Once the upgrade completes the timeouts
//! are cleared and the stream is switched to non-blocking so the event loop
//! can poll for inbound frames without stalling keystroke handling.

use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tungstenite::client::IntoClientRequest;
use tungstenite::error::UrlError;
use tungstenite::handshake::HandshakeError;
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket};

use crate::error::LinkError;

/// Bound on the TCP connect and on each handshake read/write
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(3000);

/// Something read from an open connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incoming {
    Text(String),
    /// The peer closed the connection
    Closed,
}

/// An open connection to the host
pub trait Connection {
    fn send_text(&mut self, text: &str) -> Result<(), LinkError>;

    /// Next inbound frame, or `Ok(None)` when nothing is waiting
    fn poll_incoming(&mut self) -> Result<Option<Incoming>, LinkError>;

    fn close(&mut self);
}

/// Opens connections
pub trait Transport {
    type Connection: Connection;

    fn connect(&mut self, url: &str) -> Result<Self::Connection, LinkError>;
}

/// WebSocket transport backed by tungstenite
#[derive(Debug, Clone, Copy)]
pub struct WsTransport {
    timeout: Duration,
}

impl WsTransport {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for WsTransport {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECT_TIMEOUT)
    }
}

impl Transport for WsTransport {
    type Connection = WsConnection;

    fn connect(&mut self, url: &str) -> Result<WsConnection, LinkError> {
        let request = url.into_client_request().map_err(LinkError::Connect)?;
        let uri = request.uri();
        let host = uri
            .host()
            .ok_or_else(|| LinkError::Connect(tungstenite::Error::Url(UrlError::NoHostName)))?
            .trim_start_matches('[')
            .trim_end_matches(']')
            .to_string();
        let default_port = if uri.scheme_str() == Some("wss") { 443 } else { 80 };
        let port = uri.port_u16().unwrap_or(default_port);

        let stream = connect_tcp(&host, port, self.timeout)?;
        stream.set_read_timeout(Some(self.timeout)).map_err(io_error)?;
        stream.set_write_timeout(Some(self.timeout)).map_err(io_error)?;

        let (socket, _response) = match tungstenite::client_tls(request, stream) {
            Ok(upgraded) => upgraded,
            Err(HandshakeError::Failure(err)) => return Err(LinkError::Connect(err)),
            // The read timeout fired mid-handshake
            Err(HandshakeError::Interrupted(_)) => {
                return Err(io_error(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("handshake timed out after {}ms", self.timeout.as_millis()),
                )))
            }
        };

        match socket.get_ref() {
            MaybeTlsStream::Plain(stream) => {
                stream.set_read_timeout(None).map_err(io_error)?;
                stream.set_write_timeout(None).map_err(io_error)?;
                stream.set_nonblocking(true).map_err(io_error)?;
            }
            _ => log::warn!("event=link_nonblocking status=skipped reason=tls_stream"),
        }

        Ok(WsConnection { socket })
    }
}

/// Try each resolved address in turn, each bounded by `timeout`
fn connect_tcp(host: &str, port: u16, timeout: Duration) -> Result<TcpStream, LinkError> {
    let addrs: Vec<SocketAddr> = (host, port).to_socket_addrs().map_err(io_error)?.collect();

    let mut last_err = io::Error::new(
        io::ErrorKind::NotFound,
        format!("no address found for {host}:{port}"),
    );
    for addr in addrs {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(err) => last_err = err,
        }
    }
    Err(io_error(last_err))
}

fn io_error(err: io::Error) -> LinkError {
    LinkError::Connect(tungstenite::Error::Io(err))
}

fn would_block(err: &tungstenite::Error) -> bool {
    matches!(err, tungstenite::Error::Io(io) if io.kind() == io::ErrorKind::WouldBlock)
}

/// Open WebSocket connection
pub struct WsConnection {
    socket: WebSocket<MaybeTlsStream<TcpStream>>,
}

impl Connection for WsConnection {
    fn send_text(&mut self, text: &str) -> Result<(), LinkError> {
        match self.socket.send(Message::text(text)) {
            Ok(()) => Ok(()),
            // Frame is queued; it goes out on the next write or flush
            Err(err) if would_block(&err) => Ok(()),
            Err(err) => Err(LinkError::Send(err)),
        }
    }

    fn poll_incoming(&mut self) -> Result<Option<Incoming>, LinkError> {
        // Push out frames a previous send left queued
        match self.socket.flush() {
            Ok(()) => {}
            Err(err) if would_block(&err) => {}
            Err(tungstenite::Error::ConnectionClosed) | Err(tungstenite::Error::AlreadyClosed) => {
                return Ok(Some(Incoming::Closed))
            }
            Err(err) => return Err(LinkError::Send(err)),
        }

        loop {
            match self.socket.read() {
                Ok(Message::Text(text)) => return Ok(Some(Incoming::Text(text.to_string()))),
                Ok(Message::Binary(bytes)) => {
                    let text = String::from_utf8_lossy(&bytes).into_owned();
                    return Ok(Some(Incoming::Text(text)));
                }
                Ok(Message::Close(_)) => return Ok(Some(Incoming::Closed)),
                // Pings are answered by tungstenite on the next write
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) | Ok(Message::Frame(_)) => continue,
                Err(err) if would_block(&err) => return Ok(None),
                Err(tungstenite::Error::ConnectionClosed) | Err(tungstenite::Error::AlreadyClosed) => {
                    return Ok(Some(Incoming::Closed))
                }
                Err(err) => return Err(LinkError::Receive(err)),
            }
        }
    }

    fn close(&mut self) {
        let _ = self.socket.close(None);
        let _ = self.socket.flush();
    }
}
