// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Frame transport underneath the RPC client

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    connect_async_tls_with_config, tungstenite::Message, Connector, MaybeTlsStream,
    WebSocketStream,
};
use tracing::{debug, warn};

use super::errors::RpcError;

/// Certificate handling for `wss://` endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsMode {
    /// Validate the server certificate against the system trust store
    #[default]
    Verify,
    /// Accept any server certificate and host name
    AcceptInvalidCerts,
}

/// Moves whole text frames to and from the middleware
///
/// Implementations deliver frames in order and never interleave two
/// conversations.
#[async_trait]
pub trait Transport: Send {
    /// Write one text frame
    async fn send_text(&mut self, text: String) -> Result<(), RpcError>;

    /// Read the next text frame, skipping control and binary frames
    async fn recv_text(&mut self) -> Result<String, RpcError>;
}

/// WebSocket transport backed by tokio-tungstenite
pub struct WsTransport {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsTransport {
    /// Open a WebSocket connection to `url` (`ws://` or `wss://`)
    pub async fn connect(url: &str, tls: TlsMode) -> Result<Self, RpcError> {
        let connector = match tls {
            TlsMode::Verify => None,
            TlsMode::AcceptInvalidCerts => {
                warn!("TLS certificate validation is disabled for {}", url);
                let connector = native_tls::TlsConnector::builder()
                    .danger_accept_invalid_certs(true)
                    .danger_accept_invalid_hostnames(true)
                    .build()
                    .map_err(|e| RpcError::Tls(e.to_string()))?;
                Some(Connector::NativeTls(connector))
            }
        };

        let (stream, response) = connect_async_tls_with_config(url, None, false, connector)
            .await
            .map_err(|e| RpcError::Connect {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        debug!(status = %response.status(), "WebSocket handshake complete");
        Ok(Self { stream })
    }

    /// Send a close frame; errors are ignored since the process is exiting
    pub async fn close(mut self) {
        if let Err(e) = self.stream.close(None).await {
            debug!("Close handshake failed: {}", e);
        }
    }
}

#[async_trait]
impl Transport for WsTransport {
    async fn send_text(&mut self, text: String) -> Result<(), RpcError> {
        self.stream
            .send(Message::Text(text))
            .await
            .map_err(|e| RpcError::Send(e.to_string()))
    }

    async fn recv_text(&mut self) -> Result<String, RpcError> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return Ok(text),
                Some(Ok(Message::Binary(bytes))) => {
                    debug!(len = bytes.len(), "Skipping binary frame");
                    continue;
                }
                Some(Ok(Message::Close(frame))) => {
                    debug!(?frame, "Server sent close frame");
                    return Err(RpcError::Closed);
                }
                // Pings are answered by tungstenite on the next read/write
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(RpcError::Receive(e.to_string())),
                None => return Err(RpcError::Closed),
            }
        }
    }
}
