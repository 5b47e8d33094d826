// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! WebSocket-over-TLS transport.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async_tls_with_config};

use super::{Connection, Connector, Endpoint, Frame, SUBPROTOCOL, TlsConfig};
use crate::error::{Error, ProtocolError};

/// Opens `wss://` connections using native TLS.
///
/// # Examples
///
/// ```no_run
/// use labox_lib::protocol::{TlsConfig, WsConnector};
///
/// let connector = WsConnector::new(&TlsConfig::default())?;
/// # Ok::<(), labox_lib::Error>(())
/// ```
#[derive(Clone)]
pub struct WsConnector {
    tls: native_tls::TlsConnector,
}

impl WsConnector {
    /// Creates a connector from TLS settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Tls`] if the credentials are invalid.
    pub fn new(config: &TlsConfig) -> Result<Self, Error> {
        Ok(Self {
            tls: config.build_connector()?,
        })
    }
}

impl std::fmt::Debug for WsConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsConnector").finish_non_exhaustive()
    }
}

impl Connector for WsConnector {
    type Connection = WsConnection;

    async fn connect(&self, endpoint: &Endpoint) -> Result<WsConnection, ProtocolError> {
        let mut request = endpoint.url().into_client_request()?;
        request.headers_mut().insert(
            "Sec-WebSocket-Protocol",
            HeaderValue::from_static(SUBPROTOCOL),
        );

        let (stream, _response) = connect_async_tls_with_config(
            request,
            None,
            false,
            Some(tokio_tungstenite::Connector::NativeTls(self.tls.clone())),
        )
        .await?;

        Ok(WsConnection { stream })
    }
}

/// An open WebSocket connection to the box.
pub struct WsConnection {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl std::fmt::Debug for WsConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsConnection").finish_non_exhaustive()
    }
}

impl Connection for WsConnection {
    async fn send(&mut self, frame: Frame) -> Result<(), ProtocolError> {
        let message = match frame {
            Frame::Text(text) => Message::Text(text),
            Frame::Binary(data) => Message::Binary(data),
            Frame::Ping(payload) => Message::Ping(payload),
            // tungstenite queues the pong when it reads the ping; flushing sends it
            Frame::Pong(_) => return self.stream.flush().await.map_err(Into::into),
            Frame::Close => Message::Close(None),
        };
        self.stream.send(message).await.map_err(Into::into)
    }

    async fn recv(&mut self) -> Option<Result<Frame, ProtocolError>> {
        let message = self.stream.next().await?;
        Some(message.map(into_frame).map_err(Into::into))
    }

    async fn close(&mut self) {
        let _ = self.stream.close(None).await;
    }
}

fn into_frame(message: Message) -> Frame {
    match message {
        Message::Text(text) => Frame::Text(text),
        Message::Binary(data) => Frame::Binary(data),
        Message::Ping(payload) => Frame::Ping(payload),
        Message::Pong(payload) => Frame::Pong(payload),
        Message::Close(_) => Frame::Close,
        Message::Frame(frame) => Frame::Binary(frame.payload().to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_conversion() {
        assert_eq!(
            into_frame(Message::Text("{}".to_string())),
            Frame::Text("{}".to_string())
        );
        assert_eq!(into_frame(Message::Ping(vec![9])), Frame::Ping(vec![9]));
        assert_eq!(into_frame(Message::Close(None)), Frame::Close);
    }

    #[tokio::test]
    async fn connection_refused_is_an_error() {
        let connector = WsConnector::new(&TlsConfig::default()).unwrap();
        let endpoint = Endpoint::new("127.0.0.1", 1, crate::protocol::ChannelRole::Command);
        assert!(connector.connect(&endpoint).await.is_err());
    }
}
