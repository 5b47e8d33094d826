// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the Labox client.
//!
//! Transport failures never reach the host: the channels recover from them
//! on their own. [`Error`] is what the public API can still return.
//! [`ParseError`] is reported by [`Codec::try_decode`](crate::protocol::Codec::try_decode)
//! only; the client itself turns a bad frame into a no-op.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred on a transport channel.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// TLS credentials could not be loaded.
    #[error("TLS configuration error: {0}")]
    Tls(String),

    /// The command channel is not open, so the frame was dropped.
    #[error("command channel is not connected")]
    NotConnected,

    /// The client has been shut down.
    #[error("client has been shut down")]
    ShutDown,

    /// Client configuration is invalid.
    #[error("invalid client configuration: {0}")]
    InvalidConfiguration(String),
}

/// Errors related to the WebSocket transport.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// WebSocket handshake or I/O failed.
    #[cfg(feature = "tls")]
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Connection to the device failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Invalid device address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// A frame could not be written to the connection.
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Errors related to parsing device frames.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the frame.
    #[error("missing field in frame: {0}")]
    MissingField(String),

    /// Failed to parse a specific value.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display() {
        let err = ParseError::MissingField("Data".to_string());
        assert_eq!(err.to_string(), "missing field in frame: Data");
    }

    #[test]
    fn invalid_value_display() {
        let err = ParseError::InvalidValue {
            field: "CurrentLevel".to_string(),
            message: "not a number".to_string(),
        };
        assert_eq!(err.to_string(), "failed to parse CurrentLevel: not a number");
    }

    #[test]
    fn error_from_protocol_error() {
        let err: Error = ProtocolError::InvalidAddress("".to_string()).into();
        assert!(matches!(err, Error::Protocol(ProtocolError::InvalidAddress(_))));
    }

    #[test]
    fn invalid_configuration_display() {
        let err = Error::InvalidConfiguration("reconnect delay must not be zero".to_string());
        assert_eq!(
            err.to_string(),
            "invalid client configuration: reconnect delay must not be zero"
        );
    }

    #[test]
    fn not_connected_display() {
        assert_eq!(
            Error::NotConnected.to_string(),
            "command channel is not connected"
        );
    }
}
