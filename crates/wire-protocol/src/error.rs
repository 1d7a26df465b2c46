// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the wire protocol.

/// Errors raised while talking to a remote service.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The TCP connection could not be established.
    #[error("cannot connect to '{address}': {source}")]
    Connect {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// The TCP connection was not established within the configured timeout.
    #[error("connection to '{address}' timed out after {timeout_ms} ms")]
    ConnectTimeout { address: String, timeout_ms: u64 },

    /// The remote registry has no entry under the requested name.
    #[error("service '{service}' is not bound at '{address}'")]
    NotBound { address: String, service: String },

    /// The remote side reported a failure while executing the call.
    #[error("remote error: {message}")]
    Remote { message: String },

    /// The peer answered with a message that does not fit the request.
    #[error("unexpected response: expected {expected}, got {got}")]
    UnexpectedResponse { expected: &'static str, got: String },

    /// The peer closed the connection before answering.
    #[error("connection closed by peer")]
    ConnectionClosed,

    /// A frame announced or carried more bytes than allowed.
    #[error("frame of {len} bytes exceeds the {max} byte limit")]
    FrameTooLarge { len: usize, max: usize },

    /// Socket I/O failed mid-call.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A message could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] bincode::Error),
}
