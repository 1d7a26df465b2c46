// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the worker.

use std::net::SocketAddr;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The listening socket could not be bound.
    #[error("cannot bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A connection broke the framing or codec rules.
    #[error("session with {peer} failed: {source}")]
    Session {
        peer: SocketAddr,
        #[source]
        source: wire_protocol::ProtocolError,
    },

    /// The warm-up job failed.
    #[error("warm-up failed: {0}")]
    Engine(#[from] cluster_engine::EngineError),
}
