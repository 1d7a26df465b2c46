// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Client-side handle to a remote algorithm service.

use crate::{read_frame, write_frame, ProtocolError, RequestRef, Response};
use compute_kernel::{Matrix, MatrixView};
use std::time::Duration;
use tokio::net::TcpStream;

/// A connection to a worker on which a named service has been looked up.
///
/// Calls are strictly request/response; one stub carries one call at a time.
#[derive(Debug)]
pub struct ServiceStub {
    address: String,
    service: String,
    stream: TcpStream,
}

impl ServiceStub {
    /// Connects to `address` and resolves `service` in the worker's registry.
    ///
    /// # Errors
    /// - [`ProtocolError::Connect`] / [`ProtocolError::ConnectTimeout`] if the
    ///   worker is unreachable.
    /// - [`ProtocolError::NotBound`] if the worker has no such service.
    pub async fn lookup(
        address: &str,
        service: &str,
        connect_timeout: Option<Duration>,
    ) -> Result<Self, ProtocolError> {
        let connect = TcpStream::connect(address);
        let stream = match connect_timeout {
            Some(limit) => tokio::time::timeout(limit, connect).await.map_err(|_| {
                ProtocolError::ConnectTimeout {
                    address: address.to_string(),
                    timeout_ms: limit.as_millis() as u64,
                }
            })?,
            None => connect.await,
        }
        .map_err(|source| ProtocolError::Connect {
            address: address.to_string(),
            source,
        })?;
        stream.set_nodelay(true)?;

        let mut stub = Self {
            address: address.to_string(),
            service: service.to_string(),
            stream,
        };

        match stub.call(&RequestRef::Lookup { service }).await? {
            Response::Bound => {
                tracing::debug!("looked up '{service}' at {address}");
                Ok(stub)
            }
            Response::NotBound { service } => Err(ProtocolError::NotBound {
                address: address.to_string(),
                service,
            }),
            other => Err(unexpected("bound", &other)),
        }
    }

    /// Remote `pi(samples, threads)`.
    pub async fn pi(&mut self, samples: u64, threads: usize) -> Result<f64, ProtocolError> {
        match self.call(&RequestRef::Pi { samples, threads }).await? {
            Response::Pi(value) => Ok(value),
            other => Err(unexpected("pi", &other)),
        }
    }

    /// Remote `multiply(threads, A, Bᵀ)`.
    pub async fn multiply<'a>(
        &mut self,
        threads: usize,
        a: MatrixView<'a>,
        b_transpose: MatrixView<'a>,
    ) -> Result<Matrix, ProtocolError> {
        let request = RequestRef::Multiply {
            threads,
            a,
            b_transpose,
        };
        match self.call(&request).await? {
            Response::Matrix(c) => Ok(c),
            other => Err(unexpected("matrix", &other)),
        }
    }

    /// The `host:port` this stub is connected to.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The service name this stub was resolved under.
    pub fn service(&self) -> &str {
        &self.service
    }

    async fn call(&mut self, request: &RequestRef<'_>) -> Result<Response, ProtocolError> {
        tracing::trace!("{} -> {}", request.method(), self.address);
        write_frame(&mut self.stream, request).await?;
        match read_frame(&mut self.stream).await? {
            Some(Response::Error { message }) => Err(ProtocolError::Remote { message }),
            Some(response) => Ok(response),
            None => Err(ProtocolError::ConnectionClosed),
        }
    }
}

fn unexpected(expected: &'static str, got: &Response) -> ProtocolError {
    ProtocolError::UnexpectedResponse {
        expected,
        got: got.kind().to_string(),
    }
}
