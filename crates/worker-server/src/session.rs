// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! One client connection: `Lookup`, then any number of calls.

use crate::registry::SharedService;
use crate::ServiceRegistry;
use tokio::io::{AsyncRead, AsyncWrite};
use wire_protocol::{read_frame, write_frame, ProtocolError, Request, Response};

/// Serves requests on `stream` until the peer closes it.
///
/// Service failures are answered with [`Response::Error`] and the session
/// continues; framing or codec failures end it.
pub(crate) async fn serve_session<S>(stream: &mut S, registry: &ServiceRegistry) -> Result<(), ProtocolError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut bound: Option<SharedService> = None;

    while let Some(request) = read_frame::<_, Request>(stream).await? {
        let response = match request {
            Request::Lookup { service } => match registry.lookup(&service).await {
                Some(found) => {
                    bound = Some(found);
                    Response::Bound
                }
                None => {
                    tracing::warn!("lookup of unbound service '{service}'");
                    Response::NotBound { service }
                }
            },
            Request::Pi { samples, threads } => match &bound {
                Some(service) => match service.pi(samples, threads).await {
                    Ok(value) => Response::Pi(value),
                    Err(e) => failure("pi", e),
                },
                None => not_looked_up(),
            },
            Request::Multiply {
                threads,
                a,
                b_transpose,
            } => match &bound {
                Some(service) => match service.multiply(threads, a, b_transpose).await {
                    Ok(c) => Response::Matrix(c),
                    Err(e) => failure("multiply", e),
                },
                None => not_looked_up(),
            },
        };
        write_frame(stream, &response).await?;
    }
    Ok(())
}

fn failure(method: &str, err: cluster_engine::EngineError) -> Response {
    tracing::warn!("{method} failed: {err}");
    Response::Error {
        message: err.to_string(),
    }
}

fn not_looked_up() -> Response {
    Response::Error {
        message: "no service looked up on this connection".to_string(),
    }
}
