// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The listening worker.

use crate::registry::SharedService;
use crate::session::serve_session;
use crate::{AccessPolicy, AlgorithmService, ServerError, ServiceRegistry};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use wire_protocol::SERVICE_NAME;

/// A bound worker, ready to [`serve`](WorkerServer::serve).
#[derive(Debug)]
pub struct WorkerServer {
    listener: TcpListener,
    registry: ServiceRegistry,
    policy: Arc<AccessPolicy>,
}

impl WorkerServer {
    /// Warms up a fresh [`AlgorithmService`] with `warmup_dim × warmup_dim`
    /// operands, then binds `address` and registers it.
    pub async fn launch(address: &str, warmup_dim: usize) -> Result<Self, ServerError> {
        let service = AlgorithmService::new();
        let took = service.warm_up(warmup_dim).await?;
        tracing::info!(
            "warm-up with {warmup_dim}x{warmup_dim} operands took {:.2}ms",
            took.as_secs_f64() * 1000.0
        );
        Self::bind_with(address, Arc::new(service)).await
    }

    /// Binds `address` with an unwarmed [`AlgorithmService`].
    pub async fn bind(address: &str) -> Result<Self, ServerError> {
        Self::bind_with(address, Arc::new(AlgorithmService::new())).await
    }

    /// Binds `address` and registers `service` under [`SERVICE_NAME`],
    /// replacing any earlier binding.
    pub async fn bind_with(address: &str, service: SharedService) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(address)
            .await
            .map_err(|source| ServerError::Bind {
                address: address.to_string(),
                source,
            })?;
        let registry = ServiceRegistry::new();
        registry.rebind(SERVICE_NAME, service).await;
        tracing::info!("worker listening on {}", listener.local_addr()?);
        Ok(Self {
            listener,
            registry,
            policy: Arc::new(AccessPolicy::default()),
        })
    }

    /// Restricts which peers may connect.
    pub fn with_policy(mut self, policy: AccessPolicy) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    /// Accepts connections forever.
    pub async fn serve(self) -> Result<(), ServerError> {
        self.serve_until(std::future::pending()).await
    }

    /// Accepts connections until `shutdown` completes. Sessions already
    /// running are left to finish on their own.
    pub async fn serve_until(self, shutdown: impl Future<Output = ()>) -> Result<(), ServerError> {
        tokio::pin!(shutdown);
        loop {
            let (mut stream, peer) = tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("worker shutting down");
                    return Ok(());
                }
                accepted = self.listener.accept() => match accepted {
                    Ok(pair) => pair,
                    Err(e) => {
                        tracing::warn!("accept failed: {e}");
                        continue;
                    }
                },
            };

            if !self.policy.permits(peer.ip()) {
                tracing::warn!("refused connection from {peer}");
                continue;
            }
            if let Err(e) = stream.set_nodelay(true) {
                tracing::debug!("cannot disable Nagle for {peer}: {e}");
            }

            let registry = self.registry.clone();
            tokio::spawn(async move {
                tracing::debug!("session opened by {peer}");
                match serve_session(&mut stream, &registry).await {
                    Ok(()) => tracing::debug!("session with {peer} closed"),
                    Err(source) => tracing::warn!("{}", ServerError::Session { peer, source }),
                }
            });
        }
    }
}
