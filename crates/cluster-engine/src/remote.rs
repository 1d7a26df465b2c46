// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Per-engine cache of looked-up service stubs.

use compute_kernel::{Matrix, MatrixView};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use wire_protocol::{ProtocolError, ServiceStub, SERVICE_NAME};

/// Address → idle stub map owned by one distributed engine.
///
/// A call checks its stub out of the map and returns it only after a clean
/// answer, so a call that fails or is aborted mid-frame never leaves a
/// desynchronised connection behind. Slots that target the same address
/// concurrently each get their own connection.
///
/// An idle stub may have been closed by its worker since the last job. When
/// a call on a cached stub fails at the transport level, the stub is dropped
/// and the call is sent once more over a fresh lookup. Both remote methods
/// are pure, so repeating one is safe.
#[derive(Debug, Clone, Default)]
pub(crate) struct StubCache {
    idle: Arc<Mutex<HashMap<String, ServiceStub>>>,
    connect_timeout: Option<Duration>,
}

impl StubCache {
    pub fn new(connect_timeout: Option<Duration>) -> Self {
        Self {
            idle: Arc::default(),
            connect_timeout,
        }
    }

    async fn take_idle(&self, address: &str) -> Option<ServiceStub> {
        self.idle.lock().await.remove(address)
    }

    async fn connect(&self, address: &str) -> Result<ServiceStub, ProtocolError> {
        ServiceStub::lookup(address, SERVICE_NAME, self.connect_timeout).await
    }

    async fn checkin(&self, stub: ServiceStub) {
        self.idle.lock().await.insert(stub.address().to_string(), stub);
    }

    /// Returns the stub unless the failure broke the connection.
    async fn settle<T>(&self, stub: ServiceStub, result: Result<T, ProtocolError>) -> Result<T, ProtocolError> {
        match &result {
            Ok(_) | Err(ProtocolError::Remote { .. }) => self.checkin(stub).await,
            Err(_) => tracing::debug!("dropping connection to {}", stub.address()),
        }
        result
    }

    /// Remote `pi(samples, threads)` on `address`.
    pub async fn pi(&self, address: &str, samples: u64, threads: usize) -> Result<f64, ProtocolError> {
        if let Some(mut stub) = self.take_idle(address).await {
            let result = stub.pi(samples, threads).await;
            match result {
                Err(e) if is_stale(&e) => stale(address, &e),
                result => return self.settle(stub, result).await,
            }
        }
        let mut stub = self.connect(address).await?;
        let result = stub.pi(samples, threads).await;
        self.settle(stub, result).await
    }

    /// Remote `multiply(threads, A, Bᵀ)` on `address`.
    pub async fn multiply<'a>(
        &self,
        address: &str,
        threads: usize,
        a: MatrixView<'a>,
        b_transpose: MatrixView<'a>,
    ) -> Result<Matrix, ProtocolError> {
        if let Some(mut stub) = self.take_idle(address).await {
            let result = stub.multiply(threads, a, b_transpose).await;
            match result {
                Err(e) if is_stale(&e) => stale(address, &e),
                result => return self.settle(stub, result).await,
            }
        }
        let mut stub = self.connect(address).await?;
        let result = stub.multiply(threads, a, b_transpose).await;
        self.settle(stub, result).await
    }

    #[cfg(test)]
    pub async fn idle_count(&self) -> usize {
        self.idle.lock().await.len()
    }
}

/// Failures that mean the worker closed or reset an idle connection.
fn is_stale(error: &ProtocolError) -> bool {
    matches!(error, ProtocolError::Io(_) | ProtocolError::ConnectionClosed)
}

fn stale(address: &str, error: &ProtocolError) {
    tracing::debug!("cached connection to {address} is stale ({error}), reconnecting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::net::TcpListener;
    use wire_protocol::{read_frame, write_frame, Request, Response};

    /// Spawns a worker that answers a lookup and then `calls` requests on
    /// each connection before closing it. Returns its address and a counter
    /// of accepted connections.
    async fn closing_worker(calls: usize) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let accepted = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&accepted);
        tokio::spawn(async move {
            loop {
                let (mut socket, _) = listener.accept().await.unwrap();
                counter.fetch_add(1, Ordering::SeqCst);
                let Ok(Some(Request::Lookup { .. })) = read_frame(&mut socket).await else {
                    continue;
                };
                write_frame(&mut socket, &Response::Bound).await.unwrap();
                for _ in 0..calls {
                    let answer = match read_frame::<_, Request>(&mut socket).await {
                        Ok(Some(Request::Pi { .. })) => Response::Pi(3.0),
                        Ok(Some(Request::Multiply { a, .. })) => Response::Matrix(a),
                        _ => break,
                    };
                    if write_frame(&mut socket, &answer).await.is_err() {
                        break;
                    }
                }
            }
        });
        (addr, accepted)
    }

    #[tokio::test]
    async fn test_reconnects_after_worker_closes_idle_connection() {
        let (addr, accepted) = closing_worker(1).await;
        let cache = StubCache::new(Some(Duration::from_secs(2)));

        assert_eq!(cache.pi(&addr, 10, 1).await.unwrap(), 3.0);
        assert_eq!(cache.idle_count().await, 1);

        // The worker has hung up on the cached stub by now.
        assert_eq!(cache.pi(&addr, 10, 1).await.unwrap(), 3.0);
        assert_eq!(cache.pi(&addr, 10, 1).await.unwrap(), 3.0);
        assert_eq!(accepted.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_multiply_reconnects_after_worker_closes_idle_connection() {
        let (addr, accepted) = closing_worker(1).await;
        let cache = StubCache::new(None);
        let a = ndarray::array![[1.0, 2.0]];
        let bt = ndarray::array![[3.0, 4.0]];

        for _ in 0..2 {
            let c = cache.multiply(&addr, 1, a.view(), bt.view()).await.unwrap();
            assert_eq!(c, a);
        }
        assert_eq!(accepted.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fresh_connection_failure_is_not_retried() {
        let (addr, accepted) = closing_worker(0).await;
        let cache = StubCache::new(None);

        let err = cache.pi(&addr, 10, 1).await.unwrap_err();
        assert!(is_stale(&err), "unexpected {err:?}");
        assert_eq!(accepted.load(Ordering::SeqCst), 1);
        assert_eq!(cache.idle_count().await, 0);
    }

    #[tokio::test]
    async fn test_live_connection_is_reused() {
        let (addr, accepted) = closing_worker(usize::MAX).await;
        let cache = StubCache::new(None);
        for _ in 0..3 {
            assert_eq!(cache.pi(&addr, 10, 1).await.unwrap(), 3.0);
        }
        assert_eq!(accepted.load(Ordering::SeqCst), 1);
    }
}
