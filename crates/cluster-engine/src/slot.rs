// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Slots: the unit of parallel dispatch.

use crate::EngineError;
use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::task::{JoinError, JoinHandle};

/// Where a slot's partial is computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotKind {
    /// The kernel, on a local blocking thread.
    Kernel,
    /// A worker reached over RPC.
    Remote { address: String },
    /// The client's own local engine, always the last slot.
    MasterLocal { threads: usize },
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotKind::Kernel => write!(f, "kernel"),
            SlotKind::Remote { address } => write!(f, "remote {address}"),
            SlotKind::MasterLocal { threads } => write!(f, "master-local x{threads}"),
        }
    }
}

/// A slot's partial together with how long it took.
#[derive(Debug)]
pub(crate) struct Partial<T> {
    pub value: T,
    pub elapsed: Duration,
}

pub(crate) type SlotHandle<T> = JoinHandle<Result<Partial<T>, EngineError>>;

/// Runs `work` on tokio's blocking pool and times it.
pub(crate) fn spawn_kernel<T, F>(work: F) -> SlotHandle<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, EngineError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let start = Instant::now();
        let value = work()?;
        Ok(Partial {
            value,
            elapsed: start.elapsed(),
        })
    })
}

/// Runs an I/O-bound slot as an async task and times it.
pub(crate) fn spawn_async<T, Fut>(work: Fut) -> SlotHandle<T>
where
    T: Send + 'static,
    Fut: Future<Output = Result<T, EngineError>> + Send + 'static,
{
    tokio::spawn(async move {
        let start = Instant::now();
        let value = work.await?;
        Ok(Partial {
            value,
            elapsed: start.elapsed(),
        })
    })
}

/// Awaits slot `slot` and flattens task failure into [`EngineError`].
pub(crate) async fn join_slot<T>(slot: usize, handle: SlotHandle<T>) -> Result<Partial<T>, EngineError> {
    handle.await.map_err(|e| aborted(slot, e))?
}

/// Aborts every handle not yet awaited so no slot outlives a failed job.
pub(crate) fn abort_all<T>(handles: impl IntoIterator<Item = SlotHandle<T>>) {
    for handle in handles {
        handle.abort();
    }
}

fn aborted(slot: usize, err: JoinError) -> EngineError {
    let detail = if err.is_panic() {
        let payload = err.into_panic();
        payload
            .downcast_ref::<&str>()
            .map(|s| format!("panicked: {s}"))
            .or_else(|| payload.downcast_ref::<String>().map(|s| format!("panicked: {s}")))
            .unwrap_or_else(|| "panicked".to_string())
    } else {
        "cancelled".to_string()
    };
    EngineError::SlotAborted { slot, detail }
}
