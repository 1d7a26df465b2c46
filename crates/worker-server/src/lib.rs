// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # worker-server
//!
//! A worker node of the cluster. It binds an [`AlgorithmService`] under
//! [`SERVICE_NAME`](wire_protocol::SERVICE_NAME) in its
//! [`ServiceRegistry`], listens on a TCP port and answers `pi` and
//! `multiply` calls by running a [`LocalEngine`](cluster_engine::LocalEngine)
//! with the caller's thread count.
//!
//! Each accepted connection gets its own task; calls on one connection are
//! answered in order, calls on different connections run concurrently.

mod error;
mod policy;
mod registry;
mod server;
mod service;
mod session;

pub use error::ServerError;
pub use policy::AccessPolicy;
pub use registry::{ServiceRegistry, SharedService};
pub use server::WorkerServer;
pub use service::{AlgorithmService, RemoteAlgorithms};
