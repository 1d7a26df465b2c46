// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Name → service registry consulted by `Lookup` requests.

use crate::RemoteAlgorithms;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;

pub type SharedService = Arc<dyn RemoteAlgorithms>;

/// Services a worker answers for. Cloning shares the same table.
#[derive(Clone, Default)]
pub struct ServiceRegistry {
    services: Arc<RwLock<HashMap<String, SharedService>>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `service` under `name`, replacing and returning any previous
    /// binding. Sessions that already looked the name up keep the old one.
    pub async fn rebind(&self, name: &str, service: SharedService) -> Option<SharedService> {
        let previous = self.services.write().await.insert(name.to_string(), service);
        if previous.is_some() {
            tracing::info!("service '{name}' rebound");
        } else {
            tracing::info!("service '{name}' bound");
        }
        previous
    }

    pub async fn unbind(&self, name: &str) -> Option<SharedService> {
        self.services.write().await.remove(name)
    }

    pub async fn lookup(&self, name: &str) -> Option<SharedService> {
        self.services.read().await.get(name).cloned()
    }

    /// Bound names, sorted.
    pub async fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.services.read().await.keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceRegistry").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AlgorithmService;

    #[tokio::test]
    async fn test_lookup_missing() {
        let r = ServiceRegistry::new();
        assert!(r.lookup("Alg").await.is_none());
        assert!(r.names().await.is_empty());
    }

    #[tokio::test]
    async fn test_rebind_replaces() {
        let r = ServiceRegistry::new();
        assert!(r.rebind("Alg", Arc::new(AlgorithmService::new())).await.is_none());
        assert!(r.rebind("Alg", Arc::new(AlgorithmService::new())).await.is_some());
        assert_eq!(r.names().await, vec!["Alg".to_string()]);
    }

    #[tokio::test]
    async fn test_unbind() {
        let r = ServiceRegistry::new();
        r.rebind("Alg", Arc::new(AlgorithmService::new())).await;
        assert!(r.unbind("Alg").await.is_some());
        assert!(r.lookup("Alg").await.is_none());
    }

    #[tokio::test]
    async fn test_clones_share_table() {
        let r = ServiceRegistry::new();
        let other = r.clone();
        r.rebind("Alg", Arc::new(AlgorithmService::new())).await;
        assert!(other.lookup("Alg").await.is_some());
    }
}
