// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Cluster configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! engine = "distributed"
//! threads = 4
//! servers = ["10.0.0.2", "10.0.0.3:1099"]
//! master_threads = 2
//! port = 1099
//! connect_timeout_ms = 3000
//! seed = 42
//! ```

use crate::{ComputeEngine, DistributedEngine, EngineError, LocalEngine, SequentialEngine};
use std::path::Path;
use std::time::Duration;
use wire_protocol::{resolve_address, DEFAULT_PORT};

/// Which engine a configuration builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    Sequential,
    Local,
    Distributed,
}

/// Configuration for a compute client.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ClusterConfig {
    /// Engine to build.
    pub engine: EngineKind,
    /// Local threads, or threads per server for the distributed engine
    /// (defaults to the number of online CPU cores).
    pub threads: Option<usize>,
    /// Worker addresses as `host` or `host:port`.
    #[serde(default)]
    pub servers: Vec<String>,
    /// Threads for the master-local slot; 0 disables it.
    #[serde(default)]
    pub master_threads: usize,
    /// Port used for servers given without one.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Connect timeout for workers in milliseconds.
    pub connect_timeout_ms: Option<u64>,
    /// Base seed for reproducible π streams. The distributed engine applies
    /// it to its master-local slot only.
    pub seed: Option<u64>,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl ClusterConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, EngineError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            EngineError::ConfigError(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, EngineError> {
        toml::from_str(toml_str)
            .map_err(|e| EngineError::ConfigError(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, EngineError> {
        toml::to_string_pretty(self)
            .map_err(|e| EngineError::ConfigError(format!("TOML serialise error: {e}")))
    }

    /// Resolves the number of threads.
    pub fn resolve_threads(&self) -> usize {
        self.threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        })
    }

    /// Server addresses with [`ClusterConfig::port`] filled in where missing.
    pub fn server_addresses(&self) -> Vec<String> {
        self.servers
            .iter()
            .map(|s| resolve_address(s, self.port))
            .collect()
    }

    /// Creates the engine specified by this config.
    pub fn create_engine(&self) -> Result<Box<dyn ComputeEngine>, EngineError> {
        let threads = self.resolve_threads();
        if threads == 0 {
            return Err(EngineError::ConfigError("threads must be at least one".into()));
        }
        match self.engine {
            EngineKind::Sequential => {
                let mut engine = SequentialEngine::new();
                if let Some(seed) = self.seed {
                    engine = engine.with_seed(seed);
                }
                Ok(Box::new(engine))
            }
            EngineKind::Local => {
                let mut engine = LocalEngine::new(threads);
                if let Some(seed) = self.seed {
                    engine = engine.with_seed(seed);
                }
                Ok(Box::new(engine))
            }
            EngineKind::Distributed => {
                if self.servers.is_empty() && self.master_threads == 0 {
                    return Err(EngineError::ConfigError(
                        "distributed engine needs servers or master_threads > 0".into(),
                    ));
                }
                let mut engine =
                    DistributedEngine::new(self.server_addresses(), threads, self.master_threads);
                if let Some(ms) = self.connect_timeout_ms {
                    engine = engine.with_connect_timeout(Duration::from_millis(ms));
                }
                if let Some(seed) = self.seed {
                    if self.master_threads == 0 {
                        tracing::warn!("seed {seed} has no effect without master_threads");
                    }
                    engine = engine.with_master_seed(seed);
                }
                Ok(Box::new(engine))
            }
        }
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::Local,
            threads: None,
            servers: Vec::new(),
            master_threads: 0,
            port: DEFAULT_PORT,
            connect_timeout_ms: None,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let c = ClusterConfig::default();
        assert_eq!(c.engine, EngineKind::Local);
        assert_eq!(c.port, 1099);
        assert!(c.servers.is_empty());
        assert!(c.resolve_threads() >= 1);
    }

    #[test]
    fn test_from_toml() {
        let toml = r#"
engine = "distributed"
threads = 2
servers = ["10.0.0.2", "10.0.0.3:2000"]
master_threads = 3
connect_timeout_ms = 500
"#;
        let c = ClusterConfig::from_toml(toml).unwrap();
        assert_eq!(c.engine, EngineKind::Distributed);
        assert_eq!(c.threads, Some(2));
        assert_eq!(c.master_threads, 3);
        assert_eq!(c.port, 1099);
        assert_eq!(c.connect_timeout_ms, Some(500));
        assert_eq!(c.seed, None);
        assert_eq!(c.server_addresses(), vec!["10.0.0.2:1099", "10.0.0.3:2000"]);
    }

    #[test]
    fn test_custom_port_applies_to_bare_hosts() {
        let c = ClusterConfig {
            servers: vec!["node1".into(), "node2:7000".into()],
            port: 5000,
            ..Default::default()
        };
        assert_eq!(c.server_addresses(), vec!["node1:5000", "node2:7000"]);
    }

    #[test]
    fn test_to_toml_roundtrip() {
        let c = ClusterConfig {
            engine: EngineKind::Distributed,
            servers: vec!["a".into()],
            seed: Some(9),
            ..Default::default()
        };
        let toml = c.to_toml().unwrap();
        let back = ClusterConfig::from_toml(&toml).unwrap();
        assert_eq!(back.engine, c.engine);
        assert_eq!(back.servers, c.servers);
        assert_eq!(back.seed, Some(9));
    }

    #[test]
    fn test_unknown_engine() {
        let err = ClusterConfig::from_toml("engine = \"bogus\"").unwrap_err();
        assert!(matches!(err, EngineError::ConfigError(_)));
    }

    #[test]
    fn test_create_engine_local() {
        let c = ClusterConfig {
            threads: Some(3),
            ..Default::default()
        };
        assert_eq!(c.create_engine().unwrap().name(), "local");
    }

    #[test]
    fn test_create_engine_sequential() {
        let c = ClusterConfig {
            engine: EngineKind::Sequential,
            ..Default::default()
        };
        assert_eq!(c.create_engine().unwrap().name(), "sequential");
    }

    #[test]
    fn test_create_engine_distributed() {
        let c = ClusterConfig {
            engine: EngineKind::Distributed,
            servers: vec!["127.0.0.1".into()],
            threads: Some(2),
            ..Default::default()
        };
        assert_eq!(c.create_engine().unwrap().name(), "distributed");
    }

    #[tokio::test]
    async fn test_seed_reaches_master_local_slot() {
        let c = ClusterConfig {
            engine: EngineKind::Distributed,
            threads: Some(1),
            master_threads: 2,
            seed: Some(5),
            ..Default::default()
        };
        let first = c.create_engine().unwrap().pi(500).await.unwrap().value;
        let second = c.create_engine().unwrap().pi(500).await.unwrap().value;
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn test_create_engine_distributed_without_servers() {
        let c = ClusterConfig {
            engine: EngineKind::Distributed,
            ..Default::default()
        };
        assert!(c.create_engine().is_err());
    }

    #[test]
    fn test_zero_threads_rejected() {
        let c = ClusterConfig {
            threads: Some(0),
            ..Default::default()
        };
        assert!(c.create_engine().is_err());
    }

    #[test]
    fn test_from_missing_file() {
        let err = ClusterConfig::from_file(Path::new("/nonexistent/cluster.toml")).unwrap_err();
        assert!(err.to_string().contains("cannot read config"));
    }
}
