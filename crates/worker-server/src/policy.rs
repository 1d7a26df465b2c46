// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Peer admission.

use std::net::IpAddr;

/// Which peers may open a session.
///
/// An empty allow-list admits everyone, which is the default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessPolicy {
    allowed: Vec<IpAddr>,
}

impl AccessPolicy {
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Admits only the given peer addresses.
    pub fn allow_only(peers: impl IntoIterator<Item = IpAddr>) -> Self {
        Self {
            allowed: peers.into_iter().collect(),
        }
    }

    pub fn permits(&self, peer: IpAddr) -> bool {
        self.allowed.is_empty() || self.allowed.contains(&peer)
    }
}
