// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # wire-protocol
//!
//! The RPC surface between the master and its workers.
//!
//! A worker exposes one named service (`"Alg"`) with two methods, `pi` and
//! `multiply`. A client connects, looks the service up by name, then issues
//! any number of calls on the same connection:
//!
//! ```text
//! client                          worker
//!   │── Lookup { "Alg" } ──────────▶│
//!   │◀───────────────────── Bound ──│
//!   │── Pi { samples, threads } ───▶│
//!   │◀────────────────── Pi(f64) ───│
//!   │── Multiply { t, A, Bᵀ } ─────▶│
//!   │◀──────────── Matrix(C) ───────│
//! ```
//!
//! Every message travels as one frame: a 4-byte big-endian length followed
//! by a `bincode` payload. `f64` values are encoded as raw IEEE-754 bits, so
//! a matrix computed remotely arrives bit-identical to one computed locally.

mod error;
mod frame;
mod message;
mod stub;

pub use error::ProtocolError;
pub use frame::{read_frame, write_frame, MAX_FRAME_BYTES};
pub use message::{Request, RequestRef, Response};
pub use stub::ServiceStub;

use std::net::{Ipv6Addr, SocketAddr};

/// Name under which every worker registers its algorithm service.
pub const SERVICE_NAME: &str = "Alg";

/// Port a worker listens on, and the port appended to bare hostnames.
pub const DEFAULT_PORT: u16 = 1099;

/// Turns a server entry into a connectable `host:port` address.
///
/// Entries that already carry a port are returned unchanged; bare
/// hostnames and IP addresses get `default_port`.
///
/// # Examples
/// ```
/// use wire_protocol::resolve_address;
/// assert_eq!(resolve_address("rpi1.local", 1099), "rpi1.local:1099");
/// assert_eq!(resolve_address("10.0.0.7:4000", 1099), "10.0.0.7:4000");
/// ```
pub fn resolve_address(server: &str, default_port: u16) -> String {
    let server = server.trim();
    if server.parse::<SocketAddr>().is_ok() {
        return server.to_string();
    }
    if server.parse::<Ipv6Addr>().is_ok() {
        return format!("[{server}]:{default_port}");
    }
    if let Some((host, port)) = server.rsplit_once(':') {
        if !host.contains(':') && port.parse::<u16>().is_ok() {
            return server.to_string();
        }
    }
    format!("{server}:{default_port}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_bare_hostname() {
        assert_eq!(resolve_address("rpi3.local", DEFAULT_PORT), "rpi3.local:1099");
    }

    #[test]
    fn test_resolve_keeps_explicit_port() {
        assert_eq!(resolve_address("rpi3.local:7000", DEFAULT_PORT), "rpi3.local:7000");
        assert_eq!(resolve_address("127.0.0.1:0", DEFAULT_PORT), "127.0.0.1:0");
    }

    #[test]
    fn test_resolve_ip_addresses() {
        assert_eq!(resolve_address("192.168.1.20", 9000), "192.168.1.20:9000");
        assert_eq!(resolve_address("::1", 9000), "[::1]:9000");
        assert_eq!(resolve_address("[::1]:80", 9000), "[::1]:80");
    }

    #[test]
    fn test_resolve_trims_whitespace() {
        assert_eq!(resolve_address("  host ", 5), "host:5");
    }
}
