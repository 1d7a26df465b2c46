// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Protocol messages.
//!
//! [`RequestRef`] is what a client encodes: it borrows the operands so a
//! slot's share of `A` is serialised straight from the caller's matrix.
//! [`Request`] is what a worker decodes. Both enums list the same variants
//! in the same order with the same field types, which makes their `bincode`
//! encodings identical.

use compute_kernel::{Matrix, MatrixView};
use serde::{Deserialize, Serialize};

/// A request as decoded by the worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Request {
    /// Resolve a service name in the worker's registry.
    Lookup { service: String },
    /// Estimate π from at least `samples` draws over `threads` threads.
    Pi { samples: u64, threads: usize },
    /// Compute `A · B` from `A` and `Bᵀ` over `threads` threads.
    Multiply {
        threads: usize,
        a: Matrix,
        b_transpose: Matrix,
    },
}

/// A request as encoded by the client, borrowing its operands.
#[derive(Debug, Clone, Serialize)]
pub enum RequestRef<'a> {
    Lookup {
        service: &'a str,
    },
    Pi {
        samples: u64,
        threads: usize,
    },
    Multiply {
        threads: usize,
        a: MatrixView<'a>,
        b_transpose: MatrixView<'a>,
    },
}

impl RequestRef<'_> {
    /// Short method name for logs and error messages.
    pub fn method(&self) -> &'static str {
        match self {
            RequestRef::Lookup { .. } => "lookup",
            RequestRef::Pi { .. } => "pi",
            RequestRef::Multiply { .. } => "multiply",
        }
    }
}

/// A worker's answer to one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Response {
    /// The looked-up service exists; calls may follow.
    Bound,
    /// No service is registered under that name.
    NotBound { service: String },
    /// Result of a `Pi` call.
    Pi(f64),
    /// Result of a `Multiply` call.
    Matrix(Matrix),
    /// The call failed on the worker.
    Error { message: String },
}

impl Response {
    /// Short variant name for logs and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Response::Bound => "bound",
            Response::NotBound { .. } => "not-bound",
            Response::Pi(_) => "pi",
            Response::Matrix(_) => "matrix",
            Response::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, s};

    #[test]
    fn test_borrowed_request_decodes_as_owned() {
        let a = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let bt = array![[0.5, -1.0]];
        let outgoing = RequestRef::Multiply {
            threads: 3,
            a: a.slice(s![1..3, ..]),
            b_transpose: bt.view(),
        };
        let bytes = bincode::serialize(&outgoing).unwrap();
        let decoded: Request = bincode::deserialize(&bytes).unwrap();
        assert_eq!(
            decoded,
            Request::Multiply {
                threads: 3,
                a: array![[3.0, 4.0], [5.0, 6.0]],
                b_transpose: bt,
            }
        );
    }

    #[test]
    fn test_lookup_and_pi_decode_as_owned() {
        let bytes = bincode::serialize(&RequestRef::Lookup { service: "Alg" }).unwrap();
        let decoded: Request = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded, Request::Lookup { service: "Alg".into() });

        let bytes = bincode::serialize(&RequestRef::Pi { samples: 12, threads: 4 }).unwrap();
        let decoded: Request = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded, Request::Pi { samples: 12, threads: 4 });
    }

    #[test]
    fn test_f64_bits_survive_encoding() {
        let awkward = array![[0.1 + 0.2, f64::MIN_POSITIVE, -0.0, 1e308]];
        let bytes = bincode::serialize(&Response::Matrix(awkward.clone())).unwrap();
        let Response::Matrix(back) = bincode::deserialize(&bytes).unwrap() else {
            panic!("expected matrix response");
        };
        let bits = |m: &Matrix| m.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&back), bits(&awkward));
    }

    #[test]
    fn test_method_and_kind_names() {
        assert_eq!(RequestRef::Pi { samples: 1, threads: 1 }.method(), "pi");
        assert_eq!(Response::Pi(3.0).kind(), "pi");
        assert_eq!(Response::Error { message: "x".into() }.kind(), "error");
    }
}
