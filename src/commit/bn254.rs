// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use winter_math::{fields::f64::BaseElement, StarkField};

use super::RowHasher;

// CONSTANTS
// ================================================================================================

/// Number of bytes in a serialized curve-based tree node.
pub const NODE_SIZE: usize = 32;

// CURVE-BASED ROW COMMITMENT
// ================================================================================================

/// Curve-based row commitment: nodes live in the BN254 scalar field.
///
/// Rows and sibling pairs are compressed with BLAKE3 over their canonical
/// little-endian encodings, and the 256-bit output is reduced into the
/// scalar field.
pub struct Bn254RowHasher;

impl RowHasher for Bn254RowHasher {
    type Node = Fr;

    fn hash_row(row: &[BaseElement]) -> Fr {
        let mut hasher = blake3::Hasher::new();
        for value in row {
            hasher.update(&value.as_int().to_le_bytes());
        }
        digest_to_scalar(hasher.finalize())
    }

    fn merge(lhs: &Fr, rhs: &Fr) -> Fr {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&node_bytes(lhs));
        hasher.update(&node_bytes(rhs));
        digest_to_scalar(hasher.finalize())
    }
}

// HELPER FUNCTIONS
// ================================================================================================

/// Returns the canonical little-endian encoding of a tree node.
pub fn node_bytes(node: &Fr) -> [u8; NODE_SIZE] {
    let le = node.into_bigint().to_bytes_le();
    let mut bytes = [0u8; NODE_SIZE];
    bytes[..le.len()].copy_from_slice(&le);
    bytes
}

fn digest_to_scalar(digest: blake3::Hash) -> Fr {
    Fr::from_le_bytes_mod_order(digest.as_bytes())
}
