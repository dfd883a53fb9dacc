// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use winter_crypto::{hashers::Rp64_256, Digest, ElementHasher, Hasher};
use winter_math::fields::f64::BaseElement;

use super::RowHasher;

// CONSTANTS
// ================================================================================================

/// Number of field elements in a field-native tree node.
pub const DIGEST_WIDTH: usize = 4;

// FIELD-NATIVE ROW COMMITMENT
// ================================================================================================

/// Field-native row commitment: rows hash into Rescue-Prime digests of four
/// Goldilocks elements, and siblings merge through the same permutation.
pub struct Rp64RowHasher;

impl RowHasher for Rp64RowHasher {
    type Node = <Rp64_256 as Hasher>::Digest;

    fn hash_row(row: &[BaseElement]) -> Self::Node {
        Rp64_256::hash_elements(row)
    }

    fn merge(lhs: &Self::Node, rhs: &Self::Node) -> Self::Node {
        Rp64_256::merge(&[*lhs, *rhs])
    }
}

// HELPER FUNCTIONS
// ================================================================================================

/// Returns the number of serialized field elements in the node array of a
/// field-native tree with the specified number of leaves.
pub const fn tree_num_elements(num_leaves: usize) -> usize {
    DIGEST_WIDTH * (2 * num_leaves - 1)
}

/// Splits a node into its four canonical little-endian words.
pub fn node_words(node: &<Rp64_256 as Hasher>::Digest) -> [u64; DIGEST_WIDTH] {
    let bytes = node.as_bytes();
    let mut words = [0u64; DIGEST_WIDTH];
    for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(8)) {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(chunk);
        *word = u64::from_le_bytes(buf);
    }
    words
}
