// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use winter_math::fields::f64::BaseElement;
use winter_utils::iterators::*;

use super::RowHasher;

// CONCURRENT TREE CONSTRUCTION
// ================================================================================================

/// Hashes every row into its leaf using all available threads; each row is
/// hashed independently, so the resulting leaves do not depend on the
/// thread count.
pub fn hash_leaves<H: RowHasher>(
    leaves: &mut [H::Node],
    values: &[BaseElement],
    row_width: usize,
) {
    leaves
        .par_iter_mut()
        .zip(values.par_chunks(row_width))
        .for_each(|(leaf, row)| *leaf = H::hash_row(row));
}

/// Combines one tree level pairwise into the next using all available
/// threads. The caller sequences levels, so the full previous level is
/// complete before this function runs.
pub fn combine_level<H: RowHasher>(next: &mut [H::Node], prev: &[H::Node]) {
    next.par_iter_mut()
        .enumerate()
        .for_each(|(i, node)| *node = H::merge(&prev[2 * i], &prev[2 * i + 1]));
}
