// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use winter_math::fields::f64::BaseElement;

#[cfg(feature = "concurrent")]
use winter_utils::iterators::*;

// TRANSPOSE STAGE
// ================================================================================================

/// Reshapes the first 2^`n_bits` rows of `src` from a group of 2^`w_bits`-wide
/// blocks into a group of `n / w`-tall blocks: `dst[i * h + j] = src[j * w + i]`
/// for every block index `i < w` and intra-block index `j < h`.
///
/// Whole rows (all columns) move atomically. This lets butterfly passes keep
/// operating on cache-sized tiles while the stride of the untransformed
/// prefix of the domain changes between layer groups.
///
/// When `concurrent` feature is enabled, destination blocks are processed in
/// multiple threads.
pub fn transpose(
    dst: &mut [BaseElement],
    src: &[BaseElement],
    row_width: usize,
    n_bits: usize,
    w_bits: usize,
) {
    let n = 1usize << n_bits;
    let w = 1usize << w_bits;
    let h = n / w;
    debug_assert!(w_bits <= n_bits);
    debug_assert!(src.len() >= n * row_width);
    debug_assert!(dst.len() >= n * row_width);

    #[cfg(feature = "concurrent")]
    dst[..n * row_width]
        .par_chunks_mut(h * row_width)
        .enumerate()
        .for_each(|(i, block)| transpose_block(block, src, i, w, h, row_width));

    #[cfg(not(feature = "concurrent"))]
    dst[..n * row_width]
        .chunks_mut(h * row_width)
        .enumerate()
        .for_each(|(i, block)| transpose_block(block, src, i, w, h, row_width));
}

fn transpose_block(
    block: &mut [BaseElement],
    src: &[BaseElement],
    i: usize,
    w: usize,
    h: usize,
    row_width: usize,
) {
    for j in 0..h {
        let fi = j * w + i;
        block[j * row_width..(j + 1) * row_width]
            .copy_from_slice(&src[fi * row_width..(fi + 1) * row_width]);
    }
}
