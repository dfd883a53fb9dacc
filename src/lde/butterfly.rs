// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use winter_math::{fields::f64::BaseElement, FieldElement, StarkField};

// BLOCK-RECURSIVE BUTTERFLY ENGINE
// ================================================================================================

/// Applies `layers` butterfly stages, ending at stage `stage` (1-indexed
/// from the least-significant layer of the transform), to a tile of
/// 2^`block_bits` contiguous rows held in `tile`.
///
/// `tile_row` is the absolute row index at which the tile starts within the
/// full 2^`n_bits`-row domain, and `start_row` the absolute row index of the
/// sub-block currently being processed; both must be multiples of the
/// sub-block size. The tile is updated in place.
///
/// When the requested layer count does not span the whole tile, the tile is
/// subdivided until each half can be treated as a base case; this bounds the
/// working set of every butterfly pass to one cache-resident block. The
/// convention is the standard iterative one: bit-reversed input order,
/// natural output order.
pub fn fft_block(
    tile: &mut [BaseElement],
    tile_row: usize,
    start_row: usize,
    row_width: usize,
    n_bits: usize,
    stage: usize,
    block_bits: usize,
    layers: usize,
) {
    if layers == 0 {
        return;
    }
    debug_assert!(layers <= block_bits);
    debug_assert_eq!(start_row % (1 << block_bits), 0);

    let half = 1usize << (block_bits - 1);

    // subdivide until the requested layers span the whole sub-block
    if layers < block_bits {
        fft_block(tile, tile_row, start_row, row_width, n_bits, stage, block_bits - 1, layers);
        fft_block(
            tile,
            tile_row,
            start_row + half,
            row_width,
            n_bits,
            stage,
            block_bits - 1,
            layers,
        );
        return;
    }

    // process earlier stages in each half before combining them
    if layers > 1 {
        fft_block(
            tile,
            tile_row,
            start_row,
            row_width,
            n_bits,
            stage - 1,
            block_bits - 1,
            layers - 1,
        );
        fft_block(
            tile,
            tile_row,
            start_row + half,
            row_width,
            n_bits,
            stage - 1,
            block_bits - 1,
            layers - 1,
        );
    }

    // The tile is a strided sub-block of the full domain once the transform
    // has progressed past a single block; the starting twiddle exponent
    // then depends on the block's position. `width` is the stride of the
    // still-untransformed prefix at this stage. This formula matches the
    // iterative-FFT convention and is pinned by the known-vector tests.
    let mut w = if stage > block_bits {
        let n = 1usize << n_bits;
        let width = 1usize << (stage - layers);
        let height = n / width;
        let y = start_row / height;
        let x = start_row % height;
        BaseElement::get_root_of_unity(stage as u32).exp((x * width + y) as u64)
    } else {
        BaseElement::ONE
    };
    let step = BaseElement::get_root_of_unity(layers as u32);

    let base = start_row - tile_row;
    for i in 0..half {
        let lo = (base + i) * row_width;
        let hi = (base + half + i) * row_width;
        for j in 0..row_width {
            let t = w * tile[hi + j];
            let u = tile[lo + j];
            tile[lo + j] = u + t;
            tile[hi + j] = u - t;
        }
        w *= step;
    }
}
