// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Low-degree extension of a row-major evaluation matrix.
//!
//! The transform runs in two halves: an inverse NTT over the base domain,
//! which recovers polynomial coefficients from the input evaluations, and a
//! forward NTT over the extended domain shifted into a multiplicative coset.
//! Both halves are executed as groups of butterfly layers applied to
//! cache-sized tiles, with a transpose between groups so that every group
//! can keep operating on contiguous rows regardless of the domain size.

use winter_math::{fields::f64::BaseElement, FieldElement, StarkField};

#[cfg(feature = "concurrent")]
use winter_utils::iterators::*;

use crate::matrix::RowMatrix;

mod butterfly;
mod permute;
mod scale;
mod transpose;

use butterfly::fft_block;
use permute::{bit_reverse, bit_reverse_conjugate};
use scale::scale;
use transpose::transpose;

#[cfg(test)]
mod tests;

// BLOCK PARAMETERS
// ================================================================================================

/// Bounds for the cache-blocking heuristic of the transform.
///
/// The tile size for each half of the transform is chosen as
/// `clamp(log2(domain_size · row_width / ideal_blocks), min_block_bits,
/// max_block_bits)`, further capped by the domain size itself, where
/// `ideal_blocks` is the thread count times `blocks_per_thread`.
#[derive(Clone, Copy, Debug)]
pub struct BlockParams {
    pub min_block_bits: usize,
    pub max_block_bits: usize,
    pub blocks_per_thread: usize,
}

impl BlockParams {
    /// Returns block parameters with the specified bounds.
    ///
    /// # Panics
    /// Panics if the bounds are empty or zero.
    pub fn new(min_block_bits: usize, max_block_bits: usize, blocks_per_thread: usize) -> Self {
        assert!(min_block_bits >= 1, "min block bits must be at least 1");
        assert!(
            min_block_bits <= max_block_bits,
            "min block bits ({min_block_bits}) must not exceed max block bits ({max_block_bits})"
        );
        assert!(blocks_per_thread >= 1, "blocks per thread must be at least 1");
        Self { min_block_bits, max_block_bits, blocks_per_thread }
    }
}

impl Default for BlockParams {
    fn default() -> Self {
        Self {
            min_block_bits: 12,
            max_block_bits: 16,
            blocks_per_thread: 8,
        }
    }
}

// DOUBLE BUFFER
// ================================================================================================

/// A pair of equally sized buffers with a `current` view holding the live
/// matrix and a `scratch` view receiving the next data-movement step.
///
/// The buffer roles are seeded from the predicted number of swaps so that
/// the final result lands in the front buffer; a swap counter tracks the
/// parity actually observed.
struct DoubleBuffer {
    bufs: [Vec<BaseElement>; 2],
    cur: usize,
    swaps: usize,
}

impl DoubleBuffer {
    /// Returns a double buffer of two zero-filled buffers of the specified
    /// length, seeded for the specified number of buffer-moving operations.
    fn new(len: usize, predicted_swaps: usize) -> Self {
        let bufs = [vec![BaseElement::ZERO; len], vec![BaseElement::ZERO; len]];
        // an odd number of post-seed swaps must still end on the front buffer
        let cur = if predicted_swaps % 2 == 1 { 0 } else { 1 };
        Self { bufs, cur, swaps: 0 }
    }

    fn current_mut(&mut self) -> &mut [BaseElement] {
        &mut self.bufs[self.cur]
    }

    fn scratch_mut(&mut self) -> &mut [BaseElement] {
        &mut self.bufs[self.cur ^ 1]
    }

    /// Returns the current buffer as a source and the scratch buffer as a
    /// destination.
    fn views(&mut self) -> (&[BaseElement], &mut [BaseElement]) {
        let [front, back] = &mut self.bufs;
        if self.cur == 0 {
            (front.as_slice(), back.as_mut_slice())
        } else {
            (back.as_slice(), front.as_mut_slice())
        }
    }

    fn swap(&mut self) {
        self.cur ^= 1;
        self.swaps += 1;
    }

    fn swaps(&self) -> usize {
        self.swaps
    }

    fn is_front(&self) -> bool {
        self.cur == 0
    }

    fn into_current(self) -> Vec<BaseElement> {
        let [front, back] = self.bufs;
        if self.cur == 0 {
            front
        } else {
            back
        }
    }
}

// DOMAIN EXTENSION
// ================================================================================================

/// Extends the evaluations in `matrix` from their 2^`n_bits` domain to the
/// coset `shift · H` of the 2^`n_bits_ext` domain `H`, and returns the
/// extended matrix.
///
/// # Panics
/// Panics if the base domain has fewer than two rows, if `n_bits_ext` is
/// smaller than the base domain exponent, or if the field does not contain
/// a multiplicative subgroup of the extended size.
pub fn extend(matrix: &RowMatrix, n_bits_ext: usize) -> RowMatrix {
    extend_with_params(matrix, n_bits_ext, &BlockParams::default())
}

/// Same as [extend], but with explicit cache-blocking bounds.
pub fn extend_with_params(
    matrix: &RowMatrix,
    n_bits_ext: usize,
    params: &BlockParams,
) -> RowMatrix {
    let n = matrix.num_rows();
    let n_bits = n.ilog2() as usize;
    assert!(n_bits >= 1, "base domain must contain at least two rows");
    assert!(
        n_bits_ext >= n_bits,
        "extended domain exponent ({n_bits_ext}) must not be smaller than the base exponent ({n_bits})"
    );
    assert!(
        n_bits_ext as u32 <= BaseElement::TWO_ADICITY,
        "multiplicative subgroup of size 2^{n_bits_ext} does not exist in the base field"
    );

    let row_width = matrix.num_cols();
    let n_ext = 1usize << n_bits_ext;

    let block_bits = choose_block_bits(n_bits, row_width, params);
    let block_bits_ext = choose_block_bits(n_bits_ext, row_width, params);

    // the middle bit-reversal counts as one buffer move along with the
    // transposes of both halves
    let num_moves = num_transposes(n_bits, block_bits)
        + num_transposes(n_bits_ext, block_bits_ext)
        + 1;

    // rows n..n_ext of both buffers stay zero until the forward half reads
    // them as the high coefficients of the extended polynomial
    let mut bufs = DoubleBuffer::new(n_ext * row_width, num_moves);

    // inverse transform: conjugate bit-reversal, then butterfly layer groups
    bit_reverse_conjugate(bufs.scratch_mut(), matrix.values(), row_width, n_bits);
    bufs.swap();
    butterfly_passes(&mut bufs, n_bits, row_width, block_bits);

    // normalize the inverse transform and shift into the extension coset
    scale(bufs.current_mut(), row_width, n_bits);

    // forward transform at the extended size
    {
        let (src, dst) = bufs.views();
        bit_reverse(dst, src, row_width, n_bits_ext);
        bufs.swap();
    }
    butterfly_passes(&mut bufs, n_bits_ext, row_width, block_bits_ext);

    debug_assert_eq!(num_moves + 1, bufs.swaps());
    debug_assert!(bufs.is_front());
    RowMatrix::new(bufs.into_current(), row_width)
}

// HELPER FUNCTIONS
// ================================================================================================

/// Runs groups of `block_bits` butterfly layers over the first 2^`n_bits`
/// rows of the current buffer, transposing between groups whenever a group
/// does not complete the transform on its own.
fn butterfly_passes(
    bufs: &mut DoubleBuffer,
    n_bits: usize,
    row_width: usize,
    block_bits: usize,
) {
    let n = 1usize << n_bits;
    let block_size = 1usize << block_bits;

    let mut i = 0;
    while i < n_bits {
        let layers = block_bits.min(n_bits - i);
        run_blocks(
            &mut bufs.current_mut()[..n * row_width],
            row_width,
            n_bits,
            i + layers,
            block_bits,
            layers,
            block_size,
        );
        if layers < n_bits {
            let (src, dst) = bufs.views();
            transpose(dst, src, row_width, n_bits, layers);
            bufs.swap();
        }
        i += block_bits;
    }
}

/// Applies one butterfly layer group to every tile of the buffer.
///
/// When `concurrent` feature is enabled, tiles are processed in multiple
/// threads; each worker stages its tile through a private scratch buffer
/// and writes the result back at the tile's offset.
fn run_blocks(
    buf: &mut [BaseElement],
    row_width: usize,
    n_bits: usize,
    stage: usize,
    block_bits: usize,
    layers: usize,
    block_size: usize,
) {
    let chunk_len = block_size * row_width;

    #[cfg(feature = "concurrent")]
    buf.par_chunks_mut(chunk_len).enumerate().for_each(|(j, tile)| {
        run_block(tile, j * block_size, row_width, n_bits, stage, block_bits, layers)
    });

    #[cfg(not(feature = "concurrent"))]
    buf.chunks_mut(chunk_len).enumerate().for_each(|(j, tile)| {
        run_block(tile, j * block_size, row_width, n_bits, stage, block_bits, layers)
    });
}

fn run_block(
    tile: &mut [BaseElement],
    tile_row: usize,
    row_width: usize,
    n_bits: usize,
    stage: usize,
    block_bits: usize,
    layers: usize,
) {
    let mut scratch = tile.to_vec();
    fft_block(&mut scratch, tile_row, tile_row, row_width, n_bits, stage, block_bits, layers);
    tile.copy_from_slice(&scratch);
}

/// Returns the number of transposes one half of the transform performs.
fn num_transposes(n_bits: usize, block_bits: usize) -> usize {
    if block_bits < n_bits {
        (n_bits - 1) / block_bits + 1
    } else {
        0
    }
}

/// Chooses the tile exponent for a transform half from the domain size, the
/// row width, and the available parallelism.
fn choose_block_bits(n_bits: usize, row_width: usize, params: &BlockParams) -> usize {
    let ideal_blocks = (pool_size() * params.blocks_per_thread).max(1);
    let n = 1usize << n_bits;
    let per_block = ((n * row_width) / ideal_blocks).max(1);
    (per_block.ilog2() as usize)
        .clamp(params.min_block_bits, params.max_block_bits)
        .min(n_bits)
}

#[cfg(feature = "concurrent")]
fn pool_size() -> usize {
    rayon_num_threads()
}

#[cfg(not(feature = "concurrent"))]
fn pool_size() -> usize {
    1
}
