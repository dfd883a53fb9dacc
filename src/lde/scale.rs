// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use winter_math::{fields::f64::BaseElement, FieldElement, StarkField};

#[cfg(feature = "concurrent")]
use winter_utils::iterators::*;

// CONSTANTS
// ================================================================================================

// Bounds on the number of elements a single worker scales in one go;
// corrected by the row width so that a range never splits a row.
const MAX_ELEMENTS_PER_RANGE: usize = 1 << 18;
const MIN_ELEMENTS_PER_RANGE: usize = 1 << 12;

// INTERPOLATION SCALER
// ================================================================================================

/// Rescales row `i` of the first 2^`n_bits` rows of `buf` (every column) by
/// `n⁻¹ · shift^i`, where `shift` is the domain coset-shift constant.
///
/// This removes the `1/n` factor inherent to the unnormalized inverse
/// transform, and pre-multiplies the coefficients so the subsequent forward
/// transform evaluates the polynomial on a coset of the larger domain
/// rather than on the domain itself.
///
/// When `concurrent` feature is enabled, row ranges are processed in
/// multiple threads; a range never splits a row.
pub fn scale(buf: &mut [BaseElement], row_width: usize, n_bits: usize) {
    let n = 1usize << n_bits;
    debug_assert!(buf.len() >= n * row_width);

    let inv_n = BaseElement::new(n as u64).inv();
    let shift = BaseElement::GENERATOR;

    let num_threads = super::pool_size();
    let mut rows_per_range = (n - 1) / num_threads + 1;
    let max_rows = (MAX_ELEMENTS_PER_RANGE / row_width).max(1);
    let min_rows = (MIN_ELEMENTS_PER_RANGE / row_width).max(1);
    rows_per_range = rows_per_range.min(max_rows).max(min_rows);

    let range_len = rows_per_range * row_width;

    #[cfg(feature = "concurrent")]
    buf[..n * row_width]
        .par_chunks_mut(range_len)
        .enumerate()
        .for_each(|(i, range)| {
            scale_range(range, row_width, i * rows_per_range, inv_n, shift)
        });

    #[cfg(not(feature = "concurrent"))]
    buf[..n * row_width]
        .chunks_mut(range_len)
        .enumerate()
        .for_each(|(i, range)| {
            scale_range(range, row_width, i * rows_per_range, inv_n, shift)
        });
}

fn scale_range(
    range: &mut [BaseElement],
    row_width: usize,
    first_row: usize,
    inv_n: BaseElement,
    shift: BaseElement,
) {
    let mut w = inv_n * shift.exp(first_row as u64);
    for row in range.chunks_mut(row_width) {
        for value in row.iter_mut() {
            *value *= w;
        }
        w *= shift;
    }
}
