// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use winter_math::fields::f64::BaseElement;

// PERMUTATIONS
// ================================================================================================

/// Computes the bit reverse of the specified index in the domain of the
/// specified size.
///
/// Domain size is assumed to be a power of two and index must be smaller
/// than domain size.
pub fn permute_index(size: usize, index: usize) -> usize {
    const USIZE_BITS: u32 = 0_usize.count_zeros();

    debug_assert!(index < size);
    debug_assert!(size.is_power_of_two());

    let bits = size.trailing_zeros();
    index.reverse_bits().wrapping_shr(USIZE_BITS - bits)
}

/// Copies the first 2^`n_bits` rows of `src` into `dst` in bit-reversed row
/// order: row `i` of the destination holds row `bitrev(i)` of the source.
///
/// Whole rows move atomically; this is pure data movement with no
/// arithmetic.
pub fn bit_reverse(dst: &mut [BaseElement], src: &[BaseElement], row_width: usize, n_bits: usize) {
    let n = 1usize << n_bits;
    debug_assert!(src.len() >= n * row_width);
    debug_assert!(dst.len() >= n * row_width);

    for i in 0..n {
        let ri = permute_index(n, i);
        dst[i * row_width..(i + 1) * row_width]
            .copy_from_slice(&src[ri * row_width..(ri + 1) * row_width]);
    }
}

/// Same as [bit_reverse], but row `i` of the destination holds row
/// `(n - bitrev(i)) mod n` of the source.
///
/// This ordering turns the forward butterfly network into an unnormalized
/// inverse transform, and is applied at the inverse-transform input
/// boundary.
pub fn bit_reverse_conjugate(
    dst: &mut [BaseElement],
    src: &[BaseElement],
    row_width: usize,
    n_bits: usize,
) {
    let n = 1usize << n_bits;
    debug_assert!(src.len() >= n * row_width);
    debug_assert!(dst.len() >= n * row_width);

    for i in 0..n {
        let ri = permute_index(n, i);
        let rii = (n - ri) % n;
        dst[i * row_width..(i + 1) * row_width]
            .copy_from_slice(&src[rii * row_width..(rii + 1) * row_width]);
    }
}
