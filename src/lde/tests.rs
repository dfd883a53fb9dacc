// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use proptest::prelude::*;
use rand_utils::rand_vector;
use winter_math::{fields::f64::BaseElement, polynom, FieldElement, StarkField};

use super::{
    butterfly_passes, extend, extend_with_params, num_transposes,
    permute::{bit_reverse, bit_reverse_conjugate},
    transpose::transpose,
    BlockParams, DoubleBuffer,
};
use crate::matrix::RowMatrix;

// DOMAIN EXTENSION
// ================================================================================================

#[test]
fn extend_four_point_column() {
    // p(x) = 1 + 2x + 3x^2 + 4x^3 evaluated over a 4-point domain extends to
    // its evaluations over the shifted 8-point domain
    let coeffs: Vec<BaseElement> = (1u64..=4).map(BaseElement::new).collect();
    let base = eval_on_coset(&coeffs, 2, BaseElement::ONE);

    let matrix = RowMatrix::new(base, 1);
    let extended = extend(&matrix, 3);

    let expected = eval_on_coset(&coeffs, 3, BaseElement::GENERATOR);
    assert_eq!(expected, extended.values());
}

#[test]
fn extend_matches_naive_evaluation() {
    for (n_bits, n_bits_ext, num_cols) in
        [(1, 1, 1), (2, 3, 1), (3, 5, 4), (5, 7, 3), (6, 6, 5)]
    {
        let (matrix, expected) = build_case(n_bits, n_bits_ext, num_cols);
        let extended = extend(&matrix, n_bits_ext);
        assert_eq!(expected, extended.values(), "case ({n_bits}, {n_bits_ext}, {num_cols})");
    }
}

#[test]
fn extend_with_forced_small_blocks() {
    // tiny block bounds force the strided-twiddle and transpose paths that
    // production sizes only reach above 2^12 rows
    for params in [
        BlockParams::new(1, 1, 1),
        BlockParams::new(2, 2, 1),
        BlockParams::new(2, 3, 2),
    ] {
        for (n_bits, n_bits_ext, num_cols) in [(4, 5, 1), (5, 6, 2), (6, 8, 3)] {
            let (matrix, expected) = build_case(n_bits, n_bits_ext, num_cols);
            let extended = extend_with_params(&matrix, n_bits_ext, &params);
            assert_eq!(
                expected,
                extended.values(),
                "case ({n_bits}, {n_bits_ext}, {num_cols}) with {params:?}"
            );
        }
    }
}

#[test]
fn extension_is_linear() {
    let n_bits = 4;
    let values: Vec<BaseElement> = rand_vector((1 << n_bits) * 2);
    let c = BaseElement::new(7919);

    let matrix = RowMatrix::new(values.clone(), 2);
    let scaled = RowMatrix::new(values.iter().map(|&v| v * c).collect(), 2);

    let extended = extend(&matrix, 6);
    let extended_scaled = extend(&scaled, 6);

    for (lhs, rhs) in extended.values().iter().zip(extended_scaled.values()) {
        assert_eq!(*lhs * c, *rhs);
    }
}

#[test]
fn inverse_then_forward_is_identity() {
    // with the scaling step skipped and no domain growth, the transform
    // pipeline multiplies every value by the domain size
    let n_bits = 4;
    let row_width = 2;
    let n = 1usize << n_bits;
    let values: Vec<BaseElement> = rand_vector(n * row_width);

    let block_bits = 2;
    let num_moves = 2 * num_transposes(n_bits, block_bits) + 1;
    let mut bufs = DoubleBuffer::new(n * row_width, num_moves);

    bit_reverse_conjugate(bufs.scratch_mut(), &values, row_width, n_bits);
    bufs.swap();
    butterfly_passes(&mut bufs, n_bits, row_width, block_bits);
    {
        let (src, dst) = bufs.views();
        bit_reverse(dst, src, row_width, n_bits);
        bufs.swap();
    }
    butterfly_passes(&mut bufs, n_bits, row_width, block_bits);

    let result = bufs.into_current();
    let inv_n = BaseElement::new(n as u64).inv();
    for (got, want) in result.iter().zip(values.iter()) {
        assert_eq!(*got * inv_n, *want);
    }
}

// PERMUTATIONS
// ================================================================================================

proptest! {
    #[test]
    fn bit_reverse_is_involution(values in prop::collection::vec(any::<u64>(), 96)) {
        let src: Vec<BaseElement> = values.into_iter().map(BaseElement::new).collect();

        let mut once = vec![BaseElement::ZERO; src.len()];
        bit_reverse(&mut once, &src, 3, 5);
        let mut twice = vec![BaseElement::ZERO; src.len()];
        bit_reverse(&mut twice, &once, 3, 5);

        prop_assert_eq!(src, twice);
    }
}

#[test]
fn conjugate_bit_reverse_reflects_rows() {
    let src: Vec<BaseElement> = (0u64..8).map(BaseElement::new).collect();
    let mut dst = vec![BaseElement::ZERO; 8];
    bit_reverse_conjugate(&mut dst, &src, 1, 3);

    // row i holds source row (8 - bitrev(i)) mod 8
    let expected: Vec<BaseElement> =
        [0u64, 4, 6, 2, 7, 3, 5, 1].into_iter().map(BaseElement::new).collect();
    assert_eq!(expected, dst);
}

// TRANSPOSE
// ================================================================================================

#[test]
fn transpose_regroups_rows() {
    let src: Vec<BaseElement> = (0u64..8).map(BaseElement::new).collect();
    let mut dst = vec![BaseElement::ZERO; 8];
    transpose(&mut dst, &src, 1, 3, 1);

    let expected: Vec<BaseElement> =
        [0u64, 2, 4, 6, 1, 3, 5, 7].into_iter().map(BaseElement::new).collect();
    assert_eq!(expected, dst);
}

#[test]
fn transpose_moves_whole_rows() {
    // 4 rows x 2 columns, 2-wide blocks
    let src: Vec<BaseElement> = (0u64..8).map(BaseElement::new).collect();
    let mut dst = vec![BaseElement::ZERO; 8];
    transpose(&mut dst, &src, 2, 2, 1);

    let expected: Vec<BaseElement> =
        [0u64, 1, 4, 5, 2, 3, 6, 7].into_iter().map(BaseElement::new).collect();
    assert_eq!(expected, dst);
}

// ORCHESTRATION
// ================================================================================================

#[test]
fn transpose_counts() {
    assert_eq!(0, num_transposes(4, 4));
    assert_eq!(0, num_transposes(4, 12));
    assert_eq!(2, num_transposes(4, 2));
    assert_eq!(3, num_transposes(5, 2));
    assert_eq!(2, num_transposes(16, 12));
}

#[test]
fn double_buffer_parity() {
    // regardless of the predicted move count, the data ends in the front
    // buffer after that many swaps
    for moves in 1..6 {
        let mut bufs = DoubleBuffer::new(4, moves);
        for _ in 0..moves {
            bufs.swap();
        }
        assert!(bufs.is_front(), "moves = {moves}");
    }
}

// HELPER FUNCTIONS
// ================================================================================================

/// Evaluates the polynomial with the provided coefficients at every point of
/// `offset · g^j` for the 2^`n_bits` domain generated by `g`.
fn eval_on_coset(coeffs: &[BaseElement], n_bits: usize, offset: BaseElement) -> Vec<BaseElement> {
    let n = 1usize << n_bits;
    let g = BaseElement::get_root_of_unity(n_bits as u32);
    let mut result = Vec::with_capacity(n);
    let mut x = offset;
    for _ in 0..n {
        result.push(polynom::eval(coeffs, x));
        x *= g;
    }
    result
}

/// Builds a random multi-column base matrix along with its expected
/// extension, computed column by column with naive polynomial evaluation.
fn build_case(
    n_bits: usize,
    n_bits_ext: usize,
    num_cols: usize,
) -> (RowMatrix, Vec<BaseElement>) {
    let n = 1usize << n_bits;
    let n_ext = 1usize << n_bits_ext;

    let columns: Vec<Vec<BaseElement>> = (0..num_cols).map(|_| rand_vector(n)).collect();

    let mut base = vec![BaseElement::ZERO; n * num_cols];
    let mut expected = vec![BaseElement::ZERO; n_ext * num_cols];
    for (k, coeffs) in columns.iter().enumerate() {
        for (i, value) in eval_on_coset(coeffs, n_bits, BaseElement::ONE).into_iter().enumerate() {
            base[i * num_cols + k] = value;
        }
        let evals = eval_on_coset(coeffs, n_bits_ext, BaseElement::GENERATOR);
        for (j, value) in evals.into_iter().enumerate() {
            expected[j * num_cols + k] = value;
        }
    }

    (RowMatrix::new(base, num_cols), expected)
}
