// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use winter_math::fields::f64::BaseElement;

// ROW MATRIX
// ================================================================================================

/// A row-major matrix of field elements.
///
/// Rows correspond to domain points and columns to polynomials, so all
/// column values for a given domain point are contiguous in memory. The
/// number of rows is always a power of two.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowMatrix {
    values: Vec<BaseElement>,
    row_width: usize,
}

impl RowMatrix {
    /// Returns a new matrix over the provided values with the specified row
    /// width.
    ///
    /// # Panics
    /// Panics if `row_width` is zero, if `values` does not divide into whole
    /// rows, or if the number of rows is not a power of two.
    pub fn new(values: Vec<BaseElement>, row_width: usize) -> Self {
        assert!(row_width > 0, "row width must be greater than zero");
        assert!(!values.is_empty(), "a matrix must contain at least one row");
        assert_eq!(
            values.len() % row_width,
            0,
            "number of values ({}) does not divide into rows of width {}",
            values.len(),
            row_width
        );
        let num_rows = values.len() / row_width;
        assert!(
            num_rows.is_power_of_two(),
            "number of rows must be a power of two, but was {num_rows}"
        );
        Self { values, row_width }
    }

    /// Returns the number of rows in this matrix.
    pub fn num_rows(&self) -> usize {
        self.values.len() / self.row_width
    }

    /// Returns the number of columns in this matrix.
    pub fn num_cols(&self) -> usize {
        self.row_width
    }

    /// Returns the row at the specified index.
    pub fn row(&self, index: usize) -> &[BaseElement] {
        &self.values[index * self.row_width..(index + 1) * self.row_width]
    }

    /// Returns an iterator over the rows of this matrix.
    pub fn rows(&self) -> impl Iterator<Item = &[BaseElement]> {
        self.values.chunks(self.row_width)
    }

    /// Returns the underlying element slice, row-major.
    pub fn values(&self) -> &[BaseElement] {
        &self.values
    }

    /// Consumes the matrix and returns the underlying element vector.
    pub fn into_values(self) -> Vec<BaseElement> {
        self.values
    }
}

// TESTS
// ================================================================================================
