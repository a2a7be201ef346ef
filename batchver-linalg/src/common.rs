/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use batchver_utils::{MatrixView, MutMatrixView};

/// Dense-array primitives used by the tiled distance builders.
///
/// Implementations must be deterministic: the same inputs always produce bit-identical
/// outputs, independent of how the work is scheduled. Tiled callers rely on this so that
/// changing the tile size never changes a result.
///
/// # Panics
///
/// Every method panics if its arguments do not have the shapes documented on it. The
/// helpers [`check_cross_shape`] and [`check_reduction_shape`] implement those checks.
pub trait ArrayBackend: Send + Sync {
    /// A short name used in logs.
    fn name(&self) -> &'static str;

    /// Write `a[i] - b[j]` into row `i * b.nrows() + j` of `out`.
    ///
    /// `a` is `m x d`, `b` is `n x d`, and `out` must be `(m * n) x d`.
    fn cross_difference(
        &self,
        a: MatrixView<'_, f32>,
        b: MatrixView<'_, f32>,
        out: MutMatrixView<'_, f32>,
    );

    /// Replace every element of `x` with its absolute value.
    fn abs(&self, x: &mut [f32]);

    /// Replace every element of `x` with its square.
    fn square(&self, x: &mut [f32]);

    /// Replace every element of `x` with its square root.
    fn sqrt(&self, x: &mut [f32]);

    /// Set `out[r]` to the sum of row `r` of `x`.
    ///
    /// `out.len()` must equal `x.nrows()`. The sum of an empty row is zero.
    fn sum_last_axis(&self, x: MatrixView<'_, f32>, out: &mut [f32]);

    /// Set `out[r]` to the maximum of row `r` of `x`.
    ///
    /// `out.len()` must equal `x.nrows()`. The maximum of an empty row is zero, which is
    /// the identity for the non-negative inputs this is applied to.
    fn max_last_axis(&self, x: MatrixView<'_, f32>, out: &mut [f32]);

    /// Set `out[r]` to the number of non-zero entries in row `r` of `x`.
    ///
    /// `out.len()` must equal `x.nrows()`. `NaN` counts as non-zero.
    fn count_nonzero_last_axis(&self, x: MatrixView<'_, f32>, out: &mut [f32]);
}

/// Check the shape contract of [`ArrayBackend::cross_difference`].
///
/// # Panics
///
/// Panics if `a` and `b` have different column counts or `out` is not
/// `(a.nrows() * b.nrows()) x a.ncols()`.
pub fn check_cross_shape(
    a: &MatrixView<'_, f32>,
    b: &MatrixView<'_, f32>,
    out: &MutMatrixView<'_, f32>,
) {
    assert_eq!(
        a.ncols(),
        b.ncols(),
        "cross difference operands have {} and {} columns",
        a.ncols(),
        b.ncols()
    );
    assert_eq!(
        out.nrows(),
        a.nrows() * b.nrows(),
        "expected a cross difference of {}x{} rows to have {} rows, instead got {}",
        a.nrows(),
        b.nrows(),
        a.nrows() * b.nrows(),
        out.nrows()
    );
    assert_eq!(
        out.ncols(),
        a.ncols(),
        "expected the cross difference to have {} columns, instead got {}",
        a.ncols(),
        out.ncols()
    );
}

/// Check the shape contract of the `*_last_axis` reductions.
///
/// # Panics
///
/// Panics if `out.len() != x.nrows()`.
pub fn check_reduction_shape(x: &MatrixView<'_, f32>, out: &[f32]) {
    assert_eq!(
        out.len(),
        x.nrows(),
        "expected a reduction over {} rows to write {} values, instead got {}",
        x.nrows(),
        x.nrows(),
        out.len()
    );
}

#[inline]
pub(crate) fn row_sum(row: &[f32]) -> f32 {
    row.iter().sum()
}

#[inline]
pub(crate) fn row_max(row: &[f32]) -> f32 {
    // `f32::max` discards NaN, so propagate it explicitly.
    row.iter().fold(0.0f32, |acc, &v| {
        if v.is_nan() || acc.is_nan() {
            f32::NAN
        } else {
            acc.max(v)
        }
    })
}

#[inline]
pub(crate) fn row_count_nonzero(row: &[f32]) -> f32 {
    row.iter().filter(|&&v| v != 0.0).count() as f32
}
