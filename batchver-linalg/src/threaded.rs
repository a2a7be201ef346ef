/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use batchver_utils::{MatrixView, MutMatrixView};
use rayon::prelude::*;

use crate::common::{
    check_cross_shape, check_reduction_shape, row_count_nonzero, row_max, row_sum, ArrayBackend,
};

/// Backend that spreads each primitive over the global `rayon` thread pool.
///
/// Work is split by output row and every row is reduced sequentially, so results are
/// bit-identical to [`crate::Scalar`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Threaded;

impl ArrayBackend for Threaded {
    fn name(&self) -> &'static str {
        "threaded"
    }

    fn cross_difference(
        &self,
        a: MatrixView<'_, f32>,
        b: MatrixView<'_, f32>,
        mut out: MutMatrixView<'_, f32>,
    ) {
        check_cross_shape(&a, &b, &out);
        if out.ncols() == 0 {
            return;
        }
        let n = b.nrows();
        out.par_row_iter_mut().enumerate().for_each(|(k, o)| {
            let (x, y) = (a.row(k / n), b.row(k % n));
            std::iter::zip(o.iter_mut(), std::iter::zip(x, y)).for_each(|(o, (x, y))| *o = x - y);
        });
    }

    fn abs(&self, x: &mut [f32]) {
        x.par_iter_mut().for_each(|v| *v = v.abs());
    }

    fn square(&self, x: &mut [f32]) {
        x.par_iter_mut().for_each(|v| *v *= *v);
    }

    fn sqrt(&self, x: &mut [f32]) {
        x.par_iter_mut().for_each(|v| *v = v.sqrt());
    }

    fn sum_last_axis(&self, x: MatrixView<'_, f32>, out: &mut [f32]) {
        check_reduction_shape(&x, out);
        out.par_iter_mut()
            .enumerate()
            .for_each(|(r, o)| *o = row_sum(x.row(r)));
    }

    fn max_last_axis(&self, x: MatrixView<'_, f32>, out: &mut [f32]) {
        check_reduction_shape(&x, out);
        out.par_iter_mut()
            .enumerate()
            .for_each(|(r, o)| *o = row_max(x.row(r)));
    }

    fn count_nonzero_last_axis(&self, x: MatrixView<'_, f32>, out: &mut [f32]) {
        check_reduction_shape(&x, out);
        out.par_iter_mut()
            .enumerate()
            .for_each(|(r, o)| *o = row_count_nonzero(x.row(r)));
    }
}
