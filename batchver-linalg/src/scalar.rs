/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use batchver_utils::{MatrixView, MutMatrixView};

use crate::common::{
    check_cross_shape, check_reduction_shape, row_count_nonzero, row_max, row_sum, ArrayBackend,
};

/// Single-threaded backend built from plain loops.
///
/// This is the default backend. The compiler auto-vectorizes the elementwise kernels well
/// enough that the tile loop, not the arithmetic, dominates for small dimensions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scalar;

impl ArrayBackend for Scalar {
    fn name(&self) -> &'static str {
        "scalar"
    }

    fn cross_difference(
        &self,
        a: MatrixView<'_, f32>,
        b: MatrixView<'_, f32>,
        mut out: MutMatrixView<'_, f32>,
    ) {
        check_cross_shape(&a, &b, &out);
        let n = b.nrows();
        for i in 0..a.nrows() {
            let x = a.row(i);
            for j in 0..n {
                let y = b.row(j);
                std::iter::zip(out.row_mut(i * n + j).iter_mut(), std::iter::zip(x, y))
                    .for_each(|(o, (x, y))| *o = x - y);
            }
        }
    }

    fn abs(&self, x: &mut [f32]) {
        x.iter_mut().for_each(|v| *v = v.abs());
    }

    fn square(&self, x: &mut [f32]) {
        x.iter_mut().for_each(|v| *v *= *v);
    }

    fn sqrt(&self, x: &mut [f32]) {
        x.iter_mut().for_each(|v| *v = v.sqrt());
    }

    fn sum_last_axis(&self, x: MatrixView<'_, f32>, out: &mut [f32]) {
        check_reduction_shape(&x, out);
        out.iter_mut()
            .enumerate()
            .for_each(|(r, o)| *o = row_sum(x.row(r)));
    }

    fn max_last_axis(&self, x: MatrixView<'_, f32>, out: &mut [f32]) {
        check_reduction_shape(&x, out);
        out.iter_mut()
            .enumerate()
            .for_each(|(r, o)| *o = row_max(x.row(r)));
    }

    fn count_nonzero_last_axis(&self, x: MatrixView<'_, f32>, out: &mut [f32]) {
        check_reduction_shape(&x, out);
        out.iter_mut()
            .enumerate()
            .for_each(|(r, o)| *o = row_count_nonzero(x.row(r)));
    }
}
