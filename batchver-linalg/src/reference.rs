/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use batchver_utils::Matrix;
use thiserror::Error;

use crate::ArrayBackend;

/// A hand-checked problem exercising every primitive of an [`ArrayBackend`].
#[derive(Debug)]
pub(crate) struct TestProblem {
    a: Matrix<f32>,
    b: Matrix<f32>,
    difference: Vec<f32>,
    l1: Vec<f32>,
    l2: Vec<f32>,
    linf: Vec<f32>,
    l0: Vec<f32>,
}

#[derive(Debug, Error)]
#[error("mismatch in {stage}. got {got:?}, expected {expected:?}")]
pub(crate) struct ReferenceError {
    stage: &'static str,
    got: Vec<f32>,
    expected: Vec<f32>,
}

fn compare(stage: &'static str, got: &[f32], expected: &[f32]) -> Result<(), ReferenceError> {
    if got == expected {
        Ok(())
    } else {
        Err(ReferenceError {
            stage,
            got: got.to_vec(),
            expected: expected.to_vec(),
        })
    }
}

impl TestProblem {
    /// Run `backend` through the same primitive sequences the distance builders use and
    /// compare each stage against the expected values.
    pub(crate) fn check<B: ArrayBackend>(&self, backend: &B) -> Result<(), ReferenceError> {
        let (m, n, d) = (self.a.nrows(), self.b.nrows(), self.a.ncols());

        let mut diff = Matrix::<f32>::new(f32::NAN, m * n, d);
        backend.cross_difference(self.a.as_view(), self.b.as_view(), diff.as_mut_view());
        compare("cross_difference", diff.as_slice(), &self.difference)?;

        let mut out = vec![f32::NAN; m * n];
        backend.count_nonzero_last_axis(diff.as_view(), &mut out);
        compare("count_nonzero_last_axis", &out, &self.l0)?;

        let mut work = diff.clone();
        backend.abs(work.as_mut_slice());
        backend.sum_last_axis(work.as_view(), &mut out);
        compare("abs + sum_last_axis", &out, &self.l1)?;

        backend.max_last_axis(work.as_view(), &mut out);
        compare("abs + max_last_axis", &out, &self.linf)?;

        let mut work = diff;
        backend.square(work.as_mut_slice());
        backend.sum_last_axis(work.as_view(), &mut out);
        backend.sqrt(&mut out);
        compare("square + sum_last_axis + sqrt", &out, &self.l2)
    }
}

/// Return a small set of problems whose answers were worked out by hand.
pub(crate) fn test_problems() -> Vec<TestProblem> {
    let mut problems = Vec::new();

    // Block A:        Block B:
    //   0  0            3  4
    //   3  4            0  0
    //                   3  0
    let a = Matrix::from_vec(vec![0.0, 0.0, 3.0, 4.0], 2, 2).unwrap();
    let b = Matrix::from_vec(vec![3.0, 4.0, 0.0, 0.0, 3.0, 0.0], 3, 2).unwrap();
    problems.push(TestProblem {
        a,
        b,
        difference: vec![
            -3.0, -4.0, // a0 - b0
            0.0, 0.0, // a0 - b1
            -3.0, 0.0, // a0 - b2
            0.0, 0.0, // a1 - b0
            3.0, 4.0, // a1 - b1
            0.0, 4.0, // a1 - b2
        ],
        l1: vec![7.0, 0.0, 3.0, 0.0, 7.0, 4.0],
        l2: vec![5.0, 0.0, 3.0, 0.0, 5.0, 4.0],
        linf: vec![4.0, 0.0, 3.0, 0.0, 4.0, 4.0],
        l0: vec![2.0, 0.0, 1.0, 0.0, 2.0, 1.0],
    });

    // One-dimensional, one-by-one.
    let a = Matrix::from_vec(vec![-1.5], 1, 1).unwrap();
    let b = Matrix::from_vec(vec![2.5], 1, 1).unwrap();
    problems.push(TestProblem {
        a,
        b,
        difference: vec![-4.0],
        l1: vec![4.0],
        l2: vec![4.0],
        linf: vec![4.0],
        l0: vec![1.0],
    });

    // Zero-dimensional vectors: every reduction yields zero.
    let a = Matrix::from_vec(vec![], 2, 0).unwrap();
    let b = Matrix::from_vec(vec![], 1, 0).unwrap();
    problems.push(TestProblem {
        a,
        b,
        difference: vec![],
        l1: vec![0.0, 0.0],
        l2: vec![0.0, 0.0],
        linf: vec![0.0, 0.0],
        l0: vec![0.0, 0.0],
    });

    // Empty blocks.
    let a = Matrix::from_vec(vec![], 0, 3).unwrap();
    let b = Matrix::from_vec(vec![1.0, 2.0, 3.0], 1, 3).unwrap();
    problems.push(TestProblem {
        a,
        b,
        difference: vec![],
        l1: vec![],
        l2: vec![],
        linf: vec![],
        l0: vec![],
    });

    problems
}
