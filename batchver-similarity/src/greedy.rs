/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::cmp::Ordering;

use batchver_utils::MatrixView;

use crate::SimilarityError;

/// The row whose distances seed the ordering.
pub const REFERENCE_ROW: usize = 0;

/// Rank every point by its distance to [`REFERENCE_ROW`].
///
/// Returns a permutation of `0..N` sorted by ascending `distance[0][j]`. Ties keep ascending
/// index order and NaN distances sort after everything else. The reference point itself
/// normally comes first since its self-distance is zero, but a duplicate point with a
/// smaller index would precede it.
///
/// An empty matrix yields an empty order. A non-square matrix is rejected.
pub fn greedy_seed_order(distance: MatrixView<'_, f32>) -> Result<Vec<usize>, SimilarityError> {
    if !distance.is_square() {
        return Err(SimilarityError::NotSquare {
            nrows: distance.nrows(),
            ncols: distance.ncols(),
        });
    }

    let Some(reference) = distance.get_row(REFERENCE_ROW) else {
        return Ok(Vec::new());
    };

    let mut order: Vec<usize> = (0..reference.len()).collect();
    // `sort_by` is stable, which resolves ties by index.
    order.sort_by(|&i, &j| nan_last(reference[i], reference[j]));
    Ok(order)
}

/// Seed selection with a cluster count.
///
/// Only the single-reference ranking of [`greedy_seed_order`] is performed. `num_clusters`
/// does not influence the result.
pub fn greedy(
    distance: MatrixView<'_, f32>,
    num_clusters: usize,
) -> Result<Vec<usize>, SimilarityError> {
    tracing::debug!(
        num_clusters,
        "num_clusters is ignored; ranking by distance to row {REFERENCE_ROW}"
    );
    greedy_seed_order(distance)
}

fn nan_last(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (true, true) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use batchver_utils::Matrix;

    use super::*;

    fn matrix(rows: &[&[f32]]) -> Matrix<f32> {
        let ncols = rows.first().map_or(0, |r| r.len());
        Matrix::from_vec(rows.concat(), rows.len(), ncols).unwrap()
    }

    #[test]
    fn test_three_points() {
        let m = matrix(&[&[0.0, 5.0, 2.0], &[5.0, 0.0, 7.0], &[2.0, 7.0, 0.0]]);
        assert_eq!(greedy_seed_order(m.as_view()).unwrap(), vec![0, 2, 1]);
        assert_eq!(greedy(m.as_view(), 2).unwrap(), vec![0, 2, 1]);
        assert_eq!(greedy(m.as_view(), 17).unwrap(), vec![0, 2, 1]);
    }

    #[test]
    fn test_ties_and_nan() {
        let m = matrix(&[
            &[0.0, f32::NAN, 3.0, 0.0, 3.0],
            &[0.0; 5],
            &[0.0; 5],
            &[0.0; 5],
            &[0.0; 5],
        ]);
        assert_eq!(greedy_seed_order(m.as_view()).unwrap(), vec![0, 3, 2, 4, 1]);
    }

    #[test]
    fn test_degenerate() {
        let empty = Matrix::<f32>::new(0.0, 0, 0);
        assert!(greedy_seed_order(empty.as_view()).unwrap().is_empty());

        let single = matrix(&[&[0.0]]);
        assert_eq!(greedy_seed_order(single.as_view()).unwrap(), vec![0]);
    }

    #[test]
    fn test_not_square() {
        let m = matrix(&[&[0.0, 1.0, 2.0], &[1.0, 0.0, 3.0]]);
        assert_eq!(
            greedy_seed_order(m.as_view()).unwrap_err(),
            SimilarityError::NotSquare { nrows: 2, ncols: 3 }
        );
    }
}
