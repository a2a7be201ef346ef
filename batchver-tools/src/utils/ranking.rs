/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::{io::Write, path::Path};

use batchver_similarity::greedy;
use batchver_utils::io::load_bin;

use crate::utils::CMDResult;

/// Load a distance matrix from `distance_file` and rank every point by its distance to the
/// first one.
pub fn rank_neighbors_from_file(
    distance_file: &Path,
    num_clusters: usize,
) -> CMDResult<Vec<usize>> {
    let distances = load_bin::<f32>(distance_file)?;
    tracing::info!(
        npts = distances.nrows(),
        path = %distance_file.display(),
        "loaded distance matrix"
    );
    Ok(greedy(distances.as_view(), num_clusters)?)
}

/// Write `order` with one index per line.
pub fn write_ranking(order: &[usize], writer: &mut impl Write) -> CMDResult<()> {
    for index in order {
        writeln!(writer, "{index}")?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use batchver_utils::{io::save_bin, Matrix};

    use super::*;

    #[test]
    fn rank_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("distances.bin");
        let distances =
            Matrix::from_vec(vec![0.0f32, 5.0, 2.0, 5.0, 0.0, 7.0, 2.0, 7.0, 0.0], 3, 3).unwrap();
        save_bin(distances.as_view(), &path).unwrap();

        let order = rank_neighbors_from_file(&path, 2).unwrap();
        assert_eq!(order, vec![0, 2, 1]);

        let mut out = Vec::new();
        write_ranking(&order, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "0\n2\n1\n");
    }

    #[test]
    fn non_square_matrix_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.bin");
        save_bin(Matrix::new(0.0f32, 4, 3).as_view(), &path).unwrap();

        let err = rank_neighbors_from_file(&path, 2).unwrap_err();
        assert_eq!(err.details, "expected a square distance matrix, got 4x3");
    }
}
