/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::{path::Path, time::Instant};

use batchver_linalg::{Scalar, Threaded};
use batchver_similarity::{DistanceMatrixBuilder, NormKind};
use batchver_utils::{
    io::{load_bin, save_bin},
    Matrix, MatrixView,
};

use crate::utils::CMDResult;

/// Which [`batchver_linalg::ArrayBackend`] evaluates the tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    #[default]
    Scalar,
    Threaded,
}

/// Build the distance matrix of `data` with the selected backend.
pub fn build_distance_matrix(
    data: MatrixView<'_, f32>,
    norm: NormKind,
    chunk_size: usize,
    backend: Backend,
) -> CMDResult<Matrix<f32>> {
    let builder = DistanceMatrixBuilder::new(norm, chunk_size)?;
    let matrix = match backend {
        Backend::Scalar => builder.with_backend(Scalar).build(data),
        Backend::Threaded => builder.with_backend(Threaded).build(data),
    };
    Ok(matrix)
}

/// Read a dataset from `data_file`, compute its pairwise distance matrix and save it to
/// `output_file`. Both files use the binary format.
pub fn compute_distance_matrix_from_file(
    data_file: &Path,
    output_file: &Path,
    norm: NormKind,
    chunk_size: usize,
    backend: Backend,
) -> CMDResult<()> {
    let data = load_bin::<f32>(data_file)?;
    tracing::info!(
        npts = data.nrows(),
        ndims = data.ncols(),
        %norm,
        chunk_size,
        ?backend,
        "loaded dataset"
    );

    let start = Instant::now();
    let matrix = build_distance_matrix(data.as_view(), norm, chunk_size, backend)?;
    tracing::info!(elapsed = ?start.elapsed(), "computed distance matrix");

    let bytes = save_bin(matrix.as_view(), output_file)?;
    tracing::info!(bytes, path = %output_file.display(), "saved distance matrix");
    Ok(())
}
