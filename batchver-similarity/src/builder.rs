/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Tiled pairwise distance matrices.
//!
//! The index range `[0, N)` is split into contiguous chunks of at most `chunk_size` rows.
//! For every pair of chunks `(I, J)` the builder materializes the `|I| x |J| x D`
//! difference tile, reduces it along the dimension axis with the selected norm and writes
//! the `|I| x |J|` result into the output. Peak scratch memory is therefore
//! `chunk_size² × D` elements rather than `N² × D`. Once every tile is written the
//! diagonal is forced to zero.
//!
//! The chunk size only affects locality: the output is bit-identical for every chunk size
//! because each entry is reduced from the same row of differences in the same order.

use std::{num::NonZeroUsize, ops::Range};

use batchver_linalg::{ArrayBackend, Scalar};
use batchver_utils::{Matrix, MatrixView};

use crate::{NormKind, SimilarityError};

/// Chunk size used when the caller does not pick one.
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// Partition `0..n` into contiguous ranges of at most `chunk_size` elements.
///
/// The last range is shorter when `n` is not a multiple of `chunk_size`. An empty input
/// yields no ranges.
pub fn chunk_ranges(
    n: usize,
    chunk_size: NonZeroUsize,
) -> impl ExactSizeIterator<Item = Range<usize>> {
    let chunk_size = chunk_size.get();
    (0..n.div_ceil(chunk_size)).map(move |i| {
        let start = i * chunk_size;
        start..(start + chunk_size).min(n)
    })
}

/// Validate `chunk_size`, rejecting zero.
pub fn check_chunk_size(chunk_size: usize) -> Result<NonZeroUsize, SimilarityError> {
    NonZeroUsize::new(chunk_size).ok_or(SimilarityError::InvalidChunkSize(chunk_size))
}

/// Reusable configuration for building distance matrices.
///
/// The builder holds no mutable state, so a single instance can be shared across threads
/// and used for any number of datasets.
///
/// ```
/// use batchver_similarity::{DistanceMatrixBuilder, NormKind};
/// use batchver_utils::Matrix;
///
/// let data = Matrix::from_vec(vec![0.0, 0.0, 3.0, 4.0], 2, 2).unwrap();
/// let builder = DistanceMatrixBuilder::new(NormKind::L2, 100).unwrap();
/// let distances = builder.build(data.as_view());
/// assert_eq!(distances.as_slice(), &[0.0, 5.0, 5.0, 0.0]);
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrixBuilder<B = Scalar> {
    norm: NormKind,
    chunk_size: NonZeroUsize,
    backend: B,
}

impl DistanceMatrixBuilder<Scalar> {
    /// Create a builder using the [`Scalar`] backend.
    ///
    /// Fails with [`SimilarityError::InvalidChunkSize`] if `chunk_size == 0`.
    pub fn new(norm: NormKind, chunk_size: usize) -> Result<Self, SimilarityError> {
        Ok(Self {
            norm,
            chunk_size: check_chunk_size(chunk_size)?,
            backend: Scalar,
        })
    }
}

impl Default for DistanceMatrixBuilder<Scalar> {
    fn default() -> Self {
        Self {
            norm: NormKind::default(),
            chunk_size: NonZeroUsize::new(DEFAULT_CHUNK_SIZE).unwrap_or(NonZeroUsize::MIN),
            backend: Scalar,
        }
    }
}

impl<B> DistanceMatrixBuilder<B>
where
    B: ArrayBackend,
{
    /// Replace the numeric backend, keeping the norm and chunk size.
    pub fn with_backend<C: ArrayBackend>(self, backend: C) -> DistanceMatrixBuilder<C> {
        DistanceMatrixBuilder {
            norm: self.norm,
            chunk_size: self.chunk_size,
            backend,
        }
    }

    /// Replace the norm.
    pub fn with_norm(mut self, norm: NormKind) -> Self {
        self.norm = norm;
        self
    }

    pub fn norm(&self) -> NormKind {
        self.norm
    }

    pub fn chunk_size(&self) -> NonZeroUsize {
        self.chunk_size
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Compute the `N x N` distance matrix between the rows of `data`.
    ///
    /// Entry `(i, j)` is the norm of `data[i] - data[j]`. The diagonal is exactly zero.
    pub fn build(&self, data: MatrixView<'_, f32>) -> Matrix<f32> {
        let n = data.nrows();
        let dim = data.ncols();
        let chunk = self.chunk_size.get().min(n.max(1));

        let mut output = Matrix::new(0.0f32, n, n);
        if n == 0 {
            return output;
        }

        let ranges: Vec<Range<usize>> = chunk_ranges(n, self.chunk_size).collect();
        tracing::debug!(
            npoints = n,
            ndims = dim,
            norm = %self.norm,
            chunk_size = chunk,
            tiles = ranges.len() * ranges.len(),
            backend = self.backend.name(),
            "building distance matrix"
        );

        // Scratch space for a single tile. Every tile fits in the leading rows.
        let mut differences = Matrix::new(0.0f32, chunk * chunk, dim);
        let mut reduced = vec![0.0f32; chunk * chunk];

        for rows in ranges.iter() {
            let a = data.subview(rows.clone());
            for cols in ranges.iter() {
                let b = data.subview(cols.clone());
                let tile = rows.len() * cols.len();
                tracing::trace!(?rows, ?cols, "computing tile");

                self.backend
                    .cross_difference(a, b, differences.subview_mut(0..tile));
                self.norm.reduce(
                    &self.backend,
                    differences.subview_mut(0..tile),
                    &mut reduced[..tile],
                );

                for (offset, values) in reduced[..tile].chunks_exact(cols.len()).enumerate() {
                    output.row_mut(rows.start + offset)[cols.clone()].copy_from_slice(values);
                }
            }
        }

        output.fill_diagonal(0.0);
        output
    }
}

/// Compute the pairwise distance matrix of `vectors` under `norm`.
///
/// All vectors must have the same dimension. `chunk_size` bounds the tile size used
/// internally and must be positive; it does not change the result.
///
/// Errors are reported before any distance is computed:
///
/// * [`SimilarityError::InvalidChunkSize`] if `chunk_size == 0`.
/// * [`SimilarityError::DimensionMismatch`] if the vectors are ragged.
pub fn generate_distance_matrix<V>(
    vectors: &[V],
    norm: NormKind,
    chunk_size: usize,
) -> Result<Matrix<f32>, SimilarityError>
where
    V: AsRef<[f32]>,
{
    let builder = DistanceMatrixBuilder::new(norm, chunk_size)?;
    let data = pack_vectors(vectors)?;
    Ok(builder.build(data.as_view()))
}

/// Compute the pairwise distance matrix of the rows of `data` under `norm`.
///
/// See [`generate_distance_matrix`].
pub fn generate_distance_matrix_from_view(
    data: MatrixView<'_, f32>,
    norm: NormKind,
    chunk_size: usize,
) -> Result<Matrix<f32>, SimilarityError> {
    Ok(DistanceMatrixBuilder::new(norm, chunk_size)?.build(data))
}

/// Copy a slice of equal-length vectors into a dense row-major matrix.
///
/// Fails with [`SimilarityError::DimensionMismatch`] naming the first vector whose length
/// differs from the first vector's.
pub fn pack_vectors<V>(vectors: &[V]) -> Result<Matrix<f32>, SimilarityError>
where
    V: AsRef<[f32]>,
{
    let dim = vectors.first().map_or(0, |v| v.as_ref().len());
    if let Some((row, v)) = vectors
        .iter()
        .enumerate()
        .find(|(_, v)| v.as_ref().len() != dim)
    {
        return Err(SimilarityError::DimensionMismatch {
            row,
            expected: dim,
            found: v.as_ref().len(),
        });
    }

    let mut data = Matrix::new(0.0f32, vectors.len(), dim);
    for (dst, src) in std::iter::zip(data.row_iter_mut(), vectors.iter()) {
        dst.copy_from_slice(src.as_ref());
    }
    Ok(data)
}

///////////
// Tests //
///////////
