/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use thiserror::Error;

/// Errors raised by the distance-matrix builder and the seed selector.
///
/// All of these are detected before any distance is computed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimilarityError {
    /// The norm selector is not one of `l0`, `l1`, `l2` or `linf`.
    #[error("unsupported norm {0:?}: expected one of l0, l1, l2, linf")]
    UnsupportedNorm(String),

    /// The tile size must be at least one.
    #[error("chunk size must be positive, got {0}")]
    InvalidChunkSize(usize),

    /// The input vectors do not all have the same dimension.
    #[error("vector {row} has dimension {found}, but vector 0 has dimension {expected}")]
    DimensionMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A distance matrix was expected to be square.
    #[error("expected a square distance matrix, got {nrows}x{ncols}")]
    NotSquare { nrows: usize, ncols: usize },
}
