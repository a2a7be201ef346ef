/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */
//! # similarity
//!
//! Pairwise distance matrices over a set of equal-length `f32` vectors, and the greedy
//! nearest-first ordering used to seed clustering.
//!
//! The distance matrix is computed in square tiles so that peak scratch memory is bounded by
//! `chunk_size² × D` regardless of the number of vectors. The arithmetic inside a tile is
//! delegated to a [`batchver_linalg::ArrayBackend`], and the norm is chosen through the
//! closed [`NormKind`] enumeration.
//!
//! ```
//! use batchver_similarity::{generate_distance_matrix, greedy_seed_order, NormKind};
//!
//! let vectors = [[0.0f32, 0.0], [3.0, 4.0], [1.0, 0.0]];
//! let distances = generate_distance_matrix(&vectors, NormKind::L2, 2).unwrap();
//! assert_eq!(distances[(0, 1)], 5.0);
//! assert_eq!(greedy_seed_order(distances.as_view()).unwrap(), vec![0, 2, 1]);
//! ```
#![cfg_attr(
    not(test),
    warn(clippy::panic, clippy::unwrap_used, clippy::expect_used)
)]

mod error;
pub use error::SimilarityError;

pub mod norm;
pub use norm::NormKind;

pub mod builder;
pub use builder::{
    generate_distance_matrix, generate_distance_matrix_from_view, DistanceMatrixBuilder,
    DEFAULT_CHUNK_SIZE,
};

pub mod greedy;
pub use greedy::{greedy, greedy_seed_order};
