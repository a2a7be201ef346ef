/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Numeric execution backends for tiled distance computations.
//!
//! The [`ArrayBackend`] trait is the narrow set of dense-array primitives the distance
//! builders need: a broadcast cross difference between two row blocks, in-place `abs`,
//! `square` and `sqrt`, and `sum`, `max` and `count_nonzero` reductions along the last
//! axis. Tiling logic is written against the trait so the arithmetic can be swapped
//! without touching it.
//!
//! Two backends are provided:
//!
//! * [`Scalar`]: straight-line loops on the calling thread.
//! * [`Threaded`]: the same primitives spread over the `rayon` thread pool
//!   (requires the `rayon` feature).
//!
//! # Layout
//!
//! A cross difference between an `m x d` block `a` and an `n x d` block `b` is stored as an
//! `(m * n) x d` row-major matrix where row `i * n + j` holds `a[i] - b[j]`. Reductions
//! collapse each row of such a matrix into a single value, so "the last axis" is always
//! the column axis.

#![cfg_attr(
    not(test),
    warn(clippy::panic, clippy::unwrap_used, clippy::expect_used)
)]

pub mod common;
pub use common::ArrayBackend;

mod scalar;
pub use scalar::Scalar;

#[cfg(feature = "rayon")]
mod threaded;
#[cfg(feature = "rayon")]
pub use threaded::Threaded;

// Hand-checked problems shared by the backend tests.
#[cfg(test)]
mod reference;
