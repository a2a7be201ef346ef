/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Dense row-major matrix views and the binary vector file format shared by the
//! `batchver` crates.

pub mod io;
pub mod views;

pub use views::{Init, Matrix, MatrixView, MutMatrixView};
