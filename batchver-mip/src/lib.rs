/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */
//! # mip
//!
//! A small, solver-agnostic modeling interface for mixed-integer programs.
//!
//! Models are assembled through [`MipOptimizer`], which every backend implements. The
//! solution status of every backend is reported in the [`SolutionStatus`] vocabulary.
//! [`GurobiCli`] is the shipped backend; it drives the `gurobi_cl` program through LP and
//! JSON files.
#![cfg_attr(
    not(test),
    warn(clippy::panic, clippy::unwrap_used, clippy::expect_used)
)]

mod error;
pub use error::MipError;

mod status;
pub use status::SolutionStatus;

pub mod model;
pub use model::{
    Bound, Comparison, Constraint, LinConstraint, LinExpr, Model, ObjectiveSense, VarType,
    Variable,
};

pub mod lp;

mod optimizer;
pub use optimizer::MipOptimizer;

pub mod gurobi;
pub use gurobi::{GurobiCli, GurobiConfig};
