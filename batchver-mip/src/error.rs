/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::path::PathBuf;

use thiserror::Error;

use crate::SolutionStatus;

/// Errors raised while building a model or driving a solver.
///
/// Infeasible, unbounded or interrupted solves are not errors: they are reported through
/// [`SolutionStatus`]. Reading a value the solver did not produce yields
/// [`MipError::NoSolution`].
#[derive(Debug, Error)]
pub enum MipError {
    /// The solver program could not be started.
    #[error("solver {binary:?} is not available: {source}")]
    SolverUnavailable {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("variable handle {0} does not belong to this model")]
    UnknownVariable(usize),

    #[error("constraint handle {0} does not belong to this model")]
    UnknownConstraint(usize),

    /// A primal value was requested but the last solve produced none.
    #[error("no solution is available (status: {0})")]
    NoSolution(SolutionStatus),

    /// The solver did not report a dual value for this constraint, which is always the case
    /// for models with integer variables.
    #[error("no dual value is available for constraint {0:?}")]
    DualUnavailable(String),

    #[error("unknown variable type {0:?}: expected one of B, I, C")]
    UnknownVarType(String),

    #[error("unknown objective sense {0:?}: expected minimize or maximize")]
    UnknownObjectiveSense(String),

    #[error("unknown solver status code {0}")]
    UnknownStatusCode(i32),

    /// The solver exited unsuccessfully.
    #[error("solver exited with {code:?}: {stderr}")]
    SolverFailed { code: Option<i32>, stderr: String },

    /// A bound was NaN.
    #[error("invalid {which} bound {value} for variable {name:?}")]
    InvalidBound {
        name: String,
        which: &'static str,
        value: f64,
    },

    /// A constraint without terms cannot be written when the model has no variables.
    #[error("constraint {0:?} has no terms and the model has no variables")]
    EmptyConstraint(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed solver result: {0}")]
    Json(#[from] serde_json::Error),
}
