/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::path::{Path, PathBuf};

use crate::{
    lp, Bound, Constraint, LinConstraint, LinExpr, MipError, Model, ObjectiveSense,
    SolutionStatus, VarType, Variable,
};

/// A MIP solver behind a uniform modeling interface.
///
/// Model construction is shared: implementors expose their [`Model`] and get variable,
/// constraint, objective and export handling for free. They only need to provide the
/// solve and the solution queries.
///
/// The trait is object safe, so callers can hold a `Box<dyn MipOptimizer>` and choose the
/// backend at run time.
pub trait MipOptimizer {
    /// Short backend name used in logs.
    fn name(&self) -> &'static str;

    fn model(&self) -> &Model;

    fn model_mut(&mut self) -> &mut Model;

    /// Solve the current model and return the resulting status.
    ///
    /// Infeasibility and limits are reported through the status, not as errors.
    fn solve(&mut self) -> Result<SolutionStatus, MipError>;

    /// Status of the last solve, or [`SolutionStatus::Loaded`] before any solve.
    fn status(&self) -> SolutionStatus;

    /// Value of `variable` in the last solution.
    fn primal_value(&self, variable: Variable) -> Result<f64, MipError>;

    /// Dual value (shadow price) of `constraint` in the last solution.
    fn dual_value(&self, constraint: Constraint) -> Result<f64, MipError>;

    /// Objective value of the last solution.
    fn objective_value(&self) -> Result<f64, MipError>;

    fn add_variable(
        &mut self,
        lb: f64,
        ub: f64,
        vtype: VarType,
        name: &str,
    ) -> Result<Variable, MipError> {
        self.model_mut().add_variable(lb, ub, vtype, name)
    }

    /// Set the objective. An empty expression is ignored.
    fn set_objective(&mut self, expr: LinExpr, sense: ObjectiveSense) -> Result<(), MipError> {
        self.model_mut().set_objective(expr, sense)
    }

    fn add_constraint(
        &mut self,
        constraint: LinConstraint,
        name: &str,
    ) -> Result<Constraint, MipError> {
        self.model_mut().add_constraint(constraint, name)
    }

    fn set_variable_bound(
        &mut self,
        variable: Variable,
        which: Bound,
        value: f64,
    ) -> Result<(), MipError> {
        self.model_mut().set_variable_bound(variable, which, value)
    }

    /// Write the model in LP format. `.lp` is appended when `path` has no extension.
    fn export_model(&self, path: &Path) -> Result<PathBuf, MipError> {
        lp::export_lp(self.model(), path)
    }

    fn constraints(&self) -> Vec<Constraint> {
        self.model().constraints().collect()
    }

    fn constraint_name(&self, constraint: Constraint) -> Result<&str, MipError> {
        Ok(self.model().constraint(constraint)?.name.as_str())
    }
}
