/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! JSON description of a small MIP model, used by `solve_mip_model`.
//!
//! ```json
//! {
//!   "variables": [
//!     {"name": "a", "type": "B"},
//!     {"name": "n", "type": "I", "lb": 0, "ub": 4}
//!   ],
//!   "objective": {"sense": "maximize", "terms": {"a": 5, "n": 1}},
//!   "constraints": [
//!     {"name": "weight", "terms": {"a": 3, "n": 2}, "comparison": "<=", "rhs": 4}
//!   ]
//! }
//! ```
//!
//! A missing `lb` defaults to `0` and a missing `ub` to `+inf`, except for binaries whose
//! upper bound defaults to `1`.

use std::{
    collections::{BTreeMap, HashMap},
    path::Path,
};

use batchver_mip::{
    Comparison, LinConstraint, LinExpr, MipError, MipOptimizer, ObjectiveSense, SolutionStatus,
    VarType, Variable,
};
use serde::{Deserialize, Serialize};

use crate::utils::{CMDResult, CMDToolError};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariableDescription {
    pub name: String,
    #[serde(rename = "type")]
    pub vtype: VarType,
    #[serde(default)]
    pub lb: f64,
    #[serde(default)]
    pub ub: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectiveDescription {
    pub sense: ObjectiveSense,
    pub terms: BTreeMap<String, f64>,
    #[serde(default)]
    pub constant: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstraintDescription {
    pub name: String,
    pub terms: BTreeMap<String, f64>,
    pub comparison: Comparison,
    pub rhs: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelDescription {
    pub variables: Vec<VariableDescription>,
    #[serde(default)]
    pub objective: Option<ObjectiveDescription>,
    #[serde(default)]
    pub constraints: Vec<ConstraintDescription>,
}

/// Variables created from a [`ModelDescription`], by name.
pub type VariableMap = HashMap<String, Variable>;

impl ModelDescription {
    pub fn from_json_file(path: impl AsRef<Path>) -> CMDResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Add every variable, constraint and the objective to `solver`.
    pub fn build(&self, solver: &mut dyn MipOptimizer) -> CMDResult<VariableMap> {
        let mut variables = VariableMap::with_capacity(self.variables.len());
        for v in self.variables.iter() {
            let ub = v.ub.unwrap_or(match v.vtype {
                VarType::Binary => 1.0,
                VarType::Integer | VarType::Continuous => f64::INFINITY,
            });
            let handle = solver.add_variable(v.lb, ub, v.vtype, &v.name)?;
            if variables.insert(v.name.clone(), handle).is_some() {
                return Err(CMDToolError::new(format!(
                    "variable {:?} is declared twice",
                    v.name
                )));
            }
        }

        for c in self.constraints.iter() {
            let expr = expression(&c.terms, &variables, &c.name)?;
            solver.add_constraint(LinConstraint::new(expr, c.comparison, c.rhs), &c.name)?;
        }

        if let Some(objective) = &self.objective {
            let expr = expression(&objective.terms, &variables, "objective")?
                .with_constant(objective.constant);
            solver.set_objective(expr, objective.sense)?;
        }

        tracing::debug!(
            variables = self.variables.len(),
            constraints = self.constraints.len(),
            "built model"
        );
        Ok(variables)
    }
}

fn expression(
    terms: &BTreeMap<String, f64>,
    variables: &VariableMap,
    context: &str,
) -> CMDResult<LinExpr> {
    terms
        .iter()
        .map(|(name, &coefficient)| match variables.get(name) {
            Some(&v) => Ok((v, coefficient)),
            None => Err(CMDToolError::new(format!(
                "{context} refers to undeclared variable {name:?}"
            ))),
        })
        .collect()
}

/// The outcome of a solve, in a serializable form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolveReport {
    pub status: SolutionStatus,
    pub label: &'static str,
    pub objective: Option<f64>,
    pub values: BTreeMap<String, f64>,
    pub duals: BTreeMap<String, f64>,
}

impl SolveReport {
    /// Collect every value `solver` can provide.
    pub fn collect(solver: &dyn MipOptimizer, variables: &VariableMap) -> CMDResult<Self> {
        let status = solver.status();
        let mut report = SolveReport {
            status,
            label: status.label(),
            objective: available(solver.objective_value())?,
            values: BTreeMap::new(),
            duals: BTreeMap::new(),
        };

        for (name, &variable) in variables.iter() {
            if let Some(value) = available(solver.primal_value(variable))? {
                report.values.insert(name.clone(), value);
            }
        }
        for constraint in solver.constraints() {
            if let Some(value) = available(solver.dual_value(constraint))? {
                report
                    .duals
                    .insert(solver.constraint_name(constraint)?.to_owned(), value);
            }
        }
        Ok(report)
    }
}

/// Turn "the solver has no such value" into `None`, keeping real errors.
fn available(result: Result<f64, MipError>) -> CMDResult<Option<f64>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(MipError::NoSolution(_) | MipError::DualUnavailable(_)) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use batchver_mip::{Constraint, Model};

    use super::*;

    const KNAPSACK: &str = r#"{
        "variables": [
            {"name": "a", "type": "B"},
            {"name": "b", "type": "binary"},
            {"name": "n", "type": "I", "lb": 0, "ub": 4},
            {"name": "s", "type": "C", "lb": -2}
        ],
        "objective": {"sense": "maximize", "terms": {"a": 5, "b": 4, "n": 1}, "constant": 1},
        "constraints": [
            {"name": "weight", "terms": {"a": 3, "b": 2, "n": 1}, "comparison": "<=", "rhs": 4},
            {"name": "link", "terms": {"n": 1, "s": -1}, "comparison": "=", "rhs": 0}
        ]
    }"#;

    /// Reports a fixed solution, assigning `index + 1` to every variable.
    #[derive(Default)]
    struct FixedSolver {
        model: Model,
        status: SolutionStatus,
    }

    impl MipOptimizer for FixedSolver {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn model(&self) -> &Model {
            &self.model
        }

        fn model_mut(&mut self) -> &mut Model {
            &mut self.model
        }

        fn solve(&mut self) -> Result<SolutionStatus, MipError> {
            self.status = SolutionStatus::Optimal;
            Ok(self.status)
        }

        fn status(&self) -> SolutionStatus {
            self.status
        }

        fn primal_value(&self, variable: Variable) -> Result<f64, MipError> {
            self.model.variable(variable)?;
            if self.status.has_solution() {
                Ok(variable.index() as f64 + 1.0)
            } else {
                Err(MipError::NoSolution(self.status))
            }
        }

        fn dual_value(&self, constraint: Constraint) -> Result<f64, MipError> {
            Err(MipError::DualUnavailable(
                self.model.constraint(constraint)?.name.clone(),
            ))
        }

        fn objective_value(&self) -> Result<f64, MipError> {
            if self.status.has_solution() {
                Ok(42.0)
            } else {
                Err(MipError::NoSolution(self.status))
            }
        }
    }

    #[test]
    fn build_from_json() {
        let description: ModelDescription = serde_json::from_str(KNAPSACK).unwrap();
        let mut solver = FixedSolver::default();
        let variables = description.build(&mut solver).unwrap();

        let model = solver.model();
        assert_eq!(model.variable_defs().len(), 4);
        let a = model.variable(variables["a"]).unwrap();
        assert_eq!((a.lb, a.ub, a.vtype), (0.0, 1.0, VarType::Binary));
        let s = model.variable(variables["s"]).unwrap();
        assert_eq!((s.lb, s.ub), (-2.0, f64::INFINITY));

        let objective = model.objective().unwrap();
        assert_eq!(objective.sense, ObjectiveSense::Maximize);
        assert_eq!(objective.expr.constant, 1.0);
        assert_eq!(objective.expr.terms.len(), 3);

        let link = &model.constraint_defs()[1];
        assert_eq!(link.name, "link");
        assert_eq!(link.constraint.comparison, Comparison::Equal);
    }

    #[test]
    fn report_before_and_after_solve() {
        let description: ModelDescription = serde_json::from_str(KNAPSACK).unwrap();
        let mut solver = FixedSolver::default();
        let variables = description.build(&mut solver).unwrap();

        let report = SolveReport::collect(&solver, &variables).unwrap();
        assert_eq!(report.status, SolutionStatus::Loaded);
        assert_eq!(report.objective, None);
        assert!(report.values.is_empty());

        solver.solve().unwrap();
        let report = SolveReport::collect(&solver, &variables).unwrap();
        assert_eq!(report.label, "Optimal");
        assert_eq!(report.objective, Some(42.0));
        assert_eq!(report.values["a"], 1.0);
        assert_eq!(report.values["s"], 4.0);
        assert!(report.duals.is_empty());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "Optimal");
        assert_eq!(json["values"]["n"], 3.0);
    }

    #[test]
    fn undeclared_variables_are_rejected() {
        let description: ModelDescription = serde_json::from_str(
            r#"{"variables": [{"name": "x", "type": "C"}],
                "constraints": [{"name": "c", "terms": {"y": 1}, "comparison": ">=", "rhs": 1}]}"#,
        )
        .unwrap();
        let err = description.build(&mut FixedSolver::default()).unwrap_err();
        assert_eq!(err.details, "c refers to undeclared variable \"y\"");

        let description: ModelDescription = serde_json::from_str(
            r#"{"variables": [{"name": "x", "type": "C"}, {"name": "x", "type": "B"}]}"#,
        )
        .unwrap();
        let err = description.build(&mut FixedSolver::default()).unwrap_err();
        assert_eq!(err.details, "variable \"x\" is declared twice");
    }

    #[test]
    fn read_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, KNAPSACK).unwrap();
        let description = ModelDescription::from_json_file(&path).unwrap();
        assert_eq!(description.variables.len(), 4);
        assert_eq!(description.constraints.len(), 2);

        std::fs::write(&path, r#"{"variables": [], "extra": 1}"#).unwrap();
        let err = ModelDescription::from_json_file(&path).unwrap_err();
        assert!(err.details.starts_with("invalid JSON"), "{err}");
    }
}
