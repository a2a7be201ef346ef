/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Solver-independent model vocabulary.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::MipError;

/// Domain of a decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VarType {
    #[serde(rename = "B", alias = "binary")]
    Binary,
    #[serde(rename = "I", alias = "integer")]
    Integer,
    #[serde(rename = "C", alias = "continuous")]
    Continuous,
}

impl VarType {
    pub const fn as_str(self) -> &'static str {
        match self {
            VarType::Binary => "B",
            VarType::Integer => "I",
            VarType::Continuous => "C",
        }
    }
}

impl FromStr for VarType {
    type Err = MipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "b" | "binary" => Ok(VarType::Binary),
            "i" | "integer" => Ok(VarType::Integer),
            "c" | "continuous" => Ok(VarType::Continuous),
            _ => Err(MipError::UnknownVarType(s.to_string())),
        }
    }
}

/// Direction of optimization.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectiveSense {
    #[default]
    Minimize,
    Maximize,
}

impl ObjectiveSense {
    pub const fn as_str(self) -> &'static str {
        match self {
            ObjectiveSense::Minimize => "minimize",
            ObjectiveSense::Maximize => "maximize",
        }
    }
}

impl FromStr for ObjectiveSense {
    type Err = MipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minimize" | "min" => Ok(ObjectiveSense::Minimize),
            "maximize" | "max" => Ok(ObjectiveSense::Maximize),
            _ => Err(MipError::UnknownObjectiveSense(s.to_string())),
        }
    }
}

/// Which side of a variable's domain to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bound {
    Lower,
    Upper,
}

impl Bound {
    pub const fn as_str(self) -> &'static str {
        match self {
            Bound::Lower => "lower",
            Bound::Upper => "upper",
        }
    }
}

/// Relation between a constraint's expression and its right hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    #[serde(rename = "<=")]
    LessEqual,
    #[serde(rename = ">=")]
    GreaterEqual,
    #[serde(rename = "==", alias = "=")]
    Equal,
}

impl Comparison {
    /// The operator as written in LP files.
    pub const fn as_str(self) -> &'static str {
        match self {
            Comparison::LessEqual => "<=",
            Comparison::GreaterEqual => ">=",
            Comparison::Equal => "=",
        }
    }
}

/// Handle to a variable of a [`Model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(usize);

impl Variable {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle to a constraint of a [`Model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Constraint(usize);

impl Constraint {
    pub fn index(self) -> usize {
        self.0
    }
}

/// An affine expression `Σ coefficient · variable + constant`.
///
/// ```
/// use batchver_mip::{LinExpr, Model, VarType};
///
/// let mut model = Model::new();
/// let x = model.add_variable(0.0, 1.0, VarType::Binary, "x").unwrap();
/// let y = model.add_variable(0.0, 10.0, VarType::Integer, "y").unwrap();
/// let c = LinExpr::new().term(x, 2.0).term(y, -1.0).leq(4.0);
/// model.add_constraint(c, "cap").unwrap();
/// ```
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LinExpr {
    pub terms: Vec<(Variable, f64)>,
    pub constant: f64,
}

impl LinExpr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `coefficient · variable`.
    pub fn term(mut self, variable: Variable, coefficient: f64) -> Self {
        self.add_term(variable, coefficient);
        self
    }

    pub fn add_term(&mut self, variable: Variable, coefficient: f64) {
        self.terms.push((variable, coefficient));
    }

    pub fn with_constant(mut self, constant: f64) -> Self {
        self.constant = constant;
        self
    }

    /// An expression with no terms and a zero constant.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.constant == 0.0
    }

    /// Merge repeated variables and drop zero coefficients, keeping first-appearance order.
    pub fn normalized(&self) -> LinExpr {
        let mut terms: Vec<(Variable, f64)> = Vec::with_capacity(self.terms.len());
        for &(variable, coefficient) in self.terms.iter() {
            match terms.iter_mut().find(|(v, _)| *v == variable) {
                Some((_, c)) => *c += coefficient,
                None => terms.push((variable, coefficient)),
            }
        }
        terms.retain(|(_, c)| *c != 0.0);
        LinExpr {
            terms,
            constant: self.constant,
        }
    }

    pub fn leq(self, rhs: f64) -> LinConstraint {
        LinConstraint::new(self, Comparison::LessEqual, rhs)
    }

    pub fn geq(self, rhs: f64) -> LinConstraint {
        LinConstraint::new(self, Comparison::GreaterEqual, rhs)
    }

    pub fn equals(self, rhs: f64) -> LinConstraint {
        LinConstraint::new(self, Comparison::Equal, rhs)
    }
}

impl From<Variable> for LinExpr {
    fn from(variable: Variable) -> Self {
        LinExpr::new().term(variable, 1.0)
    }
}

impl FromIterator<(Variable, f64)> for LinExpr {
    fn from_iter<I: IntoIterator<Item = (Variable, f64)>>(iter: I) -> Self {
        LinExpr {
            terms: iter.into_iter().collect(),
            constant: 0.0,
        }
    }
}

/// `expr comparison rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinConstraint {
    pub expr: LinExpr,
    pub comparison: Comparison,
    pub rhs: f64,
}

impl LinConstraint {
    pub fn new(expr: LinExpr, comparison: Comparison, rhs: f64) -> Self {
        Self {
            expr,
            comparison,
            rhs,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDef {
    pub name: String,
    pub lb: f64,
    pub ub: f64,
    pub vtype: VarType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintDef {
    pub name: String,
    pub constraint: LinConstraint,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    pub expr: LinExpr,
    pub sense: ObjectiveSense,
}

/// An in-memory MIP model that backends translate into their native form.
#[derive(Debug, Default, Clone)]
pub struct Model {
    variables: Vec<VariableDef>,
    constraints: Vec<ConstraintDef>,
    objective: Option<Objective>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a decision variable with domain `[lb, ub]`. Infinite bounds are allowed.
    pub fn add_variable(
        &mut self,
        lb: f64,
        ub: f64,
        vtype: VarType,
        name: &str,
    ) -> Result<Variable, MipError> {
        check_bound(name, Bound::Lower, lb)?;
        check_bound(name, Bound::Upper, ub)?;
        self.variables.push(VariableDef {
            name: name.to_owned(),
            lb,
            ub,
            vtype,
        });
        Ok(Variable(self.variables.len() - 1))
    }

    /// Replace the objective. An empty expression leaves the current objective in place.
    pub fn set_objective(&mut self, expr: LinExpr, sense: ObjectiveSense) -> Result<(), MipError> {
        if expr.is_empty() {
            tracing::debug!("ignoring empty objective");
            return Ok(());
        }
        self.check_expr(&expr)?;
        self.objective = Some(Objective { expr, sense });
        Ok(())
    }

    pub fn add_constraint(
        &mut self,
        constraint: LinConstraint,
        name: &str,
    ) -> Result<Constraint, MipError> {
        self.check_expr(&constraint.expr)?;
        self.constraints.push(ConstraintDef {
            name: name.to_owned(),
            constraint,
        });
        Ok(Constraint(self.constraints.len() - 1))
    }

    pub fn set_variable_bound(
        &mut self,
        variable: Variable,
        which: Bound,
        value: f64,
    ) -> Result<(), MipError> {
        let def = self
            .variables
            .get_mut(variable.0)
            .ok_or(MipError::UnknownVariable(variable.0))?;
        check_bound(&def.name, which, value)?;
        match which {
            Bound::Lower => def.lb = value,
            Bound::Upper => def.ub = value,
        }
        Ok(())
    }

    pub fn variable(&self, variable: Variable) -> Result<&VariableDef, MipError> {
        self.variables
            .get(variable.0)
            .ok_or(MipError::UnknownVariable(variable.0))
    }

    pub fn constraint(&self, constraint: Constraint) -> Result<&ConstraintDef, MipError> {
        self.constraints
            .get(constraint.0)
            .ok_or(MipError::UnknownConstraint(constraint.0))
    }

    pub fn variable_by_name(&self, name: &str) -> Option<Variable> {
        self.variables
            .iter()
            .position(|v| v.name == name)
            .map(Variable)
    }

    pub fn variables(&self) -> impl ExactSizeIterator<Item = Variable> {
        (0..self.variables.len()).map(Variable)
    }

    pub fn constraints(&self) -> impl ExactSizeIterator<Item = Constraint> {
        (0..self.constraints.len()).map(Constraint)
    }

    pub fn variable_defs(&self) -> &[VariableDef] {
        &self.variables
    }

    pub fn constraint_defs(&self) -> &[ConstraintDef] {
        &self.constraints
    }

    pub fn objective(&self) -> Option<&Objective> {
        self.objective.as_ref()
    }

    /// Whether any variable is binary or integer.
    pub fn is_mip(&self) -> bool {
        self.variables
            .iter()
            .any(|v| v.vtype != VarType::Continuous)
    }

    fn check_expr(&self, expr: &LinExpr) -> Result<(), MipError> {
        match expr
            .terms
            .iter()
            .find(|(v, _)| v.0 >= self.variables.len())
        {
            Some((v, _)) => Err(MipError::UnknownVariable(v.0)),
            None => Ok(()),
        }
    }
}

fn check_bound(name: &str, which: Bound, value: f64) -> Result<(), MipError> {
    if value.is_nan() {
        Err(MipError::InvalidBound {
            name: name.to_owned(),
            which: which.as_str(),
            value,
        })
    } else {
        Ok(())
    }
}
