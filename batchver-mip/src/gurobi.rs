/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Gurobi backend driving the `gurobi_cl` command line program.
//!
//! A solve exports the model as an LP file, runs
//! `gurobi_cl ResultFile=model.json JSONSolDetail=1 [params] model.lp` and reads the JSON
//! solution file back. No Gurobi library is linked, so the crate builds on machines without
//! a Gurobi installation; solving there fails with [`MipError::SolverUnavailable`].

use std::{
    collections::{BTreeMap, HashMap},
    ffi::OsString,
    io::ErrorKind,
    path::{Path, PathBuf},
    process::Command,
};

use serde::{Deserialize, Serialize};

use crate::{
    lp::{self, LpNames},
    Constraint, MipError, MipOptimizer, Model, SolutionStatus, Variable,
};

const LP_FILE: &str = "model.lp";
const RESULT_FILE: &str = "model.json";

/// Settings for [`GurobiCli`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GurobiConfig {
    /// The `gurobi_cl` executable, looked up on `PATH` when not absolute.
    pub binary: PathBuf,
    /// Directory for the LP and result files. A fresh temporary directory is used when unset.
    pub work_dir: Option<PathBuf>,
    /// `TimeLimit` parameter in seconds.
    pub time_limit: Option<f64>,
    /// `Threads` parameter.
    pub threads: Option<usize>,
    /// Additional `Key=Value` parameters passed verbatim.
    pub params: BTreeMap<String, String>,
    /// Leave the LP and result files in `work_dir` after solving.
    pub keep_files: bool,
}

impl Default for GurobiConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("gurobi_cl"),
            work_dir: None,
            time_limit: None,
            threads: None,
            params: BTreeMap::new(),
            keep_files: false,
        }
    }
}

impl GurobiConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, MipError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// The arguments passed to the solver program.
    pub fn command_args(&self, lp_file: &Path, result_file: &Path) -> Vec<OsString> {
        let mut result = OsString::from("ResultFile=");
        result.push(result_file);

        let mut args = vec![result, OsString::from("JSONSolDetail=1")];
        if let Some(limit) = self.time_limit {
            args.push(format!("TimeLimit={limit}").into());
        }
        if let Some(threads) = self.threads {
            args.push(format!("Threads={threads}").into());
        }
        args.extend(self.params.iter().map(|(k, v)| OsString::from(format!("{k}={v}"))));
        args.push(lp_file.as_os_str().to_owned());
        args
    }
}

/// The values read back from a solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub status: SolutionStatus,
    pub objective: Option<f64>,
    /// Indexed by variable.
    pub primal: Vec<Option<f64>>,
    /// Indexed by constraint.
    pub dual: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SolutionFile {
    solution_info: SolutionInfo,
    #[serde(default)]
    vars: Vec<VarRecord>,
    #[serde(default)]
    constrs: Vec<ConstrRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SolutionInfo {
    status: i32,
    #[serde(default)]
    obj_val: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct VarRecord {
    var_name: String,
    #[serde(default)]
    x: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ConstrRecord {
    constr_name: String,
    #[serde(default)]
    pi: Option<f64>,
}

impl Solution {
    /// A solution with no values.
    pub fn empty(status: SolutionStatus, names: &LpNames) -> Self {
        Self {
            status,
            objective: None,
            primal: vec![None; names.variables.len()],
            dual: vec![None; names.constraints.len()],
        }
    }

    /// Parse a Gurobi JSON solution file, matching records to the model through `names`.
    pub fn from_json(text: &str, names: &LpNames) -> Result<Self, MipError> {
        let file: SolutionFile = serde_json::from_str(text)?;
        let mut solution = Self::empty(
            SolutionStatus::from_code(file.solution_info.status)?,
            names,
        );
        solution.objective = file.solution_info.obj_val;

        fill(
            &mut solution.primal,
            &names.variables,
            file.vars.into_iter().map(|v| (v.var_name, v.x)),
        );
        fill(
            &mut solution.dual,
            &names.constraints,
            file.constrs.into_iter().map(|c| (c.constr_name, c.pi)),
        );
        Ok(solution)
    }
}

fn fill(
    slots: &mut [Option<f64>],
    names: &[String],
    records: impl Iterator<Item = (String, Option<f64>)>,
) {
    let index: HashMap<&str, usize> = names
        .iter()
        .enumerate()
        .map(|(i, n)| (n.as_str(), i))
        .collect();
    for (name, value) in records {
        match index.get(name.as_str()) {
            Some(&i) => slots[i] = value,
            None => tracing::warn!(name = %name, "solver reported an unknown entity"),
        }
    }
}

/// [`MipOptimizer`] backed by the `gurobi_cl` program.
#[derive(Debug, Default)]
pub struct GurobiCli {
    config: GurobiConfig,
    model: Model,
    solution: Option<Solution>,
}

impl GurobiCli {
    pub fn new(config: GurobiConfig) -> Self {
        Self {
            config,
            model: Model::new(),
            solution: None,
        }
    }

    pub fn config(&self) -> &GurobiConfig {
        &self.config
    }

    /// The values read back by the last solve.
    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    fn run(&self, dir: &Path) -> Result<Solution, MipError> {
        let lp_file = dir.join(LP_FILE);
        let result_file = dir.join(RESULT_FILE);
        match std::fs::remove_file(&result_file) {
            Err(err) if err.kind() != ErrorKind::NotFound => return Err(err.into()),
            _ => {}
        }

        lp::export_lp(&self.model, &lp_file)?;
        let names = LpNames::new(&self.model);

        let args = self.config.command_args(&lp_file, &result_file);
        tracing::info!(
            binary = %self.config.binary.display(),
            ?args,
            variables = names.variables.len(),
            constraints = names.constraints.len(),
            "running gurobi"
        );

        let output = Command::new(&self.config.binary)
            .args(&args)
            .output()
            .map_err(|source| match source.kind() {
                ErrorKind::NotFound | ErrorKind::PermissionDenied => MipError::SolverUnavailable {
                    binary: self.config.binary.clone(),
                    source,
                },
                _ => MipError::Io(source),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            tracing::warn!(code = ?output.status.code(), %stderr, "gurobi exited unsuccessfully");
            return Err(MipError::SolverFailed {
                code: output.status.code(),
                stderr,
            });
        }

        match std::fs::read_to_string(&result_file) {
            Ok(text) => Solution::from_json(&text, &names),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::warn!(path = %result_file.display(), "gurobi wrote no result file");
                Ok(Solution::empty(SolutionStatus::Loaded, &names))
            }
            Err(err) => Err(err.into()),
        }
    }
}

impl MipOptimizer for GurobiCli {
    fn name(&self) -> &'static str {
        "gurobi_cl"
    }

    fn model(&self) -> &Model {
        &self.model
    }

    fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    fn solve(&mut self) -> Result<SolutionStatus, MipError> {
        self.solution = None;
        let solution = match &self.config.work_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                let solution = self.run(dir);
                if !self.config.keep_files {
                    // Best effort. Failing to clean up does not invalidate the solve.
                    let _ = std::fs::remove_file(dir.join(LP_FILE));
                    let _ = std::fs::remove_file(dir.join(RESULT_FILE));
                }
                solution?
            }
            None => {
                let dir = tempfile::tempdir()?;
                self.run(dir.path())?
            }
        };

        let status = solution.status;
        tracing::info!(%status, objective = ?solution.objective, "gurobi finished");
        self.solution = Some(solution);
        Ok(status)
    }

    fn status(&self) -> SolutionStatus {
        self.solution
            .as_ref()
            .map_or(SolutionStatus::Loaded, |s| s.status)
    }

    fn primal_value(&self, variable: Variable) -> Result<f64, MipError> {
        self.model.variable(variable)?;
        self.solution
            .as_ref()
            .and_then(|s| s.primal.get(variable.index()).copied().flatten())
            .ok_or(MipError::NoSolution(self.status()))
    }

    fn dual_value(&self, constraint: Constraint) -> Result<f64, MipError> {
        let def = self.model.constraint(constraint)?;
        let solution = self
            .solution
            .as_ref()
            .ok_or(MipError::NoSolution(self.status()))?;
        solution
            .dual
            .get(constraint.index())
            .copied()
            .flatten()
            .ok_or_else(|| MipError::DualUnavailable(def.name.clone()))
    }

    fn objective_value(&self) -> Result<f64, MipError> {
        self.solution
            .as_ref()
            .and_then(|s| s.objective)
            .ok_or(MipError::NoSolution(self.status()))
    }
}
