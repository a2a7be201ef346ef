/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use serde::{Deserialize, Serialize};

use crate::MipError;

/// The outcome of the last solve, in the vocabulary every backend must report.
///
/// The discriminants are Gurobi's optimization status codes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum SolutionStatus {
    /// The model has not been solved yet.
    #[default]
    Loaded = 1,
    Optimal = 2,
    Infeasible = 3,
    InfeasibleOrUnbounded = 4,
    Unbounded = 5,
    CutOff = 6,
    IterationLimit = 7,
    NodeLimit = 8,
    TimeLimit = 9,
    SolutionLimit = 10,
    Interrupted = 11,
    Numeric = 12,
    SubOptimal = 13,
    InProgress = 14,
    UserObjLimit = 15,
    WorkLimit = 16,
    MemoryLimit = 17,
}

impl SolutionStatus {
    /// Every status, ordered by code.
    pub const ALL: [SolutionStatus; 17] = [
        SolutionStatus::Loaded,
        SolutionStatus::Optimal,
        SolutionStatus::Infeasible,
        SolutionStatus::InfeasibleOrUnbounded,
        SolutionStatus::Unbounded,
        SolutionStatus::CutOff,
        SolutionStatus::IterationLimit,
        SolutionStatus::NodeLimit,
        SolutionStatus::TimeLimit,
        SolutionStatus::SolutionLimit,
        SolutionStatus::Interrupted,
        SolutionStatus::Numeric,
        SolutionStatus::SubOptimal,
        SolutionStatus::InProgress,
        SolutionStatus::UserObjLimit,
        SolutionStatus::WorkLimit,
        SolutionStatus::MemoryLimit,
    ];

    /// Translate a Gurobi status code.
    ///
    /// Codes outside `1..=17` are reported as [`MipError::UnknownStatusCode`].
    pub fn from_code(code: i32) -> Result<Self, MipError> {
        let status = match code {
            1 => SolutionStatus::Loaded,
            2 => SolutionStatus::Optimal,
            3 => SolutionStatus::Infeasible,
            4 => SolutionStatus::InfeasibleOrUnbounded,
            5 => SolutionStatus::Unbounded,
            6 => SolutionStatus::CutOff,
            7 => SolutionStatus::IterationLimit,
            8 => SolutionStatus::NodeLimit,
            9 => SolutionStatus::TimeLimit,
            10 => SolutionStatus::SolutionLimit,
            11 => SolutionStatus::Interrupted,
            12 => SolutionStatus::Numeric,
            13 => SolutionStatus::SubOptimal,
            14 => SolutionStatus::InProgress,
            15 => SolutionStatus::UserObjLimit,
            16 => SolutionStatus::WorkLimit,
            17 => SolutionStatus::MemoryLimit,
            _ => return Err(MipError::UnknownStatusCode(code)),
        };
        Ok(status)
    }

    /// The Gurobi status code.
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Human readable label.
    pub const fn label(self) -> &'static str {
        match self {
            SolutionStatus::Loaded => "Loaded",
            SolutionStatus::Optimal => "Optimal",
            SolutionStatus::Infeasible => "Infeasible",
            SolutionStatus::InfeasibleOrUnbounded => "Infeasible or Unbounded",
            SolutionStatus::Unbounded => "Unbounded",
            SolutionStatus::CutOff => "CutOff",
            SolutionStatus::IterationLimit => "IterationLimit",
            SolutionStatus::NodeLimit => "NodeLimit",
            SolutionStatus::TimeLimit => "TimeLimit",
            SolutionStatus::SolutionLimit => "SolutionLimit",
            SolutionStatus::Interrupted => "Interrupted",
            SolutionStatus::Numeric => "Numeric",
            SolutionStatus::SubOptimal => "SubOptimal",
            SolutionStatus::InProgress => "InProgress",
            SolutionStatus::UserObjLimit => "UserObjLimit",
            SolutionStatus::WorkLimit => "WorkLimit",
            SolutionStatus::MemoryLimit => "MemoryLimit",
        }
    }

    /// Whether the status guarantees a feasible primal solution.
    ///
    /// Limit statuses may still carry an incumbent; backends report it when present.
    pub const fn has_solution(self) -> bool {
        matches!(
            self,
            SolutionStatus::Optimal | SolutionStatus::SubOptimal | SolutionStatus::SolutionLimit
        )
    }
}

impl std::fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<i32> for SolutionStatus {
    type Error = MipError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}
