/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::fmt;

use batchver_mip::MipError;
use batchver_similarity::SimilarityError;
use batchver_utils::io::{ReadBinError, SaveBinError};

/// Error returned by the command line programs.
///
/// Library errors are flattened into a message so that `main` can return them directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CMDToolError {
    pub details: String,
}

impl CMDToolError {
    pub fn new(details: impl Into<String>) -> Self {
        Self {
            details: details.into(),
        }
    }
}

impl fmt::Display for CMDToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.details)
    }
}

impl std::error::Error for CMDToolError {}

impl From<std::io::Error> for CMDToolError {
    fn from(err: std::io::Error) -> Self {
        CMDToolError {
            details: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CMDToolError {
    fn from(err: serde_json::Error) -> Self {
        CMDToolError {
            details: format!("invalid JSON: {err}"),
        }
    }
}

impl From<SimilarityError> for CMDToolError {
    fn from(err: SimilarityError) -> Self {
        CMDToolError {
            details: err.to_string(),
        }
    }
}

impl From<MipError> for CMDToolError {
    fn from(err: MipError) -> Self {
        CMDToolError {
            details: err.to_string(),
        }
    }
}

impl From<ReadBinError> for CMDToolError {
    fn from(err: ReadBinError) -> Self {
        CMDToolError {
            details: format!("failed to read binary file: {err}"),
        }
    }
}

impl From<SaveBinError> for CMDToolError {
    fn from(err: SaveBinError) -> Self {
        CMDToolError {
            details: format!("failed to write binary file: {err}"),
        }
    }
}
