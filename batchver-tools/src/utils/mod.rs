/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */
pub mod cmd_tool_error;
pub use cmd_tool_error::*;

pub type CMDResult<T> = Result<T, CMDToolError>;

pub mod tracing;
pub use tracing::{init_subscriber, init_test_subscriber};

pub mod random_data_generator;
pub use random_data_generator::*;

pub mod distance_matrix;
pub use distance_matrix::*;

pub mod ranking;
pub use ranking::*;

pub mod mip_model;
pub use mip_model::*;

pub mod test_utils;
pub use test_utils::*;
