/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

pub mod size_constants {
    /// The small dataset size for testing the tools.
    /// A prime number is used to avoid any accidental patterns in the data.
    pub const TEST_DATASET_SIZE_SMALL: usize = 101;

    /// A dataset size that is not a multiple of the default chunk size.
    pub const TEST_DATASET_SIZE_RAGGED_CHUNKS: usize = 131;

    /// The small number of dimensions for testing the tools.
    /// A prime number is used to avoid any accidental patterns in the data.
    pub const TEST_NUM_DIMENSIONS_SMALL: usize = 13;
}
