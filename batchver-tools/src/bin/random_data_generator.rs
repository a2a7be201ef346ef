/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */
use std::path::PathBuf;

use batchver_tools::utils::{init_subscriber, write_random_data, CMDResult, CMDToolError};
use clap::Parser;

#[derive(Debug, Parser)]
struct RandomDataGeneratorArgs {
    /// File name for saving the random vectors
    #[arg(long = "output_file", required = true)]
    pub output_file: PathBuf,

    /// Dimensionality of the vector
    #[arg(long = "ndims", short = 'D', required = true)]
    pub number_of_dimensions: usize,

    /// Number of vectors
    #[arg(long = "npts", short = 'N', required = true)]
    pub number_of_vectors: usize,

    /// Norm of the vectors. Vectors are random points on a sphere and 'norm' is its radius.
    #[arg(long = "norm", default_value = "150")]
    pub norm: f32,

    /// Seed of the random number generator
    #[arg(long = "seed", default_value = "0")]
    pub seed: u64,
}

fn main() -> CMDResult<()> {
    init_subscriber();
    let args = RandomDataGeneratorArgs::parse();

    if args.norm <= 0.0 {
        return Err(CMDToolError::new("Error: Norm must be a positive number"));
    }

    match write_random_data(
        &args.output_file,
        args.number_of_dimensions,
        args.number_of_vectors,
        args.norm,
        args.seed,
    ) {
        Ok(()) => {
            tracing::info!("Successfully generated random data");
            Ok(())
        }
        Err(err) => {
            tracing::error!("Error: {}", err);
            Err(err)
        }
    }
}
