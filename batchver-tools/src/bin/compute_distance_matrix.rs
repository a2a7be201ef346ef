/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */
use std::path::PathBuf;

use batchver_similarity::{NormKind, DEFAULT_CHUNK_SIZE};
use batchver_tools::utils::{
    compute_distance_matrix_from_file, init_subscriber, Backend, CMDResult,
};
use clap::Parser;

fn main() -> CMDResult<()> {
    init_subscriber();
    let args = ComputeDistanceMatrixArgs::parse();

    let backend = if args.threaded {
        Backend::Threaded
    } else {
        Backend::Scalar
    };

    match compute_distance_matrix_from_file(
        &args.data_file,
        &args.output_file,
        args.norm,
        args.chunk_size,
        backend,
    ) {
        Ok(()) => {
            tracing::info!("Distance matrix computed successfully");
            Ok(())
        }
        Err(err) => {
            tracing::error!("Error: {}", err);
            Err(err)
        }
    }
}

#[derive(Debug, Parser)]
struct ComputeDistanceMatrixArgs {
    /// File containing the vectors in binary format
    #[arg(long = "data_file", required = true)]
    pub data_file: PathBuf,

    /// Path of the file to write the N x N distance matrix to in binary format
    #[arg(long = "output_file", required = true)]
    pub output_file: PathBuf,

    /// Norm of the difference between two vectors <l0/l1/l2/linf>
    #[arg(long = "norm", default_value = "l1")]
    pub norm: NormKind,

    /// Number of vectors per tile along each axis. Bounds memory, not the result
    #[arg(long = "chunk_size", default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Spread each tile over all cores
    #[arg(long = "threaded", default_value_t = false)]
    pub threaded: bool,
}
