/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */
use std::{
    fs::File,
    io::{stdout, BufWriter},
    path::PathBuf,
};

use batchver_tools::utils::{init_subscriber, rank_neighbors_from_file, write_ranking, CMDResult};
use clap::Parser;

fn main() -> CMDResult<()> {
    init_subscriber();
    let args = RankNeighborsArgs::parse();

    let order = rank_neighbors_from_file(&args.distance_file, args.num_clusters)?;
    match &args.output_file {
        Some(path) => {
            write_ranking(&order, &mut BufWriter::new(File::create(path)?))?;
            tracing::info!(path = %path.display(), "wrote ranking of {} points", order.len());
        }
        None => write_ranking(&order, &mut stdout().lock())?,
    }
    Ok(())
}

#[derive(Debug, Parser)]
struct RankNeighborsArgs {
    /// Distance matrix in binary format, as written by compute_distance_matrix
    #[arg(long = "distance_file", required = true)]
    pub distance_file: PathBuf,

    /// Where to write the ranking, one index per line. Defaults to stdout
    #[arg(long = "output_file", default_value = None)]
    pub output_file: Option<PathBuf>,

    /// Number of clusters. Accepted for compatibility; the ranking does not use it
    #[arg(long = "num_clusters", default_value = "2")]
    pub num_clusters: usize,
}
