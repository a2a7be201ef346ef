/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};

use batchver_mip::{GurobiCli, GurobiConfig, MipOptimizer};
use batchver_tools::utils::{init_subscriber, CMDResult, ModelDescription, SolveReport};
use clap::Parser;

fn main() -> CMDResult<()> {
    init_subscriber();
    let args = SolveMipModelArgs::parse();

    let config = match &args.config {
        Some(path) => GurobiConfig::from_json_file(path)?,
        None => GurobiConfig::default(),
    };
    let description = ModelDescription::from_json_file(&args.model_file)?;

    let mut solver: Box<dyn MipOptimizer> = Box::new(GurobiCli::new(config));
    let variables = description.build(solver.as_mut())?;

    if let Some(path) = &args.export_lp {
        let written = solver.export_model(path)?;
        tracing::info!(path = %written.display(), "exported model");
    }

    let status = solver.solve()?;
    tracing::info!("{} finished with status {}", solver.name(), status);

    let report = SolveReport::collect(solver.as_ref(), &variables)?;
    match &args.output_file {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut writer, &report)?;
            writer.flush()?;
        }
        None => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

#[derive(Debug, Parser)]
struct SolveMipModelArgs {
    /// JSON description of the model
    #[arg(long = "model_file", required = true)]
    pub model_file: PathBuf,

    /// JSON solver configuration (binary, work_dir, time_limit, threads, params, keep_files)
    #[arg(long = "config", default_value = None)]
    pub config: Option<PathBuf>,

    /// Also write the model as an LP file. '.lp' is appended when there is no extension
    #[arg(long = "export_lp", default_value = None)]
    pub export_lp: Option<PathBuf>,

    /// Where to write the JSON report. Defaults to stdout
    #[arg(long = "output_file", default_value = None)]
    pub output_file: Option<PathBuf>,
}
