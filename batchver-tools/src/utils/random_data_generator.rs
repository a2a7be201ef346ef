/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use batchver_utils::{io::Metadata, Matrix};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::utils::{CMDResult, CMDToolError};

/// Rows generated and written at a time.
const BLOCK_SIZE: usize = 131072;

/// Generate `num` vectors of dimension `dimension`, each scaled to have L2 norm `norm`.
///
/// Coordinates are drawn from a standard normal distribution before scaling, so the points are
/// uniformly distributed on the sphere of radius `norm`.
pub fn generate_vectors_with_norm(
    num: usize,
    dimension: usize,
    norm: f32,
    rng: &mut impl Rng,
) -> Matrix<f32> {
    let mut data = Matrix::new(0.0f32, num, dimension);
    for row in data.row_iter_mut() {
        row.iter_mut().for_each(|x| *x = rng.sample(StandardNormal));
        let length = row.iter().map(|x| x * x).sum::<f32>().sqrt();
        if length > 0.0 {
            let scale = norm / length;
            row.iter_mut().for_each(|x| *x *= scale);
        }
    }
    data
}

/// Generate random points on a sphere with the given radius and write them to `output_file`
/// in the binary format.
pub fn write_random_data(
    output_file: &Path,
    number_of_dimensions: usize,
    number_of_vectors: usize,
    radius: f32,
    seed: u64,
) -> CMDResult<()> {
    let writer = BufWriter::new(File::create(output_file)?);
    write_random_data_writer(writer, number_of_dimensions, number_of_vectors, radius, seed)
}

/// Like [`write_random_data`] but writing to an arbitrary sink.
pub fn write_random_data_writer<W: Write>(
    mut writer: W,
    number_of_dimensions: usize,
    number_of_vectors: usize,
    radius: f32,
    seed: u64,
) -> CMDResult<()> {
    if !(radius.is_finite() && radius > 0.0) {
        return Err(CMDToolError::new(format!(
            "radius must be a positive number, got {radius}"
        )));
    }

    let metadata = Metadata::new(number_of_vectors, number_of_dimensions).ok_or_else(|| {
        CMDToolError::new(format!(
            "{number_of_vectors} x {number_of_dimensions} does not fit the binary format"
        ))
    })?;
    metadata.write(&mut writer)?;

    let mut rng = StdRng::seed_from_u64(seed);
    let nblks = number_of_vectors.div_ceil(BLOCK_SIZE);
    tracing::info!(
        npts = number_of_vectors,
        ndims = number_of_dimensions,
        radius,
        blocks = nblks,
        "generating random data"
    );

    for i in 0..nblks {
        let cblk_size = BLOCK_SIZE.min(number_of_vectors - i * BLOCK_SIZE);
        let block = generate_vectors_with_norm(cblk_size, number_of_dimensions, radius, &mut rng);
        writer.write_all(bytemuck::must_cast_slice::<f32, u8>(block.as_slice()))?;
    }

    writer.flush()?;
    Ok(())
}
