/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Random data -> distance matrix -> seed ranking, through files, the way the programs chain.

use batchver_similarity::NormKind;
use batchver_tools::utils::{
    compute_distance_matrix_from_file, init_test_subscriber, rank_neighbors_from_file,
    write_random_data, Backend,
};
use batchver_utils::io::load_bin;

#[test]
fn generate_measure_and_rank() {
    let _guard = init_test_subscriber();
    let dir = tempfile::tempdir().unwrap();
    let data_file = dir.path().join("data.bin");
    let distance_file = dir.path().join("distances.bin");

    let (npts, ndims) = (57, 11);
    write_random_data(&data_file, ndims, npts, 100.0, 42).unwrap();
    compute_distance_matrix_from_file(
        &data_file,
        &distance_file,
        NormKind::L2,
        16,
        Backend::Threaded,
    )
    .unwrap();

    let distances = load_bin::<f32>(&distance_file).unwrap();
    assert_eq!((distances.nrows(), distances.ncols()), (npts, npts));

    let order = rank_neighbors_from_file(&distance_file, 4).unwrap();
    assert_eq!(order.len(), npts);
    assert_eq!(order[0], 0);

    let mut sorted = order.clone();
    sorted.sort_unstable();
    assert!(sorted.into_iter().eq(0..npts));

    let reference = distances.row(0);
    assert!(order
        .windows(2)
        .all(|w| reference[w[0]] <= reference[w[1]]));

    // All points lie on a sphere of radius 100, so no two are further apart than 200.
    assert!(distances.as_slice().iter().all(|&d| (0.0..=200.0 + 1e-3).contains(&d)));
}
