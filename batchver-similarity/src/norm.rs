/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

use std::str::FromStr;

use batchver_linalg::ArrayBackend;
use batchver_utils::MutMatrixView;
use serde::{Deserialize, Serialize};

use crate::SimilarityError;

/// The norm applied to the difference of two vectors.
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum NormKind {
    /// Number of coordinates that differ.
    #[serde(rename = "l0")]
    L0,
    /// Sum of absolute differences (Manhattan).
    #[default]
    #[serde(rename = "l1")]
    L1,
    /// Square root of the sum of squared differences (Euclidean).
    #[serde(rename = "l2")]
    L2,
    /// Largest absolute difference (Chebyshev).
    #[serde(rename = "linf", alias = "l∞", alias = "inf")]
    LInf,
}

impl NormKind {
    /// Every supported norm, in declaration order.
    pub const ALL: [NormKind; 4] = [NormKind::L0, NormKind::L1, NormKind::L2, NormKind::LInf];

    /// Returns the string representation of the norm.
    pub const fn as_str(self) -> &'static str {
        match self {
            NormKind::L0 => "l0",
            NormKind::L1 => "l1",
            NormKind::L2 => "l2",
            NormKind::LInf => "linf",
        }
    }

    /// Collapse each row of the difference tile `diff` into one distance in `out`.
    ///
    /// `diff` is clobbered. `out.len()` must equal `diff.nrows()`.
    pub fn reduce<B>(self, backend: &B, mut diff: MutMatrixView<'_, f32>, out: &mut [f32])
    where
        B: ArrayBackend + ?Sized,
    {
        match self {
            NormKind::L0 => backend.count_nonzero_last_axis(diff.as_view(), out),
            NormKind::L1 => {
                backend.abs(diff.as_mut_slice());
                backend.sum_last_axis(diff.as_view(), out);
            }
            NormKind::L2 => {
                backend.square(diff.as_mut_slice());
                backend.sum_last_axis(diff.as_view(), out);
                backend.sqrt(out);
            }
            NormKind::LInf => {
                backend.abs(diff.as_mut_slice());
                backend.max_last_axis(diff.as_view(), out);
            }
        }
    }

    /// Evaluate the distance between two vectors directly, without tiling.
    ///
    /// # Panics
    ///
    /// Panics if `x` and `y` have different lengths.
    pub fn evaluate(self, x: &[f32], y: &[f32]) -> f32 {
        assert_eq!(
            x.len(),
            y.len(),
            "vectors have different lengths {} and {}",
            x.len(),
            y.len()
        );
        let diffs = std::iter::zip(x, y).map(|(x, y)| x - y);
        match self {
            NormKind::L0 => diffs.filter(|d| *d != 0.0).count() as f32,
            NormKind::L1 => diffs.map(f32::abs).sum(),
            NormKind::L2 => diffs.map(|d| d * d).sum::<f32>().sqrt(),
            NormKind::LInf => diffs.map(f32::abs).fold(0.0, |acc: f32, d| {
                if acc.is_nan() || d.is_nan() {
                    f32::NAN
                } else {
                    acc.max(d)
                }
            }),
        }
    }
}

impl std::fmt::Display for NormKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NormKind {
    type Err = SimilarityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "l0" => Ok(NormKind::L0),
            "l1" => Ok(NormKind::L1),
            "l2" => Ok(NormKind::L2),
            "linf" | "l∞" | "inf" => Ok(NormKind::LInf),
            _ => Err(SimilarityError::UnsupportedNorm(String::from(s))),
        }
    }
}

impl TryFrom<&str> for NormKind {
    type Error = SimilarityError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use batchver_linalg::Scalar;
    use batchver_utils::Matrix;
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_norm_from_str() {
        assert_eq!(NormKind::from_str("l0").unwrap(), NormKind::L0);
        assert_eq!(NormKind::from_str("l1").unwrap(), NormKind::L1);
        assert_eq!(NormKind::from_str("L2").unwrap(), NormKind::L2);
        assert_eq!(NormKind::from_str("linf").unwrap(), NormKind::LInf);
        assert_eq!(NormKind::from_str("l∞").unwrap(), NormKind::LInf);
        assert_eq!(NormKind::from_str(" inf ").unwrap(), NormKind::LInf);
        assert_eq!(
            NormKind::from_str("l3").unwrap_err(),
            SimilarityError::UnsupportedNorm(String::from("l3"))
        );
        assert_eq!(
            NormKind::try_from("cosine").unwrap_err().to_string(),
            "unsupported norm \"cosine\": expected one of l0, l1, l2, linf"
        );
    }

    #[test]
    fn test_display_round_trips() {
        for norm in NormKind::ALL {
            assert_eq!(norm.to_string().parse::<NormKind>().unwrap(), norm);
        }
        assert_eq!(NormKind::default(), NormKind::L1);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&NormKind::LInf).unwrap(), "\"linf\"");
        let parsed: Vec<NormKind> = serde_json::from_str(r#"["l0", "l1", "l2", "inf"]"#).unwrap();
        assert_eq!(parsed, NormKind::ALL);
        assert!(serde_json::from_str::<NormKind>("\"l3\"").is_err());
    }

    #[rstest]
    #[case(NormKind::L0, 2.0)]
    #[case(NormKind::L1, 7.0)]
    #[case(NormKind::L2, 5.0)]
    #[case(NormKind::LInf, 4.0)]
    fn test_evaluate(#[case] norm: NormKind, #[case] expected: f32) {
        assert_eq!(norm.evaluate(&[0.0, 0.0], &[3.0, 4.0]), expected);
        assert_eq!(norm.evaluate(&[3.0, 4.0], &[0.0, 0.0]), expected);
        assert_eq!(norm.evaluate(&[3.0, 4.0], &[3.0, 4.0]), 0.0);
        assert_eq!(norm.evaluate(&[], &[]), 0.0);
    }

    #[rstest]
    fn test_reduce_matches_evaluate(
        #[values(NormKind::L0, NormKind::L1, NormKind::L2, NormKind::LInf)] norm: NormKind,
    ) {
        let rows: [[f32; 3]; 3] = [[1.0, -2.0, 0.0], [0.0, 0.0, 0.0], [-0.5, 4.0, 2.0]];
        let mut diff = Matrix::from_vec(rows.iter().flatten().copied().collect(), 3, 3).unwrap();
        let mut out = [0.0f32; 3];
        norm.reduce(&Scalar, diff.as_mut_view(), &mut out);

        for (row, got) in std::iter::zip(rows.iter(), out.iter()) {
            assert_eq!(*got, norm.evaluate(row, &[0.0; 3]), "norm {norm}");
        }
    }

    #[rstest]
    fn test_nan_agrees_with_reduce(
        #[values(NormKind::L0, NormKind::L1, NormKind::L2, NormKind::LInf)] norm: NormKind,
    ) {
        let (x, y) = ([f32::NAN, 0.0], [1.0, 3.0]);
        let mut diff = Matrix::from_vec(vec![x[0] - y[0], x[1] - y[1]], 1, 2).unwrap();
        let mut out = [0.0f32; 1];
        norm.reduce(&Scalar, diff.as_mut_view(), &mut out);

        let direct = norm.evaluate(&x, &y);
        match norm {
            NormKind::L0 => assert_eq!((out[0], direct), (2.0, 2.0)),
            _ => assert!(
                out[0].is_nan() && direct.is_nan(),
                "norm {norm}: {} vs {direct}",
                out[0]
            ),
        }
    }
}
