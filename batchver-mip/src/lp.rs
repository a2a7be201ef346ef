/*
 * Copyright (c) Microsoft Corporation.
 * Licensed under the MIT license.
 */

//! Writer for the CPLEX LP text format, which every mainstream MIP solver reads.

use std::{
    collections::HashSet,
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::{model::LinExpr, MipError, Model, ObjectiveSense, VarType};

/// Terms written per line before wrapping.
const TERMS_PER_LINE: usize = 8;

const KEYWORDS: &[&str] = &[
    "min", "minimize", "minimum", "max", "maximize", "maximum", "st", "s.t.", "subject", "such",
    "bound", "bounds", "bin", "binary", "binaries", "gen", "general", "generals", "free", "inf",
    "infinity", "end", "obj",
];

/// The identifiers used for variables and constraints in the LP file.
///
/// A model name is kept when it is a valid LP identifier and unique among its kind. Otherwise
/// the entity is written as `x<index>` (variables) or `c<index>` (constraints).
#[derive(Debug, Clone, PartialEq)]
pub struct LpNames {
    pub variables: Vec<String>,
    pub constraints: Vec<String>,
}

impl LpNames {
    pub fn new(model: &Model) -> Self {
        Self {
            variables: assign_names(model.variable_defs().iter().map(|v| v.name.as_str()), 'x'),
            constraints: assign_names(
                model.constraint_defs().iter().map(|c| c.name.as_str()),
                'c',
            ),
        }
    }
}

fn assign_names<'a>(names: impl ExactSizeIterator<Item = &'a str>, prefix: char) -> Vec<String> {
    let names: Vec<&str> = names.collect();
    let mut taken: HashSet<String> = HashSet::with_capacity(names.len());
    let mut out: Vec<Option<String>> = vec![None; names.len()];

    // Valid names claim their identifier first so generated fallbacks never shadow them.
    for (slot, name) in std::iter::zip(out.iter_mut(), names.iter()) {
        if is_valid_name(name) && taken.insert(name.to_string()) {
            *slot = Some(name.to_string());
        }
    }

    out.into_iter()
        .enumerate()
        .map(|(i, slot)| {
            slot.unwrap_or_else(|| {
                let mut candidate = format!("{prefix}{i}");
                while !taken.insert(candidate.clone()) {
                    candidate.push('_');
                }
                candidate
            })
        })
        .collect()
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    name.len() <= 255
        && (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || "_.[]".contains(c))
        && !KEYWORDS.contains(&name.to_ascii_lowercase().as_str())
        && !looks_like_exponent(name)
}

/// `e1` or `Ee` would read as the exponent of a preceding coefficient.
fn looks_like_exponent(name: &str) -> bool {
    match name.as_bytes() {
        [b'e' | b'E', next, ..] => next.is_ascii_digit() || matches!(next, b'e' | b'E'),
        _ => false,
    }
}

fn number(value: f64) -> String {
    if value == f64::INFINITY {
        "+inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        format!("{value}")
    }
}

fn write_terms<W: Write>(
    writer: &mut W,
    expr: &LinExpr,
    names: &[String],
) -> Result<(), MipError> {
    for (i, (variable, coefficient)) in expr.terms.iter().enumerate() {
        if i > 0 && i % TERMS_PER_LINE == 0 {
            write!(writer, "\n  ")?;
        }
        let sign = if *coefficient < 0.0 { "-" } else { "+" };
        let name = names
            .get(variable.index())
            .ok_or(MipError::UnknownVariable(variable.index()))?;
        if i == 0 && sign == "+" {
            write!(writer, " {} {}", number(coefficient.abs()), name)?;
        } else {
            write!(writer, " {} {} {}", sign, number(coefficient.abs()), name)?;
        }
    }
    Ok(())
}

/// Write `model` in LP format.
pub fn write_lp<W: Write>(model: &Model, writer: &mut W) -> Result<(), MipError> {
    let names = LpNames::new(model);
    writeln!(writer, "\\ Written by batchver-mip")?;

    let sense = model.objective().map(|o| o.sense).unwrap_or_default();
    match sense {
        ObjectiveSense::Minimize => writeln!(writer, "Minimize")?,
        ObjectiveSense::Maximize => writeln!(writer, "Maximize")?,
    }
    write!(writer, " obj:")?;
    let objective = model
        .objective()
        .map(|o| o.expr.normalized())
        .unwrap_or_default();
    write_terms(writer, &objective, &names.variables)?;
    if objective.constant != 0.0 || objective.terms.is_empty() {
        let sign = if objective.constant < 0.0 { "-" } else { "+" };
        write!(writer, " {} {}", sign, number(objective.constant.abs()))?;
    }
    writeln!(writer)?;

    writeln!(writer, "Subject To")?;
    for (def, name) in std::iter::zip(model.constraint_defs(), names.constraints.iter()) {
        let mut expr = def.constraint.expr.normalized();
        if expr.terms.is_empty() {
            // LP rows need at least one variable.
            let first = model
                .variables()
                .next()
                .ok_or_else(|| MipError::EmptyConstraint(def.name.clone()))?;
            expr.add_term(first, 0.0);
        }
        write!(writer, " {}:", name)?;
        write_terms(writer, &expr, &names.variables)?;
        writeln!(
            writer,
            " {} {}",
            def.constraint.comparison.as_str(),
            number(def.constraint.rhs - expr.constant)
        )?;
    }

    writeln!(writer, "Bounds")?;
    for (def, name) in std::iter::zip(model.variable_defs(), names.variables.iter()) {
        if def.lb == f64::NEG_INFINITY && def.ub == f64::INFINITY {
            writeln!(writer, " {} free", name)?;
        } else {
            writeln!(writer, " {} <= {} <= {}", number(def.lb), name, number(def.ub))?;
        }
    }

    for (header, vtype) in [("Binaries", VarType::Binary), ("Generals", VarType::Integer)] {
        let selected: Vec<&str> = std::iter::zip(model.variable_defs(), names.variables.iter())
            .filter(|(def, _)| def.vtype == vtype)
            .map(|(_, name)| name.as_str())
            .collect();
        if selected.is_empty() {
            continue;
        }
        writeln!(writer, "{}", header)?;
        for line in selected.chunks(TERMS_PER_LINE) {
            writeln!(writer, " {}", line.join(" "))?;
        }
    }

    writeln!(writer, "End")?;
    Ok(())
}

/// Append `.lp` to `path` when it has no extension.
pub fn lp_path(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        let mut path = path.as_os_str().to_owned();
        path.push(".lp");
        PathBuf::from(path)
    }
}

/// Write `model` to the LP file at `path`, returning the path actually written.
pub fn export_lp(model: &Model, path: &Path) -> Result<PathBuf, MipError> {
    let path = lp_path(path);
    let mut writer = BufWriter::new(File::create(&path)?);
    write_lp(model, &mut writer)?;
    writer.flush()?;
    tracing::debug!(path = %path.display(), "exported model");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bound, LinExpr};

    fn render(model: &Model) -> String {
        let mut buf = Vec::new();
        write_lp(model, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_knapsack() {
        let mut model = Model::new();
        let a = model.add_variable(0.0, 1.0, VarType::Binary, "a").unwrap();
        let b = model.add_variable(0.0, 1.0, VarType::Binary, "b").unwrap();
        let n = model.add_variable(0.0, 4.0, VarType::Integer, "n").unwrap();
        let s = model
            .add_variable(f64::NEG_INFINITY, f64::INFINITY, VarType::Continuous, "s")
            .unwrap();
        model
            .set_objective(
                LinExpr::new().term(a, 3.0).term(b, 2.5).term(n, -1.0).with_constant(1.0),
                ObjectiveSense::Maximize,
            )
            .unwrap();
        model
            .add_constraint(LinExpr::new().term(a, 2.0).term(b, 1.0).leq(2.0), "cap")
            .unwrap();
        model
            .add_constraint(
                LinExpr::from(n).term(s, -1.0).with_constant(2.0).equals(5.0),
                "link",
            )
            .unwrap();
        model.set_variable_bound(s, Bound::Lower, -10.0).unwrap();

        let expected = "\\ Written by batchver-mip
Maximize
 obj: 3 a + 2.5 b - 1 n + 1
Subject To
 cap: 2 a + 1 b <= 2
 link: 1 n - 1 s = 3
Bounds
 0 <= a <= 1
 0 <= b <= 1
 0 <= n <= 4
 -10 <= s <= +inf
Binaries
 a b
Generals
 n
End
";
        assert_eq!(render(&model), expected);
    }

    #[test]
    fn test_names_are_sanitized() {
        let mut model = Model::new();
        model.add_variable(0.0, 1.0, VarType::Continuous, "ok").unwrap();
        model.add_variable(0.0, 1.0, VarType::Continuous, "has space").unwrap();
        model.add_variable(0.0, 1.0, VarType::Continuous, "ok").unwrap();
        model.add_variable(0.0, 1.0, VarType::Continuous, "").unwrap();
        model.add_variable(0.0, 1.0, VarType::Continuous, "x1").unwrap();
        model.add_variable(0.0, 1.0, VarType::Continuous, "free").unwrap();
        model.add_variable(0.0, 1.0, VarType::Continuous, "9lives").unwrap();

        let names = LpNames::new(&model);
        assert_eq!(
            names.variables,
            vec!["ok", "x1_", "x2", "x3", "x1", "x5", "x6"]
        );
    }

    #[test]
    fn test_exponent_like_names_are_replaced() {
        let mut model = Model::new();
        for name in ["e1", "Ee", "e", "eta", "E2x"] {
            model.add_variable(0.0, 1.0, VarType::Continuous, name).unwrap();
        }
        let x = model.variable_by_name("e1").unwrap();
        model
            .add_constraint(LinExpr::new().term(x, 3.0).leq(1.0), "e3")
            .unwrap();

        let names = LpNames::new(&model);
        assert_eq!(names.variables, vec!["x0", "x1", "e", "eta", "x4"]);
        assert_eq!(names.constraints, vec!["c0"]);

        let lp = render(&model);
        assert!(lp.contains(" c0: 3 x0 <= 1"), "{lp}");
        assert!(!lp.contains("e1"), "{lp}");
    }

    #[test]
    fn test_empty_model() {
        let model = Model::new();
        assert_eq!(
            render(&model),
            "\\ Written by batchver-mip\nMinimize\n obj: + 0\nSubject To\nBounds\nEnd\n"
        );
    }

    #[test]
    fn test_constant_only_constraint() {
        let mut model = Model::new();
        let x = model.add_variable(0.0, 1.0, VarType::Continuous, "x").unwrap();
        model
            .add_constraint(LinExpr::new().term(x, 0.0).with_constant(1.0).geq(2.0), "k")
            .unwrap();
        assert!(render(&model).contains(" k: 0 x >= 1\n"));

        let mut empty = Model::new();
        empty.add_constraint(LinExpr::new().geq(1.0), "k").unwrap();
        let mut buf = Vec::new();
        assert!(matches!(
            write_lp(&empty, &mut buf),
            Err(MipError::EmptyConstraint(name)) if name == "k"
        ));
    }

    #[test]
    fn test_long_rows_wrap() {
        let mut model = Model::new();
        let vars: Vec<_> = (0..10)
            .map(|i| {
                model
                    .add_variable(0.0, 1.0, VarType::Binary, &format!("v{i}"))
                    .unwrap()
            })
            .collect();
        model
            .add_constraint(vars.iter().map(|&v| (v, 1.0)).collect::<LinExpr>().leq(3.0), "pick")
            .unwrap();
        let lp = render(&model);
        assert!(lp.contains(
            " pick: 1 v0 + 1 v1 + 1 v2 + 1 v3 + 1 v4 + 1 v5 + 1 v6 + 1 v7\n   + 1 v8 + 1 v9 <= 3\n"
        ));
        assert!(lp.contains("Binaries\n v0 v1 v2 v3 v4 v5 v6 v7\n v8 v9\n"));
    }

    #[test]
    fn test_lp_path() {
        assert_eq!(lp_path(Path::new("out/model")), PathBuf::from("out/model.lp"));
        assert_eq!(lp_path(Path::new("model.lp")), PathBuf::from("model.lp"));
        assert_eq!(lp_path(Path::new("model.mps")), PathBuf::from("model.mps"));
    }
}
