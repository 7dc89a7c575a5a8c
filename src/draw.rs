//! Text diagrams of a recorded circuit.
//!
//! Time runs down the page, one column per wire. Controls are drawn as `C` (or `c` when the
//! control is on `|0>`), targets as `O`, swapped wires as `A` and `B`, measurements as `M` and
//! other single wire ops as `o`. Wires spanned by an op are joined with `-`.

use crate::builder::{
    BuilderCircuitObject, BuilderCircuitObjectType, LocalBuilder, UnitaryMatrixObject,
};
use crate::builder_traits::CircuitBuilder;
use crate::types::Precision;
use std::fmt::Write;

/// Marker for each wire touched by `obj` acting on `indices`.
fn markers<P: Precision>(indices: &[usize], obj: &BuilderCircuitObject<P>) -> Vec<(usize, char)> {
    match obj.object() {
        BuilderCircuitObjectType::Measurement(_) => indices.iter().map(|i| (*i, 'M')).collect(),
        BuilderCircuitObjectType::Unitary(u) => match u {
            UnitaryMatrixObject::CNOT | UnitaryMatrixObject::CPhase(_) => indices
                .iter()
                .enumerate()
                .map(|(k, i)| (*i, if k == 0 { 'C' } else { 'O' }))
                .collect(),
            UnitaryMatrixObject::SWAP => indices
                .iter()
                .enumerate()
                .map(|(k, i)| (*i, if k == 0 { 'A' } else { 'B' }))
                .collect(),
            UnitaryMatrixObject::MCX(values) => indices
                .iter()
                .enumerate()
                .map(|(k, i)| match values.get(k) {
                    Some(true) => (*i, 'C'),
                    Some(false) => (*i, 'c'),
                    None => (*i, 'O'),
                })
                .collect(),
            UnitaryMatrixObject::X
            | UnitaryMatrixObject::Z
            | UnitaryMatrixObject::H
            | UnitaryMatrixObject::Phase(_)
            | UnitaryMatrixObject::GlobalPhase(_) => indices.iter().map(|i| (*i, 'o')).collect(),
        },
    }
}

fn push_row(
    out: &mut String,
    n: usize,
    width: usize,
    cells: &[(usize, char)],
    name: Option<&str>,
) {
    let lower = cells.iter().map(|(i, _)| *i).min().unwrap_or(n);
    let upper = cells.iter().map(|(i, _)| *i).max().unwrap_or(0);
    let mut line = String::new();
    for wire in 0..n {
        let marker = cells
            .iter()
            .find(|(i, _)| *i == wire)
            .map(|(_, c)| *c)
            .unwrap_or('|');
        let conn = if lower <= wire && wire < upper { '-' } else { ' ' };
        line.push(marker);
        (0..width).for_each(|_| line.push(conn));
    }
    let line = line.trim_end();
    match name {
        Some(name) => {
            let _ = writeln!(out, "{}\t{}", line, name);
        }
        None => {
            let _ = writeln!(out, "{}", line);
        }
    }
}

fn push_spacer(out: &mut String, n: usize, width: usize) {
    push_row(out, n, width, &[], None)
}

/// Render a pipeline over `n` wires.
pub fn draw_pipeline<P: Precision>(
    n: usize,
    pipeline: &[(Vec<usize>, BuilderCircuitObject<P>)],
) -> String {
    let width = n.saturating_sub(1).to_string().len();
    let mut out = String::new();
    let mut header = String::new();
    for wire in 0..n {
        let _ = write!(header, "{:<w$}", wire, w = width + 1);
    }
    let _ = writeln!(out, "{}", header.trim_end());
    push_spacer(&mut out, n, width);
    for (indices, obj) in pipeline {
        push_row(&mut out, n, width, &markers(indices, obj), Some(obj.name().as_str()));
        push_spacer(&mut out, n, width);
    }
    out
}

/// Render the circuit recorded by `b`.
pub fn draw<P: Precision>(b: &LocalBuilder<P>) -> String {
    draw_pipeline(b.n(), b.pipeline())
}
