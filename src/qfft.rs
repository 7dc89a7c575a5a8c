use crate::builder_traits::{merge_qubits, split_qubits, take_qubit, QubitRegister};
use crate::errors::{CircuitError, CircuitResult};
use crate::inverter::{inverter, RecursiveCircuitBuilder};
use crate::types::Precision;
use tracing::debug;

/// Applies a quantum fourier transform to the register `r`, read most significant qubit first.
///
/// `|x> -> 2^{-n/2} sum_y e^{2 pi i x y / 2^n} |y>`
pub fn qft<P, CB>(b: &mut CB, r: CB::Register) -> CircuitResult<CB::Register>
where
    CB: RecursiveCircuitBuilder<P>,
    P: Precision,
{
    debug!(n = r.n(), "qft");
    let mut rs = split_qubits(b, r);
    let n = rs.len();
    for i in 0..n {
        let mut ri = b.h(take_qubit(&mut rs, i)?);
        for j in i + 1..n {
            let rj = take_qubit(&mut rs, j)?;
            let (rj, new_ri) = b.controlled_phase_shift_pi_by(rj, ri, 1 << (j - i))?;
            ri = new_ri;
            rs[j] = Some(rj);
        }
        rs[i] = Some(ri);
    }
    for i in 0..n / 2 {
        let ib = n - 1 - i;
        let ra = take_qubit(&mut rs, i)?;
        let rb = take_qubit(&mut rs, ib)?;
        let (ra, rb) = b.swap(ra, rb)?;
        rs[i] = Some(ra);
        rs[ib] = Some(rb);
    }
    merge_qubits(b, rs)
}

/// Applies the adjoint of `qft` to the register `r`.
pub fn inverse_qft<P, CB>(b: &mut CB, r: CB::Register) -> CircuitResult<CB::Register>
where
    CB: RecursiveCircuitBuilder<P>,
    P: Precision,
{
    let mut rs = inverter(b, vec![r], |sb, rs| {
        rs.into_iter().map(|r| qft::<P, _>(sb, r)).collect()
    })?;
    rs.pop().ok_or(CircuitError::EmptyRegister)
}
