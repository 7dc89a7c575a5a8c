//! Arithmetic in the Fourier basis, following Ruiz-Perez et al.,
//! "Quantum arithmetic with the Quantum Fourier Transform" (2017).

use crate::builder::{LocalBuilder, Qudit, StochasticMeasurementHandle};
use crate::builder_traits::*;
use crate::errors::{CircuitError, CircuitResult};
use crate::inverter::{inverter, RecursiveCircuitBuilder};
use crate::qfft::{inverse_qft, qft};
use crate::types::Precision;
use crate::utils::bits_msb_first;
use tracing::debug;

/// Place the classical `value` on `r` (assumed to hold `|0..0>`), most significant bit first.
pub fn set_value<P, CB>(b: &mut CB, r: CB::Register, value: usize) -> CircuitResult<CB::Register>
where
    CB: CliffordTBuilder<P>,
    P: Precision,
{
    let bits = bits_msb_first(value, r.n())?;
    let rs = b
        .split_all_register(r)
        .into_iter()
        .zip(bits)
        .map(|(r, bit)| if bit { b.x(r) } else { r })
        .collect::<Vec<_>>();
    b.merge_registers(rs).ok_or(CircuitError::EmptyRegister)
}

/// Draper adder: `|a>|b> -> |a>|(a+b) mod 2^n>` for two registers of `n` qubits.
pub fn draper_add<P, CB>(
    b: &mut CB,
    ra: CB::Register,
    rb: CB::Register,
) -> CircuitResult<(CB::Register, CB::Register)>
where
    CB: RecursiveCircuitBuilder<P>,
    P: Precision,
{
    let n = rb.n();
    if ra.n() != n {
        return Err(CircuitError::RegisterSizeMismatch {
            expected: n,
            found: ra.n(),
        });
    }
    debug!(n, "draper adder");
    let rb = qft::<P, _>(b, rb)?;

    let mut ras = split_qubits(b, ra);
    let mut rbs = split_qubits(b, rb);
    for j in 0..n {
        let mut target = take_qubit(&mut rbs, n - 1 - j)?;
        for k in 0..n - j {
            let control = take_qubit(&mut ras, j + k)?;
            let (control, new_target) = b.controlled_phase_shift_pi_by(control, target, 1 << k)?;
            target = new_target;
            ras[j + k] = Some(control);
        }
        rbs[n - 1 - j] = Some(target);
    }
    let ra = merge_qubits(b, ras)?;
    let rb = merge_qubits(b, rbs)?;

    let rb = inverse_qft::<P, _>(b, rb)?;
    Ok((ra, rb))
}

/// Adjoint of `draper_add`: `|a>|b> -> |a>|(b-a) mod 2^n>`.
pub fn draper_add_inv<P, CB>(
    b: &mut CB,
    ra: CB::Register,
    rb: CB::Register,
) -> CircuitResult<(CB::Register, CB::Register)>
where
    CB: RecursiveCircuitBuilder<P>,
    P: Precision,
{
    let mut rs = inverter(b, vec![ra, rb], |sb, mut rs| {
        let rb = rs.pop().ok_or(CircuitError::EmptyRegister)?;
        let ra = rs.pop().ok_or(CircuitError::EmptyRegister)?;
        let (ra, rb) = draper_add::<P, _>(sb, ra, rb)?;
        Ok(vec![ra, rb])
    })?;
    let rb = rs.pop().ok_or(CircuitError::EmptyRegister)?;
    let ra = rs.pop().ok_or(CircuitError::EmptyRegister)?;
    Ok((ra, rb))
}

/// A ready to run addition of two classical values.
#[derive(Debug)]
pub struct AdditionCircuit<P: Precision> {
    /// Builder holding the recorded circuit.
    pub builder: LocalBuilder<P>,
    /// The `a` register, unchanged by the circuit.
    pub ra: Qudit,
    /// The `b` register, holds the sum at the end of the circuit.
    pub rb: Qudit,
    handle: StochasticMeasurementHandle,
}

impl<P: Precision> AdditionCircuit<P> {
    /// Run the circuit and return the outcome distribution of the sum register.
    pub fn probabilities(&mut self) -> CircuitResult<Vec<P>> {
        let (_, measured) = self.builder.calculate_state()?;
        measured
            .get_stochastic_measurement(self.handle)
            .map(<[P]>::to_vec)
            .ok_or_else(|| CircuitError::new("sum register was not measured"))
    }
}

/// Build the circuit computing `a + b` on two registers of `width` qubits, measuring the sum.
pub fn add_circuit<P: Precision>(
    a: usize,
    b: usize,
    width: usize,
) -> CircuitResult<AdditionCircuit<P>> {
    let mut builder = LocalBuilder::<P>::default();
    let ra = builder.try_register(width)?;
    let rb = builder.try_register(width)?;
    let ra = set_value(&mut builder, ra, a)?;
    let rb = set_value(&mut builder, rb, b)?;
    let (ra, rb) = draper_add(&mut builder, ra, rb)?;
    let (rb, handle) = builder.measure_stochastic(rb);
    debug!(a, b, width, depth = builder.pipeline_depth(), "addition circuit built");
    Ok(AdditionCircuit {
        builder,
        ra,
        rb,
        handle,
    })
}

/// Compute `(a + b) mod 2^width` with the Draper adder, returning the most likely sum and its
/// probability.
pub fn add<P: Precision>(a: usize, b: usize, width: usize) -> CircuitResult<(usize, P)> {
    let probs = add_circuit::<P>(a, b, width)?.probabilities()?;
    probs
        .into_iter()
        .enumerate()
        .fold(None, |acc: Option<(usize, P)>, (i, p)| match acc {
            Some((_, best)) if best >= p => acc,
            _ => Some((i, p)),
        })
        .ok_or(CircuitError::EmptyRegister)
}
