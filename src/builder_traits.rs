use crate::errors::{CircuitError, CircuitResult};
use crate::types::Precision;
use num_rational::Rational64;
use std::fmt::Debug;
use std::num::NonZeroUsize;

/// Standard functions needed by registers containing multiple qubits.
pub trait QubitRegister {
    /// Size of the register in qubits.
    fn n(&self) -> usize;
    /// Size of the register in qubits, registers are never empty.
    fn n_nonzero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.n()).unwrap_or(NonZeroUsize::MIN)
    }
    /// Absolute indices represented by the register.
    fn indices(&self) -> &[usize];
}

/// Result of splitting a register in two.
#[derive(Debug)]
pub enum SplitResult<R: QubitRegister + Debug> {
    /// All qubits were selected
    SELECTED(R),
    /// None of the qubits were selected
    UNSELECTED(R),
    /// Some qubits were selected, some were not selected.
    SPLIT(R, R),
}

/// A base-level circuit builder trait, requiring definitions of registers, base circuit objects,
/// and end-result quantum state.
pub trait CircuitBuilder {
    /// The register type used for the circuit.
    type Register: QubitRegister + Debug;
    /// The struct used to represent circuit objects.
    type CircuitObject;
    /// Return type for state calculations.
    type StateCalculation;

    /// Number of qubits in circuit.
    fn n(&self) -> usize;

    /// Construct a single qubit.
    fn qubit(&mut self) -> Self::Register {
        self.register(NonZeroUsize::MIN)
    }

    /// Construct a register with multiple qubits. Fails if n=0.
    fn qudit(&mut self, n: usize) -> Option<Self::Register> {
        NonZeroUsize::new(n).map(|n| self.register(n))
    }

    /// Construct a register with multiple qubits.
    fn register(&mut self, n: NonZeroUsize) -> Self::Register;

    /// Construct a register with multiple qubits. Fails if n=0.
    fn try_register(&mut self, n: usize) -> CircuitResult<Self::Register> {
        self.qudit(n).ok_or(CircuitError::EmptyRegister)
    }

    /// Merge two registers into a single register with first the r1 indices, then the r2 indices.
    fn merge_two_registers(&mut self, r1: Self::Register, r2: Self::Register) -> Self::Register;

    /// Merge multiple registers together into a single register, returns None if none given.
    fn merge_registers<It>(&mut self, rs: It) -> Option<Self::Register>
    where
        It: IntoIterator<Item = Self::Register>,
    {
        rs.into_iter().fold(None, |acc, r1| match acc {
            Some(r2) => Some(self.merge_two_registers(r2, r1)),
            None => Some(r1),
        })
    }

    /// Split a register into two, selecting the relative indices from the `indices` iterator.
    fn split_register_relative<It>(
        &mut self,
        r: Self::Register,
        indices: It,
    ) -> SplitResult<Self::Register>
    where
        It: IntoIterator<Item = usize>;

    /// Split the register into `r.n()` individual registers of 1 qubit each.
    fn split_all_register(&mut self, r: Self::Register) -> Vec<Self::Register> {
        let mut acc = vec![];
        let mut r = r;
        loop {
            match self.split_register_relative(r, Some(0)) {
                SplitResult::SELECTED(r) | SplitResult::UNSELECTED(r) => {
                    acc.push(r);
                    return acc;
                }
                SplitResult::SPLIT(r0, rest) => {
                    acc.push(r0);
                    r = rest;
                }
            }
        }
    }

    /// Split off the last qubit from the register, returns the optional remaining register
    /// and the last qubit.
    fn split_last_qubit(&mut self, r: Self::Register) -> (Option<Self::Register>, Self::Register) {
        let n = r.n();
        match self.split_register_relative(r, [n - 1]) {
            SplitResult::SELECTED(r) | SplitResult::UNSELECTED(r) => (None, r),
            SplitResult::SPLIT(last, rest) => (Some(rest), last),
        }
    }

    /// Apply a circuit object to the circuit directly.
    fn apply_circuit_object(
        &mut self,
        r: Self::Register,
        c: Self::CircuitObject,
    ) -> CircuitResult<Self::Register>;

    /// Calculate the quantum state at the end of the circuit, using |0> as input.
    fn calculate_state(&mut self) -> CircuitResult<Self::StateCalculation> {
        self.calculate_state_with_init(None)
    }

    /// Calculate the state at the end of the circuit using an initial state given by each register
    /// and the classical value in that register, written most significant bit first.
    fn calculate_state_with_init<'a, It>(
        &mut self,
        it: It,
    ) -> CircuitResult<Self::StateCalculation>
    where
        Self::Register: 'a,
        It: IntoIterator<Item = (&'a Self::Register, usize)>;
}

/// A Builder which can construct Clifford Circuit Elements.
pub trait CliffordTBuilder<P: Precision>: CircuitBuilder {
    /// Make a circuit object representing the X gate on a single qubit.
    fn make_x(&self) -> Self::CircuitObject;
    /// Make a circuit object representing the Z gate on a single qubit.
    fn make_z(&self) -> Self::CircuitObject;
    /// Make a circuit object representing the H gate on a single qubit.
    fn make_h(&self) -> Self::CircuitObject;
    /// Make a circuit object representing the CNOT gate on a pair of qubits, first is control.
    fn make_cnot(&self) -> Self::CircuitObject;
    /// Make a circuit object exchanging a pair of qubits.
    fn make_swap(&self) -> Self::CircuitObject;

    /// Create and apply an NOT (or X) gate circuit object.
    fn not(&mut self, r: Self::Register) -> Self::Register {
        self.x(r)
    }

    /// Create and apply an X (or NOT) gate circuit object to each qubit of `r`.
    fn x(&mut self, r: Self::Register) -> Self::Register {
        let co = self.make_x();
        self.apply_broadcast(r, co)
    }

    /// Create and apply a Z gate circuit object to each qubit of `r`.
    fn z(&mut self, r: Self::Register) -> Self::Register {
        let co = self.make_z();
        self.apply_broadcast(r, co)
    }

    /// Create and apply an H gate circuit object to each qubit of `r`.
    fn h(&mut self, r: Self::Register) -> Self::Register {
        let co = self.make_h();
        self.apply_broadcast(r, co)
    }

    /// Apply a single qubit circuit object to every qubit of `r`.
    fn apply_broadcast(&mut self, r: Self::Register, co: Self::CircuitObject) -> Self::Register;

    /// Create and apply a CNOT gate from the single qubit `cr` onto each qubit of `r`.
    fn cnot(
        &mut self,
        cr: Self::Register,
        r: Self::Register,
    ) -> CircuitResult<(Self::Register, Self::Register)> {
        if cr.n() > 1 {
            return Err(CircuitError::RegisterSizeMismatch {
                expected: 1,
                found: cr.n(),
            });
        }
        let rs = self.split_all_register(r);
        let (cr, rs) = rs.into_iter().try_fold((cr, vec![]), |(cr, mut acc), r| {
            let r = self.merge_two_registers(cr, r);
            let circuit_object = self.make_cnot();
            let r = self.apply_circuit_object(r, circuit_object)?;
            let (cr, r) = match self.split_register_relative(r, Some(0)) {
                SplitResult::SPLIT(cr, r) => (cr, r),
                SplitResult::SELECTED(_) | SplitResult::UNSELECTED(_) => {
                    return Err(CircuitError::EmptyRegister)
                }
            };
            acc.push(r);
            Ok((cr, acc))
        })?;
        let r = self.merge_registers(rs).ok_or(CircuitError::EmptyRegister)?;
        Ok((cr, r))
    }

    /// Apply the SWAP gate pairwise to a pair of registers of equal sizes.
    fn swap(
        &mut self,
        ra: Self::Register,
        rb: Self::Register,
    ) -> CircuitResult<(Self::Register, Self::Register)> {
        if ra.n() != rb.n() {
            return Err(CircuitError::RegisterSizeMismatch {
                expected: ra.n(),
                found: rb.n(),
            });
        }
        let ras = self.split_all_register(ra);
        let rbs = self.split_all_register(rb);
        let mut out_a = vec![];
        let mut out_b = vec![];
        for (ra, rb) in ras.into_iter().zip(rbs) {
            let r = self.merge_two_registers(ra, rb);
            let co = self.make_swap();
            let r = self.apply_circuit_object(r, co)?;
            match self.split_register_relative(r, Some(0)) {
                SplitResult::SPLIT(ra, rb) => {
                    out_a.push(ra);
                    out_b.push(rb);
                }
                SplitResult::SELECTED(_) | SplitResult::UNSELECTED(_) => {
                    return Err(CircuitError::EmptyRegister)
                }
            }
        }
        let ra = self.merge_registers(out_a).ok_or(CircuitError::EmptyRegister)?;
        let rb = self.merge_registers(out_b).ok_or(CircuitError::EmptyRegister)?;
        Ok((ra, rb))
    }
}

/// A Builder which can construct phase rotations.
pub trait RotationsBuilder<P: Precision>: CliffordTBuilder<P> {
    /// Apply `diag(1, e^{i theta})` to each qubit of `r`.
    fn phase_shift(&mut self, r: Self::Register, theta: P) -> Self::Register;

    /// Apply `diag(1, e^{i pi theta})` to each qubit of `r`, `theta` given as an exact ratio.
    fn phase_shift_ratio(&mut self, r: Self::Register, theta: Rational64) -> Self::Register;

    /// Apply a phase shift of `pi/m` for integer `m`.
    fn phase_shift_pi_by(&mut self, r: Self::Register, m: i64) -> CircuitResult<Self::Register> {
        if m == 0 {
            Err(CircuitError::new("Cannot rotate by pi/0"))
        } else {
            Ok(self.phase_shift_ratio(r, Rational64::new(1, m)))
        }
    }

    /// Apply `diag(1, 1, 1, e^{i pi theta})` to the single qubits `cr` (control) and `r`.
    fn controlled_phase_shift_ratio(
        &mut self,
        cr: Self::Register,
        r: Self::Register,
        theta: Rational64,
    ) -> CircuitResult<(Self::Register, Self::Register)>;

    /// Apply a controlled phase shift of `pi/m` for integer `m`.
    fn controlled_phase_shift_pi_by(
        &mut self,
        cr: Self::Register,
        r: Self::Register,
        m: i64,
    ) -> CircuitResult<(Self::Register, Self::Register)> {
        if m == 0 {
            Err(CircuitError::new("Cannot rotate by pi/0"))
        } else {
            self.controlled_phase_shift_ratio(cr, r, Rational64::new(1, m))
        }
    }

    /// Multiply the whole state by `e^{i pi theta}`. The register only marks where the phase is
    /// drawn, it is otherwise untouched.
    fn global_phase_ratio(&mut self, r: Self::Register, theta: Rational64) -> Self::Register;
}

/// A Builder which can condition gates on many qubits at once.
pub trait MultiControlBuilder<P: Precision>: RotationsBuilder<P> {
    /// Apply X to each qubit of `r` when every qubit `cr[i]` is in state `control_values[i]`.
    fn multi_controlled_x(
        &mut self,
        cr: Self::Register,
        r: Self::Register,
        control_values: &[bool],
    ) -> CircuitResult<(Self::Register, Self::Register)>;

    /// Apply Z to each qubit of `r` when every qubit `cr[i]` is in state `control_values[i]`.
    fn multi_controlled_z(
        &mut self,
        cr: Self::Register,
        r: Self::Register,
        control_values: &[bool],
    ) -> CircuitResult<(Self::Register, Self::Register)> {
        let r = self.h(r);
        let (cr, r) = self.multi_controlled_x(cr, r, control_values)?;
        let r = self.h(r);
        Ok((cr, r))
    }
}

/// A builder that can take destructive measurements.
pub trait MeasurementBuilder: CircuitBuilder {
    /// Handle which points to measurements.
    type MeasurementHandle;
    /// Take a measurement of `r`, return `r` and a handle to fetch the result later.
    fn measure(&mut self, r: Self::Register) -> (Self::Register, Self::MeasurementHandle);
}

/// A builder that can take nondestructive measurements.
pub trait StochasticMeasurementBuilder: CircuitBuilder {
    /// Handle which points to measurements.
    type StochasticMeasurementHandle;
    /// Record the outcome distribution of `r`, return `r` and a handle to fetch the result later.
    fn measure_stochastic(
        &mut self,
        r: Self::Register,
    ) -> (Self::Register, Self::StochasticMeasurementHandle);
}

/// A builder which can export its circuit for use later, and can apply a circuit to itself.
pub trait Subcircuitable: CircuitBuilder {
    /// The export type for the circuit.
    type Subcircuit;

    /// Export the circuit as a subcircuit if able.
    fn make_subcircuit(&self) -> CircuitResult<Self::Subcircuit>;
    /// Append the subcircuit to the register `r`.
    fn apply_subcircuit(
        &mut self,
        sc: Self::Subcircuit,
        r: Self::Register,
    ) -> CircuitResult<Self::Register>;
}

/// Take the qubit at `i` out of a split register, failing if it is already in use.
pub fn take_qubit<R>(rs: &mut [Option<R>], i: usize) -> CircuitResult<R> {
    rs.get_mut(i)
        .and_then(Option::take)
        .ok_or_else(|| CircuitError::new(format!("qubit {} is not available", i)))
}

/// Reassemble a register from qubits previously split with `split_all_register`.
pub fn merge_qubits<CB: CircuitBuilder + ?Sized>(
    b: &mut CB,
    rs: Vec<Option<CB::Register>>,
) -> CircuitResult<CB::Register> {
    let rs = rs
        .into_iter()
        .enumerate()
        .map(|(i, r)| r.ok_or_else(|| CircuitError::new(format!("qubit {} was not returned", i))))
        .collect::<CircuitResult<Vec<_>>>()?;
    b.merge_registers(rs).ok_or(CircuitError::EmptyRegister)
}

/// Split a register into single qubits held in slots, see `take_qubit`.
pub fn split_qubits<CB: CircuitBuilder + ?Sized>(
    b: &mut CB,
    r: CB::Register,
) -> Vec<Option<CB::Register>> {
    b.split_all_register(r).into_iter().map(Some).collect()
}
