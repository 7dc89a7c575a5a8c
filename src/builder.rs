use std::fmt;
use std::num::NonZeroUsize;
use std::ops::Neg;

use num_rational::{Ratio, Rational64};
use num_traits::{One, Zero};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, trace};

use crate::builder_traits::*;
use crate::errors::{CircuitError, CircuitResult};
use crate::inverter::{Invertable, RecursiveCircuitBuilder};
use crate::state_ops::matrix_ops::{
    apply_op, make_control_op, make_matrix_op, make_swap_op, MatrixOp,
};
use crate::state_ops::measurement_ops::{measure, measure_probs};
use crate::types::{Precision, Representation};
use crate::utils::check_width;
use crate::Complex;

/// Largest number of qubits `LocalBuilder` will simulate.
pub const MAX_QUBITS: usize = 30;

/// A list of circuit objects along with the absolute wires they act upon.
pub type Pipeline<P> = Vec<(Vec<usize>, BuilderCircuitObject<P>)>;

/// A local circuit builder for constructing circuits out of standard gates.
/// The circuit is recorded as a pipeline and only evaluated on `calculate_state`.
#[derive(Debug)]
pub struct LocalBuilder<P: Precision> {
    pipeline: Pipeline<P>,
    n: usize,
    measurements: usize,
    representation: Representation,
    rng: StdRng,
}

impl<P: Precision> Default for LocalBuilder<P> {
    fn default() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }
}

impl<P: Precision> LocalBuilder<P> {
    fn from_rng(rng: StdRng) -> Self {
        Self {
            pipeline: vec![],
            n: 0,
            measurements: 0,
            representation: Representation::default(),
            rng,
        }
    }

    /// Make a builder whose collapsing measurements are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    /// Set the outcome bit order used by measurements on this builder.
    pub fn with_representation(mut self, representation: Representation) -> Self {
        self.representation = representation;
        self
    }

    /// The outcome bit order used by measurements on this builder.
    pub fn representation(&self) -> Representation {
        self.representation
    }

    /// Returns the depth of the current circuit (pipeline).
    pub fn pipeline_depth(&self) -> usize {
        self.pipeline.len()
    }

    /// The recorded circuit objects in application order.
    pub fn pipeline(&self) -> &[(Vec<usize>, BuilderCircuitObject<P>)] {
        &self.pipeline
    }

    fn check_wires(&self, indices: &[usize]) -> CircuitResult<()> {
        for (i, wire) in indices.iter().enumerate() {
            if *wire >= self.n {
                return Err(CircuitError::WireOutOfRange {
                    wire: *wire,
                    n: self.n,
                });
            }
            if indices[..i].contains(wire) {
                return Err(CircuitError::DuplicateWire(*wire));
            }
        }
        Ok(())
    }

    fn push_measurement(&mut self, r: &Qudit, object: MeasurementObject) -> usize {
        let obj = BuilderCircuitObject {
            n: r.n(),
            object: BuilderCircuitObjectType::Measurement(object),
        };
        self.pipeline.push((r.indices.clone(), obj));
        let m = self.measurements;
        self.measurements += 1;
        m
    }
}

/// The register implementation for the LocalBuilder.
#[derive(Debug)]
pub struct Qudit {
    indices: Vec<usize>,
}

impl QubitRegister for Qudit {
    fn n(&self) -> usize {
        self.indices.len()
    }

    fn indices(&self) -> &[usize] {
        self.indices.as_ref()
    }
}

impl Qudit {
    fn new_from_iter<It>(indices: It) -> Option<Self>
    where
        It: IntoIterator<Item = usize>,
    {
        let indices = indices.into_iter().collect::<Vec<_>>();
        if indices.is_empty() {
            None
        } else {
            Some(Self { indices })
        }
    }
}

/// A pipeline object for the LocalBuilder.
#[derive(Debug, Clone, PartialEq)]
pub struct BuilderCircuitObject<P: Precision> {
    n: usize,
    object: BuilderCircuitObjectType<P>,
}

impl<P: Precision> BuilderCircuitObject<P> {
    fn unitary(n: usize, object: UnitaryMatrixObject<P>) -> Self {
        Self {
            n,
            object: BuilderCircuitObjectType::Unitary(object),
        }
    }

    /// Number of wires the object acts on.
    pub fn n(&self) -> usize {
        self.n
    }

    /// The operation itself.
    pub fn object(&self) -> &BuilderCircuitObjectType<P> {
        &self.object
    }

    /// Short human readable name, used by diagrams and logs.
    pub fn name(&self) -> String {
        match &self.object {
            BuilderCircuitObjectType::Unitary(u) => u.name(),
            BuilderCircuitObjectType::Measurement(MeasurementObject::Measurement) => {
                "Measure".to_string()
            }
            BuilderCircuitObjectType::Measurement(MeasurementObject::StochasticMeasurement) => {
                "StochasticMeasure".to_string()
            }
        }
    }
}

/// The type of pipeline object for LocalBuilder.
#[derive(Debug, Clone, PartialEq)]
pub enum BuilderCircuitObjectType<P: Precision> {
    /// A unitary operation on the circuit.
    Unitary(UnitaryMatrixObject<P>),
    /// A measurement operation on the circuit.
    Measurement(MeasurementObject),
}

/// The type of unitary matrix for LocalBuilder.
#[derive(Debug, Clone, PartialEq)]
pub enum UnitaryMatrixObject<P: Precision> {
    /// A pauli X gate.
    X,
    /// A pauli Z gate.
    Z,
    /// A hadamard gate.
    H,
    /// `diag(1, e^{i theta})`.
    Phase(RotationObject<P>),
    /// Phase gate on the second wire, controlled by the first.
    CPhase(RotationObject<P>),
    /// A controlled pauli X gate, first qubit is control.
    CNOT,
    /// A swap gate between two qubits.
    SWAP,
    /// X on the last wire when each preceding wire holds the matching value.
    MCX(Vec<bool>),
    /// A phase applied to the whole state.
    GlobalPhase(RotationObject<P>),
}

impl<P: Precision> UnitaryMatrixObject<P> {
    fn name(&self) -> String {
        match self {
            UnitaryMatrixObject::X => "X".to_string(),
            UnitaryMatrixObject::Z => "Z".to_string(),
            UnitaryMatrixObject::H => "H".to_string(),
            UnitaryMatrixObject::Phase(theta) => format!("P({})", theta),
            UnitaryMatrixObject::CPhase(theta) => format!("CP({})", theta),
            UnitaryMatrixObject::CNOT => "CNOT".to_string(),
            UnitaryMatrixObject::SWAP => "SWAP".to_string(),
            UnitaryMatrixObject::MCX(values) => format!("C{}X", values.len()),
            UnitaryMatrixObject::GlobalPhase(theta) => format!("GPhase({})", theta),
        }
    }

    /// The adjoint of this object.
    fn inverse(self) -> Self {
        match self {
            UnitaryMatrixObject::Phase(theta) => UnitaryMatrixObject::Phase(-theta),
            UnitaryMatrixObject::CPhase(theta) => UnitaryMatrixObject::CPhase(-theta),
            UnitaryMatrixObject::GlobalPhase(theta) => UnitaryMatrixObject::GlobalPhase(-theta),
            u => u,
        }
    }
}

/// Represents phase angles.
#[derive(Debug, Clone, PartialEq)]
pub enum RotationObject<P: Precision> {
    /// An angle in radians.
    Floating(P),
    /// An angle given as a fixed ratio times pi.
    PiRational(Ratio<i64>),
}

impl<P: Precision> RotationObject<P> {
    /// The angle in radians.
    pub fn radians(&self) -> P {
        match self {
            RotationObject::Floating(theta) => *theta,
            RotationObject::PiRational(r) => {
                let num = P::from(*r.numer()).unwrap_or_else(P::zero);
                let den = P::from(*r.denom()).unwrap_or_else(P::one);
                P::PI() * num / den
            }
        }
    }
}

impl<P: Precision> Neg for RotationObject<P> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            RotationObject::Floating(f) => Self::Floating(-f),
            RotationObject::PiRational(r) => Self::PiRational(-r),
        }
    }
}

impl<P: Precision> fmt::Display for RotationObject<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RotationObject::Floating(theta) => write!(f, "{:.4}", theta),
            RotationObject::PiRational(r) => {
                let (num, den) = (*r.numer(), *r.denom());
                let num = match num {
                    0 => return write!(f, "0"),
                    1 => String::new(),
                    -1 => "-".to_string(),
                    num => num.to_string(),
                };
                if den == 1 {
                    write!(f, "{}pi", num)
                } else {
                    write!(f, "{}pi/{}", num, den)
                }
            }
        }
    }
}

/// Represents a type of measurement in the circuit.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum MeasurementObject {
    /// Performs a single measurement and collapses the wavefunction.
    Measurement,
    /// Records the exact probability distribution over results.
    /// Does not collapse the wavefunction.
    StochasticMeasurement,
}

/// Represents the result of a measurement on the circuit.
#[derive(Debug, Clone)]
pub enum MeasurementResults<P: Precision> {
    /// The result of a single measurement on selected qubits, returns the measurement as well as
    /// the likelihood of that measurement taking place.
    Single(usize, P),
    /// The probability of each measurement indexed by the measurement itself.
    Stochastic(Vec<P>),
}

/// A series of measurement results at the end of the circuit.
#[derive(Debug)]
pub struct Measurements<P: Precision> {
    measurements: Vec<MeasurementResults<P>>,
}

impl<P: Precision> Measurements<P> {
    /// Get a measurement result given a handle.
    pub fn get_measurement(&self, handle: MeasurementHandle) -> Option<(usize, P)> {
        match self.measurements.get(handle.id)? {
            MeasurementResults::Single(val, prob) => Some((*val, *prob)),
            MeasurementResults::Stochastic(_) => None,
        }
    }
    /// Get a stochastic measurement result given a handle.
    pub fn get_stochastic_measurement(&self, handle: StochasticMeasurementHandle) -> Option<&[P]> {
        match self.measurements.get(handle.id)? {
            MeasurementResults::Single(_, _) => None,
            MeasurementResults::Stochastic(probs) => Some(probs.as_slice()),
        }
    }
}

fn make_unitary_op<P: Precision>(
    indices: &[usize],
    object: &UnitaryMatrixObject<P>,
) -> CircuitResult<MatrixOp<Complex<P>>> {
    let l = Complex::one();
    let o = Complex::zero();
    let x = [o, l, l, o];
    let phase =
        |theta: &RotationObject<P>| [l, o, o, Complex::from_polar(P::one(), theta.radians())];
    match object {
        UnitaryMatrixObject::X => make_matrix_op(indices, x),
        UnitaryMatrixObject::Z => make_matrix_op(indices, [l, o, o, -l]),
        UnitaryMatrixObject::H => {
            let nl = Complex::from(P::FRAC_1_SQRT_2());
            make_matrix_op(indices, [nl, nl, nl, -nl])
        }
        UnitaryMatrixObject::Phase(theta) => make_matrix_op(indices, phase(theta)),
        UnitaryMatrixObject::CPhase(theta) => match indices {
            [c, t] => make_control_op(&[*c], &[true], make_matrix_op(&[*t], phase(theta))?),
            _ => Err(CircuitError::RegisterSizeMismatch {
                expected: 2,
                found: indices.len(),
            }),
        },
        UnitaryMatrixObject::CNOT => match indices {
            [c, t] => make_control_op(&[*c], &[true], make_matrix_op(&[*t], x)?),
            _ => Err(CircuitError::RegisterSizeMismatch {
                expected: 2,
                found: indices.len(),
            }),
        },
        UnitaryMatrixObject::SWAP => match indices {
            [a, b] => make_swap_op(*a, *b),
            _ => Err(CircuitError::RegisterSizeMismatch {
                expected: 2,
                found: indices.len(),
            }),
        },
        UnitaryMatrixObject::MCX(values) => match indices.split_last() {
            Some((t, cs)) => make_control_op(cs, values, make_matrix_op(&[*t], x)?),
            None => Err(CircuitError::EmptyRegister),
        },
        UnitaryMatrixObject::GlobalPhase(theta) => Ok(MatrixOp::GlobalPhase(
            Complex::from_polar(P::one(), theta.radians()),
        )),
    }
}

impl<P: Precision> CircuitBuilder for LocalBuilder<P> {
    type Register = Qudit;
    type CircuitObject = BuilderCircuitObject<P>;
    type StateCalculation = (Vec<Complex<P>>, Measurements<P>);

    fn n(&self) -> usize {
        self.n
    }

    fn register(&mut self, n: NonZeroUsize) -> Self::Register {
        let n: usize = n.into();
        let indices = (self.n..self.n + n).collect();
        self.n += n;
        Qudit { indices }
    }

    fn merge_two_registers(&mut self, r1: Self::Register, r2: Self::Register) -> Self::Register {
        let mut indices = r1.indices;
        indices.extend(r2.indices);
        Qudit { indices }
    }

    fn split_register_relative<It>(
        &mut self,
        r: Self::Register,
        indices: It,
    ) -> SplitResult<Self::Register>
    where
        It: IntoIterator<Item = usize>,
    {
        let selected_indices = indices
            .into_iter()
            .filter_map(|i| r.indices.get(i).cloned());
        let r1 = Qudit::new_from_iter(selected_indices);

        let remaining_indices = r.indices.iter().cloned().filter(|oi| match &r1 {
            Some(r1) => !r1.indices.contains(oi),
            None => true,
        });
        let r2 = Qudit::new_from_iter(remaining_indices);

        match (r1, r2) {
            (Some(r1), None) => SplitResult::SELECTED(r1),
            (None, Some(r2)) => SplitResult::UNSELECTED(r2),
            (Some(r1), Some(r2)) => SplitResult::SPLIT(r1, r2),
            // Registers are never empty so at least one side holds the wires.
            (None, None) => SplitResult::UNSELECTED(r),
        }
    }

    fn apply_circuit_object(
        &mut self,
        r: Self::Register,
        c: Self::CircuitObject,
    ) -> CircuitResult<Self::Register> {
        self.check_wires(&r.indices)?;
        if c.n == 1 && r.n() > 1 {
            // Do broadcasting
            r.indices
                .iter()
                .for_each(|i| self.pipeline.push((vec![*i], c.clone())));
            Ok(r)
        } else if c.n == r.n() {
            self.pipeline.push((r.indices.clone(), c));
            Ok(r)
        } else {
            Err(CircuitError::RegisterSizeMismatch {
                expected: c.n,
                found: r.n(),
            })
        }
    }

    fn calculate_state_with_init<'a, It>(
        &mut self,
        it: It,
    ) -> CircuitResult<Self::StateCalculation>
    where
        Self::Register: 'a,
        It: IntoIterator<Item = (&'a Self::Register, usize)>,
    {
        let n = self.n();
        if n > MAX_QUBITS {
            return Err(CircuitError::TooManyQubits { n, max: MAX_QUBITS });
        }
        for (indices, _) in &self.pipeline {
            self.check_wires(indices)?;
        }
        let mut initial_index = 0;
        for (r, x) in it {
            self.check_wires(&r.indices)?;
            let rn = r.n();
            check_width(x, rn)?;
            r.indices
                .iter()
                .enumerate()
                .for_each(|(ri, i)| initial_index |= ((x >> (rn - 1 - ri)) & 1) << (n - 1 - i));
        }
        debug!(
            n,
            depth = self.pipeline.len(),
            initial_index,
            "evaluating circuit"
        );

        let mut state = vec![Complex::zero(); 1 << n];
        let arena = state.clone();
        state[initial_index] = Complex::one();

        let repr = self.representation;
        let rng = &mut self.rng;
        let (state, _, measurements) = self.pipeline.iter().try_fold(
            (state, arena, vec![]),
            |(state, mut arena, mut measurements), (indices, obj)| -> CircuitResult<_> {
                trace!(op = %obj.name(), wires = ?indices, "applying op");
                match &obj.object {
                    BuilderCircuitObjectType::Unitary(object) => {
                        let uop = make_unitary_op(indices, object)?;
                        apply_op(n, &uop, &state, &mut arena);
                    }
                    BuilderCircuitObjectType::Measurement(MeasurementObject::Measurement) => {
                        let (measured, p) =
                            measure(n, indices, &state, &mut arena, repr, &mut *rng);
                        measurements.push(MeasurementResults::Single(measured, p));
                    }
                    BuilderCircuitObjectType::Measurement(
                        MeasurementObject::StochasticMeasurement,
                    ) => {
                        let ps = measure_probs(n, indices, &state, repr);
                        measurements.push(MeasurementResults::Stochastic(ps));
                        // Nothing collapses, keep the current state.
                        return Ok((state, arena, measurements));
                    }
                }
                Ok((arena, state, measurements))
            },
        )?;
        Ok((state, Measurements { measurements }))
    }
}

impl<P: Precision> CliffordTBuilder<P> for LocalBuilder<P> {
    fn make_x(&self) -> Self::CircuitObject {
        BuilderCircuitObject::unitary(1, UnitaryMatrixObject::X)
    }
    fn make_z(&self) -> Self::CircuitObject {
        BuilderCircuitObject::unitary(1, UnitaryMatrixObject::Z)
    }
    fn make_h(&self) -> Self::CircuitObject {
        BuilderCircuitObject::unitary(1, UnitaryMatrixObject::H)
    }
    fn make_cnot(&self) -> Self::CircuitObject {
        BuilderCircuitObject::unitary(2, UnitaryMatrixObject::CNOT)
    }
    fn make_swap(&self) -> Self::CircuitObject {
        BuilderCircuitObject::unitary(2, UnitaryMatrixObject::SWAP)
    }

    fn apply_broadcast(&mut self, r: Self::Register, co: Self::CircuitObject) -> Self::Register {
        debug_assert_eq!(co.n, 1);
        r.indices
            .iter()
            .for_each(|i| self.pipeline.push((vec![*i], co.clone())));
        r
    }
}

impl<P: Precision> RotationsBuilder<P> for LocalBuilder<P> {
    fn phase_shift(&mut self, r: Self::Register, theta: P) -> Self::Register {
        let co = BuilderCircuitObject::unitary(
            1,
            UnitaryMatrixObject::Phase(RotationObject::Floating(theta)),
        );
        self.apply_broadcast(r, co)
    }

    fn phase_shift_ratio(&mut self, r: Self::Register, theta: Rational64) -> Self::Register {
        let co = BuilderCircuitObject::unitary(
            1,
            UnitaryMatrixObject::Phase(RotationObject::PiRational(theta)),
        );
        self.apply_broadcast(r, co)
    }

    fn controlled_phase_shift_ratio(
        &mut self,
        cr: Self::Register,
        r: Self::Register,
        theta: Rational64,
    ) -> CircuitResult<(Self::Register, Self::Register)> {
        for reg in [&cr, &r] {
            if reg.n() != 1 {
                return Err(CircuitError::RegisterSizeMismatch {
                    expected: 1,
                    found: reg.n(),
                });
            }
        }
        let co = BuilderCircuitObject::unitary(
            2,
            UnitaryMatrixObject::CPhase(RotationObject::PiRational(theta)),
        );
        let r = self.merge_two_registers(cr, r);
        let r = self.apply_circuit_object(r, co)?;
        match self.split_register_relative(r, Some(0)) {
            SplitResult::SPLIT(cr, r) => Ok((cr, r)),
            SplitResult::SELECTED(_) | SplitResult::UNSELECTED(_) => {
                Err(CircuitError::EmptyRegister)
            }
        }
    }

    fn global_phase_ratio(&mut self, r: Self::Register, theta: Rational64) -> Self::Register {
        self.pipeline.push((
            r.indices.clone(),
            BuilderCircuitObject::unitary(
                r.n(),
                UnitaryMatrixObject::GlobalPhase(RotationObject::PiRational(theta)),
            ),
        ));
        r
    }
}

impl<P: Precision> MultiControlBuilder<P> for LocalBuilder<P> {
    fn multi_controlled_x(
        &mut self,
        cr: Self::Register,
        r: Self::Register,
        control_values: &[bool],
    ) -> CircuitResult<(Self::Register, Self::Register)> {
        if control_values.len() != cr.n() {
            return Err(CircuitError::ControlValueCount {
                expected: cr.n(),
                found: control_values.len(),
            });
        }
        let crn = cr.n();
        let mut cr = cr;
        let mut rs = vec![];
        for r in self.split_all_register(r) {
            let co = BuilderCircuitObject::unitary(
                crn + 1,
                UnitaryMatrixObject::MCX(control_values.to_vec()),
            );
            let merged = self.merge_two_registers(cr, r);
            let merged = self.apply_circuit_object(merged, co)?;
            let (rest, last) = self.split_last_qubit(merged);
            cr = rest.ok_or(CircuitError::EmptyRegister)?;
            rs.push(last);
        }
        let r = self.merge_registers(rs).ok_or(CircuitError::EmptyRegister)?;
        Ok((cr, r))
    }
}

/// A handle which points to a measurement result.
#[derive(Debug, Clone, Copy)]
pub struct MeasurementHandle {
    id: usize,
}

impl<P: Precision> MeasurementBuilder for LocalBuilder<P> {
    type MeasurementHandle = MeasurementHandle;

    fn measure(&mut self, r: Self::Register) -> (Self::Register, Self::MeasurementHandle) {
        let id = self.push_measurement(&r, MeasurementObject::Measurement);
        (r, MeasurementHandle { id })
    }
}

/// A handle which points to a stochastic measurement result.
#[derive(Debug, Clone, Copy)]
pub struct StochasticMeasurementHandle {
    id: usize,
}

impl<P: Precision> StochasticMeasurementBuilder for LocalBuilder<P> {
    type StochasticMeasurementHandle = StochasticMeasurementHandle;

    fn measure_stochastic(
        &mut self,
        r: Self::Register,
    ) -> (Self::Register, Self::StochasticMeasurementHandle) {
        let id = self.push_measurement(&r, MeasurementObject::StochasticMeasurement);
        (r, StochasticMeasurementHandle { id })
    }
}

impl<P: Precision> Subcircuitable for LocalBuilder<P> {
    type Subcircuit = Pipeline<P>;

    fn make_subcircuit(&self) -> CircuitResult<Self::Subcircuit> {
        Ok(self.pipeline.clone())
    }

    fn apply_subcircuit(
        &mut self,
        sc: Self::Subcircuit,
        r: Self::Register,
    ) -> CircuitResult<Self::Register> {
        apply_pipeline_objects(self, sc, r)
    }
}

impl<P: Precision> Invertable for LocalBuilder<P> {
    type SimilarBuilder = Self;

    fn new_similar(&self) -> Self {
        Self::default().with_representation(self.representation)
    }

    fn invert_subcircuit(sc: Self::Subcircuit) -> CircuitResult<Self::Subcircuit> {
        sc.into_iter()
            .rev()
            .map(|(indices, co)| Ok((indices, invert_circuit_object(co)?)))
            .collect()
    }
}

impl<P: Precision> RecursiveCircuitBuilder<P> for LocalBuilder<P> {
    type RecursiveSimilarBuilder = Self::SimilarBuilder;
}

/// Apply a pipeline recorded on wires `0..r.n()` of another builder to the wires of `r`.
fn apply_pipeline_objects<CB, CO>(
    cb: &mut CB,
    sc: Vec<(Vec<usize>, CO)>,
    r: CB::Register,
) -> CircuitResult<CB::Register>
where
    CB: CircuitBuilder<CircuitObject = CO>,
{
    let rn = r.n();
    if let Some(wire) = sc.iter().flat_map(|(indices, _)| indices.iter().cloned()).max() {
        if wire >= rn {
            return Err(CircuitError::WireOutOfRange { wire, n: rn });
        }
    }
    let mut rs = split_qubits(cb, r);
    for (indices, co) in sc {
        let sub_rs = indices
            .iter()
            .map(|index| take_qubit(&mut rs, *index))
            .collect::<CircuitResult<Vec<_>>>()?;
        let sub_r = cb
            .merge_registers(sub_rs)
            .ok_or(CircuitError::EmptyRegister)?;
        let sub_r = cb.apply_circuit_object(sub_r, co)?;
        let sub_rs = cb.split_all_register(sub_r);
        indices
            .into_iter()
            .zip(sub_rs)
            .for_each(|(index, r)| rs[index] = Some(r));
    }
    merge_qubits(cb, rs)
}

fn invert_circuit_object<P: Precision>(
    co: BuilderCircuitObject<P>,
) -> CircuitResult<BuilderCircuitObject<P>> {
    match co.object {
        BuilderCircuitObjectType::Unitary(u) => {
            Ok(BuilderCircuitObject::unitary(co.n, u.inverse()))
        }
        BuilderCircuitObjectType::Measurement(_) => {
            Err(CircuitError::NotInvertible("measurement".to_string()))
        }
    }
}
