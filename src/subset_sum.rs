//! Grover search for the subsets of a vector whose elements sum to a target value.
//!
//! The circuit holds `|indices (n)>|aux (w)>|sum (w)>|oracle (1)>` where `n` is the length of the
//! vector and `w` the bit width of the target. Each index qubit selects one element of the vector,
//! so a basis state of the index register is a subset written as a bitmask whose most significant
//! bit is the first element.

use crate::arithmetic::draper_add;
use crate::builder::{LocalBuilder, Qudit, StochasticMeasurementHandle, MAX_QUBITS};
use crate::builder_traits::*;
use crate::errors::{CircuitError, CircuitResult};
use crate::grover::{diffusion, optimal_iterations, prepare_minus};
use crate::inverter::{inverter, RecursiveCircuitBuilder};
use crate::types::Precision;
use crate::utils::{bit_width, bits_msb_first, check_width, get_bit};
use std::cmp::Ordering;
use tracing::{debug, warn};

/// A vector of non-negative integers and the value its subsets should sum to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsetSumProblem {
    /// Elements to pick from.
    pub values: Vec<usize>,
    /// Required sum.
    pub target: usize,
}

impl Default for SubsetSumProblem {
    fn default() -> Self {
        Self {
            values: vec![5, 7, 8, 9, 1],
            target: 16,
        }
    }
}

impl SubsetSumProblem {
    /// Make a new problem.
    pub fn new(values: Vec<usize>, target: usize) -> Self {
        Self { values, target }
    }

    /// Number of index qubits.
    pub fn n(&self) -> usize {
        self.values.len()
    }

    /// Width of the aux and sum registers, `floor(log2(target)) + 1`.
    pub fn value_width(&self) -> usize {
        bit_width(self.target)
    }

    /// Total number of qubits in the search circuit.
    pub fn num_qubits(&self) -> usize {
        self.n() + 2 * self.value_width() + 1
    }

    /// Check that the problem can be laid out on a circuit.
    pub fn validate(&self) -> CircuitResult<()> {
        if self.values.is_empty() {
            return Err(CircuitError::new("subset sum needs at least one value"));
        }
        if self.target == 0 {
            return Err(CircuitError::new("subset sum target must be positive"));
        }
        if self.num_qubits() > MAX_QUBITS {
            return Err(CircuitError::TooManyQubits {
                n: self.num_qubits(),
                max: MAX_QUBITS,
            });
        }
        let w = self.value_width();
        self.values.iter().try_for_each(|v| check_width(*v, w))
    }

    /// Whether index `i` is part of the subset `mask`.
    pub fn contains(&self, mask: usize, i: usize) -> bool {
        get_bit(mask, self.n() - 1 - i)
    }

    /// Sum of the elements selected by `mask`.
    pub fn sum_of(&self, mask: usize) -> usize {
        self.values
            .iter()
            .enumerate()
            .filter(|(i, _)| self.contains(mask, *i))
            .map(|(_, v)| *v)
            .sum()
    }

    /// All subsets whose sum is exactly the target, found by brute force.
    pub fn classical_solutions(&self) -> Vec<usize> {
        (0..1usize << self.n())
            .filter(|mask| self.sum_of(*mask) == self.target)
            .collect()
    }

    /// Subsets the oracle marks. The sum register wraps at `2^w`, so this can be a superset of
    /// `classical_solutions`.
    pub fn marked_states(&self) -> Vec<usize> {
        let modulus = 1usize << self.value_width();
        (0..1usize << self.n())
            .filter(|mask| self.sum_of(*mask) % modulus == self.target)
            .collect()
    }
}

fn check_register<R: QubitRegister>(r: &R, expected: usize) -> CircuitResult<()> {
    if r.n() == expected {
        Ok(())
    } else {
        Err(CircuitError::RegisterSizeMismatch {
            expected,
            found: r.n(),
        })
    }
}

/// CNOT from `ctrl` onto each qubit of `r` whose bit is set. Self inverse.
fn load_bits<P, CB>(
    b: &mut CB,
    ctrl: CB::Register,
    r: CB::Register,
    bits: &[bool],
) -> CircuitResult<(CB::Register, CB::Register)>
where
    CB: CliffordTBuilder<P>,
    P: Precision,
{
    let mut ctrl = ctrl;
    let mut rs = vec![];
    for (q, bit) in b.split_all_register(r).into_iter().zip(bits) {
        let q = if *bit {
            let (c, q) = b.cnot(ctrl, q)?;
            ctrl = c;
            q
        } else {
            q
        };
        rs.push(q);
    }
    let r = b.merge_registers(rs).ok_or(CircuitError::EmptyRegister)?;
    Ok((ctrl, r))
}

/// Add into `sum` every element whose index qubit is set. `aux` must hold `|0>` and is returned
/// to `|0>`.
pub fn subset_sum<P, CB>(
    b: &mut CB,
    problem: &SubsetSumProblem,
    idx: CB::Register,
    aux: CB::Register,
    sum: CB::Register,
) -> CircuitResult<(CB::Register, CB::Register, CB::Register)>
where
    CB: RecursiveCircuitBuilder<P>,
    P: Precision,
{
    let w = problem.value_width();
    check_register(&idx, problem.n())?;
    check_register(&aux, w)?;
    check_register(&sum, w)?;

    let mut idxs = split_qubits(b, idx);
    let (mut aux, mut sum) = (aux, sum);
    for (i, value) in problem.values.iter().enumerate() {
        let bits = bits_msb_first(*value, w)?;
        let ctrl = take_qubit(&mut idxs, i)?;
        let (ctrl, loaded) = load_bits::<P, _>(b, ctrl, aux, &bits)?;
        let (loaded, new_sum) = draper_add::<P, _>(b, loaded, sum)?;
        let (ctrl, cleared) = load_bits::<P, _>(b, ctrl, loaded, &bits)?;
        idxs[i] = Some(ctrl);
        aux = cleared;
        sum = new_sum;
    }
    let idx = merge_qubits(b, idxs)?;
    Ok((idx, aux, sum))
}

/// Flip `out` when the subset held by `idx` sums to the target (mod `2^w`), then uncompute the sum
/// so `aux` and `sum` end in `|0>`.
pub fn oracle<P, CB>(
    b: &mut CB,
    problem: &SubsetSumProblem,
    idx: CB::Register,
    aux: CB::Register,
    sum: CB::Register,
    out: CB::Register,
) -> CircuitResult<(CB::Register, CB::Register, CB::Register, CB::Register)>
where
    CB: RecursiveCircuitBuilder<P>,
    P: Precision,
{
    check_register(&out, 1)?;
    let (idx, aux, sum) = subset_sum::<P, _>(b, problem, idx, aux, sum)?;

    let target_bits = bits_msb_first(problem.target, problem.value_width())?;
    let (sum, out) = b.multi_controlled_x(sum, out, &target_bits)?;

    let mut rs = inverter(b, vec![idx, aux, sum], |sb, mut rs| {
        let sum = rs.pop().ok_or(CircuitError::EmptyRegister)?;
        let aux = rs.pop().ok_or(CircuitError::EmptyRegister)?;
        let idx = rs.pop().ok_or(CircuitError::EmptyRegister)?;
        let (idx, aux, sum) = subset_sum::<P, _>(sb, problem, idx, aux, sum)?;
        Ok(vec![idx, aux, sum])
    })?;
    let sum = rs.pop().ok_or(CircuitError::EmptyRegister)?;
    let aux = rs.pop().ok_or(CircuitError::EmptyRegister)?;
    let idx = rs.pop().ok_or(CircuitError::EmptyRegister)?;
    Ok((idx, aux, sum, out))
}

/// The registers of a subset sum search circuit.
#[derive(Debug)]
pub struct SubsetSumCircuit<P: Precision> {
    /// Builder holding the recorded circuit.
    pub builder: LocalBuilder<P>,
    /// One qubit per element of the vector.
    pub idx: Qudit,
    /// Holds the element being added.
    pub aux: Qudit,
    /// Accumulates the subset sum.
    pub sum: Qudit,
    /// Phase kickback qubit.
    pub out: Qudit,
    handle: StochasticMeasurementHandle,
}

impl<P: Precision> SubsetSumCircuit<P> {
    /// Build the search circuit with `iterations` rounds of oracle and diffusion.
    pub fn new(problem: &SubsetSumProblem, iterations: usize) -> CircuitResult<Self> {
        problem.validate()?;
        let w = problem.value_width();
        let mut b = LocalBuilder::<P>::default();
        let idx = b.try_register(problem.n())?;
        let aux = b.try_register(w)?;
        let sum = b.try_register(w)?;
        let out = b.qubit();
        debug!(
            n = problem.n(),
            w,
            qubits = b.n(),
            iterations,
            "subset sum circuit layout"
        );

        let mut idx = b.h(idx);
        let mut out = prepare_minus(&mut b, out);
        let (mut aux, mut sum) = (aux, sum);
        for _ in 0..iterations {
            let (i, a, s, o) = oracle(&mut b, problem, idx, aux, sum, out)?;
            idx = diffusion(&mut b, i)?;
            aux = a;
            sum = s;
            out = o;
        }
        let (idx, handle) = b.measure_stochastic(idx);
        debug!(depth = b.pipeline_depth(), "subset sum circuit built");
        Ok(Self {
            builder: b,
            idx,
            aux,
            sum,
            out,
            handle,
        })
    }

    /// Run the circuit and return the outcome distribution of the index register.
    pub fn probabilities(&mut self) -> CircuitResult<Vec<P>> {
        let (_, measured) = self.builder.calculate_state()?;
        measured
            .get_stochastic_measurement(self.handle)
            .map(<[P]>::to_vec)
            .ok_or_else(|| CircuitError::new("index register was not measured"))
    }
}

/// Run `iterations` rounds of Grover search and return the probability of each subset.
pub fn grover_search<P: Precision>(
    problem: &SubsetSumProblem,
    iterations: usize,
) -> CircuitResult<Vec<P>> {
    SubsetSumCircuit::<P>::new(problem, iterations)?.probabilities()
}

/// The outcome of a subset sum search.
#[derive(Debug, Clone)]
pub struct SubsetSumReport<P: Precision> {
    /// Number of Grover iterations run.
    pub iterations: usize,
    /// Subsets with exactly the target sum.
    pub solutions: Vec<usize>,
    /// Probability of each subset at the end of the search.
    pub probabilities: Vec<P>,
}

impl<P: Precision> SubsetSumReport<P> {
    /// The `count` most likely subsets, most likely first.
    pub fn most_likely(&self, count: usize) -> Vec<(usize, P)> {
        let mut ranked = self
            .probabilities
            .iter()
            .cloned()
            .enumerate()
            .collect::<Vec<_>>();
        ranked.sort_by(|(ia, pa), (ib, pb)| {
            pb.partial_cmp(pa)
                .unwrap_or(Ordering::Equal)
                .then(ia.cmp(ib))
        });
        ranked.truncate(count);
        ranked
    }

    /// Total probability of measuring one of the solutions.
    pub fn success_probability(&self) -> P {
        self.solutions
            .iter()
            .filter_map(|s| self.probabilities.get(*s))
            .cloned()
            .sum()
    }
}

/// Count the solutions classically, pick the optimal iteration count and run the search.
pub fn solve<P: Precision>(problem: &SubsetSumProblem) -> CircuitResult<SubsetSumReport<P>> {
    problem.validate()?;
    let solutions = problem.classical_solutions();
    let marked = problem.marked_states();
    if marked != solutions {
        warn!(
            exact = solutions.len(),
            marked = marked.len(),
            "sum register wraps, oracle marks subsets above the target"
        );
    }
    let iterations = optimal_iterations(problem.n(), marked.len())?;
    let probabilities = grover_search(problem, iterations)?;
    Ok(SubsetSumReport {
        iterations,
        solutions,
        probabilities,
    })
}

#[cfg(test)]
mod subset_sum_tests {
    use super::*;
    use crate::Complex;

    #[test]
    fn test_default_problem() -> CircuitResult<()> {
        let problem = SubsetSumProblem::default();
        problem.validate()?;
        assert_eq!(problem.value_width(), 5);
        assert_eq!(problem.num_qubits(), 16);
        assert_eq!(problem.classical_solutions(), vec![0b01010, 0b01101]);
        assert_eq!(problem.marked_states(), problem.classical_solutions());
        Ok(())
    }

    #[test]
    fn test_sum_of_msb_first() {
        let problem = SubsetSumProblem::default();
        assert_eq!(problem.sum_of(0b10000), 5);
        assert_eq!(problem.sum_of(0b00001), 1);
        assert_eq!(problem.sum_of(0b11111), 30);
    }

    #[test]
    fn test_validate() {
        assert!(SubsetSumProblem::new(vec![], 3).validate().is_err());
        assert!(SubsetSumProblem::new(vec![1], 0).validate().is_err());
        assert_eq!(
            SubsetSumProblem::new(vec![1, 9], 4).validate(),
            Err(CircuitError::ValueTooWide { value: 9, width: 3 })
        );
    }

    #[test]
    fn test_oversized_problem_rejected() {
        let problem = SubsetSumProblem::new(vec![1; 64], 1);
        assert_eq!(
            problem.validate(),
            Err(CircuitError::TooManyQubits {
                n: 67,
                max: MAX_QUBITS
            })
        );
        assert!(solve::<f64>(&problem).is_err());
        assert!(grover_search::<f64>(&problem, 1).is_err());
    }

    #[test]
    fn test_marked_states_wrap() {
        // 3 + 3 = 6 wraps to 2 mod 4
        let problem = SubsetSumProblem::new(vec![3, 3, 2], 2);
        assert_eq!(problem.classical_solutions(), vec![0b001]);
        assert_eq!(problem.marked_states(), vec![0b001, 0b110]);
    }

    fn run_subset_sum(problem: &SubsetSumProblem, mask: usize) -> CircuitResult<usize> {
        let w = problem.value_width();
        let mut b = LocalBuilder::<f64>::default();
        let idx = b.try_register(problem.n())?;
        let aux = b.try_register(w)?;
        let sum = b.try_register(w)?;
        let (idx, aux, sum) = subset_sum(&mut b, problem, idx, aux, sum)?;
        let (_, handle) = b.measure_stochastic(sum);
        let (_, aux_handle) = b.measure_stochastic(aux);
        let (_, measured) = b.calculate_state_with_init([(&idx, mask)])?;
        let aux_probs = measured
            .get_stochastic_measurement(aux_handle)
            .ok_or_else(|| CircuitError::new("missing"))?;
        assert!((aux_probs[0] - 1.0).abs() < 1e-9);
        let probs = measured
            .get_stochastic_measurement(handle)
            .ok_or_else(|| CircuitError::new("missing"))?;
        probs
            .iter()
            .position(|p| (p - 1.0).abs() < 1e-9)
            .ok_or_else(|| CircuitError::new("sum is not a basis state"))
    }

    #[test]
    fn test_subset_sum_register() -> CircuitResult<()> {
        let problem = SubsetSumProblem::new(vec![3, 1, 2], 7);
        for mask in 0..8 {
            assert_eq!(run_subset_sum(&problem, mask)?, problem.sum_of(mask));
        }
        Ok(())
    }

    #[test]
    fn test_oracle_flips_phase_and_cleans_up() -> CircuitResult<()> {
        let problem = SubsetSumProblem::new(vec![3, 1, 2], 3);
        let w = problem.value_width();
        let mut b = LocalBuilder::<f64>::default();
        let idx = b.try_register(problem.n())?;
        let aux = b.try_register(w)?;
        let sum = b.try_register(w)?;
        let out = b.qubit();
        let out = prepare_minus(&mut b, out);
        let (idx, _aux, _sum, _out) = oracle(&mut b, &problem, idx, aux, sum, out)?;

        let h = std::f64::consts::FRAC_1_SQRT_2;
        let shift = 2 * w + 1;
        let solutions = problem.classical_solutions();
        assert_eq!(solutions, vec![0b011, 0b100]);
        for mask in 0..8 {
            let (state, _) = b.calculate_state_with_init([(&idx, mask)])?;
            let sign = if solutions.contains(&mask) { -1.0 } else { 1.0 };
            let zero = mask << shift;
            assert!((state[zero] - Complex::from(sign * h)).norm() < 1e-9);
            assert!((state[zero | 1] + Complex::from(sign * h)).norm() < 1e-9);
        }
        Ok(())
    }

    #[test]
    fn test_most_likely() {
        let report = SubsetSumReport {
            iterations: 1,
            solutions: vec![2],
            probabilities: vec![0.1, 0.2, 0.6, 0.1],
        };
        assert_eq!(report.most_likely(2), vec![(2, 0.6), (1, 0.2)]);
        assert_eq!(report.most_likely(4)[2], (0, 0.1));
        assert!((report.success_probability() - 0.6f64).abs() < 1e-12);
    }

    #[test]
    fn test_search_small_problem() -> CircuitResult<()> {
        let problem = SubsetSumProblem::new(vec![3, 1, 2], 3);
        let report = solve::<f64>(&problem)?;
        // two marked of eight gives one iteration
        assert_eq!(report.iterations, 1);
        assert!(report.success_probability() > 0.99);
        Ok(())
    }
}
