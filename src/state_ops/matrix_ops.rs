#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::errors::{CircuitError, CircuitResult};
use crate::iter_mut;
use crate::utils::{get_bit, set_bit};
use crate::{Complex, Precision};
use num_traits::{One, Zero};
use smallvec::SmallVec;

/// Control qubits of an op, paired with the value each must hold for the op to apply.
pub type Controls = SmallVec<[(usize, bool); 4]>;

/// Ops which can be applied to quantum states.
///
/// Qubit indices are big-endian: qubit `0` is the most significant bit of the state index.
#[derive(Clone, Debug, PartialEq)]
pub enum MatrixOp<P> {
    /// Target qubit, 2x2 matrix organized as `|0><0|, |0><1|, |1><0|, |1><1|`.
    Matrix(usize, [P; 4]),
    /// Exchange two qubits.
    Swap(usize, usize),
    /// Multiply every amplitude by a factor.
    GlobalPhase(P),
    /// Apply the inner op only on rows where each control qubit holds its value.
    Control(Controls, Box<MatrixOp<P>>),
}

impl<P> MatrixOp<P> {
    /// All qubit indices touched by this op, controls first.
    pub fn indices(&self) -> Vec<usize> {
        match self {
            MatrixOp::Matrix(t, _) => vec![*t],
            MatrixOp::Swap(a, b) => vec![*a, *b],
            MatrixOp::GlobalPhase(_) => vec![],
            MatrixOp::Control(cs, op) => cs
                .iter()
                .map(|(c, _)| *c)
                .chain(op.indices())
                .collect(),
        }
    }
}

/// Make a single qubit Matrix MatrixOp.
pub fn make_matrix_op<P>(indices: &[usize], dat: [P; 4]) -> CircuitResult<MatrixOp<P>> {
    match indices {
        [t] => Ok(MatrixOp::Matrix(*t, dat)),
        _ => Err(CircuitError::RegisterSizeMismatch {
            expected: 1,
            found: indices.len(),
        }),
    }
}

/// Make a Swap MatrixOp
pub fn make_swap_op<P>(a: usize, b: usize) -> CircuitResult<MatrixOp<P>> {
    if a == b {
        Err(CircuitError::DuplicateWire(a))
    } else {
        Ok(MatrixOp::Swap(a, b))
    }
}

/// Make a Control MatrixOp, `values[i]` is the required state of `c_indices[i]`.
pub fn make_control_op<P>(
    c_indices: &[usize],
    values: &[bool],
    op: MatrixOp<P>,
) -> CircuitResult<MatrixOp<P>> {
    if c_indices.is_empty() {
        return Err(CircuitError::new("Must supply at least one control index"));
    }
    if c_indices.len() != values.len() {
        return Err(CircuitError::ControlValueCount {
            expected: c_indices.len(),
            found: values.len(),
        });
    }
    let op_indices = op.indices();
    for (i, c) in c_indices.iter().enumerate() {
        if op_indices.contains(c) || c_indices[..i].contains(c) {
            return Err(CircuitError::DuplicateWire(*c));
        }
    }
    let mut controls: Controls = c_indices.iter().cloned().zip(values.iter().cloned()).collect();
    match op {
        MatrixOp::Control(inner_controls, inner) => {
            controls.extend(inner_controls);
            Ok(MatrixOp::Control(controls, inner))
        }
        op => Ok(MatrixOp::Control(controls, Box::new(op))),
    }
}

/// Invert a unitary op (equivalent to conjugate transpose).
pub fn invert_op<P: Precision>(op: MatrixOp<Complex<P>>) -> MatrixOp<Complex<P>> {
    match op {
        MatrixOp::Matrix(t, [a, b, c, d]) => {
            MatrixOp::Matrix(t, [a.conj(), c.conj(), b.conj(), d.conj()])
        }
        MatrixOp::Swap(a, b) => MatrixOp::Swap(a, b),
        MatrixOp::GlobalPhase(f) => MatrixOp::GlobalPhase(f.conj()),
        MatrixOp::Control(cs, op) => MatrixOp::Control(cs, Box::new(invert_op(*op))),
    }
}

/// Value of row `row` of `op * input` for a state of `n` qubits.
fn row_value<P: Precision>(
    n: usize,
    op: &MatrixOp<Complex<P>>,
    row: usize,
    input: &[Complex<P>],
) -> Complex<P> {
    match op {
        MatrixOp::Matrix(t, mat) => {
            let shift = n - 1 - t;
            let bit = get_bit(row, shift) as usize;
            let r0 = set_bit(row, shift, false);
            let r1 = set_bit(row, shift, true);
            mat[2 * bit] * input[r0] + mat[2 * bit + 1] * input[r1]
        }
        MatrixOp::Swap(a, b) => {
            let (sa, sb) = (n - 1 - a, n - 1 - b);
            let col = set_bit(set_bit(row, sa, get_bit(row, sb)), sb, get_bit(row, sa));
            input[col]
        }
        MatrixOp::GlobalPhase(f) => *f * input[row],
        MatrixOp::Control(cs, op) => {
            if cs.iter().all(|(c, v)| get_bit(row, n - 1 - c) == *v) {
                row_value(n, op, row, input)
            } else {
                input[row]
            }
        }
    }
}

/// Apply `op` to the `input` state of `n` qubits, storing the results in `output`.
/// Every index in `op` must be less than `n` and both slices must hold `2^n` entries.
pub fn apply_op<P: Precision>(
    n: usize,
    op: &MatrixOp<Complex<P>>,
    input: &[Complex<P>],
    output: &mut [Complex<P>],
) {
    debug_assert_eq!(input.len(), 1 << n);
    debug_assert_eq!(output.len(), 1 << n);
    let row_fn = |(row, outputloc): (usize, &mut Complex<P>)| {
        *outputloc = row_value(n, op, row, input);
    };
    iter_mut!(output).enumerate().for_each(row_fn);
}

/// Make a vector of complex numbers whose reals are given by `data`
pub fn from_reals<P: Precision>(data: &[P]) -> Vec<Complex<P>> {
    data.iter()
        .map(|x| Complex::<P> {
            re: *x,
            im: P::zero(),
        })
        .collect()
}

/// Make the full op matrix from `op`, one output column per basis input.
/// Not very efficient, use only for debugging.
pub fn make_op_matrix<P: Precision>(n: usize, op: &MatrixOp<Complex<P>>) -> Vec<Vec<Complex<P>>> {
    (0..1 << n)
        .map(|i| {
            let mut input = vec![Complex::zero(); 1 << n];
            let mut output = input.clone();
            input[i] = Complex::one();
            apply_op(n, op, &input, &mut output);
            output
        })
        .collect()
}

#[cfg(test)]
mod state_ops_tests {
    use super::*;

    fn x_mat() -> [Complex<f64>; 4] {
        let o = Complex::zero();
        let l = Complex::one();
        [o, l, l, o]
    }

    #[test]
    fn test_apply_identity() {
        let identity = from_reals(&[1.0, 0.0, 0.0, 1.0]).try_into().unwrap();
        let op = make_matrix_op(&[0], identity).unwrap();
        let input = from_reals(&[1.0, 0.0]);
        let mut output = from_reals(&[0.0, 0.0]);
        apply_op(1, &op, &input, &mut output);

        assert_eq!(input, output);
    }

    #[test]
    fn test_apply_swap_mat() {
        let op = make_matrix_op(&[0], x_mat()).unwrap();
        let mut input = from_reals(&[1.0, 0.0]);
        let mut output = from_reals(&[0.0, 0.0]);
        apply_op(1, &op, &input, &mut output);

        input.reverse();
        assert_eq!(input, output);
    }

    #[test]
    fn test_apply_swap_mat_first() {
        let op = make_matrix_op(&[0], x_mat()).unwrap();

        let input = from_reals(&[1.0, 0.0, 0.0, 0.0]);
        let mut output = from_reals(&[0.0, 0.0, 0.0, 0.0]);
        apply_op(2, &op, &input, &mut output);

        let expected = from_reals(&[0.0, 0.0, 1.0, 0.0]);
        assert_eq!(expected, output);

        let op = make_matrix_op(&[1], x_mat()).unwrap();
        let mut output = from_reals(&[0.0, 0.0, 0.0, 0.0]);
        apply_op(2, &op, &input, &mut output);

        let expected = from_reals(&[0.0, 1.0, 0.0, 0.0]);
        assert_eq!(expected, output);
    }

    #[test]
    fn test_apply_cnot() {
        let op = make_control_op(&[0], &[true], make_matrix_op(&[1], x_mat()).unwrap()).unwrap();
        // |10> -> |11>
        let input = from_reals(&[0.0, 0.0, 1.0, 0.0]);
        let mut output = input.clone();
        apply_op(2, &op, &input, &mut output);
        assert_eq!(output, from_reals(&[0.0, 0.0, 0.0, 1.0]));

        // |00> is untouched
        let input = from_reals(&[1.0, 0.0, 0.0, 0.0]);
        apply_op(2, &op, &input, &mut output);
        assert_eq!(output, input);
    }

    #[test]
    fn test_apply_control_on_zero() {
        let op = make_control_op(&[0], &[false], make_matrix_op(&[1], x_mat()).unwrap()).unwrap();
        let input = from_reals(&[1.0, 0.0, 0.0, 0.0]);
        let mut output = input.clone();
        apply_op(2, &op, &input, &mut output);
        assert_eq!(output, from_reals(&[0.0, 1.0, 0.0, 0.0]));
    }

    #[test]
    fn test_apply_swap() {
        let op = make_swap_op(0, 2).unwrap();
        // |100> -> |001>
        let mut input = vec![Complex::<f64>::zero(); 8];
        input[0b100] = Complex::one();
        let mut output = input.clone();
        apply_op(3, &op, &input, &mut output);
        let mut expected = vec![Complex::<f64>::zero(); 8];
        expected[0b001] = Complex::one();
        assert_eq!(output, expected);
    }

    #[test]
    fn test_nested_controls_flatten() {
        let inner =
            make_control_op(&[1], &[true], make_matrix_op(&[2], x_mat()).unwrap()).unwrap();
        let op = make_control_op(&[0], &[true], inner).unwrap();
        match &op {
            MatrixOp::Control(cs, _) => assert_eq!(cs.len(), 2),
            _ => panic!("expected control op"),
        }
        assert_eq!(op.indices(), vec![0, 1, 2]);
    }

    #[test]
    fn test_control_overlap_rejected() {
        let op = make_matrix_op(&[1], x_mat()).unwrap();
        assert_eq!(
            make_control_op(&[1], &[true], op),
            Err(CircuitError::DuplicateWire(1))
        );
        assert_eq!(
            make_swap_op::<Complex<f64>>(2, 2),
            Err(CircuitError::DuplicateWire(2))
        );
    }

    #[test]
    fn test_invert_phase() {
        let phase = Complex::from_polar(1.0, 0.3);
        let op = make_matrix_op(&[0], [Complex::one(), Complex::zero(), Complex::zero(), phase])
            .unwrap();
        let inv = invert_op(op.clone());
        let input = from_reals(&[0.0, 1.0]);
        let mut mid = input.clone();
        let mut output = input.clone();
        apply_op(1, &op, &input, &mut mid);
        apply_op(1, &inv, &mid, &mut output);
        assert!((output[1] - Complex::one()).norm() < 1e-12);
    }

    #[test]
    fn test_make_op_matrix_hadamard_columns() {
        let h = std::f64::consts::FRAC_1_SQRT_2;
        let op = make_matrix_op(&[0], from_reals(&[h, h, h, -h]).try_into().unwrap()).unwrap();
        let m = make_op_matrix(1, &op);
        assert_eq!(m[0], from_reals(&[h, h]));
        assert_eq!(m[1], from_reals(&[h, -h]));
    }
}
