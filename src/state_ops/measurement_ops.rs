#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::types::Representation;
use crate::utils::get_bit;
use crate::{into_iter, iter, iter_mut};
use crate::{Complex, Precision};
use rand::Rng;

/// Get total magnitude of state.
pub fn prob_magnitude<P: Precision>(input: &[Complex<P>]) -> P {
    iter!(input).map(Complex::<P>::norm_sqr).sum()
}

/// Bit of the outcome `measured` contributed by the `i`th of `k` measured qubits.
#[inline]
fn outcome_bit(measured: usize, i: usize, k: usize, repr: Representation) -> bool {
    match repr {
        Representation::LittleEndian => get_bit(measured, i),
        Representation::BigEndian => get_bit(measured, k - 1 - i),
    }
}

/// The outcome that measuring `indices` of basis state `row` would give.
///
/// # Example
/// ```
/// use qarith::state_ops::measurement_ops::outcome_of_row;
/// use qarith::Representation;
///
/// // |abc> = |110>, qubit 0 is the highest bit of the row.
/// assert_eq!(outcome_of_row(3, &[0, 2], 0b110, Representation::BigEndian), 0b10);
/// assert_eq!(outcome_of_row(3, &[0, 2], 0b110, Representation::LittleEndian), 0b01);
/// ```
pub fn outcome_of_row(n: usize, indices: &[usize], row: usize, repr: Representation) -> usize {
    let k = indices.len();
    indices.iter().enumerate().fold(0, |acc, (i, index)| {
        let bit = get_bit(row, n - 1 - index) as usize;
        match repr {
            Representation::LittleEndian => acc | (bit << i),
            Representation::BigEndian => acc | (bit << (k - 1 - i)),
        }
    })
}

/// Calculate the probability of a given measurement. `measured` gives the bits (as a usize) which
/// have been measured from the qubits at `indices`, ordered according to `repr`. `input` gives the
/// state from which to measure, representing a total of `n` qubits.
///
/// Keep in mind that qubits are big-endian to match kron product standards.
/// `|abc>` means `q0=a`, `q1=b`, `q2=c`
///
/// # Examples
/// ```
/// use qarith::state_ops::matrix_ops::from_reals;
/// use qarith::state_ops::measurement_ops::measure_prob;
/// use qarith::Representation;
///
/// // Make the state |10>, qubit 0 is always |1> and qubit 1 is always |0>
/// let input = from_reals(&[0.0, 0.0, 1.0, 0.0]);
///
/// let p = measure_prob(2, 0, &[0], &input, Representation::BigEndian);
/// assert_eq!(p, 0.0);
///
/// let p = measure_prob(2, 1, &[0], &input, Representation::BigEndian);
/// assert_eq!(p, 1.0);
///
/// let p = measure_prob(2, 0b10, &[0, 1], &input, Representation::BigEndian);
/// assert_eq!(p, 1.0);
///
/// let p = measure_prob(2, 0b01, &[0, 1], &input, Representation::LittleEndian);
/// assert_eq!(p, 1.0);
/// ```
pub fn measure_prob<P: Precision>(
    n: usize,
    measured: usize,
    indices: &[usize],
    input: &[Complex<P>],
    repr: Representation,
) -> P {
    let k = indices.len();
    let template: usize = indices
        .iter()
        .enumerate()
        .fold(0, |acc, (i, index)| -> usize {
            let sel_bit = outcome_bit(measured, i, k, repr) as usize;
            acc | (sel_bit << (n - 1 - index))
        });
    let remaining_indices: Vec<usize> = (0..n).filter(|i| !indices.contains(i)).collect();

    let f = |remaining_index_bits: usize| -> P {
        let tmp_index: usize = remaining_indices
            .iter()
            .enumerate()
            .fold(0, |acc, (i, index)| -> usize {
                let sel_bit = (remaining_index_bits >> i) & 1;
                acc | (sel_bit << (n - 1 - index))
            });
        input[tmp_index | template].norm_sqr()
    };

    let r = 0usize..1 << remaining_indices.len();
    into_iter!(r).map(f).sum()
}

/// Get probability for each possible measurement of `indices` on `input`.
pub fn measure_probs<P: Precision>(
    n: usize,
    indices: &[usize],
    input: &[Complex<P>],
    repr: Representation,
) -> Vec<P> {
    let r = 0usize..1 << indices.len();
    into_iter!(r)
        .map(|measured| measure_prob(n, measured, indices, input, repr))
        .collect()
}

/// Sample a measurement of the qubits at `indices` from a state `input`, without collapsing it.
///
/// # Examples
/// ```
/// use qarith::state_ops::matrix_ops::from_reals;
/// use qarith::state_ops::measurement_ops::soft_measure;
/// use qarith::Representation;
///
/// let mut rng = rand::thread_rng();
/// // Make the state |10>
/// let input = from_reals(&[0.0, 0.0, 1.0, 0.0]);
///
/// assert_eq!(soft_measure(2, &[0], &input, Representation::BigEndian, &mut rng), 1);
/// assert_eq!(soft_measure(2, &[1], &input, Representation::BigEndian, &mut rng), 0);
/// assert_eq!(soft_measure(2, &[0, 1], &input, Representation::BigEndian, &mut rng), 0b10);
/// assert_eq!(soft_measure(2, &[1, 0], &input, Representation::BigEndian, &mut rng), 0b01);
/// ```
pub fn soft_measure<P: Precision, R: Rng + ?Sized>(
    n: usize,
    indices: &[usize],
    input: &[Complex<P>],
    repr: Representation,
    rng: &mut R,
) -> usize {
    let mut r = P::from(rng.gen::<f64>()).unwrap_or_else(P::zero) * prob_magnitude(input);
    let mut measured_indx = 0;
    for (i, c) in input.iter().enumerate() {
        let p = c.norm_sqr();
        if p.is_zero() {
            continue;
        }
        measured_indx = i;
        r -= p;
        if r <= P::zero() {
            break;
        }
    }
    outcome_of_row(n, indices, measured_indx, repr)
}

/// Draw `shots` samples from the outcome distribution `probs` and count each outcome.
///
/// # Example
/// ```
/// use qarith::state_ops::measurement_ops::sample_counts;
///
/// let mut rng = rand::thread_rng();
/// let counts = sample_counts(&[0.0, 1.0, 0.0, 0.0], 100, &mut rng);
/// assert_eq!(counts, vec![0, 100, 0, 0]);
/// ```
pub fn sample_counts<P: Precision, R: Rng + ?Sized>(
    probs: &[P],
    shots: usize,
    rng: &mut R,
) -> Vec<usize> {
    let mut counts = vec![0; probs.len()];
    let total: P = probs.iter().cloned().sum();
    if probs.is_empty() || total <= P::zero() {
        return counts;
    }
    let cumulative = probs
        .iter()
        .scan(P::zero(), |acc, p| {
            *acc += *p;
            Some(*acc)
        })
        .collect::<Vec<_>>();
    let last_nonzero = probs.iter().rposition(|p| !p.is_zero()).unwrap_or(0);
    for _ in 0..shots {
        let r = P::from(rng.gen::<f64>()).unwrap_or_else(P::zero) * total;
        let outcome = cumulative
            .iter()
            .position(|c| r < *c)
            .unwrap_or(last_nonzero);
        counts[outcome] += 1;
    }
    counts
}

/// Selects a measured outcome of `indices` from `input`, then calls `measure_state` to write the
/// collapsed state to `output`. Returns the measured outcome and its probability.
pub fn measure<P: Precision, R: Rng + ?Sized>(
    n: usize,
    indices: &[usize],
    input: &[Complex<P>],
    output: &mut [Complex<P>],
    repr: Representation,
    rng: &mut R,
) -> (usize, P) {
    let m = soft_measure(n, indices, input, repr, rng);
    let p = measure_prob(n, m, indices, input, repr);
    let measured = (m, p);
    measure_state(n, indices, measured, input, output, repr);
    measured
}

/// Normalize the output state such that it matches only states which produce the `measured`
/// result and has the same magnitude.
/// This is done by zeroing out the states which cannot give `measured`, and dividing the remaining
/// by `sqrt(p)` for p=`measured_prob`. See `measure_prob` for details.
pub fn measure_state<P: Precision>(
    n: usize,
    indices: &[usize],
    measured: (usize, P),
    input: &[Complex<P>],
    output: &mut [Complex<P>],
    repr: Representation,
) {
    let (measured, measured_prob) = measured;
    if measured_prob.is_zero() {
        return;
    }
    let p_mult = P::one() / measured_prob.sqrt();
    let k = indices.len();

    let row_mask: usize = indices.iter().map(|index| 1 << (n - 1 - index)).sum();
    let measured_mask: usize = indices
        .iter()
        .enumerate()
        .map(|(i, index)| (outcome_bit(measured, i, k, repr) as usize) << (n - 1 - index))
        .sum();

    let f = |(row, (input, output)): (usize, (&Complex<P>, &mut Complex<P>))| {
        if (row & row_mask) ^ measured_mask != 0 {
            *output = Complex::default();
        } else {
            *output = (*input) * p_mult;
        }
    };

    let input_iter = iter!(input);
    let output_iter = iter_mut!(output);
    input_iter.zip(output_iter).enumerate().for_each(f);
}

#[cfg(test)]
mod measurement_tests {
    use super::*;
    use crate::state_ops::matrix_ops::from_reals;
    use num_traits::Zero;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn round(c: Complex<f64>) -> Complex<f64> {
        Complex {
            re: c.re.round(),
            im: c.im.round(),
        }
    }

    fn approx_eq(a: &[Complex<f64>], b: &[Complex<f64>], prec: i32) {
        let prec = 10.0f64.powi(-prec);
        let a: Vec<Complex<f64>> = a.iter().map(|f| round(f * prec) / prec).collect();
        let b: Vec<Complex<f64>> = b.iter().map(|f| round(f * prec) / prec).collect();
        assert_eq!(a, b)
    }

    #[test]
    fn test_measure_state() {
        let n = 2;
        let m = 0;
        let input = from_reals(&[0.5, 0.5, 0.5, 0.5]);
        let p = measure_prob(n, m, &[0], &input, Representation::BigEndian);
        assert!((p - 0.5f64).abs() < f64::EPSILON);

        let mut output = input.clone();
        measure_state(n, &[0], (m, p), &input, &mut output, Representation::BigEndian);

        let half: f64 = 1.0 / 2.0;
        approx_eq(
            &output,
            &from_reals(&[half.sqrt(), half.sqrt(), 0.0, 0.0]),
            10,
        );
    }

    #[test]
    fn test_measure_state2() {
        let n = 2;
        let m = 1;
        let input = from_reals(&[0.5, 0.5, 0.5, 0.5]);
        let p = measure_prob(n, m, &[0], &input, Representation::BigEndian);
        assert!((p - 0.5f64).abs() < f64::EPSILON);

        let mut output = input.clone();
        measure_state(n, &[0], (m, p), &input, &mut output, Representation::BigEndian);

        let half: f64 = 1.0 / 2.0;
        approx_eq(
            &output,
            &from_reals(&[0.0, 0.0, half.sqrt(), half.sqrt()]),
            10,
        );
    }

    #[test]
    fn test_measure_probs() {
        let n = 2;
        let input = from_reals(&[0.5, 0.5, 0.5, 0.5]);
        let p = measure_probs(n, &[1], &input, Representation::BigEndian);
        assert_eq!(p, vec![0.5, 0.5]);
    }

    #[test]
    fn test_measure_probs_ordering() {
        // |011> with amplitude 1.
        let mut input = vec![Complex::<f64>::zero(); 8];
        input[0b011] = Complex::new(1.0, 0.0);
        let big = measure_probs(3, &[0, 1, 2], &input, Representation::BigEndian);
        let little = measure_probs(3, &[0, 1, 2], &input, Representation::LittleEndian);
        assert_eq!(big[0b011], 1.0);
        assert_eq!(little[0b110], 1.0);
    }

    #[test]
    fn test_measure_collapses() {
        let mut rng = StdRng::seed_from_u64(7);
        let input = from_reals(&[0.5, 0.5, 0.5, 0.5]);
        let mut output = input.clone();
        let (m, p) = measure(2, &[0], &input, &mut output, Representation::BigEndian, &mut rng);
        assert!((p - 0.5f64).abs() < 1e-12);
        let after = measure_prob(2, m, &[0], &output, Representation::BigEndian);
        assert!((after - 1.0f64).abs() < 1e-12);
        assert!((prob_magnitude(&output) - 1.0f64).abs() < 1e-12);
    }

    #[test]
    fn test_sample_counts_total() {
        let mut rng = StdRng::seed_from_u64(11);
        let counts = sample_counts(&[0.25f64, 0.25, 0.5, 0.0], 1000, &mut rng);
        assert_eq!(counts.iter().sum::<usize>(), 1000);
        assert_eq!(counts[3], 0);
        assert!(counts[2] > counts[0]);
    }
}
