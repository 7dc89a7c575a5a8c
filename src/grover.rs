use crate::builder_traits::*;
use crate::errors::{CircuitError, CircuitResult};
use crate::types::Precision;
use num_rational::Rational64;
use num_traits::One;

/// Apply the Grover diffusion operator `2|s><s| - I` to `r`, where `|s>` is the uniform
/// superposition over `r`.
pub fn diffusion<P, CB>(b: &mut CB, r: CB::Register) -> CircuitResult<CB::Register>
where
    CB: MultiControlBuilder<P>,
    P: Precision,
{
    let r = b.h(r);
    let r = b.x(r);
    let r = match b.split_last_qubit(r) {
        (Some(cr), t) => {
            let control_values = vec![true; cr.n()];
            let (cr, t) = b.multi_controlled_z(cr, t, &control_values)?;
            b.merge_two_registers(cr, t)
        }
        (None, t) => b.z(t),
    };
    let r = b.x(r);
    let r = b.h(r);
    // H X Z X H gives I - 2|s><s|.
    Ok(b.global_phase_ratio(r, Rational64::one()))
}

/// Optimal number of Grover iterations for `k` marked states among `2^n`:
/// `floor(pi/4 * sqrt(2^n / k))`.
///
/// # Example
/// ```
/// use qarith::grover::optimal_iterations;
///
/// assert_eq!(optimal_iterations(5, 2).unwrap(), 3);
/// assert!(optimal_iterations(5, 0).is_err());
/// ```
pub fn optimal_iterations(n: usize, k: usize) -> CircuitResult<usize> {
    if k == 0 {
        return Err(CircuitError::NoSolutions);
    }
    let space = 2f64.powi(n as i32);
    Ok((std::f64::consts::FRAC_PI_4 * (space / k as f64).sqrt()).floor() as usize)
}

/// Put the phase kickback qubit `q` (assumed `|0>`) into `|->`.
pub fn prepare_minus<P, CB>(b: &mut CB, q: CB::Register) -> CB::Register
where
    CB: CliffordTBuilder<P>,
    P: Precision,
{
    let q = b.x(q);
    b.h(q)
}

#[cfg(test)]
mod grover_tests {
    use super::*;
    use crate::builder::LocalBuilder;
    use crate::state_ops::matrix_ops::from_reals;
    use crate::Complex;

    #[test]
    fn test_optimal_iterations() {
        assert_eq!(optimal_iterations(5, 2), Ok(3));
        assert_eq!(optimal_iterations(2, 1), Ok(1));
        assert_eq!(optimal_iterations(10, 1), Ok(25));
        assert_eq!(optimal_iterations(3, 0), Err(CircuitError::NoSolutions));
    }

    #[test]
    fn test_diffusion_matrix() -> CircuitResult<()> {
        for n in 1..=3 {
            let nn = 1usize << n;
            for x in 0..nn {
                let mut b = LocalBuilder::<f64>::default();
                let r = b.try_register(n)?;
                let r = diffusion(&mut b, r)?;
                let (state, _) = b.calculate_state_with_init([(&r, x)])?;
                // column x of 2|s><s| - I
                let expected = (0..nn)
                    .map(|y| 2.0 / nn as f64 - if y == x { 1.0 } else { 0.0 })
                    .collect::<Vec<_>>();
                let expected = from_reals(&expected);
                for (a, e) in state.iter().zip(&expected) {
                    assert!((a - e).norm() < 1e-10, "n={} x={}", n, x);
                }
            }
        }
        Ok(())
    }

    #[test]
    fn test_prepare_minus() -> CircuitResult<()> {
        let mut b = LocalBuilder::<f64>::default();
        let q = b.qubit();
        let _q = prepare_minus(&mut b, q);
        let (state, _) = b.calculate_state()?;
        let h = std::f64::consts::FRAC_1_SQRT_2;
        assert!((state[0] - Complex::from(h)).norm() < 1e-12);
        assert!((state[1] + Complex::from(h)).norm() < 1e-12);
        Ok(())
    }
}
