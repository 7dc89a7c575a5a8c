use proptest::prelude::*;
use qarith::arithmetic::{add_circuit, draper_add, draper_add_inv};
use qarith::prelude::*;

fn assert_basis_state(state: &[Complex<f64>], index: usize) {
    assert!(
        (state[index].norm_sqr() - 1.0).abs() < 1e-9,
        "expected |{}>, amplitude was {:?}",
        index,
        state[index]
    );
}

#[test]
fn test_adder_exhaustive_three_bits() -> CircuitResult<()> {
    let w = 3;
    let mut b = LocalBuilder::<f64>::default();
    let ra = b.try_register(w)?;
    let rb = b.try_register(w)?;
    let (ra, rb) = draper_add(&mut b, ra, rb)?;
    for a in 0..1 << w {
        for x in 0..1 << w {
            let (state, _) = b.calculate_state_with_init([(&ra, a), (&rb, x)])?;
            let sum = (a + x) % (1 << w);
            assert_basis_state(&state, (a << w) | sum);
        }
    }
    Ok(())
}

#[test]
fn test_adder_then_adjoint_restores_inputs() -> CircuitResult<()> {
    let w = 4;
    let mut b = LocalBuilder::<f64>::default();
    let ra = b.try_register(w)?;
    let rb = b.try_register(w)?;
    let (ra, rb) = draper_add(&mut b, ra, rb)?;
    let (ra, rb) = draper_add_inv(&mut b, ra, rb)?;
    for (a, x) in [(0, 0), (3, 12), (15, 15), (9, 6)] {
        let (state, _) = b.calculate_state_with_init([(&ra, a), (&rb, x)])?;
        assert_basis_state(&state, (a << w) | x);
    }
    Ok(())
}

#[test]
fn test_demo_addition() -> CircuitResult<()> {
    let mut circuit = add_circuit::<f64>(10, 6, 5)?;
    let probs = circuit.probabilities()?;
    assert_eq!(probs.len(), 32);
    assert!((probs[16] - 1.0).abs() < 1e-9);
    assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    Ok(())
}

#[test]
fn test_single_precision() -> CircuitResult<()> {
    let mut circuit = add_circuit::<f32>(5, 2, 3)?;
    let probs = circuit.probabilities()?;
    assert!((probs[7] - 1.0).abs() < 1e-4);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// The sum register holds (a + b) mod 32 and the a register is untouched.
    #[test]
    fn prop_adder_five_bits(a in 0usize..32, x in 0usize..32) {
        let w = 5;
        let mut b = LocalBuilder::<f64>::default();
        let ra = b.try_register(w).unwrap();
        let rb = b.try_register(w).unwrap();
        let (ra, rb) = draper_add(&mut b, ra, rb).unwrap();
        let (ra, ha) = b.measure_stochastic(ra);
        let (rb, hb) = b.measure_stochastic(rb);
        let (_, measured) = b.calculate_state_with_init([(&ra, a), (&rb, x)]).unwrap();
        let pa = measured.get_stochastic_measurement(ha).unwrap();
        let pb = measured.get_stochastic_measurement(hb).unwrap();
        prop_assert!((pa[a] - 1.0).abs() < 1e-9);
        prop_assert!((pb[(a + x) % 32] - 1.0).abs() < 1e-9);
    }
}
