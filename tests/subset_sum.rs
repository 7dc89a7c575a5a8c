use qarith::grover::optimal_iterations;
use qarith::prelude::*;
use qarith::subset_sum::{grover_search, oracle, solve, SubsetSumCircuit, SubsetSumProblem};

#[test]
fn test_default_problem_solutions() -> CircuitResult<()> {
    let problem = SubsetSumProblem::default();
    // 7 + 9 and 7 + 8 + 1
    assert_eq!(problem.classical_solutions(), vec![0b01010, 0b01101]);
    assert_eq!(optimal_iterations(problem.n(), 2)?, 3);
    Ok(())
}

#[test]
fn test_grover_amplifies_solutions() -> CircuitResult<()> {
    let problem = SubsetSumProblem::default();
    let probs = grover_search::<f64>(&problem, 3)?;
    assert_eq!(probs.len(), 32);
    for (subset, p) in probs.iter().enumerate() {
        if subset == 0b01010 || subset == 0b01101 {
            assert!(*p > 0.45, "solution {:05b} has p={}", subset, p);
        } else {
            assert!(*p < 0.01, "subset {:05b} has p={}", subset, p);
        }
    }
    assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    Ok(())
}

#[test]
fn test_solve_report() -> CircuitResult<()> {
    let report = solve::<f64>(&SubsetSumProblem::default())?;
    assert_eq!(report.iterations, 3);
    let top = report
        .most_likely(2)
        .into_iter()
        .map(|(s, _)| s)
        .collect::<Vec<_>>();
    assert!(top.contains(&0b01010));
    assert!(top.contains(&0b01101));
    assert!(report.success_probability() > 0.9);
    Ok(())
}

#[test]
fn test_oracle_leaves_ancillas_clean() -> CircuitResult<()> {
    let problem = SubsetSumProblem::default();
    let w = problem.value_width();
    let mut b = LocalBuilder::<f64>::default();
    let idx = b.try_register(problem.n())?;
    let aux = b.try_register(w)?;
    let sum = b.try_register(w)?;
    let out = b.qubit();
    let idx = b.h(idx);
    let (idx, aux, sum, out) = oracle(&mut b, &problem, idx, aux, sum, out)?;
    let ancillas = b.merge_two_registers(aux, sum);
    let (_ancillas, handle) = b.measure_stochastic(ancillas);
    let (_, measured) = b.calculate_state()?;
    let probs = measured
        .get_stochastic_measurement(handle)
        .ok_or_else(|| CircuitError::new("missing"))?;
    assert!((probs[0] - 1.0).abs() < 1e-9);
    let _ = (idx, out);
    Ok(())
}

#[test]
fn test_circuit_layout() -> CircuitResult<()> {
    let problem = SubsetSumProblem::default();
    let circuit = SubsetSumCircuit::<f64>::new(&problem, 0)?;
    assert_eq!(circuit.builder.n(), 16);
    assert_eq!(circuit.idx.indices(), &[0, 1, 2, 3, 4]);
    assert_eq!(circuit.aux.indices(), &[5, 6, 7, 8, 9]);
    assert_eq!(circuit.sum.indices(), &[10, 11, 12, 13, 14]);
    assert_eq!(circuit.out.indices(), &[15]);
    Ok(())
}

#[test]
fn test_invalid_problem_rejected() {
    let problem = SubsetSumProblem::new(vec![5, 40], 16);
    assert_eq!(
        grover_search::<f64>(&problem, 1).err(),
        Some(CircuitError::ValueTooWide {
            value: 40,
            width: 5
        })
    );
}
