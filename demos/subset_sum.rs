use qarith::plot::render_histogram;
use qarith::rand::rngs::StdRng;
use qarith::rand::SeedableRng;
use qarith::state_ops::measurement_ops::sample_counts;
use qarith::subset_sum::{solve, SubsetSumProblem};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let problem = SubsetSumProblem::default();
    problem.validate()?;
    info!(
        values = ?problem.values,
        target = problem.target,
        qubits = problem.num_qubits(),
        "searching for subsets"
    );

    let report = solve::<f64>(&problem)?;
    info!(
        k = report.solutions.len(),
        iterations = report.iterations,
        "grover iterations"
    );

    for (subset, p) in report.most_likely(report.solutions.len()) {
        let picked = problem
            .values
            .iter()
            .enumerate()
            .filter(|(i, _)| problem.contains(subset, *i))
            .map(|(_, v)| *v)
            .collect::<Vec<_>>();
        let label = format!("{:0w$b}", subset, w = problem.n());
        info!(subset = %label, ?picked, p, "candidate");
    }
    info!(
        p = report.success_probability(),
        "probability of measuring a solution"
    );

    print!("{}", render_histogram(&report.probabilities, problem.n(), 40));

    let shots = 1024;
    let mut rng = StdRng::seed_from_u64(2017);
    let counts = sample_counts(&report.probabilities, shots, &mut rng);
    let hits: usize = report.solutions.iter().map(|s| counts[*s]).sum();
    info!(shots, hits, "sampled measurements landing on a solution");
    Ok(())
}
