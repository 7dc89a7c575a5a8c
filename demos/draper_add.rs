use anyhow::Context;
use qarith::arithmetic::add_circuit;
use qarith::draw::draw;
use qarith::plot::render_histogram;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let (a, b) = (10, 6);
    // 16 = 0b10000 needs 5 bits
    let width = 5;

    let mut circuit = add_circuit::<f64>(a, b, width)?;
    println!("{}", draw(&circuit.builder));

    let probs = circuit.probabilities()?;
    let (sum, p) = probs
        .iter()
        .cloned()
        .enumerate()
        .max_by(|(_, pa), (_, pb)| pa.total_cmp(pb))
        .context("sum register has no outcomes")?;
    info!(a, b, sum, p, "addition finished");

    print!("{}", render_histogram(&probs, width, 40));
    Ok(())
}
