#[macro_use]
extern crate bencher;

use bencher::Bencher;

use qarith::arithmetic::draper_add;
use qarith::prelude::*;
use qarith::qfft::qft;
use qarith::subset_sum::{SubsetSumCircuit, SubsetSumProblem};

fn bench_qft_eight(bencher: &mut Bencher) {
    let mut b = LocalBuilder::<f64>::default();
    let r = b.try_register(8).unwrap();
    let r = qft(&mut b, r).unwrap();
    bencher.iter(|| b.calculate_state_with_init([(&r, 0b10110011)]).unwrap());
}

fn bench_draper_add_five(bencher: &mut Bencher) {
    let mut b = LocalBuilder::<f64>::default();
    let ra = b.try_register(5).unwrap();
    let rb = b.try_register(5).unwrap();
    let (ra, rb) = draper_add(&mut b, ra, rb).unwrap();
    bencher.iter(|| b.calculate_state_with_init([(&ra, 10), (&rb, 6)]).unwrap());
}

fn bench_subset_sum_iteration(bencher: &mut Bencher) {
    let problem = SubsetSumProblem::default();
    let mut circuit = SubsetSumCircuit::<f64>::new(&problem, 1).unwrap();
    bencher.iter(|| circuit.probabilities().unwrap());
}

benchmark_group!(
    benches,
    bench_qft_eight,
    bench_draper_add_five,
    bench_subset_sum_iteration,
);
benchmark_main!(benches);
