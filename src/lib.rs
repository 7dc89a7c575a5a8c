#![forbid(unsafe_code)]
#![deny(
    unreachable_pub,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    missing_docs
)]

//! Quantum arithmetic in the Fourier basis and a Grover search built on top of it, evaluated on a
//! small state-vector simulator.
//!
//! Circuits are recorded by a builder which hands out registers by value, so each qubit is moved
//! into and back out of every gate it takes part in. Integers are written onto registers most
//! significant bit first and the first allocated qubit is the most significant bit of the state
//! index.
//!
//! # Example (Draper adder)
//! ```
//! use qarith::prelude::*;
//! use qarith::arithmetic::{draper_add, set_value};
//!
//! # fn main() -> CircuitResult<()> {
//! let mut b = LocalBuilder::<f64>::default();
//! let ra = b.try_register(4)?;
//! let rb = b.try_register(4)?;
//!
//! // |a>|b> -> |a>|a+b>
//! let ra = set_value(&mut b, ra, 9)?;
//! let rb = set_value(&mut b, rb, 5)?;
//! let (ra, rb) = draper_add(&mut b, ra, rb)?;
//!
//! // Record the outcome distribution of the sum without collapsing the state.
//! let (rb, handle) = b.measure_stochastic(rb);
//! let (_, measured) = b.calculate_state()?;
//! let probs = measured.get_stochastic_measurement(handle).unwrap();
//! assert!((probs[14] - 1.0).abs() < 1e-10);
//! # let _ = (ra, rb);
//! # Ok(())
//! # }
//! ```
//!
//! # Example (subset sum)
//! ```no_run
//! use qarith::subset_sum::{solve, SubsetSumProblem};
//!
//! # fn main() -> qarith::errors::CircuitResult<()> {
//! // Subsets of [5, 7, 8, 9, 1] summing to 16.
//! let report = solve::<f64>(&SubsetSumProblem::default())?;
//! for (subset, p) in report.most_likely(2) {
//!     println!("{:05b}: {:.3}", subset, p);
//! }
//! # Ok(())
//! # }
//! ```

/// Draper adder and basis state preparation.
pub mod arithmetic;
/// A circuit builder implementation which builds circuits out of simple elements.
pub mod builder;
/// Standard traits for circuit builders.
pub mod builder_traits;
/// Text circuit diagrams.
pub mod draw;
/// Circuit builder error types.
pub mod errors;
/// Grover diffusion and iteration counts.
pub mod grover;
/// Functions and traits for inverting circuits.
pub mod inverter;
/// Text histograms of outcome distributions.
pub mod plot;
/// Standard quantum fourier transform implementation.
pub mod qfft;
mod rayon_helper;
/// Lower-level circuit operations.
pub mod state_ops;
pub mod subset_sum;
/// Reusable types.
pub mod types;
/// Utility functions for bit and index manipulation
pub mod utils;

pub use num_complex::Complex;
pub use rand;
pub use types::*;

/// Commonly used types and traits.
/// ```
/// use qarith::prelude::*;
/// ```
pub mod prelude {
    pub use super::*;
    pub use crate::builder::LocalBuilder;
    pub use crate::builder_traits::*;
    pub use crate::errors::*;
    pub use crate::inverter::RecursiveCircuitBuilder;
}
