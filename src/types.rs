use num_traits::{Float, FloatConst, NumAssign};
use std::fmt::{Debug, Display};
use std::iter::{Product, Sum};

/// The float precision of the circuit.
pub trait Precision:
    Default + NumAssign + Float + FloatConst + Sum + Send + Sync + Display + Product + Debug
{
}

impl Precision for f64 {}

impl Precision for f32 {}

/// Bit order of outcomes returned by probability and sampling functions.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Default)]
pub enum Representation {
    /// The first listed qubit is the least significant outcome bit.
    LittleEndian,
    /// The first listed qubit is the most significant outcome bit.
    #[default]
    BigEndian,
}
