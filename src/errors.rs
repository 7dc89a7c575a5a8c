use thiserror::Error;

/// An error from building or evaluating a circuit.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CircuitError {
    /// A wire index is not part of the circuit.
    #[error("wire {wire} is out of range for a circuit of {n} qubits")]
    WireOutOfRange {
        /// The offending wire.
        wire: usize,
        /// Number of qubits in the circuit.
        n: usize,
    },

    /// Two registers (or a register and an operation) disagree on width.
    #[error("expected a register of {expected} qubits, found {found}")]
    RegisterSizeMismatch {
        /// Width required by the operation.
        expected: usize,
        /// Width actually supplied.
        found: usize,
    },

    /// An integer does not fit into the register it is placed on.
    #[error("value {value} does not fit in {width} qubits")]
    ValueTooWide {
        /// The value.
        value: usize,
        /// Register width in qubits.
        width: usize,
    },

    /// The number of control values does not match the control register.
    #[error("expected {expected} control values, found {found}")]
    ControlValueCount {
        /// Width of the control register.
        expected: usize,
        /// Number of control values given.
        found: usize,
    },

    /// A register operation left no qubits behind.
    #[error("register has no qubits")]
    EmptyRegister,

    /// A wire was used twice within a single operation.
    #[error("wire {0} appears more than once in a single operation")]
    DuplicateWire(usize),

    /// A circuit is too wide to simulate as a dense state vector.
    #[error("a circuit of {n} qubits exceeds the simulation limit of {max}")]
    TooManyQubits {
        /// Number of qubits requested.
        n: usize,
        /// Largest number of qubits that can be simulated.
        max: usize,
    },

    /// Grover iterations were requested for a search with nothing marked.
    #[error("search has no marked states")]
    NoSolutions,

    /// An operation has no adjoint.
    #[error("cannot invert {0}")]
    NotInvertible(String),

    /// A generic error.
    #[error("{0}")]
    Generic(String),
}

impl CircuitError {
    /// Construct a new generic error.
    pub fn new<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::Generic(msg.into())
    }
}

/// A result which may contain a circuit error.
pub type CircuitResult<T> = Result<T, CircuitError>;
