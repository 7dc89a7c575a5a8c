/// Contains functions, structs, and enums for storing and manipulating the quantum state.
pub mod matrix_ops;
/// Functions for measuring quantum states.
pub mod measurement_ops;
