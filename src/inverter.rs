use crate::builder_traits::{
    CircuitBuilder, MultiControlBuilder, QubitRegister, SplitResult, Subcircuitable,
};
use crate::errors::{CircuitError, CircuitResult};
use crate::types::Precision;

/// A trait which recursively requires that subcircuit builders also implement the traits the
/// original circuit builders implemented. This allows passing to functions which may arbitrarily
/// call other functions without type-tracking the depth of the stack.
pub trait RecursiveCircuitBuilder<P: Precision>:
    Invertable<SimilarBuilder = Self::RecursiveSimilarBuilder>
    + MultiControlBuilder<P>
    + Subcircuitable
{
    /// The similar builder which also implements the recursive circuit builder, it may be the same
    /// type or different.
    type RecursiveSimilarBuilder: RecursiveCircuitBuilder<P>
        + Subcircuitable<Subcircuit = Self::Subcircuit>;
}

/// An Invertable circuit builder must be able to produce a similar circuit builder with the
/// `new_similar` call. This subcircuit builder can be used to make circuits that Self can invert
/// and then apply.
pub trait Invertable: Subcircuitable {
    /// A similar circuit builder which can be used to construct circuits for the parent.
    type SimilarBuilder: Subcircuitable<Subcircuit = Self::Subcircuit>;

    /// Make a similar circuit builder.
    fn new_similar(&self) -> Self::SimilarBuilder;
    /// Take the output of the similar circuit builder and invert it.
    fn invert_subcircuit(sc: Self::Subcircuit) -> CircuitResult<Self::Subcircuit>;
    /// Apply the inverted subcircuit to a register.
    fn apply_inverted_subcircuit(
        &mut self,
        sc: Self::Subcircuit,
        r: Self::Register,
    ) -> CircuitResult<Self::Register> {
        let sc = Self::invert_subcircuit(sc)?;
        self.apply_subcircuit(sc, r)
    }
}

/// Invert the circuit made by `f` using arguments `t`. Apply the inverted circuit to registers `rs`
/// using circuitbuilder `cb`. Registers are returned in the order given.
pub fn inverter_args<T, CB, F>(
    cb: &mut CB,
    rs: Vec<CB::Register>,
    f: F,
    t: T,
) -> CircuitResult<Vec<CB::Register>>
where
    CB: Invertable,
    F: Fn(
        &mut CB::SimilarBuilder,
        Vec<<CB::SimilarBuilder as CircuitBuilder>::Register>,
        T,
    ) -> CircuitResult<Vec<<CB::SimilarBuilder as CircuitBuilder>::Register>>,
{
    let mut sub_cb = cb.new_similar();
    let sub_rs = rs
        .iter()
        .map(|r| sub_cb.register(r.n_nonzero()))
        .collect::<Vec<_>>();
    let _ = f(&mut sub_cb, sub_rs, t)?;
    let subcircuit = sub_cb.make_subcircuit()?;
    let widths = rs.iter().map(|r| r.n()).collect::<Vec<_>>();
    let r = cb.merge_registers(rs).ok_or(CircuitError::EmptyRegister)?;
    let r = cb.apply_inverted_subcircuit(subcircuit, r)?;

    let (last, rs) = widths[..widths.len() - 1].iter().try_fold(
        (r, vec![]),
        |(r, mut acc), rn| match cb.split_register_relative(r, 0..*rn) {
            SplitResult::SPLIT(head, rest) => {
                acc.push(head);
                Ok((rest, acc))
            }
            SplitResult::SELECTED(_) | SplitResult::UNSELECTED(_) => {
                Err(CircuitError::EmptyRegister)
            }
        },
    )?;
    let mut rs = rs;
    rs.push(last);
    Ok(rs)
}

/// Invert the circuit made by `f`. Apply the inverted circuit to registers `rs` using
/// circuitbuilder `cb`.
pub fn inverter<CB, F>(cb: &mut CB, r: Vec<CB::Register>, f: F) -> CircuitResult<Vec<CB::Register>>
where
    CB: Invertable,
    F: Fn(
        &mut CB::SimilarBuilder,
        Vec<<CB::SimilarBuilder as CircuitBuilder>::Register>,
    ) -> CircuitResult<Vec<<CB::SimilarBuilder as CircuitBuilder>::Register>>,
{
    inverter_args(cb, r, |cb, rs, _| f(cb, rs), ())
}
