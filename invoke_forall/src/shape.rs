//! Type-level shapes: the arity of an operand as a type.
//!
//! Every operand is either [`Scalar`] (used whole at every position) or
//! [`Lanes<N>`] (contributes its i-th element at position i). Arity
//! resolution is a left fold of [`Unify`] over the operand shapes:
//!
//! | left        | right       | unified     |
//! |-------------|-------------|-------------|
//! | `Scalar`    | `Scalar`    | `Scalar`    |
//! | `Scalar`    | `Lanes<N>`  | `Lanes<N>`  |
//! | `Lanes<N>`  | `Scalar`    | `Lanes<N>`  |
//! | `Lanes<N>`  | `Lanes<N>`  | `Lanes<N>`  |
//! | `Lanes<N>`  | `Lanes<M>`  | *no impl*   |
//!
//! The missing `Lanes<N> ∪ Lanes<M>` row is what turns an arity mismatch into
//! a compile error.
//!
//! A scalar also carries its [`Sharing`] mode: [`Cloned`] values follow the
//! move-once schedule, [`Lent`] exclusive references are reborrowed for each
//! call in turn. The mode does not affect arity; unifying two scalars gives a
//! plain `Scalar`.

use std::marker::PhantomData;

use crate::operand::Elementwise;

mod sealed {
    pub trait Sealed {}
}

/// A type-level arity.
pub trait Shape: sealed::Sealed {
    /// `None` for a scalar, `Some(N)` for `N` lanes.
    const ARITY: Option<usize>;

    /// How the operand reaches several calls. Always [`Cloned`] for lanes.
    type Sharing: Sharing;
}

/// How a scalar operand is handed to several calls.
pub trait Sharing: sealed::Sealed {
    /// Whether each call gets a reborrow instead of a clone.
    const LENT: bool;
}

/// Every call but the last gets a clone; the last gets the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cloned;

/// Every call gets a fresh reborrow of an exclusive reference.
///
/// Calls run one after another, so the reborrows never overlap. A result may
/// not borrow from the reborrow it was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Lent;

impl sealed::Sealed for Cloned {}
impl sealed::Sealed for Lent {}

impl Sharing for Cloned {
    const LENT: bool = false;
}

impl Sharing for Lent {
    const LENT: bool = true;
}

/// Shape of an operand that is used whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Scalar<M = Cloned>(PhantomData<M>);

/// Shape of an operand with `N` statically known elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Lanes<const N: usize>;

impl<M: Sharing> sealed::Sealed for Scalar<M> {}
impl<const N: usize> sealed::Sealed for Lanes<N> {}

impl<M: Sharing> Shape for Scalar<M> {
    const ARITY: Option<usize> = None;
    type Sharing = M;
}

impl<const N: usize> Shape for Lanes<N> {
    const ARITY: Option<usize> = Some(N);
    type Sharing = Cloned;
}

/// Combine two shapes into the shape of a call over both.
pub trait Unify<S: Shape>: Shape {
    /// The combined shape.
    type Output: Shape;
}

impl<L: Sharing, R: Sharing> Unify<Scalar<R>> for Scalar<L> {
    type Output = Scalar;
}

impl<M: Sharing, const N: usize> Unify<Lanes<N>> for Scalar<M> {
    type Output = Lanes<N>;
}

impl<M: Sharing, const N: usize> Unify<Scalar<M>> for Lanes<N> {
    type Output = Lanes<N>;
}

impl<const N: usize> Unify<Lanes<N>> for Lanes<N> {
    type Output = Lanes<N>;
}

/// Combine the sharing modes of two operands: lent if either is.
pub trait Merge<M: Sharing>: Sharing {
    type Output: Sharing;
}

impl Merge<Cloned> for Cloned {
    type Output = Cloned;
}

impl Merge<Lent> for Cloned {
    type Output = Lent;
}

impl Merge<Cloned> for Lent {
    type Output = Lent;
}

impl Merge<Lent> for Lent {
    type Output = Lent;
}

/// Marker for tuples of exactly `N` positions.
///
/// Used to check that an elementwise operand's element tuple really has one
/// entry per declared lane.
pub trait Row<const N: usize>: row_sealed::Sealed {}

mod row_sealed {
    pub trait Sealed {}
}

macro_rules! impl_row {
    ($n:literal; [$( ($i:tt $T:ident $U:ident $v:ident $w:ident) )*] [$( ($li:tt $LT:ident $LU:ident $lv:ident $lw:ident) )?]) => {
        impl<$($T,)* $($LT)?> row_sealed::Sealed for ($($T,)* $($LT,)?) {}
        impl<$($T,)* $($LT)?> Row<$n> for ($($T,)* $($LT,)?) {}
    };
}

for_each_lane_count!(impl_row);

/// Ties a shape back to the operand that declared it.
///
/// `Scalar` is accessible for any operand. `Lanes<N>` is accessible only for
/// operands that also implement [`Elementwise<N>`], so declaring an element
/// count without providing the elements is rejected when the `Operand` impl is
/// checked.
pub trait Accessible<O>: Shape {}

impl<O, M: Sharing> Accessible<O> for Scalar<M> {}

impl<O: Elementwise<N>, const N: usize> Accessible<O> for Lanes<N> {}
