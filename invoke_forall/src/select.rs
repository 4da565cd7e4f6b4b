//! Per-position selection with the move-once schedule.
//!
//! For a call of shape `S`, each operand is spread into one value per
//! position:
//!
//! - an elementwise operand contributes its elements, with their own
//!   ownership (never cloned);
//! - a scalar operand under one call is handed over whole;
//! - a scalar operand under `N >= 2` lanes is cloned for positions
//!   `0..N-1` and moved into position `N-1`, so exactly `N - 1` clones are
//!   made and the last call sees the original value;
//! - a scalar operand under zero lanes is dropped unused.
//!
//! A [`Lent`] scalar cannot be selected ahead of the calls: its positions
//! hold a [`Reborrow`] placeholder, and the exclusive reference itself becomes
//! the [`Lender`] that turns each placeholder into a reborrow when its call is
//! made ([`Share`]).

use crate::operand::{Elementwise, Operand};
use crate::shape::{Lanes, Lent, Scalar, Shape};

/// Spread operand `O` across the positions of a call with shape `S`.
///
/// Implemented on `O::Shape`, so the choice between element access and
/// broadcasting the whole value is made by the operand's classification.
pub trait Select<O: Operand, S: Shape> {
    /// One value per position, as a tuple.
    type Lanes;

    /// Produce the per-position values.
    fn select(operand: O) -> Self::Lanes;
}

impl<O: Operand> Select<O, Scalar> for Scalar {
    type Lanes = (O::Whole,);

    #[inline]
    fn select(operand: O) -> Self::Lanes {
        (operand.into_whole(),)
    }
}

impl<O: Elementwise<N>, const N: usize> Select<O, Lanes<N>> for Lanes<N> {
    type Lanes = O::Elements;

    #[inline]
    fn select(operand: O) -> Self::Lanes {
        operand.into_elements()
    }
}

macro_rules! impl_scalar_select {
    (0; [] []) => {
        impl<O: Operand> Select<O, Lanes<0>> for Scalar {
            type Lanes = ();

            #[inline]
            fn select(operand: O) -> Self::Lanes {
                drop(operand);
            }
        }
    };
    (1; [] [$last:tt]) => {
        impl<O: Operand> Select<O, Lanes<1>> for Scalar {
            type Lanes = (O::Whole,);

            #[inline]
            fn select(operand: O) -> Self::Lanes {
                (operand.into_whole(),)
            }
        }
    };
    ($n:literal; [$( ($i:tt $T:ident $U:ident $v:ident $w:ident) )+] [($li:tt $LT:ident $LU:ident $lv:ident $lw:ident)]) => {
        impl<O: Operand> Select<O, Lanes<$n>> for Scalar
        where
            O::Whole: Clone,
        {
            type Lanes = ($(same!($T, O::Whole),)+ O::Whole,);

            #[inline]
            fn select(operand: O) -> Self::Lanes {
                let whole = operand.into_whole();
                // Tuple fields evaluate left to right: clones first, move last.
                ($(same!($v, whole.clone()),)+ whole,)
            }
        }
    };
}

for_each_lane_count!(impl_scalar_select);

/// Placeholder for an argument reborrowed from its lender at call time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Reborrow;

/// Resolves one selected argument right before its call.
///
/// `()` passes the argument through. An exclusive reference turns a
/// [`Reborrow`] into a reborrow of itself that lasts for that one call.
///
/// The defaulted `Outlives` parameter keeps `for<'r> L: Lender<'r, X>` bounds
/// limited to lifetimes the lender outlives.
pub trait Lender<'r, X, Outlives = &'r Self> {
    /// What the operation receives.
    type Out;

    fn lend(&'r mut self, arg: X) -> Self::Out;
}

impl<'r, X> Lender<'r, X> for () {
    type Out = X;

    #[inline]
    fn lend(&'r mut self, arg: X) -> X {
        arg
    }
}

impl<'r, 'a, T: ?Sized> Lender<'r, Reborrow> for &'a mut T {
    type Out = &'r mut T;

    #[inline]
    fn lend(&'r mut self, _arg: Reborrow) -> &'r mut T {
        &mut **self
    }
}

/// Spread operand `O` across the positions of a call that lends.
///
/// Like [`Select`], plus the [`Lender`] that resolves the selected values.
/// Cloned scalars and elementwise operands select as usual and lend nothing.
pub trait Share<O: Operand, S: Shape> {
    /// One value per position, as a tuple.
    type Lanes;

    /// Resolves the per-position values at call time.
    type Lender;

    fn share(operand: O) -> (Self::Lanes, Self::Lender);
}

impl<O: Operand, S: Shape> Share<O, S> for Scalar
where
    Scalar: Select<O, S>,
{
    type Lanes = <Scalar as Select<O, S>>::Lanes;
    type Lender = ();

    #[inline]
    fn share(operand: O) -> (Self::Lanes, ()) {
        (<Scalar as Select<O, S>>::select(operand), ())
    }
}

impl<O: Operand, S: Shape, const N: usize> Share<O, S> for Lanes<N>
where
    Lanes<N>: Select<O, S>,
{
    type Lanes = <Lanes<N> as Select<O, S>>::Lanes;
    type Lender = ();

    #[inline]
    fn share(operand: O) -> (Self::Lanes, ()) {
        (<Lanes<N> as Select<O, S>>::select(operand), ())
    }
}

// A single call takes the reference itself, so its result may borrow from it.
impl<O: Operand> Share<O, Scalar> for Scalar<Lent> {
    type Lanes = (O::Whole,);
    type Lender = ();

    #[inline]
    fn share(operand: O) -> (Self::Lanes, ()) {
        ((operand.into_whole(),), ())
    }
}

macro_rules! impl_lent_share {
    (0; [] []) => {
        impl<O: Operand> Share<O, Lanes<0>> for Scalar<Lent> {
            type Lanes = ();
            type Lender = ();

            #[inline]
            fn share(operand: O) -> ((), ()) {
                drop(operand);
                ((), ())
            }
        }
    };
    (1; [] [$last:tt]) => {
        impl<O: Operand> Share<O, Lanes<1>> for Scalar<Lent> {
            type Lanes = (O::Whole,);
            type Lender = ();

            #[inline]
            fn share(operand: O) -> (Self::Lanes, ()) {
                ((operand.into_whole(),), ())
            }
        }
    };
    ($n:literal; [$( ($i:tt $T:ident $U:ident $v:ident $w:ident) )+] [($li:tt $LT:ident $LU:ident $lv:ident $lw:ident)]) => {
        impl<O: Operand> Share<O, Lanes<$n>> for Scalar<Lent> {
            type Lanes = ($(same!($T, Reborrow),)+ Reborrow,);
            type Lender = O::Whole;

            #[inline]
            fn share(operand: O) -> (Self::Lanes, O::Whole) {
                (($(same!($v, Reborrow),)+ Reborrow,), operand.into_whole())
            }
        }
    };
}

for_each_lane_count!(impl_lent_share);
