//! Per-position call assembly and sequential invocation.
//!
//! A broadcast is assembled lane by lane. Each lane starts as a
//! [`Pending`] holding only the operation selected for that position
//! ([`Seed`]); every further operand appends its selected value to the
//! argument list of each lane ([`Zip`], [`Append`]). Once every operand has
//! been added, [`InvokeAll`] calls the lanes in ascending order.
//!
//! Calls with a lent operand run through [`InvokeAllWith`] instead: the
//! lanes then carry [`Reborrow`](crate::select::Reborrow) placeholders, and
//! each call resolves its arguments against one lender per operand
//! ([`CallWith`]) right before it runs.

use crate::select::Lender;
use crate::trace;

/// An operation together with the arguments gathered for it so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pending<F, A> {
    op: F,
    args: A,
}

impl<F> Pending<F, ()> {
    /// A call of `op` with no arguments yet.
    pub fn new(op: F) -> Self {
        Pending { op, args: () }
    }
}

impl<F, A> Pending<F, A> {
    /// The operation to call.
    pub fn op(&self) -> &F {
        &self.op
    }

    /// The arguments gathered so far, as a tuple.
    pub fn args(&self) -> &A {
        &self.args
    }
}

/// Turn a tuple of per-position operations into argument-less pending calls.
pub trait Seed {
    type Output;

    fn seed(self) -> Self::Output;
}

/// Add one more argument to a pending call.
pub trait Append<X> {
    type Output;

    fn append(self, arg: X) -> Self::Output;
}

/// Append per-position values to per-position pending calls, lane by lane.
pub trait Zip<Rhs> {
    type Output;

    fn zip(self, rhs: Rhs) -> Self::Output;
}

/// Perform a pending call.
pub trait Call {
    type Output;

    fn call(self) -> Self::Output;
}

/// Add one more entry to a tuple.
pub trait Push<X> {
    type Output;

    fn push(self, item: X) -> Self::Output;
}

/// Perform a pending call after resolving the operation and every argument
/// against its lender in `L`.
pub trait CallWith<L> {
    type Output;

    fn call_with(self, lenders: &mut L) -> Self::Output;
}

/// Perform every lane's call, in ascending lane order.
pub trait InvokeAll {
    type Output;

    fn invoke_all(self) -> Self::Output;
}

/// Perform every lane's fallible call in ascending order, stopping at the
/// first error.
pub trait TryInvokeAll<E> {
    type Output;

    fn try_invoke_all(self) -> Result<Self::Output, E>;
}

/// [`InvokeAll`] for lanes that resolve their arguments against `L`.
pub trait InvokeAllWith<L> {
    type Output;

    fn invoke_all_with(self, lenders: &mut L) -> Self::Output;
}

/// [`TryInvokeAll`] for lanes that resolve their arguments against `L`.
pub trait TryInvokeAllWith<L, E> {
    type Output;

    fn try_invoke_all_with(self, lenders: &mut L) -> Result<Self::Output, E>;
}

macro_rules! impl_arguments {
    (@call $k:literal; $( ($A:ident $a:ident $L:ident $l:ident) )*) => {
        impl<F, R, $($A),*> Call for Pending<F, ($($A,)*)>
        where
            F: FnOnce($($A),*) -> R,
        {
            type Output = R;

            #[inline]
            fn call(self) -> R {
                let Pending { op, args: ($($a,)*) } = self;
                op($($a),*)
            }
        }

        impl<F, R, LF, $($A, $L),*> CallWith<(LF, $($L,)*)> for Pending<F, ($($A,)*)>
        where
            LF: for<'r> Lender<'r, F>,
            $($L: for<'r> Lender<'r, $A>,)*
            for<'r> Pending<<LF as Lender<'r, F>>::Out, ($(<$L as Lender<'r, $A>>::Out,)*)>:
                Call<Output = R>,
        {
            type Output = R;

            #[inline]
            fn call_with(self, lenders: &mut (LF, $($L,)*)) -> R {
                let Pending { op, args: ($($a,)*) } = self;
                let (lf, $($l,)*) = lenders;
                let resolved = Pending {
                    op: Lender::lend(lf, op),
                    args: ($(Lender::lend($l, $a),)*),
                };
                Call::call(resolved)
            }
        }
    };
    // The widest argument list is produced by appending to 11 arguments.
    (12; $($rest:tt)*) => {
        impl_arguments!(@call 12; $($rest)*);
    };
    ($k:literal; $( ($A:ident $a:ident $L:ident $l:ident) )*) => {
        impl<F, $($A,)* X> Append<X> for Pending<F, ($($A,)*)> {
            type Output = Pending<F, ($($A,)* X,)>;

            #[inline]
            fn append(self, arg: X) -> Self::Output {
                let Pending { op, args: ($($a,)*) } = self;
                Pending {
                    op,
                    args: ($($a,)* arg,),
                }
            }
        }

        impl<$($A,)* X> Push<X> for ($($A,)*) {
            type Output = ($($A,)* X,);

            #[inline]
            fn push(self, item: X) -> Self::Output {
                let ($($a,)*) = self;
                ($($a,)* item,)
            }
        }

        impl_arguments!(@call $k; $( ($A $a $L $l) )*);
    };
}

for_each_argument_count!(impl_arguments);

macro_rules! impl_lanes {
    (@flat $n:literal; $( ($i:tt $T:ident $U:ident $v:ident $w:ident) )*) => {
        impl<$($T),*> Seed for ($($T,)*) {
            type Output = ($(Pending<$T, ()>,)*);

            #[inline]
            fn seed(self) -> Self::Output {
                let ($($v,)*) = self;
                ($(Pending::new($v),)*)
            }
        }

        impl<$($T, $U),*> Zip<($($U,)*)> for ($($T,)*)
        where
            $($T: Append<$U>,)*
        {
            type Output = ($(<$T as Append<$U>>::Output,)*);

            #[inline]
            fn zip(self, rhs: ($($U,)*)) -> Self::Output {
                let ($($v,)*) = self;
                let ($($w,)*) = rhs;
                ($($v.append($w),)*)
            }
        }

        impl<$($T),*> InvokeAll for ($($T,)*)
        where
            $($T: Call,)*
        {
            type Output = ($(<$T as Call>::Output,)*);

            #[inline]
            fn invoke_all(self) -> Self::Output {
                let ($($v,)*) = self;
                ($(
                    {
                        trace::lane($i, $n);
                        $v.call()
                    },
                )*)
            }
        }

        impl<E, $($T, $U),*> TryInvokeAll<E> for ($($T,)*)
        where
            $($T: Call<Output = Result<$U, E>>,)*
        {
            type Output = ($($U,)*);

            #[inline]
            fn try_invoke_all(self) -> Result<Self::Output, E> {
                let ($($v,)*) = self;
                Ok(($(
                    {
                        trace::lane($i, $n);
                        $v.call()?
                    },
                )*))
            }
        }
    };
    ($n:literal; [$($init:tt)*] [$($last:tt)*]) => {
        impl_lanes!(@flat $n; $($init)* $($last)*);
    };
}

for_each_lane_count!(impl_lanes);

macro_rules! impl_lending_lanes {
    (@flat $n:literal; $( ($i:tt $T:ident $U:ident $v:ident $w:ident) )+) => {
        impl<L, $($T),+> InvokeAllWith<L> for ($($T,)+)
        where
            $($T: CallWith<L>,)+
        {
            type Output = ($(<$T as CallWith<L>>::Output,)+);

            #[inline]
            fn invoke_all_with(self, lenders: &mut L) -> Self::Output {
                let ($($v,)+) = self;
                ($(
                    {
                        trace::lane($i, $n);
                        $v.call_with(lenders)
                    },
                )+)
            }
        }

        impl<L, E, $($T, $U),+> TryInvokeAllWith<L, E> for ($($T,)+)
        where
            $($T: CallWith<L, Output = Result<$U, E>>,)+
        {
            type Output = ($($U,)+);

            #[inline]
            fn try_invoke_all_with(self, lenders: &mut L) -> Result<Self::Output, E> {
                let ($($v,)+) = self;
                Ok(($(
                    {
                        trace::lane($i, $n);
                        $v.call_with(lenders)?
                    },
                )+))
            }
        }
    };
    (0; [] []) => {
        impl<L> InvokeAllWith<L> for () {
            type Output = ();

            #[inline]
            fn invoke_all_with(self, _lenders: &mut L) {}
        }

        impl<L, E> TryInvokeAllWith<L, E> for () {
            type Output = ();

            #[inline]
            fn try_invoke_all_with(self, _lenders: &mut L) -> Result<(), E> {
                Ok(())
            }
        }
    };
    ($n:literal; [$($init:tt)*] [$($last:tt)*]) => {
        impl_lending_lanes!(@flat $n; $($init)* $($last)*);
    };
}

for_each_lane_count!(impl_lending_lanes);
