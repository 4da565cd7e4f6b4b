//! The broadcast entry point.
//!
//! [`invoke_forall`] takes the operation and its operands as one flat tuple
//! `(op, a1, .., ak)`. The tuple is turned into a left-nested chain
//! (`Link<Link<Head<Op>, A1>, A2>`, ...) so that the unified shape, the
//! per-lane selection and the argument lists can all be computed one operand
//! at a time, whatever the number of operands.
//!
//! Calls without a lent operand are fully assembled before the first lane
//! runs ([`Spread`]). Calls with one keep the exclusive references aside as
//! lenders and resolve them lane by lane ([`Distribute`]).

use crate::aggregate::Collect;
use crate::invoke::{InvokeAll, InvokeAllWith, Push, Seed, TryInvokeAll, TryInvokeAllWith, Zip};
use crate::operand::{arity_of, is_lent, Operand};
use crate::plan::Plan;
use crate::select::{Select, Share};
use crate::shape::{Cloned, Lent, Merge, Scalar, Shape, Sharing, Unify};
use crate::trace;

/// First link of an operand chain: the operation.
#[derive(Debug, Clone, Copy)]
pub struct Head<O>(O);

/// An operand chain extended by one more operand.
#[derive(Debug, Clone, Copy)]
pub struct Link<P, O>(P, O);

/// Unified shape of an operand chain.
///
/// Fails to resolve when two elementwise operands disagree on their length.
pub trait Chain {
    type Shape: Shape;

    /// [`Lent`] if any operand is.
    type Sharing: Sharing;
}

impl<O: Operand> Chain for Head<O>
where
    O::Shape: Unify<Scalar>,
{
    type Shape = <O::Shape as Unify<Scalar>>::Output;
    type Sharing = <O::Shape as Shape>::Sharing;
}

impl<P: Chain, O: Operand> Chain for Link<P, O>
where
    P::Shape: Unify<O::Shape>,
    P::Sharing: Merge<<O::Shape as Shape>::Sharing>,
{
    type Shape = <P::Shape as Unify<O::Shape>>::Output;
    type Sharing = <P::Sharing as Merge<<O::Shape as Shape>::Sharing>>::Output;
}

/// Spread a chain into per-lane pending calls for a call of shape `S`.
pub trait Spread<S: Shape> {
    type Lanes;

    fn spread(self) -> Self::Lanes;
}

impl<S: Shape, O: Operand> Spread<S> for Head<O>
where
    O::Shape: Select<O, S>,
    <O::Shape as Select<O, S>>::Lanes: Seed,
{
    type Lanes = <<O::Shape as Select<O, S>>::Lanes as Seed>::Output;

    #[inline]
    fn spread(self) -> Self::Lanes {
        <O::Shape as Select<O, S>>::select(self.0).seed()
    }
}

impl<S: Shape, P: Spread<S>, O: Operand> Spread<S> for Link<P, O>
where
    O::Shape: Select<O, S>,
    P::Lanes: Zip<<O::Shape as Select<O, S>>::Lanes>,
{
    type Lanes = <P::Lanes as Zip<<O::Shape as Select<O, S>>::Lanes>>::Output;

    #[inline]
    fn spread(self) -> Self::Lanes {
        let Link(prev, operand) = self;
        let lanes = prev.spread();
        lanes.zip(<O::Shape as Select<O, S>>::select(operand))
    }
}

type Shared<O, S> = <<O as Operand>::Shape as Share<O, S>>::Lanes;
type LenderOf<O, S> = <<O as Operand>::Shape as Share<O, S>>::Lender;

/// Spread a chain into per-lane pending calls plus one lender per operand.
pub trait Distribute<S: Shape> {
    type Lanes;
    type Lenders;

    fn distribute(self) -> (Self::Lanes, Self::Lenders);
}

impl<S: Shape, O: Operand> Distribute<S> for Head<O>
where
    O::Shape: Share<O, S>,
    Shared<O, S>: Seed,
{
    type Lanes = <Shared<O, S> as Seed>::Output;
    type Lenders = (LenderOf<O, S>,);

    #[inline]
    fn distribute(self) -> (Self::Lanes, Self::Lenders) {
        let (lanes, lender) = <O::Shape as Share<O, S>>::share(self.0);
        (lanes.seed(), (lender,))
    }
}

impl<S: Shape, P: Distribute<S>, O: Operand> Distribute<S> for Link<P, O>
where
    O::Shape: Share<O, S>,
    P::Lanes: Zip<Shared<O, S>>,
    P::Lenders: Push<LenderOf<O, S>>,
{
    type Lanes = <P::Lanes as Zip<Shared<O, S>>>::Output;
    type Lenders = <P::Lenders as Push<LenderOf<O, S>>>::Output;

    #[inline]
    fn distribute(self) -> (Self::Lanes, Self::Lenders) {
        let Link(prev, operand) = self;
        let (lanes, lenders) = prev.distribute();
        let (selected, lender) = <O::Shape as Share<O, S>>::share(operand);
        (lanes.zip(selected), lenders.push(lender))
    }
}

/// A flat `(op, a1, .., ak)` argument tuple.
///
/// Implemented for tuples of 1 to 12 operands. The empty tuple is not an
/// argument list: a call needs at least an operation.
pub trait Arguments {
    /// The same operands as a left-nested chain.
    type Chain;

    /// `arity_of` each operand, in order.
    const ARITIES: &'static [Option<usize>];

    /// `is_lent` for each operand, in order.
    const LENT: &'static [bool];

    fn into_chain(self) -> Self::Chain;
}

macro_rules! chain_type {
    (@acc $acc:ty; ) => { $acc };
    (@acc $acc:ty; $next:ident $($rest:ident)*) => {
        chain_type!(@acc Link<$acc, $next>; $($rest)*)
    };
    ($first:ident $($rest:ident)*) => {
        chain_type!(@acc Head<$first>; $($rest)*)
    };
}

macro_rules! chain_expr {
    (@acc $acc:expr; ) => { $acc };
    (@acc $acc:expr; $next:ident $($rest:ident)*) => {
        chain_expr!(@acc Link($acc, $next); $($rest)*)
    };
    ($first:ident $($rest:ident)*) => {
        chain_expr!(@acc Head($first); $($rest)*)
    };
}

macro_rules! impl_arguments {
    (0; ) => {};
    ($k:literal; $( ($A:ident $a:ident $L:ident $l:ident) )+) => {
        impl<$($A: Operand),+> Arguments for ($($A,)+) {
            type Chain = chain_type!($($A)+);

            const ARITIES: &'static [Option<usize>] = &[$(arity_of::<$A>()),+];

            const LENT: &'static [bool] = &[$(is_lent::<$A>()),+];

            #[inline]
            fn into_chain(self) -> Self::Chain {
                let ($($a,)+) = self;
                chain_expr!($($a)+)
            }
        }
    };
}

for_each_argument_count!(impl_arguments);

type ShapeOf<A> = <<A as Arguments>::Chain as Chain>::Shape;
type SharingOf<A> = <<A as Arguments>::Chain as Chain>::Sharing;
type LanesOf<A> = <<A as Arguments>::Chain as Spread<ShapeOf<A>>>::Lanes;
type DistributedOf<A> = <<A as Arguments>::Chain as Distribute<ShapeOf<A>>>::Lanes;
type LendersOf<A> = <<A as Arguments>::Chain as Distribute<ShapeOf<A>>>::Lenders;

fn trace_plan<A: Arguments>() {
    if trace::enabled() {
        match Plan::of::<A>() {
            Ok(plan) => trace::log(format_args!("{plan}")),
            Err(err) => trace::log(format_args!("{err}")),
        }
    }
}

/// Carries out a call over `A`.
///
/// Implemented on the chain's [`Sharing`]: [`Cloned`] assembles every lane
/// up front, [`Lent`] lends exclusive references to one lane at a time.
pub trait Broadcast<A> {
    type Output;

    fn broadcast(args: A) -> Self::Output;
}

impl<A> Broadcast<A> for Cloned
where
    A: Arguments,
    A::Chain: Chain + Spread<ShapeOf<A>>,
    LanesOf<A>: InvokeAll,
    ShapeOf<A>: Collect<<LanesOf<A> as InvokeAll>::Output>,
{
    type Output = <ShapeOf<A> as Collect<<LanesOf<A> as InvokeAll>::Output>>::Output;

    #[inline]
    fn broadcast(args: A) -> Self::Output {
        let lanes = args.into_chain().spread();
        <ShapeOf<A> as Collect<_>>::collect(lanes.invoke_all())
    }
}

impl<A> Broadcast<A> for Lent
where
    A: Arguments,
    A::Chain: Chain + Distribute<ShapeOf<A>>,
    DistributedOf<A>: InvokeAllWith<LendersOf<A>>,
    ShapeOf<A>: Collect<<DistributedOf<A> as InvokeAllWith<LendersOf<A>>>::Output>,
{
    type Output =
        <ShapeOf<A> as Collect<<DistributedOf<A> as InvokeAllWith<LendersOf<A>>>::Output>>::Output;

    #[inline]
    fn broadcast(args: A) -> Self::Output {
        let (lanes, mut lenders) = args.into_chain().distribute();
        <ShapeOf<A> as Collect<_>>::collect(lanes.invoke_all_with(&mut lenders))
    }
}

/// [`Broadcast`] for operations returning `Result<_, E>`.
pub trait TryBroadcast<A, E> {
    type Output;

    fn try_broadcast(args: A) -> Result<Self::Output, E>;
}

impl<A, E> TryBroadcast<A, E> for Cloned
where
    A: Arguments,
    A::Chain: Chain + Spread<ShapeOf<A>>,
    LanesOf<A>: TryInvokeAll<E>,
    ShapeOf<A>: Collect<<LanesOf<A> as TryInvokeAll<E>>::Output>,
{
    type Output = <ShapeOf<A> as Collect<<LanesOf<A> as TryInvokeAll<E>>::Output>>::Output;

    #[inline]
    fn try_broadcast(args: A) -> Result<Self::Output, E> {
        let lanes = args.into_chain().spread();
        Ok(<ShapeOf<A> as Collect<_>>::collect(lanes.try_invoke_all()?))
    }
}

impl<A, E> TryBroadcast<A, E> for Lent
where
    A: Arguments,
    A::Chain: Chain + Distribute<ShapeOf<A>>,
    DistributedOf<A>: TryInvokeAllWith<LendersOf<A>, E>,
    ShapeOf<A>: Collect<<DistributedOf<A> as TryInvokeAllWith<LendersOf<A>, E>>::Output>,
{
    type Output = <ShapeOf<A> as Collect<
        <DistributedOf<A> as TryInvokeAllWith<LendersOf<A>, E>>::Output,
    >>::Output;

    #[inline]
    fn try_broadcast(args: A) -> Result<Self::Output, E> {
        let (lanes, mut lenders) = args.into_chain().distribute();
        Ok(<ShapeOf<A> as Collect<_>>::collect(
            lanes.try_invoke_all_with(&mut lenders)?,
        ))
    }
}

/// Argument tuples that can be broadcast over.
///
/// Implemented for every [`Arguments`] tuple whose operands agree on one
/// shape and whose per-lane calls are well-typed.
pub trait InvokeForall {
    /// An [`Aggregate`](crate::Aggregate) of the per-lane results, or the
    /// single result when no operand is elementwise.
    type Output;

    fn invoke_forall(self) -> Self::Output;
}

impl<A> InvokeForall for A
where
    A: Arguments,
    A::Chain: Chain,
    SharingOf<A>: Broadcast<A>,
{
    type Output = <SharingOf<A> as Broadcast<A>>::Output;

    #[inline]
    fn invoke_forall(self) -> Self::Output {
        trace_plan::<A>();
        <SharingOf<A> as Broadcast<A>>::broadcast(self)
    }
}

/// Argument tuples whose per-lane calls return `Result<_, E>`.
pub trait TryInvokeForall<E> {
    /// The aggregate (or single value) of the `Ok` payloads.
    type Output;

    fn try_invoke_forall(self) -> Result<Self::Output, E>;
}

impl<A, E> TryInvokeForall<E> for A
where
    A: Arguments,
    A::Chain: Chain,
    SharingOf<A>: TryBroadcast<A, E>,
{
    type Output = <SharingOf<A> as TryBroadcast<A, E>>::Output;

    #[inline]
    fn try_invoke_forall(self) -> Result<Self::Output, E> {
        trace_plan::<A>();
        <SharingOf<A> as TryBroadcast<A, E>>::try_broadcast(self)
    }
}

/// Call `op` once per lane.
///
/// `args` is `(op, a1, .., ak)`. If any of `op, a1, .., ak` is elementwise,
/// they must all agree on one element count `N`, and `op` is called `N` times
/// in ascending order; call `i` receives element `i` of every elementwise
/// operand and the whole value of every scalar one. The results are returned
/// as an [`Aggregate`](crate::Aggregate). With no elementwise operand, `op` is
/// called once and its result is returned as is.
///
/// Scalars used by several calls are cloned for all but the last. Exclusive
/// references to scalars (`&mut v`, `&mut protect(v)`) are reborrowed for
/// each call instead, so every call can update the same value:
///
/// ```
/// use invoke_forall::{invoke_forall, protect};
///
/// let mut seen: Vec<String> = Vec::new();
/// let record = |log: &mut Vec<String>, word: &str| {
///     log.push(word.to_uppercase());
///     log.len()
/// };
/// let counts = invoke_forall((protect(record), &mut seen, ["a", "b"]));
/// assert_eq!(counts, [1, 2]);
/// assert_eq!(seen, ["A", "B"]);
/// ```
///
/// ```
/// use invoke_forall::{invoke_forall, protect};
///
/// let add = |a: i32, b: i32| a + b;
/// let out = invoke_forall((protect(add), [1, 2, 3], [10, 20, 30]));
/// assert_eq!(out, [11, 22, 33]);
///
/// // All scalar: one call, unwrapped result.
/// assert_eq!(invoke_forall((protect(add), 2_i32, 3_i32)), 5);
/// ```
///
/// Mismatched element counts do not compile:
///
/// ```compile_fail
/// use invoke_forall::{invoke_forall, protect};
///
/// let add = |a: i32, b: i32| a + b;
/// invoke_forall((protect(add), [1, 2, 3], [10, 20]));
/// ```
#[inline]
pub fn invoke_forall<A: InvokeForall>(args: A) -> A::Output {
    args.invoke_forall()
}

/// Like [`invoke_forall`], for operations returning `Result<T, E>`.
///
/// Lanes run in ascending order until one returns `Err`; that error is
/// returned and the remaining lanes never run.
///
/// ```
/// use invoke_forall::{protect, try_invoke_forall};
///
/// let parse = |s: &str| s.parse::<i32>();
/// let parsed = try_invoke_forall((protect(parse), ["1", "2"])).unwrap();
/// assert_eq!(parsed, [1, 2]);
///
/// let failed = try_invoke_forall((protect(parse), ["1", "x"]));
/// assert!(failed.is_err());
/// ```
#[inline]
pub fn try_invoke_forall<A, E>(args: A) -> Result<<A as TryInvokeForall<E>>::Output, E>
where
    A: TryInvokeForall<E>,
{
    args.try_invoke_forall()
}

/// Broadcast `op` over the remaining arguments.
///
/// `invoke_forall!(op, a, b)` is `invoke_forall((op, a, b))`.
///
/// ```
/// use invoke_forall::{invoke_forall, protect};
///
/// let out = invoke_forall!(protect(|s: &str, n: usize| s.repeat(n)), "ab", [1, 2]);
/// assert_eq!(out, ["ab".to_string(), "abab".to_string()]);
/// ```
#[macro_export]
macro_rules! invoke_forall {
    ($($arg:expr),+ $(,)?) => {
        $crate::invoke_forall(($($arg,)+))
    };
}

/// `try_invoke_forall!(op, a, b)` is `try_invoke_forall((op, a, b))`.
#[macro_export]
macro_rules! try_invoke_forall {
    ($($arg:expr),+ $(,)?) => {
        $crate::try_invoke_forall(($($arg,)+))
    };
}
