//! Operand classification.
//!
//! Every value passed to [`invoke_forall`](crate::invoke_forall) implements
//! [`Operand`], which declares its [`Shape`]: either [`Scalar`] (the value is
//! handed whole to every call) or [`Lanes<N>`] (element i goes to call i).
//! Elementwise operands additionally implement [`Elementwise<N>`], which splits
//! the value into an N-tuple of elements while preserving ownership: an owned
//! array yields owned elements, `&[T; N]` yields `&T`, `&mut [T; N]` yields
//! `&mut T`.
//!
//! Built-in classification:
//!
//! - elementwise: `[T; N]`, tuples, and [`Aggregate`](crate::Aggregate) of up
//!   to 12 positions, and shared or exclusive references to them;
//! - scalar: primitives, `String`, `&str`, slices, the common std containers
//!   and smart pointers, fn pointers, and references to all of these.
//!
//! Exclusive references to scalars (`&mut String`, `&mut Vec<T>`, ...) are
//! [`Lent`]: instead of being cloned, they are reborrowed for each call.
//!
//! Other types opt in with [`scalar_operand!`](crate::scalar_operand) or by
//! implementing the traits by hand. Closures and fn items have anonymous
//! types; pass them through [`protect`](crate::protect). So do fn pointers
//! whose signature takes a reference: `fn(&str) -> usize` is generic over the
//! lifetime of its argument, and only pointers with concrete argument types
//! are operands on their own.
//!
//! ```compile_fail
//! use invoke_forall::invoke_forall;
//!
//! fn len(s: &str) -> usize {
//!     s.len()
//! }
//!
//! let op: fn(&str) -> usize = len;
//! invoke_forall((op, ["ab", "c"]));
//! ```
//!
//! ```
//! use invoke_forall::{invoke_forall, protect};
//!
//! fn len(s: &str) -> usize {
//!     s.len()
//! }
//!
//! let op: fn(&str) -> usize = len;
//! assert_eq!(invoke_forall((protect(op), ["ab", "c"])), [2, 1]);
//! ```

use crate::shape::{Accessible, Lanes, Lent, Row, Scalar, Shape, Sharing};

/// A value that can take part in a broadcast call.
pub trait Operand: Sized {
    /// `Scalar` or `Lanes<N>`.
    ///
    /// Declaring `Lanes<N>` requires a matching [`Elementwise<N>`] impl.
    type Shape: Shape + Accessible<Self>;

    /// What the operation receives when this operand is used whole.
    type Whole;

    /// Convert into the value used whole.
    fn into_whole(self) -> Self::Whole;
}

/// An operand with `N` statically known elements.
pub trait Elementwise<const N: usize>: Operand<Shape = Lanes<N>> {
    /// One type per position, as an N-tuple.
    type Elements: Row<N>;

    /// Split into the per-position elements.
    fn into_elements(self) -> Self::Elements;
}

/// Element count of `O`, or `None` when `O` is scalar.
///
/// ```
/// use invoke_forall::{arity_of, Protected};
///
/// assert_eq!(arity_of::<[u8; 3]>(), Some(3));
/// assert_eq!(arity_of::<&(i32, &str)>(), Some(2));
/// assert_eq!(arity_of::<i32>(), None);
/// assert_eq!(arity_of::<Protected<[u8; 3]>>(), None);
/// ```
pub const fn arity_of<O: Operand>() -> Option<usize> {
    <O::Shape as Shape>::ARITY
}

/// Whether `O` is broadcast over element by element.
pub const fn is_elementwise<O: Operand>() -> bool {
    arity_of::<O>().is_some()
}

/// Whether `O` is an exclusive reference reborrowed by every call.
///
/// ```
/// use invoke_forall::{is_lent, protect, Protected};
///
/// assert!(is_lent::<&mut Vec<i32>>());
/// assert!(is_lent::<&mut Protected<[i32; 3]>>());
/// assert!(!is_lent::<&Vec<i32>>());
/// // The wrapper owns the reference, so it is cloned like any owned value.
/// assert!(!is_lent::<Protected<&mut [i32; 3]>>());
/// ```
pub const fn is_lent<O: Operand>() -> bool {
    <<O::Shape as Shape>::Sharing as Sharing>::LENT
}

/// Declare types as scalar operands.
///
/// Implements [`Operand`] with `Shape = Scalar` for each listed type and for
/// shared references to it, and with `Shape = Scalar<Lent>` for exclusive
/// references to it. Generic types use the `impl<..>` form.
///
/// ```
/// use invoke_forall::{invoke_forall, protect, scalar_operand};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Meters(f64);
///
/// #[derive(Clone)]
/// struct Tagged<T>(&'static str, T);
///
/// scalar_operand!(Meters);
/// scalar_operand!(impl<T> Tagged<T>);
///
/// let scale = |m: Meters, k: f64| Meters(m.0 * k);
/// let out = invoke_forall((protect(scale), Meters(2.0), [1.0, 3.0]));
/// assert_eq!(out, [Meters(2.0), Meters(6.0)]);
///
/// let tag = |t: Tagged<u8>, n: u8| format!("{}{}", t.0, t.1 + n);
/// let out = invoke_forall((protect(tag), Tagged("#", 1), [0, 1]));
/// assert_eq!(out, ["#1".to_string(), "#2".to_string()]);
/// ```
#[macro_export]
macro_rules! scalar_operand {
    (@impl [$($g:ident),*] $ty:ty) => {
        impl<$($g),*> $crate::Operand for $ty {
            type Shape = $crate::Scalar;
            type Whole = Self;

            #[inline]
            fn into_whole(self) -> Self {
                self
            }
        }

        impl<'__a, $($g),*> $crate::Operand for &'__a $ty {
            type Shape = $crate::Scalar;
            type Whole = Self;

            #[inline]
            fn into_whole(self) -> Self {
                self
            }
        }

        impl<'__a, $($g),*> $crate::Operand for &'__a mut $ty {
            type Shape = $crate::Scalar<$crate::Lent>;
            type Whole = Self;

            #[inline]
            fn into_whole(self) -> Self {
                self
            }
        }
    };
    (impl<$($g:ident),+ $(,)?> $ty:ty) => {
        $crate::scalar_operand!(@impl [$($g),+] $ty);
    };
    ($($ty:ty),+ $(,)?) => {
        $( $crate::scalar_operand!(@impl [] $ty); )+
    };
}

scalar_operand!(
    bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64,
    String,
    std::time::Duration,
);

scalar_operand!(impl<T> Vec<T>);
scalar_operand!(impl<T> Box<T>);
scalar_operand!(impl<T> Option<T>);
scalar_operand!(impl<T, E> Result<T, E>);
scalar_operand!(impl<T> std::rc::Rc<T>);
scalar_operand!(impl<T> std::sync::Arc<T>);
scalar_operand!(impl<T> std::cell::Cell<T>);
scalar_operand!(impl<T> std::cell::RefCell<T>);
scalar_operand!(impl<T> std::collections::VecDeque<T>);
scalar_operand!(impl<T> std::collections::LinkedList<T>);
scalar_operand!(impl<T> std::collections::BinaryHeap<T>);
scalar_operand!(impl<K, V, S> std::collections::HashMap<K, V, S>);
scalar_operand!(impl<K, V> std::collections::BTreeMap<K, V>);
scalar_operand!(impl<T, S> std::collections::HashSet<T, S>);
scalar_operand!(impl<T> std::collections::BTreeSet<T>);
scalar_operand!(impl<T> std::ops::Range<T>);
scalar_operand!(impl<T> std::ops::RangeInclusive<T>);
scalar_operand!(impl<T> std::marker::PhantomData<T>);

impl<'a> Operand for &'a str {
    type Shape = Scalar;
    type Whole = Self;

    #[inline]
    fn into_whole(self) -> Self {
        self
    }
}

impl<'a> Operand for &'a mut str {
    type Shape = Scalar<Lent>;
    type Whole = Self;

    #[inline]
    fn into_whole(self) -> Self {
        self
    }
}

// Slices have no static length, so they are used whole.
impl<'a, T> Operand for &'a [T] {
    type Shape = Scalar;
    type Whole = Self;

    #[inline]
    fn into_whole(self) -> Self {
        self
    }
}

impl<'a, T> Operand for &'a mut [T] {
    type Shape = Scalar<Lent>;
    type Whole = Self;

    #[inline]
    fn into_whole(self) -> Self {
        self
    }
}

macro_rules! impl_fn_pointer_operand {
    ($k:literal; $( ($A:ident $a:ident $L:ident $l:ident) )*) => {
        impl<R, $($A),*> Operand for fn($($A),*) -> R {
            type Shape = Scalar;
            type Whole = Self;

            #[inline]
            fn into_whole(self) -> Self {
                self
            }
        }
    };
}

for_each_argument_count!(impl_fn_pointer_operand);

macro_rules! impl_array_operand {
    ($n:literal; [$( ($i:tt $T:ident $U:ident $v:ident $w:ident) )*] [$( ($li:tt $LT:ident $LU:ident $lv:ident $lw:ident) )?]) => {
        impl<T> Operand for [T; $n] {
            type Shape = Lanes<$n>;
            type Whole = Self;

            #[inline]
            fn into_whole(self) -> Self {
                self
            }
        }

        impl<T> Elementwise<$n> for [T; $n] {
            type Elements = ($(same!($T, T),)* $(same!($LT, T),)?);

            #[inline]
            fn into_elements(self) -> Self::Elements {
                let [$($v,)* $($lv)?] = self;
                ($($v,)* $($lv,)?)
            }
        }

        impl<'a, T> Operand for &'a [T; $n] {
            type Shape = Lanes<$n>;
            type Whole = Self;

            #[inline]
            fn into_whole(self) -> Self {
                self
            }
        }

        impl<'a, T> Elementwise<$n> for &'a [T; $n] {
            type Elements = ($(same!($T, &'a T),)* $(same!($LT, &'a T),)?);

            #[inline]
            fn into_elements(self) -> Self::Elements {
                let [$($v,)* $($lv)?] = self;
                ($($v,)* $($lv,)?)
            }
        }

        impl<'a, T> Operand for &'a mut [T; $n] {
            type Shape = Lanes<$n>;
            type Whole = Self;

            #[inline]
            fn into_whole(self) -> Self {
                self
            }
        }

        impl<'a, T> Elementwise<$n> for &'a mut [T; $n] {
            type Elements = ($(same!($T, &'a mut T),)* $(same!($LT, &'a mut T),)?);

            #[inline]
            fn into_elements(self) -> Self::Elements {
                let [$($v,)* $($lv)?] = self;
                ($($v,)* $($lv,)?)
            }
        }
    };
}

for_each_lane_count!(impl_array_operand);

macro_rules! impl_tuple_operand {
    ($n:literal; [$( ($i:tt $T:ident $U:ident $v:ident $w:ident) )*] [$( ($li:tt $LT:ident $LU:ident $lv:ident $lw:ident) )?]) => {
        impl<$($T,)* $($LT)?> Operand for ($($T,)* $($LT,)?) {
            type Shape = Lanes<$n>;
            type Whole = Self;

            #[inline]
            fn into_whole(self) -> Self {
                self
            }
        }

        impl<$($T,)* $($LT)?> Elementwise<$n> for ($($T,)* $($LT,)?) {
            type Elements = Self;

            #[inline]
            fn into_elements(self) -> Self {
                self
            }
        }

        impl<'a, $($T,)* $($LT)?> Operand for &'a ($($T,)* $($LT,)?) {
            type Shape = Lanes<$n>;
            type Whole = Self;

            #[inline]
            fn into_whole(self) -> Self {
                self
            }
        }

        impl<'a, $($T,)* $($LT)?> Elementwise<$n> for &'a ($($T,)* $($LT,)?) {
            type Elements = ($(&'a $T,)* $(&'a $LT,)?);

            #[inline]
            fn into_elements(self) -> Self::Elements {
                let ($($v,)* $($lv,)?) = self;
                ($($v,)* $($lv,)?)
            }
        }

        impl<'a, $($T,)* $($LT)?> Operand for &'a mut ($($T,)* $($LT,)?) {
            type Shape = Lanes<$n>;
            type Whole = Self;

            #[inline]
            fn into_whole(self) -> Self {
                self
            }
        }

        impl<'a, $($T,)* $($LT)?> Elementwise<$n> for &'a mut ($($T,)* $($LT,)?) {
            type Elements = ($(&'a mut $T,)* $(&'a mut $LT,)?);

            #[inline]
            fn into_elements(self) -> Self::Elements {
                let ($($v,)* $($lv,)?) = self;
                ($($v,)* $($lv,)?)
            }
        }
    };
}

for_each_lane_count!(impl_tuple_operand);
