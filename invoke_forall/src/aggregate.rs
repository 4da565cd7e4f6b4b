//! Result aggregation.
//!
//! A broadcast over `N` lanes returns an [`Aggregate`] of its `N` results, in
//! lane order. A call with no elementwise operand returns its single result
//! directly.

use std::ops::{Deref, DerefMut, Index, IndexMut};

use crate::operand::{Elementwise, Operand};
use crate::shape::{Lanes, Row, Scalar};

/// The per-lane results of a broadcast, stored as a tuple.
///
/// Positional access goes through the tuple (`agg.0`, `agg.1`, ...), so
/// results of different types are all reachable. When every result has the
/// same type `R` the aggregate also behaves like an `[R; N]`: it can be
/// indexed, iterated in either direction, converted with `into_array`, and
/// compared against an array.
///
/// An aggregate is itself an elementwise operand, so broadcasts compose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Aggregate<T> {
    lanes: T,
}

impl<T> Aggregate<T> {
    /// Wrap a tuple of results.
    pub const fn new(lanes: T) -> Self {
        Aggregate { lanes }
    }

    /// Unwrap into the tuple of results.
    pub fn into_inner(self) -> T {
        self.lanes
    }
}

impl<T> Deref for Aggregate<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.lanes
    }
}

impl<T> DerefMut for Aggregate<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.lanes
    }
}

impl Aggregate<()> {
    /// View an empty aggregate as an empty array of any element type.
    pub fn into_array<R>(self) -> [R; 0] {
        []
    }
}

/// Build the final result of a call from its per-lane results.
///
/// Implemented on the unified shape of the call.
pub trait Collect<Results> {
    type Output;

    fn collect(results: Results) -> Self::Output;
}

impl<R> Collect<(R,)> for Scalar {
    type Output = R;

    #[inline]
    fn collect(results: (R,)) -> R {
        let (result,) = results;
        result
    }
}

impl<T: Row<N>, const N: usize> Collect<T> for Lanes<N> {
    type Output = Aggregate<T>;

    #[inline]
    fn collect(results: T) -> Aggregate<T> {
        Aggregate::new(results)
    }
}

macro_rules! impl_aggregate {
    (@common $n:literal; $( ($i:tt $T:ident $U:ident $v:ident $w:ident) )*) => {
        impl<$($T),*> Aggregate<($($T,)*)> {
            /// Number of lanes.
            pub const LEN: usize = $n;

            /// Number of lanes.
            pub const fn len(&self) -> usize {
                $n
            }

            /// Whether the aggregate has no lanes.
            pub const fn is_empty(&self) -> bool {
                $n == 0
            }
        }

        impl<$($T),*> Operand for Aggregate<($($T,)*)> {
            type Shape = Lanes<$n>;
            type Whole = Self;

            #[inline]
            fn into_whole(self) -> Self {
                self
            }
        }

        impl<$($T),*> Elementwise<$n> for Aggregate<($($T,)*)> {
            type Elements = ($($T,)*);

            #[inline]
            fn into_elements(self) -> Self::Elements {
                self.lanes
            }
        }

        impl<'a, $($T),*> Operand for &'a Aggregate<($($T,)*)> {
            type Shape = Lanes<$n>;
            type Whole = Self;

            #[inline]
            fn into_whole(self) -> Self {
                self
            }
        }

        impl<'a, $($T),*> Elementwise<$n> for &'a Aggregate<($($T,)*)> {
            type Elements = ($(&'a $T,)*);

            #[inline]
            fn into_elements(self) -> Self::Elements {
                let ($($v,)*) = &self.lanes;
                ($($v,)*)
            }
        }

        impl<'a, $($T),*> Operand for &'a mut Aggregate<($($T,)*)> {
            type Shape = Lanes<$n>;
            type Whole = Self;

            #[inline]
            fn into_whole(self) -> Self {
                self
            }
        }

        impl<'a, $($T),*> Elementwise<$n> for &'a mut Aggregate<($($T,)*)> {
            type Elements = ($(&'a mut $T,)*);

            #[inline]
            fn into_elements(self) -> Self::Elements {
                let ($($v,)*) = &mut self.lanes;
                ($($v,)*)
            }
        }
    };
    (@uniform $n:literal; $( ($i:tt $T:ident $U:ident $v:ident $w:ident) )+) => {
        impl<R> Aggregate<($(same!($T, R),)+)> {
            /// Convert into an array of the results.
            pub fn into_array(self) -> [R; $n] {
                let ($($v,)+) = self.lanes;
                [$($v,)+]
            }

            /// An array of references to the results.
            pub fn as_array(&self) -> [&R; $n] {
                let ($($v,)+) = &self.lanes;
                [$($v,)+]
            }

            /// An array of mutable references to the results.
            pub fn as_mut_array(&mut self) -> [&mut R; $n] {
                let ($($v,)+) = &mut self.lanes;
                [$($v,)+]
            }

            /// Iterate over references to the results, in lane order.
            pub fn iter(&self) -> std::array::IntoIter<&R, $n> {
                self.as_array().into_iter()
            }

            /// Iterate over mutable references to the results, in lane order.
            pub fn iter_mut(&mut self) -> std::array::IntoIter<&mut R, $n> {
                self.as_mut_array().into_iter()
            }
        }

        impl<R> Index<usize> for Aggregate<($(same!($T, R),)+)> {
            type Output = R;

            fn index(&self, index: usize) -> &R {
                match index {
                    $($i => &self.lanes.$i,)+
                    _ => panic!("index out of bounds: the len is {} but the index is {}", $n, index),
                }
            }
        }

        impl<R> IndexMut<usize> for Aggregate<($(same!($T, R),)+)> {
            fn index_mut(&mut self, index: usize) -> &mut R {
                match index {
                    $($i => &mut self.lanes.$i,)+
                    _ => panic!("index out of bounds: the len is {} but the index is {}", $n, index),
                }
            }
        }

        impl<R> IntoIterator for Aggregate<($(same!($T, R),)+)> {
            type Item = R;
            type IntoIter = std::array::IntoIter<R, $n>;

            fn into_iter(self) -> Self::IntoIter {
                self.into_array().into_iter()
            }
        }

        impl<'a, R> IntoIterator for &'a Aggregate<($(same!($T, R),)+)> {
            type Item = &'a R;
            type IntoIter = std::array::IntoIter<&'a R, $n>;

            fn into_iter(self) -> Self::IntoIter {
                self.iter()
            }
        }

        impl<'a, R> IntoIterator for &'a mut Aggregate<($(same!($T, R),)+)> {
            type Item = &'a mut R;
            type IntoIter = std::array::IntoIter<&'a mut R, $n>;

            fn into_iter(self) -> Self::IntoIter {
                self.iter_mut()
            }
        }

        impl<R: PartialEq> PartialEq<[R; $n]> for Aggregate<($(same!($T, R),)+)> {
            fn eq(&self, other: &[R; $n]) -> bool {
                $(self.lanes.$i == other[$i])&&+
            }
        }

        impl<R> From<Aggregate<($(same!($T, R),)+)>> for [R; $n] {
            fn from(aggregate: Aggregate<($(same!($T, R),)+)>) -> Self {
                aggregate.into_array()
            }
        }
    };
    (0; [] []) => {
        impl_aggregate!(@common 0;);
    };
    ($n:literal; [$($init:tt)*] [$($last:tt)*]) => {
        impl_aggregate!(@common $n; $($init)* $($last)*);
        impl_aggregate!(@uniform $n; $($init)* $($last)*);
    };
}

for_each_lane_count!(impl_aggregate);
