//! Opt-out wrapper: force any value to be treated as a scalar.

use crate::operand::Operand;
use crate::shape::{Lent, Scalar};

/// A value that is always used whole, even if it is elementwise.
///
/// Created with [`protect`]. When a broadcast hands a protected operand to
/// the operation it unwraps it: the operation receives the inner `T`, not the
/// wrapper. Borrowing the wrapper (`&Protected<T>`) hands out `&T` instead,
/// which is how one value can be shared by every position without cloning it.
/// Borrowing it exclusively (`&mut Protected<T>`) lends `&mut T` to each call
/// in turn, so every call can update the same value.
///
/// ```
/// use invoke_forall::{invoke_forall, protect};
///
/// let shift = |row: &mut [i32; 3], d: i32| {
///     row.iter_mut().for_each(|x| *x -= d);
///     row.iter().sum::<i32>()
/// };
/// let mut row = protect([4, 5, 6]);
/// let sums = invoke_forall((protect(shift), &mut row, [1, 2, 3]));
/// assert_eq!(sums, [12, 6, -3]);
/// assert_eq!(row.into_inner(), [-2, -1, 0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Protected<T> {
    value: T,
}

/// Wrap `value` so that broadcasting uses it whole.
///
/// The wrapper owns `value`; pass a reference (`protect(&v)`,
/// `protect(&mut v)`) to keep referring to the original. An owned
/// `&mut` inside the wrapper cannot be cloned, so it reaches at most one
/// call; to update one value from every call, borrow the wrapper instead
/// (`&mut protect(v)`).
///
/// ```
/// use invoke_forall::{invoke_forall, protect};
///
/// let first = |row: [i32; 2], i: usize| row[i];
/// let out = invoke_forall((protect(first), protect([7, 8]), [1, 0]));
/// assert_eq!(out, [8, 7]);
/// ```
pub fn protect<T>(value: T) -> Protected<T> {
    Protected { value }
}

impl<T> Protected<T> {
    /// Unwrap into the protected value.
    pub fn into_inner(self) -> T {
        self.value
    }

    /// Borrow the protected value.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Mutably borrow the protected value.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T> From<T> for Protected<T> {
    fn from(value: T) -> Self {
        protect(value)
    }
}

impl<T> Operand for Protected<T> {
    type Shape = Scalar;
    type Whole = T;

    #[inline]
    fn into_whole(self) -> T {
        self.value
    }
}

impl<'a, T> Operand for &'a Protected<T> {
    type Shape = Scalar;
    type Whole = &'a T;

    #[inline]
    fn into_whole(self) -> &'a T {
        &self.value
    }
}

impl<'a, T> Operand for &'a mut Protected<T> {
    type Shape = Scalar<Lent>;
    type Whole = &'a mut T;

    #[inline]
    fn into_whole(self) -> &'a mut T {
        &mut self.value
    }
}
