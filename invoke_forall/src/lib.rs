//! Broadcasting invocation over fixed-arity tuples and arrays.
//!
//! [`invoke_forall`] calls an operation once per element position of its
//! elementwise operands and collects the results:
//!
//! ```
//! use invoke_forall::{invoke_forall, protect};
//!
//! let len = |s: &str| s.len();
//! let lengths = invoke_forall((protect(len), ["broadcast", "over", "x"]));
//! assert_eq!(lengths, [9, 4, 1]);
//! ```
//!
//! Each operand is either elementwise (arrays, tuples, and
//! [`Aggregate`]s, owned or borrowed) or scalar (everything else, and
//! anything wrapped with [`protect`]). Scalars are handed whole to every
//! call; elementwise operands contribute element `i` to call `i`. The
//! operation itself is an operand too, so a tuple of operations is applied
//! lane by lane:
//!
//! ```
//! use invoke_forall::invoke_forall;
//!
//! let double = |x: i32| x * 2;
//! let negate = |x: i32| -x;
//! let out = invoke_forall(((double, negate), 21_i32));
//! assert_eq!(out.0, 42);
//! assert_eq!(out.1, -21);
//! ```
//!
//! A scalar used by several calls is cloned for all but the last call, which
//! receives the value itself. Pass a shared reference (`&value`) to avoid the
//! clones. An exclusive reference (`&mut value`, or `&mut protect(value)` for
//! a value that would otherwise be elementwise) is lent to each call in turn,
//! so every call can update it:
//!
//! ```
//! use invoke_forall::{invoke_forall, protect};
//!
//! let sum2 = |t: &mut [i32; 3], d: i32| {
//!     let mut res = 0;
//!     for x in t.iter_mut() {
//!         *x -= d;
//!         res += *x;
//!     }
//!     res
//! };
//! let mut c = protect([4, 5, 6]);
//! assert_eq!(invoke_forall((protect(sum2), &mut c, [1, 2, 3])), [12, 6, -3]);
//!
//! let sum1 = |t: &[i32; 3]| t.iter().sum::<i32>();
//! assert_eq!(invoke_forall((protect(sum1), &c)), -3);
//! ```
//!
//! Every numeric type is a scalar operand, so a numeric literal passed as a
//! scalar usually needs a suffix (`21_i32`); otherwise the shape of the call
//! is not known until integer fallback, too late for method calls on the
//! result. Literals inside arrays take their type from the operation.
//!
//! # Rejected at compile time
//!
//! An empty argument list:
//!
//! ```compile_fail
//! invoke_forall::invoke_forall(());
//! ```
//!
//! An operand that is not callable in the operation position:
//!
//! ```compile_fail
//! use invoke_forall::invoke_forall;
//!
//! invoke_forall((5, [1, 2]));
//! ```
//!
//! A scalar that cannot be cloned, used by more than one call:
//!
//! ```compile_fail
//! use invoke_forall::{invoke_forall, protect, scalar_operand};
//!
//! struct Token;
//! scalar_operand!(Token);
//!
//! let f = |_t: Token, i: i32| i;
//! invoke_forall((protect(f), Token, [1, 2]));
//! ```
//!
//! The same for an exclusive reference owned by a [`Protected`] wrapper,
//! which is moved into one call and cannot be cloned for another (lend it
//! with `&mut total` instead):
//!
//! ```compile_fail
//! use invoke_forall::{invoke_forall, protect};
//!
//! let mut total = 0;
//! let add_to = |t: &mut i32, x: i32| *t += x;
//! invoke_forall((protect(add_to), protect(&mut total), [1, 2]));
//! ```
//!
//! A result that borrows from a lent reference, which would outlive the
//! reborrow it came from:
//!
//! ```compile_fail
//! use invoke_forall::{invoke_forall, protect};
//!
//! fn at(v: &mut Vec<i32>, i: usize) -> &mut i32 {
//!     &mut v[i]
//! }
//!
//! let mut values = vec![1, 2];
//! invoke_forall((protect(at), &mut values, [0, 1]));
//! ```
//!
//! An elementwise type that declares a length but provides no elements:
//!
//! ```compile_fail
//! use invoke_forall::{Lanes, Operand};
//!
//! struct Pair(i32, i32);
//!
//! impl Operand for Pair {
//!     type Shape = Lanes<2>;
//!     type Whole = Self;
//!
//!     fn into_whole(self) -> Self {
//!         self
//!     }
//! }
//! ```
//!
//! Or provides fewer elements than it declares:
//!
//! ```compile_fail
//! use invoke_forall::{Elementwise, Lanes, Operand};
//!
//! struct Pair(i32, i32);
//!
//! impl Operand for Pair {
//!     type Shape = Lanes<2>;
//!     type Whole = Self;
//!
//!     fn into_whole(self) -> Self {
//!         self
//!     }
//! }
//!
//! impl Elementwise<2> for Pair {
//!     type Elements = (i32,);
//!
//!     fn into_elements(self) -> (i32,) {
//!         (self.0,)
//!     }
//! }
//! ```
//!
//! # Tracing
//!
//! With the `trace` feature enabled, debug builds log the call plan and each
//! lane to stderr when the `INVOKE_FORALL_TRACE` environment variable is set.

// Library code logs through `trace`, never straight to stderr.
#![deny(clippy::print_stderr)]

#[macro_use]
mod macros;

// Classification
pub mod operand;
pub mod protect;
pub mod shape;

// Engine
pub mod aggregate;
pub mod engine;
pub mod invoke;
pub mod select;

// Diagnostics
pub mod error;
pub mod plan;
pub mod trace;

pub use aggregate::Aggregate;
pub use engine::{invoke_forall, try_invoke_forall, Arguments, InvokeForall, TryInvokeForall};
pub use error::{ShapeError, ShapeResult};
pub use operand::{arity_of, is_elementwise, is_lent, Elementwise, Operand};
pub use plan::{resolve_arity, Plan, Role, Step};
pub use protect::{protect, Protected};
pub use shape::{Cloned, Lanes, Lent, Scalar, Shape, Sharing};
