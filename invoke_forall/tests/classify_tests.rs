//! Operand classification, including user-defined operands.

use invoke_forall::{
    arity_of, invoke_forall, is_elementwise, is_lent, protect, scalar_operand, Aggregate, Elementwise, Lanes,
    Operand, Protected,
};
use pretty_assertions::assert_eq;

/// A user type that broadcasts over its three channels.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Rgb {
    r: u8,
    g: u8,
    b: u8,
}

impl Operand for Rgb {
    type Shape = Lanes<3>;
    type Whole = Self;

    fn into_whole(self) -> Self {
        self
    }
}

impl Elementwise<3> for Rgb {
    type Elements = (u8, u8, u8);

    fn into_elements(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

impl<'a> Operand for &'a mut Rgb {
    type Shape = Lanes<3>;
    type Whole = Self;

    fn into_whole(self) -> Self {
        self
    }
}

impl<'a> Elementwise<3> for &'a mut Rgb {
    type Elements = (&'a mut u8, &'a mut u8, &'a mut u8);

    fn into_elements(self) -> Self::Elements {
        (&mut self.r, &mut self.g, &mut self.b)
    }
}

/// A user type that is always used whole.
#[derive(Debug, Clone, PartialEq)]
struct Gain(f32);

scalar_operand!(Gain);

/// A generic user type that is always used whole.
#[derive(Debug, Clone)]
struct Bounds<T> {
    lo: T,
    hi: T,
}

scalar_operand!(impl<T> Bounds<T>);

// ==== Queries ====

#[test]
fn test_builtin_arities() {
    assert_eq!(arity_of::<[f32; 5]>(), Some(5));
    assert_eq!(arity_of::<(u8, String)>(), Some(2));
    assert_eq!(arity_of::<&Aggregate<(u8, u8, u8)>>(), Some(3));
    assert_eq!(arity_of::<Vec<[u8; 5]>>(), None);
    assert_eq!(arity_of::<Protected<(u8, u8)>>(), None);
}

#[test]
fn test_user_type_arities() {
    assert_eq!(arity_of::<Rgb>(), Some(3));
    assert_eq!(arity_of::<&mut Rgb>(), Some(3));
    assert_eq!(arity_of::<Gain>(), None);
    assert_eq!(arity_of::<&Bounds<i64>>(), None);
}

#[test]
fn test_queries_are_const() {
    const RGB_LANES: Option<usize> = arity_of::<Rgb>();
    const GAIN_IS_ELEMENTWISE: bool = is_elementwise::<Gain>();
    assert_eq!(RGB_LANES, Some(3));
    assert!(!GAIN_IS_ELEMENTWISE);
}

#[test]
fn test_user_scalars_lent_by_exclusive_reference() {
    assert!(is_lent::<&mut Gain>());
    assert!(is_lent::<&mut Bounds<u8>>());
    assert!(!is_lent::<&Gain>());
    assert!(!is_lent::<Gain>());
    assert!(!is_lent::<&mut Rgb>());
}

// ==== Broadcasting user types ====

#[test]
fn test_user_elementwise_with_user_scalar() {
    let apply = |channel: u8, gain: Gain| (channel as f32 * gain.0) as u8;
    let out = invoke_forall((protect(apply), Rgb { r: 10, g: 20, b: 30 }, Gain(1.5)));
    assert_eq!(out.into_array(), [15, 30, 45]);
}

#[test]
fn test_user_elementwise_mutated_in_place() {
    let mut color = Rgb { r: 250, g: 5, b: 128 };
    let bounds = Bounds { lo: 10_u8, hi: 200 };
    let clamp = |c: &mut u8, b: &Bounds<u8>| *c = (*c).clamp(b.lo, b.hi);
    invoke_forall((protect(clamp), &mut color, &bounds));
    assert_eq!(color, Rgb { r: 200, g: 10, b: 128 });
}

#[test]
fn test_user_elementwise_matches_builtin_arity() {
    let mix = |a: u8, b: u8| a / 2 + b / 2;
    let out = invoke_forall((protect(mix), Rgb { r: 100, g: 0, b: 50 }, [100, 200, 50]));
    assert_eq!(out.into_array(), [100, 100, 50]);
}

#[test]
fn test_protected_user_elementwise_is_whole() {
    let brightness = |c: Rgb, scale: u16| (c.r as u16 + c.g as u16 + c.b as u16) * scale;
    let out = invoke_forall((protect(brightness), protect(Rgb { r: 1, g: 2, b: 3 }), [1, 10]));
    assert_eq!(out.into_array(), [6, 60]);
}

#[test]
fn test_user_scalar_lent_to_each_channel() {
    let mut peak = Gain(0.0);
    let track = |channel: u8, seen: &mut Gain| seen.0 = seen.0.max(channel as f32);
    invoke_forall((protect(track), Rgb { r: 40, g: 90, b: 7 }, &mut peak));
    assert_eq!(peak, Gain(90.0));
}
