//! Clone and move accounting for scalar operands.

use std::cell::Cell;
use std::collections::LinkedList;
use std::rc::Rc;

use invoke_forall::{invoke_forall, protect, scalar_operand};
use pretty_assertions::assert_eq;

/// A value that counts how often it is cloned and remembers whether it is
/// the original.
#[derive(Debug)]
struct Tracked {
    clones: Rc<Cell<usize>>,
    original: bool,
}

impl Tracked {
    fn new() -> (Tracked, Rc<Cell<usize>>) {
        let clones = Rc::new(Cell::new(0));
        let tracked = Tracked {
            clones: Rc::clone(&clones),
            original: true,
        };
        (tracked, clones)
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        self.clones.set(self.clones.get() + 1);
        Tracked {
            clones: Rc::clone(&self.clones),
            original: false,
        }
    }
}

scalar_operand!(Tracked);

fn is_original(t: Tracked, _lane: usize) -> bool {
    t.original
}

// ==== Scalars ====

#[test]
fn test_scalar_cloned_for_all_but_last_lane() {
    let (tracked, clones) = Tracked::new();
    let op: fn(Tracked, usize) -> bool = is_original;
    let out = invoke_forall((op, tracked, [0, 1, 2]));
    assert_eq!(clones.get(), 2);
    assert_eq!(out.into_array(), [false, false, true]);
}

#[test]
fn test_scalar_single_lane_is_moved() {
    let (tracked, clones) = Tracked::new();
    let op: fn(Tracked, usize) -> bool = is_original;
    let out = invoke_forall((op, tracked, [0]));
    assert_eq!(clones.get(), 0);
    assert!(out[0]);
}

#[test]
fn test_scalar_single_call_is_moved() {
    let (tracked, clones) = Tracked::new();
    let op: fn(Tracked, usize) -> bool = is_original;
    let out = invoke_forall((op, tracked, 0_usize));
    assert_eq!(clones.get(), 0);
    assert!(out);
}

#[test]
fn test_scalar_zero_lanes_is_dropped_uncloned() {
    let (tracked, clones) = Tracked::new();
    let op: fn(Tracked, usize) -> bool = is_original;
    let out = invoke_forall((op, tracked, [0_usize; 0]));
    assert!(out.is_empty());
    assert_eq!(clones.get(), 0);
    assert_eq!(Rc::strong_count(&clones), 1);
}

#[test]
fn test_each_scalar_follows_its_own_schedule() {
    let (first, first_clones) = Tracked::new();
    let (second, second_clones) = Tracked::new();
    let both = |a: Tracked, b: Tracked, _lane: u8| (a.original, b.original);
    let out = invoke_forall((protect(both), first, second, [0, 1, 2, 3]));
    assert_eq!(first_clones.get(), 3);
    assert_eq!(second_clones.get(), 3);
    assert_eq!(
        out.into_array(),
        [(false, false), (false, false), (false, false), (true, true)]
    );
}

#[test]
fn test_protected_scalar_cloned_once_for_two_lanes() {
    let (tracked, clones) = Tracked::new();
    let op: fn(Tracked, usize) -> bool = is_original;
    let out = invoke_forall((op, protect(tracked), [0, 1]));
    assert_eq!(clones.get(), 1);
    assert_eq!(out.into_array(), [false, true]);
}

#[test]
fn test_borrowed_scalar_is_never_cloned() {
    let (tracked, clones) = Tracked::new();
    let check = |t: &Tracked, _lane: usize| t.original;
    let out = invoke_forall((protect(check), &tracked, [0, 1, 2]));
    assert_eq!(clones.get(), 0);
    assert_eq!(out.into_array(), [true, true, true]);
}

// ==== Elementwise ====

#[test]
fn test_elementwise_values_are_moved() {
    let (a, a_clones) = Tracked::new();
    let (b, b_clones) = Tracked::new();
    let op = |t: Tracked| t.original;
    let out = invoke_forall((protect(op), (a, b)));
    assert_eq!(a_clones.get() + b_clones.get(), 0);
    assert_eq!(out.into_array(), [true, true]);
}

#[test]
fn test_tuple_of_operations_is_not_cloned() {
    let (tracked, clones) = Tracked::new();
    let keep = move |_x: i32| tracked.original;
    let other = |_x: i32| false;
    let out = invoke_forall(((keep, other), 1_i32));
    assert_eq!(clones.get(), 0);
    assert_eq!(out.into_array(), [true, false]);
}

// ==== Owned strings ====

#[test]
fn test_owned_string_scalar_with_owned_strings() {
    let product = |s1: String, s2: String| s1.len() * s2.len();
    let out = invoke_forall((
        protect(product),
        String::from("aaa"),
        (String::from("abacaba"), String::from("ab"), String::from("c")),
    ));
    // A moved-from value would have length 0.
    assert_eq!(out.into_array(), [21, 6, 3]);
}

#[test]
fn test_list_scalar_shared_across_lanes() {
    let product = |s: String, list: LinkedList<i32>| s.len() * list.len();
    let list: LinkedList<i32> = (1..=5).collect();
    let out = invoke_forall((
        protect(product),
        (String::from("abc"), String::from("bbab")),
        list,
    ));
    assert_eq!(out.into_array(), [15, 20]);
}
