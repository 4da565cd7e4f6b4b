//! End-to-end broadcasting behavior through the public API.

use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};

use invoke_forall::{invoke_forall, protect, try_invoke_forall, Aggregate};
use pretty_assertions::assert_eq;

// ==== Basic broadcasting ====

#[test]
fn test_elementwise_plus_elementwise() {
    let add = |a: i32, b: i32| a + b;
    let out = invoke_forall((protect(add), [1, 2, 3], [10, 20, 30]));
    assert_eq!(out.into_array(), [11, 22, 33]);
}

#[test]
fn test_scalar_plus_elementwise() {
    let add = |a: i32, b: i32| a + b;
    let out = invoke_forall((protect(add), 10_i32, [1, 2, 3]));
    assert_eq!(out.into_array(), [11, 12, 13]);
}

#[test]
fn test_elementwise_in_any_position() {
    let sub = |a: i32, b: i32| a - b;
    let left = invoke_forall((protect(sub), [5, 6], 1_i32));
    let right = invoke_forall((protect(sub), 1_i32, [5, 6]));
    assert_eq!(left.into_array(), [4, 5]);
    assert_eq!(right.into_array(), [-4, -5]);
}

#[test]
fn test_tuple_elementwise_operand() {
    let describe = |label: &str, n: usize| format!("{label}:{n}");
    let out = invoke_forall((protect(describe), ("a", "b"), (1usize, 2usize)));
    assert_eq!(out.into_array(), ["a:1".to_string(), "b:2".to_string()]);
}

#[test]
fn test_string_lengths_with_scalar_factor() {
    let scaled_len = |s: &str, k: usize| s.len() * k;
    let out = invoke_forall((protect(scaled_len), ["forty-two!!!!", "twelve", "xyz"], 6_usize));
    assert_eq!(out.into_array(), [78, 36, 18]);
}

#[test]
fn test_heterogeneous_results() {
    let ops = (|x: i32| x + 1, |x: i32| x.to_string(), |x: i32| x > 0);
    let out = invoke_forall((ops, [41, 7, -3]));
    assert_eq!(out.0, 42);
    assert_eq!(out.1, "7");
    assert!(!out.2);
    assert_eq!(out.len(), 3);
}

#[test]
fn test_tuple_of_operations_with_scalar_argument() {
    let ops = (|x: f64| x * 2.0, |x: f64| x + 0.5);
    let out = invoke_forall((ops, 4.0_f64));
    assert_eq!(out.into_array(), [8.0, 4.5]);
}

#[test]
fn test_fn_pointer_operation() {
    fn mul(a: i64, b: i64) -> i64 {
        a * b
    }
    let op: fn(i64, i64) -> i64 = mul;
    let out = invoke_forall((op, [2, 3], [5, 7]));
    assert_eq!(out.into_array(), [10, 21]);
}

#[test]
fn test_macro_form() {
    let sum3 = |a: u8, b: u8, c: u8| a + b + c;
    let out = invoke_forall!(protect(sum3), [1, 2], 10_u8, [100, 200]);
    assert_eq!(out.into_array(), [111, 212]);
}

// ==== Single call ====

#[test]
fn test_all_scalar_is_single_unwrapped_call() {
    let add = |a: i32, b: i32| a + b;
    let out: i32 = invoke_forall((protect(add), 2_i32, 40_i32));
    assert_eq!(out, 42);
}

#[test]
fn test_one_element_collection_is_a_broadcast() {
    let add = |a: i32, b: i32| a + b;
    let out: Aggregate<(i32,)> = invoke_forall((protect(add), [5], 1_i32));
    assert_eq!(out.len(), 1);
    assert_eq!(out[0], 6);
}

#[test]
fn test_operation_without_operands() {
    let answer = || 42;
    assert_eq!(invoke_forall((protect(answer),)), 42);
}

// ==== Protect ====

#[test]
fn test_protected_array_is_passed_whole() {
    let pick = |row: [i32; 3], i: usize| row[i];
    let out = invoke_forall((protect(pick), protect([7, 8, 9]), [2, 0]));
    assert_eq!(out.into_array(), [9, 7]);
}

#[test]
fn test_protected_vec_shared_by_reference() {
    let data = vec![10, 20, 30];
    let at = |v: &Vec<i32>, i: usize| v[i];
    let out = invoke_forall((protect(at), protect(&data), [2, 1, 0]));
    assert_eq!(out.into_array(), [30, 20, 10]);
}

#[test]
fn test_borrowed_protected_hands_out_reference() {
    let table = protect([1, 2, 3]);
    let sum_with = |row: &[i32; 3], k: i32| row.iter().sum::<i32>() * k;
    let out = invoke_forall((protect(sum_with), &table, [1, 10]));
    assert_eq!(out.into_array(), [6, 60]);
}

// ==== Void operations and mutation ====

#[test]
fn test_void_operation_mutates_through_references() {
    let mut values = [1, 2, 3];
    let add_five = |x: &mut i32| *x += 5;
    let out = invoke_forall((protect(add_five), &mut values));
    assert_eq!(out, [(), (), ()]);
    assert_eq!(values, [6, 7, 8]);
}

#[test]
fn test_reference_results_keep_identity() {
    fn id_mut(x: &mut i32) -> &mut i32 {
        x
    }
    let mut a = 1;
    let mut b = 2;
    let op: fn(&mut i32) -> &mut i32 = id_mut;
    let mut out = invoke_forall((protect(op), (&mut a, &mut b)));
    for slot in out.iter_mut() {
        **slot *= 100;
    }
    assert_eq!((a, b), (100, 200));
}

#[test]
fn test_shared_mutable_state_through_refcell() {
    let log = RefCell::new(Vec::new());
    let record = |sink: &RefCell<Vec<i32>>, x: i32| sink.borrow_mut().push(x);
    invoke_forall((protect(record), &log, [3, 1, 2]));
    assert_eq!(*log.borrow(), vec![3, 1, 2]);
}

// ==== Exclusive scalars ====

#[test]
fn test_exclusive_scalar_updated_by_every_call() {
    let sum2 = |t: &mut [i32; 3], d: i32| {
        let mut res = 0;
        for x in t.iter_mut() {
            *x -= d;
            res += *x;
        }
        res
    };
    let sum1 = |t: &[i32; 3]| t.iter().sum::<i32>();
    let mut c = protect([4, 5, 6]);
    let out = invoke_forall((protect(sum2), &mut c, [1, 2, 3]));
    assert_eq!(out.into_array(), [12, 6, -3]);
    assert_eq!(invoke_forall((protect(sum1), &c)), -3);
    assert_eq!(c.into_inner(), [-2, -1, 0]);
}

#[test]
fn test_exclusive_collection_collects_in_order() {
    let mut log: Vec<String> = Vec::new();
    let record = |sink: &mut Vec<String>, x: i32| sink.push(x.to_string());
    let out = invoke_forall((protect(record), &mut log, [3, 1, 2]));
    assert_eq!(out, [(), (), ()]);
    assert_eq!(log, vec!["3", "1", "2"]);
}

#[test]
fn test_exclusive_operation_called_per_lane() {
    let mut seen = 0;
    {
        let mut bump = protect(|x: i32| {
            seen += x;
            seen
        });
        let out = invoke_forall((&mut bump, [1, 2, 3]));
        assert_eq!(out.into_array(), [1, 3, 6]);
    }
    assert_eq!(seen, 6);
}

#[test]
fn test_exclusive_scalar_moved_into_single_call() {
    fn at(v: &mut Vec<i32>, i: usize) -> &mut i32 {
        &mut v[i]
    }
    let mut values = vec![1, 2, 3];
    let slot = invoke_forall((protect(at), &mut values, 1usize));
    *slot = 20;
    assert_eq!(values, vec![1, 20, 3]);
}

#[test]
fn test_protected_operation_called_once() {
    let calls = Cell::new(0);
    let sum = |v: [i32; 3]| {
        calls.set(calls.get() + 1);
        v.iter().sum::<i32>()
    };
    assert_eq!(invoke_forall((protect(sum), protect([1, 2, 3]))), 6);
    assert_eq!(calls.get(), 1);
}

// ==== Arity zero ====

#[test]
fn test_zero_lanes_make_no_calls() {
    let calls = RefCell::new(0);
    let count = |_x: i32| *calls.borrow_mut() += 1;
    let out = invoke_forall((protect(count), [0i32; 0]));
    assert!(out.is_empty());
    assert_eq!(*calls.borrow(), 0);
}

#[test]
fn test_unit_is_an_empty_operand() {
    let never = |_a: i32, _b: ()| -> i32 { unreachable!() };
    let out = invoke_forall((protect(never), 1_i32, ()));
    assert_eq!(out.len(), 0);
}

// ==== Ordering and failure ====

#[test]
fn test_calls_run_in_ascending_order() {
    let log = RefCell::new(Vec::new());
    let record = |tag: &str| log.borrow_mut().push(tag.to_string());
    invoke_forall((protect(record), ["first", "second", "third", "fourth"]));
    assert_eq!(*log.borrow(), vec!["first", "second", "third", "fourth"]);
}

#[test]
fn test_panic_propagates_after_earlier_effects() {
    let log = RefCell::new(Vec::new());
    let checked = |x: i32| {
        if x == 2 {
            panic!("bad lane");
        }
        log.borrow_mut().push(x);
    };
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        invoke_forall((protect(checked), [1, 2, 3]));
    }));
    assert!(result.is_err());
    assert_eq!(*log.borrow(), vec![1]);
}

#[test]
fn test_try_invoke_forall_success() {
    let parse = |s: &str| s.parse::<i32>();
    let out = try_invoke_forall((protect(parse), ["4", "-2", "17"])).unwrap();
    assert_eq!(out, [4, -2, 17]);
}

#[test]
fn test_try_invoke_forall_short_circuits() {
    let seen = RefCell::new(Vec::new());
    let parse = |s: &str| {
        seen.borrow_mut().push(s.to_string());
        s.parse::<u8>()
    };
    let out = try_invoke_forall!(protect(parse), ["1", "oops", "3"]);
    assert!(out.is_err());
    assert_eq!(*seen.borrow(), vec!["1", "oops"]);
}

// ==== Composition ====

#[test]
fn test_aggregate_feeds_next_broadcast() {
    let square = |x: i32| x * x;
    let add = |a: i32, b: i32| a + b;
    let squares = invoke_forall((protect(square), [1, 2, 3]));
    let out = invoke_forall((protect(add), squares, [10, 20, 30]));
    assert_eq!(out.into_array(), [11, 24, 39]);
}

#[test]
fn test_borrowed_aggregate_feeds_next_broadcast() {
    let label = |n: usize| "x".repeat(n);
    let labels = invoke_forall((protect(label), [1usize, 2]));
    let lengths = invoke_forall((protect(|s: &String| s.len()), &labels));
    assert_eq!(lengths.into_array(), [1, 2]);
    assert_eq!(labels[1], "xx");
}
