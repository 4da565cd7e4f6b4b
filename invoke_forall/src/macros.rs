//! Enumerators that expand a callback macro once per supported arity.
//!
//! Broadcasting needs one trait implementation per lane count and one per
//! call arity. Rather than repeating the identifier lists in every module,
//! each module defines a small callback macro and hands it to one of the
//! enumerators below.

/// Invoke `$callback!` for every lane count from 0 to 12.
///
/// Each lane is passed as `(index Type OtherType binding other_binding)`.
/// The lanes are split into everything-but-the-last and the last lane, which
/// is what the move-once schedule needs; callbacks that want the full list
/// simply transcribe both groups.
macro_rules! for_each_lane_count {
    ($callback:ident) => {
        $callback!(0; [] []);
        $callback!(1; [] [(0 T0 U0 v0 w0)]);
        $callback!(2; [(0 T0 U0 v0 w0)] [(1 T1 U1 v1 w1)]);
        $callback!(3; [(0 T0 U0 v0 w0) (1 T1 U1 v1 w1)] [(2 T2 U2 v2 w2)]);
        $callback!(4; [(0 T0 U0 v0 w0) (1 T1 U1 v1 w1) (2 T2 U2 v2 w2)] [(3 T3 U3 v3 w3)]);
        $callback!(5; [(0 T0 U0 v0 w0) (1 T1 U1 v1 w1) (2 T2 U2 v2 w2) (3 T3 U3 v3 w3)] [(4 T4 U4 v4 w4)]);
        $callback!(6; [(0 T0 U0 v0 w0) (1 T1 U1 v1 w1) (2 T2 U2 v2 w2) (3 T3 U3 v3 w3) (4 T4 U4 v4 w4)] [(5 T5 U5 v5 w5)]);
        $callback!(7; [(0 T0 U0 v0 w0) (1 T1 U1 v1 w1) (2 T2 U2 v2 w2) (3 T3 U3 v3 w3) (4 T4 U4 v4 w4) (5 T5 U5 v5 w5)] [(6 T6 U6 v6 w6)]);
        $callback!(8; [(0 T0 U0 v0 w0) (1 T1 U1 v1 w1) (2 T2 U2 v2 w2) (3 T3 U3 v3 w3) (4 T4 U4 v4 w4) (5 T5 U5 v5 w5) (6 T6 U6 v6 w6)] [(7 T7 U7 v7 w7)]);
        $callback!(9; [(0 T0 U0 v0 w0) (1 T1 U1 v1 w1) (2 T2 U2 v2 w2) (3 T3 U3 v3 w3) (4 T4 U4 v4 w4) (5 T5 U5 v5 w5) (6 T6 U6 v6 w6) (7 T7 U7 v7 w7)] [(8 T8 U8 v8 w8)]);
        $callback!(10; [(0 T0 U0 v0 w0) (1 T1 U1 v1 w1) (2 T2 U2 v2 w2) (3 T3 U3 v3 w3) (4 T4 U4 v4 w4) (5 T5 U5 v5 w5) (6 T6 U6 v6 w6) (7 T7 U7 v7 w7) (8 T8 U8 v8 w8)] [(9 T9 U9 v9 w9)]);
        $callback!(11; [(0 T0 U0 v0 w0) (1 T1 U1 v1 w1) (2 T2 U2 v2 w2) (3 T3 U3 v3 w3) (4 T4 U4 v4 w4) (5 T5 U5 v5 w5) (6 T6 U6 v6 w6) (7 T7 U7 v7 w7) (8 T8 U8 v8 w8) (9 T9 U9 v9 w9)] [(10 T10 U10 v10 w10)]);
        $callback!(12; [(0 T0 U0 v0 w0) (1 T1 U1 v1 w1) (2 T2 U2 v2 w2) (3 T3 U3 v3 w3) (4 T4 U4 v4 w4) (5 T5 U5 v5 w5) (6 T6 U6 v6 w6) (7 T7 U7 v7 w7) (8 T8 U8 v8 w8) (9 T9 U9 v9 w9) (10 T10 U10 v10 w10)] [(11 T11 U11 v11 w11)]);
    };
}

/// Invoke `$callback!` for every argument count from 0 to 12.
///
/// Each argument is passed as `(Type binding LenderType lender)`; the
/// lender pair names what resolves that argument when the call is made.
macro_rules! for_each_argument_count {
    ($callback:ident) => {
        $callback!(0; );
        $callback!(1; (A0 a0 L0 l0));
        $callback!(2; (A0 a0 L0 l0) (A1 a1 L1 l1));
        $callback!(3; (A0 a0 L0 l0) (A1 a1 L1 l1) (A2 a2 L2 l2));
        $callback!(4; (A0 a0 L0 l0) (A1 a1 L1 l1) (A2 a2 L2 l2) (A3 a3 L3 l3));
        $callback!(5; (A0 a0 L0 l0) (A1 a1 L1 l1) (A2 a2 L2 l2) (A3 a3 L3 l3) (A4 a4 L4 l4));
        $callback!(6; (A0 a0 L0 l0) (A1 a1 L1 l1) (A2 a2 L2 l2) (A3 a3 L3 l3) (A4 a4 L4 l4) (A5 a5 L5 l5));
        $callback!(7; (A0 a0 L0 l0) (A1 a1 L1 l1) (A2 a2 L2 l2) (A3 a3 L3 l3) (A4 a4 L4 l4) (A5 a5 L5 l5) (A6 a6 L6 l6));
        $callback!(8; (A0 a0 L0 l0) (A1 a1 L1 l1) (A2 a2 L2 l2) (A3 a3 L3 l3) (A4 a4 L4 l4) (A5 a5 L5 l5) (A6 a6 L6 l6) (A7 a7 L7 l7));
        $callback!(9; (A0 a0 L0 l0) (A1 a1 L1 l1) (A2 a2 L2 l2) (A3 a3 L3 l3) (A4 a4 L4 l4) (A5 a5 L5 l5) (A6 a6 L6 l6) (A7 a7 L7 l7) (A8 a8 L8 l8));
        $callback!(10; (A0 a0 L0 l0) (A1 a1 L1 l1) (A2 a2 L2 l2) (A3 a3 L3 l3) (A4 a4 L4 l4) (A5 a5 L5 l5) (A6 a6 L6 l6) (A7 a7 L7 l7) (A8 a8 L8 l8) (A9 a9 L9 l9));
        $callback!(11; (A0 a0 L0 l0) (A1 a1 L1 l1) (A2 a2 L2 l2) (A3 a3 L3 l3) (A4 a4 L4 l4) (A5 a5 L5 l5) (A6 a6 L6 l6) (A7 a7 L7 l7) (A8 a8 L8 l8) (A9 a9 L9 l9) (A10 a10 L10 l10));
        $callback!(12; (A0 a0 L0 l0) (A1 a1 L1 l1) (A2 a2 L2 l2) (A3 a3 L3 l3) (A4 a4 L4 l4) (A5 a5 L5 l5) (A6 a6 L6 l6) (A7 a7 L7 l7) (A8 a8 L8 l8) (A9 a9 L9 l9) (A10 a10 L10 l10) (A11 a11 L11 l11));
    };
}

/// Expands to its second argument; lets a repetition over one list emit a
/// fixed type once per element (`[R; N]` spelled as a tuple `(R, R, ..)`).
macro_rules! same {
    ($_ignored:tt, $($replacement:tt)*) => {
        $($replacement)*
    };
}
