//! Call plans: a value-level description of a broadcast.
//!
//! The engine resolves shapes at compile time and never builds a plan to
//! run a call. A [`Plan`] describes the same decisions at run time, for
//! tracing and for tooling that works with arity lists rather than types:
//! which operands are elementwise, how many calls are made, and what each
//! call receives from each operand.

use std::fmt;

use crate::engine::Arguments;
use crate::error::{ShapeError, ShapeResult};

/// Resolve the arity of a call from the arities of its operands.
///
/// `None` entries are scalars. Returns `Ok(None)` when every operand is
/// scalar (a single call) and `Ok(Some(n))` when the elementwise operands
/// all have `n` elements.
///
/// ```
/// use invoke_forall::{resolve_arity, ShapeError};
///
/// const ARITY: Option<usize> = match resolve_arity(&[None, Some(3), None, Some(3)]) {
///     Ok(arity) => arity,
///     Err(_) => None,
/// };
/// assert_eq!(ARITY, Some(3));
///
/// assert_eq!(
///     resolve_arity(&[None, Some(3), Some(2)]),
///     Err(ShapeError::ArityMismatch { position: 2, expected: 3, found: 2 })
/// );
/// ```
pub const fn resolve_arity(arities: &[Option<usize>]) -> ShapeResult<Option<usize>> {
    if arities.is_empty() {
        return Err(ShapeError::no_operands());
    }
    let mut resolved: Option<usize> = None;
    let mut position = 0;
    while position < arities.len() {
        if let Some(found) = arities[position] {
            match resolved {
                None => resolved = Some(found),
                Some(expected) if expected != found => {
                    return Err(ShapeError::arity_mismatch(position, expected, found));
                }
                Some(_) => {}
            }
        }
        position += 1;
    }
    Ok(resolved)
}

/// How an operand takes part in a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Used whole by every call
    Scalar,
    /// Exclusive reference reborrowed by every call
    Lent,
    /// Contributes one element per call
    Elementwise(usize),
}

/// What one call receives from one operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Element `i` of an elementwise operand
    Element(usize),
    /// A clone of a scalar operand
    Copy,
    /// The scalar operand itself
    Move,
    /// A reborrow of an exclusive reference, returned after the call
    Lend,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Element(_) => write!(f, "elem"),
            Step::Copy => write!(f, "copy"),
            Step::Move => write!(f, "move"),
            Step::Lend => write!(f, "lend"),
        }
    }
}

/// A resolved broadcast call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Plan {
    roles: Vec<Role>,
    arity: Option<usize>,
}

impl Plan {
    /// Build the plan for operands with the given arities.
    pub fn resolve(arities: &[Option<usize>]) -> ShapeResult<Plan> {
        let arity = resolve_arity(arities)?;
        let roles = arities
            .iter()
            .map(|a| match a {
                Some(n) => Role::Elementwise(*n),
                None => Role::Scalar,
            })
            .collect();
        Ok(Plan { roles, arity })
    }

    /// Build the plan for an argument tuple type.
    ///
    /// ```
    /// use invoke_forall::{Plan, Protected};
    ///
    /// let plan = Plan::of::<(fn(i32, i32) -> i32, i32, [i32; 4])>().unwrap();
    /// assert_eq!(plan.arity(), Some(4));
    /// assert_eq!(plan.copies(), 6);
    ///
    /// let plan = Plan::of::<(Protected<[i32; 2]>, u8)>().unwrap();
    /// assert!(!plan.is_broadcast());
    ///
    /// let plan = Plan::of::<(fn(i32) -> i32, &mut String, [i32; 3])>().unwrap();
    /// assert_eq!(plan.copies(), 2);
    /// ```
    pub fn of<A: Arguments>() -> ShapeResult<Plan> {
        Ok(Self::resolve(A::ARITIES)?.lending(A::LENT))
    }

    /// Mark the scalar operands flagged in `lent` as lent.
    ///
    /// Elementwise operands and positions past the end of `lent` are left
    /// as they are.
    pub fn lending(mut self, lent: &[bool]) -> Plan {
        for (role, &lent) in self.roles.iter_mut().zip(lent) {
            if lent && *role == Role::Scalar {
                *role = Role::Lent;
            }
        }
        self
    }

    /// `None` for a single call, `Some(n)` for a broadcast over `n` lanes.
    pub fn arity(&self) -> Option<usize> {
        self.arity
    }

    /// Whether some operand is elementwise, so the result is an aggregate.
    pub fn is_broadcast(&self) -> bool {
        self.arity.is_some()
    }

    /// Number of times the operation is called.
    pub fn calls(&self) -> usize {
        self.arity.unwrap_or(1)
    }

    /// Role of each operand, the operation first.
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// What each call receives from the operand at `position`, in call order.
    ///
    /// Scalars follow the move-once schedule: every call but the last gets a
    /// copy, the last gets the value itself. A lent reference is reborrowed
    /// for each call of a broadcast over two or more lanes and moved
    /// otherwise.
    pub fn schedule(&self, position: usize) -> Option<Vec<Step>> {
        let role = self.roles.get(position)?;
        let steps = match (role, self.arity) {
            (Role::Elementwise(n), _) => (0..*n).map(Step::Element).collect(),
            (Role::Lent, Some(n)) if n >= 2 => vec![Step::Lend; n],
            (Role::Scalar | Role::Lent, None) => vec![Step::Move],
            (Role::Scalar | Role::Lent, Some(0)) => Vec::new(),
            (Role::Lent, Some(_)) => vec![Step::Move],
            (Role::Scalar, Some(n)) => {
                let mut steps = vec![Step::Copy; n - 1];
                steps.push(Step::Move);
                steps
            }
        };
        Some(steps)
    }

    /// Total number of clones made across all scalar operands.
    pub fn copies(&self) -> usize {
        let per_scalar = match self.arity {
            Some(n) if n >= 2 => n - 1,
            _ => 0,
        };
        let scalars = self
            .roles
            .iter()
            .filter(|role| matches!(role, Role::Scalar))
            .count();
        scalars * per_scalar
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.arity {
            None => write!(f, "single call")?,
            Some(1) => write!(f, "broadcast over 1 lane")?,
            Some(n) => write!(f, "broadcast over {n} lanes")?,
        }
        for (position, role) in self.roles.iter().enumerate() {
            match role {
                Role::Scalar => write!(f, "\n  #{position} scalar")?,
                Role::Lent => write!(f, "\n  #{position} lent")?,
                Role::Elementwise(n) => write!(f, "\n  #{position} lanes({n})")?,
            }
            for step in self.schedule(position).unwrap_or_default() {
                write!(f, " {step}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── resolve_arity ──

    #[test]
    fn test_resolve_empty() {
        assert_eq!(resolve_arity(&[]), Err(ShapeError::NoOperands));
    }

    #[test]
    fn test_resolve_all_scalar() {
        assert_eq!(resolve_arity(&[None, None, None]), Ok(None));
    }

    #[test]
    fn test_resolve_elementwise_anywhere() {
        assert_eq!(resolve_arity(&[Some(2), None]), Ok(Some(2)));
        assert_eq!(resolve_arity(&[None, None, Some(0)]), Ok(Some(0)));
    }

    #[test]
    fn test_resolve_mismatch_reports_first_offender() {
        assert_eq!(
            resolve_arity(&[None, Some(3), None, Some(4), Some(5)]),
            Err(ShapeError::arity_mismatch(3, 3, 4))
        );
    }

    // ── plan queries ──

    #[test]
    fn test_plan_roles() {
        let plan = Plan::resolve(&[None, Some(2), None]).unwrap();
        assert_eq!(
            plan.roles(),
            &[Role::Scalar, Role::Elementwise(2), Role::Scalar]
        );
        assert_eq!(plan.calls(), 2);
        assert!(plan.is_broadcast());
    }

    #[test]
    fn test_schedule_move_once() {
        let plan = Plan::resolve(&[None, Some(3)]).unwrap();
        assert_eq!(
            plan.schedule(0),
            Some(vec![Step::Copy, Step::Copy, Step::Move])
        );
        assert_eq!(
            plan.schedule(1),
            Some(vec![Step::Element(0), Step::Element(1), Step::Element(2)])
        );
        assert_eq!(plan.schedule(2), None);
        assert_eq!(plan.copies(), 2);
    }

    #[test]
    fn test_schedule_single_call() {
        let plan = Plan::resolve(&[None, None]).unwrap();
        assert_eq!(plan.calls(), 1);
        assert_eq!(plan.schedule(1), Some(vec![Step::Move]));
        assert_eq!(plan.copies(), 0);
    }

    #[test]
    fn test_schedule_zero_lanes() {
        let plan = Plan::resolve(&[None, Some(0)]).unwrap();
        assert_eq!(plan.calls(), 0);
        assert_eq!(plan.schedule(0), Some(Vec::new()));
        assert_eq!(plan.copies(), 0);
    }

    #[test]
    fn test_schedule_lent() {
        let plan = Plan::resolve(&[None, None, Some(3)])
            .unwrap()
            .lending(&[false, true, false]);
        assert_eq!(plan.roles()[1], Role::Lent);
        assert_eq!(plan.schedule(1), Some(vec![Step::Lend; 3]));
        assert_eq!(plan.copies(), 2);
    }

    #[test]
    fn test_lent_single_call_moves() {
        let plan = Plan::resolve(&[None, None]).unwrap().lending(&[false, true]);
        assert_eq!(plan.schedule(1), Some(vec![Step::Move]));

        let plan = Plan::resolve(&[None, Some(1)]).unwrap().lending(&[true]);
        assert_eq!(plan.schedule(0), Some(vec![Step::Move]));

        let plan = Plan::resolve(&[None, Some(0)]).unwrap().lending(&[true]);
        assert_eq!(plan.schedule(0), Some(Vec::new()));
    }

    #[test]
    fn test_lending_keeps_elementwise() {
        let plan = Plan::resolve(&[Some(2), None]).unwrap().lending(&[true, true, true]);
        assert_eq!(plan.roles(), &[Role::Elementwise(2), Role::Lent]);
    }

    // ── rendering ──

    #[test]
    fn test_display_broadcast() {
        let plan = Plan::resolve(&[None, Some(3), None]).unwrap();
        insta::assert_snapshot!(plan.to_string(), @r"
        broadcast over 3 lanes
          #0 scalar copy copy move
          #1 lanes(3) elem elem elem
          #2 scalar copy copy move
        ");
    }

    #[test]
    fn test_display_lent() {
        let plan = Plan::resolve(&[None, None, Some(2)])
            .unwrap()
            .lending(&[false, true, false]);
        insta::assert_snapshot!(plan.to_string(), @r"
        broadcast over 2 lanes
          #0 scalar copy move
          #1 lent lend lend
          #2 lanes(2) elem elem
        ");
    }

    #[test]
    fn test_display_single_call() {
        let plan = Plan::resolve(&[None, None]).unwrap();
        insta::assert_snapshot!(plan.to_string(), @r"
        single call
          #0 scalar move
          #1 scalar move
        ");
    }

    #[test]
    fn test_display_one_lane() {
        let plan = Plan::resolve(&[Some(1)]).unwrap();
        assert_eq!(plan.to_string(), "broadcast over 1 lane\n  #0 lanes(1) elem");
    }
}
