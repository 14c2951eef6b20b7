//! Mathematical constraint types for optimization.
//!
//! These types represent the sparse linear rows the model builder emits and
//! the solver adapter consumes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single linear constraint: `sum(coef * x[var]) {>=, <=, =} rhs`.
///
/// Terms are sparse; variables not listed have a zero coefficient.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// `(variable index, coefficient)` pairs.
    pub terms: Vec<(usize, Decimal)>,
    /// Constraint sense (>=, <=, =).
    pub sense: ConstraintSense,
    /// Right-hand side value.
    pub rhs: Decimal,
}

impl Constraint {
    /// Create a >= constraint.
    #[must_use]
    pub const fn geq(terms: Vec<(usize, Decimal)>, rhs: Decimal) -> Self {
        Self {
            terms,
            sense: ConstraintSense::GreaterEqual,
            rhs,
        }
    }

    /// Create a <= constraint.
    #[must_use]
    pub const fn leq(terms: Vec<(usize, Decimal)>, rhs: Decimal) -> Self {
        Self {
            terms,
            sense: ConstraintSense::LessEqual,
            rhs,
        }
    }

    /// Create an = constraint.
    #[must_use]
    pub const fn eq(terms: Vec<(usize, Decimal)>, rhs: Decimal) -> Self {
        Self {
            terms,
            sense: ConstraintSense::Equal,
            rhs,
        }
    }

    /// Unit-coefficient sum over the given variables.
    pub fn unit_terms(vars: impl IntoIterator<Item = usize>) -> Vec<(usize, Decimal)> {
        vars.into_iter().map(|v| (v, Decimal::ONE)).collect()
    }

    /// Evaluate the left-hand side for a value vector.
    #[must_use]
    pub fn lhs(&self, values: &[Decimal]) -> Decimal {
        self.terms
            .iter()
            .map(|(var, coef)| values.get(*var).copied().unwrap_or(Decimal::ZERO) * coef)
            .sum()
    }

    /// Whether the row holds for `values` within `tolerance`.
    #[must_use]
    pub fn is_satisfied(&self, values: &[Decimal], tolerance: Decimal) -> bool {
        let lhs = self.lhs(values);
        match self.sense {
            ConstraintSense::GreaterEqual => lhs >= self.rhs - tolerance,
            ConstraintSense::LessEqual => lhs <= self.rhs + tolerance,
            ConstraintSense::Equal => (lhs - self.rhs).abs() <= tolerance,
        }
    }
}

/// Constraint sense (comparison operator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintSense {
    /// Greater than or equal (>=).
    GreaterEqual,
    /// Less than or equal (<=).
    LessEqual,
    /// Equal (=).
    Equal,
}

/// Bounds on a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableBounds {
    /// Lower bound (None = -infinity).
    pub lower: Option<Decimal>,
    /// Upper bound (None = +infinity).
    pub upper: Option<Decimal>,
}

impl Default for VariableBounds {
    fn default() -> Self {
        Self {
            lower: Some(Decimal::ZERO),
            upper: None,
        }
    }
}

impl VariableBounds {
    /// Binary variable bounds [0, 1].
    #[must_use]
    pub const fn binary() -> Self {
        Self {
            lower: Some(Decimal::ZERO),
            upper: Some(Decimal::ONE),
        }
    }

    /// Variable pinned to a single value.
    #[must_use]
    pub const fn fixed(value: Decimal) -> Self {
        Self {
            lower: Some(value),
            upper: Some(value),
        }
    }
}
