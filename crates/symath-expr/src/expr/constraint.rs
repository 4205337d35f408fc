//! Constraints: two same-shaped expressions with a comparison sense.

use crate::expr::core::{Expression, MatrixExpr, ScalarExpr, VectorExpr};
use crate::expr::error::ExprError;
use crate::expr::polynomial::Polynomial;
use crate::expr::scalar::{Variable, unique_variables};
use crate::expr::shape::Dims;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonSense {
    LessEqual,
    GreaterEqual,
    Equal,
}

impl ComparisonSense {
    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonSense::LessEqual => "le",
            ComparisonSense::GreaterEqual => "ge",
            ComparisonSense::Equal => "eq",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonSense::LessEqual => "<=",
            ComparisonSense::GreaterEqual => ">=",
            ComparisonSense::Equal => "==",
        }
    }
}

macro_rules! constraint_type {
    ($(#[$meta:meta])* $name:ident, $side:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            left: $side,
            right: $side,
            sense: ComparisonSense,
        }

        impl $name {
            pub(crate) fn new(left: $side, right: $side, sense: ComparisonSense) -> Self {
                Self { left, right, sense }
            }

            pub fn left(&self) -> &$side {
                &self.left
            }

            pub fn right(&self) -> &$side {
                &self.right
            }

            pub fn sense(&self) -> ComparisonSense {
                self.sense
            }

            pub fn into_parts(self) -> ($side, ComparisonSense, $side) {
                (self.left, self.sense, self.right)
            }

            pub fn dims(&self) -> Dims {
                self.left.dims()
            }

            pub fn check(&self) -> Result<(), ExprError> {
                self.left.check()?;
                self.right.check()
            }

            /// Distinct variables of both sides, sorted by id.
            pub fn variables(&self) -> Vec<Variable> {
                let mut variables = self.left.variables();
                variables.extend(self.right.variables());
                unique_variables(variables)
            }

            pub fn degree(&self) -> u32 {
                self.left.degree().max(self.right.degree())
            }

            pub fn is_linear(&self) -> bool {
                self.degree() <= 1
            }
        }
    };
}

constraint_type!(
    /// Scalar constraint `left <sense> right`.
    ScalarConstraint,
    ScalarExpr
);
constraint_type!(
    /// Entrywise constraint between two vectors of equal length.
    VectorConstraint,
    VectorExpr
);
constraint_type!(
    /// Entrywise constraint between two matrices of equal dims.
    MatrixConstraint,
    MatrixExpr
);

impl ScalarConstraint {
    /// Move everything to the left: `(lhs, sense, rhs)` with `lhs` free of
    /// constant terms and `rhs` the negated constant.
    pub fn standard_form(&self) -> (Polynomial, ComparisonSense, f64) {
        let combined = self
            .left
            .to_polynomial()
            .added(&self.right.to_polynomial().scaled(-1.0));
        (combined.without_constant(), self.sense, -combined.constant())
    }
}

impl VectorConstraint {
    /// Split into one scalar constraint per entry.
    pub fn rows(&self) -> Vec<ScalarConstraint> {
        self.left
            .scalars()
            .into_iter()
            .zip(self.right.scalars())
            .map(|(left, right)| ScalarConstraint::new(left, right, self.sense))
            .collect()
    }
}

/// A constraint of any shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constraint {
    Scalar(ScalarConstraint),
    Vector(VectorConstraint),
    Matrix(MatrixConstraint),
}

impl Constraint {
    pub fn sense(&self) -> ComparisonSense {
        match self {
            Constraint::Scalar(c) => c.sense(),
            Constraint::Vector(c) => c.sense(),
            Constraint::Matrix(c) => c.sense(),
        }
    }

    pub fn dims(&self) -> Dims {
        match self {
            Constraint::Scalar(c) => c.dims(),
            Constraint::Vector(c) => c.dims(),
            Constraint::Matrix(c) => c.dims(),
        }
    }

    pub fn check(&self) -> Result<(), ExprError> {
        match self {
            Constraint::Scalar(c) => c.check(),
            Constraint::Vector(c) => c.check(),
            Constraint::Matrix(c) => c.check(),
        }
    }

    pub fn variables(&self) -> Vec<Variable> {
        match self {
            Constraint::Scalar(c) => c.variables(),
            Constraint::Vector(c) => c.variables(),
            Constraint::Matrix(c) => c.variables(),
        }
    }

    pub fn is_linear(&self) -> bool {
        match self {
            Constraint::Scalar(c) => c.is_linear(),
            Constraint::Vector(c) => c.is_linear(),
            Constraint::Matrix(c) => c.is_linear(),
        }
    }

    /// Both sides widened to [`Expression`].
    pub fn sides(&self) -> (Expression, Expression) {
        match self {
            Constraint::Scalar(c) => (c.left.clone().into(), c.right.clone().into()),
            Constraint::Vector(c) => (c.left.clone().into(), c.right.clone().into()),
            Constraint::Matrix(c) => (c.left.clone().into(), c.right.clone().into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::{ComparisonSense, Constraint};
    use crate::expr::container::{ConstantVector, VariableMatrix, VariableVector};
    use crate::expr::core::{Expression, ScalarExpr};
    use crate::expr::dispatch::Algebra;
    use crate::expr::monomial::Monomial;
    use crate::expr::scalar::{Constant, Variable};
    use crate::expr::shape::Dims;

    #[test]
    fn sense_names() {
        assert_eq!(ComparisonSense::LessEqual.as_str(), "le");
        assert_eq!(ComparisonSense::GreaterEqual.symbol(), ">=");
        assert_eq!(ComparisonSense::Equal.symbol(), "==");
    }

    #[test]
    fn scalar_less_eq_keeps_constant_right_side() {
        let v = Variable::new();
        let Constraint::Scalar(c) = v.less_eq(5.0).expect("scalars compare") else {
            panic!("scalar comparison should give a scalar constraint");
        };
        assert_eq!(c.sense(), ComparisonSense::LessEqual);
        assert_eq!(c.right(), &ScalarExpr::Constant(Constant(5.0)));
        assert_eq!(c.left(), &ScalarExpr::Variable(v));
        assert_eq!(c.variables(), vec![v]);
        assert!(c.is_linear());
    }

    #[test]
    fn standard_form_moves_constants_right() {
        // 2x + 3 <= x + 10  ->  x <= 7
        let x = Variable::new();
        let left = Monomial::new(2.0, vec![x], vec![1])
            .plus(3.0)
            .expect("scalars combine");
        let right = x.plus(10.0).expect("scalars combine");
        let Constraint::Scalar(c) = left.less_eq(right).expect("scalars compare") else {
            panic!("expected scalar constraint");
        };
        let (lhs, sense, rhs) = c.standard_form();
        assert_eq!(lhs.terms, vec![x.to_monomial()]);
        assert_eq!(sense, ComparisonSense::LessEqual);
        assert_eq!(rhs, 7.0);
    }

    #[test]
    fn vector_constraint_splits_into_rows() {
        let v = VariableVector::fresh(3);
        let Constraint::Vector(c) = v.greater_eq(0.0).expect("broadcast") else {
            panic!("expected vector constraint");
        };
        let rows = c.rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].left(), &ScalarExpr::Variable(v.elements[2]));
        assert_eq!(rows[2].sense(), ComparisonSense::GreaterEqual);
    }

    #[test]
    fn rows_pair_entries_of_both_sides() {
        let x = VariableVector::fresh(3);
        let bounds = ConstantVector::new(vec![Constant(1.0), Constant(2.0), Constant(3.0)]);
        let Constraint::Vector(c) = x.less_eq(&bounds).expect("equal lengths") else {
            panic!("expected vector constraint");
        };
        let rows = c.rows();
        assert_eq!(rows.len(), 3);
        for (index, row) in rows.iter().enumerate() {
            assert_eq!(row.left(), &ScalarExpr::Variable(x.elements[index]));
            assert_eq!(row.right(), &ScalarExpr::Constant(bounds.elements[index]));
            assert_eq!(row.sense(), ComparisonSense::LessEqual);
        }
    }

    #[test]
    fn matrix_constraint_reports_dims_and_sides() {
        let m = VariableMatrix::fresh(2, 3);
        let constraint = Expression::from(&m).equal(1.0).expect("broadcast");
        assert_eq!(constraint.dims(), Dims::new(2, 3));
        assert!(constraint.check().is_ok());
        assert_eq!(constraint.variables().len(), 6);
        let (left, right) = constraint.sides();
        assert_eq!(left, Expression::from(m));
        assert_eq!(right.dims(), Dims::new(2, 3));
    }

    #[test]
    fn into_parts_returns_left_sense_right() {
        let x = Variable::new();
        let Constraint::Scalar(c) = x.equal(x).expect("scalars compare") else {
            panic!("expected scalar constraint");
        };
        let (left, sense, right) = c.into_parts();
        assert_eq!(left, right);
        assert_eq!(sense, ComparisonSense::Equal);
    }
}
