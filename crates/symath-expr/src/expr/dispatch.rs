//! Binary operations on [`Expression`]: validation, dimension rules,
//! promotion to polynomial entries, and concretization of the result.

use crate::expr::constraint::{
    ComparisonSense, Constraint, MatrixConstraint, ScalarConstraint, VectorConstraint,
};
use crate::expr::container::{Matrix, Vector};
use crate::expr::core::{Expression, MatrixExpr, ScalarExpr, VectorExpr, each_variant};
use crate::expr::element::Element;
use crate::expr::error::{ExprError, Operation};
use crate::expr::monomial::Monomial;
use crate::expr::polynomial::Polynomial;
use crate::expr::scalar::{Constant, Variable};
use crate::expr::shape::Dims;

impl Expression {
    /// Entrywise sum. Dims must match unless one side is a scalar, which
    /// is broadcast.
    pub fn plus(&self, right: impl Into<Expression>) -> Result<Expression, ExprError> {
        let right = right.into();
        finish(
            Operation::Plus,
            add(self, &right, Operation::Plus),
            Expression::dims,
        )
    }

    /// `self + (-1)·right`, with the same dimension rules as [`plus`](Self::plus).
    pub fn minus(&self, right: impl Into<Expression>) -> Result<Expression, ExprError> {
        let right = right.into();
        finish(
            Operation::Minus,
            add(self, &right, Operation::Minus),
            Expression::dims,
        )
    }

    /// Scalar broadcast, or matrix product when both sides are containers.
    pub fn multiply(&self, right: impl Into<Expression>) -> Result<Expression, ExprError> {
        let right = right.into();
        finish(
            Operation::Multiply,
            product(self, &right),
            Expression::dims,
        )
    }

    pub fn transpose(&self) -> Result<Expression, ExprError> {
        self.check()?;
        Ok(match self {
            Expression::Scalar(s) => Expression::Scalar(s.clone()),
            Expression::Vector(v) => {
                each_variant!(VectorExpr, v, inner => Expression::from_matrix(inner.transpose()))
            }
            Expression::Matrix(m) => m.transpose()?,
        })
    }

    /// Build a constraint `self <sense> right`.
    ///
    /// A scalar on either side is broadcast to the other side's dims with
    /// its kind preserved. Two containers must have identical dims.
    pub fn comparison(
        &self,
        right: impl Into<Expression>,
        sense: ComparisonSense,
    ) -> Result<Constraint, ExprError> {
        let right = right.into();
        finish(
            Operation::Comparison,
            compare(self, &right, sense),
            Constraint::dims,
        )
    }

    pub fn less_eq(&self, right: impl Into<Expression>) -> Result<Constraint, ExprError> {
        self.comparison(right, ComparisonSense::LessEqual)
    }

    pub fn greater_eq(&self, right: impl Into<Expression>) -> Result<Constraint, ExprError> {
        self.comparison(right, ComparisonSense::GreaterEqual)
    }

    pub fn equal(&self, right: impl Into<Expression>) -> Result<Constraint, ExprError> {
        self.comparison(right, ComparisonSense::Equal)
    }
}

// ── Algebra on concrete types ───────────────────────────────

/// Expression operations available directly on every concrete type.
///
/// ```
/// use symath_expr::{Algebra, Variable};
///
/// let x = Variable::new();
/// let sum = x.plus(2.0).expect("scalars always combine");
/// assert_eq!(sum.degree(), 1);
/// ```
pub trait Algebra: Clone + Into<Expression> {
    fn to_expression(&self) -> Expression {
        self.clone().into()
    }

    fn plus(&self, right: impl Into<Expression>) -> Result<Expression, ExprError> {
        self.to_expression().plus(right)
    }

    fn minus(&self, right: impl Into<Expression>) -> Result<Expression, ExprError> {
        self.to_expression().minus(right)
    }

    fn multiply(&self, right: impl Into<Expression>) -> Result<Expression, ExprError> {
        self.to_expression().multiply(right)
    }

    fn comparison(
        &self,
        right: impl Into<Expression>,
        sense: ComparisonSense,
    ) -> Result<Constraint, ExprError> {
        self.to_expression().comparison(right, sense)
    }

    fn less_eq(&self, right: impl Into<Expression>) -> Result<Constraint, ExprError> {
        self.comparison(right, ComparisonSense::LessEqual)
    }

    fn greater_eq(&self, right: impl Into<Expression>) -> Result<Constraint, ExprError> {
        self.comparison(right, ComparisonSense::GreaterEqual)
    }

    fn equal(&self, right: impl Into<Expression>) -> Result<Constraint, ExprError> {
        self.comparison(right, ComparisonSense::Equal)
    }
}

impl Algebra for Constant {}
impl Algebra for Variable {}
impl Algebra for Monomial {}
impl Algebra for Polynomial {}
impl Algebra for ScalarExpr {}
impl Algebra for VectorExpr {}
impl Algebra for MatrixExpr {}
impl<T: Element> Algebra for Vector<T> {}
impl<T: Element> Algebra for Matrix<T> {}

// ── Internals ───────────────────────────────────────────────

/// Log the outcome of `operation` and pass the result through.
pub(crate) fn finish<T>(
    operation: Operation,
    result: Result<T, ExprError>,
    dims: impl FnOnce(&T) -> Dims,
) -> Result<T, ExprError> {
    match &result {
        Ok(value) => tracing::trace!(
            component = "expr",
            operation = operation.as_str(),
            status = "success",
            result_dims = %dims(value),
            "Combined expressions"
        ),
        Err(err) => tracing::debug!(
            component = "expr",
            operation = operation.as_str(),
            status = "error",
            code = err.code(),
            error = %err,
            "Expression operation failed"
        ),
    }
    result
}

fn check_both(left: &Expression, right: &Expression) -> Result<(), ExprError> {
    left.check()?;
    right.check()
}

fn add(left: &Expression, right: &Expression, operation: Operation) -> Result<Expression, ExprError> {
    check_both(left, right)?;
    let (left_dims, right_dims) = (left.dims(), right.dims());
    if !left.is_scalar() && !right.is_scalar() && left_dims != right_dims {
        return Err(ExprError::Dimension {
            operation,
            left: left_dims,
            right: right_dims,
        });
    }
    Ok(match operation {
        Operation::Minus => combine(left, right, |a, b| a.added(&b.scaled(-1.0))),
        _ => combine(left, right, Polynomial::added),
    })
}

/// Errors when a result of total degree `degree` could not be represented.
pub(crate) fn degree_fits(degree: Option<u32>) -> Result<(), ExprError> {
    degree.map(|_| ()).ok_or(ExprError::ExponentOverflow)
}

fn product(left: &Expression, right: &Expression) -> Result<Expression, ExprError> {
    check_both(left, right)?;
    degree_fits(left.degree().checked_add(right.degree()))?;
    if left.is_scalar() || right.is_scalar() {
        return Ok(combine(left, right, Polynomial::multiplied));
    }
    let (left_dims, right_dims) = (left.dims(), right.dims());
    if left_dims.cols != right_dims.rows {
        return Err(ExprError::Dimension {
            operation: Operation::Multiply,
            left: left_dims,
            right: right_dims,
        });
    }
    let rows = matrix_product(
        &left.to_polynomial_rows(),
        &right.to_polynomial_rows(),
        right_dims.cols,
    );
    Ok(Expression::from_polynomial_rows(rows))
}

/// Apply `f` entrywise, broadcasting a scalar operand.
fn combine(
    left: &Expression,
    right: &Expression,
    f: impl Fn(&Polynomial, &Polynomial) -> Polynomial,
) -> Expression {
    let rows: Vec<Vec<Polynomial>> = match (left, right) {
        (Expression::Scalar(l), _) => {
            let l = l.to_polynomial();
            map_rows(right.to_polynomial_rows(), |r| f(&l, r))
        }
        (_, Expression::Scalar(r)) => {
            let r = r.to_polynomial();
            map_rows(left.to_polynomial_rows(), |l| f(l, &r))
        }
        _ => left
            .to_polynomial_rows()
            .iter()
            .zip(right.to_polynomial_rows().iter())
            .map(|(l_row, r_row)| l_row.iter().zip(r_row).map(|(l, r)| f(l, r)).collect())
            .collect(),
    };
    Expression::from_polynomial_rows(rows)
}

fn map_rows(
    rows: Vec<Vec<Polynomial>>,
    f: impl Fn(&Polynomial) -> Polynomial,
) -> Vec<Vec<Polynomial>> {
    rows.iter()
        .map(|row| row.iter().map(&f).collect())
        .collect()
}

/// `out[i][j] = Σ_k left[i][k] · right[k][j]`. Operands are checked.
pub(crate) fn matrix_product(
    left: &[Vec<Polynomial>],
    right: &[Vec<Polynomial>],
    cols: usize,
) -> Vec<Vec<Polynomial>> {
    left.iter()
        .map(|row| {
            (0..cols)
                .map(|j| {
                    Polynomial::sum(
                        row.iter()
                            .zip(right)
                            .map(|(l, r_row)| l.multiplied(&r_row[j])),
                    )
                })
                .collect()
        })
        .collect()
}

fn compare(
    left: &Expression,
    right: &Expression,
    sense: ComparisonSense,
) -> Result<Constraint, ExprError> {
    check_both(left, right)?;
    let mismatch = || ExprError::Dimension {
        operation: Operation::Comparison,
        left: left.dims(),
        right: right.dims(),
    };
    let constraint = match (left, right) {
        (Expression::Scalar(l), Expression::Scalar(r)) => {
            Constraint::Scalar(ScalarConstraint::new(l.clone(), r.clone(), sense))
        }
        (Expression::Vector(l), Expression::Scalar(r)) => Constraint::Vector(
            VectorConstraint::new(l.clone(), r.fill_vector(l.len()), sense),
        ),
        (Expression::Scalar(l), Expression::Vector(r)) => Constraint::Vector(
            VectorConstraint::new(l.fill_vector(r.len()), r.clone(), sense),
        ),
        (Expression::Matrix(l), Expression::Scalar(r)) => Constraint::Matrix(
            MatrixConstraint::new(l.clone(), r.fill_matrix(l.dims()), sense),
        ),
        (Expression::Scalar(l), Expression::Matrix(r)) => Constraint::Matrix(
            MatrixConstraint::new(l.fill_matrix(r.dims()), r.clone(), sense),
        ),
        _ if left.dims() != right.dims() => return Err(mismatch()),
        (Expression::Vector(l), Expression::Vector(r)) => {
            Constraint::Vector(VectorConstraint::new(l.clone(), r.clone(), sense))
        }
        (Expression::Matrix(l), Expression::Matrix(r)) => {
            Constraint::Matrix(MatrixConstraint::new(l.clone(), r.clone(), sense))
        }
        (Expression::Vector(l), Expression::Matrix(r)) => {
            Constraint::Matrix(MatrixConstraint::new(l.to_column(), r.clone(), sense))
        }
        (Expression::Matrix(l), Expression::Vector(r)) => {
            Constraint::Matrix(MatrixConstraint::new(l.clone(), r.to_column(), sense))
        }
    };
    Ok(constraint)
}
