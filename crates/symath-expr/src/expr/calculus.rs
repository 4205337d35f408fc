//! Derivatives, substitution and integer powers.

use crate::expr::container::ConstantMatrix;
use crate::expr::core::Expression;
use crate::expr::dispatch::{degree_fits, finish, matrix_product};
use crate::expr::error::{ExprError, Operation};
use crate::expr::polynomial::Polynomial;
use crate::expr::scalar::Variable;

impl Expression {
    /// First-order derivative with respect to `v`, entrywise.
    pub fn derivative_wrt(&self, v: Variable) -> Result<Expression, ExprError> {
        self.check()?;
        Ok(Expression::from_polynomial_rows(map_entries(
            self.to_polynomial_rows(),
            |p| p.derivative_wrt(v),
        )))
    }

    /// Replace every occurrence of `v` with the scalar `replacement`.
    pub fn substitute(
        &self,
        v: Variable,
        replacement: impl Into<Expression>,
    ) -> Result<Expression, ExprError> {
        let replacement = replacement.into();
        finish(
            Operation::Substitute,
            substitute(self, v, &replacement),
            Expression::dims,
        )
    }

    /// `self` multiplied by itself `exponent` times.
    ///
    /// Scalars give `1` for a zero exponent and square matrices the
    /// identity. Vectors and non-square matrices are rejected.
    pub fn power(&self, exponent: u32) -> Result<Expression, ExprError> {
        finish(Operation::Power, power(self, exponent), Expression::dims)
    }
}

fn map_entries(
    rows: Vec<Vec<Polynomial>>,
    f: impl Fn(&Polynomial) -> Polynomial,
) -> Vec<Vec<Polynomial>> {
    rows.iter()
        .map(|row| row.iter().map(&f).collect())
        .collect()
}

fn substitute(
    expression: &Expression,
    v: Variable,
    replacement: &Expression,
) -> Result<Expression, ExprError> {
    expression.check()?;
    replacement.check()?;
    let Expression::Scalar(scalar) = replacement else {
        return Err(ExprError::UnsupportedOperand {
            operation: Operation::Substitute,
            operand: replacement.shape_name().to_string(),
        });
    };
    degree_fits(expression.degree().checked_mul(scalar.degree().max(1)))?;
    let replacement = scalar.to_polynomial();
    Ok(Expression::from_polynomial_rows(map_entries(
        expression.to_polynomial_rows(),
        |p| p.substitute(v, &replacement),
    )))
}

fn power(expression: &Expression, exponent: u32) -> Result<Expression, ExprError> {
    expression.check()?;
    degree_fits(expression.degree().checked_mul(exponent))?;
    match expression {
        Expression::Scalar(s) => Ok(Expression::from_polynomial_rows(vec![vec![
            s.to_polynomial().power(exponent),
        ]])),
        Expression::Vector(_) => Err(ExprError::UnsupportedOperand {
            operation: Operation::Power,
            operand: expression.shape_name().to_string(),
        }),
        Expression::Matrix(m) => {
            let dims = m.dims();
            if !dims.is_square() {
                return Err(ExprError::Dimension {
                    operation: Operation::Power,
                    left: dims,
                    right: dims,
                });
            }
            if exponent == 0 {
                return Ok(Expression::from_matrix(ConstantMatrix::identity(dims.rows)));
            }
            let base = m.to_polynomial_rows();
            let mut result = base.clone();
            for _ in 1..exponent {
                result = matrix_product(&result, &base, dims.cols);
            }
            Ok(Expression::from_polynomial_rows(result))
        }
    }
}
