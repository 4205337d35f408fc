//! Bridge between expressions and `nalgebra` dense values.
//!
//! Dense vectors and matrices enter the algebra only through the explicit
//! `From` conversions below, as constant containers.

use crate::expr::container::{ConstantMatrix, ConstantVector, Matrix, Vector};
use crate::expr::core::{Expression, MatrixExpr, VectorExpr};
use crate::expr::error::ExprError;
use crate::expr::scalar::Constant;
use crate::expr::shape::Dims;
use nalgebra::{DMatrix, DVector};

/// Numeric output of [`Expression::constant`] and
/// [`Expression::linear_coeff`], shaped like the query it answers.
#[derive(Debug, Clone, PartialEq)]
pub enum DenseValue {
    Scalar(f64),
    Vector(DVector<f64>),
    Matrix(DMatrix<f64>),
}

impl DenseValue {
    pub fn dims(&self) -> Dims {
        match self {
            DenseValue::Scalar(_) => Dims::SCALAR,
            DenseValue::Vector(v) => Dims::new(v.len(), 1),
            DenseValue::Matrix(m) => Dims::new(m.nrows(), m.ncols()),
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            DenseValue::Scalar(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&DVector<f64>> {
        match self {
            DenseValue::Vector(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_matrix(&self) -> Option<&DMatrix<f64>> {
        match self {
            DenseValue::Matrix(m) => Some(m),
            _ => None,
        }
    }

    /// Widen to a matrix: scalars become `1×1`, vectors a single column.
    pub fn into_matrix(self) -> DMatrix<f64> {
        match self {
            DenseValue::Scalar(value) => DMatrix::from_element(1, 1, value),
            DenseValue::Vector(v) => {
                let len = v.len();
                DMatrix::from_iterator(len, 1, v.iter().copied())
            }
            DenseValue::Matrix(m) => m,
        }
    }
}

impl ConstantVector {
    pub fn to_dense(&self) -> DVector<f64> {
        self.constant()
    }
}

impl ConstantMatrix {
    /// Dense copy; fails on an empty or ragged matrix.
    pub fn to_dense(&self) -> Result<DMatrix<f64>, ExprError> {
        self.constant()
    }

    /// `n × n` identity.
    pub fn identity(n: usize) -> Self {
        DMatrix::<f64>::identity(n, n).into()
    }
}

impl From<DVector<f64>> for ConstantVector {
    fn from(values: DVector<f64>) -> Self {
        Vector::new(values.iter().copied().map(Constant).collect())
    }
}

impl From<&DVector<f64>> for ConstantVector {
    fn from(values: &DVector<f64>) -> Self {
        Vector::new(values.iter().copied().map(Constant).collect())
    }
}

impl From<DMatrix<f64>> for ConstantMatrix {
    fn from(values: DMatrix<f64>) -> Self {
        ConstantMatrix::from(&values)
    }
}

impl From<&DMatrix<f64>> for ConstantMatrix {
    fn from(values: &DMatrix<f64>) -> Self {
        Matrix::from_rows(
            values
                .row_iter()
                .map(|row| row.iter().copied().map(Constant).collect())
                .collect(),
        )
    }
}

impl From<DVector<f64>> for VectorExpr {
    fn from(values: DVector<f64>) -> Self {
        VectorExpr::Constant(values.into())
    }
}

impl From<DMatrix<f64>> for MatrixExpr {
    fn from(values: DMatrix<f64>) -> Self {
        MatrixExpr::Constant(values.into())
    }
}

impl From<DVector<f64>> for Expression {
    fn from(values: DVector<f64>) -> Self {
        Expression::Vector(values.into())
    }
}

impl From<DMatrix<f64>> for Expression {
    fn from(values: DMatrix<f64>) -> Self {
        Expression::Matrix(values.into())
    }
}
