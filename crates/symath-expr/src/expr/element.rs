//! The [`Element`] trait shared by everything a container can hold.

use crate::expr::container::{Matrix, Vector};
use crate::expr::core::{MatrixExpr, ScalarExpr, VectorExpr};
use crate::expr::error::{ContainerKind, ExprError};
use crate::expr::monomial::Monomial;
use crate::expr::polynomial::Polynomial;
use crate::expr::scalar::{Constant, Variable};
use crate::expr::shape::Kind;

mod sealed {
    pub trait Sealed {}

    impl Sealed for crate::expr::scalar::Constant {}
    impl Sealed for crate::expr::scalar::Variable {}
    impl Sealed for crate::expr::monomial::Monomial {}
    impl Sealed for crate::expr::polynomial::Polynomial {}
}

/// A scalar kind that vectors and matrices can be built from.
///
/// Implemented for [`Constant`], [`Variable`], [`Monomial`] and
/// [`Polynomial`] only.
pub trait Element:
    sealed::Sealed + Clone + PartialEq + std::fmt::Debug + std::fmt::Display
{
    const KIND: Kind;
    const VECTOR: ContainerKind;
    const MATRIX: ContainerKind;

    fn check(&self) -> Result<(), ExprError>;
    fn variables(&self) -> Vec<Variable>;
    fn degree(&self) -> u32;
    fn constant(&self) -> f64;
    fn to_polynomial(&self) -> Polynomial;

    /// Convert a scalar of equal or lower kind into this element type.
    fn from_scalar(scalar: ScalarExpr) -> Option<Self>;
    fn into_scalar(self) -> ScalarExpr;
    fn wrap_vector(vector: Vector<Self>) -> VectorExpr;
    fn wrap_matrix(matrix: Matrix<Self>) -> MatrixExpr;
}

impl Element for Constant {
    const KIND: Kind = Kind::Constant;
    const VECTOR: ContainerKind = ContainerKind::ConstantVector;
    const MATRIX: ContainerKind = ContainerKind::ConstantMatrix;

    fn check(&self) -> Result<(), ExprError> {
        Ok(())
    }

    fn variables(&self) -> Vec<Variable> {
        Vec::new()
    }

    fn degree(&self) -> u32 {
        0
    }

    fn constant(&self) -> f64 {
        self.0
    }

    fn to_polynomial(&self) -> Polynomial {
        Constant::to_polynomial(*self)
    }

    fn from_scalar(scalar: ScalarExpr) -> Option<Self> {
        match scalar {
            ScalarExpr::Constant(c) => Some(c),
            _ => None,
        }
    }

    fn into_scalar(self) -> ScalarExpr {
        ScalarExpr::Constant(self)
    }

    fn wrap_vector(vector: Vector<Self>) -> VectorExpr {
        VectorExpr::Constant(vector)
    }

    fn wrap_matrix(matrix: Matrix<Self>) -> MatrixExpr {
        MatrixExpr::Constant(matrix)
    }
}

impl Element for Variable {
    const KIND: Kind = Kind::Variable;
    const VECTOR: ContainerKind = ContainerKind::VariableVector;
    const MATRIX: ContainerKind = ContainerKind::VariableMatrix;

    fn check(&self) -> Result<(), ExprError> {
        Ok(())
    }

    fn variables(&self) -> Vec<Variable> {
        vec![*self]
    }

    fn degree(&self) -> u32 {
        1
    }

    fn constant(&self) -> f64 {
        0.0
    }

    fn to_polynomial(&self) -> Polynomial {
        Variable::to_polynomial(*self)
    }

    fn from_scalar(scalar: ScalarExpr) -> Option<Self> {
        match scalar {
            ScalarExpr::Variable(v) => Some(v),
            _ => None,
        }
    }

    fn into_scalar(self) -> ScalarExpr {
        ScalarExpr::Variable(self)
    }

    fn wrap_vector(vector: Vector<Self>) -> VectorExpr {
        VectorExpr::Variable(vector)
    }

    fn wrap_matrix(matrix: Matrix<Self>) -> MatrixExpr {
        MatrixExpr::Variable(matrix)
    }
}

impl Element for Monomial {
    const KIND: Kind = Kind::Monomial;
    const VECTOR: ContainerKind = ContainerKind::MonomialVector;
    const MATRIX: ContainerKind = ContainerKind::MonomialMatrix;

    fn check(&self) -> Result<(), ExprError> {
        Monomial::check(self)
    }

    fn variables(&self) -> Vec<Variable> {
        Monomial::variables(self)
    }

    fn degree(&self) -> u32 {
        Monomial::degree(self)
    }

    fn constant(&self) -> f64 {
        if self.is_constant() {
            self.coefficient
        } else {
            0.0
        }
    }

    fn to_polynomial(&self) -> Polynomial {
        Monomial::to_polynomial(self)
    }

    fn from_scalar(scalar: ScalarExpr) -> Option<Self> {
        match scalar {
            ScalarExpr::Constant(c) => Some(c.to_monomial()),
            ScalarExpr::Variable(v) => Some(v.to_monomial()),
            ScalarExpr::Monomial(m) => Some(m),
            ScalarExpr::Polynomial(mut p) if p.terms.len() == 1 => p.terms.pop(),
            ScalarExpr::Polynomial(_) => None,
        }
    }

    fn into_scalar(self) -> ScalarExpr {
        ScalarExpr::Monomial(self)
    }

    fn wrap_vector(vector: Vector<Self>) -> VectorExpr {
        VectorExpr::Monomial(vector)
    }

    fn wrap_matrix(matrix: Matrix<Self>) -> MatrixExpr {
        MatrixExpr::Monomial(matrix)
    }
}

impl Element for Polynomial {
    const KIND: Kind = Kind::Polynomial;
    const VECTOR: ContainerKind = ContainerKind::PolynomialVector;
    const MATRIX: ContainerKind = ContainerKind::PolynomialMatrix;

    fn check(&self) -> Result<(), ExprError> {
        Polynomial::check(self)
    }

    fn variables(&self) -> Vec<Variable> {
        Polynomial::variables(self)
    }

    fn degree(&self) -> u32 {
        Polynomial::degree(self)
    }

    fn constant(&self) -> f64 {
        Polynomial::constant(self)
    }

    fn to_polynomial(&self) -> Polynomial {
        self.clone()
    }

    fn from_scalar(scalar: ScalarExpr) -> Option<Self> {
        Some(scalar.to_polynomial())
    }

    fn into_scalar(self) -> ScalarExpr {
        ScalarExpr::Polynomial(self)
    }

    fn wrap_vector(vector: Vector<Self>) -> VectorExpr {
        VectorExpr::Polynomial(vector)
    }

    fn wrap_matrix(matrix: Matrix<Self>) -> MatrixExpr {
        MatrixExpr::Polynomial(matrix)
    }
}
