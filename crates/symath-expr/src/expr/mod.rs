//! Expression types for optimization modeling.
//!
//! - `scalar`: Constant and Variable atoms
//! - `monomial`: coefficient times variable powers
//! - `polynomial`: sums of monomials with like-term merging
//! - `container`: Vector and Matrix over any element kind
//! - `core`: Expression sum types, shape and kind queries
//! - `dispatch`: plus, minus, multiply, transpose, comparison
//! - `constraint`: constraints with a comparison sense
//! - `calculus`: derivatives, substitution, powers
//! - `stack`: horizontal and vertical concatenation
//! - `dense`: nalgebra conversions
//! - `pretty`: ASCII formatting
//! - `error`: validation and operation errors

pub mod calculus;
pub mod constraint;
pub mod container;
pub mod core;
pub mod dense;
pub mod dispatch;
pub mod element;
pub mod error;
pub mod monomial;
pub mod polynomial;
pub mod pretty;
pub mod scalar;
pub mod shape;
pub mod stack;

pub use constraint::{
    ComparisonSense, Constraint, MatrixConstraint, ScalarConstraint, VectorConstraint,
};
pub use container::{
    ConstantMatrix, ConstantVector, Matrix, MonomialMatrix, MonomialVector, PolynomialMatrix,
    PolynomialVector, VariableMatrix, VariableVector, Vector,
};
pub use core::{Expression, MatrixExpr, ScalarExpr, VectorExpr};
pub use dense::DenseValue;
pub use dispatch::Algebra;
pub use element::Element;
pub use error::{ContainerKind, ExprError, Location, MissingTarget, Operation};
pub use monomial::Monomial;
pub use polynomial::Polynomial;
pub use pretty::PrettyOptions;
pub use scalar::{Constant, Variable};
pub use shape::{Dims, Kind};
pub use stack::{hstack, vstack};
