pub mod expr;
pub mod ids;

pub use expr::{
    Algebra, ComparisonSense, Constant, ConstantMatrix, ConstantVector, Constraint, ContainerKind,
    DenseValue, Dims, Element, ExprError, Expression, Kind, Location, Matrix, MatrixConstraint,
    MatrixExpr, MissingTarget, Monomial, MonomialMatrix, MonomialVector, Operation, Polynomial,
    PolynomialMatrix, PolynomialVector, PrettyOptions, ScalarConstraint, ScalarExpr, Variable,
    VariableMatrix, VariableVector, Vector, VectorConstraint, VectorExpr, hstack, vstack,
};
pub use ids::{VariableId, VariableIdGenerator};
