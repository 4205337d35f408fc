//! The closed expression sum types and their shape/kind queries.

use crate::expr::container::{
    ConstantMatrix, ConstantVector, Matrix, MonomialMatrix, MonomialVector, PolynomialMatrix,
    PolynomialVector, VariableMatrix, VariableVector, Vector, resolve_targets,
};
use crate::expr::dense::DenseValue;
use crate::expr::element::Element;
use crate::expr::error::{ExprError, Operation};
use crate::expr::monomial::Monomial;
use crate::expr::polynomial::Polynomial;
use crate::expr::scalar::{Constant, Variable};
use crate::expr::shape::{Dims, Kind};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

/// Run `$body` against the container held by any degree variant of a
/// vector or matrix expression.
macro_rules! each_variant {
    ($ty:ident, $value:expr, $inner:ident => $body:expr) => {
        match $value {
            $ty::Constant($inner) => $body,
            $ty::Variable($inner) => $body,
            $ty::Monomial($inner) => $body,
            $ty::Polynomial($inner) => $body,
        }
    };
}

pub(crate) use each_variant;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScalarExpr {
    Constant(Constant),
    Variable(Variable),
    Monomial(Monomial),
    Polynomial(Polynomial),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VectorExpr {
    Constant(ConstantVector),
    Variable(VariableVector),
    Monomial(MonomialVector),
    Polynomial(PolynomialVector),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatrixExpr {
    Constant(ConstantMatrix),
    Variable(VariableMatrix),
    Monomial(MonomialMatrix),
    Polynomial(PolynomialMatrix),
}

/// Any expression, tagged by shape and then by degree kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Scalar(ScalarExpr),
    Vector(VectorExpr),
    Matrix(MatrixExpr),
}

// ── Scalars ─────────────────────────────────────────────────

impl ScalarExpr {
    /// Least-kind scalar equal to `p`. Expects merged terms.
    pub fn from_polynomial(p: &Polynomial) -> ScalarExpr {
        match p.terms.as_slice() {
            [term] if term.is_constant() => ScalarExpr::Constant(Constant(term.coefficient)),
            [term] => match term.footprint().as_slice() {
                [(v, 1)] if term.coefficient == 1.0 => ScalarExpr::Variable(*v),
                _ => ScalarExpr::Monomial(term.canonical()),
            },
            _ => ScalarExpr::Polynomial(p.clone()),
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            ScalarExpr::Constant(_) => Kind::Constant,
            ScalarExpr::Variable(_) => Kind::Variable,
            ScalarExpr::Monomial(_) => Kind::Monomial,
            ScalarExpr::Polynomial(_) => Kind::Polynomial,
        }
    }

    pub fn check(&self) -> Result<(), ExprError> {
        match self {
            ScalarExpr::Constant(c) => c.check(),
            ScalarExpr::Variable(v) => v.check(),
            ScalarExpr::Monomial(m) => m.check(),
            ScalarExpr::Polynomial(p) => p.check(),
        }
    }

    pub fn dims(&self) -> Dims {
        Dims::SCALAR
    }

    pub fn variables(&self) -> Vec<Variable> {
        match self {
            ScalarExpr::Constant(c) => c.variables(),
            ScalarExpr::Variable(v) => Element::variables(v),
            ScalarExpr::Monomial(m) => m.variables(),
            ScalarExpr::Polynomial(p) => p.variables(),
        }
    }

    pub fn degree(&self) -> u32 {
        match self {
            ScalarExpr::Constant(c) => c.degree(),
            ScalarExpr::Variable(v) => v.degree(),
            ScalarExpr::Monomial(m) => m.degree(),
            ScalarExpr::Polynomial(p) => p.degree(),
        }
    }

    pub fn constant(&self) -> f64 {
        match self {
            ScalarExpr::Constant(c) => c.0,
            ScalarExpr::Variable(v) => Element::constant(v),
            ScalarExpr::Monomial(m) => Element::constant(m),
            ScalarExpr::Polynomial(p) => p.constant(),
        }
    }

    /// Coefficients of `v` for each target. `None` targets the scalar's
    /// own variables.
    pub fn linear_coeff(&self, wrt: Option<&[Variable]>) -> Result<DVector<f64>, ExprError> {
        self.check()?;
        let targets = resolve_targets(wrt, || self.variables())?;
        Ok(self.to_polynomial().linear_coeff(&targets))
    }

    pub fn to_polynomial(&self) -> Polynomial {
        match self {
            ScalarExpr::Constant(c) => c.to_polynomial(),
            ScalarExpr::Variable(v) => v.to_polynomial(),
            ScalarExpr::Monomial(m) => m.to_polynomial(),
            ScalarExpr::Polynomial(p) => p.clone(),
        }
    }

    /// Same scalar repeated `len` times, kind preserved.
    pub fn fill_vector(&self, len: usize) -> VectorExpr {
        match self {
            ScalarExpr::Constant(c) => VectorExpr::Constant(Vector::filled(*c, len)),
            ScalarExpr::Variable(v) => VectorExpr::Variable(Vector::filled(*v, len)),
            ScalarExpr::Monomial(m) => VectorExpr::Monomial(Vector::filled(m.clone(), len)),
            ScalarExpr::Polynomial(p) => VectorExpr::Polynomial(Vector::filled(p.clone(), len)),
        }
    }

    /// Same scalar repeated over `dims`, kind preserved.
    pub fn fill_matrix(&self, dims: Dims) -> MatrixExpr {
        match self {
            ScalarExpr::Constant(c) => MatrixExpr::Constant(Matrix::filled(*c, dims)),
            ScalarExpr::Variable(v) => MatrixExpr::Variable(Matrix::filled(*v, dims)),
            ScalarExpr::Monomial(m) => MatrixExpr::Monomial(Matrix::filled(m.clone(), dims)),
            ScalarExpr::Polynomial(p) => MatrixExpr::Polynomial(Matrix::filled(p.clone(), dims)),
        }
    }
}

// ── Vectors ─────────────────────────────────────────────────

impl VectorExpr {
    pub fn kind(&self) -> Kind {
        match self {
            VectorExpr::Constant(_) => Kind::Constant,
            VectorExpr::Variable(_) => Kind::Variable,
            VectorExpr::Monomial(_) => Kind::Monomial,
            VectorExpr::Polynomial(_) => Kind::Polynomial,
        }
    }

    pub fn check(&self) -> Result<(), ExprError> {
        each_variant!(VectorExpr, self, v => v.check())
    }

    pub fn len(&self) -> usize {
        each_variant!(VectorExpr, self, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dims(&self) -> Dims {
        Dims::new(self.len(), 1)
    }

    pub fn variables(&self) -> Vec<Variable> {
        each_variant!(VectorExpr, self, v => v.variables())
    }

    pub fn degree(&self) -> u32 {
        each_variant!(VectorExpr, self, v => v.degree())
    }

    pub fn constant(&self) -> DVector<f64> {
        each_variant!(VectorExpr, self, v => v.constant())
    }

    pub fn linear_coeff(
        &self,
        wrt: Option<&[Variable]>,
    ) -> Result<nalgebra::DMatrix<f64>, ExprError> {
        each_variant!(VectorExpr, self, v => v.linear_coeff(wrt))
    }

    pub fn at_vec(&self, index: usize) -> Result<ScalarExpr, ExprError> {
        each_variant!(VectorExpr, self, v => v.at_vec(index).map(|e| e.clone().into_scalar()))
    }

    pub fn to_polynomials(&self) -> Vec<Polynomial> {
        each_variant!(VectorExpr, self, v => v.to_polynomials())
    }

    /// Entries as scalar expressions, kind preserved.
    pub fn scalars(&self) -> Vec<ScalarExpr> {
        each_variant!(VectorExpr, self, v => v.elements.iter().cloned().map(Element::into_scalar).collect())
    }

    /// The vector as an `len × 1` matrix expression.
    pub fn to_column(&self) -> MatrixExpr {
        each_variant!(VectorExpr, self, v => Element::wrap_matrix(v.to_column()))
    }

    /// Row matrix `1 × len`, kind preserved.
    pub fn transpose(&self) -> MatrixExpr {
        each_variant!(VectorExpr, self, v => Element::wrap_matrix(v.transpose()))
    }
}

// ── Matrices ────────────────────────────────────────────────

impl MatrixExpr {
    pub fn kind(&self) -> Kind {
        match self {
            MatrixExpr::Constant(_) => Kind::Constant,
            MatrixExpr::Variable(_) => Kind::Variable,
            MatrixExpr::Monomial(_) => Kind::Monomial,
            MatrixExpr::Polynomial(_) => Kind::Polynomial,
        }
    }

    pub fn check(&self) -> Result<(), ExprError> {
        each_variant!(MatrixExpr, self, m => m.check())
    }

    pub fn dims(&self) -> Dims {
        each_variant!(MatrixExpr, self, m => m.dims())
    }

    pub fn variables(&self) -> Vec<Variable> {
        each_variant!(MatrixExpr, self, m => m.variables())
    }

    pub fn degree(&self) -> u32 {
        each_variant!(MatrixExpr, self, m => m.degree())
    }

    pub fn constant(&self) -> Result<nalgebra::DMatrix<f64>, ExprError> {
        each_variant!(MatrixExpr, self, m => m.constant())
    }

    pub fn at(&self, row: usize, col: usize) -> Result<ScalarExpr, ExprError> {
        each_variant!(MatrixExpr, self, m => m.at(row, col).map(|e| e.clone().into_scalar()))
    }

    pub fn to_polynomial_rows(&self) -> Vec<Vec<Polynomial>> {
        each_variant!(MatrixExpr, self, m => m.to_polynomial_rows())
    }

    /// Transposed matrix, reshaped to a vector or scalar when it collapses.
    pub fn transpose(&self) -> Result<Expression, ExprError> {
        each_variant!(MatrixExpr, self, m => m.transpose().map(Expression::from_matrix))
    }
}

// ── Expressions ─────────────────────────────────────────────

impl Expression {
    /// Least shape holding `matrix`: `1×1` is a scalar, `n×1` a vector.
    /// The element kind is kept.
    pub fn from_matrix<T: Element>(matrix: Matrix<T>) -> Expression {
        if matrix.ncols() != 1 {
            return Expression::Matrix(T::wrap_matrix(matrix));
        }
        let column: Vec<T> = matrix.rows.into_iter().flatten().collect();
        match <[T; 1]>::try_from(column) {
            Ok([element]) => Expression::Scalar(element.into_scalar()),
            Err(column) => Expression::Vector(T::wrap_vector(Vector::new(column))),
        }
    }

    /// Concretize algebra output: least shape, then the least element
    /// kind able to represent every entry.
    pub fn from_polynomial_rows(rows: Vec<Vec<Polynomial>>) -> Expression {
        let kind = rows
            .iter()
            .flatten()
            .map(Polynomial::kind)
            .reduce(Kind::join)
            .unwrap_or(Kind::Polynomial);
        match kind {
            Kind::Constant => narrow::<Constant>(rows),
            Kind::Variable => narrow::<Variable>(rows),
            Kind::Monomial => narrow::<Monomial>(rows),
            Kind::Polynomial => Expression::from_matrix(Matrix::from_rows(rows)),
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Expression::Scalar(_))
    }

    pub fn kind(&self) -> Kind {
        match self {
            Expression::Scalar(s) => s.kind(),
            Expression::Vector(v) => v.kind(),
            Expression::Matrix(m) => m.kind(),
        }
    }

    pub fn check(&self) -> Result<(), ExprError> {
        match self {
            Expression::Scalar(s) => s.check(),
            Expression::Vector(v) => v.check(),
            Expression::Matrix(m) => m.check(),
        }
    }

    pub fn dims(&self) -> Dims {
        match self {
            Expression::Scalar(s) => s.dims(),
            Expression::Vector(v) => v.dims(),
            Expression::Matrix(m) => m.dims(),
        }
    }

    /// Distinct variables, sorted by id.
    pub fn variables(&self) -> Vec<Variable> {
        match self {
            Expression::Scalar(s) => s.variables(),
            Expression::Vector(v) => v.variables(),
            Expression::Matrix(m) => m.variables(),
        }
    }

    pub fn degree(&self) -> u32 {
        match self {
            Expression::Scalar(s) => s.degree(),
            Expression::Vector(v) => v.degree(),
            Expression::Matrix(m) => m.degree(),
        }
    }

    pub fn is_linear(&self) -> bool {
        self.degree() <= 1
    }

    /// True for degree at most two.
    pub fn is_quadratic(&self) -> bool {
        self.degree() <= 2
    }

    /// Constant parts, shaped like the expression. Validates first.
    pub fn constant(&self) -> Result<DenseValue, ExprError> {
        self.check()?;
        Ok(match self {
            Expression::Scalar(s) => DenseValue::Scalar(s.constant()),
            Expression::Vector(v) => DenseValue::Vector(v.constant()),
            Expression::Matrix(m) => DenseValue::Matrix(m.constant()?),
        })
    }

    /// Linear coefficients: a vector for scalars, a `len × targets`
    /// matrix for vectors. Matrices are rejected.
    pub fn linear_coeff(&self, wrt: Option<&[Variable]>) -> Result<DenseValue, ExprError> {
        match self {
            Expression::Scalar(s) => s.linear_coeff(wrt).map(DenseValue::Vector),
            Expression::Vector(v) => v.linear_coeff(wrt).map(DenseValue::Matrix),
            Expression::Matrix(_) => Err(ExprError::UnsupportedOperand {
                operation: Operation::LinearCoeff,
                operand: "matrix".to_string(),
            }),
        }
    }

    /// Entry at `(row, col)`; scalars answer only `(0, 0)`.
    pub fn at(&self, row: usize, col: usize) -> Result<ScalarExpr, ExprError> {
        let out_of_range = || ExprError::IndexOutOfRange {
            row,
            col,
            dims: self.dims(),
        };
        match self {
            Expression::Scalar(s) if row == 0 && col == 0 => Ok(s.clone()),
            Expression::Vector(v) if col == 0 => v.at_vec(row).map_err(|_| out_of_range()),
            Expression::Matrix(m) => m.at(row, col),
            _ => Err(out_of_range()),
        }
    }

    /// Entries as polynomials, row-major.
    pub fn to_polynomial_rows(&self) -> Vec<Vec<Polynomial>> {
        match self {
            Expression::Scalar(s) => vec![vec![s.to_polynomial()]],
            Expression::Vector(v) => v.to_polynomials().into_iter().map(|p| vec![p]).collect(),
            Expression::Matrix(m) => m.to_polynomial_rows(),
        }
    }

    pub fn shape_name(&self) -> &'static str {
        match self {
            Expression::Scalar(_) => "scalar",
            Expression::Vector(_) => "vector",
            Expression::Matrix(_) => "matrix",
        }
    }
}

fn narrow<T: Element>(rows: Vec<Vec<Polynomial>>) -> Expression {
    let mut narrowed: Vec<Vec<T>> = Vec::with_capacity(rows.len());
    for row in &rows {
        let mut entries = Vec::with_capacity(row.len());
        for entry in row {
            match T::from_scalar(ScalarExpr::from_polynomial(entry)) {
                Some(element) => entries.push(element),
                None => return Expression::from_matrix(Matrix::from_rows(rows)),
            }
        }
        narrowed.push(entries);
    }
    Expression::from_matrix(Matrix::from_rows(narrowed))
}

// ── Conversions ─────────────────────────────────────────────

macro_rules! scalar_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for ScalarExpr {
                fn from(value: $ty) -> Self {
                    ScalarExpr::$variant(value)
                }
            }

            impl From<$ty> for Expression {
                fn from(value: $ty) -> Self {
                    Expression::Scalar(ScalarExpr::$variant(value))
                }
            }

            impl From<&$ty> for Expression {
                fn from(value: &$ty) -> Self {
                    Expression::Scalar(ScalarExpr::$variant(value.clone()))
                }
            }
        )*
    };
}

scalar_from!(
    Constant => Constant,
    Variable => Variable,
    Monomial => Monomial,
    Polynomial => Polynomial,
);

impl From<f64> for ScalarExpr {
    fn from(value: f64) -> Self {
        ScalarExpr::Constant(Constant(value))
    }
}

impl From<f64> for Expression {
    fn from(value: f64) -> Self {
        Expression::Scalar(ScalarExpr::Constant(Constant(value)))
    }
}

impl<T: Element> From<Vector<T>> for VectorExpr {
    fn from(vector: Vector<T>) -> Self {
        T::wrap_vector(vector)
    }
}

impl<T: Element> From<Vector<T>> for Expression {
    fn from(vector: Vector<T>) -> Self {
        Expression::Vector(T::wrap_vector(vector))
    }
}

impl<T: Element> From<&Vector<T>> for Expression {
    fn from(vector: &Vector<T>) -> Self {
        Expression::Vector(T::wrap_vector(vector.clone()))
    }
}

impl<T: Element> From<Matrix<T>> for MatrixExpr {
    fn from(matrix: Matrix<T>) -> Self {
        T::wrap_matrix(matrix)
    }
}

impl<T: Element> From<Matrix<T>> for Expression {
    fn from(matrix: Matrix<T>) -> Self {
        Expression::Matrix(T::wrap_matrix(matrix))
    }
}

impl<T: Element> From<&Matrix<T>> for Expression {
    fn from(matrix: &Matrix<T>) -> Self {
        Expression::Matrix(T::wrap_matrix(matrix.clone()))
    }
}

impl From<ScalarExpr> for Expression {
    fn from(scalar: ScalarExpr) -> Self {
        Expression::Scalar(scalar)
    }
}

impl From<VectorExpr> for Expression {
    fn from(vector: VectorExpr) -> Self {
        Expression::Vector(vector)
    }
}

impl From<MatrixExpr> for Expression {
    fn from(matrix: MatrixExpr) -> Self {
        Expression::Matrix(matrix)
    }
}

impl From<&Expression> for Expression {
    fn from(expression: &Expression) -> Self {
        expression.clone()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::{Expression, MatrixExpr, ScalarExpr, VectorExpr};
    use crate::expr::container::{ConstantMatrix, MonomialVector, VariableMatrix, VariableVector};
    use crate::expr::error::{ExprError, MissingTarget, Operation};
    use crate::expr::monomial::Monomial;
    use crate::expr::polynomial::Polynomial;
    use crate::expr::scalar::{Constant, Variable};
    use crate::expr::shape::{Dims, Kind};

    #[test]
    fn from_polynomial_picks_least_kind() {
        let x = Variable::new();
        assert_eq!(
            ScalarExpr::from_polynomial(&Polynomial::constant_term(2.0)),
            ScalarExpr::Constant(Constant(2.0))
        );
        assert_eq!(
            ScalarExpr::from_polynomial(&x.to_polynomial()),
            ScalarExpr::Variable(x)
        );
        let doubled = Monomial::new(2.0, vec![x], vec![1]);
        assert_eq!(
            ScalarExpr::from_polynomial(&doubled.to_polynomial()),
            ScalarExpr::Monomial(doubled)
        );
    }

    #[test]
    fn from_polynomial_rows_concretizes_shape_and_kind() {
        let x = Variable::new();
        let single = Expression::from_polynomial_rows(vec![vec![x.to_polynomial()]]);
        assert_eq!(single, Expression::Scalar(ScalarExpr::Variable(x)));

        let column = Expression::from_polynomial_rows(vec![
            vec![Polynomial::constant_term(1.0)],
            vec![x.to_polynomial()],
        ]);
        assert!(matches!(column, Expression::Vector(VectorExpr::Monomial(_))));
        assert_eq!(column.dims(), Dims::new(2, 1));

        let grid = Expression::from_polynomial_rows(vec![vec![
            Polynomial::constant_term(1.0),
            Polynomial::constant_term(2.0),
        ]]);
        assert!(matches!(grid, Expression::Matrix(MatrixExpr::Constant(_))));
        assert_eq!(grid.kind(), Kind::Constant);
    }

    #[test]
    fn from_matrix_keeps_kind_but_collapses_shape() {
        let m = VariableMatrix::fresh(3, 1);
        let e = Expression::from_matrix(m);
        assert!(matches!(e, Expression::Vector(VectorExpr::Variable(_))));
    }

    #[test]
    fn at_checks_bounds_for_every_shape() {
        let v = Expression::from(VariableVector::fresh(3));
        assert!(v.at(2, 0).is_ok());
        assert_eq!(
            v.at(0, 1),
            Err(ExprError::IndexOutOfRange {
                row: 0,
                col: 1,
                dims: Dims::new(3, 1)
            })
        );
        let s = Expression::from(4.0);
        assert_eq!(s.at(0, 0), Ok(ScalarExpr::Constant(Constant(4.0))));
        assert!(s.at(1, 0).is_err());
    }

    #[test]
    fn linear_coeff_rejects_matrices_and_constant_scalars() {
        let m = Expression::from(ConstantMatrix::filled(Constant(1.0), Dims::new(2, 2)));
        assert_eq!(
            m.linear_coeff(None),
            Err(ExprError::UnsupportedOperand {
                operation: Operation::LinearCoeff,
                operand: "matrix".to_string()
            })
        );
        assert_eq!(
            ScalarExpr::from(3.0).linear_coeff(None),
            Err(ExprError::MissingCoefficientTarget(
                MissingTarget::NoVariables
            ))
        );
    }

    #[test]
    fn linear_coeff_of_scalar_follows_targets() {
        let x = Variable::new();
        let y = Variable::new();
        let s = ScalarExpr::Monomial(Monomial::new(3.0, vec![y], vec![1]));
        let coeffs = s.linear_coeff(Some(&[x, y][..])).expect("targets supplied");
        assert_eq!(coeffs.as_slice(), &[0.0, 3.0]);
    }

    #[test]
    fn fill_preserves_kind() {
        let x = Variable::new();
        let filled = ScalarExpr::Variable(x).fill_vector(20);
        assert!(matches!(&filled, VectorExpr::Variable(v) if v.len() == 20));
        let grid = ScalarExpr::from(5.0).fill_matrix(Dims::new(2, 3));
        assert_eq!(grid.dims(), Dims::new(2, 3));
        assert_eq!(grid.kind(), Kind::Constant);
    }

    #[test]
    fn degree_and_linearity() {
        let squares = MonomialVector::new(vec![Monomial::new(1.0, vec![Variable::new()], vec![2])]);
        let e = Expression::from(squares);
        assert_eq!(e.degree(), 2);
        assert!(!e.is_linear());
        assert!(e.is_quadratic());
    }
}
