//! Vector and matrix containers over any [`Element`] kind.

use crate::expr::element::Element;
use crate::expr::error::{ExprError, Location, MissingTarget};
use crate::expr::monomial::Monomial;
use crate::expr::polynomial::Polynomial;
use crate::expr::scalar::{Constant, Variable, unique_variables};
use crate::expr::shape::Dims;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

pub type ConstantVector = Vector<Constant>;
pub type VariableVector = Vector<Variable>;
pub type MonomialVector = Vector<Monomial>;
pub type PolynomialVector = Vector<Polynomial>;

pub type ConstantMatrix = Matrix<Constant>;
pub type VariableMatrix = Matrix<Variable>;
pub type MonomialMatrix = Matrix<Monomial>;
pub type PolynomialMatrix = Matrix<Polynomial>;

/// Column vector with dims `(len, 1)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vector<T> {
    pub elements: Vec<T>,
}

/// Row-major matrix. May be built ragged or empty; [`Matrix::check`]
/// reports both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Matrix<T> {
    pub rows: Vec<Vec<T>>,
}

impl<T: Element> Vector<T> {
    pub fn new(elements: Vec<T>) -> Self {
        Self { elements }
    }

    pub fn filled(value: T, len: usize) -> Self {
        Self::new(vec![value; len])
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elements.iter()
    }

    pub fn dims(&self) -> Dims {
        Dims::new(self.len(), 1)
    }

    pub fn check(&self) -> Result<(), ExprError> {
        if self.elements.is_empty() {
            return Err(ExprError::EmptyContainer {
                container: T::VECTOR,
            });
        }
        for (index, element) in self.elements.iter().enumerate() {
            element
                .check()
                .map_err(|err| err.within(Location::Index(index)))?;
        }
        Ok(())
    }

    pub fn at_vec(&self, index: usize) -> Result<&T, ExprError> {
        self.elements
            .get(index)
            .ok_or(ExprError::IndexOutOfRange {
                row: index,
                col: 0,
                dims: self.dims(),
            })
    }

    pub fn variables(&self) -> Vec<Variable> {
        unique_variables(self.elements.iter().flat_map(T::variables).collect())
    }

    pub fn degree(&self) -> u32 {
        self.elements.iter().map(T::degree).max().unwrap_or(0)
    }

    /// Entrywise constant parts.
    pub fn constant(&self) -> DVector<f64> {
        DVector::from_iterator(self.len(), self.elements.iter().map(T::constant))
    }

    /// `len × wrt.len()` matrix of first-degree coefficients.
    ///
    /// With `wrt = None` the vector's own variables are used.
    pub fn linear_coeff(&self, wrt: Option<&[Variable]>) -> Result<DMatrix<f64>, ExprError> {
        self.check()?;
        let targets = resolve_targets(wrt, || self.variables())?;
        let mut coeffs = DMatrix::zeros(self.len(), targets.len());
        for (row, element) in self.elements.iter().enumerate() {
            let row_coeffs = element.to_polynomial().linear_coeff(&targets);
            for (col, value) in row_coeffs.iter().enumerate() {
                coeffs[(row, col)] = *value;
            }
        }
        Ok(coeffs)
    }

    /// Row matrix `1 × len` holding the same elements.
    pub fn transpose(&self) -> Matrix<T> {
        Matrix::from_rows(vec![self.elements.clone()])
    }

    pub fn to_polynomials(&self) -> Vec<Polynomial> {
        self.elements.iter().map(T::to_polynomial).collect()
    }

    /// Same elements as an `len × 1` matrix.
    pub fn to_column(&self) -> Matrix<T> {
        Matrix::from_rows(self.elements.iter().map(|e| vec![e.clone()]).collect())
    }
}

impl Vector<Variable> {
    /// `len` fresh variables.
    pub fn fresh(len: usize) -> Self {
        Self::new((0..len).map(|_| Variable::new()).collect())
    }
}

impl<T> From<Vec<T>> for Vector<T> {
    fn from(elements: Vec<T>) -> Self {
        Self { elements }
    }
}

impl<T: Element> Matrix<T> {
    pub fn from_rows(rows: Vec<Vec<T>>) -> Self {
        Self { rows }
    }

    pub fn filled(value: T, dims: Dims) -> Self {
        Self::from_rows(vec![vec![value; dims.cols]; dims.rows])
    }

    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    /// Column count of row 0.
    pub fn ncols(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn dims(&self) -> Dims {
        Dims::new(self.nrows(), self.ncols())
    }

    /// No rows, then ragged rows (measured against row 0), then zero
    /// columns, then each entry in row-major order.
    pub fn check(&self) -> Result<(), ExprError> {
        let empty = ExprError::EmptyContainer {
            container: T::MATRIX,
        };
        let Some(first) = self.rows.first() else {
            return Err(empty);
        };
        let expected = first.len();
        for (row, entries) in self.rows.iter().enumerate() {
            if entries.len() != expected {
                return Err(ExprError::ColumnMismatch {
                    expected,
                    actual: entries.len(),
                    row,
                });
            }
        }
        if expected == 0 {
            return Err(empty);
        }
        for (row, entries) in self.rows.iter().enumerate() {
            for (col, element) in entries.iter().enumerate() {
                element
                    .check()
                    .map_err(|err| err.within(Location::Entry(row, col)))?;
            }
        }
        Ok(())
    }

    pub fn at(&self, row: usize, col: usize) -> Result<&T, ExprError> {
        self.rows
            .get(row)
            .and_then(|entries| entries.get(col))
            .ok_or(ExprError::IndexOutOfRange {
                row,
                col,
                dims: self.dims(),
            })
    }

    pub fn variables(&self) -> Vec<Variable> {
        unique_variables(self.rows.iter().flatten().flat_map(T::variables).collect())
    }

    pub fn degree(&self) -> u32 {
        self.rows.iter().flatten().map(T::degree).max().unwrap_or(0)
    }

    /// Entrywise constant parts of a checked matrix.
    pub fn constant(&self) -> Result<DMatrix<f64>, ExprError> {
        self.check()?;
        Ok(DMatrix::from_row_iterator(
            self.nrows(),
            self.ncols(),
            self.rows.iter().flatten().map(T::constant),
        ))
    }

    /// Transpose of a checked matrix.
    pub fn transpose(&self) -> Result<Matrix<T>, ExprError> {
        self.check()?;
        let mut columns: Vec<Vec<T>> = vec![Vec::with_capacity(self.nrows()); self.ncols()];
        for entries in &self.rows {
            for (column, entry) in columns.iter_mut().zip(entries) {
                column.push(entry.clone());
            }
        }
        Ok(Matrix::from_rows(columns))
    }

    pub fn to_polynomial_rows(&self) -> Vec<Vec<Polynomial>> {
        self.rows
            .iter()
            .map(|entries| entries.iter().map(T::to_polynomial).collect())
            .collect()
    }
}

impl Matrix<Variable> {
    /// `rows × cols` fresh variables, allocated row by row.
    pub fn fresh(rows: usize, cols: usize) -> Self {
        Self::from_rows(
            (0..rows)
                .map(|_| (0..cols).map(|_| Variable::new()).collect())
                .collect(),
        )
    }
}

impl<T> From<Vec<Vec<T>>> for Matrix<T> {
    fn from(rows: Vec<Vec<T>>) -> Self {
        Self { rows }
    }
}

/// Pick the variables to extract linear coefficients against.
pub(crate) fn resolve_targets(
    wrt: Option<&[Variable]>,
    own: impl FnOnce() -> Vec<Variable>,
) -> Result<Vec<Variable>, ExprError> {
    match wrt {
        Some([]) => Err(ExprError::MissingCoefficientTarget(MissingTarget::NoTargets)),
        Some(targets) => Ok(targets.to_vec()),
        None => {
            let own = own();
            if own.is_empty() {
                Err(ExprError::MissingCoefficientTarget(
                    MissingTarget::NoVariables,
                ))
            } else {
                Ok(own)
            }
        }
    }
}
