//! Shape and degree-kind descriptors shared by every expression type.

use serde::{Deserialize, Serialize};

/// Row and column counts of an expression. Scalars are `(1, 1)` and
/// vectors are `(len, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dims {
    pub rows: usize,
    pub cols: usize,
}

impl Dims {
    pub const SCALAR: Dims = Dims { rows: 1, cols: 1 };

    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    pub fn transposed(self) -> Self {
        Self {
            rows: self.cols,
            cols: self.rows,
        }
    }

    pub fn is_square(self) -> bool {
        self.rows == self.cols
    }
}

impl std::fmt::Display for Dims {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.rows, self.cols)
    }
}

/// Position of an expression on the degree lattice.
///
/// `Constant` and `Variable` are incomparable; their join is `Monomial`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    Constant,
    Variable,
    Monomial,
    Polynomial,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Constant => "constant",
            Kind::Variable => "variable",
            Kind::Monomial => "monomial",
            Kind::Polynomial => "polynomial",
        }
    }

    /// Least kind able to represent values of both `self` and `other`.
    pub fn join(self, other: Kind) -> Kind {
        match (self, other) {
            (a, b) if a == b => a,
            (Kind::Polynomial, _) | (_, Kind::Polynomial) => Kind::Polynomial,
            _ => Kind::Monomial,
        }
    }
}
