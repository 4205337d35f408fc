//! Expression validation and operation errors.

use crate::expr::shape::Dims;

/// Container named by an [`ExprError::EmptyContainer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Polynomial,
    ConstantVector,
    VariableVector,
    MonomialVector,
    PolynomialVector,
    ConstantMatrix,
    VariableMatrix,
    MonomialMatrix,
    PolynomialMatrix,
    StackInput,
}

impl ContainerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ContainerKind::Polynomial => "polynomial",
            ContainerKind::ConstantVector => "constant vector",
            ContainerKind::VariableVector => "variable vector",
            ContainerKind::MonomialVector => "monomial vector",
            ContainerKind::PolynomialVector => "polynomial vector",
            ContainerKind::ConstantMatrix => "constant matrix",
            ContainerKind::VariableMatrix => "variable matrix",
            ContainerKind::MonomialMatrix => "monomial matrix",
            ContainerKind::PolynomialMatrix => "polynomial matrix",
            ContainerKind::StackInput => "stack input",
        }
    }
}

/// Operation named by dimension and operand errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Plus,
    Minus,
    Multiply,
    Comparison,
    HStack,
    VStack,
    Power,
    Substitute,
    LinearCoeff,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Plus => "Plus",
            Operation::Minus => "Minus",
            Operation::Multiply => "Multiply",
            Operation::Comparison => "Comparison",
            Operation::HStack => "HStack",
            Operation::VStack => "VStack",
            Operation::Power => "Power",
            Operation::Substitute => "Substitute",
            Operation::LinearCoeff => "LinearCoeff",
        }
    }
}

/// Coordinate of a faulty element inside a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Monomial index inside a polynomial.
    Term(usize),
    /// Element index inside a vector.
    Index(usize),
    /// Row and column inside a matrix.
    Entry(usize, usize),
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Term(index) => write!(f, "term {index}"),
            Location::Index(index) => write!(f, "element {index}"),
            Location::Entry(row, col) => write!(f, "entry ({row}, {col})"),
        }
    }
}

/// Why a linear coefficient could not be extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingTarget {
    /// An explicit, empty list of target variables was supplied.
    NoTargets,
    /// No targets were supplied and the expression has no variables.
    NoVariables,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprError {
    /// Polynomial, vector, matrix or stack input with no elements.
    EmptyContainer { container: ContainerKind },
    /// Matrix row whose length differs from row 0.
    ColumnMismatch {
        expected: usize,
        actual: usize,
        row: usize,
    },
    /// Monomial whose exponent count differs from its variable count.
    ArityMismatch { variables: usize, exponents: usize },
    /// Total degree of a monomial, or of an operation result, past `u32::MAX`.
    ExponentOverflow,
    /// Operand shapes incompatible with the operation.
    Dimension {
        operation: Operation,
        left: Dims,
        right: Dims,
    },
    /// Element access outside the container bounds.
    IndexOutOfRange { row: usize, col: usize, dims: Dims },
    /// Operand shape or kind that the operation does not accept.
    UnsupportedOperand {
        operation: Operation,
        operand: String,
    },
    /// Coefficient extraction without anything to extract against.
    MissingCoefficientTarget(MissingTarget),
    /// Failure of a contained element, tagged with its coordinate.
    Element {
        location: Location,
        source: Box<ExprError>,
    },
}

impl ExprError {
    /// Returns a semantic error code for programmatic handling.
    ///
    /// Element failures report the code of the underlying error.
    pub fn code(&self) -> &'static str {
        match self {
            ExprError::EmptyContainer { .. } => "EXPR_EMPTY_CONTAINER",
            ExprError::ColumnMismatch { .. } => "EXPR_COLUMN_MISMATCH",
            ExprError::ArityMismatch { .. } => "EXPR_ARITY_MISMATCH",
            ExprError::ExponentOverflow => "EXPR_EXPONENT_OVERFLOW",
            ExprError::Dimension { .. } => "EXPR_DIMENSION_MISMATCH",
            ExprError::IndexOutOfRange { .. } => "EXPR_INDEX_OUT_OF_RANGE",
            ExprError::UnsupportedOperand { .. } => "EXPR_UNSUPPORTED_OPERAND",
            ExprError::MissingCoefficientTarget(_) => "EXPR_MISSING_COEFF_TARGET",
            ExprError::Element { source, .. } => source.code(),
        }
    }

    /// The innermost error once element coordinates are peeled away.
    pub fn root(&self) -> &ExprError {
        match self {
            ExprError::Element { source, .. } => source.root(),
            other => other,
        }
    }

    /// Coordinates from the outermost container down to the faulty element.
    pub fn path(&self) -> Vec<Location> {
        let mut path = Vec::new();
        let mut current = self;
        while let ExprError::Element { location, source } = current {
            path.push(*location);
            current = source;
        }
        path
    }

    pub(crate) fn within(self, location: Location) -> Self {
        ExprError::Element {
            location,
            source: Box::new(self),
        }
    }

    fn write_detail(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExprError::EmptyContainer { container } => {
                write!(f, "{} has no elements", container.as_str())
            }
            ExprError::ColumnMismatch {
                expected,
                actual,
                row,
            } => write!(
                f,
                "row {row} has {actual} columns but row 0 has {expected}"
            ),
            ExprError::ArityMismatch {
                variables,
                exponents,
            } => write!(
                f,
                "monomial has {variables} variables but {exponents} exponents"
            ),
            ExprError::ExponentOverflow => {
                write!(f, "total degree exceeds {}", u32::MAX)
            }
            ExprError::Dimension {
                operation,
                left,
                right,
            } => write!(
                f,
                "cannot perform {} between expression of dimension {} and expression of dimension {}",
                operation.as_str(),
                left,
                right
            ),
            ExprError::IndexOutOfRange { row, col, dims } => write!(
                f,
                "index ({row}, {col}) is outside an expression of dimension {dims}"
            ),
            ExprError::UnsupportedOperand { operation, operand } => write!(
                f,
                "{} does not accept operand {}",
                operation.as_str(),
                operand
            ),
            ExprError::MissingCoefficientTarget(MissingTarget::NoTargets) => {
                write!(f, "linear coefficients requested for zero target variables")
            }
            ExprError::MissingCoefficientTarget(MissingTarget::NoVariables) => write!(
                f,
                "linear coefficients requested from an expression without variables"
            ),
            ExprError::Element { location, source } => {
                write!(f, "{location}: ")?;
                source.write_detail(f)
            }
        }
    }
}

impl std::fmt::Display for ExprError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] ", self.code())?;
        self.write_detail(f)
    }
}

impl std::error::Error for ExprError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExprError::Element { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
