//! Human-readable ASCII formatting for expressions and constraints.

use std::fmt::Write as _;

use crate::expr::constraint::{Constraint, MatrixConstraint, ScalarConstraint, VectorConstraint};
use crate::expr::container::{Matrix, Vector};
use crate::expr::core::{Expression, MatrixExpr, ScalarExpr, VectorExpr, each_variant};
use crate::expr::element::Element;
use crate::expr::monomial::Monomial;
use crate::expr::polynomial::Polynomial;
use crate::expr::scalar::{Constant, Variable};

const PREVIEW_TERMS: usize = 30;
const PREVIEW_ENTRIES: usize = 20;

/// Formatting controls for pretty-print output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrettyOptions {
    /// Maximum number of terms to render per polynomial.
    pub terms: Option<usize>,
    /// Maximum number of entries to render per vector or matrix row, and
    /// of rows per matrix.
    pub entries: Option<usize>,
}

impl PrettyOptions {
    /// Preview mode used by `Display`.
    pub fn preview() -> Self {
        Self {
            terms: Some(PREVIEW_TERMS),
            entries: Some(PREVIEW_ENTRIES),
        }
    }

    /// Full mode with no truncation.
    pub fn full() -> Self {
        Self {
            terms: None,
            entries: None,
        }
    }

    pub fn with_terms(mut self, terms: Option<usize>) -> Self {
        self.terms = terms;
        self
    }

    pub fn with_entries(mut self, entries: Option<usize>) -> Self {
        self.entries = entries;
        self
    }
}

impl Default for PrettyOptions {
    fn default() -> Self {
        Self::preview()
    }
}

/// Shared numeric formatter: up to 12 decimals, trailing zeros removed.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-inf" } else { "inf" }.to_string();
    }
    let mut rendered = format!("{value:.12}");
    while rendered.ends_with('0') {
        rendered.pop();
    }
    if rendered.ends_with('.') {
        rendered.pop();
    }
    if rendered == "-0" {
        "0".to_string()
    } else {
        rendered
    }
}

fn variable_label(v: Variable) -> String {
    format!("x[{}]", v.id().inner())
}

fn format_factors(m: &Monomial) -> String {
    let mut factors = String::new();
    for (v, exponent) in m.variables.iter().zip(&m.exponents) {
        if *exponent == 0 {
            continue;
        }
        if !factors.is_empty() {
            factors.push(' ');
        }
        factors.push_str(&variable_label(*v));
        if *exponent > 1 {
            let _ = write!(factors, "^{exponent}");
        }
    }
    factors
}

/// Render `terms` as a signed sum, keeping at most `max_terms` of them.
fn format_terms(terms: &[Monomial], max_terms: Option<usize>) -> String {
    let nonzero: Vec<&Monomial> = terms.iter().filter(|t| t.coefficient != 0.0).collect();
    if nonzero.is_empty() {
        return "0".to_string();
    }
    let limit = max_terms.unwrap_or(nonzero.len()).min(nonzero.len());
    let mut rendered = String::new();

    for (idx, term) in nonzero.iter().take(limit).enumerate() {
        let negative = term.coefficient < 0.0;
        let magnitude = term.coefficient.abs();
        let factors = format_factors(term);
        let body = if factors.is_empty() {
            format_number(magnitude)
        } else if magnitude == 1.0 {
            factors
        } else {
            format!("{} {factors}", format_number(magnitude))
        };

        if idx == 0 {
            if negative {
                rendered.push('-');
            }
            rendered.push_str(&body);
        } else if negative {
            let _ = write!(rendered, " - {body}");
        } else {
            let _ = write!(rendered, " + {body}");
        }
    }

    if limit < nonzero.len() {
        let _ = write!(rendered, " + ... ({} more terms)", nonzero.len() - limit);
    }
    rendered
}

fn format_list(items: impl ExactSizeIterator<Item = String>, max_items: Option<usize>) -> String {
    let total = items.len();
    let limit = max_items.unwrap_or(total).min(total);
    let mut rendered: Vec<String> = items.take(limit).collect();
    if limit < total {
        rendered.push(format!("... ({} more)", total - limit));
    }
    format!("[{}]", rendered.join(", "))
}

impl Polynomial {
    pub fn pretty(&self, options: PrettyOptions) -> String {
        format_terms(&self.terms, options.terms)
    }
}

impl<T: Element> Vector<T> {
    pub fn pretty(&self, options: PrettyOptions) -> String {
        format_list(
            self.elements
                .iter()
                .map(|e| e.to_polynomial().pretty(options)),
            options.entries,
        )
    }
}

impl<T: Element> Matrix<T> {
    pub fn pretty(&self, options: PrettyOptions) -> String {
        format_list(
            self.rows.iter().map(|row| {
                format_list(
                    row.iter().map(|e| e.to_polynomial().pretty(options)),
                    options.entries,
                )
            }),
            options.entries,
        )
    }
}

impl ScalarExpr {
    pub fn pretty(&self, options: PrettyOptions) -> String {
        self.to_polynomial().pretty(options)
    }
}

impl VectorExpr {
    pub fn pretty(&self, options: PrettyOptions) -> String {
        each_variant!(VectorExpr, self, v => v.pretty(options))
    }
}

impl MatrixExpr {
    pub fn pretty(&self, options: PrettyOptions) -> String {
        each_variant!(MatrixExpr, self, m => m.pretty(options))
    }
}

impl Expression {
    pub fn pretty(&self, options: PrettyOptions) -> String {
        match self {
            Expression::Scalar(s) => s.pretty(options),
            Expression::Vector(v) => v.pretty(options),
            Expression::Matrix(m) => m.pretty(options),
        }
    }
}

macro_rules! constraint_pretty {
    ($($ty:ty),*) => {
        $(
            impl $ty {
                pub fn pretty(&self, options: PrettyOptions) -> String {
                    format!(
                        "{} {} {}",
                        self.left().pretty(options),
                        self.sense().symbol(),
                        self.right().pretty(options)
                    )
                }
            }
        )*
    };
}

constraint_pretty!(ScalarConstraint, VectorConstraint, MatrixConstraint);

impl Constraint {
    pub fn pretty(&self, options: PrettyOptions) -> String {
        match self {
            Constraint::Scalar(c) => c.pretty(options),
            Constraint::Vector(c) => c.pretty(options),
            Constraint::Matrix(c) => c.pretty(options),
        }
    }
}

// ── Display ─────────────────────────────────────────────────

impl std::fmt::Display for Constant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_number(self.0))
    }
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&variable_label(*self))
    }
}

impl std::fmt::Display for Monomial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_terms(std::slice::from_ref(self), None))
    }
}

macro_rules! display_via_pretty {
    ($($ty:ty),*) => {
        $(
            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(&self.pretty(PrettyOptions::preview()))
                }
            }
        )*
    };
}

display_via_pretty!(
    Polynomial,
    ScalarExpr,
    VectorExpr,
    MatrixExpr,
    Expression,
    ScalarConstraint,
    VectorConstraint,
    MatrixConstraint,
    Constraint
);

impl<T: Element> std::fmt::Display for Vector<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.pretty(PrettyOptions::preview()))
    }
}

impl<T: Element> std::fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.pretty(PrettyOptions::preview()))
    }
}
