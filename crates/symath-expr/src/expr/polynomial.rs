//! Polynomials: ordered sums of monomials.
//!
//! Term merging is the additive core of the algebra. Two terms are alike
//! when their canonical footprints match; like terms combine by summing
//! coefficients, unlike terms keep first-appearance order, and cancelled
//! terms are dropped. A fully cancelled sum keeps one constant `0` term so
//! the result stays non-empty.

use crate::expr::error::{ContainerKind, ExprError, Location};
use crate::expr::monomial::Monomial;
use crate::expr::scalar::{Variable, unique_variables};
use crate::expr::shape::Kind;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polynomial {
    pub terms: Vec<Monomial>,
}

impl Polynomial {
    pub fn new(terms: Vec<Monomial>) -> Self {
        Self { terms }
    }

    /// Single constant term.
    pub fn constant_term(value: f64) -> Self {
        Self::new(vec![Monomial::constant(value)])
    }

    pub fn check(&self) -> Result<(), ExprError> {
        if self.terms.is_empty() {
            return Err(ExprError::EmptyContainer {
                container: ContainerKind::Polynomial,
            });
        }
        for (index, term) in self.terms.iter().enumerate() {
            term.check().map_err(|err| err.within(Location::Term(index)))?;
        }
        Ok(())
    }

    pub fn variables(&self) -> Vec<Variable> {
        unique_variables(self.terms.iter().flat_map(Monomial::variables).collect())
    }

    pub fn degree(&self) -> u32 {
        self.terms.iter().map(Monomial::degree).max().unwrap_or(0)
    }

    /// Sum of the zero-factor coefficients, `0.0` when there are none.
    pub fn constant(&self) -> f64 {
        self.terms
            .iter()
            .filter(|term| term.is_constant())
            .map(|term| term.coefficient)
            .sum()
    }

    pub fn constant_term_index(&self) -> Option<usize> {
        self.terms.iter().position(Monomial::is_constant)
    }

    /// Coefficients of the first-degree terms `1·v` for each `v` in `wrt`.
    pub fn linear_coeff(&self, wrt: &[Variable]) -> DVector<f64> {
        DVector::from_iterator(
            wrt.len(),
            wrt.iter().map(|v| {
                self.terms
                    .iter()
                    .filter(|term| term.footprint() == [(*v, 1)])
                    .map(|term| term.coefficient)
                    .sum::<f64>()
            }),
        )
    }

    /// Canonical form: factors sorted, like terms merged, zeros dropped.
    pub fn simplified(&self) -> Self {
        Self::new(merge_terms(self.terms.iter().cloned()))
    }

    /// Least kind that represents this polynomial, assuming it is simplified.
    pub fn kind(&self) -> Kind {
        match self.terms.as_slice() {
            [term] if term.is_constant() => Kind::Constant,
            [term]
                if term.coefficient == 1.0
                    && matches!(term.footprint().as_slice(), [(_, 1)]) =>
            {
                Kind::Variable
            }
            [_] => Kind::Monomial,
            _ => Kind::Polynomial,
        }
    }

    // ── Algebra on checked operands ─────────────────────────

    pub(crate) fn added(&self, other: &Polynomial) -> Self {
        Self::new(merge_terms(
            self.terms.iter().chain(other.terms.iter()).cloned(),
        ))
    }

    /// Merged sum of every part.
    pub(crate) fn sum(parts: impl IntoIterator<Item = Polynomial>) -> Self {
        Self::new(merge_terms(parts.into_iter().flat_map(|part| part.terms)))
    }

    pub(crate) fn multiplied(&self, other: &Polynomial) -> Self {
        let products = self
            .terms
            .iter()
            .flat_map(|left| other.terms.iter().map(move |right| left.product(right)));
        Self::new(merge_terms(products))
    }

    pub(crate) fn scaled(&self, by: f64) -> Self {
        Self::new(merge_terms(self.terms.iter().map(|term| term.scaled(by))))
    }

    pub(crate) fn without_constant(&self) -> Self {
        Self::new(merge_terms(
            self.terms.iter().filter(|term| !term.is_constant()).cloned(),
        ))
    }

    pub(crate) fn power(&self, exponent: u32) -> Self {
        (0..exponent).fold(Self::constant_term(1.0), |acc, _| acc.multiplied(self))
    }

    pub(crate) fn derivative_wrt(&self, v: Variable) -> Self {
        Self::new(merge_terms(
            self.terms.iter().map(|term| term.derivative_wrt(v)),
        ))
    }

    /// Replace every occurrence of `v` with `replacement`.
    pub(crate) fn substitute(&self, v: Variable, replacement: &Polynomial) -> Self {
        self.terms
            .iter()
            .map(|term| {
                let (rest, exponent) = term.without(v);
                if exponent == 0 {
                    term.to_polynomial()
                } else {
                    rest.to_polynomial().multiplied(&replacement.power(exponent))
                }
            })
            .fold(Self::constant_term(0.0), |acc, part| acc.added(&part))
    }
}

impl From<Monomial> for Polynomial {
    fn from(m: Monomial) -> Self {
        Polynomial::new(vec![m])
    }
}

impl From<Variable> for Polynomial {
    fn from(v: Variable) -> Self {
        v.to_polynomial()
    }
}

/// Merge `terms` into a canonical term list.
fn merge_terms(terms: impl IntoIterator<Item = Monomial>) -> Vec<Monomial> {
    let mut merged: Vec<Monomial> = Vec::new();
    // canonical factor lists -> position in `merged`
    let mut positions: HashMap<(Vec<Variable>, Vec<u32>), usize> = HashMap::new();
    for term in terms {
        let term = term.canonical();
        match positions.entry((term.variables.clone(), term.exponents.clone())) {
            Entry::Occupied(slot) => merged[*slot.get()].coefficient += term.coefficient,
            Entry::Vacant(slot) => {
                slot.insert(merged.len());
                merged.push(term);
            }
        }
    }
    merged.retain(|term| term.coefficient != 0.0);
    if merged.is_empty() {
        merged.push(Monomial::constant(0.0));
    }
    merged
}
