//! Monomials: a coefficient times a product of variable powers.

use crate::expr::error::ExprError;
use crate::expr::polynomial::Polynomial;
use crate::expr::scalar::Variable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `coefficient * Π variables[i]^exponents[i]`.
///
/// Fields are public so literal (and deliberately malformed) values can be
/// built; [`check`](Self::check) rejects mismatched lists. Factor order and
/// duplicate variables are normalized by [`canonical`](Self::canonical),
/// which every algebraic operation applies before comparing footprints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monomial {
    pub coefficient: f64,
    pub variables: Vec<Variable>,
    pub exponents: Vec<u32>,
}

impl Monomial {
    pub fn new(coefficient: f64, variables: Vec<Variable>, exponents: Vec<u32>) -> Self {
        Self {
            coefficient,
            variables,
            exponents,
        }
    }

    /// Zero-factor monomial.
    pub fn constant(value: f64) -> Self {
        Self::new(value, Vec::new(), Vec::new())
    }

    pub fn check(&self) -> Result<(), ExprError> {
        if self.variables.len() != self.exponents.len() {
            return Err(ExprError::ArityMismatch {
                variables: self.variables.len(),
                exponents: self.exponents.len(),
            });
        }
        self.exponents
            .iter()
            .try_fold(0u32, |total, exponent| total.checked_add(*exponent))
            .ok_or(ExprError::ExponentOverflow)?;
        Ok(())
    }

    /// Sorted `(variable, exponent)` pairs with duplicates merged and zero
    /// exponents dropped.
    pub fn footprint(&self) -> Vec<(Variable, u32)> {
        let mut merged: BTreeMap<Variable, u32> = BTreeMap::new();
        for (variable, exponent) in self.variables.iter().zip(&self.exponents) {
            let merged_exponent = merged.entry(*variable).or_insert(0);
            *merged_exponent = merged_exponent.saturating_add(*exponent);
        }
        merged.into_iter().filter(|(_, e)| *e != 0).collect()
    }

    /// Copy with factors in footprint order.
    pub fn canonical(&self) -> Self {
        let (variables, exponents): (Vec<Variable>, Vec<u32>) =
            self.footprint().into_iter().unzip();
        Self::new(self.coefficient, variables, exponents)
    }

    /// True when both monomials carry the same variable content.
    pub fn is_like(&self, other: &Monomial) -> bool {
        self.footprint() == other.footprint()
    }

    pub fn is_constant(&self) -> bool {
        self.exponents.iter().all(|e| *e == 0)
    }

    /// True when the monomial is exactly `1 * v`.
    pub fn is_variable(&self, v: Variable) -> bool {
        self.coefficient == 1.0 && self.footprint() == [(v, 1)]
    }

    /// Saturates at `u32::MAX`; exact for monomials that pass `check`.
    pub fn degree(&self) -> u32 {
        self.exponents.iter().fold(0, |total, e| total.saturating_add(*e))
    }

    pub fn variables(&self) -> Vec<Variable> {
        self.footprint().into_iter().map(|(v, _)| v).collect()
    }

    pub fn exponent_of(&self, v: Variable) -> u32 {
        self.variables
            .iter()
            .zip(&self.exponents)
            .filter(|(candidate, _)| **candidate == v)
            .fold(0, |total, (_, e)| total.saturating_add(*e))
    }

    pub fn to_polynomial(&self) -> Polynomial {
        Polynomial::new(vec![self.clone()])
    }

    // ── Algebra on checked operands ─────────────────────────

    pub(crate) fn scaled(&self, by: f64) -> Self {
        Self::new(
            self.coefficient * by,
            self.variables.clone(),
            self.exponents.clone(),
        )
    }

    /// Product with coefficients multiplied and shared exponents added.
    pub(crate) fn product(&self, other: &Monomial) -> Self {
        let mut variables = self.variables.clone();
        variables.extend_from_slice(&other.variables);
        let mut exponents = self.exponents.clone();
        exponents.extend_from_slice(&other.exponents);
        Self::new(self.coefficient * other.coefficient, variables, exponents).canonical()
    }

    /// Copy with `v` removed, together with the exponent it had.
    pub(crate) fn without(&self, v: Variable) -> (Self, u32) {
        let exponent = self.exponent_of(v);
        let (variables, exponents): (Vec<Variable>, Vec<u32>) = self
            .footprint()
            .into_iter()
            .filter(|(candidate, _)| *candidate != v)
            .unzip();
        (Self::new(self.coefficient, variables, exponents), exponent)
    }

    /// First-order derivative with respect to `v`.
    pub(crate) fn derivative_wrt(&self, v: Variable) -> Self {
        let (rest, exponent) = self.without(v);
        if exponent == 0 {
            return Self::constant(0.0);
        }
        let mut derivative = rest.scaled(f64::from(exponent));
        if exponent > 1 {
            derivative.variables.push(v);
            derivative.exponents.push(exponent - 1);
        }
        derivative.canonical()
    }
}

impl From<Variable> for Monomial {
    fn from(v: Variable) -> Self {
        v.to_monomial()
    }
}
