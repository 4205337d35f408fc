//! Leaf atoms: constants and decision variables.

use crate::expr::monomial::Monomial;
use crate::expr::polynomial::Polynomial;
use crate::ids::{VariableId, next_variable_id};
use serde::{Deserialize, Serialize};

/// A real-valued constant. Always valid.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Constant(pub f64);

impl Constant {
    pub const ZERO: Constant = Constant(0.0);
    pub const ONE: Constant = Constant(1.0);

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn to_monomial(self) -> Monomial {
        Monomial::constant(self.0)
    }

    pub fn to_polynomial(self) -> Polynomial {
        Polynomial::new(vec![self.to_monomial()])
    }
}

impl From<f64> for Constant {
    fn from(value: f64) -> Self {
        Constant(value)
    }
}

/// A decision variable. Equality, ordering and hashing follow its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Variable {
    id: VariableId,
}

impl Variable {
    /// Create a variable with a fresh process-wide id.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            id: next_variable_id(),
        }
    }

    /// Wrap an existing id, e.g. one drawn from a local generator.
    pub fn from_id(id: VariableId) -> Self {
        Self { id }
    }

    pub fn id(self) -> VariableId {
        self.id
    }

    pub fn to_monomial(self) -> Monomial {
        Monomial::new(1.0, vec![self], vec![1])
    }

    pub fn to_polynomial(self) -> Polynomial {
        Polynomial::new(vec![self.to_monomial()])
    }
}

impl From<VariableId> for Variable {
    fn from(id: VariableId) -> Self {
        Variable::from_id(id)
    }
}

/// Deduplicate and sort a list of variables by id.
pub(crate) fn unique_variables(mut variables: Vec<Variable>) -> Vec<Variable> {
    variables.sort_unstable();
    variables.dedup();
    variables
}
