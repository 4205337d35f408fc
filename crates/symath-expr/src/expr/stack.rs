//! Horizontal and vertical concatenation.

use crate::expr::core::Expression;
use crate::expr::dispatch::finish;
use crate::expr::error::{ContainerKind, ExprError, Operation};
use crate::expr::polynomial::Polynomial;

/// Place `parts` side by side. Every part needs the same row count.
pub fn hstack(parts: &[Expression]) -> Result<Expression, ExprError> {
    finish(
        Operation::HStack,
        stack(parts, Operation::HStack),
        Expression::dims,
    )
}

/// Place `parts` on top of each other. Every part needs the same column
/// count.
pub fn vstack(parts: &[Expression]) -> Result<Expression, ExprError> {
    finish(
        Operation::VStack,
        stack(parts, Operation::VStack),
        Expression::dims,
    )
}

fn stack(parts: &[Expression], operation: Operation) -> Result<Expression, ExprError> {
    let Some(first) = parts.first() else {
        return Err(ExprError::EmptyContainer {
            container: ContainerKind::StackInput,
        });
    };
    for part in parts {
        part.check()?;
    }
    let expected = first.dims();
    for part in &parts[1..] {
        let dims = part.dims();
        let aligned = match operation {
            Operation::HStack => dims.rows == expected.rows,
            _ => dims.cols == expected.cols,
        };
        if !aligned {
            return Err(ExprError::Dimension {
                operation,
                left: expected,
                right: dims,
            });
        }
    }

    let mut rows: Vec<Vec<Polynomial>> = Vec::new();
    for part in parts {
        let part_rows = part.to_polynomial_rows();
        match operation {
            Operation::HStack if !rows.is_empty() => {
                for (row, extra) in rows.iter_mut().zip(part_rows) {
                    row.extend(extra);
                }
            }
            _ => rows.extend(part_rows),
        }
    }
    Ok(Expression::from_polynomial_rows(rows))
}
