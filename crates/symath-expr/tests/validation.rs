use symath_expr::{
    Algebra, ContainerKind, ExprError, Expression, Location, MatrixExpr, MissingTarget, Monomial,
    MonomialMatrix, MonomialVector, Polynomial, PolynomialVector, Variable, VariableMatrix,
    VariableVector, hstack, vstack,
};

fn bad_monomial(x: Variable) -> Monomial {
    Monomial::new(1.0, vec![x, x], vec![1])
}

#[test]
fn malformed_containers_report_their_kind() {
    let x = Variable::new();
    let cases: Vec<(Expression, &str)> = vec![
        (Polynomial::new(Vec::new()).into(), "EXPR_EMPTY_CONTAINER"),
        (VariableVector::new(Vec::new()).into(), "EXPR_EMPTY_CONTAINER"),
        (MonomialMatrix::from_rows(Vec::new()).into(), "EXPR_EMPTY_CONTAINER"),
        (
            VariableMatrix::from_rows(vec![vec![x, x], vec![x]]).into(),
            "EXPR_COLUMN_MISMATCH",
        ),
        (bad_monomial(x).into(), "EXPR_ARITY_MISMATCH"),
        (
            MonomialVector::new(vec![x.to_monomial(), bad_monomial(x)]).into(),
            "EXPR_ARITY_MISMATCH",
        ),
        (
            PolynomialVector::new(vec![Polynomial::new(Vec::new())]).into(),
            "EXPR_EMPTY_CONTAINER",
        ),
    ];
    for (expression, code) in cases {
        let err = expression.check().expect_err("malformed input");
        assert_eq!(err.code(), code, "unexpected error {err}");
    }
}

#[test]
fn ragged_matrix_reports_triple() {
    let x = Variable::new();
    let m = VariableMatrix::from_rows(vec![vec![x; 4], vec![x; 4], vec![x; 4], vec![x; 1]]);
    let err = Expression::from(m).check().expect_err("ragged");
    assert_eq!(
        err,
        ExprError::ColumnMismatch {
            expected: 4,
            actual: 1,
            row: 3
        }
    );
    assert_eq!(
        err.to_string(),
        "[EXPR_COLUMN_MISMATCH] row 3 has 1 columns but row 0 has 4"
    );
}

#[test]
fn nested_failures_keep_their_path() {
    let x = Variable::new();
    let p = Polynomial::new(vec![x.to_monomial(), bad_monomial(x)]);
    let v = PolynomialVector::new(vec![x.to_polynomial(), x.to_polynomial(), p]);
    let err = v.check().expect_err("bad term");
    assert_eq!(err.path(), vec![Location::Index(2), Location::Term(1)]);
    assert_eq!(
        err.root(),
        &ExprError::ArityMismatch {
            variables: 2,
            exponents: 1
        }
    );
    assert!(err.to_string().starts_with("[EXPR_ARITY_MISMATCH] element 2: term 1:"));
}

#[test]
fn well_formed_values_pass() {
    let x = Variable::new();
    let values: Vec<Expression> = vec![
        x.into(),
        2.5.into(),
        Monomial::constant(3.0).into(),
        Polynomial::new(vec![x.to_monomial(), Monomial::constant(1.0)]).into(),
        VariableVector::fresh(5).into(),
        VariableMatrix::fresh(2, 2).into(),
    ];
    for value in values {
        assert!(value.check().is_ok(), "{value} should be valid");
    }
}

#[test]
fn operations_abort_on_invalid_operands() {
    let x = Variable::new();
    let ragged = VariableMatrix::from_rows(vec![vec![x, x], vec![x]]);
    assert_eq!(
        x.multiply(&ragged).map(|_| ()),
        Err(ExprError::ColumnMismatch {
            expected: 2,
            actual: 1,
            row: 1
        })
    );
    assert!(ragged.less_eq(0.0).is_err());
    assert!(Expression::from(&ragged).transpose().is_err());
    assert!(Expression::from(&ragged).derivative_wrt(x).is_err());
    assert!(vstack(&[Expression::from(ragged)]).is_err());
}

#[test]
fn ragged_matrix_queries_report_the_short_row() {
    let x = Variable::new();
    let ragged = VariableMatrix::from_rows(vec![vec![x, x], vec![x]]);
    let short_row = ExprError::ColumnMismatch {
        expected: 2,
        actual: 1,
        row: 1,
    };
    assert_eq!(Expression::from(&ragged).constant(), Err(short_row.clone()));
    assert_eq!(MatrixExpr::from(ragged.clone()).transpose(), Err(short_row.clone()));
    assert_eq!(ragged.constant(), Err(short_row));

    let leading_empty = VariableMatrix::from_rows(vec![Vec::new(), vec![x]]);
    assert_eq!(
        Expression::from(leading_empty).constant(),
        Err(ExprError::ColumnMismatch {
            expected: 0,
            actual: 1,
            row: 1
        })
    );
}

#[test]
fn degree_overflow_is_reported() {
    let x = Variable::new();
    let top = Monomial::new(1.0, vec![x], vec![u32::MAX]);
    assert_eq!(top.multiply(x).map(|_| ()), Err(ExprError::ExponentOverflow));
    let at_limit = Monomial::new(1.0, vec![x], vec![u32::MAX - 1]);
    assert_eq!(at_limit.multiply(x).map(|e| e.degree()), Ok(u32::MAX));
    let err = Monomial::new(1.0, vec![x, x], vec![u32::MAX, 1])
        .plus(x)
        .expect_err("monomial past the degree limit");
    assert_eq!(err.code(), "EXPR_EXPONENT_OVERFLOW");
}

#[test]
fn coefficient_targets_are_required() {
    let constants = PolynomialVector::new(vec![Polynomial::constant_term(1.0); 3]);
    assert_eq!(
        Expression::from(constants).linear_coeff(None),
        Err(ExprError::MissingCoefficientTarget(
            MissingTarget::NoVariables
        ))
    );
    let x = Variable::new();
    assert_eq!(
        Expression::from(x).linear_coeff(Some(&[][..])),
        Err(ExprError::MissingCoefficientTarget(MissingTarget::NoTargets))
    );
}

#[test]
fn stacking_needs_input() {
    assert_eq!(
        hstack(&[]),
        Err(ExprError::EmptyContainer {
            container: ContainerKind::StackInput
        })
    );
}
