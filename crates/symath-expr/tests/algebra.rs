#![allow(clippy::float_cmp)]

use symath_expr::{
    Algebra, ComparisonSense, Constant, ConstantMatrix, ConstantVector, Constraint, Dims,
    ExprError, Expression, Kind, Matrix, Monomial, Operation, Polynomial, PolynomialMatrix,
    ScalarExpr, Variable, VariableMatrix, VariableVector, Vector, VectorExpr,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn scaled(coefficient: f64, v: Variable) -> Monomial {
    Monomial::new(coefficient, vec![v], vec![1])
}

/// One vector of each element kind with length `len`.
fn vectors(len: usize) -> Vec<Expression> {
    let x = Variable::new();
    vec![
        ConstantVector::filled(Constant(1.0), len).into(),
        VariableVector::fresh(len).into(),
        Vector::filled(scaled(2.0, x), len).into(),
        Vector::filled(
            Polynomial::new(vec![x.to_monomial(), Monomial::constant(1.0)]),
            len,
        )
        .into(),
    ]
}

/// One matrix of each element kind with the given dims.
fn matrices(dims: Dims) -> Vec<Expression> {
    let x = Variable::new();
    vec![
        ConstantMatrix::filled(Constant(1.0), dims).into(),
        VariableMatrix::fresh(dims.rows, dims.cols).into(),
        Matrix::filled(scaled(2.0, x), dims).into(),
        Matrix::filled(
            Polynomial::new(vec![x.to_monomial(), Monomial::constant(1.0)]),
            dims,
        )
        .into(),
    ]
}

fn normalized(e: &Expression) -> Expression {
    Expression::from_polynomial_rows(
        e.to_polynomial_rows()
            .iter()
            .map(|row| row.iter().map(Polynomial::simplified).collect())
            .collect(),
    )
}

#[test]
fn adding_zero_is_identity_after_normalization() {
    init_tracing();
    let x = Variable::new();
    let y = Variable::new();
    let samples: Vec<Expression> = vec![
        x.into(),
        Polynomial::new(vec![scaled(2.0, x), Monomial::constant(3.0), scaled(1.0, y)]).into(),
        Polynomial::new(vec![scaled(1.0, x), scaled(1.0, x)]).into(),
        VariableVector::fresh(4).into(),
        PolynomialMatrix::filled(
            Polynomial::new(vec![x.to_monomial(), y.to_monomial()]),
            Dims::new(2, 3),
        )
        .into(),
    ];
    for e in samples {
        let sum = e.plus(0.0).expect("adding a scalar always succeeds");
        assert_eq!(sum, normalized(&e), "e + 0 differs for {e}");
    }
}

#[test]
fn like_term_reduction_matches_shared_footprints() {
    let [a, b, c, d] = [(); 4].map(|_| Variable::new());
    // p and q share the footprints {a} and {b*c}
    let p = Polynomial::new(vec![
        scaled(1.0, a),
        Monomial::new(2.0, vec![b, c], vec![1, 1]),
        scaled(3.0, d),
    ]);
    let q = Polynomial::new(vec![
        Monomial::new(5.0, vec![c, b], vec![1, 1]),
        scaled(4.0, a),
        Monomial::new(1.0, vec![d], vec![2]),
    ]);
    let sum = p.plus(&q).expect("scalars combine");
    let rows = sum.to_polynomial_rows();
    assert_eq!(rows[0][0].terms.len(), p.terms.len() + q.terms.len() - 2);
}

#[test]
fn merge_ignores_factor_order() {
    let x = Variable::new();
    let y = Variable::new();
    let xy = Monomial::new(1.0, vec![x, y], vec![1, 2]);
    let yx = Monomial::new(1.0, vec![y, x], vec![2, 1]);
    let forward = xy.plus(&yx).expect("scalars combine");
    let backward = yx.plus(&xy).expect("scalars combine");
    assert_eq!(forward, backward);
    assert_eq!(
        forward,
        Expression::Scalar(ScalarExpr::Monomial(Monomial::new(2.0, vec![x, y], vec![1, 2])))
    );
}

#[test]
fn broadcast_constant_adds_one_term_per_entry() {
    let x = Variable::new();
    let y = Variable::new();
    let entry = Polynomial::new(vec![x.to_monomial(), scaled(2.0, y)]);
    let m = PolynomialMatrix::filled(entry.clone(), Dims::new(3, 4));

    let shifted = m.plus(7.0).expect("scalar broadcast");
    assert_eq!(shifted.dims(), Dims::new(3, 4));
    for row in shifted.to_polynomial_rows() {
        for p in row {
            assert_eq!(p.terms.len(), entry.terms.len() + 1);
            assert_eq!(p.constant(), 7.0);
        }
    }

    // an existing constant term absorbs the broadcast value instead
    let with_constant = PolynomialMatrix::filled(
        Polynomial::new(vec![x.to_monomial(), Monomial::constant(1.0)]),
        Dims::new(2, 2),
    );
    let shifted = Expression::from(7.0)
        .plus(&with_constant)
        .expect("scalar broadcast");
    for row in shifted.to_polynomial_rows() {
        for p in row {
            assert_eq!(p.terms.len(), 2);
            assert_eq!(p.constant(), 8.0);
        }
    }
}

#[test]
fn incompatible_containers_fail_for_every_kind_pairing() {
    init_tracing();
    let mut left: Vec<Expression> = vectors(3);
    left.extend(matrices(Dims::new(2, 3)));
    let mut right: Vec<Expression> = vectors(4);
    right.extend(matrices(Dims::new(4, 2)));

    for l in &left {
        for r in &right {
            let err = l.plus(r).expect_err("shapes never match");
            assert_eq!(
                err,
                ExprError::Dimension {
                    operation: Operation::Plus,
                    left: l.dims(),
                    right: r.dims()
                }
            );

            // (3,1) x (4,_) and (2,3) x (4,_) have mismatched inner dims
            let err = l.multiply(r).expect_err("inner dims never match");
            assert_eq!(
                err,
                ExprError::Dimension {
                    operation: Operation::Multiply,
                    left: l.dims(),
                    right: r.dims()
                }
            );
        }
    }
}

#[test]
fn compatible_containers_combine_for_every_kind_pairing() {
    for l in matrices(Dims::new(2, 3)) {
        for r in vectors(3) {
            let product = l.multiply(&r).expect("(2,3) x (3,1)");
            assert_eq!(product.dims(), Dims::new(2, 1));
            assert!(matches!(product, Expression::Vector(_)));
        }
        for r in matrices(Dims::new(2, 3)) {
            let sum = l.plus(&r).expect("same dims");
            assert_eq!(sum.dims(), Dims::new(2, 3));
        }
    }
}

#[test]
fn multiplication_distributes_over_addition() {
    // p = x + 1, q = 2, r = y
    let x = Variable::new();
    let y = Variable::new();
    let p = x.plus(1.0).expect("scalars combine");
    let q = Expression::from(2.0);
    let r = Expression::from(y);

    let left = p
        .plus(&q)
        .and_then(|sum| sum.multiply(&r))
        .expect("scalars combine");
    let right = p
        .multiply(&r)
        .and_then(|pr| pr.plus(q.multiply(&r)?))
        .expect("scalars combine");

    let expected = Polynomial::new(vec![
        Monomial::new(1.0, vec![x, y], vec![1, 1]),
        scaled(3.0, y),
    ]);
    assert_eq!(left, Expression::from(expected));
    assert_eq!(right.to_polynomial_rows()[0][0].terms.len(), 2);
    assert_eq!(
        right.linear_coeff(Some(&[y][..])),
        left.linear_coeff(Some(&[y][..]))
    );
}

#[test]
fn degree_collapses_for_constant_content() {
    let x = Variable::new();
    let m = Monomial::new(3.0, vec![x], vec![0]);
    let e = Expression::from(m.clone());
    assert_eq!(e.degree(), 0);
    assert_eq!(e.constant().expect("valid monomial").as_scalar(), Some(3.0));

    let cancelled = x
        .plus(x.multiply(-1.0).expect("scalars combine"))
        .expect("scalars combine");
    assert_eq!(cancelled, Expression::Scalar(ScalarExpr::Constant(Constant(0.0))));
    assert_eq!(cancelled.to_polynomial_rows()[0][0].terms.len(), 1);
}

#[test]
fn scalar_comparison_keeps_right_side() {
    let v = Variable::new();
    let constraint = v.less_eq(5.0).expect("scalars compare");
    assert_eq!(constraint.sense(), ComparisonSense::LessEqual);
    let Constraint::Scalar(scalar) = constraint else {
        panic!("expected scalar constraint");
    };
    assert_eq!(scalar.right().constant(), 5.0);
}

#[test]
fn vector_comparison_broadcasts_or_rejects() {
    init_tracing();
    let v = VariableVector::fresh(20);
    let constraint = v.comparison(5.0, ComparisonSense::GreaterEqual).expect("broadcast");
    assert_eq!(constraint.dims(), Dims::new(20, 1));
    let Constraint::Vector(vector) = &constraint else {
        panic!("expected vector constraint");
    };
    assert_eq!(vector.right().len(), 20);
    assert!(matches!(vector.right(), VectorExpr::Constant(_)));

    let err = v
        .comparison(VariableVector::fresh(19), ComparisonSense::Equal)
        .expect_err("lengths differ");
    assert_eq!(err.code(), "EXPR_DIMENSION_MISMATCH");
}

#[test]
fn results_use_least_kind() {
    let x = VariableVector::fresh(3);
    let doubled = x.multiply(2.0).expect("scalar broadcast");
    assert_eq!(doubled.kind(), Kind::Monomial);
    let halved = doubled.multiply(0.5).expect("scalar broadcast");
    assert_eq!(halved.kind(), Kind::Variable);
    assert_eq!(halved, Expression::from(x));
}

#[test]
fn operands_are_not_mutated() {
    let v = VariableVector::fresh(3);
    let before = v.clone();
    let _ = v.plus(1.0).expect("scalar broadcast");
    let _ = v.multiply(v.transpose()).expect("outer product");
    assert_eq!(v, before);
}

#[test]
fn outer_product_is_matrix() {
    let v = VariableVector::fresh(3);
    let outer = Expression::from(&v)
        .multiply(Expression::from(&v).transpose().expect("valid vector"))
        .expect("(3,1) x (1,3)");
    assert_eq!(outer.dims(), Dims::new(3, 3));
    assert_eq!(outer.kind(), Kind::Monomial);
    assert_eq!(outer.degree(), 2);
}

#[test]
fn expressions_serialize_as_json() {
    let x = Variable::new();
    let e = x.plus(2.0).expect("scalars combine");
    let json = serde_json::to_string(&e).expect("serialize expression");
    let back: Expression = serde_json::from_str(&json).expect("deserialize expression");
    assert_eq!(back, e);
}
