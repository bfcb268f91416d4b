use vividexpr::{ArithmeticEvaluator, Evaluator, EvaluatorChain, ExprError, RelationDefinition};

#[test]
fn clock_relation_orders_times() {
    let ahead = RelationDefinition::parse(
        "R1(h1, m1, h2, m2) <=> h1 > h2 or (h1 == h2 and m1 > m2)",
        1,
    )
    .unwrap();
    let chain = EvaluatorChain::default();

    let cases = [
        (["6", "28", "5", "45"], true),
        (["5", "46", "5", "45"], true),
        (["5", "45", "5", "45"], false),
        (["4", "28", "5", "45"], false),
    ];
    for (values, expected) in cases {
        assert_eq!(
            ahead.evaluate(&values, &chain).unwrap(),
            expected,
            "{:?}",
            values
        );
    }
}

#[test]
fn value_literals_survive_substitution() {
    let same = RelationDefinition::parse("R2(a, b) <=> a == b", 2).unwrap();
    let chain = EvaluatorChain::default();

    assert!(same.evaluate(&["'red'", "'red'"], &chain).unwrap());
    assert!(!same.evaluate(&["'red'", "'blue'"], &chain).unwrap());
    assert!(same.evaluate(&["P(1.0, 2.0)", "P(*, *)"], &chain).unwrap());
    assert!(same.evaluate(&["5.0", "5"], &chain).unwrap());
    assert!(same.evaluate(&["true", "True"], &chain).unwrap());
}

#[test]
fn leftover_names_are_evaluation_errors() {
    let definition = RelationDefinition::parse("R4(x) <=> x > y", 4).unwrap();
    let err = definition
        .evaluate(&["1"], &EvaluatorChain::default())
        .unwrap_err();
    assert_eq!(err, ExprError::UnboundName("y".to_string()));
}

#[test]
fn syntax_errors_point_into_the_text() {
    let err = ArithmeticEvaluator.evaluate("1 < ( 2").unwrap_err();
    let ExprError::Syntax { diagnostics, .. } = err else {
        panic!("expected a syntax error");
    };
    assert!(diagnostics.iter().all(|d| d.start <= d.end && d.end <= "1 < ( 2".len()));
}
