use std::collections::BTreeMap;

use rangeprobe_extract::neutral::sentinels;
use rangeprobe_extract::{extract_all, Assignment, AttributeDomain, ExtractorKind, Interval, Oracle};
use rangeprobe_predicate::{
    compile, compile_predicate, eval_predicate, parse_predicate, CmpOp, CompileError, EvalError,
    ParseError, Predicate,
};

fn domains(entries: &[(&str, i64, i64)]) -> BTreeMap<String, AttributeDomain> {
    entries
        .iter()
        .map(|&(name, min, max)| {
            let domain = AttributeDomain::new(min, max);
            (name.to_string(), domain)
        })
        .collect()
}

fn assignment(entries: &[(&str, i64)]) -> Assignment {
    entries.iter().copied().collect()
}

fn intervals(pairs: &[(i64, i64)]) -> Vec<Interval> {
    pairs.iter().copied().map(Interval::from).collect()
}

// ── Parsing ──────────────────────────────────────────────────────────

#[test]
fn test_parse_simple_comparison() {
    assert_eq!(
        parse_predicate("A < 20").unwrap(),
        Predicate::cmp("A", CmpOp::Lt, 20)
    );
}

#[test]
fn test_parse_literal_on_the_left_flips_operator() {
    assert_eq!(
        parse_predicate("20 > A").unwrap(),
        Predicate::cmp("A", CmpOp::Lt, 20)
    );
    assert_eq!(
        parse_predicate("5 <= B").unwrap(),
        Predicate::cmp("B", CmpOp::Gte, 5)
    );
}

#[test]
fn test_parse_chained_comparison() {
    assert_eq!(
        parse_predicate("20 <= B < 30").unwrap(),
        Predicate::and(vec![
            Predicate::cmp("B", CmpOp::Gte, 20),
            Predicate::cmp("B", CmpOp::Lt, 30),
        ])
    );
}

#[test]
fn test_parse_between() {
    assert_eq!(
        parse_predicate("score between -5 and 5").unwrap(),
        Predicate::range("score", -5, 5)
    );
}

#[test]
fn test_and_binds_tighter_than_or() {
    let parsed = parse_predicate("A < 1 OR A > 5 AND B = 2").unwrap();
    assert_eq!(
        parsed,
        Predicate::or(vec![
            Predicate::cmp("A", CmpOp::Lt, 1),
            Predicate::and(vec![
                Predicate::cmp("A", CmpOp::Gt, 5),
                Predicate::cmp("B", CmpOp::Eq, 2),
            ]),
        ])
    );
}

#[test]
fn test_between_and_does_not_start_a_conjunction() {
    let parsed = parse_predicate("A BETWEEN 1 AND 5 AND B < 3").unwrap();
    assert_eq!(
        parsed,
        Predicate::and(vec![
            Predicate::range("A", 1, 5),
            Predicate::cmp("B", CmpOp::Lt, 3),
        ])
    );
}

#[test]
fn test_parentheses_group() {
    let parsed = parse_predicate("(A < 1 OR A > 5) AND B == 2").unwrap();
    assert_eq!(
        parsed,
        Predicate::and(vec![
            Predicate::or(vec![
                Predicate::cmp("A", CmpOp::Lt, 1),
                Predicate::cmp("A", CmpOp::Gt, 5),
            ]),
            Predicate::cmp("B", CmpOp::Eq, 2),
        ])
    );
}

#[test]
fn test_parse_errors() {
    assert_eq!(parse_predicate("   "), Err(ParseError::Empty));
    assert!(matches!(
        parse_predicate("A < 20 OR"),
        Err(ParseError::UnexpectedEnd { .. })
    ));
    assert!(matches!(
        parse_predicate("A # 3"),
        Err(ParseError::UnexpectedChar { ch: '#', offset: 2 })
    ));
    assert!(matches!(
        parse_predicate("A < B"),
        Err(ParseError::InvalidComparison { offset: 0 })
    ));
    assert!(matches!(
        parse_predicate("1 < 2"),
        Err(ParseError::InvalidComparison { .. })
    ));
    assert!(matches!(
        parse_predicate("A < 99999999999999999999"),
        Err(ParseError::IntegerOutOfRange { .. })
    ));
    assert!(matches!(
        parse_predicate("(A < 3"),
        Err(ParseError::UnexpectedEnd { expected: "')'" })
    ));
    assert!(matches!(
        parse_predicate("A < 3 B > 4"),
        Err(ParseError::UnexpectedToken { .. })
    ));
}

// ── Bounding ─────────────────────────────────────────────────────────

#[test]
fn test_comparisons_become_clipped_ranges() {
    let doms = domains(&[("A", 1, 1_000_000)]);

    let below = compile("A < 20", &doms).unwrap();
    assert_eq!(below.predicate(), &Predicate::range("A", 1, 19));

    let above = compile("A >= 40", &doms).unwrap();
    assert_eq!(above.predicate(), &Predicate::range("A", 40, 1_000_000));

    let strictly_above = compile("A > 40", &doms).unwrap();
    assert_eq!(
        strictly_above.predicate(),
        &Predicate::range("A", 41, 1_000_000)
    );
}

#[test]
fn test_limits_beyond_the_domain_are_clipped() {
    let doms = domains(&[("A", 1, 100)]);

    let wide_below = compile("A < 500", &doms).unwrap();
    assert_eq!(wide_below.predicate(), &Predicate::range("A", 1, 100));

    let wide_above = compile("A >= -500", &doms).unwrap();
    assert_eq!(wide_above.predicate(), &Predicate::range("A", 1, 100));

    let clipped = compile("A BETWEEN -10 AND 500", &doms).unwrap();
    assert_eq!(clipped.predicate(), &Predicate::range("A", 1, 100));
}

#[test]
fn test_unsatisfiable_clauses_compile_to_empty_ranges() {
    let doms = domains(&[("A", 1, 100), ("B", i64::MIN, 0), ("C", 0, i64::MAX)]);

    for text in [
        "A = 101",
        "A < 1",
        "A > 100",
        "B < -9223372036854775808",
        "C > 9223372036854775807",
    ] {
        let compiled = compile(text, &doms).unwrap();
        let Predicate::Range { start, end, .. } = compiled.predicate() else {
            panic!("{text} compiled to {}", compiled.predicate());
        };
        assert!(start > end, "{text} compiled to {}", compiled.predicate());
    }
}

#[test]
fn test_sentinel_never_satisfies_bounded_clauses() {
    let doms = domains(&[("A", 1, 100)]);
    let compiled = compile(
        "A > 40 OR A < 20 OR A BETWEEN 50 AND 1000 OR A < 500 OR A <= 500 OR A = 101",
        &doms,
    )
    .unwrap();

    assert_eq!(compiled.evaluate(&assignment(&[("A", 101)])), Ok(false));
    assert_eq!(compiled.evaluate(&assignment(&[("A", 0)])), Ok(false));
    assert_eq!(compiled.evaluate(&assignment(&[("A", 100)])), Ok(true));
}

#[test]
fn test_sentinels_with_limits_beyond_the_domain() {
    let attributes: Vec<String> = ["A", "B"].iter().map(|s| s.to_string()).collect();
    let doms = domains(&[("A", 1, 100), ("B", 1, 100)]);
    let compiled = compile("A < 500 OR B < 10", &doms).unwrap();
    let neutral = sentinels(&attributes, &doms).unwrap();

    for kind in [
        ExtractorKind::Recursive,
        ExtractorKind::Linear,
        ExtractorKind::parallel(),
    ] {
        let results = extract_all(
            &mut Assignment::new(),
            &attributes,
            &doms,
            &neutral,
            &compiled,
            kind,
        )
        .unwrap();

        assert_eq!(results["A"].as_slice(), intervals(&[(1, 100)]), "{kind}");
        assert_eq!(results["B"].as_slice(), intervals(&[(1, 9)]), "{kind}");
    }
}

#[test]
fn test_unknown_attribute_is_a_compile_error() {
    let doms = domains(&[("A", 1, 100)]);
    assert_eq!(
        compile("A < 5 OR Z > 3", &doms).unwrap_err(),
        CompileError::UnknownAttribute {
            attribute: "Z".to_string()
        }
    );
}

#[test]
fn test_compile_tree_loaded_from_json() {
    let predicate: Predicate = serde_json::from_value(serde_json::json!({
        "type": "or",
        "terms": [
            { "type": "comparison", "attribute": "A", "op": "lt", "value": 10 },
            { "type": "range", "attribute": "A", "start": 20, "end": 29 }
        ]
    }))
    .unwrap();

    let compiled = compile_predicate(&predicate, &domains(&[("A", 1, 100)])).unwrap();
    assert_eq!(compiled.source(), "(A < 10 OR A BETWEEN 20 AND 29)");
    assert_eq!(compiled.evaluate(&assignment(&[("A", 25)])), Ok(true));
    assert_eq!(compiled.evaluate(&assignment(&[("A", 15)])), Ok(false));
}

// ── Evaluation ───────────────────────────────────────────────────────

#[test]
fn test_unassigned_attribute_is_an_error() {
    let predicate = parse_predicate("A < 5").unwrap();
    assert_eq!(
        eval_predicate(&predicate, &Assignment::new()),
        Err(EvalError::Unassigned {
            attribute: "A".to_string()
        })
    );
}

#[test]
fn test_or_short_circuits_before_unassigned_term() {
    let predicate = parse_predicate("A < 5 OR B > 3").unwrap();
    let a_holds = assignment(&[("A", 1)]);
    let b_unset = assignment(&[("A", 9)]);
    assert_eq!(eval_predicate(&predicate, &a_holds), Ok(true));
    assert!(eval_predicate(&predicate, &b_unset).is_err());
}

// ── End to end ───────────────────────────────────────────────────────

#[test]
fn test_extract_through_compiled_predicate_with_sentinels() {
    let attributes: Vec<String> = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();
    let doms = domains(&[("A", 1, 1000), ("B", 1, 1000), ("C", 1, 1000)]);
    let compiled = compile(
        "A < 20 OR A > 40 OR B < 10 OR 20 <= B < 30 OR B > 90 OR C < 5 OR 10 <= C < 15 OR C > 95",
        &doms,
    )
    .unwrap();
    let neutral = sentinels(&attributes, &doms).unwrap();

    for kind in [
        ExtractorKind::Recursive,
        ExtractorKind::Linear,
        ExtractorKind::parallel(),
    ] {
        let results = extract_all(
            &mut Assignment::new(),
            &attributes,
            &doms,
            &neutral,
            &compiled,
            kind,
        )
        .unwrap();

        assert_eq!(
            results["A"].as_slice(),
            intervals(&[(1, 19), (41, 1000)]),
            "{kind}"
        );
        assert_eq!(
            results["B"].as_slice(),
            intervals(&[(1, 9), (20, 29), (91, 1000)]),
            "{kind}"
        );
        assert_eq!(
            results["C"].as_slice(),
            intervals(&[(1, 4), (10, 14), (96, 1000)]),
            "{kind}"
        );
    }
}

#[test]
fn test_extract_with_explicit_safe_values() {
    let attributes: Vec<String> = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();
    let doms = domains(&[("A", 1, 1000), ("B", 1, 1000), ("C", 1, 1000)]);
    let compiled = compile(
        "A < 10 OR 20 <= A < 30 OR 40 <= A < 50 OR A > 60 OR A = 15 OR \
         B < 50 OR 60 <= B < 70 OR 80 <= B < 90 OR B > 100 OR B = 85 OR \
         C < 100 OR 200 <= C < 300 OR 400 <= C < 500 OR C > 600 OR C = 30",
        &doms,
    )
    .unwrap();
    let neutral = BTreeMap::from([
        ("A".to_string(), 55),
        ("B".to_string(), 75),
        ("C".to_string(), 350),
    ]);

    let results = extract_all(
        &mut Assignment::new(),
        &attributes,
        &doms,
        &neutral,
        &compiled,
        ExtractorKind::Recursive,
    )
    .unwrap();

    assert_eq!(
        results["A"].as_slice(),
        intervals(&[(1, 9), (15, 15), (20, 29), (40, 49), (61, 1000)])
    );
    assert_eq!(
        results["B"].as_slice(),
        intervals(&[(1, 49), (60, 69), (80, 89), (101, 1000)])
    );
    assert_eq!(
        results["C"].as_slice(),
        intervals(&[(1, 99), (200, 299), (400, 499), (601, 1000)])
    );
}
