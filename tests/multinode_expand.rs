//! The two-form bridge and the expander, checked for value
//! preservation: whatever the transforms rearrange, evaluation
//! under random bindings must not change.

use std::collections::HashMap;

use altair::ast::Expr;
use altair::eval::{Evaluator, Value};
use altair::expand::expand;
use altair::lexer::LexerConfig;
use altair::multinode::{binary_to_multinode, multinode_to_binary, MultiNode, TermSign};
use altair::parser::Parser;
use pretty_assertions::assert_eq;
use rand::Rng;

fn parse(source: &str) -> (Expr, Vec<String>) {
    Parser::from_source(source, LexerConfig::default())
        .unwrap()
        .parse()
        .unwrap()
}

fn random_bindings(variables: &[String], rng: &mut impl Rng) -> HashMap<String, Value> {
    variables
        .iter()
        .map(|name| {
            // Away from zero so divisions stay well-defined.
            let magnitude = rng.gen_range(0.5..4.0);
            let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
            (name.clone(), Value::Number(sign * magnitude))
        })
        .collect()
}

fn assert_value_preserved(source: &str, transform: impl Fn(&Expr) -> Expr) {
    let (tree, variables) = parse(source);
    let transformed = transform(&tree);
    let evaluator = Evaluator::default();
    let mut rng = rand::thread_rng();
    for _ in 0..10 {
        let bindings = random_bindings(&variables, &mut rng);
        let expected = evaluator.evaluate(&tree, &variables, &bindings).unwrap();
        let actual = evaluator
            .evaluate(&transformed, &variables, &bindings)
            .unwrap();
        assert!(
            (expected.as_number() - actual.as_number()).abs() < 1e-9,
            "value changed for {source}: {expected:?} vs {actual:?}"
        );
    }
}

const EXPRESSIONS: [&str; 8] = [
    "a+b-c",
    "a-(b+c)",
    "a*b/c",
    "a/(b/c)",
    "2x(y+1)",
    "(a+b)*(a-b)",
    "(a+b)/c*d",
    "-(a-b)^2+SIN(a*b)",
];

#[test]
fn the_round_trip_through_multinode_preserves_value() {
    for source in EXPRESSIONS {
        assert_value_preserved(source, |tree| {
            multinode_to_binary(&binary_to_multinode(tree)).unwrap()
        });
    }
}

#[test]
fn expansion_preserves_value() {
    for source in EXPRESSIONS {
        assert_value_preserved(source, |tree| {
            let expanded = expand(&binary_to_multinode(tree)).unwrap();
            multinode_to_binary(&expanded).unwrap()
        });
    }
}

#[test]
fn a_product_of_sums_expands_to_four_plus_terms() {
    let (tree, _) = parse("(a+b)(c+d)");
    let expanded = expand(&binary_to_multinode(&tree)).unwrap();
    match &expanded {
        MultiNode::Sum { children } => {
            assert_eq!(children.len(), 4);
            assert!(children.iter().all(|c| c.sign == TermSign::Plus));
            for child in children {
                match &child.node {
                    MultiNode::Product { children } => assert_eq!(children.len(), 2),
                    other => panic!("expected a two-factor product, got {other:?}"),
                }
            }
        }
        other => panic!("expected a sum, got {other:?}"),
    }
}

#[test]
fn refolding_the_expanded_difference_of_squares_sorts_factors() {
    let (tree, _) = parse("(a+b)*(a-b)");
    let expanded = expand(&binary_to_multinode(&tree)).unwrap();
    let refolded = multinode_to_binary(&expanded).unwrap();
    // The third term arrives as b*a and is sorted back to a*b.
    assert_eq!(refolded.to_string(), "(((a*a)-(a*b))+(a*b))-(b*b)");
}

#[test]
fn expanded_trees_can_take_another_lap() {
    // Expansion is idempotent on an already-expanded tree.
    let (tree, _) = parse("(a+b)(c+d)");
    let once = expand(&binary_to_multinode(&tree)).unwrap();
    let twice = expand(&once).unwrap();
    assert_eq!(once, twice);
}
