//! Distributive expansion of multinode trees.
//!
//! Products of sums become sums of products, exhaustively, on the
//! multinode form: each product's numerator and denominator sides
//! are expanded separately and folded left-to-right with the
//! distributive product. Function arguments are descended into;
//! exponents are not — `(a+b)^2` survives expansion unchanged.

use crate::error::{Error, Result};
use crate::multinode::{Factor, FactorRole, MultiNode, Summand, TermSign};

pub fn expand(node: &MultiNode) -> Result<MultiNode> {
    match node {
        MultiNode::Product { children } => expand_product(children),
        MultiNode::Sum { children } => expand_sum(children),
        MultiNode::UnaryMinus { child } => match expand(child)? {
            MultiNode::Sum { children } => Ok(MultiNode::Sum {
                children: children
                    .into_iter()
                    .map(|s| Summand {
                        sign: s.sign.flipped(),
                        node: s.node,
                    })
                    .collect(),
            }),
            other => Ok(MultiNode::UnaryMinus {
                child: Box::new(other),
            }),
        },
        MultiNode::Funct { which, arg } => Ok(MultiNode::Funct {
            which: *which,
            arg: Box::new(expand(arg)?),
        }),
        MultiNode::Compare { op, left, right } => Ok(MultiNode::Compare {
            op: *op,
            left: Box::new(expand(left)?),
            right: Box::new(expand(right)?),
        }),
        MultiNode::Bool { op, left, right } => Ok(MultiNode::Bool {
            op: *op,
            left: Box::new(expand(left)?),
            right: Box::new(expand(right)?),
        }),
        // Leaves stay, and so do powers: exponents are never
        // distributed.
        other => Ok(other.clone()),
    }
}

fn expand_product(children: &[Factor]) -> Result<MultiNode> {
    let mut numerator: Option<MultiNode> = None;
    let mut denominator: Option<MultiNode> = None;
    for factor in children {
        let expanded = expand(&factor.node)?;
        let slot = match factor.role {
            FactorRole::Numerator => &mut numerator,
            FactorRole::Denominator => &mut denominator,
        };
        *slot = Some(match slot.take() {
            None => expanded,
            Some(acc) => distributive_product(&acc, &expanded)?,
        });
    }
    let numerator = numerator.unwrap_or(MultiNode::Number {
        value: "1".to_string(),
    });
    match denominator {
        None => Ok(numerator),
        Some(denominator) if is_one(&denominator) => Ok(numerator),
        Some(denominator) => Ok(MultiNode::Product {
            children: vec![
                Factor {
                    role: FactorRole::Numerator,
                    node: numerator,
                },
                Factor {
                    role: FactorRole::Denominator,
                    node: denominator,
                },
            ],
        }),
    }
}

fn expand_sum(children: &[Summand]) -> Result<MultiNode> {
    let mut out = Vec::with_capacity(children.len());
    for summand in children {
        match expand(&summand.node)? {
            // A child that expanded to a sum is spliced into the
            // parent; a minus holder flips the spliced signs.
            MultiNode::Sum { children: inner } => {
                for child in inner {
                    let sign = match summand.sign {
                        TermSign::Plus => child.sign,
                        TermSign::Minus => child.sign.flipped(),
                    };
                    out.push(Summand {
                        sign,
                        node: child.node,
                    });
                }
            }
            other => out.push(Summand {
                sign: summand.sign,
                node: other,
            }),
        }
    }
    Ok(MultiNode::Sum { children: out })
}

/// The flat product of two non-sum operands: their factor lists
/// concatenated, with bare operands wrapped as singleton numerator
/// holders. A nested fraction keeps its denominator factors.
fn simple_product(n1: &MultiNode, n2: &MultiNode) -> Result<MultiNode> {
    if matches!(n1, MultiNode::Sum { .. }) || matches!(n2, MultiNode::Sum { .. }) {
        return Err(Error::ExpectedTermMultinode);
    }
    let mut children = Vec::new();
    for operand in [n1, n2] {
        match operand {
            MultiNode::Product { children: inner } => children.extend(inner.iter().cloned()),
            other => children.push(Factor {
                role: FactorRole::Numerator,
                node: other.clone(),
            }),
        }
    }
    Ok(MultiNode::Product { children })
}

/// Distributivity at one level: sums multiply child-by-child (the
/// pair's sign is plus when the operand signs agree), a sum against
/// anything else distributes over the sum's children with signs
/// preserved, and two non-sums reduce to [`simple_product`].
fn distributive_product(n1: &MultiNode, n2: &MultiNode) -> Result<MultiNode> {
    match (n1, n2) {
        (MultiNode::Sum { children: c1 }, MultiNode::Sum { children: c2 }) => {
            let mut out = Vec::with_capacity(c1.len() * c2.len());
            for s1 in c1 {
                for s2 in c2 {
                    let sign = if s1.sign == s2.sign {
                        TermSign::Plus
                    } else {
                        TermSign::Minus
                    };
                    out.push(Summand {
                        sign,
                        node: simple_product(&s1.node, &s2.node)?,
                    });
                }
            }
            Ok(MultiNode::Sum { children: out })
        }
        (MultiNode::Sum { children }, other) => {
            let mut out = Vec::with_capacity(children.len());
            for s in children {
                out.push(Summand {
                    sign: s.sign,
                    node: simple_product(&s.node, other)?,
                });
            }
            Ok(MultiNode::Sum { children: out })
        }
        (other, MultiNode::Sum { children }) => {
            let mut out = Vec::with_capacity(children.len());
            for s in children {
                out.push(Summand {
                    sign: s.sign,
                    node: simple_product(other, &s.node)?,
                });
            }
            Ok(MultiNode::Sum { children: out })
        }
        (a, b) => simple_product(a, b),
    }
}

fn is_one(node: &MultiNode) -> bool {
    match node {
        MultiNode::Number { value } => value.parse::<f64>().map(|x| x == 1.0).unwrap_or(false),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::LexerConfig;
    use crate::multinode::binary_to_multinode;
    use crate::parser::Parser;
    use pretty_assertions::assert_eq;

    fn expand_source(source: &str) -> MultiNode {
        let (tree, _) = Parser::from_source(source, LexerConfig::default())
            .unwrap()
            .parse()
            .unwrap();
        expand(&binary_to_multinode(&tree)).unwrap()
    }

    fn variable(name: &str) -> MultiNode {
        MultiNode::Variable {
            name: name.to_string(),
        }
    }

    fn numerator_names(node: &MultiNode) -> Vec<String> {
        match node {
            MultiNode::Product { children } => children
                .iter()
                .map(|f| match &f.node {
                    MultiNode::Variable { name } => name.clone(),
                    other => panic!("expected a variable factor, got {other:?}"),
                })
                .collect(),
            other => panic!("expected a product, got {other:?}"),
        }
    }

    #[test]
    fn product_of_sums_becomes_a_four_term_sum() {
        let node = expand_source("(a+b)(c+d)");
        match &node {
            MultiNode::Sum { children } => {
                assert_eq!(children.len(), 4);
                assert!(children.iter().all(|c| c.sign == TermSign::Plus));
                let pairs: Vec<Vec<String>> =
                    children.iter().map(|c| numerator_names(&c.node)).collect();
                assert_eq!(
                    pairs,
                    vec![
                        vec!["a".to_string(), "c".to_string()],
                        vec!["a".to_string(), "d".to_string()],
                        vec!["b".to_string(), "c".to_string()],
                        vec!["b".to_string(), "d".to_string()],
                    ]
                );
            }
            other => panic!("expected a sum, got {other:?}"),
        }
    }

    #[test]
    fn signs_follow_the_cross_product() {
        let node = expand_source("(a+b)*(a-b)");
        match &node {
            MultiNode::Sum { children } => {
                let signs: Vec<TermSign> = children.iter().map(|c| c.sign).collect();
                assert_eq!(
                    signs,
                    vec![
                        TermSign::Plus,
                        TermSign::Minus,
                        TermSign::Plus,
                        TermSign::Minus
                    ]
                );
                let pairs: Vec<Vec<String>> =
                    children.iter().map(|c| numerator_names(&c.node)).collect();
                assert_eq!(
                    pairs,
                    vec![
                        vec!["a".to_string(), "a".to_string()],
                        vec!["a".to_string(), "b".to_string()],
                        vec!["b".to_string(), "a".to_string()],
                        vec!["b".to_string(), "b".to_string()],
                    ]
                );
            }
            other => panic!("expected a sum, got {other:?}"),
        }
    }

    #[test]
    fn powers_of_sums_are_left_alone() {
        let node = expand_source("(a+b)^2");
        assert!(matches!(node, MultiNode::Power { .. }));
    }

    #[test]
    fn denominators_are_expanded_separately() {
        let node = expand_source("(a+b)/c*d");
        match &node {
            MultiNode::Product { children } => {
                assert_eq!(children.len(), 2);
                assert_eq!(children[0].role, FactorRole::Numerator);
                assert!(matches!(children[0].node, MultiNode::Sum { .. }));
                assert_eq!(children[1].role, FactorRole::Denominator);
                assert_eq!(children[1].node, variable("c"));
            }
            other => panic!("expected a product, got {other:?}"),
        }
    }

    #[test]
    fn a_unit_denominator_disappears() {
        let node = expand_source("(a+b)/1");
        assert!(matches!(node, MultiNode::Sum { .. }));
    }

    #[test]
    fn function_arguments_are_descended() {
        let node = expand_source("SIN((a+b)(c+d))");
        match &node {
            MultiNode::Funct { arg, .. } => {
                assert!(matches!(**arg, MultiNode::Sum { .. }));
            }
            other => panic!("expected a function, got {other:?}"),
        }
    }

    #[test]
    fn nested_sums_are_spliced_with_sign_flips() {
        // a - (b + (c - d)) flattens to +a -b -c +d before any
        // product is involved; expansion keeps it flat.
        let node = expand_source("a-(b+(c-d))");
        match &node {
            MultiNode::Sum { children } => {
                let signs: Vec<TermSign> = children.iter().map(|c| c.sign).collect();
                assert_eq!(
                    signs,
                    vec![
                        TermSign::Plus,
                        TermSign::Minus,
                        TermSign::Minus,
                        TermSign::Plus
                    ]
                );
            }
            other => panic!("expected a sum, got {other:?}"),
        }
    }

    #[test]
    fn simple_product_refuses_sums() {
        let sum = MultiNode::Sum {
            children: vec![
                Summand {
                    sign: TermSign::Plus,
                    node: variable("a"),
                },
                Summand {
                    sign: TermSign::Plus,
                    node: variable("b"),
                },
            ],
        };
        assert_eq!(
            simple_product(&sum, &variable("c")),
            Err(Error::ExpectedTermMultinode)
        );
    }
}
