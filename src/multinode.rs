//! The multinode form: commutative chains collapsed to one node.
//!
//! A run of `+`/`-`/unary-minus in the binary tree becomes a single
//! [`MultiNode::Sum`] whose children carry their own signs; a run
//! of `*`/implicit-`*`/`/` becomes a single [`MultiNode::Product`]
//! whose children are tagged numerator or denominator. Everything
//! else (powers, comparisons, boolean operators, function calls)
//! keeps its shape with converted children. The reverse transform
//! re-folds chains into left-leaning binary operators after putting
//! product children into a deterministic order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::ast::{BinaryOp, BoolOp, CompareOp, Expr, ExprKind, MathConst, MathFunction};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TermSign {
    Plus,
    Minus,
}

impl TermSign {
    pub fn flipped(self) -> TermSign {
        match self {
            TermSign::Plus => TermSign::Minus,
            TermSign::Minus => TermSign::Plus,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactorRole {
    Numerator,
    Denominator,
}

impl FactorRole {
    pub fn flipped(self) -> FactorRole {
        match self {
            FactorRole::Numerator => FactorRole::Denominator,
            FactorRole::Denominator => FactorRole::Numerator,
        }
    }
}

/// A signed child of a [`MultiNode::Sum`]. The child is never
/// itself a holder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summand {
    pub sign: TermSign,
    pub node: MultiNode,
}

/// A numerator- or denominator-sided child of a
/// [`MultiNode::Product`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    pub role: FactorRole,
    pub node: MultiNode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MultiNode {
    Number { value: String },
    Variable { name: String },
    Const { which: MathConst },
    UnaryMinus { child: Box<MultiNode> },
    Power {
        base: Box<MultiNode>,
        exponent: Box<MultiNode>,
    },
    Compare {
        op: CompareOp,
        left: Box<MultiNode>,
        right: Box<MultiNode>,
    },
    Bool {
        op: BoolOp,
        left: Box<MultiNode>,
        right: Box<MultiNode>,
    },
    Funct { which: MathFunction, arg: Box<MultiNode> },
    /// At least two signed summands.
    Sum { children: Vec<Summand> },
    /// At least two role-tagged factors.
    Product { children: Vec<Factor> },
}

/// Converts a binary tree to multinode form.
pub fn binary_to_multinode(expr: &Expr) -> MultiNode {
    convert(expr)
}

fn convert(e: &Expr) -> MultiNode {
    match &e.kind {
        ExprKind::Binary {
            op: BinaryOp::Add | BinaryOp::Sub,
            ..
        }
        | ExprKind::UnaryMinus { .. } => convert_sum_chain(e),
        ExprKind::Binary {
            op: BinaryOp::Mul | BinaryOp::ImplicitMul | BinaryOp::Div,
            ..
        } => convert_term_chain(e),
        ExprKind::Binary {
            op: BinaryOp::Pow,
            left,
            right,
        } => MultiNode::Power {
            base: Box::new(convert(left)),
            exponent: Box::new(convert(right)),
        },
        ExprKind::Number { value } => MultiNode::Number {
            value: value.clone(),
        },
        ExprKind::Variable { name } => MultiNode::Variable { name: name.clone() },
        ExprKind::Const { which } => MultiNode::Const { which: *which },
        ExprKind::Compare { op, left, right } => MultiNode::Compare {
            op: *op,
            left: Box::new(convert(left)),
            right: Box::new(convert(right)),
        },
        ExprKind::Bool { op, left, right } => MultiNode::Bool {
            op: *op,
            left: Box::new(convert(left)),
            right: Box::new(convert(right)),
        },
        ExprKind::Funct { which, arg } => MultiNode::Funct {
            which: *which,
            arg: Box::new(convert(arg)),
        },
    }
}

fn convert_sum_chain(e: &Expr) -> MultiNode {
    let mut leaves = Vec::new();
    collect_terms(e, TermSign::Plus, &mut leaves);
    if leaves.len() == 1 {
        // A chain of one leaf gets no wrapper; a lone minus sign
        // survives as a unary minus.
        let (sign, leaf) = leaves.remove(0);
        let node = convert(leaf);
        return match sign {
            TermSign::Plus => node,
            TermSign::Minus => MultiNode::UnaryMinus {
                child: Box::new(node),
            },
        };
    }
    MultiNode::Sum {
        children: leaves
            .into_iter()
            .map(|(sign, leaf)| Summand {
                sign,
                node: convert(leaf),
            })
            .collect(),
    }
}

/// Walks the contiguous top-level run of `+`/`-`/unary-minus.
/// Crossing the right side of a subtraction or a unary minus flips
/// the sign of everything underneath.
fn collect_terms<'a>(e: &'a Expr, sign: TermSign, out: &mut Vec<(TermSign, &'a Expr)>) {
    match &e.kind {
        ExprKind::Binary {
            op: BinaryOp::Add,
            left,
            right,
        } => {
            collect_terms(left, sign, out);
            collect_terms(right, sign, out);
        }
        ExprKind::Binary {
            op: BinaryOp::Sub,
            left,
            right,
        } => {
            collect_terms(left, sign, out);
            collect_terms(right, sign.flipped(), out);
        }
        ExprKind::UnaryMinus { child } => collect_terms(child, sign.flipped(), out),
        _ => out.push((sign, e)),
    }
}

fn convert_term_chain(e: &Expr) -> MultiNode {
    let mut leaves = Vec::new();
    collect_factors(e, FactorRole::Numerator, &mut leaves);
    if leaves.len() == 1 {
        // Unreachable from parsed trees (every product or division
        // contributes two factors) but kept total.
        let (_, leaf) = leaves.remove(0);
        return convert(leaf);
    }
    MultiNode::Product {
        children: leaves
            .into_iter()
            .map(|(role, leaf)| Factor {
                role,
                node: convert(leaf),
            })
            .collect(),
    }
}

/// Walks the contiguous top-level run of `*`/implicit-`*`/`/`.
/// Crossing the right side of a division flips numerator and
/// denominator underneath.
fn collect_factors<'a>(e: &'a Expr, role: FactorRole, out: &mut Vec<(FactorRole, &'a Expr)>) {
    match &e.kind {
        ExprKind::Binary {
            op: BinaryOp::Mul | BinaryOp::ImplicitMul,
            left,
            right,
        } => {
            collect_factors(left, role, out);
            collect_factors(right, role, out);
        }
        ExprKind::Binary {
            op: BinaryOp::Div,
            left,
            right,
        } => {
            collect_factors(left, role, out);
            collect_factors(right, role.flipped(), out);
        }
        _ => out.push((role, e)),
    }
}

/// Converts back to a binary tree, all nodes synthetic. Product
/// children are first put into the canonical order: numerators
/// before denominators, and within a role numbers ascending by
/// value, then constants, then variables ascending by first
/// character, then everything else in original order.
pub fn multinode_to_binary(node: &MultiNode) -> Result<Expr> {
    match node {
        MultiNode::Number { value } => Ok(Expr::number(value.clone(), None)),
        MultiNode::Variable { name } => Ok(Expr::variable(name.clone(), None)),
        MultiNode::Const { which } => Ok(Expr::constant(*which, None)),
        MultiNode::UnaryMinus { child } => {
            Ok(Expr::unary_minus(multinode_to_binary(child)?, None))
        }
        MultiNode::Power { base, exponent } => Ok(Expr::binary(
            BinaryOp::Pow,
            multinode_to_binary(base)?,
            multinode_to_binary(exponent)?,
            None,
        )),
        MultiNode::Compare { op, left, right } => Ok(Expr::compare(
            *op,
            multinode_to_binary(left)?,
            multinode_to_binary(right)?,
            None,
        )),
        MultiNode::Bool { op, left, right } => Ok(Expr::boolean(
            *op,
            multinode_to_binary(left)?,
            multinode_to_binary(right)?,
            None,
        )),
        MultiNode::Funct { which, arg } => {
            Ok(Expr::funct(*which, multinode_to_binary(arg)?, None))
        }
        MultiNode::Sum { children } => refold_sum(children),
        MultiNode::Product { children } => refold_product(children),
    }
}

fn refold_sum(children: &[Summand]) -> Result<Expr> {
    let mut iter = children.iter();
    let first = iter.next().ok_or(Error::EmptyMultinodeTree)?;
    let mut node = match first.sign {
        TermSign::Plus => multinode_to_binary(&first.node)?,
        TermSign::Minus => Expr::unary_minus(multinode_to_binary(&first.node)?, None),
    };
    for summand in iter {
        let right = multinode_to_binary(&summand.node)?;
        let op = match summand.sign {
            TermSign::Plus => BinaryOp::Add,
            TermSign::Minus => BinaryOp::Sub,
        };
        node = Expr::binary(op, node, right, None);
    }
    Ok(node)
}

fn refold_product(children: &[Factor]) -> Result<Expr> {
    if children.is_empty() {
        return Err(Error::EmptyMultinodeTree);
    }
    let mut ordered: Vec<&Factor> = children.iter().collect();
    ordered.sort_by(|a, b| factor_order(a, b));

    let mut numerator: Option<Expr> = None;
    let mut denominator: Option<Expr> = None;
    for factor in ordered {
        let operand = multinode_to_binary(&factor.node)?;
        let slot = match factor.role {
            FactorRole::Numerator => &mut numerator,
            FactorRole::Denominator => &mut denominator,
        };
        *slot = Some(match slot.take() {
            None => operand,
            Some(acc) => Expr::binary(BinaryOp::Mul, acc, operand, None),
        });
    }
    let numerator = numerator.unwrap_or_else(|| Expr::number("1", None));
    Ok(match denominator {
        None => numerator,
        Some(denominator) => Expr::binary(BinaryOp::Div, numerator, denominator, None),
    })
}

fn factor_order(a: &Factor, b: &Factor) -> Ordering {
    role_rank(a.role)
        .cmp(&role_rank(b.role))
        .then_with(|| class_rank(&a.node).cmp(&class_rank(&b.node)))
        .then_with(|| match (&a.node, &b.node) {
            (MultiNode::Number { value: va }, MultiNode::Number { value: vb }) => {
                let x: f64 = va.parse().unwrap_or(0.0);
                let y: f64 = vb.parse().unwrap_or(0.0);
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
            (MultiNode::Variable { name: na }, MultiNode::Variable { name: nb }) => {
                na.chars().next().cmp(&nb.chars().next())
            }
            _ => Ordering::Equal,
        })
}

fn role_rank(role: FactorRole) -> u8 {
    match role {
        FactorRole::Numerator => 0,
        FactorRole::Denominator => 1,
    }
}

fn class_rank(node: &MultiNode) -> u8 {
    match node {
        MultiNode::Number { .. } => 0,
        MultiNode::Const { .. } => 1,
        MultiNode::Variable { .. } => 2,
        _ => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::LexerConfig;
    use crate::parser::Parser;
    use pretty_assertions::assert_eq;

    fn to_multinode(source: &str) -> MultiNode {
        let (tree, _) = Parser::from_source(source, LexerConfig::default())
            .unwrap()
            .parse()
            .unwrap();
        binary_to_multinode(&tree)
    }

    fn signs_of(node: &MultiNode) -> Vec<TermSign> {
        match node {
            MultiNode::Sum { children } => children.iter().map(|c| c.sign).collect(),
            other => panic!("expected a sum, got {other:?}"),
        }
    }

    #[test]
    fn subtraction_flips_everything_to_its_right() {
        let node = to_multinode("a-(b+c)");
        assert_eq!(
            signs_of(&node),
            vec![TermSign::Plus, TermSign::Minus, TermSign::Minus]
        );
    }

    #[test]
    fn a_lone_minus_survives_as_unary_minus() {
        let node = to_multinode("-x");
        assert!(matches!(node, MultiNode::UnaryMinus { .. }));
        let node = to_multinode("-(-x)");
        assert!(matches!(node, MultiNode::Variable { .. }));
    }

    #[test]
    fn negated_sums_are_spliced_with_flipped_signs() {
        let node = to_multinode("-(a+b)");
        assert_eq!(signs_of(&node), vec![TermSign::Minus, TermSign::Minus]);
    }

    #[test]
    fn division_assigns_denominator_roles() {
        let node = to_multinode("a*b/c");
        match &node {
            MultiNode::Product { children } => {
                let roles: Vec<FactorRole> = children.iter().map(|c| c.role).collect();
                assert_eq!(
                    roles,
                    vec![
                        FactorRole::Numerator,
                        FactorRole::Numerator,
                        FactorRole::Denominator
                    ]
                );
            }
            other => panic!("expected a product, got {other:?}"),
        }
    }

    #[test]
    fn dividing_by_a_fraction_flips_twice() {
        let node = to_multinode("a/(b/c)");
        match &node {
            MultiNode::Product { children } => {
                let roles: Vec<FactorRole> = children.iter().map(|c| c.role).collect();
                assert_eq!(
                    roles,
                    vec![
                        FactorRole::Numerator,
                        FactorRole::Denominator,
                        FactorRole::Numerator
                    ]
                );
            }
            other => panic!("expected a product, got {other:?}"),
        }
    }

    #[test]
    fn refold_orders_numbers_constants_variables() {
        let node = to_multinode("x*3*PI*2");
        let back = multinode_to_binary(&node).unwrap();
        assert_eq!(back.to_string(), "((2*3)*PI)*x");
    }

    #[test]
    fn refold_moves_denominators_behind_a_single_divide() {
        let node = to_multinode("a/c*b");
        let back = multinode_to_binary(&node).unwrap();
        assert_eq!(back.to_string(), "(a*b)/c");
    }

    #[test]
    fn refold_synthesizes_a_unit_numerator() {
        let product = MultiNode::Product {
            children: vec![Factor {
                role: FactorRole::Denominator,
                node: MultiNode::Variable {
                    name: "x".to_string(),
                },
            }],
        };
        let back = multinode_to_binary(&product).unwrap();
        assert_eq!(back.to_string(), "1/x");
    }

    #[test]
    fn empty_multinodes_are_rejected_on_the_way_back() {
        let empty = MultiNode::Sum { children: vec![] };
        assert_eq!(multinode_to_binary(&empty), Err(Error::EmptyMultinodeTree));
        let empty = MultiNode::Product { children: vec![] };
        assert_eq!(multinode_to_binary(&empty), Err(Error::EmptyMultinodeTree));
    }

    #[test]
    fn refold_uses_unary_minus_only_on_a_leading_minus() {
        let node = to_multinode("-a+b");
        let back = multinode_to_binary(&node).unwrap();
        assert_eq!(back.to_string(), "(-a)+b");
    }

    #[test]
    fn powers_and_functions_keep_their_shape() {
        let node = to_multinode("(a+b)^2+SIN(x*y)");
        match &node {
            MultiNode::Sum { children } => {
                assert!(matches!(children[0].node, MultiNode::Power { .. }));
                assert!(matches!(children[1].node, MultiNode::Funct { .. }));
            }
            other => panic!("expected a sum, got {other:?}"),
        }
    }
}
