//! LaTeX emission for binary and multinode trees.
//!
//! The emitters re-introduce the parentheses traditional notation
//! requires: a parenthesized child is wrapped in
//! `\left(…\right)` according to its position (multiplicand,
//! multiplicator, addend, subtrahend, unary-minus child, power
//! base, boolean operand). Division renders as `\frac`,
//! exponentiation as `…^{…}`, explicit multiplication as `\cdot`,
//! and implicit multiplication as bare juxtaposition (math mode
//! ignores the separating space).

use crate::ast::{BinaryOp, BoolOp, CompareOp, Expr, ExprKind, MathConst, MathFunction};
use crate::multinode::{FactorRole, MultiNode, TermSign};

/// Renders a binary tree as a LaTeX string.
pub fn render_binary(expr: &Expr) -> String {
    let mut out = String::new();
    emit(expr, &mut out);
    out
}

/// Renders a multinode tree as a LaTeX string. Sums appear in
/// `\left[…\right]` with per-child signs; products as a
/// `\cdot`-joined factor list, or `\frac` when denominators exist.
pub fn render_multinode(node: &MultiNode) -> String {
    let mut out = String::new();
    emit_multi(node, &mut out);
    out
}

fn const_latex(which: MathConst) -> &'static str {
    match which {
        MathConst::E => "\\mathrm{e}",
        MathConst::Pi => "\\pi",
    }
}

fn function_latex(which: MathFunction) -> &'static str {
    match which {
        MathFunction::Abs => "\\left|",
        MathFunction::Sqrt => "\\sqrt",
        MathFunction::Exp => "\\exp",
        MathFunction::Ln => "\\ln",
        MathFunction::Log10 => "\\lg",
        MathFunction::Sin => "\\sin",
        MathFunction::Cos => "\\cos",
        MathFunction::Tan => "\\tan",
        MathFunction::Asin => "\\arcsin",
        MathFunction::Acos => "\\arccos",
        MathFunction::Atan => "\\arctan",
    }
}

fn compare_latex(op: CompareOp) -> &'static str {
    match op {
        CompareOp::Equal => "=",
        CompareOp::Greater => ">",
        CompareOp::GreaterEqual => "\\geq ",
        CompareOp::Less => "<",
        CompareOp::LessEqual => "\\leq ",
        CompareOp::NotEqual => "\\neq ",
    }
}

fn emit(e: &Expr, out: &mut String) {
    match &e.kind {
        ExprKind::Number { value } => out.push_str(value),
        ExprKind::Variable { name } => out.push_str(name),
        ExprKind::Const { which } => out.push_str(const_latex(*which)),
        ExprKind::UnaryMinus { child } => {
            out.push('-');
            emit_wrapped_if(child, is_additive(child), out);
        }
        ExprKind::Binary { op, left, right } => emit_binary(*op, left, right, out),
        ExprKind::Compare { op, left, right } => {
            emit(left, out);
            out.push_str(compare_latex(*op));
            emit(right, out);
        }
        ExprKind::Bool { op, left, right } => match op {
            BoolOp::And => {
                emit_wrapped_if(left, is_or(left), out);
                out.push_str("\\wedge ");
                emit_wrapped_if(right, is_or(right) || is_and(right), out);
            }
            BoolOp::Or => {
                emit(left, out);
                out.push_str("\\vee ");
                emit_wrapped_if(right, is_or(right), out);
            }
        },
        ExprKind::Funct { which, arg } => emit_function(*which, |out| emit(arg, out), out),
    }
}

fn emit_binary(op: BinaryOp, left: &Expr, right: &Expr, out: &mut String) {
    match op {
        BinaryOp::Add => {
            emit(left, out);
            out.push('+');
            emit_wrapped_if(right, is_add(right) || is_neg(right), out);
        }
        BinaryOp::Sub => {
            emit(left, out);
            out.push('-');
            emit_wrapped_if(right, is_additive(right), out);
        }
        BinaryOp::Mul | BinaryOp::ImplicitMul => {
            emit_wrapped_if(left, is_add_or_sub(left), out);
            if op == BinaryOp::Mul {
                out.push_str("\\cdot ");
            } else {
                out.push(' ');
            }
            emit_wrapped_if(right, is_additive(right) || is_mul(right), out);
        }
        BinaryOp::Div => {
            out.push_str("\\frac{");
            emit(left, out);
            out.push_str("}{");
            emit(right, out);
            out.push('}');
        }
        BinaryOp::Pow => {
            emit_wrapped_if(left, !is_power_safe_base(left), out);
            out.push_str("^{");
            emit(right, out);
            out.push('}');
        }
    }
}

fn emit_function(which: MathFunction, emit_arg: impl Fn(&mut String), out: &mut String) {
    match which {
        MathFunction::Sqrt => {
            out.push_str("\\sqrt{");
            emit_arg(out);
            out.push('}');
        }
        MathFunction::Abs => {
            out.push_str("\\left|");
            emit_arg(out);
            out.push_str("\\right|");
        }
        other => {
            out.push_str(function_latex(other));
            out.push_str("\\left(");
            emit_arg(out);
            out.push_str("\\right)");
        }
    }
}

fn emit_wrapped_if(e: &Expr, wrap: bool, out: &mut String) {
    if wrap {
        out.push_str("\\left(");
        emit(e, out);
        out.push_str("\\right)");
    } else {
        emit(e, out);
    }
}

fn is_add(e: &Expr) -> bool {
    matches!(
        e.kind,
        ExprKind::Binary {
            op: BinaryOp::Add,
            ..
        }
    )
}

fn is_add_or_sub(e: &Expr) -> bool {
    matches!(
        e.kind,
        ExprKind::Binary {
            op: BinaryOp::Add | BinaryOp::Sub,
            ..
        }
    )
}

fn is_neg(e: &Expr) -> bool {
    matches!(e.kind, ExprKind::UnaryMinus { .. })
}

fn is_additive(e: &Expr) -> bool {
    is_add_or_sub(e) || is_neg(e)
}

fn is_mul(e: &Expr) -> bool {
    matches!(
        e.kind,
        ExprKind::Binary {
            op: BinaryOp::Mul | BinaryOp::ImplicitMul,
            ..
        }
    )
}

fn is_power_safe_base(e: &Expr) -> bool {
    matches!(
        e.kind,
        ExprKind::Number { .. }
            | ExprKind::Variable { .. }
            | ExprKind::Const { .. }
            | ExprKind::Funct { .. }
    )
}

fn is_and(e: &Expr) -> bool {
    matches!(
        e.kind,
        ExprKind::Bool {
            op: BoolOp::And,
            ..
        }
    )
}

fn is_or(e: &Expr) -> bool {
    matches!(
        e.kind,
        ExprKind::Bool {
            op: BoolOp::Or,
            ..
        }
    )
}

fn emit_multi(node: &MultiNode, out: &mut String) {
    match node {
        MultiNode::Number { value } => out.push_str(value),
        MultiNode::Variable { name } => out.push_str(name),
        MultiNode::Const { which } => out.push_str(const_latex(*which)),
        MultiNode::UnaryMinus { child } => {
            out.push('-');
            if matches!(**child, MultiNode::UnaryMinus { .. }) {
                out.push_str("\\left(");
                emit_multi(child, out);
                out.push_str("\\right)");
            } else {
                emit_multi(child, out);
            }
        }
        MultiNode::Power { base, exponent } => {
            let safe = matches!(
                **base,
                MultiNode::Number { .. }
                    | MultiNode::Variable { .. }
                    | MultiNode::Const { .. }
                    | MultiNode::Funct { .. }
            );
            if safe {
                emit_multi(base, out);
            } else {
                out.push_str("\\left(");
                emit_multi(base, out);
                out.push_str("\\right)");
            }
            out.push_str("^{");
            emit_multi(exponent, out);
            out.push('}');
        }
        MultiNode::Compare { op, left, right } => {
            emit_multi(left, out);
            out.push_str(compare_latex(*op));
            emit_multi(right, out);
        }
        MultiNode::Bool { op, left, right } => {
            emit_multi(left, out);
            out.push_str(match op {
                BoolOp::And => "\\wedge ",
                BoolOp::Or => "\\vee ",
            });
            emit_multi(right, out);
        }
        MultiNode::Funct { which, arg } => {
            emit_function(*which, |out| emit_multi(arg, out), out)
        }
        MultiNode::Sum { children } => {
            out.push_str("\\left[");
            for (i, summand) in children.iter().enumerate() {
                match summand.sign {
                    TermSign::Plus => {
                        if i > 0 {
                            out.push('+');
                        }
                    }
                    TermSign::Minus => out.push('-'),
                }
                emit_multi(&summand.node, out);
            }
            out.push_str("\\right]");
        }
        MultiNode::Product { children } => {
            let numerators: Vec<&MultiNode> = children
                .iter()
                .filter(|f| f.role == FactorRole::Numerator)
                .map(|f| &f.node)
                .collect();
            let denominators: Vec<&MultiNode> = children
                .iter()
                .filter(|f| f.role == FactorRole::Denominator)
                .map(|f| &f.node)
                .collect();
            if denominators.is_empty() {
                emit_factor_list(&numerators, out);
            } else {
                out.push_str("\\frac{");
                emit_factor_list(&numerators, out);
                out.push_str("}{");
                emit_factor_list(&denominators, out);
                out.push('}');
            }
        }
    }
}

fn emit_factor_list(nodes: &[&MultiNode], out: &mut String) {
    if nodes.is_empty() {
        out.push('1');
        return;
    }
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            out.push_str("\\cdot ");
        }
        emit_multi(node, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::LexerConfig;
    use crate::multinode::binary_to_multinode;
    use crate::parser::Parser;
    use pretty_assertions::assert_eq;

    fn latex(source: &str) -> String {
        let (tree, _) = Parser::from_source(source, LexerConfig::default())
            .unwrap()
            .parse()
            .unwrap();
        render_binary(&tree)
    }

    fn latex_multi(source: &str) -> String {
        let (tree, _) = Parser::from_source(source, LexerConfig::default())
            .unwrap()
            .parse()
            .unwrap();
        render_multinode(&binary_to_multinode(&tree))
    }

    #[test]
    fn multiplication_parenthesizes_additive_operands() {
        assert_eq!(latex("(a+b)*c"), "\\left(a+b\\right)\\cdot c");
        assert_eq!(latex("a*(b*c)"), "a\\cdot \\left(b\\cdot c\\right)");
        assert_eq!(latex("2*x"), "2\\cdot x");
        assert_eq!(latex("2x"), "2 x");
    }

    #[test]
    fn subtraction_parenthesizes_compound_subtrahends() {
        assert_eq!(latex("a-(b+c)"), "a-\\left(b+c\\right)");
        assert_eq!(latex("a-(b-c)"), "a-\\left(b-c\\right)");
        assert_eq!(latex("a+(b+c)"), "a+\\left(b+c\\right)");
        assert_eq!(latex("a+b-c"), "a+b-c");
    }

    #[test]
    fn unary_minus_wraps_additive_children() {
        assert_eq!(latex("-(a+b)"), "-\\left(a+b\\right)");
        assert_eq!(latex("-x"), "-x");
    }

    #[test]
    fn division_renders_as_frac() {
        assert_eq!(latex("a/b"), "\\frac{a}{b}");
        assert_eq!(latex("(a+b)/(c+d)"), "\\frac{a+b}{c+d}");
    }

    #[test]
    fn powers_brace_the_exponent_and_guard_the_base() {
        assert_eq!(latex("x^2"), "x^{2}");
        assert_eq!(latex("(a+b)^2"), "\\left(a+b\\right)^{2}");
        assert_eq!(latex("2^3^2"), "2^{3^{2}}");
        assert_eq!(latex("SIN(x)^2"), "\\sin\\left(x\\right)^{2}");
    }

    #[test]
    fn special_function_renderings() {
        assert_eq!(latex("SQRT(x+1)"), "\\sqrt{x+1}");
        assert_eq!(latex("ABS(x)"), "\\left|x\\right|");
        assert_eq!(latex("ASIN(x)"), "\\arcsin\\left(x\\right)");
        assert_eq!(latex("LOG(x)"), "\\lg\\left(x\\right)");
    }

    #[test]
    fn constants_render_as_commands() {
        assert_eq!(latex("EPI"), "\\mathrm{e} \\pi");
        assert_eq!(latex("2PI"), "2 \\pi");
    }

    #[test]
    fn comparisons_and_booleans() {
        assert_eq!(latex("x>=1"), "x\\geq 1");
        assert_eq!(latex("x<>y"), "x\\neq y");
        assert_eq!(
            latex("[a=1|b=2]&c=3"),
            "\\left(a=1\\vee b=2\\right)\\wedge c=3"
        );
        assert_eq!(latex("a=1|b=2"), "a=1\\vee b=2");
    }

    #[test]
    fn multinode_sums_use_square_brackets() {
        assert_eq!(latex_multi("a+b-c"), "\\left[a+b-c\\right]");
        assert_eq!(latex_multi("-a+b"), "\\left[-a+b\\right]");
    }

    #[test]
    fn multinode_products_split_over_frac() {
        assert_eq!(latex_multi("a*b/c"), "\\frac{a\\cdot b}{c}");
        assert_eq!(latex_multi("a*b"), "a\\cdot b");
        assert_eq!(latex_multi("1/x/y"), "\\frac{1}{x\\cdot y}");
    }
}
