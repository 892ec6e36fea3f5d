//! The binary expression tree produced by the parser.
//!
//! Every node carries its kind and the byte offset of its first
//! token in the source string (`None` for nodes synthesized by a
//! transform). Negation is always a [`ExprKind::UnaryMinus`] node;
//! numeric literals are stored as their non-negative decimal text.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    /// Multiplication inserted by the lexer between juxtaposed
    /// operands; kept separate from [`BinaryOp::Mul`] so emitters
    /// can render `2x` instead of `2\cdot x`.
    ImplicitMul,
    Div,
    Pow,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul | BinaryOp::ImplicitMul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "^",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    Equal,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    NotEqual,
}

impl CompareOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Equal => "=",
            CompareOp::Greater => ">",
            CompareOp::GreaterEqual => ">=",
            CompareOp::Less => "<",
            CompareOp::LessEqual => "<=",
            CompareOp::NotEqual => "<>",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoolOp {
    And,
    Or,
}

impl BoolOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BoolOp::And => "&",
            BoolOp::Or => "|",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MathConst {
    E,
    Pi,
}

impl MathConst {
    /// Source spelling, as the lexer reads it.
    pub fn name(&self) -> &'static str {
        match self {
            MathConst::E => "E",
            MathConst::Pi => "PI",
        }
    }

    pub fn value(&self) -> f64 {
        match self {
            MathConst::E => std::f64::consts::E,
            MathConst::Pi => std::f64::consts::PI,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MathFunction {
    Abs,
    Sqrt,
    Exp,
    Ln,
    Log10,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
}

impl MathFunction {
    /// Source spelling, as the lexer reads it.
    pub fn name(&self) -> &'static str {
        match self {
            MathFunction::Abs => "ABS",
            MathFunction::Sqrt => "SQRT",
            MathFunction::Exp => "EXP",
            MathFunction::Ln => "LN",
            MathFunction::Log10 => "LOG",
            MathFunction::Sin => "SIN",
            MathFunction::Cos => "COS",
            MathFunction::Tan => "TAN",
            MathFunction::Asin => "ASIN",
            MathFunction::Acos => "ACOS",
            MathFunction::Atan => "ATAN",
        }
    }

    pub fn from_name(name: &str) -> Option<MathFunction> {
        match name {
            "ABS" => Some(MathFunction::Abs),
            "SQRT" => Some(MathFunction::Sqrt),
            "EXP" => Some(MathFunction::Exp),
            "LN" => Some(MathFunction::Ln),
            "LOG" => Some(MathFunction::Log10),
            "SIN" => Some(MathFunction::Sin),
            "COS" => Some(MathFunction::Cos),
            "TAN" => Some(MathFunction::Tan),
            "ASIN" => Some(MathFunction::Asin),
            "ACOS" => Some(MathFunction::Acos),
            "ATAN" => Some(MathFunction::Atan),
            _ => None,
        }
    }
}

/// A node of the binary tree: a kind plus the source offset of its
/// first token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub pos: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    /// A non-negative decimal literal, stored as written (possibly
    /// with one decimal point).
    Number { value: String },
    Variable { name: String },
    Const { which: MathConst },
    UnaryMinus { child: Box<Expr> },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Compare {
        op: CompareOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Bool {
        op: BoolOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Funct { which: MathFunction, arg: Box<Expr> },
}

impl Expr {
    pub fn number(value: impl Into<String>, pos: Option<usize>) -> Expr {
        Expr {
            kind: ExprKind::Number {
                value: value.into(),
            },
            pos,
        }
    }

    pub fn variable(name: impl Into<String>, pos: Option<usize>) -> Expr {
        Expr {
            kind: ExprKind::Variable { name: name.into() },
            pos,
        }
    }

    pub fn constant(which: MathConst, pos: Option<usize>) -> Expr {
        Expr {
            kind: ExprKind::Const { which },
            pos,
        }
    }

    pub fn unary_minus(child: Expr, pos: Option<usize>) -> Expr {
        Expr {
            kind: ExprKind::UnaryMinus {
                child: Box::new(child),
            },
            pos,
        }
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr, pos: Option<usize>) -> Expr {
        Expr {
            kind: ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            pos,
        }
    }

    pub fn compare(op: CompareOp, left: Expr, right: Expr, pos: Option<usize>) -> Expr {
        Expr {
            kind: ExprKind::Compare {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            pos,
        }
    }

    pub fn boolean(op: BoolOp, left: Expr, right: Expr, pos: Option<usize>) -> Expr {
        Expr {
            kind: ExprKind::Bool {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            pos,
        }
    }

    pub fn funct(which: MathFunction, arg: Expr, pos: Option<usize>) -> Expr {
        Expr {
            kind: ExprKind::Funct {
                which,
                arg: Box::new(arg),
            },
            pos,
        }
    }

    /// A copy with every `pos` cleared; useful when comparing a
    /// parsed tree against a synthesized one.
    pub fn without_positions(&self) -> Expr {
        let kind = match &self.kind {
            ExprKind::Number { value } => ExprKind::Number {
                value: value.clone(),
            },
            ExprKind::Variable { name } => ExprKind::Variable { name: name.clone() },
            ExprKind::Const { which } => ExprKind::Const { which: *which },
            ExprKind::UnaryMinus { child } => ExprKind::UnaryMinus {
                child: Box::new(child.without_positions()),
            },
            ExprKind::Binary { op, left, right } => ExprKind::Binary {
                op: *op,
                left: Box::new(left.without_positions()),
                right: Box::new(right.without_positions()),
            },
            ExprKind::Compare { op, left, right } => ExprKind::Compare {
                op: *op,
                left: Box::new(left.without_positions()),
                right: Box::new(right.without_positions()),
            },
            ExprKind::Bool { op, left, right } => ExprKind::Bool {
                op: *op,
                left: Box::new(left.without_positions()),
                right: Box::new(right.without_positions()),
            },
            ExprKind::Funct { which, arg } => ExprKind::Funct {
                which: *which,
                arg: Box::new(arg.without_positions()),
            },
        };
        Expr { kind, pos: None }
    }
}

/// Canonical source-text rendering. Sub-expressions are
/// parenthesized whenever they are not atoms, so the output always
/// re-parses to the same tree; implicit multiplication is printed
/// as plain juxtaposition.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expr(self, f)
    }
}

fn write_expr(e: &Expr, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &e.kind {
        ExprKind::Number { value } => write!(f, "{value}"),
        ExprKind::Variable { name } => write!(f, "{name}"),
        ExprKind::Const { which } => write!(f, "{}", which.name()),
        ExprKind::UnaryMinus { child } => {
            write!(f, "-")?;
            write_operand(child, f)
        }
        ExprKind::Binary { op, left, right } => {
            write_operand(left, f)?;
            if *op != BinaryOp::ImplicitMul {
                write!(f, "{}", op.symbol())?;
            }
            write_operand(right, f)
        }
        ExprKind::Compare { op, left, right } => {
            write_operand(left, f)?;
            write!(f, "{}", op.symbol())?;
            write_operand(right, f)
        }
        ExprKind::Bool { op, left, right } => {
            write_bool_operand(left, f)?;
            write!(f, "{}", op.symbol())?;
            write_bool_operand(right, f)
        }
        ExprKind::Funct { which, arg } => {
            write!(f, "{}(", which.name())?;
            write_expr(arg, f)?;
            write!(f, ")")
        }
    }
}

fn write_operand(e: &Expr, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &e.kind {
        ExprKind::Number { .. }
        | ExprKind::Variable { .. }
        | ExprKind::Const { .. }
        | ExprKind::Funct { .. } => write_expr(e, f),
        _ => {
            write!(f, "(")?;
            write_expr(e, f)?;
            write!(f, ")")
        }
    }
}

fn write_bool_operand(e: &Expr, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &e.kind {
        ExprKind::Bool { .. } => {
            write!(f, "[")?;
            write_expr(e, f)?;
            write!(f, "]")
        }
        _ => write_expr(e, f),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_parenthesizes_compound_operands() {
        let tree = Expr::binary(
            BinaryOp::Mul,
            Expr::binary(
                BinaryOp::Add,
                Expr::variable("a", Some(0)),
                Expr::variable("b", Some(2)),
                Some(1),
            ),
            Expr::number("2", Some(5)),
            Some(4),
        );
        assert_eq!(tree.to_string(), "(a+b)*2");
    }

    #[test]
    fn display_prints_implicit_multiplication_as_juxtaposition() {
        let tree = Expr::binary(
            BinaryOp::ImplicitMul,
            Expr::number("2", None),
            Expr::variable("x", None),
            None,
        );
        assert_eq!(tree.to_string(), "2x");
    }

    #[test]
    fn without_positions_clears_every_node() {
        let tree = Expr::unary_minus(Expr::number("3", Some(1)), Some(0));
        let stripped = tree.without_positions();
        assert_eq!(stripped.pos, None);
        match stripped.kind {
            ExprKind::UnaryMinus { child } => assert_eq!(child.pos, None),
            _ => panic!("expected a unary minus"),
        }
    }
}
