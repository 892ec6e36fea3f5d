//! Numeric evaluation of binary trees in IEEE-754 doubles.
//!
//! Comparisons yield booleans and arithmetic yields numbers; when
//! the two meet, a nonzero number is true and a boolean is 1 or 0.
//! `&` and `|` short-circuit. A division whose denominator is
//! within [`ZERO_DENOMINATOR_EPSILON`] of zero reports
//! [`Error::ZeroDenominator`] instead of producing an infinity.

use std::collections::HashMap;

use crate::ast::{BinaryOp, BoolOp, CompareOp, Expr, ExprKind, MathFunction};
use crate::error::{Error, Result};

/// Denominator magnitudes below this are treated as zero.
pub const ZERO_DENOMINATOR_EPSILON: f64 = 1e-30;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Number(f64),
    Boolean(bool),
}

impl Value {
    /// Truthiness: a boolean is itself, a number is true iff
    /// nonzero.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Number(x) => *x != 0.0,
            Value::Boolean(b) => *b,
        }
    }

    /// Numeric coercion: a boolean is 1 or 0.
    pub fn as_number(&self) -> f64 {
        match self {
            Value::Number(x) => *x,
            Value::Boolean(true) => 1.0,
            Value::Boolean(false) => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluator {
    radians: bool,
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator { radians: true }
    }
}

impl Evaluator {
    /// `radians` selects the unit for the trigonometric functions;
    /// in degree mode inputs are converted on the way in and
    /// inverse results on the way out.
    pub fn new(radians: bool) -> Self {
        Evaluator { radians }
    }

    /// Checks the bindings against the variable list the parser
    /// collected, then evaluates. The bindings must cover exactly
    /// the collected names.
    pub fn evaluate(
        &self,
        tree: &Expr,
        variables: &[String],
        bindings: &HashMap<String, Value>,
    ) -> Result<Value> {
        for name in variables {
            if !bindings.contains_key(name) {
                return Err(Error::MissingVariableValue { name: name.clone() });
            }
        }
        self.eval(tree, bindings)
    }

    pub fn eval(&self, expr: &Expr, bindings: &HashMap<String, Value>) -> Result<Value> {
        match &expr.kind {
            ExprKind::Number { value } => value
                .parse::<f64>()
                .map(Value::Number)
                .map_err(|_| Error::UnknownNodeKind),
            ExprKind::Variable { name } => match bindings.get(name) {
                None => Err(Error::MissingVariable { name: name.clone() }),
                Some(Value::Boolean(_)) => {
                    Err(Error::VariableNotNumeric { name: name.clone() })
                }
                Some(value) => Ok(*value),
            },
            ExprKind::Const { which } => Ok(Value::Number(which.value())),
            ExprKind::UnaryMinus { child } => {
                let x = self.eval(child, bindings)?.as_number();
                Ok(Value::Number(-x))
            }
            ExprKind::Binary { op, left, right } => {
                let l = self.eval(left, bindings)?.as_number();
                let r = self.eval(right, bindings)?.as_number();
                let out = match op {
                    BinaryOp::Add => l + r,
                    BinaryOp::Sub => l - r,
                    BinaryOp::Mul | BinaryOp::ImplicitMul => l * r,
                    BinaryOp::Div => {
                        if r.abs() < ZERO_DENOMINATOR_EPSILON {
                            return Err(Error::ZeroDenominator);
                        }
                        l / r
                    }
                    BinaryOp::Pow => l.powf(r),
                };
                Ok(Value::Number(out))
            }
            ExprKind::Compare { op, left, right } => {
                let l = self.eval(left, bindings)?.as_number();
                let r = self.eval(right, bindings)?.as_number();
                let out = match op {
                    CompareOp::Equal => l == r,
                    CompareOp::Greater => l > r,
                    CompareOp::GreaterEqual => l >= r,
                    CompareOp::Less => l < r,
                    CompareOp::LessEqual => l <= r,
                    CompareOp::NotEqual => l != r,
                };
                Ok(Value::Boolean(out))
            }
            ExprKind::Bool { op, left, right } => {
                let l = self.eval(left, bindings)?;
                match op {
                    BoolOp::And if !l.truthy() => Ok(Value::Boolean(false)),
                    BoolOp::Or if l.truthy() => Ok(Value::Boolean(true)),
                    _ => Ok(Value::Boolean(self.eval(right, bindings)?.truthy())),
                }
            }
            ExprKind::Funct { which, arg } => {
                let x = self.eval(arg, bindings)?.as_number();
                Ok(Value::Number(self.apply_function(*which, x)))
            }
        }
    }

    fn apply_function(&self, which: MathFunction, x: f64) -> f64 {
        match which {
            MathFunction::Abs => x.abs(),
            MathFunction::Sqrt => x.sqrt(),
            MathFunction::Exp => x.exp(),
            MathFunction::Ln => x.ln(),
            MathFunction::Log10 => x.log10(),
            MathFunction::Sin => self.angle_in(x).sin(),
            MathFunction::Cos => self.angle_in(x).cos(),
            MathFunction::Tan => self.angle_in(x).tan(),
            MathFunction::Asin => self.angle_out(x.asin()),
            MathFunction::Acos => self.angle_out(x.acos()),
            MathFunction::Atan => self.angle_out(x.atan()),
        }
    }

    fn angle_in(&self, x: f64) -> f64 {
        if self.radians {
            x
        } else {
            x.to_radians()
        }
    }

    fn angle_out(&self, x: f64) -> f64 {
        if self.radians {
            x
        } else {
            x.to_degrees()
        }
    }
}
