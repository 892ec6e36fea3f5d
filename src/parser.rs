//! Recursive-descent parser for the expression grammar.
//!
//! ```text
//! block     = boolexp
//! boolexp   = boolterm   { "|" boolterm }
//! boolterm  = boolfactor { "&" boolfactor }
//! boolfactor= boolatom | "[" boolexp "]"
//! boolatom  = expression [ cmpop expression ]
//! expression= [ "-" ] term { ("+"|"-") term }
//! term      = factor { ("*"|"/"|impMul) factor }
//! factor    = ( atom | "(" expression ")" ) [ "^" factor ]
//! atom      = mathconst | number | variable | funct
//! funct     = functionname "(" expression ")"
//! ```
//!
//! The grammar is LL(1); each nonterminal is one method and there
//! is no backtracking. Square brackets delimit boolean
//! sub-expressions and round parentheses arithmetic ones, which is
//! how `boolfactor` and `factor` are told apart. `^` is
//! right-associative; every other binary operator associates left.
//! Parsing also collects the sorted set of free variable names.

use std::collections::BTreeSet;

use crate::ast::{BinaryOp, BoolOp, CompareOp, Expr, MathFunction};
use crate::error::{Error, Result};
use crate::lexer::{Lexer, LexerConfig, Token, TokenKind};

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    variables: BTreeSet<String>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            current: 0,
            variables: BTreeSet::new(),
        }
    }

    pub fn from_source(source: &str, config: LexerConfig) -> Result<Self> {
        let tokens = Lexer::new(source, config).tokenize()?;
        Ok(Parser::new(tokens))
    }

    /// Parses the token stream into a binary tree plus the sorted
    /// list of distinct variable names. Per-parse state is reset on
    /// entry, so a parser instance can be reused.
    pub fn parse(&mut self) -> Result<(Expr, Vec<String>)> {
        self.current = 0;
        self.variables.clear();
        let tree = self.block()?;
        if !self.is_at_end() {
            return Err(Error::ExpectedOr {
                position: self.current_position(),
            });
        }
        let variables = self.variables.iter().cloned().collect();
        Ok((tree, variables))
    }

    fn block(&mut self) -> Result<Expr> {
        self.boolexp()
    }

    fn boolexp(&mut self) -> Result<Expr> {
        if self.is_at_end() || self.check(&TokenKind::RightBracket) {
            return Err(Error::ExpectedBoolExp {
                position: self.current_position(),
            });
        }
        let mut node = self.boolterm()?;
        while let Some(pos) = self.match_token(&TokenKind::Or) {
            let right = self.boolterm()?;
            node = Expr::boolean(BoolOp::Or, node, right, Some(pos));
        }
        Ok(node)
    }

    fn boolterm(&mut self) -> Result<Expr> {
        if self.is_at_end() {
            return Err(Error::ExpectedBoolTerm {
                position: self.current_position(),
            });
        }
        let mut node = self.boolfactor()?;
        while let Some(pos) = self.match_token(&TokenKind::And) {
            let right = self.boolfactor()?;
            node = Expr::boolean(BoolOp::And, node, right, Some(pos));
        }
        Ok(node)
    }

    fn boolfactor(&mut self) -> Result<Expr> {
        if self.is_at_end() {
            return Err(Error::ExpectedBoolFactor {
                position: self.current_position(),
            });
        }
        if self.match_token(&TokenKind::LeftBracket).is_some() {
            let node = self.boolexp()?;
            if self.match_token(&TokenKind::RightBracket).is_none() {
                return Err(Error::ExpectedRParen {
                    position: self.current_position(),
                });
            }
            return Ok(node);
        }
        self.boolatom()
    }

    fn boolatom(&mut self) -> Result<Expr> {
        let left = self.expression()?;
        if let Some((op, pos)) = self.match_compare_op() {
            let right = self.expression()?;
            return Ok(Expr::compare(op, left, right, Some(pos)));
        }
        Ok(left)
    }

    fn expression(&mut self) -> Result<Expr> {
        if self.is_at_end() {
            return Err(Error::ExpectedExpression {
                position: self.current_position(),
            });
        }
        let mut node = if let Some(pos) = self.match_token(&TokenKind::Minus) {
            let operand = self.term()?;
            Expr::unary_minus(operand, Some(pos))
        } else {
            self.term()?
        };
        loop {
            if let Some(pos) = self.match_token(&TokenKind::Plus) {
                let right = self.term()?;
                node = Expr::binary(BinaryOp::Add, node, right, Some(pos));
            } else if let Some(pos) = self.match_token(&TokenKind::Minus) {
                let right = self.term()?;
                node = Expr::binary(BinaryOp::Sub, node, right, Some(pos));
            } else {
                break;
            }
        }
        Ok(node)
    }

    fn term(&mut self) -> Result<Expr> {
        if self.is_at_end() {
            return Err(Error::ExpectedTerm {
                position: self.current_position(),
            });
        }
        let mut node = self.factor()?;
        loop {
            if let Some(pos) = self.match_token(&TokenKind::Star) {
                let right = self.factor()?;
                node = Expr::binary(BinaryOp::Mul, node, right, Some(pos));
            } else if let Some(pos) = self.match_token(&TokenKind::Slash) {
                let right = self.factor()?;
                node = Expr::binary(BinaryOp::Div, node, right, Some(pos));
            } else if let Some(pos) = self.match_token(&TokenKind::ImplicitMul) {
                let right = self.factor()?;
                node = Expr::binary(BinaryOp::ImplicitMul, node, right, Some(pos));
            } else {
                break;
            }
        }
        Ok(node)
    }

    fn factor(&mut self) -> Result<Expr> {
        if self.is_at_end() {
            return Err(Error::ExpectedFactor {
                position: self.current_position(),
            });
        }
        let base = if self.match_token(&TokenKind::LeftParen).is_some() {
            let node = self.expression()?;
            if self.match_token(&TokenKind::RightParen).is_none() {
                return Err(Error::ExpectedRParen {
                    position: self.current_position(),
                });
            }
            node
        } else {
            self.atom()?
        };
        if let Some(pos) = self.match_token(&TokenKind::Caret) {
            // Right-associative: the exponent is a whole factor.
            let exponent = self.factor()?;
            return Ok(Expr::binary(BinaryOp::Pow, base, exponent, Some(pos)));
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<Expr> {
        let position = self.current_position();
        let token = match self.peek() {
            Some(token) => token.clone(),
            None => return Err(Error::ExpectedAtom { position }),
        };
        match token.kind {
            TokenKind::Number(value) => {
                self.current += 1;
                Ok(Expr::number(value, Some(token.position)))
            }
            TokenKind::Variable(name) => {
                self.current += 1;
                self.variables.insert(name.clone());
                Ok(Expr::variable(name, Some(token.position)))
            }
            TokenKind::Const(which) => {
                self.current += 1;
                Ok(Expr::constant(which, Some(token.position)))
            }
            TokenKind::Function(which) => self.funct(which, token.position),
            _ => Err(Error::ExpectedAtom { position }),
        }
    }

    fn funct(&mut self, which: MathFunction, position: usize) -> Result<Expr> {
        self.current += 1;
        if self.match_token(&TokenKind::LeftParen).is_none() {
            return Err(Error::ExpectedLParen {
                position: self.current_position(),
            });
        }
        let arg = self.expression()?;
        if self.match_token(&TokenKind::RightParen).is_none() {
            return Err(Error::ExpectedRParen {
                position: self.current_position(),
            });
        }
        Ok(Expr::funct(which, arg, Some(position)))
    }

    fn match_compare_op(&mut self) -> Option<(CompareOp, usize)> {
        let token = self.peek()?;
        let op = match token.kind {
            TokenKind::Equal => CompareOp::Equal,
            TokenKind::Greater => CompareOp::Greater,
            TokenKind::GreaterEqual => CompareOp::GreaterEqual,
            TokenKind::Less => CompareOp::Less,
            TokenKind::LessEqual => CompareOp::LessEqual,
            TokenKind::NotEqual => CompareOp::NotEqual,
            _ => return None,
        };
        let position = token.position;
        self.current += 1;
        Some((op, position))
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.current)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        matches!(self.peek(), Some(token) if &token.kind == kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> Option<usize> {
        if self.check(kind) {
            let position = self.tokens[self.current].position;
            self.current += 1;
            Some(position)
        } else {
            None
        }
    }

    /// Offset of the current token, or of the last token seen when
    /// the stream has run out.
    fn current_position(&self) -> usize {
        match self.peek() {
            Some(token) => token.position,
            None => self.tokens.last().map(|t| t.position).unwrap_or(0),
        }
    }
}
