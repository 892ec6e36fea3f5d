//! Tokenization of expression source text.
//!
//! The lexer accepts ASCII only. Uppercase runs resolve to a single
//! function name or a concatenation of math constants; lowercase
//! runs are variables, read either one letter at a time or as whole
//! words depending on the configured mode. After tokenization a
//! second pass inserts implicit-multiplication tokens between
//! juxtaposed operands, kept distinct from `*` so emitters can
//! render `2x` without an operator character.

use crate::ast::{MathConst, MathFunction};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerConfig {
    /// When false (the default), every lowercase letter is its own
    /// variable and juxtaposed letters multiply. When true, a
    /// lowercase run is one variable name and adjacent variables
    /// need an explicit `*`.
    pub multi_char_variables: bool,
    /// Round decimal literals to this many places.
    pub round_decimals: Option<usize>,
}

impl Default for LexerConfig {
    fn default() -> Self {
        LexerConfig {
            multi_char_variables: false,
            round_decimals: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
    pub length: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Or,
    And,
    Equal,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    NotEqual,
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Number(String),
    Variable(String),
    Const(MathConst),
    Function(MathFunction),
    ImplicitMul,
}

pub struct Lexer<'a> {
    source: &'a str,
    position: usize,
    config: LexerConfig,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, config: LexerConfig) -> Self {
        Lexer {
            source,
            position: 0,
            config,
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        if let Some(position) = self.source.bytes().position(|b| b >= 0x80) {
            return Err(Error::NonAscii { position });
        }
        let mut tokens = Vec::new();
        while let Some(b) = self.current() {
            if b.is_ascii_whitespace() {
                self.advance();
                continue;
            }
            self.next_token(&mut tokens)?;
        }
        if tokens.is_empty() {
            return Err(Error::EmptyInput);
        }
        Ok(insert_implicit_mul(
            tokens,
            self.config.multi_char_variables,
        ))
    }

    fn current(&self) -> Option<u8> {
        self.source.as_bytes().get(self.position).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn next_token(&mut self, tokens: &mut Vec<Token>) -> Result<()> {
        let start = self.position;
        let b = match self.current() {
            Some(b) => b,
            None => return Ok(()),
        };
        match b {
            b'|' => tokens.push(self.single(TokenKind::Or)),
            b'&' => tokens.push(self.single(TokenKind::And)),
            b'=' => tokens.push(self.single(TokenKind::Equal)),
            b'+' => tokens.push(self.single(TokenKind::Plus)),
            b'-' => tokens.push(self.single(TokenKind::Minus)),
            b'*' => tokens.push(self.single(TokenKind::Star)),
            b'/' => tokens.push(self.single(TokenKind::Slash)),
            b'^' => tokens.push(self.single(TokenKind::Caret)),
            b'(' => tokens.push(self.single(TokenKind::LeftParen)),
            b')' => tokens.push(self.single(TokenKind::RightParen)),
            b'[' => tokens.push(self.single(TokenKind::LeftBracket)),
            b']' => tokens.push(self.single(TokenKind::RightBracket)),
            b'>' => {
                self.advance();
                match self.current() {
                    None => return Err(Error::PrematureEnd { position: start }),
                    Some(b'=') => {
                        self.advance();
                        tokens.push(Token {
                            kind: TokenKind::GreaterEqual,
                            position: start,
                            length: 2,
                        });
                    }
                    Some(_) => tokens.push(Token {
                        kind: TokenKind::Greater,
                        position: start,
                        length: 1,
                    }),
                }
            }
            b'<' => {
                self.advance();
                match self.current() {
                    None => return Err(Error::PrematureEnd { position: start }),
                    Some(b'=') => {
                        self.advance();
                        tokens.push(Token {
                            kind: TokenKind::LessEqual,
                            position: start,
                            length: 2,
                        });
                    }
                    Some(b'>') => {
                        self.advance();
                        tokens.push(Token {
                            kind: TokenKind::NotEqual,
                            position: start,
                            length: 2,
                        });
                    }
                    Some(_) => tokens.push(Token {
                        kind: TokenKind::Less,
                        position: start,
                        length: 1,
                    }),
                }
            }
            b'0'..=b'9' => {
                let token = self.read_number(start)?;
                tokens.push(token);
            }
            b'A'..=b'Z' => self.read_uppercase_run(start, tokens)?,
            b'a'..=b'z' => self.read_lowercase_run(start, tokens),
            _ => return Err(Error::IllegalChar { position: start }),
        }
        Ok(())
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        let position = self.position;
        self.advance();
        Token {
            kind,
            position,
            length: 1,
        }
    }

    fn read_number(&mut self, start: usize) -> Result<Token> {
        while matches!(self.current(), Some(b) if b.is_ascii_digit()) {
            self.advance();
        }
        if self.current() == Some(b'.') {
            let dot = self.position;
            self.advance();
            if !matches!(self.current(), Some(b) if b.is_ascii_digit()) {
                return Err(Error::MissingDigit { position: dot });
            }
            while matches!(self.current(), Some(b) if b.is_ascii_digit()) {
                self.advance();
            }
        }
        let mut value = self.source[start..self.position].to_string();
        if let Some(decimals) = self.config.round_decimals {
            if value.contains('.') {
                if let Ok(parsed) = value.parse::<f64>() {
                    value = format!("{parsed:.decimals$}");
                }
            }
        }
        Ok(Token {
            kind: TokenKind::Number(value),
            position: start,
            length: self.position - start,
        })
    }

    /// An uppercase run is one function name, or a greedy
    /// left-to-right concatenation of math constants; anything left
    /// over is an error at the first unmatched letter.
    fn read_uppercase_run(&mut self, start: usize, tokens: &mut Vec<Token>) -> Result<()> {
        while matches!(self.current(), Some(b) if b.is_ascii_uppercase()) {
            self.advance();
        }
        let run = &self.source[start..self.position];
        if let Some(function) = MathFunction::from_name(run) {
            tokens.push(Token {
                kind: TokenKind::Function(function),
                position: start,
                length: run.len(),
            });
            return Ok(());
        }
        let mut offset = 0;
        while offset < run.len() {
            let rest = &run[offset..];
            let matched = CONSTANT_TABLE
                .iter()
                .find(|(name, _)| rest.starts_with(name));
            match matched {
                Some((name, which)) => {
                    tokens.push(Token {
                        kind: TokenKind::Const(*which),
                        position: start + offset,
                        length: name.len(),
                    });
                    offset += name.len();
                }
                None => {
                    return Err(Error::IllegalChar {
                        position: start + offset,
                    })
                }
            }
        }
        Ok(())
    }

    fn read_lowercase_run(&mut self, start: usize, tokens: &mut Vec<Token>) {
        while matches!(self.current(), Some(b) if b.is_ascii_lowercase()) {
            self.advance();
        }
        let run = &self.source[start..self.position];
        if self.config.multi_char_variables {
            tokens.push(Token {
                kind: TokenKind::Variable(run.to_string()),
                position: start,
                length: run.len(),
            });
        } else {
            for (i, letter) in run.chars().enumerate() {
                tokens.push(Token {
                    kind: TokenKind::Variable(letter.to_string()),
                    position: start + i,
                    length: 1,
                });
            }
        }
    }
}

/// Longest name first, so the greedy scan prefers `PI` over a
/// shorter prefix.
const CONSTANT_TABLE: [(&str, MathConst); 2] =
    [("PI", MathConst::Pi), ("E", MathConst::E)];

/// Inserts an [`TokenKind::ImplicitMul`] between juxtaposed
/// operands: (constant | number | `)` | variable) followed by
/// (constant | number | variable | `(` | function). Two adjacent
/// variables multiply only in one-char-variable mode.
fn insert_implicit_mul(tokens: Vec<Token>, multi_char_variables: bool) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens {
        if let Some(prev) = out.last() {
            if needs_implicit_mul(&prev.kind, &token.kind, multi_char_variables) {
                out.push(Token {
                    kind: TokenKind::ImplicitMul,
                    position: token.position,
                    length: 0,
                });
            }
        }
        out.push(token);
    }
    out
}

fn needs_implicit_mul(left: &TokenKind, right: &TokenKind, multi_char_variables: bool) -> bool {
    let left_joins = matches!(
        left,
        TokenKind::Const(_) | TokenKind::Number(_) | TokenKind::RightParen | TokenKind::Variable(_)
    );
    let right_joins = matches!(
        right,
        TokenKind::Const(_)
            | TokenKind::Number(_)
            | TokenKind::Variable(_)
            | TokenKind::LeftParen
            | TokenKind::Function(_)
    );
    if !left_joins || !right_joins {
        return false;
    }
    if matches!(left, TokenKind::Variable(_))
        && matches!(right, TokenKind::Variable(_))
        && multi_char_variables
    {
        return false;
    }
    true
}
