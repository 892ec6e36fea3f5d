use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the substrate can report, in one place.
///
/// Input-shape and parse errors carry the byte offset of the
/// offending token in the source string; nothing is recovered
/// locally, each kind surfaces to the caller of the top-level
/// entry point that hit it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Input shape
    #[error("input contains a non-ASCII byte at offset {position}")]
    NonAscii { position: usize },
    #[error("input is empty")]
    EmptyInput,
    #[error("input ended in the middle of a token at offset {position}")]
    PrematureEnd { position: usize },
    #[error("illegal character at offset {position}")]
    IllegalChar { position: usize },
    #[error("decimal point with no digit after it at offset {position}")]
    MissingDigit { position: usize },

    // Parse
    #[error("expected '|' at offset {position}")]
    ExpectedOr { position: usize },
    #[error("expected '&' at offset {position}")]
    ExpectedAnd { position: usize },
    #[error("expected a boolean term at offset {position}")]
    ExpectedBoolTerm { position: usize },
    #[error("expected a boolean factor at offset {position}")]
    ExpectedBoolFactor { position: usize },
    #[error("expected an expression at offset {position}")]
    ExpectedExpression { position: usize },
    #[error("expected a term at offset {position}")]
    ExpectedTerm { position: usize },
    #[error("expected a factor at offset {position}")]
    ExpectedFactor { position: usize },
    #[error("expected '(' at offset {position}")]
    ExpectedLParen { position: usize },
    #[error("expected ')' at offset {position}")]
    ExpectedRParen { position: usize },
    #[error("expected an atom at offset {position}")]
    ExpectedAtom { position: usize },
    #[error("expected a comparison operator at offset {position}")]
    ExpectedCompareOp { position: usize },
    #[error("expected a boolean expression at offset {position}")]
    ExpectedBoolExp { position: usize },
    #[error("failed to sort the collected variable names")]
    VariableSortFailure,

    // Semantic
    #[error("unknown node kind")]
    UnknownNodeKind,
    #[error("unknown function '{name}'")]
    UnknownFunction { name: String },
    #[error("unknown math constant '{name}'")]
    UnknownMathConst { name: String },
    #[error("no parse tree available")]
    NoParseTree,
    #[error("multinode tree has no children")]
    EmptyMultinodeTree,
    #[error("expected a term multinode")]
    ExpectedTermMultinode,

    // Evaluation
    #[error("variable '{name}' has no binding")]
    MissingVariable { name: String },
    #[error("no value supplied for variable '{name}'")]
    MissingVariableValue { name: String },
    #[error("variable '{name}' is bound to a non-numeric value")]
    VariableNotNumeric { name: String },
    #[error("division by a denominator too close to zero")]
    ZeroDenominator,

    // Bignum
    #[error("rational denominator is zero")]
    RationalDenominatorZero,
    #[error("reciprocal of zero")]
    ReciprocalOfZero,
    #[error("zero raised to a negative power")]
    NegativePowerOfZero,
    #[error("malformed rational literal '{literal}'")]
    MalformedRationalLiteral { literal: String },
    #[error("radix {radix} is not usable here")]
    InvalidRadix { radix: i64 },

    // Encryption toy
    #[error("message is longer than {limit} characters")]
    MessageTooLong { limit: usize },
    #[error("key {key} is not a nonzero single-digit key")]
    InvalidKey { key: i64 },
    #[error("ciphertext is not a multiple of the key")]
    CorruptCiphertext,
}

impl Error {
    /// Byte offset of the failure in the source string, when the
    /// kind carries one.
    pub fn position(&self) -> Option<usize> {
        match self {
            Error::NonAscii { position }
            | Error::PrematureEnd { position }
            | Error::IllegalChar { position }
            | Error::MissingDigit { position }
            | Error::ExpectedOr { position }
            | Error::ExpectedAnd { position }
            | Error::ExpectedBoolTerm { position }
            | Error::ExpectedBoolFactor { position }
            | Error::ExpectedExpression { position }
            | Error::ExpectedTerm { position }
            | Error::ExpectedFactor { position }
            | Error::ExpectedLParen { position }
            | Error::ExpectedRParen { position }
            | Error::ExpectedAtom { position }
            | Error::ExpectedCompareOp { position }
            | Error::ExpectedBoolExp { position } => Some(*position),
            _ => None,
        }
    }
}
