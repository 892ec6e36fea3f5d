//! Signed arbitrary-precision integers.
//!
//! An [`Int`] pairs a natural-number magnitude with a sign; the
//! [`Integers`] context flips signs, delegates the digit work to
//! [`Naturals`], and re-applies signs to the result. Signed
//! division deliberately follows the truncating convention where
//! the remainder takes the dividend's sign.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::bignum::natural::{Nat, Naturals};
use crate::bignum::Radix;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sign {
    Negative,
    Zero,
    Positive,
}

impl Sign {
    pub fn flipped(self) -> Sign {
        match self {
            Sign::Negative => Sign::Positive,
            Sign::Zero => Sign::Zero,
            Sign::Positive => Sign::Negative,
        }
    }
}

/// A signed integer in canonical form: the sign is `Zero` exactly
/// when the magnitude is zero, so negative zero cannot exist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Int {
    sign: Sign,
    mag: Nat,
}

impl Int {
    pub fn sign(&self) -> Sign {
        self.sign
    }

    pub fn magnitude(&self) -> &Nat {
        &self.mag
    }

    pub fn is_zero(&self) -> bool {
        self.sign == Sign::Zero
    }

    pub fn is_negative(&self) -> bool {
        self.sign == Sign::Negative
    }

    pub(crate) fn new(sign: Sign, mag: Nat) -> Int {
        if mag.is_zero() {
            Int {
                sign: Sign::Zero,
                mag,
            }
        } else {
            debug_assert!(sign != Sign::Zero);
            Int { sign, mag }
        }
    }
}

/// Integer arithmetic over a fixed radix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Integers {
    nat: Naturals,
}

impl Integers {
    pub fn new(radix: Radix) -> Self {
        Integers {
            nat: Naturals::new(radix),
        }
    }

    pub fn naturals(&self) -> &Naturals {
        &self.nat
    }

    pub fn zero(&self) -> Int {
        Int::new(Sign::Zero, Nat::zero())
    }

    pub fn one(&self) -> Int {
        Int::new(Sign::Positive, self.nat.one())
    }

    /// Wraps a natural number as a non-negative integer.
    pub fn from_nat(&self, mag: Nat) -> Int {
        Int::new(Sign::Positive, mag)
    }

    /// Parses an optional leading `-` followed by a natural number.
    pub fn parse(&self, input: &str) -> Result<Int> {
        let (sign, body, offset) = match input.strip_prefix('-') {
            Some(rest) => (Sign::Negative, rest, 1),
            None => (Sign::Positive, input, 0),
        };
        let mag = self.nat.parse(body).map_err(|e| match e {
            Error::IllegalChar { position } => Error::IllegalChar {
                position: position + offset,
            },
            other => other,
        })?;
        Ok(Int::new(sign, mag))
    }

    /// Renders in canonical form; zero is `0`, never `-0`.
    pub fn render(&self, n: &Int) -> String {
        match n.sign {
            Sign::Negative => format!("-{}", self.nat.render(&n.mag)),
            _ => self.nat.render(&n.mag),
        }
    }

    pub fn abs(&self, n: &Int) -> Int {
        match n.sign {
            Sign::Negative => Int::new(Sign::Positive, n.mag.clone()),
            _ => n.clone(),
        }
    }

    pub fn negate(&self, n: &Int) -> Int {
        Int::new(n.sign.flipped(), n.mag.clone())
    }

    /// Positive > zero > negative; within a sign, magnitudes decide
    /// (reversed for two negatives).
    pub fn compare(&self, u: &Int, v: &Int) -> Ordering {
        match (u.sign, v.sign) {
            (Sign::Positive, Sign::Positive) => self.nat.compare(&u.mag, &v.mag),
            (Sign::Negative, Sign::Negative) => self.nat.compare(&v.mag, &u.mag),
            (Sign::Negative, _) | (Sign::Zero, Sign::Positive) => Ordering::Less,
            (_, Sign::Negative) | (Sign::Positive, Sign::Zero) => Ordering::Greater,
            (Sign::Zero, Sign::Zero) => Ordering::Equal,
        }
    }

    pub fn add(&self, u: &Int, v: &Int) -> Int {
        if u.is_zero() {
            return v.clone();
        }
        if v.is_zero() {
            return u.clone();
        }
        if u.sign == v.sign {
            return Int::new(u.sign, self.nat.add(&u.mag, &v.mag));
        }
        match self.nat.compare(&u.mag, &v.mag) {
            Ordering::Equal => self.zero(),
            Ordering::Greater => Int::new(u.sign, self.nat.sub(&u.mag, &v.mag)),
            Ordering::Less => Int::new(v.sign, self.nat.sub(&v.mag, &u.mag)),
        }
    }

    pub fn sub(&self, u: &Int, v: &Int) -> Int {
        self.add(u, &self.negate(v))
    }

    pub fn mul(&self, u: &Int, v: &Int) -> Int {
        if u.is_zero() || v.is_zero() {
            return self.zero();
        }
        let sign = if u.sign == v.sign {
            Sign::Positive
        } else {
            Sign::Negative
        };
        Int::new(sign, self.nat.mul(&u.mag, &v.mag))
    }

    /// Signed division. The quotient is positive exactly when the
    /// operands share a sign; the remainder takes the dividend's
    /// sign. For (±7, ±3) this gives (2, 1), (−2, −1), (−2, 1),
    /// (2, −1).
    pub fn div_rem(&self, u: &Int, v: &Int) -> (Int, Int) {
        let (q_mag, r_mag) = self.nat.div_rem(&u.mag, &v.mag);
        let q_sign = if u.sign == v.sign {
            Sign::Positive
        } else {
            Sign::Negative
        };
        (Int::new(q_sign, q_mag), Int::new(u.sign, r_mag))
    }
}
