//! Arbitrary-precision rationals, always in lowest terms.
//!
//! A [`Rat`] is a signed numerator over a strictly positive natural
//! denominator with `gcd(|num|, den) = 1`; zero is `0/1`. The
//! [`Rationals`] context keeps every result canonical: addition
//! trims by the denominators' GCD, multiplication cross-cancels
//! before assembling the product, division multiplies by the
//! reciprocal, and exponentiation is square-and-multiply.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::bignum::integer::{Int, Integers};
use crate::bignum::natural::Nat;
use crate::bignum::Radix;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rat {
    num: Int,
    den: Nat,
}

impl Rat {
    pub fn numerator(&self) -> &Int {
        &self.num
    }

    pub fn denominator(&self) -> &Nat {
        &self.den
    }

    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }
}

/// Rational arithmetic over a fixed radix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rationals {
    int: Integers,
}

impl Rationals {
    pub fn new(radix: Radix) -> Self {
        Rationals {
            int: Integers::new(radix),
        }
    }

    pub fn integers(&self) -> &Integers {
        &self.int
    }

    pub fn zero(&self) -> Rat {
        Rat {
            num: self.int.zero(),
            den: self.int.naturals().one(),
        }
    }

    pub fn one(&self) -> Rat {
        Rat {
            num: self.int.one(),
            den: self.int.naturals().one(),
        }
    }

    /// Parses `Z/N`. Exactly one `/` is required; a negative
    /// denominator flips both signs; the result is reduced.
    pub fn parse(&self, input: &str) -> Result<Rat> {
        let parts: Vec<&str> = input.split('/').collect();
        if parts.len() != 2 {
            return Err(Error::MalformedRationalLiteral {
                literal: input.to_string(),
            });
        }
        let mut num = self.int.parse(parts[0])?;
        let den_offset = parts[0].len() + 1;
        let den = self.int.parse(parts[1]).map_err(|e| match e {
            Error::IllegalChar { position } => Error::IllegalChar {
                position: position + den_offset,
            },
            other => other,
        })?;
        if den.is_zero() {
            return Err(Error::RationalDenominatorZero);
        }
        if den.is_negative() {
            num = self.int.negate(&num);
        }
        Ok(self.reduced(num, den.magnitude().clone()))
    }

    /// Canonical `Z/N` rendering, e.g. `-27/8` or `0/1`.
    pub fn render(&self, u: &Rat) -> String {
        format!(
            "{}/{}",
            self.int.render(&u.num),
            self.int.naturals().render(&u.den)
        )
    }

    pub fn compare(&self, u: &Rat, v: &Rat) -> Ordering {
        // Cross-multiply onto a common denominator.
        let lhs = self.int.mul(&u.num, &self.int.from_nat(v.den.clone()));
        let rhs = self.int.mul(&v.num, &self.int.from_nat(u.den.clone()));
        self.int.compare(&lhs, &rhs)
    }

    pub fn negate(&self, u: &Rat) -> Rat {
        Rat {
            num: self.int.negate(&u.num),
            den: u.den.clone(),
        }
    }

    pub fn abs(&self, u: &Rat) -> Rat {
        Rat {
            num: self.int.abs(&u.num),
            den: u.den.clone(),
        }
    }

    /// Addition with the GCD trim: for `a/b + c/d` with
    /// `g = gcd(b, d) > 1`, the working denominator is `(b/g)·d`
    /// instead of `b·d`. Addition can reintroduce a common factor,
    /// so the result is reduced again.
    pub fn add(&self, u: &Rat, v: &Rat) -> Rat {
        let nat = self.int.naturals();
        let g = nat.gcd(&u.den, &v.den);
        let (num, den) = if g == nat.one() {
            let ad = self.int.mul(&u.num, &self.int.from_nat(v.den.clone()));
            let cb = self.int.mul(&v.num, &self.int.from_nat(u.den.clone()));
            (self.int.add(&ad, &cb), nat.mul(&u.den, &v.den))
        } else {
            let (s, _) = nat.div_rem(&u.den, &g);
            let (t, _) = nat.div_rem(&v.den, &g);
            let at = self.int.mul(&u.num, &self.int.from_nat(t));
            let cs = self.int.mul(&v.num, &self.int.from_nat(s.clone()));
            (self.int.add(&at, &cs), nat.mul(&s, &v.den))
        };
        self.reduced(num, den)
    }

    pub fn sub(&self, u: &Rat, v: &Rat) -> Rat {
        self.add(u, &self.negate(v))
    }

    /// Multiplication with cross-cancellation: `gcd(|a|, d)` and
    /// `gcd(b, |c|)` are divided out of the assembled product, which
    /// keeps intermediates small and lands directly in lowest terms.
    pub fn mul(&self, u: &Rat, v: &Rat) -> Rat {
        let nat = self.int.naturals();
        let num = self.int.mul(&u.num, &v.num);
        if num.is_zero() {
            return self.zero();
        }
        let g_ad = nat.gcd(u.num.magnitude(), &v.den);
        let g_bc = nat.gcd(&u.den, v.num.magnitude());
        let cancel = nat.mul(&g_ad, &g_bc);
        let den = nat.mul(&u.den, &v.den);
        let (num_mag, _) = nat.div_rem(num.magnitude(), &cancel);
        let (den, _) = nat.div_rem(&den, &cancel);
        Rat {
            num: Int::new(num.sign(), num_mag),
            den,
        }
    }

    pub fn div(&self, u: &Rat, v: &Rat) -> Result<Rat> {
        Ok(self.mul(u, &self.reciprocal(v)?))
    }

    /// Swaps numerator and denominator, keeping the denominator
    /// positive; the reciprocal of zero is an error.
    pub fn reciprocal(&self, u: &Rat) -> Result<Rat> {
        if u.is_zero() {
            return Err(Error::ReciprocalOfZero);
        }
        let sign = u.num.sign();
        let num = Int::new(sign, u.den.clone());
        Ok(Rat {
            num,
            den: u.num.magnitude().clone(),
        })
    }

    /// Integer exponentiation by squaring on the absolute base.
    /// Exponent zero gives one; a negative exponent takes the
    /// reciprocal after the loop; a negative base re-applies its
    /// sign at the end. Zero to a negative power is an error.
    pub fn power(&self, u: &Rat, n: i64) -> Result<Rat> {
        if n == 0 {
            return Ok(self.one());
        }
        if u.is_zero() {
            if n < 0 {
                return Err(Error::NegativePowerOfZero);
            }
            return Ok(self.zero());
        }
        let mut result = self.one();
        let mut square = self.abs(u);
        let mut e = n.unsigned_abs();
        while e > 0 {
            if e & 1 == 1 {
                result = self.mul(&result, &square);
            }
            square = self.mul(&square, &square);
            e >>= 1;
        }
        if n < 0 {
            result = self.reciprocal(&result)?;
        }
        if u.num.is_negative() {
            result = self.negate(&result);
        }
        Ok(result)
    }

    fn reduced(&self, num: Int, den: Nat) -> Rat {
        debug_assert!(!den.is_zero());
        if num.is_zero() {
            return self.zero();
        }
        let nat = self.int.naturals();
        let g = nat.gcd(num.magnitude(), &den);
        if g == nat.one() {
            return Rat { num, den };
        }
        let (num_mag, _) = nat.div_rem(num.magnitude(), &g);
        let (den, _) = nat.div_rem(&den, &g);
        Rat {
            num: Int::new(num.sign(), num_mag),
            den,
        }
    }
}
