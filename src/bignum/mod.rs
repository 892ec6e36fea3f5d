//! Exact arbitrary-precision arithmetic in a decimal-power radix.
//!
//! The layer is built bottom-up: [`machine`] pins down host-int
//! division, [`natural`] implements the digit algorithms, and
//! [`integer`] and [`rational`] add sign handling and always-reduced
//! fractions on top. Arithmetic contexts are constructed with a
//! [`Radix`] and are pure functions over immutable values.

pub mod integer;
pub mod machine;
pub mod natural;
pub mod rational;

pub use integer::{Int, Integers, Sign};
pub use natural::{Nat, Naturals};
pub use rational::{Rat, Rationals};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A validated bignum radix: a positive integer power of 10.
///
/// The upper bound keeps every digit product below `i64::MAX`
/// ((B-1)^2 must fit in a host int).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Radix {
    base: i64,
    width: usize,
}

const MAX_RADIX: i64 = 1_000_000_000;

impl Radix {
    pub fn new(base: i64) -> Result<Self> {
        if base < 10 || base > MAX_RADIX {
            return Err(Error::InvalidRadix { radix: base });
        }
        let mut width = 0usize;
        let mut b = base;
        while b > 1 {
            if b % 10 != 0 {
                return Err(Error::InvalidRadix { radix: base });
            }
            b /= 10;
            width += 1;
        }
        Ok(Radix { base, width })
    }

    /// The base `B`.
    pub fn base(&self) -> i64 {
        self.base
    }

    /// `log10 B`: how many decimal characters one digit spans.
    pub fn digit_width(&self) -> usize {
        self.width
    }
}
