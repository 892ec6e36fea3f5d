//! A small text-encryption toy over the bignum layer.
//!
//! A message is space-padded to a fixed width, packed into base-B
//! digits (one character code per digit, first character least
//! significant), and multiplied by a single-digit key. Decryption
//! divides by the key, requires a zero remainder, unpacks the
//! digits, and trims the trailing padding spaces. The radix must be
//! at least 256 so a digit can hold any character code.

use crate::bignum::{Nat, Naturals, Radix};
use crate::error::{Error, Result};

/// Longest payload; shorter messages are padded with spaces.
pub const MAX_MESSAGE_LEN: usize = 30;

pub fn encrypt(message: &str, key: i64, radix: Radix) -> Result<String> {
    let nat = naturals_for(key, radix)?;
    if let Some(position) = message.bytes().position(|b| b >= 0x80) {
        return Err(Error::NonAscii { position });
    }
    if message.len() > MAX_MESSAGE_LEN {
        return Err(Error::MessageTooLong {
            limit: MAX_MESSAGE_LEN,
        });
    }
    let mut digits: Vec<i64> = message.bytes().map(i64::from).collect();
    digits.resize(MAX_MESSAGE_LEN, i64::from(b' '));
    let packed = Nat::from_digits(digits);
    let cipher = nat.short_mul(&packed, key);
    Ok(nat.render(&cipher))
}

pub fn decrypt(cipher: &str, key: i64, radix: Radix) -> Result<String> {
    let nat = naturals_for(key, radix)?;
    let packed = nat.parse(cipher)?;
    let (quotient, remainder) = nat.short_div_rem(&packed, key);
    if !remainder.is_zero() {
        return Err(Error::CorruptCiphertext);
    }
    let mut text = String::with_capacity(quotient.digit_count());
    for &digit in quotient.digits() {
        if !(0..128).contains(&digit) {
            return Err(Error::CorruptCiphertext);
        }
        text.push(digit as u8 as char);
    }
    Ok(text.trim_end_matches(' ').to_string())
}

fn naturals_for(key: i64, radix: Radix) -> Result<Naturals> {
    if radix.base() < 256 {
        return Err(Error::InvalidRadix {
            radix: radix.base(),
        });
    }
    if key < 2 || key >= radix.base() {
        return Err(Error::InvalidKey { key });
    }
    Ok(Naturals::new(radix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn radix_1000() -> Radix {
        Radix::new(1000).unwrap()
    }

    #[test]
    fn round_trip_recovers_the_message() {
        for message in ["HELLO, WORLD", "", "x", "a message of thirty characters"] {
            let cipher = encrypt(message, 317, radix_1000()).unwrap();
            assert_eq!(decrypt(&cipher, 317, radix_1000()).unwrap(), message);
        }
    }

    #[test]
    fn trailing_spaces_are_absorbed_by_the_padding() {
        let cipher = encrypt("abc   ", 317, radix_1000()).unwrap();
        assert_eq!(decrypt(&cipher, 317, radix_1000()).unwrap(), "abc");
    }

    #[test]
    fn oversized_messages_are_rejected() {
        let long = "x".repeat(MAX_MESSAGE_LEN + 1);
        assert_eq!(
            encrypt(&long, 317, radix_1000()),
            Err(Error::MessageTooLong {
                limit: MAX_MESSAGE_LEN
            })
        );
    }

    #[test]
    fn a_narrow_radix_cannot_hold_character_codes() {
        let radix = Radix::new(100).unwrap();
        assert_eq!(
            encrypt("hi", 31, radix),
            Err(Error::InvalidRadix { radix: 100 })
        );
    }

    #[test]
    fn keys_must_be_a_single_digit() {
        assert_eq!(
            encrypt("hi", 1000, radix_1000()),
            Err(Error::InvalidKey { key: 1000 })
        );
        assert_eq!(
            encrypt("hi", 0, radix_1000()),
            Err(Error::InvalidKey { key: 0 })
        );
    }

    #[test]
    fn an_indivisible_ciphertext_is_corrupt() {
        assert_eq!(
            decrypt("12345", 2, radix_1000()),
            Err(Error::CorruptCiphertext)
        );
    }
}
