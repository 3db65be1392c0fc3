use std::fmt;

use lazy_static::lazy_static;
use num_bigint::BigUint;

lazy_static! {
    /// The StarkNet field prime `p = 2^251 + 17 * 2^192 + 1`.
    pub(crate) static ref PRIME: BigUint = BigUint::parse_bytes(
        b"800000000000011000000000000000000000000000000000000000000000001",
        16,
    )
    .expect("prime is valid hex");
}

/// A 252-bit StarkNet field element.
///
/// Internally this is a [BigUint] that is always kept reduced modulo
/// [PRIME]; every public constructor enforces that invariant.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Felt(BigUint);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FeltError {
    #[error("value is not a valid field element: {0}")]
    InvalidHex(String),
    #[error("value overflows the field prime")]
    Overflow,
}

impl Felt {
    pub const ZERO_HEX: &'static str = "0x0";

    /// Creates a [Felt] from a [BigUint], reducing it modulo the field prime.
    fn from_biguint(value: BigUint) -> Self {
        Felt(value % &*PRIME)
    }

    pub fn zero() -> Self {
        Felt(BigUint::from(0u32))
    }

    pub fn one() -> Self {
        Felt(BigUint::from(1u32))
    }

    pub fn is_zero(&self) -> bool {
        self.0 == BigUint::from(0u32)
    }

    pub fn from_u64(value: u64) -> Self {
        Felt(BigUint::from(value))
    }

    /// Parses a 0x-prefixed (or bare) hex string. Accepts arbitrary length,
    /// treats an empty string as zero, and rejects values that overflow the
    /// field prime.
    pub fn from_hex_str(s: &str) -> Result<Self, FeltError> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        if stripped.is_empty() {
            return Ok(Felt::zero());
        }
        let value = BigUint::parse_bytes(stripped.as_bytes(), 16)
            .ok_or_else(|| FeltError::InvalidHex(s.to_string()))?;
        if value >= *PRIME {
            return Err(FeltError::Overflow);
        }
        Ok(Felt(value))
    }

    /// Canonical lower-case 0x-prefixed hex, no leading zeros (except the
    /// single digit `"0x0"`).
    pub fn to_hex_str(&self) -> String {
        if self.is_zero() {
            return Self::ZERO_HEX.to_string();
        }
        format!("0x{}", self.0.to_str_radix(16))
    }

    /// Same as [Felt::to_hex_str] but without the `0x` prefix and with
    /// leading zeros stripped to a bare `"0"` for zero - the encoding used
    /// for the persisted `state_root` key.
    pub fn to_hex_no_prefix(&self) -> String {
        if self.is_zero() {
            "0".to_string()
        } else {
            self.0.to_str_radix(16)
        }
    }

    pub fn from_be_bytes(bytes: [u8; 32]) -> Result<Self, FeltError> {
        let value = BigUint::from_bytes_be(&bytes);
        if value >= *PRIME {
            return Err(FeltError::Overflow);
        }
        Ok(Felt(value))
    }

    pub fn to_be_bytes(&self) -> [u8; 32] {
        let raw = self.0.to_bytes_be();
        let mut out = [0u8; 32];
        out[32 - raw.len()..].copy_from_slice(&raw);
        out
    }

    /// Interprets `bits` (MSB-first, up to 251 bits) as the big-endian
    /// integer value of a path and returns the corresponding [Felt].
    pub fn from_bits_be(bits: &[bool]) -> Result<Self, FeltError> {
        let mut value = BigUint::from(0u32);
        for &bit in bits {
            value <<= 1u32;
            if bit {
                value |= BigUint::from(1u32);
            }
        }
        if value >= *PRIME {
            return Err(FeltError::Overflow);
        }
        Ok(Felt(value))
    }

    pub fn add_mod(&self, other: &Felt) -> Felt {
        Felt::from_biguint(&self.0 + &other.0)
    }

    pub fn sub_mod(&self, other: &Felt) -> Felt {
        if self.0 >= other.0 {
            Felt(&self.0 - &other.0)
        } else {
            Felt(&*PRIME - (&other.0 - &self.0))
        }
    }

    pub fn mul_mod(&self, other: &Felt) -> Felt {
        Felt::from_biguint(&self.0 * &other.0)
    }

    /// Modular exponentiation, used by the curve arithmetic for the
    /// `(p+1)/4`-style square-root trick and for modular inverse via
    /// Fermat's little theorem (`a^(p-2) mod p`).
    pub fn pow_mod(&self, exponent: &BigUint) -> Felt {
        Felt(self.0.modpow(exponent, &PRIME))
    }

    pub fn inverse(&self) -> Felt {
        let exponent = &*PRIME - BigUint::from(2u32);
        self.pow_mod(&exponent)
    }

    pub(crate) fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// Builds a [Felt] from a [BigUint] already known to be `< PRIME`
    /// (e.g. a bit-masked/shifted slice of an existing felt).
    pub(crate) fn from_biguint_exact(value: BigUint) -> Felt {
        debug_assert!(value < *PRIME);
        Felt(value)
    }

    /// Value of the path bits plus the bit length, used by the trie's node
    /// hash definition `H(n) = P(bottom, path) + len`.
    pub fn add_u64(&self, value: u64) -> Felt {
        self.add_mod(&Felt::from_u64(value))
    }
}

impl Default for Felt {
    fn default() -> Self {
        Felt::zero()
    }
}

impl fmt::Debug for Felt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Felt({})", self.to_hex_str())
    }
}

impl fmt::Display for Felt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex_str())
    }
}

impl serde::Serialize for Felt {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex_str())
    }
}

impl<'de> serde::Deserialize<'de> for Felt {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Felt::from_hex_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_round_trips() {
        assert!(Felt::zero().is_zero());
        assert_eq!(Felt::from_hex_str("").unwrap(), Felt::zero());
        assert_eq!(Felt::from_hex_str("0x0").unwrap().to_hex_str(), "0x0");
    }

    #[test]
    fn hex_round_trip() {
        let f = Felt::from_hex_str("0xcafe").unwrap();
        assert_eq!(f.to_hex_str(), "0xcafe");
    }

    #[test]
    fn bytes_round_trip() {
        let f = Felt::from_hex_str("0x1234abcd").unwrap();
        let bytes = f.to_be_bytes();
        assert_eq!(Felt::from_be_bytes(bytes).unwrap(), f);
    }

    #[test]
    fn overflow_is_rejected() {
        let too_big = format!("0x{}", "f".repeat(64));
        assert_eq!(Felt::from_hex_str(&too_big), Err(FeltError::Overflow));
    }

    #[test]
    fn addition_wraps_mod_p() {
        let p_minus_one = Felt(&*PRIME - BigUint::from(1u32));
        let one = Felt::one();
        assert_eq!(p_minus_one.add_mod(&one), Felt::zero());
    }

    #[test]
    fn sub_then_add_is_identity() {
        let a = Felt::from_u64(123456789);
        let b = Felt::from_u64(987654321);
        assert_eq!(a.add_mod(&b).sub_mod(&b), a);
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #[test]
            fn addition_is_commutative(a in any::<u64>(), b in any::<u64>()) {
                let (a, b) = (Felt::from_u64(a), Felt::from_u64(b));
                prop_assert_eq!(a.add_mod(&b), b.add_mod(&a));
            }

            #[test]
            fn addition_is_associative(a in any::<u64>(), b in any::<u64>(), c in any::<u64>()) {
                let (a, b, c) = (Felt::from_u64(a), Felt::from_u64(b), Felt::from_u64(c));
                prop_assert_eq!(a.add_mod(&b).add_mod(&c), a.add_mod(&b.add_mod(&c)));
            }

            #[test]
            fn sub_mod_inverts_add_mod(a in any::<u64>(), b in any::<u64>()) {
                let (a, b) = (Felt::from_u64(a), Felt::from_u64(b));
                prop_assert_eq!(a.add_mod(&b).sub_mod(&b), a);
            }

            #[test]
            fn multiplication_distributes_over_addition(a in any::<u64>(), b in any::<u64>(), c in any::<u64>()) {
                let (a, b, c) = (Felt::from_u64(a), Felt::from_u64(b), Felt::from_u64(c));
                prop_assert_eq!(a.mul_mod(&b.add_mod(&c)), a.mul_mod(&b).add_mod(&a.mul_mod(&c)));
            }

            #[test]
            fn bytes_round_trip(a in any::<u64>()) {
                let felt = Felt::from_u64(a);
                prop_assert_eq!(Felt::from_be_bytes(felt.to_be_bytes()).unwrap(), felt);
            }

            #[test]
            fn hex_round_trip(a in any::<u64>()) {
                let felt = Felt::from_u64(a);
                prop_assert_eq!(Felt::from_hex_str(&felt.to_hex_str()).unwrap(), felt);
            }
        }
    }
}
