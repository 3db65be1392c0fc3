//! The StarkNet Pedersen hash: `P(a, b) -> Felt`.
use num_bigint::BigUint;

use crate::consts::{LOW_BITS, P1, P2, P3, P4, SHIFT_POINT};
use crate::felt::Felt;

fn split(value: &Felt) -> (Felt, Felt) {
    let mask = (BigUint::from(1u32) << LOW_BITS) - BigUint::from(1u32);
    let low = value.as_biguint() & &mask;
    let high = value.as_biguint() >> LOW_BITS;
    (
        Felt::from_biguint_exact(low),
        Felt::from_biguint_exact(high),
    )
}

/// Computes the StarkNet Pedersen hash of two field elements.
///
/// `P(a, b) = shift_point + a_low*P1 + a_high*P2 + b_low*P3 + b_high*P4`,
/// where `*_low` is the low 248 bits of the operand and `*_high` its
/// remaining high bits.
pub fn pedersen_hash(a: &Felt, b: &Felt) -> Felt {
    let (a_low, a_high) = split(a);
    let (b_low, b_high) = split(b);

    let result = SHIFT_POINT
        .add(&P1.scalar_mul(&a_low))
        .add(&P2.scalar_mul(&a_high))
        .add(&P3.scalar_mul(&b_low))
        .add(&P4.scalar_mul(&b_high));

    result.x().cloned().unwrap_or_else(Felt::zero)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_deterministic() {
        let a = Felt::from_hex_str("0x1").unwrap();
        let b = Felt::from_hex_str("0x2").unwrap();
        assert_eq!(pedersen_hash(&a, &b), pedersen_hash(&a, &b));
    }

    #[test]
    fn is_not_commutative_in_general() {
        let a = Felt::from_hex_str("0x1").unwrap();
        let b = Felt::from_hex_str("0x2").unwrap();
        assert_ne!(pedersen_hash(&a, &b), pedersen_hash(&b, &a));
    }

    #[test]
    fn differs_for_differing_inputs() {
        let a = Felt::from_hex_str("0x1").unwrap();
        let b = Felt::from_hex_str("0x2").unwrap();
        let c = Felt::from_hex_str("0x3").unwrap();
        assert_ne!(pedersen_hash(&a, &b), pedersen_hash(&a, &c));
    }

    #[test]
    fn zero_zero_is_a_fixed_point() {
        // P(0,0) is just the shift point's x-coordinate.
        let h = pedersen_hash(&Felt::zero(), &Felt::zero());
        assert!(!h.is_zero());
    }
}
