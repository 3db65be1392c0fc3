//! Minimal short Weierstrass curve arithmetic over the StarkNet field,
//! just sufficient for the Pedersen hash's point combination. Not a
//! general-purpose elliptic curve library: no subgroup checks, no
//! constant-time guarantees - the Pedersen hash only ever multiplies
//! fixed public points by public felts.
use crate::consts::ALPHA;
use crate::felt::Felt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AffinePoint {
    Identity,
    Point { x: Felt, y: Felt },
}

impl AffinePoint {
    pub fn new_unchecked(x: Felt, y: Felt) -> Self {
        AffinePoint::Point { x, y }
    }

    pub fn x(&self) -> Option<&Felt> {
        match self {
            AffinePoint::Identity => None,
            AffinePoint::Point { x, .. } => Some(x),
        }
    }

    pub fn add(&self, other: &AffinePoint) -> AffinePoint {
        match (self, other) {
            (AffinePoint::Identity, p) => p.clone(),
            (p, AffinePoint::Identity) => p.clone(),
            (AffinePoint::Point { x: x1, y: y1 }, AffinePoint::Point { x: x2, y: y2 }) => {
                if x1 == x2 {
                    if y1.add_mod(y2).is_zero() {
                        return AffinePoint::Identity;
                    }
                    return self.double();
                }
                let lambda = y2.sub_mod(y1).mul_mod(&x2.sub_mod(x1).inverse());
                let x3 = lambda.mul_mod(&lambda).sub_mod(x1).sub_mod(x2);
                let y3 = lambda.mul_mod(&x1.sub_mod(&x3)).sub_mod(y1);
                AffinePoint::Point { x: x3, y: y3 }
            }
        }
    }

    pub fn double(&self) -> AffinePoint {
        match self {
            AffinePoint::Identity => AffinePoint::Identity,
            AffinePoint::Point { x, y } => {
                if y.is_zero() {
                    return AffinePoint::Identity;
                }
                let three_x2 = x.mul_mod(x).mul_mod(&Felt::from_u64(3));
                let numerator = three_x2.add_mod(&Felt::from_u64(ALPHA));
                let denominator = y.add_mod(y).inverse();
                let lambda = numerator.mul_mod(&denominator);
                let x3 = lambda.mul_mod(&lambda).sub_mod(x).sub_mod(x);
                let y3 = lambda.mul_mod(&x.sub_mod(&x3)).sub_mod(y);
                AffinePoint::Point { x: x3, y: y3 }
            }
        }
    }

    /// Double-and-add scalar multiplication, MSB first.
    pub fn scalar_mul(&self, scalar: &Felt) -> AffinePoint {
        let bytes = scalar.to_be_bytes();
        let mut acc = AffinePoint::Identity;
        for byte in bytes {
            for i in (0..8).rev() {
                acc = acc.double();
                if (byte >> i) & 1 == 1 {
                    acc = acc.add(self);
                }
            }
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SHIFT_POINT;

    #[test]
    fn doubling_then_halving_by_addition_is_consistent() {
        let p = SHIFT_POINT.clone();
        let doubled = p.double();
        let added = p.add(&p);
        assert_eq!(doubled, added);
    }

    #[test]
    fn scalar_mul_by_one_is_identity_op() {
        let p = SHIFT_POINT.clone();
        assert_eq!(p.scalar_mul(&Felt::one()), p);
    }

    #[test]
    fn scalar_mul_by_zero_is_point_at_infinity() {
        let p = SHIFT_POINT.clone();
        assert_eq!(p.scalar_mul(&Felt::zero()), AffinePoint::Identity);
    }

    #[test]
    fn scalar_mul_by_two_matches_doubling() {
        let p = SHIFT_POINT.clone();
        assert_eq!(p.scalar_mul(&Felt::from_u64(2)), p.double());
    }
}
