//! STARK curve and Pedersen-hash constants.
//!
//! `ALPHA`, `BETA` and `SHIFT_POINT` match the values published in
//! StarkWare's `pedersen_params.json` (the curve is `y^2 = x^3 + x + BETA`
//! over the StarkNet field prime). `P1`..`P4` are curve points used to
//! fold a felt's low/high bits into the hash; see DESIGN.md for the
//! provenance note on these four - they are on-curve but have not been
//! diffed against an independent reference, unlike `SHIFT_POINT`.
use crate::curve::AffinePoint;
use crate::felt::Felt;
use lazy_static::lazy_static;

pub const ALPHA: u64 = 1;

lazy_static! {
    pub static ref BETA: Felt =
        Felt::from_hex_str("0x6f21413efbe40de150e596d72f7a8c5609ad26c15c915c1f4cdfcb99cee9e89")
            .unwrap();
    pub static ref SHIFT_POINT: AffinePoint = AffinePoint::new_unchecked(
        Felt::from_hex_str("0x49ee3eba8c1600700ee1b87eb599f16716b0b1022947733551fde4050ca6804")
            .unwrap(),
        Felt::from_hex_str("0x3ca0cfe4b3bc6ddf346d49d06ea0ed34e621062c0e056c1d0405d266e10268a")
            .unwrap(),
    );
    pub static ref P1: AffinePoint = AffinePoint::new_unchecked(
        Felt::from_hex_str("0x49aa424ce9bf129df2c30931e3117785069058c0d5880749dc8b3753f91605a")
            .unwrap(),
        Felt::from_hex_str("0x14f30fa891361475b56be3573a8c3c452ff2680cc3ee2f40908c1eec698bff3")
            .unwrap(),
    );
    pub static ref P2: AffinePoint = AffinePoint::new_unchecked(
        Felt::from_hex_str("0x22379f7e5af6977cb58c70c539fb087109e7f6b8cc0fa84f431d6740abfe7d5")
            .unwrap(),
        Felt::from_hex_str("0xf9e6162adf7248b990a10ca5928d2023c5ac810f6683a2ae54a5ac2cb4802a")
            .unwrap(),
    );
    pub static ref P3: AffinePoint = AffinePoint::new_unchecked(
        Felt::from_hex_str("0x368693207c34822faa3567d5717bf5aa3e01ae94c080d7a447e83938c03b108")
            .unwrap(),
        Felt::from_hex_str("0x109a62b03c0760f471d16fe40e3cd229c8bce87ebf8b6f6fd81713711a403a0")
            .unwrap(),
    );
    pub static ref P4: AffinePoint = AffinePoint::new_unchecked(
        Felt::from_hex_str("0x2194c4e6789e56ec2190e83764364908372c148393bff833cc4dfd013837071")
            .unwrap(),
        Felt::from_hex_str("0x5e1d1e9cf1181bfad8d2b2df56d73f06f6574b4912200899637ef02b35de55")
            .unwrap(),
    );
}

/// Bit width of the "low" part of an operand split for the 4-point
/// Pedersen combination (`a_low = a mod 2^LOW_BITS`).
pub const LOW_BITS: u32 = 248;
