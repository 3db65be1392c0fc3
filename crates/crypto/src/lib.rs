//! Field element and Pedersen hash primitives for the StarkNet state
//! commitment trie. See `SPEC_FULL.md` components A and B.
mod consts;
mod curve;
mod felt;
mod pedersen;

pub use curve::AffinePoint;
pub use felt::{Felt, FeltError};
pub use pedersen::pedersen_hash;
