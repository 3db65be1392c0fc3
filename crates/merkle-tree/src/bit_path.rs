//! A bounded bit-string (`0..=251` bits), MSB-first, used as the trie's key
//! and edge-path representation (spec.md §4.C).
//!
//! The teacher (`pathfinder`) never names this type - it reaches for
//! `bitvec::vec::BitVec<u8, Msb0>` / `bitvec::slice::BitSlice<u8, Msb0>`
//! directly wherever a path appears (`EdgeNode::path`, `address.view_bits()`
//! in `contract.rs`). `BitPath` is a thin named wrapper over the same
//! `bitvec` machinery, exposing exactly the operations spec.md names.
use bitvec::prelude::{BitSlice, BitVec, Msb0};
use starkstate_crypto::Felt;

/// Height of the trie; the maximum length of a [`BitPath`].
pub const MAX_HEIGHT: usize = 251;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BitPath(BitVec<u8, Msb0>);

impl BitPath {
    pub fn empty() -> Self {
        BitPath(BitVec::new())
    }

    pub fn from_bits(bits: &BitSlice<u8, Msb0>) -> Self {
        debug_assert!(bits.len() <= MAX_HEIGHT);
        BitPath(bits.to_bitvec())
    }

    /// Reconstructs a path from `⌈length/8⌉` MSB-first bytes (the encoding
    /// [`BitPath::bytes`] produces), discarding the zero-padding bits in the
    /// last byte beyond `length`. Used when deserializing a persisted node
    /// (spec.md §6).
    pub fn from_bytes(bytes: &[u8], length: usize) -> Self {
        debug_assert!(length <= MAX_HEIGHT);
        debug_assert!(bytes.len() * 8 >= length);
        let bits = BitSlice::<u8, Msb0>::from_slice(bytes);
        BitPath(bits[..length].to_bitvec())
    }

    /// The full 251-bit path for a trie key (a contract address or a
    /// storage key, both represented as a [`Felt`]).
    pub fn from_felt(felt: &Felt) -> Self {
        let bytes = felt.to_be_bytes();
        let bits = BitSlice::<u8, Msb0>::from_slice(&bytes);
        BitPath(bits[bits.len() - MAX_HEIGHT..].to_bitvec())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, i: usize) -> bool {
        self.0[i]
    }

    /// Sets bit `i` to `1`.
    pub fn set(&mut self, i: usize) {
        self.0.set(i, true);
    }

    /// Prepends one bit on the high (root-facing) side, used by `put`/`delete`
    /// when extending an edge's path one level at a time (spec.md §4.D).
    pub fn push_high(&mut self, bit: bool) {
        self.0.insert(0, bit);
    }

    /// The suffix after skipping `k` leading bits. Does not mutate `self`.
    pub fn walked(&self, k: usize) -> BitPath {
        BitPath(self.0[k..].to_bitvec())
    }

    /// Length of the longest shared prefix with `other`.
    pub fn longest_common_prefix(&self, other: &BitSlice<u8, Msb0>) -> usize {
        self.0.iter().zip(other.iter()).take_while(|(a, b)| a == b).count()
    }

    pub fn as_bitslice(&self) -> &BitSlice<u8, Msb0> {
        &self.0
    }

    /// Interprets the path as the big-endian integer `path_as_felt` used by
    /// the node hash definition `H(n) = P(bottom, path_as_felt) + len`.
    pub fn to_felt(&self) -> Felt {
        let bits: Vec<bool> = self.0.iter().by_vals().collect();
        Felt::from_bits_be(&bits).expect("a path of at most 251 bits always fits the field")
    }

    /// The path bytes, `⌈len/8⌉` of them, MSB-first from the high end.
    pub fn bytes(&self) -> Vec<u8> {
        let mut owned = self.0.clone();
        owned.force_align();
        owned.into_vec()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn empty_path_has_zero_length() {
        assert_eq!(BitPath::empty().len(), 0);
        assert!(BitPath::empty().is_empty());
    }

    #[test]
    fn push_high_grows_from_the_root_side() {
        let mut path = BitPath::empty();
        path.push_high(true);
        path.push_high(false);
        assert_eq!(path.len(), 2);
        assert!(!path.get(0));
        assert!(path.get(1));
    }

    #[test]
    fn walked_returns_suffix_without_mutating() {
        let felt = Felt::from_u64(0b101);
        let path = BitPath::from_felt(&felt);
        assert_eq!(path.len(), MAX_HEIGHT);
        let suffix = path.walked(MAX_HEIGHT - 3);
        assert_eq!(suffix.len(), 3);
        assert!(suffix.get(0));
        assert!(!suffix.get(1));
        assert!(suffix.get(2));
        assert_eq!(path.len(), MAX_HEIGHT);
    }

    #[test]
    fn longest_common_prefix_stops_at_first_divergent_bit() {
        let a = BitPath::from_felt(&Felt::from_u64(0b1100));
        let b = BitPath::from_felt(&Felt::from_u64(0b1010));
        let lcp = a.longest_common_prefix(b.as_bitslice());
        assert_eq!(lcp, MAX_HEIGHT - 3);
    }

    #[test]
    fn to_felt_round_trips_through_from_felt() {
        let felt = Felt::from_hex_str("0x1234abcd").unwrap();
        let path = BitPath::from_felt(&felt);
        assert_eq!(path.to_felt(), felt);
    }

    #[test]
    fn bytes_round_trips_through_from_bytes() {
        let mut path = BitPath::empty();
        for bit in [true, false, true, true, false, false, true, true, false] {
            path.push_high(bit);
        }
        let bytes = path.bytes();
        let rebuilt = BitPath::from_bytes(&bytes, path.len());
        assert_eq!(rebuilt, path);
    }

    #[rstest]
    #[case("0x0", "0x0", MAX_HEIGHT)]
    #[case("0x1", "0x0", MAX_HEIGHT - 1)]
    #[case("0xc", "0xa", MAX_HEIGHT - 3)]
    #[case("0xf", "0xf", MAX_HEIGHT)]
    // `0x4` followed by 62 zero hex digits sets only the path's top bit
    // (value 2^250), so it diverges from zero at the very first bit.
    #[case("0x400000000000000000000000000000000000000000000000000000000000000", "0x0", 0)]
    fn longest_common_prefix_matches_expected_length(
        #[case] a: &str,
        #[case] b: &str,
        #[case] expected: usize,
    ) {
        let lhs = BitPath::from_felt(&Felt::from_hex_str(a).unwrap());
        let rhs = BitPath::from_felt(&Felt::from_hex_str(b).unwrap());
        assert_eq!(lhs.longest_common_prefix(rhs.as_bitslice()), expected);
    }

    #[rstest]
    #[case(0, MAX_HEIGHT - 1, false)]
    #[case(1, MAX_HEIGHT - 1, true)]
    #[case(0b10, MAX_HEIGHT - 2, true)]
    #[case(0b10, MAX_HEIGHT - 1, false)]
    fn get_reads_the_expected_bit(#[case] felt: u64, #[case] index: usize, #[case] expected: bool) {
        let path = BitPath::from_felt(&Felt::from_u64(felt));
        assert_eq!(path.get(index), expected);
    }
}
