//! The trie's unified node shape (spec.md §3): a pair `(path, bottom)`
//! interpreted as a leaf, a binary branch, or a compressed edge depending on
//! `path`'s length and the node's position in the tree.
//!
//! Proof generation is explicitly out of scope (spec.md §1), so unlike the
//! teacher's `merkle_node.rs` this module does not need an `Unresolved`
//! variant or a `ProofNode` projection - every node the trie touches is
//! either fully resolved from the store or freshly constructed.
use starkstate_crypto::{pedersen_hash, Felt};

use crate::bit_path::BitPath;

/// The on-disk shape of every persisted node, keyed by its own hash under
/// the `0x01` tag (spec.md §3/§6).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub path: BitPath,
    pub bottom: Felt,
}

impl Node {
    pub fn leaf(value: Felt) -> Self {
        Node { path: BitPath::empty(), bottom: value }
    }

    pub fn binary(bottom: Felt) -> Self {
        Node { path: BitPath::empty(), bottom }
    }

    pub fn edge(path: BitPath, bottom: Felt) -> Self {
        Node { path, bottom }
    }

    pub fn hash(&self) -> Felt {
        node_hash(&self.path, &self.bottom)
    }
}

/// `H(n)` from spec.md §3: `n.bottom` when the path is empty (this covers
/// both the leaf case, where `bottom` is the stored value, and the binary
/// case, where `bottom = P(H(left), H(right))`), otherwise
/// `P(bottom, path_as_felt) + len`.
pub fn node_hash(path: &BitPath, bottom: &Felt) -> Felt {
    if path.is_empty() {
        bottom.clone()
    } else {
        pedersen_hash(bottom, &path.to_felt()).add_u64(path.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_hash_is_its_value() {
        let value = Felt::from_u64(2);
        assert_eq!(Node::leaf(value.clone()).hash(), value);
    }

    #[test]
    fn edge_hash_matches_scenario_2_of_the_spec() {
        // put(key=1, value=2) at height 251: root_hash() == P(2,1) + 251.
        let path = BitPath::from_felt(&Felt::from_u64(1));
        let node = Node::edge(path, Felt::from_u64(2));
        let expected = pedersen_hash(&Felt::from_u64(2), &Felt::from_u64(1)).add_u64(251);
        assert_eq!(node.hash(), expected);
    }
}
