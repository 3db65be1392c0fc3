//! Backing store abstraction for the trie.
//!
//! The teacher's `crate::storage::Storage` trait (referenced throughout
//! `contract.rs`: `ContractStorage`/`StorageTrieStorage` implement
//! `get`/`hash`/`leaf` keyed by sqlite row id) is kept as an interface but
//! re-keyed from `u64` row-id to content hash per spec.md §3/§6: the trie's
//! persistence model is two disjoint tag-prefixed keyspaces inside one KV
//! store rather than a relational table with auto-increment ids.
use starkstate_common::Error;
use starkstate_crypto::Felt;

use crate::merkle_node::Node;

/// Everything the trie needs from its backing KV store.
///
/// Implementors (see `starkstate-storage`) hold a single writer's
/// transaction; every call here may block on I/O (spec.md §5).
pub trait TrieStorage {
    /// Loads a node by its hash from the `0x01` keyspace.
    fn get_node(&self, hash: &Felt) -> Result<Option<Node>, Error>;

    /// Persists a node under its own hash in the `0x01` keyspace.
    fn put_node(&self, hash: &Felt, node: &Node) -> Result<(), Error>;

    /// Looks up the Pedersen preimage `(a, b)` of `digest = P(a, b)` from the
    /// `0x00` keyspace - the trie's "inversion" lookup (spec.md §9).
    fn get_preimage(&self, digest: &Felt) -> Result<Option<(Felt, Felt)>, Error>;

    /// Persists `digest = P(a, b)`'s preimage in the `0x00` keyspace.
    fn put_preimage(&self, digest: &Felt, a: &Felt, b: &Felt) -> Result<(), Error>;
}

/// Lets a single `&Transaction` back several [`crate::tree::Trie`]s at once
/// (a global trie plus one per touched contract), since every [`TrieStorage`]
/// method only needs `&self`.
impl<T: TrieStorage + ?Sized> TrieStorage for &T {
    fn get_node(&self, hash: &Felt) -> Result<Option<Node>, Error> {
        (**self).get_node(hash)
    }

    fn put_node(&self, hash: &Felt, node: &Node) -> Result<(), Error> {
        (**self).put_node(hash, node)
    }

    fn get_preimage(&self, digest: &Felt) -> Result<Option<(Felt, Felt)>, Error> {
        (**self).get_preimage(digest)
    }

    fn put_preimage(&self, digest: &Felt, a: &Felt, b: &Felt) -> Result<(), Error> {
        (**self).put_preimage(digest, a, b)
    }
}
