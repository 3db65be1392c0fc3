//! Height-251 binary Merkle-Patricia trie over Pedersen-hashed [`Felt`]
//! keys, and the two-level (global + per-contract) wrapper that spec.md §4.D
//! builds on top of it.

pub mod bit_path;
pub mod contract;
pub mod merkle_node;
pub mod storage;
pub mod tree;

pub use bit_path::{BitPath, MAX_HEIGHT};
pub use contract::{
    compute_and_persist_contract_state, contract_state, recover_storage_root, ContractsStorageTree,
    StorageCommitmentTree,
};
pub use merkle_node::{node_hash, Node};
pub use storage::TrieStorage;
pub use tree::Trie;
