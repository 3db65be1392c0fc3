//! Domain types shared by the trie, storage and state-update crates.
//!
//! Everything here is a thin, newtype wrapper over [`starkstate_crypto::Felt`]
//! plus the `StateDiff` input record from spec.md §3 and the shared `Error`
//! enum from spec.md §7.
mod error;
mod state_diff;
mod types;

pub use error::{Error, Result};
pub use starkstate_crypto::Felt;
pub use state_diff::{DeployedContract, StateDiff, StorageDiff};
pub use types::{ClassHash, ContractAddress, SequenceNumber, StorageKey, StorageValue};
