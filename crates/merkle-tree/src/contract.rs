//! The two-level trie structure spec.md §4.D builds on top of the generic
//! [`Trie`]: one global "storage commitment" trie keyed by contract address,
//! and one per-contract storage trie keyed by storage key.
//!
//! Grounded on the teacher's `StorageCommitmentTree`/`ContractsStorageTree`
//! (same names, same two-level shape) but stripped of `BlockNumber`-keyed
//! history and the `get_proof`/`dfs` projections the teacher builds for RPC
//! proof responses - spec.md §1 puts proof generation out of scope.
use starkstate_common::{ClassHash, ContractAddress, Error, StorageKey, StorageValue};
use starkstate_crypto::{pedersen_hash, Felt};

use crate::bit_path::BitPath;
use crate::storage::TrieStorage;
use crate::tree::Trie;

/// The global trie mapping every deployed contract's address to
/// `contract_state(class_hash, storage_root)`.
pub struct StorageCommitmentTree<S> {
    trie: Trie<S>,
}

impl<S: TrieStorage> StorageCommitmentTree<S> {
    pub fn new(store: S, root_hash: Option<Felt>) -> Result<Self, Error> {
        Ok(Self { trie: Trie::new(store, root_hash)? })
    }

    pub fn root_hash(&self) -> Felt {
        self.trie.root_hash()
    }

    pub fn get(&self, address: &ContractAddress) -> Result<Option<Felt>, Error> {
        self.trie.get(&BitPath::from_felt(address.as_felt()))
    }

    pub fn set(&mut self, address: &ContractAddress, leaf: Felt) -> Result<(), Error> {
        self.trie.put(&BitPath::from_felt(address.as_felt()), leaf)
    }
}

/// A single contract's storage trie, mapping [`StorageKey`] to [`StorageValue`].
pub struct ContractsStorageTree<S> {
    trie: Trie<S>,
}

impl<S: TrieStorage> ContractsStorageTree<S> {
    pub fn new(store: S, root_hash: Option<Felt>) -> Result<Self, Error> {
        Ok(Self { trie: Trie::new(store, root_hash)? })
    }

    pub fn root_hash(&self) -> Felt {
        self.trie.root_hash()
    }

    pub fn get(&self, key: &StorageKey) -> Result<Option<StorageValue>, Error> {
        Ok(self.trie.get(&BitPath::from_felt(key.as_felt()))?.map(StorageValue::from))
    }

    pub fn set(&mut self, key: &StorageKey, value: StorageValue) -> Result<(), Error> {
        self.trie.put(&BitPath::from_felt(key.as_felt()), value.into())
    }
}

/// `C(class_hash, storage_root) = P(P(P(class_hash, storage_root), 0), 0)`,
/// the leaf a contract contributes to the global [`StorageCommitmentTree`]
/// (spec.md §4.D).
pub fn contract_state(class_hash: &ClassHash, storage_root: &Felt) -> Felt {
    let inner = pedersen_hash(class_hash.as_felt(), storage_root);
    let mid = pedersen_hash(&inner, &Felt::zero());
    pedersen_hash(&mid, &Felt::zero())
}

/// Same computation as [`contract_state`], but also records every
/// intermediate Pedersen preimage so [`recover_storage_root`] can invert it
/// later - the `StateProcessor` needs this to recover a deployed contract's
/// prior storage root from its leaf (spec.md §4.E step 3b, §9 "Inversion of
/// Pedersen").
pub fn compute_and_persist_contract_state<S: TrieStorage>(
    store: &S,
    class_hash: &ClassHash,
    storage_root: &Felt,
) -> Result<Felt, Error> {
    let inner = pedersen_hash(class_hash.as_felt(), storage_root);
    store.put_preimage(&inner, class_hash.as_felt(), storage_root)?;
    let mid = pedersen_hash(&inner, &Felt::zero());
    store.put_preimage(&mid, &inner, &Felt::zero())?;
    let leaf = pedersen_hash(&mid, &Felt::zero());
    store.put_preimage(&leaf, &mid, &Felt::zero())?;
    Ok(leaf)
}

/// Inverts a [`contract_state`] leaf back to its `storage_root` via three
/// Pedersen-preimage lookups. Fails [`Error::InvalidValue`] if `leaf` was
/// never computed through [`compute_and_persist_contract_state`].
pub fn recover_storage_root<S: TrieStorage>(store: &S, leaf: &Felt) -> Result<Felt, Error> {
    let not_found = || Error::InvalidValue("contract state leaf has no recorded Pedersen preimage".into());
    let (mid, _) = store.get_preimage(leaf)?.ok_or_else(not_found)?;
    let (inner, _) = store.get_preimage(&mid)?.ok_or_else(not_found)?;
    let (_, storage_root) = store.get_preimage(&inner)?.ok_or_else(not_found)?;
    Ok(storage_root)
}
