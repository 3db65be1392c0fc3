//! Applies a [`StateDiff`] to the persisted trie and produces a new state
//! root (spec.md §4.E).
//!
//! Grounded on the teacher's `pathfinder-rpc`/sync pipeline shape (open a
//! transaction, mutate via `StorageCommitmentTree`/`ContractsStorageTree`,
//! commit or roll back) and on `test_state_rollback.rs`'s logging
//! granularity (`tracing::info!`/`tracing::debug!` around transaction open,
//! per-contract apply, and commit).
use starkstate_common::{Error, Felt, SequenceNumber, StateDiff};
use starkstate_merkle_tree::{compute_and_persist_contract_state, recover_storage_root, ContractsStorageTree, StorageCommitmentTree};
use starkstate_storage::Connection;

/// Applies state diffs to the trie persisted behind a [`Connection`].
///
/// Holds no state of its own: the contract-hash index (spec.md §9, "Global
/// mutable singleton for the contract-hash index") lives in the KV store
/// under the `contract_hash:<address>` key rather than as a field here, so
/// `apply` can be a free function over `&mut Connection` with no setup step.
pub struct StateProcessor;

impl StateProcessor {
    /// Opens one transaction, applies `diff`, and either commits a new root
    /// or rolls back entirely - partial application is never observable
    /// (spec.md §4.E, §5).
    pub fn apply(
        connection: &mut Connection,
        diff: &StateDiff,
        expected_root: Option<Felt>,
        sequence_number: SequenceNumber,
    ) -> Result<Felt, Error> {
        tracing::debug!(
            deployed = diff.deployed_contracts.len(),
            storage_diffs = diff.storage_diffs.len(),
            %sequence_number,
            "opening transaction to apply state diff"
        );
        let tx = connection.transaction().map_err(Error::from)?;

        let global_root = tx.state_root()?;
        let mut global = StorageCommitmentTree::new(&tx, global_root)?;

        for deployed in &diff.deployed_contracts {
            tracing::debug!(address = %deployed.address, class_hash = %deployed.class_hash, "deploying contract");
            tx.set_contract_class_hash(&deployed.address, &deployed.class_hash)?;

            let storage_root = match global.get(&deployed.address)? {
                Some(leaf) => recover_storage_root(&tx, &leaf)?,
                None => Felt::zero(),
            };
            let leaf = compute_and_persist_contract_state(&tx, &deployed.class_hash, &storage_root)?;
            global.set(&deployed.address, leaf)?;
        }

        for storage_diff in &diff.storage_diffs {
            let class_hash = tx.contract_class_hash(&storage_diff.address)?.ok_or_else(|| {
                Error::InvalidInput(format!(
                    "storage diff references undeployed contract {}",
                    storage_diff.address
                ))
            })?;

            let storage_root = match global.get(&storage_diff.address)? {
                Some(leaf) => recover_storage_root(&tx, &leaf)?,
                None => Felt::zero(),
            };
            let mut contract_storage = ContractsStorageTree::new(&tx, Some(storage_root))?;
            for (key, value) in &storage_diff.entries {
                contract_storage.set(key, value.clone())?;
            }

            tracing::debug!(
                address = %storage_diff.address,
                entries = storage_diff.entries.len(),
                storage_root = %contract_storage.root_hash(),
                "applied storage diff"
            );

            let leaf = compute_and_persist_contract_state(&tx, &class_hash, &contract_storage.root_hash())?;
            global.set(&storage_diff.address, leaf)?;
        }

        let new_root = global.root_hash();
        if let Some(expected) = expected_root {
            if new_root != expected {
                tracing::warn!(computed = %new_root, %expected, "state root mismatch, rolling back");
                tx.rollback().map_err(Error::from)?;
                return Err(Error::RootMismatch { expected, computed: new_root });
            }
        }

        tx.set_state_root(&new_root)?;
        tx.set_latest_block_synced(sequence_number.get())?;
        tx.commit().map_err(Error::from)?;

        tracing::info!(root = %new_root, %sequence_number, "committed state diff");
        Ok(new_root)
    }
}
