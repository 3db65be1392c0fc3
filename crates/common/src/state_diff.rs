use serde::{Deserialize, Serialize};
use starkstate_crypto::Felt;

use crate::{ClassHash, ContractAddress, StorageKey, StorageValue};

/// One newly deployed contract, per spec.md §3 `StateDiff.deployed_contracts`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployedContract {
    pub address: ContractAddress,
    pub class_hash: ClassHash,
    #[serde(default)]
    pub constructor_calldata: Vec<Felt>,
}

/// Ordered storage mutations for a single contract, per spec.md §3
/// `StateDiff.storage_diffs`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageDiff {
    pub address: ContractAddress,
    pub entries: Vec<(StorageKey, StorageValue)>,
}

/// Authoritative per-block mutation record (spec.md §3). `storage_diffs` is
/// kept as an ordered `Vec` rather than a `HashMap` so replay across two
/// processors is bit-for-bit deterministic even when the source reuses an
/// address across multiple entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDiff {
    #[serde(default)]
    pub deployed_contracts: Vec<DeployedContract>,
    #[serde(default)]
    pub storage_diffs: Vec<StorageDiff>,
}

impl StateDiff {
    pub fn is_empty(&self) -> bool {
        self.deployed_contracts.is_empty() && self.storage_diffs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let diff = StateDiff {
            deployed_contracts: vec![DeployedContract {
                address: ContractAddress::from(Felt::from_hex_str("0xa").unwrap()),
                class_hash: ClassHash::from(Felt::from_hex_str("0xcafe").unwrap()),
                constructor_calldata: vec![Felt::from_u64(1)],
            }],
            storage_diffs: vec![StorageDiff {
                address: ContractAddress::from(Felt::from_hex_str("0xa").unwrap()),
                entries: vec![(
                    StorageKey::from(Felt::from_hex_str("0x1").unwrap()),
                    StorageValue::from(Felt::from_hex_str("0x7").unwrap()),
                )],
            }],
        };

        let json = serde_json::to_string(&diff).unwrap();
        let parsed: StateDiff = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, diff);
    }
}
