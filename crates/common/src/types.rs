use serde::{Deserialize, Serialize};
use starkstate_crypto::Felt;

macro_rules! felt_wrapper {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Felt);

        impl $name {
            pub const fn new(felt: Felt) -> Self {
                Self(felt)
            }

            pub fn as_felt(&self) -> &Felt {
                &self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0.is_zero()
            }
        }

        impl From<Felt> for $name {
            fn from(felt: Felt) -> Self {
                Self(felt)
            }
        }

        impl From<$name> for Felt {
            fn from(wrapper: $name) -> Self {
                wrapper.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

felt_wrapper!(ContractAddress, "The address a contract is deployed under in the global trie.");
felt_wrapper!(ClassHash, "A contract class hash, as recorded by `deployed_contracts`.");
felt_wrapper!(StorageKey, "A key into a single contract's storage trie.");
felt_wrapper!(StorageValue, "A value stored under a [`StorageKey`].");

/// The monotonically increasing block/diff counter persisted under
/// `latestBlockSynced` (spec.md §6).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SequenceNumber(pub u64);

impl SequenceNumber {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapper_round_trips_through_felt() {
        let felt = Felt::from_hex_str("0xabc").unwrap();
        let address = ContractAddress::from(felt.clone());
        assert_eq!(Felt::from(address), felt);
    }
}
