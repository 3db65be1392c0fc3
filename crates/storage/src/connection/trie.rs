//! [`TrieStorage`] for a writer's [`Transaction`], plus the node
//! serialization format from spec.md §6 (a JSON object with `length`,
//! `path`, `bottom`) and the two tag-prefixed keyspaces it persists under.
use serde::{Deserialize, Serialize};
use starkstate_common::Error;
use starkstate_crypto::Felt;
use starkstate_merkle_tree::{BitPath, Node, TrieStorage};

use super::Transaction;

const NODE_TAG: u8 = 0x01;
const PREIMAGE_TAG: u8 = 0x00;

impl TrieStorage for Transaction<'_> {
    fn get_node(&self, hash: &Felt) -> Result<Option<Node>, Error> {
        match self.get(&node_key(hash))? {
            Some(bytes) => Ok(Some(deserialize_node(&bytes)?)),
            None => Ok(None),
        }
    }

    fn put_node(&self, hash: &Felt, node: &Node) -> Result<(), Error> {
        self.put(&node_key(hash), &serialize_node(node))
    }

    fn get_preimage(&self, digest: &Felt) -> Result<Option<(Felt, Felt)>, Error> {
        let Some(bytes) = self.get(&preimage_key(digest))? else {
            return Ok(None);
        };
        if bytes.len() != 64 {
            return Err(Error::InvalidValue(format!(
                "Pedersen preimage entry is {} bytes, expected 64",
                bytes.len()
            )));
        }
        let a = Felt::from_be_bytes(bytes[0..32].try_into().expect("slice is 32 bytes"))?;
        let b = Felt::from_be_bytes(bytes[32..64].try_into().expect("slice is 32 bytes"))?;
        Ok(Some((a, b)))
    }

    fn put_preimage(&self, digest: &Felt, a: &Felt, b: &Felt) -> Result<(), Error> {
        let mut value = Vec::with_capacity(64);
        value.extend_from_slice(&a.to_be_bytes());
        value.extend_from_slice(&b.to_be_bytes());
        self.put(&preimage_key(digest), &value)
    }
}

fn node_key(hash: &Felt) -> Vec<u8> {
    let mut key = Vec::with_capacity(33);
    key.push(NODE_TAG);
    key.extend_from_slice(&hash.to_be_bytes());
    key
}

fn preimage_key(digest: &Felt) -> Vec<u8> {
    let mut key = Vec::with_capacity(33);
    key.push(PREIMAGE_TAG);
    key.extend_from_slice(&digest.to_be_bytes());
    key
}

#[derive(Serialize, Deserialize)]
struct SerializedNode {
    length: u16,
    path: String,
    bottom: String,
}

fn serialize_node(node: &Node) -> Vec<u8> {
    let serialized = SerializedNode {
        length: node.path.len() as u16,
        path: encode_hex_no_leading_zeros(&node.path.bytes()),
        bottom: node.bottom.to_hex_str(),
    };
    serde_json::to_vec(&serialized).expect("SerializedNode always serializes")
}

fn deserialize_node(bytes: &[u8]) -> Result<Node, Error> {
    let serialized: SerializedNode = serde_json::from_slice(bytes)
        .map_err(|e| Error::InvalidValue(format!("corrupt node entry: {e}")))?;
    let length = serialized.length as usize;
    let expected_bytes = length.div_ceil(8);
    let raw = decode_hex(&serialized.path)?;
    if raw.len() > expected_bytes {
        return Err(Error::InvalidValue("path hex longer than its declared length".into()));
    }
    let mut padded = vec![0u8; expected_bytes];
    padded[expected_bytes - raw.len()..].copy_from_slice(&raw);

    let path = BitPath::from_bytes(&padded, length);
    let bottom = Felt::from_hex_str(&serialized.bottom)?;
    Ok(Node::edge(path, bottom))
}

fn encode_hex_no_leading_zeros(bytes: &[u8]) -> String {
    if bytes.iter().all(|b| *b == 0) {
        return "0x0".to_string();
    }
    let full = hex::encode(bytes);
    format!("0x{}", full.trim_start_matches('0'))
}

fn decode_hex(s: &str) -> Result<Vec<u8>, Error> {
    let stripped = s.strip_prefix("0x").unwrap_or(s);
    if stripped.is_empty() || stripped == "0" {
        return Ok(Vec::new());
    }
    let padded = if stripped.len() % 2 == 1 { format!("0{stripped}") } else { stripped.to_string() };
    hex::decode(padded).map_err(|e| Error::InvalidValue(format!("bad hex: {e}")))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use starkstate_crypto::pedersen_hash;
    use starkstate_merkle_tree::MAX_HEIGHT;

    use super::*;
    use crate::Storage;

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(8)]
    #[case(9)]
    #[case(250)]
    #[case(251)]
    fn edge_node_round_trips_at_every_path_length(#[case] length: usize) {
        let storage = Storage::in_memory().unwrap();
        let mut conn = storage.connection().unwrap();
        let tx = conn.transaction().unwrap();

        let full = BitPath::from_felt(&Felt::from_u64(0xABCD));
        let path = full.walked(MAX_HEIGHT - length);
        let node = if path.is_empty() { Node::leaf(Felt::from_u64(7)) } else { Node::edge(path, Felt::from_u64(7)) };

        let hash = node.hash();
        tx.put_node(&hash, &node).unwrap();
        assert_eq!(tx.get_node(&hash).unwrap().unwrap(), node);
    }

    #[test]
    fn node_round_trips_through_serialization() {
        let storage = Storage::in_memory().unwrap();
        let mut conn = storage.connection().unwrap();
        let tx = conn.transaction().unwrap();

        let path = BitPath::from_felt(&Felt::from_u64(1));
        let node = Node::edge(path, Felt::from_u64(2));
        let hash = node.hash();

        tx.put_node(&hash, &node).unwrap();
        let loaded = tx.get_node(&hash).unwrap().unwrap();
        assert_eq!(loaded, node);
    }

    #[test]
    fn leaf_node_round_trips_with_zero_length_path() {
        let storage = Storage::in_memory().unwrap();
        let mut conn = storage.connection().unwrap();
        let tx = conn.transaction().unwrap();

        let node = Node::leaf(Felt::from_u64(7));
        tx.put_node(&node.hash(), &node).unwrap();
        let loaded = tx.get_node(&node.hash()).unwrap().unwrap();
        assert_eq!(loaded, node);
    }

    #[test]
    fn preimage_round_trips_and_matches_pedersen() {
        let storage = Storage::in_memory().unwrap();
        let mut conn = storage.connection().unwrap();
        let tx = conn.transaction().unwrap();

        let a = Felt::from_u64(3);
        let b = Felt::from_u64(4);
        let digest = pedersen_hash(&a, &b);

        tx.put_preimage(&digest, &a, &b).unwrap();
        assert_eq!(tx.get_preimage(&digest).unwrap(), Some((a, b)));
    }

    #[test]
    fn missing_node_returns_none() {
        let storage = Storage::in_memory().unwrap();
        let mut conn = storage.connection().unwrap();
        let tx = conn.transaction().unwrap();
        assert_eq!(tx.get_node(&Felt::from_u64(999)).unwrap(), None);
    }

    #[test]
    fn corrupt_node_entry_is_reported_as_invalid_value() {
        let storage = Storage::in_memory().unwrap();
        let mut conn = storage.connection().unwrap();
        let tx = conn.transaction().unwrap();

        let hash = Felt::from_u64(1);
        tx.put(&node_key(&hash), b"not json").unwrap();

        let err = tx.get_node(&hash).unwrap_err();
        assert_matches::assert_matches!(err, Error::InvalidValue(_));
    }

    #[test]
    fn preimage_entry_of_the_wrong_length_is_reported_as_invalid_value() {
        let storage = Storage::in_memory().unwrap();
        let mut conn = storage.connection().unwrap();
        let tx = conn.transaction().unwrap();

        let digest = Felt::from_u64(1);
        tx.put(&preimage_key(&digest), b"too short").unwrap();

        let err = tx.get_preimage(&digest).unwrap_err();
        assert_matches::assert_matches!(err, Error::InvalidValue(_));
    }
}
