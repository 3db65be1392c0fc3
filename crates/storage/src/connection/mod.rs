//! The writer's transaction: raw KV access plus the scalar keys from
//! spec.md §6, grounded on the teacher's `Transaction<'tx>` wrapper
//! (`connection/block.rs`'s `tx.inner().execute(...)` style, `tx.commit()`).
use starkstate_common::{ClassHash, ContractAddress, Error};

mod trie;

/// One writer's transaction against the `kv` table.
///
/// Every mutating operation on the trie and the state processor is
/// serialised by this transaction (spec.md §5's single-writer model); there
/// is no locking inside this type itself, that guarantee comes from holding
/// a `&mut Connection` for its lifetime.
pub struct Transaction<'conn> {
    inner: rusqlite::Transaction<'conn>,
}

impl<'conn> Transaction<'conn> {
    pub(crate) fn new(inner: rusqlite::Transaction<'conn>) -> Self {
        Self { inner }
    }

    /// The raw `rusqlite` transaction, for call sites that need direct SQL.
    pub fn inner(&self) -> &rusqlite::Transaction<'conn> {
        &self.inner
    }

    pub fn commit(self) -> anyhow::Result<()> {
        self.inner.commit()?;
        Ok(())
    }

    pub fn rollback(self) -> anyhow::Result<()> {
        self.inner.rollback()?;
        Ok(())
    }

    /// `get(key) -> Option<bytes>` from spec.md §6's "To the KV store".
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, Error> {
        self.inner
            .query_row("SELECT value FROM kv WHERE key = ?", [key], |row| row.get(0))
            .optional_to_common()
    }

    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<(), Error> {
        self.inner
            .execute(
                "INSERT INTO kv(key, value) VALUES (?, ?) \
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                rusqlite::params![key, value],
            )
            .map_err(store_io)?;
        Ok(())
    }

    pub fn delete(&self, key: &[u8]) -> Result<(), Error> {
        self.inner.execute("DELETE FROM kv WHERE key = ?", [key]).map_err(store_io)?;
        Ok(())
    }

    /// `"state_root"` scalar key (spec.md §6): hex string, no `0x` prefix,
    /// canonical lower-case, no leading zeros except the bare `"0"`.
    pub fn state_root(&self) -> Result<Option<starkstate_crypto::Felt>, Error> {
        let Some(bytes) = self.get(b"state_root")? else {
            return Ok(None);
        };
        let hex = String::from_utf8(bytes)
            .map_err(|e| Error::InvalidValue(format!("state_root is not valid utf8: {e}")))?;
        Ok(Some(starkstate_crypto::Felt::from_hex_str(&hex)?))
    }

    pub fn set_state_root(&self, root: &starkstate_crypto::Felt) -> Result<(), Error> {
        self.put(b"state_root", root.to_hex_no_prefix().as_bytes())
    }

    /// `"latestBlockSynced"` scalar key: big-endian u64.
    pub fn latest_block_synced(&self) -> Result<Option<u64>, Error> {
        let Some(bytes) = self.get(b"latestBlockSynced")? else {
            return Ok(None);
        };
        let bytes: [u8; 8] = bytes
            .try_into()
            .map_err(|_| Error::InvalidValue("latestBlockSynced is not 8 bytes".into()))?;
        Ok(Some(u64::from_be_bytes(bytes)))
    }

    pub fn set_latest_block_synced(&self, sequence_number: u64) -> Result<(), Error> {
        self.put(b"latestBlockSynced", &sequence_number.to_be_bytes())
    }

    /// `"contract_hash:" || <address-hex>` scalar key: big-endian class hash.
    pub fn contract_class_hash(&self, address: &ContractAddress) -> Result<Option<ClassHash>, Error> {
        let key = contract_hash_key(address);
        let Some(bytes) = self.get(&key)? else {
            return Ok(None);
        };
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| Error::InvalidValue("contract_hash entry is not 32 bytes".into()))?;
        Ok(Some(ClassHash::new(starkstate_crypto::Felt::from_be_bytes(bytes)?)))
    }

    pub fn set_contract_class_hash(&self, address: &ContractAddress, class_hash: &ClassHash) -> Result<(), Error> {
        let key = contract_hash_key(address);
        self.put(&key, &class_hash.as_felt().to_be_bytes())
    }
}

fn contract_hash_key(address: &ContractAddress) -> Vec<u8> {
    format!("contract_hash:{}", address.as_felt().to_hex_str()).into_bytes()
}

fn store_io(e: rusqlite::Error) -> Error {
    Error::StoreIo(anyhow::Error::from(e))
}

trait OptionalToCommon<T> {
    fn optional_to_common(self) -> Result<Option<T>, Error>;
}

impl<T> OptionalToCommon<T> for rusqlite::Result<T> {
    fn optional_to_common(self) -> Result<Option<T>, Error> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(store_io(e)),
        }
    }
}
