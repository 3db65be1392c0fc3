//! The height-251 binary Merkle-Patricia trie (spec.md §4.D).
//!
//! Grounded on the teacher's `merkle-tree` crate shape (`MerkleTree<H, const
//! HEIGHT: usize>` in `contract.rs`'s call sites) and on the `madara` fork's
//! `merkle_patricia_tree.rs` (`other_examples`) for the traverse/set/
//! delete_leaf algorithm body. That algorithm is built around a row-id
//! addressed, `Rc<RefCell<_>>`-linked in-memory graph that gets flushed by a
//! separate `commit()` pass, because the teacher's storage assigns row ids
//! lazily. This trie's storage is content-addressed instead (every node's
//! key *is* its hash), so there is nothing to assign lazily and no dirty set
//! to track: `put`/`delete` persist directly through `TrieStorage` as they
//! descend and rebuild, following spec.md §4.D's two-phase algorithm
//! (descend recording siblings, then rebuild bottom-up) verbatim.
use starkstate_common::Error;
use starkstate_crypto::{pedersen_hash, Felt};

use crate::bit_path::{BitPath, MAX_HEIGHT};
use crate::merkle_node::{node_hash, Node};
use crate::storage::TrieStorage;

/// A binary Merkle-Patricia trie over `Felt` keys, height 251.
pub struct Trie<S> {
    store: S,
    root: Felt,
}

impl<S: TrieStorage> Trie<S> {
    /// Opens a trie at `root_hash`. `None` or `Felt::ZERO` yields an empty
    /// trie; any other value must already resolve in `store`.
    pub fn new(store: S, root_hash: Option<Felt>) -> Result<Self, Error> {
        let root = root_hash.unwrap_or_else(Felt::zero);
        if !root.is_zero() && store.get_node(&root)?.is_none() {
            return Err(Error::NotFound);
        }
        Ok(Self { store, root })
    }

    pub fn empty(store: S) -> Self {
        Self { store, root: Felt::zero() }
    }

    pub fn root_hash(&self) -> Felt {
        self.root.clone()
    }

    /// Traverses the trie for `key`, returning its value if a leaf exists.
    pub fn get(&self, key: &BitPath) -> Result<Option<Felt>, Error> {
        debug_assert_eq!(key.len(), MAX_HEIGHT);

        if self.root.is_zero() {
            return Ok(None);
        }

        let mut walked = 0usize;
        let mut curr = self.root.clone();
        loop {
            if walked == MAX_HEIGHT {
                return Ok(Some(curr));
            }
            if curr.is_zero() {
                return Ok(None);
            }

            let node = self.store.get_node(&curr)?.ok_or(Error::NotFound)?;
            if node.path.is_empty() {
                let (left, right) = self
                    .store
                    .get_preimage(&node.bottom)?
                    .ok_or_else(|| Error::InvalidValue("missing Pedersen preimage".into()))?;
                curr = if key.get(walked) { right } else { left };
                walked += 1;
            } else {
                let suffix = key.walked(walked);
                let lcp = node.path.longest_common_prefix(suffix.as_bitslice());
                if lcp != node.path.len() {
                    return Ok(None);
                }
                walked += node.path.len();
                curr = node.bottom;
            }
        }
    }

    /// Inserts or overwrites `key`. `put(key, 0)` is treated as `delete(key)`
    /// per spec.md §9's prescribed canonical form.
    pub fn put(&mut self, key: &BitPath, value: Felt) -> Result<(), Error> {
        debug_assert_eq!(key.len(), MAX_HEIGHT);

        if value.is_zero() {
            return match self.delete(key) {
                Ok(()) => Ok(()),
                Err(Error::NotFound) => Ok(()),
                Err(e) => Err(e),
            };
        }

        let siblings = self.descend_for_put(key)?;
        self.root = self.rebuild_from_leaf(key, value, siblings)?;
        tracing::trace!(root = %self.root, "trie put");
        Ok(())
    }

    /// Removes `key`. Fails [`Error::NotFound`] if the key is absent - the
    /// fail-loud choice spec.md §9 allows, matching the rest of this trie's
    /// `Result`-returning contract (see DESIGN.md).
    pub fn delete(&mut self, key: &BitPath) -> Result<(), Error> {
        debug_assert_eq!(key.len(), MAX_HEIGHT);

        let siblings = self.descend_for_delete(key)?;
        self.root = self.rebuild_from_nil(key, siblings)?;
        tracing::trace!(root = %self.root, "trie delete");
        Ok(())
    }

    /// Phase 1 of `put`: descend recording the sibling hash at every bit
    /// position the traversal branched at. Stops early (and records a
    /// single synthetic sibling) if an edge diverges from `key`.
    fn descend_for_put(&self, key: &BitPath) -> Result<Vec<Option<Felt>>, Error> {
        let mut siblings = vec![None; MAX_HEIGHT];
        if self.root.is_zero() {
            return Ok(siblings);
        }

        let mut walked = 0usize;
        let mut curr = self.root.clone();
        loop {
            if walked == MAX_HEIGHT || curr.is_zero() {
                break;
            }

            let node = self.store.get_node(&curr)?.ok_or(Error::NotFound)?;
            if node.path.is_empty() {
                let (left, right) = self
                    .store
                    .get_preimage(&node.bottom)?
                    .ok_or_else(|| Error::InvalidValue("missing Pedersen preimage".into()))?;
                let (next, sibling) = if key.get(walked) { (right, left) } else { (left, right) };
                siblings[walked] = Some(sibling);
                curr = next;
                walked += 1;
            } else {
                let suffix = key.walked(walked);
                let lcp = node.path.longest_common_prefix(suffix.as_bitslice());
                if lcp == node.path.len() {
                    walked += node.path.len();
                    curr = node.bottom;
                } else {
                    // The edge diverges at bit `walked + lcp`. The sibling is
                    // the node one step into the edge's own remaining path.
                    let remaining = node.path.walked(lcp);
                    let sibling_path = remaining.walked(1);
                    let sibling_hash = node_hash(&sibling_path, &node.bottom);
                    if !sibling_path.is_empty() {
                        // An empty sibling_path's hash already names an
                        // existing binary node or an unstored leaf value
                        // `get` reaches without a lookup; only a non-empty
                        // path is a genuinely new node to persist.
                        self.store
                            .put_node(&sibling_hash, &Node::edge(sibling_path, node.bottom.clone()))?;
                    }
                    siblings[walked + lcp] = Some(sibling_hash);
                    break;
                }
            }
        }

        Ok(siblings)
    }

    /// Phase 1 of `delete`: identical descent to `put`, but the key must
    /// resolve all the way to height 251 (a full match) or the key is
    /// absent and this fails [`Error::NotFound`].
    fn descend_for_delete(&self, key: &BitPath) -> Result<Vec<Option<Felt>>, Error> {
        let mut siblings = vec![None; MAX_HEIGHT];
        if self.root.is_zero() {
            return Err(Error::NotFound);
        }

        let mut walked = 0usize;
        let mut curr = self.root.clone();
        loop {
            if walked == MAX_HEIGHT {
                return Ok(siblings);
            }
            if curr.is_zero() {
                return Err(Error::NotFound);
            }

            let node = self.store.get_node(&curr)?.ok_or(Error::NotFound)?;
            if node.path.is_empty() {
                let (left, right) = self
                    .store
                    .get_preimage(&node.bottom)?
                    .ok_or_else(|| Error::InvalidValue("missing Pedersen preimage".into()))?;
                let (next, sibling) = if key.get(walked) { (right, left) } else { (left, right) };
                siblings[walked] = Some(sibling);
                curr = next;
                walked += 1;
            } else {
                let suffix = key.walked(walked);
                let lcp = node.path.longest_common_prefix(suffix.as_bitslice());
                if lcp != node.path.len() {
                    return Err(Error::NotFound);
                }
                walked += node.path.len();
                curr = node.bottom;
            }
        }
    }

    /// Phase 2 of `put`: rebuild bottom-up from the new leaf, persisting
    /// every node created along the way before it is linked from its parent
    /// (spec.md §4.D "Persistence").
    fn rebuild_from_leaf(
        &self,
        key: &BitPath,
        value: Felt,
        mut siblings: Vec<Option<Felt>>,
    ) -> Result<Felt, Error> {
        let mut path = BitPath::empty();
        let mut bottom = value;

        for i in (0..MAX_HEIGHT).rev() {
            match siblings[i].take() {
                Some(sibling) => {
                    let child = self.finalize_pending(&mut path, &bottom)?;
                    bottom = self.merge_binary(key.get(i), sibling, child)?;
                }
                None => path.push_high(key.get(i)),
            }
        }

        self.finalize_pending(&mut path, &bottom)
    }

    /// Phase 2 of `delete`: rebuild bottom-up from nil. The first ancestor
    /// with a sibling materializes a replacement node from that sibling,
    /// extended by the complement of the deleted key's bit at that level;
    /// every level above combines normally, exactly like `put`.
    fn rebuild_from_nil(&self, key: &BitPath, mut siblings: Vec<Option<Felt>>) -> Result<Felt, Error> {
        let mut path = BitPath::empty();
        let mut bottom = Felt::zero();
        let mut materialized = false;

        for i in (0..MAX_HEIGHT).rev() {
            match siblings[i].take() {
                Some(sibling) if !materialized => {
                    // An unresolved sibling is a height-251 leaf, never
                    // written to the `0x01` keyspace; synthesize it rather
                    // than treat a legitimate leaf as a missing node.
                    let sibling_node = match self.store.get_node(&sibling)? {
                        Some(node) => node,
                        None => Node::leaf(sibling.clone()),
                    };
                    let mut new_path = sibling_node.path;
                    new_path.push_high(!key.get(i));
                    path = new_path;
                    bottom = sibling_node.bottom;
                    self.store.put_node(&node_hash(&path, &bottom), &Node::edge(path.clone(), bottom.clone()))?;
                    materialized = true;
                }
                Some(sibling) => {
                    let child = self.finalize_pending(&mut path, &bottom)?;
                    bottom = self.merge_binary(key.get(i), sibling, child)?;
                }
                None if materialized => path.push_high(key.get(i)),
                None => {}
            }
        }

        if !materialized {
            return Ok(Felt::zero());
        }
        self.finalize_pending(&mut path, &bottom)
    }

    /// Combines `child` (this side's hash) with `sibling` into a binary
    /// node, persisting both the Pedersen preimage (`0x00` keyspace) and the
    /// node itself (`0x01` keyspace, since a binary node's hash equals its
    /// own `bottom`).
    fn merge_binary(&self, key_bit: bool, sibling: Felt, child: Felt) -> Result<Felt, Error> {
        let (left, right) = if key_bit { (sibling, child) } else { (child, sibling) };
        let bottom = pedersen_hash(&left, &right);
        self.store.put_preimage(&bottom, &left, &right)?;
        self.store.put_node(&bottom, &Node::binary(bottom.clone()))?;
        Ok(bottom)
    }

    /// If `path` has accumulated pending edge bits, persists the edge node
    /// they describe and returns its hash; otherwise `bottom` already *is*
    /// the current node's hash (a leaf or a just-merged binary node).
    fn finalize_pending(&self, path: &mut BitPath, bottom: &Felt) -> Result<Felt, Error> {
        if path.is_empty() {
            return Ok(bottom.clone());
        }
        let node = Node::edge(path.clone(), bottom.clone());
        let hash = node.hash();
        self.store.put_node(&hash, &node)?;
        *path = BitPath::empty();
        Ok(hash)
    }
}
