//! Binary Merkle tree over keccak256, as used for the L2 -> L1 logs of a batch.
//!
//! Nodes are combined by position: a node with an even index is the left child of its parent.
//! Pairs are never sorted, so a proof only verifies for the leaf index it was built for.

use alloy_primitives::{B256, U256, b256, keccak256};

/// Maximum length (exclusive) of a Merkle path.
pub const MAX_PATH_LEN: usize = 256;

/// Depth of the L2 -> L1 logs tree of a batch.
pub const L2_TO_L1_LOGS_TREE_DEPTH: usize = 9;

/// Leaf used to pad the logs tree: the hash of an all-zero log.
pub const L2_TO_L1_LOGS_TREE_DEFAULT_LEAF_HASH: B256 =
    b256!("0x72abee45b59e344af8a6e520241c4744aff26ed411f4c4b00f8af09adada43ba");

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MerkleError {
    #[error("empty Merkle path")]
    EmptyPath,
    #[error("Merkle path of {0} levels is too long")]
    PathTooLong(usize),
    #[error("leaf index {index} out of range for a path of {path_len} levels")]
    IndexOutOfRange { index: U256, path_len: usize },
    #[error("{leaves} leaves do not fit in a tree of depth {depth}")]
    TooManyLeaves { leaves: usize, depth: usize },
}

/// Hash of two sibling nodes.
pub fn efficient_hash(left: B256, right: B256) -> B256 {
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(left.as_slice());
    buf[32..].copy_from_slice(right.as_slice());
    keccak256(buf)
}

/// Folds `leaf` up its Merkle `path` and returns the resulting root.
///
/// At level `i`, bit `i` of `index` tells on which side the accumulated node sits: `0` means
/// left (`keccak(acc || sibling)`), `1` means right (`keccak(sibling || acc)`).
pub fn calculate_root(path: &[B256], index: U256, leaf: B256) -> Result<B256, MerkleError> {
    if path.is_empty() {
        return Err(MerkleError::EmptyPath);
    }
    if path.len() >= MAX_PATH_LEN {
        return Err(MerkleError::PathTooLong(path.len()));
    }
    if index >= U256::from(1) << path.len() {
        return Err(MerkleError::IndexOutOfRange { index, path_len: path.len() });
    }

    let root = path.iter().enumerate().fold(leaf, |acc, (level, sibling)| {
        if index.bit(level) { efficient_hash(*sibling, acc) } else { efficient_hash(acc, *sibling) }
    });

    Ok(root)
}

/// Complete binary tree of fixed depth, padded with a default leaf.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    /// Non-padding nodes per level; `nodes[0]` holds the leaves.
    nodes: Vec<Vec<B256>>,
    /// Hash of a subtree made only of padding, per level.
    padding: Vec<B256>,
}

impl MerkleTree {
    /// Builds a tree of `depth` levels over `leaves`, padding the unused leaves with `padding`.
    pub fn new(leaves: &[B256], depth: usize, padding: B256) -> Result<Self, MerkleError> {
        if depth == 0 {
            return Err(MerkleError::EmptyPath);
        }
        if depth >= MAX_PATH_LEN {
            return Err(MerkleError::PathTooLong(depth));
        }
        if depth < usize::BITS as usize && leaves.len() > 1 << depth {
            return Err(MerkleError::TooManyLeaves { leaves: leaves.len(), depth });
        }

        let mut padding_per_level = Vec::with_capacity(depth + 1);
        padding_per_level.push(padding);
        let mut nodes = Vec::with_capacity(depth + 1);
        nodes.push(leaves.to_vec());

        for level in 0..depth {
            let pad = padding_per_level[level];
            let next = nodes[level]
                .chunks(2)
                .map(|pair| efficient_hash(pair[0], pair.get(1).copied().unwrap_or(pad)))
                .collect::<Vec<_>>();
            nodes.push(next);
            padding_per_level.push(efficient_hash(pad, pad));
        }

        Ok(Self { nodes, padding: padding_per_level })
    }

    /// Logs tree of an L2 batch, padded with [`L2_TO_L1_LOGS_TREE_DEFAULT_LEAF_HASH`].
    pub fn l2_logs_tree(leaves: &[B256]) -> Result<Self, MerkleError> {
        Self::new(leaves, L2_TO_L1_LOGS_TREE_DEPTH, L2_TO_L1_LOGS_TREE_DEFAULT_LEAF_HASH)
    }

    pub fn depth(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn root(&self) -> B256 {
        self.node(self.depth(), 0)
    }

    /// Sibling path of the leaf at `index`, from the leaf level up.
    pub fn proof(&self, index: usize) -> Result<Vec<B256>, MerkleError> {
        let depth = self.depth();
        if depth < usize::BITS as usize && index >= 1 << depth {
            return Err(MerkleError::IndexOutOfRange { index: U256::from(index), path_len: depth });
        }

        Ok((0..depth).map(|level| self.node(level, (index >> level) ^ 1)).collect())
    }

    fn node(&self, level: usize, position: usize) -> B256 {
        self.nodes[level].get(position).copied().unwrap_or(self.padding[level])
    }
}
