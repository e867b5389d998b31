//! Bridgehub protocol primitives.
//!
//! Pure functions shared by the L1 contracts and the tooling around them: L1->L2 address
//! aliasing, L2->L1 log hashing, Merkle inclusion proofs over the batch logs tree, withdrawal
//! message decoding, L2 bytecode validation and the pricing and hashing of priority requests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod access;
pub use access::{AccessMode, InvalidAccessMode};

pub mod alias;
pub use alias::{L1_TO_L2_ALIAS_OFFSET, apply_l1_to_l2_alias, undo_l1_to_l2_alias};

pub mod bytecode;
pub use bytecode::{BytecodeError, hash_l2_bytecode, validate_bytecode};

pub mod l2_log;
pub use l2_log::{L2ToL1Log, TxStatus};

pub mod merkle;
pub use merkle::{MerkleError, MerkleTree, calculate_root};

pub mod priority;
pub use priority::{
    PriorityRequest, address_to_word, canonical_tx_hash, derive_l2_gas_price,
    l2_transaction_base_cost, priority_ops_hash, roll_priority_ops_hash, word_to_address,
};

pub mod withdrawal;
pub use withdrawal::{Erc20Withdrawal, EthWithdrawal, WithdrawalMessageError};
