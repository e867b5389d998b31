//! Native L1 contracts of the bridgehub.
//!
//! Each contract is a handle over the storage of its address (see [`storage`]), dispatching ABI
//! calls through the [`runtime`]. The runtime gives every call the semantics the contracts rely
//! on: value transfers, `msg.sender`/`tx.origin`, and rollback of reverted calls.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod allow_list;
pub mod chain;
pub mod config;
pub mod deployment;
pub mod deposit_limit;
pub mod erc20;
pub mod error;
pub mod executor;
pub mod forwarder;
pub mod l1_erc20_bridge;
pub mod mailbox;
pub mod metrics;
pub mod storage;

pub mod runtime;
pub use runtime::*;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_util;

pub use bridgehub_contracts::precompiles::{
    ETH_TOKEN_ADDRESS, L2_BOOTLOADER_ADDRESS, L2_ETH_TOKEN_SYSTEM_CONTRACT_ADDRESS,
    L2_TO_L1_MESSENGER_ADDRESS,
};
