pub mod allow_list;
pub mod common;
pub mod erc20;
pub mod executor;
pub mod forwarder;
pub mod l1_bridge;
pub mod l2_bridge;
pub mod mailbox;

pub use allow_list::*;
pub use common::*;
pub use erc20::*;
pub use executor::*;
pub use forwarder::*;
pub use l1_bridge::*;
pub use l2_bridge::*;
pub use mailbox::*;

use alloy_primitives::{Address, address};

/// L2 bootloader. Sender of the logs that report the status of L1->L2 transactions.
pub const L2_BOOTLOADER_ADDRESS: Address = address!("0x0000000000000000000000000000000000008001");

/// L2 system contract that turns arbitrary L2->L1 messages into service logs.
pub const L2_TO_L1_MESSENGER_ADDRESS: Address =
    address!("0x0000000000000000000000000000000000008008");

/// L2 base token system contract. Sender of every ETH withdrawal message.
pub const L2_ETH_TOKEN_SYSTEM_CONTRACT_ADDRESS: Address =
    address!("0x000000000000000000000000000000000000800a");

/// Token address used by the allow list and the deposit counters to designate ETH.
pub const ETH_TOKEN_ADDRESS: Address = Address::ZERO;
