//! Storage shared by the facets of a chain's diamond: the mailbox and the executor.

use alloy::primitives::{Address, B256, U256, aliases::U192};
use bridgehub_contracts::precompiles::{IMailbox, MailboxError};
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    storage::{
        StorageOps,
        slots::{mapping_slot, triple_mapping_slot},
    },
};

pub mod slots {
    use alloy::primitives::U256;

    pub const GOVERNOR: U256 = U256::ZERO;
    pub const L2_CHAIN_ID: U256 = U256::from_limbs([1, 0, 0, 0]);
    pub const ALLOW_LIST: U256 = U256::from_limbs([2, 0, 0, 0]);
    pub const PRIORITY_TX_MAX_GAS_LIMIT: U256 = U256::from_limbs([3, 0, 0, 0]);
    pub const TOTAL_BATCHES_EXECUTED: U256 = U256::from_limbs([4, 0, 0, 0]);
    /// `mapping(uint256 batchNumber => bytes32 root)`
    pub const L2_LOGS_ROOT_HASHES: U256 = U256::from_limbs([5, 0, 0, 0]);
    /// `mapping(uint256 batch => mapping(uint256 index => mapping(uint16 txNumber => bool)))`
    pub const IS_ETH_WITHDRAWAL_FINALIZED: U256 = U256::from_limbs([6, 0, 0, 0]);
    /// `mapping(uint256 id => PriorityOperation)`, two words per entry
    pub const PRIORITY_QUEUE: U256 = U256::from_limbs([7, 0, 0, 0]);
    pub const PRIORITY_QUEUE_HEAD: U256 = U256::from_limbs([8, 0, 0, 0]);
    pub const PRIORITY_QUEUE_TAIL: U256 = U256::from_limbs([9, 0, 0, 0]);
    /// `mapping(address => bool)`
    pub const VALIDATORS: U256 = U256::from_limbs([10, 0, 0, 0]);
    /// `mapping(address l1Token => mapping(address depositor => uint256))`
    pub const TOTAL_DEPOSITED: U256 = U256::from_limbs([11, 0, 0, 0]);
}

/// Parameters a chain's diamond is initialized with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ChainParams {
    pub governor: Address,
    pub validator: Address,
    pub l2_chain_id: u64,
    pub allow_list: Address,
    pub priority_tx_max_gas_limit: u64,
}

/// Accessors over the storage of a chain's diamond.
pub trait ChainStorage: StorageOps {
    fn initialize(&mut self, params: &ChainParams) -> Result<()> {
        self.sstore_as(slots::GOVERNOR, params.governor)?;
        self.sstore_as(slots::L2_CHAIN_ID, params.l2_chain_id)?;
        self.sstore_as(slots::ALLOW_LIST, params.allow_list)?;
        self.sstore_as(slots::PRIORITY_TX_MAX_GAS_LIMIT, params.priority_tx_max_gas_limit)?;
        self.set_validator_status(params.validator, true)
    }

    fn governor(&mut self) -> Result<Address> {
        self.sload_as(slots::GOVERNOR)
    }

    fn l2_chain_id(&mut self) -> Result<U256> {
        self.sload(slots::L2_CHAIN_ID)
    }

    /// Reverts unless `chain_id` is the chain this diamond serves.
    fn check_chain_id(&mut self, chain_id: U256) -> Result<()> {
        let expected = self.l2_chain_id()?;
        if chain_id != expected {
            return Err(MailboxError::chain_id_mismatch(expected, chain_id).into());
        }
        Ok(())
    }

    fn allow_list(&mut self) -> Result<Address> {
        self.sload_as(slots::ALLOW_LIST)
    }

    fn priority_tx_max_gas_limit(&mut self) -> Result<U256> {
        self.sload(slots::PRIORITY_TX_MAX_GAS_LIMIT)
    }

    fn total_batches_executed(&mut self) -> Result<U256> {
        self.sload(slots::TOTAL_BATCHES_EXECUTED)
    }

    fn set_total_batches_executed(&mut self, total: U256) -> Result<()> {
        self.sstore(slots::TOTAL_BATCHES_EXECUTED, total)
    }

    fn l2_logs_root(&mut self, batch_number: U256) -> Result<B256> {
        self.sload_as(mapping_slot(&batch_number, slots::L2_LOGS_ROOT_HASHES))
    }

    fn set_l2_logs_root(&mut self, batch_number: U256, root: B256) -> Result<()> {
        self.sstore_as(mapping_slot(&batch_number, slots::L2_LOGS_ROOT_HASHES), root)
    }

    fn is_validator(&mut self, account: Address) -> Result<bool> {
        self.sload_as(mapping_slot(&account, slots::VALIDATORS))
    }

    fn set_validator_status(&mut self, account: Address, active: bool) -> Result<()> {
        self.sstore_as(mapping_slot(&account, slots::VALIDATORS), active)
    }

    fn eth_withdrawal_finalized_slot(&self, batch: U256, index: U256, tx_number: u16) -> U256 {
        triple_mapping_slot(&batch, &index, &tx_number, slots::IS_ETH_WITHDRAWAL_FINALIZED)
    }

    /// Id the next priority operation will get.
    fn total_priority_txs(&mut self) -> Result<U256> {
        self.sload(slots::PRIORITY_QUEUE_TAIL)
    }

    fn first_unprocessed_priority_tx(&mut self) -> Result<U256> {
        self.sload(slots::PRIORITY_QUEUE_HEAD)
    }

    fn priority_queue_size(&mut self) -> Result<U256> {
        Ok(self.total_priority_txs()? - self.first_unprocessed_priority_tx()?)
    }

    fn push_priority_operation(&mut self, operation: &IMailbox::PriorityOperation) -> Result<U256> {
        let id = self.total_priority_txs()?;
        let base = mapping_slot(&id, slots::PRIORITY_QUEUE);
        self.sstore_as(base, operation.canonicalTxHash)?;
        self.sstore_as(base.wrapping_add(U256::from(1)), operation.expirationTimestamp)?;
        self.sstore(slots::PRIORITY_QUEUE_TAIL, id + U256::from(1))?;
        Ok(id)
    }

    fn priority_operation(&mut self, id: U256) -> Result<IMailbox::PriorityOperation> {
        let base = mapping_slot(&id, slots::PRIORITY_QUEUE);
        Ok(IMailbox::PriorityOperation {
            canonicalTxHash: self.sload_as(base)?,
            expirationTimestamp: self.sload_as(base.wrapping_add(U256::from(1)))?,
            layer2Tip: U192::ZERO,
        })
    }

    fn priority_queue_front(&mut self) -> Result<IMailbox::PriorityOperation> {
        if self.priority_queue_size()?.is_zero() {
            return Err(MailboxError::priority_queue_empty().into());
        }
        let head = self.first_unprocessed_priority_tx()?;
        self.priority_operation(head)
    }

    /// Marks the `count` oldest operations as processed. The caller checks the queue holds them.
    fn pop_priority_operations(&mut self, count: U256) -> Result<()> {
        let head = self.first_unprocessed_priority_tx()?;
        self.sstore(slots::PRIORITY_QUEUE_HEAD, head + count)
    }
}
