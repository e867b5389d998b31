pub mod dispatch;

use alloy::primitives::{Address, B256, U256};
use bridgehub_contracts::precompiles::{ExecutorError, IExecutor};
use bridgehub_primitives::{priority::EMPTY_STRING_KECCAK, roll_priority_ops_hash};
use tracing::info;

use crate::{
    chain::ChainStorage, contract_storage, error::Result, metrics::metrics, storage::StorageOps,
};

contract_storage! {
    /// Executor facet of a chain's diamond.
    ///
    /// Validators publish the L2 logs root of each executed batch here; the mailbox and the
    /// bridges prove L2 -> L1 messages against these roots.
    pub struct Executor;
}

impl ChainStorage for Executor {}

impl Executor {
    fn ensure_validator(&mut self, sender: Address) -> Result<()> {
        if !self.is_validator(sender)? {
            return Err(ExecutorError::unauthorized().into());
        }
        Ok(())
    }

    /// Publishes the logs root of `batchNumber` and marks every batch up to it as executed.
    pub fn save_l2_logs_root_hash(
        &mut self,
        sender: Address,
        call: IExecutor::saveL2LogsRootHashCall,
    ) -> Result<()> {
        self.ensure_validator(sender)?;
        self.store_root(call.batchNumber, call.l2LogsTreeRoot)?;

        if call.batchNumber > self.total_batches_executed()? {
            self.set_total_batches_executed(call.batchNumber)?;
        }
        Ok(())
    }

    /// Executes the next batch, consuming the priority operations it processed.
    pub fn execute_batch(
        &mut self,
        sender: Address,
        call: IExecutor::executeBatchCall,
    ) -> Result<()> {
        self.ensure_validator(sender)?;

        let expected = self
            .total_batches_executed()?
            .checked_add(U256::from(1))
            .ok_or(ExecutorError::batch_number_overflow())?;
        if call.batchNumber != expected {
            return Err(ExecutorError::batch_number_mismatch(expected, call.batchNumber).into());
        }
        if call.priorityOperationsProcessed > self.priority_queue_size()? {
            return Err(ExecutorError::not_enough_priority_operations().into());
        }

        let head = self.first_unprocessed_priority_tx()?;
        let mut rolling_hash = EMPTY_STRING_KECCAK;
        let mut id = head;
        while id < head + call.priorityOperationsProcessed {
            let operation = self.priority_operation(id)?;
            rolling_hash = roll_priority_ops_hash(rolling_hash, operation.canonicalTxHash);
            id += U256::from(1);
        }
        if rolling_hash != call.priorityOperationsHash {
            return Err(ExecutorError::priority_operations_hash_mismatch(
                rolling_hash,
                call.priorityOperationsHash,
            )
            .into());
        }

        self.store_root(call.batchNumber, call.l2LogsTreeRoot)?;
        self.pop_priority_operations(call.priorityOperationsProcessed)?;
        self.set_total_batches_executed(call.batchNumber)
    }

    fn store_root(&mut self, batch_number: U256, root: B256) -> Result<()> {
        if root.is_zero() {
            return Err(ExecutorError::zero_root().into());
        }
        if !self.l2_logs_root(batch_number)?.is_zero() {
            return Err(ExecutorError::root_already_set(batch_number).into());
        }

        self.set_l2_logs_root(batch_number, root)?;
        info!(batch = %batch_number, %root, "L2 logs root published");
        metrics().record_batch_executed();
        self.emit_event(IExecutor::BlockExecution {
            batchNumber: batch_number,
            l2LogsTreeRoot: root,
        })
    }

    pub fn set_validator(
        &mut self,
        sender: Address,
        call: IExecutor::setValidatorCall,
    ) -> Result<()> {
        if sender != self.governor()? {
            return Err(ExecutorError::unauthorized().into());
        }
        self.set_validator_status(call.validator, call.active)?;
        self.emit_event(IExecutor::ValidatorStatusUpdate {
            validator: call.validator,
            active: call.active,
        })
    }
}
