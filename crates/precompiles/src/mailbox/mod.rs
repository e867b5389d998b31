pub mod dispatch;

use alloy::{
    primitives::{Address, B256, FixedBytes, U256, aliases::U192},
    sol_types::SolCall,
};
use bridgehub_contracts::precompiles::{
    ETH_TOKEN_ADDRESS, IAllowList, IMailbox, L2_ETH_TOKEN_SYSTEM_CONTRACT_ADDRESS, MailboxError,
};
use bridgehub_primitives::{
    BytecodeError, EthWithdrawal, L2ToL1Log, MerkleError, PriorityRequest, TxStatus,
    alias::{l2_sender, refund_recipient},
    calculate_root, canonical_tx_hash, derive_l2_gas_price, hash_l2_bytecode,
    priority::{MAX_NEW_FACTORY_DEPS, PRIORITY_EXPIRATION, REQUIRED_L2_GAS_PRICE_PER_PUBDATA},
};
use tracing::{debug, info};

use crate::{
    allow_list::AllowList,
    chain::{ChainStorage, slots},
    contract_storage,
    deposit_limit::DepositLimit,
    error::Result,
    metrics::metrics,
    runtime::CallContext,
    storage::StorageOps,
};

contract_storage! {
    /// Mailbox facet of a chain's diamond.
    ///
    /// Queues L1 -> L2 priority requests, proves L2 -> L1 logs against the roots published by
    /// the executor and pays out ETH withdrawals.
    pub struct Mailbox;
}

impl ChainStorage for Mailbox {}

impl Mailbox {
    /// Reverts with `CallerNotAllowed` unless the allow list lets `caller` call `selector`.
    fn check_access(&mut self, caller: Address, selector: [u8; 4]) -> Result<()> {
        let allow_list = self.allow_list()?;
        let allowed = AllowList::at(allow_list).can_call(IAllowList::canCallCall {
            caller,
            target: self.address,
            functionSig: FixedBytes(selector),
        })?;
        if !allowed {
            return Err(MailboxError::caller_not_allowed().into());
        }
        Ok(())
    }

    pub fn request_l2_transaction(
        &mut self,
        ctx: &CallContext,
        call: IMailbox::requestL2TransactionCall,
    ) -> Result<B256> {
        self.check_access(ctx.msg_sender, IMailbox::requestL2TransactionCall::SELECTOR)?;
        self.check_chain_id(call.chainId)?;

        let deposit_limit = DepositLimit::new(self.allow_list()?, slots::TOTAL_DEPOSITED);
        let deposit = deposit_limit.check(self, ETH_TOKEN_ADDRESS, ctx.msg_sender, ctx.value)?;
        if deposit.is_exceeded() {
            return Err(MailboxError::deposit_limit_exceeded().into());
        }

        if call.l2GasPerPubdataByteLimit != U256::from(REQUIRED_L2_GAS_PRICE_PER_PUBDATA) {
            return Err(MailboxError::invalid_gas_per_pubdata().into());
        }
        if call.l2GasLimit > self.priority_tx_max_gas_limit()? {
            return Err(MailboxError::too_much_gas().into());
        }

        let l2_gas_price = derive_l2_gas_price(ctx.gas_price, call.l2GasPerPubdataByteLimit)
            .ok_or(MailboxError::too_much_gas())?;
        let required = l2_gas_price
            .checked_mul(call.l2GasLimit)
            .and_then(|base_cost| base_cost.checked_add(call.l2Value))
            .ok_or(MailboxError::too_much_gas())?;
        if ctx.value < required {
            return Err(MailboxError::msg_value_too_low(required, ctx.value).into());
        }

        if call.factoryDeps.len() > MAX_NEW_FACTORY_DEPS {
            return Err(MailboxError::too_many_factory_deps().into());
        }
        let factory_deps = call
            .factoryDeps
            .iter()
            .map(|bytecode| hash_l2_bytecode(bytecode).map_err(bytecode_error))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let sender = l2_sender(ctx.msg_sender, ctx.tx_origin);
        let refund_has_code = self.storage.has_code(call.refundRecipient)?;
        let refund = refund_recipient(call.refundRecipient, refund_has_code, sender);

        deposit_limit.commit(self, ETH_TOKEN_ADDRESS, ctx.msg_sender, deposit)?;

        let tx_id = self.total_priority_txs()?;
        let request = PriorityRequest {
            tx_id,
            sender,
            contract_l2: call.contractL2,
            l2_value: call.l2Value,
            l2_calldata: call.l2Calldata,
            l2_gas_limit: call.l2GasLimit,
            l2_gas_per_pubdata_byte_limit: call.l2GasPerPubdataByteLimit,
            l2_gas_price,
            to_mint: ctx.value,
            refund_recipient: refund,
            factory_deps,
        };
        let transaction = request.to_canonical_transaction();
        let tx_hash = canonical_tx_hash(&transaction);

        let expiration = self
            .storage
            .timestamp()?
            .saturating_to::<u64>()
            .saturating_add(PRIORITY_EXPIRATION);
        self.push_priority_operation(&IMailbox::PriorityOperation {
            canonicalTxHash: tx_hash,
            expirationTimestamp: expiration,
            layer2Tip: U192::ZERO,
        })?;

        info!(%tx_id, %tx_hash, %sender, l2_contract = %call.contractL2, "new priority request");
        metrics().record_priority_request();
        self.emit_event(IMailbox::NewPriorityRequest {
            txId: tx_id,
            txHash: tx_hash,
            expirationTimestamp: expiration,
            transaction,
            factoryDeps: call.factoryDeps,
        })?;

        Ok(tx_hash)
    }

    pub fn l2_transaction_base_cost(
        &mut self,
        call: IMailbox::l2TransactionBaseCostCall,
    ) -> Result<U256> {
        self.check_chain_id(call.chainId)?;
        if call.l2GasPerPubdataByteLimit.is_zero() {
            return Err(MailboxError::invalid_gas_per_pubdata().into());
        }
        derive_l2_gas_price(call.gasPrice, call.l2GasPerPubdataByteLimit)
            .and_then(|price| price.checked_mul(call.l2GasLimit))
            .ok_or_else(|| MailboxError::too_much_gas().into())
    }

    pub fn finalize_eth_withdrawal(
        &mut self,
        ctx: &CallContext,
        call: IMailbox::finalizeEthWithdrawalCall,
    ) -> Result<()> {
        self.check_access(ctx.msg_sender, IMailbox::finalizeEthWithdrawalCall::SELECTOR)?;
        self.check_chain_id(call.chainId)?;

        let withdrawal = EthWithdrawal::decode(&call.message).map_err(|err| {
            debug!(%err, "malformed ETH withdrawal message");
            MailboxError::malformed_message()
        })?;

        let log = L2ToL1Log::from_message(
            call.l2TxNumberInBatch,
            L2_ETH_TOKEN_SYSTEM_CONTRACT_ADDRESS,
            &call.message,
        );
        if !self.prove_log(call.l2BatchNumber, call.l2MessageIndex, &log, &call.merkleProof)? {
            return Err(MailboxError::invalid_proof().into());
        }

        let slot = self.eth_withdrawal_finalized_slot(
            call.l2BatchNumber,
            call.l2MessageIndex,
            call.l2TxNumberInBatch,
        );
        if self.sload_as::<bool>(slot)? {
            return Err(MailboxError::withdrawal_already_finalized().into());
        }
        self.sstore_as(slot, true)?;

        let address = self.address;
        self.storage.transfer(address, withdrawal.l1_receiver, withdrawal.amount)?;

        info!(
            batch = %call.l2BatchNumber,
            index = %call.l2MessageIndex,
            receiver = %withdrawal.l1_receiver,
            amount = %withdrawal.amount,
            "ETH withdrawal finalized"
        );
        metrics().record_eth_withdrawal_finalized();
        self.emit_event(IMailbox::EthWithdrawalFinalized {
            to: withdrawal.l1_receiver,
            amount: withdrawal.amount,
        })
    }

    pub fn is_eth_withdrawal_finalized(
        &mut self,
        call: IMailbox::isEthWithdrawalFinalizedCall,
    ) -> Result<bool> {
        self.check_chain_id(call.chainId)?;
        let slot = self.eth_withdrawal_finalized_slot(
            call.l2BatchNumber,
            call.l2MessageIndex,
            call.l2TxNumberInBatch,
        );
        self.sload_as(slot)
    }

    pub fn prove_l2_message_inclusion(
        &mut self,
        call: IMailbox::proveL2MessageInclusionCall,
    ) -> Result<bool> {
        self.check_chain_id(call.chainId)?;
        let log = L2ToL1Log::from(&call.message);
        self.prove_log(call.batchNumber, call.index, &log, &call.proof)
    }

    pub fn prove_l2_log_inclusion(
        &mut self,
        call: IMailbox::proveL2LogInclusionCall,
    ) -> Result<bool> {
        self.check_chain_id(call.chainId)?;
        let log = L2ToL1Log::from(call.log);
        self.prove_log(call.batchNumber, call.index, &log, &call.proof)
    }

    pub fn prove_l1_to_l2_transaction_status(
        &mut self,
        call: IMailbox::proveL1ToL2TransactionStatusCall,
    ) -> Result<bool> {
        self.check_chain_id(call.chainId)?;
        let status = TxStatus::try_from(call.status).map_err(MailboxError::invalid_tx_status)?;
        let log = L2ToL1Log::transaction_status(call.l2TxNumberInBatch, call.l2TxHash, status);
        self.prove_log(call.l2BatchNumber, call.l2MessageIndex, &log, &call.merkleProof)
    }

    /// Whether `log` sits at `index` in the logs tree of `batch_number`.
    ///
    /// Reverts if the batch is not executed yet or the proof is malformed; a well-formed proof
    /// that leads to another root yields `false`.
    pub fn prove_log(
        &mut self,
        batch_number: U256,
        index: U256,
        log: &L2ToL1Log,
        proof: &[B256],
    ) -> Result<bool> {
        if batch_number > self.total_batches_executed()? {
            return Err(MailboxError::batch_not_executed(batch_number).into());
        }

        let computed = calculate_root(proof, index, log.hash()).map_err(merkle_error)?;
        let root = self.l2_logs_root(batch_number)?;
        Ok(!root.is_zero() && computed == root)
    }

    pub fn priority_queue_front_operation(&mut self) -> Result<IMailbox::PriorityOperation> {
        self.priority_queue_front()
    }
}

fn bytecode_error(err: BytecodeError) -> MailboxError {
    match err {
        BytecodeError::NotChunkable(_) => MailboxError::bytecode_not_chunkable(),
        BytecodeError::TooLong(_) => MailboxError::bytecode_too_long(),
        BytecodeError::EvenWordCount(_) => MailboxError::bytecode_even_word_count(),
    }
}

fn merkle_error(err: MerkleError) -> MailboxError {
    match err {
        MerkleError::EmptyPath => MailboxError::empty_proof(),
        MerkleError::PathTooLong(_) => MailboxError::proof_too_long(),
        MerkleError::IndexOutOfRange { .. } => MailboxError::proof_index_out_of_range(),
        MerkleError::TooManyLeaves { .. } => MailboxError::invalid_proof(),
    }
}
