pub mod dispatch;

use alloy::{
    primitives::{Address, B256, Bytes, FixedBytes, U256},
    sol_types::SolCall,
};
use bridgehub_contracts::precompiles::{
    IAllowList, IErc20, IL1Bridge, IL2Bridge, IMailbox, L1BridgeError,
};
use bridgehub_primitives::{Erc20Withdrawal, TxStatus, alias::l2_sender};
use tracing::{debug, info};

use crate::{
    allow_list::AllowList,
    contract_storage,
    deposit_limit::DepositLimit,
    error::Result,
    metrics::metrics,
    runtime::{CallContext, call_contract},
    storage::{StorageOps, slots::triple_mapping_slot},
};

pub mod slots {
    use alloy::primitives::U256;

    pub const MAILBOX: U256 = U256::ZERO;
    pub const ALLOW_LIST: U256 = U256::from_limbs([1, 0, 0, 0]);
    pub const L2_BRIDGE: U256 = U256::from_limbs([2, 0, 0, 0]);
    /// `depositor => l1Token => l2TxHash => amount`
    pub const DEPOSIT_AMOUNT: U256 = U256::from_limbs([3, 0, 0, 0]);
    /// `mapping(uint256 batch => mapping(uint256 index => mapping(uint16 txNumber => bool)))`
    pub const IS_WITHDRAWAL_FINALIZED: U256 = U256::from_limbs([4, 0, 0, 0]);
    /// `mapping(address l1Token => mapping(address depositor => uint256))`
    pub const TOTAL_DEPOSITED: U256 = U256::from_limbs([5, 0, 0, 0]);
}

contract_storage! {
    /// L1 side of the ERC20 bridge of one L2 chain.
    ///
    /// Deposits escrow tokens here and queue a `finalizeDeposit` call to the L2 bridge through
    /// the chain's mailbox. Withdrawals are proven through the mailbox against the logs roots of
    /// executed batches, then release the escrowed tokens.
    pub struct L1Erc20Bridge;
}

impl L1Erc20Bridge {
    pub fn initialize(
        &mut self,
        mailbox: Address,
        allow_list: Address,
        l2_bridge: Address,
    ) -> Result<()> {
        self.sstore_as(slots::MAILBOX, mailbox)?;
        self.sstore_as(slots::ALLOW_LIST, allow_list)?;
        self.sstore_as(slots::L2_BRIDGE, l2_bridge)
    }

    pub fn mailbox(&mut self) -> Result<Address> {
        self.sload_as(slots::MAILBOX)
    }

    pub fn l2_bridge(&mut self) -> Result<Address> {
        self.sload_as(slots::L2_BRIDGE)
    }

    fn allow_list(&mut self) -> Result<Address> {
        self.sload_as(slots::ALLOW_LIST)
    }

    fn deposit_limit(&mut self) -> Result<DepositLimit> {
        Ok(DepositLimit::new(self.allow_list()?, slots::TOTAL_DEPOSITED))
    }

    fn check_access(&mut self, caller: Address, selector: [u8; 4]) -> Result<()> {
        let allow_list = self.allow_list()?;
        let allowed = AllowList::at(allow_list).can_call(IAllowList::canCallCall {
            caller,
            target: self.address,
            functionSig: FixedBytes(selector),
        })?;
        if !allowed {
            return Err(L1BridgeError::caller_not_allowed().into());
        }
        Ok(())
    }

    fn check_chain_id(&mut self, ctx: &CallContext, chain_id: U256) -> Result<()> {
        let mailbox = self.mailbox()?;
        let supported = call_contract(mailbox, &IMailbox::getL2ChainIdCall {}, &self.frame(ctx))?;
        if chain_id != supported {
            return Err(L1BridgeError::unsupported_chain(chain_id).into());
        }
        Ok(())
    }

    /// Context of the calls this contract makes without value.
    fn frame(&self, ctx: &CallContext) -> CallContext {
        ctx.nested(self.address, U256::ZERO)
    }

    fn deposit_amount_slot(&self, depositor: Address, l1_token: Address, l2_tx_hash: B256) -> U256 {
        triple_mapping_slot(&depositor, &l1_token, &l2_tx_hash, slots::DEPOSIT_AMOUNT)
    }

    fn withdrawal_finalized_slot(&self, batch: U256, index: U256, tx_number: u16) -> U256 {
        triple_mapping_slot(&batch, &index, &tx_number, slots::IS_WITHDRAWAL_FINALIZED)
    }

    /// Escrows `amount` of `l1Token` and asks the L2 bridge to mint it to `l2Receiver`.
    ///
    /// `msg.value` pays for the L2 transaction and is forwarded to the mailbox whole.
    pub fn deposit(&mut self, ctx: &CallContext, call: IL1Bridge::depositCall) -> Result<B256> {
        self.check_access(ctx.msg_sender, IL1Bridge::depositCall::SELECTOR)?;
        if call.amount.is_zero() {
            return Err(L1BridgeError::zero_amount().into());
        }
        self.check_chain_id(ctx, call.chainId)?;

        let deposit_limit = self.deposit_limit()?;
        let deposit = deposit_limit.check(self, call.l1Token, ctx.msg_sender, call.amount)?;
        if deposit.is_exceeded() {
            return Err(L1BridgeError::deposit_limit_exceeded().into());
        }

        let frame = self.frame(ctx);
        call_contract(
            call.l1Token,
            &IErc20::transferFromCall {
                from: ctx.msg_sender,
                to: self.address,
                amount: call.amount,
            },
            &frame,
        )?;
        deposit_limit.commit(self, call.l1Token, ctx.msg_sender, deposit)?;

        // The mailbox aliases the bridge itself; the refund goes back to the depositor.
        let refund_recipient = if call.refundRecipient.is_zero() {
            l2_sender(ctx.msg_sender, ctx.tx_origin)
        } else {
            call.refundRecipient
        };
        let l2_calldata = IL2Bridge::finalizeDepositCall {
            l1Sender: ctx.msg_sender,
            l2Receiver: call.l2Receiver,
            l1Token: call.l1Token,
            amount: call.amount,
            data: Bytes::new(),
        };
        let mailbox = self.mailbox()?;
        let l2_tx_hash = call_contract(
            mailbox,
            &IMailbox::requestL2TransactionCall {
                chainId: call.chainId,
                contractL2: self.l2_bridge()?,
                l2Value: U256::ZERO,
                l2Calldata: l2_calldata.abi_encode().into(),
                l2GasLimit: call.l2TxGasLimit,
                l2GasPerPubdataByteLimit: call.l2TxGasPerPubdataByte,
                factoryDeps: Vec::new(),
                refundRecipient: refund_recipient,
            },
            &ctx.nested(self.address, ctx.value),
        )?;

        let slot = self.deposit_amount_slot(ctx.msg_sender, call.l1Token, l2_tx_hash);
        self.sstore(slot, call.amount)?;

        info!(
            %l2_tx_hash,
            from = %ctx.msg_sender,
            to = %call.l2Receiver,
            token = %call.l1Token,
            amount = %call.amount,
            "ERC20 deposit initiated"
        );
        metrics().record_erc20_deposit();
        self.emit_event(IL1Bridge::DepositInitiated {
            l2DepositTxHash: l2_tx_hash,
            from: ctx.msg_sender,
            to: call.l2Receiver,
            l1Token: call.l1Token,
            amount: call.amount,
        })?;

        Ok(l2_tx_hash)
    }

    /// Releases the tokens of a withdrawal the L2 bridge sent in an executed batch.
    pub fn finalize_withdrawal(
        &mut self,
        ctx: &CallContext,
        call: IL1Bridge::finalizeWithdrawalCall,
    ) -> Result<()> {
        self.check_access(ctx.msg_sender, IL1Bridge::finalizeWithdrawalCall::SELECTOR)?;
        self.check_chain_id(ctx, call.chainId)?;

        let slot = self.withdrawal_finalized_slot(
            call.l2BatchNumber,
            call.l2MessageIndex,
            call.l2TxNumberInBatch,
        );
        if self.sload_as::<bool>(slot)? {
            return Err(L1BridgeError::withdrawal_already_finalized().into());
        }

        let withdrawal = Erc20Withdrawal::decode(&call.message).map_err(|err| {
            debug!(%err, "malformed ERC20 withdrawal message");
            L1BridgeError::malformed_message()
        })?;

        let mailbox = self.mailbox()?;
        let frame = self.frame(ctx);
        let proven = call_contract(
            mailbox,
            &IMailbox::proveL2MessageInclusionCall {
                chainId: call.chainId,
                batchNumber: call.l2BatchNumber,
                index: call.l2MessageIndex,
                message: IMailbox::L2Message {
                    txNumberInBatch: call.l2TxNumberInBatch,
                    sender: self.l2_bridge()?,
                    data: call.message,
                },
                proof: call.merkleProof,
            },
            &frame,
        )?;
        if !proven {
            return Err(L1BridgeError::invalid_proof().into());
        }

        self.sstore_as(slot, true)?;
        call_contract(
            withdrawal.l1_token,
            &IErc20::transferCall { to: withdrawal.l1_receiver, amount: withdrawal.amount },
            &frame,
        )?;

        info!(
            batch = %call.l2BatchNumber,
            index = %call.l2MessageIndex,
            receiver = %withdrawal.l1_receiver,
            token = %withdrawal.l1_token,
            amount = %withdrawal.amount,
            "ERC20 withdrawal finalized"
        );
        metrics().record_erc20_withdrawal_finalized();
        self.emit_event(IL1Bridge::WithdrawalFinalized {
            to: withdrawal.l1_receiver,
            l1Token: withdrawal.l1_token,
            amount: withdrawal.amount,
        })
    }

    /// Refunds a deposit whose L2 transaction is proven to have failed.
    pub fn claim_failed_deposit(
        &mut self,
        ctx: &CallContext,
        call: IL1Bridge::claimFailedDepositCall,
    ) -> Result<()> {
        self.check_access(ctx.msg_sender, IL1Bridge::claimFailedDepositCall::SELECTOR)?;
        self.check_chain_id(ctx, call.chainId)?;

        let mailbox = self.mailbox()?;
        let frame = self.frame(ctx);
        let proven = call_contract(
            mailbox,
            &IMailbox::proveL1ToL2TransactionStatusCall {
                chainId: call.chainId,
                l2TxHash: call.l2TxHash,
                l2BatchNumber: call.l2BatchNumber,
                l2MessageIndex: call.l2MessageIndex,
                l2TxNumberInBatch: call.l2TxNumberInBatch,
                merkleProof: call.merkleProof,
                status: TxStatus::Failure as u8,
            },
            &frame,
        )?;
        if !proven {
            return Err(L1BridgeError::invalid_proof().into());
        }

        let slot = self.deposit_amount_slot(call.depositSender, call.l1Token, call.l2TxHash);
        let amount = self.sload(slot)?;
        if amount.is_zero() {
            return Err(L1BridgeError::deposit_not_found().into());
        }
        self.sstore(slot, U256::ZERO)?;

        let deposit_limit = self.deposit_limit()?;
        deposit_limit.release(self, call.l1Token, call.depositSender, amount)?;

        call_contract(
            call.l1Token,
            &IErc20::transferCall { to: call.depositSender, amount },
            &frame,
        )?;

        info!(
            l2_tx_hash = %call.l2TxHash,
            to = %call.depositSender,
            %amount,
            "failed deposit claimed"
        );
        metrics().record_failed_deposit_claimed();
        self.emit_event(IL1Bridge::ClaimedFailedDeposit {
            to: call.depositSender,
            l1Token: call.l1Token,
            amount,
        })
    }

    pub fn is_withdrawal_finalized(
        &mut self,
        call: IL1Bridge::isWithdrawalFinalizedCall,
    ) -> Result<bool> {
        let slot = self.withdrawal_finalized_slot(
            call.l2BatchNumber,
            call.l2MessageIndex,
            call.l2TxNumberInBatch,
        );
        self.sload_as(slot)
    }

    pub fn deposit_amount(&mut self, call: IL1Bridge::depositAmountCall) -> Result<U256> {
        let slot = self.deposit_amount_slot(call.depositSender, call.l1Token, call.l2TxHash);
        self.sload(slot)
    }
}
