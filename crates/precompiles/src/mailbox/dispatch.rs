use super::Mailbox;
use crate::{
    CallContext, Precompile, PrecompileResult, chain::ChainStorage, dispatch_call, mutate,
    mutate_void, view,
};
use alloy::sol_types::SolInterface;
use bridgehub_contracts::precompiles::IMailbox::IMailboxCalls;

impl Precompile for Mailbox {
    fn call(&mut self, calldata: &[u8], ctx: &CallContext) -> PrecompileResult {
        dispatch_call(calldata, IMailboxCalls::abi_decode, |call| match call {
            IMailboxCalls::requestL2Transaction(call) => {
                mutate(call, ctx, |ctx, c| self.request_l2_transaction(ctx, c))
            }
            IMailboxCalls::finalizeEthWithdrawal(call) => {
                mutate_void(call, ctx, |ctx, c| self.finalize_eth_withdrawal(ctx, c))
            }
            IMailboxCalls::l2TransactionBaseCost(call) => {
                view(call, |c| self.l2_transaction_base_cost(c))
            }
            IMailboxCalls::isEthWithdrawalFinalized(call) => {
                view(call, |c| self.is_eth_withdrawal_finalized(c))
            }
            IMailboxCalls::proveL2MessageInclusion(call) => {
                view(call, |c| self.prove_l2_message_inclusion(c))
            }
            IMailboxCalls::proveL2LogInclusion(call) => {
                view(call, |c| self.prove_l2_log_inclusion(c))
            }
            IMailboxCalls::proveL1ToL2TransactionStatus(call) => {
                view(call, |c| self.prove_l1_to_l2_transaction_status(c))
            }
            IMailboxCalls::getL2ChainId(call) => view(call, |_| self.l2_chain_id()),
            IMailboxCalls::getPriorityTxMaxGasLimit(call) => {
                view(call, |_| self.priority_tx_max_gas_limit())
            }
            IMailboxCalls::getTotalPriorityTxs(call) => view(call, |_| self.total_priority_txs()),
            IMailboxCalls::getFirstUnprocessedPriorityTx(call) => {
                view(call, |_| self.first_unprocessed_priority_tx())
            }
            IMailboxCalls::getPriorityQueueSize(call) => view(call, |_| self.priority_queue_size()),
            IMailboxCalls::priorityQueueFrontOperation(call) => {
                view(call, |_| self.priority_queue_front_operation())
            }
        })
    }
}
