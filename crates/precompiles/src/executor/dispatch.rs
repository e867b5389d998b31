use super::Executor;
use crate::{
    CallContext, Precompile, PrecompileResult, chain::ChainStorage, dispatch_call, mutate_void,
    view,
};
use alloy::sol_types::SolInterface;
use bridgehub_contracts::precompiles::IExecutor::IExecutorCalls;

impl Precompile for Executor {
    fn call(&mut self, calldata: &[u8], ctx: &CallContext) -> PrecompileResult {
        dispatch_call(calldata, IExecutorCalls::abi_decode, |call| match call {
            IExecutorCalls::saveL2LogsRootHash(call) => {
                mutate_void(call, ctx, |ctx, c| self.save_l2_logs_root_hash(ctx.msg_sender, c))
            }
            IExecutorCalls::executeBatch(call) => {
                mutate_void(call, ctx, |ctx, c| self.execute_batch(ctx.msg_sender, c))
            }
            IExecutorCalls::setValidator(call) => {
                mutate_void(call, ctx, |ctx, c| self.set_validator(ctx.msg_sender, c))
            }
            IExecutorCalls::l2LogsRootHash(call) => {
                view(call, |c| self.l2_logs_root(c.batchNumber))
            }
            IExecutorCalls::getTotalBatchesExecuted(call) => {
                view(call, |_| self.total_batches_executed())
            }
            IExecutorCalls::isValidator(call) => view(call, |c| self.is_validator(c.account)),
            IExecutorCalls::getGovernor(call) => view(call, |_| self.governor()),
        })
    }
}
