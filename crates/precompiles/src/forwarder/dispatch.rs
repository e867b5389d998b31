use super::Forwarder;
use crate::{CallContext, Precompile, PrecompileResult, dispatch_call, mutate};
use alloy::sol_types::SolInterface;
use bridgehub_contracts::precompiles::IForwarder::IForwarderCalls;

impl Precompile for Forwarder {
    fn call(&mut self, calldata: &[u8], ctx: &CallContext) -> PrecompileResult {
        dispatch_call(calldata, IForwarderCalls::abi_decode, |call| match call {
            IForwarderCalls::forward(call) => mutate(call, ctx, |ctx, c| self.forward(ctx, c)),
        })
    }
}
