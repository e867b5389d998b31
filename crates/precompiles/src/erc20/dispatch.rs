use super::TestnetErc20;
use crate::{CallContext, Precompile, PrecompileResult, dispatch_call, mutate, view};
use alloy::sol_types::SolInterface;
use bridgehub_contracts::precompiles::IErc20::IErc20Calls;

impl Precompile for TestnetErc20 {
    fn call(&mut self, calldata: &[u8], ctx: &CallContext) -> PrecompileResult {
        dispatch_call(calldata, IErc20Calls::abi_decode, |call| match call {
            IErc20Calls::name(call) => view(call, |_| self.name()),
            IErc20Calls::symbol(call) => view(call, |_| self.symbol()),
            IErc20Calls::decimals(call) => view(call, |_| self.decimals()),
            IErc20Calls::totalSupply(call) => view(call, |_| self.total_supply()),
            IErc20Calls::balanceOf(call) => view(call, |c| self.balance_of(c.account)),
            IErc20Calls::allowance(call) => view(call, |c| self.allowance(c.owner, c.spender)),
            IErc20Calls::transfer(call) => {
                mutate(call, ctx, |ctx, c| self.transfer(ctx.msg_sender, c))
            }
            IErc20Calls::approve(call) => {
                mutate(call, ctx, |ctx, c| self.approve(ctx.msg_sender, c))
            }
            IErc20Calls::transferFrom(call) => {
                mutate(call, ctx, |ctx, c| self.transfer_from(ctx.msg_sender, c))
            }
            IErc20Calls::mint(call) => mutate(call, ctx, |_, c| self.mint(c)),
        })
    }
}
