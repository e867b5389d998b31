use super::AllowList;
use crate::{CallContext, Precompile, PrecompileResult, dispatch_call, mutate_void, view};
use alloy::sol_types::SolInterface;
use bridgehub_contracts::precompiles::IAllowList::IAllowListCalls;

impl Precompile for AllowList {
    fn call(&mut self, calldata: &[u8], ctx: &CallContext) -> PrecompileResult {
        dispatch_call(calldata, IAllowListCalls::abi_decode, |call| match call {
            IAllowListCalls::setAccessMode(call) => {
                mutate_void(call, ctx, |ctx, c| self.set_access_mode(ctx.msg_sender, c))
            }
            IAllowListCalls::setBatchAccessMode(call) => {
                mutate_void(call, ctx, |ctx, c| self.set_batch_access_mode(ctx.msg_sender, c))
            }
            IAllowListCalls::setPermissionToCall(call) => {
                mutate_void(call, ctx, |ctx, c| self.set_permission_to_call(ctx.msg_sender, c))
            }
            IAllowListCalls::setBatchPermissionToCall(call) => mutate_void(call, ctx, |ctx, c| {
                self.set_batch_permission_to_call(ctx.msg_sender, c)
            }),
            IAllowListCalls::setDepositLimit(call) => {
                mutate_void(call, ctx, |ctx, c| self.set_deposit_limit(ctx.msg_sender, c))
            }
            IAllowListCalls::getAccessMode(call) => {
                view(call, |c| self.access_mode(c.target).map(u8::from))
            }
            IAllowListCalls::hasSpecialAccessToCall(call) => {
                view(call, |c| self.has_special_access_to_call(c))
            }
            IAllowListCalls::canCall(call) => view(call, |c| self.can_call(c)),
            IAllowListCalls::getTokenDepositLimitData(call) => {
                view(call, |c| self.get_token_deposit_limit_data(c.l1Token))
            }
            IAllowListCalls::owner(call) => view(call, |_| self.owner()),
        })
    }
}
