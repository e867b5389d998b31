use super::L1Erc20Bridge;
use crate::{CallContext, Precompile, PrecompileResult, dispatch_call, mutate, mutate_void, view};
use alloy::sol_types::SolInterface;
use bridgehub_contracts::precompiles::IL1Bridge::IL1BridgeCalls;

impl Precompile for L1Erc20Bridge {
    fn call(&mut self, calldata: &[u8], ctx: &CallContext) -> PrecompileResult {
        dispatch_call(calldata, IL1BridgeCalls::abi_decode, |call| match call {
            IL1BridgeCalls::deposit(call) => mutate(call, ctx, |ctx, c| self.deposit(ctx, c)),
            IL1BridgeCalls::finalizeWithdrawal(call) => {
                mutate_void(call, ctx, |ctx, c| self.finalize_withdrawal(ctx, c))
            }
            IL1BridgeCalls::claimFailedDeposit(call) => {
                mutate_void(call, ctx, |ctx, c| self.claim_failed_deposit(ctx, c))
            }
            IL1BridgeCalls::isWithdrawalFinalized(call) => {
                view(call, |c| self.is_withdrawal_finalized(c))
            }
            IL1BridgeCalls::depositAmount(call) => view(call, |c| self.deposit_amount(c)),
            IL1BridgeCalls::l2Bridge(call) => view(call, |_| self.l2_bridge()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        storage::{StorageCtx, hashmap::HashMapStorageProvider},
        test_util::{assert_full_coverage, check_selector_coverage},
    };
    use alloy::primitives::Address;

    #[test]
    fn test_l1_bridge_selector_coverage() -> eyre::Result<()> {
        let mut storage = HashMapStorageProvider::new(1);
        StorageCtx::enter(&mut storage, || {
            let mut bridge = L1Erc20Bridge::at(Address::random());

            let unsupported = check_selector_coverage(
                &mut bridge,
                IL1BridgeCalls::SELECTORS,
                "IL1Bridge",
                IL1BridgeCalls::name_by_selector,
            );

            assert_full_coverage([unsupported]);

            Ok(())
        })?;
        Ok(())
    }
}
