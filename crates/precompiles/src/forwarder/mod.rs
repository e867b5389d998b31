pub mod dispatch;

use alloy::primitives::{Address, Bytes};
use bridgehub_contracts::precompiles::IForwarder;
use tracing::trace;

use crate::{
    contract_storage,
    error::{BridgehubPrecompileError, Result},
    runtime::{self, CallContext, ContractKind},
    storage::StorageCtx,
};

contract_storage! {
    /// Relays calls so that the relaying contract, not the caller, is their `msg.sender`.
    pub struct Forwarder;
}

impl Forwarder {
    pub fn forward(&mut self, ctx: &CallContext, call: IForwarder::forwardCall) -> Result<Bytes> {
        relay(self.address, ctx, call.to, &call.data)
    }
}

/// Deploys a forwarder that relays `data` to `to` from its constructor, with the whole
/// `ctx.value`.
///
/// The relayed call runs before the forwarder has code, so the callee sees a contract sender
/// that looks like an account.
pub fn deploy_and_forward(ctx: &CallContext, to: Address, data: &[u8]) -> Result<Address> {
    runtime::deploy(ctx.msg_sender, ContractKind::Forwarder, |address| {
        StorageCtx.transfer(ctx.msg_sender, address, ctx.value)?;
        relay(address, ctx, to, data).map(drop)
    })
}

fn relay(forwarder: Address, ctx: &CallContext, to: Address, data: &[u8]) -> Result<Bytes> {
    let output = runtime::call(to, data, &ctx.nested(forwarder, ctx.value))?;
    if output.reverted {
        trace!(%forwarder, %to, "relayed call reverted");
        return Err(BridgehubPrecompileError::Revert(output.bytes));
    }
    Ok(output.bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        erc20::TestnetErc20,
        error::decode_error,
        storage::hashmap::HashMapStorageProvider,
    };
    use alloy::{
        primitives::U256,
        sol_types::{SolCall, SolValue},
    };
    use bridgehub_contracts::precompiles::{Erc20Error, IErc20};

    #[test]
    fn test_forwarder_is_the_sender() -> eyre::Result<()> {
        let mut storage = HashMapStorageProvider::new(1);
        let (user, receiver) = (Address::random(), Address::random());
        let output = StorageCtx::enter(&mut storage, || {
            let token = runtime::deploy(user, ContractKind::TestnetErc20, |_| Ok(()))?;
            let forwarder = runtime::deploy(user, ContractKind::Forwarder, |_| Ok(()))?;
            TestnetErc20::at(token)
                .mint(IErc20::mintCall { to: forwarder, amount: U256::from(7) })?;

            let ctx = CallContext::transaction(user, U256::ZERO, U256::ZERO);
            let transfer = IErc20::transferCall { to: receiver, amount: U256::from(7) };
            let output = Forwarder::at(forwarder).forward(
                &ctx,
                IForwarder::forwardCall { to: token, data: transfer.abi_encode().into() },
            )?;

            assert_eq!(TestnetErc20::at(token).balance_of(receiver)?, U256::from(7));
            Ok(output)
        })?;

        assert!(bool::abi_decode(&output)?);
        Ok(())
    }

    #[test]
    fn test_reverts_bubble_up() -> eyre::Result<()> {
        let mut storage = HashMapStorageProvider::new(1);
        let user = Address::random();
        StorageCtx::enter(&mut storage, || {
            let token = runtime::deploy(user, ContractKind::TestnetErc20, |_| Ok(()))?;
            let forwarder = runtime::deploy(user, ContractKind::Forwarder, |_| Ok(()))?;

            let ctx = CallContext::transaction(user, U256::ZERO, U256::ZERO);
            let transfer = IErc20::transferCall { to: user, amount: U256::from(1) };
            let call = IForwarder::forwardCall { to: token, data: transfer.abi_encode().into() };
            let err = Forwarder::at(forwarder).forward(&ctx, call).unwrap_err();

            assert_eq!(
                decode_error(&err.abi_encode(), None),
                Erc20Error::insufficient_balance(forwarder, U256::ZERO, U256::from(1)).into()
            );
            Ok(())
        })?;
        Ok(())
    }

    #[test]
    fn test_constructor_forwards_value() -> eyre::Result<()> {
        let mut storage = HashMapStorageProvider::new(1);
        let (user, receiver) = (Address::random(), Address::random());
        StorageCtx::enter(&mut storage, || {
            StorageCtx.set_balance(user, U256::from(10))?;
            let ctx = CallContext::transaction(user, U256::from(4), U256::ZERO);

            let forwarder = deploy_and_forward(&ctx, receiver, &[])?;
            assert_eq!(StorageCtx.balance(receiver)?, U256::from(4));
            assert_eq!(StorageCtx.balance(forwarder)?, U256::ZERO);
            assert!(StorageCtx.has_code(forwarder)?);
            Ok(())
        })?;
        Ok(())
    }
}
