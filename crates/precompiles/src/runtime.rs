//! Call runtime of the native contracts.
//!
//! Contracts are identified by a two byte code marker. A call transfers `msg.value` to the
//! target, dispatches the calldata to the contract the marker designates and rolls every state
//! change back if the contract reverts.

use alloy::{
    primitives::{Address, Bytes, Selector, U256},
    sol_types::{SolCall, SolInterface},
};
use bridgehub_contracts::precompiles::IMailbox::IMailboxCalls;
use tracing::{debug, trace};

use crate::{
    allow_list::AllowList,
    erc20::TestnetErc20,
    error::{BridgehubPrecompileError, ErrorDomain, Result, decode_error},
    executor::Executor,
    forwarder::Forwarder,
    l1_erc20_bridge::L1Erc20Bridge,
    mailbox::Mailbox,
    metrics::metrics,
    storage::StorageCtx,
};

/// First byte of the code of every native contract.
const CODE_MARKER: u8 = 0xef;

/// Execution context of a single call frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub msg_sender: Address,
    pub tx_origin: Address,
    pub value: U256,
    pub gas_price: U256,
}

impl CallContext {
    /// Context of a call made directly by the externally owned account `origin`.
    pub fn transaction(origin: Address, value: U256, gas_price: U256) -> Self {
        Self { msg_sender: origin, tx_origin: origin, value, gas_price }
    }

    /// Context of a call made by the contract `caller` from within this frame.
    pub fn nested(&self, caller: Address, value: U256) -> Self {
        Self { msg_sender: caller, value, ..*self }
    }
}

/// Output of a call: return data, or revert data if `reverted` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrecompileOutput {
    pub bytes: Bytes,
    pub reverted: bool,
}

impl PrecompileOutput {
    pub fn new(bytes: Bytes) -> Self {
        Self { bytes, reverted: false }
    }

    pub fn new_reverted(bytes: Bytes) -> Self {
        Self { bytes, reverted: true }
    }
}

/// `Err` is reserved for fatal errors; reverts are successful outputs with `reverted` set.
pub type PrecompileResult = Result<PrecompileOutput>;

pub trait Precompile {
    fn call(&mut self, calldata: &[u8], ctx: &CallContext) -> PrecompileResult;
}

/// Kinds of native contracts that can be deployed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ContractKind {
    AllowList = 1,
    /// Mailbox and executor facets sharing the storage of one chain.
    Diamond = 2,
    L1Erc20Bridge = 3,
    TestnetErc20 = 4,
    Forwarder = 5,
}

impl ContractKind {
    pub fn code(self) -> Bytes {
        Bytes::from(vec![CODE_MARKER, self as u8])
    }

    pub fn from_code(code: &[u8]) -> Option<Self> {
        match code {
            [CODE_MARKER, 1] => Some(Self::AllowList),
            [CODE_MARKER, 2] => Some(Self::Diamond),
            [CODE_MARKER, 3] => Some(Self::L1Erc20Bridge),
            [CODE_MARKER, 4] => Some(Self::TestnetErc20),
            [CODE_MARKER, 5] => Some(Self::Forwarder),
            _ => None,
        }
    }

    /// Errors the contract raises itself.
    pub fn error_domain(self) -> Option<ErrorDomain> {
        match self {
            Self::AllowList => Some(ErrorDomain::AllowList),
            Self::Diamond => Some(ErrorDomain::Mailbox),
            Self::L1Erc20Bridge => Some(ErrorDomain::L1Bridge),
            Self::TestnetErc20 => Some(ErrorDomain::Erc20),
            Self::Forwarder => None,
        }
    }

    fn execute(self, address: Address, calldata: &[u8], ctx: &CallContext) -> PrecompileResult {
        match self {
            Self::AllowList => AllowList::at(address).call(calldata, ctx),
            Self::Diamond => {
                let is_mailbox_call = calldata
                    .get(..4)
                    .and_then(|selector| <[u8; 4]>::try_from(selector).ok())
                    .is_some_and(IMailboxCalls::valid_selector);
                if is_mailbox_call {
                    Mailbox::at(address).call(calldata, ctx)
                } else {
                    Executor::at(address).call(calldata, ctx)
                }
            }
            Self::L1Erc20Bridge => L1Erc20Bridge::at(address).call(calldata, ctx),
            Self::TestnetErc20 => TestnetErc20::at(address).call(calldata, ctx),
            Self::Forwarder => Forwarder::at(address).call(calldata, ctx),
        }
    }
}

/// Decodes `calldata` with `decode` and hands the call to `f`.
///
/// Unknown selectors and malformed calldata revert.
pub fn dispatch_call<T>(
    calldata: &[u8],
    decode: impl FnOnce(&[u8]) -> alloy::sol_types::Result<T>,
    f: impl FnOnce(T) -> PrecompileResult,
) -> PrecompileResult {
    let Some(selector) = calldata.get(..4) else {
        return unknown_selector(Selector::right_padding_from(calldata));
    };

    match decode(calldata) {
        Ok(call) => f(call),
        Err(alloy::sol_types::Error::UnknownSelector { .. }) => {
            unknown_selector(Selector::from_slice(selector))
        }
        Err(err) => {
            debug!(%err, "malformed calldata");
            Ok(PrecompileOutput::new_reverted(Bytes::new()))
        }
    }
}

pub fn unknown_selector(selector: Selector) -> PrecompileResult {
    into_precompile_result(Err(BridgehubPrecompileError::unknown_selector(selector)))
}

/// Turns the result of a contract operation into a call output.
pub fn into_precompile_result(result: Result<Bytes>) -> PrecompileResult {
    match result {
        Ok(bytes) => Ok(PrecompileOutput::new(bytes)),
        Err(err) if err.is_fatal() => Err(err),
        Err(err) => Ok(PrecompileOutput::new_reverted(err.abi_encode())),
    }
}

/// Read-only call.
pub fn view<C: SolCall>(call: C, f: impl FnOnce(C) -> Result<C::Return>) -> PrecompileResult {
    into_precompile_result(f(call).map(|ret| C::abi_encode_returns(&ret).into()))
}

/// State-changing call with return data.
pub fn mutate<C: SolCall>(
    call: C,
    ctx: &CallContext,
    f: impl FnOnce(&CallContext, C) -> Result<C::Return>,
) -> PrecompileResult {
    into_precompile_result(f(ctx, call).map(|ret| C::abi_encode_returns(&ret).into()))
}

/// State-changing call without return data.
pub fn mutate_void<C: SolCall>(
    call: C,
    ctx: &CallContext,
    f: impl FnOnce(&CallContext, C) -> Result<()>,
) -> PrecompileResult {
    into_precompile_result(f(ctx, call).map(|()| Bytes::new()))
}

/// Calls `target` with `calldata`, atomically.
///
/// `ctx.value` moves from `ctx.msg_sender` to `target` first. If the callee reverts, every state
/// change of the call (value transfer included) is rolled back.
pub fn call(target: Address, calldata: &[u8], ctx: &CallContext) -> PrecompileResult {
    let mut storage = StorageCtx;
    let checkpoint = storage.checkpoint()?;

    match execute(&mut storage, target, calldata, ctx) {
        Ok(output) if !output.reverted => {
            storage.checkpoint_commit(checkpoint)?;
            Ok(output)
        }
        Ok(output) => {
            trace!(%target, sender = %ctx.msg_sender, revert = %output.bytes, "call reverted");
            storage.checkpoint_revert(checkpoint)?;
            Ok(output)
        }
        Err(err) => {
            storage.checkpoint_revert(checkpoint)?;
            Err(err)
        }
    }
}

fn execute(
    storage: &mut StorageCtx,
    target: Address,
    calldata: &[u8],
    ctx: &CallContext,
) -> PrecompileResult {
    if let Err(err) = storage.transfer(ctx.msg_sender, target, ctx.value) {
        return into_precompile_result(Err(err));
    }

    match ContractKind::from_code(&storage.code(target)?) {
        Some(kind) => kind.execute(target, calldata, ctx),
        // Plain accounts accept any call.
        None => Ok(PrecompileOutput::new(Bytes::new())),
    }
}

/// Typed [`call`]: encodes `call`, decodes the return data and turns revert data back into an
/// error.
pub fn call_contract<C: SolCall>(
    target: Address,
    call: &C,
    ctx: &CallContext,
) -> Result<C::Return> {
    let domain =
        ContractKind::from_code(&StorageCtx.code(target)?).and_then(ContractKind::error_domain);
    let output = self::call(target, &call.abi_encode(), ctx)?;
    if output.reverted {
        return Err(decode_error(&output.bytes, domain));
    }

    C::abi_decode_returns(&output.bytes).map_err(|err| {
        BridgehubPrecompileError::Fatal(format!("invalid return data of {}: {err}", C::SIGNATURE))
    })
}

/// Sends a transaction from the externally owned account `origin` and returns the decoded
/// result.
pub fn transact<C: SolCall>(
    origin: Address,
    target: Address,
    value: U256,
    gas_price: U256,
    call: &C,
) -> Result<C::Return> {
    let result = call_contract(target, call, &CallContext::transaction(origin, value, gas_price));
    if let Err(err) = &result {
        metrics().record_revert(&err.name());
    }
    result
}

/// Deploys a contract of `kind` from `deployer` at `deployer.create(nonce)`.
///
/// `init` runs before the code is set, like a constructor: calls made from it see a sender
/// without code.
pub fn deploy<F>(deployer: Address, kind: ContractKind, init: F) -> Result<Address>
where
    F: FnOnce(Address) -> Result<()>,
{
    let mut storage = StorageCtx;
    let nonce = storage.nonce(deployer)?;
    let address = deployer.create(nonce);
    storage.set_nonce(deployer, nonce + 1)?;

    let checkpoint = storage.checkpoint()?;
    match init(address).and_then(|()| storage.set_code(address, kind.code())) {
        Ok(()) => {
            storage.checkpoint_commit(checkpoint)?;
            debug!(%deployer, %address, ?kind, "deployed contract");
            Ok(address)
        }
        Err(err) => {
            storage.checkpoint_revert(checkpoint)?;
            Err(err)
        }
    }
}
