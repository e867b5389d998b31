use alloy::{
    primitives::{Bytes, Selector},
    sol_types::SolInterface,
};
use bridgehub_contracts::precompiles::{
    AllowListError, CallRuntimeError, Erc20Error, ExecutorError, L1BridgeError, MailboxError,
};

/// Result type of every contract operation.
pub type Result<T> = std::result::Result<T, BridgehubPrecompileError>;

/// Failure of a contract call.
///
/// Every variant but [`Fatal`](Self::Fatal) is a revert: the call's state changes are rolled back
/// and the ABI-encoded error is returned to the caller. A fatal error aborts the whole execution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgehubPrecompileError {
    #[error("allow list error: {0:?}")]
    AllowListError(#[from] AllowListError),

    #[error("mailbox error: {0:?}")]
    MailboxError(#[from] MailboxError),

    #[error("executor error: {0:?}")]
    ExecutorError(#[from] ExecutorError),

    #[error("L1 bridge error: {0:?}")]
    L1BridgeError(#[from] L1BridgeError),

    #[error("ERC20 error: {0:?}")]
    Erc20Error(#[from] Erc20Error),

    #[error("call runtime error: {0:?}")]
    CallRuntimeError(#[from] CallRuntimeError),

    /// Revert data bubbled up verbatim from a nested call.
    #[error("execution reverted: {0}")]
    Revert(Bytes),

    #[error("fatal error: {0}")]
    Fatal(String),
}

impl BridgehubPrecompileError {
    pub fn unknown_selector(selector: Selector) -> Self {
        CallRuntimeError::unknown_function_selector(selector.0).into()
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }

    /// Revert data returned to the caller.
    pub fn abi_encode(&self) -> Bytes {
        match self {
            Self::AllowListError(e) => e.abi_encode().into(),
            Self::MailboxError(e) => e.abi_encode().into(),
            Self::ExecutorError(e) => e.abi_encode().into(),
            Self::L1BridgeError(e) => e.abi_encode().into(),
            Self::Erc20Error(e) => e.abi_encode().into(),
            Self::CallRuntimeError(e) => e.abi_encode().into(),
            Self::Revert(data) => data.clone(),
            Self::Fatal(_) => Bytes::new(),
        }
    }

    /// Short name of the error, e.g. `DepositLimitExceeded`. Used in logs and CLI reports.
    pub fn name(&self) -> String {
        let debug = match self {
            Self::Revert(_) => return "Revert".to_string(),
            Self::Fatal(_) => return "Fatal".to_string(),
            Self::AllowListError(e) => format!("{e:?}"),
            Self::MailboxError(e) => format!("{e:?}"),
            Self::ExecutorError(e) => format!("{e:?}"),
            Self::L1BridgeError(e) => format!("{e:?}"),
            Self::Erc20Error(e) => format!("{e:?}"),
            Self::CallRuntimeError(e) => format!("{e:?}"),
        };
        debug.split('(').next().unwrap_or_default().to_string()
    }
}

/// Decodes revert data into the first error enum that recognizes it.
///
/// `preferred` is tried first, so that errors shared by several interfaces (e.g.
/// `CallerNotAllowed()`) resolve to the contract that actually reverted.
pub fn decode_error(data: &[u8], preferred: Option<ErrorDomain>) -> BridgehubPrecompileError {
    if let Ok(e) = CallRuntimeError::abi_decode(data) {
        return e.into();
    }

    let domains = preferred.into_iter().chain(ErrorDomain::ALL);
    for domain in domains {
        if let Some(e) = domain.decode(data) {
            return e;
        }
    }

    BridgehubPrecompileError::Revert(Bytes::copy_from_slice(data))
}

/// Interface family an error may belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorDomain {
    AllowList,
    Mailbox,
    Executor,
    L1Bridge,
    Erc20,
}

impl ErrorDomain {
    const ALL: [Self; 5] =
        [Self::AllowList, Self::Mailbox, Self::Executor, Self::L1Bridge, Self::Erc20];

    fn decode(self, data: &[u8]) -> Option<BridgehubPrecompileError> {
        match self {
            Self::AllowList => AllowListError::abi_decode(data).ok().map(Into::into),
            Self::Mailbox => MailboxError::abi_decode(data).ok().map(Into::into),
            Self::Executor => ExecutorError::abi_decode(data).ok().map(Into::into),
            Self::L1Bridge => L1BridgeError::abi_decode(data).ok().map(Into::into),
            Self::Erc20 => Erc20Error::abi_decode(data).ok().map(Into::into),
        }
    }
}
