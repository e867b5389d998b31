pub use ICallRuntime::ICallRuntimeErrors as CallRuntimeError;

crate::sol! {
    /// Errors raised by the call runtime itself rather than by a contract.
    #[derive(Debug, PartialEq, Eq)]
    interface ICallRuntime {
        error UnknownFunctionSelector(bytes4 selector);
        error InsufficientFunds(address account, uint256 available, uint256 required);
    }
}

impl CallRuntimeError {
    pub const fn unknown_function_selector(selector: [u8; 4]) -> Self {
        Self::UnknownFunctionSelector(ICallRuntime::UnknownFunctionSelector {
            selector: alloy_primitives::FixedBytes(selector),
        })
    }

    pub const fn insufficient_funds(
        account: alloy_primitives::Address,
        available: alloy_primitives::U256,
        required: alloy_primitives::U256,
    ) -> Self {
        Self::InsufficientFunds(ICallRuntime::InsufficientFunds {
            account,
            available,
            required,
        })
    }
}
