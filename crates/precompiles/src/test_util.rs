//! Helpers shared by the contract tests.

use alloy::primitives::{Address, U256};
use bridgehub_contracts::precompiles::CallRuntimeError;

use crate::{
    error::{BridgehubPrecompileError, decode_error},
    runtime::{CallContext, Precompile},
};

/// Calls `precompile` with every selector of an interface and returns the ones it does not
/// dispatch, with their function names.
pub fn check_selector_coverage<P: Precompile>(
    precompile: &mut P,
    selectors: &[[u8; 4]],
    interface_name: &str,
    name_by_selector: impl Fn([u8; 4]) -> Option<&'static str>,
) -> Vec<(String, [u8; 4])> {
    let ctx = CallContext::transaction(Address::ZERO, U256::ZERO, U256::ZERO);
    let mut unsupported = Vec::new();

    for selector in selectors {
        let Ok(output) = precompile.call(selector, &ctx) else {
            continue;
        };
        if !output.reverted {
            continue;
        }

        let err = decode_error(&output.bytes, None);
        let unknown = CallRuntimeError::unknown_function_selector(*selector);
        if err == BridgehubPrecompileError::from(unknown) {
            let name = name_by_selector(*selector).unwrap_or("<unknown>");
            unsupported.push((format!("{interface_name}.{name}"), *selector));
        }
    }

    unsupported
}

/// Panics with the list of unsupported functions if any interface is not fully dispatched.
pub fn assert_full_coverage<I>(results: I)
where
    I: IntoIterator<Item = Vec<(String, [u8; 4])>>,
{
    let missing: Vec<_> = results.into_iter().flatten().collect();
    assert!(missing.is_empty(), "unsupported functions: {missing:?}");
}
