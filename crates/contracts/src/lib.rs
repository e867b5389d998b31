//! Bridgehub L1 contract bindings.
//!
//! Every contract modelled by `bridgehub-precompiles` has its Solidity interface declared here:
//! calls, events and the custom errors a call can revert with.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub mod precompiles;

pub(crate) use alloy_sol_types::sol;
