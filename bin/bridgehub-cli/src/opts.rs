use crate::cmd::{
    alias::AliasArgs, base_cost::BaseCostArgs, bytecode_hash::BytecodeHashArgs,
    log_root::LogRootArgs, simulate::SimulateArgs,
};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "bridgehub")]
#[command(version, about = "CLI for bridgehub L1 <-> L2 bridge operations", long_about = None)]
pub(crate) struct BridgehubCli {
    #[command(subcommand)]
    pub(crate) cmd: BridgehubSubcommand,
}

#[derive(Subcommand, Debug)]
pub(crate) enum BridgehubSubcommand {
    /// Apply (or undo) the L1 -> L2 address alias
    Alias(AliasArgs),

    /// Compute the logs tree root an L2 -> L1 message proves against
    LogRoot(LogRootArgs),

    /// Validate an L2 bytecode and print its versioned hash
    BytecodeHash(BytecodeHashArgs),

    /// Cost in ETH of an L1 -> L2 transaction
    BaseCost(BaseCostArgs),

    /// Run deposits and withdrawals against an in-memory deployment
    Simulate(SimulateArgs),
}
