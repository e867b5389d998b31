use clap::Parser;
use opts::{BridgehubCli, BridgehubSubcommand};

mod cmd;
mod opts;

fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = BridgehubCli::parse();

    match args.cmd {
        BridgehubSubcommand::Alias(cmd) => cmd.run(),
        BridgehubSubcommand::LogRoot(cmd) => cmd.run(),
        BridgehubSubcommand::BytecodeHash(cmd) => cmd.run(),
        BridgehubSubcommand::BaseCost(cmd) => cmd.run(),
        BridgehubSubcommand::Simulate(cmd) => cmd.run(),
    }
}
