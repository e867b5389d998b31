use alloy_primitives::{Address, B256, Bytes, U256};
use bridgehub_primitives::{L2ToL1Log, calculate_root};
use clap::Parser;
use eyre::{Result, WrapErr};

#[derive(Parser, Debug)]
pub(crate) struct LogRootArgs {
    /// Position of the sending transaction in its batch
    #[arg(long)]
    tx_number: u16,

    /// L2 sender of the message
    #[arg(long)]
    sender: Address,

    /// Message bytes (hex)
    #[arg(long)]
    message: Bytes,

    /// Position of the message log in the batch logs tree
    #[arg(long, default_value = "0")]
    index: U256,

    /// Sibling hashes from the leaf up to the root
    #[arg(long, num_args = 1.., required = true)]
    proof: Vec<B256>,
}

impl LogRootArgs {
    pub(crate) fn run(self) -> Result<()> {
        let log = L2ToL1Log::from_message(self.tx_number, self.sender, &self.message);
        let leaf = log.hash();
        let root = calculate_root(&self.proof, self.index, leaf)
            .wrap_err("failed to compute the logs tree root")?;

        println!("leaf: {leaf}");
        println!("root: {root}");
        Ok(())
    }
}
