use alloy_primitives::Address;
use bridgehub_primitives::{apply_l1_to_l2_alias, undo_l1_to_l2_alias};
use clap::Parser;
use eyre::Result;

#[derive(Parser, Debug)]
pub(crate) struct AliasArgs {
    /// Address to transform
    address: Address,

    /// Recover the L1 address from an aliased L2 address
    #[arg(long)]
    undo: bool,
}

impl AliasArgs {
    pub(crate) fn run(self) -> Result<()> {
        let address = if self.undo {
            undo_l1_to_l2_alias(self.address)
        } else {
            apply_l1_to_l2_alias(self.address)
        };
        println!("{address}");
        Ok(())
    }
}
