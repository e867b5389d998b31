use alloy_primitives::U256;
use bridgehub_primitives::{
    derive_l2_gas_price, l2_transaction_base_cost, priority::REQUIRED_L2_GAS_PRICE_PER_PUBDATA,
};
use clap::Parser;
use eyre::{OptionExt, Result};

#[derive(Parser, Debug)]
pub(crate) struct BaseCostArgs {
    /// L1 gas price in wei
    #[arg(long)]
    gas_price: U256,

    /// L2 gas limit of the transaction
    #[arg(long)]
    gas_limit: U256,

    /// L2 gas paid per byte of published data
    #[arg(long, default_value_t = U256::from(REQUIRED_L2_GAS_PRICE_PER_PUBDATA))]
    gas_per_pubdata: U256,
}

impl BaseCostArgs {
    pub(crate) fn run(self) -> Result<()> {
        let l2_gas_price = derive_l2_gas_price(self.gas_price, self.gas_per_pubdata)
            .ok_or_eyre("gas per pubdata must be non-zero and the L2 gas price must fit 256 bits")?;
        let cost = l2_transaction_base_cost(self.gas_price, self.gas_limit, self.gas_per_pubdata)
            .ok_or_eyre("base cost overflows 256 bits")?;

        println!("l2 gas price: {l2_gas_price}");
        println!("base cost:    {cost}");
        Ok(())
    }
}
