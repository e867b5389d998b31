//! Deployment of a complete bridgehub: allow list, chain diamond, test token and ERC20 bridge.

use alloy::primitives::{Address, U256};
use bridgehub_contracts::precompiles::{ETH_TOKEN_ADDRESS, IAllowList};
use tracing::info;

use crate::{
    allow_list::AllowList,
    chain::{ChainParams, ChainStorage},
    config::DeploymentConfig,
    erc20::TestnetErc20,
    error::Result,
    l1_erc20_bridge::L1Erc20Bridge,
    mailbox::Mailbox,
    runtime::{ContractKind, deploy},
};

/// Addresses of a deployed bridgehub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub governor: Address,
    pub validator: Address,
    pub allow_list: Address,
    /// Mailbox and executor of the L2 chain.
    pub diamond: Address,
    pub token: Address,
    pub bridge: Address,
    pub l2_bridge: Address,
    pub l2_chain_id: u64,
}

impl Deployment {
    /// Deploys every contract from the governor account, in the current storage context.
    pub fn deploy(config: &DeploymentConfig) -> Result<Self> {
        let governor = config.governor;

        let allow_list = deploy(governor, ContractKind::AllowList, |address| {
            AllowList::at(address).initialize(governor)
        })?;

        let params = ChainParams {
            governor,
            validator: config.validator,
            l2_chain_id: config.l2_chain_id,
            allow_list,
            priority_tx_max_gas_limit: config.priority_tx_max_gas_limit,
        };
        let diamond = deploy(governor, ContractKind::Diamond, |address| {
            Mailbox::at(address).initialize(&params)
        })?;

        let token = deploy(governor, ContractKind::TestnetErc20, |address| {
            TestnetErc20::at(address).initialize(
                &config.token.name,
                &config.token.symbol,
                config.token.decimals,
            )
        })?;

        let bridge = deploy(governor, ContractKind::L1Erc20Bridge, |address| {
            L1Erc20Bridge::at(address).initialize(diamond, allow_list, config.l2_bridge)
        })?;

        let mut list = AllowList::at(allow_list);
        list.set_batch_access_mode(
            governor,
            IAllowList::setBatchAccessModeCall {
                targets: vec![diamond, bridge],
                accessModes: vec![u8::from(config.access_mode); 2],
            },
        )?;
        let limits =
            [(ETH_TOKEN_ADDRESS, config.eth_deposit_limit), (token, config.token_deposit_limit)];
        for (l1_token, cap) in limits {
            let Some(cap) = cap else { continue };
            list.set_deposit_limit(
                governor,
                IAllowList::setDepositLimitCall {
                    l1Token: l1_token,
                    depositLimitation: true,
                    depositCap: cap,
                },
            )?;
        }

        info!(
            %allow_list,
            %diamond,
            %token,
            %bridge,
            l2_chain_id = config.l2_chain_id,
            "bridgehub deployed"
        );
        Ok(Self {
            governor,
            validator: config.validator,
            allow_list,
            diamond,
            token,
            bridge,
            l2_bridge: config.l2_bridge,
            l2_chain_id: config.l2_chain_id,
        })
    }

    pub fn l2_chain_id(&self) -> U256 {
        U256::from(self.l2_chain_id)
    }

    pub fn mailbox(&self) -> Mailbox {
        Mailbox::at(self.diamond)
    }

    pub fn total_priority_txs(&self) -> Result<U256> {
        self.mailbox().total_priority_txs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::default_test_config,
        storage::{StorageCtx, hashmap::HashMapStorageProvider},
    };
    use bridgehub_primitives::AccessMode;

    #[test]
    fn test_deploy_default_config() -> eyre::Result<()> {
        let config = default_test_config();
        let mut storage = HashMapStorageProvider::new(config.l1_chain_id);
        StorageCtx::enter(&mut storage, || {
            let deployment = Deployment::deploy(&config)?;

            let contracts =
                [deployment.allow_list, deployment.diamond, deployment.token, deployment.bridge];
            for address in contracts {
                assert!(StorageCtx.has_code(address)?);
            }
            let mut list = AllowList::at(deployment.allow_list);
            assert_eq!(list.owner()?, config.governor);
            assert_eq!(list.access_mode(deployment.bridge)?, AccessMode::Public);
            assert_eq!(deployment.mailbox().l2_chain_id()?, U256::from(270));
            assert!(deployment.mailbox().is_validator(config.validator)?);
            assert_eq!(TestnetErc20::at(deployment.token).symbol()?, "DAI");
            assert_eq!(L1Erc20Bridge::at(deployment.bridge).l2_bridge()?, config.l2_bridge);
            Ok(())
        })?;
        Ok(())
    }

    #[test]
    fn test_deposit_limits_are_configured() -> eyre::Result<()> {
        let mut config = default_test_config();
        config.token_deposit_limit = Some(U256::from(50));
        let mut storage = HashMapStorageProvider::new(config.l1_chain_id);
        StorageCtx::enter(&mut storage, || {
            let deployment = Deployment::deploy(&config)?;
            let mut list = AllowList::at(deployment.allow_list);

            let token_limit = list.get_token_deposit_limit_data(deployment.token)?;
            assert!(token_limit.depositLimitation);
            assert_eq!(token_limit.depositCap, U256::from(50));
            assert!(!list.get_token_deposit_limit_data(ETH_TOKEN_ADDRESS)?.depositLimitation);
            Ok(())
        })?;
        Ok(())
    }
}
