//! Deployment configuration of a bridgehub instance.

use alloy_primitives::{Address, U256, address};
use bridgehub_primitives::{AccessMode, priority::DEFAULT_PRIORITY_TX_MAX_GAS_LIMIT};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
    #[error("governor must not be the zero address")]
    ZeroGovernor,
    #[error("L2 chain id must not be zero")]
    ZeroL2ChainId,
}

/// Settings the contracts of one L1 <-> L2 pair are deployed with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DeploymentConfig {
    /// Chain id of the L1 ledger the contracts live on.
    pub l1_chain_id: u64,
    pub l2_chain_id: u64,
    /// Deployer of every contract, owner of the allow list and governor of the chain.
    pub governor: Address,
    pub validator: Address,
    /// Address of the L2 side of the ERC20 bridge.
    pub l2_bridge: Address,
    #[serde(default = "default_priority_tx_max_gas_limit")]
    pub priority_tx_max_gas_limit: u64,
    /// Access mode of the mailbox and the bridge after deployment.
    #[serde(default)]
    pub access_mode: AccessMode,
    #[serde(default)]
    pub eth_deposit_limit: Option<U256>,
    #[serde(default)]
    pub token_deposit_limit: Option<U256>,
    /// Token deployed alongside the bridge.
    pub token: TokenConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TokenConfig {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

fn default_priority_tx_max_gas_limit() -> u64 {
    DEFAULT_PRIORITY_TX_MAX_GAS_LIMIT
}

impl DeploymentConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.governor.is_zero() {
            return Err(ConfigError::ZeroGovernor);
        }
        if self.l2_chain_id == 0 {
            return Err(ConfigError::ZeroL2ChainId);
        }
        Ok(())
    }
}

/// Public deployment of a test token on chain 270, without deposit limits.
pub fn default_test_config() -> DeploymentConfig {
    DeploymentConfig {
        l1_chain_id: 9,
        l2_chain_id: 270,
        governor: address!("0x36615Cf349d7F6344891B1e7CA7C72883F5dc049"),
        validator: address!("0xa61464658AfeAf65CccaaFD3a512b69A83B77618"),
        l2_bridge: address!("0x1111111111111111111111111111111111111111"),
        priority_tx_max_gas_limit: DEFAULT_PRIORITY_TX_MAX_GAS_LIMIT,
        access_mode: AccessMode::Public,
        eth_deposit_limit: None,
        token_deposit_limit: None,
        token: TokenConfig { name: "DAI".to_string(), symbol: "DAI".to_string(), decimals: 18 },
    }
}
