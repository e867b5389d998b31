pub mod dispatch;

use alloy::primitives::{Address, U256};
use bridgehub_contracts::precompiles::{Erc20Error, IErc20};
use tracing::trace;

use crate::{
    contract_storage,
    error::Result,
    storage::{
        StorageOps,
        slots::{double_mapping_slot, mapping_slot},
    },
};

pub mod slots {
    use alloy::primitives::U256;

    pub const NAME: U256 = U256::ZERO;
    pub const SYMBOL: U256 = U256::from_limbs([1, 0, 0, 0]);
    pub const DECIMALS: U256 = U256::from_limbs([2, 0, 0, 0]);
    pub const TOTAL_SUPPLY: U256 = U256::from_limbs([3, 0, 0, 0]);
    /// `mapping(address => uint256)`
    pub const BALANCES: U256 = U256::from_limbs([4, 0, 0, 0]);
    /// `mapping(address owner => mapping(address spender => uint256))`
    pub const ALLOWANCES: U256 = U256::from_limbs([5, 0, 0, 0]);
}

contract_storage! {
    /// ERC20 token anyone can mint, used as the L1 side of bridged tokens on test networks.
    pub struct TestnetErc20;
}

impl TestnetErc20 {
    pub fn initialize(&mut self, name: &str, symbol: &str, decimals: u8) -> Result<()> {
        self.sstore_bytes(slots::NAME, name.as_bytes())?;
        self.sstore_bytes(slots::SYMBOL, symbol.as_bytes())?;
        self.sstore_as(slots::DECIMALS, decimals)
    }

    pub fn name(&mut self) -> Result<String> {
        self.sload_string(slots::NAME)
    }

    pub fn symbol(&mut self) -> Result<String> {
        self.sload_string(slots::SYMBOL)
    }

    pub fn decimals(&mut self) -> Result<u8> {
        self.sload_as(slots::DECIMALS)
    }

    pub fn total_supply(&mut self) -> Result<U256> {
        self.sload(slots::TOTAL_SUPPLY)
    }

    pub fn balance_of(&mut self, account: Address) -> Result<U256> {
        self.sload(mapping_slot(&account, slots::BALANCES))
    }

    pub fn allowance(&mut self, owner: Address, spender: Address) -> Result<U256> {
        self.sload(double_mapping_slot(&owner, &spender, slots::ALLOWANCES))
    }

    pub fn transfer(&mut self, sender: Address, call: IErc20::transferCall) -> Result<bool> {
        self.move_tokens(sender, call.to, call.amount)?;
        Ok(true)
    }

    pub fn approve(&mut self, sender: Address, call: IErc20::approveCall) -> Result<bool> {
        self.set_allowance(sender, call.spender, call.amount)?;
        self.emit_event(IErc20::Approval {
            owner: sender,
            spender: call.spender,
            amount: call.amount,
        })?;
        Ok(true)
    }

    /// Moves `amount` from `from` to `to` on behalf of `sender`.
    ///
    /// An allowance of `U256::MAX` is never decreased.
    pub fn transfer_from(
        &mut self,
        sender: Address,
        call: IErc20::transferFromCall,
    ) -> Result<bool> {
        let allowance = self.allowance(call.from, sender)?;
        if allowance < call.amount {
            return Err(Erc20Error::insufficient_allowance(sender, allowance, call.amount).into());
        }
        if allowance != U256::MAX {
            self.set_allowance(call.from, sender, allowance - call.amount)?;
        }

        self.move_tokens(call.from, call.to, call.amount)?;
        Ok(true)
    }

    pub fn mint(&mut self, call: IErc20::mintCall) -> Result<bool> {
        if call.to.is_zero() {
            return Err(Erc20Error::invalid_recipient().into());
        }

        let supply = self.total_supply()?;
        self.sstore(slots::TOTAL_SUPPLY, supply.saturating_add(call.amount))?;
        let balance = self.balance_of(call.to)?;
        self.set_balance(call.to, balance.saturating_add(call.amount))?;

        trace!(token = %self.address, to = %call.to, amount = %call.amount, "minted");
        self.emit_event(IErc20::Transfer {
            from: Address::ZERO,
            to: call.to,
            amount: call.amount,
        })?;
        Ok(true)
    }

    fn move_tokens(&mut self, from: Address, to: Address, amount: U256) -> Result<()> {
        if to.is_zero() {
            return Err(Erc20Error::invalid_recipient().into());
        }

        let from_balance = self.balance_of(from)?;
        if from_balance < amount {
            return Err(Erc20Error::insufficient_balance(from, from_balance, amount).into());
        }
        self.set_balance(from, from_balance - amount)?;
        let to_balance = self.balance_of(to)?;
        self.set_balance(to, to_balance + amount)?;

        self.emit_event(IErc20::Transfer { from, to, amount })
    }

    fn set_balance(&mut self, account: Address, balance: U256) -> Result<()> {
        self.sstore(mapping_slot(&account, slots::BALANCES), balance)
    }

    fn set_allowance(&mut self, owner: Address, spender: Address, amount: U256) -> Result<()> {
        self.sstore(double_mapping_slot(&owner, &spender, slots::ALLOWANCES), amount)
    }
}
