//! Per-depositor deposit ceilings.
//!
//! The cap of each token lives in the allow list. The contract taking the deposit keeps the
//! cumulative amount each depositor sent so far. Tokens without a limitation are not tracked.

use alloy::primitives::{Address, U256};
use tracing::debug;

use crate::{
    allow_list::AllowList,
    error::Result,
    storage::{StorageOps, slots::double_mapping_slot},
};

/// Outcome of [`DepositLimit::record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepositCheck {
    /// The token has no limitation.
    Unlimited,
    /// The deposit was counted; `total` is the depositor's new cumulative amount.
    Accepted { total: U256 },
    /// The deposit would take the depositor past `cap`. Nothing was counted.
    Exceeded { total: U256, cap: U256 },
}

impl DepositCheck {
    pub fn is_exceeded(&self) -> bool {
        matches!(self, Self::Exceeded { .. })
    }
}

/// Cumulative deposits stored as `mapping(token => mapping(depositor => uint256))` at `slot`.
#[derive(Debug, Clone, Copy)]
pub struct DepositLimit {
    allow_list: Address,
    slot: U256,
}

impl DepositLimit {
    pub fn new(allow_list: Address, slot: U256) -> Self {
        Self { allow_list, slot }
    }

    pub fn total_deposited<S: StorageOps>(
        &self,
        storage: &mut S,
        token: Address,
        depositor: Address,
    ) -> Result<U256> {
        storage.sload(double_mapping_slot(&token, &depositor, self.slot))
    }

    /// Checks whether `amount` fits under the depositor's cap without counting it.
    ///
    /// The cap is inclusive: a deposit reaching it exactly is accepted. Pass an accepted result
    /// to [`DepositLimit::commit`] once the deposit can no longer fail.
    pub fn check<S: StorageOps>(
        &self,
        storage: &mut S,
        token: Address,
        depositor: Address,
        amount: U256,
    ) -> Result<DepositCheck> {
        let limit = AllowList::at(self.allow_list).get_token_deposit_limit_data(token)?;
        if !limit.depositLimitation {
            return Ok(DepositCheck::Unlimited);
        }

        let total = self.total_deposited(storage, token, depositor)?;
        match total.checked_add(amount) {
            Some(new_total) if new_total <= limit.depositCap => {
                Ok(DepositCheck::Accepted { total: new_total })
            }
            _ => {
                debug!(
                    %token,
                    %depositor,
                    %total,
                    %amount,
                    cap = %limit.depositCap,
                    "deposit limit exceeded"
                );
                Ok(DepositCheck::Exceeded { total, cap: limit.depositCap })
            }
        }
    }

    /// Stores the new total of an accepted check. Other outcomes leave storage untouched.
    pub fn commit<S: StorageOps>(
        &self,
        storage: &mut S,
        token: Address,
        depositor: Address,
        check: DepositCheck,
    ) -> Result<()> {
        match check {
            DepositCheck::Accepted { total } => {
                storage.sstore(double_mapping_slot(&token, &depositor, self.slot), total)
            }
            DepositCheck::Unlimited | DepositCheck::Exceeded { .. } => Ok(()),
        }
    }

    /// Counts `amount` towards the depositor's total if the cap allows it.
    pub fn record<S: StorageOps>(
        &self,
        storage: &mut S,
        token: Address,
        depositor: Address,
        amount: U256,
    ) -> Result<DepositCheck> {
        let check = self.check(storage, token, depositor, amount)?;
        self.commit(storage, token, depositor, check)?;
        Ok(check)
    }

    /// Removes `amount` from the depositor's total, e.g. when a failed deposit is claimed back.
    pub fn release<S: StorageOps>(
        &self,
        storage: &mut S,
        token: Address,
        depositor: Address,
        amount: U256,
    ) -> Result<()> {
        let limit = AllowList::at(self.allow_list).get_token_deposit_limit_data(token)?;
        if !limit.depositLimitation {
            return Ok(());
        }

        let slot = double_mapping_slot(&token, &depositor, self.slot);
        let total = storage.sload(slot)?;
        storage.sstore(slot, total.saturating_sub(amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        mailbox::Mailbox,
        storage::{StorageCtx, hashmap::HashMapStorageProvider},
    };
    use bridgehub_contracts::precompiles::IAllowList;
    use proptest::prelude::*;

    const CAP: u64 = 10;

    fn setup(owner: Address, token: Address, enabled: bool) -> Result<DepositLimit> {
        let allow_list = Address::random();
        let mut list = AllowList::at(allow_list);
        list.initialize(owner)?;
        list.set_deposit_limit(
            owner,
            IAllowList::setDepositLimitCall {
                l1Token: token,
                depositLimitation: enabled,
                depositCap: U256::from(CAP),
            },
        )?;
        Ok(DepositLimit::new(allow_list, U256::from(42)))
    }

    #[test]
    fn test_cap_is_inclusive() -> eyre::Result<()> {
        let mut storage = HashMapStorageProvider::new(1);
        let (owner, token, depositor) = (Address::random(), Address::random(), Address::random());
        StorageCtx::enter(&mut storage, || {
            let limit = setup(owner, token, true)?;
            let mut contract = Mailbox::at(Address::random());

            let check = limit.record(&mut contract, token, depositor, U256::from(CAP + 2))?;
            assert_eq!(check, DepositCheck::Exceeded { total: U256::ZERO, cap: U256::from(CAP) });

            let check = limit.record(&mut contract, token, depositor, U256::from(CAP))?;
            assert_eq!(check, DepositCheck::Accepted { total: U256::from(CAP) });

            let check = limit.record(&mut contract, token, depositor, U256::from(1))?;
            assert!(check.is_exceeded());
            assert_eq!(limit.total_deposited(&mut contract, token, depositor)?, U256::from(CAP));
            Ok(())
        })?;
        Ok(())
    }

    #[test]
    fn test_depositors_are_independent() -> eyre::Result<()> {
        let mut storage = HashMapStorageProvider::new(1);
        let (owner, token) = (Address::random(), Address::random());
        let (alice, bob) = (Address::random(), Address::random());
        StorageCtx::enter(&mut storage, || {
            let limit = setup(owner, token, true)?;
            let mut contract = Mailbox::at(Address::random());

            assert!(!limit.record(&mut contract, token, alice, U256::from(CAP))?.is_exceeded());
            assert!(!limit.record(&mut contract, token, bob, U256::from(CAP))?.is_exceeded());
            Ok(())
        })?;
        Ok(())
    }

    #[test]
    fn test_unlimited_token_is_not_tracked() -> eyre::Result<()> {
        let mut storage = HashMapStorageProvider::new(1);
        let (owner, token, depositor) = (Address::random(), Address::random(), Address::random());
        StorageCtx::enter(&mut storage, || {
            let limit = setup(owner, token, false)?;
            let mut contract = Mailbox::at(Address::random());

            let check = limit.record(&mut contract, token, depositor, U256::MAX)?;
            assert_eq!(check, DepositCheck::Unlimited);
            assert_eq!(limit.total_deposited(&mut contract, token, depositor)?, U256::ZERO);
            Ok(())
        })?;
        Ok(())
    }

    #[test]
    fn test_check_does_not_count() -> eyre::Result<()> {
        let mut storage = HashMapStorageProvider::new(1);
        let (owner, token, depositor) = (Address::random(), Address::random(), Address::random());
        StorageCtx::enter(&mut storage, || {
            let limit = setup(owner, token, true)?;
            let mut contract = Mailbox::at(Address::random());

            let check = limit.check(&mut contract, token, depositor, U256::from(CAP))?;
            assert_eq!(check, DepositCheck::Accepted { total: U256::from(CAP) });
            assert_eq!(limit.total_deposited(&mut contract, token, depositor)?, U256::ZERO);

            limit.commit(&mut contract, token, depositor, check)?;
            assert_eq!(limit.total_deposited(&mut contract, token, depositor)?, U256::from(CAP));
            Ok(())
        })?;
        Ok(())
    }

    #[test]
    fn test_release_frees_room() -> eyre::Result<()> {
        let mut storage = HashMapStorageProvider::new(1);
        let (owner, token, depositor) = (Address::random(), Address::random(), Address::random());
        StorageCtx::enter(&mut storage, || {
            let limit = setup(owner, token, true)?;
            let mut contract = Mailbox::at(Address::random());

            limit.record(&mut contract, token, depositor, U256::from(CAP))?;
            limit.release(&mut contract, token, depositor, U256::from(4))?;
            let check = limit.record(&mut contract, token, depositor, U256::from(4))?;
            assert_eq!(check, DepositCheck::Accepted { total: U256::from(CAP) });
            Ok(())
        })?;
        Ok(())
    }

    proptest! {
        #[test]
        fn proptest_total_never_exceeds_cap(amounts in prop::collection::vec(0u64..6, 1..20)) {
            let mut storage = HashMapStorageProvider::new(1);
            let (owner, token) = (Address::random(), Address::random());
            let depositor = Address::random();
            let accepted = StorageCtx::enter(&mut storage, || {
                let limit = setup(owner, token, true)?;
                let mut contract = Mailbox::at(Address::random());

                let mut accepted = 0u64;
                for amount in &amounts {
                    let check = limit.record(&mut contract, token, depositor, U256::from(*amount))?;
                    if !check.is_exceeded() {
                        accepted += amount;
                    }
                }
                let total = limit.total_deposited(&mut contract, token, depositor)?;
                assert_eq!(total, U256::from(accepted));
                Ok(accepted)
            }).unwrap();
            prop_assert!(accepted <= CAP);
        }
    }
}
