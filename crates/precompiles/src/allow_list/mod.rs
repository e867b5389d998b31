pub mod dispatch;

use alloy::primitives::{Address, FixedBytes, U256};
use bridgehub_contracts::precompiles::{AllowListError, IAllowList};
use bridgehub_primitives::AccessMode;
use tracing::debug;

use crate::{
    contract_storage,
    error::Result,
    storage::{
        StorageOps,
        slots::{mapping_slot, triple_mapping_slot},
    },
};

pub mod slots {
    use alloy::primitives::U256;

    pub const OWNER: U256 = U256::ZERO;
    /// `mapping(address target => uint8 mode)`
    pub const ACCESS_MODE: U256 = U256::from_limbs([1, 0, 0, 0]);
    /// `mapping(address caller => mapping(address target => mapping(bytes4 => bool)))`
    pub const PERMISSIONS: U256 = U256::from_limbs([2, 0, 0, 0]);
    /// `mapping(address l1Token => Deposit)`, two words per entry
    pub const DEPOSIT_LIMITS: U256 = U256::from_limbs([3, 0, 0, 0]);
}

contract_storage! {
    /// Owner-managed registry gating who may call the bridgehub entry points, and holding the
    /// per-token deposit limits.
    pub struct AllowList;
}

impl AllowList {
    pub fn initialize(&mut self, owner: Address) -> Result<()> {
        self.sstore_as(slots::OWNER, owner)
    }

    pub fn owner(&mut self) -> Result<Address> {
        self.sload_as(slots::OWNER)
    }

    fn ensure_owner(&mut self, sender: Address) -> Result<()> {
        if sender != self.owner()? {
            return Err(AllowListError::unauthorized().into());
        }
        Ok(())
    }

    pub fn access_mode(&mut self, target: Address) -> Result<AccessMode> {
        let raw: u8 = self.sload_as(mapping_slot(&target, slots::ACCESS_MODE))?;
        // Only valid modes are ever written.
        Ok(AccessMode::try_from(raw).unwrap_or_default())
    }

    pub fn set_access_mode(
        &mut self,
        sender: Address,
        call: IAllowList::setAccessModeCall,
    ) -> Result<()> {
        self.ensure_owner(sender)?;
        self.write_access_mode(call.target, call.accessMode)
    }

    pub fn set_batch_access_mode(
        &mut self,
        sender: Address,
        call: IAllowList::setBatchAccessModeCall,
    ) -> Result<()> {
        self.ensure_owner(sender)?;
        if call.targets.len() != call.accessModes.len() {
            return Err(AllowListError::length_mismatch().into());
        }

        for (target, mode) in call.targets.into_iter().zip(call.accessModes) {
            self.write_access_mode(target, mode)?;
        }
        Ok(())
    }

    fn write_access_mode(&mut self, target: Address, raw_mode: u8) -> Result<()> {
        let mode = AccessMode::try_from(raw_mode)
            .map_err(|_| AllowListError::invalid_access_mode(raw_mode))?;
        let previous = self.access_mode(target)?;
        if previous == mode {
            return Ok(());
        }

        self.sstore_as(mapping_slot(&target, slots::ACCESS_MODE), u8::from(mode))?;
        debug!(%target, ?previous, ?mode, "access mode updated");
        self.emit_event(IAllowList::UpdateAccessMode {
            target,
            previousMode: previous.into(),
            newMode: mode.into(),
        })
    }

    pub fn set_permission_to_call(
        &mut self,
        sender: Address,
        call: IAllowList::setPermissionToCallCall,
    ) -> Result<()> {
        self.ensure_owner(sender)?;
        self.write_permission(call.caller, call.target, call.functionSig, call.enable)
    }

    pub fn set_batch_permission_to_call(
        &mut self,
        sender: Address,
        call: IAllowList::setBatchPermissionToCallCall,
    ) -> Result<()> {
        self.ensure_owner(sender)?;
        let len = call.callers.len();
        if call.targets.len() != len || call.functionSigs.len() != len || call.enables.len() != len
        {
            return Err(AllowListError::length_mismatch().into());
        }

        for i in 0..len {
            self.write_permission(
                call.callers[i],
                call.targets[i],
                call.functionSigs[i],
                call.enables[i],
            )?;
        }
        Ok(())
    }

    fn write_permission(
        &mut self,
        caller: Address,
        target: Address,
        selector: FixedBytes<4>,
        enable: bool,
    ) -> Result<()> {
        let slot = triple_mapping_slot(&caller, &target, &selector, slots::PERMISSIONS);
        let current: bool = self.sload_as(slot)?;
        if current == enable {
            return Ok(());
        }

        self.sstore_as(slot, enable)?;
        self.emit_event(IAllowList::UpdateCallPermission {
            caller,
            target,
            functionSig: selector,
            status: enable,
        })
    }

    pub fn has_special_access_to_call(
        &mut self,
        call: IAllowList::hasSpecialAccessToCallCall,
    ) -> Result<bool> {
        self.sload_as(triple_mapping_slot(
            &call.caller,
            &call.target,
            &call.functionSig,
            slots::PERMISSIONS,
        ))
    }

    pub fn can_call(&mut self, call: IAllowList::canCallCall) -> Result<bool> {
        match self.access_mode(call.target)? {
            AccessMode::Public => Ok(true),
            AccessMode::Closed => Ok(false),
            AccessMode::SpecialAccessOnly => {
                self.has_special_access_to_call(IAllowList::hasSpecialAccessToCallCall {
                    caller: call.caller,
                    target: call.target,
                    functionSig: call.functionSig,
                })
            }
        }
    }

    pub fn set_deposit_limit(
        &mut self,
        sender: Address,
        call: IAllowList::setDepositLimitCall,
    ) -> Result<()> {
        self.ensure_owner(sender)?;
        let base = mapping_slot(&call.l1Token, slots::DEPOSIT_LIMITS);
        self.sstore_as(base, call.depositLimitation)?;
        self.sstore(base.wrapping_add(U256::from(1)), call.depositCap)?;

        debug!(
            token = %call.l1Token,
            enabled = call.depositLimitation,
            cap = %call.depositCap,
            "deposit limit updated"
        );
        self.emit_event(IAllowList::UpdateDepositLimit {
            l1Token: call.l1Token,
            depositLimitation: call.depositLimitation,
            depositCap: call.depositCap,
        })
    }

    pub fn get_token_deposit_limit_data(
        &mut self,
        l1_token: Address,
    ) -> Result<IAllowList::Deposit> {
        let base = mapping_slot(&l1_token, slots::DEPOSIT_LIMITS);
        Ok(IAllowList::Deposit {
            depositLimitation: self.sload_as(base)?,
            depositCap: self.sload(base.wrapping_add(U256::from(1)))?,
        })
    }
}
