use alloy::primitives::{Address, Bytes, LogData, U256};
use bridgehub_contracts::precompiles::CallRuntimeError;
use std::{cell::Cell, marker::PhantomData};

use crate::{
    error::{BridgehubPrecompileError, Result},
    storage::{Checkpoint, PrecompileStorageProvider},
};

// Thread-local storage for accessing `PrecompileStorageProvider`
thread_local! {
    static STORAGE: Cell<Option<*mut dyn PrecompileStorageProvider>> = const { Cell::new(None) };
}

/// Thread-local storage guard for the contracts.
///
/// This guard sets up thread-local access to a storage provider for the duration
/// of its lifetime. When dropped, it cleans up the thread-local storage.
///
/// # IMPORTANT
///
/// The caller must ensure that:
/// 1. Only one `StorageGuard` exists at a time, in the same thread.
/// 2. If multiple storage providers are instantiated in parallel threads,
///    they CANNOT point to the same storage.
#[derive(Default)]
pub struct StorageGuard<'s> {
    _storage: PhantomData<&'s mut dyn PrecompileStorageProvider>,
}

impl<'s> StorageGuard<'s> {
    /// Creates a new storage guard, initializing thread-local storage.
    /// See type-level documentation for important notes.
    pub fn new(storage: &'s mut dyn PrecompileStorageProvider) -> Result<Self> {
        if STORAGE.with(|s| s.get()).is_some() {
            return Err(BridgehubPrecompileError::Fatal(
                "'StorageGuard' already initialized".to_string(),
            ));
        }

        // SAFETY: Transmuting lifetime to 'static for `Cell` storage.
        //
        // This is safe because:
        // 1. Type system ensures this guard can't outlive 's
        // 2. The Drop impl clears the thread-local before the guard is destroyed
        // 3. Only one guard can exist per thread (checked above)
        let ptr: *mut dyn PrecompileStorageProvider = storage;
        let ptr_static: *mut (dyn PrecompileStorageProvider + 'static) =
            unsafe { std::mem::transmute(ptr) };

        STORAGE.with(|s| s.set(Some(ptr_static)));

        Ok(Self::default())
    }
}

impl Drop for StorageGuard<'_> {
    fn drop(&mut self) {
        STORAGE.with(|s| s.set(None));
    }
}

/// Thread-local storage accessor mirroring `PrecompileStorageProvider`.
///
/// # Important
///
/// Since it provides access to the current thread-local storage context, it MUST be used with an
/// active `StorageGuard`, usually set up through [`StorageCtx::enter`].
#[derive(Debug, Default, Clone, Copy)]
pub struct StorageCtx;

impl StorageCtx {
    /// Runs `f` with `storage` installed as the thread-local storage context.
    pub fn enter<S, F, R>(storage: &mut S, f: F) -> Result<R>
    where
        S: PrecompileStorageProvider,
        F: FnOnce() -> Result<R>,
    {
        let _guard = StorageGuard::new(storage)?;
        f()
    }

    /// Execute a function with access to the current thread-local storage provider.
    fn with_storage_call<F, R>(f: F) -> Result<R>
    where
        F: FnOnce(&mut dyn PrecompileStorageProvider) -> Result<R>,
    {
        let storage_ptr = STORAGE.with(|s| s.get()).ok_or(BridgehubPrecompileError::Fatal(
            "No storage context. 'StorageGuard' must be initialized".to_string(),
        ))?;

        // SAFETY:
        // - Caller must ensure NO recursive calls.
        // - Type system ensures the storage pointer is valid.
        let storage = unsafe { &mut *storage_ptr };
        f(storage)
    }

    pub fn chain_id(&self) -> Result<u64> {
        Self::with_storage_call(|s| Ok(s.chain_id()))
    }

    pub fn timestamp(&self) -> Result<U256> {
        Self::with_storage_call(|s| Ok(s.timestamp()))
    }

    pub fn code(&self, address: Address) -> Result<Bytes> {
        Self::with_storage_call(|s| s.code(address))
    }

    pub fn has_code(&self, address: Address) -> Result<bool> {
        self.code(address).map(|code| !code.is_empty())
    }

    pub fn set_code(&mut self, address: Address, code: Bytes) -> Result<()> {
        Self::with_storage_call(|s| s.set_code(address, code))
    }

    pub fn nonce(&self, address: Address) -> Result<u64> {
        Self::with_storage_call(|s| s.nonce(address))
    }

    pub fn set_nonce(&mut self, address: Address, nonce: u64) -> Result<()> {
        Self::with_storage_call(|s| s.set_nonce(address, nonce))
    }

    pub fn balance(&self, address: Address) -> Result<U256> {
        Self::with_storage_call(|s| s.balance(address))
    }

    pub fn set_balance(&mut self, address: Address, balance: U256) -> Result<()> {
        Self::with_storage_call(|s| s.set_balance(address, balance))
    }

    /// Moves `amount` of ETH from `from` to `to`.
    pub fn transfer(&mut self, from: Address, to: Address, amount: U256) -> Result<()> {
        if amount.is_zero() || from == to {
            return Ok(());
        }
        Self::with_storage_call(|s| {
            let available = s.balance(from)?;
            let remaining = available.checked_sub(amount).ok_or(
                CallRuntimeError::insufficient_funds(from, available, amount),
            )?;
            let credited = s
                .balance(to)?
                .checked_add(amount)
                .ok_or_else(|| BridgehubPrecompileError::Fatal("balance overflow".to_string()))?;
            s.set_balance(from, remaining)?;
            s.set_balance(to, credited)
        })
    }

    pub fn sload(&self, address: Address, key: U256) -> Result<U256> {
        Self::with_storage_call(|s| s.sload(address, key))
    }

    pub fn sstore(&mut self, address: Address, key: U256, value: U256) -> Result<()> {
        Self::with_storage_call(|s| s.sstore(address, key, value))
    }

    pub fn emit_event(&mut self, address: Address, event: LogData) -> Result<()> {
        Self::with_storage_call(|s| s.emit_event(address, event))
    }

    pub fn checkpoint(&mut self) -> Result<Checkpoint> {
        Self::with_storage_call(|s| Ok(s.checkpoint()))
    }

    pub fn checkpoint_commit(&mut self, checkpoint: Checkpoint) -> Result<()> {
        Self::with_storage_call(|s| {
            s.checkpoint_commit(checkpoint);
            Ok(())
        })
    }

    pub fn checkpoint_revert(&mut self, checkpoint: Checkpoint) -> Result<()> {
        Self::with_storage_call(|s| s.checkpoint_revert(checkpoint))
    }
}
