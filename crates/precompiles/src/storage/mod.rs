pub mod hashmap;
pub mod slots;
pub mod thread_local;

pub mod types;
pub use thread_local::{StorageCtx, StorageGuard};
pub use types::*;

use alloy::primitives::{Address, Bytes, IntoLogData, LogData, U256};

use crate::error::Result;

/// Opaque position in the journal of a [`PrecompileStorageProvider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    pub(crate) journal_len: usize,
    pub(crate) logs_len: usize,
}

/// Low-level state provider of the ledger the contracts run on.
///
/// Every mutation made after a [`checkpoint`](Self::checkpoint) can be rolled back with
/// [`checkpoint_revert`](Self::checkpoint_revert). Checkpoints nest.
pub trait PrecompileStorageProvider {
    fn chain_id(&self) -> u64;
    fn timestamp(&self) -> U256;
    fn code(&mut self, address: Address) -> Result<Bytes>;
    fn set_code(&mut self, address: Address, code: Bytes) -> Result<()>;
    fn nonce(&mut self, address: Address) -> Result<u64>;
    fn set_nonce(&mut self, address: Address, nonce: u64) -> Result<()>;
    fn balance(&mut self, address: Address) -> Result<U256>;
    fn set_balance(&mut self, address: Address, balance: U256) -> Result<()>;
    fn sstore(&mut self, address: Address, key: U256, value: U256) -> Result<()>;
    fn sload(&mut self, address: Address, key: U256) -> Result<U256>;
    fn emit_event(&mut self, address: Address, event: LogData) -> Result<()>;
    fn checkpoint(&mut self) -> Checkpoint;
    fn checkpoint_commit(&mut self, checkpoint: Checkpoint);
    fn checkpoint_revert(&mut self, checkpoint: Checkpoint) -> Result<()>;
}

/// Storage operations for a given (contract) address.
pub trait StorageOps {
    fn sstore(&mut self, slot: U256, value: U256) -> Result<()>;
    fn sload(&mut self, slot: U256) -> Result<U256>;
    fn emit_log(&mut self, log: LogData) -> Result<()>;

    fn sload_as<T: StorableValue>(&mut self, slot: U256) -> Result<T> {
        self.sload(slot).map(T::from_word)
    }

    fn sstore_as<T: StorableValue>(&mut self, slot: U256, value: T) -> Result<()> {
        self.sstore(slot, value.to_word())
    }

    fn emit_event<E: IntoLogData>(&mut self, event: E) -> Result<()> {
        self.emit_log(event.into_log_data())
    }

    /// Stores `value` as a dynamic `bytes`/`string`: the length at `slot`, the data from
    /// `keccak256(slot)` on.
    fn sstore_bytes(&mut self, slot: U256, value: &[u8]) -> Result<()> {
        self.sstore(slot, U256::from(value.len()))?;
        let data = slots::data_slot(slot);
        for (i, chunk) in value.chunks(32).enumerate() {
            let mut word = [0u8; 32];
            word[..chunk.len()].copy_from_slice(chunk);
            self.sstore(data.wrapping_add(U256::from(i)), U256::from_be_bytes(word))?;
        }
        Ok(())
    }

    fn sload_bytes(&mut self, slot: U256) -> Result<Vec<u8>> {
        let len = self.sload(slot)?.saturating_to::<usize>();
        let data = slots::data_slot(slot);
        let mut out = Vec::with_capacity(len.next_multiple_of(32));
        for i in 0..len.div_ceil(32) {
            let word = self.sload(data.wrapping_add(U256::from(i)))?;
            out.extend_from_slice(&word.to_be_bytes::<32>());
        }
        out.truncate(len);
        Ok(out)
    }

    fn sload_string(&mut self, slot: U256) -> Result<String> {
        Ok(String::from_utf8_lossy(&self.sload_bytes(slot)?).into_owned())
    }
}

/// Trait providing access to a contract's address and storage context.
///
/// Abstracts the common pattern of contracts needing both an address and the thread-local
/// storage. Implemented with the [`contract_storage!`](crate::contract_storage) macro.
pub trait ContractStorage {
    fn address(&self) -> Address;
    fn storage(&mut self) -> &mut StorageCtx;
}

/// Blanket implementation of `StorageOps` for all types that implement `ContractStorage`.
impl<T> StorageOps for T
where
    T: ContractStorage,
{
    fn sstore(&mut self, slot: U256, value: U256) -> Result<()> {
        let address = self.address();
        self.storage().sstore(address, slot, value)
    }

    fn sload(&mut self, slot: U256) -> Result<U256> {
        let address = self.address();
        self.storage().sload(address, slot)
    }

    fn emit_log(&mut self, log: LogData) -> Result<()> {
        let address = self.address();
        self.storage().emit_event(address, log)
    }
}

/// Declares a contract handle bound to an address, with its [`ContractStorage`] impl.
#[macro_export]
macro_rules! contract_storage {
    ($(#[$meta:meta])* $vis:vis struct $name:ident;) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        $vis struct $name {
            address: ::alloy::primitives::Address,
            storage: $crate::storage::StorageCtx,
        }

        impl $name {
            /// Handle on the contract deployed at `address`.
            pub fn at(address: ::alloy::primitives::Address) -> Self {
                Self { address, storage: $crate::storage::StorageCtx }
            }
        }

        impl $crate::storage::ContractStorage for $name {
            fn address(&self) -> ::alloy::primitives::Address {
                self.address
            }

            fn storage(&mut self) -> &mut $crate::storage::StorageCtx {
                &mut self.storage
            }
        }
    };
}
