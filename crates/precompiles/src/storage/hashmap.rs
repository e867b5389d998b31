use alloy::primitives::{Address, Bytes, Log, LogData, U256};
use std::collections::HashMap;

use crate::{
    error::{BridgehubPrecompileError, Result},
    storage::{Checkpoint, PrecompileStorageProvider},
};

/// Journaled in-memory ledger state.
///
/// Backs the tests and the `simulate` command of the CLI.
#[derive(Debug, Default)]
pub struct HashMapStorageProvider {
    chain_id: u64,
    timestamp: U256,
    storage: HashMap<(Address, U256), U256>,
    balances: HashMap<Address, U256>,
    code: HashMap<Address, Bytes>,
    nonces: HashMap<Address, u64>,
    logs: Vec<Log>,
    journal: Vec<JournalEntry>,
    depth: usize,
}

/// Previous value of an entry touched since the outermost open checkpoint.
#[derive(Debug)]
enum JournalEntry {
    Storage { address: Address, key: U256, previous: Option<U256> },
    Balance { address: Address, previous: Option<U256> },
    Code { address: Address, previous: Option<Bytes> },
    Nonce { address: Address, previous: Option<u64> },
}

impl HashMapStorageProvider {
    pub fn new(chain_id: u64) -> Self {
        Self { chain_id, ..Default::default() }
    }

    pub fn with_timestamp(mut self, timestamp: U256) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn set_timestamp(&mut self, timestamp: U256) {
        self.timestamp = timestamp;
    }

    /// All logs emitted so far, in emission order.
    pub fn logs(&self) -> &[Log] {
        &self.logs
    }

    /// Logs emitted by `address`.
    pub fn events(&self, address: Address) -> Vec<&LogData> {
        self.logs.iter().filter(|log| log.address == address).map(|log| &log.data).collect()
    }

    fn record(&mut self, entry: JournalEntry) {
        if self.depth > 0 {
            self.journal.push(entry);
        }
    }
}

impl PrecompileStorageProvider for HashMapStorageProvider {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn timestamp(&self) -> U256 {
        self.timestamp
    }

    fn code(&mut self, address: Address) -> Result<Bytes> {
        Ok(self.code.get(&address).cloned().unwrap_or_default())
    }

    fn set_code(&mut self, address: Address, code: Bytes) -> Result<()> {
        let previous = self.code.insert(address, code);
        self.record(JournalEntry::Code { address, previous });
        Ok(())
    }

    fn nonce(&mut self, address: Address) -> Result<u64> {
        Ok(self.nonces.get(&address).copied().unwrap_or_default())
    }

    fn set_nonce(&mut self, address: Address, nonce: u64) -> Result<()> {
        let previous = self.nonces.insert(address, nonce);
        self.record(JournalEntry::Nonce { address, previous });
        Ok(())
    }

    fn balance(&mut self, address: Address) -> Result<U256> {
        Ok(self.balances.get(&address).copied().unwrap_or_default())
    }

    fn set_balance(&mut self, address: Address, balance: U256) -> Result<()> {
        let previous = self.balances.insert(address, balance);
        self.record(JournalEntry::Balance { address, previous });
        Ok(())
    }

    fn sstore(&mut self, address: Address, key: U256, value: U256) -> Result<()> {
        let previous = self.storage.insert((address, key), value);
        self.record(JournalEntry::Storage { address, key, previous });
        Ok(())
    }

    fn sload(&mut self, address: Address, key: U256) -> Result<U256> {
        Ok(self.storage.get(&(address, key)).copied().unwrap_or_default())
    }

    fn emit_event(&mut self, address: Address, event: LogData) -> Result<()> {
        self.logs.push(Log { address, data: event });
        Ok(())
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.depth += 1;
        Checkpoint { journal_len: self.journal.len(), logs_len: self.logs.len() }
    }

    fn checkpoint_commit(&mut self, _checkpoint: Checkpoint) {
        self.depth = self.depth.saturating_sub(1);
        // Nothing can be reverted past the outermost checkpoint.
        if self.depth == 0 {
            self.journal.clear();
        }
    }

    fn checkpoint_revert(&mut self, checkpoint: Checkpoint) -> Result<()> {
        if checkpoint.journal_len > self.journal.len() || checkpoint.logs_len > self.logs.len() {
            return Err(BridgehubPrecompileError::Fatal(
                "checkpoint reverted out of order".to_string(),
            ));
        }

        for entry in self.journal.drain(checkpoint.journal_len..).rev() {
            match entry {
                JournalEntry::Storage { address, key, previous } => {
                    restore(&mut self.storage, (address, key), previous)
                }
                JournalEntry::Balance { address, previous } => {
                    restore(&mut self.balances, address, previous)
                }
                JournalEntry::Code { address, previous } => {
                    restore(&mut self.code, address, previous)
                }
                JournalEntry::Nonce { address, previous } => {
                    restore(&mut self.nonces, address, previous)
                }
            }
        }
        self.logs.truncate(checkpoint.logs_len);
        self.depth = self.depth.saturating_sub(1);
        Ok(())
    }
}

fn restore<K, V>(map: &mut HashMap<K, V>, key: K, previous: Option<V>)
where
    K: std::hash::Hash + Eq,
{
    match previous {
        Some(value) => map.insert(key, value),
        None => map.remove(&key),
    };
}
