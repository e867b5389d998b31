//! L2 -> L1 logs and their leaf hashes in the batch logs tree.

use alloy_primitives::{Address, B256, keccak256};
use bridgehub_contracts::precompiles::{
    IMailbox, L2_BOOTLOADER_ADDRESS, L2_TO_L1_MESSENGER_ADDRESS,
};

/// Status of an L1 -> L2 transaction, as reported by the bootloader.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TxStatus {
    Failure = 0,
    Success = 1,
}

impl TryFrom<u8> for TxStatus {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Failure),
            1 => Ok(Self::Success),
            other => Err(other),
        }
    }
}

/// Log committed to L1 in the logs tree of an L2 batch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct L2ToL1Log {
    pub l2_shard_id: u8,
    pub is_service: bool,
    pub tx_number_in_batch: u16,
    pub sender: Address,
    pub key: B256,
    pub value: B256,
}

impl L2ToL1Log {
    /// Length of the packed encoding hashed into a tree leaf.
    pub const PACKED_LEN: usize = 1 + 1 + 2 + 20 + 32 + 32;

    /// Log emitted by the L2->L1 messenger for a message `data` sent by `sender`.
    pub fn from_message(tx_number_in_batch: u16, sender: Address, data: &[u8]) -> Self {
        Self {
            l2_shard_id: 0,
            is_service: true,
            tx_number_in_batch,
            sender: L2_TO_L1_MESSENGER_ADDRESS,
            key: sender.into_word(),
            value: keccak256(data),
        }
    }

    /// Log emitted by the bootloader once it processed the L1->L2 transaction `l2_tx_hash`.
    pub fn transaction_status(tx_number_in_batch: u16, l2_tx_hash: B256, status: TxStatus) -> Self {
        Self {
            l2_shard_id: 0,
            is_service: true,
            tx_number_in_batch,
            sender: L2_BOOTLOADER_ADDRESS,
            key: l2_tx_hash,
            value: B256::with_last_byte(status as u8),
        }
    }

    /// Tightly packed encoding: `u8 || bool || u16 || address || bytes32 || bytes32`.
    pub fn packed(&self) -> [u8; Self::PACKED_LEN] {
        let mut out = [0u8; Self::PACKED_LEN];
        out[0] = self.l2_shard_id;
        out[1] = self.is_service as u8;
        out[2..4].copy_from_slice(&self.tx_number_in_batch.to_be_bytes());
        out[4..24].copy_from_slice(self.sender.as_slice());
        out[24..56].copy_from_slice(self.key.as_slice());
        out[56..88].copy_from_slice(self.value.as_slice());
        out
    }

    /// Leaf hash of the log in the batch logs tree.
    pub fn hash(&self) -> B256 {
        keccak256(self.packed())
    }
}

impl From<IMailbox::L2Log> for L2ToL1Log {
    fn from(log: IMailbox::L2Log) -> Self {
        Self {
            l2_shard_id: log.l2ShardId,
            is_service: log.isService,
            tx_number_in_batch: log.txNumberInBatch,
            sender: log.sender,
            key: log.key,
            value: log.value,
        }
    }
}

impl From<L2ToL1Log> for IMailbox::L2Log {
    fn from(log: L2ToL1Log) -> Self {
        Self {
            l2ShardId: log.l2_shard_id,
            isService: log.is_service,
            txNumberInBatch: log.tx_number_in_batch,
            sender: log.sender,
            key: log.key,
            value: log.value,
        }
    }
}

impl From<&IMailbox::L2Message> for L2ToL1Log {
    fn from(message: &IMailbox::L2Message) -> Self {
        Self::from_message(message.txNumberInBatch, message.sender, &message.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{b256, hex};
    use bridgehub_contracts::precompiles::L2_ETH_TOKEN_SYSTEM_CONTRACT_ADDRESS;

    #[test]
    fn test_message_log_hash() {
        let message = hex!(
            "0fdef251d8dA6BF26964aF9D7eEd9e03E53415D37aA96045"
            "0000000000000000000000000000000000000000000000000000000000000001"
        );
        let log = L2ToL1Log::from_message(0, L2_ETH_TOKEN_SYSTEM_CONTRACT_ADDRESS, &message);

        assert_eq!(log.sender, L2_TO_L1_MESSENGER_ADDRESS);
        assert_eq!(log.key, L2_ETH_TOKEN_SYSTEM_CONTRACT_ADDRESS.into_word());
        assert_eq!(
            log.hash(),
            b256!("0xb969504ee77f4e8be5e76cd37ffc466362a69d3782dcf18d642664484845fdf9")
        );
    }

    #[test]
    fn test_default_log_is_the_padding_leaf() {
        assert_eq!(
            L2ToL1Log::default().hash(),
            b256!("0x72abee45b59e344af8a6e520241c4744aff26ed411f4c4b00f8af09adada43ba")
        );
    }

    #[test]
    fn test_packed_layout() {
        let log = L2ToL1Log {
            l2_shard_id: 7,
            is_service: true,
            tx_number_in_batch: 0x0102,
            sender: Address::repeat_byte(0xaa),
            key: B256::repeat_byte(0xbb),
            value: B256::repeat_byte(0xcc),
        };
        let packed = log.packed();

        assert_eq!(&packed[..4], &[7, 1, 0x01, 0x02]);
        assert_eq!(&packed[4..24], &[0xaa; 20]);
        assert_eq!(&packed[24..56], &[0xbb; 32]);
        assert_eq!(&packed[56..], &[0xcc; 32]);
    }

    #[test]
    fn test_transaction_status_log() {
        let tx_hash = B256::repeat_byte(0x11);
        let log = L2ToL1Log::transaction_status(3, tx_hash, TxStatus::Success);

        assert_eq!(log.sender, L2_BOOTLOADER_ADDRESS);
        assert_eq!(log.key, tx_hash);
        assert_eq!(log.value, B256::with_last_byte(1));
        assert_eq!(
            L2ToL1Log::transaction_status(3, tx_hash, TxStatus::Failure).value,
            B256::ZERO
        );
    }

    #[test]
    fn test_abi_conversion() {
        let log = L2ToL1Log::from_message(1, Address::repeat_byte(1), b"hello");
        let abi: IMailbox::L2Log = log.clone().into();
        assert_eq!(L2ToL1Log::from(abi), log);
    }
}
