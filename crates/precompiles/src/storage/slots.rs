//! Storage slot derivation for mappings, following the Solidity layout rules.

use alloy::primitives::{U256, keccak256};

use super::StorageKey;

/// Slot of `mapping[key]` for a mapping declared at slot `base`: `keccak256(key . base)`.
pub fn mapping_slot<K: StorageKey>(key: &K, base: U256) -> U256 {
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(key.to_key_word().as_slice());
    buf[32..].copy_from_slice(&base.to_be_bytes::<32>());
    U256::from_be_bytes(keccak256(buf).0)
}

/// First slot of the data of a dynamic array or `bytes` declared at `base`: `keccak256(base)`.
pub fn data_slot(base: U256) -> U256 {
    U256::from_be_bytes(keccak256(base.to_be_bytes::<32>()).0)
}

/// Slot of `mapping[key1][key2]`.
pub fn double_mapping_slot<K1: StorageKey, K2: StorageKey>(
    key1: &K1,
    key2: &K2,
    base: U256,
) -> U256 {
    mapping_slot(key2, mapping_slot(key1, base))
}

/// Slot of `mapping[key1][key2][key3]`.
pub fn triple_mapping_slot<K1, K2, K3>(key1: &K1, key2: &K2, key3: &K3, base: U256) -> U256
where
    K1: StorageKey,
    K2: StorageKey,
    K3: StorageKey,
{
    mapping_slot(key3, double_mapping_slot(key1, key2, base))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Address, B256, hex};

    #[test]
    fn test_mapping_slot_matches_solidity() {
        // keccak256(abi.encode(address(0x01), uint256(0)))
        let slot = mapping_slot(&Address::with_last_byte(1), U256::ZERO);
        assert_eq!(
            slot.to_be_bytes::<32>(),
            hex!("ada5013122d395ba3c54772283fb069b10426056ef8ca54750cb9bb552a59e7d")
        );
    }

    #[test]
    fn test_nested_slots_are_distinct() {
        let a = U256::from(1);
        let b = B256::repeat_byte(2);
        assert_ne!(
            double_mapping_slot(&a, &b, U256::ZERO),
            double_mapping_slot(&b, &a, U256::ZERO)
        );
        assert_ne!(
            triple_mapping_slot(&a, &a, &1u16, U256::ZERO),
            triple_mapping_slot(&a, &a, &2u16, U256::ZERO)
        );
    }
}
