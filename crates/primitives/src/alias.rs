//! L1 -> L2 address aliasing.
//!
//! A contract on L1 and a contract on L2 may share an address without being controlled by the
//! same party. Priority requests sent by L1 contracts therefore appear on L2 from the aliased
//! address `(address + L1_TO_L2_ALIAS_OFFSET) mod 2^160`.

use alloy_primitives::{Address, U160, address};

/// Offset added to the address of an L1 contract to obtain its L2 alias.
pub const L1_TO_L2_ALIAS_OFFSET: Address = address!("0x1111000000000000000000000000000000001111");

fn to_uint(address: Address) -> U160 {
    U160::from_be_bytes(address.0.0)
}

fn from_uint(value: U160) -> Address {
    Address::from(value.to_be_bytes::<20>())
}

/// Maps an L1 address to its aliased L2 address, wrapping around at `2^160`.
pub fn apply_l1_to_l2_alias(l1_address: Address) -> Address {
    from_uint(to_uint(l1_address).wrapping_add(to_uint(L1_TO_L2_ALIAS_OFFSET)))
}

/// Inverse of [`apply_l1_to_l2_alias`].
pub fn undo_l1_to_l2_alias(l2_address: Address) -> Address {
    from_uint(to_uint(l2_address).wrapping_sub(to_uint(L1_TO_L2_ALIAS_OFFSET)))
}

/// Sender of a priority request as seen on L2.
///
/// Externally owned callers (`msg.sender == tx.origin`) keep their address. Every other caller is
/// a contract, including one still running its constructor, and is aliased.
pub fn l2_sender(msg_sender: Address, tx_origin: Address) -> Address {
    if msg_sender == tx_origin { msg_sender } else { apply_l1_to_l2_alias(msg_sender) }
}

/// Receiver of the unspent L2 gas of a priority request.
///
/// A zero `requested` recipient falls back to the (already aliased) L2 sender. Otherwise the
/// recipient is aliased iff it has code on L1.
pub fn refund_recipient(
    requested: Address,
    requested_has_code: bool,
    l2_sender: Address,
) -> Address {
    if requested.is_zero() {
        l2_sender
    } else if requested_has_code {
        apply_l1_to_l2_alias(requested)
    } else {
        requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case(
        address!("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045"),
        address!("0xe9eb6bf26964af9d7eed9e03e53415d37aa97156");
        "regular address"
    )]
    #[test_case(Address::ZERO, L1_TO_L2_ALIAS_OFFSET; "zero address")]
    #[test_case(
        address!("0xffffffffffffffffffffffffffffffffffffffff"),
        address!("0x1111000000000000000000000000000000001110");
        "wraps around"
    )]
    #[test_case(
        address!("0xeeef000000000000000000000000000000000000"),
        address!("0x0000000000000000000000000000000000001111");
        "carries out of the top byte"
    )]
    fn test_apply_alias(l1: Address, expected: Address) {
        assert_eq!(apply_l1_to_l2_alias(l1), expected);
        assert_eq!(undo_l1_to_l2_alias(expected), l1);
    }

    #[test]
    fn test_undo_alias_of_zero_wraps() {
        assert_eq!(
            undo_l1_to_l2_alias(Address::ZERO),
            address!("0xeeeeffffffffffffffffffffffffffffffffeeef")
        );
    }

    #[test]
    fn test_l2_sender() {
        let eoa = Address::random();
        let contract = Address::random();

        assert_eq!(l2_sender(eoa, eoa), eoa);
        assert_eq!(l2_sender(contract, eoa), apply_l1_to_l2_alias(contract));
    }

    #[test]
    fn test_refund_recipient() {
        let sender = Address::random();
        let recipient = Address::random();

        assert_eq!(refund_recipient(Address::ZERO, false, sender), sender);
        assert_eq!(refund_recipient(Address::ZERO, true, sender), sender);
        assert_eq!(refund_recipient(recipient, false, sender), recipient);
        assert_eq!(refund_recipient(recipient, true, sender), apply_l1_to_l2_alias(recipient));
    }

    proptest! {
        #[test]
        fn alias_round_trips(bytes in any::<[u8; 20]>()) {
            let address = Address::from(bytes);
            prop_assert_eq!(undo_l1_to_l2_alias(apply_l1_to_l2_alias(address)), address);
            prop_assert_eq!(apply_l1_to_l2_alias(undo_l1_to_l2_alias(address)), address);
        }

        #[test]
        fn alias_is_modular_addition(bytes in any::<[u8; 20]>()) {
            let as_word = |a: Address| U256::from_be_slice(a.as_slice());
            let address = Address::from(bytes);
            let modulus = U256::from(1) << 160;
            let expected = (as_word(address) + as_word(L1_TO_L2_ALIAS_OFFSET)) % modulus;
            prop_assert_eq!(as_word(apply_l1_to_l2_alias(address)), expected);
        }
    }
}
