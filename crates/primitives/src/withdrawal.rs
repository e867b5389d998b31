//! Decoding of the L2 -> L1 withdrawal messages.
//!
//! Both message kinds are tightly packed and headed by the selector of the L1 function that
//! finalizes them:
//!
//! - ETH: `finalizeEthWithdrawal selector (4) || l1Receiver (20) || amount (32)`
//! - ERC20: `finalizeWithdrawal selector (4) || l1Receiver (20) || l1Token (20) || amount (32)`

use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;
use bridgehub_contracts::precompiles::{IL1Bridge, IMailbox};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WithdrawalMessageError {
    #[error("withdrawal message has length {actual}, expected {expected}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("unexpected withdrawal message selector {0:?}")]
    UnknownSelector([u8; 4]),
}

/// ETH withdrawal sent by the L2 base token contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EthWithdrawal {
    pub l1_receiver: Address,
    pub amount: U256,
}

impl EthWithdrawal {
    pub const SELECTOR: [u8; 4] = IMailbox::finalizeEthWithdrawalCall::SELECTOR;
    pub const MESSAGE_LEN: usize = 4 + 20 + 32;

    pub fn decode(message: &[u8]) -> Result<Self, WithdrawalMessageError> {
        let mut reader = PackedReader::new(message, Self::MESSAGE_LEN, Self::SELECTOR)?;
        Ok(Self { l1_receiver: reader.address(), amount: reader.uint256() })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::MESSAGE_LEN);
        out.extend_from_slice(&Self::SELECTOR);
        out.extend_from_slice(self.l1_receiver.as_slice());
        out.extend_from_slice(&self.amount.to_be_bytes::<32>());
        out
    }
}

/// ERC20 withdrawal sent by the L2 bridge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Erc20Withdrawal {
    pub l1_receiver: Address,
    pub l1_token: Address,
    pub amount: U256,
}

impl Erc20Withdrawal {
    pub const SELECTOR: [u8; 4] = IL1Bridge::finalizeWithdrawalCall::SELECTOR;
    pub const MESSAGE_LEN: usize = 4 + 20 + 20 + 32;

    pub fn decode(message: &[u8]) -> Result<Self, WithdrawalMessageError> {
        let mut reader = PackedReader::new(message, Self::MESSAGE_LEN, Self::SELECTOR)?;
        Ok(Self {
            l1_receiver: reader.address(),
            l1_token: reader.address(),
            amount: reader.uint256(),
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::MESSAGE_LEN);
        out.extend_from_slice(&Self::SELECTOR);
        out.extend_from_slice(self.l1_receiver.as_slice());
        out.extend_from_slice(self.l1_token.as_slice());
        out.extend_from_slice(&self.amount.to_be_bytes::<32>());
        out
    }
}

/// Cursor over a packed message whose length and selector were checked upfront.
struct PackedReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> PackedReader<'a> {
    fn new(
        data: &'a [u8],
        expected_len: usize,
        selector: [u8; 4],
    ) -> Result<Self, WithdrawalMessageError> {
        if data.len() != expected_len {
            return Err(WithdrawalMessageError::InvalidLength {
                expected: expected_len,
                actual: data.len(),
            });
        }
        let mut actual = [0u8; 4];
        actual.copy_from_slice(&data[..4]);
        if actual != selector {
            return Err(WithdrawalMessageError::UnknownSelector(actual));
        }
        Ok(Self { data, offset: 4 })
    }

    fn address(&mut self) -> Address {
        let address = Address::from_slice(&self.data[self.offset..self.offset + 20]);
        self.offset += 20;
        address
    }

    fn uint256(&mut self) -> U256 {
        let value = U256::from_be_slice(&self.data[self.offset..self.offset + 32]);
        self.offset += 32;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, hex};
    use test_case::test_case;

    #[test]
    fn test_decode_eth_withdrawal() {
        let message = hex!(
            "0fdef251d8dA6BF26964aF9D7eEd9e03E53415D37aA96045"
            "0000000000000000000000000000000000000000000000000000000000000001"
        );

        let withdrawal = EthWithdrawal::decode(&message).unwrap();
        assert_eq!(
            withdrawal,
            EthWithdrawal {
                l1_receiver: address!("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045"),
                amount: U256::from(1),
            }
        );
        assert_eq!(withdrawal.encode(), message.to_vec());
    }

    #[test]
    fn test_decode_erc20_withdrawal() {
        let withdrawal = Erc20Withdrawal {
            l1_receiver: Address::repeat_byte(0x11),
            l1_token: Address::repeat_byte(0x22),
            amount: U256::from(800),
        };
        let message = withdrawal.encode();

        assert_eq!(message.len(), Erc20Withdrawal::MESSAGE_LEN);
        assert_eq!(&message[..4], &hex!("c87325f1"));
        assert_eq!(Erc20Withdrawal::decode(&message), Ok(withdrawal));
    }

    #[test_case(&[]; "empty")]
    #[test_case(&[0x0f, 0xde, 0xf2, 0x51]; "selector only")]
    #[test_case(&[0u8; 57]; "one byte too long")]
    fn test_eth_withdrawal_invalid_length(message: &[u8]) {
        assert!(matches!(
            EthWithdrawal::decode(message),
            Err(WithdrawalMessageError::InvalidLength { expected: 56, .. })
        ));
    }

    #[test]
    fn test_erc20_withdrawal_wrong_selector() {
        let mut message = [0xab; Erc20Withdrawal::MESSAGE_LEN];
        message[..4].copy_from_slice(&[1, 2, 3, 4]);
        assert_eq!(
            Erc20Withdrawal::decode(&message),
            Err(WithdrawalMessageError::UnknownSelector([1, 2, 3, 4]))
        );
    }

    #[test]
    fn test_messages_are_not_interchangeable() {
        let eth = EthWithdrawal { l1_receiver: Address::repeat_byte(1), amount: U256::from(5) };
        assert!(Erc20Withdrawal::decode(&eth.encode()).is_err());
    }
}
