//! Pricing and hashing of L1 -> L2 priority requests.

use alloy_primitives::{Address, B256, Bytes, U256, b256, keccak256};
use alloy_sol_types::SolValue;
use bridgehub_contracts::precompiles::IMailbox;

/// Transaction type of an L1 -> L2 priority operation.
pub const PRIORITY_OPERATION_L2_TX_TYPE: u64 = 255;

/// The only accepted `l2GasPerPubdataByteLimit` of a priority request.
pub const REQUIRED_L2_GAS_PRICE_PER_PUBDATA: u64 = 800;

/// Floor of the L2 gas price charged to priority requests, in wei.
pub const FAIR_L2_GAS_PRICE: u64 = 500_000_000;

/// L1 gas spent on publishing one byte of pubdata.
pub const L1_GAS_PER_PUBDATA_BYTE: u64 = 17;

/// Maximum number of factory dependencies attached to one request.
pub const MAX_NEW_FACTORY_DEPS: usize = 32;

/// Seconds a priority operation may stay in the queue before it expires.
pub const PRIORITY_EXPIRATION: u64 = 0;

/// Default ceiling on the L2 gas limit of a priority request.
pub const DEFAULT_PRIORITY_TX_MAX_GAS_LIMIT: u64 = 72_000_000;

/// `keccak256("")`, the seed of the priority operations rolling hash.
pub const EMPTY_STRING_KECCAK: B256 =
    b256!("0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470");

/// L2 gas price charged for a request sent with the L1 `gas_price`.
///
/// Publishing a byte costs `L1_GAS_PER_PUBDATA_BYTE * gas_price` wei on L1 and the user pays for
/// it with `gas_per_pubdata` L2 gas, so L2 gas must cost at least their ratio (rounded up).
/// Returns `None` for a zero `gas_per_pubdata` or on overflow.
pub fn derive_l2_gas_price(gas_price: U256, gas_per_pubdata: U256) -> Option<U256> {
    if gas_per_pubdata.is_zero() {
        return None;
    }
    let pubdata_price = U256::from(L1_GAS_PER_PUBDATA_BYTE).checked_mul(gas_price)?;
    let (quotient, remainder) = pubdata_price.div_rem(gas_per_pubdata);
    let min_l2_gas_price = if remainder.is_zero() { quotient } else { quotient + U256::from(1) };
    Some(min_l2_gas_price.max(U256::from(FAIR_L2_GAS_PRICE)))
}

/// ETH a priority request must carry on top of its `l2Value`.
pub fn l2_transaction_base_cost(
    gas_price: U256,
    l2_gas_limit: U256,
    gas_per_pubdata: U256,
) -> Option<U256> {
    derive_l2_gas_price(gas_price, gas_per_pubdata)?.checked_mul(l2_gas_limit)
}

/// Inputs of an L1 -> L2 priority transaction, once validated by the mailbox.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriorityRequest {
    /// Serial id of the request in the priority queue.
    pub tx_id: U256,
    /// L2 sender, aliased when the L1 caller is a contract.
    pub sender: Address,
    pub contract_l2: Address,
    pub l2_value: U256,
    pub l2_calldata: Bytes,
    pub l2_gas_limit: U256,
    pub l2_gas_per_pubdata_byte_limit: U256,
    pub l2_gas_price: U256,
    /// ETH minted on L2, i.e. the `msg.value` of the L1 call.
    pub to_mint: U256,
    pub refund_recipient: Address,
    /// Hashes of the factory dependencies.
    pub factory_deps: Vec<B256>,
}

impl PriorityRequest {
    pub fn to_canonical_transaction(&self) -> IMailbox::L2CanonicalTransaction {
        IMailbox::L2CanonicalTransaction {
            txType: U256::from(PRIORITY_OPERATION_L2_TX_TYPE),
            from: address_to_word(self.sender),
            to: address_to_word(self.contract_l2),
            gasLimit: self.l2_gas_limit,
            gasPerPubdataByteLimit: self.l2_gas_per_pubdata_byte_limit,
            maxFeePerGas: self.l2_gas_price,
            maxPriorityFeePerGas: U256::ZERO,
            paymaster: U256::ZERO,
            nonce: self.tx_id,
            value: self.l2_value,
            reserved: [
                self.to_mint,
                address_to_word(self.refund_recipient),
                U256::ZERO,
                U256::ZERO,
            ],
            data: self.l2_calldata.clone(),
            signature: Bytes::new(),
            factoryDeps: self.factory_deps.iter().map(|hash| U256::from_be_bytes(hash.0)).collect(),
            paymasterInput: Bytes::new(),
            reservedDynamic: Bytes::new(),
        }
    }
}

/// `keccak256(abi.encode(transaction))`.
pub fn canonical_tx_hash(transaction: &IMailbox::L2CanonicalTransaction) -> B256 {
    keccak256(transaction.abi_encode())
}

/// Appends `canonical_tx_hash` to the rolling hash of processed priority operations.
pub fn roll_priority_ops_hash(rolling_hash: B256, canonical_tx_hash: B256) -> B256 {
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(rolling_hash.as_slice());
    buf[32..].copy_from_slice(canonical_tx_hash.as_slice());
    keccak256(buf)
}

/// Rolling hash of a sequence of processed priority operations.
pub fn priority_ops_hash<I>(canonical_tx_hashes: I) -> B256
where
    I: IntoIterator<Item = B256>,
{
    canonical_tx_hashes.into_iter().fold(EMPTY_STRING_KECCAK, roll_priority_ops_hash)
}

/// Left-pads an address into a `uint256`.
pub fn address_to_word(address: Address) -> U256 {
    U256::from_be_bytes(address.into_word().0)
}

/// Low 160 bits of a `uint256` as an address.
pub fn word_to_address(word: U256) -> Address {
    Address::from_word(B256::from(word.to_be_bytes::<32>()))
}
