pub use IL1Bridge::{IL1BridgeErrors as L1BridgeError, IL1BridgeEvents as L1BridgeEvent};

use alloy_primitives::U256;

crate::sol! {
    /// L1 side of the ERC20 bridge.
    ///
    /// Deposits lock tokens on L1 and ask the mailbox to run `finalizeDeposit` on the paired L2
    /// bridge. Withdrawals are proven against the L2 logs root and release the locked tokens.
    #[derive(Debug, PartialEq, Eq)]
    interface IL1Bridge {
        /// Lock `amount` of `l1Token` and mint it to `l2Receiver` on L2
        ///
        /// `msg.value` pays for the L2 transaction; see `IMailbox.l2TransactionBaseCost`.
        ///
        /// @param refundRecipient Receiver of the unspent L2 gas; zero means the sender
        /// @return l2TxHash Canonical hash of the queued L2 transaction
        function deposit(
            uint256 chainId,
            address l2Receiver,
            address l1Token,
            uint256 amount,
            uint256 l2TxGasLimit,
            uint256 l2TxGasPerPubdataByte,
            address refundRecipient
        ) external payable returns (bytes32 l2TxHash);

        /// Finalize a withdrawal initiated on L2 and release the tokens on L1
        function finalizeWithdrawal(
            uint256 chainId,
            uint256 l2BatchNumber,
            uint256 l2MessageIndex,
            uint16 l2TxNumberInBatch,
            bytes calldata message,
            bytes32[] calldata merkleProof
        ) external;

        /// Return the tokens of a deposit whose L2 transaction failed
        function claimFailedDeposit(
            uint256 chainId,
            address depositSender,
            address l1Token,
            bytes32 l2TxHash,
            uint256 l2BatchNumber,
            uint256 l2MessageIndex,
            uint16 l2TxNumberInBatch,
            bytes32[] calldata merkleProof
        ) external;

        function isWithdrawalFinalized(
            uint256 chainId,
            uint256 l2BatchNumber,
            uint256 l2MessageIndex,
            uint16 l2TxNumberInBatch
        ) external view returns (bool);

        function depositAmount(
            address depositSender,
            address l1Token,
            bytes32 l2TxHash
        ) external view returns (uint256);

        function l2Bridge() external view returns (address);

        // Events
        event DepositInitiated(
            bytes32 indexed l2DepositTxHash,
            address indexed from,
            address indexed to,
            address l1Token,
            uint256 amount
        );
        event WithdrawalFinalized(address indexed to, address indexed l1Token, uint256 amount);
        event ClaimedFailedDeposit(address indexed to, address indexed l1Token, uint256 amount);

        // Errors
        error CallerNotAllowed();
        error ZeroAmount();
        error UnsupportedChain(uint256 chainId);
        error DepositLimitExceeded();
        error MalformedMessage();
        error InvalidProof();
        error WithdrawalAlreadyFinalized();
        error DepositNotFound();
    }
}

impl L1BridgeError {
    pub const fn caller_not_allowed() -> Self {
        Self::CallerNotAllowed(IL1Bridge::CallerNotAllowed {})
    }

    pub const fn zero_amount() -> Self {
        Self::ZeroAmount(IL1Bridge::ZeroAmount {})
    }

    pub const fn unsupported_chain(chain_id: U256) -> Self {
        Self::UnsupportedChain(IL1Bridge::UnsupportedChain { chainId: chain_id })
    }

    pub const fn deposit_limit_exceeded() -> Self {
        Self::DepositLimitExceeded(IL1Bridge::DepositLimitExceeded {})
    }

    pub const fn malformed_message() -> Self {
        Self::MalformedMessage(IL1Bridge::MalformedMessage {})
    }

    pub const fn invalid_proof() -> Self {
        Self::InvalidProof(IL1Bridge::InvalidProof {})
    }

    pub const fn withdrawal_already_finalized() -> Self {
        Self::WithdrawalAlreadyFinalized(IL1Bridge::WithdrawalAlreadyFinalized {})
    }

    pub const fn deposit_not_found() -> Self {
        Self::DepositNotFound(IL1Bridge::DepositNotFound {})
    }
}
