pub use IMailbox::{IMailboxErrors as MailboxError, IMailboxEvents as MailboxEvent};

use alloy_primitives::U256;

crate::sol! {
    /// Mailbox interface of the L1 bridgehub.
    ///
    /// The mailbox queues L1->L2 priority requests, proves the inclusion of L2->L1 logs and
    /// messages against the roots published by the executor, and pays out ETH withdrawals.
    #[derive(Debug, PartialEq, Eq)]
    interface IMailbox {
        /// Priority request as executed by the L2 bootloader
        struct L2CanonicalTransaction {
            uint256 txType;
            uint256 from;
            uint256 to;
            uint256 gasLimit;
            uint256 gasPerPubdataByteLimit;
            uint256 maxFeePerGas;
            uint256 maxPriorityFeePerGas;
            uint256 paymaster;
            uint256 nonce;                 // Serial id of the priority request
            uint256 value;                 // L2 `msg.value`
            uint256[4] reserved;           // [0]: ETH to mint on L2, [1]: refund recipient
            bytes data;
            bytes signature;
            uint256[] factoryDeps;         // Hashes of the factory dependencies
            bytes paymasterInput;
            bytes reservedDynamic;
        }

        /// Entry of the priority queue
        struct PriorityOperation {
            bytes32 canonicalTxHash;
            uint64 expirationTimestamp;
            uint192 layer2Tip;
        }

        /// Log emitted on L2 and committed to L1 in the batch logs tree
        struct L2Log {
            uint8 l2ShardId;
            bool isService;
            uint16 txNumberInBatch;
            address sender;
            bytes32 key;
            bytes32 value;
        }

        /// Arbitrary message sent from L2 through the L2->L1 messenger
        struct L2Message {
            uint16 txNumberInBatch;
            address sender;
            bytes data;
        }

        /// Request the execution of an L2 transaction from L1
        ///
        /// @param chainId Id of the L2 chain the request targets
        /// @param contractL2 L2 contract to call
        /// @param l2Value `msg.value` of the L2 call
        /// @param l2Calldata Calldata of the L2 call
        /// @param l2GasLimit Gas limit of the L2 transaction
        /// @param l2GasPerPubdataByteLimit Gas the user pays per byte of published data
        /// @param factoryDeps Bytecodes to mark as known on L2
        /// @param refundRecipient Receiver of the unspent L2 gas; zero means the sender
        /// @return canonicalTxHash Hash of the queued transaction
        function requestL2Transaction(
            uint256 chainId,
            address contractL2,
            uint256 l2Value,
            bytes calldata l2Calldata,
            uint256 l2GasLimit,
            uint256 l2GasPerPubdataByteLimit,
            bytes[] calldata factoryDeps,
            address refundRecipient
        ) external payable returns (bytes32 canonicalTxHash);

        /// Cost in ETH of executing an L2 transaction with the given gas parameters
        function l2TransactionBaseCost(
            uint256 chainId,
            uint256 gasPrice,
            uint256 l2GasLimit,
            uint256 l2GasPerPubdataByteLimit
        ) external view returns (uint256);

        /// Finalize an ETH withdrawal initiated on L2 and pay it out to the L1 receiver
        ///
        /// The selector of this function heads every ETH withdrawal message sent from L2.
        ///
        /// @param chainId Id of the L2 chain the withdrawal was initiated on
        /// @param l2BatchNumber Batch the withdrawal message was sent in
        /// @param l2MessageIndex Position of the message log in the batch logs tree
        /// @param l2TxNumberInBatch Position of the withdrawal transaction in the batch
        /// @param message The withdrawal message
        /// @param merkleProof Sibling hashes from the message log up to the root
        function finalizeEthWithdrawal(
            uint256 chainId,
            uint256 l2BatchNumber,
            uint256 l2MessageIndex,
            uint16 l2TxNumberInBatch,
            bytes calldata message,
            bytes32[] calldata merkleProof
        ) external;

        /// Whether the ETH withdrawal identified by the triple was finalized
        function isEthWithdrawalFinalized(
            uint256 chainId,
            uint256 l2BatchNumber,
            uint256 l2MessageIndex,
            uint16 l2TxNumberInBatch
        ) external view returns (bool);

        /// Prove that an L2 message was sent in the given batch
        function proveL2MessageInclusion(
            uint256 chainId,
            uint256 batchNumber,
            uint256 index,
            L2Message calldata message,
            bytes32[] calldata proof
        ) external view returns (bool);

        /// Prove that an L2 log was emitted in the given batch
        function proveL2LogInclusion(
            uint256 chainId,
            uint256 batchNumber,
            uint256 index,
            L2Log calldata log,
            bytes32[] calldata proof
        ) external view returns (bool);

        /// Prove the execution status (`0 = Failure`, `1 = Success`) of an L1->L2 transaction
        function proveL1ToL2TransactionStatus(
            uint256 chainId,
            bytes32 l2TxHash,
            uint256 l2BatchNumber,
            uint256 l2MessageIndex,
            uint16 l2TxNumberInBatch,
            bytes32[] calldata merkleProof,
            uint8 status
        ) external view returns (bool);

        function getL2ChainId() external view returns (uint256);
        function getPriorityTxMaxGasLimit() external view returns (uint256);
        function getTotalPriorityTxs() external view returns (uint256);
        function getFirstUnprocessedPriorityTx() external view returns (uint256);
        function getPriorityQueueSize() external view returns (uint256);
        function priorityQueueFrontOperation() external view returns (PriorityOperation memory);

        // Events
        event NewPriorityRequest(
            uint256 txId,
            bytes32 txHash,
            uint64 expirationTimestamp,
            L2CanonicalTransaction transaction,
            bytes[] factoryDeps
        );
        event EthWithdrawalFinalized(address indexed to, uint256 amount);

        // Errors
        error CallerNotAllowed();
        error ChainIdMismatch(uint256 expected, uint256 actual);
        error DepositLimitExceeded();
        error InvalidGasPerPubdata();
        error TooMuchGas();
        error MsgValueTooLow(uint256 required, uint256 provided);
        error TooManyFactoryDeps();
        error BytecodeNotChunkable();
        error BytecodeEvenWordCount();
        error BytecodeTooLong();
        error MalformedMessage();
        error InvalidProof();
        error WithdrawalAlreadyFinalized();
        error BatchNotExecuted(uint256 batchNumber);
        error EmptyProof();
        error ProofTooLong();
        error ProofIndexOutOfRange();
        error InvalidTxStatus(uint8 status);
        error PriorityQueueEmpty();
    }
}

impl MailboxError {
    pub const fn caller_not_allowed() -> Self {
        Self::CallerNotAllowed(IMailbox::CallerNotAllowed {})
    }

    pub const fn chain_id_mismatch(expected: U256, actual: U256) -> Self {
        Self::ChainIdMismatch(IMailbox::ChainIdMismatch { expected, actual })
    }

    pub const fn deposit_limit_exceeded() -> Self {
        Self::DepositLimitExceeded(IMailbox::DepositLimitExceeded {})
    }

    pub const fn invalid_gas_per_pubdata() -> Self {
        Self::InvalidGasPerPubdata(IMailbox::InvalidGasPerPubdata {})
    }

    pub const fn too_much_gas() -> Self {
        Self::TooMuchGas(IMailbox::TooMuchGas {})
    }

    pub const fn msg_value_too_low(required: U256, provided: U256) -> Self {
        Self::MsgValueTooLow(IMailbox::MsgValueTooLow { required, provided })
    }

    pub const fn too_many_factory_deps() -> Self {
        Self::TooManyFactoryDeps(IMailbox::TooManyFactoryDeps {})
    }

    pub const fn bytecode_not_chunkable() -> Self {
        Self::BytecodeNotChunkable(IMailbox::BytecodeNotChunkable {})
    }

    pub const fn bytecode_even_word_count() -> Self {
        Self::BytecodeEvenWordCount(IMailbox::BytecodeEvenWordCount {})
    }

    pub const fn bytecode_too_long() -> Self {
        Self::BytecodeTooLong(IMailbox::BytecodeTooLong {})
    }

    pub const fn malformed_message() -> Self {
        Self::MalformedMessage(IMailbox::MalformedMessage {})
    }

    pub const fn invalid_proof() -> Self {
        Self::InvalidProof(IMailbox::InvalidProof {})
    }

    pub const fn withdrawal_already_finalized() -> Self {
        Self::WithdrawalAlreadyFinalized(IMailbox::WithdrawalAlreadyFinalized {})
    }

    pub const fn batch_not_executed(batch_number: U256) -> Self {
        Self::BatchNotExecuted(IMailbox::BatchNotExecuted {
            batchNumber: batch_number,
        })
    }

    pub const fn empty_proof() -> Self {
        Self::EmptyProof(IMailbox::EmptyProof {})
    }

    pub const fn proof_too_long() -> Self {
        Self::ProofTooLong(IMailbox::ProofTooLong {})
    }

    pub const fn proof_index_out_of_range() -> Self {
        Self::ProofIndexOutOfRange(IMailbox::ProofIndexOutOfRange {})
    }

    pub const fn invalid_tx_status(status: u8) -> Self {
        Self::InvalidTxStatus(IMailbox::InvalidTxStatus { status })
    }

    pub const fn priority_queue_empty() -> Self {
        Self::PriorityQueueEmpty(IMailbox::PriorityQueueEmpty {})
    }
}
