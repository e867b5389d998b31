pub use IExecutor::{IExecutorErrors as ExecutorError, IExecutorEvents as ExecutorEvent};

use alloy_primitives::{B256, U256};

crate::sol! {
    /// Executor interface: the registry of L2 batches executed on L1.
    ///
    /// Validators publish the root of each batch's L2->L1 logs tree. Batch execution also drains
    /// the priority operations the batch processed from the mailbox queue.
    #[derive(Debug, PartialEq, Eq)]
    interface IExecutor {
        /// Publish the logs root of a batch without replaying it (validator only)
        ///
        /// Marks every batch up to `batchNumber` as executed.
        function saveL2LogsRootHash(uint256 batchNumber, bytes32 l2LogsTreeRoot) external;

        /// Execute the next batch (validator only)
        ///
        /// @param batchNumber Must be the number following the last executed batch
        /// @param l2LogsTreeRoot Root of the batch's L2->L1 logs tree
        /// @param priorityOperationsProcessed Number of priority operations the batch processed
        /// @param priorityOperationsHash Rolling hash of the processed operations' canonical hashes
        function executeBatch(
            uint256 batchNumber,
            bytes32 l2LogsTreeRoot,
            uint256 priorityOperationsProcessed,
            bytes32 priorityOperationsHash
        ) external;

        /// Grant or revoke the validator role (governor only)
        function setValidator(address validator, bool active) external;

        function l2LogsRootHash(uint256 batchNumber) external view returns (bytes32);
        function getTotalBatchesExecuted() external view returns (uint256);
        function isValidator(address account) external view returns (bool);
        function getGovernor() external view returns (address);

        // Events
        event BlockExecution(uint256 indexed batchNumber, bytes32 indexed l2LogsTreeRoot);
        event ValidatorStatusUpdate(address indexed validator, bool active);

        // Errors
        error Unauthorized();
        error ZeroRoot();
        error RootAlreadySet(uint256 batchNumber);
        error BatchNumberMismatch(uint256 expected, uint256 actual);
        error BatchNumberOverflow();
        error PriorityOperationsHashMismatch(bytes32 expected, bytes32 actual);
        error NotEnoughPriorityOperations();
    }
}

impl ExecutorError {
    pub const fn unauthorized() -> Self {
        Self::Unauthorized(IExecutor::Unauthorized {})
    }

    pub const fn zero_root() -> Self {
        Self::ZeroRoot(IExecutor::ZeroRoot {})
    }

    pub const fn root_already_set(batch_number: U256) -> Self {
        Self::RootAlreadySet(IExecutor::RootAlreadySet {
            batchNumber: batch_number,
        })
    }

    pub const fn batch_number_mismatch(expected: U256, actual: U256) -> Self {
        Self::BatchNumberMismatch(IExecutor::BatchNumberMismatch { expected, actual })
    }

    pub const fn batch_number_overflow() -> Self {
        Self::BatchNumberOverflow(IExecutor::BatchNumberOverflow {})
    }

    pub const fn priority_operations_hash_mismatch(expected: B256, actual: B256) -> Self {
        Self::PriorityOperationsHashMismatch(IExecutor::PriorityOperationsHashMismatch {
            expected,
            actual,
        })
    }

    pub const fn not_enough_priority_operations() -> Self {
        Self::NotEnoughPriorityOperations(IExecutor::NotEnoughPriorityOperations {})
    }
}
