pub use IAllowList::{IAllowListErrors as AllowListError, IAllowListEvents as AllowListEvent};

crate::sol! {
    /// AllowList interface gating access to the bridge contracts.
    ///
    /// Every target contract has an access mode (`0 = Closed`, `1 = SpecialAccessOnly`,
    /// `2 = Public`). In `SpecialAccessOnly` mode a caller needs an explicit permission for the
    /// exact function selector it calls. The allow list also stores the per-token deposit limits
    /// enforced by the mailbox and the ERC20 bridge.
    #[derive(Debug, PartialEq, Eq)]
    interface IAllowList {
        /// Deposit limit configuration for a single L1 token
        struct Deposit {
            bool depositLimitation;    // Whether the limit is enforced at all
            uint256 depositCap;        // Ceiling on the cumulative deposits of a single depositor
        }

        /// Set the access mode of a target contract (owner only)
        function setAccessMode(address target, uint8 accessMode) external;

        /// Set the access modes of several targets at once (owner only)
        function setBatchAccessMode(address[] calldata targets, uint8[] calldata accessModes) external;

        /// Grant or revoke the permission to call `functionSig` on `target` (owner only)
        ///
        /// @param caller The address receiving the permission
        /// @param target The contract being called
        /// @param functionSig The selector of the function being called
        /// @param enable True to grant, false to revoke
        function setPermissionToCall(
            address caller,
            address target,
            bytes4 functionSig,
            bool enable
        ) external;

        /// Batched version of `setPermissionToCall` (owner only)
        function setBatchPermissionToCall(
            address[] calldata callers,
            address[] calldata targets,
            bytes4[] calldata functionSigs,
            bool[] calldata enables
        ) external;

        /// Configure the deposit limit of an L1 token; address(0) is ETH (owner only)
        function setDepositLimit(address l1Token, bool depositLimitation, uint256 depositCap) external;

        /// Get the access mode of a target contract
        function getAccessMode(address target) external view returns (uint8);

        /// Whether `caller` has an explicit permission to call `functionSig` on `target`
        function hasSpecialAccessToCall(
            address caller,
            address target,
            bytes4 functionSig
        ) external view returns (bool);

        /// Whether `caller` may call `functionSig` on `target` under its current access mode
        function canCall(address caller, address target, bytes4 functionSig) external view returns (bool);

        /// Get the deposit limit configuration of an L1 token
        function getTokenDepositLimitData(address l1Token) external view returns (Deposit memory);

        /// Owner of the allow list
        function owner() external view returns (address);

        // Events
        event UpdateAccessMode(address indexed target, uint8 previousMode, uint8 newMode);
        event UpdateCallPermission(address indexed caller, address indexed target, bytes4 indexed functionSig, bool status);
        event UpdateDepositLimit(address indexed l1Token, bool depositLimitation, uint256 depositCap);

        // Errors
        error Unauthorized();
        error InvalidAccessMode(uint8 accessMode);
        error LengthMismatch();
    }
}

impl AllowListError {
    pub const fn unauthorized() -> Self {
        Self::Unauthorized(IAllowList::Unauthorized {})
    }

    pub const fn invalid_access_mode(access_mode: u8) -> Self {
        Self::InvalidAccessMode(IAllowList::InvalidAccessMode {
            accessMode: access_mode,
        })
    }

    pub const fn length_mismatch() -> Self {
        Self::LengthMismatch(IAllowList::LengthMismatch {})
    }
}
