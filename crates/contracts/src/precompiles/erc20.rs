pub use IErc20::{IErc20Errors as Erc20Error, IErc20Events as Erc20Event};

use alloy_primitives::{Address, U256};

crate::sol! {
    /// Testnet ERC20 token with an open `mint`.
    #[derive(Debug, PartialEq, Eq)]
    interface IErc20 {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        function totalSupply() external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);

        function transfer(address to, uint256 amount) external returns (bool);
        function approve(address spender, uint256 amount) external returns (bool);
        function transferFrom(address from, address to, uint256 amount) external returns (bool);

        /// Mint `amount` to `to`. Anyone may mint on a testnet token.
        function mint(address to, uint256 amount) external returns (bool);

        // Events
        event Transfer(address indexed from, address indexed to, uint256 amount);
        event Approval(address indexed owner, address indexed spender, uint256 amount);

        // Errors
        error InsufficientBalance(address account, uint256 available, uint256 required);
        error InsufficientAllowance(address spender, uint256 available, uint256 required);
        error InvalidRecipient();
    }
}

impl Erc20Error {
    pub const fn insufficient_balance(account: Address, available: U256, required: U256) -> Self {
        Self::InsufficientBalance(IErc20::InsufficientBalance {
            account,
            available,
            required,
        })
    }

    pub const fn insufficient_allowance(spender: Address, available: U256, required: U256) -> Self {
        Self::InsufficientAllowance(IErc20::InsufficientAllowance {
            spender,
            available,
            required,
        })
    }

    pub const fn invalid_recipient() -> Self {
        Self::InvalidRecipient(IErc20::InvalidRecipient {})
    }
}
