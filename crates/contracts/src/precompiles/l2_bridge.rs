crate::sol! {
    /// L2 side of the ERC20 bridge, as seen from L1.
    ///
    /// A deposit queues a priority request whose calldata is a `finalizeDeposit` call on the L2
    /// bridge.
    #[derive(Debug, PartialEq, Eq)]
    interface IL2Bridge {
        function finalizeDeposit(
            address l1Sender,
            address l2Receiver,
            address l1Token,
            uint256 amount,
            bytes calldata data
        ) external;
    }
}
