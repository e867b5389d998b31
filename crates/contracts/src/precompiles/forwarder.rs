crate::sol! {
    /// Relays a call so that the relaying contract becomes its `msg.sender`.
    #[derive(Debug, PartialEq, Eq)]
    interface IForwarder {
        /// Call `to` with `data`, forwarding the whole `msg.value`. Reverts bubble up.
        function forward(address to, bytes calldata data) external payable returns (bytes memory);
    }
}
