//! Metrics of the bridgehub contracts.

use reth_metrics::{
    Metrics,
    metrics::{Counter, counter},
};

/// Handles bound to the recorder active at the call site.
///
/// Resolving them per call lets a thread-local recorder (e.g. the one `bridgehub simulate`
/// installs) observe the contracts running inside it.
pub fn metrics() -> BridgehubMetrics {
    BridgehubMetrics::default()
}

/// Bridgehub metrics
#[derive(Metrics, Clone)]
#[metrics(scope = "bridgehub")]
pub struct BridgehubMetrics {
    /// Number of L1 -> L2 priority requests queued
    pub priority_requests: Counter,

    /// Number of ETH withdrawals paid out
    pub eth_withdrawals_finalized: Counter,

    /// Number of ERC20 deposits initiated through the bridge
    pub erc20_deposits: Counter,

    /// Number of ERC20 withdrawals released by the bridge
    pub erc20_withdrawals_finalized: Counter,

    /// Number of failed deposits returned to their senders
    pub failed_deposits_claimed: Counter,

    /// Number of batches whose logs root was published
    pub batches_executed: Counter,
}

impl BridgehubMetrics {
    #[inline]
    pub fn record_priority_request(&self) {
        self.priority_requests.increment(1);
    }

    #[inline]
    pub fn record_eth_withdrawal_finalized(&self) {
        self.eth_withdrawals_finalized.increment(1);
    }

    #[inline]
    pub fn record_erc20_deposit(&self) {
        self.erc20_deposits.increment(1);
    }

    #[inline]
    pub fn record_erc20_withdrawal_finalized(&self) {
        self.erc20_withdrawals_finalized.increment(1);
    }

    #[inline]
    pub fn record_failed_deposit_claimed(&self) {
        self.failed_deposits_claimed.increment(1);
    }

    #[inline]
    pub fn record_batch_executed(&self) {
        self.batches_executed.increment(1);
    }

    /// Record a transaction that reverted with the error `name`
    #[inline]
    pub fn record_revert(&self, name: &str) {
        counter!("bridgehub.reverted_transactions", "error" => name.to_string()).increment(1);
    }
}

/// Value of the counter named `name` in the recorder behind `snapshotter`.
#[cfg(test)]
pub(crate) fn counter_value(
    snapshotter: &metrics_util::debugging::Snapshotter,
    name: &str,
) -> Option<u64> {
    use metrics_util::debugging::DebugValue;

    snapshotter.snapshot().into_vec().into_iter().find_map(|(key, _, _, value)| match value {
        DebugValue::Counter(count) if key.key().name() == name => Some(count),
        _ => None,
    })
}
