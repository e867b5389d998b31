use alloy::sol_types::SolEventInterface;
use alloy_primitives::{Address, B256, Bytes, Log, U256, address};
use bridgehub_contracts::precompiles::{
    AllowListEvent, Erc20Event, ExecutorEvent, IErc20, IExecutor, IL1Bridge, IMailbox,
    L1BridgeEvent, MailboxEvent,
};
use bridgehub_precompiles::{
    L2_ETH_TOKEN_SYSTEM_CONTRACT_ADDRESS,
    config::{DeploymentConfig, default_test_config},
    deployment::Deployment,
    erc20::TestnetErc20,
    storage::{StorageCtx, hashmap::HashMapStorageProvider},
    transact,
};
use bridgehub_primitives::{
    Erc20Withdrawal, EthWithdrawal, L2ToL1Log, MerkleTree,
    priority::REQUIRED_L2_GAS_PRICE_PER_PUBDATA, priority_ops_hash, word_to_address,
};
use clap::Parser;
use eyre::{Result, WrapErr};
use metrics::Key;
use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};
use serde::Serialize;
use std::{collections::BTreeMap, path::PathBuf};
use tracing::info;

const USER: Address = address!("0x00000000000000000000000000000000000a11ce");
const RECEIVER: Address = address!("0x0000000000000000000000000000000000000b0b");

const GAS_PRICE: u64 = 1_000_000_000;
const L2_GAS_LIMIT: u64 = 1_000_000;
const ETHER: u128 = 1_000_000_000_000_000_000;

#[derive(Parser, Debug)]
pub(crate) struct SimulateArgs {
    /// Path to the deployment config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table")]
    format: String,
}

#[derive(Debug, Serialize)]
struct Contracts {
    allow_list: Address,
    diamond: Address,
    token: Address,
    bridge: Address,
}

#[derive(Debug, Serialize)]
struct EventRecord {
    contract: &'static str,
    event: &'static str,
    details: String,
}

#[derive(Debug, Serialize)]
struct Balances {
    user_eth: U256,
    receiver_eth: U256,
    diamond_eth: U256,
    user_tokens: U256,
    receiver_tokens: U256,
    bridge_tokens: U256,
}

#[derive(Debug, Serialize)]
struct SimulationReport {
    contracts: Contracts,
    eth_deposit_tx: B256,
    erc20_deposit_tx: B256,
    logs_root: B256,
    events: Vec<EventRecord>,
    balances: Balances,
    metrics: BTreeMap<String, u64>,
}

impl SimulateArgs {
    pub(crate) fn run(self) -> Result<()> {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();
        let mut report = metrics::with_local_recorder(&recorder, || self.simulate())?;
        report.metrics = counters(&snapshotter);

        if self.format == "json" {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }
        print_table(&report);
        Ok(())
    }

    fn simulate(&self) -> Result<SimulationReport> {
        let config = match &self.config {
            Some(path) => DeploymentConfig::load(path)
                .wrap_err_with(|| format!("failed to load config from {}", path.display()))?,
            None => default_test_config(),
        };

        let mut storage = HashMapStorageProvider::new(config.l1_chain_id);
        let (deployment, eth_deposit_tx, erc20_deposit_tx) =
            StorageCtx::enter(&mut storage, || {
                let deployment = Deployment::deploy(&config)?;
                let (eth, erc20) = deposit(&deployment)?;
                Ok((deployment, eth, erc20))
            })
            .wrap_err("deposits failed")?;

        // What the L2 sends back once it processed both deposits.
        let eth_message: Bytes =
            EthWithdrawal { l1_receiver: RECEIVER, amount: U256::from(ETHER / 2) }.encode().into();
        let erc20_message: Bytes = Erc20Withdrawal {
            l1_receiver: RECEIVER,
            l1_token: deployment.token,
            amount: U256::from(150),
        }
        .encode()
        .into();
        let tree = MerkleTree::l2_logs_tree(&[
            L2ToL1Log::from_message(2, L2_ETH_TOKEN_SYSTEM_CONTRACT_ADDRESS, &eth_message).hash(),
            L2ToL1Log::from_message(3, deployment.l2_bridge, &erc20_message).hash(),
        ])?;
        let proofs = [tree.proof(0)?, tree.proof(1)?];
        info!(root = %tree.root(), "built L2 logs tree");

        let balances = StorageCtx::enter(&mut storage, || {
            let chain_id = deployment.l2_chain_id();
            transact(
                deployment.validator,
                deployment.diamond,
                U256::ZERO,
                U256::ZERO,
                &IExecutor::executeBatchCall {
                    batchNumber: U256::from(1),
                    l2LogsTreeRoot: tree.root(),
                    priorityOperationsProcessed: U256::from(2),
                    priorityOperationsHash: priority_ops_hash([eth_deposit_tx, erc20_deposit_tx]),
                },
            )?;

            let [eth_proof, erc20_proof] = proofs;
            transact(
                RECEIVER,
                deployment.diamond,
                U256::ZERO,
                U256::ZERO,
                &IMailbox::finalizeEthWithdrawalCall {
                    chainId: chain_id,
                    l2BatchNumber: U256::from(1),
                    l2MessageIndex: U256::ZERO,
                    l2TxNumberInBatch: 2,
                    message: eth_message,
                    merkleProof: eth_proof,
                },
            )?;
            transact(
                RECEIVER,
                deployment.bridge,
                U256::ZERO,
                U256::ZERO,
                &IL1Bridge::finalizeWithdrawalCall {
                    chainId: chain_id,
                    l2BatchNumber: U256::from(1),
                    l2MessageIndex: U256::from(1),
                    l2TxNumberInBatch: 3,
                    message: erc20_message,
                    merkleProof: erc20_proof,
                },
            )?;

            let mut token = TestnetErc20::at(deployment.token);
            Ok(Balances {
                user_eth: StorageCtx.balance(USER)?,
                receiver_eth: StorageCtx.balance(RECEIVER)?,
                diamond_eth: StorageCtx.balance(deployment.diamond)?,
                user_tokens: token.balance_of(USER)?,
                receiver_tokens: token.balance_of(RECEIVER)?,
                bridge_tokens: token.balance_of(deployment.bridge)?,
            })
        })
        .wrap_err("withdrawals failed")?;

        Ok(SimulationReport {
            contracts: Contracts {
                allow_list: deployment.allow_list,
                diamond: deployment.diamond,
                token: deployment.token,
                bridge: deployment.bridge,
            },
            eth_deposit_tx,
            erc20_deposit_tx,
            logs_root: tree.root(),
            events: storage.logs().iter().filter_map(|log| describe(&deployment, log)).collect(),
            balances,
            metrics: BTreeMap::new(),
        })
    }
}

/// Counters recorded during the simulation, keyed by name and labels.
fn counters(snapshotter: &Snapshotter) -> BTreeMap<String, u64> {
    snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .filter_map(|(key, _, _, value)| match value {
            DebugValue::Counter(count) => Some((metric_name(key.key()), count)),
            _ => None,
        })
        .collect()
}

fn metric_name(key: &Key) -> String {
    let labels: Vec<_> =
        key.labels().map(|label| format!("{}={}", label.key(), label.value())).collect();
    if labels.is_empty() {
        return key.name().to_string();
    }
    format!("{}{{{}}}", key.name(), labels.join(","))
}

/// Funds [`USER`], then deposits ETH through the mailbox and tokens through the bridge.
fn deposit(deployment: &Deployment) -> bridgehub_precompiles::error::Result<(B256, B256)> {
    let gas_price = U256::from(GAS_PRICE);
    let gas_limit = U256::from(L2_GAS_LIMIT);
    let gas_per_pubdata = U256::from(REQUIRED_L2_GAS_PRICE_PER_PUBDATA);

    StorageCtx.set_balance(USER, U256::from(10 * ETHER))?;
    TestnetErc20::at(deployment.token)
        .mint(IErc20::mintCall { to: USER, amount: U256::from(1_000) })?;
    transact(
        USER,
        deployment.token,
        U256::ZERO,
        U256::ZERO,
        &IErc20::approveCall { spender: deployment.bridge, amount: U256::from(1_000) },
    )?;

    let base_cost = transact(
        USER,
        deployment.diamond,
        U256::ZERO,
        gas_price,
        &IMailbox::l2TransactionBaseCostCall {
            chainId: deployment.l2_chain_id(),
            gasPrice: gas_price,
            l2GasLimit: gas_limit,
            l2GasPerPubdataByteLimit: gas_per_pubdata,
        },
    )?;

    let eth = transact(
        USER,
        deployment.diamond,
        base_cost + U256::from(ETHER),
        gas_price,
        &IMailbox::requestL2TransactionCall {
            chainId: deployment.l2_chain_id(),
            contractL2: USER,
            l2Value: U256::from(ETHER),
            l2Calldata: Bytes::new(),
            l2GasLimit: gas_limit,
            l2GasPerPubdataByteLimit: gas_per_pubdata,
            factoryDeps: Vec::new(),
            refundRecipient: Address::ZERO,
        },
    )?;
    let erc20 = transact(
        USER,
        deployment.bridge,
        base_cost,
        gas_price,
        &IL1Bridge::depositCall {
            chainId: deployment.l2_chain_id(),
            l2Receiver: USER,
            l1Token: deployment.token,
            amount: U256::from(400),
            l2TxGasLimit: gas_limit,
            l2TxGasPerPubdataByte: gas_per_pubdata,
            refundRecipient: Address::ZERO,
        },
    )?;
    Ok((eth, erc20))
}

fn contract_name(deployment: &Deployment, address: Address) -> &'static str {
    match address {
        a if a == deployment.allow_list => "AllowList",
        a if a == deployment.diamond => "Diamond",
        a if a == deployment.token => "TestnetErc20",
        a if a == deployment.bridge => "L1Erc20Bridge",
        _ => "unknown",
    }
}

fn describe(deployment: &Deployment, log: &Log) -> Option<EventRecord> {
    let (topics, data) = (log.data.topics(), &log.data.data[..]);
    let (event, details) = if let Ok(event) = MailboxEvent::decode_raw_log(topics, data) {
        match event {
            MailboxEvent::NewPriorityRequest(e) => (
                "NewPriorityRequest",
                format!(
                    "txId={} txHash={} from={}",
                    e.txId,
                    e.txHash,
                    word_to_address(e.transaction.from)
                ),
            ),
            MailboxEvent::EthWithdrawalFinalized(e) => {
                ("EthWithdrawalFinalized", format!("to={} amount={}", e.to, e.amount))
            }
        }
    } else if let Ok(event) = ExecutorEvent::decode_raw_log(topics, data) {
        match event {
            ExecutorEvent::BlockExecution(e) => (
                "BlockExecution",
                format!("batch={} root={}", e.batchNumber, e.l2LogsTreeRoot),
            ),
            ExecutorEvent::ValidatorStatusUpdate(e) => (
                "ValidatorStatusUpdate",
                format!("validator={} active={}", e.validator, e.active),
            ),
        }
    } else if let Ok(event) = L1BridgeEvent::decode_raw_log(topics, data) {
        match event {
            L1BridgeEvent::DepositInitiated(e) => (
                "DepositInitiated",
                format!(
                    "txHash={} from={} to={} token={} amount={}",
                    e.l2DepositTxHash, e.from, e.to, e.l1Token, e.amount
                ),
            ),
            L1BridgeEvent::WithdrawalFinalized(e) => (
                "WithdrawalFinalized",
                format!("to={} token={} amount={}", e.to, e.l1Token, e.amount),
            ),
            L1BridgeEvent::ClaimedFailedDeposit(e) => (
                "ClaimedFailedDeposit",
                format!("to={} token={} amount={}", e.to, e.l1Token, e.amount),
            ),
        }
    } else if let Ok(event) = Erc20Event::decode_raw_log(topics, data) {
        match event {
            Erc20Event::Transfer(e) => {
                ("Transfer", format!("from={} to={} amount={}", e.from, e.to, e.amount))
            }
            Erc20Event::Approval(e) => (
                "Approval",
                format!("owner={} spender={} amount={}", e.owner, e.spender, e.amount),
            ),
        }
    } else if let Ok(event) = AllowListEvent::decode_raw_log(topics, data) {
        match event {
            AllowListEvent::UpdateAccessMode(e) => (
                "UpdateAccessMode",
                format!("target={} {} -> {}", e.target, e.previousMode, e.newMode),
            ),
            AllowListEvent::UpdateCallPermission(e) => (
                "UpdateCallPermission",
                format!(
                    "caller={} target={} selector={} status={}",
                    e.caller, e.target, e.functionSig, e.status
                ),
            ),
            AllowListEvent::UpdateDepositLimit(e) => (
                "UpdateDepositLimit",
                format!(
                    "token={} limited={} cap={}",
                    e.l1Token, e.depositLimitation, e.depositCap
                ),
            ),
        }
    } else {
        return None;
    };

    Some(EventRecord { contract: contract_name(deployment, log.address), event, details })
}

fn print_table(report: &SimulationReport) {
    println!("Bridgehub Simulation");
    println!("====================");
    println!();

    println!("Contracts:");
    println!("  Allow list:   {}", report.contracts.allow_list);
    println!("  Diamond:      {}", report.contracts.diamond);
    println!("  Token:        {}", report.contracts.token);
    println!("  ERC20 bridge: {}", report.contracts.bridge);
    println!();

    println!("Priority requests:");
    println!("  ETH deposit:   {}", report.eth_deposit_tx);
    println!("  ERC20 deposit: {}", report.erc20_deposit_tx);
    println!("  Logs root:     {}", report.logs_root);
    println!();

    println!("Events:");
    for record in &report.events {
        println!("  [{:<13}] {:<22} {}", record.contract, record.event, record.details);
    }
    println!();

    let balances = &report.balances;
    println!("Balances:");
    println!("  User ETH:        {}", balances.user_eth);
    println!("  Receiver ETH:    {}", balances.receiver_eth);
    println!("  Diamond ETH:     {}", balances.diamond_eth);
    println!("  User tokens:     {}", balances.user_tokens);
    println!("  Receiver tokens: {}", balances.receiver_tokens);
    println!("  Bridge tokens:   {}", balances.bridge_tokens);
    println!();

    println!("Metrics:");
    for (name, count) in &report.metrics {
        println!("  {name:<45} {count}");
    }
}
