//! End-to-end scenarios against a full deployment: aliasing of priority request senders,
//! withdrawal finalization, deposit limits, access control and the ERC20 bridge round trip.

use alloy::{
    primitives::{Address, B256, Bytes, U256},
    sol_types::{SolCall, SolEvent},
};
use bridgehub_contracts::precompiles::{
    IAllowList, IErc20, IExecutor, IForwarder, IL1Bridge, IMailbox, L1BridgeError, MailboxError,
};
use bridgehub_precompiles::{
    CallContext, ContractKind, L2_ETH_TOKEN_SYSTEM_CONTRACT_ADDRESS,
    chain::ChainStorage,
    config::{DeploymentConfig, default_test_config},
    deploy,
    deployment::Deployment,
    erc20::TestnetErc20,
    error::Result,
    forwarder::deploy_and_forward,
    storage::{StorageCtx, hashmap::HashMapStorageProvider},
    transact,
};
use bridgehub_primitives::{
    AccessMode, Erc20Withdrawal, EthWithdrawal, L2ToL1Log, MerkleTree, address_to_word,
    apply_l1_to_l2_alias, l2_transaction_base_cost, priority::REQUIRED_L2_GAS_PRICE_PER_PUBDATA,
    priority_ops_hash,
};
use test_case::test_case;

const GAS_PRICE: u64 = 1_000_000_000;
const L2_GAS_LIMIT: u64 = 1_000_000;

fn ether(amount: u64) -> U256 {
    U256::from(amount) * U256::from(10).pow(U256::from(18))
}

fn base_cost() -> U256 {
    l2_transaction_base_cost(
        U256::from(GAS_PRICE),
        U256::from(L2_GAS_LIMIT),
        U256::from(REQUIRED_L2_GAS_PRICE_PER_PUBDATA),
    )
    .unwrap()
}

fn request(
    deployment: &Deployment,
    refund_recipient: Address,
) -> IMailbox::requestL2TransactionCall {
    IMailbox::requestL2TransactionCall {
        chainId: deployment.l2_chain_id(),
        contractL2: Address::repeat_byte(0x42),
        l2Value: U256::ZERO,
        l2Calldata: Bytes::new(),
        l2GasLimit: U256::from(L2_GAS_LIMIT),
        l2GasPerPubdataByteLimit: U256::from(REQUIRED_L2_GAS_PRICE_PER_PUBDATA),
        factoryDeps: Vec::new(),
        refundRecipient: refund_recipient,
    }
}

fn send_request(deployment: &Deployment, sender: Address, value: U256) -> Result<B256> {
    transact(
        sender,
        deployment.diamond,
        value,
        U256::from(GAS_PRICE),
        &request(deployment, Address::ZERO),
    )
}

fn priority_requests(storage: &HashMapStorageProvider) -> Vec<IMailbox::NewPriorityRequest> {
    storage
        .logs()
        .iter()
        .filter_map(|log| IMailbox::NewPriorityRequest::decode_log_data(&log.data).ok())
        .collect()
}

fn setup(config: &DeploymentConfig) -> eyre::Result<(HashMapStorageProvider, Deployment)> {
    let mut storage = HashMapStorageProvider::new(config.l1_chain_id);
    let deployment = StorageCtx::enter(&mut storage, || Deployment::deploy(config))?;
    Ok((storage, deployment))
}

/// Publishes a batch made of `leaves` and returns the proof of the leaf at `index`.
fn publish(
    deployment: &Deployment,
    batch: u64,
    leaves: &[B256],
    index: usize,
) -> Result<Vec<B256>> {
    let tree = MerkleTree::l2_logs_tree(leaves).unwrap();
    transact(
        deployment.validator,
        deployment.diamond,
        U256::ZERO,
        U256::ZERO,
        &IExecutor::saveL2LogsRootHashCall {
            batchNumber: U256::from(batch),
            l2LogsTreeRoot: tree.root(),
        },
    )?;
    Ok(tree.proof(index).unwrap())
}

#[derive(Debug, Clone, Copy)]
enum CallStyle {
    Direct,
    Forwarder,
    Constructor,
}

#[test_case(CallStyle::Direct; "direct call")]
#[test_case(CallStyle::Forwarder; "through a forwarder")]
#[test_case(CallStyle::Constructor; "from a constructor")]
fn test_refund_recipient_follows_the_sender(style: CallStyle) -> eyre::Result<()> {
    let (mut storage, deployment) = setup(&default_test_config())?;
    let user = Address::random();

    let caller = StorageCtx::enter(&mut storage, || {
        StorageCtx.set_balance(user, ether(1))?;
        let data = request(&deployment, Address::ZERO).abi_encode();

        match style {
            CallStyle::Direct => {
                send_request(&deployment, user, base_cost())?;
                Ok(user)
            }
            CallStyle::Forwarder => {
                let forwarder = deploy(user, ContractKind::Forwarder, |_| Ok(()))?;
                transact(
                    user,
                    forwarder,
                    base_cost(),
                    U256::from(GAS_PRICE),
                    &IForwarder::forwardCall { to: deployment.diamond, data: data.into() },
                )?;
                Ok(forwarder)
            }
            CallStyle::Constructor => {
                let ctx = CallContext::transaction(user, base_cost(), U256::from(GAS_PRICE));
                deploy_and_forward(&ctx, deployment.diamond, &data)
            }
        }
    })?;

    let expected = match style {
        CallStyle::Direct => user,
        CallStyle::Forwarder | CallStyle::Constructor => apply_l1_to_l2_alias(caller),
    };
    let requests = priority_requests(&storage);
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].transaction.from, address_to_word(expected));
    assert_eq!(requests[0].transaction.reserved[1], address_to_word(expected));
    assert_eq!(requests[0].transaction.reserved[0], base_cost());
    Ok(())
}

#[test]
fn test_explicit_refund_recipient_is_aliased_only_if_it_has_code() -> eyre::Result<()> {
    let (mut storage, deployment) = setup(&default_test_config())?;
    let (user, account) = (Address::random(), Address::random());

    StorageCtx::enter(&mut storage, || {
        StorageCtx.set_balance(user, ether(1))?;
        for refund_recipient in [account, deployment.token] {
            transact(
                user,
                deployment.diamond,
                base_cost(),
                U256::from(GAS_PRICE),
                &request(&deployment, refund_recipient),
            )?;
        }
        Ok(())
    })?;

    let requests = priority_requests(&storage);
    assert_eq!(requests[0].transaction.reserved[1], address_to_word(account));
    assert_eq!(
        requests[1].transaction.reserved[1],
        address_to_word(apply_l1_to_l2_alias(deployment.token))
    );
    // The sender is an externally owned account in both cases.
    assert_eq!(requests[1].transaction.from, address_to_word(user));
    Ok(())
}

#[test]
fn test_eth_withdrawal_is_finalized_exactly_once() -> eyre::Result<()> {
    let (mut storage, deployment) = setup(&default_test_config())?;
    let (user, receiver) = (Address::random(), Address::random());
    let amount = ether(2);

    StorageCtx::enter(&mut storage, || {
        StorageCtx.set_balance(deployment.diamond, ether(10))?;

        let message: Bytes = EthWithdrawal { l1_receiver: receiver, amount }.encode().into();
        let log = L2ToL1Log::from_message(5, L2_ETH_TOKEN_SYSTEM_CONTRACT_ADDRESS, &message);
        let leaves = [B256::repeat_byte(1), B256::repeat_byte(2), log.hash()];
        let proof = publish(&deployment, 1, &leaves, 2)?;

        let call = IMailbox::finalizeEthWithdrawalCall {
            chainId: deployment.l2_chain_id(),
            l2BatchNumber: U256::from(1),
            l2MessageIndex: U256::from(2),
            l2TxNumberInBatch: 5,
            message,
            merkleProof: proof,
        };
        transact(user, deployment.diamond, U256::ZERO, U256::ZERO, &call)?;
        assert_eq!(StorageCtx.balance(receiver)?, amount);
        assert_eq!(StorageCtx.balance(deployment.diamond)?, ether(8));

        assert_eq!(
            transact(user, deployment.diamond, U256::ZERO, U256::ZERO, &call),
            Err(MailboxError::withdrawal_already_finalized().into())
        );
        assert_eq!(StorageCtx.balance(receiver)?, amount);
        Ok(())
    })?;
    Ok(())
}

#[test]
fn test_withdrawal_failures_are_distinct() -> eyre::Result<()> {
    let (mut storage, deployment) = setup(&default_test_config())?;
    let user = Address::random();

    StorageCtx::enter(&mut storage, || {
        StorageCtx.set_balance(deployment.diamond, ether(1))?;
        let message: Bytes =
            EthWithdrawal { l1_receiver: user, amount: U256::from(1) }.encode().into();
        let log = L2ToL1Log::from_message(0, L2_ETH_TOKEN_SYSTEM_CONTRACT_ADDRESS, &message);
        let proof = publish(&deployment, 1, &[log.hash()], 0)?;

        let valid = IMailbox::finalizeEthWithdrawalCall {
            chainId: deployment.l2_chain_id(),
            l2BatchNumber: U256::from(1),
            l2MessageIndex: U256::ZERO,
            l2TxNumberInBatch: 0,
            message: message.clone(),
            merkleProof: proof.clone(),
        };
        let finalize = |call: &IMailbox::finalizeEthWithdrawalCall| {
            transact(user, deployment.diamond, U256::ZERO, U256::ZERO, call)
        };

        let mut not_executed = valid.clone();
        not_executed.l2BatchNumber = U256::from(2);
        assert_eq!(
            finalize(&not_executed),
            Err(MailboxError::batch_not_executed(U256::from(2)).into())
        );

        let mut empty = valid.clone();
        empty.merkleProof = Vec::new();
        assert_eq!(finalize(&empty), Err(MailboxError::empty_proof().into()));

        let mut out_of_range = valid.clone();
        out_of_range.l2MessageIndex = U256::from(1) << proof.len();
        assert_eq!(
            finalize(&out_of_range),
            Err(MailboxError::proof_index_out_of_range().into())
        );

        let mut wrong_content = valid.clone();
        wrong_content.merkleProof[3] = B256::repeat_byte(0xff);
        assert_eq!(finalize(&wrong_content), Err(MailboxError::invalid_proof().into()));

        let mut truncated = valid.clone();
        truncated.message = Bytes::copy_from_slice(&message[..55]);
        assert_eq!(finalize(&truncated), Err(MailboxError::malformed_message().into()));

        let mut wrong_selector = valid.clone();
        let mut bytes = message.to_vec();
        bytes[0] ^= 1;
        wrong_selector.message = bytes.into();
        assert_eq!(finalize(&wrong_selector), Err(MailboxError::malformed_message().into()));

        // None of the failures consumed the withdrawal.
        finalize(&valid)?;
        Ok(())
    })?;
    Ok(())
}

#[test_case(false; "alice first")]
#[test_case(true; "bob first")]
fn test_eth_deposit_limit_is_inclusive(bob_first: bool) -> eyre::Result<()> {
    let mut config = default_test_config();
    config.eth_deposit_limit = Some(base_cost() * U256::from(3));
    let (mut storage, deployment) = setup(&config)?;
    let (alice, bob) = (Address::random(), Address::random());

    StorageCtx::enter(&mut storage, || {
        StorageCtx.set_balance(alice, ether(1))?;
        StorageCtx.set_balance(bob, ether(1))?;

        if bob_first {
            send_request(&deployment, bob, base_cost() * U256::from(3))?;
        }
        send_request(&deployment, alice, base_cost() * U256::from(2))?;
        // Reaching the cap exactly is accepted.
        send_request(&deployment, alice, base_cost())?;
        assert_eq!(
            send_request(&deployment, alice, base_cost()),
            Err(MailboxError::deposit_limit_exceeded().into())
        );
        if !bob_first {
            send_request(&deployment, bob, base_cost() * U256::from(3))?;
        }
        assert_eq!(deployment.total_priority_txs()?, U256::from(3));
        Ok(())
    })?;
    Ok(())
}

#[test]
fn test_closed_mailbox_rejects_everyone() -> eyre::Result<()> {
    let (mut storage, deployment) = setup(&default_test_config())?;
    let user = Address::random();

    StorageCtx::enter(&mut storage, || {
        StorageCtx.set_balance(user, ether(1))?;
        StorageCtx.set_balance(deployment.governor, ether(1))?;
        transact(
            deployment.governor,
            deployment.allow_list,
            U256::ZERO,
            U256::ZERO,
            &IAllowList::setAccessModeCall { target: deployment.diamond, accessMode: 0 },
        )?;

        for sender in [user, deployment.governor] {
            assert_eq!(
                send_request(&deployment, sender, base_cost()),
                Err(MailboxError::caller_not_allowed().into())
            );
        }
        Ok(())
    })?;
    Ok(())
}

#[test]
fn test_special_access_is_per_selector() -> eyre::Result<()> {
    let (mut storage, deployment) = setup(&default_test_config())?;
    let (granted, other_selector) = (Address::random(), Address::random());
    let stranger = Address::random();

    StorageCtx::enter(&mut storage, || {
        let admin = |call: &IAllowList::setPermissionToCallCall| {
            transact(deployment.governor, deployment.allow_list, U256::ZERO, U256::ZERO, call)
        };
        transact(
            deployment.governor,
            deployment.allow_list,
            U256::ZERO,
            U256::ZERO,
            &IAllowList::setAccessModeCall { target: deployment.diamond, accessMode: 1 },
        )?;
        admin(&IAllowList::setPermissionToCallCall {
            caller: granted,
            target: deployment.diamond,
            functionSig: IMailbox::requestL2TransactionCall::SELECTOR.into(),
            enable: true,
        })?;
        admin(&IAllowList::setPermissionToCallCall {
            caller: other_selector,
            target: deployment.diamond,
            functionSig: IMailbox::finalizeEthWithdrawalCall::SELECTOR.into(),
            enable: true,
        })?;

        for sender in [granted, other_selector, stranger] {
            StorageCtx.set_balance(sender, ether(1))?;
        }
        send_request(&deployment, granted, base_cost())?;
        for sender in [other_selector, stranger] {
            assert_eq!(
                send_request(&deployment, sender, base_cost()),
                Err(MailboxError::caller_not_allowed().into())
            );
        }
        Ok(())
    })?;
    Ok(())
}

#[test]
fn test_reverted_call_leaves_no_trace() -> eyre::Result<()> {
    let (mut storage, deployment) = setup(&default_test_config())?;
    let user = Address::random();
    StorageCtx::enter(&mut storage, || StorageCtx.set_balance(user, ether(1)))?;
    let logs_before = storage.logs().len();

    StorageCtx::enter(&mut storage, || {
        let mut call = request(&deployment, Address::ZERO);
        call.l2Value = ether(1);
        let result = transact(user, deployment.diamond, base_cost(), U256::from(GAS_PRICE), &call);
        assert_eq!(
            result,
            Err(MailboxError::msg_value_too_low(base_cost() + ether(1), base_cost()).into())
        );

        assert_eq!(StorageCtx.balance(user)?, ether(1));
        assert_eq!(StorageCtx.balance(deployment.diamond)?, U256::ZERO);
        assert_eq!(deployment.total_priority_txs()?, U256::ZERO);
        Ok(())
    })?;

    assert_eq!(storage.logs().len(), logs_before);
    Ok(())
}

#[test]
fn test_erc20_round_trip() -> eyre::Result<()> {
    let (mut storage, deployment) = setup(&default_test_config())?;
    let (user, receiver) = (Address::random(), Address::random());

    StorageCtx::enter(&mut storage, || {
        StorageCtx.set_balance(user, ether(1))?;
        TestnetErc20::at(deployment.token)
            .mint(IErc20::mintCall { to: user, amount: U256::from(1_000) })?;
        transact(
            user,
            deployment.token,
            U256::ZERO,
            U256::ZERO,
            &IErc20::approveCall { spender: deployment.bridge, amount: U256::from(1_000) },
        )?;

        let l2_tx_hash = transact(
            user,
            deployment.bridge,
            base_cost(),
            U256::from(GAS_PRICE),
            &IL1Bridge::depositCall {
                chainId: deployment.l2_chain_id(),
                l2Receiver: user,
                l1Token: deployment.token,
                amount: U256::from(600),
                l2TxGasLimit: U256::from(L2_GAS_LIMIT),
                l2TxGasPerPubdataByte: U256::from(REQUIRED_L2_GAS_PRICE_PER_PUBDATA),
                refundRecipient: Address::ZERO,
            },
        )?;

        // The L2 bridge later sends part of it back.
        let message: Bytes = Erc20Withdrawal {
            l1_receiver: receiver,
            l1_token: deployment.token,
            amount: U256::from(250),
        }
        .encode()
        .into();
        let log = L2ToL1Log::from_message(1, deployment.l2_bridge, &message);
        let tree = MerkleTree::l2_logs_tree(&[log.hash()]).unwrap();
        transact(
            deployment.validator,
            deployment.diamond,
            U256::ZERO,
            U256::ZERO,
            &IExecutor::executeBatchCall {
                batchNumber: U256::from(1),
                l2LogsTreeRoot: tree.root(),
                priorityOperationsProcessed: U256::from(1),
                priorityOperationsHash: priority_ops_hash([l2_tx_hash]),
            },
        )?;
        assert_eq!(deployment.mailbox().priority_queue_size()?, U256::ZERO);

        transact(
            receiver,
            deployment.bridge,
            U256::ZERO,
            U256::ZERO,
            &IL1Bridge::finalizeWithdrawalCall {
                chainId: deployment.l2_chain_id(),
                l2BatchNumber: U256::from(1),
                l2MessageIndex: U256::ZERO,
                l2TxNumberInBatch: 1,
                message,
                merkleProof: tree.proof(0).unwrap(),
            },
        )?;

        let mut token = TestnetErc20::at(deployment.token);
        assert_eq!(token.balance_of(user)?, U256::from(400));
        assert_eq!(token.balance_of(receiver)?, U256::from(250));
        assert_eq!(token.balance_of(deployment.bridge)?, U256::from(350));
        Ok(())
    })?;
    Ok(())
}

#[test]
fn test_bridge_is_gated_by_the_allow_list() -> eyre::Result<()> {
    let mut config = default_test_config();
    config.access_mode = AccessMode::Closed;
    let (mut storage, deployment) = setup(&config)?;
    let user = Address::random();

    StorageCtx::enter(&mut storage, || {
        let result = transact(
            user,
            deployment.bridge,
            U256::ZERO,
            U256::ZERO,
            &IL1Bridge::depositCall {
                chainId: deployment.l2_chain_id(),
                l2Receiver: user,
                l1Token: deployment.token,
                amount: U256::from(1),
                l2TxGasLimit: U256::from(L2_GAS_LIMIT),
                l2TxGasPerPubdataByte: U256::from(REQUIRED_L2_GAS_PRICE_PER_PUBDATA),
                refundRecipient: Address::ZERO,
            },
        );
        assert_eq!(result, Err(L1BridgeError::caller_not_allowed().into()));
        Ok(())
    })?;
    Ok(())
}
