use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::{SolCall, SolEvent, SolValue};
use async_trait::async_trait;
use parking_lot::Mutex;
use poolsafe_coordinator::{CallSpec, MultisigService, ProposeRequest};
use poolsafe_store::{
    MemoryStore, SignatureEntry, TransactionKind, TransactionRecord, TransactionStatus,
    TransactionStore,
};
use safe_multisig::{
    contracts::{pool_factory::PoolFactory, safe::Safe},
    provider::{EvmProvider, ExecutionReceipt, LogRecord, ProviderError},
    transaction_data::{OperationType, SafeTransactionData},
    verify::EIP1271_MAGIC_VALUE,
};

use std::{collections::BTreeMap, sync::Arc};

const SAFE: Address = Address::repeat_byte(0x5a);
const SAFE_TX_HASH: B256 = B256::repeat_byte(0xab);
const EXECUTION_TX_HASH: B256 = B256::repeat_byte(0xee);

/// Scripted chain state standing in for the node provider.
struct ScriptedChain {
    threshold: U256,
    owners: Vec<Address>,
    nonce: U256,
    receipt_status: bool,
    logs: Vec<LogRecord>,
    submissions: Mutex<Vec<(Address, Bytes)>>,
}

impl ScriptedChain {
    fn new(threshold: u64, owners: Vec<Address>) -> Self {
        Self {
            threshold: U256::from(threshold),
            owners,
            nonce: U256::from(4),
            receipt_status: true,
            logs: Vec::new(),
            submissions: Mutex::new(Vec::new()),
        }
    }

    fn submission_count(&self) -> usize {
        self.submissions.lock().len()
    }
}

#[async_trait]
impl EvmProvider for ScriptedChain {
    async fn call(&self, _to: Address, data: Bytes) -> Result<Bytes, ProviderError> {
        let data = data.as_ref();
        if data[..4] == Safe::VERSIONCall::SELECTOR {
            Ok("1.3.0".to_string().abi_encode().into())
        } else if data[..4] == Safe::getThresholdCall::SELECTOR {
            Ok(self.threshold.abi_encode().into())
        } else if data[..4] == Safe::getOwnersCall::SELECTOR {
            Ok(self.owners.abi_encode().into())
        } else if data[..4] == Safe::isOwnerCall::SELECTOR {
            let owner = Safe::isOwnerCall::abi_decode(data, true).unwrap().owner;
            Ok(self.owners.contains(&owner).abi_encode().into())
        } else if data[..4] == Safe::nonceCall::SELECTOR {
            Ok(self.nonce.abi_encode().into())
        } else if data[..4] == Safe::getTransactionHashCall::SELECTOR {
            Ok(SAFE_TX_HASH.abi_encode().into())
        } else if data[..4] == Safe::isValidSignatureCall::SELECTOR {
            Ok(EIP1271_MAGIC_VALUE.abi_encode().into())
        } else {
            Err(ProviderError::Transport("unexpected call".to_string()))
        }
    }

    async fn send_transaction(
        &self,
        to: Address,
        data: Bytes,
        _value: U256,
    ) -> Result<B256, ProviderError> {
        self.submissions.lock().push((to, data));
        Ok(EXECUTION_TX_HASH)
    }

    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<ExecutionReceipt, ProviderError> {
        Ok(ExecutionReceipt {
            tx_hash,
            block_number: Some(123),
            gas_used: 84_000,
            status: self.receipt_status,
            logs: self.logs.clone(),
        })
    }

    async fn get_code(&self, _address: Address) -> Result<Bytes, ProviderError> {
        Ok(Bytes::new())
    }
}

fn service_with(chain: Arc<ScriptedChain>) -> (MultisigService, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (MultisigService::new(store.clone(), chain), store)
}

fn propose_request(kind: TransactionKind) -> ProposeRequest {
    ProposeRequest {
        safe_address: SAFE,
        chain_id: 1,
        kind,
        description: "deploy usdc lending pool".to_string(),
        metadata: BTreeMap::new(),
        call: CallSpec::Raw {
            to: Address::repeat_byte(0x22),
            value: U256::ZERO,
            data: Bytes::from(vec![0x01, 0x02, 0x03]),
        },
        created_by: "user-1".to_string(),
    }
}

fn sig_for(signer: &PrivateKeySigner, hash: B256) -> Bytes {
    Bytes::from(signer.sign_hash_sync(&hash).unwrap().as_bytes().to_vec())
}

#[tokio::test]
async fn two_of_three_lifecycle() {
    let s1 = PrivateKeySigner::random();
    let s2 = PrivateKeySigner::random();
    let s3 = PrivateKeySigner::random();
    let chain = Arc::new(ScriptedChain::new(
        2,
        vec![s1.address(), s2.address(), s3.address()],
    ));
    let (service, _) = service_with(chain.clone());

    let record = service
        .propose_transaction(propose_request(TransactionKind::Generic))
        .await
        .unwrap();
    assert_eq!(record.transaction_hash, SAFE_TX_HASH);
    assert_eq!(record.status, TransactionStatus::PendingSignatures);
    assert_eq!(record.required_signatures, 2);
    assert_eq!(record.tx.nonce, U256::from(4));

    let hash = record.transaction_hash.to_string();

    let first = service
        .add_signature(&hash, s1.address(), sig_for(&s1, SAFE_TX_HASH))
        .await
        .unwrap();
    assert_eq!(first.current_signatures, 1);
    assert_eq!(first.required_signatures, 2);
    assert!(!first.ready_to_execute);

    let second = service
        .add_signature(&hash, s2.address(), sig_for(&s2, SAFE_TX_HASH))
        .await
        .unwrap();
    assert_eq!(second.current_signatures, 2);
    assert!(second.ready_to_execute);

    let result = service.execute_transaction(&hash).await.unwrap();
    assert_eq!(result.status, TransactionStatus::Executed);
    assert_eq!(result.execution_tx_hash, EXECUTION_TX_HASH);
    assert_eq!(result.block_number, Some(123));

    let err = service.execute_transaction(&hash).await.unwrap_err();
    assert_eq!(err.code(), "already-executed");
    assert_eq!(chain.submission_count(), 1, "must never double-submit");
}

#[tokio::test]
async fn identical_proposal_is_idempotent() {
    let s1 = PrivateKeySigner::random();
    let chain = Arc::new(ScriptedChain::new(2, vec![s1.address()]));
    let (service, _store) = service_with(chain);

    let first = service
        .propose_transaction(propose_request(TransactionKind::Generic))
        .await
        .unwrap();
    let hash = first.transaction_hash.to_string();

    service
        .add_signature(&hash, s1.address(), sig_for(&s1, SAFE_TX_HASH))
        .await
        .unwrap();

    let second = service
        .propose_transaction(propose_request(TransactionKind::Generic))
        .await
        .unwrap();
    assert_eq!(second.transaction_hash, first.transaction_hash);
    // the pending record survived, including its collected signature
    assert_eq!(second.current_signatures, 1);

    let page = service
        .list_transactions(&Default::default(), &Default::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
}

#[tokio::test]
async fn duplicate_signer_is_reported_not_silently_dropped() {
    let s1 = PrivateKeySigner::random();
    let chain = Arc::new(ScriptedChain::new(2, vec![s1.address()]));
    let (service, store) = service_with(chain);

    let record = service
        .propose_transaction(propose_request(TransactionKind::Generic))
        .await
        .unwrap();
    let hash = record.transaction_hash.to_string();

    service
        .add_signature(&hash, s1.address(), sig_for(&s1, SAFE_TX_HASH))
        .await
        .unwrap();
    let err = service
        .add_signature(&hash, s1.address(), sig_for(&s1, SAFE_TX_HASH))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "already-signed");

    let stored = store.get(&SAFE_TX_HASH).await.unwrap().unwrap();
    assert_eq!(stored.signatures.len(), 1);
}

#[tokio::test]
async fn non_owner_is_permission_denied() {
    let owner = PrivateKeySigner::random();
    let intruder = PrivateKeySigner::random();
    let chain = Arc::new(ScriptedChain::new(2, vec![owner.address()]));
    let (service, _) = service_with(chain);

    let record = service
        .propose_transaction(propose_request(TransactionKind::Generic))
        .await
        .unwrap();
    let hash = record.transaction_hash.to_string();

    let err = service
        .add_signature(&hash, intruder.address(), sig_for(&intruder, SAFE_TX_HASH))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "not-an-owner");
}

#[tokio::test]
async fn signature_over_wrong_message_is_invalid() {
    let s1 = PrivateKeySigner::random();
    let chain = Arc::new(ScriptedChain::new(2, vec![s1.address()]));
    let (service, _) = service_with(chain);

    let record = service
        .propose_transaction(propose_request(TransactionKind::Generic))
        .await
        .unwrap();
    let hash = record.transaction_hash.to_string();

    let wrong_message = B256::repeat_byte(0xcd);
    let err = service
        .add_signature(&hash, s1.address(), sig_for(&s1, wrong_message))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "invalid-signature");
}

#[tokio::test]
async fn bundle_is_ordered_by_signer_regardless_of_submission_order() {
    let a = PrivateKeySigner::random();
    let b = PrivateKeySigner::random();
    let (low, high) = if a.address() < b.address() { (a, b) } else { (b, a) };

    let chain = Arc::new(ScriptedChain::new(2, vec![low.address(), high.address()]));
    let (service, _) = service_with(chain.clone());

    let record = service
        .propose_transaction(propose_request(TransactionKind::Generic))
        .await
        .unwrap();
    let hash = record.transaction_hash.to_string();

    // higher address signs first
    service
        .add_signature(&hash, high.address(), sig_for(&high, SAFE_TX_HASH))
        .await
        .unwrap();
    service
        .add_signature(&hash, low.address(), sig_for(&low, SAFE_TX_HASH))
        .await
        .unwrap();
    service.execute_transaction(&hash).await.unwrap();

    let submissions = chain.submissions.lock();
    let (to, calldata) = &submissions[0];
    assert_eq!(*to, SAFE);

    let decoded = Safe::execTransactionCall::abi_decode(calldata, true).unwrap();
    let low_sig = sig_for(&low, SAFE_TX_HASH);
    let high_sig = sig_for(&high, SAFE_TX_HASH);
    assert_eq!(&decoded.signatures[..65], low_sig.as_ref());
    assert_eq!(&decoded.signatures[65..130], high_sig.as_ref());
}

#[tokio::test]
async fn execute_below_quorum_never_submits() {
    let s1 = PrivateKeySigner::random();
    let s2 = PrivateKeySigner::random();
    let s3 = PrivateKeySigner::random();
    let chain = Arc::new(ScriptedChain::new(
        3,
        vec![s1.address(), s2.address(), s3.address()],
    ));
    let (service, _) = service_with(chain.clone());

    let record = service
        .propose_transaction(propose_request(TransactionKind::Generic))
        .await
        .unwrap();
    let hash = record.transaction_hash.to_string();

    service
        .add_signature(&hash, s1.address(), sig_for(&s1, SAFE_TX_HASH))
        .await
        .unwrap();
    service
        .add_signature(&hash, s2.address(), sig_for(&s2, SAFE_TX_HASH))
        .await
        .unwrap();

    let err = service.execute_transaction(&hash).await.unwrap_err();
    assert_eq!(err.code(), "not-ready");
    assert_eq!(chain.submission_count(), 0);
}

#[tokio::test]
async fn inconsistent_ready_record_is_caught_before_submission() {
    let chain = Arc::new(ScriptedChain::new(3, vec![]));
    let (service, store) = service_with(chain.clone());

    // A ready record below quorum can only come from a store
    // inconsistency; craft one directly.
    let tx = SafeTransactionData::new(
        Address::repeat_byte(0x22),
        U256::ZERO,
        Bytes::new(),
        OperationType::Call,
        U256::ZERO,
    );
    let mut record = TransactionRecord::new(
        SAFE_TX_HASH,
        SAFE,
        1,
        TransactionKind::Generic,
        String::new(),
        BTreeMap::new(),
        tx,
        3,
        "user-1".to_string(),
        chrono::Utc::now(),
    );
    record.status = TransactionStatus::ReadyToExecute;
    record.signatures.push(SignatureEntry {
        signer: Address::repeat_byte(0x01),
        data: Bytes::from(vec![0u8; 65]),
        signed_at: chrono::Utc::now(),
    });
    record.current_signatures = 1;
    store.insert(record).await.unwrap();

    let err = service
        .execute_transaction(&SAFE_TX_HASH.to_string())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "insufficient-signatures");
    assert_eq!(chain.submission_count(), 0);
}

#[tokio::test]
async fn reverted_execution_is_recorded_as_failed() {
    let s1 = PrivateKeySigner::random();
    let mut chain = ScriptedChain::new(1, vec![s1.address()]);
    chain.receipt_status = false;
    let chain = Arc::new(chain);
    let (service, store) = service_with(chain.clone());

    let record = service
        .propose_transaction(propose_request(TransactionKind::Generic))
        .await
        .unwrap();
    let hash = record.transaction_hash.to_string();

    service
        .add_signature(&hash, s1.address(), sig_for(&s1, SAFE_TX_HASH))
        .await
        .unwrap();

    let err = service.execute_transaction(&hash).await.unwrap_err();
    assert_eq!(err.code(), "execution-failed");

    let stored = store.get(&SAFE_TX_HASH).await.unwrap().unwrap();
    assert_eq!(stored.status, TransactionStatus::Failed);
    assert!(stored.failure_reason.is_some());
    let partial = stored.execution.unwrap();
    assert_eq!(partial.execution_tx_hash, Some(EXECUTION_TX_HASH));
    assert_eq!(partial.gas_used, Some(84_000));

    // failed is terminal, a retry needs a new proposal
    let err = service.execute_transaction(&hash).await.unwrap_err();
    assert_eq!(err.code(), "not-ready");
}

#[tokio::test]
async fn pool_creation_result_is_parsed_from_logs() {
    let s1 = PrivateKeySigner::random();
    let pool = Address::repeat_byte(0x90);
    let asset = Address::repeat_byte(0x91);

    let mut chain = ScriptedChain::new(1, vec![s1.address()]);
    chain.logs = vec![LogRecord {
        address: Address::repeat_byte(0xfa),
        topics: vec![
            PoolFactory::PoolCreated::SIGNATURE_HASH,
            B256::from(U256::from(7)),
        ],
        data: Bytes::from((pool, asset).abi_encode()),
    }];
    let chain = Arc::new(chain);
    let (service, store) = service_with(chain);

    let record = service
        .propose_transaction(propose_request(TransactionKind::PoolCreation))
        .await
        .unwrap();
    let hash = record.transaction_hash.to_string();

    service
        .add_signature(&hash, s1.address(), sig_for(&s1, SAFE_TX_HASH))
        .await
        .unwrap();

    let result = service.execute_transaction(&hash).await.unwrap();
    assert_eq!(result.pool_id, Some(U256::from(7)));
    assert_eq!(result.pool_address, Some(pool));

    let stored = store.get(&SAFE_TX_HASH).await.unwrap().unwrap();
    let info = stored.execution.unwrap();
    assert_eq!(info.pool_id, Some(U256::from(7)));
    assert_eq!(info.pool_address, Some(pool));
}

#[tokio::test]
async fn unparseable_logs_do_not_fail_a_confirmed_execution() {
    let s1 = PrivateKeySigner::random();
    let chain = Arc::new(ScriptedChain::new(1, vec![s1.address()]));
    let (service, _) = service_with(chain);

    let record = service
        .propose_transaction(propose_request(TransactionKind::PoolCreation))
        .await
        .unwrap();
    let hash = record.transaction_hash.to_string();

    service
        .add_signature(&hash, s1.address(), sig_for(&s1, SAFE_TX_HASH))
        .await
        .unwrap();

    // no PoolCreated event in the receipt, execution still completes
    let result = service.execute_transaction(&hash).await.unwrap();
    assert_eq!(result.status, TransactionStatus::Executed);
    assert_eq!(result.pool_id, None);
}

#[tokio::test]
async fn pending_record_read_past_deadline_expires() {
    let chain = Arc::new(ScriptedChain::new(2, vec![]));
    let (service, store) = service_with(chain);

    let tx = SafeTransactionData::new(
        Address::repeat_byte(0x22),
        U256::ZERO,
        Bytes::new(),
        OperationType::Call,
        U256::ZERO,
    );
    let stale_start = chrono::Utc::now() - chrono::Duration::days(8);
    let record = TransactionRecord::new(
        SAFE_TX_HASH,
        SAFE,
        1,
        TransactionKind::Generic,
        String::new(),
        BTreeMap::new(),
        tx,
        2,
        "user-1".to_string(),
        stale_start,
    );
    store.insert(record).await.unwrap();

    let read = service
        .get_transaction_status(&SAFE_TX_HASH.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(read.status, TransactionStatus::Expired);

    let persisted = store.get(&SAFE_TX_HASH).await.unwrap().unwrap();
    assert_eq!(persisted.status, TransactionStatus::Expired);
}

#[tokio::test]
async fn malformed_hash_is_rejected_before_any_io() {
    let chain = Arc::new(ScriptedChain::new(2, vec![]));
    let (service, _) = service_with(chain);

    let err = service.get_transaction_status("0x1234").await.unwrap_err();
    assert_eq!(err.code(), "invalid-hash");

    let err = service
        .add_signature("not-a-hash", Address::ZERO, Bytes::new())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "invalid-hash");

    let err = service.execute_transaction("0xzz").await.unwrap_err();
    assert_eq!(err.code(), "invalid-hash");
}

#[tokio::test]
async fn unknown_hash_is_not_found() {
    let chain = Arc::new(ScriptedChain::new(2, vec![]));
    let (service, _) = service_with(chain);

    let missing = B256::repeat_byte(0x01).to_string();
    assert!(service.get_transaction_status(&missing).await.unwrap().is_none());

    let err = service.execute_transaction(&missing).await.unwrap_err();
    assert_eq!(err.code(), "not-found");
}
