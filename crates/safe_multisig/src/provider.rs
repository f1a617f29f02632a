use alloy_consensus::TxReceipt;
use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_provider::Provider;
use alloy_rpc_types::{TransactionReceipt, TransactionRequest};
use alloy_transport::Transport;
use async_trait::async_trait;

use std::{marker::PhantomData, time::Duration};

/// How long `wait_for_receipt` polls before giving up on inclusion.
const RECEIPT_POLL_ATTEMPTS: u32 = 60;
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("rpc transport error: {0}")]
    Transport(String),

    #[error("no signer configured for transaction submission")]
    NoSigner,

    #[error("transaction {0} was not included before the poll deadline")]
    ReceiptTimeout(B256),
}

/// A confirmed transaction, reduced to the fields the coordinator records.
#[derive(Debug, Clone)]
pub struct ExecutionReceipt {
    pub tx_hash: B256,
    pub block_number: Option<u64>,
    pub gas_used: u128,
    pub status: bool,
    pub logs: Vec<LogRecord>,
}

/// A single emitted log, kept raw so callers decode with their own interface.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

/// The node interface the coordinator consumes. Everything the coordinator
/// knows about the chain goes through this trait, which keeps the chain
/// mockable in tests.
#[async_trait]
pub trait EvmProvider: Send + Sync {
    /// Read-only contract call (`eth_call`).
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ProviderError>;

    /// Submit a transaction, returning its hash without waiting for inclusion.
    async fn send_transaction(
        &self,
        to: Address,
        data: Bytes,
        value: U256,
    ) -> Result<B256, ProviderError>;

    /// Block until the transaction is included and return its receipt.
    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<ExecutionReceipt, ProviderError>;

    /// Deployed bytecode at `address` (empty for externally-owned accounts).
    async fn get_code(&self, address: Address) -> Result<Bytes, ProviderError>;
}

/// [`EvmProvider`] implementation over an alloy provider stack. Submission
/// requires the wrapped provider to carry a wallet filler; otherwise
/// `send_transaction` surfaces the node's rejection as a transport error.
pub struct AlloyEvmProvider<T, P> {
    provider: P,
    _transport: PhantomData<T>,
}

impl<T, P> AlloyEvmProvider<T, P>
where
    T: Transport + Clone,
    P: Provider<T>,
{
    pub fn new(provider: P) -> Self {
        Self { provider, _transport: PhantomData }
    }
}

#[async_trait]
impl<T, P> EvmProvider for AlloyEvmProvider<T, P>
where
    T: Transport + Clone,
    P: Provider<T> + Send + Sync,
{
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ProviderError> {
        let mut req = TransactionRequest::default().to(to);
        req.set_input(data);

        self.provider
            .call(&req)
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))
    }

    async fn send_transaction(
        &self,
        to: Address,
        data: Bytes,
        value: U256,
    ) -> Result<B256, ProviderError> {
        let mut req = TransactionRequest::default().to(to).value(value);
        req.set_input(data);

        let pending = self
            .provider
            .send_transaction(req)
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        Ok(*pending.tx_hash())
    }

    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<ExecutionReceipt, ProviderError> {
        for _ in 0..RECEIPT_POLL_ATTEMPTS {
            let receipt = self
                .provider
                .get_transaction_receipt(tx_hash)
                .await
                .map_err(|e| ProviderError::Transport(e.to_string()))?;

            if let Some(receipt) = receipt {
                return Ok(into_execution_receipt(receipt));
            }

            tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
        }

        Err(ProviderError::ReceiptTimeout(tx_hash))
    }

    async fn get_code(&self, address: Address) -> Result<Bytes, ProviderError> {
        self.provider
            .get_code_at(address)
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))
    }
}

fn into_execution_receipt(receipt: TransactionReceipt) -> ExecutionReceipt {
    let logs = receipt
        .inner
        .logs()
        .iter()
        .map(|log| LogRecord {
            address: log.inner.address,
            topics: log.inner.data.topics().to_vec(),
            data: log.inner.data.data.clone(),
        })
        .collect();

    ExecutionReceipt {
        tx_hash: receipt.transaction_hash,
        block_number: receipt.block_number,
        gas_used: receipt.gas_used.into(),
        status: receipt.status(),
        logs,
    }
}
