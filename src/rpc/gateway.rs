use ethers::types::{Address, H256};
use reqwest::Url;

use super::common::{AddressEx, Operation};

/// Status token the gateway uses for an executed, successful transaction
pub const TX_STATUS_SUCCESS: &str = "SUCCESS";

/// One page of gateway results
#[derive(serde::Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GatewayPage<T> {
    #[serde(default, deserialize_with = "super::common::page_url")]
    pub next: Option<Url>,
    #[serde(default, deserialize_with = "super::common::page_url")]
    pub previous: Option<Url>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// Gateway lists interleave transactions with labels and conflict headers
#[derive(serde::Deserialize, Clone, Debug)]
#[serde(tag = "type")]
pub enum GatewayListItem {
    /// A transaction summary
    #[serde(rename = "TRANSACTION")]
    Transaction(TransactionItem),
    /// Anything else (`LABEL`, `DATE_LABEL`, `CONFLICT_HEADER`, ...)
    #[serde(other)]
    Other,
}

impl GatewayListItem {
    /// The transaction summary, if this item is one
    pub fn into_transaction(self) -> Option<TxSummary> {
        match self {
            Self::Transaction(item) => Some(item.transaction),
            Self::Other => None,
        }
    }
}

/// Transaction item payload
#[derive(serde::Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TransactionItem {
    pub transaction: TxSummary,
    #[serde(default)]
    pub conflict_type: Option<String>,
}

/// Page of the gateway multisig-transaction list
pub type GatewayHistoryResponse = GatewayPage<GatewayListItem>;

/// Transaction summary as listed by a gateway-style host.
///
/// `id` is a composite of the form `multisig_{safe}_{safeTxHash}`.
#[derive(serde::Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TxSummary {
    pub id: String,
    pub tx_status: String,
    #[serde(default)]
    pub timestamp: Option<i64>,
    pub execution_info: ExecutionInfo,
    pub tx_info: TxInfo,
}

/// Signature progress of a listed transaction
#[derive(serde::Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionInfo {
    pub nonce: u64,
    pub confirmations_required: u64,
    pub confirmations_submitted: u64,
    #[serde(default)]
    pub missing_signers: Option<Vec<AddressEx>>,
}

/// Decoded transaction info. Which address fields are populated depends on
/// `type` (`Custom` carries `to`, `Transfer` carries `sender`/`recipient`).
#[derive(serde::Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TxInfo {
    #[serde(rename = "type")]
    pub tx_type: String,
    #[serde(default)]
    pub to: Option<AddressEx>,
    #[serde(default)]
    pub sender: Option<AddressEx>,
    #[serde(default)]
    pub recipient: Option<AddressEx>,
    #[serde(default)]
    pub transfer_info: Option<serde_json::Value>,
}

impl TxInfo {
    /// Destination of the call, if the info carries one
    pub fn destination(&self) -> Option<Address> {
        self.to.or(self.recipient).map(Into::into)
    }
}

/// Full transaction record from `v1/chains/{chainId}/transactions/{id}`
#[derive(serde::Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TxDetails {
    pub safe_address: Address,
    pub tx_id: String,
    pub tx_status: String,
    #[serde(default)]
    pub tx_hash: Option<H256>,
    #[serde(default)]
    pub executed_at: Option<i64>,
    pub tx_info: TxInfo,
    #[serde(default)]
    pub tx_data: Option<TxData>,
    #[serde(default)]
    pub detailed_execution_info: Option<DetailedExecutionInfo>,
}

/// Call data of a transaction
#[derive(serde::Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TxData {
    pub to: AddressEx,
    #[serde(default)]
    pub operation: Operation,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub hex_data: Option<String>,
}

/// Execution details, tagged by `type`
#[derive(serde::Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DetailedExecutionInfo {
    /// Executed or pending through the multisig
    Multisig(MultisigExecutionDetails),
    /// Executed by a module, no signatures involved
    Module(ModuleExecutionDetails),
}

/// Multisig execution details
#[derive(serde::Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MultisigExecutionDetails {
    #[serde(default)]
    pub submitted_at: Option<i64>,
    pub nonce: u64,
    pub safe_tx_hash: H256,
    #[serde(default)]
    pub signers: Vec<AddressEx>,
    pub confirmations_required: u64,
    #[serde(default)]
    pub confirmations: Vec<GatewayConfirmation>,
    #[serde(default)]
    pub executor: Option<AddressEx>,
    #[serde(default)]
    pub proposer: Option<AddressEx>,
}

/// Module execution details
#[derive(serde::Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ModuleExecutionDetails {
    pub address: AddressEx,
}

/// A signer's confirmation, gateway flavor
#[derive(serde::Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfirmation {
    pub signer: AddressEx,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<i64>,
}

/// `GET v1/chains/{chainId}/safes/{address}/multisig-transactions`
pub struct GatewayHistoryRequest;

impl GatewayHistoryRequest {
    /// Return the URL to which to dispatch this request
    pub fn url(root: &Url, chain_id: u64, address: Address) -> Url {
        let path = format!(
            "v1/chains/{}/safes/{}/multisig-transactions",
            chain_id,
            ethers::utils::to_checksum(&address, None)
        );
        let mut url = root.clone();
        url.set_path(&path);
        url
    }
}

/// `GET v1/chains/{chainId}/transactions/{id}`
pub struct GatewayTransactionRequest;

impl GatewayTransactionRequest {
    /// Return the URL to which to dispatch this request
    pub fn url(root: &Url, chain_id: u64, safe_tx_hash: H256) -> Url {
        let path = format!("v1/chains/{}/transactions/{:?}", chain_id, safe_tx_hash);
        let mut url = root.clone();
        url.set_path(&path);
        url
    }
}
