use chrono::{DateTime, Utc};
use ethers::types::{Address, H256};
use reqwest::Url;

use super::common::Operation;

/// A signer's confirmation, as returned by the transaction service
#[derive(serde::Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SafeMultisigConfirmationResponse {
    pub owner: Address,
    pub submission_date: DateTime<Utc>,
    #[serde(default)]
    pub transaction_hash: Option<H256>,
    pub signature: String,
    #[serde(default)]
    pub signature_type: Option<String>,
}

/// A multisig transaction, as returned by the transaction service.
///
/// Only the fields the feed needs are decoded, everything else in the
/// payload is ignored.
#[derive(serde::Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SafeMultisigTransactionResponse {
    pub to: Address,
    #[serde(default)]
    pub operation: Operation,
    pub nonce: u64,
    #[serde(default)]
    pub execution_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub submission_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub transaction_hash: Option<H256>,
    pub safe_tx_hash: H256,
    pub is_executed: bool,
    #[serde(default)]
    pub is_successful: Option<bool>,
    /// Absent on transactions proposed before the service tracked it
    #[serde(default)]
    pub proposer: Option<Address>,
    pub confirmations_required: u64,
    #[serde(default)]
    pub confirmations: Option<Vec<SafeMultisigConfirmationResponse>>,
}

/// One page of multisig history
#[derive(serde::Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MsigHistoryResponse {
    #[serde(default)]
    pub count: u64,
    #[serde(default, deserialize_with = "super::common::page_url")]
    pub next: Option<Url>,
    #[serde(default, deserialize_with = "super::common::page_url")]
    pub previous: Option<Url>,
    #[serde(default)]
    pub results: Vec<SafeMultisigTransactionResponse>,
}

/// `GET api/v1/safes/{address}/multisig-transactions/`
pub struct MsigHistoryRequest;

impl MsigHistoryRequest {
    /// Return the URL to which to dispatch this request
    pub fn url(root: &Url, address: Address) -> Url {
        let path = format!(
            "api/v1/safes/{}/multisig-transactions/",
            ethers::utils::to_checksum(&address, None)
        );
        let mut url = root.clone();
        url.set_path(&path);
        url
    }
}

/// `GET api/v1/safes/{address}/multisig-transactions/{safe_tx_hash}`
pub struct MsigTransactionRequest;

impl MsigTransactionRequest {
    /// Return the URL to which to dispatch this request
    pub fn url(root: &Url, address: Address, safe_tx_hash: H256) -> Url {
        let path = format!(
            "api/v1/safes/{}/multisig-transactions/{:?}",
            ethers::utils::to_checksum(&address, None),
            safe_tx_hash
        );
        let mut url = root.clone();
        url.set_path(&path);
        url
    }
}

#[cfg(test)]
mod test {
    use super::*;

    pub(crate) const PAGE: &str = r#"{
        "count": 2,
        "next": "https://safe-transaction-mainnet.safe.global/api/v1/safes/0x38CD8Fa77ECEB4b1edB856Ed27aac6A6c6Dc88ca/multisig-transactions/?limit=1&offset=1",
        "previous": null,
        "results": [{
            "safe": "0x38CD8Fa77ECEB4b1edB856Ed27aac6A6c6Dc88ca",
            "to": "0xD5F586B9b2abbbb9a9ffF936690A54F9849dbC97",
            "value": "381832418",
            "data": "0xdeadbeefdeadbeef",
            "operation": 1,
            "nonce": 3,
            "executionDate": null,
            "submissionDate": "2022-11-21T16:18:24.178813Z",
            "modified": "2022-11-21T16:18:24.178813Z",
            "transactionHash": null,
            "safeTxHash": "0x8c2d7f1b8cc1a0e0b0e1e0b3b0e2d4a5f1c3e5d7b9a1c3e5f7091b2d3f4a5b6c",
            "isExecuted": false,
            "isSuccessful": null,
            "proposer": "0xD5F586B9b2abbbb9a9ffF936690A54F9849dbC97",
            "confirmationsRequired": 2,
            "confirmations": [{
                "owner": "0xD5F586B9b2abbbb9a9ffF936690A54F9849dbC97",
                "submissionDate": "2022-11-21T16:18:24.212345Z",
                "transactionHash": null,
                "signature": "0x00",
                "signatureType": "EOA"
            }],
            "trusted": true,
            "signatures": null
        }]
    }"#;

    #[test]
    fn it_decodes_a_page() {
        let page: MsigHistoryResponse = serde_json::from_str(PAGE).unwrap();
        assert_eq!(page.count, 2);
        assert!(page.next.is_some());
        assert!(page.previous.is_none());
        let tx = &page.results[0];
        assert_eq!(tx.nonce, 3);
        assert_eq!(tx.operation, Operation::DelegateCall);
        assert!(tx.execution_date.is_none());
        assert_eq!(tx.confirmations.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn it_builds_urls() {
        let root: Url = "https://safe-transaction-mainnet.safe.global".parse().unwrap();
        let safe: Address = "0x38cd8fa77eceb4b1edb856ed27aac6a6c6dc88ca".parse().unwrap();
        assert_eq!(
            MsigHistoryRequest::url(&root, safe).as_str(),
            "https://safe-transaction-mainnet.safe.global/api/v1/safes/0x38CD8Fa77ECEB4b1edB856Ed27aac6A6c6Dc88ca/multisig-transactions/"
        );
        let hash = H256::repeat_byte(0xab);
        assert_eq!(
            MsigTransactionRequest::url(&root, safe, hash).as_str(),
            format!(
                "https://safe-transaction-mainnet.safe.global/api/v1/safes/0x38CD8Fa77ECEB4b1edB856Ed27aac6A6c6Dc88ca/multisig-transactions/0x{}",
                "ab".repeat(32)
            )
        );
    }
}
