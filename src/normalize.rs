//! Mapping from backend records to [`ListedSafeTx`] and [`SafeTx`].
//!
//! Pure functions, no I/O.

use ethers::types::{Address, H256};

use crate::{
    rpc::{
        gateway::{DetailedExecutionInfo, TxDetails, TxSummary, TX_STATUS_SUCCESS},
        msig_history::SafeMultisigTransactionResponse,
    },
    types::{ListedSafeTx, RawSafeTx, SafeTx},
};

/// Errors normalizing a backend record
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    /// Gateway id is not `{kind}_{address}_{safeTxHash}`
    #[error("malformed transaction id '{0}'")]
    MalformedId(String),
    /// Gateway record was not executed through the multisig
    #[error("transaction '{0}' has no multisig execution info")]
    NotMultisig(String),
}

/// Extract the safeTxHash from a gateway id, `multisig_{safe}_{safeTxHash}`.
///
/// Returns `None` when the id has fewer than three `_` segments or the third
/// segment is not a 32-byte hex hash.
pub fn safe_tx_hash_from_id(id: &str) -> Option<H256> {
    id.split('_').nth(2)?.parse().ok()
}

/// True iff the gateway status is exactly the success token
pub fn is_success(tx_status: &str) -> bool {
    tx_status == TX_STATUS_SUCCESS
}

/// Summary of a backend record
pub fn to_listed(raw: &RawSafeTx) -> Result<ListedSafeTx, NormalizeError> {
    match raw {
        RawSafeTx::Classic(tx) => Ok(classic_listed(tx)),
        RawSafeTx::Rootstock(tx) => summary_listed(tx),
        RawSafeTx::Gateway(tx) => gateway_detailed(tx).map(|tx| tx.to_listed()),
    }
}

/// Full record of a backend record
pub fn to_detailed(raw: &RawSafeTx) -> Result<SafeTx, NormalizeError> {
    match raw {
        RawSafeTx::Classic(tx) => Ok(classic_detailed(tx)),
        RawSafeTx::Rootstock(tx) => summary_detailed(tx),
        RawSafeTx::Gateway(tx) => gateway_detailed(tx),
    }
}

pub(crate) fn classic_listed(tx: &SafeMultisigTransactionResponse) -> ListedSafeTx {
    ListedSafeTx {
        safe_tx_hash: tx.safe_tx_hash,
        nonce: tx.nonce,
        confirmations: tx.confirmations.as_ref().map_or(0, |c| c.len() as u64),
        confirmations_required: tx.confirmations_required,
        is_executed: tx.is_executed,
    }
}

pub(crate) fn classic_detailed(tx: &SafeMultisigTransactionResponse) -> SafeTx {
    SafeTx {
        safe_tx_hash: tx.safe_tx_hash,
        nonce: tx.nonce,
        to: tx.to,
        operation: tx.operation,
        proposer: tx.proposer.unwrap_or_else(Address::zero),
        confirmations: tx
            .confirmations
            .iter()
            .flatten()
            .map(|c| c.owner)
            .collect(),
        confirmations_required: tx.confirmations_required,
        is_executed: tx.is_executed,
    }
}

pub(crate) fn summary_listed(tx: &TxSummary) -> Result<ListedSafeTx, NormalizeError> {
    let safe_tx_hash =
        safe_tx_hash_from_id(&tx.id).ok_or_else(|| NormalizeError::MalformedId(tx.id.clone()))?;
    Ok(ListedSafeTx {
        safe_tx_hash,
        nonce: tx.execution_info.nonce,
        confirmations: tx.execution_info.confirmations_submitted,
        confirmations_required: tx.execution_info.confirmations_required,
        is_executed: is_success(&tx.tx_status),
    })
}

/// Lossy: the gateway summary lists missing signers and a confirmation
/// count, never who confirmed. The proposer is reported as the only
/// confirmed signer once at least one confirmation was submitted. `operation`
/// is not exposed and reads as a plain call.
pub(crate) fn summary_detailed(tx: &TxSummary) -> Result<SafeTx, NormalizeError> {
    let listed = summary_listed(tx)?;
    let proposer = tx
        .tx_info
        .sender
        .map(Address::from)
        .unwrap_or_else(Address::zero);
    let confirmations = if listed.confirmations > 0 && !proposer.is_zero() {
        vec![proposer]
    } else {
        vec![]
    };
    Ok(SafeTx {
        safe_tx_hash: listed.safe_tx_hash,
        nonce: listed.nonce,
        to: tx.tx_info.destination().unwrap_or_else(Address::zero),
        operation: Default::default(),
        proposer,
        confirmations,
        confirmations_required: listed.confirmations_required,
        is_executed: listed.is_executed,
    })
}

pub(crate) fn gateway_detailed(tx: &TxDetails) -> Result<SafeTx, NormalizeError> {
    let info = match &tx.detailed_execution_info {
        Some(DetailedExecutionInfo::Multisig(info)) => info,
        _ => return Err(NormalizeError::NotMultisig(tx.tx_id.clone())),
    };
    let (to, operation) = match &tx.tx_data {
        Some(data) => (data.to.value, data.operation),
        None => (
            tx.tx_info.destination().unwrap_or_else(Address::zero),
            Default::default(),
        ),
    };
    Ok(SafeTx {
        safe_tx_hash: info.safe_tx_hash,
        nonce: info.nonce,
        to,
        operation,
        proposer: info
            .proposer
            .map(Address::from)
            .unwrap_or_else(Address::zero),
        confirmations: info.confirmations.iter().map(|c| c.signer.value).collect(),
        confirmations_required: info.confirmations_required,
        is_executed: is_success(&tx.tx_status),
    })
}

#[cfg(test)]
mod test {
    use chrono::Utc;

    use super::*;
    use crate::rpc::{
        common::{AddressEx, Operation},
        gateway::{
            ExecutionInfo, GatewayConfirmation, ModuleExecutionDetails, MultisigExecutionDetails,
            TxData, TxInfo,
        },
        msig_history::SafeMultisigConfirmationResponse,
    };

    fn addr(b: u8) -> Address {
        Address::repeat_byte(b)
    }

    fn confirmation(owner: Address) -> SafeMultisigConfirmationResponse {
        SafeMultisigConfirmationResponse {
            owner,
            submission_date: Utc::now(),
            transaction_hash: None,
            signature: "0x00".to_owned(),
            signature_type: Some("EOA".to_owned()),
        }
    }

    fn classic(confirmations: Option<Vec<SafeMultisigConfirmationResponse>>) -> RawSafeTx {
        RawSafeTx::Classic(SafeMultisigTransactionResponse {
            to: addr(0xaa),
            operation: Operation::DelegateCall,
            nonce: 12,
            execution_date: None,
            submission_date: None,
            transaction_hash: None,
            safe_tx_hash: H256::repeat_byte(0x11),
            is_executed: true,
            is_successful: Some(true),
            proposer: Some(addr(1)),
            confirmations_required: 2,
            confirmations,
        })
    }

    fn summary(id: &str, status: &str, submitted: u64, info: TxInfo) -> TxSummary {
        TxSummary {
            id: id.to_owned(),
            tx_status: status.to_owned(),
            timestamp: None,
            execution_info: ExecutionInfo {
                nonce: 7,
                confirmations_required: 3,
                confirmations_submitted: submitted,
                missing_signers: Some(vec![AddressEx { value: addr(9) }]),
            },
            tx_info: info,
        }
    }

    fn custom_info(to: Option<Address>, sender: Option<Address>) -> TxInfo {
        TxInfo {
            tx_type: "Custom".to_owned(),
            to: to.map(|value| AddressEx { value }),
            sender: sender.map(|value| AddressEx { value }),
            recipient: None,
            transfer_info: None,
        }
    }

    fn rootstock_id(hash: H256) -> String {
        format!("multisig_{:?}_{:?}", addr(0x38), hash)
    }

    #[test]
    fn classic_confirmation_count_matches_array() {
        for n in 0..4u8 {
            let raw = classic(Some((0..n).map(addr).map(confirmation).collect()));
            assert_eq!(to_listed(&raw).unwrap().confirmations, n as u64);
        }
        assert_eq!(to_listed(&classic(None)).unwrap().confirmations, 0);
    }

    #[test]
    fn classic_detailed_projects_fields() {
        let raw = classic(Some(vec![confirmation(addr(1)), confirmation(addr(2))]));
        let tx = to_detailed(&raw).unwrap();
        assert_eq!(tx.confirmations, vec![addr(1), addr(2)]);
        assert_eq!(tx.to, addr(0xaa));
        assert_eq!(tx.operation, Operation::DelegateCall);
        assert_eq!(tx.proposer, addr(1));
        assert_eq!(tx.nonce, 12);
        assert!(tx.is_executed);
        assert_eq!(tx.to_listed(), to_listed(&raw).unwrap());
    }

    #[test]
    fn it_extracts_hash_from_id() {
        let hash = H256::repeat_byte(0xcd);
        assert_eq!(safe_tx_hash_from_id(&rootstock_id(hash)), Some(hash));
        assert_eq!(safe_tx_hash_from_id("multisig_0x01"), None);
        assert_eq!(safe_tx_hash_from_id("multisig"), None);
        assert_eq!(safe_tx_hash_from_id("multisig_0x01_nothex"), None);
    }

    #[test]
    fn only_the_exact_success_token_is_executed() {
        assert!(is_success("SUCCESS"));
        for status in [
            "AWAITING_CONFIRMATIONS",
            "AWAITING_EXECUTION",
            "FAILED",
            "CANCELLED",
            "success",
            "SUCCESS ",
            "SOMETHING_NEW",
        ] {
            assert!(!is_success(status), "{}", status);
        }
    }

    #[test]
    fn summary_listed_uses_execution_info() {
        let hash = H256::repeat_byte(0x42);
        let raw = RawSafeTx::Rootstock(summary(
            &rootstock_id(hash),
            "SUCCESS",
            3,
            custom_info(None, None),
        ));
        let listed = to_listed(&raw).unwrap();
        assert_eq!(listed.safe_tx_hash, hash);
        assert_eq!(listed.nonce, 7);
        assert_eq!(listed.confirmations, 3);
        assert_eq!(listed.confirmations_required, 3);
        assert!(listed.is_executed);

        let bad = RawSafeTx::Rootstock(summary("multisig", "SUCCESS", 3, custom_info(None, None)));
        assert_eq!(
            to_listed(&bad),
            Err(NormalizeError::MalformedId("multisig".to_owned()))
        );
    }

    #[test]
    fn summary_detailed_approximates_signers() {
        let hash = H256::repeat_byte(0x42);
        let proposer = addr(5);

        let tx = to_detailed(&RawSafeTx::Rootstock(summary(
            &rootstock_id(hash),
            "AWAITING_CONFIRMATIONS",
            1,
            custom_info(Some(addr(0xaa)), Some(proposer)),
        )))
        .unwrap();
        assert_eq!(tx.confirmations, vec![proposer]);
        assert_eq!(tx.proposer, proposer);
        assert_eq!(tx.to, addr(0xaa));
        assert_eq!(tx.operation, Operation::Call);
        assert!(!tx.is_executed);

        let tx = to_detailed(&RawSafeTx::Rootstock(summary(
            &rootstock_id(hash),
            "AWAITING_CONFIRMATIONS",
            0,
            custom_info(None, Some(proposer)),
        )))
        .unwrap();
        assert!(tx.confirmations.is_empty());
        assert!(tx.to.is_zero());
    }

    #[test]
    fn gateway_detailed_reads_multisig_info() {
        let hash = H256::repeat_byte(0x33);
        let details = TxDetails {
            safe_address: addr(0x38),
            tx_id: rootstock_id(hash),
            tx_status: "AWAITING_EXECUTION".to_owned(),
            tx_hash: None,
            executed_at: None,
            tx_info: custom_info(Some(addr(0xbb)), None),
            tx_data: Some(TxData {
                to: AddressEx { value: addr(0xaa) },
                operation: Operation::DelegateCall,
                value: Some("0".to_owned()),
                hex_data: None,
            }),
            detailed_execution_info: Some(DetailedExecutionInfo::Multisig(
                MultisigExecutionDetails {
                    submitted_at: Some(1),
                    nonce: 4,
                    safe_tx_hash: hash,
                    signers: vec![AddressEx { value: addr(1) }, AddressEx { value: addr(2) }],
                    confirmations_required: 2,
                    confirmations: vec![GatewayConfirmation {
                        signer: AddressEx { value: addr(2) },
                        signature: None,
                        submitted_at: None,
                    }],
                    executor: None,
                    proposer: Some(AddressEx { value: addr(2) }),
                },
            )),
        };
        let raw = RawSafeTx::Gateway(details.clone());
        let tx = to_detailed(&raw).unwrap();
        assert_eq!(tx.safe_tx_hash, hash);
        assert_eq!(tx.to, addr(0xaa));
        assert_eq!(tx.operation, Operation::DelegateCall);
        assert_eq!(tx.confirmations, vec![addr(2)]);
        assert_eq!(tx.proposer, addr(2));
        assert!(!tx.is_executed);
        assert_eq!(to_listed(&raw).unwrap().confirmations, 1);

        let module = RawSafeTx::Gateway(TxDetails {
            detailed_execution_info: Some(DetailedExecutionInfo::Module(ModuleExecutionDetails {
                address: AddressEx { value: addr(3) },
            })),
            ..details
        });
        assert!(matches!(
            to_detailed(&module),
            Err(NormalizeError::NotMultisig(_))
        ));
    }
}
