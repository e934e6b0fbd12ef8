use ethers::types::{Address, H256};

use crate::rpc::{
    common::{ChecksumAddress, Operation},
    gateway::{TxDetails, TxSummary},
    msig_history::SafeMultisigTransactionResponse,
};

/// Summary of a multisig transaction
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct ListedSafeTx {
    /// Content hash identifying the transaction
    pub safe_tx_hash: H256,
    /// Safe nonce
    pub nonce: u64,
    /// Number of signatures collected so far. May exceed
    /// `confirmations_required` once executed
    pub confirmations: u64,
    /// Signature threshold
    pub confirmations_required: u64,
    /// Whether the transaction was executed successfully
    pub is_executed: bool,
}

/// Full multisig transaction record.
///
/// Generic over the address representation, see [`SafeTx::map_addresses`].
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct SafeTx<A = Address> {
    /// Content hash identifying the transaction
    pub safe_tx_hash: H256,
    /// Safe nonce
    pub nonce: u64,
    /// Destination of the call
    pub to: A,
    /// Call kind
    pub operation: Operation,
    /// Address that first submitted the transaction
    pub proposer: A,
    /// Signers that confirmed, in backend order
    pub confirmations: Vec<A>,
    /// Signature threshold
    pub confirmations_required: u64,
    /// Whether the transaction was executed successfully
    pub is_executed: bool,
}

impl SafeTx<Address> {
    /// The "no data" value returned when a transaction cannot be located.
    ///
    /// Zero addresses, no confirmations, zero nonce and threshold. Check with
    /// [`SafeTx::is_not_found`] rather than comparing fields.
    pub fn not_found(safe_tx_hash: H256) -> Self {
        Self {
            safe_tx_hash,
            nonce: 0,
            to: Address::zero(),
            operation: Operation::Call,
            proposer: Address::zero(),
            confirmations: vec![],
            confirmations_required: 0,
            is_executed: false,
        }
    }

    /// True if this is the [`SafeTx::not_found`] value
    pub fn is_not_found(&self) -> bool {
        self.nonce == 0 && self.confirmations_required == 0 && self.proposer.is_zero()
    }

    /// Checksummed view, for display and serialization
    pub fn checksummed(self) -> SafeTx<ChecksumAddress> {
        self.map_addresses(ChecksumAddress::from)
    }
}

impl<A> SafeTx<A> {
    /// Convert every address to another representation
    pub fn map_addresses<B, F>(self, mut f: F) -> SafeTx<B>
    where
        F: FnMut(A) -> B,
    {
        SafeTx {
            safe_tx_hash: self.safe_tx_hash,
            nonce: self.nonce,
            to: f(self.to),
            operation: self.operation,
            proposer: f(self.proposer),
            confirmations: self.confirmations.into_iter().map(&mut f).collect(),
            confirmations_required: self.confirmations_required,
            is_executed: self.is_executed,
        }
    }

    /// Drop the signer list, keeping its length
    pub fn to_listed(&self) -> ListedSafeTx {
        ListedSafeTx {
            safe_tx_hash: self.safe_tx_hash,
            nonce: self.nonce,
            confirmations: self.confirmations.len() as u64,
            confirmations_required: self.confirmations_required,
            is_executed: self.is_executed,
        }
    }
}

/// Backend record, tagged by the wire shape it came in.
///
/// Never leaves the backend clients. Normalize with
/// [`crate::normalize::to_listed`] and [`crate::normalize::to_detailed`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawSafeTx {
    /// Transaction service record
    Classic(SafeMultisigTransactionResponse),
    /// Gateway list summary, the only shape the Rootstock gateway offers
    Rootstock(TxSummary),
    /// Gateway transaction details
    Gateway(TxDetails),
}

impl From<SafeMultisigTransactionResponse> for RawSafeTx {
    fn from(tx: SafeMultisigTransactionResponse) -> Self {
        Self::Classic(tx)
    }
}

impl From<TxSummary> for RawSafeTx {
    fn from(tx: TxSummary) -> Self {
        Self::Rootstock(tx)
    }
}

impl From<TxDetails> for RawSafeTx {
    fn from(tx: TxDetails) -> Self {
        Self::Gateway(tx)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn not_found_is_recognizable() {
        let hash = H256::repeat_byte(7);
        let tx = SafeTx::not_found(hash);
        assert!(tx.is_not_found());
        assert_eq!(tx.safe_tx_hash, hash);
        assert!(tx.confirmations.is_empty());
        assert!(tx.to.is_zero());

        let real = SafeTx {
            nonce: 1,
            ..SafeTx::not_found(hash)
        };
        assert!(!real.is_not_found());
    }

    #[test]
    fn it_maps_addresses() {
        let signer = Address::repeat_byte(1);
        let tx = SafeTx {
            confirmations: vec![signer, signer],
            proposer: signer,
            ..SafeTx::not_found(H256::zero())
        };
        let listed = tx.to_listed();
        assert_eq!(listed.confirmations, 2);

        let strings = tx.map_addresses(|a| format!("{:?}", a));
        assert_eq!(strings.proposer, format!("{:?}", signer));
        assert_eq!(strings.confirmations.len(), 2);
    }

    #[test]
    fn it_serializes_camel_case() {
        let json = serde_json::to_value(SafeTx::not_found(H256::zero()).checksummed()).unwrap();
        assert_eq!(json["confirmationsRequired"], 0);
        assert_eq!(json["operation"], 0);
        assert_eq!(json["to"], "0x0000000000000000000000000000000000000000");
    }
}
