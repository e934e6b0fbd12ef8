use std::collections::HashMap;

use ethers::types::H256;
use reqwest::{IntoUrl, Url};
use tokio::sync::RwLock;
use tokio_stream::{Stream, StreamExt};

use crate::{
    client::{ClientError, ClientResult, SafeApi, Transport},
    config::PrefixedAddress,
    networks::TxService,
    normalize,
    rpc::{
        gateway::{
            GatewayHistoryRequest, GatewayHistoryResponse, GatewayListItem, TxSummary,
        },
        msig_history::{
            MsigHistoryRequest, MsigHistoryResponse, MsigTransactionRequest,
            SafeMultisigTransactionResponse,
        },
    },
    types::{ListedSafeTx, RawSafeTx, SafeTx},
};

/// Client for the legacy per-chain Safe Transaction Service.
///
/// Chains whose service is a gateway-style host (Rootstock) are listed
/// through the gateway summary endpoint instead. That backend is unreliable,
/// so its failures are logged and degrade to empty lists or
/// [`SafeTx::not_found`]. Failures on regular chains, a 404 for an unknown
/// hash included, are returned as is.
///
/// Every record seen by a listing or lookup is cached by safeTxHash for the
/// lifetime of the client, so a later [`SafeApi::fetch_detailed`] for the
/// same hash needs no request.
#[derive(Debug)]
pub struct ClassicClient {
    transport: Transport,
    safe: PrefixedAddress,
    service: TxService,
    txs: RwLock<HashMap<H256, RawSafeTx>>,
}

impl ClassicClient {
    /// Instantiate a client for the Safe, using the service configured for
    /// its chain prefix
    ///
    /// # Errors
    ///
    /// If no service is configured for the chain prefix
    pub fn new(safe: &PrefixedAddress) -> ClientResult<Self> {
        let service = Self::service(safe)?;
        Self::new_with_url(safe, service.url, Default::default())
    }

    /// Instantiate a client for the Safe against a specific URL and a
    /// reqwest Client. The chain prefix still selects the API flavor and
    /// chain id.
    ///
    /// # Errors
    ///
    /// If no service is configured for the chain prefix, or the url param
    /// cannot be parsed as a URL
    pub fn new_with_url<S>(
        safe: &PrefixedAddress,
        url: S,
        client: reqwest::Client,
    ) -> ClientResult<Self>
    where
        S: IntoUrl,
    {
        Ok(Self {
            transport: Transport::new_with_client(url, client)?,
            safe: safe.clone(),
            service: Self::service(safe)?,
            txs: Default::default(),
        })
    }

    fn service(safe: &PrefixedAddress) -> ClientResult<TxService> {
        TxService::by_prefix(safe.prefix())
            .ok_or_else(|| ClientError::UnsupportedChain(safe.prefix().to_owned()))
    }

    /// The Safe this client reads
    pub fn safe(&self) -> &PrefixedAddress {
        &self.safe
    }

    fn history_url(&self) -> Url {
        MsigHistoryRequest::url(self.transport.url(), self.safe.address())
    }

    /// Stream history pages, following `next` pointers until exhausted.
    /// Pages are requested one at a time, as each page names its successor.
    pub fn pages(&self) -> impl Stream<Item = ClientResult<MsigHistoryResponse>> + '_ {
        async_stream::try_stream! {
            let mut next = Some(self.history_url());
            while let Some(url) = next.take() {
                let page: MsigHistoryResponse = self.transport.get(url).await?;
                next = page.next.clone();
                yield page;
            }
        }
    }

    async fn cache<I>(&self, txs: I)
    where
        I: IntoIterator<Item = (H256, RawSafeTx)>,
    {
        self.txs.write().await.extend(txs);
    }

    async fn cached(&self, safe_tx_hash: H256) -> Option<RawSafeTx> {
        self.txs.read().await.get(&safe_tx_hash).cloned()
    }

    async fn remember(&self, txs: Vec<SafeMultisigTransactionResponse>) -> Vec<ListedSafeTx> {
        let listed = txs.iter().map(normalize::classic_listed).collect();
        self.cache(
            txs.into_iter()
                .map(|tx| (tx.safe_tx_hash, RawSafeTx::Classic(tx))),
        )
        .await;
        listed
    }

    async fn gateway_summaries(&self) -> ClientResult<Vec<TxSummary>> {
        let url = GatewayHistoryRequest::url(
            self.transport.url(),
            self.service.chain_id,
            self.safe.address(),
        );
        let page: GatewayHistoryResponse = self.transport.get(url).await?;
        Ok(page
            .results
            .into_iter()
            .filter_map(GatewayListItem::into_transaction)
            .collect())
    }

    /// The gateway list call returns summaries only, nothing is cached
    async fn gateway_listed(&self) -> Vec<ListedSafeTx> {
        let txs = match self.gateway_summaries().await {
            Ok(txs) => txs,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    safe = %self.safe,
                    "Failed to list gateway transactions"
                );
                return vec![];
            }
        };
        txs.iter()
            .filter_map(|tx| match normalize::summary_listed(tx) {
                Ok(listed) => Some(listed),
                Err(e) => {
                    tracing::warn!(error = %e, safe = %self.safe, "Skipping gateway transaction");
                    None
                }
            })
            .collect()
    }

    /// No lookup-by-hash endpoint is reliable on gateway chains. Re-list and
    /// scan for the hash instead.
    async fn gateway_detailed(&self, safe_tx_hash: H256) -> SafeTx {
        let txs = match self.gateway_summaries().await {
            Ok(txs) => txs,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    safe = %self.safe,
                    safe_tx_hash = ?safe_tx_hash,
                    "Failed to scan gateway transactions"
                );
                return SafeTx::not_found(safe_tx_hash);
            }
        };
        let found = txs
            .into_iter()
            .find(|tx| normalize::safe_tx_hash_from_id(&tx.id) == Some(safe_tx_hash));
        let Some(tx) = found else {
            tracing::debug!(safe_tx_hash = ?safe_tx_hash, "Transaction not listed by gateway");
            return SafeTx::not_found(safe_tx_hash);
        };
        match normalize::summary_detailed(&tx) {
            Ok(detailed) => {
                self.cache([(safe_tx_hash, RawSafeTx::Rootstock(tx))]).await;
                detailed
            }
            Err(e) => {
                tracing::warn!(error = %e, safe_tx_hash = ?safe_tx_hash, "Unusable gateway transaction");
                SafeTx::not_found(safe_tx_hash)
            }
        }
    }
}

#[async_trait::async_trait]
impl SafeApi for ClassicClient {
    async fn fetch_all(&self) -> ClientResult<Vec<ListedSafeTx>> {
        if self.service.is_gateway() {
            return Ok(self.gateway_listed().await);
        }

        let mut results = vec![];
        let pages = self.pages();
        tokio::pin!(pages);
        while let Some(page) = pages.next().await {
            results.extend(page?.results);
        }
        tracing::debug!(safe = %self.safe, count = results.len(), "Fetched full history");
        Ok(self.remember(results).await)
    }

    async fn fetch_latest(&self) -> ClientResult<Vec<ListedSafeTx>> {
        if self.service.is_gateway() {
            return Ok(self.gateway_listed().await);
        }

        let pages = self.pages();
        tokio::pin!(pages);
        let results = match pages.next().await {
            Some(page) => page?.results,
            None => vec![],
        };
        Ok(self.remember(results).await)
    }

    async fn fetch_detailed(&self, safe_tx_hash: H256) -> ClientResult<SafeTx> {
        if let Some(raw) = self.cached(safe_tx_hash).await {
            tracing::debug!(safe_tx_hash = ?safe_tx_hash, "Transaction cache hit");
            return Ok(normalize::to_detailed(&raw)
                .unwrap_or_else(|_| SafeTx::not_found(safe_tx_hash)));
        }

        if self.service.is_gateway() {
            return Ok(self.gateway_detailed(safe_tx_hash).await);
        }

        let url = MsigTransactionRequest::url(
            self.transport.url(),
            self.safe.address(),
            safe_tx_hash,
        );
        // a 404 propagates like any other status, so fallback can ask the gateway
        let tx: SafeMultisigTransactionResponse = self.transport.get(url).await?;
        let detailed = normalize::classic_detailed(&tx);
        self.cache([(tx.safe_tx_hash, RawSafeTx::Classic(tx))]).await;
        Ok(detailed)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const SAFE: &str = "0x38CD8Fa77ECEB4b1edB856Ed27aac6A6c6Dc88ca";

    #[test]
    fn it_fails_fast_without_a_service() {
        let safe: PrefixedAddress = format!("nope:{}", SAFE).parse().unwrap();
        assert!(matches!(
            ClassicClient::new(&safe),
            Err(ClientError::UnsupportedChain(prefix)) if prefix == "nope"
        ));
    }

    #[test]
    fn it_resolves_known_chains() {
        let safe: PrefixedAddress = format!("trsk:{}", SAFE).parse().unwrap();
        let client = ClassicClient::new(&safe).unwrap();
        assert!(client.service.is_gateway());
        assert_eq!(client.service.chain_id, 31);

        let safe: PrefixedAddress = format!("eth:{}", SAFE.to_lowercase()).parse().unwrap();
        let client = ClassicClient::new(&safe).unwrap();
        assert!(!client.service.is_gateway());
        assert_eq!(
            client.history_url().as_str(),
            format!(
                "https://safe-transaction-mainnet.safe.global/api/v1/safes/{}/multisig-transactions/",
                SAFE
            )
        );
    }
}
