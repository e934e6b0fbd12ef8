use ethers::types::H256;
use reqwest::{IntoUrl, Url};
use tokio_stream::{Stream, StreamExt};

use crate::{
    client::{ClientError, ClientResult, SafeApi, Transport},
    config::PrefixedAddress,
    networks::{TxService, CLIENT_GATEWAY_URL},
    normalize,
    rpc::gateway::{
        GatewayHistoryRequest, GatewayHistoryResponse, GatewayListItem, GatewayTransactionRequest,
        TxDetails, TxSummary,
    },
    types::{ListedSafeTx, SafeTx},
};

/// Client for the Safe client gateway, one host for every chain.
///
/// Errors are returned to the caller. A transaction the gateway does not
/// know, or one that was not executed through the multisig, reads as
/// [`SafeTx::not_found`].
#[derive(Debug)]
pub struct AltClient {
    transport: Transport,
    safe: PrefixedAddress,
    chain_id: u64,
}

impl AltClient {
    /// Instantiate a client for the Safe against the public client gateway
    ///
    /// # Errors
    ///
    /// If the chain prefix has no known chain id
    pub fn new(safe: &PrefixedAddress) -> ClientResult<Self> {
        Self::new_with_url(safe, CLIENT_GATEWAY_URL, Default::default())
    }

    /// Instantiate a client for the Safe against a specific gateway URL and
    /// a reqwest Client
    ///
    /// # Errors
    ///
    /// If the chain prefix has no known chain id, or the url param cannot be
    /// parsed as a URL
    pub fn new_with_url<S>(
        safe: &PrefixedAddress,
        url: S,
        client: reqwest::Client,
    ) -> ClientResult<Self>
    where
        S: IntoUrl,
    {
        let service = TxService::by_prefix(safe.prefix())
            .ok_or_else(|| ClientError::UnsupportedChain(safe.prefix().to_owned()))?;
        Ok(Self {
            transport: Transport::new_with_client(url, client)?,
            safe: safe.clone(),
            chain_id: service.chain_id,
        })
    }

    /// The Safe this client reads
    pub fn safe(&self) -> &PrefixedAddress {
        &self.safe
    }

    fn history_url(&self) -> Url {
        GatewayHistoryRequest::url(self.transport.url(), self.chain_id, self.safe.address())
    }

    /// Stream history pages, following `next` pointers until exhausted
    pub fn pages(&self) -> impl Stream<Item = ClientResult<GatewayHistoryResponse>> + '_ {
        async_stream::try_stream! {
            let mut next = Some(self.history_url());
            while let Some(url) = next.take() {
                let page: GatewayHistoryResponse = self.transport.get(url).await?;
                next = page.next.clone();
                yield page;
            }
        }
    }

    fn listed(&self, page: GatewayHistoryResponse) -> impl Iterator<Item = ListedSafeTx> + '_ {
        page.results
            .into_iter()
            .filter_map(GatewayListItem::into_transaction)
            .filter_map(|tx: TxSummary| match normalize::summary_listed(&tx) {
                Ok(listed) => Some(listed),
                Err(e) => {
                    tracing::warn!(error = %e, safe = %self.safe, "Skipping gateway transaction");
                    None
                }
            })
    }
}

#[async_trait::async_trait]
impl SafeApi for AltClient {
    async fn fetch_all(&self) -> ClientResult<Vec<ListedSafeTx>> {
        let mut results = vec![];
        let pages = self.pages();
        tokio::pin!(pages);
        while let Some(page) = pages.next().await {
            results.extend(self.listed(page?));
        }
        Ok(results)
    }

    async fn fetch_latest(&self) -> ClientResult<Vec<ListedSafeTx>> {
        let pages = self.pages();
        tokio::pin!(pages);
        match pages.next().await {
            Some(page) => Ok(self.listed(page?).collect()),
            None => Ok(vec![]),
        }
    }

    async fn fetch_detailed(&self, safe_tx_hash: H256) -> ClientResult<SafeTx> {
        let url = GatewayTransactionRequest::url(self.transport.url(), self.chain_id, safe_tx_hash);
        let details: TxDetails = match self.transport.get(url).await {
            Ok(details) => details,
            Err(e) if e.is_not_found() => return Ok(SafeTx::not_found(safe_tx_hash)),
            Err(e) => return Err(e),
        };
        Ok(normalize::gateway_detailed(&details).unwrap_or_else(|e| {
            tracing::debug!(error = %e, safe_tx_hash = ?safe_tx_hash, "Not a multisig transaction");
            SafeTx::not_found(safe_tx_hash)
        }))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_targets_the_chain_id() {
        let safe: PrefixedAddress = "arb1:0x38CD8Fa77ECEB4b1edB856Ed27aac6A6c6Dc88ca"
            .parse()
            .unwrap();
        let client = AltClient::new(&safe).unwrap();
        assert_eq!(
            client.history_url().as_str(),
            "https://safe-client.safe.global/v1/chains/42161/safes/0x38CD8Fa77ECEB4b1edB856Ed27aac6A6c6Dc88ca/multisig-transactions"
        );
    }
}
