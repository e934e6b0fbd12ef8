use ethers::types::H256;
use reqwest::{IntoUrl, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::{
    config::PrefixedAddressError,
    json_get,
    rpc,
    types::{ListedSafeTx, SafeTx},
};

/// Safe API Client Errors
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Reqwest Error
    #[error("{0}")]
    Reqwest(#[from] reqwest::Error),
    /// Url Parsing Error
    #[error("{0}")]
    UrlParse(#[from] url::ParseError),
    /// Serde Json deser Error
    #[error("{0}")]
    SerdeError(#[from] serde_json::Error),
    /// Server responded with a non-success status code
    #[error("Server returned {status} for {url}")]
    ServerErrorCode {
        /// The requested url
        url: Url,
        /// The response status
        status: StatusCode,
    },
    /// API Error
    #[error("API usage error: {0}")]
    ApiError(rpc::common::ErrorResponse),
    /// Server responded with an empty body where a value was expected
    #[error("Empty response from {url}")]
    EmptyResponse {
        /// The requested url
        url: Url,
    },
    /// No service is configured for the chain prefix
    #[error("no API URL for chain '{0}'")]
    UnsupportedChain(String),
    /// Malformed `prefix:address` pair
    #[error("{0}")]
    PrefixedAddress(#[from] PrefixedAddressError),
}

impl From<rpc::common::ErrorResponse> for ClientError {
    fn from(err: rpc::common::ErrorResponse) -> Self {
        Self::ApiError(err)
    }
}

impl ClientError {
    /// True if the server reported that the resource does not exist
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::ServerErrorCode { status, .. } => *status == StatusCode::NOT_FOUND,
            Self::Reqwest(e) => e.status() == Some(StatusCode::NOT_FOUND),
            _ => false,
        }
    }
}

/// Safe API Client Results
pub type ClientResult<T> = Result<T, ClientError>;

/// JSON-over-HTTP transport shared by the backend clients.
///
/// Wraps a [`reqwest::Client`] and a root URL. Requests are issued one at a
/// time; retries and timeouts are left to the configuration of the inner
/// `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct Transport {
    pub(crate) url: Url,
    pub(crate) client: reqwest::Client,
}

impl Transport {
    /// Instantiate a new transport with a specific URL
    ///
    /// # Errors
    ///
    /// If the url param cannot be parsed as a URL
    pub fn new<S>(url: S) -> ClientResult<Self>
    where
        S: IntoUrl,
    {
        Self::new_with_client(url, Default::default())
    }

    /// Instantiate a new transport with a specific URL and a reqwest Client
    ///
    /// # Errors
    ///
    /// If the url param cannot be parsed as a URL
    pub fn new_with_client<S>(url: S, client: reqwest::Client) -> ClientResult<Self>
    where
        S: IntoUrl,
    {
        Ok(Self {
            url: url.into_url()?,
            client,
        })
    }

    /// The root URL of the service
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// GET a URL and decode the JSON body
    pub async fn get<T>(&self, url: Url) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        json_get!(&self.client, url, T)
    }
}

/// The transaction-feed capability shared by every backend and the
/// [`crate::SafeDispatcher`].
#[async_trait::async_trait]
pub trait SafeApi: Send + Sync {
    /// Full history, in the order returned by the backend
    async fn fetch_all(&self) -> ClientResult<Vec<ListedSafeTx>>;

    /// Most recent page only
    async fn fetch_latest(&self) -> ClientResult<Vec<ListedSafeTx>>;

    /// Full record for one transaction, or [`SafeTx::not_found`]
    async fn fetch_detailed(&self, safe_tx_hash: H256) -> ClientResult<SafeTx>;
}
