use std::{future::Future, pin::Pin};

use ethers::types::H256;
use tracing_futures::Instrument;

use crate::{
    alt::AltClient,
    classic::ClassicClient,
    client::{ClientResult, SafeApi},
    config::{ApiMode, PrefixedAddress},
    networks,
    types::{ListedSafeTx, SafeTx},
};

type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = ClientResult<T>> + Send + 'a>>;

/// Where a call goes
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Route {
    /// Legacy transaction service only
    Classic,
    /// Client gateway only
    Alt,
    /// Legacy transaction service, then the client gateway if that fails.
    /// Whole-call substitution, results are never merged.
    Fallback,
}

/// Resolve the backend route. Classic-only chains ignore the mode.
pub fn route(mode: ApiMode, classic_only: bool) -> Route {
    if classic_only {
        return Route::Classic;
    }
    match mode {
        ApiMode::Classic => Route::Classic,
        ApiMode::Alt => Route::Alt,
        ApiMode::Fallback => Route::Fallback,
    }
}

/// Routes each call to the classic or alternative backend.
///
/// Holds no state across calls beyond what the backends keep.
#[derive(Debug)]
pub struct SafeDispatcher<C = ClassicClient, A = AltClient> {
    classic: C,
    alt: A,
    mode: ApiMode,
    route: Route,
    prefix: String,
}

impl SafeDispatcher {
    /// Instantiate both backends for the Safe against their default hosts
    ///
    /// # Errors
    ///
    /// If the chain prefix has no configured service
    pub fn new(safe: &PrefixedAddress, mode: ApiMode) -> ClientResult<Self> {
        Ok(Self::from_parts(
            safe.prefix(),
            ClassicClient::new(safe)?,
            AltClient::new(safe)?,
            mode,
        ))
    }
}

impl<C, A> SafeDispatcher<C, A>
where
    C: SafeApi,
    A: SafeApi,
{
    /// Instantiate from already-built backends
    pub fn from_parts(prefix: &str, classic: C, alt: A, mode: ApiMode) -> Self {
        Self {
            classic,
            alt,
            mode,
            route: route(mode, networks::is_classic_only(prefix)),
            prefix: prefix.to_owned(),
        }
    }

    /// Configured mode
    pub fn mode(&self) -> ApiMode {
        self.mode
    }

    /// Effective route, after the classic-only override
    pub fn route(&self) -> Route {
        self.route
    }

    /// The classic backend
    pub fn classic(&self) -> &C {
        &self.classic
    }

    /// The alternative backend
    pub fn alt(&self) -> &A {
        &self.alt
    }

    async fn dispatch<T, F>(&self, operation: &'static str, call: F) -> ClientResult<T>
    where
        F: for<'a> Fn(&'a dyn SafeApi) -> ApiFuture<'a, T> + Send + Sync,
        T: Send,
    {
        let classic: &dyn SafeApi = &self.classic;
        let alt: &dyn SafeApi = &self.alt;
        let span = |backend: &'static str| {
            tracing::debug_span!("safe_api", prefix = %self.prefix, operation, backend)
        };

        match self.route {
            Route::Classic => call(classic).instrument(span("classic")).await,
            Route::Alt => call(alt).instrument(span("alt")).await,
            Route::Fallback => match call(classic).instrument(span("classic")).await {
                Ok(value) => Ok(value),
                Err(e) => {
                    tracing::error!(error = %e, prefix = %self.prefix, operation, "Classic api failed");
                    tracing::warn!(prefix = %self.prefix, operation, "falling back to alternative api");
                    call(alt).instrument(span("alt")).await
                }
            },
        }
    }
}

#[async_trait::async_trait]
impl<C, A> SafeApi for SafeDispatcher<C, A>
where
    C: SafeApi,
    A: SafeApi,
{
    async fn fetch_all(&self) -> ClientResult<Vec<ListedSafeTx>> {
        self.dispatch("fetch_all", |api| api.fetch_all()).await
    }

    async fn fetch_latest(&self) -> ClientResult<Vec<ListedSafeTx>> {
        self.dispatch("fetch_latest", |api| api.fetch_latest()).await
    }

    async fn fetch_detailed(&self, safe_tx_hash: H256) -> ClientResult<SafeTx> {
        self.dispatch("fetch_detailed", move |api| api.fetch_detailed(safe_tx_hash))
            .await
    }
}
