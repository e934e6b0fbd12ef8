#![warn(missing_docs, unreachable_pub)]
#![deny(unused_must_use, rust_2018_idioms)]

//! Normalized multisig transaction feed for Safe wallets
//!
//! Reads a Safe's multisig history from the legacy per-chain transaction
//! service, the client gateway, or the Rootstock gateway, and returns it in
//! one shape: [`ListedSafeTx`] summaries and [`SafeTx`] records.

mod macros;

/// Errors, HTTP transport & the [`SafeApi`] trait
pub mod client;

/// Chain prefix, API mode & dispatcher settings
pub mod config;

/// Network configuration
pub mod networks;

/// Wire types
pub mod rpc;

/// Normalized transaction records
pub mod types;

/// Backend record normalization
pub mod normalize;

/// Legacy transaction service client
pub mod classic;

/// Client gateway client
pub mod alt;

/// Backend selection & fallback
pub mod dispatcher;

pub use alt::AltClient;
pub use classic::ClassicClient;
pub use client::{ClientError, ClientResult, SafeApi};
pub use config::{ApiMode, PrefixedAddress, SafeApiConfig};
pub use dispatcher::SafeDispatcher;
pub use types::{ListedSafeTx, SafeTx};

// currently supported:
// GET `/api/v1/safes/{address}/multisig-transactions/`
// GET `/api/v1/safes/{address}/multisig-transactions/{safe_tx_hash}`
// GET `/v1/chains/{chain_id}/safes/{address}/multisig-transactions`
// GET `/v1/chains/{chain_id}/transactions/{safe_tx_hash}`
