/// Common RPC types
pub mod common;

/// Transaction service multisig history
pub mod msig_history;

/// Gateway-style transaction lists & details
pub mod gateway;
