use std::{fmt, str::FromStr};

use ethers::types::Address;

use crate::{client::ClientResult, dispatcher::SafeDispatcher, rpc::common::ChecksumAddress};

/// Errors parsing a `prefix:address` pair
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrefixedAddressError {
    /// No `:` separator
    #[error("expected `prefix:address`, got '{0}'")]
    MissingSeparator(String),
    /// Empty chain prefix
    #[error("empty chain prefix in '{0}'")]
    EmptyPrefix(String),
    /// Address part is not a 20-byte hex address
    #[error("invalid address '{0}'")]
    InvalidAddress(String),
}

/// A Safe address qualified by a short chain prefix, e.g.
/// `eth:0x38CD8Fa77ECEB4b1edB856Ed27aac6A6c6Dc88ca`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrefixedAddress {
    prefix: String,
    address: Address,
}

impl PrefixedAddress {
    /// Instantiate from parts
    pub fn new(prefix: impl Into<String>, address: Address) -> Self {
        Self {
            prefix: prefix.into(),
            address,
        }
    }

    /// Chain prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Safe address
    pub fn address(&self) -> Address {
        self.address
    }
}

impl FromStr for PrefixedAddress {
    type Err = PrefixedAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, address) = s
            .split_once(':')
            .ok_or_else(|| PrefixedAddressError::MissingSeparator(s.to_owned()))?;
        if prefix.is_empty() {
            return Err(PrefixedAddressError::EmptyPrefix(s.to_owned()));
        }
        let address = address
            .parse::<Address>()
            .map_err(|_| PrefixedAddressError::InvalidAddress(address.to_owned()))?;
        Ok(Self::new(prefix, address))
    }
}

impl fmt::Display for PrefixedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.prefix, ChecksumAddress(self.address))
    }
}

impl serde::Serialize for PrefixedAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for PrefixedAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

/// Which backend(s) the dispatcher talks to
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ApiMode {
    /// Legacy transaction service only
    Classic,
    /// Client gateway only
    Alt,
    /// Legacy transaction service, then client gateway on failure
    #[default]
    Fallback,
}

impl FromStr for ApiMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "classic" => Ok(Self::Classic),
            "alt" => Ok(Self::Alt),
            "fallback" => Ok(Self::Fallback),
            other => Err(format!("unknown api mode '{}'", other)),
        }
    }
}

impl fmt::Display for ApiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Classic => "classic",
            Self::Alt => "alt",
            Self::Fallback => "fallback",
        })
    }
}

/// Deserializable settings for a [`SafeDispatcher`]
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SafeApiConfig {
    /// The Safe to watch
    pub safe: PrefixedAddress,
    /// Backend selection
    #[serde(default)]
    pub mode: ApiMode,
}

impl SafeApiConfig {
    /// Build a dispatcher against the default hosts
    ///
    /// # Errors
    ///
    /// If the chain prefix has no configured service
    pub fn build(&self) -> ClientResult<SafeDispatcher> {
        SafeDispatcher::new(&self.safe, self.mode)
    }
}
