use std::{fmt::Display, str::FromStr};

use ethers::types::Address;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::client::ClientResult;

/// Safe operations
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operation {
    /// CALL opcode
    #[default]
    Call = 0,
    /// DELEGATECALL opcode.
    /// Note: please exercise caution, as this can brick a SAFE
    DelegateCall = 1,
}

impl Serialize for Operation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        (*self as u8).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match u8::deserialize(deserializer)? {
            0 => Ok(Operation::Call),
            1 => Ok(Operation::DelegateCall),
            other => Err(serde::de::Error::custom(format!(
                "Expected operation 0 or 1, got {}",
                other
            ))),
        }
    }
}

/// API Error response
#[derive(serde::Deserialize, Debug, Clone)]
pub struct ErrorResponse {
    /// Error code
    pub code: i64,
    /// Error message
    #[serde(default)]
    pub message: Option<String>,
    /// Inputs
    #[serde(default)]
    pub arguments: Vec<serde_json::Value>,
}

impl Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Code: {}, Message: \"{}\"",
            self.code,
            self.message.as_deref().unwrap_or(""),
        )
    }
}

/// API Response
#[derive(serde::Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum ApiResponse<T> {
    /// Error
    Error(ErrorResponse),
    /// Success w/ value
    Success(T),
    /// Empty Success
    EmptySuccess,
}

impl<T> FromStr for ApiResponse<T>
where
    T: serde::de::DeserializeOwned,
{
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(ApiResponse::EmptySuccess);
        }
        serde_json::from_str(s)
    }
}

impl<T> ApiResponse<T> {
    pub(crate) fn into_client_result(self) -> ClientResult<Option<T>> {
        match self {
            ApiResponse::Error(e) => Err(e.into()),
            ApiResponse::Success(t) => Ok(Some(t)),
            ApiResponse::EmptySuccess => Ok(None),
        }
    }

    /// True if the response is an API error
    pub fn is_err(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Gateway-style address object, `{ "value": "0x..." }`
#[derive(serde::Serialize, serde::Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub struct AddressEx {
    /// The address
    pub value: Address,
}

impl From<AddressEx> for Address {
    fn from(val: AddressEx) -> Self {
        val.value
    }
}

/// An address wrapper that ensures checksum encoding
#[derive(Copy, Clone, PartialEq, Eq, Default, Hash)]
pub struct ChecksumAddress(pub Address);

impl std::ops::Deref for ChecksumAddress {
    type Target = Address;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Address> for ChecksumAddress {
    fn from(addr: Address) -> Self {
        Self(addr)
    }
}

impl From<ChecksumAddress> for Address {
    fn from(val: ChecksumAddress) -> Self {
        val.0
    }
}

impl serde::Serialize for ChecksumAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        ethers::utils::to_checksum(self, None).serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for ChecksumAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(Address::deserialize(deserializer)?.into())
    }
}

impl std::fmt::Debug for ChecksumAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", ethers::utils::to_checksum(self, None))
    }
}

impl std::fmt::Display for ChecksumAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", ethers::utils::to_checksum(self, None))
    }
}

impl FromStr for ChecksumAddress {
    type Err = <Address as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Address>().map(Into::into)
    }
}

/// Pagination pointer. Servers send `null`, omit the field, or send an
/// empty string on the last page.
pub(crate) fn page_url<'de, D>(deserializer: D) -> Result<Option<Url>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(url) => url.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
