//! Core type definitions for the swap router

use serde::{Deserialize, Serialize};
use std::fmt;

/// Token address (chain-scoped, hex-encoded, stored lowercase)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TokenAddress(String);

impl TokenAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TokenAddress {
    fn from(address: String) -> Self {
        Self::new(address)
    }
}

impl From<&str> for TokenAddress {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

impl From<TokenAddress> for String {
    fn from(address: TokenAddress) -> Self {
        address.0
    }
}

impl fmt::Display for TokenAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pool (market) identifier, the market contract address
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PoolId(String);

impl PoolId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for PoolId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl From<&str> for PoolId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<PoolId> for String {
    fn from(id: PoolId) -> Self {
        id.0
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Supported networks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Arbitrum,
    Avalanche,
    Fuji,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Arbitrum => "arbitrum",
            Self::Avalanche => "avalanche",
            Self::Fuji => "fuji",
        }
    }

    pub fn chain_id(&self) -> u64 {
        match self {
            Self::Arbitrum => 42161,
            Self::Avalanche => 43114,
            Self::Fuji => 43113,
        }
    }

    pub fn is_testnet(&self) -> bool {
        matches!(self, Self::Fuji)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Network {
    type Err = crate::RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "arbitrum" => Ok(Self::Arbitrum),
            "avalanche" => Ok(Self::Avalanche),
            "fuji" => Ok(Self::Fuji),
            _ => Err(crate::RouteError::UnsupportedNetwork {
                network: s.to_string(),
            }),
        }
    }
}

/// A tradable asset, loaded from static network configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub address: TokenAddress,
    pub symbol: String,
    pub decimals: u8,
    /// Native gas token (e.g. ETH on Arbitrum)
    #[serde(default)]
    pub is_native: bool,
    /// Wrapped form of the native gas token (e.g. WETH)
    #[serde(default)]
    pub is_wrapped: bool,
    /// Utility token of the platform itself, not meant for swapping
    #[serde(default)]
    pub is_platform_token: bool,
}

impl Token {
    pub fn new(address: impl Into<TokenAddress>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            address: address.into(),
            symbol: symbol.into(),
            decimals,
            is_native: false,
            is_wrapped: false,
            is_platform_token: false,
        }
    }
}

/// Constants
pub mod constants {
    /// Decimals of USD values, prices and factors (30-decimal fixed point)
    pub const USD_DECIMALS: u32 = 30;

    /// Divisor for basis-point rates
    pub const BASIS_POINTS_DIVISOR: u64 = 10_000;

    /// Default hop ceiling for path enumeration
    pub const DEFAULT_MAX_HOPS: usize = 3;

    /// Default cap on cumulative completed paths during enumeration
    pub const DEFAULT_MAX_CANDIDATES_PER_DEPTH: usize = 20;
}
