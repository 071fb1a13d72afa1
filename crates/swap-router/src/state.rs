//! Market State Types
//!
//! Pools, reserve snapshots, prices and impact parameters. Everything here is
//! plain data: the engine reads it and never mutates it.

use std::collections::HashMap;
use std::path::Path;

use alloy_primitives::U256;
use router_core::{ArithmeticError, Error, Network, PoolId, Token, TokenAddress};
use serde::{Deserialize, Serialize};

use crate::constants::{fees, impact};
use crate::fixed_point::convert_to_usd;

/// One side of a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Long,
    Short,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Self::Long => Self::Short,
            Self::Short => Self::Long,
        }
    }
}

/// A market: two collateral tokens around one index token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub pool_id: PoolId,
    pub index_token: TokenAddress,
    pub long_token: TokenAddress,
    pub short_token: TokenAddress,
}

impl Pool {
    pub fn new(
        pool_id: impl Into<PoolId>,
        index_token: impl Into<TokenAddress>,
        long_token: impl Into<TokenAddress>,
        short_token: impl Into<TokenAddress>,
    ) -> Self {
        Self {
            pool_id: pool_id.into(),
            index_token: index_token.into(),
            long_token: long_token.into(),
            short_token: short_token.into(),
        }
    }

    /// Single-collateral pools (long == short) cannot swap.
    pub fn is_swap_capable(&self) -> bool {
        self.long_token != self.short_token
    }

    pub fn token(&self, side: Side) -> &TokenAddress {
        match side {
            Side::Long => &self.long_token,
            Side::Short => &self.short_token,
        }
    }

    pub fn side_of(&self, token: &TokenAddress) -> Option<Side> {
        if *token == self.long_token {
            Some(Side::Long)
        } else if *token == self.short_token {
            Some(Side::Short)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Reserves
// ---------------------------------------------------------------------------

/// Token-unit reserves of one pool side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideReserve {
    pub pool_amount: U256,
    /// Amount locked for open positions
    #[serde(default)]
    pub reserved_amount: U256,
    /// Deposit ceiling, if the market has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pool_amount: Option<U256>,
}

impl SideReserve {
    pub fn new(pool_amount: U256) -> Self {
        Self {
            pool_amount,
            reserved_amount: U256::ZERO,
            max_pool_amount: None,
        }
    }

    /// Amount a swap can actually take out of this side
    pub fn available_amount(&self) -> U256 {
        self.pool_amount.saturating_sub(self.reserved_amount)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolReserves {
    pub long: SideReserve,
    pub short: SideReserve,
}

impl PoolReserves {
    pub fn side(&self, side: Side) -> &SideReserve {
        match side {
            Side::Long => &self.long,
            Side::Short => &self.short,
        }
    }
}

/// Reserves keyed by pool, as read from chain for one evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReserveSnapshot(HashMap<PoolId, PoolReserves>);

impl ReserveSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pool_id: impl Into<PoolId>, reserves: PoolReserves) {
        self.0.insert(pool_id.into(), reserves);
    }

    pub fn get(&self, pool_id: &PoolId) -> Option<&PoolReserves> {
        self.0.get(pool_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Prices
// ---------------------------------------------------------------------------

/// Oracle price band, 30-decimal USD per whole token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPrice {
    pub min: U256,
    pub max: U256,
}

impl TokenPrice {
    pub fn new(min: U256, max: U256) -> Self {
        Self { min, max }
    }

    pub fn fixed(price: U256) -> Self {
        Self::new(price, price)
    }

    pub fn mid(&self) -> U256 {
        (self.min >> 1usize) + (self.max >> 1usize) + (self.min & self.max & U256::from(1u8))
    }

    /// Zero prices cannot value anything and are treated as missing.
    pub fn is_usable(&self) -> bool {
        !self.min.is_zero() && !self.max.is_zero()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceTable(HashMap<TokenAddress, TokenPrice>);

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, token: impl Into<TokenAddress>, price: TokenPrice) {
        self.0.insert(token.into(), price);
    }

    /// Usable price for `token`; zero prices are reported as absent.
    pub fn get(&self, token: &TokenAddress) -> Option<&TokenPrice> {
        self.0.get(token).filter(|price| price.is_usable())
    }
}

// ---------------------------------------------------------------------------
// Impact parameters
// ---------------------------------------------------------------------------

/// Swap impact curve and fee of one market
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactConfig {
    /// Factor applied when a swap reduces the pool imbalance
    #[serde(default = "default_positive_factor")]
    pub positive_factor: U256,
    /// Factor applied when a swap adds to the pool imbalance
    #[serde(default = "default_negative_factor")]
    pub negative_factor: U256,
    /// Curve exponent (30 decimals, 2.0 is quadratic)
    #[serde(default = "default_exponent_factor")]
    pub exponent_factor: U256,
    /// Swap fee in basis points of the notional
    #[serde(default = "default_fee_bps")]
    pub fee_bps: u32,
}

fn default_positive_factor() -> U256 {
    impact::DEFAULT_POSITIVE_FACTOR
}

fn default_negative_factor() -> U256 {
    impact::DEFAULT_NEGATIVE_FACTOR
}

fn default_exponent_factor() -> U256 {
    impact::DEFAULT_EXPONENT_FACTOR
}

fn default_fee_bps() -> u32 {
    fees::DEFAULT_SWAP_FEE_BPS
}

impl Default for ImpactConfig {
    fn default() -> Self {
        Self {
            positive_factor: default_positive_factor(),
            negative_factor: default_negative_factor(),
            exponent_factor: default_exponent_factor(),
            fee_bps: default_fee_bps(),
        }
    }
}

impl ImpactConfig {
    /// Flat fee, no impact curve
    pub fn fee_only(fee_bps: u32) -> Self {
        Self {
            positive_factor: U256::ZERO,
            negative_factor: U256::ZERO,
            fee_bps,
            ..Self::default()
        }
    }
}

/// Network-wide default with per-market overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactConfigs {
    #[serde(default)]
    pub default: ImpactConfig,
    #[serde(default)]
    pub per_pool: HashMap<PoolId, ImpactConfig>,
}

impl ImpactConfigs {
    pub fn uniform(config: ImpactConfig) -> Self {
        Self {
            default: config,
            per_pool: HashMap::new(),
        }
    }

    pub fn with_pool(mut self, pool_id: impl Into<PoolId>, config: ImpactConfig) -> Self {
        self.per_pool.insert(pool_id.into(), config);
        self
    }

    pub fn for_pool(&self, pool_id: &PoolId) -> &ImpactConfig {
        self.per_pool.get(pool_id).unwrap_or(&self.default)
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Everything an evaluation reads: reserves, prices and impact parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    #[serde(default)]
    pub reserves: ReserveSnapshot,
    #[serde(default)]
    pub prices: PriceTable,
    #[serde(default)]
    pub impact: ImpactConfigs,
}

/// USD view of one pool side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideUsd {
    pub pool_usd: U256,
    pub available_usd: U256,
    pub max_pool_usd: Option<U256>,
}

/// USD view of a pool, valued at mid prices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolUsdState {
    pub long: SideUsd,
    pub short: SideUsd,
}

impl PoolUsdState {
    pub fn side(&self, side: Side) -> &SideUsd {
        match side {
            Side::Long => &self.long,
            Side::Short => &self.short,
        }
    }
}

impl MarketSnapshot {
    /// Value both sides of `pool` in USD.
    ///
    /// `None` when reserves, a usable price or token metadata for either side
    /// are missing; callers treat that pool as stale.
    pub fn pool_usd_state(
        &self,
        pool: &Pool,
        registry: &TokenRegistry,
    ) -> Result<Option<PoolUsdState>, ArithmeticError> {
        let Some(reserves) = self.reserves.get(&pool.pool_id) else {
            return Ok(None);
        };

        let mut sides = Vec::with_capacity(2);
        for side in [Side::Long, Side::Short] {
            let address = pool.token(side);
            let (Some(token), Some(price)) = (registry.get(address), self.prices.get(address))
            else {
                return Ok(None);
            };
            let reserve = reserves.side(side);
            let price = price.mid();
            let max_pool_usd = match reserve.max_pool_amount {
                Some(max) => Some(convert_to_usd(max, token.decimals, price)?),
                None => None,
            };
            sides.push(SideUsd {
                pool_usd: convert_to_usd(reserve.pool_amount, token.decimals, price)?,
                available_usd: convert_to_usd(reserve.available_amount(), token.decimals, price)?,
                max_pool_usd,
            });
        }

        let short = sides.pop();
        let long = sides.pop();
        Ok(long.zip(short).map(|(long, short)| PoolUsdState { long, short }))
    }
}

// ---------------------------------------------------------------------------
// Network configuration
// ---------------------------------------------------------------------------

/// Token metadata indexed by address
#[derive(Debug, Clone, Default)]
pub struct TokenRegistry {
    tokens: Vec<Token>,
    by_address: HashMap<TokenAddress, usize>,
}

impl TokenRegistry {
    pub fn new(tokens: Vec<Token>) -> Self {
        let by_address = tokens
            .iter()
            .enumerate()
            .map(|(i, token)| (token.address.clone(), i))
            .collect();
        Self { tokens, by_address }
    }

    pub fn get(&self, address: &TokenAddress) -> Option<&Token> {
        self.by_address.get(address).map(|&i| &self.tokens[i])
    }

    pub fn contains(&self, address: &TokenAddress) -> bool {
        self.by_address.contains_key(address)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn native(&self) -> Option<&Token> {
        self.tokens.iter().find(|t| t.is_native)
    }

    pub fn wrapped_native(&self) -> Option<&Token> {
        self.tokens.iter().find(|t| t.is_wrapped)
    }

    /// Native gas token requests route through its wrapped form.
    pub fn resolve_native<'a>(&'a self, address: &'a TokenAddress) -> &'a TokenAddress {
        match (self.get(address), self.wrapped_native()) {
            (Some(token), Some(wrapped)) if token.is_native => &wrapped.address,
            _ => address,
        }
    }
}

/// Pool list of one network, as produced by market discovery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkMarkets {
    pub network: Network,
    pub tokens: Vec<Token>,
    pub pools: Vec<Pool>,
}

impl NetworkMarkets {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| Error::Serialization(format!("{}: {}", path.display(), e)))
    }

    pub fn registry(&self) -> TokenRegistry {
        TokenRegistry::new(self.tokens.clone())
    }
}

impl MarketSnapshot {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| Error::Serialization(format!("{}: {}", path.display(), e)))
    }
}
