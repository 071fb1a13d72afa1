//! Shared fixtures for engine tests
//!
//! Four tokens with fixed prices: USDC ($1, 6 dec), ETH ($2000, 18 dec,
//! wrapped native), WBTC ($30000, 8 dec) and DAI ($1, 18 dec).

use alloy_primitives::U256;
use router_core::{Token, TokenAddress};

use crate::fixed_point::{pow10, usd};
use crate::state::{
    ImpactConfigs, MarketSnapshot, Pool, PoolReserves, PriceTable, SideReserve, TokenPrice,
    TokenRegistry,
};

pub const USDC: &str = "0xusdc";
pub const ETH: &str = "0xeth";
pub const WBTC: &str = "0xwbtc";
pub const DAI: &str = "0xdai";

pub fn addr(address: &str) -> TokenAddress {
    TokenAddress::new(address)
}

/// (decimals, whole-dollar price)
fn token_meta(address: &TokenAddress) -> (u8, u64) {
    match address.as_str() {
        USDC => (6, 1),
        ETH => (18, 2_000),
        WBTC => (8, 30_000),
        DAI => (18, 1),
        other => panic!("no fixture for {}", other),
    }
}

pub fn tokens() -> Vec<Token> {
    let mut eth = Token::new(ETH, "ETH", 18);
    eth.is_wrapped = true;
    vec![
        Token::new(USDC, "USDC", 6),
        eth,
        Token::new(WBTC, "WBTC", 8),
        Token::new(DAI, "DAI", 18),
    ]
}

pub fn registry() -> TokenRegistry {
    TokenRegistry::new(tokens())
}

pub fn prices() -> PriceTable {
    let mut prices = PriceTable::new();
    for address in [USDC, ETH, WBTC, DAI] {
        let (_, dollars) = token_meta(&addr(address));
        prices.insert(address, TokenPrice::fixed(usd(dollars)));
    }
    prices
}

pub fn units(address: &str, whole: u64) -> U256 {
    let (decimals, _) = token_meta(&addr(address));
    U256::from(whole) * pow10(decimals).unwrap()
}

pub fn eth_units(whole: u64) -> U256 {
    units(ETH, whole)
}

pub fn usdc_units(whole: u64) -> U256 {
    units(USDC, whole)
}

/// Token amount worth `dollars` at the fixture price
fn units_for_usd(address: &TokenAddress, dollars: u64) -> U256 {
    let (decimals, price) = token_meta(address);
    U256::from(dollars) * pow10(decimals).unwrap() / U256::from(price)
}

/// Both sides of `pool` holding `dollars` worth of their token
pub fn reserves_usd(pool: &Pool, dollars: u64) -> PoolReserves {
    PoolReserves {
        long: SideReserve::new(units_for_usd(&pool.long_token, dollars)),
        short: SideReserve::new(units_for_usd(&pool.short_token, dollars)),
    }
}

/// Snapshot with fixture prices and `dollars` of liquidity per pool side
pub fn snapshot_for(pools: &[Pool], dollars: u64, impact: ImpactConfigs) -> MarketSnapshot {
    let mut snapshot = MarketSnapshot {
        prices: prices(),
        impact,
        ..MarketSnapshot::default()
    };
    for pool in pools {
        snapshot
            .reserves
            .insert(pool.pool_id.clone(), reserves_usd(pool, dollars));
    }
    snapshot
}

/// `P1(ETH/USDC, index ETH)` and `P2(WBTC/ETH, index WBTC)`
pub fn chain_pools() -> Vec<Pool> {
    vec![
        Pool::new("0xp1", ETH, ETH, USDC),
        Pool::new("0xp2", WBTC, WBTC, ETH),
    ]
}
