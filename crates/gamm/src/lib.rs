//! Core engine for constant-mean (weighted geometric mean) liquidity pools.
//!
//! A pool holds two to eight assets, each with a fixed denormalized weight;
//! ownership is tracked by a fungible share token. Holders mint shares by
//! depositing assets and burn shares to redeem them, either proportionally
//! across all assets or against a single one, with amounts derived from the
//! invariant `V = prod_i B_i^(W_i / sum_j W_j)`.
//!
//! The engine is deliberately narrow: it consumes a [`bank::Bank`] for value
//! transfer and a [`store::PoolStore`] for persistence, both provided by the
//! host together with a transaction context that rolls everything back when
//! an operation fails. Trading between pool assets, fee distribution and
//! price oracles are out of scope.

pub mod bank;
pub mod error;
pub mod math;
pub mod pool;
pub mod service;
pub mod shares;
pub mod store;

pub use self::{
    bank::{Bank, MemoryBank},
    error::{Error, Result},
    pool::{BindToken, Coin, LpToken, LpTokenInfo, MaxAmountIn, MinAmountOut, Pool, Record},
    service::PoolService,
    store::{MemoryPoolStore, PoolStore},
};
