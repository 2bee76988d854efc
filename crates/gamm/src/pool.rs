//! Pool state and the input shapes accepted by the service.

use {
    number::{Dec, Int},
    serde::{Deserialize, Serialize},
    std::{collections::BTreeMap, sync::LazyLock},
};

/// Name of the module account that escrows pool assets and shares.
pub const MODULE_NAME: &str = "gamm";

pub const MIN_BOUND_TOKENS: usize = 2;
pub const MAX_BOUND_TOKENS: usize = 8;

/// A single deposit of one asset may not exceed half of the pool's current
/// balance of that asset.
pub static MAX_IN_RATIO: LazyLock<Dec> = LazyLock::new(|| Dec::one().quo(&Dec::from_int(2)));
/// A single withdrawal of one asset may not exceed a third of the pool's
/// current balance of that asset.
pub static MAX_OUT_RATIO: LazyLock<Dec> = LazyLock::new(|| Dec::one().quo(&Dec::from_int(3)));

/// Shares minted to the creator when a pool is bootstrapped.
pub static INITIAL_SHARE_SUPPLY: LazyLock<Int> = LazyLock::new(|| Int::with_decimal(100, 6));

/// An amount of a single token denomination.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: Int,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: Int) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }
}

/// Per-asset state inside a pool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub denormalized_weight: Dec,
    pub balance: Int,
}

/// Descriptor of a pool's share token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LpToken {
    pub denom: String,
    pub description: String,
    pub total_supply: Int,
}

/// A constant-mean liquidity pool.
///
/// `records` is keyed by denom; the [`BTreeMap`] keeps iteration sorted by
/// denom so no result ever depends on hash order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub id: u64,
    pub swap_fee: Dec,
    pub token: LpToken,
    pub total_weight: Dec,
    pub records: BTreeMap<String, Record>,
}

/// Requested share token naming for a new pool.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LpTokenInfo {
    /// Custom denom suffix; an empty string selects the default
    /// `osmosis/pool/{id}` naming.
    pub denom: String,
    pub description: String,
}

/// One asset binding of a new pool: denom, denormalized weight and the
/// initial deposit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindToken {
    pub denom: String,
    pub weight: Dec,
    pub amount: Int,
}

/// Per-asset deposit cap for a proportional join.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxAmountIn {
    pub denom: String,
    pub max_amount: Int,
}

/// Per-asset withdrawal floor for a proportional exit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinAmountOut {
    pub denom: String,
    pub min_amount: Int,
}

/// Derives the share denom for a pool. The format is part of the engine's
/// external interface and must not change.
pub fn share_denom(pool_id: u64, custom: &str) -> String {
    if custom.is_empty() {
        format!("osmosis/pool/{pool_id}")
    } else {
        format!("osmosis/custom/{custom}")
    }
}
