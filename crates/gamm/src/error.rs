//! Typed error kinds surfaced by the engine.
//!
//! Every error aborts the running operation; the host transaction context is
//! expected to roll back any bank transfer or store write performed under it,
//! so partial state is never observable.

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The argument shape is wrong: bind count out of bounds, duplicated
    /// denoms, a per-asset list that does not cover the pool, and similar.
    #[error("invalid request: {0}")]
    InvalidRequest(&'static str),

    /// A single asset operation referenced a denom the pool does not hold.
    #[error("token {denom} is not bound to this pool")]
    NotBound { denom: String },

    /// A computed amount truncated to zero, or the inputs were so extreme
    /// that no meaningful amount could be derived from them.
    #[error("math approximation error: {0}")]
    MathApprox(&'static str),

    /// A proportional join or exit violated a caller supplied per-asset
    /// maximum or minimum.
    #[error("per-asset amount limit violated")]
    LimitExceed,

    /// A single asset operation required more input than the caller allowed.
    #[error("maximum input limit exceeded")]
    LimitIn,

    /// A single asset operation produced less output than the caller required.
    #[error("minimum output limit not reached")]
    LimitOut,

    /// A single asset deposit larger than half the pool's balance of that
    /// asset.
    #[error("token amount in exceeds the max in ratio")]
    MaxInRatio,

    /// A single asset withdrawal larger than a third of the pool's balance of
    /// that asset.
    #[error("token amount out exceeds the max out ratio")]
    MaxOutRatio,

    #[error("pool {pool_id} not found")]
    PoolNotFound { pool_id: u64 },

    /// A bank call failed; passed through untouched.
    #[error(transparent)]
    Bank(#[from] anyhow::Error),

    /// A fixed point domain violation, e.g. a pow base pushed outside its
    /// convergence interval by an absurdly large requested amount.
    #[error(transparent)]
    Math(#[from] number::dec::Error),
}
