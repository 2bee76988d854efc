//! The four single-asset pricing formulas of the weighted constant-mean
//! invariant, as described in the Balancer whitepaper
//! (https://balancer.fi/whitepaper.pdf, "Single-Asset Deposit/Withdrawal").
//!
//! All functions are pure over [`Dec`] and carry no preconditions of their
//! own: the service enforces ratio caps and zero checks before calling in.
//! Results bubble up a fixed point error only when an input ratio leaves the
//! convergence interval of [`Dec::pow`].

use number::{Dec, dec};

/// Shares minted when depositing `token_amount_in` of a single asset.
pub fn calc_pool_out_given_single_in(
    token_balance_in: &Dec,
    token_weight_in: &Dec,
    pool_supply: &Dec,
    total_weight: &Dec,
    token_amount_in: &Dec,
    swap_fee: &Dec,
) -> Result<Dec, dec::Error> {
    // The deposit implicitly trades a (1 - normalized_weight) proportion of
    // the incoming asset against the other pool assets; only that proportion
    // is charged the swap fee.
    let normalized_weight = token_weight_in.quo(total_weight);
    let zaz = Dec::one().sub(&normalized_weight).mul(swap_fee);
    let token_amount_in_after_fee = token_amount_in.mul(&Dec::one().sub(&zaz));

    let new_token_balance_in = token_balance_in.add(&token_amount_in_after_fee);
    let token_in_ratio = new_token_balance_in.quo(token_balance_in);

    let pool_ratio = token_in_ratio.pow(&normalized_weight)?;
    let new_pool_supply = pool_ratio.mul(pool_supply);
    Ok(new_pool_supply.sub(pool_supply))
}

/// The exact single-asset deposit that mints `pool_amount_out` shares.
pub fn calc_single_in_given_pool_out(
    token_balance_in: &Dec,
    token_weight_in: &Dec,
    pool_supply: &Dec,
    total_weight: &Dec,
    pool_amount_out: &Dec,
    swap_fee: &Dec,
) -> Result<Dec, dec::Error> {
    let normalized_weight = token_weight_in.quo(total_weight);
    let new_pool_supply = pool_supply.add(pool_amount_out);
    let pool_ratio = new_pool_supply.quo(pool_supply);

    let token_in_ratio = pool_ratio.pow(&Dec::one().quo(&normalized_weight))?;
    let new_token_balance_in = token_in_ratio.mul(token_balance_in);
    let token_amount_in_after_fee = new_token_balance_in.sub(token_balance_in);

    let zar = Dec::one().sub(&normalized_weight).mul(swap_fee);
    Ok(token_amount_in_after_fee.quo(&Dec::one().sub(&zar)))
}

/// The single-asset amount released when burning `pool_amount_in` shares.
pub fn calc_single_out_given_pool_in(
    token_balance_out: &Dec,
    token_weight_out: &Dec,
    pool_supply: &Dec,
    total_weight: &Dec,
    pool_amount_in: &Dec,
    swap_fee: &Dec,
) -> Result<Dec, dec::Error> {
    let normalized_weight = token_weight_out.quo(total_weight);
    let new_pool_supply = pool_supply.sub(pool_amount_in);
    let pool_ratio = new_pool_supply.quo(pool_supply);

    let token_out_ratio = pool_ratio.pow(&Dec::one().quo(&normalized_weight))?;
    let new_token_balance_out = token_out_ratio.mul(token_balance_out);
    let token_amount_out_before_fee = token_balance_out.sub(&new_token_balance_out);

    let zaz = Dec::one().sub(&normalized_weight).mul(swap_fee);
    Ok(token_amount_out_before_fee.mul(&Dec::one().sub(&zaz)))
}

/// The shares to burn to release exactly `token_amount_out` of one asset.
pub fn calc_pool_in_given_single_out(
    token_balance_out: &Dec,
    token_weight_out: &Dec,
    pool_supply: &Dec,
    total_weight: &Dec,
    token_amount_out: &Dec,
    swap_fee: &Dec,
) -> Result<Dec, dec::Error> {
    let normalized_weight = token_weight_out.quo(total_weight);
    let zaz = Dec::one().sub(&normalized_weight).mul(swap_fee);
    let token_amount_out_before_fee = token_amount_out.quo(&Dec::one().sub(&zaz));

    let new_token_balance_out = token_balance_out.sub(&token_amount_out_before_fee);
    let token_out_ratio = new_token_balance_out.quo(token_balance_out);

    let pool_ratio = token_out_ratio.pow(&normalized_weight)?;
    let new_pool_supply = pool_ratio.mul(pool_supply);
    Ok(pool_supply.sub(&new_pool_supply))
}
