//! The public transactor over pools.
//!
//! Every operation loads a pool, computes target amounts in the fixed point
//! domain, moves assets and shares through the bank, and writes the pool back
//! exactly once. Pools are never cached across operations: each call works on
//! a freshly fetched copy, and a failure anywhere aborts the operation and
//! leaves rollback to the host transaction context.

use {
    crate::{
        bank::Bank,
        error::{Error, Result},
        math,
        pool::{
            BindToken, Coin, INITIAL_SHARE_SUPPLY, LpToken, LpTokenInfo, MAX_BOUND_TOKENS,
            MAX_IN_RATIO, MAX_OUT_RATIO, MIN_BOUND_TOKENS, MODULE_NAME, MaxAmountIn, MinAmountOut,
            Pool, Record, share_denom,
        },
        shares::ShareLedger,
        store::PoolStore,
    },
    number::{Dec, Int},
    std::collections::{BTreeMap, BTreeSet},
};

/// Creates pools and processes joins and exits against them.
pub struct PoolService<B, S> {
    bank: B,
    store: S,
}

impl<B: Bank, S: PoolStore> PoolService<B, S> {
    pub fn new(bank: B, store: S) -> Self {
        Self { bank, store }
    }

    pub fn bank(&self) -> &B {
        &self.bank
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates a pool holding `bind_tokens` and mints the initial share
    /// supply to `sender`, funded by the initial deposits.
    pub fn create_pool(
        &mut self,
        sender: &str,
        swap_fee: Dec,
        lp_token: LpTokenInfo,
        bind_tokens: &[BindToken],
    ) -> Result<u64> {
        if bind_tokens.len() < MIN_BOUND_TOKENS {
            return Err(Error::InvalidRequest("at least two tokens must be bound"));
        }
        if bind_tokens.len() > MAX_BOUND_TOKENS {
            return Err(Error::InvalidRequest("at most eight tokens can be bound"));
        }
        if swap_fee.is_negative() || swap_fee >= Dec::one() {
            return Err(Error::InvalidRequest("swap fee must lie in [0, 1)"));
        }

        let mut records = BTreeMap::new();
        for bind in bind_tokens {
            if !bind.weight.is_positive() {
                return Err(Error::InvalidRequest("token weight must be positive"));
            }
            if !bind.amount.is_positive() {
                return Err(Error::InvalidRequest("initial token amount must be positive"));
            }
            let record = Record {
                denormalized_weight: bind.weight.clone(),
                balance: Int::zero(),
            };
            if records.insert(bind.denom.clone(), record).is_some() {
                return Err(Error::InvalidRequest("duplicated denom"));
            }
        }

        let pool_id = self.store.next_pool_number();
        let total_weight = bind_tokens
            .iter()
            .fold(Dec::zero(), |total, bind| total.add(&bind.weight));
        let pool = Pool {
            id: pool_id,
            swap_fee,
            token: LpToken {
                denom: share_denom(pool_id, &lp_token.denom),
                description: lp_token.description,
                total_supply: Int::zero(),
            },
            total_weight,
            records,
        };
        self.store.store_pool(&pool)?;

        // The initial deposit flows through the same path as any later join:
        // record balances start at zero and are filled in by it.
        let coins = bind_tokens
            .iter()
            .map(|bind| Coin::new(bind.denom.clone(), bind.amount.clone()))
            .collect();
        self.join_pool_inner(sender, pool, coins, INITIAL_SHARE_SUPPLY.clone())?;
        tracing::debug!(pool_id, sender, "created pool");
        Ok(pool_id)
    }

    /// Proportional deposit: mints exactly `pool_amount_out` shares against a
    /// pro-rata slice of every bound asset, each capped by `max_amounts_in`.
    pub fn join_pool(
        &mut self,
        sender: &str,
        pool_id: u64,
        pool_amount_out: Int,
        max_amounts_in: &[MaxAmountIn],
    ) -> Result<()> {
        let pool = self.store.fetch_pool(pool_id)?;
        if !pool_amount_out.is_positive() {
            return Err(Error::InvalidRequest("pool amount out must be positive"));
        }
        let total_supply = pool.token.total_supply.to_dec();
        if total_supply.is_zero() {
            return Err(Error::MathApprox("pool has no outstanding shares"));
        }
        let pool_ratio = pool_amount_out.to_dec().quo(&total_supply);
        if pool_ratio.is_zero() {
            return Err(Error::MathApprox("calc pool ratio"));
        }

        let mut seen = BTreeSet::new();
        for max_amount_in in max_amounts_in {
            if !seen.insert(max_amount_in.denom.as_str()) {
                return Err(Error::InvalidRequest("duplicated denom"));
            }
        }
        if seen.len() != pool.records.len() {
            return Err(Error::InvalidRequest(
                "max amounts in must cover every bound token",
            ));
        }

        let mut swap_targets = Vec::with_capacity(max_amounts_in.len());
        for max_amount_in in max_amounts_in {
            let record = pool
                .records
                .get(&max_amount_in.denom)
                .ok_or(Error::InvalidRequest("token is not bound to pool"))?;
            let token_amount_in = pool_ratio.mul(&record.balance.to_dec()).truncate_to_int();
            if token_amount_in.is_zero() {
                return Err(Error::MathApprox("calc token amount in"));
            }
            if token_amount_in > max_amount_in.max_amount {
                return Err(Error::LimitExceed);
            }
            swap_targets.push(Coin::new(max_amount_in.denom.clone(), token_amount_in));
        }

        self.join_pool_inner(sender, pool, swap_targets, pool_amount_out)
    }

    /// Deposits exactly `token_amount_in` of a single asset; returns the
    /// shares minted for it.
    pub fn join_pool_with_extern_amount_in(
        &mut self,
        sender: &str,
        pool_id: u64,
        token_in: &str,
        token_amount_in: Int,
        min_pool_amount_out: Int,
    ) -> Result<Int> {
        let pool = self.store.fetch_pool(pool_id)?;
        let record = pool.records.get(token_in).ok_or_else(|| Error::NotBound {
            denom: token_in.to_owned(),
        })?;
        if !token_amount_in.is_positive() {
            return Err(Error::InvalidRequest("token amount in must be positive"));
        }
        if pool.token.total_supply.is_zero() {
            return Err(Error::MathApprox("pool has no outstanding shares"));
        }

        if token_amount_in.to_dec() > record.balance.to_dec().mul(&MAX_IN_RATIO) {
            return Err(Error::MaxInRatio);
        }

        let pool_amount_out = math::calc_pool_out_given_single_in(
            &record.balance.to_dec(),
            &record.denormalized_weight,
            &pool.token.total_supply.to_dec(),
            &pool.total_weight,
            &token_amount_in.to_dec(),
            &pool.swap_fee,
        )?
        .truncate_to_int();

        if pool_amount_out < min_pool_amount_out {
            return Err(Error::LimitOut);
        }

        let swap_targets = vec![Coin::new(token_in, token_amount_in)];
        self.join_pool_inner(sender, pool, swap_targets, pool_amount_out.clone())?;
        Ok(pool_amount_out)
    }

    /// Mints exactly `pool_amount_out` shares against a single asset; returns
    /// the shares minted.
    pub fn join_pool_with_pool_amount_out(
        &mut self,
        sender: &str,
        pool_id: u64,
        token_in: &str,
        pool_amount_out: Int,
        max_amount_in: Int,
    ) -> Result<Int> {
        let pool = self.store.fetch_pool(pool_id)?;
        let record = pool.records.get(token_in).ok_or_else(|| Error::NotBound {
            denom: token_in.to_owned(),
        })?;
        if !pool_amount_out.is_positive() {
            return Err(Error::InvalidRequest("pool amount out must be positive"));
        }
        if pool.token.total_supply.is_zero() {
            return Err(Error::MathApprox("pool has no outstanding shares"));
        }

        let token_amount_in = math::calc_single_in_given_pool_out(
            &record.balance.to_dec(),
            &record.denormalized_weight,
            &pool.token.total_supply.to_dec(),
            &pool.total_weight,
            &pool_amount_out.to_dec(),
            &pool.swap_fee,
        )?
        .truncate_to_int();

        if token_amount_in.is_zero() {
            return Err(Error::MathApprox("calc token amount in"));
        }
        if token_amount_in > max_amount_in {
            return Err(Error::LimitIn);
        }
        if token_amount_in.to_dec() > record.balance.to_dec().mul(&MAX_IN_RATIO) {
            return Err(Error::MaxInRatio);
        }

        let swap_targets = vec![Coin::new(token_in, token_amount_in)];
        self.join_pool_inner(sender, pool, swap_targets, pool_amount_out.clone())?;
        Ok(pool_amount_out)
    }

    /// Proportional withdrawal: burns exactly `pool_amount_in` shares for a
    /// pro-rata slice of every bound asset, each floored by `min_amounts_out`.
    pub fn exit_pool(
        &mut self,
        sender: &str,
        pool_id: u64,
        pool_amount_in: Int,
        min_amounts_out: &[MinAmountOut],
    ) -> Result<()> {
        let pool = self.store.fetch_pool(pool_id)?;
        if !pool_amount_in.is_positive() {
            return Err(Error::InvalidRequest("pool amount in must be positive"));
        }
        let total_supply = pool.token.total_supply.to_dec();
        if total_supply.is_zero() {
            return Err(Error::MathApprox("pool has no outstanding shares"));
        }
        let pool_ratio = pool_amount_in.to_dec().quo(&total_supply);
        if pool_ratio.is_zero() {
            return Err(Error::MathApprox("calc pool ratio"));
        }

        let mut seen = BTreeSet::new();
        for min_amount_out in min_amounts_out {
            if !seen.insert(min_amount_out.denom.as_str()) {
                return Err(Error::InvalidRequest("duplicated denom"));
            }
        }
        if seen.len() != pool.records.len() {
            return Err(Error::InvalidRequest(
                "min amounts out must cover every bound token",
            ));
        }

        let mut swap_amounts = Vec::with_capacity(min_amounts_out.len());
        for min_amount_out in min_amounts_out {
            let record = pool
                .records
                .get(&min_amount_out.denom)
                .ok_or(Error::InvalidRequest("token is not bound to pool"))?;
            let token_amount_out = pool_ratio.mul(&record.balance.to_dec()).truncate_to_int();
            if token_amount_out.is_zero() {
                return Err(Error::MathApprox("calc token amount out"));
            }
            if token_amount_out < min_amount_out.min_amount {
                return Err(Error::LimitExceed);
            }
            swap_amounts.push(Coin::new(min_amount_out.denom.clone(), token_amount_out));
        }

        // Record balances are decremented inside exit_pool_inner only, so
        // each asset is reduced by exactly its swap amount.
        self.exit_pool_inner(sender, pool, pool_amount_in, swap_amounts)
    }

    /// Burns exactly `pool_amount_in` shares against a single asset; returns
    /// the asset amount released.
    pub fn exit_pool_with_pool_amount_in(
        &mut self,
        sender: &str,
        pool_id: u64,
        token_out: &str,
        pool_amount_in: Int,
        min_amount_out: Int,
    ) -> Result<Int> {
        let pool = self.store.fetch_pool(pool_id)?;
        let record = pool.records.get(token_out).ok_or_else(|| Error::NotBound {
            denom: token_out.to_owned(),
        })?;
        if !pool_amount_in.is_positive() {
            return Err(Error::InvalidRequest("pool amount in must be positive"));
        }
        if pool.token.total_supply.is_zero() {
            return Err(Error::MathApprox("pool has no outstanding shares"));
        }

        let token_amount_out = math::calc_single_out_given_pool_in(
            &record.balance.to_dec(),
            &record.denormalized_weight,
            &pool.token.total_supply.to_dec(),
            &pool.total_weight,
            &pool_amount_in.to_dec(),
            &pool.swap_fee,
        )?
        .truncate_to_int();

        if token_amount_out < min_amount_out {
            return Err(Error::LimitOut);
        }
        if token_amount_out.to_dec() > record.balance.to_dec().mul(&MAX_OUT_RATIO) {
            return Err(Error::MaxOutRatio);
        }

        let swap_amounts = vec![Coin::new(token_out, token_amount_out.clone())];
        self.exit_pool_inner(sender, pool, pool_amount_in, swap_amounts)?;
        Ok(token_amount_out)
    }

    /// Releases exactly `token_amount_out` of a single asset; returns the
    /// shares burned for it.
    pub fn exit_pool_with_extern_amount_out(
        &mut self,
        sender: &str,
        pool_id: u64,
        token_out: &str,
        token_amount_out: Int,
        max_pool_amount_in: Int,
    ) -> Result<Int> {
        let pool = self.store.fetch_pool(pool_id)?;
        let record = pool.records.get(token_out).ok_or_else(|| Error::NotBound {
            denom: token_out.to_owned(),
        })?;
        if !token_amount_out.is_positive() {
            return Err(Error::InvalidRequest("token amount out must be positive"));
        }
        if pool.token.total_supply.is_zero() {
            return Err(Error::MathApprox("pool has no outstanding shares"));
        }

        if token_amount_out.to_dec() > record.balance.to_dec().mul(&MAX_OUT_RATIO) {
            return Err(Error::MaxOutRatio);
        }

        let pool_amount_in = math::calc_pool_in_given_single_out(
            &record.balance.to_dec(),
            &record.denormalized_weight,
            &pool.token.total_supply.to_dec(),
            &pool.total_weight,
            &token_amount_out.to_dec(),
            &pool.swap_fee,
        )?
        .truncate_to_int();

        if pool_amount_in.is_zero() {
            return Err(Error::MathApprox("calc pool amount in"));
        }
        if pool_amount_in > max_pool_amount_in {
            return Err(Error::LimitIn);
        }

        let swap_amounts = vec![Coin::new(token_out, token_amount_out)];
        self.exit_pool_inner(sender, pool, pool_amount_in.clone(), swap_amounts)?;
        Ok(pool_amount_in)
    }

    /// Mints `swap_amount` shares to `sender`, escrows `swap_targets`, and
    /// persists the updated pool.
    fn join_pool_inner(
        &mut self,
        sender: &str,
        mut pool: Pool,
        mut swap_targets: Vec<Coin>,
        swap_amount: Int,
    ) -> Result<()> {
        // The bank expects coin lists sorted by denom.
        swap_targets.sort_by(|a, b| a.denom.cmp(&b.denom));

        let mut shares = ShareLedger::new(&pool.token.denom, &mut self.bank);
        shares.mint(&swap_amount)?;
        shares.push(sender, &swap_amount)?;
        self.bank
            .send_from_account_to_module(sender, MODULE_NAME, &swap_targets)?;

        let total_supply = &pool.token.total_supply + &swap_amount;
        pool.token.total_supply = total_supply;
        for coin in &swap_targets {
            let record = pool
                .records
                .get_mut(&coin.denom)
                .expect("swap targets are bound to the pool");
            let balance = &record.balance + &coin.amount;
            record.balance = balance;
        }
        self.store.store_pool(&pool)?;
        tracing::debug!(pool_id = pool.id, sender, shares = %swap_amount, "joined pool");
        Ok(())
    }

    /// Pulls and burns `swap_target` shares from `sender`, releases
    /// `swap_amounts` from escrow, and persists the updated pool.
    ///
    /// This is the only place where record balances are decremented.
    fn exit_pool_inner(
        &mut self,
        sender: &str,
        mut pool: Pool,
        swap_target: Int,
        mut swap_amounts: Vec<Coin>,
    ) -> Result<()> {
        swap_amounts.sort_by(|a, b| a.denom.cmp(&b.denom));

        let mut shares = ShareLedger::new(&pool.token.denom, &mut self.bank);
        shares.pull(sender, &swap_target)?;
        shares.burn(&swap_target)?;
        self.bank
            .send_from_module_to_account(MODULE_NAME, sender, &swap_amounts)?;

        let total_supply = &pool.token.total_supply - &swap_target;
        pool.token.total_supply = total_supply;
        for coin in &swap_amounts {
            let record = pool
                .records
                .get_mut(&coin.denom)
                .expect("swap amounts are bound to the pool");
            let balance = &record.balance - &coin.amount;
            record.balance = balance;
        }
        self.store.store_pool(&pool)?;
        tracing::debug!(pool_id = pool.id, sender, shares = %swap_target, "exited pool");
        Ok(())
    }
}
