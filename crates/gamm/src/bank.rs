//! The value-transfer interface the engine consumes.
//!
//! The engine never holds balances itself: user accounts and the module
//! escrow live in the host's bank. [`MemoryBank`] is a double-entry in-memory
//! implementation used by the engine's own tests and by hosts that embed the
//! engine without a chain behind it.

use {
    crate::pool::Coin,
    anyhow::{Result, bail},
    number::Int,
    std::collections::BTreeMap,
};

/// Moves fungible tokens between accounts and module escrows.
///
/// Failures are surfaced as opaque [`anyhow::Error`]s and passed through the
/// engine untouched; the host transaction context owns rollback.
#[cfg_attr(test, mockall::automock)]
pub trait Bank {
    fn send_from_account_to_module(
        &mut self,
        from: &str,
        module: &str,
        coins: &[Coin],
    ) -> Result<()>;

    fn send_from_module_to_account(
        &mut self,
        module: &str,
        to: &str,
        coins: &[Coin],
    ) -> Result<()>;

    fn mint_coins(&mut self, module: &str, coins: &[Coin]) -> Result<()>;

    fn burn_coins(&mut self, module: &str, coins: &[Coin]) -> Result<()>;

    /// The account address backing a module escrow.
    fn module_address(&self, module: &str) -> String {
        format!("module/{module}")
    }
}

/// In-memory [`Bank`]: account balances plus a mint/burn supply ledger.
///
/// Overdrafts and burns exceeding the escrow are rejected, so conservation
/// bugs in a caller show up as errors instead of silently negative balances.
#[derive(Clone, Debug, Default)]
pub struct MemoryBank {
    // account -> denom -> amount
    balances: BTreeMap<String, BTreeMap<String, Int>>,
    // denom -> net minted supply
    supply: BTreeMap<String, Int>,
}

impl MemoryBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_balance(&mut self, account: &str, denom: &str, amount: Int) {
        self.balances
            .entry(account.to_owned())
            .or_default()
            .insert(denom.to_owned(), amount);
    }

    pub fn balance(&self, account: &str, denom: &str) -> Int {
        self.balances
            .get(account)
            .and_then(|coins| coins.get(denom))
            .cloned()
            .unwrap_or_else(Int::zero)
    }

    /// Net minted supply of `denom` across all accounts.
    pub fn supply(&self, denom: &str) -> Int {
        self.supply.get(denom).cloned().unwrap_or_else(Int::zero)
    }

    fn deposit(&mut self, account: &str, coins: &[Coin]) -> Result<()> {
        for coin in coins {
            if coin.amount.is_negative() {
                bail!("negative amount of {}", coin.denom);
            }
            let balance = self
                .balances
                .entry(account.to_owned())
                .or_default()
                .entry(coin.denom.clone())
                .or_insert_with(Int::zero);
            let updated = &*balance + &coin.amount;
            *balance = updated;
        }
        Ok(())
    }

    fn withdraw(&mut self, account: &str, coins: &[Coin]) -> Result<()> {
        // Validate the whole slice before debiting anything: a shortfall on a
        // later coin must not leave earlier coins already withdrawn. Amounts
        // are summed per denom so duplicated entries cannot slip past the
        // check either.
        let mut required: BTreeMap<&str, Int> = BTreeMap::new();
        for coin in coins {
            if coin.amount.is_negative() {
                bail!("negative amount of {}", coin.denom);
            }
            let total = required
                .entry(coin.denom.as_str())
                .or_insert_with(Int::zero);
            let updated = &*total + &coin.amount;
            *total = updated;
        }
        for (denom, amount) in &required {
            let balance = self.balance(account, denom);
            if balance < *amount {
                bail!("insufficient funds: {account} holds {balance} {denom}, needs {amount}");
            }
        }
        for (denom, amount) in &required {
            let balance = self.balance(account, denom);
            self.balances
                .entry(account.to_owned())
                .or_default()
                .insert((*denom).to_owned(), &balance - amount);
        }
        Ok(())
    }
}

impl Bank for MemoryBank {
    fn send_from_account_to_module(
        &mut self,
        from: &str,
        module: &str,
        coins: &[Coin],
    ) -> Result<()> {
        let escrow = self.module_address(module);
        self.withdraw(from, coins)?;
        self.deposit(&escrow, coins)
    }

    fn send_from_module_to_account(
        &mut self,
        module: &str,
        to: &str,
        coins: &[Coin],
    ) -> Result<()> {
        let escrow = self.module_address(module);
        self.withdraw(&escrow, coins)?;
        self.deposit(to, coins)
    }

    fn mint_coins(&mut self, module: &str, coins: &[Coin]) -> Result<()> {
        let escrow = self.module_address(module);
        self.deposit(&escrow, coins)?;
        for coin in coins {
            let supply = self
                .supply
                .entry(coin.denom.clone())
                .or_insert_with(Int::zero);
            let updated = &*supply + &coin.amount;
            *supply = updated;
        }
        Ok(())
    }

    fn burn_coins(&mut self, module: &str, coins: &[Coin]) -> Result<()> {
        let escrow = self.module_address(module);
        self.withdraw(&escrow, coins)?;
        for coin in coins {
            let supply = self
                .supply
                .entry(coin.denom.clone())
                .or_insert_with(Int::zero);
            let updated = &*supply - &coin.amount;
            *supply = updated;
        }
        Ok(())
    }
}
