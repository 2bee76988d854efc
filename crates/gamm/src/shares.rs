//! Mint, burn and transfer of one pool's share denomination.

use {
    crate::{
        bank::Bank,
        pool::{Coin, MODULE_NAME},
    },
    anyhow::Result,
    number::Int,
};

/// A view of the bank scoped to a single pool's share denom.
///
/// All four operations go through the module escrow; the pool's recorded
/// total supply is maintained by the service, not here.
pub struct ShareLedger<'a, B: ?Sized> {
    denom: &'a str,
    bank: &'a mut B,
}

impl<'a, B: Bank + ?Sized> ShareLedger<'a, B> {
    pub fn new(denom: &'a str, bank: &'a mut B) -> Self {
        Self { denom, bank }
    }

    fn share(&self, amount: &Int) -> [Coin; 1] {
        [Coin::new(self.denom, amount.clone())]
    }

    /// Mints `amount` shares into the module escrow.
    pub fn mint(&mut self, amount: &Int) -> Result<()> {
        let coins = self.share(amount);
        self.bank.mint_coins(MODULE_NAME, &coins)
    }

    /// Burns `amount` shares held by the module escrow.
    pub fn burn(&mut self, amount: &Int) -> Result<()> {
        let coins = self.share(amount);
        self.bank.burn_coins(MODULE_NAME, &coins)
    }

    /// Transfers `amount` shares from the module escrow to `to`.
    pub fn push(&mut self, to: &str, amount: &Int) -> Result<()> {
        let coins = self.share(amount);
        self.bank.send_from_module_to_account(MODULE_NAME, to, &coins)
    }

    /// Transfers `amount` shares from `from` to the module escrow.
    pub fn pull(&mut self, from: &str, amount: &Int) -> Result<()> {
        let coins = self.share(amount);
        self.bank.send_from_account_to_module(from, MODULE_NAME, &coins)
    }
}
