//! # Asset Ledger Seam
//!
//! The registry never moves value itself. It asks an [`AssetLedger`] to
//! move it and relies on one property only: a transfer either fully
//! happens or fails with no effect.
//!
//! [`InMemoryLedger`] is a token-style ledger with balances and allowances,
//! used by the CLI simulator and tests. `block_recipient` makes an account
//! refuse incoming transfers so settlement failures can be exercised.

use std::collections::{BTreeMap, BTreeSet};

use potdraw_core::{AccountId, Amount};

use crate::error::TransferError;

/// All-or-nothing asset transfers.
pub trait AssetLedger {
    /// Move `amount` from `from` to `to` on behalf of `spender`, consuming
    /// `spender`'s allowance over `from`'s funds.
    fn transfer_from(
        &mut self,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), TransferError>;

    /// Move `amount` from `from` (an account the caller controls) to `to`.
    fn transfer(&mut self, from: &AccountId, to: &AccountId, amount: Amount)
        -> Result<(), TransferError>;

    /// Current balance of `account`.
    fn balance_of(&self, account: &AccountId) -> Amount;

    /// Amount `spender` may still move out of `owner`.
    fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Amount;
}

/// Balances and allowances held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    balances: BTreeMap<AccountId, Amount>,
    allowances: BTreeMap<(AccountId, AccountId), Amount>,
    blocked: BTreeSet<AccountId>,
}

impl InMemoryLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` to `account` out of thin air.
    pub fn mint(&mut self, account: &AccountId, amount: Amount) -> Result<(), TransferError> {
        let balance = self.balance_of(account);
        let updated = balance
            .checked_add(amount)
            .ok_or_else(|| TransferError::BalanceOverflow {
                account: account.clone(),
            })?;
        self.balances.insert(account.clone(), updated);
        Ok(())
    }

    /// Set the allowance `spender` has over `owner`'s funds.
    pub fn approve(&mut self, owner: &AccountId, spender: &AccountId, amount: Amount) {
        self.allowances
            .insert((owner.clone(), spender.clone()), amount);
    }

    /// Make `account` refuse every incoming transfer.
    pub fn block_recipient(&mut self, account: &AccountId) {
        self.blocked.insert(account.clone());
    }

    /// Undo [`block_recipient`](Self::block_recipient).
    pub fn unblock_recipient(&mut self, account: &AccountId) {
        self.blocked.remove(account);
    }

    /// Sum of every balance.
    pub fn total_supply(&self) -> u128 {
        self.balances.values().map(|b| u128::from(*b)).sum()
    }

    fn move_funds(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), TransferError> {
        if self.blocked.contains(to) {
            return Err(TransferError::RecipientRejected {
                account: to.clone(),
            });
        }
        let available = self.balance_of(from);
        if available < amount {
            return Err(TransferError::InsufficientBalance {
                account: from.clone(),
                needed: amount,
                available,
            });
        }
        if from == to {
            return Ok(());
        }
        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or_else(|| TransferError::BalanceOverflow {
                account: to.clone(),
            })?;
        self.balances.insert(from.clone(), available - amount);
        self.balances.insert(to.clone(), credited);
        Ok(())
    }
}

impl AssetLedger for InMemoryLedger {
    fn transfer_from(
        &mut self,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), TransferError> {
        let allowed = self.allowance(from, spender);
        if allowed < amount {
            return Err(TransferError::InsufficientAllowance {
                owner: from.clone(),
                spender: spender.clone(),
                needed: amount,
                available: allowed,
            });
        }
        self.move_funds(from, to, amount)?;
        self.allowances
            .insert((from.clone(), spender.clone()), allowed - amount);
        Ok(())
    }

    fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), TransferError> {
        self.move_funds(from, to, amount)
    }

    fn balance_of(&self, account: &AccountId) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Amount {
        self.allowances
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(0)
    }
}
