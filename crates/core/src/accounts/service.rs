//! Chart of accounts service.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use choubo_shared::types::AccountId;
use choubo_shared::{AppResult, FieldErrors};

use super::tree::AccountTree;
use super::types::{Account, AccountType};
use crate::ledger::{DateRange, LedgerLine, account_balances};
use crate::schema::{AccountInput, field_errors};

/// One account of the hierarchy with its own and rolled-up balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountNode {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Parent account.
    pub parent_id: Option<AccountId>,
    /// Roots are 0.
    pub depth: usize,
    /// Balance of the account's own lines.
    pub balance: Decimal,
    /// Own balance plus every descendant's.
    pub total: Decimal,
}

/// Chart of accounts service.
pub struct AccountService;

impl AccountService {
    /// Validates an account form against the existing chart.
    ///
    /// # Errors
    ///
    /// Returns field errors for schema problems, a code already in use, or a
    /// parent that is missing or of a different type.
    pub fn prepare_account(input: AccountInput, existing: &[Account]) -> AppResult<Account> {
        let mut errors: FieldErrors = field_errors(&input);

        if existing.iter().any(|a| a.code == input.code) {
            errors.add("code", "This account code is already in use");
        }
        if let Some(parent_id) = input.parent_id {
            match existing.iter().find(|a| a.id == parent_id) {
                None => errors.add("parent_id", "The parent account does not exist"),
                Some(parent) if parent.account_type != input.account_type => {
                    errors.add("parent_id", "The parent account must have the same type");
                }
                Some(_) => {}
            }
        }
        errors.into_result()?;

        let account = input.into_account();
        let mut chart = existing.to_vec();
        chart.push(account.clone());
        AccountTree::build(chart)?;
        Ok(account)
    }

    /// Moves an account under a new parent and returns the updated chart.
    ///
    /// # Errors
    ///
    /// Fails when the chart is inconsistent, the account or parent is
    /// missing, or the move would make the account its own ancestor.
    pub fn reparent(
        accounts: &[Account],
        account: AccountId,
        new_parent: Option<AccountId>,
    ) -> AppResult<Vec<Account>> {
        let mut tree = AccountTree::build(accounts.to_vec())?;
        tree.reparent(account, new_parent)?;
        Ok(tree.accounts().cloned().collect())
    }

    /// Lists the chart depth-first with balances rolled up into parents.
    ///
    /// # Errors
    ///
    /// Fails on an inconsistent chart, an inverted range or lines on unknown
    /// accounts.
    pub fn hierarchy(
        accounts: &[Account],
        lines: &[LedgerLine],
        range: &DateRange,
    ) -> AppResult<Vec<AccountNode>> {
        let tree = AccountTree::build(accounts.to_vec())?;
        let own: HashMap<AccountId, Decimal> = account_balances(accounts, lines, range)?
            .into_iter()
            .map(|b| (b.account_id, b.balance))
            .collect();
        let totals = tree.rollup(&own);

        let mut nodes = Vec::with_capacity(tree.len());
        for root in tree.roots() {
            for id in std::iter::once(*root).chain(tree.descendants(*root)) {
                let Some(account) = tree.get(id) else {
                    continue;
                };
                nodes.push(AccountNode {
                    account_id: id,
                    code: account.code.clone(),
                    name: account.name.clone(),
                    account_type: account.account_type,
                    parent_id: account.parent_id,
                    depth: tree.depth(id),
                    balance: own.get(&id).copied().unwrap_or_default(),
                    total: totals.get(&id).copied().unwrap_or_default(),
                });
            }
        }
        Ok(nodes)
    }
}
