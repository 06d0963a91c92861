//! Account hierarchy.
//!
//! Parent links must form a forest: every parent exists and no account is
//! its own ancestor.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use choubo_shared::types::AccountId;

use super::error::AccountError;
use super::types::Account;

/// Validated account hierarchy.
#[derive(Debug, Clone, Default)]
pub struct AccountTree {
    accounts: HashMap<AccountId, Account>,
    children: HashMap<AccountId, Vec<AccountId>>,
    roots: Vec<AccountId>,
}

impl AccountTree {
    /// Builds a tree, rejecting duplicate ids/codes, unknown parents and cycles.
    pub fn build(accounts: Vec<Account>) -> Result<Self, AccountError> {
        let mut by_id = HashMap::with_capacity(accounts.len());
        let mut codes = HashSet::with_capacity(accounts.len());

        for account in accounts {
            if !codes.insert(account.code.clone()) {
                return Err(AccountError::DuplicateCode(account.code));
            }
            let id = account.id;
            if by_id.insert(id, account).is_some() {
                return Err(AccountError::DuplicateId(id));
            }
        }

        for account in by_id.values() {
            if let Some(parent) = account.parent_id {
                if !by_id.contains_key(&parent) {
                    return Err(AccountError::UnknownParent {
                        account: account.id,
                        parent,
                    });
                }
            }
        }

        let mut tree = Self {
            accounts: by_id,
            children: HashMap::new(),
            roots: Vec::new(),
        };

        let ids: Vec<AccountId> = tree.accounts.keys().copied().collect();
        for id in &ids {
            if tree.walks_into_cycle(*id) {
                return Err(AccountError::Cycle(*id));
            }
        }

        tree.index();
        Ok(tree)
    }

    /// Returns the account with this id.
    #[must_use]
    pub fn get(&self, id: AccountId) -> Option<&Account> {
        self.accounts.get(&id)
    }

    /// Returns the account with this code.
    #[must_use]
    pub fn find_by_code(&self, code: &str) -> Option<&Account> {
        self.accounts.values().find(|a| a.code == code)
    }

    /// Returns true if the tree has no accounts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Number of accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Iterates over all accounts in code order.
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        let mut all: Vec<&Account> = self.accounts.values().collect();
        all.sort_by(|a, b| a.code.cmp(&b.code));
        all.into_iter()
    }

    /// Top-level accounts in code order.
    #[must_use]
    pub fn roots(&self) -> &[AccountId] {
        &self.roots
    }

    /// Direct children in code order.
    #[must_use]
    pub fn children(&self, id: AccountId) -> &[AccountId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Ancestors from the direct parent up to the root.
    #[must_use]
    pub fn ancestors(&self, id: AccountId) -> Vec<AccountId> {
        let mut out = Vec::new();
        let mut current = self.accounts.get(&id).and_then(|a| a.parent_id);
        while let Some(parent) = current {
            out.push(parent);
            current = self.accounts.get(&parent).and_then(|a| a.parent_id);
        }
        out
    }

    /// All descendants in depth-first, code order.
    #[must_use]
    pub fn descendants(&self, id: AccountId) -> Vec<AccountId> {
        let mut out = Vec::new();
        let mut stack: Vec<AccountId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Depth of an account (roots are 0).
    #[must_use]
    pub fn depth(&self, id: AccountId) -> usize {
        self.ancestors(id).len()
    }

    /// Returns true if making `new_parent` the parent of `account` would form a cycle.
    #[must_use]
    pub fn would_create_cycle(&self, account: AccountId, new_parent: AccountId) -> bool {
        account == new_parent || self.ancestors(new_parent).contains(&account)
    }

    /// Moves an account under a new parent (or to the top level).
    pub fn reparent(
        &mut self,
        account: AccountId,
        new_parent: Option<AccountId>,
    ) -> Result<(), AccountError> {
        if !self.accounts.contains_key(&account) {
            return Err(AccountError::AccountNotFound(account));
        }
        if let Some(parent) = new_parent {
            if !self.accounts.contains_key(&parent) {
                return Err(AccountError::UnknownParent { account, parent });
            }
            if self.would_create_cycle(account, parent) {
                return Err(AccountError::Cycle(account));
            }
        }
        if let Some(entry) = self.accounts.get_mut(&account) {
            entry.parent_id = new_parent;
        }
        self.index();
        Ok(())
    }

    /// Rolls balances up the tree: each account gets its own balance plus
    /// the balances of all its descendants.
    #[must_use]
    pub fn rollup(&self, balances: &HashMap<AccountId, Decimal>) -> HashMap<AccountId, Decimal> {
        let mut totals: HashMap<AccountId, Decimal> = self
            .accounts
            .keys()
            .map(|id| (*id, balances.get(id).copied().unwrap_or_default()))
            .collect();

        for (id, own) in balances {
            if !self.accounts.contains_key(id) {
                continue;
            }
            for ancestor in self.ancestors(*id) {
                *totals.entry(ancestor).or_default() += *own;
            }
        }
        totals
    }

    fn walks_into_cycle(&self, start: AccountId) -> bool {
        let mut seen = HashSet::new();
        let mut current = Some(start);
        while let Some(id) = current {
            if !seen.insert(id) {
                return true;
            }
            current = self.accounts.get(&id).and_then(|a| a.parent_id);
        }
        false
    }

    fn index(&mut self) {
        let by_code = |accounts: &HashMap<AccountId, Account>, ids: &mut Vec<AccountId>| {
            ids.sort_by(|a, b| accounts[a].code.cmp(&accounts[b].code));
        };

        let mut children: HashMap<AccountId, Vec<AccountId>> = HashMap::new();
        let mut roots = Vec::new();
        for account in self.accounts.values() {
            match account.parent_id {
                Some(parent) => children.entry(parent).or_default().push(account.id),
                None => roots.push(account.id),
            }
        }
        for ids in children.values_mut() {
            by_code(&self.accounts, ids);
        }
        by_code(&self.accounts, &mut roots);

        self.children = children;
        self.roots = roots;
    }
}
