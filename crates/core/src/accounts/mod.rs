//! Chart of accounts.
//!
//! - Account types and statement categories
//! - The account tree (parent links, cycle checks, balance roll-up)
//! - Account service for new accounts, re-parenting and the hierarchy view

pub mod error;
pub mod service;
pub mod tree;
pub mod types;

pub use error::AccountError;
pub use service::{AccountNode, AccountService};
pub use tree::AccountTree;
pub use types::{Account, AccountCategory, AccountType};
