//! Financial report generation.
//!
//! This module provides pure business logic for generating financial reports:
//! - Balance Sheet (貸借対照表)
//! - Profit & Loss (損益計算書)
//! - Trial Balance (試算表)
//! - Cash Flow, direct method
//! - CSV export of all of the above

pub mod cash_flow;
pub mod error;
pub mod export;
pub mod service;
pub mod types;


pub use cash_flow::activity_for;
pub use error::ReportError;
pub use export::{export_csv, file_name};
pub use service::{ReportService, categorize_balance_sheet, categorize_profit_loss};
pub use types::*;
