//! Input schemas.
//!
//! Each form input derives `validator::Validate`; failures are aggregated
//! per field into `FieldErrors` rather than stopping at the first problem.

pub mod account;
pub mod journal;
pub mod partner;
pub mod rules;

pub(crate) mod common;

pub use account::AccountInput;
pub use journal::{JournalEntryInput, JournalLineInput};
pub use partner::{BankAccountInput, PartnerInput};
pub use rules::MappingRuleInput;

use choubo_shared::FieldErrors;
use validator::Validate;

/// Runs the derived validation of an input, collecting per-field messages.
pub fn field_errors<T: Validate>(input: &T) -> FieldErrors {
    match input.validate() {
        Ok(()) => FieldErrors::new(),
        Err(errors) => FieldErrors::from(errors),
    }
}
