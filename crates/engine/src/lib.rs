//! Transaction workflow shared by every payment screen.
//!
//! The flow is always the same: the screen collects a [`TransferIntent`],
//! [`validate_transfer`] checks its shape, [`build_request`] turns the
//! validated transfer into the wire request, and once the API client has
//! answered, [`interpret`] decides what the user is told and where the screen
//! goes next.
//!
//! Nothing in this crate performs I/O.

pub use build::build_request;
pub use error::{AmountError, ValidationError};
pub use intent::{BillDetails, TransferIntent, TransferKind, bill_reference_label};
pub use money::Amount;
pub use outcome::{ApiFailure, NextStep, Outcome, interpret, interpret_recipient};
pub use validate::{
    Target, ValidatedTransfer, parse_positive, validate_feedback, validate_loan, validate_login,
    validate_new_account, validate_rating, validate_signup, validate_transfer,
};

mod build;
mod error;
mod intent;
mod money;
mod outcome;
mod validate;
