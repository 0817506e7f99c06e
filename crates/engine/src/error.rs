//! Errors raised by the client-side checks.
//!
//! - [`AmountError`] is returned when user text cannot be read as an amount.
//! - [`ValidationError`] names the first rule a form failed. Its `Display` is
//!   the message shown to the user.
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,
    #[error("amount is not a number")]
    Invalid,
    #[error("amount has more than two decimals")]
    TooManyDecimals,
    #[error("amount is too large")]
    TooLarge,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Select the account to pay from.")]
    MissingSource,
    #[error("Select or enter the destination account.")]
    MissingDestination,
    #[error("Enter a valid amount: {0}.")]
    InvalidAmount(AmountError),
    #[error("Amount must be greater than zero.")]
    NonPositiveAmount,
    #[error("From and To accounts cannot be the same.")]
    SameAccount,
    /// A bill payment is missing the identifier its billing type requires.
    #[error("{field} is required for {bill} bills.")]
    MissingBillReference {
        field: &'static str,
        bill: &'static str,
    },
    #[error("Enter the UPI ID to pay.")]
    MissingUpiId,
    #[error("{0} is required.")]
    MissingField(&'static str),
    #[error("Enter a valid email address.")]
    InvalidEmail,
    #[error("Rating must be between 1 and 5 stars, got {0}.")]
    RatingOutOfRange(u8),
}
