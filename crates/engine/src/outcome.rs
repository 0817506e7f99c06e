use crate::ValidationError;

/// How a backend call failed, as seen by the result interpreter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiFailure {
    /// Non-2xx response. `message` is the body text, if any.
    Status { status: u16, message: String },
    Timeout,
    /// Connection refused, DNS failure, broken body and similar.
    Unreachable(String),
}

/// User-facing result of a submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Success(String),
    InsufficientFunds,
    ValidationRejected(String),
    RecipientNotFound,
    NetworkFailure,
    /// Token missing or expired: the session must be dropped.
    Unauthorized,
    Failed(String),
}

/// Where the screen goes after an outcome is shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NextStep {
    /// Refresh accounts and show the transaction history.
    ShowHistory,
    /// Clear the session and go back to login.
    Relogin,
    /// Keep the form as it is; the user may retry.
    Stay,
}

const DEFAULT_SUCCESS: &str = "Transaction completed.";

impl Outcome {
    pub fn next_step(&self) -> NextStep {
        match self {
            Self::Success(_) => NextStep::ShowHistory,
            Self::Unauthorized => NextStep::Relogin,
            Self::InsufficientFunds
            | Self::ValidationRejected(_)
            | Self::RecipientNotFound
            | Self::NetworkFailure
            | Self::Failed(_) => NextStep::Stay,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Success(message) => message.clone(),
            Self::InsufficientFunds => "Insufficient balance in the selected account.".to_string(),
            Self::ValidationRejected(message) => message.clone(),
            Self::RecipientNotFound => "Recipient account not found.".to_string(),
            Self::NetworkFailure => "Server not reachable, try again.".to_string(),
            Self::Unauthorized => "Session expired, please log in again.".to_string(),
            Self::Failed(message) => format!("Transaction failed: {message}"),
        }
    }
}

impl From<ApiFailure> for Outcome {
    fn from(failure: ApiFailure) -> Self {
        match failure {
            ApiFailure::Timeout | ApiFailure::Unreachable(_) => Self::NetworkFailure,
            ApiFailure::Status { status, message } => match status {
                401 | 403 => Self::Unauthorized,
                408 | 504 => Self::NetworkFailure,
                400 | 409 | 422 => {
                    if mentions_insufficient_funds(&message) {
                        Self::InsufficientFunds
                    } else if message.trim().is_empty() {
                        Self::ValidationRejected("Request rejected by the bank.".to_string())
                    } else {
                        Self::ValidationRejected(message)
                    }
                }
                _ if message.trim().is_empty() => Self::Failed(format!("status {status}")),
                _ => Self::Failed(message),
            },
        }
    }
}

impl From<ValidationError> for Outcome {
    fn from(err: ValidationError) -> Self {
        Self::ValidationRejected(err.to_string())
    }
}

/// Maps the reply of a submission to what the user is told.
pub fn interpret(reply: Result<String, ApiFailure>) -> Outcome {
    match reply {
        Ok(body) => {
            let body = body.trim();
            if body.is_empty() {
                Outcome::Success(DEFAULT_SUCCESS.to_string())
            } else {
                Outcome::Success(body.to_string())
            }
        }
        Err(failure) => failure.into(),
    }
}

/// Interprets the recipient lookup done before a transfer to others.
///
/// A 404 becomes [`Outcome::RecipientNotFound`] so that it is never confused
/// with a failure of the transfer itself.
pub fn interpret_recipient(lookup: Result<i64, ApiFailure>) -> Result<i64, Outcome> {
    match lookup {
        Ok(id) => Ok(id),
        Err(ApiFailure::Status { status: 404, .. }) => Err(Outcome::RecipientNotFound),
        Err(failure) => Err(failure.into()),
    }
}

fn mentions_insufficient_funds(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("insufficient")
}
