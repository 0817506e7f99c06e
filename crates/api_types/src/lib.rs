use serde::{Deserialize, Serialize};

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginRequest {
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LoginResponse {
        pub token: String,
        /// Display name of the user.
        pub name: String,
        pub user_id: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SignupRequest {
        pub name: String,
        pub email: String,
        pub password: String,
    }
}

pub mod account {
    use super::*;

    /// A bank account owned by the logged-in user.
    ///
    /// Accounts are read-only on the client: balances change only on the
    /// server and must be fetched again after a transaction.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Account {
        pub id: i64,
        pub bank_name: String,
        #[serde(default)]
        pub bank_code: Option<String>,
        pub account_number: String,
        /// Balance in major units, as stored by the backend.
        #[serde(default)]
        pub balance: f64,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct IdRef {
        pub id: i64,
    }

    /// Request body for `POST /account/add`.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct NewAccount {
        pub bank_name: String,
        pub bank_code: Option<String>,
        pub account_number: String,
        pub user: IdRef,
    }
}

pub mod transaction {
    use super::*;
    use chrono::NaiveDateTime;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum TransactionType {
        SelfTransfer,
        TransferToOthers,
        BillPayment,
        Upi,
    }

    impl TransactionType {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::SelfTransfer => "SELF_TRANSFER",
                Self::TransferToOthers => "TRANSFER_TO_OTHERS",
                Self::BillPayment => "BILL_PAYMENT",
                Self::Upi => "UPI",
            }
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum BillingType {
        Electricity,
        Rent,
        Water,
    }

    impl BillingType {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Electricity => "ELECTRICITY",
                Self::Rent => "RENT",
                Self::Water => "WATER",
            }
        }
    }

    /// The single kind-specific identifier carried by a bill or UPI payment.
    ///
    /// Flattened into [`TransactionRequest`], so each variant becomes one
    /// top-level JSON key (`customerId`, `propertyName`, `rrNumber`, `upiId`).
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum PaymentReference {
        CustomerId(String),
        PropertyName(String),
        RrNumber(String),
        UpiId(String),
    }

    /// Request body for `POST /api/transaction`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionRequest {
        pub user_id: i64,
        pub from_account_number: String,
        /// `null` for bill and UPI payments.
        pub to_account_number: Option<String>,
        /// Amount in major units. Must be > 0.
        pub amount: f64,
        pub transaction_type: TransactionType,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub billing_type: Option<BillingType>,
        #[serde(flatten)]
        pub reference: Option<PaymentReference>,
    }

    impl TransactionRequest {
        /// Returns the legacy `/transaction/pay` body, available only for
        /// account-to-account transfers.
        pub fn to_legacy(&self) -> Option<LegacyPayment> {
            let to_account_number = self.to_account_number.clone()?;
            match self.transaction_type {
                TransactionType::SelfTransfer | TransactionType::TransferToOthers => {
                    Some(LegacyPayment {
                        from_account_number: self.from_account_number.clone(),
                        to_account_number,
                        amount: self.amount,
                    })
                }
                TransactionType::BillPayment | TransactionType::Upi => None,
            }
        }
    }

    /// Request body for the legacy `POST /transaction/pay`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LegacyPayment {
        pub from_account_number: String,
        pub to_account_number: String,
        pub amount: f64,
    }

    /// One row of `GET /api/transactions/{userId}`.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionHistoryEntry {
        pub id: i64,
        pub transaction_type: Option<String>,
        pub from_account_id: Option<i64>,
        pub to_account_id: Option<i64>,
        pub amount: f64,
        pub upi_id: Option<String>,
        pub status: Option<String>,
        /// Server local time, without offset.
        pub created_at: Option<NaiveDateTime>,
    }
}

pub mod loan {
    use super::*;
    use crate::account::IdRef;

    #[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LoanStatus {
        pub has_active_loan: bool,
    }

    /// Request body for `POST /loan/apply`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoanApplication {
        pub account: IdRef,
        pub amount: f64,
    }
}

pub mod feedback {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Feedback {
        pub user_id: i64,
        pub username: String,
        pub feedback_text: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Rating {
        pub user_id: i64,
        /// 1 to 5 stars.
        pub rating: u8,
    }
}
