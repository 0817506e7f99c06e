use api_types::{account::Account, transaction::BillingType};

/// What the user filled in on a transfer screen.
///
/// An intent lives only as long as the screen that owns it and is never
/// persisted. Fields are raw user input: nothing here is validated yet, see
/// [`crate::validate_transfer`].
#[derive(Clone, Debug, PartialEq)]
pub struct TransferIntent {
    pub from: Option<Account>,
    /// Amount exactly as typed.
    pub amount: String,
    pub kind: TransferKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TransferKind {
    /// Between two accounts of the logged-in user.
    SelfTransfer { to: Option<Account> },
    /// To a free-text account number, not verified as owned by the user.
    ToOthers { to_account_number: String },
    BillPayment(BillDetails),
    Upi { upi_id: String },
}

/// Bill payment fields. `reference` is the customer id, property name or RR
/// number depending on `billing_type`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BillDetails {
    pub billing_type: BillingType,
    pub reference: String,
}

/// Label of the identifier a bill of this type must carry.
pub fn bill_reference_label(billing_type: BillingType) -> &'static str {
    match billing_type {
        BillingType::Electricity => "Customer ID",
        BillingType::Rent => "Property name",
        BillingType::Water => "RR number",
    }
}

pub(crate) fn bill_label(billing_type: BillingType) -> &'static str {
    match billing_type {
        BillingType::Electricity => "electricity",
        BillingType::Rent => "rent",
        BillingType::Water => "water",
    }
}
