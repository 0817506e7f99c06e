use api_types::transaction::{BillingType, PaymentReference, TransactionRequest, TransactionType};

use crate::validate::{Target, ValidatedTransfer};

/// Turns a validated transfer into the body of `POST /api/transaction`.
///
/// Pure: no validation, no I/O. The shape depends only on the target:
/// account transfers carry a destination number, bill and UPI payments carry
/// `null` plus exactly one identifier.
pub fn build_request(user_id: i64, transfer: &ValidatedTransfer<'_>) -> TransactionRequest {
    let (transaction_type, to_account_number, billing_type, reference) = match transfer.target() {
        Target::OwnAccount(to) => (
            TransactionType::SelfTransfer,
            Some(to.account_number.clone()),
            None,
            None,
        ),
        Target::OtherAccount(number) => (
            TransactionType::TransferToOthers,
            Some(number.to_string()),
            None,
            None,
        ),
        Target::Bill {
            billing_type,
            reference,
        } => (
            TransactionType::BillPayment,
            None,
            Some(billing_type),
            Some(bill_reference(billing_type, reference)),
        ),
        Target::Upi(upi_id) => (
            TransactionType::Upi,
            None,
            None,
            Some(PaymentReference::UpiId(upi_id.to_string())),
        ),
    };

    TransactionRequest {
        user_id,
        from_account_number: transfer.from().account_number.clone(),
        to_account_number,
        amount: transfer.amount().to_major(),
        transaction_type,
        billing_type,
        reference,
    }
}

fn bill_reference(billing_type: BillingType, reference: &str) -> PaymentReference {
    let reference = reference.to_string();
    match billing_type {
        BillingType::Electricity => PaymentReference::CustomerId(reference),
        BillingType::Rent => PaymentReference::PropertyName(reference),
        BillingType::Water => PaymentReference::RrNumber(reference),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BillDetails, TransferIntent, TransferKind, validate_transfer};
    use api_types::account::Account;
    use serde_json::json;

    fn account(id: i64, number: &str) -> Account {
        Account {
            id,
            bank_name: "Canara".to_string(),
            bank_code: Some("CNRB".to_string()),
            account_number: number.to_string(),
            balance: 0.0,
        }
    }

    fn build(kind: TransferKind, amount: &str) -> TransactionRequest {
        let intent = TransferIntent {
            from: Some(account(1, "AC100")),
            amount: amount.to_string(),
            kind,
        };
        let validated = validate_transfer(&intent).unwrap();
        build_request(42, &validated)
    }

    #[test]
    fn transfer_to_others_round_trip() {
        let req = build(
            TransferKind::ToOthers {
                to_account_number: "AC200".to_string(),
            },
            "500.00",
        );
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({
                "userId": 42,
                "fromAccountNumber": "AC100",
                "toAccountNumber": "AC200",
                "amount": 500.0,
                "transactionType": "TRANSFER_TO_OTHERS",
            })
        );
    }

    #[test]
    fn self_transfer_uses_selected_account_number() {
        let req = build(
            TransferKind::SelfTransfer {
                to: Some(account(2, "AC200")),
            },
            "12,5",
        );
        assert_eq!(req.transaction_type, TransactionType::SelfTransfer);
        assert_eq!(req.to_account_number.as_deref(), Some("AC200"));
        assert_eq!(req.amount, 12.5);
        assert_eq!(req.billing_type, None);
        assert_eq!(req.reference, None);
    }

    #[test]
    fn bill_payment_carries_exactly_the_matching_identifier() {
        let cases = [
            (BillingType::Electricity, "customerId"),
            (BillingType::Rent, "propertyName"),
            (BillingType::Water, "rrNumber"),
        ];
        let identifiers = ["customerId", "propertyName", "rrNumber", "upiId"];

        for (billing_type, expected) in cases {
            let req = build(
                TransferKind::BillPayment(BillDetails {
                    billing_type,
                    reference: " REF-1 ".to_string(),
                }),
                "99",
            );
            let value = serde_json::to_value(&req).unwrap();
            let object = value.as_object().unwrap();

            let present: Vec<_> = identifiers
                .iter()
                .filter(|key| object.contains_key(**key))
                .collect();
            assert_eq!(present, vec![&expected]);
            assert_eq!(object[expected], json!("REF-1"));
            assert_eq!(object["toAccountNumber"], json!(null));
            assert_eq!(object["billingType"], json!(billing_type.as_str()));
        }
    }

    #[test]
    fn upi_payment_has_no_destination_account() {
        let req = build(
            TransferKind::Upi {
                upi_id: "grocer@okbank".to_string(),
            },
            "75.25",
        );
        assert_eq!(req.transaction_type, TransactionType::Upi);
        assert_eq!(req.to_account_number, None);
        assert_eq!(
            req.reference,
            Some(PaymentReference::UpiId("grocer@okbank".to_string()))
        );
        assert!(req.to_legacy().is_none());
    }
}
