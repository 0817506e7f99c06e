use api_types::{account::Account, transaction::BillingType};

use crate::{
    Amount, ValidationError,
    intent::{BillDetails, TransferIntent, TransferKind, bill_label, bill_reference_label},
};

/// A transfer that passed [`validate_transfer`].
///
/// It can only be obtained from the validator, so the request builder never
/// sees an intent that was rejected.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedTransfer<'a> {
    from: &'a Account,
    amount: Amount,
    target: Target<'a>,
}

/// Destination of a validated transfer. Text fields are already trimmed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Target<'a> {
    OwnAccount(&'a Account),
    OtherAccount(&'a str),
    Bill {
        billing_type: BillingType,
        reference: &'a str,
    },
    Upi(&'a str),
}

impl<'a> ValidatedTransfer<'a> {
    pub fn from(&self) -> &'a Account {
        self.from
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn target(&self) -> Target<'a> {
        self.target
    }

    /// Account number that has to be resolved before submission, if any.
    pub fn recipient(&self) -> Option<&'a str> {
        match self.target {
            Target::OtherAccount(number) => Some(number),
            _ => None,
        }
    }
}

/// Checks the shape of a transfer intent before anything is sent.
///
/// Rules are evaluated in a fixed order and the first failure wins:
/// source, destination, amount, distinct accounts (self transfer), bill
/// identifier (bill payment), UPI id (UPI). Balance is never checked here.
pub fn validate_transfer(intent: &TransferIntent) -> Result<ValidatedTransfer<'_>, ValidationError> {
    let from = intent.from.as_ref().ok_or(ValidationError::MissingSource)?;

    match &intent.kind {
        TransferKind::SelfTransfer { to: None } => {
            return Err(ValidationError::MissingDestination);
        }
        TransferKind::ToOthers { to_account_number } if to_account_number.trim().is_empty() => {
            return Err(ValidationError::MissingDestination);
        }
        _ => {}
    }

    let amount = parse_positive(&intent.amount)?;

    let target = match &intent.kind {
        TransferKind::SelfTransfer { to: Some(to) } => {
            if to.id == from.id || to.account_number == from.account_number {
                return Err(ValidationError::SameAccount);
            }
            Target::OwnAccount(to)
        }
        TransferKind::SelfTransfer { to: None } => return Err(ValidationError::MissingDestination),
        TransferKind::ToOthers { to_account_number } => {
            Target::OtherAccount(to_account_number.trim())
        }
        TransferKind::BillPayment(BillDetails {
            billing_type,
            reference,
        }) => {
            let reference = reference.trim();
            if reference.is_empty() {
                return Err(ValidationError::MissingBillReference {
                    field: bill_reference_label(*billing_type),
                    bill: bill_label(*billing_type),
                });
            }
            Target::Bill {
                billing_type: *billing_type,
                reference,
            }
        }
        TransferKind::Upi { upi_id } => {
            let upi_id = upi_id.trim();
            if upi_id.is_empty() {
                return Err(ValidationError::MissingUpiId);
            }
            Target::Upi(upi_id)
        }
    };

    Ok(ValidatedTransfer {
        from,
        amount,
        target,
    })
}

/// Parses user text into a strictly positive amount.
pub fn parse_positive(raw: &str) -> Result<Amount, ValidationError> {
    let amount = raw
        .parse::<Amount>()
        .map_err(ValidationError::InvalidAmount)?;
    if !amount.is_positive() {
        return Err(ValidationError::NonPositiveAmount);
    }
    Ok(amount)
}

fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    require(email, "Email")?;
    require(password, "Password")
}

pub fn validate_signup(name: &str, email: &str, password: &str) -> Result<(), ValidationError> {
    require(name, "Name")?;
    require(email, "Email")?;
    if !email.contains('@') {
        return Err(ValidationError::InvalidEmail);
    }
    require(password, "Password")
}

pub fn validate_new_account(bank_name: &str, account_number: &str) -> Result<(), ValidationError> {
    require(bank_name, "Bank name")?;
    require(account_number, "Account number")
}

pub fn validate_loan(account: Option<&Account>, amount: &str) -> Result<Amount, ValidationError> {
    if account.is_none() {
        return Err(ValidationError::MissingField("Account"));
    }
    parse_positive(amount)
}

pub fn validate_feedback(text: &str) -> Result<(), ValidationError> {
    require(text, "Feedback")
}

pub fn validate_rating(stars: u8) -> Result<(), ValidationError> {
    if !(1..=5).contains(&stars) {
        return Err(ValidationError::RatingOutOfRange(stars));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AmountError;

    fn account(id: i64, number: &str) -> Account {
        Account {
            id,
            bank_name: "State Bank".to_string(),
            bank_code: None,
            account_number: number.to_string(),
            balance: 1000.0,
        }
    }

    fn intent(kind: TransferKind, amount: &str) -> TransferIntent {
        TransferIntent {
            from: Some(account(1, "AC100")),
            amount: amount.to_string(),
            kind,
        }
    }

    fn every_kind() -> Vec<TransferKind> {
        vec![
            TransferKind::SelfTransfer {
                to: Some(account(2, "AC200")),
            },
            TransferKind::ToOthers {
                to_account_number: "AC900".to_string(),
            },
            TransferKind::BillPayment(BillDetails {
                billing_type: BillingType::Rent,
                reference: "Flat 4B".to_string(),
            }),
            TransferKind::Upi {
                upi_id: "shop@upi".to_string(),
            },
        ]
    }

    #[test]
    fn missing_source_wins_over_everything() {
        let mut intent = intent(TransferKind::SelfTransfer { to: None }, "abc");
        intent.from = None;
        assert_eq!(validate_transfer(&intent), Err(ValidationError::MissingSource));
    }

    #[test]
    fn destination_checked_before_amount() {
        let intent = intent(
            TransferKind::ToOthers {
                to_account_number: "   ".to_string(),
            },
            "-3",
        );
        assert_eq!(
            validate_transfer(&intent),
            Err(ValidationError::MissingDestination)
        );
    }

    #[test]
    fn bad_amounts_rejected_for_every_kind() {
        for kind in every_kind() {
            for raw in ["0", "-5", "0.00", "ten", "", "12.345"] {
                let err = validate_transfer(&intent(kind.clone(), raw)).unwrap_err();
                assert!(
                    matches!(
                        err,
                        ValidationError::NonPositiveAmount | ValidationError::InvalidAmount(_)
                    ),
                    "{raw:?} accepted for {kind:?}"
                );
            }
        }
    }

    #[test]
    fn non_numeric_amount_names_the_parse_failure() {
        let err = validate_transfer(&intent(every_kind().remove(1), "12abc")).unwrap_err();
        assert_eq!(err, ValidationError::InvalidAmount(AmountError::Invalid));
    }

    #[test]
    fn self_transfer_to_same_account_rejected() {
        let intent = intent(
            TransferKind::SelfTransfer {
                to: Some(account(1, "AC100")),
            },
            "50",
        );
        assert_eq!(validate_transfer(&intent), Err(ValidationError::SameAccount));
    }

    #[test]
    fn amount_checked_before_same_account() {
        let intent = intent(
            TransferKind::SelfTransfer {
                to: Some(account(1, "AC100")),
            },
            "0",
        );
        assert_eq!(
            validate_transfer(&intent),
            Err(ValidationError::NonPositiveAmount)
        );
    }

    #[test]
    fn empty_customer_id_rejected_with_field_message() {
        let intent = intent(
            TransferKind::BillPayment(BillDetails {
                billing_type: BillingType::Electricity,
                reference: String::new(),
            }),
            "120",
        );
        let err = validate_transfer(&intent).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Customer ID is required for electricity bills."
        );
    }

    #[test]
    fn blank_upi_id_rejected() {
        let intent = intent(
            TransferKind::Upi {
                upi_id: " ".to_string(),
            },
            "1",
        );
        assert_eq!(validate_transfer(&intent), Err(ValidationError::MissingUpiId));
    }

    #[test]
    fn valid_transfer_to_others_exposes_trimmed_recipient() {
        let intent = intent(
            TransferKind::ToOthers {
                to_account_number: " AC200 ".to_string(),
            },
            "500.00",
        );
        let validated = validate_transfer(&intent).unwrap();
        assert_eq!(validated.recipient(), Some("AC200"));
        assert_eq!(validated.amount(), Amount::new(50_000));
        assert_eq!(validated.from().account_number, "AC100");
    }

    #[test]
    fn side_forms() {
        assert_eq!(
            validate_login("", "x"),
            Err(ValidationError::MissingField("Email"))
        );
        assert_eq!(
            validate_signup("Asha", "asha.example.com", "pw"),
            Err(ValidationError::InvalidEmail)
        );
        assert!(validate_signup("Asha", "asha@example.com", "pw").is_ok());
        assert_eq!(
            validate_new_account("SBI", " "),
            Err(ValidationError::MissingField("Account number"))
        );
        assert_eq!(
            validate_loan(None, "100"),
            Err(ValidationError::MissingField("Account"))
        );
        assert_eq!(
            validate_loan(Some(&account(1, "AC100")), "2500"),
            Ok(Amount::new(250_000))
        );
        assert!(validate_feedback("  ").is_err());
        assert_eq!(validate_rating(0), Err(ValidationError::RatingOutOfRange(0)));
        assert!(validate_rating(5).is_ok());
    }
}
