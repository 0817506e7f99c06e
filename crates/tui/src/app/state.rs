use api_types::{
    account::Account,
    loan::LoanStatus,
    transaction::{BillingType, TransactionHistoryEntry},
};
use engine::{Amount, BillDetails, TransferIntent, TransferKind, bill_reference_label};

use super::form::{Field, FieldId, FormState};
use crate::session::SessionContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
}

impl ToastState {
    pub fn new(message: impl Into<String>, level: ToastLevel) -> Self {
        Self {
            message: message.into(),
            level,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Signup,
    Accounts,
    AddAccount,
    Transfer,
    History,
    Loan,
    Profile,
    Feedback,
}

impl Screen {
    /// Screens reachable from the tab bar once logged in.
    pub const TABS: [Screen; 6] = [
        Screen::Accounts,
        Screen::Transfer,
        Screen::History,
        Screen::Loan,
        Screen::Feedback,
        Screen::Profile,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Signup => "Sign up",
            Self::Accounts => "Accounts",
            Self::AddAccount => "Add account",
            Self::Transfer => "Pay",
            Self::History => "History",
            Self::Loan => "Loan",
            Self::Profile => "Profile",
            Self::Feedback => "Feedback",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    SelfTransfer,
    ToOthers,
    BillPayment,
    Upi,
}

impl TransferMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::SelfTransfer => "Self transfer",
            Self::ToOthers => "To others",
            Self::BillPayment => "Bill payment",
            Self::Upi => "UPI",
        }
    }
}

const BILL_TYPES: [BillingType; 3] = [BillingType::Electricity, BillingType::Rent, BillingType::Water];

fn account_label(account: &Account) -> String {
    format!(
        "{} {} ({})",
        account.bank_name,
        account.account_number,
        Amount::from_major(account.balance)
    )
}

fn account_options(accounts: &[Account]) -> Vec<String> {
    accounts.iter().map(account_label).collect()
}

fn default_index(accounts: &[Account], default_number: Option<&str>) -> Option<usize> {
    default_number
        .and_then(|number| accounts.iter().position(|a| a.account_number == number))
        .or(if accounts.is_empty() { None } else { Some(0) })
}

#[derive(Debug, Default)]
pub struct AccountsState {
    pub items: Vec<Account>,
    pub selected: usize,
    /// A fetch is in flight; further refreshes are skipped until it lands.
    pub loading: bool,
    pub loaded: bool,
    pub error: Option<String>,
    pub receive_link: Option<String>,
}

impl AccountsState {
    pub fn set(&mut self, items: Vec<Account>) {
        self.items = items;
        self.loaded = true;
        self.error = None;
        if self.selected >= self.items.len() {
            self.selected = self.items.len().saturating_sub(1);
        }
    }

    pub fn selected_account(&self) -> Option<&Account> {
        self.items.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.items.len() {
            self.selected += 1;
            self.receive_link = None;
        }
    }

    pub fn select_prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.receive_link = None;
        }
    }

    pub fn by_id(&self, id: i64) -> Option<&Account> {
        self.items.iter().find(|account| account.id == id)
    }
}

#[derive(Debug, Default)]
pub struct HistoryState {
    pub items: Vec<TransactionHistoryEntry>,
    pub selected: usize,
    pub loading: bool,
    pub error: Option<String>,
}

impl HistoryState {
    pub fn select_next(&mut self) {
        if self.selected + 1 < self.items.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

/// Payment form. Rebuilt every time the screen is opened so an intent never
/// outlives its visit.
#[derive(Debug)]
pub struct TransferState {
    pub mode: TransferMode,
    pub form: FormState,
}

impl TransferState {
    pub fn new(mode: TransferMode, accounts: &[Account], default_number: Option<&str>) -> Self {
        let options = account_options(accounts);
        let from = Field::choice(
            FieldId::From,
            "From",
            options.clone(),
            default_index(accounts, default_number),
        );
        let amount = Field::text(FieldId::Amount, "Amount");
        let fields = match mode {
            TransferMode::SelfTransfer => vec![
                from,
                Field::choice(FieldId::To, "To", options, None),
                amount,
            ],
            TransferMode::ToOthers => vec![
                from,
                Field::text(FieldId::ToAccountNumber, "To account number"),
                amount,
            ],
            TransferMode::BillPayment => vec![
                from,
                Field::choice(
                    FieldId::BillType,
                    "Bill type",
                    BILL_TYPES.iter().map(|t| t.as_str().to_string()).collect(),
                    Some(0),
                ),
                Field::text(
                    FieldId::BillReference,
                    bill_reference_label(BillingType::Electricity),
                ),
                amount,
            ],
            TransferMode::Upi => vec![from, Field::text(FieldId::UpiId, "UPI ID"), amount],
        };
        Self {
            mode,
            form: FormState::new(fields),
        }
    }

    /// Follows a change to the account list without losing what was typed.
    pub fn refresh_accounts(&mut self, accounts: &[Account]) {
        let options = account_options(accounts);
        self.form.set_options(FieldId::From, options.clone());
        self.form.set_options(FieldId::To, options);
    }

    pub fn billing_type(&self) -> BillingType {
        self.form
            .selected(FieldId::BillType)
            .and_then(|index| BILL_TYPES.get(index).copied())
            .unwrap_or(BillingType::Electricity)
    }

    /// Keeps dependent labels in sync after a choice changed.
    pub fn on_changed(&mut self, field: FieldId) {
        if field == FieldId::BillType {
            let label = bill_reference_label(self.billing_type());
            self.form.set_label(FieldId::BillReference, label);
        }
    }

    pub fn intent(&self, accounts: &[Account]) -> TransferIntent {
        let pick = |id| {
            self.form
                .selected(id)
                .and_then(|index| accounts.get(index))
                .cloned()
        };
        let kind = match self.mode {
            TransferMode::SelfTransfer => TransferKind::SelfTransfer {
                to: pick(FieldId::To),
            },
            TransferMode::ToOthers => TransferKind::ToOthers {
                to_account_number: self.form.value(FieldId::ToAccountNumber).to_string(),
            },
            TransferMode::BillPayment => TransferKind::BillPayment(BillDetails {
                billing_type: self.billing_type(),
                reference: self.form.value(FieldId::BillReference).to_string(),
            }),
            TransferMode::Upi => TransferKind::Upi {
                upi_id: self.form.value(FieldId::UpiId).to_string(),
            },
        };
        TransferIntent {
            from: pick(FieldId::From),
            amount: self.form.value(FieldId::Amount).to_string(),
            kind,
        }
    }
}

#[derive(Debug)]
pub struct LoanState {
    pub instructions: Option<String>,
    pub status: Option<LoanStatus>,
    pub loading: bool,
    pub form: FormState,
}

impl LoanState {
    pub fn new(accounts: &[Account], default_number: Option<&str>) -> Self {
        Self {
            instructions: None,
            status: None,
            loading: false,
            form: FormState::new(vec![
                Field::choice(
                    FieldId::Account,
                    "Account",
                    account_options(accounts),
                    default_index(accounts, default_number),
                ),
                Field::text(FieldId::Amount, "Amount"),
            ]),
        }
    }

    pub fn has_active_loan(&self) -> bool {
        self.status.is_some_and(|status| status.has_active_loan)
    }
}

pub fn login_form() -> FormState {
    FormState::new(vec![
        Field::text(FieldId::Email, "Email"),
        Field::secret(FieldId::Password, "Password"),
    ])
}

pub fn signup_form() -> FormState {
    FormState::new(vec![
        Field::text(FieldId::Name, "Name"),
        Field::text(FieldId::Email, "Email"),
        Field::secret(FieldId::Password, "Password"),
    ])
}

pub fn add_account_form() -> FormState {
    FormState::new(vec![
        Field::text(FieldId::BankName, "Bank name"),
        Field::text(FieldId::BankCode, "Bank code (optional)"),
        Field::text(FieldId::AccountNumber, "Account number"),
    ])
}

pub fn feedback_form() -> FormState {
    FormState::new(vec![
        Field::text(FieldId::FeedbackText, "Feedback"),
        Field::choice(
            FieldId::Rating,
            "Rating",
            (1..=5).map(|stars| "*".repeat(stars)).collect(),
            None,
        ),
    ])
}

#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    pub session: SessionContext,
    pub login: FormState,
    pub signup: FormState,
    pub add_account: FormState,
    pub accounts: AccountsState,
    pub transfer: TransferState,
    pub history: HistoryState,
    pub loan: LoanState,
    pub feedback: FormState,
    pub toast: Option<ToastState>,
    pub base_url: String,
}

impl AppState {
    pub fn new(session: SessionContext, base_url: String) -> Self {
        Self {
            screen: Screen::Login,
            session,
            login: login_form(),
            signup: signup_form(),
            add_account: add_account_form(),
            accounts: AccountsState::default(),
            transfer: TransferState::new(TransferMode::SelfTransfer, &[], None),
            history: HistoryState::default(),
            loan: LoanState::new(&[], None),
            feedback: feedback_form(),
            toast: None,
            base_url,
        }
    }

    pub fn default_account_number(&self) -> Option<&str> {
        self.session
            .current()
            .and_then(|session| session.account_number.as_deref())
    }

    /// Drops everything fetched for the previous user.
    pub fn reset_user_data(&mut self) {
        self.add_account = add_account_form();
        self.accounts = AccountsState::default();
        self.transfer = TransferState::new(TransferMode::SelfTransfer, &[], None);
        self.history = HistoryState::default();
        self.loan = LoanState::new(&[], None);
        self.feedback = feedback_form();
    }
}
