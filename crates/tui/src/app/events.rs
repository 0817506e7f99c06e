use api_types::{
    account::Account,
    loan::LoanStatus,
    transaction::TransactionHistoryEntry,
};
use engine::{NextStep, Outcome};

use super::{
    App, Screen, ToastLevel, ToastState,
    form::FieldId,
    state::{LoanState, TransferState, add_account_form, signup_form},
};
use crate::{client::ClientError, session::Session};

type Reply<T> = Result<T, ClientError>;

/// Result of a background request, delivered to the UI loop.
#[derive(Debug)]
pub enum AppEvent {
    LoggedIn(Reply<(Session, Vec<Account>)>),
    SignedUp(Reply<String>),
    AccountsLoaded(Reply<Vec<Account>>),
    AccountAdded(Reply<Account>),
    TransferDone(Outcome),
    HistoryLoaded(Reply<Vec<TransactionHistoryEntry>>),
    ReceiveLink(Reply<String>),
    LoanInfo(Reply<(String, LoanStatus)>),
    LoanApplied(Reply<()>),
    FeedbackSent(Reply<()>),
    RatingSent(Reply<()>),
}

impl AppEvent {
    fn needs_session(&self) -> bool {
        !matches!(self, Self::LoggedIn(_) | Self::SignedUp(_))
    }
}

impl App {
    /// Applies a finished request. Replies issued for another session (the
    /// user logged out, possibly logging in as someone else) are dropped.
    pub(super) fn apply(&mut self, generation: u64, event: AppEvent) {
        let stale = generation != self.state.session.generation();
        if event.needs_session() && (stale || self.state.session.current().is_none()) {
            tracing::debug!(generation, "dropping reply issued for another session");
            return;
        }
        if let AppEvent::AccountsLoaded(_) = &event {
            self.state.accounts.loading = false;
        }

        match event {
            AppEvent::LoggedIn(reply) => self.on_logged_in(reply),
            AppEvent::SignedUp(reply) => self.on_signed_up(reply),
            AppEvent::AccountsLoaded(reply) => self.on_accounts(reply),
            AppEvent::AccountAdded(reply) => self.on_account_added(reply),
            AppEvent::TransferDone(outcome) => self.on_transfer_done(outcome),
            AppEvent::HistoryLoaded(reply) => self.on_history(reply),
            AppEvent::ReceiveLink(reply) => match reply {
                Ok(link) => self.state.accounts.receive_link = Some(link.trim().to_string()),
                Err(err) => {
                    if !self.expire_if_unauthorized(&err) {
                        self.toast(ToastLevel::Error, err.user_message());
                    }
                }
            },
            AppEvent::LoanInfo(reply) => self.on_loan_info(reply),
            AppEvent::LoanApplied(reply) => self.on_loan_applied(reply),
            AppEvent::FeedbackSent(reply) => {
                self.on_feedback_reply(reply, "Thank you for your feedback!", true)
            }
            AppEvent::RatingSent(reply) => {
                self.on_feedback_reply(reply, "Thanks for rating us!", false)
            }
        }
    }

    pub(super) fn toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.state.toast = Some(ToastState::new(message, level));
    }

    /// Drops the session and returns to login. Used for every 401/403.
    pub(super) fn expire_session(&mut self) {
        tracing::info!("session expired");
        if let Err(err) = self.state.session.clear_session() {
            tracing::warn!("failed to clear session: {err}");
        }
        self.state.reset_user_data();
        self.state.screen = Screen::Login;
        self.state.login.finish(ToastLevel::Error, Outcome::Unauthorized.message());
    }

    fn expire_if_unauthorized(&mut self, err: &ClientError) -> bool {
        if err.is_unauthorized() {
            self.expire_session();
            return true;
        }
        false
    }

    fn on_logged_in(&mut self, reply: Reply<(Session, Vec<Account>)>) {
        let (mut session, accounts) = match reply {
            Ok(value) => value,
            Err(err) => {
                let message = if err.is_unauthorized() {
                    "Invalid email or password.".to_string()
                } else {
                    err.user_message()
                };
                tracing::warn!("login failed: {err}");
                self.state.login.finish(ToastLevel::Error, message);
                return;
            }
        };

        tracing::info!(user_id = session.user_id, accounts = accounts.len(), "logged in");
        session.account_number = accounts.first().map(|a| a.account_number.clone());
        let greeting = format!("Welcome, {}!", session.username);
        if let Err(err) = self.state.session.start(session) {
            tracing::warn!("failed to save session: {err}");
        }

        self.state.login.pending = false;
        self.state.login.message = None;
        self.state.login.clear_secrets();
        self.state.reset_user_data();
        self.state.accounts.set(accounts);
        self.toast(ToastLevel::Success, greeting);
        self.route_home();
    }

    fn on_signed_up(&mut self, reply: Reply<String>) {
        match reply {
            Ok(_) => {
                let email = self
                    .state
                    .signup
                    .value(FieldId::Email)
                    .trim()
                    .to_string();
                self.state.signup = signup_form();
                self.state
                    .login
                    .set_value(FieldId::Email, email);
                self.state
                    .login
                    .finish(ToastLevel::Success, "Signup successful, please log in.");
                self.state.screen = Screen::Login;
            }
            Err(err) => {
                tracing::warn!("signup failed: {err}");
                self.state
                    .signup
                    .finish(ToastLevel::Error, err.user_message());
            }
        }
    }

    /// Accounts screen, or account creation when the user has none.
    fn route_home(&mut self) {
        if self.state.accounts.items.is_empty() {
            self.state.screen = Screen::AddAccount;
            self.toast(
                ToastLevel::Info,
                "Add a bank account to start making payments.",
            );
        } else {
            self.state.screen = Screen::Accounts;
        }
    }

    fn on_accounts(&mut self, reply: Reply<Vec<Account>>) {
        let accounts = match reply {
            Ok(accounts) => accounts,
            Err(err) => {
                if !self.expire_if_unauthorized(&err) {
                    self.state.accounts.error = Some(err.user_message());
                }
                return;
            }
        };

        if self.state.default_account_number().is_none() {
            if let Some(first) = accounts.first() {
                if let Err(err) = self.state.session.set_account_number(&first.account_number) {
                    tracing::warn!("failed to save default account: {err}");
                }
            }
        }
        self.state.accounts.set(accounts);
        self.state.transfer.refresh_accounts(&self.state.accounts.items);

        if self.state.accounts.items.is_empty()
            && matches!(
                self.state.screen,
                Screen::Accounts | Screen::Transfer | Screen::Loan
            )
        {
            self.route_home();
        }
    }

    fn on_account_added(&mut self, reply: Reply<Account>) {
        match reply {
            Ok(account) => {
                tracing::info!(account_id = account.id, "account added");
                self.state.add_account = add_account_form();
                self.toast(
                    ToastLevel::Success,
                    format!("Account {} added.", account.account_number),
                );
                self.state.screen = Screen::Accounts;
                self.request_accounts();
            }
            Err(err) => {
                if !self.expire_if_unauthorized(&err) {
                    self.state
                        .add_account
                        .finish(ToastLevel::Error, err.user_message());
                }
            }
        }
    }

    fn on_transfer_done(&mut self, outcome: Outcome) {
        tracing::info!(?outcome, "transfer finished");
        match outcome.next_step() {
            NextStep::ShowHistory => {
                self.state.transfer = TransferState::new(
                    self.state.transfer.mode,
                    &self.state.accounts.items,
                    self.state.default_account_number(),
                );
                self.toast(ToastLevel::Success, outcome.message());
                self.request_accounts();
                self.open_history();
            }
            NextStep::Relogin => self.expire_session(),
            NextStep::Stay => self
                .state
                .transfer
                .form
                .finish(ToastLevel::Error, outcome.message()),
        }
    }

    fn on_history(&mut self, reply: Reply<Vec<TransactionHistoryEntry>>) {
        self.state.history.loading = false;
        match reply {
            Ok(items) => {
                self.state.history.items = items;
                self.state.history.selected = 0;
                self.state.history.error = None;
            }
            Err(err) => {
                if !self.expire_if_unauthorized(&err) {
                    self.state.history.error = Some(err.user_message());
                }
            }
        }
    }

    fn on_loan_info(&mut self, reply: Reply<(String, LoanStatus)>) {
        self.state.loan.loading = false;
        match reply {
            Ok((instructions, status)) => {
                self.state.loan.instructions = Some(instructions);
                self.state.loan.status = Some(status);
            }
            Err(err) => {
                if !self.expire_if_unauthorized(&err) {
                    self.state.loan.form.error(err.user_message());
                }
            }
        }
    }

    fn on_loan_applied(&mut self, reply: Reply<()>) {
        match reply {
            Ok(()) => {
                self.state.loan.form = LoanState::new(
                    &self.state.accounts.items,
                    self.state.default_account_number(),
                )
                .form;
                self.state.loan.form.message = Some(ToastState::new(
                    "Loan application submitted successfully!",
                    ToastLevel::Success,
                ));
                self.state.loan.status = Some(LoanStatus {
                    has_active_loan: true,
                });
            }
            Err(err) => {
                if !self.expire_if_unauthorized(&err) {
                    self.state
                        .loan
                        .form
                        .finish(ToastLevel::Error, err.user_message());
                }
            }
        }
    }

    fn on_feedback_reply(&mut self, reply: Reply<()>, thanks: &str, clear_text: bool) {
        match reply {
            Ok(()) => {
                if clear_text {
                    self.state
                        .feedback
                        .set_value(FieldId::FeedbackText, "");
                }
                self.state.feedback.finish(ToastLevel::Success, thanks);
            }
            Err(err) => {
                if !self.expire_if_unauthorized(&err) {
                    self.state
                        .feedback
                        .finish(ToastLevel::Error, err.user_message());
                }
            }
        }
    }
}
