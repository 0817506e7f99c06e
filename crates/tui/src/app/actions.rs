use api_types::{
    account::{IdRef, NewAccount},
    feedback::{Feedback, Rating},
    loan::LoanApplication,
};
use engine::{
    build_request, interpret, interpret_recipient, validate_feedback, validate_loan,
    validate_login, validate_new_account, validate_rating, validate_signup, validate_transfer,
};

use super::{
    App, AppEvent, Screen, ToastLevel,
    form::FieldId,
    state::{LoanState, TransferMode, TransferState, feedback_form},
};
use crate::{client::ClientError, session::Session};

impl App {
    /// Session for an authenticated action. Without one the user is sent
    /// back to login and nothing is requested.
    fn require_session(&mut self) -> Option<Session> {
        let session = self.state.session.current().cloned();
        if session.is_none() {
            self.expire_session();
        }
        session
    }

    pub(super) fn submit_login(&mut self) {
        let form = &mut self.state.login;
        if form.pending {
            return;
        }
        let email = form.value(FieldId::Email).trim().to_string();
        let password = form.value(FieldId::Password).to_string();
        if let Err(err) = validate_login(&email, &password) {
            form.error(err.to_string());
            return;
        }
        form.begin_submit();

        let client = self.client.clone();
        self.spawn(async move {
            let reply = async {
                let login = client.login(&email, &password).await?;
                let session = Session {
                    token: login.token,
                    user_id: login.user_id,
                    username: login.name,
                    email,
                    account_number: None,
                };
                let accounts = client.user_accounts(Some(&session)).await?;
                Ok::<_, ClientError>((session, accounts))
            }
            .await;
            AppEvent::LoggedIn(reply)
        });
    }

    pub(super) fn submit_signup(&mut self) {
        let form = &mut self.state.signup;
        if form.pending {
            return;
        }
        let name = form.value(FieldId::Name).trim().to_string();
        let email = form.value(FieldId::Email).trim().to_string();
        let password = form.value(FieldId::Password).to_string();
        if let Err(err) = validate_signup(&name, &email, &password) {
            form.error(err.to_string());
            return;
        }
        form.begin_submit();

        let client = self.client.clone();
        self.spawn(async move { AppEvent::SignedUp(client.signup(&name, &email, &password).await) });
    }

    pub(super) fn logout(&mut self) {
        if let Err(err) = self.state.session.clear_session() {
            tracing::warn!("failed to clear session: {err}");
        }
        self.state.reset_user_data();
        self.state.screen = Screen::Login;
        self.toast(ToastLevel::Info, "Logged out.");
    }

    /// Fetches the account list unless a fetch is already in flight.
    pub(super) fn request_accounts(&mut self) {
        if self.state.accounts.loading {
            return;
        }
        let Some(session) = self.require_session() else {
            return;
        };
        self.state.accounts.loading = true;

        let client = self.client.clone();
        self.spawn(async move { AppEvent::AccountsLoaded(client.user_accounts(Some(&session)).await) });
    }

    pub(super) fn open_add_account(&mut self) {
        self.state.screen = Screen::AddAccount;
    }

    pub(super) fn submit_add_account(&mut self) {
        if self.state.add_account.pending {
            return;
        }
        let Some(session) = self.require_session() else {
            return;
        };
        let form = &mut self.state.add_account;
        let bank_name = form.value(FieldId::BankName).trim().to_string();
        let bank_code = form.value(FieldId::BankCode).trim().to_string();
        let account_number = form.value(FieldId::AccountNumber).trim().to_string();
        if let Err(err) = validate_new_account(&bank_name, &account_number) {
            form.error(err.to_string());
            return;
        }
        form.begin_submit();

        let account = NewAccount {
            bank_name,
            bank_code: (!bank_code.is_empty()).then_some(bank_code),
            account_number,
            user: IdRef {
                id: session.user_id,
            },
        };
        let client = self.client.clone();
        self.spawn(async move { AppEvent::AccountAdded(client.add_account(&session, &account).await) });
    }

    pub(super) fn make_default_account(&mut self) {
        let Some(number) = self
            .state
            .accounts
            .selected_account()
            .map(|account| account.account_number.clone())
        else {
            return;
        };
        match self.state.session.set_account_number(&number) {
            Ok(()) => self.toast(ToastLevel::Success, format!("{number} is now your default account.")),
            Err(err) => {
                tracing::warn!("failed to save default account: {err}");
                self.toast(ToastLevel::Error, "Could not save the default account.");
            }
        }
    }

    pub(super) fn request_receive_link(&mut self) {
        let Some(account_id) = self.state.accounts.selected_account().map(|a| a.id) else {
            return;
        };
        let Some(session) = self.require_session() else {
            return;
        };
        let client = self.client.clone();
        self.spawn(async move { AppEvent::ReceiveLink(client.receive_link(&session, account_id).await) });
    }

    pub(super) fn open_transfer(&mut self, mode: TransferMode) {
        if self.state.accounts.loaded && self.state.accounts.items.is_empty() {
            self.state.screen = Screen::AddAccount;
            self.toast(ToastLevel::Info, "Add a bank account before making payments.");
            return;
        }
        self.state.transfer = TransferState::new(
            mode,
            &self.state.accounts.items,
            self.state.default_account_number(),
        );
        self.state.screen = Screen::Transfer;
    }

    /// Validates the form, then resolves the recipient (transfers to others)
    /// and submits. Only one submission can be in flight.
    pub(super) fn submit_transfer(&mut self) {
        if self.state.transfer.form.pending {
            return;
        }
        let Some(session) = self.require_session() else {
            return;
        };

        let intent = self.state.transfer.intent(&self.state.accounts.items);
        let transfer = match validate_transfer(&intent) {
            Ok(transfer) => transfer,
            Err(err) => {
                tracing::debug!("transfer rejected locally: {err}");
                self.state.transfer.form.error(err.to_string());
                return;
            }
        };
        let request = build_request(session.user_id, &transfer);
        let recipient = transfer
            .recipient()
            .filter(|_| self.config.resolve_recipients)
            .map(str::to_string);
        tracing::info!(
            kind = request.transaction_type.as_str(),
            amount = %transfer.amount(),
            "submitting transfer"
        );
        self.state.transfer.form.begin_submit();

        let client = self.client.clone();
        self.spawn(async move {
            if let Some(number) = recipient {
                let lookup = client
                    .account_id(&session, &number)
                    .await
                    .map_err(ClientError::into_failure);
                if let Err(outcome) = interpret_recipient(lookup) {
                    return AppEvent::TransferDone(outcome);
                }
            }
            let reply = client
                .submit_transaction(&session, &request)
                .await
                .map_err(ClientError::into_failure);
            AppEvent::TransferDone(interpret(reply))
        });
    }

    pub(super) fn open_history(&mut self) {
        self.state.screen = Screen::History;
        self.request_history();
    }

    pub(super) fn request_history(&mut self) {
        if self.state.history.loading {
            return;
        }
        let Some(session) = self.require_session() else {
            return;
        };
        self.state.history.loading = true;

        let client = self.client.clone();
        self.spawn(async move { AppEvent::HistoryLoaded(client.transactions(&session).await) });
    }

    pub(super) fn open_loan(&mut self) {
        let Some(session) = self.require_session() else {
            return;
        };
        self.state.screen = Screen::Loan;
        if self.state.loan.form.pending || self.state.loan.loading {
            return;
        }
        let status = self.state.loan.status;
        let instructions = self.state.loan.instructions.take();
        self.state.loan = LoanState::new(
            &self.state.accounts.items,
            self.state.default_account_number(),
        );
        self.state.loan.status = status;
        self.state.loan.instructions = instructions;
        self.state.loan.loading = true;

        let client = self.client.clone();
        self.spawn(async move {
            let reply = async {
                let instructions = client.loan_instructions(&session).await?;
                let status = client.loan_status(&session).await?;
                Ok::<_, ClientError>((instructions, status))
            }
            .await;
            AppEvent::LoanInfo(reply)
        });
    }

    pub(super) fn submit_loan(&mut self) {
        if self.state.loan.form.pending {
            return;
        }
        let Some(session) = self.require_session() else {
            return;
        };
        if self.state.loan.has_active_loan() {
            self.state
                .loan
                .form
                .error("You already have an active loan.");
            return;
        }
        let account = self
            .state
            .loan
            .form
            .selected(FieldId::Account)
            .and_then(|index| self.state.accounts.items.get(index));
        let amount = match validate_loan(account, self.state.loan.form.value(FieldId::Amount)) {
            Ok(amount) => amount,
            Err(err) => {
                self.state.loan.form.error(err.to_string());
                return;
            }
        };
        let Some(account_id) = account.map(|a| a.id) else {
            return;
        };
        self.state.loan.form.begin_submit();

        let application = LoanApplication {
            account: IdRef { id: account_id },
            amount: amount.to_major(),
        };
        let client = self.client.clone();
        self.spawn(async move { AppEvent::LoanApplied(client.apply_loan(&session, &application).await) });
    }

    pub(super) fn open_feedback(&mut self) {
        if !self.state.feedback.pending {
            self.state.feedback = feedback_form();
        }
        self.state.screen = Screen::Feedback;
    }

    /// Enter on the rating row sends the rating, anywhere else the text.
    pub(super) fn submit_feedback_or_rating(&mut self) {
        if self.state.feedback.pending {
            return;
        }
        let Some(session) = self.require_session() else {
            return;
        };
        let form = &mut self.state.feedback;
        let client = self.client.clone();

        if form.focused() == Some(FieldId::Rating) {
            let stars = form
                .selected(FieldId::Rating)
                .map_or(0, |index| index as u8 + 1);
            if let Err(err) = validate_rating(stars) {
                form.error(err.to_string());
                return;
            }
            form.begin_submit();
            let rating = Rating {
                user_id: session.user_id,
                rating: stars,
            };
            self.spawn(async move { AppEvent::RatingSent(client.send_rating(&session, &rating).await) });
            return;
        }

        let text = form.value(FieldId::FeedbackText).trim().to_string();
        if let Err(err) = validate_feedback(&text) {
            form.error(err.to_string());
            return;
        }
        form.begin_submit();
        let feedback = Feedback {
            user_id: session.user_id,
            username: session.username.clone(),
            feedback_text: text,
        };
        self.spawn(async move {
            AppEvent::FeedbackSent(client.send_feedback(&session, &feedback).await)
        });
    }
}
