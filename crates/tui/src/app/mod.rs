mod actions;
mod events;
pub mod form;
mod state;

use std::{future::Future, time::Duration};

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tokio::sync::mpsc;

use crate::{
    client::Client,
    config::AppConfig,
    error::{AppError, Result},
    session::{SessionContext, SessionStore},
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
};

pub use events::AppEvent;
pub use state::{AppState, Screen, ToastLevel, ToastState, TransferMode, TransferState};

pub struct App {
    config: AppConfig,
    client: Client,
    pub state: AppState,
    events_tx: mpsc::UnboundedSender<(u64, AppEvent)>,
    events_rx: mpsc::UnboundedReceiver<(u64, AppEvent)>,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Client::new(
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
            config.transfer_endpoint,
        )?;
        let session = SessionContext::new(SessionStore::new(&config.session_path));
        let state = AppState::new(session, config.base_url.clone());
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Ok(Self {
            config,
            client,
            state,
            events_tx,
            events_rx,
            should_quit: false,
        })
    }

    /// Restores a saved session, if any, and picks the first screen.
    pub fn start(&mut self) {
        match self.state.session.load_session() {
            Some(session) => {
                tracing::info!(user_id = session.user_id, "resuming saved session");
                self.state.screen = Screen::Accounts;
                self.request_accounts();
            }
            None => self.state.screen = Screen::Login,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        self.start();
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(100);

        while !self.should_quit {
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }

            while let Ok((generation, event)) = self.events_rx.try_recv() {
                self.apply(generation, event);
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        self.handle_action(map_key(key));
    }

    pub fn handle_action(&mut self, action: AppAction) {
        if action == AppAction::Quit {
            self.should_quit = true;
            return;
        }
        if action != AppAction::None {
            self.state.toast = None;
        }

        match self.state.screen {
            Screen::Login | Screen::Signup => self.handle_auth(action),
            Screen::Accounts | Screen::History | Screen::Profile => self.handle_list(action),
            Screen::AddAccount | Screen::Transfer | Screen::Loan | Screen::Feedback => {
                self.handle_form(action)
            }
        }
    }

    fn handle_auth(&mut self, action: AppAction) {
        let on_login = self.state.screen == Screen::Login;
        match action {
            AppAction::SwitchAuth | AppAction::Cancel if !on_login => {
                self.state.screen = Screen::Login
            }
            AppAction::SwitchAuth => self.state.screen = Screen::Signup,
            AppAction::Submit if on_login => self.submit_login(),
            AppAction::Submit => self.submit_signup(),
            _ => {
                let form = if on_login {
                    &mut self.state.login
                } else {
                    &mut self.state.signup
                };
                edit_form(form, action);
            }
        }
    }

    fn handle_list(&mut self, action: AppAction) {
        match (self.state.screen, action) {
            (Screen::Accounts, AppAction::Up) => self.state.accounts.select_prev(),
            (Screen::Accounts, AppAction::Down) => self.state.accounts.select_next(),
            (Screen::History, AppAction::Up) => self.state.history.select_prev(),
            (Screen::History, AppAction::Down) => self.state.history.select_next(),
            (Screen::Profile, AppAction::Submit) => self.logout(),
            (_, AppAction::Cancel) => self.state.screen = Screen::Accounts,
            (_, AppAction::NextField) => self.cycle_tab(1),
            (_, AppAction::PrevField) => self.cycle_tab(-1),
            (_, AppAction::Input(ch)) => self.handle_shortcut(ch),
            _ => {}
        }
    }

    fn handle_shortcut(&mut self, ch: char) {
        match ch {
            'q' => self.should_quit = true,
            'a' => self.open_add_account(),
            's' => self.open_transfer(TransferMode::SelfTransfer),
            'o' => self.open_transfer(TransferMode::ToOthers),
            'b' => self.open_transfer(TransferMode::BillPayment),
            'u' => self.open_transfer(TransferMode::Upi),
            'h' => self.open_history(),
            'l' => self.open_loan(),
            'f' => self.open_feedback(),
            'p' => self.state.screen = Screen::Profile,
            'r' => match self.state.screen {
                Screen::History => self.request_history(),
                _ => self.request_accounts(),
            },
            'x' if self.state.screen == Screen::Accounts => self.request_receive_link(),
            'd' if self.state.screen == Screen::Accounts => self.make_default_account(),
            _ => {}
        }
    }

    fn cycle_tab(&mut self, step: isize) {
        let tabs = Screen::TABS;
        let current = tabs
            .iter()
            .position(|screen| *screen == self.state.screen)
            .unwrap_or(0) as isize;
        let next = tabs[(current + step).rem_euclid(tabs.len() as isize) as usize];
        match next {
            Screen::Accounts => self.state.screen = Screen::Accounts,
            Screen::Transfer => self.open_transfer(self.state.transfer.mode),
            Screen::History => self.open_history(),
            Screen::Loan => self.open_loan(),
            Screen::Feedback => self.open_feedback(),
            other => self.state.screen = other,
        }
    }

    fn handle_form(&mut self, action: AppAction) {
        match action {
            AppAction::Cancel => self.state.screen = Screen::Accounts,
            AppAction::Submit => match self.state.screen {
                Screen::AddAccount => self.submit_add_account(),
                Screen::Transfer => self.submit_transfer(),
                Screen::Loan => self.submit_loan(),
                Screen::Feedback => self.submit_feedback_or_rating(),
                _ => {}
            },
            _ => match self.state.screen {
                Screen::Transfer => {
                    if let Some(changed) = edit_form(&mut self.state.transfer.form, action) {
                        self.state.transfer.on_changed(changed);
                    }
                }
                Screen::AddAccount => {
                    edit_form(&mut self.state.add_account, action);
                }
                Screen::Loan => {
                    edit_form(&mut self.state.loan.form, action);
                }
                Screen::Feedback => {
                    edit_form(&mut self.state.feedback, action);
                }
                _ => {}
            },
        }
    }

    /// Runs `task` off the UI loop and queues its event, tagged with the
    /// session generation it was issued under.
    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = AppEvent> + Send + 'static,
    {
        let tx = self.events_tx.clone();
        let generation = self.state.session.generation();
        tokio::spawn(async move {
            let _ = tx.send((generation, task.await));
        });
    }

    /// Waits for the next task to finish and applies its result.
    #[cfg(test)]
    pub async fn next_event(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some((generation, event)) => {
                self.apply(generation, event);
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    pub fn has_queued_event(&mut self) -> bool {
        !self.events_rx.is_empty()
    }
}

/// Applies a text-editing action to a form. Returns the choice that changed.
fn edit_form(form: &mut form::FormState, action: AppAction) -> Option<form::FieldId> {
    match action {
        AppAction::NextField | AppAction::Down => form.focus_next(),
        AppAction::PrevField | AppAction::Up => form.focus_prev(),
        AppAction::Left => return form.cycle(-1),
        AppAction::Right => return form.cycle(1),
        AppAction::Backspace => form.backspace(),
        AppAction::Input(ch) => form.input(ch),
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests;
