use std::{
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use api_types::account::Account;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use serde_json::{Value, json};

use super::{App, Screen, form::FieldId};
use crate::{
    config::AppConfig,
    session::{Session, SessionStore},
    testing::spawn_backend,
    ui::keymap::AppAction,
};

fn session_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("mba_tui_app_{}", std::process::id()))
        .join(format!("{name}.json"))
}

fn config(base_url: &str, name: &str) -> AppConfig {
    AppConfig {
        base_url: base_url.to_string(),
        session_path: session_path(name).display().to_string(),
        ..AppConfig::default()
    }
}

fn session() -> Session {
    Session {
        token: "secret".to_string(),
        user_id: 7,
        username: "Asha".to_string(),
        email: "asha@example.com".to_string(),
        account_number: Some("AC100".to_string()),
    }
}

fn accounts() -> Vec<Account> {
    vec![
        Account {
            id: 1,
            bank_name: "SBI".to_string(),
            bank_code: None,
            account_number: "AC100".to_string(),
            balance: 900.0,
        },
        Account {
            id: 2,
            bank_name: "HDFC".to_string(),
            bank_code: None,
            account_number: "AC200".to_string(),
            balance: 50.0,
        },
    ]
}

fn accounts_json() -> Value {
    json!([
        {"id": 1, "bankName": "SBI", "accountNumber": "AC100", "balance": 900.0},
        {"id": 2, "bankName": "HDFC", "accountNumber": "AC200", "balance": 50.0}
    ])
}

fn logged_in(base_url: &str, name: &str) -> App {
    let mut app = App::new(config(base_url, name)).unwrap();
    app.state.session.start(session()).unwrap();
    app.state.accounts.set(accounts());
    app.state.screen = Screen::Accounts;
    app
}

/// Backend counting the transactions it receives.
fn counting_backend(hits: Arc<AtomicUsize>, reply: (StatusCode, &'static str)) -> Router {
    Router::new()
        .route(
            "/api/transaction",
            post(move |State(hits): State<Arc<AtomicUsize>>| async move {
                hits.fetch_add(1, Ordering::SeqCst);
                reply
            }),
        )
        .route(
            "/account/user/{user_id}",
            get(|| async { Json(accounts_json()) }),
        )
        .route(
            "/api/transactions/{user_id}",
            get(|| async { Json(json!([])) }),
        )
        .route(
            "/api/account/{number}/id",
            get(|| async { (StatusCode::NOT_FOUND, "Account not found") }),
        )
        .with_state(hits)
}

#[tokio::test]
async fn double_submit_sends_a_single_request() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = spawn_backend(counting_backend(
        hits.clone(),
        (StatusCode::OK, "Transaction recorded successfully"),
    ))
    .await;
    let mut app = logged_in(&base, "double_submit");

    app.handle_action(AppAction::Input('s'));
    assert_eq!(app.state.screen, Screen::Transfer);
    app.state.transfer.form.select(FieldId::To, Some(1));
    app.state.transfer.form.set_value(FieldId::Amount, "500.00");

    app.handle_action(AppAction::Submit);
    app.handle_action(AppAction::Submit);
    assert!(app.state.transfer.form.pending);

    assert!(app.next_event().await);
    assert_eq!(app.state.screen, Screen::History);
    assert_eq!(
        app.state.toast.as_ref().map(|t| t.message.as_str()),
        Some("Transaction recorded successfully")
    );

    // accounts refresh and history load
    assert!(app.next_event().await);
    assert!(app.next_event().await);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(!app.state.accounts.loading);
    assert!(!app.state.history.loading);
}

#[tokio::test]
async fn bill_without_customer_id_never_reaches_the_server() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = spawn_backend(counting_backend(hits.clone(), (StatusCode::OK, "ok"))).await;
    let mut app = logged_in(&base, "bill_reference");

    app.handle_action(AppAction::Input('b'));
    app.state.transfer.form.set_value(FieldId::Amount, "120.50");
    app.handle_action(AppAction::Submit);

    let form = &app.state.transfer.form;
    assert!(!form.pending);
    assert_eq!(
        form.message.as_ref().map(|m| m.message.as_str()),
        Some("Customer ID is required for electricity bills.")
    );
    assert!(!app.has_queued_event());
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unknown_recipient_stops_before_the_transfer() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = spawn_backend(counting_backend(hits.clone(), (StatusCode::OK, "ok"))).await;
    let mut app = logged_in(&base, "recipient");

    app.handle_action(AppAction::Input('o'));
    app.state
        .transfer
        .form
        .set_value(FieldId::ToAccountNumber, "AC999");
    app.state.transfer.form.set_value(FieldId::Amount, "10");
    app.handle_action(AppAction::Submit);
    assert!(app.next_event().await);

    let form = &app.state.transfer.form;
    assert_eq!(app.state.screen, Screen::Transfer);
    assert!(!form.pending);
    assert_eq!(
        form.message.as_ref().map(|m| m.message.as_str()),
        Some("Recipient account not found.")
    );
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn insufficient_balance_keeps_the_form() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = spawn_backend(counting_backend(
        hits.clone(),
        (StatusCode::BAD_REQUEST, "Insufficient balance"),
    ))
    .await;
    let mut app = logged_in(&base, "insufficient");

    app.handle_action(AppAction::Input('u'));
    app.state.transfer.form.set_value(FieldId::UpiId, "asha@upi");
    app.state.transfer.form.set_value(FieldId::Amount, "5000");
    app.handle_action(AppAction::Submit);
    assert!(app.next_event().await);

    let form = &app.state.transfer.form;
    assert_eq!(app.state.screen, Screen::Transfer);
    assert_eq!(form.value(FieldId::Amount), "5000");
    assert_eq!(
        form.message.as_ref().map(|m| m.message.as_str()),
        Some("Insufficient balance in the selected account.")
    );
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unauthorized_reply_clears_the_session() {
    let router = Router::new().route(
        "/api/transactions/{user_id}",
        get(|| async { StatusCode::UNAUTHORIZED }),
    );
    let base = spawn_backend(router).await;
    let mut app = logged_in(&base, "unauthorized");
    let path = session_path("unauthorized");
    assert!(path.exists());

    app.handle_action(AppAction::Input('h'));
    assert!(app.next_event().await);

    assert_eq!(app.state.screen, Screen::Login);
    assert!(app.state.session.current().is_none());
    assert!(app.state.accounts.items.is_empty());
    assert!(!path.exists());
    assert_eq!(
        app.state.login.message.as_ref().map(|m| m.message.as_str()),
        Some("Session expired, please log in again.")
    );
}

#[tokio::test]
async fn saved_session_without_accounts_goes_to_account_creation() {
    let router = Router::new().route(
        "/account/user/{user_id}",
        get(|| async { StatusCode::NOT_FOUND }),
    );
    let base = spawn_backend(router).await;
    SessionStore::new(session_path("no_accounts"))
        .save(&session())
        .unwrap();

    let mut app = App::new(config(&base, "no_accounts")).unwrap();
    app.start();
    assert_eq!(app.state.screen, Screen::Accounts);
    assert!(app.state.accounts.loading);

    // a second refresh while the first is in flight is skipped
    app.handle_action(AppAction::Input('r'));
    assert!(app.next_event().await);
    assert!(!app.has_queued_event());

    assert_eq!(app.state.screen, Screen::AddAccount);
    assert!(app.state.accounts.items.is_empty());
}

#[tokio::test]
async fn login_stores_session_with_first_account() {
    async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        if body["email"] == "asha@example.com" && body["password"] == "pw" {
            (
                StatusCode::OK,
                Json(json!({"token": "secret", "name": "Asha", "userId": 7})),
            )
        } else {
            (StatusCode::UNAUTHORIZED, Json(json!({})))
        }
    }
    async fn user_accounts(headers: HeaderMap) -> (StatusCode, Json<Value>) {
        match headers.get("authorization").and_then(|v| v.to_str().ok()) {
            Some("Bearer secret") => (StatusCode::OK, Json(accounts_json())),
            _ => (StatusCode::UNAUTHORIZED, Json(json!({}))),
        }
    }
    let router = Router::new()
        .route("/auth/login", post(login))
        .route("/account/user/{user_id}", get(user_accounts));
    let base = spawn_backend(router).await;

    let mut app = App::new(config(&base, "login")).unwrap();
    app.start();
    assert_eq!(app.state.screen, Screen::Login);

    app.state.login.set_value(FieldId::Email, "asha@example.com");
    app.state.login.set_value(FieldId::Password, "wrong");
    app.handle_action(AppAction::Submit);
    assert!(app.next_event().await);
    assert_eq!(app.state.screen, Screen::Login);
    assert_eq!(
        app.state.login.message.as_ref().map(|m| m.message.as_str()),
        Some("Invalid email or password.")
    );

    app.state.login.set_value(FieldId::Password, "pw");
    app.handle_action(AppAction::Submit);
    assert!(app.next_event().await);

    assert_eq!(app.state.screen, Screen::Accounts);
    assert_eq!(app.state.login.value(FieldId::Password), "");
    let stored = SessionStore::new(session_path("login")).load().unwrap().unwrap();
    assert_eq!(stored.user_id, 7);
    assert_eq!(stored.username, "Asha");
    assert_eq!(stored.account_number.as_deref(), Some("AC100"));
}

#[tokio::test]
async fn logout_removes_the_session_file() {
    let mut app = logged_in("http://127.0.0.1:9", "logout");
    app.handle_action(AppAction::Input('p'));
    assert_eq!(app.state.screen, Screen::Profile);

    app.handle_action(AppAction::Submit);
    assert_eq!(app.state.screen, Screen::Login);
    assert!(!session_path("logout").exists());
}

#[tokio::test]
async fn stale_accounts_reply_is_dropped_after_switching_user() {
    let router = Router::new().route(
        "/account/user/{user_id}",
        get(|| async { Json(accounts_json()) }),
    );
    let base = spawn_backend(router).await;
    let mut app = logged_in(&base, "stale_reply");

    app.handle_action(AppAction::Input('r'));
    assert!(app.state.accounts.loading);
    app.handle_action(AppAction::Input('p'));
    app.handle_action(AppAction::Submit);
    assert_eq!(app.state.screen, Screen::Login);

    let other = Account {
        id: 9,
        bank_name: "Axis".to_string(),
        bank_code: None,
        account_number: "AC900".to_string(),
        balance: 10.0,
    };
    app.state
        .session
        .start(Session {
            user_id: 8,
            username: "Ravi".to_string(),
            account_number: Some("AC900".to_string()),
            ..session()
        })
        .unwrap();
    app.state.accounts.set(vec![other.clone()]);
    app.state.screen = Screen::Accounts;

    assert!(app.next_event().await);
    assert_eq!(app.state.accounts.items, vec![other]);
    assert!(!app.state.accounts.loading);
}

fn loan_backend(active: bool, hits: Arc<AtomicUsize>) -> Router {
    async fn apply(
        State(hits): State<Arc<AtomicUsize>>,
        Json(body): Json<Value>,
    ) -> (StatusCode, &'static str) {
        hits.fetch_add(1, Ordering::SeqCst);
        if body["account"]["id"] == 1 && body["amount"] == 2500.5 {
            (StatusCode::OK, "Loan application submitted")
        } else {
            (StatusCode::BAD_REQUEST, "Unexpected application")
        }
    }
    Router::new()
        .route(
            "/loan/instructions",
            get(|| async { "Loans are repaid in 12 months." }),
        )
        .route(
            "/loan/status",
            get(move || async move { Json(json!({"hasActiveLoan": active})) }),
        )
        .route("/loan/apply", post(apply))
        .with_state(hits)
}

#[tokio::test]
async fn active_loan_blocks_a_new_application() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = spawn_backend(loan_backend(true, hits.clone())).await;
    let mut app = logged_in(&base, "loan_active");

    app.handle_action(AppAction::Input('l'));
    assert_eq!(app.state.screen, Screen::Loan);
    assert!(app.state.loan.loading);
    assert!(app.next_event().await);

    let loan = &app.state.loan;
    assert!(!loan.loading);
    assert!(loan.has_active_loan());
    assert_eq!(
        loan.instructions.as_deref(),
        Some("Loans are repaid in 12 months.")
    );

    app.state.loan.form.set_value(FieldId::Amount, "2500.50");
    app.handle_action(AppAction::Submit);
    let form = &app.state.loan.form;
    assert!(!form.pending);
    assert_eq!(
        form.message.as_ref().map(|m| m.message.as_str()),
        Some("You already have an active loan.")
    );
    assert!(!app.has_queued_event());
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn loan_application_uses_the_selected_account() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = spawn_backend(loan_backend(false, hits.clone())).await;
    let mut app = logged_in(&base, "loan_apply");

    app.handle_action(AppAction::Input('l'));
    assert!(app.next_event().await);
    assert!(!app.state.loan.has_active_loan());
    assert_eq!(app.state.loan.form.selected(FieldId::Account), Some(0));

    app.state.loan.form.set_value(FieldId::Amount, "2500.50");
    app.handle_action(AppAction::Submit);
    assert!(app.state.loan.form.pending);
    assert!(app.next_event().await);

    let loan = &app.state.loan;
    assert!(!loan.form.pending);
    assert_eq!(
        loan.form.message.as_ref().map(|m| m.message.as_str()),
        Some("Loan application submitted successfully!")
    );
    assert_eq!(loan.form.value(FieldId::Amount), "");
    assert!(loan.has_active_loan());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn feedback_and_rating_are_posted() {
    async fn feedback(Json(body): Json<Value>) -> StatusCode {
        let expected = json!({"userId": 7, "username": "Asha", "feedbackText": "Great app"});
        if body == expected {
            StatusCode::OK
        } else {
            StatusCode::BAD_REQUEST
        }
    }
    async fn rating(Json(body): Json<Value>) -> StatusCode {
        if body == json!({"userId": 7, "rating": 4}) {
            StatusCode::OK
        } else {
            StatusCode::BAD_REQUEST
        }
    }
    let router = Router::new()
        .route("/api/feedback", post(feedback))
        .route("/api/rating", post(rating));
    let base = spawn_backend(router).await;
    let mut app = logged_in(&base, "feedback");

    app.handle_action(AppAction::Input('f'));
    assert_eq!(app.state.screen, Screen::Feedback);
    for ch in "Great app".chars() {
        app.handle_action(AppAction::Input(ch));
    }
    app.handle_action(AppAction::Submit);
    assert!(app.next_event().await);
    assert_eq!(
        app.state.feedback.message.as_ref().map(|m| m.message.as_str()),
        Some("Thank you for your feedback!")
    );
    assert_eq!(app.state.feedback.value(FieldId::FeedbackText), "");

    app.handle_action(AppAction::NextField);
    for _ in 0..4 {
        app.handle_action(AppAction::Right);
    }
    assert_eq!(app.state.feedback.selected(FieldId::Rating), Some(3));
    app.handle_action(AppAction::Submit);
    assert!(app.next_event().await);
    assert_eq!(
        app.state.feedback.message.as_ref().map(|m| m.message.as_str()),
        Some("Thanks for rating us!")
    );
}

#[tokio::test]
async fn added_account_refreshes_the_list() {
    async fn add(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        let valid = body["bankName"] == "ICICI"
            && body["accountNumber"] == "AC300"
            && body["bankCode"].is_null()
            && body["user"]["id"] == 7;
        if !valid {
            return (StatusCode::BAD_REQUEST, Json(json!({"message": "bad account"})));
        }
        (
            StatusCode::OK,
            Json(json!({"id": 3, "bankName": "ICICI", "accountNumber": "AC300", "balance": 0.0})),
        )
    }
    async fn user_accounts() -> Json<Value> {
        let mut accounts = accounts_json();
        if let Some(list) = accounts.as_array_mut() {
            list.push(json!({"id": 3, "bankName": "ICICI", "accountNumber": "AC300", "balance": 0.0}));
        }
        Json(accounts)
    }
    let router = Router::new()
        .route("/account/add", post(add))
        .route("/account/user/{user_id}", get(user_accounts));
    let base = spawn_backend(router).await;
    let mut app = logged_in(&base, "add_account");

    app.handle_action(AppAction::Input('a'));
    assert_eq!(app.state.screen, Screen::AddAccount);
    app.state.add_account.set_value(FieldId::BankName, "ICICI");
    app.state.add_account.set_value(FieldId::AccountNumber, "AC300");
    app.handle_action(AppAction::Submit);
    assert!(app.next_event().await);

    assert_eq!(app.state.screen, Screen::Accounts);
    assert_eq!(
        app.state.toast.as_ref().map(|t| t.message.as_str()),
        Some("Account AC300 added.")
    );
    assert!(app.state.accounts.loading);
    assert!(app.next_event().await);
    assert_eq!(app.state.accounts.items.len(), 3);
    assert_eq!(app.state.accounts.items[2].account_number, "AC300");
}

#[tokio::test]
async fn receive_link_is_shown_for_the_selected_account() {
    async fn link(Path(account_id): Path<i64>) -> String {
        format!("upi://pay?account={account_id}\n")
    }
    let router = Router::new().route("/transaction/receive/{account_id}", get(link));
    let base = spawn_backend(router).await;
    let mut app = logged_in(&base, "receive_link");

    app.handle_action(AppAction::Down);
    app.handle_action(AppAction::Input('x'));
    assert!(app.next_event().await);
    assert_eq!(
        app.state.accounts.receive_link.as_deref(),
        Some("upi://pay?account=2")
    );
}
