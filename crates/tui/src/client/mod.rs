use std::time::Duration;

use api_types::{
    account::{Account, NewAccount},
    auth::{LoginRequest, LoginResponse, SignupRequest},
    feedback::{Feedback, Rating},
    loan::{LoanApplication, LoanStatus},
    transaction::{TransactionHistoryEntry, TransactionRequest},
};
use engine::ApiFailure;
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::{
    config::TransferRoute,
    error::{AppError, Result},
    session::Session,
};

#[derive(Debug, Error)]
pub enum ClientError {
    /// Raised before any request is sent.
    #[error("not logged in")]
    MissingSession,
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("request timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    #[error("invalid base_url")]
    BaseUrl,
}

impl ClientError {
    /// True when the session must be dropped.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::MissingSession | Self::Status { status: 401 | 403, .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }

    pub fn into_failure(self) -> ApiFailure {
        match self {
            Self::MissingSession => ApiFailure::Status {
                status: 401,
                message: String::new(),
            },
            Self::Status { status, message } => ApiFailure::Status { status, message },
            Self::Timeout => ApiFailure::Timeout,
            Self::Transport(err) => ApiFailure::Unreachable(err.to_string()),
            Self::BaseUrl => ApiFailure::Unreachable("invalid base_url".to_string()),
        }
    }

    /// Short text for the status line of a screen.
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, status } if message.trim().is_empty() => {
                format!("Request failed (status {status}).")
            }
            Self::Status { message, .. } => message.clone(),
            Self::Timeout | Self::Transport(_) | Self::BaseUrl => {
                "Server not reachable, try again.".to_string()
            }
            Self::MissingSession => "Session expired, please log in again.".to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err)
        }
    }
}

type ClientResult<T> = std::result::Result<T, ClientError>;

/// Error bodies are plain text on most endpoints; framework errors are JSON.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
    route: TransferRoute,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration, route: TransferRoute) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|err| AppError::BaseUrl(format!("{base_url}: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::BaseUrl(base_url.to_string()));
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url,
            http,
            route,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::BaseUrl)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Builds a request carrying the bearer token and `User-Id` header.
    fn authed(
        &self,
        method: Method,
        segments: &[&str],
        session: &Session,
    ) -> ClientResult<RequestBuilder> {
        let url = self.endpoint(segments)?;
        Ok(self
            .http
            .request(method, url)
            .bearer_auth(&session.token)
            .header("User-Id", session.user_id.to_string()))
    }

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<LoginResponse> {
        let payload = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let req = self
            .http
            .post(self.endpoint(&["auth", "login"])?)
            .json(&payload);
        json(send(req).await?).await
    }

    pub async fn signup(&self, name: &str, email: &str, password: &str) -> ClientResult<String> {
        let payload = SignupRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let req = self
            .http
            .post(self.endpoint(&["auth", "signup"])?)
            .json(&payload);
        text(send(req).await?).await
    }

    /// Accounts of the session user. A user without accounts is reported by
    /// the server as 404 and comes back as an empty list.
    pub async fn user_accounts(&self, session: Option<&Session>) -> ClientResult<Vec<Account>> {
        let session = session.ok_or(ClientError::MissingSession)?;
        let user_id = session.user_id.to_string();
        let req = self.authed(Method::GET, &["account", "user", &user_id], session)?;
        match send(req).await {
            Ok(res) => json(res).await,
            Err(err) if err.is_not_found() => Ok(Vec::new()),
            Err(err) => Err(err),
        }
    }

    pub async fn add_account(
        &self,
        session: &Session,
        account: &NewAccount,
    ) -> ClientResult<Account> {
        let req = self
            .authed(Method::POST, &["account", "add"], session)?
            .json(account);
        json(send(req).await?).await
    }

    /// Resolves an account number to the backend id.
    pub async fn account_id(&self, session: &Session, account_number: &str) -> ClientResult<i64> {
        let req = self.authed(
            Method::GET,
            &["api", "account", account_number, "id"],
            session,
        )?;
        json(send(req).await?).await
    }

    /// Posts a transaction and returns the confirmation text.
    ///
    /// Account-to-account transfers go to `/transaction/pay` when the legacy
    /// route is configured; everything else uses `/api/transaction`.
    pub async fn submit_transaction(
        &self,
        session: &Session,
        request: &TransactionRequest,
    ) -> ClientResult<String> {
        let legacy = match self.route {
            TransferRoute::Legacy => request.to_legacy(),
            TransferRoute::Extended => None,
        };
        let req = match legacy {
            Some(payment) => self
                .authed(Method::POST, &["transaction", "pay"], session)?
                .json(&payment),
            None => self
                .authed(Method::POST, &["api", "transaction"], session)?
                .json(request),
        };
        tracing::debug!(
            kind = request.transaction_type.as_str(),
            legacy = matches!(self.route, TransferRoute::Legacy),
            "submitting transaction"
        );
        text(send(req).await?).await
    }

    /// History of the session user, newest first. 404 means no transactions.
    pub async fn transactions(
        &self,
        session: &Session,
    ) -> ClientResult<Vec<TransactionHistoryEntry>> {
        let user_id = session.user_id.to_string();
        let req = self.authed(Method::GET, &["api", "transactions", &user_id], session)?;
        let mut entries: Vec<TransactionHistoryEntry> = match send(req).await {
            Ok(res) => json(res).await?,
            Err(err) if err.is_not_found() => Vec::new(),
            Err(err) => return Err(err),
        };
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(entries)
    }

    /// UPI payment link for receiving money into an account.
    pub async fn receive_link(&self, session: &Session, account_id: i64) -> ClientResult<String> {
        let account_id = account_id.to_string();
        let req = self.authed(
            Method::GET,
            &["transaction", "receive", &account_id],
            session,
        )?;
        text(send(req).await?).await
    }

    pub async fn loan_instructions(&self, session: &Session) -> ClientResult<String> {
        let req = self.authed(Method::GET, &["loan", "instructions"], session)?;
        text(send(req).await?).await
    }

    pub async fn loan_status(&self, session: &Session) -> ClientResult<LoanStatus> {
        let req = self.authed(Method::GET, &["loan", "status"], session)?;
        json(send(req).await?).await
    }

    pub async fn apply_loan(
        &self,
        session: &Session,
        application: &LoanApplication,
    ) -> ClientResult<()> {
        let req = self
            .authed(Method::POST, &["loan", "apply"], session)?
            .json(application);
        send(req).await?;
        Ok(())
    }

    pub async fn send_feedback(&self, session: &Session, feedback: &Feedback) -> ClientResult<()> {
        self.post_discard(&["api", "feedback"], session, feedback)
            .await
    }

    pub async fn send_rating(&self, session: &Session, rating: &Rating) -> ClientResult<()> {
        self.post_discard(&["api", "rating"], session, rating).await
    }

    async fn post_discard<T: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        session: &Session,
        payload: &T,
    ) -> ClientResult<()> {
        let req = self
            .authed(Method::POST, segments, session)?
            .json(payload);
        send(req).await?;
        Ok(())
    }
}

/// Sends the request and turns any non-2xx status into [`ClientError::Status`].
async fn send(req: RequestBuilder) -> ClientResult<Response> {
    let res = req.send().await?;
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let body = res.text().await.unwrap_or_default();
    let message = error_message(&body);
    tracing::warn!(status = status.as_u16(), %message, "request rejected");
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn json<T: DeserializeOwned>(res: Response) -> ClientResult<T> {
    Ok(res.json::<T>().await?)
}

async fn text(res: Response) -> ClientResult<String> {
    Ok(res.text().await?)
}

fn error_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        let message = parsed
            .message
            .filter(|message| !message.trim().is_empty())
            .or(parsed.error);
        if let Some(message) = message {
            return message;
        }
    }
    body.trim().to_string()
}
