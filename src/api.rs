// Account Ledger - REST API
// JSON over HTTP: one handler per verb, one SQL statement per handler

use anyhow::anyhow;
use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, put},
    Router,
};
use rusqlite::Connection;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ApiOptions;
use crate::db;
use crate::entities::{Account, NewAccount};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
    options: ApiOptions,
}

impl AppState {
    pub fn new(conn: Connection, options: ApiOptions) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            options,
        }
    }

    /// Run `f` against the shared connection. SQLite serializes the writes.
    pub fn with_conn<T, F>(&self, f: F) -> anyhow::Result<T>
    where
        F: FnOnce(&Connection) -> anyhow::Result<T>,
    {
        let conn = self
            .db
            .lock()
            .map_err(|_| anyhow!("database connection lock poisoned"))?;
        f(&conn)
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum ApiError {
    // 400
    #[error("Invalid request payload")]
    InvalidPayload,

    #[error("Invalid account ID")]
    InvalidId,

    #[error("Invalid account type")]
    InvalidAccountType,

    // 404, only with strict_not_found
    #[error("Account not found")]
    NotFound,

    // 500: the message is static, the cause is logged
    #[error("{0}")]
    Storage(&'static str),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidPayload | ApiError::InvalidId | ApiError::InvalidAccountType => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn storage(message: &'static str, err: anyhow::Error) -> Self {
        tracing::error!("{}: {:#}", message, err);
        ApiError::Storage(message)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        tracing::debug!(error = %err, "rejected request body");
        ApiError::InvalidPayload
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(%rejection, "rejected account id");
        ApiError::InvalidId
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

// ============================================================================
// API Handlers
// ============================================================================

/// Decode a body as JSON regardless of the Content-Type header
fn decode_account(body: &Bytes) -> Result<NewAccount, ApiError> {
    Ok(serde_json::from_slice(body)?)
}

fn check_account_type(options: &ApiOptions, account: &NewAccount) -> Result<(), ApiError> {
    if options.strict_account_type && !account.account_type.is_known() {
        return Err(ApiError::InvalidAccountType);
    }
    Ok(())
}

/// GET /health
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// POST /accounts - Create an account
async fn create_account(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Account>), ApiError> {
    let account = decode_account(&body)?;
    check_account_type(&state.options, &account)?;

    let id = state
        .with_conn(|conn| db::insert_account(conn, &account))
        .map_err(|e| ApiError::storage("Failed to create account", e))?;

    tracing::info!(id, account_type = %account.account_type, "account created");

    Ok((StatusCode::CREATED, Json(account.with_id(id))))
}

/// GET /accounts - List every account
async fn list_accounts(State(state): State<AppState>) -> Result<Json<Vec<Account>>, ApiError> {
    let accounts = state
        .with_conn(db::get_all_accounts)
        .map_err(|e| ApiError::storage("Failed to retrieve accounts", e))?;

    Ok(Json(accounts))
}

/// PUT /accounts/:id - Overwrite an account
///
/// Without `strict_not_found` an unknown id still answers 200 with the
/// submitted values.
async fn update_account(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Bytes,
) -> Result<Json<Account>, ApiError> {
    let Path(id) = id?;
    let account = decode_account(&body)?;
    check_account_type(&state.options, &account)?;

    let changed = state
        .with_conn(|conn| db::update_account(conn, id, &account))
        .map_err(|e| ApiError::storage("Failed to update account", e))?;

    if changed == 0 {
        tracing::warn!(id, "update matched no account");
        if state.options.strict_not_found {
            return Err(ApiError::NotFound);
        }
    } else {
        tracing::info!(id, "account updated");
    }

    Ok(Json(account.with_id(id)))
}

/// DELETE /accounts/:id - Remove an account
async fn delete_account(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = id?;

    let removed = state
        .with_conn(|conn| db::delete_account(conn, id))
        .map_err(|e| ApiError::storage("Failed to delete account", e))?;

    if removed == 0 {
        tracing::warn!(id, "delete matched no account");
        if state.options.strict_not_found {
            return Err(ApiError::NotFound);
        }
    } else {
        tracing::info!(id, "account deleted");
    }

    Ok(Json(MessageResponse {
        message: "Account deleted",
    }))
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/accounts", get(list_accounts).post(create_account))
        .route("/accounts/:id", put(update_account).delete(delete_account))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
