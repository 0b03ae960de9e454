//! HTTP surface of the ledger.
//!
//! Routes:
//! - `GET /authors`
//! - `GET /authors/:id`
//! - `GET /authors/:id/sales`
//! - `GET /authors/:id/withdrawals`
//! - `POST /withdrawals`
//!
//! Failures are returned as `{"error": "<message>"}`.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::debug;
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};

use crate::catalog::AuthorId;
use crate::error::LedgerError;
use crate::ledger::RoyaltyLedger;
use crate::views::{AuthorDetail, AuthorSummary, SaleRecord};
use crate::withdrawal::{Withdrawal, WithdrawalReceipt, WithdrawalRequest};

/// Shared state for axum handlers.
pub type SharedLedger = Arc<RoyaltyLedger>;

/// Errors a handler can answer with.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Body missing, not JSON, or not an object
    #[error("Invalid JSON body")]
    MalformedBody(#[from] JsonRejection),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Ledger(LedgerError::AuthorNotFound) => StatusCode::NOT_FOUND,
            ApiError::Ledger(LedgerError::BelowMinimum { .. })
            | ApiError::Ledger(LedgerError::InsufficientBalance { .. })
            | ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::MalformedBody(rejection) = &self {
            debug!("Rejected request body: {}", rejection.body_text());
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Build the axum router (separated for testing).
pub fn router(ledger: SharedLedger) -> Router {
    // Any origin may call the API
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/authors", get(list_authors))
        .route("/authors/:id", get(author_detail))
        .route("/authors/:id/sales", get(author_sales))
        .route("/authors/:id/withdrawals", get(author_withdrawals))
        .route("/withdrawals", post(create_withdrawal))
        .layer(cors)
        .with_state(ledger)
}

/// Path ids that are not unsigned integers name no author.
fn parse_author_id(raw: &str) -> Result<AuthorId, LedgerError> {
    raw.parse().map_err(|_| LedgerError::AuthorNotFound)
}

async fn list_authors(State(ledger): State<SharedLedger>) -> Json<Vec<AuthorSummary>> {
    Json(ledger.list_authors())
}

async fn author_detail(
    State(ledger): State<SharedLedger>,
    Path(id): Path<String>,
) -> Result<Json<AuthorDetail>, ApiError> {
    let author_id = parse_author_id(&id)?;
    Ok(Json(ledger.author_detail(author_id)?))
}

async fn author_sales(
    State(ledger): State<SharedLedger>,
    Path(id): Path<String>,
) -> Result<Json<Vec<SaleRecord>>, ApiError> {
    let author_id = parse_author_id(&id)?;
    Ok(Json(ledger.author_sales(author_id)?))
}

async fn author_withdrawals(
    State(ledger): State<SharedLedger>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Withdrawal>>, ApiError> {
    let author_id = parse_author_id(&id)?;
    Ok(Json(ledger.author_withdrawals(author_id).await?))
}

async fn create_withdrawal(
    State(ledger): State<SharedLedger>,
    payload: Result<Json<WithdrawalRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<WithdrawalReceipt>), ApiError> {
    let Json(request) = payload?;
    let receipt = ledger.create_withdrawal(request).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}
