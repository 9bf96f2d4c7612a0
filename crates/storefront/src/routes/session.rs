//! Mock login/logout.
//!
//! Real authentication is an external collaborator; the pricing core only
//! needs a nullable shopper profile. Login picks one of the seeded mock
//! profiles; logout flushes the whole session, which also clears the cart.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use lungi_mart_core::Shopper;
use lungi_mart_core::types::ShopperId;

use crate::error::{AppError, Result};
use crate::models::session_keys;
use crate::state::AppState;

/// Resolve the logged-in shopper, if any.
pub(crate) async fn current_shopper(
    state: &AppState,
    session: &Session,
) -> Result<Option<Shopper>> {
    let id = session
        .get::<ShopperId>(session_keys::CURRENT_SHOPPER)
        .await?;
    Ok(id.and_then(|id| state.shopper(id).cloned()))
}

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub shopper_id: i32,
}

/// Start a session as one of the seeded shoppers (mock login).
#[instrument(skip(state, session))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<LoginForm>,
) -> Result<Json<Shopper>> {
    let id = ShopperId::new(form.shopper_id);
    let shopper = state
        .shopper(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("shopper {id}")))?;
    session
        .insert(session_keys::CURRENT_SHOPPER, shopper.id)
        .await?;
    Ok(Json(shopper))
}

/// End the session. The cart does not survive logout.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<StatusCode> {
    session.flush().await?;
    Ok(StatusCode::NO_CONTENT)
}
