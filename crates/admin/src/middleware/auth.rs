//! Authentication extractors for admin.
//!
//! Every protected handler takes [`RequireAdmin`], which runs the admin gate
//! for the request's session.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::gate::{AdminGate, GateState};
use crate::state::AppState;

/// The admin gate bound to a tower-sessions session.
pub type SessionGate = AdminGate<Session>;

/// Extractor that requires the gate to be `Authenticated`.
///
/// Redirects HTML requests to the login page and answers 401 for `/api/`
/// paths otherwise.
pub struct RequireAdmin(pub SessionGate);

/// Extractor that always resolves the gate, whatever its state.
pub struct Gate(pub SessionGate);

/// Rejection for [`RequireAdmin`].
#[derive(Debug)]
pub enum AdminAuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
    /// The session layer is missing.
    MissingSession,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::MissingSession => {
                tracing::error!("Admin gate used without a session layer");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

impl<S> FromRequestParts<S> for Gate
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AdminAuthRejection::MissingSession)?;
        let app_state = AppState::from_ref(state);

        Ok(Self(
            AdminGate::initialize(app_state.settings_store_arc(), session).await,
        ))
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Gate(gate) = Gate::from_request_parts(parts, state).await?;

        if gate.state() == GateState::Authenticated {
            return Ok(Self(gate));
        }

        if parts.uri.path().starts_with("/api/") {
            Err(AdminAuthRejection::Unauthorized)
        } else {
            Err(AdminAuthRejection::RedirectToLogin)
        }
    }
}
