//! Authentication route handlers for admin.
//!
//! Login, logout and the gate status endpoint.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json, Router,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::gate::{GateState, GateView};
use crate::middleware::{Gate, auth_rate_limiter};
use crate::state::AppState;

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub notice: Option<String>,
}

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub password: String,
}

/// Query parameters for the login page.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub notice: Option<String>,
}

/// Gate status response.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub state: GateState,
    pub view: GateView,
    pub has_password: bool,
    pub is_authenticated: bool,
    pub login_timestamp: Option<i64>,
}

/// Build the auth router. Only password submissions are rate limited.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/auth/login",
            get(login_page).merge(post(login).layer(auth_rate_limiter())),
        )
        .route("/auth/logout", post(logout))
        .route("/auth/status", get(status))
}

/// Text for the `notice` query parameter set by other pages.
fn notice_text(notice: Option<&str>) -> Option<String> {
    match notice? {
        "password-changed" => {
            Some("Password changed. Please log in with your new password.".to_string())
        }
        "password-changed-common" => Some(
            "Password changed, but it is a common one. Please log in and consider a stronger password."
                .to_string(),
        ),
        "logged-out" => Some("You have been logged out.".to_string()),
        _ => None,
    }
}

/// Render the login page.
///
/// GET /auth/login
#[instrument(skip(gate))]
pub async fn login_page(Gate(gate): Gate, Query(query): Query<LoginQuery>) -> Response {
    if gate.view() == GateView::Protected {
        return Redirect::to("/").into_response();
    }

    LoginTemplate {
        error: None,
        notice: notice_text(query.notice.as_deref()),
    }
    .into_response()
}

/// Check the password and start an authenticated session.
///
/// POST /auth/login
#[instrument(skip_all)]
pub async fn login(
    Gate(mut gate): Gate,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    if gate.submit_login(&form.password).await {
        // New session ID after privilege change
        session.cycle_id().await?;
        return Ok(Redirect::to("/").into_response());
    }

    Ok((
        StatusCode::UNAUTHORIZED,
        LoginTemplate {
            error: Some("Invalid password".to_string()),
            notice: None,
        },
    )
        .into_response())
}

/// Logout and clear session.
///
/// POST /auth/logout
#[instrument(skip_all)]
pub async fn logout(Gate(mut gate): Gate) -> Redirect {
    gate.logout().await;
    Redirect::to("/auth/login?notice=logged-out")
}

/// Current gate state for this browser.
///
/// GET /auth/status
#[instrument(skip_all)]
pub async fn status(Gate(gate): Gate) -> Json<StatusResponse> {
    let auth = gate.auth();
    Json(StatusResponse {
        state: gate.state(),
        view: gate.view(),
        has_password: auth.has_password_in_database().await,
        is_authenticated: auth.is_authenticated(),
        login_timestamp: auth.login_timestamp(),
    })
}
