//! Admin password settings.
//!
//! Rotating the password logs out every admin session, including the one
//! that made the change.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use cookshop_core::PasswordStrength;
use serde::Deserialize;
use tracing::instrument;

use crate::middleware::RequireAdmin;
use crate::services::PasswordChangeError;
use crate::state::AppState;

/// Change password page template.
#[derive(Template, WebTemplate)]
#[template(path = "settings/password.html")]
pub struct PasswordTemplate {
    pub first_run: bool,
    pub error: Option<String>,
}

/// Change password form data.
#[derive(Deserialize)]
pub struct ChangePasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Build the settings router.
pub fn router() -> Router<AppState> {
    Router::new().route("/settings/password", get(password_page).post(change_password))
}

/// Render the change password form.
///
/// GET /settings/password
#[instrument(skip_all)]
pub async fn password_page(RequireAdmin(gate): RequireAdmin) -> PasswordTemplate {
    PasswordTemplate {
        first_run: !gate.auth().has_password_in_database().await,
        error: None,
    }
}

/// Rotate the admin password.
///
/// POST /settings/password
#[instrument(skip_all)]
pub async fn change_password(
    RequireAdmin(mut gate): RequireAdmin,
    Form(form): Form<ChangePasswordForm>,
) -> Response {
    let first_run = !gate.auth().has_password_in_database().await;

    if form.new_password != form.confirm_password {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            PasswordTemplate {
                first_run,
                error: Some("New passwords do not match".to_string()),
            },
        )
            .into_response();
    }

    match gate
        .change_password(&form.current_password, &form.new_password)
        .await
    {
        Ok(PasswordStrength::Strong) => {
            Redirect::to("/auth/login?notice=password-changed").into_response()
        }
        Ok(PasswordStrength::Common) => {
            Redirect::to("/auth/login?notice=password-changed-common").into_response()
        }
        Err(e) => {
            let status = match e {
                PasswordChangeError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
                PasswordChangeError::InvalidCurrentPassword | PasswordChangeError::Policy(_) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
            };
            (
                status,
                PasswordTemplate {
                    first_run,
                    error: Some(e.to_string()),
                },
            )
                .into_response()
        }
    }
}
