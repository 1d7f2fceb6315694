//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Router, extract::State, routing::get};
use chrono::DateTime;
use tracing::instrument;

use cookshop_core::Settings;

use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub business_name: String,
    pub whatsapp_number: Option<String>,
    /// No credential stored: anyone can open the panel.
    pub first_run: bool,
    pub logged_in_at: Option<String>,
}

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}

/// Dashboard overview.
///
/// GET /
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(gate): RequireAdmin,
) -> DashboardTemplate {
    let settings = match state.settings_store().list().await {
        Ok(rows) => Settings::from_rows(rows.iter().map(|row| (row.key.as_str(), &row.value))),
        Err(e) => {
            tracing::warn!(error = %e, "Settings unavailable for dashboard");
            Settings::default()
        }
    };

    let auth = gate.auth();
    DashboardTemplate {
        business_name: settings.display_name().to_string(),
        whatsapp_number: settings.whatsapp_number.clone(),
        first_run: !auth.has_password_in_database().await,
        logged_in_at: auth
            .login_timestamp()
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string()),
    }
}
