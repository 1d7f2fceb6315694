//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (returns count badge, triggers cart-updated)
//! POST /cart/update            - Update quantity (returns cart_items fragment)
//! POST /cart/remove            - Remove item (returns cart_items fragment)
//! POST /cart/clear             - Empty the cart (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout               - Redirect to the WhatsApp deep link
//! ```

pub mod cart;

use axum::{
    Router,
    routing::{get, post},
};

use cookshop_core::{Settings, Theme};

use crate::state::AppState;

/// Site chrome shared by full-page templates.
#[derive(Clone)]
pub struct SiteView {
    pub business_name: String,
    pub logo_url: Option<String>,
    pub theme: &'static str,
}

impl SiteView {
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        Self {
            business_name: settings.display_name().to_string(),
            logo_url: settings.logo_url.clone(),
            theme: settings.theme.unwrap_or(Theme::Light).as_str(),
        }
    }
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/cart", cart_routes())
        .route("/checkout", get(cart::checkout))
}
