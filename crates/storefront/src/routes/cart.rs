//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart snapshot lives in the session and is written back after every
//! mutation; the server never prices or validates the lines against a catalog.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use cookshop_core::{Cart, CartProduct, Currency, Money, ProductId};

use crate::error::{Result, add_breadcrumb};
use crate::routes::SiteView;
use crate::services::{CartStore, SessionCartStorage, compose};
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl CartView {
    /// Format a cart for display.
    #[must_use]
    pub fn new(cart: &Cart, currency: Currency) -> Self {
        Self {
            items: cart
                .items()
                .iter()
                .map(|item| CartItemView {
                    id: item.id.to_string(),
                    name: item.name.clone(),
                    quantity: item.qty,
                    price: currency.format(item.unit_price),
                    line_price: currency.format(item.line_total()),
                })
                .collect(),
            subtotal: currency.format(cart.subtotal()),
            item_count: cart.item_count(),
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Open the shopper's cart from the session.
///
/// A missing or unreadable snapshot yields an empty cart.
async fn open_cart(session: &Session) -> CartStore<SessionCartStorage> {
    CartStore::open(SessionCartStorage::load(session).await)
}

/// Flush whatever the cart store persisted back into the session.
async fn commit_cart(session: &Session, store: CartStore<SessionCartStorage>) -> Result<Cart> {
    let (cart, storage) = store.into_parts();
    storage.flush(session).await?;
    Ok(cart)
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data.
///
/// Name and price come from the product card the shopper clicked.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub name: String,
    pub price: u64,
    pub quantity: Option<u32>,
}

/// Update cart form data.
///
/// Signed so that a typed `0` or negative value reaches the clamp instead of
/// failing to deserialize.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub site: SiteView,
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

fn items_fragment(cart: &Cart, currency: Currency) -> Response {
    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::new(cart, currency),
        },
    )
        .into_response()
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let settings = state.settings().get_settings().await;
    let store = open_cart(&session).await;

    CartShowTemplate {
        site: SiteView::new(&settings),
        cart: CartView::new(store.cart(), state.currency()),
    }
}

/// Add item to cart (HTMX).
///
/// Returns the count badge with an HTMX trigger so other fragments refresh.
#[instrument(skip(session))]
pub async fn add(session: Session, Form(form): Form<AddToCartForm>) -> Result<Response> {
    let mut store = open_cart(&session).await;
    let quantity = form.quantity.unwrap_or(1);

    add_breadcrumb("cart", "Added to cart", &[("product_id", &form.product_id)]);

    store.add(
        CartProduct {
            id: ProductId::new(form.product_id),
            name: form.name,
            unit_price: Money::new(form.price),
        },
        quantity,
    );
    let cart = commit_cart(&session, store).await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate {
            count: cart.item_count(),
        },
    )
        .into_response())
}

/// Update cart item quantity (HTMX).
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let mut store = open_cart(&session).await;
    store.update_qty(&ProductId::new(form.product_id), form.quantity);
    let cart = commit_cart(&session, store).await?;
    Ok(items_fragment(&cart, state.currency()))
}

/// Remove item from cart (HTMX).
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let mut store = open_cart(&session).await;
    store.remove(&ProductId::new(form.product_id));
    let cart = commit_cart(&session, store).await?;
    Ok(items_fragment(&cart, state.currency()))
}

/// Empty the cart (HTMX).
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Result<Response> {
    let mut store = open_cart(&session).await;
    store.clear();
    let cart = commit_cart(&session, store).await?;
    Ok(items_fragment(&cart, state.currency()))
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let store = open_cart(&session).await;
    CartCountTemplate {
        count: store.cart().item_count(),
    }
}

/// Redirect to the WhatsApp deep link for the current cart.
///
/// An empty cart goes back to the cart page instead. The cart is left intact:
/// the order is only sent once the shopper presses send in WhatsApp.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Response {
    let store = open_cart(&session).await;
    let settings = state.settings().get_settings().await;

    match compose(store.cart(), &settings, state.currency()) {
        Some(message) => {
            add_breadcrumb("checkout", "Opened WhatsApp checkout", &[]);
            Redirect::to(&message.url).into_response()
        }
        None => Redirect::to("/cart").into_response(),
    }
}
