//! WhatsApp checkout message composer.
//!
//! Turns a cart snapshot and the site settings into the order text and a
//! `wa.me` deep link. Pure: no I/O, no clock, same input gives the same link.

use cookshop_core::types::whatsapp::digits_only;
use cookshop_core::{Cart, Currency, Settings};

const DEEP_LINK_BASE: &str = "https://wa.me/";

/// A composed checkout message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutMessage {
    /// Plain order text.
    pub text: String,
    /// `https://wa.me/<digits>?text=<percent-encoded text>`.
    pub url: String,
}

/// Compose the order message for a non-empty cart.
///
/// Returns `None` for an empty cart so there is never a link to an empty
/// order. A missing or garbled WhatsApp number still produces a well-formed
/// URL, just with an empty (or odd) recipient segment.
#[must_use]
pub fn compose(cart: &Cart, settings: &Settings, currency: Currency) -> Option<CheckoutMessage> {
    if cart.is_empty() {
        return None;
    }

    let mut lines = Vec::with_capacity(cart.items().len() + 5);
    lines.push(format!("Order for {}", settings.display_name()));
    lines.extend(cart.items().iter().map(|item| {
        format!(
            "• {} × {} — {}",
            item.name,
            item.qty,
            currency.format(item.line_total())
        )
    }));
    lines.push(format!("Subtotal: {}", currency.format(cart.subtotal())));
    lines.push(String::new());
    lines.push("Note: Pickup/Delivery? (add details)".to_owned());
    lines.push("Payment method: Cash".to_owned());

    let text = lines.join("\n");
    let phone = digits_only(settings.whatsapp_number.as_deref().unwrap_or_default());
    let url = format!("{DEEP_LINK_BASE}{phone}?text={}", urlencoding::encode(&text));

    Some(CheckoutMessage { text, url })
}
