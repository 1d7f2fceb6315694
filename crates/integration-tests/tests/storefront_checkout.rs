//! Cart and checkout scenarios against a running storefront.

use std::sync::Arc;

use cookshop_core::MemorySettingsStore;
use cookshop_integration_tests::{TestServer, browser, location, spawn_storefront};
use reqwest::{Client, StatusCode};

async fn shop() -> TestServer {
    spawn_storefront(Arc::new(MemorySettingsStore::with_values([
        ("business_name", "Auntie's Kitchen"),
        ("whatsapp_number", "+592 600-1234"),
    ])))
    .await
}

async fn add(client: &Client, server: &TestServer, id: &str, price: &str, qty: &str) {
    let name = id.to_uppercase();
    let resp = client
        .post(server.url("/cart/add"))
        .form(&[
            ("product_id", id),
            ("name", name.as_str()),
            ("price", price),
            ("quantity", qty),
        ])
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::OK);
}

/// Follow `/checkout` and return the deep link and its decoded message.
async fn checkout(client: &Client, server: &TestServer) -> (String, String) {
    let resp = client
        .get(server.url("/checkout"))
        .send()
        .await
        .expect("Failed to check out");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let link = location(&resp);
    let text = link
        .split_once("?text=")
        .map(|(_, text)| urlencoding::decode(text).expect("valid encoding").into_owned())
        .unwrap_or_default();
    (link, text)
}

#[tokio::test]
async fn test_repeated_add_aggregates() {
    let server = shop().await;
    let client = browser();

    add(&client, &server, "a", "500", "2").await;
    add(&client, &server, "a", "500", "3").await;

    let (link, text) = checkout(&client, &server).await;
    assert!(link.starts_with("https://wa.me/5926001234?text="));
    assert_eq!(
        text,
        "Order for Auntie's Kitchen\n\
         • A × 5 — GYD $2,500\n\
         Subtotal: GYD $2,500\n\
         \n\
         Note: Pickup/Delivery? (add details)\n\
         Payment method: Cash"
    );
}

#[tokio::test]
async fn test_message_keeps_cart_order() {
    let server = shop().await;
    let client = browser();

    add(&client, &server, "b", "100", "1").await;
    add(&client, &server, "a", "200", "1").await;
    add(&client, &server, "b", "100", "1").await;

    let (_, text) = checkout(&client, &server).await;
    let lines: Vec<&str> = text.lines().filter(|l| l.starts_with('•')).collect();
    assert_eq!(lines, ["• B × 2 — GYD $200", "• A × 1 — GYD $200"]);
    assert!(text.contains("Subtotal: GYD $400"));
}

#[tokio::test]
async fn test_update_to_zero_clamps_to_one() {
    let server = shop().await;
    let client = browser();

    add(&client, &server, "a", "750", "4").await;
    let resp = client
        .post(server.url("/cart/update"))
        .form(&[("product_id", "a"), ("quantity", "0")])
        .send()
        .await
        .expect("Failed to update cart");
    assert_eq!(resp.status(), StatusCode::OK);

    let (_, text) = checkout(&client, &server).await;
    assert!(text.contains("• A × 1 — GYD $750"));
}

#[tokio::test]
async fn test_clear_empties_cart() {
    let server = shop().await;
    let client = browser();

    add(&client, &server, "a", "100", "1").await;
    add(&client, &server, "b", "100", "1").await;
    for _ in 0..2 {
        let resp = client
            .post(server.url("/cart/clear"))
            .send()
            .await
            .expect("Failed to clear cart");
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = client
        .get(server.url("/checkout"))
        .send()
        .await
        .expect("Failed to check out");
    assert_eq!(location(&resp), "/cart");
}

#[tokio::test]
async fn test_cart_belongs_to_one_browser() {
    let server = shop().await;
    let shopper = browser();
    let stranger = browser();

    add(&shopper, &server, "a", "100", "3").await;

    let count = |client: Client| {
        let url = server.url("/cart/count");
        async move {
            client
                .get(url)
                .send()
                .await
                .expect("Failed to count")
                .text()
                .await
                .expect("Failed to read body")
        }
    };
    assert!(count(shopper.clone()).await.contains(">3<"));
    assert!(count(stranger.clone()).await.contains(">0<"));

    let resp = stranger
        .get(server.url("/checkout"))
        .send()
        .await
        .expect("Failed to check out");
    assert_eq!(location(&resp), "/cart");
}

#[tokio::test]
async fn test_checkout_degrades_without_settings() {
    let server = spawn_storefront(Arc::new(MemorySettingsStore::new())).await;
    let client = browser();
    add(&client, &server, "a", "100", "1").await;

    server.settings.set_unavailable(true);
    let (link, text) = checkout(&client, &server).await;
    assert!(link.starts_with("https://wa.me/?text="));
    assert!(text.starts_with("Order for cook-shop\n"));
}
