//! Cart and catalog browsing through the HTTP surface.

use axum::http::{Method, StatusCode};
use serde_json::json;

use lungi_mart_integration_tests::TestApp;

#[tokio::test]
async fn health_endpoints_respond() {
    let mut app = TestApp::new();
    // Liveness is plain text, not JSON
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
    let (status, _) = app.get("/health/ready").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn products_list_and_filter_by_category() {
    let mut app = TestApp::new();

    let (status, body) = app.get("/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().expect("array").len(), 8);

    let (status, body) = app.get("/products?category=silk-lungis").await;
    assert_eq!(status, StatusCode::OK);
    let silks = body.as_array().expect("array");
    assert_eq!(silks.len(), 2);
    assert!(silks.iter().all(|p| p["category_id"] == 3));

    let (status, _) = app.get("/products?category=no-such-category").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn product_detail_shows_pricing_and_reviews() {
    let mut app = TestApp::new();

    let (status, body) = app.get("/products/classic-checked-lungi").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"], "₹499.00");
    assert_eq!(body["original_price"], "₹699.00");
    assert_eq!(body["review_count"], 2);
    assert_eq!(body["rating"], 4.5);
    assert_eq!(body["in_stock"], true);

    let (status, body) = app.get("/products/handloom-limited-edition-lungi").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["in_stock"], false);

    let (status, _) = app.get("/products/no-such-lungi").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cart_add_update_remove_clear() {
    let mut app = TestApp::new();

    // Empty to start
    let (status, body) = app.get("/cart").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert_eq!(body["quote"]["subtotal"], "₹0.00");

    // Add twice: second add increments the same line
    let (status, body) = app.add_to_cart(1, 1).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    let (_, body) = app.add_to_cart(1, 2).await;
    assert_eq!(body["count"], 3);
    assert_eq!(body["items"].as_array().expect("array").len(), 1);
    assert_eq!(body["quote"]["subtotal"], "₹1497.00");

    // Set an exact quantity
    let (status, body) = app
        .patch("/cart/items", json!({ "product_id": 1, "quantity": 2 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["quote"]["subtotal"], "₹998.00");
    assert_eq!(body["quote"]["order_total"], "₹1048.00");

    // Zero removes the line
    let (_, body) = app
        .patch("/cart/items", json!({ "product_id": 1, "quantity": 0 }))
        .await;
    assert_eq!(body["count"], 0);

    // Removing an absent line is idempotent
    let (status, body) = app.delete("/cart/items/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);

    // Clear empties everything
    app.add_to_cart(2, 1).await;
    let (status, body) = app.delete("/cart").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert!(body["applied_coupon"].is_null());
}

#[tokio::test]
async fn quantities_are_clamped_to_stock() {
    let mut app = TestApp::new();

    // Festival Silk Lungi has 4 in stock
    let (status, body) = app.add_to_cart(5, 10).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["quantity"], 4);

    // Updating past stock clamps as well
    let (_, body) = app
        .patch("/cart/items", json!({ "product_id": 5, "quantity": 99 }))
        .await;
    assert_eq!(body["items"][0]["quantity"], 4);
}

#[tokio::test]
async fn out_of_stock_product_cannot_be_added() {
    let mut app = TestApp::new();
    let (status, body) = app.add_to_cart(8, 1).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(
        body["error"]
            .as_str()
            .expect("message")
            .contains("out of stock")
    );
}

#[tokio::test]
async fn unknown_product_is_not_found() {
    let mut app = TestApp::new();
    let (status, _) = app.add_to_cart(999, 1).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn carts_are_scoped_to_their_session() {
    let mut first = TestApp::new();
    let mut second = first.fork();

    first.add_to_cart(1, 1).await;
    let (_, body) = second.get("/cart").await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn logout_drops_the_cart() {
    let mut app = TestApp::new();
    app.login(1).await;
    app.add_to_cart(1, 1).await;

    let (status, _) = app.request(Method::DELETE, "/session", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = app.get("/cart").await;
    assert_eq!(body["count"], 0);
}
