mod common;

use axum::http::{Method, StatusCode};
use common::{send, send_as_user, TestStack};
use serde_json::json;

#[tokio::test]
async fn add_snapshots_price_and_sums_quantities() {
    let stack = TestStack::new().await;
    let product_id = stack.seed_product("Keyboard", 49.5, 10).await;

    let payload = json!({ "productId": product_id, "quantity": 2 });
    let (status, body) = send_as_user(&stack.orders_app, Method::POST, "/cart/add", 1, Some(payload)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Product added to cart successfully");
    assert_eq!(body["data"]["price"], 49.5);

    // Same product again: the existing row's quantity is summed.
    let payload = json!({ "productId": product_id, "quantity": 3 });
    let (status, _) = send_as_user(&stack.orders_app, Method::POST, "/cart/add", 1, Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send_as_user(&stack.orders_app, Method::GET, "/cart", 1, None).await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 5);
    assert_eq!(items[0]["price"], 49.5);
    assert_eq!(items[0]["productId"], product_id);
}

#[tokio::test]
async fn remove_decrements_then_deletes() {
    let stack = TestStack::new().await;
    let product_id = stack.seed_product("Mouse", 20.0, 10).await;

    let payload = json!({ "productId": product_id, "quantity": 3 });
    send_as_user(&stack.orders_app, Method::POST, "/cart/add", 1, Some(payload)).await;

    let payload = json!({ "productId": product_id, "quantity": 1 });
    let (status, body) = send_as_user(&stack.orders_app, Method::POST, "/cart/remove", 1, Some(payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product removed from cart successfully");

    let (_, body) = send_as_user(&stack.orders_app, Method::GET, "/cart", 1, None).await;
    assert_eq!(body[0]["quantity"], 2);

    // Removing more than remains deletes the row outright.
    let payload = json!({ "productId": product_id, "quantity": 99 });
    let (status, _) = send_as_user(&stack.orders_app, Method::POST, "/cart/remove", 1, Some(payload)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_as_user(&stack.orders_app, Method::GET, "/cart", 1, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Cart is empty");
}

#[tokio::test]
async fn remove_missing_item_is_not_found() {
    let stack = TestStack::new().await;

    let payload = json!({ "productId": 42, "quantity": 1 });
    let (status, body) = send_as_user(&stack.orders_app, Method::POST, "/cart/remove", 1, Some(payload)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Item not found in cart");
}

#[tokio::test]
async fn carts_are_per_user() {
    let stack = TestStack::new().await;
    let product_id = stack.seed_product("Webcam", 80.0, 10).await;

    let payload = json!({ "productId": product_id, "quantity": 1 });
    send_as_user(&stack.orders_app, Method::POST, "/cart/add", 1, Some(payload)).await;

    let (status, body) = send_as_user(&stack.orders_app, Method::GET, "/cart", 2, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Cart is empty");
}

#[tokio::test]
async fn add_unknown_product_fails() {
    let stack = TestStack::new().await;

    let payload = json!({ "productId": 9999, "quantity": 1 });
    let (status, body) = send_as_user(&stack.orders_app, Method::POST, "/cart/add", 1, Some(payload)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to get product details");
}

#[tokio::test]
async fn missing_identity_header_rejected() {
    let stack = TestStack::new().await;

    let (status, body) = send(&stack.orders_app, Method::GET, "/cart", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Missing X-User-ID header");
}
