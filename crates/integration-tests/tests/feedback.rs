//! Purchase-verified reviews over HTTP.

#![allow(clippy::unwrap_used)]

use handycraft_integration_tests::TestServer;
use reqwest::StatusCode;
use serde_json::{Value, json};

fn review(rating: u8) -> Value {
    json!({
        "productId": "P2",
        "username": "Ali",
        "userEmail": "ali@example.com",
        "rating": rating,
        "comment": "Flies beautifully"
    })
}

#[tokio::test]
async fn test_review_requires_completed_purchase() {
    let server = TestServer::start().await;
    let admin = server.admin("Nurul", "nurul@example.com").await;

    let resp = server.post("/api/feedback", &review(5)).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let order: Value = server
        .place_order("ali@example.com", json!([{"id": "P2", "quantity": 1}]))
        .await
        .json()
        .await
        .unwrap();
    let order_id = order["order"]["orderId"].as_str().unwrap();

    // Still pending
    let resp = server.post("/api/feedback", &review(5)).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    server
        .client
        .put(server.url("/api/admin/orders/status"))
        .header("x-user-id", &admin)
        .json(&json!({"orderId": order_id, "status": "Completed"}))
        .send()
        .await
        .unwrap();

    let resp = server.post("/api/feedback", &review(5)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let resp = server.post("/api/feedback", &review(4)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let reviews: Value = server
        .get("/api/feedback?productId=P2")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(reviews["reviews"].as_array().unwrap().len(), 2);
    assert_eq!(reviews["average"], json!(4.5));
    assert!(reviews["reviews"][0].get("userEmail").is_none());
}

#[tokio::test]
async fn test_review_validation() {
    let server = TestServer::start().await;

    let resp = server
        .post("/api/feedback", &json!({"productId": "P2", "rating": 5}))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Incomplete data");

    let resp = server.post("/api/feedback", &review(9)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = server.get("/api/feedback").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_no_reviews_average_zero() {
    let server = TestServer::start().await;

    let reviews: Value = server
        .get("/api/feedback?productId=P1")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(reviews["reviews"], json!([]));
    assert_eq!(reviews["average"], json!(0.0));
}
