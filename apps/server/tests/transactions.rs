mod common;

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::spawn_app;

fn sale(product_id: &str, quantity: i64, payment: f64) -> Value {
    json!({
        "customerName": "Walk-in",
        "paymentMethod": "CASH",
        "paymentAmount": payment,
        "items": [{ "productId": product_id, "quantity": quantity }]
    })
}

fn id_of(value: &Value) -> String {
    value["id"].as_str().unwrap().to_string()
}

async fn stock_of(app: &common::TestApp, token: &str, product_id: &str) -> i64 {
    let (status, product) = app
        .get(&format!("/api/v1/products/{product_id}"), token)
        .await;
    assert_eq!(status, StatusCode::OK);
    product["stock"].as_i64().unwrap()
}

#[tokio::test]
async fn checkout_deducts_stock_and_computes_totals() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let cashier = app.user_token(&admin, "cashier").await;
    let product = app.create_product(&admin, "PEN-01", 2.5, 10).await;
    let product_id = id_of(&product);

    let (status, tx) = app
        .post("/api/v1/transactions", &cashier, sale(&product_id, 4, 20.0))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{tx}");
    assert_eq!(tx["status"], "COMPLETED");
    assert_eq!(tx["subtotal"].as_f64(), Some(10.0));
    assert_eq!(tx["tax"].as_f64(), Some(1.0));
    assert_eq!(tx["total"].as_f64(), Some(11.0));
    assert_eq!(tx["changeAmount"].as_f64(), Some(9.0));
    assert!(tx["invoiceNumber"].as_str().unwrap().ends_with("-0001"));
    assert_eq!(tx["items"][0]["sku"], "PEN-01");

    assert_eq!(stock_of(&app, &admin, &product_id).await, 6);

    let (status, receipt) = app
        .get(
            &format!("/api/v1/transactions/{}/receipt", id_of(&tx)),
            &cashier,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["store"]["currency"], "USD");
}

#[tokio::test]
async fn oversell_and_underpayment_are_rejected() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let product = app.create_product(&admin, "CUP-01", 3.0, 2).await;
    let product_id = id_of(&product);

    let (status, body) = app
        .post("/api/v1/transactions", &admin, sale(&product_id, 3, 100.0))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 409);
    assert_eq!(stock_of(&app, &admin, &product_id).await, 2);

    let (status, _) = app
        .post("/api/v1/transactions", &admin, sale(&product_id, 1, 1.0))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(stock_of(&app, &admin, &product_id).await, 2);

    let (status, _) = app
        .post("/api/v1/transactions", &admin, sale(&product_id, 0, 10.0))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cancellation_restores_stock_once() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let cashier = app.user_token(&admin, "cashier").await;
    let product = app.create_product(&admin, "MUG-01", 5.0, 5).await;
    let product_id = id_of(&product);

    let (_, tx) = app
        .post("/api/v1/transactions", &cashier, sale(&product_id, 2, 20.0))
        .await;
    let cancel_uri = format!("/api/v1/transactions/{}/cancel", id_of(&tx));

    let (status, _) = app.post(&cancel_uri, &cashier, json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, cancelled) = app
        .post(&cancel_uri, &admin, json!({ "reason": "customer changed mind" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "CANCELLED");
    assert_eq!(cancelled["cancelReason"], "customer changed mind");
    assert_eq!(stock_of(&app, &admin, &product_id).await, 5);

    let (status, _) = app.post(&cancel_uri, &admin, json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(stock_of(&app, &admin, &product_id).await, 5);

    let (_, movements) = app
        .get(
            &format!("/api/v1/inventory/movements?productId={product_id}"),
            &admin,
        )
        .await;
    let types: Vec<&str> = movements["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["movementType"].as_str().unwrap())
        .collect();
    assert_eq!(types, vec!["SALE_CANCELLATION", "SALE", "INITIAL"]);
}

#[tokio::test]
async fn cashier_history_is_limited_to_own_sales() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let cashier = app.user_token(&admin, "cashier").await;
    let product = app.create_product(&admin, "BAG-01", 1.0, 50).await;
    let product_id = id_of(&product);

    let (_, admin_sale) = app
        .post("/api/v1/transactions", &admin, sale(&product_id, 1, 5.0))
        .await;
    app.post("/api/v1/transactions", &cashier, sale(&product_id, 1, 5.0))
        .await;

    let (status, own) = app
        .post("/api/v1/transactions/search", &cashier, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(own["meta"]["totalRowCount"], 1);

    let (_, all) = app
        .post("/api/v1/transactions/search", &admin, json!({}))
        .await;
    assert_eq!(all["meta"]["totalRowCount"], 2);

    let (status, _) = app
        .get(
            &format!("/api/v1/transactions/{}", id_of(&admin_sale)),
            &cashier,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn low_stock_sale_raises_a_notification() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let product = app.create_product(&admin, "INK-01", 4.0, 5).await;
    let product_id = id_of(&product);

    let (status, _) = app
        .post("/api/v1/transactions", &admin, sale(&product_id, 4, 50.0))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    // The event worker debounces for 500 ms before writing.
    let mut low_stock = Vec::new();
    for _ in 0..20 {
        tokio::time::sleep(Duration::from_millis(200)).await;
        let (_, notifications) = app
            .get("/api/v1/notifications?unreadOnly=true", &admin)
            .await;
        low_stock = notifications["data"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|n| n["kind"] == "LOW_STOCK")
            .cloned()
            .collect();
        if !low_stock.is_empty() {
            break;
        }
    }
    assert_eq!(low_stock.len(), 1);
    assert_eq!(low_stock[0]["productId"], product_id.as_str());

    let (_, unread) = app
        .get("/api/v1/notifications/unread-count", &admin)
        .await;
    assert!(unread["count"].as_i64().unwrap() >= 1);
}

#[tokio::test]
async fn out_of_range_amounts_are_rejected() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;

    let (status, _) = app
        .post(
            "/api/v1/products",
            &admin,
            json!({ "sku": "GOLD-01", "name": "Gold bar", "price": 2_000_000_000.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let product = app.create_product(&admin, "PIN-01", 1.0, 5).await;
    let (status, _) = app
        .post(
            "/api/v1/transactions",
            &admin,
            sale(&id_of(&product), 9_223_372_036_854_775_807, 10.0),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // The writer still accepts sales afterwards.
    let (status, _) = app
        .post("/api/v1/transactions", &admin, sale(&id_of(&product), 1, 10.0))
        .await;
    assert_eq!(status, StatusCode::CREATED);
}
