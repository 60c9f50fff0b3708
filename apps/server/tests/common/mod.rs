#![allow(dead_code)]

use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::{rngs::OsRng, RngCore};
use retailpos_server::{api::app_router, build_state, config::Config};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@shop.test";
pub const ADMIN_PASSWORD: &str = "admin-password";

pub struct TestApp {
    pub router: Router,
    _dir: TempDir,
}

fn test_config(dir: &TempDir) -> Config {
    let mut secret = [0u8; 32];
    OsRng.fill_bytes(&mut secret);
    Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        db_path: dir.path().join("pos.db").to_string_lossy().to_string(),
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(30),
        static_dir: "dist".to_string(),
        jwt_secret: Some(BASE64.encode(secret)),
        token_ttl: Duration::from_secs(3600),
        admin_email: Some(ADMIN_EMAIL.to_string()),
        admin_password: Some(ADMIN_PASSWORD.to_string()),
        admin_name: "Store Admin".to_string(),
    }
}

pub async fn spawn_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir);
    let state = build_state(&config).await.unwrap();
    TestApp {
        router: app_router(state, &config),
        _dir: dir,
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).to_string())
            })
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["accessToken"].as_str().unwrap().to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    /// Creates a user through the API and returns their token.
    pub async fn user_token(&self, admin_token: &str, role: &str) -> String {
        let email = format!("{role}@shop.test");
        let (status, body) = self
            .post(
                "/api/v1/users",
                admin_token,
                json!({
                    "name": format!("Test {role}"),
                    "email": email,
                    "role": role,
                    "password": "till-password"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create user failed: {body}");
        self.login(&email, "till-password").await
    }

    pub async fn create_product(&self, token: &str, sku: &str, price: f64, stock: i64) -> Value {
        let (status, body) = self
            .post(
                "/api/v1/products",
                token,
                json!({
                    "sku": sku,
                    "name": format!("Product {sku}"),
                    "price": price,
                    "stock": stock,
                    "lowStockThreshold": 2,
                    "reorderPoint": 3
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create product failed: {body}");
        body
    }
}
