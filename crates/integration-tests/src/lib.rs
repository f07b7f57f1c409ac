//! Integration tests for the Handycraft store.
//!
//! Each test starts its own server on an ephemeral port with a fresh
//! temporary data directory, so tests run in parallel without sharing state.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p handycraft-integration-tests
//! ```

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::net::SocketAddr;

use handycraft_server::config::ServerConfig;
use handycraft_server::db::Database;
use handycraft_server::models::Product;
use handycraft_server::routes;
use handycraft_server::services::{AuthService, ProductService};
use handycraft_server::state::AppState;
use reqwest::{Client, Response};
use serde_json::{Value, json};
use tempfile::TempDir;

/// Password used for every account created by the helpers.
pub const PASSWORD: &str = "Batik2024";

/// Seed catalog: P1 has Red 5 and Blue 2, P2 has only a default variant.
pub fn seed_products() -> Vec<Product> {
    serde_json::from_value(json!([
        {
            "Product ID": "P1",
            "Category": "Textiles",
            "Product Name": "Batik Scarf",
            "Price (RM)": 45.5,
            "Description": "Hand-drawn batik on silk",
            "File Name": "batik.jpg",
            "Inventory": {"Red": 5, "Blue": 2}
        },
        {
            "Product ID": "P2",
            "Category": "Toys",
            "Product Name": "Wau Kite",
            "Price (RM)": 30,
            "Description": "Kelantan moon kite",
            "File Name": "wau.jpg",
            "Inventory": {"Default": 10}
        }
    ]))
    .unwrap()
}

/// A running server plus the handles tests need to inspect it.
pub struct TestServer {
    pub client: Client,
    pub base_url: String,
    pub state: AppState,
    data_dir: TempDir,
}

impl TestServer {
    /// Start a server with the seed catalog.
    pub async fn start() -> Self {
        let data_dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            data_dir: data_dir.path().to_path_buf(),
            static_dir: data_dir.path().join("static"),
            ..ServerConfig::default()
        };

        let db = Database::open(&config.data_dir).await.unwrap();
        ProductService::new(&db)
            .import(seed_products())
            .await
            .unwrap();
        let state = AppState::new(config, db);

        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        let app = routes::app(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            client: Client::new(),
            base_url: format!("http://{addr}"),
            state,
            data_dir,
        }
    }

    /// Directory holding this server's JSON files.
    pub fn data_path(&self) -> &std::path::Path {
        self.data_dir.path()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    pub async fn post(&self, path: &str, body: &Value) -> Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .unwrap()
    }

    /// Register a customer with recovery answers and return its user id.
    pub async fn register(&self, username: &str, email: &str) -> String {
        let resp = self
            .post(
                "/api/auth/register",
                &json!({
                    "username": username,
                    "email": email,
                    "password": PASSWORD,
                    "securityAnswer1": "Ipoh",
                    "securityAnswer2": "Comel",
                    "securityAnswer3": "Green"
                }),
            )
            .await;
        assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
        let body: Value = resp.json().await.unwrap();
        body["userId"].as_str().unwrap().to_owned()
    }

    /// Register an account and grant it admin, returning its user id.
    pub async fn admin(&self, username: &str, email: &str) -> String {
        let id = self.register(username, email).await;
        AuthService::new(self.state.db(), &self.state.config().protected_username)
            .promote(email)
            .await
            .unwrap();
        id
    }

    /// Place an order for `items`, returning the raw response.
    pub async fn place_order(&self, user_id: &str, items: Value) -> Response {
        self.post(
            "/api/orders",
            &json!({
                "userId": user_id,
                "customerName": "Ali Hassan",
                "address": "12 Jalan Bunga, Ipoh",
                "phone": "012-3456789",
                "items": items
            }),
        )
        .await
    }

    /// Current stock for a product variant, read through the API.
    pub async fn stock(&self, product_id: &str, variant: &str) -> u64 {
        let product: Value = self
            .get(&format!("/api/products/{product_id}"))
            .await
            .json()
            .await
            .unwrap();
        product["Inventory"][variant].as_u64().unwrap_or(0)
    }
}
