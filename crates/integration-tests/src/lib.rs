//! Integration tests for EcoStore.
//!
//! Each test spawns its own storefront on an ephemeral loopback port with
//! the demo data loaded, then talks to it over real HTTP with a
//! cookie-carrying client. Nothing outside the process is needed:
//!
//! ```bash
//! cargo test -p ecostore-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog` - Health, product listing and filters
//! - `accounts` - Registration, login and sessions
//! - `shopping` - Cart, promo codes, wishlist and checkout
//! - `loyalty` - Points, tiers and reward redemption
//! - `admin` - Catalog and order management

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc)]

use std::net::SocketAddr;

use reqwest::{Client, Response, StatusCode};
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use ecostore_core::Email;
use ecostore_storefront::config::StorefrontConfig;
use ecostore_storefront::db::{Database, seed};
use ecostore_storefront::services::AuthService;
use ecostore_storefront::state::AppState;

pub use ecostore_storefront::db::seed::{DEMO_EMAIL, DEMO_PASSWORD, DEMO_POINTS};

/// Admin account created by [`TestContext::spawn`].
pub const ADMIN_EMAIL: &str = "admin@ecostore.test";
pub const ADMIN_PASSWORD: &str = "Gr33n-Admin-Pass!";

/// A running storefront and a client with its own cookie jar.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
}

impl TestContext {
    /// Start a storefront over a freshly seeded store plus an admin account.
    pub async fn spawn() -> Self {
        let config = StorefrontConfig::local();
        let db = Database::new();
        seed::load_demo(&db, &config.pricing)
            .await
            .expect("Failed to seed demo data");

        let email = Email::parse(ADMIN_EMAIL).expect("Invalid admin email");
        AuthService::new(&db)
            .ensure_admin(&email, &SecretString::from(ADMIN_PASSWORD))
            .await
            .expect("Failed to create admin account");

        let listener = TcpListener::bind(config.socket_addr())
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        let app = ecostore_storefront::app(AppState::with_database(config, db));
        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("Test server failed");
        });

        Self {
            client: new_client(),
            base_url: format!("http://{addr}"),
        }
    }

    /// A second shopper against the same server, with an empty cookie jar.
    #[must_use]
    pub fn new_session(&self) -> Self {
        Self {
            client: new_client(),
            base_url: self.base_url.clone(),
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    pub async fn post(&self, path: &str, body: &Value) -> Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("POST request failed")
    }

    pub async fn put(&self, path: &str, body: &Value) -> Response {
        self.client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("PUT request failed")
    }

    pub async fn patch(&self, path: &str, body: &Value) -> Response {
        self.client
            .patch(self.url(path))
            .json(body)
            .send()
            .await
            .expect("PATCH request failed")
    }

    pub async fn delete(&self, path: &str) -> Response {
        self.client
            .delete(self.url(path))
            .send()
            .await
            .expect("DELETE request failed")
    }

    /// Log in and assert it worked.
    pub async fn login(&self, email: &str, password: &str) {
        let resp = self
            .post(
                "/api/auth/login",
                &json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::OK, "login as {email} failed");
    }

    pub async fn login_demo(&self) {
        self.login(DEMO_EMAIL, DEMO_PASSWORD).await;
    }

    pub async fn login_admin(&self) {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    }
}

fn new_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Assert the status and decode the JSON body.
pub async fn json_body(resp: Response, expected: StatusCode) -> Value {
    let status = resp.status();
    let body: Value = resp.json().await.expect("Response was not JSON");
    assert_eq!(status, expected, "unexpected status, body: {body}");
    body
}
