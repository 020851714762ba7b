use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use scanapi::config::Config;
use scanapi::state::SharedState;
use scanapi::store::{EndpointStore, MemoryEndpointStore, PgEndpointStore};

/// A running test server. Backed by a dedicated PostgreSQL database when
/// `DATABASE_URL` is set, by the in-memory store otherwise.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub state: SharedState,
    pub db_name: Option<String>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Create an endpoint, return (body, status).
    pub async fn create_endpoint(&self, name: &str, url: &str, password: &str) -> (Value, StatusCode) {
        self.post_json(
            "/endpoints/",
            &json!({ "name": name, "url": url, "password": password }),
        )
        .await
    }

    /// Fetch the QR image, return (bytes, content-type, status).
    pub async fn fetch_image(&self, name: &str, password: &str) -> (Vec<u8>, Option<String>, StatusCode) {
        let resp = self
            .client
            .get(self.url(&format!("/endpoints/{name}?password={password}")))
            .send()
            .await
            .expect("fetch image request failed");
        let status = resp.status();
        let content_type = resp
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = resp.bytes().await.unwrap_or_default().to_vec();
        (bytes, content_type, status)
    }

    pub async fn get_json(&self, path: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn post_raw(&self, path: &str, body: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .header("content-type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn patch_json(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .patch(self.url(path))
            .json(body)
            .send()
            .await
            .expect("patch request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn delete_endpoint(&self, name: &str, password: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .delete(self.url(&format!("/endpoints/{name}?password={password}")))
            .send()
            .await
            .expect("delete request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

pub fn test_config(database_url: Option<String>) -> Config {
    Config {
        database_url,
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        db_max_connections: 5,
        max_body_size: 65_536,
        max_page_size: 50,
        qr_module_size: 2,
        log_level: "warn".to_string(),
    }
}

/// Spawn a test app. Uses a fresh temporary database when `DATABASE_URL` is set.
pub async fn spawn_app() -> TestApp {
    let _ = dotenvy::dotenv();

    let mut db_name = None;
    let mut database_url = None;
    let store: Arc<dyn EndpointStore> =
        match std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()) {
            Some(base_url) => {
                let (pool, name, test_url) = create_test_database(&base_url).await;
                db_name = Some(name);
                database_url = Some(test_url);
                Arc::new(PgEndpointStore::new(pool))
            }
            None => Arc::new(MemoryEndpointStore::new()),
        };

    let (app, state) = scanapi::build_app(store, test_config(database_url));

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    // Spawn server in background
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
        state,
        db_name,
    }
}

async fn create_test_database(base_url: &str) -> (sqlx::PgPool, String, String) {
    let db_name = format!("scanapi_test_{}", Uuid::now_v7().to_string().replace('-', ""));

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url(base_url))
        .await
        .expect("Failed to connect to postgres for test DB creation");

    sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
        .execute(&admin_pool)
        .await
        .expect("Failed to create test database");

    admin_pool.close().await;

    let test_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/{db_name}"))
        .unwrap_or_else(|| base_url.to_string());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&test_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations on test database");

    (pool, db_name, test_url)
}

fn admin_url(base_url: &str) -> String {
    base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.to_string())
}

/// Close the store and drop the test database, if any.
pub async fn cleanup(app: TestApp) {
    app.state.endpoints.close().await;

    let Some(db_name) = app.db_name else {
        return;
    };
    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url(&base_url))
        .await
        .expect("Failed to connect for cleanup");

    let _ = sqlx::query(&format!("DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE)"))
        .execute(&admin_pool)
        .await;

    admin_pool.close().await;
}
