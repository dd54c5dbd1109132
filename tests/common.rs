#![allow(dead_code)]
use board_server::config::Config;
use board_server::storage::{MemoryStore, MessageStore};
use board_server::{App, api};
use clap::Parser;
use serde_json::{Value, json};
use std::sync::{Arc, Once};
use tokio::net::TcpListener;

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "back-challenge";

static INIT: Once = Once::new();

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("board_server=debug".parse().unwrap())
            .add_directive("sqlx=warn".parse().unwrap())
            .add_directive("tower=warn".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());

        let _ = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init();
    });
}

pub fn get_test_config() -> Config {
    let mut config = Config::parse_from(["board-server"]);
    config.database_url = None;
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config.server.mgmt_port = 0;
    config.auth.username = USERNAME.to_string();
    config.auth.password = PASSWORD.to_string();
    config.database.seed_csv = None;
    config
}

pub struct TestApp {
    pub server_url: String,
    pub mgmt_url: String,
    pub client: reqwest::Client,
    pub store: Arc<dyn MessageStore>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_store(Arc::new(MemoryStore::new())).await
    }

    pub async fn spawn_with_store(store: Arc<dyn MessageStore>) -> Self {
        setup_tracing();
        let config = get_test_config();
        let app = App::with_store(&config, Arc::clone(&store));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mgmt_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let server_url = format!("http://{}", listener.local_addr().unwrap());
        let mgmt_url = format!("http://{}", mgmt_listener.local_addr().unwrap());

        let app_router = api::app_router(app.state);
        let mgmt_router = api::mgmt_router(app.mgmt_state);
        tokio::spawn(async move {
            axum::serve(listener, app_router).await.unwrap();
        });
        tokio::spawn(async move {
            axum::serve(mgmt_listener, mgmt_router).await.unwrap();
        });

        Self { server_url, mgmt_url, client: reqwest::Client::new(), store }
    }

    pub fn messages_url(&self) -> String {
        format!("{}/messages", self.server_url)
    }

    pub fn message_url(&self, id: &str) -> String {
        format!("{}/messages/{}", self.server_url, id)
    }

    pub async fn create_message(&self, name: &str, email: &str, text: &str) -> reqwest::Response {
        self.client
            .post(self.messages_url())
            .json(&json!({ "name": name, "email": email, "text": text }))
            .send()
            .await
            .unwrap()
    }

    /// Creates a message and returns the echoed JSON, asserting `201 Created`.
    pub async fn create_ok(&self, name: &str, email: &str, text: &str) -> Value {
        let resp = self.create_message(name, email, text).await;
        assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
        resp.json().await.unwrap()
    }

    pub async fn get_message(&self, id: &str) -> reqwest::Response {
        self.client.get(self.message_url(id)).basic_auth(USERNAME, Some(PASSWORD)).send().await.unwrap()
    }

    pub async fn list_messages(&self) -> reqwest::Response {
        self.client.get(self.messages_url()).basic_auth(USERNAME, Some(PASSWORD)).send().await.unwrap()
    }

    pub async fn update_message(&self, id: &str, text: &str) -> reqwest::Response {
        self.client
            .put(self.message_url(id))
            .basic_auth(USERNAME, Some(PASSWORD))
            .json(&json!({ "text": text }))
            .send()
            .await
            .unwrap()
    }
}
