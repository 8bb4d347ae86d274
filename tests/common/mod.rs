use reqwest::Client;
use std::sync::Arc;

use shop_admin::orders::TransitionPolicy;
use shop_admin::store::MemoryStore;
use shop_admin::{create_api_router, AdminService};

pub struct TestApp {
    pub base: String,
    pub client: Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}/api/admin{}", self.base, path)
    }

    pub async fn get_json(&self, path: &str) -> (reqwest::StatusCode, serde_json::Value) {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send request");
        let status = response.status();
        let body = response
            .json::<serde_json::Value>()
            .await
            .expect("Failed to parse response JSON");
        (status, body)
    }
}

/// Serves the sample dataset from memory on an ephemeral port.
pub async fn spawn_app(policy: TransitionPolicy) -> TestApp {
    let service = Arc::new(AdminService::new(Arc::new(MemoryStore::sample()), policy));
    let app = create_api_router(service);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        base: format!("http://{}", addr),
        client: Client::new(),
    }
}
