//! Shared helpers for backend client tests

#![allow(dead_code)]

use deepcode_client::HttpBackend;
use deepcode_config::BackendConfig;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Client pointed at the mock server
pub fn backend_for(server: &MockServer) -> HttpBackend {
    let config = BackendConfig {
        base_url: format!("{}/", server.uri()),
        timeout_secs: 5,
    };
    HttpBackend::new(&config).expect("client should build")
}

/// Mount a JSON response for `verb path`
pub async fn mount_json(server: &MockServer, verb: &str, route: &str, status: u16, body: Value) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// A repository entry as the backend sends it
pub fn repo_json(name: &str, default_branch: &str) -> Value {
    json!({
        "name": name,
        "fullName": format!("acme/{}", name),
        "defaultBranch": default_branch,
        "isPrivate": false,
        "description": null,
        "updatedAt": "2024-05-01T10:00:00Z",
        "stargazersCount": 4,
        "language": "Rust"
    })
}

/// A status payload
pub fn status_json(status: &str, progress: f64) -> Value {
    json!({
        "projectId": "p1",
        "status": status,
        "totalFiles": 10,
        "indexedFiles": (progress / 10.0) as u64,
        "failedFiles": 0,
        "totalChunks": 12,
        "progress": progress,
        "message": format!("{} {}%", status, progress),
        "embedModel": "nomic-embed-text",
        "chunkSize": 500,
        "chunkOverlap": 50,
        "errorMessage": null,
        "startedAt": null,
        "completedAt": null
    })
}
