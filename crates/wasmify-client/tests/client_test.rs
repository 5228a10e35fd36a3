//! Client tests against a mock Wasmify server. Every test stands up its own
//! `mockito` server and points a fresh client at it.

use mockito::Matcher;
use serde_json::json;
use wasmify_client::{ClientConfig, ClientError, WasmifyClient, deploy_to_cloud};

fn client_for(server: &mockito::Server) -> WasmifyClient {
    WasmifyClient::new(ClientConfig::new(format!("{}/api", server.url())))
        .expect("client construction should not fail")
}

fn wasm_fixture() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("adder.wasm");
    std::fs::write(&path, b"\0asm\x01\0\0\0").unwrap();
    (dir, path)
}

#[tokio::test]
async fn upload_echoes_name_version_and_path() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/upload")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "success": true,
                "data": { "key": "mod-42", "etag": "abc123", "size": 8 }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let (_dir, path) = wasm_fixture();
    let client = client_for(&server);
    let module = client.upload_module(&path, "adder", "2.1.0").await.unwrap();

    assert_eq!(module.id, "mod-42");
    assert_eq!(module.name, "adder");
    assert_eq!(module.version, "2.1.0");
    assert_eq!(module.file_path, path.display().to_string());
    assert_eq!(module.metadata["etag"], "abc123");
    mock.assert_async().await;
}

#[tokio::test]
async fn bearer_token_is_sent_when_configured() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/modules")
        .match_header("authorization", "Bearer wfy-secret")
        .with_status(200)
        .with_body(json!({ "data": [] }).to_string())
        .create_async()
        .await;

    let config = ClientConfig::new(format!("{}/api", server.url())).with_api_key("wfy-secret");
    let client = WasmifyClient::new(config).unwrap();
    client.list_modules().await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn execute_sends_default_config_block() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/wasm/execute")
        .match_body(Matcher::PartialJson(json!({
            "moduleId": "mod-42",
            "functionName": "add",
            "args": [2, 3],
            "config": {
                "memory": { "min": 64, "max": 512 },
                "maxExecutionTime": 30000,
                "enableWasi": true,
            }
        })))
        .with_status(200)
        .with_body(
            json!({
                "success": true,
                "data": { "result": {
                    "result": 5,
                    "executionTime": 1.25,
                    "memoryUsed": 2048
                }}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let result = client
        .execute_module("mod-42", "add", vec![2.into(), 3.into()], None)
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(result.result, json!(5));
    assert_eq!(result.execution_time_ms, 1.25);
    assert_eq!(result.memory_used, 2048);
    assert_eq!(result.error, None);
    mock.assert_async().await;
}

#[tokio::test]
async fn execute_surfaces_non_2xx_as_status_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/wasm/execute")
        .with_status(500)
        .with_body("engine on fire")
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .execute_module("mod-42", "add", vec![], None)
        .await
        .unwrap_err();

    match err {
        ClientError::Status { status, body } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "engine on fire");
        }
        other => panic!("expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn execute_rejects_response_missing_required_fields() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/wasm/execute")
        .with_status(200)
        .with_body(json!({ "success": true, "data": {} }).to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .execute_module("mod-42", "add", vec![], None)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Parse(_)), "got {err:?}");
}

#[tokio::test]
async fn list_modules_empty_server_list_is_empty_vec() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/modules")
        .with_status(200)
        .with_body(json!({ "data": [] }).to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    let modules = client.list_modules().await.unwrap();
    assert!(modules.is_empty());
}

#[tokio::test]
async fn list_modules_preserves_server_order() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/modules")
        .with_status(200)
        .with_body(
            json!({ "data": [
                { "id": "b", "name": "beta", "version": "0.2.0", "wasmFile": "/srv/b.wasm" },
                { "id": "a", "name": "alpha", "version": "0.1.0", "wasmFile": "/srv/a.wasm",
                  "language": "rust" },
            ]})
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let modules = client.list_modules().await.unwrap();
    assert_eq!(modules.len(), 2);
    assert_eq!(modules[0].id, "b");
    assert_eq!(modules[1].id, "a");
    assert_eq!(modules[1].file_path, "/srv/a.wasm");
    assert_eq!(modules[1].metadata["language"], "rust");
}

#[tokio::test]
async fn get_module_maps_404_to_not_found() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/modules/ghost")
        .with_status(404)
        .with_body(json!({ "error": "no such module" }).to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client.get_module("ghost").await.unwrap_err();
    match err {
        ClientError::ModuleNotFound(id) => assert_eq!(id, "ghost"),
        other => panic!("expected ModuleNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn deploy_sends_only_the_first_region() {
    // Regression lock on the single-region wire behavior: with several
    // regions requested, only the first goes out.
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/deployments")
        .match_body(Matcher::Json(json!({
            "moduleId": "mod-42",
            "environment": "production",
            "region": "us-east",
            "config": { "memory": "128MB", "cpu": "100m", "replicas": 3, "edge": true },
        })))
        .with_status(200)
        .with_body(json!({ "data": { "id": "dep-7", "status": "pending" } }).to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    let deployment = client
        .deploy_to_edge("mod-42", &["us-east".into(), "eu-west".into()])
        .await
        .unwrap();

    assert_eq!(deployment.id, "dep-7");
    assert_eq!(deployment.extra["status"], "pending");
    mock.assert_async().await;
}

#[tokio::test]
async fn deploy_without_regions_targets_global() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/deployments")
        .match_body(Matcher::PartialJson(json!({ "region": "global" })))
        .with_status(200)
        .with_body(json!({ "data": { "id": "dep-8" } }).to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    let deployment = client.deploy_to_edge("mod-42", &[]).await.unwrap();
    assert_eq!(deployment.id, "dep-8");
    mock.assert_async().await;
}

#[tokio::test]
async fn deploy_to_cloud_uploads_then_deploys() {
    let mut server = mockito::Server::new_async().await;
    let upload = server
        .mock("POST", "/api/upload")
        .with_status(200)
        .with_body(json!({ "data": { "key": "mod-99" } }).to_string())
        .create_async()
        .await;
    let deploy = server
        .mock("POST", "/api/deployments")
        .match_body(Matcher::PartialJson(json!({ "moduleId": "mod-99" })))
        .with_status(200)
        .with_body(json!({ "data": { "id": "dep-99" } }).to_string())
        .create_async()
        .await;

    let (_dir, path) = wasm_fixture();
    let client = client_for(&server);
    let deployment_id = deploy_to_cloud(&client, &path, "adder", &["us-east".into()])
        .await
        .unwrap();

    assert_eq!(deployment_id, "dep-99");
    upload.assert_async().await;
    deploy.assert_async().await;
}

#[tokio::test]
async fn unreadable_upload_file_is_an_io_error() {
    let server = mockito::Server::new_async().await;
    let client = client_for(&server);
    let err = client
        .upload_module("/nonexistent/path.wasm", "ghost", "1.0.0")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Io(_)), "got {err:?}");
}
