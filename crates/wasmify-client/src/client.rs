use std::path::Path;
use std::time::Duration;

use reqwest::multipart;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::types::{Deployment, ExecutionConfig, ExecutionResult, WasmModule};
use crate::wire;

/// Client for the Wasmify HTTP API.
///
/// Each method performs exactly one request and either returns a fully
/// parsed value or an error. Non-2xx statuses become
/// [`ClientError::Status`] immediately; nothing is retried.
pub struct WasmifyClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl WasmifyClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self { http, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_url.trim_end_matches('/'))
    }

    /// Send a request with the bearer credential attached, failing on any
    /// non-2xx status.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ClientError> {
        let request = match &self.config.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }
        Ok(response)
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Parse(format!("{e} in {body}")))
    }

    /// Upload a `.wasm` file as a new module.
    ///
    /// The file is sent as a multipart form (`file` part plus `name` /
    /// `version` fields); the returned module echoes `name`, `version`, and
    /// the local path, with the server-assigned key as its id.
    pub async fn upload_module(
        &self,
        file_path: impl AsRef<Path>,
        name: &str,
        version: &str,
    ) -> Result<WasmModule, ClientError> {
        let file_path = file_path.as_ref();
        let bytes = tokio::fs::read(file_path).await?;

        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "module.wasm".into());
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/wasm")?;
        let form = multipart::Form::new()
            .part("file", part)
            .text("name", name.to_string())
            .text("version", version.to_string());

        tracing::debug!(name, version, path = %file_path.display(), "Uploading module");

        let response = self
            .send(self.http.post(self.url("/upload")).multipart(form))
            .await?;
        let envelope: wire::UploadResponse = Self::parse(response).await?;

        let module =
            envelope
                .data
                .into_module(name, version, &file_path.display().to_string());
        tracing::info!(module_id = module.id, name, "Module uploaded");
        Ok(module)
    }

    /// Execute an exported function of an uploaded module on the service.
    ///
    /// `config` falls back to [`ExecutionConfig::default`] when `None`.
    pub async fn execute_module(
        &self,
        module_id: &str,
        function_name: &str,
        args: Vec<Value>,
        config: Option<ExecutionConfig>,
    ) -> Result<ExecutionResult, ClientError> {
        let config = config.unwrap_or_default();
        let body = wire::ExecuteRequest {
            module_id,
            function_name,
            args: &args,
            config: &config,
        };

        tracing::debug!(module_id, function_name, "Executing module remotely");

        let response = self
            .send(self.http.post(self.url("/wasm/execute")).json(&body))
            .await?;
        let envelope: wire::ExecuteResponse = Self::parse(response).await?;
        Ok(envelope.into_result())
    }

    /// List all modules, in the order the server returns them. An empty
    /// server list is an empty vec.
    pub async fn list_modules(&self) -> Result<Vec<WasmModule>, ClientError> {
        let response = self.send(self.http.get(self.url("/modules"))).await?;
        let envelope: wire::ModuleListResponse = Self::parse(response).await?;
        Ok(envelope
            .data
            .into_iter()
            .map(wire::ModuleData::into_module)
            .collect())
    }

    /// Fetch one module by id. A 404 becomes [`ClientError::ModuleNotFound`].
    pub async fn get_module(&self, module_id: &str) -> Result<WasmModule, ClientError> {
        let response = self
            .send(self.http.get(self.url(&format!("/modules/{module_id}"))))
            .await
            .map_err(|e| match e {
                ClientError::Status { status, .. } if status == reqwest::StatusCode::NOT_FOUND => {
                    ClientError::ModuleNotFound(module_id.to_string())
                }
                other => other,
            })?;
        let envelope: wire::ModuleResponse = Self::parse(response).await?;
        Ok(envelope.data.into_module())
    }

    /// Deploy a module to edge regions in the production environment.
    ///
    /// The service takes one region per deployment request: with no regions
    /// the deployment is `"global"`; with several, only the first is sent
    /// and the rest are ignored.
    pub async fn deploy_to_edge(
        &self,
        module_id: &str,
        regions: &[String],
    ) -> Result<Deployment, ClientError> {
        let region = regions.first().map(String::as_str).unwrap_or("global");
        if regions.len() > 1 {
            tracing::warn!(
                module_id,
                region,
                dropped = regions.len() - 1,
                "Deployment supports a single region; extra regions ignored"
            );
        }

        let body = wire::DeployRequest {
            module_id,
            environment: "production",
            region,
            config: wire::DeployResources::default(),
        };

        tracing::debug!(module_id, region, "Deploying module to edge");

        let response = self
            .send(self.http.post(self.url("/deployments")).json(&body))
            .await?;
        let envelope: wire::DeployResponse = Self::parse(response).await?;

        let deployment = envelope.data.into_deployment();
        tracing::info!(module_id, deployment_id = deployment.id, "Module deployed");
        Ok(deployment)
    }
}

/// Upload a module and deploy it to the edge in one go, returning the
/// deployment id. Takes the client explicitly so callers control connection
/// setup and credentials.
pub async fn deploy_to_cloud(
    client: &WasmifyClient,
    wasm_file: impl AsRef<Path>,
    name: &str,
    regions: &[String],
) -> Result<String, ClientError> {
    let module = client.upload_module(wasm_file, name, "1.0.0").await?;
    let deployment = client.deploy_to_edge(&module.id, regions).await?;
    Ok(deployment.id)
}
