//! Request and response schemas for each endpoint. Required fields are
//! required; everything else the server sends is folded back into the
//! metadata maps callers see.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{Deployment, ExecutionConfig, ExecutionResult, WasmModule};

#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    pub data: UploadData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadData {
    pub key: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UploadData {
    pub fn into_module(self, name: &str, version: &str, file_path: &str) -> WasmModule {
        let mut metadata = self.extra;
        metadata.insert("key".into(), Value::String(self.key.clone()));
        WasmModule {
            id: self.key,
            name: name.to_string(),
            version: version.to_string(),
            file_path: file_path.to_string(),
            metadata,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModuleResponse {
    pub data: ModuleData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModuleListResponse {
    pub data: Vec<ModuleData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModuleData {
    pub id: String,
    pub name: String,
    pub version: String,
    #[serde(rename = "wasmFile")]
    pub wasm_file: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ModuleData {
    pub fn into_module(self) -> WasmModule {
        let mut metadata = self.extra;
        metadata.insert("id".into(), Value::String(self.id.clone()));
        metadata.insert("name".into(), Value::String(self.name.clone()));
        metadata.insert("version".into(), Value::String(self.version.clone()));
        metadata.insert("wasmFile".into(), Value::String(self.wasm_file.clone()));
        WasmModule {
            id: self.id,
            name: self.name,
            version: self.version,
            file_path: self.wasm_file,
            metadata,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExecuteRequest<'a> {
    pub module_id: &'a str,
    pub function_name: &'a str,
    pub args: &'a [Value],
    pub config: &'a ExecutionConfig,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExecuteResponse {
    pub success: bool,
    pub data: ExecuteData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExecuteData {
    pub result: ExecuteOutcome,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExecuteOutcome {
    #[serde(default)]
    pub result: Value,
    pub execution_time: f64,
    pub memory_used: u64,
    #[serde(default)]
    pub error: Option<String>,
}

impl ExecuteResponse {
    pub fn into_result(self) -> ExecutionResult {
        ExecutionResult {
            success: self.success,
            result: self.data.result.result,
            execution_time_ms: self.data.result.execution_time,
            memory_used: self.data.result.memory_used,
            error: self.data.result.error,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeployRequest<'a> {
    pub module_id: &'a str,
    pub environment: &'a str,
    pub region: &'a str,
    pub config: DeployResources<'a>,
}

/// Resource block the service expects on every deployment request.
#[derive(Debug, Serialize)]
pub(crate) struct DeployResources<'a> {
    pub memory: &'a str,
    pub cpu: &'a str,
    pub replicas: u32,
    pub edge: bool,
}

impl Default for DeployResources<'_> {
    fn default() -> Self {
        Self {
            memory: "128MB",
            cpu: "100m",
            replicas: 3,
            edge: true,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeployResponse {
    pub data: DeployData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeployData {
    pub id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DeployData {
    pub fn into_deployment(self) -> Deployment {
        Deployment {
            id: self.id,
            extra: self.extra,
        }
    }
}
