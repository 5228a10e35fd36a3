use serde::Serialize;
use serde_json::{Map, Value};

/// A stored WebAssembly module: the server-assigned identity plus whatever
/// metadata the server reported. A `WasmModule` is a view over server state;
/// it has no lifecycle of its own.
#[derive(Debug, Clone, Serialize)]
pub struct WasmModule {
    pub id: String,
    pub name: String,
    pub version: String,
    pub file_path: String,
    /// Every field the server returned for this module, including the ones
    /// mapped into the typed fields above.
    pub metadata: Map<String, Value>,
}

/// Outcome of invoking one exported function of a module, with timing and
/// memory telemetry.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    pub success: bool,
    pub result: Value,
    pub execution_time_ms: f64,
    pub memory_used: u64,
    pub error: Option<String>,
}

/// Execution parameters sent with every execute request, and honored by the
/// embedded runtime for local runs.
///
/// Defaults: 64–512 MB of linear memory, a 30 second cap, WASI enabled.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionConfig {
    pub memory: MemoryBounds,
    /// Wall-clock cap in milliseconds.
    pub max_execution_time: u64,
    pub enable_wasi: bool,
}

/// Linear memory bounds in megabytes.
#[derive(Debug, Clone, Serialize)]
pub struct MemoryBounds {
    pub min: u32,
    pub max: u32,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            memory: MemoryBounds { min: 64, max: 512 },
            max_execution_time: 30_000,
            enable_wasi: true,
        }
    }
}

/// Information about an edge deployment. The server decides the shape beyond
/// `id`; everything else lands in `extra`.
#[derive(Debug, Clone, Serialize)]
pub struct Deployment {
    pub id: String,
    pub extra: Map<String, Value>,
}
