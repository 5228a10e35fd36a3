//! Embedded WebAssembly execution for Wasmify.
//!
//! Runs `.wasm` core modules in-process with wasmtime, honoring the same
//! [`ExecutionConfig`] the remote service accepts: linear memory capped at
//! `memory.max` megabytes, wall-clock time capped at `max_execution_time`
//! milliseconds, WASI preview-1 imports available when `enable_wasi` is set.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use wasmify_runtime::{LocalRuntime, run_wasm};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let runtime = LocalRuntime::new()?;
//! let sum = run_wasm(&runtime, Path::new("adder.wasm"), "add", &[2.into(), 3.into()]).await?;
//! assert_eq!(sum, 5);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod local;

mod values;

use std::path::Path;

use serde_json::Value;
use wasmify_client::ExecutionConfig;

pub use error::RuntimeError;
pub use local::LocalRuntime;

/// Execute one exported function of a local `.wasm` file with default
/// execution parameters and return its result.
///
/// Fails with [`RuntimeError::ExecutionFailed`] carrying the underlying
/// error string when the execution reports failure (for example a trap or
/// a timeout).
pub async fn run_wasm(
    runtime: &LocalRuntime,
    wasm_file: &Path,
    function_name: &str,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let result = runtime
        .execute(wasm_file, function_name, args, &ExecutionConfig::default())
        .await?;

    if !result.success {
        let detail = result.error.unwrap_or_else(|| "unknown error".into());
        return Err(RuntimeError::ExecutionFailed(detail));
    }
    Ok(result.result)
}
