use std::path::Path;
use std::time::{Duration, Instant};

use serde_json::Value;
use wasmtime::{Config, Engine, Linker, Module, Store, StoreLimits, StoreLimitsBuilder};
use wasmtime_wasi::WasiCtxBuilder;
use wasmtime_wasi::preview1::WasiP1Ctx;

use wasmify_client::{ExecutionConfig, ExecutionResult};

use crate::error::RuntimeError;
use crate::values::{json_to_params, results_to_json};

/// How often the epoch ticker advances. Executions observe their wall-clock
/// cap with this granularity.
const EPOCH_TICK: Duration = Duration::from_millis(10);

/// Per-execution store state: WASI context plus resource limits.
struct ExecState {
    wasi: WasiP1Ctx,
    limits: StoreLimits,
}

/// Embedded wasmtime runtime for local module execution.
///
/// Owns a shared engine and two pre-wired linkers (with and without WASI
/// preview-1 host functions). `Send + Sync`; each call to
/// [`LocalRuntime::execute`] runs in its own fresh store, so concurrent
/// executions do not share state.
pub struct LocalRuntime {
    engine: Engine,
    wasi_linker: Linker<ExecState>,
    plain_linker: Linker<ExecState>,
}

impl LocalRuntime {
    pub fn new() -> anyhow::Result<Self> {
        let mut config = Config::new();
        config.async_support(true);
        config.epoch_interruption(true);

        let engine = Engine::new(&config)?;

        let mut wasi_linker: Linker<ExecState> = Linker::new(&engine);
        wasmtime_wasi::preview1::add_to_linker_async(&mut wasi_linker, |state: &mut ExecState| {
            &mut state.wasi
        })?;
        let plain_linker: Linker<ExecState> = Linker::new(&engine);

        // Epoch ticker: drives the periodic yields that let executions be
        // timed out. Stops once the engine is dropped.
        let weak = engine.weak();
        std::thread::spawn(move || {
            while let Some(engine) = weak.upgrade() {
                engine.increment_epoch();
                drop(engine);
                std::thread::sleep(EPOCH_TICK);
            }
        });

        tracing::debug!("LocalRuntime initialized (async + epoch interruption + WASI p1)");
        Ok(Self {
            engine,
            wasi_linker,
            plain_linker,
        })
    }

    /// Execute one exported function of a `.wasm` file.
    ///
    /// The module is compiled and instantiated fresh for this call. Linear
    /// memory cannot grow beyond `config.memory.max` megabytes and the call
    /// is cut off after `config.max_execution_time` milliseconds. A trap or
    /// timeout comes back as `success = false` with the message in `error`,
    /// matching the service's result envelope; a missing export or an
    /// argument mismatch is a hard error.
    pub async fn execute(
        &self,
        wasm_path: &Path,
        function_name: &str,
        args: &[Value],
        config: &ExecutionConfig,
    ) -> Result<ExecutionResult, RuntimeError> {
        let bytes = tokio::fs::read(wasm_path).await?;
        let module = Module::new(&self.engine, &bytes)
            .map_err(|e| RuntimeError::ModuleLoad(format!("{}: {e}", wasm_path.display())))?;

        let limits = StoreLimitsBuilder::new()
            .memory_size(config.memory.max as usize * 1024 * 1024)
            .build();
        let wasi = WasiCtxBuilder::new()
            .inherit_stdout()
            .inherit_stderr()
            .build_p1();

        let mut store = Store::new(&self.engine, ExecState { wasi, limits });
        store.limiter(|state| &mut state.limits);
        store.set_epoch_deadline(1);
        store.epoch_deadline_async_yield_and_update(1);

        let linker = if config.enable_wasi {
            &self.wasi_linker
        } else {
            &self.plain_linker
        };

        tracing::debug!(
            path = %wasm_path.display(),
            function_name,
            enable_wasi = config.enable_wasi,
            "Executing module locally"
        );

        let deadline = Duration::from_millis(config.max_execution_time);
        let started = Instant::now();
        let outcome = tokio::time::timeout(
            deadline,
            invoke(linker, &module, &mut store, function_name, args),
        )
        .await;
        let execution_time_ms = started.elapsed().as_secs_f64() * 1000.0;

        match outcome {
            Ok(Ok((result, memory_used))) => Ok(ExecutionResult {
                success: true,
                result,
                execution_time_ms,
                memory_used,
                error: None,
            }),
            Ok(Err(RuntimeError::ExecutionFailed(detail))) => {
                tracing::debug!(function_name, detail, "Guest trapped");
                Ok(ExecutionResult {
                    success: false,
                    result: Value::Null,
                    execution_time_ms,
                    memory_used: 0,
                    error: Some(detail),
                })
            }
            Ok(Err(hard)) => Err(hard),
            Err(_) => {
                tracing::warn!(
                    function_name,
                    limit_ms = config.max_execution_time,
                    "Execution timed out"
                );
                Ok(ExecutionResult {
                    success: false,
                    result: Value::Null,
                    execution_time_ms,
                    memory_used: 0,
                    error: Some(format!(
                        "execution exceeded {}ms",
                        config.max_execution_time
                    )),
                })
            }
        }
    }
}

/// Instantiate and call, returning the JSON result and the byte size of the
/// instance's exported `memory` (0 when the module exports none).
async fn invoke(
    linker: &Linker<ExecState>,
    module: &Module,
    store: &mut Store<ExecState>,
    function_name: &str,
    args: &[Value],
) -> Result<(Value, u64), RuntimeError> {
    let instance = linker
        .instantiate_async(&mut *store, module)
        .await
        .map_err(|e| RuntimeError::Instantiation(e.to_string()))?;

    let func = instance
        .get_func(&mut *store, function_name)
        .ok_or_else(|| RuntimeError::FunctionNotFound(function_name.to_string()))?;

    let ty = func.ty(&*store);
    let params = json_to_params(&ty, args)?;
    let mut results = vec![wasmtime::Val::I32(0); ty.results().len()];

    func.call_async(&mut *store, &params, &mut results)
        .await
        .map_err(|e| RuntimeError::ExecutionFailed(e.to_string()))?;

    let memory_used = instance
        .get_memory(&mut *store, "memory")
        .map(|m| m.data_size(&*store) as u64)
        .unwrap_or(0);

    Ok((results_to_json(&results)?, memory_used))
}
