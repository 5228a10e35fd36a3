//! Typed HTTP client for the Wasmify service.
//!
//! Wasmify stores, executes, and deploys WebAssembly modules behind an HTTP
//! API. [`WasmifyClient`] wraps that API in typed methods: every call is a
//! single request/response round trip with strict response parsing — a
//! response missing a required field is a [`ClientError::Parse`], never a
//! panic or a silent default.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use wasmify_client::{ClientConfig, ExecutionConfig, WasmifyClient};
//!
//! # async fn run() -> Result<(), wasmify_client::ClientError> {
//! let config = ClientConfig::default().with_api_key("wfy-secret");
//! let client = WasmifyClient::new(config)?;
//!
//! let module = client.upload_module("build/image.wasm", "image", "1.0.0").await?;
//!
//! // Execution parameters default to 64–512 MB of memory, a 30s cap, and WASI.
//! let result = client
//!     .execute_module(&module.id, "resize", vec![800.into(), 600.into()], None)
//!     .await?;
//! println!("{} in {:.1}ms", result.result, result.execution_time_ms);
//!
//! let deployment = client.deploy_to_edge(&module.id, &["us-east".into()]).await?;
//! println!("deployed as {}", deployment.id);
//! # Ok(())
//! # }
//! ```
//!
//! # Concurrency
//!
//! `WasmifyClient` is `Send + Sync` and cheap to share behind an `Arc`. The
//! underlying `reqwest::Client` reuses connections across sequential calls;
//! no other caching, pooling, or retrying happens client-side.

pub mod client;
pub mod config;
pub mod error;
pub mod types;

mod wire;

pub use client::{WasmifyClient, deploy_to_cloud};
pub use config::ClientConfig;
pub use error::ClientError;
pub use types::{Deployment, ExecutionConfig, ExecutionResult, MemoryBounds, WasmModule};
