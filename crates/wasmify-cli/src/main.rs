use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use wasmify_client::{ClientConfig, ExecutionConfig, WasmifyClient, deploy_to_cloud};
use wasmify_runtime::{LocalRuntime, run_wasm};

#[derive(Parser)]
#[command(name = "wasmify", about = "Run WebAssembly modules anywhere — Wasmify CLI")]
struct Cli {
    /// Wasmify API endpoint
    #[arg(long, env = "WASMIFY_API_URL", default_value = "http://localhost:3000/api")]
    api_url: String,

    /// Bearer token for authenticated requests
    #[arg(long, env = "WASMIFY_API_KEY")]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload a .wasm file as a new module
    Upload {
        file: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "1.0.0")]
        version: String,
    },
    /// Execute a function of an uploaded module on the service
    Execute {
        module_id: String,
        function: String,
        /// Arguments as JSON values (bare words are taken as strings)
        #[arg(value_parser = parse_json_arg)]
        args: Vec<serde_json::Value>,
        /// Override the server-side execution cap in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// Run a local .wasm file with the embedded runtime
    Run {
        file: PathBuf,
        function: String,
        #[arg(value_parser = parse_json_arg)]
        args: Vec<serde_json::Value>,
    },
    /// List uploaded modules
    List,
    /// Show one module
    Info { module_id: String },
    /// Deploy a module to edge regions
    Deploy {
        module_id: String,
        /// Target region (may repeat; the service currently honors the first)
        #[arg(long)]
        region: Vec<String>,
    },
    /// Upload a .wasm file and deploy it to the edge in one step
    Ship {
        file: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long)]
        region: Vec<String>,
    },
}

fn parse_json_arg(raw: &str) -> Result<serde_json::Value, String> {
    Ok(serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string())))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the JSON results.
    fmt()
        .with_env_filter(EnvFilter::from_env("WASMIFY_LOG"))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(api_url = cli.api_url, "wasmify starting");

    let mut config = ClientConfig::new(cli.api_url);
    config.api_key = cli.api_key;
    let client = WasmifyClient::new(config)?;

    match cli.command {
        Command::Upload { file, name, version } => {
            let module = client.upload_module(&file, &name, &version).await?;
            print_json(&module)?;
        }
        Command::Execute { module_id, function, args, timeout_ms } => {
            let mut exec_config = ExecutionConfig::default();
            if let Some(ms) = timeout_ms {
                exec_config.max_execution_time = ms;
            }
            let result = client
                .execute_module(&module_id, &function, args, Some(exec_config))
                .await?;
            print_json(&result)?;
        }
        Command::Run { file, function, args } => {
            let runtime = LocalRuntime::new()?;
            let result = run_wasm(&runtime, &file, &function, &args).await?;
            print_json(&result)?;
        }
        Command::List => {
            let modules = client.list_modules().await?;
            print_json(&modules)?;
        }
        Command::Info { module_id } => {
            let module = client.get_module(&module_id).await?;
            print_json(&module)?;
        }
        Command::Deploy { module_id, region } => {
            let deployment = client.deploy_to_edge(&module_id, &region).await?;
            print_json(&deployment)?;
        }
        Command::Ship { file, name, region } => {
            let deployment_id = deploy_to_cloud(&client, &file, &name, &region).await?;
            println!("{deployment_id}");
        }
    }

    Ok(())
}
