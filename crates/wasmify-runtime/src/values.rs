//! Conversion between JSON arguments and core wasm values.
//!
//! Only numeric core types travel across the boundary: i32, i64, f32, f64.
//! Reference types and v128 are rejected with a typed error.

use serde_json::Value;
use wasmtime::{FuncType, Val, ValType};

use crate::error::RuntimeError;

/// Convert JSON args into the parameter values `ty` expects, checking arity
/// and numeric representability.
pub(crate) fn json_to_params(ty: &FuncType, args: &[Value]) -> Result<Vec<Val>, RuntimeError> {
    let params: Vec<ValType> = ty.params().collect();
    if params.len() != args.len() {
        return Err(RuntimeError::InvalidArguments(format!(
            "function takes {} argument(s), {} given",
            params.len(),
            args.len()
        )));
    }

    params
        .iter()
        .zip(args)
        .enumerate()
        .map(|(i, (param_ty, arg))| {
            json_to_val(param_ty, arg).map_err(|detail| {
                RuntimeError::InvalidArguments(format!("argument {i}: {detail}"))
            })
        })
        .collect()
}

fn json_to_val(ty: &ValType, value: &Value) -> Result<Val, String> {
    match ty {
        ValType::I32 => value
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .map(Val::I32)
            .ok_or_else(|| format!("expected i32, got {value}")),
        ValType::I64 => value
            .as_i64()
            .map(Val::I64)
            .ok_or_else(|| format!("expected i64, got {value}")),
        ValType::F32 => value
            .as_f64()
            .map(|v| Val::F32((v as f32).to_bits()))
            .ok_or_else(|| format!("expected f32, got {value}")),
        ValType::F64 => value
            .as_f64()
            .map(|v| Val::F64(v.to_bits()))
            .ok_or_else(|| format!("expected f64, got {value}")),
        other => Err(format!("unsupported parameter type {other}")),
    }
}

/// Fold result values back into JSON: no results is null, one result is the
/// value itself, several become an array.
pub(crate) fn results_to_json(results: &[Val]) -> Result<Value, RuntimeError> {
    let mut out = Vec::with_capacity(results.len());
    for val in results {
        out.push(val_to_json(val)?);
    }
    Ok(match out.len() {
        0 => Value::Null,
        1 => out.remove(0),
        _ => Value::Array(out),
    })
}

fn val_to_json(val: &Val) -> Result<Value, RuntimeError> {
    match val {
        Val::I32(v) => Ok(Value::from(*v)),
        Val::I64(v) => Ok(Value::from(*v)),
        // Non-finite floats have no JSON number form and come back as null.
        Val::F32(bits) => Ok(Value::from(f32::from_bits(*bits) as f64)),
        Val::F64(bits) => Ok(Value::from(f64::from_bits(*bits))),
        other => Err(RuntimeError::ExecutionFailed(format!(
            "unsupported result type {other:?}"
        ))),
    }
}
