//! # Sandboxed JS Evaluator
//!
//! The decoder subsystem needs to run obfuscator-authored setup code (the
//! string table, its decoder function, and any rotator) to recover the
//! literal strings it produces. That code is untrusted: it came from the
//! input file, not from us. [`Sandbox`] is the capability boundary around
//! running it; [`BoaSandbox`] is the shipped implementation, built on an
//! embedded interpreter (`boa_engine`) rather than the host process's own
//! JS engine, with no filesystem/network bindings exposed to the evaluated
//! code at all.
//!
//! Evaluation runs on a dedicated worker thread and is joined with a
//! timeout over an `mpsc` channel, so code that spins forever cannot hang
//! the calling thread; past the timeout the worker is abandoned (not
//! killed — there is no safe way to preempt a running interpreter) and the
//! call reports [`SandboxError::Timeout`].

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use boa_engine::{Context, JsValue, Source};
use thiserror::Error;

/// A small JSON-ish value type, deliberately distinct from `boa_engine::JsValue`
/// so the `Sandbox` trait doesn't leak a specific interpreter's type into
/// the rest of the crate.
#[derive(Debug, Clone, PartialEq)]
pub enum SandboxValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
    Array(Vec<SandboxValue>),
    Object(Vec<(String, SandboxValue)>),
}

impl SandboxValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SandboxValue::String(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("sandboxed evaluation timed out after {0:?}")]
    Timeout(Duration),
    #[error("sandboxed evaluation threw: {0}")]
    EvaluationError(String),
    #[error("sandboxed worker thread panicked")]
    WorkerPanicked,
}

/// Isolated JS evaluator with a bounded execution time and no host access.
pub trait Sandbox: Send + Sync {
    fn evaluate(&self, code: &str) -> Result<SandboxValue, SandboxError>;
}

/// `boa_engine`-backed implementation. Each call gets a fresh `Context`, so
/// no state leaks between decoder invocations across different call sites.
pub struct BoaSandbox {
    timeout: Duration,
}

impl BoaSandbox {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for BoaSandbox {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

impl Sandbox for BoaSandbox {
    fn evaluate(&self, code: &str) -> Result<SandboxValue, SandboxError> {
        let code = code.to_string();
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            let mut context = Context::default();
            let outcome = context
                .eval(Source::from_bytes(code.as_bytes()))
                .map_err(|e| e.to_string())
                .and_then(|value| to_sandbox_value(&value, &mut context));
            let _ = tx.send(outcome);
        });

        match rx.recv_timeout(self.timeout) {
            Ok(Ok(value)) => {
                let _ = handle.join();
                Ok(value)
            }
            Ok(Err(message)) => {
                let _ = handle.join();
                Err(SandboxError::EvaluationError(message))
            }
            Err(mpsc::RecvTimeoutError::Timeout) => Err(SandboxError::Timeout(self.timeout)),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(SandboxError::WorkerPanicked),
        }
    }
}

fn to_sandbox_value(value: &JsValue, context: &mut Context) -> Result<SandboxValue, String> {
    if value.is_string() {
        let s = value.to_string(context).map_err(|e| e.to_string())?;
        return Ok(SandboxValue::String(s.to_std_string_escaped()));
    }
    if let Some(n) = value.as_number() {
        return Ok(SandboxValue::Number(n));
    }
    if let Some(b) = value.as_boolean() {
        return Ok(SandboxValue::Boolean(b));
    }
    if value.is_null_or_undefined() {
        return Ok(SandboxValue::Null);
    }
    if let Some(object) = value.as_object() {
        if object.is_array() {
            let length = object
                .get(boa_engine::js_string!("length"), context)
                .map_err(|e| e.to_string())?
                .to_number(context)
                .map_err(|e| e.to_string())? as usize;
            let mut elements = Vec::with_capacity(length);
            for i in 0..length {
                let element = object.get(i as u32, context).map_err(|e| e.to_string())?;
                elements.push(to_sandbox_value(&element, context)?);
            }
            return Ok(SandboxValue::Array(elements));
        }
        let keys = object.own_property_keys(context).map_err(|e| e.to_string())?;
        let mut entries = Vec::new();
        for key in keys {
            let key_str = match &key {
                boa_engine::property::PropertyKey::String(s) => s.to_std_string_escaped(),
                boa_engine::property::PropertyKey::Index(i) => i.get().to_string(),
                boa_engine::property::PropertyKey::Symbol(_) => continue,
            };
            let property_value = object.get(key.clone(), context).map_err(|e| e.to_string())?;
            entries.push((key_str, to_sandbox_value(&property_value, context)?));
        }
        return Ok(SandboxValue::Object(entries));
    }
    Err("unsupported sandbox return value".to_string())
}
