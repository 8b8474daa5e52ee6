//! # Top-Level Error Model
//!
//! Three kinds of failure can leave `deobfuscate`: a malformed input
//! (`InputError`), a rewrite that produced code the parser no longer accepts
//! (`InternalError`), and a sandbox failure local to one decoder call site
//! (`DecodeError`, recovered in place — see `decoder::substitutor` — and
//! never surfaced here as a hard failure).

use thiserror::Error;

use crate::analyzer::AnalysisError;
use crate::generator::GeneratorError;
use crate::parser::ParseError;
use crate::transformer::TransformError;

/// Top-level failure from the `deobfuscate` entry point.
#[derive(Error, Debug)]
pub enum DeobfuscateError {
    #[error("input is not valid JavaScript:\n{frame}")]
    InputError { frame: String, errors: Vec<ParseError> },

    #[error("rewrite produced code the parser no longer accepts:\n{frame}\n\ndebug output:\n{debug_code}")]
    InternalError { frame: String, debug_code: String },

    #[error("semantic analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("transform pipeline failed: {0}")]
    Transform(#[from] TransformError),

    #[error("code generation failed: {0}")]
    Generation(#[from] GeneratorError),
}
