//! # Code Generator Module
//!
//! Converts the rewritten AST back into JavaScript source text. Deobfuscated
//! output is meant to be read by a person, not re-minified, so the defaults
//! favor readability over byte count and there is no source-map machinery:
//! there is no "original" compact build to map back to, only the obfuscated
//! input the pipeline just took apart.
//!
//! ## Components
//!
//! - **Printer**: AST traversal and token emission, including the
//!   `TOLOOK`/`decrypt failed: ...` markers transform and decoder passes
//!   attach to statements they couldn't fully resolve.
//! - **Configuration**: output formatting and comment-preservation options.

use crate::parser::ast_types::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod printer;

#[cfg(test)]
mod tests;

/// Generator configuration for output formatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// ECMAScript target version
    pub ecma: EcmaScriptVersion,
    /// Output format style
    pub format: OutputFormat,
    /// Semicolon insertion strategy
    pub semicolon: SemicolonStrategy,
    /// Quote character preference
    pub quote: QuoteStrategy,
    /// Comment preservation level; controls whether `TOLOOK`/`decrypt failed`
    /// markers left by the transform pipeline are printed back out.
    pub preserve_comments: CommentPreservation,
    /// Output newline style
    pub newline: NewlineStyle,
    /// Maximum line length for wrapping
    pub max_line_len: Option<usize>,
    /// Character set escape mode
    pub charset_escapes: CharsetEscapes,
}

/// ECMAScript version target
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum EcmaScriptVersion {
    ES5,
    ES2015,
    Latest,
}

/// Output format style
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    /// One statement per line, no indentation
    Compact,
    /// One statement per line, block indentation
    Readable,
    /// Readable plus blank-line separation between top-level statements
    Pretty,
}

/// Semicolon insertion strategy
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum SemicolonStrategy {
    /// Automatic insertion based on ASI rules
    Auto,
    /// Always insert semicolons
    Always,
    /// Remove unnecessary semicolons
    Remove,
}

/// Quote character strategy
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum QuoteStrategy {
    /// Automatically choose based on content
    Auto,
    /// Prefer single quotes
    Single,
    /// Prefer double quotes
    Double,
}

/// Comment preservation level
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum CommentPreservation {
    /// Drop all leading comments, including decoder/marker annotations
    None,
    /// Preserve license-style comments only (unused by the pipeline today,
    /// kept for parity with inputs that already carry a license header)
    License,
    /// Preserve everything, including `TOLOOK`/`decrypt failed` markers
    All,
}

/// Newline style for output
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum NewlineStyle {
    /// Unix-style LF
    Lf,
    /// Windows-style CRLF
    Crlf,
}

/// Character set escape mode
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum CharsetEscapes {
    /// Minimal escaping
    Minimal,
    /// ASCII-only output with escapes
    AsciiOnly,
}

/// Generator result containing generated code.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    /// Generated JavaScript code
    pub code: String,
    /// Generation diagnostics and metrics
    pub diagnostics: GeneratorDiagnostics,
}

/// Generation diagnostics and metrics
#[derive(Debug, Clone)]
pub struct GeneratorDiagnostics {
    /// Original code size in bytes
    pub original_size: usize,
    /// Generated code size in bytes
    pub generated_size: usize,
    /// Generation time in milliseconds
    pub generation_time_ms: f64,
    /// Number of warnings generated
    pub warning_count: usize,
    /// Specific warnings
    pub warnings: Vec<String>,
}

/// Generator error types
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Malformed AST: {message} at node type {node_type}")]
    MalformedAst { message: String, node_type: String },
    #[error("Unsupported node type for target {target}: {node_type}")]
    UnsupportedNode { target: String, node_type: String },
    #[error("IO error during generation: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Invalid AST structure: {field} is required but missing in {node_type}")]
    MissingRequiredField { field: String, node_type: String },
    #[error("String processing error: {message} in string: {content}")]
    StringProcessingError { message: String, content: String },
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

/// Result type alias for generator operations
pub type GeneratorResult<T> = Result<T, GeneratorError>;

/// Main generator implementation
pub struct Generator {
    config: GeneratorConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            ecma: EcmaScriptVersion::Latest,
            format: OutputFormat::Pretty,
            semicolon: SemicolonStrategy::Auto,
            quote: QuoteStrategy::Auto,
            preserve_comments: CommentPreservation::All,
            newline: NewlineStyle::Lf,
            max_line_len: None,
            charset_escapes: CharsetEscapes::Minimal,
        }
    }
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Generate JavaScript source text from a deobfuscated AST.
    pub fn generate(&self, program: &Program, original_source: Option<&str>) -> GeneratorResult<GenerationResult> {
        let start_time = std::time::Instant::now();

        let mut printer = printer::Printer::new(&self.config);
        let code = printer.print_program(program)?;

        let generation_time = start_time.elapsed();
        let original_size = original_source.map(|s| s.len()).unwrap_or(0);
        let generated_size = code.len();

        let diagnostics = GeneratorDiagnostics {
            original_size,
            generated_size,
            generation_time_ms: generation_time.as_secs_f64() * 1000.0,
            warning_count: printer.get_warnings().len(),
            warnings: printer.get_warnings(),
        };

        Ok(GenerationResult { code, diagnostics })
    }
}

impl GeneratorConfig {
    /// Build a configuration from CLI flag strings.
    pub fn from_cli_args(ecma: &str, format: &str, semicolon: &str, quote: &str, preserve_comments: &str) -> Self {
        let mut config = Self::default();

        config.ecma = match ecma {
            "es5" => EcmaScriptVersion::ES5,
            "es2015" | "2015" => EcmaScriptVersion::ES2015,
            _ => EcmaScriptVersion::Latest,
        };

        config.format = match format {
            "compact" => OutputFormat::Compact,
            "readable" => OutputFormat::Readable,
            _ => OutputFormat::Pretty,
        };

        config.semicolon = match semicolon {
            "always" => SemicolonStrategy::Always,
            "remove" => SemicolonStrategy::Remove,
            _ => SemicolonStrategy::Auto,
        };

        config.quote = match quote {
            "single" => QuoteStrategy::Single,
            "double" => QuoteStrategy::Double,
            _ => QuoteStrategy::Auto,
        };

        config.preserve_comments = match preserve_comments {
            "none" => CommentPreservation::None,
            "license" => CommentPreservation::License,
            _ => CommentPreservation::All,
        };

        config
    }
}
