//! # Deobfuscation Engine
//!
//! Parses a JavaScript source file, repeatedly rewrites its AST through the
//! [`transformer`] pipeline until the tree stops changing, optionally runs
//! the [`decoder`] subsystem against a supplied sandbox, and prints the
//! result with [`generator`]. [`analyzer`] builds the scope/symbol
//! information individual passes may consult; [`traversal`] and [`matcher`]
//! are the shared plumbing every pass is built on.

pub mod analyzer;
pub mod decoder;
pub mod error;
pub mod generator;
pub mod matcher;
pub mod parser;
pub mod traversal;
pub mod transformer;

use std::time::Duration;

use analyzer::{analyze_ast, AnalyzerConfig};
use decoder::{BoaSandbox, DecoderConfig, Sandbox};
use error::DeobfuscateError;
use generator::{Generator, GeneratorConfig};
use parser::{ParserConfig, SourceTypeConfig};
use transformer::TransformerConfig;

/// Options accepted by [`deobfuscate`]; every field has a sensible default
/// via [`DeobfuscateOptions::default`].
pub struct DeobfuscateOptions {
    /// Forced decoder function names, bypassing automatic location.
    pub decoders: Vec<String>,
    /// Sandbox used for string-array decoding. `None` skips the decoder
    /// subsystem entirely (the rewrite pipeline still runs).
    pub sandbox: Option<Box<dyn Sandbox>>,
    pub call_count_threshold: u32,
    pub array_size_threshold: usize,
    pub iteration_cap: u32,
    pub mark_keywords: Vec<String>,
    pub verbose: bool,
}

impl Default for DeobfuscateOptions {
    fn default() -> Self {
        Self {
            decoders: Vec::new(),
            sandbox: Some(Box::new(BoaSandbox::new(Duration::from_secs(10)))),
            call_count_threshold: 100,
            array_size_threshold: 100,
            iteration_cap: 100,
            mark_keywords: Vec::new(),
            verbose: false,
        }
    }
}

/// Result of a successful [`deobfuscate`] call.
pub struct DeobfuscateOutput {
    pub code: String,
    pub changes: u32,
}

/// Parses `code`, runs the decoder subsystem (if a sandbox is configured),
/// rewrites the AST to a fixpoint, and prints the result.
pub fn deobfuscate(code: &str, filename: &str, options: DeobfuscateOptions) -> Result<DeobfuscateOutput, DeobfuscateError> {
    let parser_config = ParserConfig { source_type: SourceTypeConfig::Module, ..ParserConfig::default() };
    let parse_result = parser::parse_js(code, filename, &parser_config);

    if !parse_result.errors.is_empty() {
        let frame = render_parse_error_frame(code, filename, &parse_result.errors);
        return Err(DeobfuscateError::InputError { frame, errors: parse_result.errors });
    }
    let mut program = parse_result.ast.expect("parse produced no errors but no AST");

    let analyzer_config = AnalyzerConfig { verbose: options.verbose, ..AnalyzerConfig::default() };
    if let Ok(analysis) = analyze_ast(&program, &analyzer_config) {
        if options.verbose {
            eprintln!(
                "analyzer: {} scope(s), {} symbol(s), {} unsafe scope(s)",
                analysis.scope_tree.scopes.len(),
                analysis.symbol_table.symbols.len(),
                analysis.semantic_flags.unsafe_scopes.len()
            );
        }
    }

    let mut decode_stats = None;
    if let Some(sandbox) = options.sandbox.as_deref() {
        let decoder_config = DecoderConfig {
            call_count_threshold: options.call_count_threshold,
            array_size_threshold: options.array_size_threshold,
            forced_decoders: options.decoders.clone(),
        };
        decode_stats = decoder::decode_strings(&mut program, &decoder_config, sandbox);
        if options.verbose {
            if let Some(stats) = &decode_stats {
                eprintln!("decoder: {stats}");
            }
        }
    }

    let transformer_config = TransformerConfig {
        iteration_cap: options.iteration_cap,
        mark_keywords: options.mark_keywords,
        verbose: options.verbose,
    };
    let transform_result = transformer::transform_ast(program, &transformer_config)?;

    let generated = Generator::new(GeneratorConfig::default())
        .generate(&transform_result.transformed_ast, Some(code))
        .map_err(DeobfuscateError::Generation)?;

    if let Err(message) = reparse_sanity_check(&generated.code, filename) {
        return Err(DeobfuscateError::InternalError { frame: message, debug_code: generated.code });
    }

    let decoder_changes = decode_stats.as_ref().map(|s| s.calls_substituted).unwrap_or(0);
    Ok(DeobfuscateOutput { code: generated.code, changes: transform_result.stats.total_changes() + decoder_changes })
}

fn reparse_sanity_check(code: &str, filename: &str) -> Result<(), String> {
    let config = ParserConfig { source_type: SourceTypeConfig::Script, ..ParserConfig::default() };
    let result = parser::parse_js(code, filename, &config);
    if result.errors.is_empty() {
        return Ok(());
    }
    let frame = parser::error_recovery::render_code_frame(code, filename, 0, "rewritten output no longer parses");
    Err(frame.rendered)
}

fn render_parse_error_frame(code: &str, filename: &str, errors: &[parser::ParseError]) -> String {
    let offset = errors.first().and_then(parse_error_offset).unwrap_or(0);
    let message = errors.first().map(|e| e.to_string()).unwrap_or_default();
    parser::error_recovery::render_code_frame(code, filename, offset, &message).rendered
}

fn parse_error_offset(error: &parser::ParseError) -> Option<u32> {
    match error {
        parser::ParseError::SyntaxError { span: Some(span), .. } => Some(span.start),
        _ => None,
    }
}
