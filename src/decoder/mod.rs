//! # String-Array Decoder Subsystem
//!
//! Obfuscators frequently replace literal strings with calls into a helper
//! that indexes (and sometimes rotates) a single large array built at load
//! time. This module locates that helper (`locator`), runs its setup code
//! plus any rotator in an isolated interpreter (`sandbox`), and substitutes
//! the recovered literals back into call sites (`substitutor`).
//!
//! Unlike the rewrite passes in `transformer`, this subsystem is opt-in: it
//! only runs when the caller supplies a [`Sandbox`] (`DeobfuscateOptions::sandbox`),
//! since evaluating untrusted code is a meaningfully different risk profile
//! than the purely structural AST rewrites the rest of the pipeline performs.

use std::fmt;

use crate::analyzer::scope_utils;
use crate::generator::{Generator, GeneratorConfig};
use crate::parser::ast_types::*;

pub mod locator;
pub mod sandbox;
pub mod substitutor;

pub use sandbox::{BoaSandbox, Sandbox, SandboxError, SandboxValue};


/// Knobs for decoder detection, mirroring `TransformerConfig`'s role for the
/// rewrite pipeline.
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    pub call_count_threshold: u32,
    pub array_size_threshold: usize,
    /// Decoder names supplied directly by the caller; when non-empty these
    /// are used instead of running the locators at all.
    pub forced_decoders: Vec<String>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self { call_count_threshold: 100, array_size_threshold: 100, forced_decoders: Vec::new() }
    }
}

/// Outcome of one decoding pass, reported back to the caller the same way
/// `TransformationStats` reports rewrite-pass progress.
#[derive(Debug, Clone, Default)]
pub struct DecodeStats {
    pub decoders_located: u32,
    pub calls_substituted: u32,
    pub calls_failed: u32,
}

impl fmt::Display for DecodeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} decoder(s), {} call(s) substituted, {} failed", self.decoders_located, self.calls_substituted, self.calls_failed)
    }
}

/// Locates and runs the decoder subsystem over `program`, mutating it in
/// place. Returns `None` (no stats, no changes) when no decoder could be
/// located and none were forced — that is not an error, most inputs have no
/// string-array obfuscation at all.
pub fn decode_strings(program: &mut Program, config: &DecoderConfig, sandbox: &dyn Sandbox) -> Option<DecodeStats> {
    if !config.forced_decoders.is_empty() {
        return Some(decode_with_names(program, &config.forced_decoders, sandbox));
    }

    let location = locator::by_call_count(&program.body, config.call_count_threshold)
        .or_else(|| locator::by_big_array(&program.body, config.array_size_threshold))?;

    let setup_code = render_setup(program, location.setup_end);
    let report = substitutor::substitute_calls(program, &location.decoder_name, &setup_code, sandbox);

    Some(DecodeStats { decoders_located: 1, calls_substituted: report.substituted, calls_failed: report.failed })
}

fn decode_with_names(program: &mut Program, names: &[String], sandbox: &dyn Sandbox) -> DecodeStats {
    let mut stats = DecodeStats::default();
    for name in names {
        rename_designated(program, name);
        let setup_code = render_setup(program, program.body.len().saturating_sub(1));
        let report = substitutor::substitute_calls(program, name, &setup_code, sandbox);
        stats.decoders_located += 1;
        stats.calls_substituted += report.substituted;
        stats.calls_failed += report.failed;
    }
    stats
}

/// If the caller names a decoder externally but the program refers to it
/// under a local alias (`let alias = decoder;`), drop that alias
/// declaration and rename every reference to the real name.
fn rename_designated(program: &mut Program, decoder_name: &str) {
    let alias = program.body.iter().find_map(|stmt| {
        let Statement::VariableDeclaration { declarations, .. } = stmt else { return None };
        let [declarator] = declarations.as_slice() else { return None };
        let Pattern::Identifier(id) = &declarator.id else { return None };
        let Some(Expression::Identifier(target)) = &declarator.init else { return None };
        (target.name == decoder_name).then(|| id.name.clone())
    });

    let Some(alias) = alias else { return };

    program.body.retain(|stmt| {
        !matches!(stmt, Statement::VariableDeclaration { declarations, .. }
            if declarations.len() == 1
                && matches!(&declarations[0].id, Pattern::Identifier(id) if id.name == alias)
                && matches!(&declarations[0].init, Some(Expression::Identifier(t)) if t.name == decoder_name))
    });

    scope_utils::rename_fast(&mut program.body, &alias, decoder_name);
}

/// Prints the top-level statements up to and including `setup_end` back to
/// source text, to hand to the sandbox as the preamble before a call.
fn render_setup(program: &Program, setup_end: usize) -> String {
    let prefix = Program { body: program.body[..=setup_end.min(program.body.len().saturating_sub(1))].to_vec(), source_type: program.source_type.clone() };
    Generator::new(GeneratorConfig::default()).generate(&prefix, None).map(|r| r.code).unwrap_or_default()
}
