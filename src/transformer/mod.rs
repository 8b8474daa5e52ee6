//! # Transform Runner
//!
//! Applies the rewrite library to a parsed AST until it stops changing. Each
//! pass below targets one obfuscation idiom (see the pass's own module doc)
//! and reports how many rewrites it made; the runner keeps looping over the
//! whole pipeline while any pass in the last pass made progress, bailing out
//! with [`TransformError::NonConvergence`] if that never happens within
//! `iteration_cap` rounds.
//!
//! ## Pass ordering
//!
//! Passes that produce opportunities for other passes run first:
//! `sequence_splitter` exposes assignments later passes key off of,
//! `object_cluster::save`/`inline_members` exposes literal member values
//! before `constant_inliner` runs, and `unused_declaration_remover` runs
//! last so it can clean up whatever every earlier pass left dangling.

use crate::parser::ast_types::Program;
use thiserror::Error;

pub mod binary_evaluator;
pub mod comment_marker;
pub mod constant_inliner;
pub mod control_flow_unflattener;
pub mod function_indirection_collapser;
pub mod object_cluster;
pub mod self_invoking_unwrapper;
pub mod sequence_splitter;
pub mod string_canonicalizer;
pub mod unreachable_branch_collapser;
pub mod unused_declaration_remover;

#[cfg(test)]
mod tests;

/// Configuration for the transform runner.
#[derive(Debug, Clone)]
pub struct TransformerConfig {
    /// Maximum number of full pipeline passes before giving up.
    pub iteration_cap: u32,
    /// Identifier names `comment_marker` should flag wherever referenced,
    /// in addition to the always-on `eval`/`Function` markers.
    pub mark_keywords: Vec<String>,
    pub verbose: bool,
}

impl Default for TransformerConfig {
    fn default() -> Self {
        Self {
            iteration_cap: 100,
            mark_keywords: Vec::new(),
            verbose: false,
        }
    }
}

/// Errors that can occur during transformation. The pipeline never catches
/// and silently discards a pass failure: `transform_ast` propagates it to
/// the caller rather than rolling back and continuing, matching the
/// engine-wide abort-on-error contract.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("transform pipeline did not converge after {0} iterations")]
    NonConvergence(u32),
    #[error("invalid transformation state: {0}")]
    InvalidState(String),
}

pub type TransformResult<T> = Result<T, TransformError>;

/// Per-iteration counts, summed across a full run for [`TransformationResult`].
#[derive(Debug, Clone, Default)]
pub struct TransformationStats {
    pub iterations_run: u32,
    pub sequences_split: u32,
    pub constants_evaluated: u32,
    pub branches_collapsed: u32,
    pub flattening_reversed: u32,
    pub iifes_unwrapped: u32,
    pub indirections_collapsed: u32,
    pub members_inlined: u32,
    pub constants_inlined: u32,
    pub declarations_removed: u32,
    pub statements_marked: u32,
    pub transformation_time_ms: u64,
}

impl TransformationStats {
    pub fn total_changes(&self) -> u32 {
        self.sequences_split
            + self.constants_evaluated
            + self.branches_collapsed
            + self.flattening_reversed
            + self.iifes_unwrapped
            + self.indirections_collapsed
            + self.members_inlined
            + self.constants_inlined
            + self.declarations_removed
    }
}

#[derive(Debug, Clone)]
pub struct TransformationResult {
    pub transformed_ast: Program,
    pub stats: TransformationStats,
    pub warnings: Vec<String>,
}

/// Runs the default rewrite pipeline to a fixpoint. The caller (`lib::deobfuscate`)
/// re-parses the final generated output as the one post-pipeline sanity check;
/// validating every intermediate iteration would cost a full print+parse per
/// round for no benefit, since passes are semantics-preserving by construction.
pub fn transform_ast(ast: Program, config: &TransformerConfig) -> TransformResult<TransformationResult> {
    let start = std::time::Instant::now();
    let mut program = ast;
    let mut stats = TransformationStats::default();
    let warnings = Vec::new();

    let mut iteration = 0;
    loop {
        iteration += 1;
        if iteration > config.iteration_cap {
            return Err(TransformError::NonConvergence(config.iteration_cap));
        }

        if config.verbose {
            eprintln!("transform: iteration {iteration}");
        }

        let round = run_pipeline_round(&mut program, config, &mut stats);
        stats.iterations_run = iteration;

        if round == 0 {
            break;
        }
    }

    stats.transformation_time_ms = start.elapsed().as_millis() as u64;

    Ok(TransformationResult { transformed_ast: program, stats, warnings })
}

fn run_pipeline_round(program: &mut Program, config: &TransformerConfig, stats: &mut TransformationStats) -> u32 {
    let mut round_changes = 0;

    let changes = sequence_splitter::split_sequences(program);
    stats.sequences_split += changes;
    round_changes += changes;

    let changes = binary_evaluator::evaluate_constants(program);
    stats.constants_evaluated += changes;
    round_changes += changes;

    let changes = unreachable_branch_collapser::collapse_unreachable_branches(program);
    stats.branches_collapsed += changes;
    round_changes += changes;

    let changes = control_flow_unflattener::unflatten_control_flow(program);
    stats.flattening_reversed += changes;
    round_changes += changes;

    let changes = self_invoking_unwrapper::unwrap_self_invoking(program);
    stats.iifes_unwrapped += changes;
    round_changes += changes;

    let changes = function_indirection_collapser::collapse_indirection(program);
    stats.indirections_collapsed += changes;
    round_changes += changes;

    let changes = object_cluster::inline_members(program);
    stats.members_inlined += changes;
    round_changes += changes;

    let changes = constant_inliner::inline_constants(program);
    stats.constants_inlined += changes;
    round_changes += changes;

    let changes = unused_declaration_remover::remove_unused_declarations(program);
    stats.declarations_removed += changes;
    round_changes += changes;

    string_canonicalizer::canonicalize_strings(program);

    let marked = comment_marker::mark_statements(program, &config.mark_keywords);
    stats.statements_marked += marked;

    round_changes
}

