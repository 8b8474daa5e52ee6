//! # jsunminify
//!
//! Command-line front end for the deobfuscation engine in `lib.rs`. Reads a
//! JavaScript file, runs it through the decoder subsystem and the rewrite
//! pipeline, and writes the result to stdout or `--output`.
//!
//! ## Usage
//!
//! ```bash
//! jsunminify <FILE> [--decoders NAME,...] [--call-count-threshold N]
//!            [--array-size-threshold N] [--iteration-cap N]
//!            [--mark-keywords KW,...] [--no-sandbox] [--verbose] [-o OUTPUT]
//! ```

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{Arg, ArgAction, Command};

use jsunminify::{deobfuscate, DeobfuscateOptions};

const VERSION: &str = "0.1.0";
const APP_NAME: &str = "jsunminify";

struct CliConfig {
    input_file: PathBuf,
    output_file: Option<PathBuf>,
    decoders: Vec<String>,
    call_count_threshold: u32,
    array_size_threshold: usize,
    iteration_cap: u32,
    mark_keywords: Vec<String>,
    no_sandbox: bool,
    verbose: bool,
}

fn main() {
    let config = match parse_command_line_arguments() {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{APP_NAME}: {message}");
            process::exit(2);
        }
    };

    if let Err(message) = run(config) {
        eprintln!("{APP_NAME}: {message}");
        process::exit(1);
    }
}

fn run(config: CliConfig) -> Result<(), String> {
    let source = fs::read_to_string(&config.input_file)
        .map_err(|e| format!("cannot read {}: {e}", config.input_file.display()))?;

    if config.verbose {
        eprintln!("{APP_NAME} v{VERSION}: deobfuscating {}", config.input_file.display());
    }

    let sandbox = if config.no_sandbox { None } else { Some(Box::new(jsunminify::decoder::BoaSandbox::default()) as Box<dyn jsunminify::decoder::Sandbox>) };

    let options = DeobfuscateOptions {
        decoders: config.decoders,
        sandbox,
        call_count_threshold: config.call_count_threshold,
        array_size_threshold: config.array_size_threshold,
        iteration_cap: config.iteration_cap,
        mark_keywords: config.mark_keywords,
        verbose: config.verbose,
    };

    let filename = config.input_file.to_string_lossy().into_owned();
    let output = deobfuscate(&source, &filename, options).map_err(|error| {
        if let jsunminify::error::DeobfuscateError::InternalError { debug_code, .. } = &error {
            let debug_path = format!("{}.debug.js", config.input_file.display());
            if fs::write(&debug_path, debug_code).is_ok() && config.verbose {
                eprintln!("wrote failing intermediate to {debug_path}");
            }
        }
        error.to_string()
    })?;

    if config.verbose {
        eprintln!("{APP_NAME}: {} rewrite(s) applied", output.changes);
    }

    match config.output_file {
        Some(path) => fs::write(&path, output.code).map_err(|e| format!("cannot write {}: {e}", path.display())),
        None => {
            println!("{}", output.code);
            Ok(())
        }
    }
}

fn parse_command_line_arguments() -> Result<CliConfig, String> {
    let matches = Command::new(APP_NAME)
        .version(VERSION)
        .author("jsunminify contributors")
        .about("Reverses common JavaScript obfuscation/minification transforms")
        .arg(Arg::new("file").required(true).help("JavaScript file to deobfuscate"))
        .arg(Arg::new("output").short('o').long("output").help("Write output to this path instead of stdout"))
        .arg(Arg::new("decoders").long("decoders").value_delimiter(',').help("Force these function names to be treated as string-array decoders"))
        .arg(Arg::new("call-count-threshold").long("call-count-threshold").help("Minimum reference count for the by-call-count decoder locator"))
        .arg(Arg::new("array-size-threshold").long("array-size-threshold").help("Minimum element count for the by-big-array decoder locator"))
        .arg(Arg::new("iteration-cap").long("iteration-cap").help("Maximum fixpoint iterations before giving up"))
        .arg(Arg::new("mark-keywords").long("mark-keywords").value_delimiter(',').help("Identifier names to flag with a TOLOOK comment wherever referenced"))
        .arg(Arg::new("no-sandbox").long("no-sandbox").action(ArgAction::SetTrue).help("Disable the string-array decoder subsystem"))
        .arg(Arg::new("verbose").short('v').long("verbose").action(ArgAction::SetTrue).help("Print progress diagnostics to stderr"))
        .get_matches();

    let input_file = PathBuf::from(matches.get_one::<String>("file").expect("required by clap"));
    if !input_file.exists() {
        return Err(format!("file not found: {}", input_file.display()));
    }

    let parse_u32 = |name: &str, default: u32| -> Result<u32, String> {
        match matches.get_one::<String>(name) {
            Some(raw) => raw.parse().map_err(|_| format!("--{name} expects an integer, got {raw:?}")),
            None => Ok(default),
        }
    };
    let parse_usize = |name: &str, default: usize| -> Result<usize, String> {
        match matches.get_one::<String>(name) {
            Some(raw) => raw.parse().map_err(|_| format!("--{name} expects an integer, got {raw:?}")),
            None => Ok(default),
        }
    };

    Ok(CliConfig {
        input_file,
        output_file: matches.get_one::<String>("output").map(PathBuf::from),
        decoders: matches.get_many::<String>("decoders").map(|v| v.cloned().collect()).unwrap_or_default(),
        call_count_threshold: parse_u32("call-count-threshold", 100)?,
        array_size_threshold: parse_usize("array-size-threshold", 100)?,
        iteration_cap: parse_u32("iteration-cap", 100)?,
        mark_keywords: matches.get_many::<String>("mark-keywords").map(|v| v.cloned().collect()).unwrap_or_default(),
        no_sandbox: matches.get_flag("no-sandbox"),
        verbose: matches.get_flag("verbose"),
    })
}
