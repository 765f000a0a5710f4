//! Sieve - run selector queries against JSON element trees
//!
//! Usage: sieve <SELECTOR> <TREE.json>

mod error;
mod loader;

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use log::debug;

use sieve_dom::ElementRef;

use crate::error::{CliError, CliResult};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// What the invocation asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Help,
    Version,
    /// Print the compiled form of a selector
    Explain,
    /// Run a selector against a tree file
    Query,
}

/// Command line configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub mode: Mode,
    pub selector: String,
    pub tree_path: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Help,
            selector: String::new(),
            tree_path: None,
        }
    }
}

impl CliConfig {
    /// Build a config from the arguments after the program name
    pub fn from_args(args: &[String]) -> CliResult<Self> {
        let Some(first) = args.first() else {
            return Err(CliError::Usage("missing selector".to_string()));
        };

        match first.as_str() {
            "--help" | "-h" => Ok(Self::default()),
            "--version" | "-V" => Ok(Self {
                mode: Mode::Version,
                ..Self::default()
            }),
            "--explain" => match args {
                [_, selector] => Ok(Self {
                    mode: Mode::Explain,
                    selector: selector.clone(),
                    ..Self::default()
                }),
                _ => Err(CliError::Usage("--explain takes exactly one selector".to_string())),
            },
            _ => match args {
                [selector, path] => Ok(Self {
                    mode: Mode::Query,
                    selector: selector.clone(),
                    tree_path: Some(PathBuf::from(path)),
                }),
                _ => Err(CliError::Usage("expected <SELECTOR> <TREE.json>".to_string())),
            },
        }
    }
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("sieve");

    let config = match CliConfig::from_args(args.get(1..).unwrap_or_default()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage(program);
            return ExitCode::FAILURE;
        }
    };
    debug!("{:?}", config);

    let result = match config.mode {
        Mode::Help => {
            print_usage(program);
            Ok(())
        }
        Mode::Version => {
            println!("Sieve {}", VERSION);
            Ok(())
        }
        Mode::Explain => run_explain(&config),
        Mode::Query => run_query(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_usage(program: &str) {
    println!(
        r#"Sieve {} - CSS-style selector queries over element trees

USAGE:
    {} [OPTIONS] <SELECTOR> <TREE.json>

OPTIONS:
    -h, --help              Print this help message
    -V, --version           Print version information
    --explain <SELECTOR>    Print the compiled form of a selector

EXAMPLES:
    {} 'ul > li:nth-child(odd)' page.json
    {} --explain 'div.note, p:has(> a)'

"#,
        VERSION, program, program, program
    );
}

/// Print the canonical evaluator form of the selector
fn run_explain(config: &CliConfig) -> CliResult<()> {
    let evaluator = sieve_select::parse(&config.selector)?;
    println!("{}", evaluator);
    Ok(())
}

/// Load the tree and print every match in document order
fn run_query(config: &CliConfig) -> CliResult<()> {
    let evaluator = sieve_select::parse(&config.selector)?;

    let path = config
        .tree_path
        .as_ref()
        .ok_or_else(|| CliError::Usage("missing tree file".to_string()))?;
    let json = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let tree = loader::load_tree(&json)?;

    for element in sieve_select::select(&evaluator, tree.document()) {
        println!("{}", describe(element));
    }
    Ok(())
}

/// `tag#id.class1.class2`
fn describe(element: ElementRef<'_>) -> String {
    let mut out = element.tag_name().to_string();
    if let Some(id) = element.id() {
        out.push('#');
        out.push_str(id);
    }
    if let Some(data) = element.data() {
        for class in data.classes() {
            out.push('.');
            out.push_str(class);
        }
    }
    out
}
