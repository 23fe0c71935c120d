//! Command-line interface for stone
//!
//! Usage:
//!   stone tokens `<path>` [--json] [--config `<file>`]             - Print the token stream
//!   stone parse `<path>` [--format `<format>`] [--show-lines]
//!                      [--config `<file>`]                       - Parse and print the tree
//!   stone formats                                             - List output formats
//!
//! Without `--config`, a `stone.toml` in the working directory is layered over the
//! built-in defaults when present. `lexer.emit_eol = false` is accepted by `tokens` only.
//! `RUST_LOG=stone=trace` shows lexing and backtracking.

use clap::{Arg, ArgAction, ArgMatches, Command};
use std::fs::File;
use std::io::BufReader;
use stone::stone::basic::BasicParser;
use stone::stone::config::{Loader, StoneConfig};
use stone::stone::formats::{FormatError, FormatRegistry, SexpFormatter};
use stone::stone::lexing::{LexError, Lexer};
use stone::stone::parsing::{GrammarError, ParseError};
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("missing argument '{0}'")]
    MissingArgument(&'static str),
    #[error("cannot open {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("{0}")]
    Lex(#[from] LexError),
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("{0}")]
    Grammar(#[from] GrammarError),
    #[error("{0}")]
    Format(#[from] FormatError),
}

fn main() {
    env_logger::init();

    let config_arg = Arg::new("config")
        .long("config")
        .short('c')
        .help("Configuration file layered over the defaults");
    let matches = Command::new("stone")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Lexer and parser front end for the Stone language")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("tokens")
                .about("Print the token stream of a source file")
                .arg(
                    Arg::new("path")
                        .help("Path to the stone source file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the tokens as a JSON array"),
                )
                .arg(config_arg.clone()),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse a source file with the basic grammar and print the tree")
                .arg(
                    Arg::new("path")
                        .help("Path to the stone source file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (see `stone formats`)"),
                )
                .arg(
                    Arg::new("show-lines")
                        .long("show-lines")
                        .action(ArgAction::SetTrue)
                        .help("Prefix statements with their line (sexp format)"),
                )
                .arg(config_arg),
        )
        .subcommand(Command::new("formats").about("List available output formats"))
        .get_matches();

    let result = match matches.subcommand() {
        Some(("tokens", sub)) => handle_tokens_command(sub),
        Some(("parse", sub)) => handle_parse_command(sub),
        Some(("formats", _)) => {
            handle_formats_command();
            Ok(())
        }
        _ => unreachable!(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn config_loader(matches: &ArgMatches) -> Loader {
    match matches.get_one::<String>("config") {
        Some(path) => Loader::new().with_file(path),
        None => Loader::discover("."),
    }
}

fn open_lexer(
    matches: &ArgMatches,
    config: &StoneConfig,
) -> Result<Lexer<BufReader<File>>, CliError> {
    let path = matches
        .get_one::<String>("path")
        .ok_or(CliError::MissingArgument("path"))?;
    let file = File::open(path).map_err(|source| CliError::Open {
        path: path.clone(),
        source,
    })?;
    Ok(Lexer::with_options(BufReader::new(file), config.lexer))
}

/// Print every token, end-of-line markers included
fn handle_tokens_command(matches: &ArgMatches) -> Result<(), CliError> {
    let config = config_loader(matches).build()?;
    let lexer = open_lexer(matches, &config)?;
    if matches.get_flag("json") {
        let tokens = lexer.collect::<Result<Vec<_>, _>>()?;
        let json = serde_json::to_string_pretty(&tokens)
            .map_err(|e| FormatError::SerializationError(e.to_string()))?;
        println!("{json}");
        return Ok(());
    }
    for token in lexer {
        println!("==> {}", token?.text());
    }
    Ok(())
}

fn handle_parse_command(matches: &ArgMatches) -> Result<(), CliError> {
    let mut loader = config_loader(matches);
    if let Some(format) = matches.get_one::<String>("format") {
        loader = loader.set_override("output.format", format.as_str());
    }
    if matches.get_flag("show-lines") {
        loader = loader.set_override("output.show_lines", true);
    }
    let config = loader.build()?;
    config.check_parse()?;
    log::debug!("parse configuration: {config:?}");

    let mut lexer = open_lexer(matches, &config)?;
    let parser = BasicParser::new()?;
    let nodes = parser.parse_all(&mut lexer)?;

    let mut registry = FormatRegistry::with_defaults();
    registry.register(SexpFormatter {
        show_lines: config.output.show_lines,
    });
    print!("{}", registry.serialize(&nodes, &config.output.format)?);
    Ok(())
}

fn handle_formats_command() {
    let registry = FormatRegistry::with_defaults();
    println!("Available output formats:\n");
    for name in registry.list_formats() {
        let description = registry.get(&name).map(|f| f.description()).unwrap_or("");
        println!("  {name:<10} {description}");
    }
}
