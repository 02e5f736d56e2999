//! Command-line interface for smartscript
//! This binary runs SmartScript templates, dumps their tokens and trees, and drives the boolean
//! expression minimizer.
//!
//! Usage:
//!   smartscript run `<file>` [-p name=value]... [-P name=value]...  - Execute a script
//!   smartscript inspect `<file>` [-t `<transform>`] [--expression]   - Dump tokens or a tree
//!   smartscript truth-table `<expression>`                          - Print a truth table
//!   smartscript minimize `<query>`                                  - Minimize one query
//!   smartscript qmc                                               - Minimize queries read from stdin
//!   smartscript functions                                         - List the script built-ins
//!
//! Every command accepts `--config <file>` and `-v` / `-vv`.

mod query;
mod transforms;

use clap::{Arg, ArgAction, ArgMatches, Command};
use log::{debug, info, LevelFilter};
use query::Query;
use smartscript_config::{Loader, SmartScriptConfig};
use smartscript_core::boolean::{self, assignments};
use smartscript_core::script::{self, exec::functions, RequestContext, ScriptEngine};
use std::collections::HashMap;
use std::fmt::Display;
use std::io::{self, BufRead, IsTerminal, Write};

/// Read from the working directory when `--config` is not given
const DEFAULT_CONFIG_FILE: &str = "smartscript.toml";

fn build_cli() -> Command {
    let style_arg = Arg::new("style")
        .long("style")
        .short('s')
        .help("Operator spelling of printed expressions")
        .value_parser(["word", "symbolic"]);
    let primes_arg = Arg::new("primes")
        .long("primes")
        .help("Also print the prime implicants")
        .action(ArgAction::SetTrue);

    Command::new("smartscript")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Runs SmartScript templates and minimizes boolean functions")
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the built-in defaults")
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log progress to stderr (-v info, -vv debug)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("run")
                .about("Execute a script and print its output")
                .arg(Arg::new("path").help("Path to the script").required(true))
                .arg(
                    Arg::new("param")
                        .long("param")
                        .short('p')
                        .help("Request parameter, name=value")
                        .value_parser(parse_pair)
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("persistent")
                        .long("persistent")
                        .short('P')
                        .help("Persistent parameter, name=value")
                        .value_parser(parse_pair)
                        .action(ArgAction::Append),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Print the tokens or the tree of a script or expression")
                .arg(
                    Arg::new("input")
                        .help("Path to the script, or the expression with --expression")
                        .required(true),
                )
                .arg(
                    Arg::new("transform")
                        .long("transform")
                        .short('t')
                        .help("One of token-json, ast-json, ast-treeviz, ast-source"),
                )
                .arg(
                    Arg::new("expression")
                        .long("expression")
                        .short('e')
                        .help("Treat the input as a boolean expression")
                        .action(ArgAction::SetTrue),
                )
                .arg(style_arg.clone()),
        )
        .subcommand(
            Command::new("truth-table")
                .about("Print the truth table of a boolean expression")
                .arg(
                    Arg::new("expression")
                        .help("The expression; several words are joined with spaces")
                        .required(true)
                        .num_args(1..),
                )
                .arg(style_arg.clone()),
        )
        .subcommand(
            Command::new("minimize")
                .about("Print the minimal forms of one query")
                .long_about(
                    "Print the minimal forms of one query:\n\n    \
                     name(A, B, ...) = <minterms> [| <dont-cares>]\n\n\
                     Each side is an expression over the declared variables or an index list \
                     such as [0, 3].",
                )
                .arg(
                    Arg::new("query")
                        .help("The query; several words are joined with spaces")
                        .required(true)
                        .num_args(1..),
                )
                .arg(style_arg.clone())
                .arg(primes_arg.clone()),
        )
        .subcommand(
            Command::new("qmc")
                .about("Read queries from stdin, one per line, until `quit`")
                .arg(style_arg)
                .arg(primes_arg),
        )
        .subcommand(Command::new("functions").about("List the built-in script functions"))
}

fn main() {
    let matches = build_cli().get_matches();
    let Some((name, sub)) = matches.subcommand() else {
        fail("a subcommand is required");
    };

    init_logging(sub.get_count("verbose"));
    let config = load_config(sub);
    debug!("configuration: {:?}", config);

    match name {
        "run" => handle_run_command(sub, &config),
        "inspect" => handle_inspect_command(sub, &config),
        "truth-table" => handle_truth_table_command(sub, &config),
        "minimize" => handle_minimize_command(sub, &config),
        "qmc" => handle_qmc_command(&config),
        "functions" => handle_functions_command(),
        other => fail(format!("unknown command {}", other)),
    }
}

fn init_logging(verbosity: u8) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    match verbosity {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Info);
        }
        _ => {
            builder.filter_level(LevelFilter::Debug);
        }
    }
    builder.format_timestamp(None).init();
}

/// Defaults, then the config file, then command-line overrides
fn load_config(sub: &ArgMatches) -> SmartScriptConfig {
    let mut loader = match sub.get_one::<String>("config") {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new().with_optional_file(DEFAULT_CONFIG_FILE),
    };

    if let Ok(Some(style)) = sub.try_get_one::<String>("style") {
        loader = loader
            .set_override("minimizer.operator_style", style.as_str())
            .unwrap_or_else(|e| fail(e));
    }
    if let Ok(Some(true)) = sub.try_get_one::<bool>("primes").map(|primes| primes.copied()) {
        loader = loader
            .set_override("minimizer.show_primes", true)
            .unwrap_or_else(|e| fail(e));
    }

    loader
        .build()
        .unwrap_or_else(|e| fail(format!("invalid configuration: {}", e)))
}

/// Handle the run command
fn handle_run_command(sub: &ArgMatches, config: &SmartScriptConfig) {
    let path = sub
        .get_one::<String>("path")
        .expect("path is a required argument");
    let source = read_source(path);
    let document =
        script::parse_document(&source).unwrap_or_else(|e| fail(format!("{}: {}", path, e)));

    let mut ctx = RequestContext::new(io::stdout().lock())
        .with_parameters(collect_pairs(sub, "param"))
        .with_persistent(collect_pairs(sub, "persistent"))
        .with_mime_type(config.script.mime_type.clone());

    let mut engine =
        ScriptEngine::with_options(&document, &mut ctx, config.script.engine_options());
    if let Err(e) = engine.execute() {
        fail(format!("{}: {}", path, e));
    }

    info!("mime type: {}", ctx.mime_type());
    info!("persistent parameters: {:?}", ctx.persistent());
    if let Err(e) = ctx.into_output().flush() {
        fail(e);
    }
}

/// Handle the inspect command
fn handle_inspect_command(sub: &ArgMatches, config: &SmartScriptConfig) {
    let input = sub
        .get_one::<String>("input")
        .expect("input is a required argument");
    let transform = sub
        .get_one::<String>("transform")
        .unwrap_or(&config.inspect.format);

    let result = if sub.get_flag("expression") {
        transforms::execute_expression_transform(
            input,
            transform,
            config.minimizer.operator_style,
        )
    } else {
        transforms::execute_transform(&read_source(input), transform)
    };

    let output = result.unwrap_or_else(|e| fail(e));
    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }
}

/// Handle the truth-table command
fn handle_truth_table_command(sub: &ArgMatches, config: &SmartScriptConfig) {
    let source = joined(sub, "expression");
    let expression = boolean::parse_expression(&source).unwrap_or_else(|e| fail(e));
    let (variables, rows) = assignments::truth_table(&expression).unwrap_or_else(|e| fail(e));

    let header: Vec<&str> = variables.iter().map(String::as_str).collect();
    println!(
        "{}| {}",
        cells(&header),
        expression.to_styled_string(config.minimizer.operator_style)
    );
    for (index, value) in rows.iter().enumerate() {
        let bits: Vec<&str> = assignments::index_to_bits(index as u32, variables.len())
            .into_iter()
            .map(|bit| if bit { "1" } else { "0" })
            .collect();
        let padded: Vec<String> = bits
            .iter()
            .zip(&variables)
            .map(|(bit, name)| format!("{:<width$}", bit, width = name.chars().count()))
            .collect();
        let padded: Vec<&str> = padded.iter().map(String::as_str).collect();
        println!("{}| {}", cells(&padded), u8::from(*value));
    }
}

/// Columns joined with spaces, plus a trailing space when there are any
fn cells(columns: &[&str]) -> String {
    if columns.is_empty() {
        String::new()
    } else {
        format!("{} ", columns.join(" "))
    }
}

/// Handle the minimize command
fn handle_minimize_command(sub: &ArgMatches, config: &SmartScriptConfig) {
    let line = joined(sub, "query");
    let lines = Query::parse(&line)
        .and_then(|query| query.answer(&config.minimizer))
        .unwrap_or_else(|e| fail(e));
    for line in lines {
        println!("{}", line);
    }
}

/// Handle the qmc command
///
/// Errors are reported and the loop goes on with the next line.
fn handle_qmc_command(config: &SmartScriptConfig) {
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut stdout = io::stdout();

    loop {
        if interactive {
            print!("> ");
            let _ = stdout.flush();
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => fail(e),
        }

        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.eq_ignore_ascii_case("quit") {
            break;
        }

        match Query::parse(line).and_then(|query| query.answer(&config.minimizer)) {
            Ok(lines) => {
                for answer in lines {
                    println!("{}", answer);
                }
            }
            Err(e) => eprintln!("Error: {}", e),
        }
    }
}

/// Handle the functions command
fn handle_functions_command() {
    println!("Built-in functions:\n");
    for name in functions::names() {
        println!("  @{}", name);
    }
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected name=value, got {:?}", raw)),
    }
}

fn collect_pairs(sub: &ArgMatches, id: &str) -> HashMap<String, String> {
    sub.get_many::<(String, String)>(id)
        .map(|pairs| pairs.cloned().collect())
        .unwrap_or_default()
}

fn joined(sub: &ArgMatches, id: &str) -> String {
    sub.get_many::<String>(id)
        .map(|words| words.map(String::as_str).collect::<Vec<_>>().join(" "))
        .unwrap_or_default()
}

fn read_source(path: &str) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| fail(format!("{}: {}", path, e)))
}

fn fail(message: impl Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}
